use flowgraph_common::Span;
use flowgraph_parser::{Arena, NodeId, NodeKind};

/// The label text for a node, per §4.3: `"<Role>\n\n<source text>"`, with
/// three special cases: `Root` prints empty, a terminal prints its own value
/// instead of source text (so e.g. `BoolLit` prints `"true"`, not
/// `"BoolLit\n\ntrue"`), and `WrapperNode` prints its raw source-span text
/// with no role prefix (callers must not recurse into it either; see
/// `NodeKind::is_wrapper`).
pub fn node_label(arena: &Arena, source: &str, id: NodeId) -> String {
    let kind = arena.kind(id);
    if matches!(kind, NodeKind::Root(_)) {
        return String::new();
    }
    if kind.is_wrapper() {
        return slice_source(source, arena.span(id)).to_string();
    }
    if let Some(value) = kind.terminal_value() {
        return value.to_string();
    }
    format!("{}\n\n{}", kind.role(), slice_source(source, arena.span(id)))
}

pub fn slice_source(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_common::logger::NullLogger;

    #[test]
    fn root_label_is_empty() {
        let (tokens, _) = flowgraph_lexer::tokenize("x = 1\n", &NullLogger);
        let (arena, root, _) = flowgraph_parser::parse(tokens, &NullLogger);
        assert_eq!(node_label(&arena, "x = 1\n", root), "");
    }

    #[test]
    fn terminal_prints_its_own_value() {
        let source = "x = 1\n";
        let (tokens, _) = flowgraph_lexer::tokenize(source, &NullLogger);
        let (arena, root, _) = flowgraph_parser::parse(tokens, &NullLogger);
        let NodeKind::Root(children) = arena.kind(root) else {
            panic!("expected Root")
        };
        let NodeKind::Assignment { value, .. } = arena.kind(children[0]) else {
            panic!("expected Assignment")
        };
        assert_eq!(node_label(&arena, source, *value), "1");
    }

    #[test]
    fn structured_node_prints_role_and_source_text() {
        let source = "x = 1\n";
        let (tokens, _) = flowgraph_lexer::tokenize(source, &NullLogger);
        let (arena, root, _) = flowgraph_parser::parse(tokens, &NullLogger);
        let NodeKind::Root(children) = arena.kind(root) else {
            panic!("expected Root")
        };
        assert_eq!(node_label(&arena, source, children[0]), "Assignment\n\nx = 1");
    }
}
