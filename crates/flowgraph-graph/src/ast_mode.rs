use flowgraph_parser::{Arena, NodeId};

use crate::label::node_label;
use crate::writer::GraphWriter;

/// Pre-order DFS over the AST: every reachable node becomes a graph node,
/// every child link becomes an edge from parent to child, labeled with the
/// field name when the variant gives one. `WrapperNode` stops recursion.
pub fn emit(arena: &Arena, root: NodeId, source: &str) -> String {
    let mut writer = GraphWriter::new();
    walk(&mut writer, arena, source, root);
    writer.finish()
}

fn walk(writer: &mut GraphWriter, arena: &Arena, source: &str, id: NodeId) -> u32 {
    let node_id = writer.node(&node_label(arena, source, id));
    let kind = arena.kind(id);
    if kind.is_wrapper() {
        return node_id;
    }
    for (name, child) in kind.labeled_children() {
        let child_id = walk(writer, arena, source, child);
        writer.edge(node_id, child_id, name, None);
    }
    node_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_common::logger::NullLogger;

    fn emit_source(source: &str) -> String {
        let (tokens, _) = flowgraph_lexer::tokenize(source, &NullLogger);
        let (arena, root, errors) = flowgraph_parser::parse(tokens, &NullLogger);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        emit(&arena, root, source)
    }

    #[test]
    fn every_edge_has_a_lower_source_id_than_target() {
        // Pre-order numbering: a parent is always emitted before its children.
        let out = emit_source("if a:\n  x\nelse:\n  y\n");
        for line in out.lines().filter(|l| l.contains("->")) {
            let (lhs, rest) = line.split_once("->").unwrap();
            let from: u32 = lhs.trim().parse().unwrap();
            let to: u32 = rest.trim().split_whitespace().next().unwrap().parse().unwrap();
            assert!(from < to, "edge {line} is not pre-order");
        }
    }

    #[test]
    fn wrapper_node_prints_raw_source_text_and_is_not_descended_into() {
        let out = emit_source("def f(a, b):\n  return a\n");
        // A signature WrapperNode's label is its bare source text (no role
        // prefix), and it only ever appears as a leaf: it is never the
        // source of an outgoing edge.
        let wrapper_line = out.lines().find(|l| l.contains(r#"label="(a, b)""#)).unwrap();
        let id: u32 = wrapper_line.split_whitespace().next().unwrap().parse().unwrap();
        assert!(!out.lines().any(|l| l.starts_with(&format!("{id} ->"))));
    }

    #[test]
    fn named_children_use_field_names_as_edge_labels() {
        let out = emit_source("if a:\n  x\n");
        assert!(out.contains(r#"label="condition""#));
        assert!(out.contains(r#"label="true_branch""#));
    }

    #[test]
    fn plain_assignment_snapshot() {
        insta::assert_snapshot!(emit_source("x = 1\n"), @r###"
        0 [label=""]
        1 [label="Assignment\n\nx = 1"]
        2 [label="x"]
        1 -> 2 [label="target"]
        3 [label="="]
        1 -> 3 [label="op"]
        4 [label="1"]
        1 -> 4 [label="value"]
        0 -> 1
        "###);
    }
}
