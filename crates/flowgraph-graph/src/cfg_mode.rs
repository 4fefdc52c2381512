use flowgraph_parser::{Arena, NodeId, NodeKind};

use crate::label::{node_label, slice_source};
use crate::writer::GraphWriter;

/// A flow subgraph as the CFG derivation pass sees it: the set of nodes
/// control can enter through (`heads`) and the set of nodes it can exit
/// through (`tails`). Every constructor in this module happens to produce a
/// single head, but `heads` stays a `Vec` so [`connect`] implements the full
/// successor-chaining rule (including the both-branching Cartesian product)
/// uniformly rather than as a special case.
struct Flow {
    heads: Vec<u32>,
    tails: Vec<u32>,
}

impl Flow {
    fn single(id: u32) -> Self {
        Flow {
            heads: vec![id],
            tails: vec![id],
        }
    }
}

/// Walk `root`'s children as a structured transformation into flow
/// subgraphs, chaining each top-level statement into the next.
pub fn emit(arena: &Arena, root: NodeId, source: &str) -> String {
    let mut writer = GraphWriter::new();
    let mut function_stack: Vec<String> = Vec::new();
    if let NodeKind::Root(children) = arena.kind(root) {
        let flows: Vec<Flow> = children
            .iter()
            .map(|&child| build(&mut writer, arena, source, child, &mut function_stack))
            .collect();
        chain(&mut writer, &flows);
    }
    writer.finish()
}

/// Draw edges from every flow's tails to the next flow's heads, in order.
fn chain(writer: &mut GraphWriter, flows: &[Flow]) {
    for pair in flows.windows(2) {
        connect(writer, &pair[0], &pair[1]);
    }
}

/// The successor-chaining rule: an edge from every tail of `from` to every
/// head of `to`. Reduces to a single edge when both sides are singletons,
/// and to the documented fan-out/fan-in/Cartesian-product cases otherwise.
fn connect(writer: &mut GraphWriter, from: &Flow, to: &Flow) {
    for &tail in &from.tails {
        for &head in &to.heads {
            writer.edge(tail, head, None, None);
        }
    }
}

fn build(
    writer: &mut GraphWriter,
    arena: &Arena,
    source: &str,
    id: NodeId,
    function_stack: &mut Vec<String>,
) -> Flow {
    match arena.kind(id) {
        NodeKind::Block(children) => build_block(writer, arena, source, id, children, function_stack),
        NodeKind::IfElse {
            condition,
            true_branch,
            false_branch,
        } => build_if_else(writer, arena, source, *condition, *true_branch, *false_branch, function_stack),
        NodeKind::While { condition, body } => build_loop(writer, arena, source, *condition, *body, function_stack),
        NodeKind::For { iterator, body } => build_loop(writer, arena, source, *iterator, *body, function_stack),
        NodeKind::Definition { name, signature, body } => {
            build_definition(writer, arena, source, *name, *signature, *body, function_stack)
        }
        NodeKind::Return(expr) => build_return(writer, arena, source, *expr, function_stack),
        // Every other node kind (expressions, WrapperNode, Yield/Await as a
        // bare statement, ...) is an atomic step per §4.3.
        _ => Flow::single(writer.node(&node_label(arena, source, id))),
    }
}

fn build_block(
    writer: &mut GraphWriter,
    arena: &Arena,
    source: &str,
    block_id: NodeId,
    children: &[NodeId],
    function_stack: &mut Vec<String>,
) -> Flow {
    if children.is_empty() {
        return Flow::single(writer.node(&node_label(arena, source, block_id)));
    }
    let flows: Vec<Flow> = children
        .iter()
        .map(|&child| build(writer, arena, source, child, function_stack))
        .collect();
    chain(writer, &flows);
    Flow {
        heads: flows[0].heads.clone(),
        tails: flows.last().expect("non-empty").tails.clone(),
    }
}

fn build_if_else(
    writer: &mut GraphWriter,
    arena: &Arena,
    source: &str,
    condition: NodeId,
    true_branch: NodeId,
    false_branch: Option<NodeId>,
    function_stack: &mut Vec<String>,
) -> Flow {
    let cond_node = writer.node(&node_label(arena, source, condition));
    let then_flow = build(writer, arena, source, true_branch, function_stack);
    for &head in &then_flow.heads {
        writer.edge(cond_node, head, Some("True"), Some("green"));
    }
    let mut tails = then_flow.tails;
    match false_branch {
        Some(fb) => {
            let else_flow = build(writer, arena, source, fb, function_stack);
            for &head in &else_flow.heads {
                writer.edge(cond_node, head, Some("False"), Some("red"));
            }
            tails.extend(else_flow.tails);
        }
        // No else: the condition itself is a fallthrough exit when it's
        // false. No "False" edge is drawn (there is nowhere to draw it to),
        // matching the one-True-edge, zero-or-one-False-edge invariant.
        None => tails.push(cond_node),
    }
    Flow {
        heads: vec![cond_node],
        tails,
    }
}

fn build_loop(
    writer: &mut GraphWriter,
    arena: &Arena,
    source: &str,
    header: NodeId,
    body: NodeId,
    function_stack: &mut Vec<String>,
) -> Flow {
    let header_node = writer.node(&node_label(arena, source, header));
    let body_flow = build(writer, arena, source, body, function_stack);
    for &head in &body_flow.heads {
        writer.edge(header_node, head, Some("Loop entry"), Some("purple"));
    }
    for &tail in &body_flow.tails {
        writer.edge(tail, header_node, Some("Iteration"), Some("blue"));
    }
    // The header is both head and tail: the exit-to-follower edge is drawn
    // from it, modeling loop-exit when the condition/iterator is exhausted.
    Flow::single(header_node)
}

fn build_definition(
    writer: &mut GraphWriter,
    arena: &Arena,
    source: &str,
    name: NodeId,
    signature: NodeId,
    body: NodeId,
    function_stack: &mut Vec<String>,
) -> Flow {
    let name_text = slice_source(source, arena.span(name));
    let sig_text = slice_source(source, arena.span(signature));
    let label = format!("{name_text}{sig_text}");
    let def_node = writer.node(&label);

    function_stack.push(label);
    let body_flow = build(writer, arena, source, body, function_stack);
    for &head in &body_flow.heads {
        writer.edge(def_node, head, Some("Definition entry"), Some("purple"));
    }
    function_stack.pop();

    // The function body's exits are all through `Return` nodes; a def
    // statement's own tail, for the purposes of the enclosing block, is
    // just the def node (entering the body happens via a call, not
    // sequentially).
    Flow::single(def_node)
}

fn build_return(
    writer: &mut GraphWriter,
    arena: &Arena,
    source: &str,
    expr: NodeId,
    function_stack: &[String],
) -> Flow {
    let context = function_stack.last().map(String::as_str).unwrap_or("<module>");
    let label = format!("Exit from {context}\n{}", slice_source(source, arena.span(expr)));
    let node = writer.node_with_color(&label, Some("red"));
    // Terminal: no outgoing edges are ever drawn from a Return node.
    Flow {
        heads: vec![node],
        tails: Vec::new(),
    }
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
    fn while_loop_has_entry_and_iteration_edges_and_nothing_else() {
        let out = emit_source("while c:\n  x\n");
        let edges: Vec<&str> = out.lines().filter(|l| l.contains("->")).collect();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().any(|e| e.contains("Loop entry") && e.contains("purple")));
        assert!(edges.iter().any(|e| e.contains("Iteration") && e.contains("blue")));
    }

    #[test]
    fn if_else_draws_true_and_false_edges() {
        let out = emit_source("if a:\n  x\nelse:\n  y\n");
        let edges: Vec<&str> = out.lines().filter(|l| l.contains("->")).collect();
        assert_eq!(edges.iter().filter(|e| e.contains("\"True\"")).count(), 1);
        assert_eq!(edges.iter().filter(|e| e.contains("\"False\"")).count(), 1);
    }

    #[test]
    fn if_without_else_draws_no_false_edge() {
        let out = emit_source("if a:\n  x\n");
        assert!(!out.contains("False"));
        assert_eq!(out.lines().filter(|l| l.contains("->")).count(), 1);
    }

    #[test]
    fn return_node_has_no_outgoing_edges() {
        let out = emit_source("def f():\n  return 1\n  x\n");
        let return_line = out.lines().find(|l| l.contains("Exit from")).unwrap();
        let id: u32 = return_line.split_whitespace().next().unwrap().parse().unwrap();
        assert!(!out.lines().any(|l| l.starts_with(&format!("{id} ->"))));
    }

    #[test]
    fn definition_entry_edge_is_purple() {
        let out = emit_source("def f():\n  return 1\n");
        assert!(out.lines().any(|l| l.contains("Definition entry") && l.contains("purple")));
    }

    #[test]
    fn single_statement_snapshot() {
        insta::assert_snapshot!(emit_source("x = 1\n"), @r###"
        0 [label="Assignment\n\nx = 1"]
        "###);
    }
}
