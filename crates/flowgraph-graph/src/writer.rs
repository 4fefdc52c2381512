use std::fmt::Write as _;

/// Accumulates a directed graph description: `id [label="…"]` nodes and
/// `a -> b [label="…", color="…"]` edges, textually, in emission order.
///
/// Node ids are decimal integers assigned by a monotonic counter starting at
/// 0, scoped to a single [`GraphWriter`] (reset every call per §9: "no global
/// state").
#[derive(Debug, Default)]
pub struct GraphWriter {
    next_id: u32,
    buffer: String,
}

impl GraphWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a node with the given label, returning its assigned id.
    pub fn node(&mut self, label: &str) -> u32 {
        self.node_with_color(label, None)
    }

    /// Emit a node with the given label and an optional color attribute
    /// (used for the red `Return` sink node).
    pub fn node_with_color(&mut self, label: &str, color: Option<&str>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        match color {
            Some(c) => writeln!(self.buffer, "{id} [label=\"{}\", color=\"{c}\"]", escape(label)),
            None => writeln!(self.buffer, "{id} [label=\"{}\"]", escape(label)),
        }
        .expect("writing to an in-memory String never fails");
        id
    }

    /// Emit an edge, with an optional label/color pair for flow-control
    /// edges (structural AST edges pass `None` for both).
    pub fn edge(&mut self, from: u32, to: u32, label: Option<&str>, color: Option<&str>) {
        match (label, color) {
            (Some(l), Some(c)) => {
                writeln!(self.buffer, "{from} -> {to} [label=\"{}\", color=\"{c}\"]", escape(l))
            }
            (Some(l), None) => writeln!(self.buffer, "{from} -> {to} [label=\"{}\"]", escape(l)),
            (None, Some(c)) => writeln!(self.buffer, "{from} -> {to} [color=\"{c}\"]"),
            (None, None) => writeln!(self.buffer, "{from} -> {to}"),
        }
        .expect("writing to an in-memory String never fails");
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
