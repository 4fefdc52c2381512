//! Walks an AST and emits a directed graph description (component C5), in
//! either AST mode (the parse structure itself) or CFG mode (a derived
//! control-flow graph). See [`Mode`] and [`emit`].

mod ast_mode;
mod cfg_mode;
mod label;
mod writer;

use flowgraph_parser::{Arena, NodeId};

/// Which view of the AST to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ast,
    Cfg,
}

impl Mode {
    /// Parse the `-m` flag's value: anything other than a case-insensitive
    /// `AST` selects CFG, per the CLI contract.
    pub fn from_flag(value: &str) -> Self {
        if value.eq_ignore_ascii_case("AST") {
            Mode::Ast
        } else {
            Mode::Cfg
        }
    }

    /// The suffix appended to the output path prefix.
    pub fn suffix(self) -> &'static str {
        match self {
            Mode::Ast => "AST",
            Mode::Cfg => "EXECUTION",
        }
    }
}

/// Render `root` in the requested mode. `source` supplies node labels (the
/// original text for each node's span).
pub fn emit(arena: &Arena, root: NodeId, source: &str, mode: Mode) -> String {
    match mode {
        Mode::Ast => ast_mode::emit(arena, root, source),
        Mode::Cfg => cfg_mode::emit(arena, root, source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flag_is_case_insensitive_and_defaults_to_cfg() {
        assert_eq!(Mode::from_flag("AST"), Mode::Ast);
        assert_eq!(Mode::from_flag("ast"), Mode::Ast);
        assert_eq!(Mode::from_flag("EXECUTION"), Mode::Cfg);
        assert_eq!(Mode::from_flag("anything else"), Mode::Cfg);
    }
}
