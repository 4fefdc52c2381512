use serde::Serialize;

use crate::span::Span;

/// A single lexical token: its kind, the source substring it covers, and its span.
///
/// `lexeme` is empty for the synthetic tokens (`INDENT`, `DEDENT`, `EOF`) which
/// do not correspond to any source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// A zero-width synthetic token (`INDENT`, `DEDENT`, `EOF`) at `pos`.
    pub fn synthetic(kind: TokenKind, pos: u32) -> Self {
        Self {
            kind,
            lexeme: String::new(),
            span: Span::new(pos, pos),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment)
    }
}

/// The closed vocabulary of token kinds produced by the tokenizer.
///
/// Grouped exactly as in the data model: keywords, operators, punctuators,
/// terminals, and synthetic indentation/end markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords ─────────────────────────────────────────────────────
    Def,
    Return,
    Raise,
    From,
    Import,
    As,
    Global,
    Assert,
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Try,
    None,
    Finally,
    With,
    Except,
    Lambda,
    Class,
    Yield,
    Del,
    Pass,
    Continue,
    Break,
    Async,
    Await,
    Nonlocal,
    True,
    False,
    Or,
    And,
    Not,
    Is,

    // ── Operators ────────────────────────────────────────────────────
    Star,
    Plus,
    Minus,
    Slash,
    Percent,
    DoubleStar,
    DoubleSlash,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    AtAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    DoubleStarAssign,
    DoubleSlashAssign,
    Walrus,
    Lt,
    Gt,
    Eq,
    Ge,
    Le,
    LtGt,
    NotEq,
    Pipe,
    Caret,
    Amp,
    ShiftLeft,
    ShiftRight,
    Tilde,
    At,

    // ── Punctuators ──────────────────────────────────────────────────
    Dot,
    Ellipsis,
    Backtick,
    Comma,
    Colon,
    Semicolon,
    Arrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // ── Terminals ────────────────────────────────────────────────────
    Name,
    String,
    Number,
    FString,
    RString,
    Float,
    Comment,

    // ── Synthetic ────────────────────────────────────────────────────
    Newline,
    Indent,
    Dedent,
    Eof,
}

/// Look up a `NAME`-shaped lexeme against the keyword table.
///
/// Returns `None` for anything that is not one of the reserved words, in
/// which case the caller should emit `TokenKind::Name` instead.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match s {
        "def" => Def,
        "return" => Return,
        "raise" => Raise,
        "from" => From,
        "import" => Import,
        "as" => As,
        "global" => Global,
        "assert" => Assert,
        "if" => If,
        "elif" => Elif,
        "else" => Else,
        "while" => While,
        "for" => For,
        "in" => In,
        "try" => Try,
        "none" => None,
        "finally" => Finally,
        "with" => With,
        "except" => Except,
        "lambda" => Lambda,
        "class" => Class,
        "yield" => Yield,
        "del" => Del,
        "pass" => Pass,
        "continue" => Continue,
        "break" => Break,
        "async" => Async,
        "await" => Await,
        "nonlocal" => Nonlocal,
        "true" => True,
        "false" => False,
        "or" => Or,
        "and" => And,
        "not" => Not,
        "is" => Is,
        _ => return Option::None,
    })
}

/// The full operator/punctuator lexeme table, ordered longest-first so a
/// linear scan performs maximal munch without needing a trie. The tokenizer
/// relies only on set membership, not on this ordering, to decide matches
/// (see [`crate::token`] tests), but keeping it sorted documents the
/// intended tie-break.
pub const OPERATORS_AND_PUNCTUATORS: &[(&str, TokenKind)] = {
    use TokenKind::*;
    &[
        ("**=", DoubleStarAssign),
        ("//=", DoubleSlashAssign),
        ("<<=", ShiftLeftAssign),
        (">>=", ShiftRightAssign),
        ("**", DoubleStar),
        ("//", DoubleSlash),
        ("+=", PlusAssign),
        ("-=", MinusAssign),
        ("*=", StarAssign),
        ("@=", AtAssign),
        ("/=", SlashAssign),
        ("%=", PercentAssign),
        ("&=", AmpAssign),
        ("|=", PipeAssign),
        ("^=", CaretAssign),
        ("<<", ShiftLeft),
        (">>", ShiftRight),
        (":=", Walrus),
        ("==", Eq),
        (">=", Ge),
        ("<=", Le),
        ("<>", LtGt),
        ("!=", NotEq),
        ("->", Arrow),
        ("...", Ellipsis),
        ("*", Star),
        ("+", Plus),
        ("-", Minus),
        ("/", Slash),
        ("%", Percent),
        ("=", Assign),
        ("<", Lt),
        (">", Gt),
        ("|", Pipe),
        ("^", Caret),
        ("&", Amp),
        ("~", Tilde),
        ("@", At),
        (".", Dot),
        ("`", Backtick),
        (",", Comma),
        (":", Colon),
        (";", Semicolon),
        ("(", LParen),
        (")", RParen),
        ("{", LBrace),
        ("}", RBrace),
        ("[", LBracket),
        ("]", RBracket),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_all_reserved_words() {
        for word in [
            "def", "return", "raise", "from", "import", "as", "global", "assert", "if", "elif",
            "else", "while", "for", "in", "try", "none", "finally", "with", "except", "lambda",
            "class", "yield", "del", "pass", "continue", "break", "async", "await", "nonlocal",
            "true", "false", "or", "and", "not", "is",
        ] {
            assert!(keyword_from_str(word).is_some(), "{word} should be a keyword");
        }
    }

    #[test]
    fn keyword_lookup_rejects_plain_names() {
        assert!(keyword_from_str("x").is_none());
        assert!(keyword_from_str("definition").is_none());
        assert!(keyword_from_str("").is_none());
    }

    #[test]
    fn operator_table_has_no_duplicate_lexemes() {
        let mut seen = std::collections::HashSet::new();
        for (lexeme, _) in OPERATORS_AND_PUNCTUATORS {
            assert!(seen.insert(*lexeme), "duplicate lexeme: {lexeme}");
        }
    }

    #[test]
    fn longest_lexeme_is_three_bytes() {
        // The lexer tries 3, then 2, then 1-byte candidates; confirm the
        // table never grows an operator past what that loop checks.
        assert!(OPERATORS_AND_PUNCTUATORS.iter().all(|(l, _)| l.len() <= 3));
    }
}
