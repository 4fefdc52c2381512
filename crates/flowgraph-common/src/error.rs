use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// An error raised by the tokenizer. Tokenization halts on the first one;
/// the caller still receives whatever tokens were produced up to that point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexingError {
    pub index: u32,
    pub message: String,
}

impl LexingError {
    pub fn new(index: u32, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

impl fmt::Display for LexingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.index)
    }
}

impl std::error::Error for LexingError {}

/// An error raised by the parser inside `statement()`. Always caught at that
/// boundary: logged, then recovered from by skipping to the next `NEWLINE`.
/// Never propagated to the parser's caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsingError {
    pub span: Span,
    pub message: String,
}

impl ParsingError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {}..{})", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParsingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexing_error_display() {
        let err = LexingError::new(12, "Unexpected operator or punctuator");
        assert_eq!(
            err.to_string(),
            "Unexpected operator or punctuator (at offset 12)"
        );
    }

    #[test]
    fn parsing_error_display() {
        let err = ParsingError::new(Span::new(4, 7), "expected expression");
        assert_eq!(err.to_string(), "expected expression (at 4..7)");
    }
}
