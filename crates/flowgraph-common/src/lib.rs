//! Shared data types for the flowgraph pipeline: source spans, the token
//! vocabulary, the logger interface the core consumes, and the two error
//! kinds raised by the tokenizer and parser.

pub mod error;
pub mod logger;
pub mod span;
pub mod token;

pub use error::{LexingError, ParsingError};
pub use logger::Logger;
pub use span::{LineIndex, Span};
pub use token::{keyword_from_str, Token, TokenKind, OPERATORS_AND_PUNCTUATORS};
