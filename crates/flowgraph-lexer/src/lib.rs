//! The indentation-aware tokenizer (component C2).
//!
//! Converts source text into a flat token sequence, synthesizing `NEWLINE`,
//! `INDENT`, and `DEDENT` tokens from an indent stack of column widths. See
//! [`tokenize`] for the entry point.

mod cursor;

use cursor::Cursor;
use flowgraph_common::token::OPERATORS_AND_PUNCTUATORS;
use flowgraph_common::{keyword_from_str, LexingError, Logger, Span, Token, TokenKind};

const TRAILING: [char; 3] = [' ', '\r', '\t'];

/// Tokenize `source`, reporting progress and failures through `logger`.
///
/// Returns every token produced before either reaching `EOF` or hitting a
/// `LexingError`. On error the second element is `Some`; the tokens already
/// produced are still returned, matching the tokenizer's fail-fast contract
/// (tokenization halts, it does not recover).
pub fn tokenize(source: &str, logger: &dyn Logger) -> (Vec<Token>, Option<LexingError>) {
    let mut lexer = Lexer::new(source);
    let error = lexer.run();
    match &error {
        Some(err) => {
            logger.error(&err.to_string());
            // A caller that presses on with a partial token stream (rather
            // than aborting) still needs it EOF-terminated, or a downstream
            // parser's "run until EOF" loop never stops.
            if lexer.last_kind() != Some(TokenKind::Eof) {
                let pos = lexer.cursor.pos();
                lexer.tokens.push(Token::synthetic(TokenKind::Eof, pos));
            }
        }
        None => logger.info(&format!("tokenized {} tokens", lexer.tokens.len())),
    }
    (lexer.tokens, error)
}

struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    indents: Vec<u32>,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            indents: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|t| t.kind)
    }

    /// Drive the outer loop described in §4.1 until `EOF` or an error.
    fn run(&mut self) -> Option<LexingError> {
        loop {
            match self.next_token() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(err) => return Some(err),
            }
        }
    }

    /// Produce the next token (possibly several, for DEDENT bursts).
    /// Returns `Ok(false)` once `EOF` has been emitted.
    fn next_token(&mut self) -> Result<bool, LexingError> {
        if matches!(self.last_kind(), None | Some(TokenKind::Newline)) {
            self.handle_indenting();
        } else if self.skip_trailing().is_none() {
            self.flush_dedents_and_eof();
            return Ok(false);
        }

        let Some(c) = self.cursor.peek() else {
            self.flush_dedents_and_eof();
            return Ok(false);
        };

        let token = match c {
            '\n' => {
                let start = self.cursor.pos();
                self.cursor.advance();
                Token::new(TokenKind::Newline, "\n", Span::new(start, start + 1))
            }
            c if c.is_alphabetic() || c == '_' => self.lex_name(),
            c if c.is_ascii_digit() => self.lex_number(),
            '\'' | '"' => self.lex_string()?,
            '#' => self.lex_comment(),
            _ => self.lex_operator_or_punctuator()?,
        };
        self.tokens.push(token);
        Ok(true)
    }

    /// Count the indentation of the current line (space=1 column, tab=4) and
    /// emit `INDENT`/`DEDENT` tokens by comparing against the indent stack.
    fn handle_indenting(&mut self) {
        let mut columns = 0u32;
        while let Some(c) = self.cursor.peek() {
            match c {
                ' ' => columns += 1,
                '\t' => columns += 4,
                _ => break,
            }
            self.cursor.advance();
        }

        let pos = self.cursor.pos();
        let top = self.indents.last().copied().unwrap_or(0);
        if columns > top {
            self.indents.push(columns);
            self.tokens.push(Token::synthetic(TokenKind::Indent, pos));
        } else {
            while self.indents.last().is_some_and(|&w| w > columns) {
                self.indents.pop();
                self.tokens.push(Token::synthetic(TokenKind::Dedent, pos));
            }
        }
    }

    /// Skip spaces/tabs/CR between tokens on the same line. Returns `None`
    /// at end of input.
    fn skip_trailing(&mut self) -> Option<char> {
        while let Some(c) = self.cursor.peek() {
            if TRAILING.contains(&c) {
                self.cursor.advance();
            } else {
                return Some(c);
            }
        }
        None
    }

    fn flush_dedents_and_eof(&mut self) {
        self.handle_indenting();
        let pos = self.cursor.pos();
        self.tokens.push(Token::synthetic(TokenKind::Eof, pos));
    }

    fn lex_name(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor
            .eat_while(|c| c.is_alphanumeric() || c == '_');
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Name);
        Token::new(kind, text, Span::new(start, end))
    }

    fn lex_number(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.eat_while(|c| c.is_ascii_digit());
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        Token::new(TokenKind::Number, text, Span::new(start, end))
    }

    /// Scan a string literal: remember the opening quote, advance until the
    /// same quote appears not preceded by a backslash.
    fn lex_string(&mut self) -> Result<Token, LexingError> {
        let start = self.cursor.pos();
        let quote = self.cursor.advance().expect("caller checked a quote is present");
        let mut prev = quote;
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexingError::new(start, "Unterminated string literal"));
                }
                Some(c) => {
                    self.cursor.advance();
                    if c == quote && prev != '\\' {
                        break;
                    }
                    prev = c;
                }
            }
        }
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        Ok(Token::new(TokenKind::String, text, Span::new(start, end)))
    }

    /// Scan a line comment: consume up to (but not including) the newline
    /// or EOF, then emit with trailing whitespace stripped.
    fn lex_comment(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.eat_while(|c| c != '\n');
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end).trim_end();
        let trimmed_end = start + text.len() as u32;
        Token::new(TokenKind::Comment, text, Span::new(start, trimmed_end))
    }

    /// Maximal-munch match against the operator/punctuator table: try the
    /// longest candidate lexeme first (tables never exceed 3 bytes).
    fn lex_operator_or_punctuator(&mut self) -> Result<Token, LexingError> {
        let start = self.cursor.pos();
        for len in [3usize, 2, 1] {
            if let Some(candidate) = self.peek_ascii_run(len) {
                if let Some((_, kind)) =
                    OPERATORS_AND_PUNCTUATORS.iter().find(|(l, _)| *l == candidate)
                {
                    for _ in 0..len {
                        self.cursor.advance();
                    }
                    let end = self.cursor.pos();
                    return Ok(Token::new(*kind, candidate, Span::new(start, end)));
                }
            }
        }
        Err(LexingError::new(start, "Unexpected operator or punctuator"))
    }

    /// Peek the next `len` characters as a `&str`, without consuming them.
    /// Returns `None` if fewer than `len` characters remain.
    fn peek_ascii_run(&self, len: usize) -> Option<&'src str> {
        let start = self.cursor.pos() as usize;
        let mut iter = self.source[start..].char_indices();
        let mut end = start;
        for _ in 0..len {
            let (offset, c) = iter.next()?;
            end = start + offset + c.len_utf8();
        }
        Some(&self.source[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_common::logger::NullLogger;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, error) = tokenize(source, &NullLogger);
        assert!(error.is_none(), "unexpected lexing error: {error:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn maximal_munch_power_assign() {
        let (tokens, error) = tokenize("a**=2", &NullLogger);
        assert!(error.is_none());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name,
                TokenKind::DoubleStarAssign,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, "**=");
    }

    #[test]
    fn indent_stack_scenario() {
        let source = "if x:\n    a\n    b\nc\n";
        use TokenKind::*;
        assert_eq!(
            kinds(source),
            vec![
                If, Name, Colon, Newline, Indent, Name, Newline, Name, Newline, Dedent, Name,
                Newline, Eof,
            ]
        );
    }

    #[test]
    fn dedent_balanced_at_eof() {
        let (tokens, _) = tokenize("if a:\n  if b:\n    x\n", &NullLogger);
        let mut depth = 0i32;
        for t in &tokens {
            match t.kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => depth -= 1,
                _ => {}
            }
        }
        assert_eq!(depth, 0, "INDENT/DEDENT must balance by EOF");
    }

    #[test]
    fn string_with_escaped_quote() {
        let (tokens, error) = tokenize(r#""a\"b""#, &NullLogger);
        assert!(error.is_none());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, r#""a\"b""#);
    }

    #[test]
    fn unterminated_string_is_a_lexing_error() {
        let (_, error) = tokenize("\"never closed", &NullLogger);
        assert!(error.is_some());
    }

    #[test]
    fn unexpected_punctuator_is_a_lexing_error() {
        let (_, error) = tokenize("a $ b", &NullLogger);
        assert!(error.is_some());
    }

    #[test]
    fn error_path_still_ends_with_eof() {
        let (tokens, error) = tokenize("a $ b", &NullLogger);
        assert!(error.is_some());
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn line_comment_strips_trailing_whitespace() {
        let (tokens, _) = tokenize("# hi   \n", &NullLogger);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].lexeme, "# hi");
    }

    #[test]
    fn tab_counts_as_four_columns() {
        let source = "if x:\n\ta\nb\n";
        use TokenKind::*;
        assert_eq!(
            kinds(source),
            vec![If, Name, Colon, Newline, Indent, Name, Newline, Dedent, Name, Newline, Eof]
        );
    }

    #[test]
    fn keyword_and_name_are_distinguished() {
        assert_eq!(kinds("if")[0], TokenKind::If);
        assert_eq!(kinds("iffy")[0], TokenKind::Name);
    }

    #[test]
    fn comparison_chain_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("a<b"),
            vec![Name, Lt, Name, Eof]
        );
    }

    #[test]
    fn source_position_round_trips_lexeme() {
        let source = "foo = 123";
        let (tokens, _) = tokenize(source, &NullLogger);
        for t in &tokens {
            if t.kind == TokenKind::Eof {
                continue;
            }
            assert_eq!(&source[t.span.start as usize..t.span.end as usize], t.lexeme);
        }
    }
}
