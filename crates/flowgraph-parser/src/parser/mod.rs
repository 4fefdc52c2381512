mod expressions;
mod statements;

use flowgraph_common::{Logger, ParsingError, Span, Token, TokenKind};

use crate::arena::{Arena, NodeId};
use crate::node::NodeKind;

/// Parse a token stream (as produced by `flowgraph_lexer::tokenize`) into an
/// arena-backed AST rooted at the returned [`NodeId`].
///
/// Errors are per-statement: a malformed statement is logged and skipped,
/// never propagated past `statement()`. The returned error list is the same
/// set already sent to `logger`, kept for callers that want to inspect it
/// (e.g. tests) without parsing `logger`'s output.
pub fn parse(tokens: Vec<Token>, logger: &dyn Logger) -> (Arena, NodeId, Vec<ParsingError>) {
    let mut parser = Parser::new(tokens, logger);
    let root = parser.file_input();
    if parser.errors.is_empty() {
        logger.info(&format!("parsed {} arena nodes", parser.arena.len()));
    }
    (parser.arena, root, parser.errors)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    arena: Arena,
    logger: &'a dyn Logger,
    errors: Vec<ParsingError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, logger: &'a dyn Logger) -> Self {
        let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();
        Self {
            tokens,
            pos: 0,
            arena: Arena::new(),
            logger,
            errors: Vec::new(),
        }
    }

    fn last_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.last_index())]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        &self.tokens[(self.pos + offset).min(self.last_index())]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.last_index() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParsingError> {
        self.eat(kind)
            .ok_or_else(|| ParsingError::new(self.peek().span, message))
    }

    /// `file_input := (NEWLINE | statement)* EOF`. Never fails: a statement
    /// that errors is logged and its tokens skipped, the loop continues.
    fn file_input(&mut self) -> NodeId {
        let start_span = self.peek().span;
        let mut children = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.advance();
                }
                _ => match self.statement() {
                    Ok(id) => children.push(id),
                    Err(err) => {
                        self.logger.error(&err.to_string());
                        self.errors.push(err);
                        self.recover_to_newline();
                    }
                },
            }
        }
        let span = children
            .iter()
            .fold(start_span, |acc, &id| acc.merge(self.arena.span(id)));
        self.arena.alloc(span, NodeKind::Root(children))
    }

    /// Skip tokens until the next `NEWLINE` (consumed) or `EOF`/`DEDENT`
    /// (left in place for the enclosing loop to handle).
    fn recover_to_newline(&mut self) {
        while !matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent
        ) {
            self.advance();
        }
        if self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    fn alloc_op(&mut self, span: Span, text: impl Into<String>) -> NodeId {
        self.arena.alloc(span, NodeKind::OperatorLit(text.into()))
    }
}

fn is_assign_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::AtAssign
            | TokenKind::SlashAssign
            | TokenKind::PercentAssign
            | TokenKind::AmpAssign
            | TokenKind::PipeAssign
            | TokenKind::CaretAssign
            | TokenKind::ShiftLeftAssign
            | TokenKind::ShiftRightAssign
            | TokenKind::DoubleStarAssign
            | TokenKind::DoubleSlashAssign
    )
}
