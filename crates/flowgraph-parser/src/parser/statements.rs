use flowgraph_common::{ParsingError, TokenKind};

use super::{is_assign_op, Parser};
use crate::node::NodeKind;
use crate::NodeId;

impl<'a> Parser<'a> {
    /// `statement := compound_stmt | simple_stmt`.
    pub(super) fn statement(&mut self) -> Result<NodeId, ParsingError> {
        match self.peek_kind() {
            TokenKind::For => self.for_stmt(),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::Def => self.def_stmt(),
            TokenKind::Async => {
                self.advance();
                self.expect(TokenKind::Def, "expected 'def' after 'async'")?;
                self.def_stmt()
            }
            TokenKind::Class
            | TokenKind::Try
            | TokenKind::With
            | TokenKind::Del
            | TokenKind::Assert
            | TokenKind::Raise
            | TokenKind::Global
            | TokenKind::Nonlocal => {
                let tok = self.advance();
                Err(ParsingError::new(
                    tok.span,
                    format!("'{}' statements are not supported", tok.lexeme),
                ))
            }
            _ => self.simple_stmt(),
        }
    }

    /// `simple_stmt := small_stmt (NEWLINE | DEDENT | EOF)`.
    fn simple_stmt(&mut self) -> Result<NodeId, ParsingError> {
        let node = self.small_stmt()?;
        match self.peek_kind() {
            TokenKind::Newline => {
                self.advance();
            }
            TokenKind::Dedent | TokenKind::Eof => {}
            other => {
                return Err(ParsingError::new(
                    self.peek().span,
                    format!("expected end of statement, found {other:?}"),
                ))
            }
        }
        Ok(node)
    }

    fn small_stmt(&mut self) -> Result<NodeId, ParsingError> {
        match self.peek_kind() {
            TokenKind::Return => {
                let kw = self.advance();
                let expr = self.expression()?;
                let span = kw.span.merge(self.arena.span(expr));
                Ok(self.arena.alloc(span, NodeKind::Return(expr)))
            }
            TokenKind::Pass | TokenKind::Break | TokenKind::Continue => {
                let tok = self.advance();
                let span = tok.span;
                Ok(self.arena.alloc(span, NodeKind::WrapperNode(vec![tok])))
            }
            TokenKind::Star => {
                let star = self.advance();
                let expr = self.star_expressions()?;
                let op = self.alloc_op(star.span, "*");
                let span = star.span.merge(self.arena.span(expr));
                Ok(self.arena.alloc(span, NodeKind::Unary { op, expr }))
            }
            TokenKind::Yield => {
                let kw = self.advance();
                let expr = self.expression()?;
                let span = kw.span.merge(self.arena.span(expr));
                Ok(self.arena.alloc(span, NodeKind::Yield(expr)))
            }
            _ => {
                if self.line_has_assignment_operator() {
                    self.assignment()
                } else {
                    self.star_expressions()
                }
            }
        }
    }

    /// Peek forward to the end of the current logical line (without
    /// consuming anything) looking for an assignment operator, per the
    /// lookahead rule: commit to the assignment path only if one is found,
    /// otherwise fall back to parsing a plain expression statement.
    fn line_has_assignment_operator(&self) -> bool {
        if self.at(TokenKind::Name) && self.peek_at(1).kind == TokenKind::Colon {
            return true;
        }
        let mut i = self.pos;
        loop {
            let kind = self.tokens[i.min(self.tokens.len() - 1)].kind;
            if matches!(kind, TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent) {
                return false;
            }
            if is_assign_op(kind) {
                return true;
            }
            if i >= self.tokens.len() - 1 {
                return false;
            }
            i += 1;
        }
    }

    /// `assignment := (NAME ':' expression ('=' annotated_rhs)?) | target assign_op star_expressions`.
    ///
    /// The `Assignment` node's `value` field is mandatory, so an annotation
    /// with no `=` (a bare `x: int` declaration) is treated the same as any
    /// other unsupported form: a logged, recoverable parse error.
    fn assignment(&mut self) -> Result<NodeId, ParsingError> {
        if self.at(TokenKind::Name) && self.peek_at(1).kind == TokenKind::Colon {
            let name_tok = self.advance();
            let target = self
                .arena
                .alloc(name_tok.span, NodeKind::Id(name_tok.lexeme.clone()));
            self.expect(TokenKind::Colon, "expected ':' after annotated name")?;
            let annotation = self.expression()?;
            self.expect(TokenKind::Assign, "expected '=' after type annotation")?;
            let value = self.expression()?;
            let span = name_tok.span.merge(self.arena.span(value));
            return Ok(self.arena.alloc(
                span,
                NodeKind::Assignment {
                    target,
                    op: None,
                    value,
                    annotation: Some(annotation),
                },
            ));
        }

        let target = self.star_expressions()?;
        let op_tok = self.advance();
        if !is_assign_op(op_tok.kind) {
            return Err(ParsingError::new(op_tok.span, "expected assignment operator"));
        }
        let op = self.arena.alloc(op_tok.span, NodeKind::OperatorLit(op_tok.lexeme.clone()));
        let value = self.star_expressions()?;
        let span = self.arena.span(target).merge(self.arena.span(value));
        Ok(self.arena.alloc(
            span,
            NodeKind::Assignment {
                target,
                op: Some(op),
                value,
                annotation: None,
            },
        ))
    }

    /// `block := ':' NEWLINE INDENT statement+ DEDENT | ':' simple_stmt`.
    fn block(&mut self) -> Result<NodeId, ParsingError> {
        let colon = self.expect(TokenKind::Colon, "expected ':'")?;
        if self.eat(TokenKind::Newline).is_some() {
            self.expect(TokenKind::Indent, "expected an indented block")?;
            let mut children = Vec::new();
            loop {
                match self.peek_kind() {
                    TokenKind::Dedent => break,
                    TokenKind::Eof => {
                        return Err(ParsingError::new(
                            self.peek().span,
                            "unexpected end of file inside an indented block",
                        ))
                    }
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
            self.advance(); // DEDENT
            let span = children
                .iter()
                .fold(colon.span, |acc, &id| acc.merge(self.arena.span(id)));
            Ok(self.arena.alloc(span, NodeKind::Block(children)))
        } else {
            let stmt = self.simple_stmt()?;
            let span = colon.span.merge(self.arena.span(stmt));
            Ok(self.arena.alloc(span, NodeKind::Block(vec![stmt])))
        }
    }

    /// `if_stmt := 'if' named_expr block ('elif' ... | 'else' block)?`.
    fn if_stmt(&mut self) -> Result<NodeId, ParsingError> {
        let kw = self.advance();
        self.if_tail(kw.span)
    }

    /// Shared by the top-level `if` and every `elif` in the chain: they
    /// build the same `IfElse` shape, differing only in which keyword was
    /// already consumed by the caller.
    fn if_tail(&mut self, kw_span: flowgraph_common::Span) -> Result<NodeId, ParsingError> {
        let condition = self.named_expr()?;
        let true_branch = self.block()?;
        let false_branch = if self.at(TokenKind::Elif) {
            let elif_kw = self.advance();
            Some(self.if_tail(elif_kw.span)?)
        } else if self.eat(TokenKind::Else).is_some() {
            Some(self.block()?)
        } else {
            None
        };
        let mut span = kw_span.merge(self.arena.span(true_branch));
        if let Some(fb) = false_branch {
            span = span.merge(self.arena.span(fb));
        }
        Ok(self.arena.alloc(
            span,
            NodeKind::IfElse {
                condition,
                true_branch,
                false_branch,
            },
        ))
    }

    /// `while_stmt := 'while' named_expr block`.
    fn while_stmt(&mut self) -> Result<NodeId, ParsingError> {
        let kw = self.advance();
        let condition = self.named_expr()?;
        let body = self.block()?;
        let span = kw.span.merge(self.arena.span(body));
        Ok(self.arena.alloc(span, NodeKind::While { condition, body }))
    }

    /// `for_stmt := 'for' star_expressions 'in' star_expressions block ('else' block)?`.
    ///
    /// The `For` node has no dedicated target field, so `target in source`
    /// is folded into a single `Binary` occupying `iterator` rather than
    /// dropping the loop variable. Mirrors the original's behavior of
    /// dropping a parsed `else` branch: it is parsed (for well-formedness)
    /// and discarded.
    fn for_stmt(&mut self) -> Result<NodeId, ParsingError> {
        let kw = self.advance();
        let target = self.star_expressions()?;
        let in_tok = self.expect(TokenKind::In, "expected 'in' in for statement")?;
        let source = self.star_expressions()?;
        let op = self.alloc_op(in_tok.span, "in");
        let iter_span = self.arena.span(target).merge(self.arena.span(source));
        let iterator = self.arena.alloc(
            iter_span,
            NodeKind::Binary {
                left: target,
                op,
                right: source,
            },
        );
        let body = self.block()?;
        if self.eat(TokenKind::Else).is_some() {
            self.block()?;
        }
        let span = kw.span.merge(self.arena.span(body));
        Ok(self.arena.alloc(span, NodeKind::For { iterator, body }))
    }

    /// `def_stmt := 'def' NAME signature ':' block`, where `signature` is
    /// captured verbatim as a `WrapperNode` from just after the name up to
    /// (not including) the block's `:` — parameter parsing is deliberately
    /// opaque.
    fn def_stmt(&mut self) -> Result<NodeId, ParsingError> {
        let kw = self.advance();
        let name_tok = self.expect(TokenKind::Name, "expected function name")?;
        let name = self.arena.alloc(name_tok.span, NodeKind::Id(name_tok.lexeme.clone()));

        let sig_start = self.pos;
        let sig_start_span = self.peek().span;
        while !matches!(self.peek_kind(), TokenKind::Colon | TokenKind::Newline | TokenKind::Eof) {
            self.advance();
        }
        let sig_tokens = self.tokens[sig_start..self.pos].to_vec();
        let sig_span = match sig_tokens.last() {
            Some(last) => sig_start_span.merge(last.span),
            None => sig_start_span,
        };
        let signature = self.arena.alloc(sig_span, NodeKind::WrapperNode(sig_tokens));

        let body = self.block()?;
        let span = kw.span.merge(self.arena.span(body));
        Ok(self.arena.alloc(
            span,
            NodeKind::Definition {
                name,
                signature,
                body,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use flowgraph_common::logger::NullLogger;

    use super::super::parse;
    use crate::node::NodeKind;

    fn parse_one(source: &str) -> (crate::Arena, crate::NodeId) {
        let (tokens, _) = flowgraph_lexer::tokenize(source, &NullLogger);
        let (arena, root, errors) = parse(tokens, &NullLogger);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        match arena.kind(root) {
            NodeKind::Root(children) => {
                assert_eq!(children.len(), 1);
                (arena, children[0])
            }
            other => panic!("expected Root, got {other:?}"),
        }
    }

    #[test]
    fn if_elif_else_chain_nests_as_ifelse() {
        let (arena, id) = parse_one("if a:\n  x\nelif b:\n  y\nelse:\n  z\n");
        match arena.kind(id) {
            NodeKind::IfElse { false_branch, .. } => match false_branch {
                Some(fb) => assert!(matches!(arena.kind(*fb), NodeKind::IfElse { .. })),
                None => panic!("expected an elif chain"),
            },
            other => panic!("expected IfElse, got {other:?}"),
        }
    }

    #[test]
    fn while_loop_parses_condition_and_body() {
        let (arena, id) = parse_one("while c:\n  x\n");
        match arena.kind(id) {
            NodeKind::While { condition, body } => {
                assert!(matches!(arena.kind(*condition), NodeKind::Id(_)));
                assert!(matches!(arena.kind(*body), NodeKind::Block(_)));
            }
            other => panic!("expected While, got {other:?}"),
        }
    }

    #[test]
    fn def_statement_wraps_signature_opaquely() {
        let (arena, id) = parse_one("def f(a, b):\n  return a\n");
        match arena.kind(id) {
            NodeKind::Definition { signature, .. } => {
                assert!(matches!(arena.kind(*signature), NodeKind::WrapperNode(_)));
            }
            other => panic!("expected Definition, got {other:?}"),
        }
    }

    #[test]
    fn plain_assignment_has_an_op_and_no_annotation() {
        let (arena, id) = parse_one("x = 1\n");
        match arena.kind(id) {
            NodeKind::Assignment { op, annotation, .. } => {
                assert!(op.is_some());
                assert!(annotation.is_none());
            }
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn annotated_assignment_records_annotation() {
        let (arena, id) = parse_one("x: int = 1\n");
        match arena.kind(id) {
            NodeKind::Assignment { annotation, .. } => assert!(annotation.is_some()),
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn pass_break_continue_are_atomic_wrapper_nodes() {
        for source in ["pass\n", "break\n", "continue\n"] {
            let (arena, id) = parse_one(source);
            assert!(matches!(arena.kind(id), NodeKind::WrapperNode(_)));
        }
    }
}
