use flowgraph_common::{ParsingError, Span, Token, TokenKind};

use super::Parser;
use crate::node::NodeKind;
use crate::NodeId;

impl<'a> Parser<'a> {
    /// `named_expr := NAME ':=' expression | expression`. Used where the
    /// grammar explicitly allows a walrus assignment (`if`/`while` conditions).
    pub(super) fn named_expr(&mut self) -> Result<NodeId, ParsingError> {
        if self.at(TokenKind::Name) && self.peek_at(1).kind == TokenKind::Walrus {
            let name_tok = self.advance();
            let target = self
                .arena
                .alloc(name_tok.span, NodeKind::Id(name_tok.lexeme.clone()));
            let walrus = self.advance();
            let value = self.expression()?;
            let op = self.alloc_op(walrus.span, ":=");
            let span = name_tok.span.merge(self.arena.span(value));
            return Ok(self.arena.alloc(
                span,
                NodeKind::Binary {
                    left: target,
                    op,
                    right: value,
                },
            ));
        }
        self.expression()
    }

    /// `expression := 'lambda' ... | disjunction ('if' disjunction 'else' expression)?`.
    ///
    /// `lambda` is on the unimplemented list even though the grammar names
    /// it and `NodeKind::Lambda` exists for future extension; here it always
    /// surfaces as a clean parse error.
    pub(super) fn expression(&mut self) -> Result<NodeId, ParsingError> {
        if self.at(TokenKind::Lambda) {
            return Err(ParsingError::new(
                self.peek().span,
                "lambda expressions are not supported",
            ));
        }
        let first = self.disjunction()?;
        if self.eat(TokenKind::If).is_some() {
            let condition = self.disjunction()?;
            self.expect(TokenKind::Else, "expected 'else' in conditional expression")?;
            let else_branch = self.expression()?;
            let span = self.arena.span(first).merge(self.arena.span(else_branch));
            return Ok(self.arena.alloc(
                span,
                NodeKind::Conditional {
                    condition,
                    then_branch: first,
                    else_branch,
                },
            ));
        }
        Ok(first)
    }

    /// Star-target/star-expression lists are not otherwise distinguished in
    /// the node model; treated as a single expression.
    pub(super) fn star_expressions(&mut self) -> Result<NodeId, ParsingError> {
        self.expression()
    }

    fn disjunction(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::Or], Self::conjunction)
    }

    fn conjunction(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::And], Self::inversion)
    }

    fn inversion(&mut self) -> Result<NodeId, ParsingError> {
        if self.at(TokenKind::Not) && self.peek_at(1).kind != TokenKind::In {
            let tok = self.advance();
            let expr = self.inversion()?;
            let op = self.alloc_op(tok.span, "not");
            let span = tok.span.merge(self.arena.span(expr));
            return Ok(self.arena.alloc(span, NodeKind::Unary { op, expr }));
        }
        self.comparison()
    }

    /// Handles the single-token comparisons plus the two two-word operators
    /// `is not` / `not in`. Chaining (`a < b < c`) is left-associative, built
    /// the same way any other left-associative binary level is.
    fn comparison(&mut self) -> Result<NodeId, ParsingError> {
        let mut left = self.bitor()?;
        loop {
            let (text, span, words): (&str, Span, usize) = match self.peek_kind() {
                TokenKind::Lt => ("<", self.peek().span, 1),
                TokenKind::Gt => (">", self.peek().span, 1),
                TokenKind::Eq => ("==", self.peek().span, 1),
                TokenKind::Ge => (">=", self.peek().span, 1),
                TokenKind::Le => ("<=", self.peek().span, 1),
                TokenKind::LtGt => ("<>", self.peek().span, 1),
                TokenKind::NotEq => ("!=", self.peek().span, 1),
                TokenKind::In => ("in", self.peek().span, 1),
                TokenKind::Is if self.peek_at(1).kind == TokenKind::Not => {
                    ("is not", self.peek().span.merge(self.peek_at(1).span), 2)
                }
                TokenKind::Is => ("is", self.peek().span, 1),
                TokenKind::Not if self.peek_at(1).kind == TokenKind::In => {
                    ("not in", self.peek().span.merge(self.peek_at(1).span), 2)
                }
                _ => break,
            };
            for _ in 0..words {
                self.advance();
            }
            let op = self.alloc_op(span, text);
            let right = self.bitor()?;
            let merged = self.arena.span(left).merge(self.arena.span(right));
            left = self.arena.alloc(
                merged,
                NodeKind::Binary {
                    left,
                    op,
                    right,
                },
            );
        }
        Ok(left)
    }

    fn bitor(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::Pipe], Self::bitxor)
    }

    fn bitxor(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::Caret], Self::bitand)
    }

    fn bitand(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::Amp], Self::shift)
    }

    fn shift(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::ShiftLeft, TokenKind::ShiftRight], Self::sum)
    }

    fn sum(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(&[TokenKind::Plus, TokenKind::Minus], Self::term)
    }

    fn term(&mut self) -> Result<NodeId, ParsingError> {
        self.left_assoc_binary(
            &[
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::DoubleSlash,
                TokenKind::Percent,
                TokenKind::At,
            ],
            Self::factor,
        )
    }

    /// Left-to-right chain over one precedence level: parse with `next`,
    /// then repeatedly consume one of `ops` followed by another `next`.
    fn left_assoc_binary(
        &mut self,
        ops: &[TokenKind],
        next: fn(&mut Self) -> Result<NodeId, ParsingError>,
    ) -> Result<NodeId, ParsingError> {
        let mut left = next(self)?;
        while ops.contains(&self.peek_kind()) {
            let tok = self.advance();
            let op = self.alloc_op(tok.span, tok.lexeme.clone());
            let right = next(self)?;
            let span = self.arena.span(left).merge(self.arena.span(right));
            left = self.arena.alloc(span, NodeKind::Binary { left, op, right });
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<NodeId, ParsingError> {
        match self.peek_kind() {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Tilde => {
                let tok = self.advance();
                let expr = self.factor()?;
                let op = self.alloc_op(tok.span, tok.lexeme.clone());
                let span = tok.span.merge(self.arena.span(expr));
                Ok(self.arena.alloc(span, NodeKind::Unary { op, expr }))
            }
            _ => self.power(),
        }
    }

    /// `**` is right-associative: the exponent is parsed at `factor`
    /// precedence (allowing a leading unary) which recurses back through
    /// `power`, so `2**3**4` naturally nests as `2**(3**4)`.
    fn power(&mut self) -> Result<NodeId, ParsingError> {
        let base = self.await_expr()?;
        if self.at(TokenKind::DoubleStar) {
            let tok = self.advance();
            let exponent = self.factor()?;
            let op = self.alloc_op(tok.span, "**");
            let span = self.arena.span(base).merge(self.arena.span(exponent));
            return Ok(self.arena.alloc(
                span,
                NodeKind::Binary {
                    left: base,
                    op,
                    right: exponent,
                },
            ));
        }
        Ok(base)
    }

    fn await_expr(&mut self) -> Result<NodeId, ParsingError> {
        if self.at(TokenKind::Await) {
            let tok = self.advance();
            let expr = self.primary()?;
            let span = tok.span.merge(self.arena.span(expr));
            return Ok(self.arena.alloc(span, NodeKind::Await(expr)));
        }
        self.primary()
    }

    /// `primary := atom ('.' NAME | '(' args ')' | '[' slices ']')*`.
    fn primary(&mut self) -> Result<NodeId, ParsingError> {
        let mut node = self.atom()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name_tok = self.expect(TokenKind::Name, "expected attribute name after '.'")?;
                    let name = self
                        .arena
                        .alloc(name_tok.span, NodeKind::Id(name_tok.lexeme.clone()));
                    let span = self.arena.span(node).merge(name_tok.span);
                    node = self.arena.alloc(span, NodeKind::MemberRef { target: node, name });
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.at(TokenKind::RParen) {
                        loop {
                            args.push(self.expression()?);
                            if self.eat(TokenKind::Comma).is_none() {
                                break;
                            }
                            if self.at(TokenKind::RParen) {
                                break;
                            }
                        }
                    }
                    let close = self.expect(TokenKind::RParen, "expected ')'")?;
                    let span = self.arena.span(node).merge(close.span);
                    node = self.arena.alloc(span, NodeKind::Invocation { target: node, args });
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.slice_item()?;
                    let close = self.expect(TokenKind::RBracket, "expected ']'")?;
                    let span = self.arena.span(node).merge(close.span);
                    node = self.arena.alloc(span, NodeKind::Indexer { target: node, index });
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn atom(&mut self) -> Result<NodeId, ParsingError> {
        match self.peek_kind() {
            TokenKind::Name => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::Id(tok.lexeme.clone())))
            }
            TokenKind::String => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::StringLit(tok.lexeme.clone())))
            }
            TokenKind::Number => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::NumberLit(tok.lexeme.clone())))
            }
            TokenKind::None => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::NoneLit))
            }
            TokenKind::True => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::BoolLit("true".to_string())))
            }
            TokenKind::False => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::BoolLit("false".to_string())))
            }
            TokenKind::Ellipsis => {
                let tok = self.advance();
                Ok(self.arena.alloc(tok.span, NodeKind::OperatorLit("...".to_string())))
            }
            TokenKind::LParen => Err(ParsingError::new(
                self.peek().span,
                "parenthesized groups, tuples, and generator expressions are not supported",
            )),
            TokenKind::LBracket => self.list_or_comprehension(),
            TokenKind::LBrace => self.dict_display(),
            other => Err(ParsingError::new(
                self.peek().span,
                format!("expected an expression, found {other:?}"),
            )),
        }
    }

    /// `[` `]` is an empty list; `[` expr `]`/`,`-list is a list literal;
    /// `[` expr 'for' ... `]` is a comprehension, emitted as `Generator`.
    fn list_or_comprehension(&mut self) -> Result<NodeId, ParsingError> {
        let open = self.advance();
        if let Some(close) = self.eat(TokenKind::RBracket) {
            return Ok(self
                .arena
                .alloc(open.span.merge(close.span), NodeKind::Collection(Vec::new())));
        }
        let first = self.expression()?;
        if self.at(TokenKind::For) {
            return self.comprehension_tail(open, first);
        }
        let mut elements = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            if self.at(TokenKind::RBracket) {
                break;
            }
            elements.push(self.expression()?);
        }
        let close = self.expect(TokenKind::RBracket, "expected ']'")?;
        Ok(self
            .arena
            .alloc(open.span.merge(close.span), NodeKind::Collection(elements)))
    }

    fn comprehension_tail(&mut self, open: Token, expr: NodeId) -> Result<NodeId, ParsingError> {
        self.expect(TokenKind::For, "expected 'for' in comprehension")?;
        let target = self.star_expressions()?;
        let in_tok = self.expect(TokenKind::In, "expected 'in' in comprehension")?;
        let source = self.disjunction()?;
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
        let mut conditions = Vec::new();
        while self.eat(TokenKind::If).is_some() {
            conditions.push(self.disjunction()?);
        }
        let close = self.expect(TokenKind::RBracket, "expected ']'")?;
        let span = open.span.merge(close.span);
        Ok(self.arena.alloc(
            span,
            NodeKind::Generator {
                expr,
                iterator,
                conditions,
            },
        ))
    }

    /// `{` `}` dict display: comma-separated `key : value` pairs, each kept
    /// as a `KeyValue` child of a `Collection`.
    fn dict_display(&mut self) -> Result<NodeId, ParsingError> {
        let open = self.advance();
        let mut elements = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                let key = self.expression()?;
                self.expect(TokenKind::Colon, "expected ':' in dict entry")?;
                let value = self.expression()?;
                let span = self.arena.span(key).merge(self.arena.span(value));
                elements.push(self.arena.alloc(span, NodeKind::KeyValue { key, value }));
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
                if self.at(TokenKind::RBrace) {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RBrace, "expected '}'")?;
        Ok(self
            .arena
            .alloc(open.span.merge(close.span), NodeKind::Collection(elements)))
    }

    /// A single `[start]:[stop]:[step]` slice, or a plain index expression
    /// when no colon follows the first component.
    fn slice_item(&mut self) -> Result<NodeId, ParsingError> {
        let span_start = self.peek().span;
        if self.at(TokenKind::Colon) {
            return self.slice_from_colon(None, span_start);
        }
        let first = self.disjunction()?;
        if self.at(TokenKind::Colon) {
            return self.slice_from_colon(Some(first), span_start);
        }
        Ok(first)
    }

    fn slice_from_colon(&mut self, start: Option<NodeId>, span_start: Span) -> Result<NodeId, ParsingError> {
        let colon1 = self.advance();
        let stop = if matches!(self.peek_kind(), TokenKind::Colon | TokenKind::RBracket) {
            None
        } else {
            Some(self.disjunction()?)
        };
        let step = if self.eat(TokenKind::Colon).is_some() {
            if self.at(TokenKind::RBracket) {
                None
            } else {
                Some(self.disjunction()?)
            }
        } else {
            None
        };
        let mut span = span_start.merge(colon1.span);
        if let Some(s) = start {
            span = span.merge(self.arena.span(s));
        }
        if let Some(s) = stop {
            span = span.merge(self.arena.span(s));
        }
        if let Some(s) = step {
            span = span.merge(self.arena.span(s));
        }
        Ok(self.arena.alloc(span, NodeKind::Slice { start, stop, step }))
    }
}

#[cfg(test)]
mod tests {
    use flowgraph_common::logger::NullLogger;

    use super::super::parse;
    use crate::node::NodeKind;

    fn parse_expr(source: &str) -> (crate::Arena, crate::NodeId) {
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
    fn comparison_chain_builds_binary() {
        let (arena, id) = parse_expr("a<b\n");
        match arena.kind(id) {
            NodeKind::Binary { left, op, right } => {
                assert!(matches!(arena.kind(*left), NodeKind::Id(n) if n == "a"));
                assert!(matches!(arena.kind(*op), NodeKind::OperatorLit(t) if t == "<"));
                assert!(matches!(arena.kind(*right), NodeKind::Id(n) if n == "b"));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn is_not_forms_a_single_two_word_operator() {
        let (arena, id) = parse_expr("a is not b\n");
        match arena.kind(id) {
            NodeKind::Binary { op, .. } => {
                assert!(matches!(arena.kind(*op), NodeKind::OperatorLit(t) if t == "is not"));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let (arena, id) = parse_expr("2**3**4\n");
        match arena.kind(id) {
            NodeKind::Binary { left, right, .. } => {
                assert!(matches!(arena.kind(*left), NodeKind::NumberLit(n) if n == "2"));
                assert!(matches!(arena.kind(*right), NodeKind::Binary { .. }));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn invocation_collects_positional_args() {
        let (arena, id) = parse_expr("f(a, b)\n");
        match arena.kind(id) {
            NodeKind::Invocation { args, .. } => assert_eq!(args.len(), 2),
            other => panic!("expected Invocation, got {other:?}"),
        }
    }

    #[test]
    fn member_then_call_chains_left_to_right() {
        let (arena, id) = parse_expr("a.b()\n");
        match arena.kind(id) {
            NodeKind::Invocation { target, .. } => {
                assert!(matches!(arena.kind(*target), NodeKind::MemberRef { .. }));
            }
            other => panic!("expected Invocation, got {other:?}"),
        }
    }

    #[test]
    fn slice_with_all_three_components() {
        let (arena, id) = parse_expr("a[1:2:3]\n");
        match arena.kind(id) {
            NodeKind::Indexer { index, .. } => match arena.kind(*index) {
                NodeKind::Slice { start, stop, step } => {
                    assert!(start.is_some() && stop.is_some() && step.is_some());
                }
                other => panic!("expected Slice, got {other:?}"),
            },
            other => panic!("expected Indexer, got {other:?}"),
        }
    }

    #[test]
    fn plain_index_without_colon_is_not_a_slice() {
        let (arena, id) = parse_expr("a[0]\n");
        match arena.kind(id) {
            NodeKind::Indexer { index, .. } => {
                assert!(matches!(arena.kind(*index), NodeKind::NumberLit(_)));
            }
            other => panic!("expected Indexer, got {other:?}"),
        }
    }

    #[test]
    fn list_comprehension_becomes_generator() {
        let (arena, id) = parse_expr("[x for x in xs if x]\n");
        assert!(matches!(arena.kind(id), NodeKind::Generator { .. }));
    }

    #[test]
    fn dict_display_has_keyvalue_children() {
        let (arena, id) = parse_expr("{a: b}\n");
        match arena.kind(id) {
            NodeKind::Collection(elements) => {
                assert_eq!(elements.len(), 1);
                assert!(matches!(arena.kind(elements[0]), NodeKind::KeyValue { .. }));
            }
            other => panic!("expected Collection, got {other:?}"),
        }
    }

    #[test]
    fn ternary_conditional_expression() {
        let (arena, id) = parse_expr("a if c else b\n");
        assert!(matches!(arena.kind(id), NodeKind::Conditional { .. }));
    }

    #[test]
    fn lambda_is_a_clean_parse_error() {
        let (tokens, _) = flowgraph_lexer::tokenize("lambda x: x\n", &NullLogger);
        let (_, _, errors) = parse(tokens, &NullLogger);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn parenthesized_group_is_a_clean_parse_error() {
        let (tokens, _) = flowgraph_lexer::tokenize("(a)\n", &NullLogger);
        let (_, _, errors) = parse(tokens, &NullLogger);
        assert_eq!(errors.len(), 1);
    }
}
