//! Expression parsing.
//!
//! ## Precedence (lowest to highest)
//!
//! 1. `||` / `OR`
//! 2. `&&` / `AND`
//! 3. `=`, `!=`, `<`, `<=`, `>`, `>=`, `IN`, `NOT IN` (non-associative)
//! 4. `+`, `-`
//! 5. `*`, `/`
//! 6. unary `!`, `+`, `-`
//! 7. primary: bracketed, literal, variable, built-in or aggregate call,
//!    IRI or extension call, `EXISTS`
//!
//! A signed numeric literal directly after an additive operand (`?x -1`) is
//! read as the operator plus the unsigned literal.

use crate::ast::{
    Aggregate, AggregateCall, BinaryOp, Builtin, Expression, FunctionCall, RdfTerm, UnaryOp,
};
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};
use crate::span::SourceSpan;

use super::Parser;

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.stream.match_token(&TokenKind::OrOr) || self.stream.match_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_relational()?;
        while self.stream.match_token(&TokenKind::AndAnd)
            || self.stream.match_keyword(Keyword::And)
        {
            let right = self.parse_relational()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expression> {
        let left = self.parse_additive()?;

        let op = match self.stream.peek_kind() {
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::Ne => Some(BinaryOp::Ne),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Le => Some(BinaryOp::Le),
            TokenKind::Ge => Some(BinaryOp::Ge),
            _ => None,
        };
        if let Some(op) = op {
            self.stream.advance();
            let right = self.parse_additive()?;
            return Ok(binary(op, left, right));
        }

        let negated = self.stream.check_keyword(Keyword::Not)
            && self.stream.peek_n(1).kind.is_keyword(Keyword::In);
        if negated {
            self.stream.advance();
        }
        if self.stream.match_keyword(Keyword::In) {
            let list = self.parse_expression_list()?;
            let span = left.span().union(self.stream.previous_span());
            return Ok(Expression::In {
                expr: Box::new(left),
                list,
                negated,
                span,
            });
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            if self.stream.peek_kind().is_signed_numeric() {
                let token = self.stream.advance();
                let (op, operand) = split_signed(&token.kind, token.span);
                let right = self.parse_multiplicative_rest(operand)?;
                left = binary(op, left, right);
                continue;
            }
            let op = match self.stream.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let left = self.parse_unary()?;
        self.parse_multiplicative_rest(left)
    }

    fn parse_multiplicative_rest(&mut self, mut left: Expression) -> Result<Expression> {
        loop {
            let op = match self.stream.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        let op = match self.stream.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        let start = self.stream.advance().span;
        let operand = self.parse_primary()?;
        let span = start.union(operand.span());
        Ok(Expression::unary(op, operand, span))
    }

    pub(crate) fn parse_primary(&mut self) -> Result<Expression> {
        match self.stream.peek_kind() {
            TokenKind::LParen => self.parse_bracketed(),
            TokenKind::Var(_) => Ok(Expression::Term(self.stream.expect_var()?)),
            TokenKind::Builtin(b) => {
                let b = *b;
                self.parse_builtin_call(b)
            }
            TokenKind::Aggregate(a) => {
                let a = *a;
                self.parse_aggregate(a)
            }
            TokenKind::Keyword(Keyword::Exists) => self.parse_exists(),
            TokenKind::Keyword(Keyword::Not)
                if self.stream.peek_n(1).kind.is_keyword(Keyword::Exists) =>
            {
                self.parse_exists()
            }
            _ if self.stream.check_iri() => self.parse_iri_or_call(),
            _ => match self.parse_literal()? {
                Some(literal) => Ok(Expression::Term(literal)),
                None => Err(self.stream.error("expression")),
            },
        }
    }

    /// `( expr )`
    pub(crate) fn parse_bracketed(&mut self) -> Result<Expression> {
        self.stream.expect(&TokenKind::LParen, "'('")?;
        let expr = self.parse_expression()?;
        self.stream.expect(&TokenKind::RParen, "')'")?;
        Ok(expr)
    }

    /// `FILTER` / `HAVING` constraint: bracketed expression or a call.
    pub(crate) fn parse_constraint(&mut self) -> Result<Expression> {
        if self.is_constraint_start() {
            self.parse_primary()
        } else {
            Err(self.stream.error("'(' or function call"))
        }
    }

    pub(crate) fn is_constraint_start(&self) -> bool {
        match self.stream.peek_kind() {
            TokenKind::LParen
            | TokenKind::Builtin(_)
            | TokenKind::Aggregate(_)
            | TokenKind::Keyword(Keyword::Exists) => true,
            TokenKind::Keyword(Keyword::Not) => {
                self.stream.peek_n(1).kind.is_keyword(Keyword::Exists)
            }
            _ => self.stream.check_iri(),
        }
    }

    /// `( expr, ... )` or NIL.
    fn parse_expression_list(&mut self) -> Result<Vec<Expression>> {
        if self.stream.match_token(&TokenKind::Nil) {
            return Ok(Vec::new());
        }
        self.stream.expect(&TokenKind::LParen, "'(' or '()'")?;
        let mut list = vec![self.parse_expression()?];
        while self.stream.match_token(&TokenKind::Comma) {
            list.push(self.parse_expression()?);
        }
        self.stream.expect(&TokenKind::RParen, "',' or ')'")?;
        Ok(list)
    }

    fn parse_builtin_call(&mut self, builtin: Builtin) -> Result<Expression> {
        let name = self.stream.advance();

        let args = if builtin == Builtin::Bound {
            self.stream.expect(&TokenKind::LParen, "'(' after BOUND")?;
            let var = self.stream.expect_var()?;
            self.stream.expect(&TokenKind::RParen, "')'")?;
            vec![Expression::Term(var)]
        } else {
            self.parse_expression_list()?
        };

        if !builtin.accepts(args.len()) {
            return Err(self.stream.error_at(&name, arity_description(builtin)));
        }
        let span = name.span.union(self.stream.previous_span());
        Ok(Expression::Call(FunctionCall::builtin(builtin, args, span)))
    }

    fn parse_aggregate(&mut self, function: Aggregate) -> Result<Expression> {
        let start = self.stream.advance().span;
        self.stream.expect(&TokenKind::LParen, "'(' after aggregate")?;
        let distinct = self.stream.match_keyword(Keyword::Distinct);

        let arg = if function == Aggregate::Count && self.stream.match_token(&TokenKind::Star) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let separator = if function == Aggregate::GroupConcat
            && self.stream.match_token(&TokenKind::Semicolon)
        {
            self.stream.expect_keyword(Keyword::Separator)?;
            self.stream.expect(&TokenKind::Eq, "'=' after SEPARATOR")?;
            match self.stream.peek_kind() {
                TokenKind::String(sep) => {
                    let sep = sep.clone();
                    self.stream.advance();
                    Some(sep)
                }
                _ => return Err(self.stream.error("separator string")),
            }
        } else {
            None
        };

        self.stream.expect(&TokenKind::RParen, "')'")?;
        Ok(Expression::Aggregate(AggregateCall {
            function,
            distinct,
            arg,
            separator,
            span: start.union(self.stream.previous_span()),
        }))
    }

    /// `EXISTS { ... }` / `NOT EXISTS { ... }`
    fn parse_exists(&mut self) -> Result<Expression> {
        let start = self.stream.current_span();
        let negated = self.stream.match_keyword(Keyword::Not);
        self.stream.expect_keyword(Keyword::Exists)?;
        let pattern = self.parse_group()?;
        Ok(Expression::Exists {
            negated,
            pattern: Box::new(pattern),
            span: start.union(self.stream.previous_span()),
        })
    }

    /// An IRI, or an extension call when followed by an argument list.
    fn parse_iri_or_call(&mut self) -> Result<Expression> {
        let iri = self.stream.expect_iri()?;
        if self.stream.match_token(&TokenKind::Nil) {
            let span = iri.span.union(self.stream.previous_span());
            return Ok(Expression::Call(FunctionCall::extension(iri, Vec::new(), false, span)));
        }
        if !self.stream.match_token(&TokenKind::LParen) {
            return Ok(Expression::Term(iri));
        }
        let distinct = self.stream.match_keyword(Keyword::Distinct);
        let mut args = vec![self.parse_expression()?];
        while self.stream.match_token(&TokenKind::Comma) {
            args.push(self.parse_expression()?);
        }
        self.stream.expect(&TokenKind::RParen, "',' or ')'")?;
        let span = iri.span.union(self.stream.previous_span());
        Ok(Expression::Call(FunctionCall::extension(iri, args, distinct, span)))
    }
}

fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    let span = left.span().union(right.span());
    Expression::binary(op, left, right, span)
}

/// Split `-5` into `Sub` and `5`, `+5` into `Add` and `5`.
fn split_signed(kind: &TokenKind, span: SourceSpan) -> (BinaryOp, Expression) {
    let lexical = match kind {
        TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => &**s,
        _ => "",
    };
    let (op, magnitude) = match lexical.strip_prefix('-') {
        Some(rest) => (BinaryOp::Sub, rest),
        None => (BinaryOp::Add, lexical.strip_prefix('+').unwrap_or(lexical)),
    };
    let span = SourceSpan::new((span.start + 1).min(span.end), span.end);
    (op, Expression::Term(RdfTerm::numeric(magnitude, span)))
}

fn arity_description(builtin: Builtin) -> String {
    match builtin.arity() {
        (0, Some(0)) => "no arguments".to_string(),
        (1, Some(1)) => "exactly 1 argument".to_string(),
        (min, Some(max)) if min == max => format!("exactly {min} arguments"),
        (min, Some(max)) => format!("{min} to {max} arguments"),
        (min, None) => format!("at least {min} arguments"),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Function, OperatorKind, Variables};
    use crate::parse::parse_expression;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse_expression("1 + 2 * 3 = 7").unwrap();
        match &expr {
            Expression::Binary {
                op: BinaryOp::Eq,
                left,
                ..
            } => match &**left {
                Expression::Binary {
                    op: BinaryOp::Add,
                    right,
                    ..
                } => assert!(matches!(**right, Expression::Binary { op: BinaryOp::Mul, .. })),
                other => panic!("expected addition, got {other}"),
            },
            other => panic!("expected equality, got {other}"),
        }
        assert_eq!(expr.to_string(), "((1 + (2 * 3)) = 7)");
    }

    #[test]
    fn test_or_and_keywords() {
        let expr = parse_expression("?a || ?b && ?c").unwrap();
        assert_eq!(expr.to_string(), "(?a || (?b && ?c))");

        let words = parse_expression("?a OR ?b AND ?c").unwrap();
        assert_eq!(words.to_string(), expr.to_string());
    }

    #[test]
    fn test_signed_literal_after_operand() {
        let expr = parse_expression("?x -1").unwrap();
        assert_eq!(expr.to_string(), "(?x - 1)");

        let expr = parse_expression("?x +2 * 3").unwrap();
        assert_eq!(expr.to_string(), "(?x + (2 * 3))");

        // In operand position the sign stays on the literal.
        let expr = parse_expression("-1").unwrap();
        assert_eq!(expr, Expression::Term(RdfTerm::numeric("-1", SourceSpan::default())));
    }

    #[test]
    fn test_unary_operators() {
        let expr = parse_expression("!BOUND(?x)").unwrap();
        assert!(matches!(expr, Expression::Unary { op: UnaryOp::Not, .. }));
        assert_eq!(expr.to_string(), "!BOUND(?x)");

        let nested = parse_expression("-(-?x)").unwrap();
        assert_eq!(nested.to_string(), "-(-?x)");
        assert_eq!(parse_expression(&nested.to_string()).unwrap(), nested);
    }

    #[test]
    fn test_in_and_not_in() {
        let expr = parse_expression("?x NOT IN (1, 2)").unwrap();
        assert_eq!(expr.to_string(), "(?x NOT IN (1, 2))");
        assert_eq!(expr.operator_kind(), Some(OperatorKind::List));

        let empty = parse_expression("?x IN ()").unwrap();
        assert!(matches!(empty, Expression::In { ref list, negated: false, .. } if list.is_empty()));
    }

    #[test]
    fn test_builtin_kinds() {
        let regex = parse_expression("REGEX(?name, \"^a\", \"i\")").unwrap();
        assert_eq!(regex.operator_kind(), Some(OperatorKind::Ternary));

        let now = parse_expression("NOW()").unwrap();
        assert_eq!(now.operator_kind(), Some(OperatorKind::Nil));
        assert_eq!(now.to_string(), "NOW()");

        let concat = parse_expression("concat(?a, \" \", ?b)").unwrap();
        assert_eq!(concat.operator_kind(), Some(OperatorKind::List));
        assert_eq!(concat.to_string(), "CONCAT(?a, \" \", ?b)");

        let replace = parse_expression("REPLACE(?s, \"a\", \"b\", \"i\")").unwrap();
        assert_eq!(replace.operator_kind(), Some(OperatorKind::Quaternary));

        let bnode = parse_expression("BNODE()").unwrap();
        assert_eq!(bnode.to_string(), "BNODE()");
    }

    #[test]
    fn test_builtin_arity_is_checked() {
        let err = parse_expression("STRLEN(?a, ?b)").unwrap_err();
        assert!(err.to_string().contains("unexpected STRLEN, expected exactly 1 argument"));

        assert!(parse_expression("CONTAINS(?a)").is_err());
        assert!(parse_expression("IF(?a, ?b)").is_err());
    }

    #[test]
    fn test_bound_requires_variable() {
        let err = parse_expression("BOUND(<http://example.org/x>)").unwrap_err();
        assert!(err.to_string().contains("expected variable"));
    }

    #[test]
    fn test_aggregates() {
        let count = parse_expression("COUNT(DISTINCT *)").unwrap();
        assert_eq!(count.to_string(), "COUNT(DISTINCT *)");
        assert_eq!(count.operator_kind(), Some(OperatorKind::Aggregate));

        let concat = parse_expression("GROUP_CONCAT(?name ; SEPARATOR = \", \")").unwrap();
        match &concat {
            Expression::Aggregate(agg) => assert_eq!(agg.separator.as_deref(), Some(", ")),
            other => panic!("expected aggregate, got {other}"),
        }

        // `*` is only valid inside COUNT.
        assert!(parse_expression("SUM(*)").is_err());
    }

    #[test]
    fn test_extension_calls_and_casts() {
        let cast = parse_expression("xsd:integer(?n)").unwrap();
        match &cast {
            Expression::Call(call) => assert!(matches!(call.function, Function::Extension(_))),
            other => panic!("expected call, got {other}"),
        }

        let distinct = parse_expression("<http://example.org/agg>(DISTINCT ?x, ?y)").unwrap();
        assert_eq!(distinct.to_string(), "<http://example.org/agg>(DISTINCT ?x, ?y)");

        let bare = parse_expression("ex:thing").unwrap();
        assert!(matches!(bare, Expression::Term(ref t) if t.is_iri()));
    }

    #[test]
    fn test_exists() {
        let expr = parse_expression("NOT EXISTS { ?s ?p ?o }").unwrap();
        assert!(matches!(expr, Expression::Exists { negated: true, .. }));
        assert_eq!(expr.to_string(), "NOT EXISTS { ?s ?p ?o . }");
        assert_eq!(expr.free_variables().len(), 3);
    }

    #[test]
    fn test_literals() {
        let expr = parse_expression("?l = \"chat\"@fr").unwrap();
        assert_eq!(expr.to_string(), "(?l = \"chat\"@fr)");

        let expr = parse_expression("?n >= \"5\"^^xsd:integer").unwrap();
        assert_eq!(expr.to_string(), "(?n >= \"5\"^^xsd:integer)");

        let expr = parse_expression("true && 1.5e3").unwrap();
        assert_eq!(expr.to_string(), "(true && 1.5e3)");
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_expression("?a + ?b ?c").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("unexpected ?c"));
    }
}
