//! Solution modifiers: GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.
//!
//! The clauses are accepted in any order, each at most once.

use crate::ast::{Expression, GroupCondition, OrderCondition, OrderDirection, SolutionModifiers};
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};

use super::super::Parser;

impl Parser<'_> {
    pub(super) fn parse_solution_modifiers(&mut self) -> Result<SolutionModifiers> {
        let mut modifiers = SolutionModifiers::default();
        let mut seen = Vec::with_capacity(5);

        while let Some(kw) = self.modifier_keyword() {
            if seen.contains(&kw) {
                return Err(self
                    .stream
                    .error(format!("at most one {} clause", clause_name(kw))));
            }
            seen.push(kw);
            self.stream.advance();

            match kw {
                Keyword::Group => {
                    self.stream.expect_keyword(Keyword::By)?;
                    modifiers.group_by = self.parse_one_or_more(
                        Self::is_group_condition_start,
                        Self::parse_group_condition,
                        "GROUP BY condition",
                    )?;
                }
                Keyword::Having => {
                    modifiers.having = self.parse_one_or_more(
                        Self::is_constraint_start,
                        Self::parse_constraint,
                        "HAVING constraint",
                    )?;
                }
                Keyword::Order => {
                    self.stream.expect_keyword(Keyword::By)?;
                    modifiers.order_by = self.parse_one_or_more(
                        Self::is_order_condition_start,
                        Self::parse_order_condition,
                        "ORDER BY condition",
                    )?;
                }
                Keyword::Limit => modifiers.limit = self.stream.expect_count()?,
                _ => modifiers.offset = self.stream.expect_count()?,
            }
        }

        Ok(modifiers)
    }

    fn modifier_keyword(&self) -> Option<Keyword> {
        match self.stream.peek_kind() {
            TokenKind::Keyword(
                kw @ (Keyword::Group
                | Keyword::Having
                | Keyword::Order
                | Keyword::Limit
                | Keyword::Offset),
            ) => Some(*kw),
            _ => None,
        }
    }

    fn parse_one_or_more<T>(
        &mut self,
        starts: fn(&Self) -> bool,
        parse: fn(&mut Self) -> Result<T>,
        expected: &str,
    ) -> Result<Vec<T>> {
        if !starts(self) {
            return Err(self.stream.error(expected));
        }
        let mut items = Vec::new();
        while starts(self) {
            items.push(parse(self)?);
        }
        Ok(items)
    }

    fn is_group_condition_start(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::Var(_) | TokenKind::LParen | TokenKind::Builtin(_)
        ) || self.stream.check_iri()
    }

    /// `?var`, a call, `( expr )` or `( expr AS ?var )`.
    fn parse_group_condition(&mut self) -> Result<GroupCondition> {
        if !self.stream.match_token(&TokenKind::LParen) {
            let expression = self.parse_primary()?;
            return Ok(GroupCondition {
                expression,
                alias: None,
            });
        }
        let expression = self.parse_expression()?;
        let alias = if self.stream.match_keyword(Keyword::As) {
            Some(self.stream.expect_var()?)
        } else {
            None
        };
        self.stream.expect(&TokenKind::RParen, "')'")?;
        Ok(GroupCondition { expression, alias })
    }

    fn is_order_condition_start(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::Var(_) | TokenKind::Keyword(Keyword::Asc | Keyword::Desc)
        ) || self.is_constraint_start()
    }

    /// `ASC( expr )`, `DESC( expr )`, a variable or a constraint.
    fn parse_order_condition(&mut self) -> Result<OrderCondition> {
        let direction = if self.stream.match_keyword(Keyword::Asc) {
            Some(OrderDirection::Asc)
        } else if self.stream.match_keyword(Keyword::Desc) {
            Some(OrderDirection::Desc)
        } else {
            None
        };

        let expression = match direction {
            Some(_) => self.parse_bracketed()?,
            None if matches!(self.stream.peek_kind(), TokenKind::Var(_)) => {
                Expression::Term(self.stream.expect_var()?)
            }
            None => self.parse_constraint()?,
        };
        Ok(OrderCondition {
            expression,
            direction,
        })
    }
}

fn clause_name(kw: Keyword) -> &'static str {
    match kw {
        Keyword::Group => "GROUP BY",
        Keyword::Order => "ORDER BY",
        other => other.as_str(),
    }
}
