//! SELECT clause parsing.

use std::collections::HashSet;

use crate::ast::{Projection, ProjectionItem, RdfTerm, SelectClause, SelectModifier};
use crate::config::ProjectionNaming;
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};

use super::super::Parser;

impl Parser<'_> {
    /// `SELECT ( DISTINCT | REDUCED )? ( '*' | item+ )`
    ///
    /// Shared by top-level queries and sub-selects.
    pub(super) fn parse_select_clause(&mut self) -> Result<SelectClause> {
        self.stream.expect_keyword(Keyword::Select)?;

        let modifier = if self.stream.match_keyword(Keyword::Distinct) {
            Some(SelectModifier::Distinct)
        } else if self.stream.match_keyword(Keyword::Reduced) {
            Some(SelectModifier::Reduced)
        } else {
            None
        };

        if self.stream.match_token(&TokenKind::Star) {
            return Ok(SelectClause {
                modifier,
                projection: Projection::All,
            });
        }

        let mut items = Vec::new();
        let mut generated = Vec::new();
        while self.is_projection_start() {
            let (item, named) = self.parse_projection_item(items.len())?;
            if !named {
                generated.push(items.len());
            }
            items.push(item);
        }
        if items.is_empty() {
            return Err(self.stream.error("'*' or projection"));
        }
        rename_taken_aliases(&mut items, &generated);

        Ok(SelectClause {
            modifier,
            projection: Projection::Items(items),
        })
    }

    fn is_projection_start(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::Var(_) | TokenKind::LParen | TokenKind::Builtin(_) | TokenKind::Aggregate(_)
        ) || self.stream.check_iri()
    }

    /// `?v`, `( expr AS ?v )`, or a bare call with an optional `AS ?v`.
    ///
    /// A bare call without `AS` is named by the configured
    /// [`ProjectionNaming`]; the flag is `false` for those items.
    fn parse_projection_item(&mut self, index: usize) -> Result<(ProjectionItem, bool)> {
        if let Some((name, span)) = self.stream.consume_var() {
            return Ok((ProjectionItem::Var(RdfTerm::var(name, span)), true));
        }

        if self.stream.match_token(&TokenKind::LParen) {
            let expression = self.parse_expression()?;
            self.stream.expect_keyword(Keyword::As)?;
            let alias = self.stream.expect_var()?;
            self.stream.expect(&TokenKind::RParen, "')' after projection alias")?;
            return Ok((ProjectionItem::Expr { expression, alias }, true));
        }

        let expression = self.parse_primary()?;
        if self.stream.match_keyword(Keyword::As) {
            let alias = self.stream.expect_var()?;
            return Ok((ProjectionItem::Expr { expression, alias }, true));
        }
        let name = self
            .config
            .projection_naming
            .variable_name(expression.name_stem(), index);
        let alias = RdfTerm::var(name, expression.span());
        Ok((ProjectionItem::Expr { expression, alias }, false))
    }
}

/// Moves each generated alias in `generated` off a name that another item of
/// the same projection already binds, to the next free positional suffix.
fn rename_taken_aliases(items: &mut [ProjectionItem], generated: &[usize]) {
    for &index in generated {
        let taken: HashSet<String> = items
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, item)| bare_name(&item.variable().value).to_string())
            .collect();

        let ProjectionItem::Expr { expression, alias } = &mut items[index] else {
            continue;
        };
        if !taken.contains(bare_name(&alias.value)) {
            continue;
        }
        let stem = expression.name_stem();
        let fresh = (index + 1..)
            .map(|n| ProjectionNaming::Positional.variable_name(stem, n))
            .find(|name| !taken.contains(bare_name(name)));
        if let Some(name) = fresh {
            *alias = RdfTerm::var(name, alias.span);
        }
    }
}

/// `?x` and `$x` name the same variable.
fn bare_name(var: &str) -> &str {
    var.trim_start_matches(['?', '$'])
}
