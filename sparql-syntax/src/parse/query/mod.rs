//! Query-level grammar.
//!
//! ```text
//! Query    ::= Prologue ( Select | Construct | Describe | Ask ) ValuesClause?
//! Prologue ::= ( 'BASE' IRIREF | 'PREFIX' PNAME_NS IRIREF )*
//! ```
//!
//! Each form parses its own head; dataset clauses, WHERE, solution
//! modifiers and trailing VALUES are shared.

mod construct;
mod describe;
mod modifier;
mod pattern;
mod select;
mod term;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::ast::{DatasetClause, GroupGraphPattern, Query, QueryForm};
use crate::error::Result;
use crate::expand::PrefixMap;
use crate::lex::{Keyword, TokenKind};

use super::Parser;

impl Parser<'_> {
    pub(super) fn parse_query(&mut self) -> Result<Query> {
        let start = self.stream.current_span();
        let prefixes = self.parse_prologue()?;

        let (form, dataset, where_clause) = match self.stream.peek_kind() {
            TokenKind::Keyword(Keyword::Select) => {
                let select = self.parse_select_clause()?;
                let dataset = self.parse_dataset_clauses()?;
                let where_clause = self.parse_where_clause()?;
                (QueryForm::Select(select), dataset, Some(where_clause))
            }
            TokenKind::Keyword(Keyword::Construct) => {
                let (template, dataset, where_clause) = self.parse_construct()?;
                (QueryForm::Construct { template }, dataset, Some(where_clause))
            }
            TokenKind::Keyword(Keyword::Ask) => {
                self.stream.advance();
                let dataset = self.parse_dataset_clauses()?;
                let where_clause = self.parse_where_clause()?;
                (QueryForm::Ask, dataset, Some(where_clause))
            }
            TokenKind::Keyword(Keyword::Describe) => {
                let (targets, dataset, where_clause) = self.parse_describe()?;
                (QueryForm::Describe { targets }, dataset, where_clause)
            }
            _ => return Err(self.stream.error("SELECT, CONSTRUCT, ASK or DESCRIBE")),
        };

        // DESCRIBE without WHERE can still carry modifiers and VALUES.
        let modifiers = self.parse_solution_modifiers()?;
        let values = self.parse_trailing_values()?;
        self.stream.expect(&TokenKind::Eof, "end of input")?;

        let query = Query {
            prefixes,
            form,
            dataset,
            where_clause,
            modifiers,
            values,
            span: start.union(self.stream.previous_span()),
        };
        tracing::trace!(form = query.form.keyword(), "parsed query");
        Ok(query)
    }

    /// BASE and PREFIX declarations, in order. A repeated prefix keeps the
    /// last IRI.
    fn parse_prologue(&mut self) -> Result<PrefixMap> {
        let mut prefixes = PrefixMap::new();
        loop {
            if self.stream.match_keyword(Keyword::Base) {
                let iri = self.expect_iriref("IRI after BASE")?;
                prefixes.set_base(iri);
            } else if self.stream.match_keyword(Keyword::Prefix) {
                let prefix = match self.stream.peek_kind() {
                    TokenKind::PrefixedNameNs(prefix) => prefix.clone(),
                    _ => return Err(self.stream.error("prefix name after PREFIX")),
                };
                self.stream.advance();
                let iri = self.expect_iriref("IRI after prefix name")?;
                prefixes.insert(&prefix, iri);
            } else {
                return Ok(prefixes);
            }
        }
    }

    /// A `<...>` IRI; prefixed names are not allowed in the prologue.
    fn expect_iriref(&mut self, expected: &str) -> Result<Arc<str>> {
        match self.stream.peek_kind() {
            TokenKind::Iri(iri) => {
                let iri = iri.clone();
                self.stream.advance();
                Ok(iri)
            }
            _ => Err(self.stream.error(expected)),
        }
    }

    /// `( FROM NAMED? iri )*`
    fn parse_dataset_clauses(&mut self) -> Result<Vec<DatasetClause>> {
        let mut dataset = Vec::new();
        while self.stream.match_keyword(Keyword::From) {
            let named = self.stream.match_keyword(Keyword::Named);
            let iri = self.stream.expect_iri()?;
            dataset.push(DatasetClause { named, iri });
        }
        Ok(dataset)
    }

    /// `WHERE? { ... }`
    fn parse_where_clause(&mut self) -> Result<GroupGraphPattern> {
        self.stream.match_keyword(Keyword::Where);
        if !self.stream.check(&TokenKind::LBrace) {
            return Err(self.stream.error("WHERE clause"));
        }
        self.parse_group()
    }
}
