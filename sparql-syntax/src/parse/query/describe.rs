//! DESCRIBE query parsing.

use crate::ast::{DatasetClause, DescribeTargets, GroupGraphPattern};
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};

use super::super::Parser;

impl Parser<'_> {
    /// `DESCRIBE ( varOrIri+ | '*' ) dataset ( WHERE? { ... } )?`
    pub(super) fn parse_describe(
        &mut self,
    ) -> Result<(DescribeTargets, Vec<DatasetClause>, Option<GroupGraphPattern>)> {
        self.stream.expect_keyword(Keyword::Describe)?;

        let targets = if self.stream.match_token(&TokenKind::Star) {
            DescribeTargets::All
        } else {
            let mut terms = vec![self.parse_var_or_iri()?];
            while matches!(self.stream.peek_kind(), TokenKind::Var(_)) || self.stream.check_iri() {
                terms.push(self.parse_var_or_iri()?);
            }
            DescribeTargets::Terms(terms)
        };

        let dataset = self.parse_dataset_clauses()?;
        let where_clause = if self.stream.check_keyword(Keyword::Where)
            || self.stream.check(&TokenKind::LBrace)
        {
            Some(self.parse_where_clause()?)
        } else {
            None
        };
        Ok((targets, dataset, where_clause))
    }
}
