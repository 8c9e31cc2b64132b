//! CONSTRUCT query parsing.

use crate::ast::{DatasetClause, GraphPattern, GroupGraphPattern, TriplePattern, Verb};
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};

use super::super::Parser;

impl Parser<'_> {
    /// `CONSTRUCT { template } dataset WHERE { ... }` or the short form
    /// `CONSTRUCT dataset WHERE { triples }`, whose template is `None`.
    pub(super) fn parse_construct(
        &mut self,
    ) -> Result<(Option<Vec<TriplePattern>>, Vec<DatasetClause>, GroupGraphPattern)> {
        self.stream.expect_keyword(Keyword::Construct)?;

        if self.stream.check(&TokenKind::LBrace) {
            let template = self.parse_construct_template()?;
            let dataset = self.parse_dataset_clauses()?;
            let where_clause = self.parse_where_clause()?;
            return Ok((Some(template), dataset, where_clause));
        }

        let dataset = self.parse_dataset_clauses()?;
        self.stream.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_group()?;
        if let Some(other) = where_clause
            .patterns
            .iter()
            .find(|p| !matches!(p, GraphPattern::Basic(bgp) if bgp.filters.is_empty()))
        {
            return Err(self.stream.error_over(
                where_clause.span,
                format!("{} in CONSTRUCT WHERE", pattern_name(other)),
                "triple patterns only",
            ));
        }
        self.reject_paths(where_clause.triples())?;
        Ok((None, dataset, where_clause))
    }

    /// `{ triples ( '.' triples )* '.'? }` without property paths.
    fn parse_construct_template(&mut self) -> Result<Vec<TriplePattern>> {
        self.stream.expect(&TokenKind::LBrace, "'{'")?;
        let mut template = Vec::new();

        while !self.stream.check(&TokenKind::RBrace) {
            if self.stream.match_token(&TokenKind::Dot) {
                continue;
            }
            if !self.is_triples_start() {
                return Err(self.stream.error("triple pattern or '}'"));
            }
            let first_new = template.len();
            self.parse_triples_same_subject(&mut template)?;
            self.reject_paths(&template[first_new..])?;

            if !self.stream.check(&TokenKind::Dot) && !self.stream.check(&TokenKind::RBrace) {
                return Err(self.stream.error("'.' or '}'"));
            }
        }

        self.stream.expect(&TokenKind::RBrace, "'}'")?;
        Ok(template)
    }

    /// Every template predicate must be an IRI or a variable.
    fn reject_paths<'t>(&self, triples: impl IntoIterator<Item = &'t TriplePattern>) -> Result<()> {
        match triples
            .into_iter()
            .find(|t| matches!(t.predicate, Verb::Path(_)))
        {
            Some(triple) => Err(self.stream.error_over(
                triple.span,
                format!("property path {}", triple.predicate),
                "IRI or variable predicate in CONSTRUCT template",
            )),
            None => Ok(()),
        }
    }
}

fn pattern_name(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Basic(_) => "FILTER",
        GraphPattern::Group(_) => "nested group",
        GraphPattern::Optional(_) => "OPTIONAL",
        GraphPattern::Union(_) => "UNION",
        GraphPattern::Minus(_) => "MINUS",
        GraphPattern::Graph { .. } => "GRAPH",
        GraphPattern::Service { .. } => "SERVICE",
        GraphPattern::Bind(_) => "BIND",
        GraphPattern::Values(_) => "VALUES",
        GraphPattern::SubSelect(_) => "sub-select",
    }
}
