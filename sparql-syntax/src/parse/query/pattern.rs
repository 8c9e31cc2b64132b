//! Graph pattern parsing: groups, OPTIONAL, UNION, MINUS, GRAPH, SERVICE,
//! FILTER, BIND, VALUES and sub-selects.

use crate::ast::{
    BasicGraphPattern, Bind, Filter, GraphPattern, GroupGraphPattern, RdfTerm, SubSelect,
    ValuesClause,
};
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};
use crate::span::SourceSpan;

use super::super::Parser;

impl Parser<'_> {
    /// `{ ... }`: a sub-select if one parses, otherwise a pattern sequence.
    pub(crate) fn parse_group(&mut self) -> Result<GroupGraphPattern> {
        let open = self.stream.expect(&TokenKind::LBrace, "'{'")?;

        if self.stream.check_keyword(Keyword::Select) {
            match self.try_parse(|p| p.parse_sub_select(open.span)) {
                Ok(sub) => {
                    tracing::debug!(select = %sub.select, "recognised sub-select");
                    let span = sub.span;
                    return Ok(GroupGraphPattern::new(
                        vec![GraphPattern::SubSelect(Box::new(sub))],
                        span,
                    ));
                }
                // The sequence parse will reject SELECT too; the sub-select
                // error points at the real problem.
                Err(err) => return self.parse_group_body(open.span).map_err(|_| err),
            }
        }

        self.parse_group_body(open.span)
    }

    /// The pattern sequence after `{`, through the closing `}`.
    fn parse_group_body(&mut self, start: SourceSpan) -> Result<GroupGraphPattern> {
        let mut patterns = Vec::new();
        let mut bgp = BasicGraphPattern::default();

        loop {
            match self.stream.peek_kind() {
                TokenKind::RBrace => break,
                TokenKind::Dot => {
                    self.stream.advance();
                }
                TokenKind::Keyword(Keyword::Filter) => {
                    let filter = self.parse_filter()?;
                    bgp.filters.push(filter);
                }
                TokenKind::Keyword(Keyword::Optional) => {
                    flush_bgp(&mut bgp, &mut patterns);
                    self.stream.advance();
                    patterns.push(GraphPattern::Optional(self.parse_group()?));
                }
                TokenKind::Keyword(Keyword::Minus) => {
                    flush_bgp(&mut bgp, &mut patterns);
                    self.stream.advance();
                    patterns.push(GraphPattern::Minus(self.parse_group()?));
                }
                TokenKind::Keyword(Keyword::Graph) => {
                    flush_bgp(&mut bgp, &mut patterns);
                    self.stream.advance();
                    let name = self.parse_var_or_iri()?;
                    let pattern = self.parse_group()?;
                    patterns.push(GraphPattern::Graph { name, pattern });
                }
                TokenKind::Keyword(Keyword::Service) => {
                    flush_bgp(&mut bgp, &mut patterns);
                    self.stream.advance();
                    let silent = self.stream.match_keyword(Keyword::Silent);
                    let name = self.parse_var_or_iri()?;
                    let pattern = self.parse_group()?;
                    patterns.push(GraphPattern::Service {
                        silent,
                        name,
                        pattern,
                    });
                }
                TokenKind::Keyword(Keyword::Bind) => {
                    flush_bgp(&mut bgp, &mut patterns);
                    patterns.push(GraphPattern::Bind(self.parse_bind()?));
                }
                TokenKind::Keyword(Keyword::Values) => {
                    flush_bgp(&mut bgp, &mut patterns);
                    patterns.push(GraphPattern::Values(self.parse_values_clause()?));
                }
                TokenKind::LBrace => {
                    flush_bgp(&mut bgp, &mut patterns);
                    patterns.push(self.parse_group_or_union()?);
                }
                _ if self.is_triples_start() => {
                    self.parse_triples_same_subject(&mut bgp.triples)?;
                    // Consecutive triple blocks need a separating dot.
                    if !self.stream.check(&TokenKind::Dot) && self.is_triples_start() {
                        return Err(self.stream.error("'.' between triple patterns"));
                    }
                }
                _ => return Err(self.stream.error("graph pattern or '}'")),
            }
        }

        flush_bgp(&mut bgp, &mut patterns);
        let close = self.stream.expect(&TokenKind::RBrace, "'}'")?;
        Ok(GroupGraphPattern::new(patterns, start.union(close.span)))
    }

    /// A nested group, folded with any following `UNION` groups.
    fn parse_group_or_union(&mut self) -> Result<GraphPattern> {
        let first = self.parse_group()?;
        if !self.stream.check_keyword(Keyword::Union) {
            return Ok(GraphPattern::Group(first));
        }
        let mut alternatives = vec![first];
        while self.stream.match_keyword(Keyword::Union) {
            alternatives.push(self.parse_group()?);
        }
        Ok(GraphPattern::Union(alternatives))
    }

    fn parse_filter(&mut self) -> Result<Filter> {
        let start = self.stream.expect_keyword(Keyword::Filter)?.span;
        let expression = self.parse_constraint()?;
        Ok(Filter {
            expression,
            span: start.union(self.stream.previous_span()),
        })
    }

    /// `BIND ( expr AS ?var )`
    fn parse_bind(&mut self) -> Result<Bind> {
        let start = self.stream.expect_keyword(Keyword::Bind)?.span;
        self.stream.expect(&TokenKind::LParen, "'(' after BIND")?;
        let expression = self.parse_expression()?;
        self.stream.expect_keyword(Keyword::As)?;
        let variable = self.stream.expect_var()?;
        self.stream.expect(&TokenKind::RParen, "')'")?;
        Ok(Bind {
            expression,
            variable,
            span: start.union(self.stream.previous_span()),
        })
    }

    /// `VALUES ?x { ... }`, `VALUES ( ?x ?y ) { ( ... ) ... }` or the NIL form.
    ///
    /// Each row must hold exactly one cell per variable.
    pub(super) fn parse_values_clause(&mut self) -> Result<ValuesClause> {
        let start = self.stream.expect_keyword(Keyword::Values)?.span;
        let mut values = ValuesClause::default();

        if let Some((name, span)) = self.stream.consume_var() {
            values.variables.push(RdfTerm::var(name, span));
            self.stream.expect(&TokenKind::LBrace, "'{' after VALUES variable")?;
            while !self.stream.check(&TokenKind::RBrace) {
                values.rows.push(vec![self.parse_data_value()?]);
            }
        } else {
            if !self.stream.match_token(&TokenKind::Nil) {
                self.stream.expect(&TokenKind::LParen, "variable or '(' after VALUES")?;
                while !self.stream.match_token(&TokenKind::RParen) {
                    values.variables.push(self.stream.expect_var()?);
                }
            }
            self.stream.expect(&TokenKind::LBrace, "'{' after VALUES variables")?;
            while !self.stream.check(&TokenKind::RBrace) {
                values.rows.push(self.parse_values_row(values.variables.len())?);
            }
        }

        let close = self.stream.expect(&TokenKind::RBrace, "'}'")?;
        values.span = start.union(close.span);
        Ok(values)
    }

    fn parse_values_row(&mut self, arity: usize) -> Result<Vec<Option<RdfTerm>>> {
        if arity == 0 || self.stream.check(&TokenKind::Nil) {
            // `()` is only a complete row when there are no variables.
            if arity == 0 {
                self.stream.expect(&TokenKind::Nil, "'()'")?;
                return Ok(Vec::new());
            }
            return Err(self.stream.error(format!("row of {arity} values")));
        }
        self.stream.expect(&TokenKind::LParen, "'(' or '}'")?;
        let row = (0..arity)
            .map(|_| self.parse_data_value())
            .collect::<Result<Vec<_>>>()?;
        self.stream.expect(&TokenKind::RParen, "')' closing VALUES row")?;
        Ok(row)
    }

    /// Trailing `VALUES` after a query or sub-select, if present.
    pub(super) fn parse_trailing_values(&mut self) -> Result<ValuesClause> {
        if self.stream.check_keyword(Keyword::Values) {
            self.parse_values_clause()
        } else {
            Ok(ValuesClause::default())
        }
    }

    /// `SELECT ... WHERE { ... } modifiers VALUES? }` after the opening brace.
    fn parse_sub_select(&mut self, start: SourceSpan) -> Result<SubSelect> {
        let select = self.parse_select_clause()?;
        self.stream.match_keyword(Keyword::Where);
        let where_clause = self.parse_group()?;
        let modifiers = self.parse_solution_modifiers()?;
        let values = self.parse_trailing_values()?;
        let close = self.stream.expect(&TokenKind::RBrace, "'}' after sub-select")?;
        Ok(SubSelect {
            select,
            where_clause,
            modifiers,
            values,
            span: start.union(close.span),
        })
    }
}

/// Move accumulated triples and filters into the sequence as one BGP.
fn flush_bgp(bgp: &mut BasicGraphPattern, patterns: &mut Vec<GraphPattern>) {
    if !bgp.is_empty() {
        patterns.push(GraphPattern::Basic(std::mem::take(bgp)));
    }
}
