//! Term parsing: literals, graph terms, verbs and triple blocks.
//!
//! `[ ... ]` and `( ... )` in subject or object position mint blank nodes and
//! emit the triples they imply before the triple that uses them.

use std::sync::Arc;

use crate::ast::{RdfTerm, TriplePattern, Verb, RDF_FIRST, RDF_NIL, RDF_REST};
use crate::error::Result;
use crate::lex::{Keyword, TokenKind};

use super::super::path::{is_path_start, parse_property_path};
use super::super::Parser;

impl Parser<'_> {
    /// A string, numeric or boolean literal, if the current token is one.
    pub(crate) fn parse_literal(&mut self) -> Result<Option<RdfTerm>> {
        let span = self.stream.current_span();
        let term = match self.stream.peek_kind() {
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                RdfTerm::numeric(s.clone(), span)
            }
            TokenKind::Boolean(b) => RdfTerm::boolean(*b, span),
            TokenKind::String(s) => {
                let value = s.clone();
                self.stream.advance();
                return self.parse_string_suffix(value).map(Some);
            }
            _ => return Ok(None),
        };
        self.stream.advance();
        Ok(Some(term))
    }

    /// Language tag or datatype after a string that has been consumed.
    fn parse_string_suffix(&mut self, value: Arc<str>) -> Result<RdfTerm> {
        let start = self.stream.previous_span();
        if let TokenKind::LangTag(lang) = self.stream.peek_kind() {
            let lang = lang.clone();
            let span = start.union(self.stream.advance().span);
            return Ok(RdfTerm::lang_literal(value, lang, span));
        }
        if self.stream.match_token(&TokenKind::DoubleCaret) {
            let datatype = self.stream.expect_iri()?;
            let span = start.union(datatype.span);
            return Ok(RdfTerm::typed_literal(value, datatype, span));
        }
        Ok(RdfTerm::literal(value, start))
    }

    /// Variable or IRI (GRAPH / SERVICE names, DESCRIBE targets).
    pub(super) fn parse_var_or_iri(&mut self) -> Result<RdfTerm> {
        if let Some((name, span)) = self.stream.consume_var() {
            return Ok(RdfTerm::var(name, span));
        }
        self.stream
            .consume_iri()
            .ok_or_else(|| self.stream.error("variable or IRI"))
    }

    /// Any single-token graph term, including `[]` and `()`.
    fn parse_var_or_term(&mut self) -> Result<RdfTerm> {
        let span = self.stream.current_span();
        match self.stream.peek_kind() {
            TokenKind::Var(_) => return self.stream.expect_var(),
            TokenKind::BlankNodeLabel(label) => {
                let term = RdfTerm::blank_node(label.clone(), span);
                self.stream.advance();
                return Ok(term);
            }
            TokenKind::Anon => {
                self.stream.advance();
                return Ok(self.fresh_blank_node(span));
            }
            TokenKind::Nil => {
                self.stream.advance();
                return Ok(RdfTerm::nil(span));
            }
            _ => {}
        }
        if let Some(iri) = self.stream.consume_iri() {
            return Ok(iri);
        }
        self.parse_literal()?
            .ok_or_else(|| self.stream.error("RDF term"))
    }

    /// A VALUES cell: IRI, literal or `UNDEF` (`None`).
    pub(super) fn parse_data_value(&mut self) -> Result<Option<RdfTerm>> {
        if self.stream.match_keyword(Keyword::Undef) {
            return Ok(None);
        }
        if let Some(iri) = self.stream.consume_iri() {
            return Ok(Some(iri));
        }
        match self.parse_literal()? {
            Some(literal) => Ok(Some(literal)),
            None => Err(self.stream.error("data value or UNDEF")),
        }
    }

    pub(super) fn is_triples_start(&self) -> bool {
        self.stream.check_iri()
            || matches!(
                self.stream.peek_kind(),
                TokenKind::Var(_)
                    | TokenKind::BlankNodeLabel(_)
                    | TokenKind::Anon
                    | TokenKind::Nil
                    | TokenKind::LBracket
                    | TokenKind::LParen
                    | TokenKind::String(_)
                    | TokenKind::Integer(_)
                    | TokenKind::Decimal(_)
                    | TokenKind::Double(_)
                    | TokenKind::Boolean(_)
            )
    }

    fn is_verb_start(&self) -> bool {
        matches!(self.stream.peek_kind(), TokenKind::Var(_)) || is_path_start(&self.stream)
    }

    /// `TriplesSameSubjectPath`, appending every triple to `out`.
    pub(super) fn parse_triples_same_subject(&mut self, out: &mut Vec<TriplePattern>) -> Result<()> {
        match self.stream.peek_kind() {
            TokenKind::LBracket | TokenKind::LParen => {
                let subject = self.parse_triples_node(out)?;
                // A bracketed subject may stand alone: `[ :p :o ] .`
                if self.is_verb_start() {
                    self.parse_property_list(&subject, out)?;
                }
                Ok(())
            }
            _ => {
                let subject = self.parse_var_or_term()?;
                self.parse_property_list(&subject, out)
            }
        }
    }

    /// `Verb ObjectList ( ';' ( Verb ObjectList )? )*`
    fn parse_property_list(&mut self, subject: &RdfTerm, out: &mut Vec<TriplePattern>) -> Result<()> {
        loop {
            let verb = self.parse_verb()?;
            self.parse_object_list(subject, &verb, out)?;

            if !self.stream.match_token(&TokenKind::Semicolon) {
                return Ok(());
            }
            while self.stream.match_token(&TokenKind::Semicolon) {}
            if !self.is_verb_start() {
                return Ok(());
            }
        }
    }

    fn parse_object_list(
        &mut self,
        subject: &RdfTerm,
        verb: &Verb,
        out: &mut Vec<TriplePattern>,
    ) -> Result<()> {
        loop {
            let object = self.parse_graph_node(out)?;
            out.push(TriplePattern::new(subject.clone(), verb.clone(), object));
            if !self.stream.match_token(&TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    /// A variable, or a path that collapses to `Verb::Term` when it is a bare IRI.
    pub(super) fn parse_verb(&mut self) -> Result<Verb> {
        if let Some((name, span)) = self.stream.consume_var() {
            return Ok(Verb::Term(RdfTerm::var(name, span)));
        }
        if !is_path_start(&self.stream) {
            return Err(self.stream.error("predicate or property path"));
        }
        let path = parse_property_path(&mut self.stream)?;
        Ok(match path.as_simple_iri() {
            Some(iri) => Verb::Term(iri.clone()),
            None => Verb::Path(path),
        })
    }

    fn parse_graph_node(&mut self, out: &mut Vec<TriplePattern>) -> Result<RdfTerm> {
        match self.stream.peek_kind() {
            TokenKind::LBracket | TokenKind::LParen => self.parse_triples_node(out),
            _ => self.parse_var_or_term(),
        }
    }

    /// `[ PropertyList ]` or `( GraphNode+ )`.
    fn parse_triples_node(&mut self, out: &mut Vec<TriplePattern>) -> Result<RdfTerm> {
        let open = self.stream.advance();
        if open.kind == TokenKind::LBracket {
            let node = self.fresh_blank_node(open.span);
            self.parse_property_list(&node, out)?;
            self.stream.expect(&TokenKind::RBracket, "']'")?;
            return Ok(node);
        }

        let mut items = Vec::new();
        while !self.stream.check(&TokenKind::RParen) {
            items.push(self.parse_graph_node(out)?);
        }
        let close = self.stream.advance();
        if items.is_empty() {
            return Err(self.stream.error_at(&close, "collection member"));
        }

        let first = Verb::Term(RdfTerm::iri(RDF_FIRST, open.span));
        let rest = Verb::Term(RdfTerm::iri(RDF_REST, open.span));
        let cells: Vec<RdfTerm> = items
            .iter()
            .map(|item| self.fresh_blank_node(item.span))
            .collect();

        for (i, item) in items.into_iter().enumerate() {
            let next = match cells.get(i + 1) {
                Some(cell) => cell.clone(),
                None => RdfTerm::iri(RDF_NIL, close.span),
            };
            out.push(TriplePattern::new(cells[i].clone(), first.clone(), item));
            out.push(TriplePattern::new(cells[i].clone(), rest.clone(), next));
        }
        Ok(cells[0].clone())
    }
}
