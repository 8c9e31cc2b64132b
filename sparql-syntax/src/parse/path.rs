//! Property path parsing.
//!
//! ```text
//! Path         ::= PathSequence ( '|' PathSequence )*
//! PathSequence ::= PathEltOrInverse ( '/' PathEltOrInverse )*
//! PathEltOrInverse ::= '^'? PathPrimary PathMod?
//! PathMod      ::= '*' | '+' | '?'
//! PathPrimary  ::= iri | 'a' | '!' PathNegatedPropertySet | '(' Path ')'
//! PathNegatedPropertySet ::= PathOneInPropertySet
//!                          | '(' ( PathOneInPropertySet ( '|' PathOneInPropertySet )* )? ')'
//! PathOneInPropertySet   ::= '^'? ( iri | 'a' )
//! ```
//!
//! Both binary tiers fold to the left.

use crate::ast::{NegatedPredicate, PathModifier, PathPrimary, PathTerm, PropertyPath, RdfTerm};
use crate::error::Result;
use crate::lex::TokenKind;

use super::stream::TokenStream;

/// Whether the current token can start a path.
pub(crate) fn is_path_start(tokens: &TokenStream) -> bool {
    tokens.check_iri()
        || matches!(
            tokens.peek_kind(),
            TokenKind::A | TokenKind::Caret | TokenKind::Bang | TokenKind::LParen
        )
}

pub(crate) fn parse_property_path(tokens: &mut TokenStream) -> Result<PropertyPath> {
    let mut left = parse_path_sequence(tokens)?;
    while tokens.match_token(&TokenKind::Pipe) {
        let right = parse_path_sequence(tokens)?;
        left = PropertyPath::alternative(left, right);
    }
    Ok(left)
}

fn parse_path_sequence(tokens: &mut TokenStream) -> Result<PropertyPath> {
    let mut left = PropertyPath::Elt(parse_path_elt(tokens)?);
    while tokens.match_token(&TokenKind::Slash) {
        let right = PropertyPath::Elt(parse_path_elt(tokens)?);
        left = PropertyPath::sequence(left, right);
    }
    Ok(left)
}

fn parse_path_elt(tokens: &mut TokenStream) -> Result<PathTerm> {
    let start = tokens.current_span();
    let inverse = tokens.match_token(&TokenKind::Caret);
    let primary = parse_path_primary(tokens)?;
    let modifier = match tokens.peek_kind() {
        TokenKind::Star => Some(PathModifier::ZeroOrMore),
        TokenKind::Plus => Some(PathModifier::OneOrMore),
        TokenKind::Question => Some(PathModifier::ZeroOrOne),
        _ => None,
    };
    if modifier.is_some() {
        tokens.advance();
    }
    Ok(PathTerm {
        primary,
        inverse,
        modifier,
        span: start.union(tokens.previous_span()),
    })
}

fn parse_path_primary(tokens: &mut TokenStream) -> Result<PathPrimary> {
    if tokens.match_token(&TokenKind::Bang) {
        return parse_negated_set(tokens);
    }
    if tokens.match_token(&TokenKind::LParen) {
        let inner = parse_property_path(tokens)?;
        tokens.expect(&TokenKind::RParen, "')' after path")?;
        return Ok(PathPrimary::Group(Box::new(inner)));
    }
    parse_path_iri(tokens).map(PathPrimary::Iri)
}

/// An IRI or `a` in path position.
fn parse_path_iri(tokens: &mut TokenStream) -> Result<RdfTerm> {
    if tokens.check(&TokenKind::A) {
        let span = tokens.advance().span;
        return Ok(RdfTerm::rdf_type(span));
    }
    tokens
        .consume_iri()
        .ok_or_else(|| tokens.error("IRI, 'a' or path"))
}

fn parse_negated_set(tokens: &mut TokenStream) -> Result<PathPrimary> {
    // `!()` lexes as NIL.
    if tokens.match_token(&TokenKind::Nil) {
        return Ok(PathPrimary::Negated(Vec::new()));
    }
    if !tokens.match_token(&TokenKind::LParen) {
        return Ok(PathPrimary::Negated(vec![parse_one_in_set(tokens)?]));
    }
    let mut set = vec![parse_one_in_set(tokens)?];
    while tokens.match_token(&TokenKind::Pipe) {
        set.push(parse_one_in_set(tokens)?);
    }
    tokens.expect(&TokenKind::RParen, "'|' or ')' in negated property set")?;
    Ok(PathPrimary::Negated(set))
}

fn parse_one_in_set(tokens: &mut TokenStream) -> Result<NegatedPredicate> {
    let inverse = tokens.match_token(&TokenKind::Caret);
    let iri = parse_path_iri(tokens)?;
    Ok(NegatedPredicate { iri, inverse })
}
