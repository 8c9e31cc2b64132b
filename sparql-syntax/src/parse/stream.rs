//! Token stream for parsing.
//!
//! `TokenStream` wraps the lexer output and provides lookahead, matching and
//! position save/restore for the few productions that parse by trial. Every
//! failure is turned into a [`ParseError`] positioned at the current token.

use std::sync::Arc;

use crate::ast::RdfTerm;
use crate::error::{ParseError, Result};
use crate::lex::{Keyword, Token, TokenKind};
use crate::span::{LineIndex, SourceSpan};

#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    /// Maps token offsets to line/column for errors.
    index: LineIndex,
}

impl TokenStream {
    /// Create a stream over `tokens` lexed from `source`.
    ///
    /// An end-of-input token is appended if the lexer did not produce one.
    pub fn new(source: &str, mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            tokens.push(Token::new(TokenKind::Eof, source.len(), source.len()));
        }
        Self {
            tokens,
            pos: 0,
            index: LineIndex::new(source),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restore a position saved with [`position`](Self::position).
    pub fn restore(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len() - 1);
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// The current token; stays on end-of-input once reached.
    pub fn peek(&self) -> &Token {
        self.peek_n(0)
    }

    /// The nth token ahead (0 = current).
    pub fn peek_n(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub fn current_span(&self) -> SourceSpan {
        self.peek().span
    }

    pub fn previous_span(&self) -> SourceSpan {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].span,
            None => SourceSpan::point(0),
        }
    }

    /// Consume the current token and return it.
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    /// Whether the current token has the same variant as `kind`
    /// (payloads are not compared).
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    pub fn check_keyword(&self, kw: Keyword) -> bool {
        self.peek_kind().is_keyword(kw)
    }

    pub fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn match_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind` or fail with `expected`.
    pub fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    pub fn expect_keyword(&mut self, kw: Keyword) -> Result<Token> {
        if self.check_keyword(kw) {
            Ok(self.advance())
        } else {
            Err(self.error(kw.as_str()))
        }
    }

    /// A syntax error at the current token.
    pub fn error(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::syntax(&self.index, token.span, token.kind.to_string(), expected)
    }

    /// A syntax error at an earlier token.
    pub fn error_at(&self, token: &Token, expected: impl Into<String>) -> ParseError {
        ParseError::syntax(&self.index, token.span, token.kind.to_string(), expected)
    }

    /// A syntax error over an already parsed construct.
    pub fn error_over(
        &self,
        span: SourceSpan,
        found: impl Into<String>,
        expected: impl Into<String>,
    ) -> ParseError {
        ParseError::syntax(&self.index, span, found, expected)
    }

    pub fn consume_var(&mut self) -> Option<(Arc<str>, SourceSpan)> {
        match self.peek_kind() {
            TokenKind::Var(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Some((name, span))
            }
            _ => None,
        }
    }

    /// Consume a variable as a term, or fail.
    pub fn expect_var(&mut self) -> Result<RdfTerm> {
        match self.consume_var() {
            Some((name, span)) => Ok(RdfTerm::var(name, span)),
            None => Err(self.error("variable")),
        }
    }

    /// Whether the current token is an IRI in either form.
    pub fn check_iri(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } | TokenKind::PrefixedNameNs(_)
        )
    }

    /// Consume an IRI (`<...>`, `prefix:local` or `prefix:`) as a term.
    pub fn consume_iri(&mut self) -> Option<RdfTerm> {
        let span = self.current_span();
        let term = match self.peek_kind() {
            TokenKind::Iri(iri) => RdfTerm::iri(iri.clone(), span),
            TokenKind::PrefixedName { prefix, local } => RdfTerm::prefixed(prefix, local, span),
            TokenKind::PrefixedNameNs(prefix) => RdfTerm::prefixed(prefix, "", span),
            _ => return None,
        };
        self.advance();
        Some(term)
    }

    pub fn expect_iri(&mut self) -> Result<RdfTerm> {
        match self.consume_iri() {
            Some(iri) => Ok(iri),
            None => Err(self.error("IRI")),
        }
    }

    /// Consume a non-negative integer (LIMIT / OFFSET).
    pub fn expect_count(&mut self) -> Result<i64> {
        if let TokenKind::Integer(lexical) = self.peek_kind() {
            let unsigned = !lexical.starts_with(['+', '-']);
            if let Some(n) = lexical.parse::<i64>().ok().filter(|_| unsigned) {
                self.advance();
                return Ok(n);
            }
        }
        Err(self.error("non-negative integer"))
    }
}
