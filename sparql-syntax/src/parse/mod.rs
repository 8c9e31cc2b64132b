//! SPARQL parser.
//!
//! Parses tokenized SPARQL into the typed AST. All state lives in one
//! [`Parser`] value per call, so parsing is re-entrant.
//!
//! ## Usage
//!
//! ```
//! use sparql_syntax::parse;
//!
//! let query = parse("SELECT ?name WHERE { ?s <http://example.org/name> ?name }").unwrap();
//! assert_eq!(query.form().keyword(), "SELECT");
//! ```

mod expr;
mod path;
mod query;
mod stream;

pub use stream::TokenStream;

use crate::ast::{Expression, Query, RdfTerm};
use crate::config::ParserConfig;
use crate::error::Result;
use crate::lex::{tokenize, TokenKind};
use crate::span::SourceSpan;

/// Parse a query with the default configuration.
pub fn parse(text: &str) -> Result<Query> {
    parse_with(text, &ParserConfig::default())
}

/// Parse a query, optionally expanding prefixes afterwards.
pub fn parse_with(text: &str, config: &ParserConfig) -> Result<Query> {
    let span = tracing::debug_span!("sparql_parse", len = text.len());
    let _guard = span.enter();

    let tokens = tokenize(text)?;
    let mut parser = Parser::new(TokenStream::new(text, tokens), config);
    let mut query = parser.parse_query()?;

    if config.expand_prefixes {
        query.expand_own_prefixes();
    }
    Ok(query)
}

/// Parse a standalone expression, as written in a FILTER.
pub fn parse_expression(text: &str) -> Result<Expression> {
    let config = ParserConfig::default();
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(TokenStream::new(text, tokens), &config);
    let expr = parser.parse_expression()?;
    parser.stream.expect(&TokenKind::Eof, "end of input")?;
    Ok(expr)
}

/// Saved parser state for trial parsing.
#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    anon_count: usize,
}

/// The grammar engine. Productions are spread over the `expr`, `path` and
/// `query` submodules as `impl Parser` blocks.
pub(crate) struct Parser<'a> {
    stream: TokenStream,
    config: &'a ParserConfig,
    /// Counter for blank nodes minted by `[]`, `[ ... ]` and collections.
    anon_count: usize,
}

impl<'a> Parser<'a> {
    fn new(stream: TokenStream, config: &'a ParserConfig) -> Self {
        Self {
            stream,
            config,
            anon_count: 0,
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.stream.position(),
            anon_count: self.anon_count,
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.stream.restore(checkpoint.pos);
        self.anon_count = checkpoint.anon_count;
    }

    /// Run `f`, rewinding the stream and blank node counter if it fails.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.checkpoint();
        let result = f(self);
        if result.is_err() {
            self.rewind(checkpoint);
        }
        result
    }

    /// A fresh blank node, labelled `anon{n}` in parse order.
    fn fresh_blank_node(&mut self, span: SourceSpan) -> RdfTerm {
        let label = format!("anon{}", self.anon_count);
        self.anon_count += 1;
        RdfTerm::blank_node(label, span)
    }
}
