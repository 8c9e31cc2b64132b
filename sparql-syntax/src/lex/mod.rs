//! Lexical analysis of SPARQL query text.
//!
//! The lexer is greedy with a fixed priority order: IRIs, multi-character
//! operators, variables, blank nodes, NIL, language tags, prefixed names and
//! reserved words, strings, numbers, then single-character punctuation.
//! A signed number such as `-1` is one token; the grammar splits it back into
//! an operator where an additive operator is expected.
//!
//! ```
//! use sparql_syntax::lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("SELECT ?x WHERE { ?x a :Person }").unwrap();
//! assert!(matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));
//! ```

pub(crate) mod chars;
mod lexer;
mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{word_token, Keyword, Token, TokenKind};
