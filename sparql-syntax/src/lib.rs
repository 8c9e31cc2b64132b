//! # SPARQL Syntax
//!
//! A SPARQL 1.1 query front-end:
//! - Tokenizer with line/column error positions
//! - Recursive-descent parser producing a typed syntax tree
//! - Prefix expansion driven by the query's own prologue
//! - Canonical query text for every node through `Display`
//!
//! Only the read-only forms are parsed: SELECT, CONSTRUCT, ASK and DESCRIBE.
//!
//! ## Quick Start
//!
//! ```
//! use sparql_syntax::{parse_with, ParserConfig, Variables};
//!
//! let text = "PREFIX foaf: <http://xmlns.com/foaf/0.1/>
//!             SELECT ?name WHERE { ?s foaf:name ?name }";
//! let config = ParserConfig::default().with_expand_prefixes(true);
//! let query = parse_with(text, &config).unwrap();
//!
//! assert!(query.to_string().contains("<http://xmlns.com/foaf/0.1/name>"));
//! assert_eq!(query.free_variables().len(), 2);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod expand;
pub mod lex;
pub mod parse;
pub mod span;

// Re-exports
pub use ast::{Expression, Query, QueryForm, RdfTerm, Variables};
pub use config::{ParserConfig, ProjectionNaming};
pub use error::{ParseError, Result};
pub use expand::{expand, ExpandPrefixes, PrefixMap};
pub use parse::{parse, parse_expression, parse_with};
pub use span::SourceSpan;
