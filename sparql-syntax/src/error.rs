//! Error types for SPARQL query parsing.

use serde::Serialize;

use crate::span::{LineIndex, SourceSpan};

/// A fatal parse failure. There is no partial result alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// No token rule matches the input at this point.
    #[error("lexical error at line {line}, column {column}: unexpected {text:?}")]
    Lex { line: u32, column: u32, text: String },

    /// A token the grammar cannot accept at this position.
    #[error("syntax error at line {line}, column {column}: unexpected {token}, expected {expected}")]
    Syntax {
        line: u32,
        column: u32,
        token: String,
        expected: String,
    },
}

/// Result type for parse operations.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

impl ParseError {
    pub(crate) fn lex(index: &LineIndex, offset: usize, text: impl Into<String>) -> Self {
        let pos = index.line_col(offset);
        Self::Lex {
            line: pos.line,
            column: pos.col,
            text: text.into(),
        }
    }

    pub(crate) fn syntax(
        index: &LineIndex,
        span: SourceSpan,
        token: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        let pos = index.line_col(span.start);
        Self::Syntax {
            line: pos.line,
            column: pos.col,
            token: token.into(),
            expected: expected.into(),
        }
    }

    /// 1-based line of the offending text.
    pub fn line(&self) -> u32 {
        match self {
            Self::Lex { line, .. } | Self::Syntax { line, .. } => *line,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            Self::Lex { column, .. } | Self::Syntax { column, .. } => *column,
        }
    }

    pub fn is_lex(&self) -> bool {
        matches!(self, Self::Lex { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Render the error with the offending source line and a caret.
    ///
    /// ```text
    /// syntax error at line 1, column 20: unexpected `}`, expected object term
    ///   |
    /// 1 | SELECT ?x WHERE { ?x ?y }
    ///   |                         ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let index = LineIndex::new(source);
        let line = self.line();
        let gutter = " ".repeat(line.to_string().len());
        let pointer = " ".repeat(self.column().saturating_sub(1) as usize);
        format!(
            "{self}\n{gutter} |\n{line} | {}\n{gutter} | {pointer}^",
            index.line_text(line, source)
        )
    }
}
