//! Byte spans over the query text and their line/column resolution.
//!
//! Tokens and AST nodes carry a [`SourceSpan`]. Errors resolve the span of
//! the offending token through a [`LineIndex`] built once per parse call.

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the query text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`.
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The text covered by this span, clamped to the source length.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start.min(source.len());
        let end = self.end.min(source.len());
        source.get(start..end).unwrap_or("")
    }
}

impl From<std::ops::Range<usize>> for SourceSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Offsets of every line start in a source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Resolve a byte offset to a 1-based line and byte column.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        LineCol {
            line: line as u32 + 1,
            col: offset.saturating_sub(line_start) as u32 + 1,
        }
    }

    /// Text of a 1-based line, without its trailing newline.
    pub fn line_text<'a>(&self, line: u32, source: &'a str) -> &'a str {
        let idx = line.saturating_sub(1) as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(source.len());
        source
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// 1-based line/column position. Columns count bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_union_and_len() {
        let span = SourceSpan::new(5, 10).union(SourceSpan::new(8, 15));
        assert_eq!(span, SourceSpan::new(5, 15));
        assert_eq!(span.len(), 10);
        assert!(SourceSpan::point(3).is_empty());
    }

    #[test]
    fn test_span_slice_clamps() {
        assert_eq!(SourceSpan::new(6, 11).slice("hello world"), "world");
        assert_eq!(SourceSpan::new(3, 100).slice("hello"), "lo");
        assert_eq!(SourceSpan::new(100, 105).slice("hello"), "");
    }

    #[test]
    fn test_line_index() {
        let source = "SELECT ?x\nWHERE {\n  ?x ?y ?z }";
        let index = LineIndex::new(source);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(0), LineCol::new(1, 1));
        assert_eq!(index.line_col(10), LineCol::new(2, 1));
        assert_eq!(index.line_col(20), LineCol::new(3, 3));
        assert_eq!(index.line_text(2, source), "WHERE {");
        assert_eq!(index.line_text(9, source), "");
    }
}
