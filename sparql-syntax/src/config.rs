//! Parser options.

use rand::Rng;
use serde::Deserialize;

/// How anonymous projected expressions get their variable name.
///
/// `SELECT COUNT(?x) WHERE {...}` projects an expression with no `AS ?v`
/// target, so the parser invents one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionNaming {
    /// `?{name}_{index}` with the 0-based projection index. Stable across parses.
    #[default]
    Positional,
    /// `?{name}_{n}` with `n` drawn from `0..=100`.
    Random,
}

impl ProjectionNaming {
    /// Generate a variable name (with `?` sigil) for an anonymous projection.
    ///
    /// `stem` is the function or aggregate name; it is lower-cased.
    pub fn variable_name(self, stem: &str, index: usize) -> String {
        let suffix = match self {
            ProjectionNaming::Positional => index,
            ProjectionNaming::Random => rand::thread_rng().gen_range(0..=100),
        };
        format!("?{}_{}", stem.to_lowercase(), suffix)
    }
}

/// Options for [`parse_with`](crate::parse_with).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub projection_naming: ProjectionNaming,
    /// Run prefix expansion with the query's own prologue before returning.
    pub expand_prefixes: bool,
}

impl ParserConfig {
    pub fn with_projection_naming(mut self, naming: ProjectionNaming) -> Self {
        self.projection_naming = naming;
        self
    }

    pub fn with_expand_prefixes(mut self, expand: bool) -> Self {
        self.expand_prefixes = expand;
        self
    }
}
