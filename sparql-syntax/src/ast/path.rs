//! Property paths.
//!
//! | Syntax | Node |
//! |--------|------|
//! | `p \| q` | [`PropertyPath::Alternative`] |
//! | `p / q` | [`PropertyPath::Sequence`] |
//! | `^p`, `p*`, `p+`, `p?` | [`PathTerm`] flags on one primary |
//! | `!p`, `!(p \| ^q)` | [`PathPrimary::Negated`] |
//!
//! Sequence and alternative are binary and left-associative, so `a/b/c`
//! is `Sequence(Sequence(a, b), c)`.

use std::fmt;

use super::term::RdfTerm;
use super::{VarSet, Variables};
use crate::span::SourceSpan;

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyPath {
    Alternative {
        left: Box<PropertyPath>,
        right: Box<PropertyPath>,
    },
    Sequence {
        left: Box<PropertyPath>,
        right: Box<PropertyPath>,
    },
    Elt(PathTerm),
}

impl PropertyPath {
    pub fn alternative(left: PropertyPath, right: PropertyPath) -> Self {
        PropertyPath::Alternative {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn sequence(left: PropertyPath, right: PropertyPath) -> Self {
        PropertyPath::Sequence {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The predicate term if this path is a bare IRI with no operators.
    pub fn as_simple_iri(&self) -> Option<&RdfTerm> {
        match self {
            PropertyPath::Elt(PathTerm {
                primary: PathPrimary::Iri(iri),
                inverse: false,
                modifier: None,
                ..
            }) => Some(iri),
            _ => None,
        }
    }
}

/// Repetition modifier on a path primary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathModifier {
    /// `?`
    ZeroOrOne,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl PathModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            PathModifier::ZeroOrOne => "?",
            PathModifier::ZeroOrMore => "*",
            PathModifier::OneOrMore => "+",
        }
    }
}

/// One path primary with its optional `^` and repetition modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct PathTerm {
    pub primary: PathPrimary,
    pub inverse: bool,
    pub modifier: Option<PathModifier>,
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathPrimary {
    /// An IRI, including `a` resolved to `rdf:type`.
    Iri(RdfTerm),
    /// `!iri`, `!^iri` or `!(iri | ^iri ...)`.
    Negated(Vec<NegatedPredicate>),
    /// A parenthesised sub-path.
    Group(Box<PropertyPath>),
}

/// One member of a negated property set.
#[derive(Clone, Debug, PartialEq)]
pub struct NegatedPredicate {
    pub iri: RdfTerm,
    pub inverse: bool,
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Alternative { left, right } => write!(f, "{left} | {right}"),
            PropertyPath::Sequence { left, right } => {
                fmt_sequence_operand(left, f)?;
                f.write_str(" / ")?;
                fmt_sequence_operand(right, f)
            }
            PropertyPath::Elt(term) => write!(f, "{term}"),
        }
    }
}

/// An alternative nested under a sequence needs brackets to keep its tier.
fn fmt_sequence_operand(path: &PropertyPath, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match path {
        PropertyPath::Alternative { .. } => write!(f, "({path})"),
        _ => write!(f, "{path}"),
    }
}

impl fmt::Display for PathTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            f.write_str("^")?;
        }
        match &self.primary {
            PathPrimary::Iri(iri) => iri.fmt_predicate(f)?,
            PathPrimary::Group(path) => write!(f, "({path})")?,
            PathPrimary::Negated(set) => {
                f.write_str("!")?;
                match set.as_slice() {
                    [single] if !single.inverse => write!(f, "{single}")?,
                    _ => {
                        f.write_str("(")?;
                        for (i, item) in set.iter().enumerate() {
                            if i > 0 {
                                f.write_str(" | ")?;
                            }
                            write!(f, "{item}")?;
                        }
                        f.write_str(")")?;
                    }
                }
            }
        }
        if let Some(modifier) = self.modifier {
            f.write_str(modifier.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for NegatedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            f.write_str("^")?;
        }
        self.iri.fmt_predicate(f)
    }
}

// Paths hold only IRIs.
impl Variables for PropertyPath {
    fn collect_variables(&self, _out: &mut VarSet) {}
}
