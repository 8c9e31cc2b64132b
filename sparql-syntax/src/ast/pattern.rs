//! Graph patterns.
//!
//! A `{ ... }` block is a [`GroupGraphPattern`]: an ordered sequence of
//! [`GraphPattern`] elements. Runs of triples and adjacent FILTERs are
//! coalesced into one [`BasicGraphPattern`] at parse time.

use std::fmt;

use super::expr::Expression;
use super::path::PropertyPath;
use super::query::SubSelect;
use super::term::RdfTerm;
use super::{VarSet, Variables};
use crate::span::SourceSpan;

/// Predicate slot of a triple pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Verb {
    /// A variable or a plain IRI (including `a`).
    Term(RdfTerm),
    /// Anything using path operators.
    Path(PropertyPath),
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Term(term) => term.fmt_predicate(f),
            Verb::Path(path) => write!(f, "{path}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TriplePattern {
    pub subject: RdfTerm,
    pub predicate: Verb,
    pub object: RdfTerm,
    pub span: SourceSpan,
}

impl TriplePattern {
    pub fn new(subject: RdfTerm, predicate: Verb, object: RdfTerm) -> Self {
        let span = subject.span.union(object.span);
        Self {
            subject,
            predicate,
            object,
            span,
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub expression: Expression,
    pub span: SourceSpan,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FILTER ")?;
        self.expression.fmt_constraint(f)
    }
}

/// `BIND (expr AS ?var)`
#[derive(Clone, Debug, PartialEq)]
pub struct Bind {
    pub expression: Expression,
    pub variable: RdfTerm,
    pub span: SourceSpan,
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BIND ({} AS {})", self.expression, self.variable)
    }
}

/// Triples plus the filters scoped to them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicGraphPattern {
    pub triples: Vec<TriplePattern>,
    pub filters: Vec<Filter>,
}

impl BasicGraphPattern {
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty() && self.filters.is_empty()
    }
}

impl fmt::Display for BasicGraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for triple in &self.triples {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{triple} .")?;
            first = false;
        }
        for filter in &self.filters {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{filter}")?;
            first = false;
        }
        Ok(())
    }
}

/// The ordered contents of one `{ ... }` block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupGraphPattern {
    pub patterns: Vec<GraphPattern>,
    pub span: SourceSpan,
}

impl GroupGraphPattern {
    pub fn new(patterns: Vec<GraphPattern>, span: SourceSpan) -> Self {
        Self { patterns, span }
    }

    /// All triples of the top-level BGPs, in order.
    pub fn triples(&self) -> impl Iterator<Item = &TriplePattern> {
        self.patterns.iter().flat_map(|p| match p {
            GraphPattern::Basic(bgp) => bgp.triples.as_slice(),
            _ => &[][..],
        })
    }

    /// The sub-select if this block is `{ SELECT ... }`.
    pub fn as_sub_select(&self) -> Option<&SubSelect> {
        match self.patterns.as_slice() {
            [GraphPattern::SubSelect(sub)] => Some(sub),
            _ => None,
        }
    }
}

impl fmt::Display for GroupGraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patterns.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        for (i, pattern) in self.patterns.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{pattern}")?;
        }
        f.write_str(" }")
    }
}

/// One element of a group's pattern sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphPattern {
    Basic(BasicGraphPattern),
    /// A nested `{ ... }` that is not part of a UNION.
    Group(GroupGraphPattern),
    Optional(GroupGraphPattern),
    /// Two or more alternatives, flattened.
    Union(Vec<GroupGraphPattern>),
    Minus(GroupGraphPattern),
    Graph {
        name: RdfTerm,
        pattern: GroupGraphPattern,
    },
    Service {
        silent: bool,
        name: RdfTerm,
        pattern: GroupGraphPattern,
    },
    Bind(Bind),
    Values(ValuesClause),
    SubSelect(Box<SubSelect>),
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphPattern::Basic(bgp) => write!(f, "{bgp}"),
            GraphPattern::Group(group) => write!(f, "{group}"),
            GraphPattern::Optional(group) => write!(f, "OPTIONAL {group}"),
            GraphPattern::Union(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" UNION ")?;
                    }
                    write!(f, "{alt}")?;
                }
                Ok(())
            }
            GraphPattern::Minus(group) => write!(f, "MINUS {group}"),
            GraphPattern::Graph { name, pattern } => write!(f, "GRAPH {name} {pattern}"),
            GraphPattern::Service {
                silent,
                name,
                pattern,
            } => {
                let silent = if *silent { "SILENT " } else { "" };
                write!(f, "SERVICE {silent}{name} {pattern}")
            }
            GraphPattern::Bind(bind) => write!(f, "{bind}"),
            GraphPattern::Values(values) => write!(f, "{values}"),
            GraphPattern::SubSelect(sub) => write!(f, "{sub}"),
        }
    }
}

/// Inline data: `VALUES (?a ?b) { (1 2) (UNDEF 3) }`.
///
/// A row slot of `None` is `UNDEF`. An empty variable list with empty rows
/// is the NIL form `VALUES () { () }`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValuesClause {
    pub variables: Vec<RdfTerm>,
    pub rows: Vec<Vec<Option<RdfTerm>>>,
    pub span: SourceSpan,
}

impl ValuesClause {
    /// No VALUES clause was written.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.rows.is_empty()
    }
}

impl fmt::Display for ValuesClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VALUES (")?;
        for (i, var) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{var}")?;
        }
        f.write_str(") {")?;
        for row in &self.rows {
            f.write_str(" (")?;
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                match value {
                    Some(term) => write!(f, "{term}")?,
                    None => f.write_str("UNDEF")?,
                }
            }
            f.write_str(")")?;
        }
        f.write_str(" }")
    }
}

impl Variables for TriplePattern {
    fn collect_variables(&self, out: &mut VarSet) {
        self.subject.collect_variables(out);
        if let Verb::Term(term) = &self.predicate {
            term.collect_variables(out);
        }
        self.object.collect_variables(out);
    }
}

impl Variables for BasicGraphPattern {
    fn collect_variables(&self, out: &mut VarSet) {
        self.triples.iter().for_each(|t| t.collect_variables(out));
        self.filters
            .iter()
            .for_each(|filter| filter.expression.collect_variables(out));
    }
}

impl Variables for GroupGraphPattern {
    fn collect_variables(&self, out: &mut VarSet) {
        self.patterns.iter().for_each(|p| p.collect_variables(out));
    }
}

impl Variables for GraphPattern {
    fn collect_variables(&self, out: &mut VarSet) {
        match self {
            GraphPattern::Basic(bgp) => bgp.collect_variables(out),
            GraphPattern::Group(group)
            | GraphPattern::Optional(group)
            | GraphPattern::Minus(group) => group.collect_variables(out),
            GraphPattern::Union(alternatives) => {
                alternatives.iter().for_each(|g| g.collect_variables(out))
            }
            GraphPattern::Graph { name, pattern }
            | GraphPattern::Service { name, pattern, .. } => {
                name.collect_variables(out);
                pattern.collect_variables(out);
            }
            GraphPattern::Bind(bind) => {
                bind.expression.collect_variables(out);
                bind.variable.collect_variables(out);
            }
            GraphPattern::Values(values) => values.collect_variables(out),
            GraphPattern::SubSelect(sub) => sub.collect_variables(out),
        }
    }
}

impl Variables for ValuesClause {
    fn collect_variables(&self, out: &mut VarSet) {
        self.variables.iter().for_each(|v| v.collect_variables(out));
    }
}
