//! SPARQL query syntax tree.
//!
//! - [`term`]: variables, IRIs, literals, blank nodes, NIL
//! - [`path`]: property paths
//! - [`function`]: built-in and aggregate tables with their operand arity
//! - [`expr`]: FILTER / BIND / projection expressions
//! - [`pattern`]: triples, BGPs, group patterns, VALUES
//! - [`query`]: query forms and solution modifiers
//!
//! Every node renders its canonical query text through `Display` and
//! reports the variables it mentions through [`Variables`]. Prefix
//! expansion lives in [`crate::expand`].

use std::collections::BTreeSet;
use std::sync::Arc;

pub mod expr;
pub mod function;
pub mod path;
pub mod pattern;
pub mod query;
pub mod term;

pub use expr::{AggregateCall, BinaryOp, Expression, Function, FunctionCall, UnaryOp};
pub use function::{Aggregate, Builtin, OperatorKind};
pub use path::{NegatedPredicate, PathModifier, PathPrimary, PathTerm, PropertyPath};
pub use pattern::{
    BasicGraphPattern, Bind, Filter, GraphPattern, GroupGraphPattern, TriplePattern, ValuesClause,
    Verb,
};
pub use query::{
    DatasetClause, DescribeTargets, GroupCondition, OrderCondition, OrderDirection, Projection,
    ProjectionItem, Query, QueryForm, SelectClause, SelectModifier, SolutionModifiers, SubSelect,
};
pub use term::{RdfTerm, TermKind, RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE, XSD};

/// Variable names, sigil included, de-duplicated.
pub type VarSet = BTreeSet<Arc<str>>;

/// Variable extraction over any syntax node.
pub trait Variables {
    /// Add every variable this node mentions to `out`.
    fn collect_variables(&self, out: &mut VarSet);

    fn free_variables(&self) -> VarSet {
        let mut out = VarSet::new();
        self.collect_variables(&mut out);
        out
    }
}
