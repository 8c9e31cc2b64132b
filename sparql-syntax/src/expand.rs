//! Prefix expansion.
//!
//! [`expand`] walks any syntax node and rewrites each short-form IRI
//! (`prefix:local`) into its absolute form using a [`PrefixMap`]. Each term
//! is rewritten at most once: the `expanded` flag makes repeat calls no-ops.
//! Terms whose prefix is not declared are left as written.

use std::fmt;
use std::sync::Arc;

use crate::ast::{
    AggregateCall, BasicGraphPattern, Bind, DatasetClause, DescribeTargets, Expression, Filter,
    Function, FunctionCall, GraphPattern, GroupCondition, GroupGraphPattern, OrderCondition,
    PathPrimary, PathTerm, Projection, ProjectionItem, PropertyPath, Query, QueryForm, RdfTerm,
    SelectClause, SolutionModifiers, SubSelect, TriplePattern, ValuesClause, Verb, RDF_TYPE,
};

/// Declared prefixes in declaration order.
///
/// `BASE` is stored under [`PrefixMap::BASE_KEY`] and the unlabelled
/// `PREFIX :` under [`PrefixMap::DEFAULT_KEY`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(Arc<str>, Arc<str>)>,
}

impl PrefixMap {
    pub const BASE_KEY: &'static str = "[BASE]";
    pub const DEFAULT_KEY: &'static str = "<noname>";

    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` (without colon; `""` for the unlabelled prefix).
    /// Re-declaring a prefix replaces its IRI in place.
    pub fn insert(&mut self, prefix: &str, iri: impl Into<Arc<str>>) {
        let key = if prefix.is_empty() {
            Self::DEFAULT_KEY
        } else {
            prefix
        };
        self.put(key, iri.into());
    }

    pub fn set_base(&mut self, iri: impl Into<Arc<str>>) {
        self.put(Self::BASE_KEY, iri.into());
    }

    fn put(&mut self, key: &str, iri: Arc<str>) {
        match self.entries.iter_mut().find(|(k, _)| &**k == key) {
            Some(entry) => entry.1 = iri,
            None => self.entries.push((Arc::from(key), iri)),
        }
    }

    /// Look up a raw key, including the reserved ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, iri)| &**iri)
    }

    /// Namespace IRI for a prefix as written before the colon.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            self.get(Self::DEFAULT_KEY)
        } else {
            self.get(prefix)
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.get(Self::BASE_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (&**k, &**v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One `BASE` / `PREFIX` line per entry, each newline-terminated.
impl fmt::Display for PrefixMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, iri) in self.iter() {
            match key {
                Self::BASE_KEY => writeln!(f, "BASE <{iri}>")?,
                Self::DEFAULT_KEY => writeln!(f, "PREFIX : <{iri}>")?,
                prefix => writeln!(f, "PREFIX {prefix}: <{iri}>")?,
            }
        }
        Ok(())
    }
}

/// In-place prefix expansion.
pub trait ExpandPrefixes {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap);
}

/// Expand every short-form IRI reachable from `node`.
pub fn expand<T: ExpandPrefixes + ?Sized>(node: &mut T, prefixes: &PrefixMap) {
    node.expand_prefixes(prefixes);
}

impl<T: ExpandPrefixes> ExpandPrefixes for [T] {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.iter_mut().for_each(|item| item.expand_prefixes(prefixes));
    }
}

impl<T: ExpandPrefixes> ExpandPrefixes for Option<T> {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        if let Some(inner) = self {
            inner.expand_prefixes(prefixes);
        }
    }
}

impl ExpandPrefixes for RdfTerm {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        if let Some(datatype) = self.datatype.as_mut() {
            datatype.expand_prefixes(prefixes);
        }
        if self.expanded || !self.is_iri() {
            return;
        }
        if &*self.value == "a" {
            self.value = Arc::from(RDF_TYPE);
            self.expanded = true;
            return;
        }
        let Some(prefix) = self.prefix.as_deref() else {
            return;
        };
        let local = self.value.split_once(':').map_or("", |(_, local)| local);
        match prefixes.resolve(prefix) {
            Some(namespace) => {
                self.value = Arc::from(format!("{namespace}{local}"));
                self.expanded = true;
            }
            None => {
                tracing::warn!(prefix, term = %self.value, "undeclared prefix, term left unexpanded");
            }
        }
    }
}

impl ExpandPrefixes for PropertyPath {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        match self {
            PropertyPath::Alternative { left, right } | PropertyPath::Sequence { left, right } => {
                left.expand_prefixes(prefixes);
                right.expand_prefixes(prefixes);
            }
            PropertyPath::Elt(term) => term.expand_prefixes(prefixes),
        }
    }
}

impl ExpandPrefixes for PathTerm {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        match &mut self.primary {
            PathPrimary::Iri(iri) => iri.expand_prefixes(prefixes),
            PathPrimary::Negated(set) => set
                .iter_mut()
                .for_each(|item| item.iri.expand_prefixes(prefixes)),
            PathPrimary::Group(path) => path.expand_prefixes(prefixes),
        }
    }
}

impl ExpandPrefixes for Expression {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        match self {
            Expression::Term(term) => term.expand_prefixes(prefixes),
            Expression::Unary { operand, .. } => operand.expand_prefixes(prefixes),
            Expression::Binary { left, right, .. } => {
                left.expand_prefixes(prefixes);
                right.expand_prefixes(prefixes);
            }
            Expression::In { expr, list, .. } => {
                expr.expand_prefixes(prefixes);
                list.expand_prefixes(prefixes);
            }
            Expression::Call(call) => call.expand_prefixes(prefixes),
            Expression::Aggregate(agg) => agg.expand_prefixes(prefixes),
            Expression::Exists { pattern, .. } => pattern.expand_prefixes(prefixes),
        }
    }
}

impl ExpandPrefixes for FunctionCall {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        if let Function::Extension(iri) = &mut self.function {
            iri.expand_prefixes(prefixes);
        }
        self.args.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for AggregateCall {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        if let Some(arg) = self.arg.as_mut() {
            arg.expand_prefixes(prefixes);
        }
    }
}

impl ExpandPrefixes for Verb {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        match self {
            Verb::Term(term) => term.expand_prefixes(prefixes),
            Verb::Path(path) => path.expand_prefixes(prefixes),
        }
    }
}

impl ExpandPrefixes for TriplePattern {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.subject.expand_prefixes(prefixes);
        self.predicate.expand_prefixes(prefixes);
        self.object.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for Filter {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.expression.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for Bind {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.expression.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for BasicGraphPattern {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.triples.expand_prefixes(prefixes);
        self.filters.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for GroupGraphPattern {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.patterns.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for GraphPattern {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        match self {
            GraphPattern::Basic(bgp) => bgp.expand_prefixes(prefixes),
            GraphPattern::Group(group)
            | GraphPattern::Optional(group)
            | GraphPattern::Minus(group) => group.expand_prefixes(prefixes),
            GraphPattern::Union(alternatives) => alternatives.expand_prefixes(prefixes),
            GraphPattern::Graph { name, pattern } | GraphPattern::Service { name, pattern, .. } => {
                name.expand_prefixes(prefixes);
                pattern.expand_prefixes(prefixes);
            }
            GraphPattern::Bind(bind) => bind.expand_prefixes(prefixes),
            GraphPattern::Values(values) => values.expand_prefixes(prefixes),
            GraphPattern::SubSelect(sub) => sub.expand_prefixes(prefixes),
        }
    }
}

impl ExpandPrefixes for ValuesClause {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        for row in &mut self.rows {
            row.iter_mut()
                .for_each(|value| value.expand_prefixes(prefixes));
        }
    }
}

impl ExpandPrefixes for SelectClause {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        if let Projection::Items(items) = &mut self.projection {
            for item in items {
                if let ProjectionItem::Expr { expression, .. } = item {
                    expression.expand_prefixes(prefixes);
                }
            }
        }
    }
}

impl ExpandPrefixes for GroupCondition {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.expression.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for OrderCondition {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.expression.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for SolutionModifiers {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.group_by.expand_prefixes(prefixes);
        self.having.expand_prefixes(prefixes);
        self.order_by.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for SubSelect {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.select.expand_prefixes(prefixes);
        self.where_clause.expand_prefixes(prefixes);
        self.modifiers.expand_prefixes(prefixes);
        self.values.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for DatasetClause {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.iri.expand_prefixes(prefixes);
    }
}

impl ExpandPrefixes for QueryForm {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        match self {
            QueryForm::Select(select) => select.expand_prefixes(prefixes),
            QueryForm::Construct { template } => {
                if let Some(template) = template {
                    template.expand_prefixes(prefixes);
                }
            }
            QueryForm::Ask => {}
            QueryForm::Describe { targets } => {
                if let DescribeTargets::Terms(terms) = targets {
                    terms.expand_prefixes(prefixes);
                }
            }
        }
    }
}

impl ExpandPrefixes for Query {
    fn expand_prefixes(&mut self, prefixes: &PrefixMap) {
        self.form.expand_prefixes(prefixes);
        self.dataset.expand_prefixes(prefixes);
        self.where_clause.expand_prefixes(prefixes);
        self.modifiers.expand_prefixes(prefixes);
        self.values.expand_prefixes(prefixes);
    }
}
