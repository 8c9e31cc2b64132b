//! Query forms, projections and solution modifiers.

use std::fmt;

use super::expr::Expression;
use super::pattern::{GroupGraphPattern, TriplePattern, ValuesClause};
use super::term::RdfTerm;
use super::{VarSet, Variables};
use crate::expand::PrefixMap;
use crate::span::SourceSpan;

/// One parsed query: prologue, form, dataset, WHERE, modifiers and VALUES.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub prefixes: PrefixMap,
    pub form: QueryForm,
    pub dataset: Vec<DatasetClause>,
    /// Absent only for `DESCRIBE` without a WHERE clause.
    pub where_clause: Option<GroupGraphPattern>,
    pub modifiers: SolutionModifiers,
    pub values: ValuesClause,
    pub span: SourceSpan,
}

impl Query {
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    pub fn form(&self) -> &QueryForm {
        &self.form
    }

    pub fn dataset(&self) -> &[DatasetClause] {
        &self.dataset
    }

    pub fn where_clause(&self) -> Option<&GroupGraphPattern> {
        self.where_clause.as_ref()
    }

    pub fn group_by(&self) -> &[GroupCondition] {
        &self.modifiers.group_by
    }

    pub fn having(&self) -> &[Expression] {
        &self.modifiers.having
    }

    pub fn order_by(&self) -> &[OrderCondition] {
        &self.modifiers.order_by
    }

    /// `-1` when no LIMIT was given.
    pub fn limit(&self) -> i64 {
        self.modifiers.limit
    }

    /// `-1` when no OFFSET was given.
    pub fn offset(&self) -> i64 {
        self.modifiers.offset
    }

    pub fn values(&self) -> &ValuesClause {
        &self.values
    }

    /// Expand every prefixed name using the query's own prologue.
    pub fn expand_own_prefixes(&mut self) {
        let prefixes = self.prefixes.clone();
        crate::expand::expand(self, &prefixes);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueryForm {
    Select(SelectClause),
    /// `template` is `None` for the `CONSTRUCT WHERE { ... }` short form,
    /// whose template is the WHERE block's triples.
    Construct {
        template: Option<Vec<TriplePattern>>,
    },
    Ask,
    Describe {
        targets: DescribeTargets,
    },
}

impl QueryForm {
    pub fn keyword(&self) -> &'static str {
        match self {
            QueryForm::Select(_) => "SELECT",
            QueryForm::Construct { .. } => "CONSTRUCT",
            QueryForm::Ask => "ASK",
            QueryForm::Describe { .. } => "DESCRIBE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DescribeTargets {
    /// `DESCRIBE *`
    All,
    /// Variables and IRIs.
    Terms(Vec<RdfTerm>),
}

/// `FROM <iri>` or `FROM NAMED <iri>`.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetClause {
    pub named: bool,
    pub iri: RdfTerm,
}

impl fmt::Display for DatasetClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.named {
            write!(f, "FROM NAMED {}", self.iri)
        } else {
            write!(f, "FROM {}", self.iri)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectModifier {
    Distinct,
    Reduced,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectClause {
    pub modifier: Option<SelectModifier>,
    pub projection: Projection,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    All,
    Items(Vec<ProjectionItem>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectionItem {
    Var(RdfTerm),
    /// `(expr AS ?alias)`. Anonymous expressions get a generated alias.
    Expr {
        expression: Expression,
        alias: RdfTerm,
    },
}

impl ProjectionItem {
    /// The variable this item binds in the result.
    pub fn variable(&self) -> &RdfTerm {
        match self {
            ProjectionItem::Var(var) => var,
            ProjectionItem::Expr { alias, .. } => alias,
        }
    }
}

impl fmt::Display for ProjectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionItem::Var(var) => write!(f, "{var}"),
            ProjectionItem::Expr { expression, alias } => write!(f, "({expression} AS {alias})"),
        }
    }
}

impl fmt::Display for SelectClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT")?;
        match self.modifier {
            Some(SelectModifier::Distinct) => f.write_str(" DISTINCT")?,
            Some(SelectModifier::Reduced) => f.write_str(" REDUCED")?,
            None => {}
        }
        match &self.projection {
            Projection::All => f.write_str(" *"),
            Projection::Items(items) => {
                for item in items {
                    write!(f, " {item}")?;
                }
                Ok(())
            }
        }
    }
}

/// GROUP BY / HAVING / ORDER BY / LIMIT / OFFSET.
///
/// Empty lists and `-1` mean the clause was absent.
#[derive(Clone, Debug, PartialEq)]
pub struct SolutionModifiers {
    pub group_by: Vec<GroupCondition>,
    pub having: Vec<Expression>,
    pub order_by: Vec<OrderCondition>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for SolutionModifiers {
    fn default() -> Self {
        Self {
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: -1,
            offset: -1,
        }
    }
}

impl SolutionModifiers {
    pub fn is_empty(&self) -> bool {
        self.group_by.is_empty()
            && self.having.is_empty()
            && self.order_by.is_empty()
            && self.limit < 0
            && self.offset < 0
    }
}

impl fmt::Display for SolutionModifiers {
    /// Rendered in grammar order, each clause on its own line with a
    /// leading newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.group_by.is_empty() {
            f.write_str("\nGROUP BY")?;
            for cond in &self.group_by {
                write!(f, " {cond}")?;
            }
        }
        if !self.having.is_empty() {
            f.write_str("\nHAVING")?;
            for expr in &self.having {
                f.write_str(" ")?;
                expr.fmt_constraint(f)?;
            }
        }
        if !self.order_by.is_empty() {
            f.write_str("\nORDER BY")?;
            for cond in &self.order_by {
                write!(f, " {cond}")?;
            }
        }
        if self.limit >= 0 {
            write!(f, "\nLIMIT {}", self.limit)?;
        }
        if self.offset >= 0 {
            write!(f, "\nOFFSET {}", self.offset)?;
        }
        Ok(())
    }
}

/// `?var`, a call, or `(expr AS ?alias)`.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupCondition {
    pub expression: Expression,
    pub alias: Option<RdfTerm>,
}

impl fmt::Display for GroupCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "({} AS {alias})", self.expression),
            None => self.expression.fmt_constraint_or_var(f),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderCondition {
    pub expression: Expression,
    /// `None` when written without ASC/DESC.
    pub direction: Option<OrderDirection>,
}

impl OrderCondition {
    pub fn is_descending(&self) -> bool {
        self.direction == Some(OrderDirection::Desc)
    }
}

impl fmt::Display for OrderCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(OrderDirection::Asc) => write!(f, "ASC({})", self.expression),
            Some(OrderDirection::Desc) => write!(f, "DESC({})", self.expression),
            None => self.expression.fmt_constraint_or_var(f),
        }
    }
}

/// `{ SELECT ... WHERE { ... } modifiers VALUES }` nested in a group.
#[derive(Clone, Debug, PartialEq)]
pub struct SubSelect {
    pub select: SelectClause,
    pub where_clause: GroupGraphPattern,
    pub modifiers: SolutionModifiers,
    pub values: ValuesClause,
    pub span: SourceSpan,
}

impl fmt::Display for SubSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} WHERE {}{}", self.select, self.where_clause, self.modifiers)?;
        if !self.values.is_empty() {
            write!(f, " {}", self.values)?;
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefixes)?;

        match &self.form {
            QueryForm::Select(select) => write!(f, "{select}")?,
            QueryForm::Construct {
                template: Some(template),
            } => {
                f.write_str("CONSTRUCT {")?;
                for triple in template {
                    write!(f, " {triple} .")?;
                }
                f.write_str(" }")?;
            }
            QueryForm::Construct { template: None } => f.write_str("CONSTRUCT")?,
            QueryForm::Ask => f.write_str("ASK")?,
            QueryForm::Describe { targets } => {
                f.write_str("DESCRIBE")?;
                match targets {
                    DescribeTargets::All => f.write_str(" *")?,
                    DescribeTargets::Terms(terms) => {
                        for term in terms {
                            write!(f, " {term}")?;
                        }
                    }
                }
            }
        }

        for clause in &self.dataset {
            write!(f, "\n{clause}")?;
        }
        if let Some(pattern) = &self.where_clause {
            write!(f, "\nWHERE {pattern}")?;
        }
        write!(f, "{}", self.modifiers)?;
        if !self.values.is_empty() {
            write!(f, "\n{}", self.values)?;
        }
        Ok(())
    }
}

impl Variables for SelectClause {
    fn collect_variables(&self, out: &mut VarSet) {
        if let Projection::Items(items) = &self.projection {
            for item in items {
                if let ProjectionItem::Expr { expression, .. } = item {
                    expression.collect_variables(out);
                }
                item.variable().collect_variables(out);
            }
        }
    }
}

impl Variables for SolutionModifiers {
    fn collect_variables(&self, out: &mut VarSet) {
        for cond in &self.group_by {
            cond.expression.collect_variables(out);
            if let Some(alias) = &cond.alias {
                alias.collect_variables(out);
            }
        }
        self.having.iter().for_each(|e| e.collect_variables(out));
        self.order_by
            .iter()
            .for_each(|c| c.expression.collect_variables(out));
    }
}

impl Variables for SubSelect {
    fn collect_variables(&self, out: &mut VarSet) {
        self.select.collect_variables(out);
        self.where_clause.collect_variables(out);
        self.modifiers.collect_variables(out);
        self.values.collect_variables(out);
    }
}

impl Variables for Query {
    fn collect_variables(&self, out: &mut VarSet) {
        match &self.form {
            QueryForm::Select(select) => select.collect_variables(out),
            QueryForm::Construct {
                template: Some(template),
            } => template.iter().for_each(|t| t.collect_variables(out)),
            QueryForm::Construct { template: None } | QueryForm::Ask => {}
            QueryForm::Describe { targets } => {
                if let DescribeTargets::Terms(terms) = targets {
                    terms.iter().for_each(|t| t.collect_variables(out));
                }
            }
        }
        if let Some(pattern) = &self.where_clause {
            pattern.collect_variables(out);
        }
        self.modifiers.collect_variables(out);
        self.values.collect_variables(out);
    }
}
