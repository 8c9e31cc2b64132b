//! Expressions for FILTER, BIND, projections, GROUP BY, HAVING and ORDER BY.
//!
//! Every operator node fixes its [`OperatorKind`] when it is built; rendering
//! and variable extraction match on the node shape and never re-derive it.

use std::fmt;
use std::sync::Arc;

use super::function::{Aggregate, Builtin, OperatorKind};
use super::pattern::GroupGraphPattern;
use super::term::RdfTerm;
use super::{VarSet, Variables};
use crate::span::SourceSpan;

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A variable, IRI or literal.
    Term(RdfTerm),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        span: SourceSpan,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        span: SourceSpan,
    },
    /// `expr IN (...)` / `expr NOT IN (...)`
    In {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
        span: SourceSpan,
    },
    Call(FunctionCall),
    Aggregate(AggregateCall),
    /// `EXISTS { ... }` / `NOT EXISTS { ... }`
    Exists {
        negated: bool,
        pattern: Box<GroupGraphPattern>,
        span: SourceSpan,
    },
}

impl Expression {
    pub fn unary(op: UnaryOp, operand: Expression, span: SourceSpan) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
            span,
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression, span: SourceSpan) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    /// Operand shape of the top-level operator; `None` for a bare term.
    pub fn operator_kind(&self) -> Option<OperatorKind> {
        match self {
            Expression::Term(_) => None,
            Expression::Unary { .. } | Expression::Exists { .. } => Some(OperatorKind::Unary),
            Expression::Binary { .. } => Some(OperatorKind::Binary),
            Expression::In { .. } => Some(OperatorKind::List),
            Expression::Call(call) => Some(call.kind),
            Expression::Aggregate(_) => Some(OperatorKind::Aggregate),
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Expression::Term(term) => term.span,
            Expression::Unary { span, .. }
            | Expression::Binary { span, .. }
            | Expression::In { span, .. }
            | Expression::Exists { span, .. } => *span,
            Expression::Call(call) => call.span,
            Expression::Aggregate(agg) => agg.span,
        }
    }

    /// The variable if this expression is a bare variable.
    pub fn as_var(&self) -> Option<&RdfTerm> {
        match self {
            Expression::Term(term) if term.is_var() => Some(term),
            _ => None,
        }
    }

    /// Stem used to name an anonymous projection of this expression.
    pub fn name_stem(&self) -> &str {
        match self {
            Expression::Call(call) => match &call.function {
                Function::Builtin(b) => b.name(),
                Function::Extension(_) => "expr",
            },
            Expression::Aggregate(agg) => agg.function.name(),
            _ => "expr",
        }
    }

    /// Whether the rendered form is already a valid bracketed constraint
    /// (`FILTER regex(...)`, `HAVING (?x > 1)`).
    pub(crate) fn is_bracketed(&self) -> bool {
        matches!(
            self,
            Expression::Binary { .. }
                | Expression::In { .. }
                | Expression::Call(_)
                | Expression::Aggregate(_)
                | Expression::Exists { .. }
        )
    }

    /// Render as a constraint, adding brackets where the grammar needs them.
    pub(crate) fn fmt_constraint(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bracketed() {
            write!(f, "{self}")
        } else {
            write!(f, "({self})")
        }
    }

    /// Like [`fmt_constraint`](Self::fmt_constraint), but a bare variable
    /// stays bare (GROUP BY and ORDER BY conditions).
    pub(crate) fn fmt_constraint_or_var(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_var() {
            Some(var) => write!(f, "{var}"),
            None => self.fmt_constraint(f),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Plus,
    Minus,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// Callee of a [`FunctionCall`].
#[derive(Clone, Debug, PartialEq)]
pub enum Function {
    Builtin(Builtin),
    /// `iri(args)`, including XSD casts such as `xsd:integer(?x)`.
    Extension(RdfTerm),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub function: Function,
    pub kind: OperatorKind,
    pub args: Vec<Expression>,
    /// Leading `DISTINCT` in an extension call.
    pub distinct: bool,
    pub span: SourceSpan,
}

impl FunctionCall {
    pub fn builtin(builtin: Builtin, args: Vec<Expression>, span: SourceSpan) -> Self {
        Self {
            function: Function::Builtin(builtin),
            kind: builtin.kind(args.len()),
            args,
            distinct: false,
            span,
        }
    }

    pub fn extension(iri: RdfTerm, args: Vec<Expression>, distinct: bool, span: SourceSpan) -> Self {
        Self {
            function: Function::Extension(iri),
            kind: OperatorKind::List,
            args,
            distinct,
            span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateCall {
    pub function: Aggregate,
    pub distinct: bool,
    /// `None` for `COUNT(*)`.
    pub arg: Option<Box<Expression>>,
    /// `GROUP_CONCAT(...; SEPARATOR = "...")`
    pub separator: Option<Arc<str>>,
    pub span: SourceSpan,
}

impl Variables for Expression {
    fn collect_variables(&self, out: &mut VarSet) {
        match self {
            Expression::Term(term) => term.collect_variables(out),
            Expression::Unary { operand, .. } => operand.collect_variables(out),
            Expression::Binary { left, right, .. } => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Expression::In { expr, list, .. } => {
                expr.collect_variables(out);
                list.iter().for_each(|e| e.collect_variables(out));
            }
            Expression::Call(call) => call.args.iter().for_each(|e| e.collect_variables(out)),
            Expression::Aggregate(agg) => {
                if let Some(arg) = &agg.arg {
                    arg.collect_variables(out);
                }
            }
            Expression::Exists { pattern, .. } => pattern.collect_variables(out),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expression]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Term(term) => write!(f, "{term}"),
            // A unary operand must be a primary, so nested unaries need brackets.
            Expression::Unary { op, operand, .. } => match **operand {
                Expression::Unary { .. } => write!(f, "{}({operand})", op.as_str()),
                _ => write!(f, "{}{operand}", op.as_str()),
            },
            Expression::Binary {
                op, left, right, ..
            } => write!(f, "({left} {} {right})", op.as_str()),
            Expression::In {
                expr,
                list,
                negated,
                ..
            } => {
                let op = if *negated { "NOT IN" } else { "IN" };
                write!(f, "({expr} {op} (")?;
                write_args(f, list)?;
                f.write_str("))")
            }
            Expression::Call(call) => write!(f, "{call}"),
            Expression::Aggregate(agg) => write!(f, "{agg}"),
            Expression::Exists {
                negated, pattern, ..
            } => {
                if *negated {
                    f.write_str("NOT ")?;
                }
                write!(f, "EXISTS {pattern}")
            }
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Function::Builtin(b) => f.write_str(b.name())?,
            Function::Extension(iri) => write!(f, "{iri}")?,
        }
        match self.kind {
            OperatorKind::Nil => f.write_str("()"),
            _ => {
                f.write_str("(")?;
                if self.distinct {
                    f.write_str("DISTINCT ")?;
                }
                write_args(f, &self.args)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function.name())?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        match &self.arg {
            Some(arg) => write!(f, "{arg}")?,
            None => f.write_str("*")?,
        }
        if let Some(sep) = &self.separator {
            // Reuse literal escaping for the separator string.
            write!(f, "; SEPARATOR = {}", RdfTerm::literal(sep.clone(), self.span))?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expression {
        Expression::Term(RdfTerm::var(name, SourceSpan::default()))
    }

    fn num(n: &str) -> Expression {
        Expression::Term(RdfTerm::numeric(n, SourceSpan::default()))
    }

    #[test]
    fn test_infix_rendering() {
        let sp = SourceSpan::default();
        let expr = Expression::binary(
            BinaryOp::Add,
            num("1"),
            Expression::binary(BinaryOp::Mul, num("2"), var("?x"), sp),
            sp,
        );
        assert_eq!(expr.to_string(), "(1 + (2 * ?x))");
        assert_eq!(expr.operator_kind(), Some(OperatorKind::Binary));
    }

    #[test]
    fn test_call_rendering_follows_kind() {
        let sp = SourceSpan::default();
        let now = FunctionCall::builtin(Builtin::Now, vec![], sp);
        assert_eq!(now.kind, OperatorKind::Nil);
        assert_eq!(now.to_string(), "NOW()");

        let regex = FunctionCall::builtin(Builtin::Regex, vec![var("?s"), var("?p")], sp);
        assert_eq!(regex.kind, OperatorKind::Ternary);
        assert_eq!(regex.to_string(), "REGEX(?s, ?p)");

        let cast = FunctionCall::extension(
            RdfTerm::prefixed("xsd", "integer", sp),
            vec![var("?n")],
            false,
            sp,
        );
        assert_eq!(cast.to_string(), "xsd:integer(?n)");
    }

    #[test]
    fn test_aggregate_rendering() {
        let sp = SourceSpan::default();
        let count = AggregateCall {
            function: Aggregate::Count,
            distinct: true,
            arg: None,
            separator: None,
            span: sp,
        };
        assert_eq!(count.to_string(), "COUNT(DISTINCT *)");

        let concat = AggregateCall {
            function: Aggregate::GroupConcat,
            distinct: false,
            arg: Some(Box::new(var("?name"))),
            separator: Some(Arc::from(", ")),
            span: sp,
        };
        assert_eq!(concat.to_string(), "GROUP_CONCAT(?name; SEPARATOR = \", \")");
    }

    #[test]
    fn test_in_and_variables() {
        let sp = SourceSpan::default();
        let expr = Expression::In {
            expr: Box::new(var("?x")),
            list: vec![num("1"), var("?y")],
            negated: true,
            span: sp,
        };
        assert_eq!(expr.to_string(), "(?x NOT IN (1, ?y))");
        let vars: Vec<_> = expr.free_variables().into_iter().collect();
        assert_eq!(vars, vec![Arc::from("?x"), Arc::from("?y")]);
    }

    #[test]
    fn test_name_stem() {
        let sp = SourceSpan::default();
        let call = Expression::Call(FunctionCall::builtin(Builtin::Strlen, vec![var("?s")], sp));
        assert_eq!(call.name_stem(), "STRLEN");
        assert_eq!(num("1").name_stem(), "expr");
    }
}
