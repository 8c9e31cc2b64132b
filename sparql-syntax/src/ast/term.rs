//! RDF terms: variables, IRIs, literals, blank nodes and NIL.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{VarSet, Variables};
use crate::lex::chars::is_pn_local_escape;
use crate::span::SourceSpan;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// What kind of term an [`RdfTerm`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermKind {
    Variable,
    Iri,
    /// Quoted string, optionally with a language tag or datatype.
    String,
    /// Unquoted numeric literal, kept in its lexical form.
    Numeric,
    Boolean,
    BlankNode,
    Nil,
}

/// A single term slot in a triple, expression or VALUES row.
///
/// `value` holds the raw lexical value: the variable name with its sigil,
/// an IRI without brackets, the short `prefix:local` form of a prefixed name
/// until it is expanded, the unescaped string content of a literal, or a blank
/// node label without `_:`.
#[derive(Clone, Debug)]
pub struct RdfTerm {
    pub kind: TermKind,
    pub value: Arc<str>,
    pub lang: Option<Arc<str>>,
    pub datatype: Option<Box<RdfTerm>>,
    /// Prefix name a short-form IRI was written with (`""` for `:local`).
    pub prefix: Option<Arc<str>>,
    /// Set once prefix expansion has rewritten `value`.
    pub expanded: bool,
    pub span: SourceSpan,
}

impl RdfTerm {
    fn new(kind: TermKind, value: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self {
            kind,
            value: value.into(),
            lang: None,
            datatype: None,
            prefix: None,
            expanded: false,
            span,
        }
    }

    /// A variable; `name` includes its `?` or `$` sigil.
    pub fn var(name: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self::new(TermKind::Variable, name, span)
    }

    /// An absolute (or base-relative) IRI written in angle brackets.
    pub fn iri(iri: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self::new(TermKind::Iri, iri, span)
    }

    /// A prefixed name awaiting expansion.
    pub fn prefixed(prefix: &str, local: &str, span: SourceSpan) -> Self {
        Self {
            prefix: Some(Arc::from(prefix)),
            ..Self::new(TermKind::Iri, format!("{prefix}:{local}"), span)
        }
    }

    /// The `a` alias, already resolved to `rdf:type`.
    pub fn rdf_type(span: SourceSpan) -> Self {
        Self::iri(RDF_TYPE, span)
    }

    pub fn literal(value: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self::new(TermKind::String, value, span)
    }

    pub fn lang_literal(value: impl Into<Arc<str>>, lang: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self {
            lang: Some(lang.into()),
            ..Self::literal(value, span)
        }
    }

    pub fn typed_literal(value: impl Into<Arc<str>>, datatype: RdfTerm, span: SourceSpan) -> Self {
        Self {
            datatype: Some(Box::new(datatype)),
            ..Self::literal(value, span)
        }
    }

    /// A numeric literal in its lexical form (`42`, `-1.5`, `2e10`).
    pub fn numeric(lexical: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self::new(TermKind::Numeric, lexical, span)
    }

    pub fn boolean(value: bool, span: SourceSpan) -> Self {
        Self::new(TermKind::Boolean, if value { "true" } else { "false" }, span)
    }

    /// A labelled blank node; `label` excludes the `_:`.
    pub fn blank_node(label: impl Into<Arc<str>>, span: SourceSpan) -> Self {
        Self::new(TermKind::BlankNode, label, span)
    }

    pub fn nil(span: SourceSpan) -> Self {
        Self::new(TermKind::Nil, "()", span)
    }

    /// Everything except variables is a constant.
    pub fn is_constant(&self) -> bool {
        self.kind != TermKind::Variable
    }

    pub fn is_var(&self) -> bool {
        self.kind == TermKind::Variable
    }

    pub fn is_iri(&self) -> bool {
        self.kind == TermKind::Iri
    }

    pub fn is_bnode(&self) -> bool {
        self.kind == TermKind::BlankNode
    }

    pub fn is_nil(&self) -> bool {
        self.kind == TermKind::Nil
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TermKind::String | TermKind::Numeric | TermKind::Boolean
        )
    }

    /// Whether this term is the `rdf:type` IRI, rendered as `a` in
    /// predicate position.
    pub fn is_rdf_type(&self) -> bool {
        self.is_iri() && (&*self.value == RDF_TYPE || &*self.value == "a")
    }

    /// Render in predicate position, where `rdf:type` prints as `a`.
    pub(crate) fn fmt_predicate(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rdf_type() {
            f.write_str("a")
        } else {
            fmt::Display::fmt(self, f)
        }
    }

    fn equality_key(&self) -> (&str, bool, Option<&str>, Option<&str>) {
        (
            self.value.as_ref(),
            self.is_constant(),
            self.lang.as_deref(),
            self.datatype.as_ref().map(|dt| &*dt.value),
        )
    }
}

impl PartialEq for RdfTerm {
    fn eq(&self, other: &Self) -> bool {
        self.equality_key() == other.equality_key()
    }
}

impl Eq for RdfTerm {}

impl Hash for RdfTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.equality_key().hash(state);
    }
}

impl Variables for RdfTerm {
    fn collect_variables(&self, out: &mut VarSet) {
        if self.is_var() {
            out.insert(self.value.clone());
        }
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TermKind::Variable | TermKind::Numeric | TermKind::Boolean | TermKind::Nil => {
                f.write_str(&self.value)
            }
            TermKind::Iri if self.prefix.is_some() && !self.expanded => write_prefixed(f, &self.value),
            TermKind::Iri => write!(f, "<{}>", self.value),
            TermKind::BlankNode => write!(f, "_:{}", self.value),
            TermKind::String => {
                write_quoted(f, &self.value)?;
                if let Some(lang) = &self.lang {
                    write!(f, "@{lang}")?;
                } else if let Some(dt) = &self.datatype {
                    write!(f, "^^{dt}")?;
                }
                Ok(())
            }
        }
    }
}

/// Writes `prefix:local`, re-escaping local characters that cannot appear bare.
fn write_prefixed(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let Some((prefix, local)) = value.split_once(':') else {
        return f.write_str(value);
    };
    write!(f, "{prefix}:")?;

    let chars: Vec<char> = local.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let bare = match c {
            '_' => true,
            '-' => i > 0,
            // a bare dot must sit between two local characters
            '.' => i > 0 && chars.get(i + 1).is_some_and(|&next| next != '.'),
            // `%XX` is kept as written by the lexer
            '%' => chars
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(char::is_ascii_hexdigit)),
            c => !is_pn_local_escape(c),
        };
        if !bare {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> SourceSpan {
        SourceSpan::default()
    }

    #[test]
    fn test_flags() {
        let var = RdfTerm::var("?x", sp());
        assert!(var.is_var() && !var.is_constant());

        let iri = RdfTerm::iri("http://example.org/", sp());
        assert!(iri.is_iri() && iri.is_constant());

        assert!(RdfTerm::blank_node("b0", sp()).is_bnode());
        assert!(RdfTerm::nil(sp()).is_nil());
        assert!(RdfTerm::numeric("-5", sp()).is_literal());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(RdfTerm::var("$who", sp()).to_string(), "$who");
        assert_eq!(RdfTerm::iri("http://x/y", sp()).to_string(), "<http://x/y>");
        assert_eq!(RdfTerm::prefixed("foaf", "name", sp()).to_string(), "foaf:name");
        assert_eq!(RdfTerm::prefixed("", "me", sp()).to_string(), ":me");
        assert_eq!(RdfTerm::prefixed("ex", "a,b(c)", sp()).to_string(), r"ex:a\,b\(c\)");
        assert_eq!(RdfTerm::prefixed("ex", "v1.2_x-y", sp()).to_string(), "ex:v1.2_x-y");
        assert_eq!(RdfTerm::prefixed("ex", "-a.", sp()).to_string(), r"ex:\-a\.");
        assert_eq!(RdfTerm::prefixed("ex", "a%20b%z", sp()).to_string(), r"ex:a%20b\%z");
        assert_eq!(RdfTerm::lang_literal("chat", "fr", sp()).to_string(), "\"chat\"@fr");
        assert_eq!(
            RdfTerm::typed_literal("5", RdfTerm::prefixed("xsd", "integer", sp()), sp()).to_string(),
            "\"5\"^^xsd:integer"
        );
        assert_eq!(RdfTerm::literal("say \"hi\"\n", sp()).to_string(), r#""say \"hi\"\n""#);
        assert_eq!(RdfTerm::blank_node("anon0", sp()).to_string(), "_:anon0");
        assert_eq!(RdfTerm::boolean(false, sp()).to_string(), "false");
    }

    #[test]
    fn test_equality_ignores_span_and_prefix() {
        let a = RdfTerm::literal("5", SourceSpan::new(0, 3));
        let b = RdfTerm::literal("5", SourceSpan::new(10, 13));
        assert_eq!(a, b);

        // Same lexical value, but one is a variable.
        assert_ne!(RdfTerm::var("?x", sp()), RdfTerm::iri("?x", sp()));
        assert_ne!(
            RdfTerm::lang_literal("chat", "fr", sp()),
            RdfTerm::lang_literal("chat", "en", sp())
        );
    }

    #[test]
    fn test_rdf_type_predicate_rendering() {
        struct Pred<'a>(&'a RdfTerm);
        impl fmt::Display for Pred<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_predicate(f)
            }
        }
        let ty = RdfTerm::rdf_type(sp());
        assert_eq!(Pred(&ty).to_string(), "a");
        assert_eq!(ty.to_string(), format!("<{RDF_TYPE}>"));
    }
}
