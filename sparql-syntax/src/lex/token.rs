//! SPARQL token types.

use std::fmt;
use std::sync::Arc;

use crate::ast::{Aggregate, Builtin};
use crate::span::SourceSpan;

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: SourceSpan::new(start, end),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Structural reserved words. Matched case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Base,
    Prefix,
    Select,
    Construct,
    Describe,
    Ask,
    From,
    Named,
    Where,
    Optional,
    Graph,
    Service,
    Silent,
    Bind,
    As,
    Values,
    Undef,
    Minus,
    Union,
    Filter,
    Group,
    Order,
    By,
    Having,
    Asc,
    Desc,
    Limit,
    Offset,
    Distinct,
    Reduced,
    Separator,
    Not,
    In,
    Exists,
    And,
    Or,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let kw = match word.to_ascii_uppercase().as_str() {
            "BASE" => Keyword::Base,
            "PREFIX" => Keyword::Prefix,
            "SELECT" => Keyword::Select,
            "CONSTRUCT" => Keyword::Construct,
            "DESCRIBE" => Keyword::Describe,
            "ASK" => Keyword::Ask,
            "FROM" => Keyword::From,
            "NAMED" => Keyword::Named,
            "WHERE" => Keyword::Where,
            "OPTIONAL" => Keyword::Optional,
            "GRAPH" => Keyword::Graph,
            "SERVICE" => Keyword::Service,
            "SILENT" => Keyword::Silent,
            "BIND" => Keyword::Bind,
            "AS" => Keyword::As,
            "VALUES" => Keyword::Values,
            "UNDEF" => Keyword::Undef,
            "MINUS" => Keyword::Minus,
            "UNION" => Keyword::Union,
            "FILTER" => Keyword::Filter,
            "GROUP" => Keyword::Group,
            "ORDER" => Keyword::Order,
            "BY" => Keyword::By,
            "HAVING" => Keyword::Having,
            "ASC" => Keyword::Asc,
            "DESC" => Keyword::Desc,
            "LIMIT" => Keyword::Limit,
            "OFFSET" => Keyword::Offset,
            "DISTINCT" => Keyword::Distinct,
            "REDUCED" => Keyword::Reduced,
            "SEPARATOR" => Keyword::Separator,
            "NOT" => Keyword::Not,
            "IN" => Keyword::In,
            "EXISTS" => Keyword::Exists,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Base => "BASE",
            Keyword::Prefix => "PREFIX",
            Keyword::Select => "SELECT",
            Keyword::Construct => "CONSTRUCT",
            Keyword::Describe => "DESCRIBE",
            Keyword::Ask => "ASK",
            Keyword::From => "FROM",
            Keyword::Named => "NAMED",
            Keyword::Where => "WHERE",
            Keyword::Optional => "OPTIONAL",
            Keyword::Graph => "GRAPH",
            Keyword::Service => "SERVICE",
            Keyword::Silent => "SILENT",
            Keyword::Bind => "BIND",
            Keyword::As => "AS",
            Keyword::Values => "VALUES",
            Keyword::Undef => "UNDEF",
            Keyword::Minus => "MINUS",
            Keyword::Union => "UNION",
            Keyword::Filter => "FILTER",
            Keyword::Group => "GROUP",
            Keyword::Order => "ORDER",
            Keyword::By => "BY",
            Keyword::Having => "HAVING",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
            Keyword::Limit => "LIMIT",
            Keyword::Offset => "OFFSET",
            Keyword::Distinct => "DISTINCT",
            Keyword::Reduced => "REDUCED",
            Keyword::Separator => "SEPARATOR",
            Keyword::Not => "NOT",
            Keyword::In => "IN",
            Keyword::Exists => "EXISTS",
            Keyword::And => "AND",
            Keyword::Or => "OR",
        }
    }
}

/// Token kinds for SPARQL query text.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `<http://example.org/>`, stored without brackets.
    Iri(Arc<str>),
    /// `prefix:` with an empty local part.
    PrefixedNameNs(Arc<str>),
    /// `prefix:local`
    PrefixedName { prefix: Arc<str>, local: Arc<str> },
    /// `?name` or `$name`, stored with its sigil.
    Var(Arc<str>),

    /// String literal with escapes resolved.
    String(Arc<str>),
    // Numerics keep their lexical form, sign included.
    Integer(Arc<str>),
    Decimal(Arc<str>),
    Double(Arc<str>),
    /// `true` / `false` (case-sensitive).
    Boolean(bool),
    /// Language tag without the `@`.
    LangTag(Arc<str>),

    /// `_:name`
    BlankNodeLabel(Arc<str>),
    /// `[ ]`
    Anon,
    /// `( )`
    Nil,
    /// The lowercase `a` predicate alias.
    A,
    /// Any other bare word. No grammar rule accepts it.
    Ident(Arc<str>),

    Keyword(Keyword),
    Builtin(Builtin),
    Aggregate(Aggregate),

    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    OrOr,
    AndAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Question,
    Pipe,
    Caret,

    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }

    /// Numeric literal written with an explicit `+` or `-`.
    pub fn is_signed_numeric(&self) -> bool {
        match self {
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                s.starts_with(['+', '-'])
            }
            _ => false,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Iri(s) => write!(f, "<{s}>"),
            TokenKind::PrefixedNameNs(s) => write!(f, "{s}:"),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{prefix}:{local}"),
            TokenKind::Var(s) => f.write_str(s),
            TokenKind::String(s) => write!(f, "{s:?}"),
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                f.write_str(s)
            }
            TokenKind::Boolean(b) => write!(f, "{b}"),
            TokenKind::LangTag(s) => write!(f, "@{s}"),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{s}"),
            TokenKind::Anon => f.write_str("[]"),
            TokenKind::Nil => f.write_str("()"),
            TokenKind::A => f.write_str("a"),
            TokenKind::Ident(s) => f.write_str(s),
            TokenKind::Keyword(kw) => f.write_str(kw.as_str()),
            TokenKind::Builtin(b) => f.write_str(b.name()),
            TokenKind::Aggregate(a) => f.write_str(a.name()),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::DoubleCaret => f.write_str("^^"),
            TokenKind::OrOr => f.write_str("||"),
            TokenKind::AndAnd => f.write_str("&&"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Ne => f.write_str("!="),
            TokenKind::Lt => f.write_str("<"),
            TokenKind::Gt => f.write_str(">"),
            TokenKind::Le => f.write_str("<="),
            TokenKind::Ge => f.write_str(">="),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Bang => f.write_str("!"),
            TokenKind::Question => f.write_str("?"),
            TokenKind::Pipe => f.write_str("|"),
            TokenKind::Caret => f.write_str("^"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// Classify a bare word: `a`, booleans, then the reserved-word tables.
pub fn word_token(word: &str) -> Option<TokenKind> {
    match word {
        "a" => return Some(TokenKind::A),
        "true" => return Some(TokenKind::Boolean(true)),
        "false" => return Some(TokenKind::Boolean(false)),
        _ => {}
    }
    Keyword::from_word(word)
        .map(TokenKind::Keyword)
        .or_else(|| Aggregate::from_name(word).map(TokenKind::Aggregate))
        .or_else(|| Builtin::from_name(word).map(TokenKind::Builtin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_lookup() {
        assert_eq!(word_token("SELECT"), Some(TokenKind::Keyword(Keyword::Select)));
        assert_eq!(word_token("sElEcT"), Some(TokenKind::Keyword(Keyword::Select)));
        assert_eq!(word_token("a"), Some(TokenKind::A));
        assert_eq!(word_token("A"), None);
        assert_eq!(word_token("true"), Some(TokenKind::Boolean(true)));
        assert_eq!(word_token("TRUE"), None);
        assert_eq!(word_token("count"), Some(TokenKind::Aggregate(Aggregate::Count)));
        assert_eq!(word_token("strlen"), Some(TokenKind::Builtin(Builtin::Strlen)));
        assert_eq!(word_token("frobnicate"), None);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(
            TokenKind::Iri(Arc::from("http://example.org/")).to_string(),
            "<http://example.org/>"
        );
        assert_eq!(TokenKind::Var(Arc::from("$x")).to_string(), "$x");
        assert_eq!(TokenKind::Keyword(Keyword::Where).to_string(), "WHERE");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }

    #[test]
    fn test_signed_numeric() {
        assert!(TokenKind::Integer(Arc::from("-1")).is_signed_numeric());
        assert!(TokenKind::Decimal(Arc::from("+1.5")).is_signed_numeric());
        assert!(!TokenKind::Integer(Arc::from("1")).is_signed_numeric());
        assert!(!TokenKind::Minus.is_signed_numeric());
    }
}
