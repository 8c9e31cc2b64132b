//! Built-in function and aggregate tables.
//!
//! Each built-in carries its operand arity so the parser can validate the
//! argument count once and the resulting [`Expression`](super::Expression)
//! records its [`OperatorKind`] at construction.

use std::fmt;

use serde::Serialize;

/// Operand shape of an expression operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// No operands: `RAND()`, `NOW()`.
    Nil,
    Unary,
    Binary,
    Ternary,
    Quaternary,
    /// Variable-length operand list: `CONCAT`, `COALESCE`, `IN`.
    List,
    Aggregate,
}

impl OperatorKind {
    /// Shape for a fixed-arity call with `argc` operands.
    pub fn from_argc(argc: usize) -> Self {
        match argc {
            0 => OperatorKind::Nil,
            1 => OperatorKind::Unary,
            2 => OperatorKind::Binary,
            3 => OperatorKind::Ternary,
            4 => OperatorKind::Quaternary,
            _ => OperatorKind::List,
        }
    }
}

/// Built-in call names recognised by the keyword table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Builtin {
    // term accessors and tests
    Str,
    Lang,
    Datatype,
    Bound,
    Iri,
    Uri,
    BNode,
    IsIri,
    IsUri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    SameTerm,
    StrLang,
    StrDt,
    LangMatches,
    // strings
    Strlen,
    Substr,
    Ucase,
    Lcase,
    StrStarts,
    StrEnds,
    Contains,
    StrBefore,
    StrAfter,
    EncodeForUri,
    Concat,
    Regex,
    Replace,
    // numerics
    Abs,
    Round,
    Ceil,
    Floor,
    Rand,
    // dates
    Now,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,
    // hashes and ids
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Uuid,
    StrUuid,
    // conditionals
    If,
    Coalesce,
}

impl Builtin {
    /// Case-insensitive lookup of a built-in name.
    pub fn from_name(word: &str) -> Option<Self> {
        let builtin = match word.to_ascii_uppercase().as_str() {
            "STR" => Builtin::Str,
            "LANG" => Builtin::Lang,
            "DATATYPE" => Builtin::Datatype,
            "BOUND" => Builtin::Bound,
            "IRI" => Builtin::Iri,
            "URI" => Builtin::Uri,
            "BNODE" => Builtin::BNode,
            "ISIRI" => Builtin::IsIri,
            "ISURI" => Builtin::IsUri,
            "ISBLANK" => Builtin::IsBlank,
            "ISLITERAL" => Builtin::IsLiteral,
            "ISNUMERIC" => Builtin::IsNumeric,
            "SAMETERM" => Builtin::SameTerm,
            "STRLANG" => Builtin::StrLang,
            "STRDT" => Builtin::StrDt,
            "LANGMATCHES" => Builtin::LangMatches,
            "STRLEN" => Builtin::Strlen,
            "SUBSTR" => Builtin::Substr,
            "UCASE" => Builtin::Ucase,
            "LCASE" => Builtin::Lcase,
            "STRSTARTS" => Builtin::StrStarts,
            "STRENDS" => Builtin::StrEnds,
            "CONTAINS" => Builtin::Contains,
            "STRBEFORE" => Builtin::StrBefore,
            "STRAFTER" => Builtin::StrAfter,
            "ENCODE_FOR_URI" => Builtin::EncodeForUri,
            "CONCAT" => Builtin::Concat,
            "REGEX" => Builtin::Regex,
            "REPLACE" => Builtin::Replace,
            "ABS" => Builtin::Abs,
            "ROUND" => Builtin::Round,
            "CEIL" => Builtin::Ceil,
            "FLOOR" => Builtin::Floor,
            "RAND" => Builtin::Rand,
            "NOW" => Builtin::Now,
            "YEAR" => Builtin::Year,
            "MONTH" => Builtin::Month,
            "DAY" => Builtin::Day,
            "HOURS" => Builtin::Hours,
            "MINUTES" => Builtin::Minutes,
            "SECONDS" => Builtin::Seconds,
            "TIMEZONE" => Builtin::Timezone,
            "TZ" => Builtin::Tz,
            "MD5" => Builtin::Md5,
            "SHA1" => Builtin::Sha1,
            "SHA256" => Builtin::Sha256,
            "SHA384" => Builtin::Sha384,
            "SHA512" => Builtin::Sha512,
            "UUID" => Builtin::Uuid,
            "STRUUID" => Builtin::StrUuid,
            "IF" => Builtin::If,
            "COALESCE" => Builtin::Coalesce,
            _ => return None,
        };
        Some(builtin)
    }

    /// Canonical spelling used when rendering.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Str => "STR",
            Builtin::Lang => "LANG",
            Builtin::Datatype => "DATATYPE",
            Builtin::Bound => "BOUND",
            Builtin::Iri => "IRI",
            Builtin::Uri => "URI",
            Builtin::BNode => "BNODE",
            Builtin::IsIri => "isIRI",
            Builtin::IsUri => "isURI",
            Builtin::IsBlank => "isBLANK",
            Builtin::IsLiteral => "isLITERAL",
            Builtin::IsNumeric => "isNUMERIC",
            Builtin::SameTerm => "sameTerm",
            Builtin::StrLang => "STRLANG",
            Builtin::StrDt => "STRDT",
            Builtin::LangMatches => "LANGMATCHES",
            Builtin::Strlen => "STRLEN",
            Builtin::Substr => "SUBSTR",
            Builtin::Ucase => "UCASE",
            Builtin::Lcase => "LCASE",
            Builtin::StrStarts => "STRSTARTS",
            Builtin::StrEnds => "STRENDS",
            Builtin::Contains => "CONTAINS",
            Builtin::StrBefore => "STRBEFORE",
            Builtin::StrAfter => "STRAFTER",
            Builtin::EncodeForUri => "ENCODE_FOR_URI",
            Builtin::Concat => "CONCAT",
            Builtin::Regex => "REGEX",
            Builtin::Replace => "REPLACE",
            Builtin::Abs => "ABS",
            Builtin::Round => "ROUND",
            Builtin::Ceil => "CEIL",
            Builtin::Floor => "FLOOR",
            Builtin::Rand => "RAND",
            Builtin::Now => "NOW",
            Builtin::Year => "YEAR",
            Builtin::Month => "MONTH",
            Builtin::Day => "DAY",
            Builtin::Hours => "HOURS",
            Builtin::Minutes => "MINUTES",
            Builtin::Seconds => "SECONDS",
            Builtin::Timezone => "TIMEZONE",
            Builtin::Tz => "TZ",
            Builtin::Md5 => "MD5",
            Builtin::Sha1 => "SHA1",
            Builtin::Sha256 => "SHA256",
            Builtin::Sha384 => "SHA384",
            Builtin::Sha512 => "SHA512",
            Builtin::Uuid => "UUID",
            Builtin::StrUuid => "STRUUID",
            Builtin::If => "IF",
            Builtin::Coalesce => "COALESCE",
        }
    }

    /// Accepted operand counts as an inclusive range. `None` as the upper
    /// bound means variadic.
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Builtin::Rand | Builtin::Now | Builtin::Uuid | Builtin::StrUuid => (0, Some(0)),
            Builtin::BNode => (0, Some(1)),
            Builtin::LangMatches
            | Builtin::Contains
            | Builtin::StrStarts
            | Builtin::StrEnds
            | Builtin::StrBefore
            | Builtin::StrAfter
            | Builtin::StrLang
            | Builtin::StrDt
            | Builtin::SameTerm => (2, Some(2)),
            Builtin::Regex | Builtin::Substr => (2, Some(3)),
            Builtin::If => (3, Some(3)),
            Builtin::Replace => (3, Some(4)),
            Builtin::Concat | Builtin::Coalesce => (0, None),
            _ => (1, Some(1)),
        }
    }

    /// Operator shape for a call of this built-in with `argc` operands.
    pub fn kind(self, argc: usize) -> OperatorKind {
        match self {
            Builtin::Concat | Builtin::Coalesce => OperatorKind::List,
            Builtin::Regex | Builtin::Substr => OperatorKind::Ternary,
            Builtin::Replace => OperatorKind::Quaternary,
            _ => OperatorKind::from_argc(argc),
        }
    }

    pub fn accepts(self, argc: usize) -> bool {
        let (min, max) = self.arity();
        argc >= min && max.map_or(true, |max| argc <= max)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set functions usable in projections, HAVING and ORDER BY.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Aggregate {
    Count,
    Sum,
    Min,
    Max,
    Avg,
    Sample,
    GroupConcat,
}

impl Aggregate {
    pub fn from_name(word: &str) -> Option<Self> {
        let aggregate = match word.to_ascii_uppercase().as_str() {
            "COUNT" => Aggregate::Count,
            "SUM" => Aggregate::Sum,
            "MIN" => Aggregate::Min,
            "MAX" => Aggregate::Max,
            "AVG" => Aggregate::Avg,
            "SAMPLE" => Aggregate::Sample,
            "GROUP_CONCAT" => Aggregate::GroupConcat,
            _ => return None,
        };
        Some(aggregate)
    }

    pub fn name(self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Avg => "AVG",
            Aggregate::Sample => "SAMPLE",
            Aggregate::GroupConcat => "GROUP_CONCAT",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        assert_eq!(Builtin::from_name("regex"), Some(Builtin::Regex));
        assert_eq!(Builtin::from_name("SameTerm"), Some(Builtin::SameTerm));
        assert_eq!(Builtin::from_name("encode_for_uri"), Some(Builtin::EncodeForUri));
        assert_eq!(Builtin::from_name("select"), None);
        assert_eq!(Aggregate::from_name("group_concat"), Some(Aggregate::GroupConcat));
    }

    #[test]
    fn test_builtin_arity() {
        assert!(Builtin::Rand.accepts(0));
        assert!(!Builtin::Rand.accepts(1));
        assert!(Builtin::BNode.accepts(0) && Builtin::BNode.accepts(1));
        assert!(Builtin::Regex.accepts(2) && Builtin::Regex.accepts(3));
        assert!(!Builtin::Replace.accepts(2));
        assert!(Builtin::Concat.accepts(7));
        assert!(!Builtin::Str.accepts(2));
    }

    #[test]
    fn test_operator_kind_fixed_by_builtin() {
        assert_eq!(Builtin::BNode.kind(0), OperatorKind::Nil);
        assert_eq!(Builtin::BNode.kind(1), OperatorKind::Unary);
        assert_eq!(Builtin::Regex.kind(2), OperatorKind::Ternary);
        assert_eq!(Builtin::Replace.kind(3), OperatorKind::Quaternary);
        assert_eq!(Builtin::Coalesce.kind(2), OperatorKind::List);
        assert_eq!(Builtin::StrDt.kind(2), OperatorKind::Binary);
    }
}
