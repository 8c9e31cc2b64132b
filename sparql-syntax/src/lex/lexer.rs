//! SPARQL lexer built on winnow.
//!
//! Produces the whole token vector up front, terminated by [`TokenKind::Eof`].
//! The first input sequence that matches no rule aborts with
//! [`ParseError::Lex`]; there is no recovery.

use std::sync::Arc;

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, delimited, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{word_token, Token, TokenKind};
use crate::error::{ParseError, Result};
use crate::span::LineIndex;

/// Input type for the lexer; tracks byte offsets for spans.
pub type Input<'a> = LocatingSlice<&'a str>;

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Lexer over one query string.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Tokenize the entire input, failing on the first unrecognised sequence.
    pub fn tokenize(self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut input = LocatingSlice::new(self.input);

        loop {
            skip_ws_and_comments(&mut input);

            let start = input.current_token_start();
            if input.is_empty() {
                tokens.push(Token::new(TokenKind::Eof, start, start));
                break;
            }

            match next_token(&mut input) {
                Ok(kind) => {
                    let end = input.current_token_start();
                    tokens.push(Token::new(kind, start, end));
                }
                Err(_) => return Err(self.make_error(start)),
            }
        }

        tracing::trace!(count = tokens.len(), "lexed query");
        Ok(tokens)
    }

    fn make_error(&self, position: usize) -> ParseError {
        let rest = self.input.get(position..).unwrap_or("");
        let index = LineIndex::new(self.input);
        ParseError::lex(&index, position, offending_text(rest))
    }
}

/// The run of text reported for a lexical error: a whole word, the rest of the
/// line for an unterminated string or IRI, otherwise one character.
fn offending_text(rest: &str) -> &str {
    let Some(first) = rest.chars().next() else {
        return "";
    };
    let end = if first.is_alphanumeric() || first == '_' {
        rest.find(|c: char| !is_pn_chars(c)).unwrap_or(rest.len())
    } else if matches!(first, '"' | '\'' | '<') {
        rest.find(['\n', '\r']).unwrap_or(rest.len())
    } else {
        first.len_utf8()
    };
    &rest[..end]
}

fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str> = take_till(0.., ['\n', '\r']).parse_next(input);
        } else {
            break;
        }
    }
}

fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        parse_iri_ref,
        parse_operator,
        parse_var,
        parse_blank_node_label,
        parse_anon,
        parse_nil,
        parse_lang_tag,
        parse_default_prefix,
        parse_word,
        parse_string_literal,
        parse_number,
        parse_punctuation,
    ))
    .parse_next(input)
}

// =============================================================================
// IRIs and variables
// =============================================================================

/// `<...>` with `\u` / `\U` escapes resolved.
fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(|s: String| TokenKind::Iri(Arc::from(s)))
        .parse_next(input)
}

fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if !input.starts_with('\\') {
            break;
        }
        '\\'.parse_next(input)?;
        result.push(parse_unicode_escape(input)?);
    }

    Ok(result)
}

/// The `uXXXX` / `UXXXXXXXX` tail of a unicode escape.
fn parse_unicode_escape(input: &mut Input<'_>) -> ModalResult<char> {
    let width = match one_of(['u', 'U']).parse_next(input)? {
        'u' => 4,
        _ => 8,
    };
    let hex: &str = take_while(width..=width, AsChar::is_hex_digit).parse_next(input)?;
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => Ok(c),
        None => backtrack(),
    }
}

/// `?name` / `$name`; the sigil stays part of the token text.
fn parse_var(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    (
        one_of(['?', '$']),
        one_of(is_varname_start),
        take_while(0.., is_varname_char),
    )
        .take()
        .map(|s: &str| TokenKind::Var(Arc::from(s)))
        .parse_next(input)
}

// =============================================================================
// Blank nodes, NIL, language tags
// =============================================================================

fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let name: &str = preceded(
        "_:",
        (
            one_of(|c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
            take_while(0.., |c: char| is_pn_chars(c) || c == '.'),
        )
            .take(),
    )
    .parse_next(input)?;

    if name.ends_with('.') {
        return backtrack();
    }
    Ok(TokenKind::BlankNodeLabel(Arc::from(name)))
}

fn parse_anon(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('[', take_while(0.., is_ws), ']')
        .value(TokenKind::Anon)
        .parse_next(input)
}

fn parse_nil(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('(', take_while(0.., is_ws), ')')
        .value(TokenKind::Nil)
        .parse_next(input)
}

/// `@lang(-subtag)*`
fn parse_lang_tag(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded(
        '@',
        (
            take_while(1.., AsChar::is_alpha),
            take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
        )
            .take(),
    )
    .verify(|tag: &str| !tag.ends_with('-') && !tag.contains("--"))
    .map(|tag: &str| TokenKind::LangTag(Arc::from(tag)))
    .parse_next(input)
}

// =============================================================================
// Prefixed names and reserved words
// =============================================================================

/// `:local` or a bare `:`.
fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;
    let local = opt(parse_pn_local).parse_next(input)?;
    Ok(prefixed(String::new(), local))
}

fn prefixed(prefix: String, local: Option<String>) -> TokenKind {
    match local {
        Some(local) => TokenKind::PrefixedName {
            prefix: Arc::from(prefix),
            local: Arc::from(local),
        },
        None => TokenKind::PrefixedNameNs(Arc::from(prefix)),
    }
}

/// A word followed by `:` is a prefixed name. Otherwise it is a reserved word
/// when the tables know it, and a plain identifier when they don't.
fn parse_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let first: char = one_of(is_pn_chars_base).parse_next(input)?;
    let mut word = String::from(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        let continues = input.starts_with('.')
            && input
                .get(1..)
                .and_then(|rest| rest.chars().next())
                .is_some_and(is_pn_chars);
        if !continues {
            break;
        }
        '.'.parse_next(input)?;
        word.push('.');
    }

    if peek(opt(':')).parse_next(input)?.is_some() {
        ':'.parse_next(input)?;
        let local = opt(parse_pn_local).parse_next(input)?;
        return Ok(prefixed(word, local));
    }

    Ok(word_token(&word).unwrap_or_else(|| TokenKind::Ident(Arc::from(word))))
}

/// The local part after `prefix:`. `%XX` is kept verbatim; backslash escapes
/// are resolved.
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let first = input.chars().next().ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
    if !is_pn_local_start(first) && first != '%' && first != '\\' {
        return backtrack();
    }

    let mut result = String::new();

    loop {
        let chunk: &str =
            take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('.') {
            let next = input.get(1..).and_then(|rest| rest.chars().next());
            if next.is_some_and(|c| is_pn_chars(c) || matches!(c, ':' | '%' | '\\')) {
                '.'.parse_next(input)?;
                result.push('.');
                continue;
            }
            break;
        }

        if input.starts_with('%') {
            let hex: &str =
                preceded('%', take_while(2..=2, AsChar::is_hex_digit)).parse_next(input)?;
            result.push('%');
            result.push_str(hex);
        } else if input.starts_with('\\') {
            let escaped: char = preceded('\\', one_of(is_pn_local_escape)).parse_next(input)?;
            result.push(escaped);
        } else {
            break;
        }
    }

    if result.is_empty() {
        return backtrack();
    }
    Ok(result)
}

// =============================================================================
// String literals
// =============================================================================

fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let quote: char = peek(one_of(['"', '\''])).parse_next(input)?;
    let triple = if quote == '"' { "\"\"\"" } else { "'''" };

    let body = if input.starts_with(triple) {
        delimited(
            triple,
            |i: &mut Input<'_>| parse_long_string_body(i, quote),
            triple,
        )
        .parse_next(input)?
    } else {
        delimited(
            quote,
            |i: &mut Input<'_>| parse_short_string_body(i, quote),
            quote,
        )
        .parse_next(input)?
    };

    Ok(TokenKind::String(Arc::from(body)))
}

/// Single-line body: raw newlines are not allowed.
fn parse_short_string_body(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_till(0.., [quote, '\\', '\n', '\r']).parse_next(input)?;
        result.push_str(chunk);

        if !input.starts_with('\\') {
            break;
        }
        result.push(parse_escape_char(input)?);
    }

    Ok(result)
}

/// Triple-quoted body: a lone quote character is content.
fn parse_long_string_body(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let triple: String = std::iter::repeat(quote).take(3).collect();
    let mut result = String::new();

    loop {
        let chunk: &str = take_till(0.., [quote, '\\']).parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with(triple.as_str()) {
            break;
        }
        if input.starts_with('\\') {
            result.push(parse_escape_char(input)?);
        } else {
            result.push(any.parse_next(input)?);
        }
    }

    Ok(result)
}

/// A backslash escape inside a string literal.
fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    '\\'.parse_next(input)?;
    if input.starts_with(['u', 'U']) {
        return parse_unicode_escape(input);
    }
    any.verify_map(|c| match c {
        't' => Some('\t'),
        'b' => Some('\x08'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        'f' => Some('\x0C'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        _ => None,
    })
    .parse_next(input)
}

// =============================================================================
// Numbers
// =============================================================================

#[derive(Clone, Copy)]
enum NumberClass {
    Integer,
    Decimal,
    Double,
}

/// Integer, decimal or double, optionally signed. The token keeps the
/// lexical form so the grammar can tell `-1` from `- 1`.
fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let (class, text) = (
        opt(one_of(['+', '-'])),
        alt((parse_double_body, parse_decimal_body, parse_integer_body)),
    )
        .map(|(_, class)| class)
        .with_taken()
        .parse_next(input)?;

    let text = Arc::from(text);
    Ok(match class {
        NumberClass::Integer => TokenKind::Integer(text),
        NumberClass::Decimal => TokenKind::Decimal(text),
        NumberClass::Double => TokenKind::Double(text),
    })
}

fn parse_double_body(input: &mut Input<'_>) -> ModalResult<NumberClass> {
    (
        alt((
            (digit1, '.', digit0).void(),
            ('.', digit1).void(),
            digit1.void(),
        )),
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        digit1,
    )
        .value(NumberClass::Double)
        .parse_next(input)
}

fn parse_decimal_body(input: &mut Input<'_>) -> ModalResult<NumberClass> {
    alt(((digit1, '.', digit1).void(), ('.', digit1).void()))
        .value(NumberClass::Decimal)
        .parse_next(input)
}

fn parse_integer_body(input: &mut Input<'_>) -> ModalResult<NumberClass> {
    digit1.value(NumberClass::Integer).parse_next(input)
}

// =============================================================================
// Operators and punctuation
// =============================================================================

fn parse_operator(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".value(TokenKind::DoubleCaret),
        "||".value(TokenKind::OrOr),
        "&&".value(TokenKind::AndAnd),
        "!=".value(TokenKind::Ne),
        "<=".value(TokenKind::Le),
        ">=".value(TokenKind::Ge),
    ))
    .parse_next(input)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '=' => Some(TokenKind::Eq),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '!' => Some(TokenKind::Bang),
        '?' => Some(TokenKind::Question),
        '|' => Some(TokenKind::Pipe),
        '^' => Some(TokenKind::Caret),
        _ => None,
    })
    .parse_next(input)
}

/// Tokenize a SPARQL query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
