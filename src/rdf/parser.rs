//! Term codec: reads the canonical serialized form of a term
//!
//! Accepted syntax mirrors the `Display` output of [`Term`]:
//! `<iri>`, `"value"`, `"value"@lang`, `"value"@lang--dir` and
//! `"value"^^<datatype>`.

use super::types::{is_language_tag, Datatype, Direction, Term};
use std::str::FromStr;
use thiserror::Error;

/// Term parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermParseError {
    /// Input is empty
    #[error("Empty term")]
    Empty,

    /// IRI is not closed by '>'
    #[error("Unterminated IRI: {0}")]
    UnterminatedIri(String),

    /// IRI contains a forbidden character
    #[error("Invalid character {1:?} in IRI: {0}")]
    InvalidIriChar(String, char),

    /// Literal is not closed by '"'
    #[error("Unterminated literal: {0}")]
    UnterminatedLiteral(String),

    /// Unknown or malformed escape sequence
    #[error("Invalid escape sequence: {0}")]
    InvalidEscape(String),

    /// Language tag does not have the BCP-47 shape
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    /// Characters left after a complete term
    #[error("Unexpected trailing input: {0}")]
    TrailingInput(String),

    /// Input does not start a term
    #[error("Unexpected input: {0}")]
    Unexpected(String),
}

pub type TermParseResult<T> = Result<T, TermParseError>;

/// Parse a term from its canonical serialized form
pub fn parse_term(input: &str) -> TermParseResult<Term> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TermParseError::Empty);
    }
    let (term, rest) = if input.starts_with('<') {
        let (iri, rest) = read_iri(input)?;
        (Term::resource(iri), rest)
    } else if input.starts_with('"') {
        read_literal(input)?
    } else {
        return Err(TermParseError::Unexpected(input.to_string()));
    };
    if !rest.trim().is_empty() {
        return Err(TermParseError::TrailingInput(rest.to_string()));
    }
    Ok(term)
}

impl FromStr for Term {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_term(s)
    }
}

/// Read `<iri>` from the start of `input`, returning the IRI and the rest
fn read_iri(input: &str) -> TermParseResult<(String, &str)> {
    let body = &input[1..];
    let end = body
        .find('>')
        .ok_or_else(|| TermParseError::UnterminatedIri(input.to_string()))?;
    let iri = &body[..end];
    if let Some(c) = iri.chars().find(|c| matches!(c, '<' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c.is_whitespace()) {
        return Err(TermParseError::InvalidIriChar(iri.to_string(), c));
    }
    Ok((iri.to_string(), &body[end + 1..]))
}

fn read_literal(input: &str) -> TermParseResult<(Term, &str)> {
    let (value, rest) = read_quoted(input)?;

    if let Some(tagged) = rest.strip_prefix('@') {
        let end = tagged
            .find(|c: char| c.is_whitespace())
            .unwrap_or(tagged.len());
        let lang = &tagged[..end];
        let (tag, direction) = match lang.split_once("--") {
            Some((tag, dir)) => (tag, Some(dir)),
            None => (lang, None),
        };
        if !is_language_tag(tag) || direction.is_some_and(|d| Direction::parse(d).is_none()) {
            return Err(TermParseError::InvalidLanguageTag(lang.to_string()));
        }
        let term = Term::PlainLiteral {
            value,
            lang: Some(lang.to_string()),
        };
        return Ok((term, &tagged[end..]));
    }

    if let Some(typed) = rest.strip_prefix("^^") {
        if !typed.starts_with('<') {
            return Err(TermParseError::Unexpected(typed.to_string()));
        }
        let (iri, rest) = read_iri(typed)?;
        let datatype = Datatype::from_iri(&iri);
        return Ok((Term::typed_literal(value, datatype), rest));
    }

    Ok((Term::simple_literal(value), rest))
}

/// Read a quoted, escaped string from the start of `input`
fn read_quoted(input: &str) -> TermParseResult<(String, &str)> {
    let mut value = String::new();
    let mut chars = input.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &input[i + 1..])),
            '\\' => {
                let (_, escape) = chars
                    .next()
                    .ok_or_else(|| TermParseError::UnterminatedLiteral(input.to_string()))?;
                match escape {
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    '\\' => value.push('\\'),
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    'b' => value.push('\u{8}'),
                    'f' => value.push('\u{c}'),
                    'u' | 'U' => {
                        let len = if escape == 'u' { 4 } else { 8 };
                        let hex: String = chars.by_ref().take(len).map(|(_, c)| c).collect();
                        let decoded = (hex.len() == len)
                            .then(|| u32::from_str_radix(&hex, 16).ok())
                            .flatten()
                            .and_then(char::from_u32)
                            .ok_or_else(|| TermParseError::InvalidEscape(format!("\\{}{}", escape, hex)))?;
                        value.push(decoded);
                    }
                    other => return Err(TermParseError::InvalidEscape(format!("\\{}", other))),
                }
            }
            c => value.push(c),
        }
    }

    Err(TermParseError::UnterminatedLiteral(input.to_string()))
}
