//! String functions: substring, replace and directional language strings

use super::{EvalContext, ExpressionError, ExpressionResult, Operand};
use crate::rdf::{Direction, Term};
use crate::sparql::SolutionRow;
use regex::{NoExpand, Regex, RegexBuilder};
use tracing::debug;

/// `fn:substring(source, start[, length])` with 1-based character positions
///
/// A start below 1 is moved to 1 and a negative length counts as 0, so the
/// result is the empty string rather than an error when the window misses
/// the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Substring {
    pub(super) source: Operand,
    pub(super) start: i64,
    pub(super) length: Option<i64>,
}

impl Substring {
    pub fn new(source: Operand, start: i64, length: Option<i64>) -> Self {
        Self {
            source,
            start,
            length,
        }
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let source = self.source.resolve(row, ctx)?;
        let text = source.string_form()?;

        let skip = usize::try_from(self.start.max(1) - 1).unwrap_or(usize::MAX);
        let chars = text.chars().skip(skip);
        let value: String = match self.length {
            Some(length) => chars
                .take(usize::try_from(length.max(0)).unwrap_or(usize::MAX))
                .collect(),
            None => chars.collect(),
        };

        Some(Term::PlainLiteral {
            value,
            lang: source.language().map(str::to_string),
        })
    }
}

/// `fn:replace(source, pattern, replacement[, flags])`
///
/// Both operands are read through their string form, so resources and
/// language-tagged literals are accepted on either side. The output keeps
/// the kind of the source: a resource stays a resource (unbound when the
/// result is not a valid IRI), a plain literal keeps its language tag and
/// an `xsd:string` literal becomes a simple literal.
#[derive(Debug, Clone)]
pub struct Replace {
    pub(super) source: Operand,
    pub(super) replacement: Operand,
    pub(super) pattern: String,
    pub(super) flags: String,
    regex: Regex,
}

impl Replace {
    pub fn new(
        source: Operand,
        replacement: Operand,
        pattern: &str,
        flags: &str,
    ) -> ExpressionResult<Self> {
        let regex = build_regex_with_flags(pattern, flags)?;
        if regex.is_match("") {
            return Err(ExpressionError::InvalidRegex(format!(
                "pattern {:?} matches the empty string",
                pattern
            )));
        }
        Ok(Self {
            source,
            replacement,
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    fn is_literal(&self) -> bool {
        self.flags.contains('q')
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let source = self.source.resolve(row, ctx)?;
        let replacement = self.replacement.resolve(row, ctx)?;
        let text = source.string_form()?;
        let with = replacement.string_form()?;

        let value = if self.is_literal() {
            self.regex.replace_all(text, NoExpand(with)).into_owned()
        } else {
            let Some(expanded) = xpath_replacement(with) else {
                debug!("Invalid replacement string {:?}", with);
                return None;
            };
            self.regex.replace_all(text, expanded.as_str()).into_owned()
        };

        Some(match source {
            Term::Resource { .. } => match Term::iri(&value) {
                Ok(term) => term,
                Err(e) => {
                    debug!("Replace produced an invalid IRI: {}", e);
                    return None;
                }
            },
            Term::PlainLiteral { lang, .. } => Term::PlainLiteral { value, lang },
            Term::TypedLiteral { .. } => Term::simple_literal(value),
        })
    }
}

impl PartialEq for Replace {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.replacement == other.replacement
            && self.pattern == other.pattern
            && self.flags == other.flags
    }
}

/// Build a regex from XPath flags: `i`, `m`, `s`, `x` and `q` (literal)
fn build_regex_with_flags(pattern: &str, flags: &str) -> ExpressionResult<Regex> {
    let literal = flags.contains('q');
    let source = if literal {
        regex::escape(pattern)
    } else {
        pattern.to_string()
    };
    let mut builder = RegexBuilder::new(&source);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(!literal);
            }
            'q' => {}
            c => {
                return Err(ExpressionError::InvalidRegex(format!("unknown flag {:?}", c)));
            }
        }
    }
    builder
        .build()
        .map_err(|e| ExpressionError::InvalidRegex(e.to_string()))
}

/// Translate an XPath replacement string to the `regex` crate syntax
///
/// `$n` refers to a group, `\$` and `\\` are escapes; any other use of `$`
/// or `\` is invalid.
fn xpath_replacement(replacement: &str) -> Option<String> {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                '\\' => out.push('\\'),
                '$' => out.push_str("$$"),
                _ => return None,
            },
            '$' => {
                let mut group = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    group.push(d);
                    chars.next();
                }
                if group.is_empty() {
                    return None;
                }
                out.push_str("${");
                out.push_str(&group);
                out.push('}');
            }
            c => out.push(c),
        }
    }
    Some(out)
}

/// `STRLANGDIR(source, tag, direction)`
///
/// Builds a directional language-tagged literal from a simple or
/// `xsd:string` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLangDir {
    pub(super) source: Operand,
    pub(super) lang: Operand,
    pub(super) direction: Direction,
}

impl StrLangDir {
    pub fn new(source: Operand, lang: Operand, direction: Direction) -> Self {
        Self {
            source,
            lang,
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let source = self.source.resolve(row, ctx)?;
        let lang = self.lang.resolve(row, ctx)?;
        if !source.is_string_like() || !lang.is_string_like() {
            return None;
        }
        Term::directional_literal(source.value(), lang.value(), self.direction).ok()
    }
}
