//! RDF term model used by filter evaluation
//!
//! Terms are a closed set: resources, plain literals (optionally language
//! tagged, where the tag may carry a base direction as `tag--ltr` or
//! `tag--rtl`) and typed literals. Categories are derived from a term's
//! variant and datatype rather than stored.

use super::vocab::{geo, rdf, xsd};
use oxrdf::{Literal as OxLiteral, NamedNode as OxNamedNode, Term as OxTerm};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid language tag
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    /// Term kind that has no counterpart here (blank nodes, quoted triples)
    #[error("Unsupported term: {0}")]
    UnsupportedTerm(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Literal datatype identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datatype {
    Integer,
    Int,
    Long,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    NonPositiveInteger,
    NegativeInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    Decimal,
    Float,
    Double,
    String,
    Boolean,
    DateTime,
    WktLiteral,
    GmlLiteral,
    /// Any datatype outside the known vocabulary
    Other(std::string::String),
}

impl Datatype {
    /// Resolve a datatype IRI
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            xsd::INTEGER => Datatype::Integer,
            xsd::INT => Datatype::Int,
            xsd::LONG => Datatype::Long,
            xsd::SHORT => Datatype::Short,
            xsd::BYTE => Datatype::Byte,
            xsd::NON_NEGATIVE_INTEGER => Datatype::NonNegativeInteger,
            xsd::POSITIVE_INTEGER => Datatype::PositiveInteger,
            xsd::NON_POSITIVE_INTEGER => Datatype::NonPositiveInteger,
            xsd::NEGATIVE_INTEGER => Datatype::NegativeInteger,
            xsd::UNSIGNED_LONG => Datatype::UnsignedLong,
            xsd::UNSIGNED_INT => Datatype::UnsignedInt,
            xsd::UNSIGNED_SHORT => Datatype::UnsignedShort,
            xsd::UNSIGNED_BYTE => Datatype::UnsignedByte,
            xsd::DECIMAL => Datatype::Decimal,
            xsd::FLOAT => Datatype::Float,
            xsd::DOUBLE => Datatype::Double,
            xsd::STRING => Datatype::String,
            xsd::BOOLEAN => Datatype::Boolean,
            xsd::DATE_TIME => Datatype::DateTime,
            geo::WKT_LITERAL => Datatype::WktLiteral,
            geo::GML_LITERAL => Datatype::GmlLiteral,
            other => Datatype::Other(other.to_string()),
        }
    }

    /// Get the datatype IRI
    pub fn iri(&self) -> &str {
        match self {
            Datatype::Integer => xsd::INTEGER,
            Datatype::Int => xsd::INT,
            Datatype::Long => xsd::LONG,
            Datatype::Short => xsd::SHORT,
            Datatype::Byte => xsd::BYTE,
            Datatype::NonNegativeInteger => xsd::NON_NEGATIVE_INTEGER,
            Datatype::PositiveInteger => xsd::POSITIVE_INTEGER,
            Datatype::NonPositiveInteger => xsd::NON_POSITIVE_INTEGER,
            Datatype::NegativeInteger => xsd::NEGATIVE_INTEGER,
            Datatype::UnsignedLong => xsd::UNSIGNED_LONG,
            Datatype::UnsignedInt => xsd::UNSIGNED_INT,
            Datatype::UnsignedShort => xsd::UNSIGNED_SHORT,
            Datatype::UnsignedByte => xsd::UNSIGNED_BYTE,
            Datatype::Decimal => xsd::DECIMAL,
            Datatype::Float => xsd::FLOAT,
            Datatype::Double => xsd::DOUBLE,
            Datatype::String => xsd::STRING,
            Datatype::Boolean => xsd::BOOLEAN,
            Datatype::DateTime => xsd::DATE_TIME,
            Datatype::WktLiteral => geo::WKT_LITERAL,
            Datatype::GmlLiteral => geo::GML_LITERAL,
            Datatype::Other(iri) => iri,
        }
    }

    /// Integer-derived XSD types
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Datatype::Integer
                | Datatype::Int
                | Datatype::Long
                | Datatype::Short
                | Datatype::Byte
                | Datatype::NonNegativeInteger
                | Datatype::PositiveInteger
                | Datatype::NonPositiveInteger
                | Datatype::NegativeInteger
                | Datatype::UnsignedLong
                | Datatype::UnsignedInt
                | Datatype::UnsignedShort
                | Datatype::UnsignedByte
        )
    }

    /// Any XSD numeric type
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Datatype::Decimal | Datatype::Float | Datatype::Double)
    }

    /// GeoSPARQL geometry literal types
    pub fn is_geographic(&self) -> bool {
        matches!(self, Datatype::WktLiteral | Datatype::GmlLiteral)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri())
    }
}

/// Base direction of a directional language-tagged string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right
    Ltr,
    /// Right to left
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ltr" => Some(Direction::Ltr),
            "rtl" => Some(Direction::Rtl),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic category of a term, as seen by the operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Typed literal with an XSD numeric datatype
    Numeric,
    /// Plain literal without language, or `xsd:string` typed literal
    StringLike,
    /// `xsd:boolean` typed literal whose value is `true` or `false`
    Boolean,
    /// WKT or GML typed literal
    Geographic,
}

/// RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// Resource (IRI)
    Resource { iri: String },
    /// Plain literal, optionally language tagged
    PlainLiteral {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
    /// Literal with an explicit datatype
    TypedLiteral { value: String, datatype: Datatype },
}

impl Term {
    /// Create a resource without validating the IRI
    pub fn resource(iri: impl Into<String>) -> Self {
        Term::Resource { iri: iri.into() }
    }

    /// Create a resource from a validated IRI
    ///
    /// Unicode whitespace is rejected as well, since `<iri>` would not parse
    /// back.
    pub fn iri(iri: &str) -> RdfResult<Self> {
        oxiri::Iri::parse(iri).map_err(|e| RdfError::InvalidIri(format!("{}: {}", iri, e)))?;
        if iri.chars().any(char::is_whitespace) {
            return Err(RdfError::InvalidIri(format!("{}: contains whitespace", iri)));
        }
        Ok(Term::resource(iri))
    }

    /// Create a simple literal (no language tag)
    pub fn simple_literal(value: impl Into<String>) -> Self {
        Term::PlainLiteral {
            value: value.into(),
            lang: None,
        }
    }

    /// Create a language-tagged literal, validating the tag's shape
    pub fn lang_literal(value: impl Into<String>, lang: &str) -> RdfResult<Self> {
        let (tag, direction) = match lang.split_once("--") {
            Some((tag, dir)) => (tag, Some(dir)),
            None => (lang, None),
        };
        if !is_language_tag(tag) || direction.is_some_and(|d| Direction::parse(d).is_none()) {
            return Err(RdfError::InvalidLanguageTag(lang.to_string()));
        }
        Ok(Term::PlainLiteral {
            value: value.into(),
            lang: Some(lang.to_string()),
        })
    }

    /// Create a directional language-tagged literal (`tag--ltr`/`tag--rtl`)
    pub fn directional_literal(value: impl Into<String>, tag: &str, direction: Direction) -> RdfResult<Self> {
        if !is_language_tag(tag) {
            return Err(RdfError::InvalidLanguageTag(tag.to_string()));
        }
        Ok(Term::PlainLiteral {
            value: value.into(),
            lang: Some(format!("{}--{}", tag, direction)),
        })
    }

    /// Create a typed literal
    pub fn typed_literal(value: impl Into<String>, datatype: Datatype) -> Self {
        Term::TypedLiteral {
            value: value.into(),
            datatype,
        }
    }

    /// Create an `xsd:boolean` literal
    pub fn boolean(value: bool) -> Self {
        Term::typed_literal(if value { "true" } else { "false" }, Datatype::Boolean)
    }

    /// Create an `xsd:double` literal in canonical lexical form
    pub fn double(value: f64) -> Self {
        Term::typed_literal(format_double(value), Datatype::Double)
    }

    /// Create an `xsd:integer` literal
    pub fn integer(value: i64) -> Self {
        Term::typed_literal(value.to_string(), Datatype::Integer)
    }

    /// Create a `geo:wktLiteral`
    pub fn wkt(value: impl Into<String>) -> Self {
        Term::typed_literal(value, Datatype::WktLiteral)
    }

    /// Check if this is a resource
    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Resource { .. })
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        !self.is_resource()
    }

    /// Lexical value of a literal, or the IRI of a resource
    pub fn value(&self) -> &str {
        match self {
            Term::Resource { iri } => iri,
            Term::PlainLiteral { value, .. } | Term::TypedLiteral { value, .. } => value,
        }
    }

    /// Language tag of a plain literal, including any direction suffix
    pub fn language(&self) -> Option<&str> {
        match self {
            Term::PlainLiteral { lang, .. } => lang.as_deref(),
            _ => None,
        }
    }

    /// Base direction of a directional plain literal
    pub fn direction(&self) -> Option<Direction> {
        self.language()
            .and_then(|lang| lang.split_once("--"))
            .and_then(|(_, dir)| Direction::parse(dir))
    }

    /// Datatype of a typed literal
    pub fn datatype(&self) -> Option<&Datatype> {
        match self {
            Term::TypedLiteral { datatype, .. } => Some(datatype),
            _ => None,
        }
    }

    /// Derive the term's category, if it belongs to one
    pub fn category(&self) -> Option<Category> {
        match self {
            Term::Resource { .. } => None,
            Term::PlainLiteral { lang: None, .. } => Some(Category::StringLike),
            Term::PlainLiteral { lang: Some(_), .. } => None,
            Term::TypedLiteral { value, datatype } => match datatype {
                d if d.is_numeric() => Some(Category::Numeric),
                Datatype::String => Some(Category::StringLike),
                Datatype::Boolean if value == "true" || value == "false" => Some(Category::Boolean),
                d if d.is_geographic() => Some(Category::Geographic),
                _ => None,
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.category() == Some(Category::Numeric)
    }

    pub fn is_string_like(&self) -> bool {
        self.category() == Some(Category::StringLike)
    }

    pub fn is_boolean(&self) -> bool {
        self.category() == Some(Category::Boolean)
    }

    pub fn is_geographic(&self) -> bool {
        self.category() == Some(Category::Geographic)
    }

    /// Promote a numeric literal to `f64`
    ///
    /// Returns `None` for non-numeric terms and for numeric literals whose
    /// lexical form is not valid for their datatype.
    pub fn as_f64(&self) -> Option<f64> {
        let Term::TypedLiteral { value, datatype } = self else {
            return None;
        };
        let lexical = value.trim();
        if datatype.is_integer() {
            parse_integer(lexical)
        } else {
            match datatype {
                Datatype::Decimal => parse_decimal(lexical),
                Datatype::Float | Datatype::Double => parse_floating(lexical),
                _ => None,
            }
        }
    }

    /// Value of a boolean-category literal
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Term::TypedLiteral {
                value,
                datatype: Datatype::Boolean,
            } => match value.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// String form used by the string functions
    ///
    /// Defined for resources, plain literals and `xsd:string` literals only.
    pub fn string_form(&self) -> Option<&str> {
        match self {
            Term::Resource { iri } => Some(iri),
            Term::PlainLiteral { value, .. } => Some(value),
            Term::TypedLiteral {
                value,
                datatype: Datatype::String,
            } => Some(value),
            Term::TypedLiteral { .. } => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Resource { iri } => write!(f, "<{}>", iri),
            Term::PlainLiteral { value, lang } => {
                write_quoted(f, value)?;
                if let Some(lang) = lang {
                    write!(f, "@{}", lang)?;
                }
                Ok(())
            }
            Term::TypedLiteral { value, datatype } => {
                write_quoted(f, value)?;
                write!(f, "^^{}", datatype)
            }
        }
    }
}

/// Write a literal's lexical form with N-Triples escapes
pub(crate) fn write_quoted(f: &mut impl fmt::Write, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Canonical `xsd:double` lexical form
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        format!("{}", value)
    }
}

fn parse_integer(lexical: &str) -> Option<f64> {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical.parse::<f64>().ok()
}

fn parse_decimal(lexical: &str) -> Option<f64> {
    let unsigned = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    lexical.parse::<f64>().ok()
}

fn parse_floating(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust also accepts "inf", "infinity" and "nan" spellings; XSD does not.
    if lexical.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    lexical.parse::<f64>().ok()
}

/// BCP-47 shape check: alphanumeric subtags of 1 to 8 characters separated
/// by single hyphens, the first one alphabetic.
pub fn is_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let Some(primary) = subtags.next() else {
        return false;
    };
    if primary.is_empty() || primary.len() > 8 || !primary.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    subtags.all(|s| !s.is_empty() && s.len() <= 8 && s.bytes().all(|b| b.is_ascii_alphanumeric()))
}

impl From<OxNamedNode> for Term {
    fn from(node: OxNamedNode) -> Self {
        Term::resource(node.into_string())
    }
}

impl From<OxLiteral> for Term {
    fn from(literal: OxLiteral) -> Self {
        let (value, datatype, lang) = literal.destruct();
        match (lang, datatype) {
            (Some(lang), _) => Term::PlainLiteral {
                value,
                lang: Some(lang),
            },
            (None, Some(datatype)) if datatype.as_str() == xsd::STRING => Term::simple_literal(value),
            (None, Some(datatype)) => Term::typed_literal(value, Datatype::from_iri(datatype.as_str())),
            (None, None) => Term::simple_literal(value),
        }
    }
}

impl TryFrom<OxTerm> for Term {
    type Error = RdfError;

    fn try_from(term: OxTerm) -> RdfResult<Self> {
        match term {
            OxTerm::NamedNode(n) => Ok(n.into()),
            OxTerm::Literal(l) => Ok(l.into()),
            other => Err(RdfError::UnsupportedTerm(other.to_string())),
        }
    }
}

impl TryFrom<&Term> for OxTerm {
    type Error = RdfError;

    fn try_from(term: &Term) -> RdfResult<Self> {
        match term {
            Term::Resource { iri } => OxNamedNode::new(iri.as_str())
                .map(OxTerm::NamedNode)
                .map_err(|e| RdfError::InvalidIri(e.to_string())),
            Term::PlainLiteral { value, lang: None } => {
                Ok(OxTerm::Literal(OxLiteral::new_simple_literal(value.as_str())))
            }
            Term::PlainLiteral { value, lang: Some(lang) } => {
                if lang.contains("--") {
                    return Err(RdfError::InvalidLanguageTag(lang.clone()));
                }
                OxLiteral::new_language_tagged_literal(value.as_str(), lang.as_str())
                    .map(OxTerm::Literal)
                    .map_err(|_| RdfError::InvalidLanguageTag(lang.clone()))
            }
            Term::TypedLiteral { value, datatype } => {
                let datatype = OxNamedNode::new(datatype.iri())
                    .map_err(|e| RdfError::InvalidIri(e.to_string()))?;
                Ok(OxTerm::Literal(OxLiteral::new_typed_literal(value.as_str(), datatype)))
            }
        }
    }
}

/// Datatype IRI of an RDF 1.2 language-tagged string, used when reporting
/// a literal's datatype to RDF tooling
pub fn language_string_datatype(term: &Term) -> Option<&'static str> {
    match term {
        Term::PlainLiteral { lang: Some(lang), .. } if lang.contains("--") => Some(rdf::DIR_LANG_STRING),
        Term::PlainLiteral { lang: Some(_), .. } => Some(rdf::LANG_STRING),
        _ => None,
    }
}
