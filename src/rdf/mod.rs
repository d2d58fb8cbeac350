//! RDF term model for filter evaluation
//!
//! This module provides:
//! - The closed [`Term`] type (resources, plain and typed literals)
//! - Category classification (numeric, string-like, boolean, geographic)
//! - A term codec whose printed and parsed forms are mutually inverse
//! - Namespace handling for compact IRI rendering
//!
//! # Example
//!
//! ```rust
//! use samyama_filter::rdf::{parse_term, Category, Datatype, Term};
//!
//! let term = Term::typed_literal("25", Datatype::Int);
//! assert_eq!(term.category(), Some(Category::Numeric));
//!
//! let parsed = parse_term(&term.to_string()).unwrap();
//! assert_eq!(parsed, term);
//! ```

mod namespace;
mod parser;
mod types;
pub mod vocab;

pub use types::{
    format_double, is_language_tag, language_string_datatype, Category, Datatype, Direction,
    RdfError, RdfResult, Term,
};

pub(crate) use types::write_quoted;

pub use parser::{parse_term, TermParseError, TermParseResult};

pub use namespace::{abbreviate, default_namespaces, Namespace, NamespaceManager};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        let _ns_mgr = NamespaceManager::new();
        let term = Term::boolean(true);
        assert_eq!(parse_term(&term.to_string()).unwrap(), term);
    }
}
