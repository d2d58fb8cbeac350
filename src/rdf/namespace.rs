//! RDF namespace and prefix management
//!
//! This module handles namespace prefixes for compact IRI notation. Order
//! matters: when several namespaces match an IRI, the first registered one
//! wins.

use super::vocab;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    /// Abbreviate `iri` as `prefix:local` if it lies in this namespace
    pub fn abbreviate(&self, iri: &str) -> Option<String> {
        let local = iri.strip_prefix(self.iri.as_str())?;
        is_local_name(local).then(|| format!("{}:{}", self.prefix, local))
    }
}

/// Namespaces used by filter expressions, in rendering priority order
pub fn default_namespaces() -> Vec<Namespace> {
    vec![
        Namespace::new("xsd", vocab::xsd::NAMESPACE),
        Namespace::new("fn", vocab::xpath::NAMESPACE),
        Namespace::new("geo", vocab::geo::NAMESPACE),
        Namespace::new("geof", vocab::geof::NAMESPACE),
        Namespace::new("sparql", vocab::sparql::NAMESPACE),
    ]
}

/// Abbreviate `iri` with the first matching namespace of an ordered list
pub fn abbreviate(iri: &str, namespaces: &[Namespace]) -> Option<String> {
    namespaces.iter().find_map(|ns| ns.abbreviate(iri))
}

/// Local part of a prefixed name: non-empty, no IRI delimiters
fn is_local_name(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !local.ends_with('.')
}

/// Namespace manager with common prefixes
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings, in registration order
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create a new namespace manager with the filter vocabularies
    pub fn new() -> Self {
        let mut mgr = Self::empty();
        for ns in default_namespaces() {
            mgr.add_prefix(ns.prefix, ns.iri);
        }
        mgr.add_prefix("rdf", vocab::rdf::NAMESPACE);
        mgr
    }

    /// Create a namespace manager without any prefix
    pub fn empty() -> Self {
        Self {
            prefixes: IndexMap::new(),
        }
    }

    /// Add a prefix, keeping its original position when re-registered
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Compact an IRI using known prefixes
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .find_map(|(prefix, ns)| Namespace::new(prefix.as_str(), ns.as_str()).abbreviate(iri))
    }

    /// Get all registered prefixes, in registration order
    pub fn prefixes(&self) -> Vec<Namespace> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
            .collect()
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[Namespace]> for NamespaceManager {
    fn from(namespaces: &[Namespace]) -> Self {
        let mut mgr = Self::empty();
        for ns in namespaces {
            mgr.add_prefix(ns.prefix.clone(), ns.iri.clone());
        }
        mgr
    }
}
