//! Solution rows (variable bindings)
//!
//! A row maps variable names to the serialized form of a term. A missing
//! variable and a variable bound to `null` are both unbound.

use crate::rdf::{parse_term, Term};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Query solution: variable name → optional serialized term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "FxHashMap<String, Option<String>>",
    into = "FxHashMap<String, Option<String>>"
)]
pub struct SolutionRow {
    bindings: FxHashMap<String, Option<String>>,
}

/// Variable names are stored without the leading `?`
fn key(variable: &str) -> &str {
    variable.strip_prefix('?').unwrap_or(variable)
}

impl SolutionRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a term
    pub fn bind(&mut self, variable: &str, term: &Term) {
        self.bindings.insert(key(variable).to_string(), Some(term.to_string()));
    }

    /// Bind a variable to an already serialized term
    pub fn bind_serialized(&mut self, variable: &str, value: impl Into<String>) {
        self.bindings.insert(key(variable).to_string(), Some(value.into()));
    }

    /// Record a variable as present but unbound
    pub fn bind_unbound(&mut self, variable: &str) {
        self.bindings.insert(key(variable).to_string(), None);
    }

    /// Builder form of [`SolutionRow::bind`]
    pub fn with(mut self, variable: &str, term: &Term) -> Self {
        self.bind(variable, term);
        self
    }

    /// Serialized binding, `None` when absent or null
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.bindings.get(key(variable)).and_then(|v| v.as_deref())
    }

    /// Parsed binding
    ///
    /// A stored value that does not parse is treated as unbound.
    pub fn term(&self, variable: &str) -> Option<Term> {
        let raw = self.get(variable)?;
        match parse_term(raw) {
            Ok(term) => Some(term),
            Err(e) => {
                debug!("Binding ?{} = {:?} is not a valid term: {}", key(variable), raw, e);
                None
            }
        }
    }

    /// Check whether a variable is present, bound or not
    pub fn contains(&self, variable: &str) -> bool {
        self.bindings.contains_key(key(variable))
    }

    /// Variable names, sorted
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl From<FxHashMap<String, Option<String>>> for SolutionRow {
    fn from(bindings: FxHashMap<String, Option<String>>) -> Self {
        bindings.into_iter().collect()
    }
}

impl From<SolutionRow> for FxHashMap<String, Option<String>> {
    fn from(row: SolutionRow) -> Self {
        row.bindings
    }
}

impl<K: AsRef<str>> FromIterator<(K, Option<String>)> for SolutionRow {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let bindings = iter
            .into_iter()
            .map(|(k, v)| (key(k.as_ref()).to_string(), v))
            .collect();
        Self { bindings }
    }
}

impl<'a> FromIterator<(&'a str, Term)> for SolutionRow {
    fn from_iter<I: IntoIterator<Item = (&'a str, Term)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (variable, term) in iter {
            row.bind(variable, &term);
        }
        row
    }
}
