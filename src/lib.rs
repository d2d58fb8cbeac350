//! Samyama Filter
//!
//! Evaluation core for SPARQL 1.2 `FILTER` expressions with GeoSPARQL
//! functions.
//!
//! # Architecture
//!
//! - [`rdf`]: the term model, its canonical text codec and namespace prefixes
//! - [`geometry`]: WKT and GML literals, DE-9IM relations, set operations and
//!   metric measures behind the [`geometry::GeometryEngine`] trait
//! - [`sparql`]: solution rows, expression trees, JSON build plans and the
//!   row filter
//! - [`config`]: YAML evaluator configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_filter::rdf::{Datatype, Term};
//! use samyama_filter::sparql::expression::{ComparisonOp, Expression, Operand};
//! use samyama_filter::sparql::{FilterEvaluator, SolutionRow};
//!
//! // ((?A + ?B) > ?B)
//! let sum = Expression::add(Operand::variable("A"), Operand::variable("B")).unwrap();
//! let expr = Expression::compare(ComparisonOp::GreaterThan, sum.into(), Operand::variable("B")).unwrap();
//!
//! let row = SolutionRow::new()
//!     .with("A", &Term::typed_literal("5.1", Datatype::Double))
//!     .with("B", &Term::typed_literal("25", Datatype::Int));
//!
//! let filter = FilterEvaluator::new(expr);
//! assert!(filter.passes(&row));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod geometry;
pub mod rdf;
pub mod sparql;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, EvaluatorConfig};

pub use geometry::{GeoEngine, GeoError, GeoResult, GeometryEngine, Measure, SetOperation, SpatialRelation};

pub use rdf::{parse_term, Datatype, Direction, Namespace, NamespaceManager, Term};

pub use sparql::{
    EvalContext, Expression, ExpressionError, ExpressionPlan, ExpressionResult, FilterEvaluator,
    Operand, SolutionRow,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
