//! SPARQL filter evaluation
//!
//! Solution rows, filter expression trees, JSON build plans and the row
//! filter that ties them together.
//!
//! # Example
//!
//! ```rust
//! use samyama_filter::rdf::Term;
//! use samyama_filter::sparql::expression::{ComparisonOp, Expression, Operand};
//! use samyama_filter::sparql::{FilterEvaluator, SolutionRow};
//!
//! let filter = FilterEvaluator::new(
//!     Expression::compare(
//!         ComparisonOp::LessThan,
//!         Operand::variable("age"),
//!         Operand::constant(Term::integer(30)),
//!     )
//!     .unwrap(),
//! );
//!
//! let rows = vec![
//!     SolutionRow::new().with("age", &Term::integer(25)),
//!     SolutionRow::new().with("age", &Term::integer(41)),
//! ];
//! assert_eq!(filter.filter(rows).len(), 1);
//! ```

pub mod expression;
mod filter;
mod plan;
mod solution;

pub use expression::{EvalContext, Expression, ExpressionError, ExpressionResult, Operand};
pub use filter::FilterEvaluator;
pub use plan::{ExpressionPlan, OperandPlan};
pub use solution::SolutionRow;
