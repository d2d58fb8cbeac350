//! Filter expression trees
//!
//! An [`Expression`] is built once, validated at construction, and then
//! evaluated against any number of [`SolutionRow`]s. Evaluation returns
//! `None` ("unbound") whenever an operand is missing or does not fit the
//! operator; a single unbound leaf makes the whole tree unbound.
//!
//! # Example
//!
//! ```rust
//! use samyama_filter::rdf::{Datatype, Term};
//! use samyama_filter::sparql::expression::{ComparisonOp, Expression, Operand};
//! use samyama_filter::sparql::SolutionRow;
//!
//! let row = SolutionRow::new()
//!     .with("A", &Term::typed_literal("5.1", Datatype::Double))
//!     .with("B", &Term::typed_literal("25", Datatype::Int));
//!
//! let sum = Expression::add(Operand::variable("A"), Operand::variable("B")).unwrap();
//! let filter = Expression::compare(ComparisonOp::GreaterThan, sum.into(), Operand::variable("B")).unwrap();
//!
//! assert_eq!(filter.evaluate(&row), Some(Term::boolean(true)));
//! assert_eq!(filter.to_string(), "((?A + ?B) > ?B)");
//! ```

mod arithmetic;
mod comparison;
mod conditional;
mod error;
mod operand;
mod render;
mod spatial;
mod string;

pub use arithmetic::{Arithmetic, ArithmeticOp};
pub use comparison::{Comparison, ComparisonOp};
pub use conditional::Conditional;
pub use error::{ExpressionError, ExpressionResult};
pub use operand::Operand;
pub use render::render;
pub use spatial::{GeoMeasure, GeoPredicate, GeoRelate, GeoSetOperation};
pub use string::{Replace, StrLangDir, Substring};

use crate::geometry::{GeoEngine, GeometryEngine, Measure, SetOperation, SpatialRelation};
use crate::rdf::{Direction, Namespace, Term};
use crate::sparql::SolutionRow;
use std::fmt;

static DEFAULT_ENGINE: GeoEngine = GeoEngine::new();

/// Per-evaluation collaborators
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    geometry: &'a dyn GeometryEngine,
}

impl<'a> EvalContext<'a> {
    pub fn new(geometry: &'a dyn GeometryEngine) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &'a dyn GeometryEngine {
        self.geometry
    }
}

impl Default for EvalContext<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_ENGINE)
    }
}

impl fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext").finish_non_exhaustive()
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Arithmetic(Arithmetic),
    Comparison(Comparison),
    Conditional(Conditional),
    Substring(Substring),
    Replace(Replace),
    StrLangDir(StrLangDir),
    GeoPredicate(GeoPredicate),
    GeoRelate(GeoRelate),
    GeoSetOperation(GeoSetOperation),
    GeoMeasure(GeoMeasure),
}

impl Expression {
    pub fn arithmetic(op: ArithmeticOp, left: Operand, right: Operand) -> ExpressionResult<Self> {
        Arithmetic::new(op, left, right).map(Expression::Arithmetic)
    }

    pub fn add(left: Operand, right: Operand) -> ExpressionResult<Self> {
        Self::arithmetic(ArithmeticOp::Add, left, right)
    }

    pub fn subtract(left: Operand, right: Operand) -> ExpressionResult<Self> {
        Self::arithmetic(ArithmeticOp::Subtract, left, right)
    }

    pub fn multiply(left: Operand, right: Operand) -> ExpressionResult<Self> {
        Self::arithmetic(ArithmeticOp::Multiply, left, right)
    }

    pub fn divide(left: Operand, right: Operand) -> ExpressionResult<Self> {
        Self::arithmetic(ArithmeticOp::Divide, left, right)
    }

    pub fn compare(op: ComparisonOp, left: Operand, right: Operand) -> ExpressionResult<Self> {
        Comparison::new(op, left, right).map(Expression::Comparison)
    }

    pub fn if_then_else(condition: Operand, then: Operand, otherwise: Operand) -> Self {
        Expression::Conditional(Conditional::new(condition, then, otherwise))
    }

    pub fn substring(source: Operand, start: i64, length: Option<i64>) -> Self {
        Expression::Substring(Substring::new(source, start, length))
    }

    pub fn replace(
        source: Operand,
        replacement: Operand,
        pattern: &str,
        flags: &str,
    ) -> ExpressionResult<Self> {
        Replace::new(source, replacement, pattern, flags).map(Expression::Replace)
    }

    pub fn str_lang_dir(source: Operand, lang: Operand, direction: Direction) -> Self {
        Expression::StrLangDir(StrLangDir::new(source, lang, direction))
    }

    pub fn geo_predicate(
        relation: SpatialRelation,
        left: Operand,
        right: Operand,
    ) -> ExpressionResult<Self> {
        GeoPredicate::new(relation, left, right).map(Expression::GeoPredicate)
    }

    pub fn geo_relate(left: Operand, right: Operand, pattern: &str) -> ExpressionResult<Self> {
        GeoRelate::new(left, right, pattern).map(Expression::GeoRelate)
    }

    pub fn geo_set_operation(op: SetOperation, left: Operand, right: Operand) -> ExpressionResult<Self> {
        GeoSetOperation::new(op, left, right).map(Expression::GeoSetOperation)
    }

    pub fn geo_measure(measure: Measure, operand: Operand) -> ExpressionResult<Self> {
        GeoMeasure::new(measure, operand).map(Expression::GeoMeasure)
    }

    /// Evaluate with the default geometry engine
    pub fn evaluate(&self, row: &SolutionRow) -> Option<Term> {
        self.evaluate_with(row, &EvalContext::default())
    }

    /// Evaluate against a row
    pub fn evaluate_with(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        match self {
            Expression::Arithmetic(e) => e.evaluate(row, ctx),
            Expression::Comparison(e) => e.evaluate(row, ctx),
            Expression::Conditional(e) => e.evaluate(row, ctx),
            Expression::Substring(e) => e.evaluate(row, ctx),
            Expression::Replace(e) => e.evaluate(row, ctx),
            Expression::StrLangDir(e) => e.evaluate(row, ctx),
            Expression::GeoPredicate(e) => e.evaluate(row, ctx),
            Expression::GeoRelate(e) => e.evaluate(row, ctx),
            Expression::GeoSetOperation(e) => e.evaluate(row, ctx),
            Expression::GeoMeasure(e) => e.evaluate(row, ctx),
        }
    }

    /// Canonical text, abbreviating IRIs with the first matching namespace
    pub fn render(&self, namespaces: &[Namespace]) -> String {
        render(self, namespaces)
    }
}

/// Canonical text with full IRIs
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &[]))
    }
}
