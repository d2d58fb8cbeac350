//! GeoSPARQL functions
//!
//! Operands must be `geo:wktLiteral` or `geo:gmlLiteral` terms. Constant
//! operands are checked when the node is built; bound values are checked
//! per row, and anything that is not a parsable geometry makes the result
//! unbound.

use super::{EvalContext, ExpressionError, ExpressionResult, Operand};
use crate::geometry::{De9imPattern, Geometry, Measure, SetOperation, SpatialRelation};
use crate::rdf::{Datatype, Term};
use crate::sparql::SolutionRow;
use tracing::debug;

fn check_geographic(function: &str, operand: &Operand) -> ExpressionResult<()> {
    match operand {
        Operand::Constant(term) if !term.is_geographic() => Err(ExpressionError::NonGeographicConstant {
            function: function.to_string(),
            term: term.to_string(),
        }),
        _ => Ok(()),
    }
}

fn resolve_geometry(operand: &Operand, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Geometry<f64>> {
    let term = operand.resolve(row, ctx)?;
    let engine = ctx.geometry();
    let parsed = match term.datatype()? {
        Datatype::WktLiteral => engine.parse_wkt(term.value()),
        Datatype::GmlLiteral => engine.parse_gml(term.value()),
        _ => return None,
    };
    match parsed {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            debug!("Geometry literal {} rejected: {}", term, e);
            None
        }
    }
}

/// Named topological relation (`geof:sfContains`, `geof:ehMeet`, `geof:rcc8po`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPredicate {
    pub(super) relation: SpatialRelation,
    pub(super) left: Operand,
    pub(super) right: Operand,
}

impl GeoPredicate {
    pub fn new(relation: SpatialRelation, left: Operand, right: Operand) -> ExpressionResult<Self> {
        check_geographic(relation.function_name(), &left)?;
        check_geographic(relation.function_name(), &right)?;
        Ok(Self {
            relation,
            left,
            right,
        })
    }

    pub fn relation(&self) -> SpatialRelation {
        self.relation
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let a = resolve_geometry(&self.left, row, ctx)?;
        let b = resolve_geometry(&self.right, row, ctx)?;
        match ctx.geometry().relate(&a, &b) {
            Ok(matrix) => Some(Term::boolean(self.relation.holds(&matrix))),
            Err(e) => {
                debug!("{} failed: {}", self.relation, e);
                None
            }
        }
    }
}

/// `geof:relate(a, b, pattern)` against a raw DE-9IM pattern
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRelate {
    pub(super) left: Operand,
    pub(super) right: Operand,
    pub(super) pattern: De9imPattern,
}

impl GeoRelate {
    pub fn new(left: Operand, right: Operand, pattern: &str) -> ExpressionResult<Self> {
        check_geographic("relate", &left)?;
        check_geographic("relate", &right)?;
        let pattern = De9imPattern::new(pattern)
            .map_err(|_| ExpressionError::InvalidDe9imPattern(pattern.to_string()))?;
        Ok(Self {
            left,
            right,
            pattern,
        })
    }

    pub fn pattern(&self) -> &De9imPattern {
        &self.pattern
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let a = resolve_geometry(&self.left, row, ctx)?;
        let b = resolve_geometry(&self.right, row, ctx)?;
        match ctx.geometry().relate(&a, &b) {
            Ok(matrix) => Some(Term::boolean(matrix.matches(&self.pattern))),
            Err(e) => {
                debug!("relate failed: {}", e);
                None
            }
        }
    }
}

/// Point-set operation producing a `geo:wktLiteral`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSetOperation {
    pub(super) op: SetOperation,
    pub(super) left: Operand,
    pub(super) right: Operand,
}

impl GeoSetOperation {
    pub fn new(op: SetOperation, left: Operand, right: Operand) -> ExpressionResult<Self> {
        check_geographic(op.function_name(), &left)?;
        check_geographic(op.function_name(), &right)?;
        Ok(Self { op, left, right })
    }

    pub fn op(&self) -> SetOperation {
        self.op
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let a = resolve_geometry(&self.left, row, ctx)?;
        let b = resolve_geometry(&self.right, row, ctx)?;
        let engine = ctx.geometry();
        match engine.set_operation(self.op, &a, &b) {
            Ok(result) => Some(Term::wkt(engine.to_wkt(&result))),
            Err(e) => {
                debug!("{} failed: {}", self.op, e);
                None
            }
        }
    }
}

/// `geof:area` / `geof:length` as an `xsd:double` in metric units
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMeasure {
    pub(super) measure: Measure,
    pub(super) operand: Operand,
}

impl GeoMeasure {
    pub fn new(measure: Measure, operand: Operand) -> ExpressionResult<Self> {
        check_geographic(measure.function_name(), &operand)?;
        Ok(Self { measure, operand })
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let geometry = resolve_geometry(&self.operand, row, ctx)?;
        match ctx.geometry().measure(self.measure, &geometry) {
            Ok(value) => Some(Term::double(value)),
            Err(e) => {
                debug!("{} failed: {}", self.measure, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))";

    fn row() -> SolutionRow {
        SolutionRow::new()
            .with("poly", &Term::wkt(SQUARE))
            .with("inner", &Term::wkt("LINESTRING(2 2, 8 8)"))
            .with("far", &Term::wkt("POINT(50 50)"))
            .with("broken", &Term::wkt("POLYGON((0 0"))
            .with("text", &Term::simple_literal(SQUARE))
    }

    fn predicate(relation: SpatialRelation, left: &str, right: &str) -> Option<Term> {
        GeoPredicate::new(relation, Operand::variable(left), Operand::variable(right))
            .unwrap()
            .evaluate(&row(), &EvalContext::default())
    }

    #[test]
    fn test_contains_and_within() {
        assert_eq!(predicate(SpatialRelation::SfContains, "poly", "inner"), Some(Term::boolean(true)));
        assert_eq!(predicate(SpatialRelation::SfWithin, "inner", "poly"), Some(Term::boolean(true)));
        assert_eq!(predicate(SpatialRelation::SfWithin, "poly", "inner"), Some(Term::boolean(false)));
        assert_eq!(predicate(SpatialRelation::SfDisjoint, "poly", "far"), Some(Term::boolean(true)));
    }

    #[test]
    fn test_unusable_operands_are_unbound() {
        assert_eq!(predicate(SpatialRelation::SfContains, "poly", "broken"), None);
        assert_eq!(predicate(SpatialRelation::SfContains, "poly", "text"), None);
        assert_eq!(predicate(SpatialRelation::SfContains, "poly", "missing"), None);
    }

    #[test]
    fn test_constant_must_be_geographic() {
        let err = GeoPredicate::new(
            SpatialRelation::SfContains,
            Operand::variable("poly"),
            Operand::constant(Term::simple_literal("POINT(1 1)")),
        )
        .unwrap_err();
        assert!(matches!(err, ExpressionError::NonGeographicConstant { .. }));

        assert!(GeoMeasure::new(Measure::Area, Operand::constant(Term::wkt(SQUARE))).is_ok());
    }

    #[test]
    fn test_relate_pattern() {
        let expr = GeoRelate::new(Operand::variable("poly"), Operand::variable("inner"), "T*****FF*").unwrap();
        assert_eq!(expr.evaluate(&row(), &EvalContext::default()), Some(Term::boolean(true)));

        for bad in ["T*****FF", "T*****FF*F", "T*****FFX", ""] {
            assert!(matches!(
                GeoRelate::new(Operand::variable("a"), Operand::variable("b"), bad),
                Err(ExpressionError::InvalidDe9imPattern(_))
            ));
        }
    }

    #[test]
    fn test_set_operation_yields_wkt() {
        let expr = GeoSetOperation::new(
            SetOperation::Intersection,
            Operand::variable("poly"),
            Operand::constant(Term::wkt("POLYGON((5 5, 15 5, 15 15, 5 15, 5 5))")),
        )
        .unwrap();
        let result = expr.evaluate(&row(), &EvalContext::default()).unwrap();
        assert!(result.is_geographic());
        assert!(result.value().starts_with("MULTIPOLYGON"));
    }

    #[test]
    fn test_gml_operand() {
        let gml = Term::typed_literal(
            r#"<gml:Point xmlns:gml="http://www.opengis.net/gml/3.2"><gml:pos>5 5</gml:pos></gml:Point>"#,
            Datatype::GmlLiteral,
        );
        let expr = GeoPredicate::new(SpatialRelation::SfContains, Operand::variable("poly"), Operand::constant(gml)).unwrap();
        assert_eq!(expr.evaluate(&row(), &EvalContext::default()), Some(Term::boolean(true)));
    }
}
