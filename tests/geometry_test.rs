use approx::assert_relative_eq;
use samyama_filter::geometry::{
    De9imMatrix, GeoEngine, GeoError, GeoResult, Geometry, GeometryEngine, Measure, SetOperation, SpatialRelation,
};
use samyama_filter::rdf::{Datatype, Term};
use samyama_filter::sparql::expression::{EvalContext, Expression, Operand};
use samyama_filter::sparql::{FilterEvaluator, SolutionRow};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Engine answering every relation with a fixed matrix
struct MockGeometryEngine {
    matrix: &'static str,
    relate_calls: Arc<AtomicUsize>,
}

impl MockGeometryEngine {
    fn new(matrix: &'static str) -> Self {
        Self {
            matrix,
            relate_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl GeometryEngine for MockGeometryEngine {
    fn parse_wkt(&self, text: &str) -> GeoResult<Geometry<f64>> {
        if text.starts_with("BAD") {
            return Err(GeoError::WktParse(text.to_string()));
        }
        Ok(Geometry::Point(geo_types::Point::new(0.0, 0.0)))
    }

    fn parse_gml(&self, text: &str) -> GeoResult<Geometry<f64>> {
        self.parse_wkt(text)
    }

    fn to_wkt(&self, _geometry: &Geometry<f64>) -> String {
        "POINT EMPTY".to_string()
    }

    fn relate(&self, _a: &Geometry<f64>, _b: &Geometry<f64>) -> GeoResult<De9imMatrix> {
        self.relate_calls.fetch_add(1, Ordering::SeqCst);
        De9imMatrix::new(self.matrix)
    }

    fn set_operation(&self, op: SetOperation, _a: &Geometry<f64>, _b: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        match op {
            SetOperation::Intersection => Ok(Geometry::Point(geo_types::Point::new(0.0, 0.0))),
            other => Err(GeoError::UnsupportedOperation(other.to_string())),
        }
    }

    fn measure(&self, _measure: Measure, _geometry: &Geometry<f64>) -> GeoResult<f64> {
        Ok(42.0)
    }

    fn to_equal_area(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        Ok(geometry.clone())
    }

    fn from_equal_area(&self, geometry: &Geometry<f64>) -> GeoResult<Geometry<f64>> {
        Ok(geometry.clone())
    }
}

fn var(name: &str) -> Operand {
    Operand::variable(name)
}

fn geo_row() -> SolutionRow {
    SolutionRow::new()
        .with("a", &Term::wkt("anything"))
        .with("b", &Term::wkt("anything"))
        .with("bad", &Term::wkt("BAD"))
        .with("text", &Term::simple_literal("POINT(0 0)"))
}

#[test]
fn test_predicates_delegate_to_engine() {
    // Polygon containing a polygon
    let engine = MockGeometryEngine::new("212FF1FF2");
    let ctx = EvalContext::new(&engine);
    let row = geo_row();

    let eval = |relation| {
        Expression::geo_predicate(relation, var("a"), var("b"))
            .unwrap()
            .evaluate_with(&row, &ctx)
    };
    assert_eq!(eval(SpatialRelation::SfContains), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::SfWithin), Some(Term::boolean(false)));
    assert_eq!(eval(SpatialRelation::EhContains), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::Rcc8Ntppi), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::SfDisjoint), Some(Term::boolean(false)));
    assert_eq!(engine.relate_calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_engine_not_called_for_unusable_operands() {
    let engine = MockGeometryEngine::new("FF2FF1212");
    let ctx = EvalContext::new(&engine);
    let row = geo_row();

    for other in ["bad", "text", "missing"] {
        let expr = Expression::geo_predicate(SpatialRelation::SfDisjoint, var("a"), var(other)).unwrap();
        assert_eq!(expr.evaluate_with(&row, &ctx), None);
    }
    assert_eq!(engine.relate_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_engine_errors_are_unbound() {
    let engine = MockGeometryEngine::new("212FF1FF2");
    let ctx = EvalContext::new(&engine);
    let row = geo_row();

    let union = Expression::geo_set_operation(SetOperation::Union, var("a"), var("b")).unwrap();
    assert_eq!(union.evaluate_with(&row, &ctx), None);

    let inter = Expression::geo_set_operation(SetOperation::Intersection, var("a"), var("b")).unwrap();
    assert_eq!(inter.evaluate_with(&row, &ctx), Some(Term::wkt("POINT EMPTY")));

    let area = Expression::geo_measure(Measure::Area, var("a")).unwrap();
    assert_eq!(area.evaluate_with(&row, &ctx), Some(Term::double(42.0)));
}

#[test]
fn test_filter_with_swapped_engine() {
    let engine = MockGeometryEngine::new("FF2FF1212");
    let calls = Arc::clone(&engine.relate_calls);
    let expr = Expression::geo_predicate(SpatialRelation::SfDisjoint, var("a"), var("b")).unwrap();
    let filter = FilterEvaluator::new(expr).with_engine(engine);

    let kept = filter.filter(vec![geo_row(), geo_row().with("b", &Term::wkt("BAD")), SolutionRow::new()]);
    assert_eq!(kept.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_real_engine_relations() {
    let row = SolutionRow::new()
        .with("square", &Term::wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))"))
        .with("shifted", &Term::wkt("POLYGON((2 2, 6 2, 6 6, 2 6, 2 2))"))
        .with("neighbour", &Term::wkt("POLYGON((4 0, 8 0, 8 4, 4 4, 4 0))"))
        .with("cross", &Term::wkt("LINESTRING(-1 2, 5 2)"));

    let eval = |relation, a: &str, b: &str| {
        Expression::geo_predicate(relation, var(a), var(b)).unwrap().evaluate(&row)
    };
    assert_eq!(eval(SpatialRelation::SfOverlaps, "square", "shifted"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::Rcc8Po, "square", "shifted"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::SfTouches, "square", "neighbour"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::EhMeet, "square", "neighbour"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::Rcc8Ec, "square", "neighbour"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::SfCrosses, "cross", "square"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::SfEquals, "square", "square"), Some(Term::boolean(true)));
    assert_eq!(eval(SpatialRelation::SfIntersects, "shifted", "neighbour"), Some(Term::boolean(true)));
}

#[test]
fn test_real_engine_set_operations() {
    let engine = GeoEngine::new();
    let a = engine.parse_wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
    let b = engine.parse_wkt("POLYGON((2 0, 6 0, 6 4, 2 4, 2 0))").unwrap();
    let planar_area = |g: &Geometry<f64>| {
        use geo::Area;
        g.unsigned_area()
    };

    let inter = engine.set_operation(SetOperation::Intersection, &a, &b).unwrap();
    assert_relative_eq!(planar_area(&inter), 8.0, epsilon = 1e-9);
    let union = engine.set_operation(SetOperation::Union, &a, &b).unwrap();
    assert_relative_eq!(planar_area(&union), 24.0, epsilon = 1e-9);
    let diff = engine.set_operation(SetOperation::Difference, &a, &b).unwrap();
    assert_relative_eq!(planar_area(&diff), 8.0, epsilon = 1e-9);
    let xor = engine.set_operation(SetOperation::SymDifference, &a, &b).unwrap();
    assert_relative_eq!(planar_area(&xor), 16.0, epsilon = 1e-9);

    // Disjoint inputs give an empty geometry rather than a failure
    let far = engine.parse_wkt("POLYGON((10 10, 11 10, 11 11, 10 11, 10 10))").unwrap();
    let empty = engine.set_operation(SetOperation::Intersection, &a, &far).unwrap();
    assert_eq!(planar_area(&empty), 0.0);
    assert!(engine.to_wkt(&empty).starts_with("MULTIPOLYGON"));
}

#[test]
fn test_crs_prefixed_and_gml_literals() {
    let row = SolutionRow::new()
        .with(
            "wkt",
            &Term::wkt("<http://www.opengis.net/def/crs/OGC/1.3/CRS84> POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))"),
        )
        .with(
            "gml",
            &Term::typed_literal(
                r#"<gml:LineString xmlns:gml="http://www.opengis.net/gml/3.2"><gml:posList>1 1 2 2 3 1</gml:posList></gml:LineString>"#,
                Datatype::GmlLiteral,
            ),
        );
    let expr = Expression::geo_relate(var("wkt"), var("gml"), "T*****FF*").unwrap();
    assert_eq!(expr.evaluate(&row), Some(Term::boolean(true)));
}

#[test]
fn test_measures() {
    let row = SolutionRow::new()
        .with("cell", &Term::wkt("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))"))
        .with("line", &Term::wkt("LINESTRING(0 0, 1 0)"));

    let area = Expression::geo_measure(Measure::Area, var("cell")).unwrap().evaluate(&row).unwrap();
    assert_relative_eq!(area.as_f64().unwrap(), 1.2308e10, max_relative = 1e-3);

    let length = Expression::geo_measure(Measure::Length, var("line")).unwrap().evaluate(&row).unwrap();
    assert_relative_eq!(length.as_f64().unwrap(), 111_195.0, max_relative = 1e-3);
}
