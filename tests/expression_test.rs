use proptest::prelude::*;
use samyama_filter::geometry::SpatialRelation;
use samyama_filter::rdf::{Datatype, Direction, Term};
use samyama_filter::sparql::expression::{ComparisonOp, Expression, ExpressionError, Operand};
use samyama_filter::sparql::SolutionRow;

fn var(name: &str) -> Operand {
    Operand::variable(name)
}

fn row() -> SolutionRow {
    SolutionRow::new()
        .with("A", &Term::typed_literal("5.1", Datatype::Double))
        .with("B", &Term::typed_literal("25", Datatype::Int))
}

fn numeric() -> impl Strategy<Value = Term> {
    prop_oneof![
        any::<i32>().prop_map(|i| Term::typed_literal(i.to_string(), Datatype::Int)),
        any::<i64>().prop_map(Term::integer),
        (-1.0e12f64..1.0e12).prop_map(Term::double),
        (-100_000i64..100_000, 0u32..1000).prop_map(|(w, f)| Term::typed_literal(format!("{}.{}", w, f), Datatype::Decimal)),
    ]
}

proptest! {
    #[test]
    fn prop_add_promotes_to_double(a in numeric(), b in numeric()) {
        let r = SolutionRow::new().with("a", &a).with("b", &b);
        let sum = Expression::add(var("a"), var("b")).unwrap().evaluate(&r);
        let expected = a.as_f64().unwrap() + b.as_f64().unwrap();
        prop_assert_eq!(sum, Some(Term::double(expected)));
    }

    #[test]
    fn prop_divide_by_zero_is_unbound(a in numeric()) {
        for zero in [Term::integer(0), Term::double(0.0), Term::typed_literal("-0.0", Datatype::Decimal)] {
            let r = SolutionRow::new().with("a", &a).with("z", &zero);
            prop_assert_eq!(Expression::divide(var("a"), var("z")).unwrap().evaluate(&r), None);
        }
    }

    #[test]
    fn prop_ordering_matches_f64(a in numeric(), b in numeric()) {
        let r = SolutionRow::new().with("a", &a).with("b", &b);
        let lt = Expression::compare(ComparisonOp::LessThan, var("a"), var("b")).unwrap().evaluate(&r);
        prop_assert_eq!(lt, Some(Term::boolean(a.as_f64().unwrap() < b.as_f64().unwrap())));
    }
}

#[test]
fn test_greater_than_of_sum() {
    let sum = Expression::add(var("A"), var("B")).unwrap();
    let expr = Expression::compare(ComparisonOp::GreaterThan, sum.into(), var("B")).unwrap();
    assert_eq!(expr.evaluate(&row()), Some(Term::boolean(true)));
}

#[test]
fn test_nested_division_by_zero() {
    let expr = Expression::divide(
        Expression::divide(var("A"), var("B")).unwrap().into(),
        Expression::subtract(var("A"), var("A")).unwrap().into(),
    )
    .unwrap();
    assert_eq!(expr.evaluate(&row()), None);
}

#[test]
fn test_substring_of_resource() {
    let r = row().with("A", &Term::resource("http://example.org/"));
    let expr = Expression::substring(var("A"), -2, Some(7));
    assert_eq!(expr.evaluate(&r), Some(Term::simple_literal("http://")));
}

#[test]
fn test_str_lang_dir() {
    let expr = Expression::str_lang_dir(
        Operand::constant(Term::simple_literal("hello")),
        Operand::constant(Term::simple_literal("en-US")),
        Direction::Ltr,
    );
    let result = expr.evaluate(&row()).unwrap();
    assert_eq!(result.value(), "hello");
    assert_eq!(result.language(), Some("en-US--ltr"));
}

#[test]
fn test_contains_line_inside_polygon() {
    let r = row()
        .with("P", &Term::wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))"))
        .with("L", &Term::wkt("LINESTRING(1 1, 3 2)"));
    let expr = Expression::geo_predicate(SpatialRelation::SfContains, var("P"), var("L")).unwrap();
    assert_eq!(expr.evaluate(&r), Some(Term::boolean(true)));
}

#[test]
fn test_equality_is_total_ordering_is_partial() {
    let r = row().with("x", &Term::resource("http://example.org/x"));
    let twenty_five = || Operand::constant(Term::typed_literal("25", Datatype::Int));

    let eq = Expression::compare(ComparisonOp::Equal, var("x"), twenty_five()).unwrap();
    assert_eq!(eq.evaluate(&r), Some(Term::boolean(false)));

    let ne = Expression::compare(ComparisonOp::NotEqual, var("x"), twenty_five()).unwrap();
    assert_eq!(ne.evaluate(&r), Some(Term::boolean(true)));

    let lt = Expression::compare(ComparisonOp::LessThan, var("x"), twenty_five()).unwrap();
    assert_eq!(lt.evaluate(&r), None);

    // Same value, different datatype
    let same = Expression::compare(ComparisonOp::Equal, var("B"), Operand::constant(Term::integer(25))).unwrap();
    assert_eq!(same.evaluate(&r), Some(Term::boolean(false)));
    let ge = Expression::compare(ComparisonOp::GreaterThanOrEqual, var("B"), Operand::constant(Term::integer(25))).unwrap();
    assert_eq!(ge.evaluate(&r), Some(Term::boolean(true)));
}

#[test]
fn test_conditional_short_circuit() {
    let failing = || Expression::divide(var("A"), Operand::constant(Term::integer(0))).unwrap();
    let ok = Operand::constant(Term::simple_literal("ok"));

    let r = row().with("yes", &Term::boolean(true)).with("no", &Term::boolean(false));

    let expr = Expression::if_then_else(var("yes"), ok.clone(), failing().into());
    assert_eq!(expr.evaluate(&r), Some(Term::simple_literal("ok")));

    let expr = Expression::if_then_else(var("no"), failing().into(), ok.clone());
    assert_eq!(expr.evaluate(&r), Some(Term::simple_literal("ok")));

    let expr = Expression::if_then_else(var("yes"), failing().into(), ok.clone());
    assert_eq!(expr.evaluate(&r), None);

    // Condition must be boolean
    let expr = Expression::if_then_else(var("B"), ok.clone(), ok);
    assert_eq!(expr.evaluate(&r), None);
}

#[test]
fn test_strict_propagation() {
    let mut r = row();
    r.bind_unbound("nothing");
    for leaf in ["missing", "nothing"] {
        let inner = Expression::add(var("A"), var(leaf)).unwrap();
        let middle = Expression::multiply(inner.into(), var("B")).unwrap();
        let cond = Expression::compare(ComparisonOp::LessThan, middle.into(), var("B")).unwrap();
        let root = Expression::if_then_else(cond.into(), Operand::constant(Term::boolean(true)), Operand::constant(Term::boolean(true)));
        assert_eq!(root.evaluate(&r), None);
    }
}

#[test]
fn test_garbled_binding_is_unbound() {
    let mut r = row();
    r.bind_serialized("C", "\"unterminated");
    let expr = Expression::add(var("C"), var("B")).unwrap();
    assert_eq!(expr.evaluate(&r), None);
}

#[test]
fn test_construction_failures() {
    let constant = || Operand::constant(Term::integer(1));
    assert!(matches!(
        Expression::add(constant(), var("B")),
        Err(ExpressionError::ConstantLeftOperand(_))
    ));
    assert!(matches!(
        Expression::compare(ComparisonOp::Equal, constant(), var("B")),
        Err(ExpressionError::ConstantLeftOperand(_))
    ));
    assert!(matches!(
        Expression::geo_relate(var("a"), var("b"), "TTTTTTTTX"),
        Err(ExpressionError::InvalidDe9imPattern(_))
    ));
    assert!(matches!(
        Expression::geo_predicate(SpatialRelation::SfWithin, var("a"), constant()),
        Err(ExpressionError::NonGeographicConstant { .. })
    ));
    // Geo nodes accept constants on either side
    assert!(Expression::geo_predicate(SpatialRelation::SfWithin, Operand::constant(Term::wkt("POINT(1 1)")), var("a")).is_ok());
}

#[test]
fn test_concurrent_evaluation() {
    let sum = Expression::add(var("x"), Operand::constant(Term::integer(1))).unwrap();
    let expr = Expression::compare(ComparisonOp::GreaterThan, sum.into(), Operand::constant(Term::integer(50))).unwrap();

    std::thread::scope(|s| {
        for t in 0..4i64 {
            let expr = &expr;
            s.spawn(move || {
                for i in 0..100i64 {
                    let r = SolutionRow::new().with("x", &Term::integer(t * 100 + i));
                    let expected = t * 100 + i + 1 > 50;
                    assert_eq!(expr.evaluate(&r), Some(Term::boolean(expected)));
                }
            });
        }
    });
}
