use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use samyama_filter::geometry::SpatialRelation;
use samyama_filter::rdf::{Datatype, Term};
use samyama_filter::sparql::expression::{ComparisonOp, Expression, Operand};
use samyama_filter::sparql::{FilterEvaluator, SolutionRow};
use std::hint::black_box;

fn numeric_rows(size: usize) -> Vec<SolutionRow> {
    (0..size)
        .map(|i| {
            SolutionRow::new()
                .with("A", &Term::typed_literal(format!("{}.5", i % 100), Datatype::Double))
                .with("B", &Term::typed_literal((i % 50).to_string(), Datatype::Int))
        })
        .collect()
}

/// ((?A + ?B) > ?B) over batches of rows
fn bench_arithmetic_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic_filter");
    let sum = Expression::add(Operand::variable("A"), Operand::variable("B")).unwrap();
    let expr = Expression::compare(ComparisonOp::GreaterThan, sum.into(), Operand::variable("B")).unwrap();
    let filter = FilterEvaluator::new(expr);

    for size in [100, 1000, 10_000].iter() {
        let rows = numeric_rows(*size);
        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| black_box(filter.filter(rows.clone())));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            b.iter(|| black_box(filter.filter_parallel(rows.clone())));
        });
    }
    group.finish();
}

/// Regex replacement on string bindings
fn bench_replace(c: &mut Criterion) {
    let expr = Expression::replace(
        Operand::variable("s"),
        Operand::constant(Term::simple_literal("https://$1")),
        "^http://([^/]+)",
        "i",
    )
    .unwrap();
    let row = SolutionRow::new().with("s", &Term::resource("http://example.org/path/to/resource"));

    c.bench_function("replace", |b| b.iter(|| black_box(expr.evaluate(&row))));
}

/// Point-in-polygon against a WKT constant
fn bench_geo_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo_within");
    let expr = Expression::geo_predicate(
        SpatialRelation::SfWithin,
        Operand::variable("p"),
        Operand::constant(Term::wkt("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))")),
    )
    .unwrap();
    let filter = FilterEvaluator::new(expr);

    for size in [100, 1000].iter() {
        let rows: Vec<SolutionRow> = (0..*size)
            .map(|i| SolutionRow::new().with("p", &Term::wkt(format!("POINT({} {})", i % 20, i % 7))))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(filter.filter_parallel(rows.clone())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_arithmetic_filter, bench_replace, bench_geo_within);
criterion_main!(benches);
