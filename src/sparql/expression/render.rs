//! Canonical text form of expression trees
//!
//! Binary operators print as `(left op right)`, functions as
//! `(name(args))`. Function and datatype IRIs are abbreviated with the
//! first matching namespace, otherwise printed in full as `<iri>`.

use super::{Expression, Operand};
use crate::rdf::vocab::{geof, sparql, xpath};
use crate::rdf::{abbreviate, write_quoted, Namespace, Term};
use std::fmt;

/// Render an expression with the given namespaces
pub fn render(expr: &Expression, namespaces: &[Namespace]) -> String {
    Rendered { expr, namespaces }.to_string()
}

struct Rendered<'a> {
    expr: &'a Expression,
    namespaces: &'a [Namespace],
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, self.expr, self.namespaces)
    }
}

fn write_expression(f: &mut fmt::Formatter<'_>, expr: &Expression, ns: &[Namespace]) -> fmt::Result {
    match expr {
        Expression::Arithmetic(e) => write_binary(f, &e.left, e.op.symbol(), &e.right, ns),
        Expression::Comparison(e) => write_binary(f, &e.left, e.op.symbol(), &e.right, ns),
        Expression::Conditional(e) => {
            f.write_str("(IF(")?;
            write_args(f, &[&e.condition, &e.then, &e.otherwise], ns)?;
            f.write_str("))")
        }
        Expression::Substring(e) => {
            write_function_open(f, xpath::NAMESPACE, "substring", ns)?;
            write_operand(f, &e.source, ns)?;
            write!(f, ", {}", e.start)?;
            if let Some(length) = e.length {
                write!(f, ", {}", length)?;
            }
            f.write_str("))")
        }
        Expression::Replace(e) => {
            write_function_open(f, xpath::NAMESPACE, "replace", ns)?;
            write_operand(f, &e.source, ns)?;
            f.write_str(", ")?;
            write_quoted(f, &e.pattern)?;
            f.write_str(", ")?;
            write_operand(f, &e.replacement, ns)?;
            if !e.flags.is_empty() {
                f.write_str(", ")?;
                write_quoted(f, &e.flags)?;
            }
            f.write_str("))")
        }
        Expression::StrLangDir(e) => {
            write_function_open(f, sparql::NAMESPACE, "strLangDir", ns)?;
            write_args(f, &[&e.source, &e.lang], ns)?;
            write!(f, ", \"{}\"))", e.direction)
        }
        Expression::GeoPredicate(e) => {
            write_function_open(f, geof::NAMESPACE, e.relation.function_name(), ns)?;
            write_args(f, &[&e.left, &e.right], ns)?;
            f.write_str("))")
        }
        Expression::GeoRelate(e) => {
            write_function_open(f, geof::NAMESPACE, "relate", ns)?;
            write_args(f, &[&e.left, &e.right], ns)?;
            write!(f, ", \"{}\"))", e.pattern)
        }
        Expression::GeoSetOperation(e) => {
            write_function_open(f, geof::NAMESPACE, e.op.function_name(), ns)?;
            write_args(f, &[&e.left, &e.right], ns)?;
            f.write_str("))")
        }
        Expression::GeoMeasure(e) => {
            write_function_open(f, geof::NAMESPACE, e.measure.function_name(), ns)?;
            write_operand(f, &e.operand, ns)?;
            f.write_str("))")
        }
    }
}

fn write_binary(
    f: &mut fmt::Formatter<'_>,
    left: &Operand,
    op: &str,
    right: &Operand,
    ns: &[Namespace],
) -> fmt::Result {
    f.write_str("(")?;
    write_operand(f, left, ns)?;
    write!(f, " {} ", op)?;
    write_operand(f, right, ns)?;
    f.write_str(")")
}

fn write_function_open(f: &mut fmt::Formatter<'_>, namespace: &str, local: &str, ns: &[Namespace]) -> fmt::Result {
    f.write_str("(")?;
    write_iri(f, &format!("{}{}", namespace, local), ns)?;
    f.write_str("(")
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[&Operand], ns: &[Namespace]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_operand(f, arg, ns)?;
    }
    Ok(())
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Operand, ns: &[Namespace]) -> fmt::Result {
    match operand {
        Operand::Variable(name) => write!(f, "?{}", name),
        Operand::Expression(expr) => write_expression(f, expr, ns),
        Operand::Constant(term) => write_term(f, term, ns),
    }
}

fn write_term(f: &mut fmt::Formatter<'_>, term: &Term, ns: &[Namespace]) -> fmt::Result {
    match term {
        Term::TypedLiteral { value, datatype } => {
            write_quoted(f, value)?;
            f.write_str("^^")?;
            write_iri(f, datatype.iri(), ns)
        }
        other => write!(f, "{}", other),
    }
}

fn write_iri(f: &mut fmt::Formatter<'_>, iri: &str, ns: &[Namespace]) -> fmt::Result {
    match abbreviate(iri, ns) {
        Some(compact) => f.write_str(&compact),
        None => write!(f, "<{}>", iri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Measure, SetOperation, SpatialRelation};
    use crate::rdf::{default_namespaces, Datatype, Direction};
    use crate::sparql::expression::ComparisonOp;

    fn var(name: &str) -> Operand {
        Operand::variable(name)
    }

    #[test]
    fn test_binary_nesting() {
        let sum = Expression::add(var("A"), var("B")).unwrap();
        let expr = Expression::compare(ComparisonOp::GreaterThan, sum.into(), var("B")).unwrap();
        assert_eq!(render(&expr, &[]), "((?A + ?B) > ?B)");
    }

    #[test]
    fn test_constant_datatypes() {
        let expr = Expression::compare(
            ComparisonOp::Equal,
            var("B"),
            Operand::constant(Term::typed_literal("25", Datatype::Int)),
        )
        .unwrap();
        assert_eq!(render(&expr, &default_namespaces()), "(?B = \"25\"^^xsd:int)");
        assert_eq!(
            render(&expr, &[]),
            "(?B = \"25\"^^<http://www.w3.org/2001/XMLSchema#int>)"
        );
    }

    #[test]
    fn test_function_names() {
        let ns = default_namespaces();
        let substr = Expression::substring(var("A"), -2, Some(7));
        assert_eq!(render(&substr, &ns), "(fn:substring(?A, -2, 7))");
        assert_eq!(
            render(&substr, &[]),
            "(<http://www.w3.org/2005/xpath-functions#substring>(?A, -2, 7))"
        );

        let replace = Expression::replace(var("A"), var("B"), "a\"b", "i").unwrap();
        assert_eq!(render(&replace, &ns), "(fn:replace(?A, \"a\\\"b\", ?B, \"i\"))");

        let dir = Expression::str_lang_dir(
            Operand::constant(Term::simple_literal("hello")),
            Operand::constant(Term::simple_literal("en-US")),
            Direction::Ltr,
        );
        assert_eq!(render(&dir, &ns), "(sparql:strLangDir(\"hello\", \"en-US\", \"ltr\"))");
    }

    #[test]
    fn test_geo_functions() {
        let ns = default_namespaces();
        let contains = Expression::geo_predicate(SpatialRelation::SfContains, var("a"), var("b")).unwrap();
        assert_eq!(render(&contains, &ns), "(geof:sfContains(?a, ?b))");

        let relate = Expression::geo_relate(var("a"), var("b"), "T*F**FFF*").unwrap();
        assert_eq!(render(&relate, &ns), "(geof:relate(?a, ?b, \"T*F**FFF*\"))");

        let inter = Expression::geo_set_operation(
            SetOperation::Intersection,
            var("a"),
            Operand::constant(Term::wkt("POINT(1 2)")),
        )
        .unwrap();
        assert_eq!(
            render(&inter, &ns),
            "(geof:intersection(?a, \"POINT(1 2)\"^^geo:wktLiteral))"
        );

        let area = Expression::geo_measure(Measure::Area, var("g")).unwrap();
        assert_eq!(render(&area, &ns), "(geof:area(?g))");
    }

    #[test]
    fn test_conditional() {
        let expr = Expression::if_then_else(
            var("c"),
            Operand::constant(Term::resource("http://example.org/yes")),
            Operand::constant(Term::simple_literal("no")),
        );
        assert_eq!(render(&expr, &[]), "(IF(?c, <http://example.org/yes>, \"no\"))");
    }

    #[test]
    fn test_first_namespace_wins() {
        let ns = vec![
            Namespace::new("f", "http://www.w3.org/2005/xpath-functions#"),
            Namespace::new("fn", "http://www.w3.org/2005/xpath-functions#"),
        ];
        let substr = Expression::substring(var("A"), 1, None);
        assert_eq!(render(&substr, &ns), "(f:substring(?A, 1))");
    }
}
