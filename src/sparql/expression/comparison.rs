//! Comparison operators

use super::{EvalContext, ExpressionError, ExpressionResult, Operand};
use crate::rdf::Term;
use crate::sparql::SolutionRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::GreaterThanOrEqual => ">=",
            ComparisonOp::GreaterThan => ">",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison yielding an `xsd:boolean` literal
///
/// `=` and `!=` compare terms structurally and are defined for any pair.
/// The ordering operators need two numeric literals and are unbound
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub(super) op: ComparisonOp,
    pub(super) left: Operand,
    pub(super) right: Operand,
}

impl Comparison {
    pub fn new(op: ComparisonOp, left: Operand, right: Operand) -> ExpressionResult<Self> {
        if left.is_constant() {
            return Err(ExpressionError::ConstantLeftOperand(op.symbol().to_string()));
        }
        Ok(Self { op, left, right })
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let left = self.left.resolve(row, ctx)?;
        let right = self.right.resolve(row, ctx)?;

        let result = match self.op {
            ComparisonOp::Equal => left == right,
            ComparisonOp::NotEqual => left != right,
            ordering => {
                if !left.is_numeric() || !right.is_numeric() {
                    return None;
                }
                let (l, r) = (left.as_f64()?, right.as_f64()?);
                match ordering {
                    ComparisonOp::LessThan => l < r,
                    ComparisonOp::LessThanOrEqual => l <= r,
                    ComparisonOp::GreaterThanOrEqual => l >= r,
                    _ => l > r,
                }
            }
        };
        Some(Term::boolean(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Datatype;

    fn eval(op: ComparisonOp, left: &Term, right: &Term) -> Option<Term> {
        let row = SolutionRow::new().with("x", left);
        Comparison::new(op, Operand::variable("x"), Operand::constant(right.clone()))
            .unwrap()
            .evaluate(&row, &EvalContext::default())
    }

    #[test]
    fn test_numeric_ordering() {
        let a = Term::typed_literal("5.1", Datatype::Double);
        let b = Term::typed_literal("25", Datatype::Int);
        assert_eq!(eval(ComparisonOp::LessThan, &a, &b), Some(Term::boolean(true)));
        assert_eq!(eval(ComparisonOp::GreaterThan, &a, &b), Some(Term::boolean(false)));
        assert_eq!(eval(ComparisonOp::LessThanOrEqual, &b, &b), Some(Term::boolean(true)));
        assert_eq!(eval(ComparisonOp::GreaterThanOrEqual, &a, &b), Some(Term::boolean(false)));
    }

    #[test]
    fn test_equality_is_total() {
        let resource = Term::resource("http://example.org/x");
        let number = Term::typed_literal("25", Datatype::Int);
        assert_eq!(eval(ComparisonOp::Equal, &resource, &number), Some(Term::boolean(false)));
        assert_eq!(eval(ComparisonOp::NotEqual, &resource, &number), Some(Term::boolean(true)));
        assert_eq!(eval(ComparisonOp::Equal, &number, &number), Some(Term::boolean(true)));
    }

    #[test]
    fn test_equality_is_term_equality() {
        // Same value, different datatype
        let int = Term::typed_literal("25", Datatype::Int);
        let integer = Term::typed_literal("25", Datatype::Integer);
        assert_eq!(eval(ComparisonOp::Equal, &int, &integer), Some(Term::boolean(false)));
    }

    #[test]
    fn test_ordering_is_partial() {
        let resource = Term::resource("http://example.org/x");
        let number = Term::typed_literal("25", Datatype::Int);
        assert_eq!(eval(ComparisonOp::LessThan, &resource, &number), None);
        assert_eq!(eval(ComparisonOp::GreaterThan, &Term::simple_literal("a"), &number), None);
    }

    #[test]
    fn test_constant_left_rejected() {
        assert!(matches!(
            Comparison::new(
                ComparisonOp::Equal,
                Operand::constant(Term::integer(1)),
                Operand::variable("x")
            ),
            Err(ExpressionError::ConstantLeftOperand(_))
        ));
    }
}
