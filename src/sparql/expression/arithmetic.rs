//! Add, subtract, multiply, divide

use super::{EvalContext, ExpressionError, ExpressionResult, Operand};
use crate::rdf::Term;
use crate::sparql::SolutionRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl ArithmeticOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        }
    }

    fn apply(&self, l: f64, r: f64) -> Option<f64> {
        match self {
            ArithmeticOp::Add => Some(l + r),
            ArithmeticOp::Subtract => Some(l - r),
            ArithmeticOp::Multiply => Some(l * r),
            ArithmeticOp::Divide if r == 0.0 => None,
            ArithmeticOp::Divide => Some(l / r),
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Binary arithmetic over numeric literals, computed in `f64`
///
/// The result is always an `xsd:double` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Arithmetic {
    pub(super) op: ArithmeticOp,
    pub(super) left: Operand,
    pub(super) right: Operand,
}

impl Arithmetic {
    pub fn new(op: ArithmeticOp, left: Operand, right: Operand) -> ExpressionResult<Self> {
        if left.is_constant() {
            return Err(ExpressionError::ConstantLeftOperand(op.symbol().to_string()));
        }
        Ok(Self { op, left, right })
    }

    pub fn op(&self) -> ArithmeticOp {
        self.op
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let left = self.left.resolve(row, ctx)?;
        let right = self.right.resolve(row, ctx)?;
        if !left.is_numeric() || !right.is_numeric() {
            return None;
        }
        let value = self.op.apply(left.as_f64()?, right.as_f64()?)?;
        Some(Term::double(value))
    }
}
