use super::{EvalContext, Operand};
use crate::rdf::Term;
use crate::sparql::SolutionRow;

/// `IF(condition, then, else)`
///
/// Only the selected branch is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub(super) condition: Operand,
    pub(super) then: Operand,
    pub(super) otherwise: Operand,
}

impl Conditional {
    pub fn new(condition: Operand, then: Operand, otherwise: Operand) -> Self {
        Self {
            condition,
            then,
            otherwise,
        }
    }

    pub(super) fn evaluate(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        let condition = self.condition.resolve(row, ctx)?;
        if condition.as_bool()? {
            self.then.resolve(row, ctx)
        } else {
            self.otherwise.resolve(row, ctx)
        }
    }
}
