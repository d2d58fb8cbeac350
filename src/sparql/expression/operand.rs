//! Operand slots and their resolution against a row

use super::{EvalContext, Expression};
use crate::rdf::Term;
use crate::sparql::SolutionRow;
use tracing::trace;

/// One operand slot: a variable, a nested expression or a fixed term
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Variable name, without the leading `?`
    Variable(String),
    Expression(Box<Expression>),
    Constant(Term),
}

impl Operand {
    /// Variable reference; a leading `?` is dropped
    pub fn variable(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        Operand::Variable(name.strip_prefix('?').unwrap_or(name).to_string())
    }

    pub fn constant(term: Term) -> Self {
        Operand::Constant(term)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Constant(_))
    }

    /// Resolve the slot to a term, or `None` when unbound
    pub fn resolve(&self, row: &SolutionRow, ctx: &EvalContext<'_>) -> Option<Term> {
        match self {
            Operand::Variable(name) => {
                let term = row.term(name);
                if term.is_none() {
                    trace!("?{} is unbound", name);
                }
                term
            }
            Operand::Expression(expr) => expr.evaluate_with(row, ctx),
            Operand::Constant(term) => Some(term.clone()),
        }
    }
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Expression(Box::new(expr))
    }
}

impl From<Term> for Operand {
    fn from(term: Term) -> Self {
        Operand::Constant(term)
    }
}
