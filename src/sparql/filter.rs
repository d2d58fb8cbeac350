//! Row filtering
//!
//! Keeps the rows for which the filter expression evaluates to boolean
//! `true`. Unbound results and non-boolean values drop the row, which is
//! the effective boolean value rule applied to `xsd:boolean` only.

use crate::config::EvaluatorConfig;
use crate::geometry::GeometryEngine;
use crate::rdf::Term;
use crate::sparql::expression::{EvalContext, Expression};
use crate::sparql::SolutionRow;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Filter over solution rows
pub struct FilterEvaluator {
    /// Filter expression
    expression: Expression,
    /// Engine used by geometric nodes
    engine: Box<dyn GeometryEngine>,
    /// Row count at which `filter_parallel` switches to rayon
    parallel_threshold: usize,
}

impl FilterEvaluator {
    /// Create a filter with the default engine
    pub fn new(expression: Expression) -> Self {
        Self::from_config(expression, &EvaluatorConfig::default())
    }

    pub fn from_config(expression: Expression, config: &EvaluatorConfig) -> Self {
        Self {
            expression,
            engine: Box::new(config.geometry_engine()),
            parallel_threshold: config.parallel_threshold.max(1),
        }
    }

    /// Replace the geometry engine
    pub fn with_engine(mut self, engine: impl GeometryEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext::new(self.engine.as_ref())
    }

    /// Raw value of the expression for one row
    pub fn evaluate(&self, row: &SolutionRow) -> Option<Term> {
        self.expression.evaluate_with(row, &self.context())
    }

    /// Whether the row survives the filter
    pub fn passes(&self, row: &SolutionRow) -> bool {
        match self.evaluate(row) {
            Some(term) => {
                let keep = term.is_boolean() && term.as_bool() == Some(true);
                if !keep {
                    trace!("Row rejected by {}: {}", self.expression, term);
                }
                keep
            }
            None => {
                debug!("Row dropped, {} is unbound", self.expression);
                false
            }
        }
    }

    /// Filter rows sequentially, preserving order
    pub fn filter(&self, rows: Vec<SolutionRow>) -> Vec<SolutionRow> {
        rows.into_iter().filter(|row| self.passes(row)).collect()
    }

    /// Filter rows, fanning out over rayon once the batch is large enough
    pub fn filter_parallel(&self, rows: Vec<SolutionRow>) -> Vec<SolutionRow> {
        if rows.len() < self.parallel_threshold {
            return self.filter(rows);
        }
        debug!("Filtering {} rows in parallel", rows.len());
        rows.into_par_iter().filter(|row| self.passes(row)).collect()
    }
}

impl std::fmt::Debug for FilterEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEvaluator")
            .field("expression", &self.expression.to_string())
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}

impl From<Expression> for FilterEvaluator {
    fn from(expression: Expression) -> Self {
        Self::new(expression)
    }
}
