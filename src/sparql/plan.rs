//! Serializable build plans for expression trees
//!
//! A plan is the JSON form a parser or tool hands over to build an
//! [`Expression`]. Operand fields are optional in the plan so that an
//! absent operand surfaces as [`ExpressionError::MissingOperand`] from
//! [`ExpressionPlan::build`] rather than as a deserialization error.
//!
//! ```json
//! {"type": "comparison", "op": ">",
//!  "left": {"expression": {"type": "arithmetic", "op": "+",
//!                          "left": {"variable": "A"}, "right": {"variable": "B"}}},
//!  "right": {"variable": "B"}}
//! ```

use crate::geometry::{Measure, SetOperation, SpatialRelation};
use crate::rdf::{parse_term, Direction};
use crate::sparql::expression::{
    ArithmeticOp, ComparisonOp, Expression, ExpressionError, ExpressionResult, Operand,
};
use serde::{Deserialize, Serialize};

/// Operand of a plan node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandPlan {
    /// Variable name, with or without `?`
    Variable(String),
    /// Term in its canonical serialized form
    Constant(String),
    Expression(Box<ExpressionPlan>),
}

/// Expression node of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionPlan {
    Arithmetic {
        op: ArithmeticOp,
        left: Option<OperandPlan>,
        right: Option<OperandPlan>,
    },
    Comparison {
        op: ComparisonOp,
        left: Option<OperandPlan>,
        right: Option<OperandPlan>,
    },
    If {
        condition: Option<OperandPlan>,
        then: Option<OperandPlan>,
        #[serde(rename = "else")]
        otherwise: Option<OperandPlan>,
    },
    Substring {
        source: Option<OperandPlan>,
        start: i64,
        #[serde(default)]
        length: Option<i64>,
    },
    Replace {
        source: Option<OperandPlan>,
        pattern: String,
        replacement: Option<OperandPlan>,
        #[serde(default)]
        flags: String,
    },
    StrLangDir {
        source: Option<OperandPlan>,
        lang: Option<OperandPlan>,
        direction: Direction,
    },
    /// Named relation, by GeoSPARQL function local name (`sfContains`, `rcc8po`, ...)
    GeoPredicate {
        relation: String,
        left: Option<OperandPlan>,
        right: Option<OperandPlan>,
    },
    GeoRelate {
        left: Option<OperandPlan>,
        right: Option<OperandPlan>,
        pattern: String,
    },
    /// `intersection`, `union`, `difference` or `symDifference`
    GeoSetOperation {
        operation: String,
        left: Option<OperandPlan>,
        right: Option<OperandPlan>,
    },
    /// `area` or `length`
    GeoMeasure {
        measure: String,
        operand: Option<OperandPlan>,
    },
}

fn required(slot: Option<&OperandPlan>, node: &str, name: &str) -> ExpressionResult<Operand> {
    slot.ok_or_else(|| ExpressionError::MissingOperand(format!("{} of {}", name, node)))?
        .build()
}

impl OperandPlan {
    pub fn build(&self) -> ExpressionResult<Operand> {
        match self {
            OperandPlan::Variable(name) => Ok(Operand::variable(name)),
            OperandPlan::Constant(text) => parse_term(text)
                .map(Operand::Constant)
                .map_err(|e| ExpressionError::InvalidTerm(format!("{:?}: {}", text, e))),
            OperandPlan::Expression(plan) => plan.build().map(Operand::from),
        }
    }
}

impl ExpressionPlan {
    /// Build and validate the expression tree
    pub fn build(&self) -> ExpressionResult<Expression> {
        match self {
            ExpressionPlan::Arithmetic { op, left, right } => Expression::arithmetic(
                *op,
                required(left.as_ref(), op.symbol(), "left")?,
                required(right.as_ref(), op.symbol(), "right")?,
            ),
            ExpressionPlan::Comparison { op, left, right } => Expression::compare(
                *op,
                required(left.as_ref(), op.symbol(), "left")?,
                required(right.as_ref(), op.symbol(), "right")?,
            ),
            ExpressionPlan::If {
                condition,
                then,
                otherwise,
            } => Ok(Expression::if_then_else(
                required(condition.as_ref(), "IF", "condition")?,
                required(then.as_ref(), "IF", "then")?,
                required(otherwise.as_ref(), "IF", "else")?,
            )),
            ExpressionPlan::Substring {
                source,
                start,
                length,
            } => Ok(Expression::substring(
                required(source.as_ref(), "substring", "source")?,
                *start,
                *length,
            )),
            ExpressionPlan::Replace {
                source,
                pattern,
                replacement,
                flags,
            } => Expression::replace(
                required(source.as_ref(), "replace", "source")?,
                required(replacement.as_ref(), "replace", "replacement")?,
                pattern,
                flags,
            ),
            ExpressionPlan::StrLangDir {
                source,
                lang,
                direction,
            } => Ok(Expression::str_lang_dir(
                required(source.as_ref(), "strLangDir", "source")?,
                required(lang.as_ref(), "strLangDir", "lang")?,
                *direction,
            )),
            ExpressionPlan::GeoPredicate { relation, left, right } => {
                let relation = SpatialRelation::from_function_name(relation)
                    .ok_or_else(|| ExpressionError::UnknownFunction(relation.clone()))?;
                let name = relation.function_name();
                Expression::geo_predicate(
                    relation,
                    required(left.as_ref(), name, "left")?,
                    required(right.as_ref(), name, "right")?,
                )
            }
            ExpressionPlan::GeoRelate { left, right, pattern } => Expression::geo_relate(
                required(left.as_ref(), "relate", "left")?,
                required(right.as_ref(), "relate", "right")?,
                pattern,
            ),
            ExpressionPlan::GeoSetOperation { operation, left, right } => {
                let op = set_operation(operation)?;
                Expression::geo_set_operation(
                    op,
                    required(left.as_ref(), op.function_name(), "left")?,
                    required(right.as_ref(), op.function_name(), "right")?,
                )
            }
            ExpressionPlan::GeoMeasure { measure, operand } => {
                let measure = match measure.as_str() {
                    "area" => Measure::Area,
                    "length" => Measure::Length,
                    other => return Err(ExpressionError::UnknownFunction(other.to_string())),
                };
                Expression::geo_measure(measure, required(operand.as_ref(), measure.function_name(), "operand")?)
            }
        }
    }

    /// Parse a JSON plan
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn set_operation(name: &str) -> ExpressionResult<SetOperation> {
    [
        SetOperation::Intersection,
        SetOperation::Union,
        SetOperation::Difference,
        SetOperation::SymDifference,
    ]
    .into_iter()
    .find(|op| op.function_name() == name)
    .ok_or_else(|| ExpressionError::UnknownFunction(name.to_string()))
}
