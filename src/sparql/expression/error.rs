use thiserror::Error;

/// Structural errors raised while building an expression tree
///
/// Evaluation never produces these; a row that does not fit an operator
/// evaluates to unbound instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Required operand absent
    #[error("Missing operand: {0}")]
    MissingOperand(String),

    /// Binary arithmetic and comparison nodes take a variable or a nested
    /// expression on the left
    #[error("Left operand of {0} must be a variable or an expression, not a constant")]
    ConstantLeftOperand(String),

    /// DE-9IM pattern is not 9 characters from `012TF*`
    #[error("Invalid DE-9IM pattern: {0:?}")]
    InvalidDe9imPattern(String),

    /// Constant operand of a spatial function is not a geometry literal
    #[error("Constant operand of {function} is not a geographic literal: {term}")]
    NonGeographicConstant { function: String, term: String },

    /// Pattern or flags of a regular expression are invalid
    #[error("Invalid regular expression: {0}")]
    InvalidRegex(String),

    /// Constant that does not parse as a term
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// Function or operator name outside the catalogue
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

pub type ExpressionResult<T> = Result<T, ExpressionError>;
