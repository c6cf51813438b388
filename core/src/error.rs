//! Common error types for EQL.

use thiserror::Error;

/// Errors raised while evaluating values against conditions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    /// A LIKE pattern could not be turned into a matcher.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A condition carries the wrong number of operands for its operator.
    #[error("Operator '{operator}' expects {expected} operand(s), got {actual}")]
    OperandCount {
        operator: String,
        expected: String,
        actual: usize,
    },

    /// No strategy exists for the operator on this kind of property.
    #[error("Operator '{operator}' does not apply to {kind} properties")]
    UnsupportedOperator { operator: String, kind: String },
}

impl CoreError {
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
