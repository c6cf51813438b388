//! Preparation error types.

use eql_parser::ParseError;
use eql_registry::{ResolveError, TranslationError};
use thiserror::Error;

/// Errors that can occur while preparing a query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PrepareError {
    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Unknown property '{property}' on {entity} (in path '{path}')")]
    UnknownProperty {
        entity: String,
        property: String,
        path: String,
    },

    #[error("Invalid property path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("Cannot use {operand} as {expected} for property '{property}': {message}")]
    TypeCoercion {
        property: String,
        operand: String,
        expected: String,
        message: String,
    },

    #[error("Operator '{operator}' cannot be applied to property '{property}' of type {property_type}")]
    InvalidOperator {
        property: String,
        operator: String,
        property_type: String,
    },

    #[error("Cannot sort on '{property}': {message}")]
    UnsortableProperty { property: String, message: String },

    #[error("Cannot resolve {function} for property '{property}': {message}")]
    FunctionResolution {
        function: String,
        property: String,
        message: String,
    },

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("Translation of conditions on '{property}' did not settle after {limit} steps")]
    TranslationDepthExceeded { property: String, limit: usize },
}

impl PrepareError {
    pub fn type_coercion(
        property: impl Into<String>,
        operand: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PrepareError::TypeCoercion {
            property: property.into(),
            operand: operand.into(),
            expected: expected.into(),
            message: message.into(),
        }
    }

    pub fn function_resolution(
        function: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PrepareError::FunctionResolution {
            function: function.into(),
            property: property.into(),
            message: message.into(),
        }
    }
}

impl From<ResolveError> for PrepareError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::UnknownEntity(name) => PrepareError::UnknownEntity(name),
            ResolveError::UnknownProperty {
                entity,
                property,
                path,
            } => PrepareError::UnknownProperty {
                entity,
                property,
                path,
            },
            ResolveError::InvalidPath { path, message } => PrepareError::InvalidPath { path, message },
        }
    }
}

/// Result type for preparation.
pub type PrepareResult<T> = Result<T, PrepareError>;

/// Failure of going from query text to a Prepared Query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EqlError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Prepare(#[from] PrepareError),
}
