//! Query error types.

use eql_core::CoreError;
use eql_prepare::{EqlError, PrepareError};
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while binding or running a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Repository for {entity} supports no query capability")]
    UnsupportedCapability { entity: String },

    #[error(transparent)]
    Query(#[from] EqlError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] CoreError),

    #[error("No mapping for '{property}' on {entity}: {message}")]
    Mapping {
        entity: String,
        property: String,
        message: String,
    },

    #[error("Invalid association '{property}' on {entity}: {message}")]
    Association {
        entity: String,
        property: String,
        message: String,
    },

    #[error("Repository error: {message}")]
    Repository { message: String },
}

impl QueryError {
    pub fn mapping(
        entity: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Mapping {
            entity: entity.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn association(
        entity: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Association {
            entity: entity.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }
}

impl From<PrepareError> for QueryError {
    fn from(e: PrepareError) -> Self {
        Self::Query(EqlError::Prepare(e))
    }
}
