//! REPL error types.

use eql_query::QueryError;
use eql_registry::RegistryError;
use thiserror::Error;

pub type ReplResult<T> = Result<T, ReplError>;

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid record {entity}#{index}: {message}")]
    Record {
        entity: String,
        index: usize,
        message: String,
    },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{0}")]
    Usage(String),
}

impl ReplError {
    pub fn record(entity: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        Self::Record {
            entity: entity.into(),
            index,
            message: message.into(),
        }
    }
}
