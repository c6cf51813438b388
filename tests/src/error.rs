//! Error types for scenario runs.

use eql_query::QueryError;
use thiserror::Error;

use crate::world::Backend;

/// Result type for scenario runs.
pub type TestResult<T> = Result<T, TestError>;

/// Errors that can occur while running a scenario.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("[{scenario}] '{query}': {message}")]
    Step {
        scenario: String,
        query: String,
        message: String,
    },

    #[error("[{scenario}] '{query}' on {backend:?}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        scenario: String,
        query: String,
        backend: Backend,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

impl TestError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }

    pub fn step(scenario: impl Into<String>, query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Step {
            scenario: scenario.into(),
            query: query.into(),
            message: message.into(),
        }
    }
}
