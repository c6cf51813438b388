//! SQLite backend error types.

use eql_query::QueryError;
use thiserror::Error;

/// Result type for SQLite operations.
pub type SqliteResult<T> = Result<T, SqliteError>;

#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Row count {0} does not fit")]
    Count(i64),
}

impl From<SqliteError> for QueryError {
    fn from(e: SqliteError) -> Self {
        QueryError::repository(e.to_string())
    }
}
