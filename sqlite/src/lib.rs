//! EQL SQLite Backend
//!
//! A [`SqliteRepository`] runs criteria built by the criteria executor
//! against a SQLite database:
//! - Rendered SQL with bound parameters
//! - Case-sensitive `LIKE` to match the in-memory backends
//! - Rows mapped to entity values by a caller-supplied row mapper

mod error;
mod repository;

pub use error::{SqliteError, SqliteResult};
pub use repository::{to_sql_value, SqliteRepository};
