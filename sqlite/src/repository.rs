//! The SQLite repository.

use crate::{SqliteError, SqliteResult};
use eql_core::Value;
use eql_query::criteria::{Criteria, CriteriaRepository, Mappings, SqlValue};
use eql_query::{QueryResult, Repository};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{params_from_iter, types, Connection, Row};
use std::sync::Arc;

type RowMapper<T> = Box<dyn Fn(&Row<'_>) -> rusqlite::Result<T> + Send + Sync>;

/// Entities of one type stored in SQLite.
pub struct SqliteRepository<T> {
    connection: Mutex<Connection>,
    mappings: Mappings,
    mapper: RowMapper<T>,
}

/// Convert a criteria parameter for binding.
pub fn to_sql_value(value: &SqlValue) -> types::Value {
    match value {
        SqlValue::Null => types::Value::Null,
        SqlValue::Integer(i) => types::Value::Integer(*i),
        SqlValue::Real(f) => types::Value::Real(*f),
        SqlValue::Text(s) => types::Value::Text(s.clone()),
    }
}

impl<T> SqliteRepository<T> {
    /// Wrap a connection. `mapper` turns a row of the entity's table into a `T`.
    pub fn new<F>(connection: Connection, mappings: Mappings, mapper: F) -> SqliteResult<Self>
    where
        F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + Sync + 'static,
    {
        // LIKE is case-insensitive in SQLite unless told otherwise.
        connection.execute_batch("PRAGMA case_sensitive_like = ON;")?;
        Ok(Self {
            connection: Mutex::new(connection),
            mappings,
            mapper: Box::new(mapper),
        })
    }

    pub fn open_in_memory<F>(mappings: Mappings, mapper: F) -> SqliteResult<Self>
    where
        F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + Sync + 'static,
    {
        Self::new(Connection::open_in_memory()?, mappings, mapper)
    }

    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock()
    }

    pub fn execute_batch(&self, sql: &str) -> SqliteResult<()> {
        self.connection.lock().execute_batch(sql)?;
        Ok(())
    }

    /// Insert one row; values are stored the way criteria parameters are bound.
    pub fn insert(&self, table: &str, row: &[(&str, Value)]) -> SqliteResult<()> {
        let columns: Vec<&str> = row.iter().map(|(column, _)| *column).collect();
        let placeholders = vec!["?"; row.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );
        let values: Vec<types::Value> = row
            .iter()
            .map(|(_, value)| to_sql_value(&SqlValue::from(value)))
            .collect();
        self.connection.lock().execute(&sql, params_from_iter(values.iter()))?;
        Ok(())
    }

    fn select(&self, criteria: &Criteria) -> SqliteResult<Vec<T>> {
        let (sql, params) = criteria.to_sql();
        log::debug!("{} {:?}", sql, params);
        let connection = self.connection.lock();
        let mut statement = connection.prepare(&sql)?;
        let values: Vec<types::Value> = params.iter().map(to_sql_value).collect();
        let rows = statement.query_map(params_from_iter(values.iter()), |row| (self.mapper)(row))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn select_count(&self, criteria: &Criteria) -> SqliteResult<usize> {
        let (sql, params) = criteria.to_count_sql();
        log::debug!("{} {:?}", sql, params);
        let values: Vec<types::Value> = params.iter().map(to_sql_value).collect();
        let count: i64 = self
            .connection
            .lock()
            .query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        usize::try_from(count).map_err(|_| SqliteError::Count(count))
    }
}

impl<T: Send + Sync> CriteriaRepository<T> for SqliteRepository<T> {
    fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    fn find_all(&self, criteria: &Criteria) -> QueryResult<Vec<T>> {
        Ok(self.select(criteria)?)
    }

    fn count(&self, criteria: &Criteria) -> QueryResult<usize> {
        Ok(self.select_count(criteria)?)
    }
}

impl<T: Send + Sync + 'static> Repository<T> for SqliteRepository<T> {
    fn criteria(self: Arc<Self>) -> Option<Arc<dyn CriteriaRepository<T>>> {
        Some(self)
    }
}
