//! The criteria executor.
//!
//! Prepared Queries compile into [`Criteria`]: a root table, joins for
//! single-valued associations (left outer when the association is optional),
//! `EXISTS` sub-selects for multi-valued paths and collection operators, and
//! bound parameters. A [`CriteriaRepository`] runs the rendered SQL.

mod compile;
mod mapping;
mod sql;

pub use compile::CriteriaBuilder;
pub use mapping::{ColumnMapping, EntityMapping, Mappings};
pub use sql::{
    Criteria, Join, JoinKind, Restriction, Source, SqlValue, SubQuery, SQL_DATE_FORMAT,
    SQL_DATE_TIME_FORMAT,
};

use crate::{Page, PageRequest, QueryExecutor, QueryResult};
use eql_core::PreparedQuery;
use std::sync::Arc;

/// A repository able to run criteria.
pub trait CriteriaRepository<T>: Send + Sync {
    /// Table mappings of the repository's entity type and every type its
    /// queries can reach.
    fn mappings(&self) -> &Mappings;

    fn find_all(&self, criteria: &Criteria) -> QueryResult<Vec<T>>;

    fn count(&self, criteria: &Criteria) -> QueryResult<usize>;
}

/// Runs queries through a [`CriteriaRepository`].
pub struct CriteriaExecutor<T> {
    entity: String,
    repository: Arc<dyn CriteriaRepository<T>>,
}

impl<T> CriteriaExecutor<T> {
    pub fn new(entity: impl Into<String>, repository: Arc<dyn CriteriaRepository<T>>) -> Self {
        Self {
            entity: entity.into(),
            repository,
        }
    }

    pub fn criteria(&self, query: &PreparedQuery) -> QueryResult<Criteria> {
        let criteria = CriteriaBuilder::new(self.repository.mappings()).build(&self.entity, query)?;
        log::debug!("{} criteria: {}", self.entity, criteria.to_sql().0);
        Ok(criteria)
    }
}

impl<T> QueryExecutor<T> for CriteriaExecutor<T> {
    fn find_all(&self, query: &PreparedQuery) -> QueryResult<Vec<T>> {
        let criteria = self.criteria(query)?;
        self.repository.find_all(&criteria)
    }

    fn find_page(&self, query: &PreparedQuery, request: PageRequest) -> QueryResult<Page<T>> {
        let criteria = self.criteria(query)?;
        let total_elements = self.repository.count(&criteria)?;
        let content = self.repository.find_all(&criteria.with_page(request))?;
        Ok(Page {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        })
    }
}
