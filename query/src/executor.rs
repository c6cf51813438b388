//! The executor contract and executor binding.

use crate::criteria::{CriteriaExecutor, CriteriaRepository};
use crate::predicate::{PredicateExecutor, PredicateRepository};
use crate::{Page, PageRequest, QueryError, QueryResult};
use eql_core::PreparedQuery;
use eql_prepare::{Preparable, Preparer, QueryContext};
use std::sync::Arc;

/// Runs Prepared Queries for one entity type.
pub trait QueryExecutor<T>: Send + Sync {
    /// All matching instances, in the query's order.
    fn find_all(&self, query: &PreparedQuery) -> QueryResult<Vec<T>>;

    /// One page of the ordered result.
    fn find_page(&self, query: &PreparedQuery, request: PageRequest) -> QueryResult<Page<T>> {
        Ok(Page::slice(self.find_all(query)?, request))
    }
}

/// The query capabilities a repository offers. Each method returns `None`
/// when the capability is unsupported.
///
/// Criteria and predicates hand out the repository itself. A collection
/// hands out a ready [`CollectionExecutor`](crate::CollectionExecutor),
/// since only the repository knows its instances are entities.
pub trait Repository<T>: Send + Sync {
    fn criteria(self: Arc<Self>) -> Option<Arc<dyn CriteriaRepository<T>>> {
        None
    }

    fn predicates(self: Arc<Self>) -> Option<Arc<dyn PredicateRepository<T>>> {
        None
    }

    fn collection(self: Arc<Self>) -> Option<Arc<dyn QueryExecutor<T>>> {
        None
    }
}

/// An entity type bound to the executor chosen for its repository.
///
/// The executor is chosen once, when binding: criteria if the repository
/// supports it, then predicates, then plain collections.
pub struct EntityBinding<T> {
    entity: String,
    preparer: Preparer,
    executor: Arc<dyn QueryExecutor<T>>,
}

impl<T: 'static> EntityBinding<T> {
    pub fn bind<R>(entity: impl Into<String>, preparer: Preparer, repository: Arc<R>) -> QueryResult<Self>
    where
        R: Repository<T> + ?Sized,
    {
        let entity = entity.into();
        let executor = select_executor(&entity, repository)?;
        Ok(Self {
            entity,
            preparer,
            executor,
        })
    }

    /// Bind with an explicit executor.
    pub fn with_executor(entity: impl Into<String>, preparer: Preparer, executor: Arc<dyn QueryExecutor<T>>) -> Self {
        Self {
            entity: entity.into(),
            preparer,
            executor,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn preparer(&self) -> &Preparer {
        &self.preparer
    }

    pub fn executor(&self) -> Arc<dyn QueryExecutor<T>> {
        Arc::clone(&self.executor)
    }

    /// Prepare EQL text for this entity type.
    pub fn parse(&self, text: &str, context: &QueryContext) -> QueryResult<PreparedQuery> {
        Ok(self.preparer.parse(&self.entity, text, context)?)
    }

    /// Prepare a query for this entity type.
    pub fn prepare<Q: Preparable + ?Sized>(&self, query: &Q, context: &QueryContext) -> QueryResult<PreparedQuery> {
        Ok(self.preparer.prepare(&self.entity, query, context)?)
    }

    pub fn find_all(&self, query: &PreparedQuery) -> QueryResult<Vec<T>> {
        self.executor.find_all(query)
    }

    pub fn find_page(&self, query: &PreparedQuery, request: PageRequest) -> QueryResult<Page<T>> {
        self.executor.find_page(query, request)
    }

    /// Parse, prepare and run EQL text.
    pub fn query(&self, text: &str, context: &QueryContext) -> QueryResult<Vec<T>> {
        let prepared = self.parse(text, context)?;
        self.find_all(&prepared)
    }
}

fn select_executor<T: 'static, R>(entity: &str, repository: Arc<R>) -> QueryResult<Arc<dyn QueryExecutor<T>>>
where
    R: Repository<T> + ?Sized,
{
    if let Some(criteria) = Arc::clone(&repository).criteria() {
        log::info!("{} queries run through criteria", entity);
        return Ok(Arc::new(CriteriaExecutor::new(entity, criteria)));
    }
    if let Some(predicates) = Arc::clone(&repository).predicates() {
        log::info!("{} queries run through predicates", entity);
        return Ok(Arc::new(PredicateExecutor::new(predicates)));
    }
    if let Some(collection) = repository.collection() {
        log::info!("{} queries run over the collection", entity);
        return Ok(collection);
    }
    Err(QueryError::UnsupportedCapability {
        entity: entity.to_string(),
    })
}
