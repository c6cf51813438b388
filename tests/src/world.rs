//! The company dataset bound to every backend.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use eql_core::{PreparedQuery, Value};
use eql_prepare::{EqlError, Preparer, QueryContext};
use eql_query::{AssociatedQueryExecutor, EntityBinding, InMemoryRepository, Page, PageRequest, QueryExecutor, QueryResult};

use crate::error::{TestError, TestResult};
use crate::fixtures::{self, Company};

/// A backend the queries run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Direct evaluation over the in-memory list.
    Collection,
    /// Generated predicates over the in-memory list.
    Predicate,
    /// SQL against SQLite.
    Criteria,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Collection, Backend::Predicate, Backend::Criteria];
}

/// The context the scenarios run with unless they set their own:
/// `now()` is 2025-01-01 00:00 and `currentUser()` is `bob`.
pub fn default_context() -> QueryContext {
    let now: NaiveDateTime = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    QueryContext::new(now).with_principal("bob")
}

/// Initialise logging for tests; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Companies queryable through each backend.
pub struct World {
    preparer: Preparer,
    collection: EntityBinding<Company>,
    predicate: EntityBinding<Company>,
    criteria: EntityBinding<String>,
}

impl World {
    pub fn new() -> TestResult<Self> {
        init_logging();
        let registry = Arc::new(fixtures::registry().map_err(|e| TestError::setup(e.to_string()))?);
        let preparer = Preparer::new(registry);

        let collection = EntityBinding::bind(
            "Company",
            preparer.clone(),
            Arc::new(InMemoryRepository::new(fixtures::companies())),
        )?;
        let predicate = EntityBinding::bind(
            "Company",
            preparer.clone(),
            Arc::new(InMemoryRepository::with_predicates(fixtures::companies())),
        )?;
        let sqlite = fixtures::sqlite_repository().map_err(|e| TestError::setup(e.to_string()))?;
        let criteria = EntityBinding::bind("Company", preparer.clone(), Arc::new(sqlite))?;

        Ok(Self {
            preparer,
            collection,
            predicate,
            criteria,
        })
    }

    pub fn preparer(&self) -> &Preparer {
        &self.preparer
    }

    pub fn prepare(&self, text: &str, context: &QueryContext) -> Result<PreparedQuery, EqlError> {
        self.preparer.parse("Company", text, context)
    }

    /// Ids of the companies matching `query`, in result order.
    pub fn ids(&self, backend: Backend, query: &PreparedQuery) -> QueryResult<Vec<String>> {
        Ok(self.page(backend, query, PageRequest::unpaged())?.content)
    }

    pub fn page(&self, backend: Backend, query: &PreparedQuery, request: PageRequest) -> QueryResult<Page<String>> {
        match backend {
            Backend::Collection => Ok(self.collection.find_page(query, request)?.map(|c| c.id)),
            Backend::Predicate => Ok(self.predicate.find_page(query, request)?.map(|c| c.id)),
            Backend::Criteria => self.criteria.find_page(query, request),
        }
    }

    /// Ids of the companies associated with `owner` through `back_reference`.
    pub fn associated(
        &self,
        backend: Backend,
        back_reference: &str,
        owner: impl Into<Value>,
        query: &PreparedQuery,
        request: PageRequest,
    ) -> QueryResult<Page<String>> {
        match backend {
            Backend::Collection => Ok(associated(&self.preparer, back_reference, self.collection.executor())?
                .find_all(owner, query, request)?
                .map(|c| c.id)),
            Backend::Predicate => Ok(associated(&self.preparer, back_reference, self.predicate.executor())?
                .find_all(owner, query, request)?
                .map(|c| c.id)),
            Backend::Criteria => {
                associated(&self.preparer, back_reference, self.criteria.executor())?.find_all(owner, query, request)
            }
        }
    }
}

fn associated<T>(
    preparer: &Preparer,
    back_reference: &str,
    executor: Arc<dyn QueryExecutor<T>>,
) -> QueryResult<AssociatedQueryExecutor<T>> {
    AssociatedQueryExecutor::new(preparer.registry(), "Company", back_reference, executor)
}
