//! An in-memory repository.

use crate::collection::{CollectionExecutor, CollectionRepository};
use crate::predicate::{BooleanExpression, OrderSpecifier, PredicateRepository};
use crate::{QueryExecutor, QueryResult, Repository};
use eql_core::Entity;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::Arc;

/// Instances held in memory, in insertion order.
///
/// Always offers its contents as a collection; answers predicates too when
/// built `with_predicates`.
pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
    predicates: bool,
}

impl<T> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            predicates: false,
        }
    }

    pub fn with_predicates(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            predicates: true,
        }
    }

    pub fn insert(&self, item: T) {
        self.items.write().push(item);
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T: Clone + Send + Sync> CollectionRepository<T> for InMemoryRepository<T> {
    fn all(&self) -> Vec<T> {
        self.items.read().clone()
    }
}

impl<T: Entity + Clone + Send + Sync> PredicateRepository<T> for InMemoryRepository<T> {
    fn find_all(&self, predicate: Option<&BooleanExpression>, orders: &[OrderSpecifier]) -> QueryResult<Vec<T>> {
        let items = self.items.read();
        let mut found: Vec<&T> = items
            .iter()
            .filter(|item| predicate.map_or(true, |p| p.evaluate(*item)))
            .collect();
        found.sort_by(|a, b| {
            orders
                .iter()
                .map(|o| o.compare(*a, *b))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(found.into_iter().cloned().collect())
    }
}

impl<T: Entity + Clone + Send + Sync + 'static> Repository<T> for InMemoryRepository<T> {
    fn predicates(self: Arc<Self>) -> Option<Arc<dyn PredicateRepository<T>>> {
        if self.predicates {
            Some(self)
        } else {
            None
        }
    }

    fn collection(self: Arc<Self>) -> Option<Arc<dyn QueryExecutor<T>>> {
        Some(Arc::new(CollectionExecutor::new(self)))
    }
}
