//! Queries scoped to an owning entity.

use crate::{Page, PageRequest, QueryError, QueryExecutor, QueryResult};
use eql_core::{Condition, EntityRef, Operator, Predicate, PreparedQuery, PropertyPath, PropertyType, Query, Value};
use eql_registry::Registry;
use std::sync::Arc;

/// Runs queries on the entities associated with an owner, e.g. the
/// representatives of one company.
///
/// The target entity type points back at the owner through a back-reference
/// property, either single-valued (`company`) or multi-valued (`companies`).
/// Every query is combined with `back-reference = owner` (or
/// `back-reference contains owner`).
pub struct AssociatedQueryExecutor<T> {
    executor: Arc<dyn QueryExecutor<T>>,
    back_reference: PropertyPath,
    owner_entity: String,
}

impl<T> AssociatedQueryExecutor<T> {
    pub fn new(
        registry: &Registry,
        entity: &str,
        back_reference: &str,
        executor: Arc<dyn QueryExecutor<T>>,
    ) -> QueryResult<Self> {
        let resolved = registry
            .resolve(entity, back_reference)
            .map_err(|e| QueryError::association(entity, back_reference, e.to_string()))?;
        let path = resolved.path;
        if !path.parents.is_empty() {
            return Err(QueryError::association(entity, back_reference, "must be a direct property"));
        }
        let owner_entity = match &path.leaf.property_type {
            PropertyType::Entity(owner) => owner.clone(),
            PropertyType::Collection(element) => match element.as_ref() {
                PropertyType::Entity(owner) => owner.clone(),
                _ => return Err(QueryError::association(entity, back_reference, "not an association")),
            },
            _ => return Err(QueryError::association(entity, back_reference, "not an association")),
        };
        Ok(Self {
            executor,
            back_reference: path,
            owner_entity,
        })
    }

    pub fn owner_entity(&self) -> &str {
        &self.owner_entity
    }

    /// The query restricted to the owner's associated entities.
    pub fn scoped(&self, owner: impl Into<Value>, query: &PreparedQuery) -> PreparedQuery {
        let owner = match owner.into() {
            Value::Ref(r) => Value::Ref(r),
            id => Value::Ref(EntityRef::new(self.owner_entity.clone(), id)),
        };
        let operator = if self.back_reference.leaf.property_type.is_collection() {
            Operator::Contains
        } else {
            Operator::Eq
        };
        let restriction = Query::new(Predicate::Condition(Condition::single(
            self.back_reference.clone(),
            operator,
            owner,
        )));
        restriction.and(query.clone())
    }

    /// One page of the owner's associated entities matching `query`.
    pub fn find_all(&self, owner: impl Into<Value>, query: &PreparedQuery, request: PageRequest) -> QueryResult<Page<T>> {
        self.executor.find_page(&self.scoped(owner, query), request)
    }
}
