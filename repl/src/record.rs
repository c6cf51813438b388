//! Dataset records as queryable entities.

use crate::dataset::Store;
use eql_core::{Entity, Value};
use std::fmt;
use std::sync::Arc;

/// One record of a loaded dataset.
///
/// Cheap to clone; associations are followed through the shared store.
#[derive(Clone)]
pub struct Record {
    store: Arc<Store>,
    entity: String,
    index: usize,
}

impl Record {
    pub(crate) fn new(store: Arc<Store>, entity: impl Into<String>, index: usize) -> Self {
        Self {
            store,
            entity: entity.into(),
            index,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Property values in no particular order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store
            .row(&self.entity, self.index)
            .into_iter()
            .flat_map(|row| row.iter().map(|(name, value)| (name.as_str(), value)))
    }

    fn target(&self, reference: &Value) -> Option<Record> {
        let Value::Ref(r) = reference else {
            return None;
        };
        let index = self.store.find(&r.entity, &r.id)?;
        Some(Record::new(Arc::clone(&self.store), r.entity.as_str(), index))
    }
}

impl Entity for Record {
    fn value_of(&self, property: &str) -> Value {
        self.store
            .row(&self.entity, self.index)
            .and_then(|row| row.get(property))
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn related(&self, property: &str) -> Vec<Box<dyn Entity + '_>> {
        let references = match self.value_of(property) {
            Value::List(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };
        references
            .iter()
            .filter_map(|reference| {
                let target = self.target(reference);
                if target.is_none() {
                    log::warn!("{}#{}: dangling reference {} in '{}'", self.entity, self.index, reference, property);
                }
                target
            })
            .map(|record| Box::new(record) as Box<dyn Entity>)
            .collect()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity, self.index)
    }
}
