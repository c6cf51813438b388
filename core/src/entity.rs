//! Access to entity instances held in memory.

use crate::Value;

/// Property access for in-memory entity instances.
///
/// `value_of` returns scalar values, association references (`Value::Ref`)
/// and collections (`Value::List`, empty rather than null when there are no
/// elements); `related` returns the instances reached through an association
/// so paths like `group.name` or `representatives[].name` can be followed.
pub trait Entity {
    fn value_of(&self, property: &str) -> Value;

    fn related(&self, _property: &str) -> Vec<Box<dyn Entity + '_>> {
        Vec::new()
    }
}

impl<E: Entity + ?Sized> Entity for &E {
    fn value_of(&self, property: &str) -> Value {
        (**self).value_of(property)
    }

    fn related(&self, property: &str) -> Vec<Box<dyn Entity + '_>> {
        (**self).related(property)
    }
}

/// Values reached by following `names` from `entity`; the last name is read
/// with `value_of`, earlier ones are navigated with `related`.
pub fn reach(entity: &dyn Entity, names: &[&str]) -> Vec<Value> {
    match names {
        [] => Vec::new(),
        [last] => vec![entity.value_of(last)],
        [first, rest @ ..] => entity
            .related(first)
            .into_iter()
            .flat_map(|related| reach(related.as_ref(), rest))
            .collect(),
    }
}
