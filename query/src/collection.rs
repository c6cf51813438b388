//! The collection executor: evaluates Prepared Queries directly over
//! in-memory entity instances.

use crate::{QueryExecutor, QueryResult};
use eql_core::{
    reach, require_strategy, Condition, Direction, Entity, Matcher, Order, Predicate, PreparedQuery,
    PropertyPath, Value,
};
use std::cmp::Ordering;
use std::sync::Arc;

/// A repository that can hand out its instances.
pub trait CollectionRepository<T>: Send + Sync {
    /// Every instance, in insertion order.
    fn all(&self) -> Vec<T>;
}

/// Runs queries by testing every instance of a collection.
pub struct CollectionExecutor<T> {
    repository: Arc<dyn CollectionRepository<T>>,
}

impl<T> CollectionExecutor<T> {
    pub fn new(repository: Arc<dyn CollectionRepository<T>>) -> Self {
        Self { repository }
    }
}

impl<T: Entity> QueryExecutor<T> for CollectionExecutor<T> {
    fn find_all(&self, query: &PreparedQuery) -> QueryResult<Vec<T>> {
        let filter = query.predicate.as_ref().map(compile).transpose()?;
        let mut found: Vec<T> = self
            .repository
            .all()
            .into_iter()
            .filter(|item| filter.as_ref().map_or(true, |f| f.test(item)))
            .collect();
        sort(&mut found, &query.orders);
        Ok(found)
    }
}

/// A predicate tree with its conditions compiled to matchers.
enum Filter {
    Test { path: PropertyPath, matcher: Matcher },
    All(Vec<Filter>),
    Any(Vec<Filter>),
}

fn compile(predicate: &Predicate<Condition>) -> QueryResult<Filter> {
    Ok(match predicate {
        Predicate::Condition(condition) => Filter::Test {
            path: condition.property.clone(),
            matcher: matcher(condition)?,
        },
        Predicate::And(children) => Filter::All(children.iter().map(compile).collect::<QueryResult<_>>()?),
        Predicate::Or(children) => Filter::Any(children.iter().map(compile).collect::<QueryResult<_>>()?),
    })
}

pub(crate) fn matcher(condition: &Condition) -> QueryResult<Matcher> {
    let strategy = require_strategy(condition.operator, condition.property.kind())?;
    Ok(Matcher::new(strategy, condition.operands.clone())?)
}

impl Filter {
    fn test(&self, entity: &dyn Entity) -> bool {
        match self {
            Filter::Test { path, matcher } => values_at(entity, path).iter().any(|v| matcher.matches(v)),
            Filter::All(children) => children.iter().all(|c| c.test(entity)),
            Filter::Any(children) => children.iter().any(|c| c.test(entity)),
        }
    }
}

/// The values a path reaches. A single-valued path always yields one value,
/// null when an association on the way is missing.
pub(crate) fn values_at(entity: &dyn Entity, path: &PropertyPath) -> Vec<Value> {
    let names: Vec<&str> = path.segments().map(|s| s.name.as_str()).collect();
    let values = reach(entity, &names);
    if path.is_multi_valued() {
        values
    } else {
        vec![values.into_iter().next().unwrap_or(Value::Null)]
    }
}

/// Stable multi-key sort. Nulls come first ascending and last descending.
pub(crate) fn sort<T: Entity>(items: &mut [T], orders: &[Order<PropertyPath>]) {
    if orders.is_empty() {
        return;
    }
    let mut keyed: Vec<(Vec<Value>, usize)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let key = orders
                .iter()
                .map(|o| values_at(item, &o.property).into_iter().next().unwrap_or(Value::Null))
                .collect();
            (key, i)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, orders.iter().map(|o| o.direction)));

    let permutation: Vec<usize> = keyed.into_iter().map(|(_, i)| i).collect();
    apply_permutation(items, permutation);
}

pub(crate) fn compare_keys(a: &[Value], b: &[Value], directions: impl Iterator<Item = Direction>) -> Ordering {
    for ((x, y), direction) in a.iter().zip(b).zip(directions) {
        let ordering = match direction {
            Direction::Asc => x.cmp_sortable(y),
            Direction::Desc => y.cmp_sortable(x),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Reorder `items` so that position `i` holds the element previously at `permutation[i]`.
fn apply_permutation<T>(items: &mut [T], mut permutation: Vec<usize>) {
    for start in 0..permutation.len() {
        let mut current = start;
        while permutation[current] != start {
            let next = permutation[current];
            items.swap(current, next);
            permutation[current] = current;
            current = next;
        }
        permutation[current] = current;
    }
}
