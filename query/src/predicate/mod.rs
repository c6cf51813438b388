//! The predicate executor.
//!
//! Prepared conditions are rebuilt through typed path handles into a
//! [`BooleanExpression`] which a [`PredicateRepository`] evaluates.

mod expression;
mod path;

pub use expression::{BooleanExpression, OrderSpecifier, PropertyRef};
pub use path::{
    CollectionPath, ComparablePath, EntityPath, OrderedPath, PathBuilder, SimplePath, StringPath,
    ValuePath,
};

use crate::{QueryExecutor, QueryResult};
use eql_core::{
    require_strategy, Condition, CoreError, CoreResult, Operator, Order, PathSegment, Predicate,
    PreparedQuery, PropertyKind, PropertyPath, Strategy, Value,
};
use std::sync::Arc;

/// A repository able to run boolean expressions.
pub trait PredicateRepository<T>: Send + Sync {
    fn find_all(
        &self,
        predicate: Option<&BooleanExpression>,
        orders: &[OrderSpecifier],
    ) -> QueryResult<Vec<T>>;
}

/// Runs queries through a [`PredicateRepository`].
pub struct PredicateExecutor<T> {
    repository: Arc<dyn PredicateRepository<T>>,
}

impl<T> PredicateExecutor<T> {
    pub fn new(repository: Arc<dyn PredicateRepository<T>>) -> Self {
        Self { repository }
    }
}

impl<T> QueryExecutor<T> for PredicateExecutor<T> {
    fn find_all(&self, query: &PreparedQuery) -> QueryResult<Vec<T>> {
        let predicate = query.predicate.as_ref().map(to_expression).transpose()?;
        let orders: Vec<OrderSpecifier> = query.orders.iter().map(to_order).collect();
        self.repository.find_all(predicate.as_ref(), &orders)
    }
}

/// Rebuild a prepared predicate as a boolean expression.
pub fn to_expression(predicate: &Predicate<Condition>) -> QueryResult<BooleanExpression> {
    Ok(match predicate {
        Predicate::Condition(condition) => condition_expression(condition)?,
        Predicate::And(children) => BooleanExpression::And(
            children
                .iter()
                .map(to_expression)
                .collect::<QueryResult<_>>()?,
        ),
        Predicate::Or(children) => BooleanExpression::Or(
            children
                .iter()
                .map(to_expression)
                .collect::<QueryResult<_>>()?,
        ),
    })
}

fn to_order(order: &Order<PropertyPath>) -> OrderSpecifier {
    let builder = order
        .property
        .parents
        .iter()
        .fold(PathBuilder::new(), |builder, hop| builder.get(&hop.name));
    builder.order(&order.property.leaf.name, order.direction)
}

fn condition_expression(condition: &Condition) -> QueryResult<BooleanExpression> {
    let strategy = require_strategy(condition.operator, condition.property.kind())?;
    Ok(along(
        &PathBuilder::new(),
        &condition.property.parents,
        &condition.property.leaf,
        strategy,
        &condition.operands,
    )?)
}

/// Follow the association hops, opening an `any` scope at every multi-valued one.
fn along(
    builder: &PathBuilder,
    hops: &[PathSegment],
    leaf: &PathSegment,
    strategy: Strategy,
    operands: &[Value],
) -> CoreResult<BooleanExpression> {
    match hops.split_first() {
        Some((hop, rest)) if hop.indexed => builder
            .collection(&hop.name)
            .any(|element| along(element, rest, leaf, strategy, operands)),
        Some((hop, rest)) => along(&builder.get(&hop.name), rest, leaf, strategy, operands),
        None => leaf_expression(builder, leaf, strategy, operands),
    }
}

fn leaf_expression(
    builder: &PathBuilder,
    leaf: &PathSegment,
    strategy: Strategy,
    operands: &[Value],
) -> CoreResult<BooleanExpression> {
    let name = leaf.name.as_str();
    match leaf.property_type.kind() {
        PropertyKind::Text => {
            let path = builder.string(name);
            match strategy {
                Strategy::Pattern {
                    case_insensitive,
                    negated,
                } => {
                    let pattern = operands.first().and_then(Value::as_str).unwrap_or_default();
                    match (case_insensitive, negated) {
                        (false, false) => path.like(pattern),
                        (false, true) => path.not_like(pattern),
                        (true, false) => path.like_ignore_case(pattern),
                        (true, true) => path.not_like_ignore_case(pattern),
                    }
                }
                _ => ordered(&path, strategy, operands),
            }
        }
        PropertyKind::Number | PropertyKind::Temporal => {
            ordered(&builder.comparable(name), strategy, operands)
        }
        PropertyKind::Boolean | PropertyKind::Enum => simple(&builder.simple(name), strategy, operands),
        PropertyKind::Reference => simple(&builder.entity(name), strategy, operands),
        PropertyKind::Collection => {
            let path = builder.collection(name);
            match strategy {
                Strategy::Emptiness { negated: false } => path.is_empty(),
                Strategy::Emptiness { negated: true } => path.is_not_empty(),
                Strategy::Containment { negated: false } => path.contains(first(operands)),
                Strategy::Containment { negated: true } => path.not_contains(first(operands)),
                other => Err(unsupported(other, PropertyKind::Collection)),
            }
        }
    }
}

fn ordered(path: &impl OrderedPath, strategy: Strategy, operands: &[Value]) -> CoreResult<BooleanExpression> {
    match strategy {
        Strategy::Ordering(Operator::Gt) => path.gt(first(operands)),
        Strategy::Ordering(Operator::Ge) => path.goe(first(operands)),
        Strategy::Ordering(Operator::Lt) => path.lt(first(operands)),
        Strategy::Ordering(_) => path.loe(first(operands)),
        other => simple(path, other, operands),
    }
}

fn simple(path: &impl ValuePath, strategy: Strategy, operands: &[Value]) -> CoreResult<BooleanExpression> {
    match strategy {
        Strategy::Equality { negated: false } => path.eq(first(operands)),
        Strategy::Equality { negated: true } => path.ne(first(operands)),
        Strategy::Membership { negated: false } => path.in_list(operands.to_vec()),
        Strategy::Membership { negated: true } => path.not_in(operands.to_vec()),
        Strategy::Nullness { negated: false } => path.is_null(),
        Strategy::Nullness { negated: true } => path.is_not_null(),
        other => Err(unsupported(other, PropertyKind::Boolean)),
    }
}

fn first(operands: &[Value]) -> Value {
    operands.first().cloned().unwrap_or(Value::Null)
}

fn unsupported(strategy: Strategy, kind: PropertyKind) -> CoreError {
    CoreError::UnsupportedOperator {
        operator: format!("{:?}", strategy),
        kind: format!("{:?}", kind).to_lowercase(),
    }
}
