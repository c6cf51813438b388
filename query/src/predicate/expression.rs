//! Boolean expressions over entity properties.

use eql_core::{Direction, Entity, Matcher, Value};
use std::cmp::Ordering;
use std::fmt;

/// A property reached from the current scope through single-valued hops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    steps: Vec<String>,
}

impl PropertyRef {
    pub(crate) fn new(steps: Vec<String>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// The value at this property; null when a hop is missing.
    pub fn value(&self, entity: &dyn Entity) -> Value {
        match self.steps.as_slice() {
            [] => Value::Null,
            [last] => entity.value_of(last),
            [first, rest @ ..] => match entity.related(first).first() {
                Some(related) => PropertyRef::new(rest.to_vec()).value(related.as_ref()),
                None => Value::Null,
            },
        }
    }

    /// Whether `f` holds for some instance behind this (collection) property.
    fn any(&self, entity: &dyn Entity, f: &mut dyn FnMut(&dyn Entity) -> bool) -> bool {
        match self.steps.as_slice() {
            [] => false,
            [last] => entity.related(last).iter().any(|e| f(e.as_ref())),
            [first, rest @ ..] => match entity.related(first).first() {
                Some(related) => PropertyRef::new(rest.to_vec()).any(related.as_ref(), f),
                None => false,
            },
        }
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps.join("."))
    }
}

/// A boolean expression built from typed paths.
#[derive(Debug, Clone)]
pub enum BooleanExpression {
    /// A test on the value of one property.
    Test { property: PropertyRef, matcher: Matcher },
    And(Vec<BooleanExpression>),
    Or(Vec<BooleanExpression>),
    /// Holds when some element of a multi-valued association satisfies the
    /// inner expression, which is scoped to that element.
    Any {
        collection: PropertyRef,
        condition: Box<BooleanExpression>,
    },
}

impl BooleanExpression {
    pub fn and(self, other: BooleanExpression) -> Self {
        match self {
            BooleanExpression::And(mut children) => {
                children.push(other);
                BooleanExpression::And(children)
            }
            first => BooleanExpression::And(vec![first, other]),
        }
    }

    pub fn or(self, other: BooleanExpression) -> Self {
        match self {
            BooleanExpression::Or(mut children) => {
                children.push(other);
                BooleanExpression::Or(children)
            }
            first => BooleanExpression::Or(vec![first, other]),
        }
    }

    pub fn evaluate(&self, entity: &dyn Entity) -> bool {
        match self {
            BooleanExpression::Test { property, matcher } => matcher.matches(&property.value(entity)),
            BooleanExpression::And(children) => children.iter().all(|c| c.evaluate(entity)),
            BooleanExpression::Or(children) => children.iter().any(|c| c.evaluate(entity)),
            BooleanExpression::Any {
                collection,
                condition,
            } => collection.any(entity, &mut |element| condition.evaluate(element)),
        }
    }
}

/// A sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpecifier {
    pub property: PropertyRef,
    pub direction: Direction,
}

impl OrderSpecifier {
    /// Compare two instances on this key. Nulls come first ascending.
    pub fn compare(&self, a: &dyn Entity, b: &dyn Entity) -> Ordering {
        let (x, y) = (self.property.value(a), self.property.value(b));
        match self.direction {
            Direction::Asc => x.cmp_sortable(&y),
            Direction::Desc => y.cmp_sortable(&x),
        }
    }
}
