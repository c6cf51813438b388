//! Typed path handles.
//!
//! A [`PathBuilder`] points at an entity (the query root, an associated
//! entity, or an element of a multi-valued association) and hands out typed
//! handles for its properties. Each handle only offers the operations that
//! make sense for its type.

use super::{BooleanExpression, OrderSpecifier, PropertyRef};
use eql_core::{CoreResult, Direction, Matcher, Operator, Strategy, Value};

/// Builds typed paths from property names.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    steps: Vec<String>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate a single-valued association.
    pub fn get(&self, name: &str) -> PathBuilder {
        let mut steps = self.steps.clone();
        steps.push(name.to_string());
        PathBuilder { steps }
    }

    fn property(&self, name: &str) -> PropertyRef {
        PropertyRef::new(self.get(name).steps)
    }

    pub fn string(&self, name: &str) -> StringPath {
        StringPath(self.property(name))
    }

    pub fn comparable(&self, name: &str) -> ComparablePath {
        ComparablePath(self.property(name))
    }

    pub fn simple(&self, name: &str) -> SimplePath {
        SimplePath(self.property(name))
    }

    pub fn entity(&self, name: &str) -> EntityPath {
        EntityPath(self.property(name))
    }

    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(self.property(name))
    }

    pub fn order(&self, name: &str, direction: Direction) -> OrderSpecifier {
        OrderSpecifier {
            property: self.property(name),
            direction,
        }
    }
}

fn test(property: &PropertyRef, strategy: Strategy, operands: Vec<Value>) -> CoreResult<BooleanExpression> {
    Ok(BooleanExpression::Test {
        property: property.clone(),
        matcher: Matcher::new(strategy, operands)?,
    })
}

/// Operations shared by every single-valued property.
pub trait ValuePath {
    fn property(&self) -> &PropertyRef;

    fn eq(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Equality { negated: false }, vec![value.into()])
    }

    fn ne(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Equality { negated: true }, vec![value.into()])
    }

    fn in_list(&self, values: Vec<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Membership { negated: false }, values)
    }

    fn not_in(&self, values: Vec<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Membership { negated: true }, values)
    }

    fn is_null(&self) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Nullness { negated: false }, Vec::new())
    }

    fn is_not_null(&self) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Nullness { negated: true }, Vec::new())
    }
}

/// Range operations for properties with a natural order.
pub trait OrderedPath: ValuePath {
    fn gt(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Ordering(Operator::Gt), vec![value.into()])
    }

    fn goe(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Ordering(Operator::Ge), vec![value.into()])
    }

    fn lt(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Ordering(Operator::Lt), vec![value.into()])
    }

    fn loe(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(self.property(), Strategy::Ordering(Operator::Le), vec![value.into()])
    }
}

/// A boolean or enum property.
#[derive(Debug, Clone)]
pub struct SimplePath(PropertyRef);

/// A numeric or temporal property.
#[derive(Debug, Clone)]
pub struct ComparablePath(PropertyRef);

/// A text property.
#[derive(Debug, Clone)]
pub struct StringPath(PropertyRef);

/// A single-valued association, compared by the referenced id.
#[derive(Debug, Clone)]
pub struct EntityPath(PropertyRef);

/// A multi-valued property: an association or a collection of values.
#[derive(Debug, Clone)]
pub struct CollectionPath(PropertyRef);

impl ValuePath for SimplePath {
    fn property(&self) -> &PropertyRef {
        &self.0
    }
}

impl ValuePath for ComparablePath {
    fn property(&self) -> &PropertyRef {
        &self.0
    }
}

impl OrderedPath for ComparablePath {}

impl ValuePath for StringPath {
    fn property(&self) -> &PropertyRef {
        &self.0
    }
}

impl OrderedPath for StringPath {}

impl StringPath {
    fn pattern(&self, pattern: &str, case_insensitive: bool, negated: bool) -> CoreResult<BooleanExpression> {
        test(
            &self.0,
            Strategy::Pattern {
                case_insensitive,
                negated,
            },
            vec![Value::Text(pattern.to_string())],
        )
    }

    pub fn like(&self, pattern: &str) -> CoreResult<BooleanExpression> {
        self.pattern(pattern, false, false)
    }

    pub fn not_like(&self, pattern: &str) -> CoreResult<BooleanExpression> {
        self.pattern(pattern, false, true)
    }

    pub fn like_ignore_case(&self, pattern: &str) -> CoreResult<BooleanExpression> {
        self.pattern(pattern, true, false)
    }

    pub fn not_like_ignore_case(&self, pattern: &str) -> CoreResult<BooleanExpression> {
        self.pattern(pattern, true, true)
    }
}

impl ValuePath for EntityPath {
    fn property(&self) -> &PropertyRef {
        &self.0
    }
}

impl EntityPath {
    /// Paths of the associated entity.
    pub fn path(&self) -> PathBuilder {
        PathBuilder {
            steps: self.0.steps().to_vec(),
        }
    }
}

impl CollectionPath {
    pub fn contains(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(&self.0, Strategy::Containment { negated: false }, vec![value.into()])
    }

    pub fn not_contains(&self, value: impl Into<Value>) -> CoreResult<BooleanExpression> {
        test(&self.0, Strategy::Containment { negated: true }, vec![value.into()])
    }

    pub fn is_empty(&self) -> CoreResult<BooleanExpression> {
        test(&self.0, Strategy::Emptiness { negated: false }, Vec::new())
    }

    pub fn is_not_empty(&self) -> CoreResult<BooleanExpression> {
        test(&self.0, Strategy::Emptiness { negated: true }, Vec::new())
    }

    /// Some element satisfies the expression `f` builds from the element's paths.
    pub fn any(
        &self,
        f: impl FnOnce(&PathBuilder) -> CoreResult<BooleanExpression>,
    ) -> CoreResult<BooleanExpression> {
        Ok(BooleanExpression::Any {
            collection: self.0.clone(),
            condition: Box::new(f(&PathBuilder::new())?),
        })
    }
}
