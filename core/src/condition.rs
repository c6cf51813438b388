//! Prepared conditions and resolved property paths.

use crate::{Operator, PropertyKind, PropertyType, Query, Value};
use std::fmt;

/// One resolved step of a property path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Property name.
    pub name: String,
    /// Entity type declaring the property.
    pub owner: String,
    pub property_type: PropertyType,
    pub nullable: bool,
    /// Whether the path continues through the elements of this collection (`name[]`).
    pub indexed: bool,
}

impl PathSegment {
    pub fn new(name: impl Into<String>, owner: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            property_type,
            nullable: true,
            indexed: false,
        }
    }
}

/// A property path resolved against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPath {
    /// Association steps leading to the leaf, outermost first.
    pub parents: Vec<PathSegment>,
    pub leaf: PathSegment,
}

impl PropertyPath {
    pub fn new(parents: Vec<PathSegment>, leaf: PathSegment) -> Self {
        Self { parents, leaf }
    }

    pub fn single(leaf: PathSegment) -> Self {
        Self::new(Vec::new(), leaf)
    }

    /// Canonical textual form, e.g. `books[].authors[].name`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.leaf.property_type
    }

    pub fn kind(&self) -> PropertyKind {
        self.leaf.property_type.kind()
    }

    /// Whether the path traverses a multi-valued association.
    pub fn is_multi_valued(&self) -> bool {
        self.parents.iter().any(|s| s.indexed)
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.parents.iter().chain(std::iter::once(&self.leaf))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.parents {
            write!(f, "{}", segment.name)?;
            if segment.indexed {
                write!(f, "[]")?;
            }
            write!(f, ".")?;
        }
        write!(f, "{}", self.leaf.name)
    }
}

/// A fully typed condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub property: PropertyPath,
    pub operator: Operator,
    /// Coerced operands: none for unary operators, the list elements for
    /// `in`/`not in`, a single value otherwise.
    pub operands: Vec<Value>,
}

impl Condition {
    pub fn new(property: PropertyPath, operator: Operator, operands: Vec<Value>) -> Self {
        Self {
            property,
            operator,
            operands,
        }
    }

    pub fn unary(property: PropertyPath, operator: Operator) -> Self {
        Self::new(property, operator, Vec::new())
    }

    pub fn single(property: PropertyPath, operator: Operator, operand: impl Into<Value>) -> Self {
        Self::new(property, operator, vec![operand.into()])
    }

    /// The single operand of a binary condition.
    pub fn operand(&self) -> Option<&Value> {
        self.operands.first()
    }

    /// Same condition with another operator and operands.
    pub fn with(&self, operator: Operator, operands: Vec<Value>) -> Self {
        Self::new(self.property.clone(), operator, operands)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.operator)?;
        if self.operator.is_unary() {
            return Ok(());
        }
        if self.operator.takes_list() || self.operands.len() != 1 {
            write!(f, " {}", Value::List(self.operands.clone()))
        } else {
            write!(f, " {}", self.operands[0])
        }
    }
}

/// A fully typed, backend-agnostic query.
pub type PreparedQuery = Query<Condition, PropertyPath>;
