//! Declared property types.

use std::fmt;

/// The declared type of an entity property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    Text,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    /// Enumeration with a fixed set of constant names.
    Enum(EnumType),
    /// Single-valued association to another entity type.
    Entity(String),
    /// Multi-valued property; the element is a scalar or an `Entity`.
    Collection(Box<PropertyType>),
}

/// An enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.constants.iter().any(|c| c == name)
    }
}

/// Coarse classification of property types, used to pick comparison strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Text,
    Number,
    Temporal,
    Boolean,
    Enum,
    Reference,
    Collection,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 7] = [
        PropertyKind::Text,
        PropertyKind::Number,
        PropertyKind::Temporal,
        PropertyKind::Boolean,
        PropertyKind::Enum,
        PropertyKind::Reference,
        PropertyKind::Collection,
    ];
}

impl PropertyType {
    pub fn collection_of(element: PropertyType) -> Self {
        PropertyType::Collection(Box::new(element))
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyType::Text => PropertyKind::Text,
            PropertyType::Int | PropertyType::Float => PropertyKind::Number,
            PropertyType::Date | PropertyType::DateTime => PropertyKind::Temporal,
            PropertyType::Bool => PropertyKind::Boolean,
            PropertyType::Enum(_) => PropertyKind::Enum,
            PropertyType::Entity(_) => PropertyKind::Reference,
            PropertyType::Collection(_) => PropertyKind::Collection,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, PropertyType::Collection(_))
    }

    /// Element type of a collection, or the type itself.
    pub fn element(&self) -> &PropertyType {
        match self {
            PropertyType::Collection(element) => element,
            other => other,
        }
    }

    /// Entity type reached through this property, if it is an association.
    pub fn target_entity(&self) -> Option<&str> {
        match self.element() {
            PropertyType::Entity(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Text => write!(f, "Text"),
            PropertyType::Int => write!(f, "Int"),
            PropertyType::Float => write!(f, "Float"),
            PropertyType::Bool => write!(f, "Bool"),
            PropertyType::Date => write!(f, "Date"),
            PropertyType::DateTime => write!(f, "DateTime"),
            PropertyType::Enum(e) => write!(f, "{}", e.name),
            PropertyType::Entity(name) => write!(f, "{}", name),
            PropertyType::Collection(element) => write!(f, "[{}]", element),
        }
    }
}
