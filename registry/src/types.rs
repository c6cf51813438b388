//! Entity and property definitions.

use crate::ConditionTranslator;
use eql_core::PropertyType;
use std::collections::HashMap;
use std::sync::Arc;

/// A property definition.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub property_type: PropertyType,
    /// Whether the property may be absent.
    pub nullable: bool,
    /// Translator applied to conditions on this property.
    pub translator: Option<Arc<dyn ConditionTranslator>>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            nullable: true,
            translator: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_translator(mut self, translator: impl ConditionTranslator + 'static) -> Self {
        self.translator = Some(Arc::new(translator));
        self
    }
}

/// An entity type definition.
#[derive(Debug, Clone)]
pub struct EntityDef {
    pub name: String,
    /// Name of the id property.
    pub id_property: String,
    properties: Vec<PropertyDef>,
    index: HashMap<String, usize>,
}

impl EntityDef {
    pub(crate) fn new(name: String, id_property: String, properties: Vec<PropertyDef>) -> Self {
        let index = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Self {
            name,
            id_property,
            properties,
            index,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.iter()
    }

    pub fn id(&self) -> Option<&PropertyDef> {
        self.property(&self.id_property)
    }
}
