//! RegistryBuilder for constructing an immutable Registry.

use crate::{EntityDef, PropertyDef, Registry, RegistryError};
use eql_core::PropertyType;
use std::collections::HashMap;

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entities: HashMap<String, EntityDef>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity type definition.
    pub fn add_entity(&mut self, name: impl Into<String>) -> EntityBuilder<'_> {
        EntityBuilder {
            builder: self,
            name: name.into(),
            id_property: None,
            properties: Vec::new(),
        }
    }

    /// Validate associations and freeze the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for entity in self.entities.values() {
            for property in entity.properties() {
                if let Some(target) = property.property_type.target_entity() {
                    if !self.entities.contains_key(target) {
                        return Err(RegistryError::UnknownTarget {
                            entity: entity.name.clone(),
                            property: property.name.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }
        log::debug!("registry built with {} entity types", self.entities.len());
        Ok(Registry::new(self.entities))
    }
}

/// Builder for an entity type definition.
pub struct EntityBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    name: String,
    id_property: Option<String>,
    properties: Vec<PropertyDef>,
}

impl<'a> EntityBuilder<'a> {
    /// Declare the id property.
    pub fn id(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        let property = PropertyDef::new(name, property_type).required();
        self.id_property = Some(property.name.clone());
        self.properties.push(property);
        self
    }

    /// Add a property.
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Finish building this entity type.
    pub fn done(self) -> Result<(), RegistryError> {
        if self.builder.entities.contains_key(&self.name) {
            return Err(RegistryError::DuplicateEntity(self.name));
        }

        let mut seen = HashMap::new();
        for property in &self.properties {
            if seen.insert(property.name.as_str(), ()).is_some() {
                return Err(RegistryError::DuplicateProperty {
                    entity: self.name.clone(),
                    property: property.name.clone(),
                });
            }
        }

        let Some(id_property) = self.id_property else {
            return Err(RegistryError::MissingId(self.name));
        };

        let entity = EntityDef::new(self.name.clone(), id_property, self.properties);
        self.builder.entities.insert(self.name, entity);
        Ok(())
    }
}
