//! The Registry - immutable entity metadata lookup.

use crate::{EntityDef, PropertyDef, ResolveError};
use eql_core::{PathSegment, PropertyPath, PropertyType};
use std::collections::HashMap;

/// The Registry provides lookup of entity types and property paths.
/// It is immutable after construction and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<String, EntityDef>,
}

/// A resolved path together with the definition of its last property.
#[derive(Debug, Clone)]
pub struct ResolvedProperty<'a> {
    pub path: PropertyPath,
    pub definition: &'a PropertyDef,
}

impl Registry {
    pub(crate) fn new(entities: HashMap<String, EntityDef>) -> Self {
        Self { entities }
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    /// Declared type of an entity's id property.
    pub fn id_type(&self, entity: &str) -> Option<&PropertyType> {
        self.entity(entity)
            .and_then(|e| e.id())
            .map(|p| &p.property_type)
    }

    /// Resolve a property path such as `group.name` or
    /// `representatives[].name` starting at `entity`.
    ///
    /// Single-valued associations are navigated with `.`; multi-valued ones
    /// require `[]` before the `.`. The last segment cannot carry `[]`.
    pub fn resolve(&self, entity: &str, path: &str) -> Result<ResolvedProperty<'_>, ResolveError> {
        let mut current = self
            .entity(entity)
            .ok_or_else(|| ResolveError::UnknownEntity(entity.to_string()))?;

        let parts: Vec<&str> = path.split('.').collect();
        let mut parents = Vec::with_capacity(parts.len().saturating_sub(1));

        for (i, part) in parts.iter().enumerate() {
            let last = i + 1 == parts.len();
            let (name, indexed) = match part.strip_suffix("[]") {
                Some(name) => (name, true),
                None => (*part, false),
            };
            if name.is_empty() {
                return Err(ResolveError::invalid_path(path, "empty property name"));
            }

            let definition = current
                .property(name)
                .ok_or_else(|| ResolveError::UnknownProperty {
                    entity: current.name.clone(),
                    property: name.to_string(),
                    path: path.to_string(),
                })?;

            let segment = PathSegment {
                name: name.to_string(),
                owner: current.name.clone(),
                property_type: definition.property_type.clone(),
                nullable: definition.nullable,
                indexed,
            };

            if last {
                if indexed {
                    return Err(ResolveError::invalid_path(
                        path,
                        format!("'{}[]' must be followed by a property", name),
                    ));
                }
                return Ok(ResolvedProperty {
                    path: PropertyPath::new(parents, segment),
                    definition,
                });
            }

            let target = match (&definition.property_type, indexed) {
                (PropertyType::Entity(target), false) => target,
                (PropertyType::Collection(element), true) => match element.as_ref() {
                    PropertyType::Entity(target) => target,
                    _ => {
                        return Err(ResolveError::invalid_path(
                            path,
                            format!("elements of '{}' have no properties", name),
                        ))
                    }
                },
                (PropertyType::Collection(_), false) => {
                    return Err(ResolveError::invalid_path(
                        path,
                        format!("use '{}[]' to navigate a multi-valued property", name),
                    ))
                }
                (PropertyType::Entity(_), true) => {
                    return Err(ResolveError::invalid_path(
                        path,
                        format!("'{}' is single-valued and cannot be indexed", name),
                    ))
                }
                _ => {
                    return Err(ResolveError::invalid_path(
                        path,
                        format!("'{}' is not an association", name),
                    ))
                }
            };

            current = self
                .entity(target)
                .ok_or_else(|| ResolveError::UnknownEntity(target.clone()))?;
            parents.push(segment);
        }

        Err(ResolveError::invalid_path(path, "empty property path"))
    }
}
