//! Table mappings for the criteria executor.

use std::collections::HashMap;

/// How a property is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMapping {
    /// A column of the entity's own table.
    Column(String),
    /// A foreign key column of the entity's table.
    ManyToOne { column: String, target: String },
    /// Rows of the target table pointing back through `mapped_by`.
    OneToMany { target: String, mapped_by: String },
    /// A link table between the entity and the target.
    ManyToMany {
        join_table: String,
        owner_column: String,
        target_column: String,
        target: String,
    },
    /// Values stored in a side table.
    ElementCollection {
        table: String,
        owner_column: String,
        value_column: String,
    },
}

/// The table of one entity type and how its properties are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapping {
    pub entity: String,
    pub table: String,
    pub id_column: String,
    properties: HashMap<String, ColumnMapping>,
}

impl EntityMapping {
    pub fn new(entity: impl Into<String>, table: impl Into<String>, id_column: impl Into<String>) -> Self {
        let id_column = id_column.into();
        let mut properties = HashMap::new();
        properties.insert(id_column.clone(), ColumnMapping::Column(id_column.clone()));
        Self {
            entity: entity.into(),
            table: table.into(),
            id_column,
            properties,
        }
    }

    /// Map the id property when its name differs from the id column.
    pub fn id_property(mut self, name: impl Into<String>) -> Self {
        self.properties
            .insert(name.into(), ColumnMapping::Column(self.id_column.clone()));
        self
    }

    pub fn column(self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.map(property, ColumnMapping::Column(column.into()))
    }

    pub fn many_to_one(self, property: impl Into<String>, column: impl Into<String>, target: impl Into<String>) -> Self {
        self.map(
            property,
            ColumnMapping::ManyToOne {
                column: column.into(),
                target: target.into(),
            },
        )
    }

    pub fn one_to_many(self, property: impl Into<String>, target: impl Into<String>, mapped_by: impl Into<String>) -> Self {
        self.map(
            property,
            ColumnMapping::OneToMany {
                target: target.into(),
                mapped_by: mapped_by.into(),
            },
        )
    }

    pub fn many_to_many(
        self,
        property: impl Into<String>,
        join_table: impl Into<String>,
        owner_column: impl Into<String>,
        target_column: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.map(
            property,
            ColumnMapping::ManyToMany {
                join_table: join_table.into(),
                owner_column: owner_column.into(),
                target_column: target_column.into(),
                target: target.into(),
            },
        )
    }

    pub fn element_collection(
        self,
        property: impl Into<String>,
        table: impl Into<String>,
        owner_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        self.map(
            property,
            ColumnMapping::ElementCollection {
                table: table.into(),
                owner_column: owner_column.into(),
                value_column: value_column.into(),
            },
        )
    }

    pub fn map(mut self, property: impl Into<String>, mapping: ColumnMapping) -> Self {
        self.properties.insert(property.into(), mapping);
        self
    }

    pub fn property(&self, name: &str) -> Option<&ColumnMapping> {
        self.properties.get(name)
    }
}

/// Mappings of every entity type reachable from a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    entities: HashMap<String, EntityMapping>,
}

impl Mappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, mapping: EntityMapping) -> Self {
        self.add(mapping);
        self
    }

    pub fn add(&mut self, mapping: EntityMapping) {
        self.entities.insert(mapping.entity.clone(), mapping);
    }

    pub fn entity(&self, name: &str) -> Option<&EntityMapping> {
        self.entities.get(name)
    }
}
