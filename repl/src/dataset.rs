//! JSON datasets: entity type declarations plus their records.
//!
//! ```json
//! { "entities": [
//!     { "name": "Company", "id": "id",
//!       "properties": [
//!         { "name": "id", "type": "text", "required": true },
//!         { "name": "status", "type": { "enum": { "name": "Status", "constants": ["BROKE"] } } },
//!         { "name": "group", "type": { "ref": "Group" } },
//!         { "name": "representatives", "type": { "list": { "ref": "Representative" } } },
//!         { "name": "searchText", "type": "text", "translator": { "expand": ["id", "name"] } }
//!       ],
//!       "records": [ { "id": "one", "status": "BROKE", "group": "g1", "representatives": ["john"] } ] }
//! ] }
//! ```

use crate::{Record, ReplError, ReplResult};
use eql_core::{parse_date, parse_date_time, EnumType, PropertyType, Value};
use eql_registry::{ExpandProperties, IgnoreCase, PropertyDef, Registry, RegistryBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// The file format.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetFile {
    pub entities: Vec<EntityDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDecl {
    pub name: String,
    /// Name of the id property; it must also be declared in `properties`.
    pub id: String,
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub records: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: TypeDecl,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub translator: Option<TranslatorDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeDecl {
    Text,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    Enum { name: String, constants: Vec<String> },
    Ref(String),
    List(Box<TypeDecl>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslatorDecl {
    IgnoreCase,
    Expand(Vec<String>),
}

impl TypeDecl {
    pub fn to_property_type(&self) -> PropertyType {
        match self {
            TypeDecl::Text => PropertyType::Text,
            TypeDecl::Int => PropertyType::Int,
            TypeDecl::Float => PropertyType::Float,
            TypeDecl::Bool => PropertyType::Bool,
            TypeDecl::Date => PropertyType::Date,
            TypeDecl::DateTime => PropertyType::DateTime,
            TypeDecl::Enum { name, constants } => PropertyType::Enum(EnumType::new(name, constants)),
            TypeDecl::Ref(target) => PropertyType::Entity(target.clone()),
            TypeDecl::List(element) => PropertyType::collection_of(element.to_property_type()),
        }
    }
}

impl PropertyDecl {
    fn to_property_def(&self) -> PropertyDef {
        let mut def = PropertyDef::new(&self.name, self.property_type.to_property_type());
        if self.required {
            def = def.required();
        }
        match &self.translator {
            Some(TranslatorDecl::IgnoreCase) => def.with_translator(IgnoreCase),
            Some(TranslatorDecl::Expand(properties)) => {
                def.with_translator(ExpandProperties::new(properties.iter().cloned()))
            }
            None => def,
        }
    }
}

// ==================== Store ====================

/// Records of one entity type, converted to values by declared type.
#[derive(Debug, Default)]
pub(crate) struct Table {
    pub(crate) rows: Vec<HashMap<String, Value>>,
    by_id: HashMap<String, usize>,
}

/// All loaded records, by entity type.
#[derive(Debug, Default)]
pub struct Store {
    tables: HashMap<String, Table>,
}

impl Store {
    pub(crate) fn row(&self, entity: &str, index: usize) -> Option<&HashMap<String, Value>> {
        self.tables.get(entity).and_then(|t| t.rows.get(index))
    }

    pub(crate) fn find(&self, entity: &str, id: &Value) -> Option<usize> {
        self.tables.get(entity)?.by_id.get(&id_key(id)).copied()
    }

    fn len(&self, entity: &str) -> usize {
        self.tables.get(entity).map_or(0, |t| t.rows.len())
    }
}

fn id_key(id: &Value) -> String {
    id.identity().to_string()
}

/// A loaded dataset: the registry describing it and its records.
#[derive(Debug)]
pub struct Dataset {
    registry: Arc<Registry>,
    store: Arc<Store>,
}

impl Dataset {
    pub fn load(path: &Path) -> ReplResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ReplError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> ReplResult<Self> {
        let file: DatasetFile = serde_json::from_str(text)?;
        Self::from_file(&file)
    }

    pub fn from_file(file: &DatasetFile) -> ReplResult<Self> {
        let mut builder = RegistryBuilder::new();
        for entity in &file.entities {
            let mut entity_builder = builder.add_entity(&entity.name);
            for property in &entity.properties {
                if property.name == entity.id {
                    entity_builder = entity_builder.id(&property.name, property.property_type.to_property_type());
                } else {
                    entity_builder = entity_builder.property(property.to_property_def());
                }
            }
            entity_builder.done()?;
        }
        let registry = builder.build()?;

        let mut store = Store::default();
        for entity in &file.entities {
            store.tables.insert(entity.name.clone(), load_table(entity)?);
        }
        log::debug!("loaded dataset with {} entity types", file.entities.len());
        Ok(Self {
            registry: Arc::new(registry),
            store: Arc::new(store),
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Records of `entity`, in file order.
    pub fn records(&self, entity: &str) -> Vec<Record> {
        (0..self.store.len(entity))
            .map(|index| Record::new(Arc::clone(&self.store), entity, index))
            .collect()
    }
}

fn load_table(entity: &EntityDecl) -> ReplResult<Table> {
    let mut table = Table::default();
    for (index, record) in entity.records.iter().enumerate() {
        let mut row = HashMap::new();
        for property in &entity.properties {
            let raw = record.get(&property.name).unwrap_or(&serde_json::Value::Null);
            let value = to_value(raw, &property.property_type)
                .map_err(|message| ReplError::record(&entity.name, index, format!("{}: {}", property.name, message)))?;
            row.insert(property.name.clone(), value);
        }
        for name in record.keys() {
            if !row.contains_key(name) {
                return Err(ReplError::record(&entity.name, index, format!("undeclared property '{}'", name)));
            }
        }
        let id = row.get(&entity.id).cloned().unwrap_or(Value::Null);
        if id.is_null() {
            return Err(ReplError::record(&entity.name, index, "missing id"));
        }
        if table.by_id.insert(id_key(&id), index).is_some() {
            return Err(ReplError::record(&entity.name, index, format!("duplicate id {}", id)));
        }
        table.rows.push(row);
    }
    Ok(table)
}

/// Convert a JSON value to the declared type. Collections are never null.
fn to_value(raw: &serde_json::Value, declared: &TypeDecl) -> Result<Value, String> {
    use serde_json::Value as Json;

    let mismatch = || format!("expected {:?}, found {}", declared, raw);
    match (declared, raw) {
        (TypeDecl::List(_), Json::Null) => Ok(Value::List(Vec::new())),
        (_, Json::Null) => Ok(Value::Null),
        (TypeDecl::Text, Json::String(s)) => Ok(Value::Text(s.clone())),
        (TypeDecl::Int, Json::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(mismatch),
        (TypeDecl::Float, Json::Number(n)) => n.as_f64().map(Value::Float).ok_or_else(mismatch),
        (TypeDecl::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (TypeDecl::Date, Json::String(s)) => parse_date(s).map(Value::Date).ok_or_else(mismatch),
        (TypeDecl::DateTime, Json::String(s)) => {
            parse_date_time(s).map(Value::DateTime).ok_or_else(mismatch)
        }
        (TypeDecl::Enum { constants, .. }, Json::String(s)) if constants.contains(s) => {
            Ok(Value::Enum(s.clone()))
        }
        (TypeDecl::Ref(target), Json::String(s)) => Ok(Value::reference(target, s.as_str())),
        (TypeDecl::Ref(target), Json::Number(n)) => n
            .as_i64()
            .map(|id| Value::reference(target, id))
            .ok_or_else(mismatch),
        (TypeDecl::List(element), Json::Array(items)) => items
            .iter()
            .map(|item| to_value(item, element))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        _ => Err(mismatch()),
    }
}
