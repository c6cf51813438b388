//! The company dataset shared by the integration tests.
//!
//! | company | number | status      | created          | createdBy | group | representatives         |
//! |---------|--------|-------------|------------------|-----------|-------|-------------------------|
//! | one     | 1      | BROKE       | 2024-01-01 10:00 | admin     | g1    | john, weirdo, surname   |
//! | two     | 2      | IN_BUSINESS | 2024-06-15 12:30 | bob       | g1    | john, joe, peter        |
//! | three   | 3      | -           | 2035-01-01 00:00 | -         | -     | -                       |
//!
//! | company | revenue | founded    | listed | tags           | offices                 |
//! |---------|---------|------------|--------|----------------|-------------------------|
//! | one     | 1.5     | 1999-12-31 | false  | retail, export | o1 Paris, o2 Berlin     |
//! | two     | 250.0   | 2024-06-15 | true   | retail         | o3 Paris                |
//! | three   | -       | -          | false  | -              | -                       |
//!
//! Representative `surname` is named `Joe ' Surname`.

use chrono::{NaiveDate, NaiveDateTime};
use eql_core::{EnumType, Entity, PropertyType, Value};
use eql_query::criteria::{EntityMapping, Mappings};
use eql_registry::{ExpandProperties, IgnoreCase, PropertyDef, Registry, RegistryBuilder, RegistryError};
use eql_sqlite::{SqliteRepository, SqliteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Broke,
    InBusiness,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Status::Broke => "BROKE",
            Status::InBusiness => "IN_BUSINESS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Representative {
    pub id: String,
    pub name: String,
}

/// An office of one company, reached through `offices` (one-to-many).
#[derive(Debug, Clone, PartialEq)]
pub struct Office {
    pub id: String,
    pub city: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: String,
    pub number: i64,
    pub status: Option<Status>,
    pub created: NaiveDateTime,
    pub created_by: Option<String>,
    pub group: Option<Group>,
    pub representatives: Vec<Representative>,
    pub revenue: Option<f64>,
    pub founded: Option<NaiveDate>,
    pub listed: bool,
    pub tags: Vec<String>,
    pub offices: Vec<Office>,
}

impl Entity for Group {
    fn value_of(&self, property: &str) -> Value {
        match property {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Representative {
    fn value_of(&self, property: &str) -> Value {
        match property {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Office {
    fn value_of(&self, property: &str) -> Value {
        match property {
            "id" => self.id.as_str().into(),
            "city" => self.city.as_str().into(),
            "company" => Value::reference("Company", self.company.as_str()),
            _ => Value::Null,
        }
    }
}

impl Entity for Company {
    fn value_of(&self, property: &str) -> Value {
        match property {
            "id" => self.id.as_str().into(),
            "number" => self.number.into(),
            "status" => self.status.map_or(Value::Null, |s| Value::Enum(s.name().into())),
            "created" => self.created.into(),
            "createdBy" => self.created_by.clone().into(),
            "group" => self
                .group
                .as_ref()
                .map_or(Value::Null, |g| Value::reference("Group", g.id.as_str())),
            "representatives" => Value::List(
                self.representatives
                    .iter()
                    .map(|r| Value::reference("Representative", r.id.as_str()))
                    .collect(),
            ),
            "revenue" => self.revenue.into(),
            "founded" => self.founded.map_or(Value::Null, Value::Date),
            "listed" => Value::Bool(self.listed),
            "tags" => Value::List(self.tags.iter().map(|t| Value::from(t.as_str())).collect()),
            "offices" => Value::List(
                self.offices
                    .iter()
                    .map(|o| Value::reference("Office", o.id.as_str()))
                    .collect(),
            ),
            _ => Value::Null,
        }
    }

    fn related(&self, property: &str) -> Vec<Box<dyn Entity + '_>> {
        match property {
            "group" => self
                .group
                .iter()
                .map(|g| Box::new(g) as Box<dyn Entity + '_>)
                .collect(),
            "representatives" => self
                .representatives
                .iter()
                .map(|r| Box::new(r) as Box<dyn Entity + '_>)
                .collect(),
            "offices" => self
                .offices
                .iter()
                .map(|o| Box::new(o) as Box<dyn Entity + '_>)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .unwrap_or_default()
}

pub fn group(id: &str) -> Group {
    let name = match id {
        "g1" => "Group One",
        _ => "Group Two",
    };
    Group {
        id: id.into(),
        name: name.into(),
    }
}

pub fn groups() -> Vec<Group> {
    vec![group("g1"), group("g2")]
}

pub fn representative(id: &str) -> Representative {
    let name = match id {
        "john" => "John",
        "joe" => "Joe",
        "peter" => "Peter",
        "surname" => "Joe ' Surname",
        _ => "Wei%rdo",
    };
    Representative {
        id: id.into(),
        name: name.into(),
    }
}

pub fn representatives() -> Vec<Representative> {
    ["john", "joe", "peter", "weirdo", "surname"].into_iter().map(representative).collect()
}

fn office(id: &str, city: &str, company: &str) -> Office {
    Office {
        id: id.into(),
        city: city.into(),
        company: company.into(),
    }
}

pub fn companies() -> Vec<Company> {
    vec![
        Company {
            id: "one".into(),
            number: 1,
            status: Some(Status::Broke),
            created: at(2024, 1, 1, 10, 0),
            created_by: Some("admin".into()),
            group: Some(group("g1")),
            representatives: vec![
                representative("john"),
                representative("weirdo"),
                representative("surname"),
            ],
            revenue: Some(1.5),
            founded: day(1999, 12, 31),
            listed: false,
            tags: vec!["retail".into(), "export".into()],
            offices: vec![office("o1", "Paris", "one"), office("o2", "Berlin", "one")],
        },
        Company {
            id: "two".into(),
            number: 2,
            status: Some(Status::InBusiness),
            created: at(2024, 6, 15, 12, 30),
            created_by: Some("bob".into()),
            group: Some(group("g1")),
            representatives: vec![representative("john"), representative("joe"), representative("peter")],
            revenue: Some(250.0),
            founded: day(2024, 6, 15),
            listed: true,
            tags: vec!["retail".into()],
            offices: vec![office("o3", "Paris", "two")],
        },
        Company {
            id: "three".into(),
            number: 3,
            status: None,
            created: at(2035, 1, 1, 0, 0),
            created_by: None,
            group: None,
            representatives: Vec::new(),
            revenue: None,
            founded: None,
            listed: false,
            tags: Vec::new(),
            offices: Vec::new(),
        },
    ]
}

/// Metadata of the dataset.
pub fn registry() -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    builder
        .add_entity("Group")
        .id("id", PropertyType::Text)
        .property(PropertyDef::new("name", PropertyType::Text).required())
        .done()?;
    builder
        .add_entity("Representative")
        .id("id", PropertyType::Text)
        .property(PropertyDef::new("name", PropertyType::Text).with_translator(IgnoreCase))
        .property(
            PropertyDef::new("searchText", PropertyType::Text).with_translator(ExpandProperties::new(["id", "name"])),
        )
        .done()?;
    builder
        .add_entity("Company")
        .id("id", PropertyType::Text)
        .property(PropertyDef::new("number", PropertyType::Int).required())
        .property(PropertyDef::new(
            "status",
            PropertyType::Enum(EnumType::new("Status", ["BROKE", "IN_BUSINESS"])),
        ))
        .property(PropertyDef::new("created", PropertyType::DateTime).required())
        .property(PropertyDef::new("createdBy", PropertyType::Text))
        .property(PropertyDef::new("group", PropertyType::Entity("Group".into())))
        .property(PropertyDef::new(
            "representatives",
            PropertyType::collection_of(PropertyType::Entity("Representative".into())),
        ))
        .property(PropertyDef::new("revenue", PropertyType::Float))
        .property(PropertyDef::new("founded", PropertyType::Date))
        .property(PropertyDef::new("listed", PropertyType::Bool).required())
        .property(PropertyDef::new("tags", PropertyType::collection_of(PropertyType::Text)))
        .property(PropertyDef::new(
            "offices",
            PropertyType::collection_of(PropertyType::Entity("Office".into())),
        ))
        .done()?;
    builder
        .add_entity("Office")
        .id("id", PropertyType::Text)
        .property(PropertyDef::new("city", PropertyType::Text).required())
        .property(PropertyDef::new("company", PropertyType::Entity("Company".into())).required())
        .done()?;
    builder.build()
}

pub fn mappings() -> Mappings {
    Mappings::new()
        .with(
            EntityMapping::new("Company", "company", "id")
                .column("number", "number")
                .column("status", "status")
                .column("created", "created")
                .column("createdBy", "created_by")
                .many_to_one("group", "group_id", "Group")
                .many_to_many(
                    "representatives",
                    "company_representative",
                    "company_id",
                    "representative_id",
                    "Representative",
                )
                .column("revenue", "revenue")
                .column("founded", "founded")
                .column("listed", "listed")
                .element_collection("tags", "company_tag", "company_id", "tag")
                .one_to_many("offices", "Office", "company_id"),
        )
        .with(EntityMapping::new("Group", "company_group", "id").column("name", "name"))
        .with(EntityMapping::new("Representative", "representative", "id").column("name", "name"))
        .with(
            EntityMapping::new("Office", "office", "id")
                .column("city", "city")
                .many_to_one("company", "company_id", "Company"),
        )
}

const SCHEMA: &str = "
    CREATE TABLE company_group (id TEXT PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE representative (id TEXT PRIMARY KEY, name TEXT);
    CREATE TABLE company (
        id TEXT PRIMARY KEY,
        number INTEGER NOT NULL,
        status TEXT,
        created TEXT NOT NULL,
        created_by TEXT,
        group_id TEXT REFERENCES company_group (id),
        revenue REAL,
        founded TEXT,
        listed INTEGER NOT NULL
    );
    CREATE TABLE company_representative (
        company_id TEXT NOT NULL REFERENCES company (id),
        representative_id TEXT NOT NULL REFERENCES representative (id)
    );
    CREATE TABLE company_tag (
        company_id TEXT NOT NULL REFERENCES company (id),
        tag TEXT NOT NULL
    );
    CREATE TABLE office (
        id TEXT PRIMARY KEY,
        city TEXT NOT NULL,
        company_id TEXT NOT NULL REFERENCES company (id)
    );
";

/// The dataset stored in an in-memory SQLite database. Rows map to company ids.
pub fn sqlite_repository() -> SqliteResult<SqliteRepository<String>> {
    let repository = SqliteRepository::open_in_memory(mappings(), |row| row.get::<_, String>("id"))?;
    repository.execute_batch(SCHEMA)?;
    for group in groups() {
        repository.insert("company_group", &[("id", group.id.as_str().into()), ("name", group.name.as_str().into())])?;
    }
    for rep in representatives() {
        repository.insert("representative", &[("id", rep.id.as_str().into()), ("name", rep.name.as_str().into())])?;
    }
    for company in companies() {
        repository.insert(
            "company",
            &[
                ("id", company.value_of("id")),
                ("number", company.value_of("number")),
                ("status", company.value_of("status")),
                ("created", company.value_of("created")),
                ("created_by", company.value_of("createdBy")),
                ("group_id", company.value_of("group")),
                ("revenue", company.value_of("revenue")),
                ("founded", company.value_of("founded")),
                ("listed", company.value_of("listed")),
            ],
        )?;
        for rep in &company.representatives {
            repository.insert(
                "company_representative",
                &[("company_id", company.id.as_str().into()), ("representative_id", rep.id.as_str().into())],
            )?;
        }
        for tag in &company.tags {
            repository.insert(
                "company_tag",
                &[("company_id", company.id.as_str().into()), ("tag", tag.as_str().into())],
            )?;
        }
        for office in &company.offices {
            repository.insert(
                "office",
                &[
                    ("id", office.id.as_str().into()),
                    ("city", office.city.as_str().into()),
                    ("company_id", office.company.as_str().into()),
                ],
            )?;
        }
    }
    Ok(repository)
}
