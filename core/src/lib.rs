//! EQL Core Types
//!
//! This crate provides the foundational types shared by every EQL crate:
//! - Values and declared property types (`Value`, `PropertyType`, `PropertyKind`)
//! - The operator set and the `(Operator, PropertyKind)` strategy table
//! - The generic query tree (`Query`, `Predicate`, `Order`)
//! - Prepared conditions and resolved property paths
//! - The `Entity` access trait used by the in-memory backends
//! - LIKE pattern escaping and matching

mod condition;
mod entity;
mod error;
mod like;
mod operator;
mod query;
mod strategy;
mod types;
mod value;

pub use condition::*;
pub use entity::*;
pub use error::*;
pub use like::*;
pub use operator::*;
pub use query::*;
pub use strategy::*;
pub use types::*;
pub use value::*;
