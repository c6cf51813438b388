//! EQL Property Metadata Registry
//!
//! This crate describes the queryable entity types:
//! - Entity and property definitions with declared types
//! - An immutable `Registry` snapshot built by `RegistryBuilder`
//! - Resolution of dotted/bracketed property paths
//! - Condition translators attached to properties

mod builder;
mod error;
mod registry;
mod translator;
mod types;

pub use builder::*;
pub use error::*;
pub use registry::*;
pub use translator::*;
pub use types::*;
