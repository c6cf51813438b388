//! EQL Query Preparer
//!
//! This crate turns an Abstract Query into a Prepared Query:
//! - Property path resolution against the registry
//! - Operand coercion to the declared property types
//! - Function resolution (`today()`, `now()`, `currentUser()`) from an explicit context
//! - Built-in rewrites and property condition translators, applied to a fixpoint
//! - Operator validation through the strategy table

mod coerce;
mod context;
mod error;
mod functions;
mod preparer;
mod translate;

pub use context::QueryContext;
pub use error::*;
pub use preparer::{Preparable, Preparer, MAX_TRANSLATION_DEPTH};
