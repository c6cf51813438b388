//! EQL Integration Tests
//!
//! Runs EQL queries against one company dataset held by every backend:
//! - `fixtures`: the dataset, its registry and its SQLite schema
//! - `world`: the dataset bound to the collection, predicate and criteria executors
//! - `scenario`: queries with expected ids (or errors), checked on every backend

pub mod error;
pub mod fixtures;
pub mod scenario;
pub mod world;

pub mod prelude {
    pub use crate::error::{TestError, TestResult};
    pub use crate::fixtures::{companies, registry, Company, Status};
    pub use crate::scenario::{ErrorKind, Expect, Scenario};
    pub use crate::world::{default_context, init_logging, Backend, World};
    pub use eql_prepare::QueryContext;
    pub use eql_query::PageRequest;
}
