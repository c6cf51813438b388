//! EQL Query Execution
//!
//! Run Prepared Queries against a backend.
//!
//! Responsibilities:
//! - The executor contract (`QueryExecutor`) with paging
//! - Criteria executor: relational criteria with joins and EXISTS sub-selects
//! - Predicate executor: typed path handles building a boolean expression
//! - Collection executor: direct evaluation over in-memory instances
//! - Executor binding from repository capabilities
//! - Associated queries scoped to an owning entity

mod associated;
pub mod criteria;
mod collection;
mod error;
mod executor;
mod memory;
mod page;
pub mod predicate;

pub use associated::AssociatedQueryExecutor;
pub use collection::{CollectionExecutor, CollectionRepository};
pub use error::{QueryError, QueryResult};
pub use executor::{EntityBinding, QueryExecutor, Repository};
pub use memory::InMemoryRepository;
pub use page::{Page, PageRequest};
