//! EQL REPL library - query a JSON dataset with EQL.
//!
//! - `dataset`: the JSON dataset format and its loading into a registry
//! - `record`: dataset records as queryable entities
//! - `repl`: REPL state and command execution
//! - `format`: output formatting utilities

mod dataset;
mod error;
mod format;
mod record;
mod repl;

pub use dataset::{Dataset, DatasetFile, EntityDecl, PropertyDecl, TranslatorDecl, TypeDecl};
pub use error::{ReplError, ReplResult};
pub use format::{format_record, format_type, format_value, print_help};
pub use record::Record;
pub use repl::Repl;
