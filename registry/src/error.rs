//! Registry error types.

use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("Duplicate entity type: {0}")]
    DuplicateEntity(String),

    #[error("Duplicate property '{property}' on entity type {entity}")]
    DuplicateProperty { entity: String, property: String },

    #[error("Entity type {0} declares no id property")]
    MissingId(String),

    #[error("Property '{property}' on {entity} refers to unknown entity type {target}")]
    UnknownTarget {
        entity: String,
        property: String,
        target: String,
    },
}

/// Errors raised while resolving a property path.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Unknown property '{property}' on {entity} (in path '{path}')")]
    UnknownProperty {
        entity: String,
        property: String,
        path: String,
    },

    #[error("Invalid property path '{path}': {message}")]
    InvalidPath { path: String, message: String },
}

impl ResolveError {
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by condition translators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Cannot translate '{condition}': {message}")]
    Unsupported { condition: String, message: String },
}
