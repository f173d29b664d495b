//! Shared error types for metamodel construction.
//!
//! Build failures (a specification cannot be constructed at all) are expressed
//! through this module and propagate as `Err`. Semantic problems in a model
//! that *did* build are never errors here; they accumulate into a
//! [`crate::validation::ValidationReport`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for metamodel build operations
#[derive(Debug, Error)]
pub enum BuildError {
    /// A class name was referenced but never declared
    #[error("unknown class '{name}'{}", referenced_from.as_ref().map(|r| format!(" (referenced from '{r}')")).unwrap_or_default())]
    UnknownClass {
        name: String,
        referenced_from: Option<String>,
    },

    /// The same class name was declared twice in one registry
    #[error("class '{0}' is already declared")]
    DuplicateClass(String),

    /// Registration attempted after the programming model was frozen
    #[error("programming model is frozen; cannot register '{0}'")]
    RegistryFrozen(String),

    /// A lookup or load attempted to grow the metamodel after freeze
    #[error("metamodel context is frozen; cannot introspect '{0}'")]
    ContextFrozen(String),

    /// Introspection of a class failed in a way that is fatal to that class
    #[error("introspection of '{class}' failed: {message}")]
    Introspection { class: String, message: String },

    /// A previous build of this specification failed; the failure is cached
    /// and not retried
    #[error("specification for '{class}' previously failed to build: {message}")]
    FailedSpecification { class: String, message: String },

    /// Model file errors (missing file, unsupported extension)
    #[error("model file error: {message}")]
    ModelFile {
        message: String,
        path: Option<PathBuf>,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl BuildError {
    /// Create an introspection error for a class
    pub fn introspection(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Introspection {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Create a model file error with path context
    pub fn model_file(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ModelFile {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Short message without the class prefix, used when caching a failure
    pub fn brief(&self) -> String {
        match self {
            Self::Introspection { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, BuildError>;
