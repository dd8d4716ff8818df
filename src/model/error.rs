//! Error types for the model module
//!
//! Construction and wiring failures are precondition violations and fail
//! fast with a typed error; lookup misses during inheritance resolution are
//! plain `None`s and never surface here.

use thiserror::Error;

/// Main error type for model construction and persistence
#[derive(Error, Debug)]
pub enum ModelError {
    /// A reference was registered with an empty id
    #[error("reference id must not be empty (name: '{name}')")]
    EmptyId { name: String },

    /// A reference was registered with an id that is already taken
    #[error("duplicate reference id '{id}'")]
    DuplicateId { id: String },

    /// A relation names an id that is not in the model
    #[error("unknown reference id '{id}' ({context})")]
    UnknownReference { id: String, context: String },

    /// Generic parameter and argument lists disagree in length
    #[error("generic arity mismatch on '{id}': {parameters} parameter(s) vs {arguments} argument(s)")]
    GenericArity {
        id: String,
        parameters: usize,
        arguments: usize,
    },

    /// A composed type shape names itself as its own element or definition
    #[error("type shape of '{id}' refers to itself")]
    ShapeCycle { id: String },

    /// A manifest or snapshot was written by an incompatible version
    #[error("{kind} version {found} is not supported (expected {expected})")]
    Version {
        kind: &'static str,
        found: u32,
        expected: u32,
    },

    /// IO errors (reading manifests, writing snapshots)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing/serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::Io {
            message: "IO operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json {
            message: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Helper trait for converting IO errors with context
pub trait IoContext<T> {
    fn with_io_context(self, message: &str) -> ModelResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_io_context(self, message: &str) -> ModelResult<T> {
        self.map_err(|e| ModelError::Io {
            message: message.to_string(),
            source: e,
        })
    }
}

/// Helper trait for converting JSON errors with context
pub trait JsonContext<T> {
    fn with_json_context(self, message: &str) -> ModelResult<T>;
}

impl<T> JsonContext<T> for Result<T, serde_json::Error> {
    fn with_json_context(self, message: &str) -> ModelResult<T> {
        self.map_err(|e| ModelError::Json {
            message: message.to_string(),
            source: e,
        })
    }
}
