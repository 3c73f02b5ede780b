//! Contract error types for the settings store
//!
//! These errors are transport-agnostic and used for inter-module communication.

use serde_json::Value;

/// Settings store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required identifier is missing or empty
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Request payload has the wrong JSON shape
    #[error("Unsupported request shape for '{operation}': expected {expected}, found {found}")]
    UnsupportedRequestShape {
        /// Operation being requested
        operation: String,
        /// Expected JSON kind
        expected: String,
        /// JSON kind actually received
        found: String,
    },

    /// Stored document cannot be materialized as the requested type
    #[error("Cannot convert settings '{uri}' to {target}: {message}")]
    Conversion {
        /// Uri of the document
        uri: String,
        /// Requested Rust type
        target: String,
        /// Deserializer message
        message: String,
    },

    /// Operation name not known to the request dispatcher
    #[error("Unknown settings operation: {operation}")]
    UnknownOperation {
        /// Requested operation name
        operation: String,
    },

    /// Persisting or loading the settings blob failed
    #[error("Settings persistence failed: {message}")]
    Persistence {
        /// Underlying storage error
        message: String,
    },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl SettingsError {
    pub(crate) fn unsupported_shape(operation: &str, expected: &str, found: &Value) -> Self {
        Self::UnsupportedRequestShape {
            operation: operation.to_string(),
            expected: expected.to_string(),
            found: json_kind(found).to_string(),
        }
    }

    pub(crate) fn persistence(error: &anyhow::Error) -> Self {
        Self::Persistence {
            message: format!("{error:#}"),
        }
    }
}

/// Name of the JSON kind of a value, for error messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
