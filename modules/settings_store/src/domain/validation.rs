//! Argument and request-shape validation
//!
//! Every check here runs before the store takes its lock, so a rejected call
//! never touches state.

use crate::contract::{error::json_kind, Document, SettingsError, SettingsUri};
use serde_json::{Map, Value};

/// Parse a uri argument; empty identifiers are `InvalidArgument`
pub fn validate_uri(uri: &str) -> Result<SettingsUri, SettingsError> {
    SettingsUri::new(uri)
}

/// Require `payload` to be a JSON object
pub fn require_object(
    operation: &str,
    payload: Document,
) -> Result<Map<String, Value>, SettingsError> {
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(SettingsError::unsupported_shape(operation, "object", &other)),
    }
}

/// Extract the `uri` field of a request object.
///
/// A missing or `null` uri is `InvalidArgument`; a uri of any other
/// non-string kind is `UnsupportedRequestShape`.
pub fn require_uri_field(
    operation: &str,
    request: &Map<String, Value>,
) -> Result<SettingsUri, SettingsError> {
    match request.get("uri") {
        None | Some(Value::Null) => Err(SettingsError::InvalidArgument {
            name: "uri".to_string(),
            reason: "uri is required".to_string(),
        }),
        Some(Value::String(uri)) => validate_uri(uri),
        Some(other) => Err(SettingsError::UnsupportedRequestShape {
            operation: operation.to_string(),
            expected: "string uri".to_string(),
            found: json_kind(other).to_string(),
        }),
    }
}

/// Extract the `settings` field of a request object, which must be an object
pub fn require_settings_field(
    operation: &str,
    request: &mut Map<String, Value>,
) -> Result<Document, SettingsError> {
    match request.remove("settings") {
        Some(settings @ Value::Object(_)) => Ok(settings),
        Some(other) => Err(SettingsError::unsupported_shape(operation, "settings object", &other)),
        None => Err(SettingsError::unsupported_shape(operation, "settings object", &Value::Null)),
    }
}
