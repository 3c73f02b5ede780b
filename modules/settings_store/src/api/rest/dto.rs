//! REST DTOs with serde derives for HTTP API
//!
//! Write and read endpoints accept raw JSON and shape-check it in the
//! dispatcher, so these request types mainly document the expected bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Settings DTOs =====

/// Body of `replace` and `import`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WriteSettingsRequest {
    /// Settings uri
    #[schema(example = "ui/theme")]
    pub uri: String,

    /// Settings document
    #[schema(value_type = Object)]
    pub settings: serde_json::Value,
}

/// Body of `get_settings`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetSettingsRequest {
    /// Settings uri
    #[schema(example = "ui/theme")]
    pub uri: String,
}

/// Mapping of uri to settings document, used by `import_multiple`,
/// `restore_backup` and the backup snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct SettingsMapDto(pub serde_json::Map<String, serde_json::Value>);

// ===== Envelope DTOs =====

/// Generic request envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RpcRequest {
    /// Operation name (`replace`, `import`, `import_multiple`, `get_settings`, `restore_backup`)
    #[schema(example = "get_settings")]
    pub operation: String,

    /// Operation payload
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

/// Generic response envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RpcResponse {
    /// Document returned by the operation, `null` when it returns nothing
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
}

// Note: Conversion implementations live in mapper.rs
