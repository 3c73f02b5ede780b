//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::api::dispatch::{SettingsRequest, SettingsResponse};
use crate::contract::SettingsMap;

// ===== Envelope conversions =====

impl From<RpcRequest> for SettingsRequest {
    fn from(req: RpcRequest) -> Self {
        Self {
            operation: req.operation,
            payload: req.payload,
        }
    }
}

impl From<SettingsResponse> for RpcResponse {
    fn from(response: SettingsResponse) -> Self {
        match response {
            SettingsResponse::Document(document) => Self { result: document },
            SettingsResponse::Completed => Self {
                result: serde_json::Value::Null,
            },
        }
    }
}

// ===== Settings map conversions =====

impl From<SettingsMap> for SettingsMapDto {
    fn from(map: SettingsMap) -> Self {
        match map.to_document() {
            serde_json::Value::Object(entries) => Self(entries),
            _ => Self(serde_json::Map::new()),
        }
    }
}
