//! Generic request envelope adapter
//!
//! Turns an operation name plus an untyped JSON payload into a typed store
//! call. All shape checks happen here, before the store is touched, so a
//! malformed request never applies anything.

use crate::contract::{entries_from_document, Document, SettingsError, SettingsMap};
use crate::domain::validation::{require_object, require_settings_field, require_uri_field};
use crate::domain::SettingsStore;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Operations addressable through the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOperation {
    /// `{uri, settings}` - overwrite the document
    Replace,
    /// `{uri, settings}` - merge-or-create the document
    Import,
    /// `{uri: document, ...}` - import per entry
    ImportMultiple,
    /// `{uri}` - read the raw document
    GetSettings,
    /// `{uri: document, ...}` - overlay a snapshot
    RestoreBackup,
}

impl SettingsOperation {
    pub const ALL: [SettingsOperation; 5] = [
        SettingsOperation::Replace,
        SettingsOperation::Import,
        SettingsOperation::ImportMultiple,
        SettingsOperation::GetSettings,
        SettingsOperation::RestoreBackup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingsOperation::Replace => "replace",
            SettingsOperation::Import => "import",
            SettingsOperation::ImportMultiple => "import_multiple",
            SettingsOperation::GetSettings => "get_settings",
            SettingsOperation::RestoreBackup => "restore_backup",
        }
    }
}

impl fmt::Display for SettingsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsOperation {
    type Err = SettingsError;

    /// Accepts snake_case or kebab-case names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| SettingsError::UnknownOperation {
                operation: s.to_string(),
            })
    }
}

/// Inbound envelope: operation name plus untyped payload
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsRequest {
    pub operation: String,
    #[serde(default)]
    pub payload: Document,
}

/// Result of a dispatched operation
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsResponse {
    /// Operation returned a document
    Document(Document),
    /// Operation completed without a result
    Completed,
}

/// Dispatch an envelope by operation name
pub async fn dispatch_request(
    store: &SettingsStore,
    request: SettingsRequest,
) -> Result<SettingsResponse, SettingsError> {
    let operation = request.operation.parse()?;
    dispatch(store, operation, request.payload).await
}

/// Shape-check `payload` for `operation` and run it against the store
pub async fn dispatch(
    store: &SettingsStore,
    operation: SettingsOperation,
    payload: Document,
) -> Result<SettingsResponse, SettingsError> {
    let name = operation.name();
    tracing::debug!(operation = name, "Dispatching settings request");

    match operation {
        SettingsOperation::Replace | SettingsOperation::Import => {
            let mut request = require_object(name, payload)?;
            let uri = require_uri_field(name, &request)?;
            let settings = require_settings_field(name, &mut request)?;

            if operation == SettingsOperation::Replace {
                store.replace(uri.as_str(), settings).await?;
            } else {
                store.import_merge(uri.as_str(), settings).await?;
            }
            Ok(SettingsResponse::Completed)
        }
        SettingsOperation::ImportMultiple => {
            let documents = entries_from_document(name, payload)?;
            store.import_multiple(documents).await?;
            Ok(SettingsResponse::Completed)
        }
        SettingsOperation::GetSettings => {
            let request = require_object(name, payload)?;
            let uri = require_uri_field(name, &request)?;
            Ok(SettingsResponse::Document(store.get_raw(uri.as_str()).await?))
        }
        SettingsOperation::RestoreBackup => {
            let snapshot = SettingsMap::from_document(name, payload)?;
            store.restore_backup(snapshot).await?;
            Ok(SettingsResponse::Completed)
        }
    }
}
