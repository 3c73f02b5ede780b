//! Native client implementation - wraps the store for in-process calls

use crate::contract::{Document, SettingsApi, SettingsError, SettingsMap, Snapshot};
use crate::domain::SettingsStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the settings store
///
/// This client is used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    store: Arc<SettingsStore>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsApi for NativeClient {
    async fn get_raw(&self, uri: &str) -> Result<Document, SettingsError> {
        self.store.get_raw(uri).await
    }

    async fn replace(&self, uri: &str, document: Document) -> Result<(), SettingsError> {
        self.store.replace(uri, document).await
    }

    async fn import(&self, uri: &str, document: Document) -> Result<(), SettingsError> {
        self.store.import_merge(uri, document).await
    }

    async fn import_multiple(&self, documents: SettingsMap) -> Result<(), SettingsError> {
        self.store.import_multiple(documents).await
    }

    async fn create_backup(&self) -> Result<Snapshot, SettingsError> {
        Ok(self.store.create_backup().await)
    }

    async fn restore_backup(&self, snapshot: Snapshot) -> Result<(), SettingsError> {
        self.store.restore_backup(snapshot).await
    }
}
