//! Native client trait for inter-module communication
//!
//! This trait defines the untyped API that other modules use to interact with
//! the settings store. NO HTTP - direct function calls for performance.
//! Typed access (`get_typed`, `subscribe`) lives on the store itself because
//! it is generic over the target type.

use super::{
    error::SettingsError,
    model::{Document, SettingsMap, Snapshot},
};
use async_trait::async_trait;

/// Settings store API for inter-module communication
#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// Get the raw document at `uri`, or an empty object if absent
    async fn get_raw(&self, uri: &str) -> Result<Document, SettingsError>;

    /// Create or overwrite the document at `uri`
    async fn replace(&self, uri: &str, document: Document) -> Result<(), SettingsError>;

    /// Deep-merge `document` into the one at `uri` (arrays replaced wholesale)
    async fn import(&self, uri: &str, document: Document) -> Result<(), SettingsError>;

    /// Merge several documents, one `import` per entry
    async fn import_multiple(&self, documents: SettingsMap) -> Result<(), SettingsError>;

    /// Copy of the whole settings map
    async fn create_backup(&self) -> Result<Snapshot, SettingsError>;

    /// Overlay a snapshot onto the settings map
    async fn restore_backup(&self, snapshot: Snapshot) -> Result<(), SettingsError>;
}
