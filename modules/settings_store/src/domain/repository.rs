//! Persistence port for the settings map
//!
//! The store persists its whole map as one named blob. Implementations are in
//! infra/storage.

use crate::contract::SettingsMap;
use anyhow::Result;
use async_trait::async_trait;

/// Durable storage of the settings map
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    /// Write the entire map under `name`, replacing any previous blob
    async fn save(&self, name: &str, settings: &SettingsMap) -> Result<()>;

    /// Read the map stored under `name`.
    ///
    /// Returns `Ok(None)` when nothing was ever saved (first run).
    async fn try_load(&self, name: &str) -> Result<Option<SettingsMap>>;
}
