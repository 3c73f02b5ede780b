//! Process-local persistence, for the `memory` backend and tests

use crate::contract::SettingsMap;
use crate::domain::repository::SettingsPersistence;
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps blobs as serialized JSON in memory
#[derive(Default)]
pub struct InMemorySettingsPersistence {
    blobs: RwLock<HashMap<String, String>>,
    saves: AtomicUsize,
}

impl InMemorySettingsPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsPersistence for InMemorySettingsPersistence {
    async fn save(&self, name: &str, settings: &SettingsMap) -> Result<()> {
        let text = serde_json::to_string(settings)?;
        self.blobs.write().insert(name.to_string(), text);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn try_load(&self, name: &str) -> Result<Option<SettingsMap>> {
        let text = self.blobs.read().get(name).cloned();
        text.map(|text| serde_json::from_str::<SettingsMap>(&text).map_err(anyhow::Error::from))
            .transpose()
    }
}
