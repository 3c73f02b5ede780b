//! Common test utilities: store fixtures and persistence mocks
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use settings_store::infra::storage::InMemorySettingsPersistence;
use settings_store::{ChangeNotifier, SettingsMap, SettingsPersistence, SettingsStore, StoreOptions};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Typed settings used across tests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub name: String,
    pub dark: bool,
    pub font_size: u32,
}

/// Build an initialized store over in-memory persistence
pub async fn memory_store() -> (Arc<SettingsStore>, Arc<InMemorySettingsPersistence>) {
    let persistence = Arc::new(InMemorySettingsPersistence::new());
    let store = store_over(persistence.clone()).await;
    (store, persistence)
}

/// Build an initialized store over the given persistence
pub async fn store_over(persistence: Arc<dyn SettingsPersistence>) -> Arc<SettingsStore> {
    let store = Arc::new(SettingsStore::new(
        persistence,
        Arc::new(ChangeNotifier::new(64)),
        StoreOptions::default(),
    ));
    store.initialize().await.unwrap();
    store
}

/// Persistence that can be switched to fail or stall saves
#[derive(Default)]
pub struct FlakyPersistence {
    inner: InMemorySettingsPersistence,
    failing: AtomicBool,
    stalled: AtomicBool,
    attempts: AtomicUsize,
    successes_left: Mutex<Option<usize>>,
    last_saved: Mutex<Option<SettingsMap>>,
}

impl FlakyPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Let the next `successes` saves through, then fail every later one
    pub fn fail_after(&self, successes: usize) {
        *self.successes_left.lock() = Some(successes);
    }

    /// Make saves hang until the caller gives up on them
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    /// Save attempts, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Map passed to the last successful save
    pub fn last_saved(&self) -> Option<SettingsMap> {
        self.last_saved.lock().clone()
    }
}

#[async_trait]
impl SettingsPersistence for FlakyPersistence {
    async fn save(&self, name: &str, settings: &SettingsMap) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        if let Some(left) = self.successes_left.lock().as_mut() {
            if *left == 0 {
                anyhow::bail!("disk full");
            }
            *left -= 1;
        }
        self.inner.save(name, settings).await?;
        *self.last_saved.lock() = Some(settings.clone());
        Ok(())
    }

    async fn try_load(&self, name: &str) -> anyhow::Result<Option<SettingsMap>> {
        self.inner.try_load(name).await
    }
}
