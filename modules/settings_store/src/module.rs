//! Module declaration and lifecycle implementation
//!
//! Builds the persistence backend selected by [`Config`], constructs and
//! initializes the store, and exposes it to the host: native client, REST
//! routes and backup registration.

use crate::api::native::NativeClient;
use crate::config::{Config, StorageConfig};
use crate::contract::SettingsApi;
use crate::domain::{
    BackupRegistry, ChangeNotifier, SettingsPersistence, SettingsStore, StoreOptions,
};
use crate::infra::storage::{
    FileSettingsPersistence, InMemorySettingsPersistence, SeaOrmSettingsPersistence,
};
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Settings store module
pub struct SettingsStoreModule {
    config: RwLock<Config>,
    store: RwLock<Option<Arc<SettingsStore>>>,
}

impl Default for SettingsStoreModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            store: RwLock::new(None),
        }
    }
}

impl SettingsStoreModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and initialize the store from `cfg`
    pub async fn init(&self, cfg: Config) -> Result<()> {
        let persistence = build_persistence(&cfg.storage).await?;
        let notifier = Arc::new(ChangeNotifier::new(cfg.notification_capacity));
        let options = StoreOptions {
            blob_name: cfg.blob_name.clone(),
            backup_section: cfg.backup_section.clone(),
        };

        let store = Arc::new(SettingsStore::new(persistence, notifier, options));
        store.initialize().await?;

        *self.config.write() = cfg;
        *self.store.write() = Some(store);

        tracing::info!("Settings store module initialized");
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// The initialized store
    pub fn store(&self) -> Result<Arc<SettingsStore>> {
        self.store
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Settings store not initialized"))
    }

    /// Native client for in-process callers
    pub fn client(&self) -> Result<Arc<dyn SettingsApi>> {
        Ok(Arc::new(NativeClient::new(self.store()?)))
    }

    /// Register the store's backup hooks with the orchestrator's registry
    pub fn register_backup(&self, registry: &mut BackupRegistry) -> Result<()> {
        registry.register(self.store()?)?;
        Ok(())
    }

    /// Add the settings REST routes to `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let store = self.store()?;
        tracing::info!("Registering settings store REST routes");
        Ok(crate::api::rest::register_routes(router, store))
    }
}

async fn build_persistence(storage: &StorageConfig) -> Result<Arc<dyn SettingsPersistence>> {
    let persistence: Arc<dyn SettingsPersistence> = match storage {
        StorageConfig::File { dir } => {
            tracing::info!(dir = %dir.display(), "Using file settings persistence");
            Arc::new(FileSettingsPersistence::new(dir.clone()))
        }
        StorageConfig::Database { url } => {
            tracing::info!("Using database settings persistence");
            Arc::new(SeaOrmSettingsPersistence::connect(url).await?)
        }
        StorageConfig::Memory => {
            tracing::warn!(
                "Using in-memory settings persistence, settings will not survive a restart"
            );
            Arc::new(InMemorySettingsPersistence::new())
        }
    };
    Ok(persistence)
}
