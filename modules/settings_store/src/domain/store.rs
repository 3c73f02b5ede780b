//! Settings store - authoritative owner of the settings map
//!
//! One coarse lock guards the in-memory map together with every persistence
//! write a mutation triggers, so the persisted blob and the map never
//! diverge. A mutation is written from a copy of the map and installed only
//! once the write succeeds, so a failed or cancelled write changes nothing.
//! Change notifications are delivered only after the lock is released.

use super::area::{AreaRegistry, SettingsArea};
use super::events::{ChangeNotifier, SettingsChanged};
use super::merge::merge_documents;
use super::repository::SettingsPersistence;
use super::typed::SettingsType;
use super::validation::validate_uri;
use crate::contract::{Document, SettingsError, SettingsMap, SettingsUri, Snapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Default persistence blob name
pub const DEFAULT_BLOB_NAME: &str = "settings";

/// Default backup envelope section
pub const DEFAULT_BACKUP_SECTION: &str = "settings";

/// Store naming options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Name of the persisted blob holding the whole map
    pub blob_name: String,
    /// Field of the backup envelope holding the snapshot
    pub backup_section: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            blob_name: DEFAULT_BLOB_NAME.to_string(),
            backup_section: DEFAULT_BACKUP_SECTION.to_string(),
        }
    }
}

/// In-process settings store
pub struct SettingsStore {
    persistence: Arc<dyn SettingsPersistence>,
    notifier: Arc<ChangeNotifier>,
    options: StoreOptions,
    settings: Mutex<SettingsMap>,
    initialized: AtomicBool,
}

impl SettingsStore {
    /// Create a store with an empty map. Call [`initialize`](Self::initialize)
    /// before first use to load the persisted state.
    pub fn new(
        persistence: Arc<dyn SettingsPersistence>,
        notifier: Arc<ChangeNotifier>,
        options: StoreOptions,
    ) -> Self {
        Self {
            persistence,
            notifier,
            options,
            settings: Mutex::new(SettingsMap::new()),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Load the persisted map and overlay it onto the in-memory one.
    ///
    /// Runs once; later calls are ignored.
    pub async fn initialize(&self) -> Result<(), SettingsError> {
        let mut settings = self.settings.lock().await;
        if self.initialized.load(Ordering::SeqCst) {
            tracing::warn!("Settings store already initialized, ignoring");
            return Ok(());
        }

        let loaded = self
            .persistence
            .try_load(&self.options.blob_name)
            .await
            .map_err(|e| {
                tracing::error!(
                    blob = %self.options.blob_name,
                    error = %e,
                    "Failed to load settings"
                );
                SettingsError::persistence(&e)
            })?;

        match loaded {
            Some(loaded) => {
                let count = loaded.len();
                for (uri, document) in loaded {
                    settings.insert(uri, document);
                }
                tracing::info!(blob = %self.options.blob_name, count, "Settings loaded");
            }
            None => {
                tracing::info!(
                    blob = %self.options.blob_name,
                    "No persisted settings, starting empty"
                );
            }
        }

        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    // ===== Read Operations =====

    /// Materialize the document at `uri` as `T`.
    ///
    /// A uri that was never written gets `T::default()`, which is stored and
    /// persisted before it is returned. No notification is sent for it.
    pub async fn get_typed<T: SettingsType>(&self, uri: &str) -> Result<T, SettingsError> {
        let uri = validate_uri(uri)?;
        let mut settings = self.settings.lock().await;
        self.materialize(&mut settings, uri).await
    }

    /// Typed document for a registered area
    pub async fn get_area<A, T>(
        &self,
        registry: &AreaRegistry<A>,
        area: A,
    ) -> Result<T, SettingsError>
    where
        A: SettingsArea,
        T: SettingsType,
    {
        let uri = registry.create_area(area);
        let mut settings = self.settings.lock().await;
        self.materialize(&mut settings, uri).await
    }

    /// Raw document at `uri`, or an empty object if absent. Never mutates.
    pub async fn get_raw(&self, uri: &str) -> Result<Document, SettingsError> {
        let uri = validate_uri(uri)?;
        let settings = self.settings.lock().await;
        Ok(settings
            .get(&uri)
            .cloned()
            .unwrap_or_else(|| Document::Object(serde_json::Map::new())))
    }

    // ===== Mutations =====

    /// Create or overwrite the document at `uri`
    pub async fn replace(&self, uri: &str, document: Document) -> Result<(), SettingsError> {
        let uri = validate_uri(uri)?;
        let settings = self.settings.lock().await;
        tracing::debug!(%uri, "Replacing settings");

        self.mutate(settings, vec![(uri, document)]).await
    }

    /// Deep-merge `document` into the document at `uri`.
    ///
    /// Arrays in `document` replace existing arrays wholesale. When nothing is
    /// stored at `uri` this behaves like [`replace`](Self::replace).
    pub async fn import_merge(&self, uri: &str, document: Document) -> Result<(), SettingsError> {
        let uri = validate_uri(uri)?;
        self.import_uri(uri, document).await
    }

    /// Merge several documents, one [`import_merge`](Self::import_merge) per
    /// entry, in iteration order.
    ///
    /// Each entry is persisted and notified on its own, so entries naming the
    /// same uri in different spellings are merged one after the other.
    /// Processing stops at the first failing entry; entries applied before it
    /// stay applied.
    pub async fn import_multiple<I>(&self, documents: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = (SettingsUri, Document)>,
        I::IntoIter: Send,
    {
        for (uri, document) in documents {
            self.import_uri(uri, document).await?;
        }
        Ok(())
    }

    /// Invoke `callback` with the current value at `uri` now, and again with
    /// the new value after every later change of that uri.
    ///
    /// Callbacks run outside the store lock, in mutation order. They must not
    /// block on the store; spawn a task to call back into it. There is no
    /// unsubscribe: the subscription lives as long as the store.
    pub async fn subscribe<T, F>(&self, uri: &str, callback: F) -> Result<(), SettingsError>
    where
        T: SettingsType,
        F: Fn(T) + Send + Sync + 'static,
    {
        let uri = validate_uri(uri)?;
        let callback = Arc::new(callback);

        let mut settings = self.settings.lock().await;
        // Deliver the initial value before any later change of this uri
        let ticket = self.notifier.reserve().await;
        let initial: T = self.materialize(&mut settings, uri.clone()).await?;

        let handler = callback.clone();
        self.notifier.register(
            uri.clone(),
            Arc::new(move |event: &SettingsChanged| {
                match T::from_document(&event.uri, &event.document) {
                    Ok(value) => handler(value),
                    Err(e) => {
                        tracing::warn!(
                            uri = %event.uri,
                            error = %e,
                            "Skipping settings change for subscriber"
                        );
                    }
                }
            }),
        );
        tracing::debug!(%uri, "Settings subscriber registered");

        drop(settings);
        callback(initial);
        drop(ticket);
        Ok(())
    }

    // ===== Backup =====

    /// Copy of the whole map, taken under the store lock
    pub async fn create_backup(&self) -> Snapshot {
        self.settings.lock().await.clone()
    }

    /// Overlay `snapshot` onto the map.
    ///
    /// Every snapshot entry overwrites its uri; uris absent from the snapshot
    /// are left untouched. The map is persisted once, then one notification
    /// per restored uri is sent. An empty snapshot is a no-op.
    pub async fn restore_backup(&self, snapshot: Snapshot) -> Result<(), SettingsError> {
        if snapshot.is_empty() {
            tracing::debug!("Empty settings snapshot, nothing to restore");
            return Ok(());
        }

        let settings = self.settings.lock().await;
        let count = snapshot.len();
        self.mutate(settings, snapshot.into_iter().collect()).await?;
        tracing::info!(count, "Settings restored from backup");
        Ok(())
    }

    // ===== Helper Methods =====

    async fn import_uri(&self, uri: SettingsUri, document: Document) -> Result<(), SettingsError> {
        let settings = self.settings.lock().await;

        let merged = match settings.get(&uri) {
            Some(existing) => {
                let mut merged = existing.clone();
                merge_documents(&mut merged, document);
                merged
            }
            None => document,
        };
        tracing::debug!(%uri, "Importing settings");

        self.mutate(settings, vec![(uri, merged)]).await
    }

    async fn materialize<T: SettingsType>(
        &self,
        settings: &mut SettingsMap,
        uri: SettingsUri,
    ) -> Result<T, SettingsError> {
        if let Some(document) = settings.get(&uri) {
            return T::from_document(&uri, document);
        }

        let value = T::default();
        let document = value.to_document(&uri)?;
        tracing::debug!(%uri, "Materializing default settings");
        self.commit(settings, vec![(uri, document)]).await?;
        Ok(value)
    }

    /// Commit `changes`, release the lock and notify subscribers.
    ///
    /// The delivery slot is taken before the write, so nothing after a
    /// successful write can be cancelled.
    async fn mutate(
        &self,
        mut settings: MutexGuard<'_, SettingsMap>,
        changes: Vec<(SettingsUri, Document)>,
    ) -> Result<(), SettingsError> {
        let ticket = self.notifier.reserve().await;
        let changed = self.commit(&mut settings, changes).await?;

        let events: Vec<SettingsChanged> = changed
            .into_iter()
            .map(|uri| {
                let document = settings.get(&uri).cloned().unwrap_or_default();
                SettingsChanged::new(uri, document)
            })
            .collect();

        drop(settings);
        ticket.deliver(&events);
        Ok(())
    }

    /// Persist `settings` with `changes` applied, then install the result.
    ///
    /// The live map is only touched once the write has succeeded, so a failed
    /// or dropped write leaves it exactly as it was.
    async fn commit(
        &self,
        settings: &mut SettingsMap,
        changes: Vec<(SettingsUri, Document)>,
    ) -> Result<Vec<SettingsUri>, SettingsError> {
        let mut next = settings.clone();
        let mut changed = Vec::with_capacity(changes.len());
        for (uri, document) in changes {
            next.insert(uri.clone(), document);
            changed.push(uri);
        }

        if let Err(e) = self.persistence.save(&self.options.blob_name, &next).await {
            tracing::error!(
                blob = %self.options.blob_name,
                error = %e,
                "Failed to persist settings"
            );
            return Err(SettingsError::persistence(&e));
        }

        *settings = next;
        Ok(changed)
    }
}
