//! Backup port
//!
//! A backup envelope is an opaque JSON object owned by the backup
//! orchestrator. Each participant writes its state into one named section
//! and reads it back from the same section on restore.

use super::store::SettingsStore;
use crate::contract::{Document, SettingsError, SettingsMap};
use async_trait::async_trait;
use std::sync::Arc;

/// Backup document assembled from all participants' sections
pub type BackupEnvelope = serde_json::Map<String, Document>;

/// Component taking part in backup and restore
#[async_trait]
pub trait BackupParticipant: Send + Sync {
    /// Envelope field this participant owns
    fn section(&self) -> &str;

    /// Write this participant's state into `envelope`
    async fn contribute(&self, envelope: &mut BackupEnvelope) -> Result<(), SettingsError>;

    /// Absorb this participant's state from `envelope`.
    ///
    /// A missing section is a no-op.
    async fn restore(&self, envelope: &BackupEnvelope) -> Result<(), SettingsError>;
}

#[async_trait]
impl BackupParticipant for SettingsStore {
    fn section(&self) -> &str {
        &self.options().backup_section
    }

    async fn contribute(&self, envelope: &mut BackupEnvelope) -> Result<(), SettingsError> {
        let snapshot = self.create_backup().await;
        tracing::info!(
            section = %self.section(),
            count = snapshot.len(),
            "Contributing settings to backup"
        );
        envelope.insert(self.section().to_string(), snapshot.to_document());
        Ok(())
    }

    async fn restore(&self, envelope: &BackupEnvelope) -> Result<(), SettingsError> {
        let Some(section) = envelope.get(self.section()) else {
            tracing::debug!(section = %self.section(), "Backup has no settings section, skipping");
            return Ok(());
        };

        let snapshot = SettingsMap::from_document("restore_backup", section.clone())?;
        self.restore_backup(snapshot).await
    }
}

/// Participants an orchestrator drives through backup and restore
#[derive(Default)]
pub struct BackupRegistry {
    participants: Vec<Arc<dyn BackupParticipant>>,
}

impl BackupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant; sections must be unique
    pub fn register(
        &mut self,
        participant: Arc<dyn BackupParticipant>,
    ) -> Result<(), SettingsError> {
        if self
            .participants
            .iter()
            .any(|p| p.section() == participant.section())
        {
            return Err(SettingsError::InvalidArgument {
                name: "section".to_string(),
                reason: format!("backup section '{}' already registered", participant.section()),
            });
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Collect every participant's section into a new envelope
    pub async fn create_backup(&self) -> Result<BackupEnvelope, SettingsError> {
        let mut envelope = BackupEnvelope::new();
        for participant in &self.participants {
            participant.contribute(&mut envelope).await?;
        }
        Ok(envelope)
    }

    /// Hand `envelope` to every participant in registration order
    pub async fn restore_backup(&self, envelope: &BackupEnvelope) -> Result<(), SettingsError> {
        for participant in &self.participants {
            participant.restore(envelope).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::ChangeNotifier;
    use crate::domain::store::StoreOptions;
    use crate::infra::storage::InMemorySettingsPersistence;
    use serde_json::json;

    fn store(section: &str) -> Arc<SettingsStore> {
        Arc::new(SettingsStore::new(
            Arc::new(InMemorySettingsPersistence::new()),
            Arc::new(ChangeNotifier::default()),
            StoreOptions {
                backup_section: section.to_string(),
                ..StoreOptions::default()
            },
        ))
    }

    #[tokio::test]
    async fn test_contribute_writes_named_section() {
        let store = store("settings");
        store.replace("a", json!({"x": 1})).await.unwrap();

        let mut envelope = BackupEnvelope::new();
        envelope.insert("other".to_string(), json!("untouched"));
        store.contribute(&mut envelope).await.unwrap();

        assert_eq!(envelope.get("settings"), Some(&json!({"a": {"x": 1}})));
        assert_eq!(envelope.get("other"), Some(&json!("untouched")));
    }

    #[tokio::test]
    async fn test_restore_without_section_is_noop() {
        let store = store("settings");
        store.replace("a", json!({"x": 1})).await.unwrap();

        store.restore(&BackupEnvelope::new()).await.unwrap();
        assert_eq!(store.get_raw("a").await.unwrap(), json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_restore_non_object_section_is_shape_error() {
        let store = store("settings");
        let mut envelope = BackupEnvelope::new();
        envelope.insert("settings".to_string(), json!([1, 2]));

        assert!(matches!(
            store.restore(&envelope).await,
            Err(SettingsError::UnsupportedRequestShape { .. })
        ));
    }

    #[tokio::test]
    async fn test_registry_rejects_duplicate_sections() {
        let mut registry = BackupRegistry::new();
        registry.register(store("settings")).unwrap();
        assert!(registry.register(store("settings")).is_err());
        registry.register(store("profiles")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_registry_round_trip() {
        let source = store("settings");
        source.replace("ui/theme", json!({"dark": true})).await.unwrap();

        let mut registry = BackupRegistry::new();
        registry.register(source).unwrap();
        let envelope = registry.create_backup().await.unwrap();

        let target = store("settings");
        let mut restore = BackupRegistry::new();
        restore.register(target.clone()).unwrap();
        restore.restore_backup(&envelope).await.unwrap();

        assert_eq!(target.get_raw("ui/theme").await.unwrap(), json!({"dark": true}));
    }
}
