//! Settings Store Module
//!
//! Centralized, in-process settings store. Holds structured JSON documents
//! keyed by a case-insensitive uri, persists the whole map on every
//! mutation, notifies subscribers of changes and takes part in backup and
//! restore.

// Public exports
pub mod contract;
pub use contract::{
    client::SettingsApi, error::SettingsError, Document, SettingsMap, SettingsUri, Snapshot,
};

pub mod domain;
pub use domain::{
    AreaRegistry, BackupEnvelope, BackupParticipant, BackupRegistry, ChangeNotifier,
    SettingsArea, SettingsChanged, SettingsPersistence, SettingsStore, SettingsType, StoreOptions,
};

pub mod module;
pub use module::SettingsStoreModule;

pub mod config;
pub use config::{Config, StorageConfig};

pub mod api;
pub mod infra;
