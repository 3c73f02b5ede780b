//! Configuration for the settings store module

use crate::domain::store::{DEFAULT_BACKUP_SECTION, DEFAULT_BLOB_NAME};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `SETTINGS_STORE_BLOB_NAME`
pub const ENV_PREFIX: &str = "SETTINGS_STORE_";

/// Settings store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the settings blob is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Name of the persisted blob holding the whole settings map
    #[serde(default = "default_blob_name")]
    pub blob_name: String,

    /// Backup envelope field holding the settings snapshot
    #[serde(default = "default_backup_section")]
    pub backup_section: String,

    /// Events buffered per change stream receiver
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

/// Persistence backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// JSON files in a directory
    File {
        #[serde(default = "default_data_dir")]
        dir: PathBuf,
    },
    /// SeaORM database (e.g. `sqlite://settings.db?mode=rwc`)
    Database { url: String },
    /// Process memory only, nothing survives a restart
    Memory,
}

impl StorageConfig {
    /// Backend name, safe to log (no paths or credentials)
    pub fn kind(&self) -> &'static str {
        match self {
            StorageConfig::File { .. } => "file",
            StorageConfig::Database { .. } => "database",
            StorageConfig::Memory => "memory",
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            dir: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            blob_name: default_blob_name(),
            backup_section: default_backup_section(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the optional YAML file, then
    /// `SETTINGS_STORE_*` environment variables (`__` separates nested keys)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("loading settings store configuration")
    }
}

fn default_blob_name() -> String {
    DEFAULT_BLOB_NAME.to_string()
}

fn default_backup_section() -> String {
    DEFAULT_BACKUP_SECTION.to_string()
}

fn default_notification_capacity() -> usize {
    256
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.blob_name, "settings");
        assert_eq!(cfg.backup_section, "settings");
        assert_eq!(cfg.notification_capacity, 256);
        assert_eq!(
            cfg.storage,
            StorageConfig::File {
                dir: PathBuf::from("./data")
            }
        );
    }

    #[test]
    fn test_load_yaml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "settings.yaml",
                r#"
storage:
  kind: database
  url: "sqlite://settings.db?mode=rwc"
blob_name: app
"#,
            )?;
            jail.set_env("SETTINGS_STORE_BACKUP_SECTION", "app_settings");

            let cfg = Config::load(Some(Path::new("settings.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(
                cfg.storage,
                StorageConfig::Database {
                    url: "sqlite://settings.db?mode=rwc".to_string()
                }
            );
            assert_eq!(cfg.storage.kind(), "database");
            assert_eq!(cfg.blob_name, "app");
            assert_eq!(cfg.backup_section, "app_settings");
            assert_eq!(cfg.notification_capacity, 256);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_field_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("settings.yaml", "blob_nme: typo\n")?;
            assert!(Config::load(Some(Path::new("settings.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_memory_backend() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("settings.yaml", "storage:\n  kind: memory\n")?;
            let cfg = Config::load(Some(Path::new("settings.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.storage, StorageConfig::Memory);
            Ok(())
        });
    }
}
