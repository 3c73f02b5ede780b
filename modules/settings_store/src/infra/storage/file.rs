//! JSON file persistence: one `<name>.json` per blob

use crate::contract::SettingsMap;
use crate::domain::repository::SettingsPersistence;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Stores each blob as pretty-printed JSON under a directory
pub struct FileSettingsPersistence {
    dir: PathBuf,
}

impl FileSettingsPersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path of blob `name`
    pub fn blob_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            bail!("invalid settings blob name '{name}'");
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl SettingsPersistence for FileSettingsPersistence {
    async fn save(&self, name: &str, settings: &SettingsMap) -> Result<()> {
        let path = self.blob_path(name)?;
        let bytes = serde_json::to_vec_pretty(settings).context("serializing settings")?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating settings directory {}", self.dir.display()))?;

        // Write to a sibling and rename so readers never see a torn file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;

        Ok(())
    }

    async fn try_load(&self, name: &str) -> Result<Option<SettingsMap>> {
        let path = self.blob_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let settings = serde_json::from_slice(&bytes)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(Some(settings))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::SettingsUri;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FileSettingsPersistence::new(dir.path());
        assert!(persistence.try_load("settings").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FileSettingsPersistence::new(dir.path().join("nested"));

        let mut map = SettingsMap::new();
        map.insert(SettingsUri::new("ui/theme").unwrap(), json!({"dark": true}));
        map.insert(SettingsUri::new("net").unwrap(), json!({"hosts": ["a", "b"]}));
        persistence.save("settings", &map).await.unwrap();

        assert!(dir.path().join("nested/settings.json").exists());
        assert!(!dir.path().join("nested/settings.json.tmp").exists());
        assert_eq!(persistence.try_load("settings").await.unwrap(), Some(map));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), b"{not json").unwrap();

        let persistence = FileSettingsPersistence::new(dir.path());
        assert!(persistence.try_load("settings").await.is_err());
    }

    #[test]
    fn test_blob_name_must_be_plain() {
        let persistence = FileSettingsPersistence::new("/tmp");
        assert!(persistence.blob_path("../etc").is_err());
        assert!(persistence.blob_path("").is_err());
        assert!(persistence.blob_path("settings").is_ok());
    }
}
