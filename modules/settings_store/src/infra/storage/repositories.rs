//! SeaORM persistence implementation

use crate::contract::SettingsMap;
use crate::domain::repository::SettingsPersistence;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{sea_query::OnConflict, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

use super::{entity, mapper, migrations::Migrator};

// ===== Settings Blob Repository =====

pub struct SeaOrmSettingsPersistence {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSettingsPersistence {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Connect to `url` and bring the schema up to date
    pub async fn connect(url: &str) -> Result<Self> {
        let db = Database::connect(url).await.map_err(|e| {
            let redacted = redact_url(url);
            anyhow::anyhow!(
                "connecting to settings database {redacted}: {}",
                e.to_string().replace(url, &redacted)
            )
        })?;
        Migrator::up(&db, None)
            .await
            .context("running settings store migrations")?;
        tracing::info!("Settings store migrations completed");
        Ok(Self::new(Arc::new(db)))
    }
}

/// `url` with any user info in the authority replaced by `***`
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***{}", &rest[at..]),
        None => url.to_string(),
    }
}

#[async_trait]
impl SettingsPersistence for SeaOrmSettingsPersistence {
    async fn save(&self, name: &str, settings: &SettingsMap) -> Result<()> {
        let active = mapper::to_active_model(name, settings);

        entity::Entity::insert(active)
            .on_conflict(
                OnConflict::column(entity::Column::Name)
                    .update_columns([entity::Column::Data, entity::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .with_context(|| format!("saving settings blob '{name}'"))?;

        Ok(())
    }

    async fn try_load(&self, name: &str) -> Result<Option<SettingsMap>> {
        let model = entity::Entity::find_by_id(name.to_string())
            .one(&*self.db)
            .await
            .with_context(|| format!("loading settings blob '{name}'"))?;

        model.map(SettingsMap::try_from).transpose()
    }
}
