//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::SettingsMap;

impl TryFrom<entity::Model> for SettingsMap {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(entity.data)?)
    }
}

/// Active model writing `settings` under `name`
pub fn to_active_model(name: &str, settings: &SettingsMap) -> entity::ActiveModel {
    use sea_orm::ActiveValue::Set;

    entity::ActiveModel {
        name: Set(name.to_string()),
        data: Set(settings.to_document()),
        updated_at: Set(chrono::Utc::now()),
    }
}
