//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Settings blob table entity: one row per named settings map
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "settings_blobs")]
pub struct Model {
    /// Blob name (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    /// Whole settings map as a JSON object keyed by uri
    pub data: Json,

    /// Last write timestamp
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
