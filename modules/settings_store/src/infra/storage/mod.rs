//! Storage layer - persistence port implementations

pub mod entity;
pub mod file;
pub mod mapper;
pub mod memory;
pub mod migrations;
pub mod repositories;

pub use file::FileSettingsPersistence;
pub use memory::InMemorySettingsPersistence;
pub use repositories::SeaOrmSettingsPersistence;
