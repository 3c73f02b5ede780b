//! Domain layer - the settings store and its ports

pub mod area;
pub mod backup;
pub mod events;
pub mod merge;
pub mod repository;
pub mod store;
pub mod typed;
pub mod validation;

pub use area::{AreaRegistry, SettingsArea};
pub use backup::{BackupEnvelope, BackupParticipant, BackupRegistry};
pub use events::{ChangeHandler, ChangeNotifier, SettingsChanged};
pub use repository::SettingsPersistence;
pub use store::{SettingsStore, StoreOptions};
pub use typed::SettingsType;
