//=========================================================================
// Settings
//=========================================================================
//
// Player-facing configuration: the GameSettings snapshot, its valid
// ranges, the store that mutates and persists it, and the storage
// backends it persists into.
//
//=========================================================================

mod error;
mod game_settings;
mod settings_store;
mod storage;

pub use error::SettingsError;
pub use game_settings::{GameSettings, SettingsLimits};
pub use settings_store::{LoadOutcome, SettingsSink, SettingsStore, SETTINGS_KEY};
pub use storage::{FileStorage, MemoryStorage, SettingsStorage};
