//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types.
//
// Usage:
//   use game_flow::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::platform_bridge::{HostHandle, HostSignal, PlatformError};

// Context
pub use crate::core::globals::{ContextConfig, GameContext, Registry};

// Events
pub use crate::core::event_bus::{
    EventBus, EventChannel, GameEvent, Subscription, SubscriptionId, VolumeKind,
};

// State
pub use crate::core::state::{GameState, SessionStats, StateMachine, Transition};

// Scenes
pub use crate::core::scene::{SceneConfig, SceneStatePair, SceneStatePolicy};

// Modal events
pub use crate::core::modal::{CutsceneToken, ModalEventGate};

// Settings
pub use crate::core::settings::{
    FileStorage, GameSettings, LoadOutcome, MemoryStorage, SettingsError, SettingsLimits,
    SettingsSink, SettingsStorage, SettingsStore, SETTINGS_KEY,
};
