//=========================================================================
// Game Events
//=========================================================================
//
// Event payloads carried by the EventBus and the channel tags that
// group them.
//
// Every `GameEvent` variant belongs to exactly one `EventChannel`.
// Subscribers register per channel and receive the full event.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::settings::GameSettings;
use crate::core::state::Transition;

//=== EventChannel ========================================================

/// Named category of events on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    //--- Session ----------------------------------------------------------
    StateChanged,
    GamePaused,
    GameResumed,
    SceneChanged,
    ScoreChanged,

    //--- Settings ---------------------------------------------------------
    VolumeChanged,
    ResolutionChanged,
    FullscreenChanged,
    FrameRateChanged,
    UiScaleChanged,
    QualityChanged,
    VSyncChanged,
    SettingsReplaced,
}

//=== VolumeKind ==========================================================

/// Which volume slider a [`GameEvent::VolumeChanged`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeKind {
    Master,
    Sfx,
    Music,
}

//=== GameEvent ===========================================================

/// Payload published on the bus.
///
/// Setting events always carry the value that was actually stored, i.e.
/// after clamping.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The current state changed.
    StateChanged(Transition),

    /// Gameplay was paused through `pause_game`.
    GamePaused,

    /// Gameplay resumed, or a new session began through `start_game`.
    GameResumed,

    /// A scene finished loading.
    SceneChanged(String),

    /// Session score total after a change.
    ScoreChanged(u64),

    VolumeChanged { kind: VolumeKind, level: f32 },
    ResolutionChanged(usize),
    FullscreenChanged(bool),
    FrameRateChanged(u32),
    UiScaleChanged(f32),
    QualityChanged(u32),
    VSyncChanged(bool),

    /// The whole settings snapshot was replaced (load or reset).
    SettingsReplaced(GameSettings),
}

impl GameEvent {
    /// Returns the channel this event is delivered on.
    pub fn channel(&self) -> EventChannel {
        match self {
            GameEvent::StateChanged(_) => EventChannel::StateChanged,
            GameEvent::GamePaused => EventChannel::GamePaused,
            GameEvent::GameResumed => EventChannel::GameResumed,
            GameEvent::SceneChanged(_) => EventChannel::SceneChanged,
            GameEvent::ScoreChanged(_) => EventChannel::ScoreChanged,
            GameEvent::VolumeChanged { .. } => EventChannel::VolumeChanged,
            GameEvent::ResolutionChanged(_) => EventChannel::ResolutionChanged,
            GameEvent::FullscreenChanged(_) => EventChannel::FullscreenChanged,
            GameEvent::FrameRateChanged(_) => EventChannel::FrameRateChanged,
            GameEvent::UiScaleChanged(_) => EventChannel::UiScaleChanged,
            GameEvent::QualityChanged(_) => EventChannel::QualityChanged,
            GameEvent::VSyncChanged(_) => EventChannel::VSyncChanged,
            GameEvent::SettingsReplaced(_) => EventChannel::SettingsReplaced,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
