//=========================================================================
// Settings Store
//=========================================================================
//
// Owns the live GameSettings snapshot.
//
// Architecture:
//   setter(value) ─→ clamp ─→ store ─→ SettingsSink::apply ─→ publish
//   load()        ─→ storage.read ─→ decode ─→ sanitize ─→ replace whole
//   save()        ─→ encode (pretty JSON) ─→ storage.write
//
// The snapshot is only ever replaced whole; a failed load leaves the
// previous snapshot in place.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::game_settings::clamp_volume;
use super::{GameSettings, SettingsError, SettingsLimits, SettingsStorage};
use crate::core::event_bus::{EventBus, GameEvent, VolumeKind};

//=== Constants ===========================================================

/// Storage key of the persisted snapshot.
pub const SETTINGS_KEY: &str = "GameSettings";

//=== SettingsSink ========================================================

/// Pushes settings into the host (display, audio mixer, renderer).
pub trait SettingsSink: Send {
    fn apply(&mut self, settings: &GameSettings);
}

//=== LoadOutcome =========================================================

/// Result of [`SettingsStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored snapshot replaced the current one.
    Loaded,

    /// Nothing was stored; the current snapshot is unchanged.
    Defaults,

    /// The stored snapshot was unreadable; the current one is unchanged.
    Rejected,
}

//=== SettingsStore =======================================================

pub struct SettingsStore {
    current: GameSettings,
    limits: SettingsLimits,
    storage: Box<dyn SettingsStorage>,
    sink: Option<Box<dyn SettingsSink>>,
    bus: EventBus,
}

impl SettingsStore {
    //--- Construction -----------------------------------------------------

    /// Starts from default settings. Nothing is read until [`load`](Self::load).
    pub fn new(bus: EventBus, storage: Box<dyn SettingsStorage>, limits: SettingsLimits) -> Self {
        Self {
            current: GameSettings::default().sanitized(&limits),
            limits,
            storage,
            sink: None,
            bus,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn SettingsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Option<Box<dyn SettingsSink>>) {
        self.sink = sink;
    }

    //--- Queries ----------------------------------------------------------

    pub fn settings(&self) -> &GameSettings {
        &self.current
    }

    pub fn limits(&self) -> &SettingsLimits {
        &self.limits
    }

    //--- Persistence ------------------------------------------------------

    /// Replaces the snapshot with the stored one, if there is a valid one.
    ///
    /// Fields outside `limits` are clamped. Read and decode failures are
    /// logged and reported as [`LoadOutcome::Rejected`].
    pub fn load(&mut self) -> LoadOutcome {
        let text = match self.storage.read(SETTINGS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(target: "settings", "No stored settings, keeping current snapshot");
                return LoadOutcome::Defaults;
            }
            Err(e) => {
                error!(target: "settings", "Failed to read settings: {}", e);
                return LoadOutcome::Rejected;
            }
        };

        let loaded = match serde_json::from_str::<GameSettings>(&text) {
            Ok(settings) => settings,
            Err(e) => {
                error!(target: "settings", "{}", SettingsError::Decode(e));
                return LoadOutcome::Rejected;
            }
        };

        let sanitized = loaded.sanitized(&self.limits);
        if sanitized != loaded {
            warn!(target: "settings", "Stored settings were out of range and have been clamped");
        }

        self.replace(sanitized);
        info!(target: "settings", "Settings loaded");
        LoadOutcome::Loaded
    }

    /// Writes the current snapshot to storage.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.current).map_err(SettingsError::Encode)?;
        self.storage.write(SETTINGS_KEY, &text)?;
        debug!(target: "settings", "Settings saved");
        Ok(())
    }

    /// Restores defaults, applies and persists them.
    pub fn reset_to_default(&mut self) {
        self.replace(GameSettings::default().sanitized(&self.limits));
        info!(target: "settings", "Settings reset to defaults");

        if let Err(e) = self.save() {
            error!(target: "settings", "Failed to persist default settings: {}", e);
        }
    }

    /// Pushes the whole snapshot to the sink.
    pub fn apply_all(&mut self) {
        self.apply();
    }

    //--- Setters ----------------------------------------------------------

    pub fn set_resolution(&mut self, index: usize) {
        let index = self.limits.clamp_resolution(index);
        self.current.resolution_index = index;
        self.commit(GameEvent::ResolutionChanged(index));
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.current.fullscreen = fullscreen;
        self.commit(GameEvent::FullscreenChanged(fullscreen));
    }

    pub fn set_target_frame_rate(&mut self, rate: u32) {
        let rate = self.limits.clamp_frame_rate(rate);
        self.current.target_frame_rate = rate;
        self.commit(GameEvent::FrameRateChanged(rate));
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.set_volume(VolumeKind::Master, volume);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.set_volume(VolumeKind::Sfx, volume);
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.set_volume(VolumeKind::Music, volume);
    }

    /// Sets one of the volume channels, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, kind: VolumeKind, volume: f32) {
        let defaults = GameSettings::default();
        let (slot, fallback) = match kind {
            VolumeKind::Master => (&mut self.current.master_volume, defaults.master_volume),
            VolumeKind::Sfx => (&mut self.current.sfx_volume, defaults.sfx_volume),
            VolumeKind::Music => (&mut self.current.music_volume, defaults.music_volume),
        };

        let level = clamp_volume(volume, fallback);
        *slot = level;
        self.commit(GameEvent::VolumeChanged { kind, level });
    }

    pub fn set_ui_scale(&mut self, scale: f32) {
        let scale = self.limits.clamp_ui_scale(scale);
        self.current.ui_scale = scale;
        self.commit(GameEvent::UiScaleChanged(scale));
    }

    pub fn set_quality_level(&mut self, level: u32) {
        let level = self.limits.clamp_quality(level);
        self.current.quality_level = level;
        self.commit(GameEvent::QualityChanged(level));
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.current.vsync_enabled = enabled;
        self.commit(GameEvent::VSyncChanged(enabled));
    }

    //--- Internal ---------------------------------------------------------

    fn replace(&mut self, settings: GameSettings) {
        self.current = settings;
        self.commit(GameEvent::SettingsReplaced(settings));
    }

    fn commit(&mut self, event: GameEvent) {
        self.apply();
        self.bus.publish(event);
    }

    fn apply(&mut self) {
        match self.sink.as_mut() {
            Some(sink) => sink.apply(&self.current),
            None => debug!(target: "settings", "No settings sink installed, skipping apply"),
        }
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("current", &self.current)
            .field("limits", &self.limits)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
