//=========================================================================
// Game Settings
//=========================================================================
//
// The persisted settings snapshot and the ranges each field must stay in.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== GameSettings ========================================================

/// Complete settings snapshot.
///
/// Always replaced as a whole when loaded or reset. Serialized with
/// camelCase keys; keys missing from stored text take their default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    //--- Display ----------------------------------------------------------
    pub resolution_index: usize,
    pub fullscreen: bool,
    pub target_frame_rate: u32,

    //--- Audio (0.0 ..= 1.0) ----------------------------------------------
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,

    //--- UI ---------------------------------------------------------------
    pub ui_scale: f32,

    //--- Graphics ---------------------------------------------------------
    pub quality_level: u32,
    pub vsync_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            resolution_index: 0,
            fullscreen: true,
            target_frame_rate: 60,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            ui_scale: 1.0,
            quality_level: 2,
            vsync_enabled: true,
        }
    }
}

impl GameSettings {
    /// Returns a copy with every field forced into `limits`.
    pub fn sanitized(&self, limits: &SettingsLimits) -> Self {
        let defaults = Self::default();
        Self {
            resolution_index: limits.clamp_resolution(self.resolution_index),
            fullscreen: self.fullscreen,
            target_frame_rate: limits.clamp_frame_rate(self.target_frame_rate),
            master_volume: clamp_volume(self.master_volume, defaults.master_volume),
            sfx_volume: clamp_volume(self.sfx_volume, defaults.sfx_volume),
            music_volume: clamp_volume(self.music_volume, defaults.music_volume),
            ui_scale: limits.clamp_ui_scale(self.ui_scale),
            quality_level: limits.clamp_quality(self.quality_level),
            vsync_enabled: self.vsync_enabled,
        }
    }
}

//=== SettingsLimits ======================================================

/// Valid ranges for the bounded settings fields.
///
/// Resolution and quality counts come from the host (display modes,
/// quality presets); the defaults suit a desktop build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingsLimits {
    /// Number of selectable resolutions. `None` leaves the index unbounded.
    pub resolution_count: Option<usize>,

    /// Number of quality presets; levels run `0..quality_levels`.
    pub quality_levels: u32,

    pub min_frame_rate: u32,
    pub max_frame_rate: u32,

    pub min_ui_scale: f32,
    pub max_ui_scale: f32,
}

impl Default for SettingsLimits {
    fn default() -> Self {
        Self {
            resolution_count: None,
            quality_levels: 6,
            min_frame_rate: 30,
            max_frame_rate: 240,
            min_ui_scale: 0.5,
            max_ui_scale: 2.0,
        }
    }
}

impl SettingsLimits {
    pub fn clamp_resolution(&self, index: usize) -> usize {
        match self.resolution_count {
            Some(count) => index.min(count.saturating_sub(1)),
            None => index,
        }
    }

    pub fn clamp_frame_rate(&self, rate: u32) -> u32 {
        rate.max(self.min_frame_rate).min(self.max_frame_rate)
    }

    /// NaN maps to the default scale.
    pub fn clamp_ui_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return GameSettings::default().ui_scale;
        }
        scale.max(self.min_ui_scale).min(self.max_ui_scale)
    }

    pub fn clamp_quality(&self, level: u32) -> u32 {
        level.min(self.quality_levels.saturating_sub(1))
    }
}

/// Clamps to `0.0..=1.0`; NaN maps to `fallback`.
pub(crate) fn clamp_volume(volume: f32, fallback: f32) -> f32 {
    if volume.is_nan() {
        return fallback;
    }
    volume.max(0.0).min(1.0)
}

//=========================================================================
// Tests
//=========================================================================
