//=========================================================================
// Scene Configuration
//=========================================================================
//
// Data describing which GameState each scene implies.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::state::GameState;

//=== SceneStatePair ======================================================

/// One `scene → state` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStatePair {
    pub scene: String,
    pub state: GameState,
}

impl SceneStatePair {
    pub fn new(scene: impl Into<String>, state: GameState) -> Self {
        Self {
            scene: scene.into(),
            state,
        }
    }
}

//=== SceneConfig =========================================================

/// Initial scene table for a [`SceneStatePolicy`](super::SceneStatePolicy).
///
/// # Example
///
/// ```rust
/// use game_flow::prelude::*;
///
/// let config = SceneConfig::new(GameState::Menu)
///     .with_scene("MainMenu", GameState::Menu)
///     .with_scene("Level1", GameState::Playing);
///
/// assert_eq!(config.scenes.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// State applied to scenes missing from `scenes`.
    #[serde(default)]
    pub default_state: GameState,

    #[serde(default)]
    pub scenes: Vec<SceneStatePair>,
}

impl SceneConfig {
    pub fn new(default_state: GameState) -> Self {
        Self {
            default_state,
            scenes: Vec::new(),
        }
    }

    pub fn with_scene(mut self, scene: impl Into<String>, state: GameState) -> Self {
        self.scenes.push(SceneStatePair::new(scene, state));
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_appends_in_order() {
        let config = SceneConfig::new(GameState::Loading)
            .with_scene("A", GameState::Menu)
            .with_scene("B", GameState::Playing);

        assert_eq!(config.default_state, GameState::Loading);
        assert_eq!(
            config.scenes,
            vec![
                SceneStatePair::new("A", GameState::Menu),
                SceneStatePair::new("B", GameState::Playing),
            ]
        );
    }

    #[test]
    fn parses_json() {
        let json = r#"{
            "default_state": "Menu",
            "scenes": [
                { "scene": "Title", "state": "Menu" },
                { "scene": "Dungeon", "state": "Playing" }
            ]
        }"#;

        let config = SceneConfig::from_json(json).unwrap();

        assert_eq!(config.default_state, GameState::Menu);
        assert_eq!(config.scenes[1], SceneStatePair::new("Dungeon", GameState::Playing));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn unknown_state_is_rejected() {
        let json = r#"{ "scenes": [ { "scene": "X", "state": "Flying" } ] }"#;
        assert!(SceneConfig::from_json(json).is_err());
    }
}
