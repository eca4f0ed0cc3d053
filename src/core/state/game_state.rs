//=========================================================================
// Game State
//=========================================================================
//
// Session phases and the transition record carried by state events.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== GameState ===========================================================

/// Phase of the overall game session.
///
/// A [`StateMachine`](super::StateMachine) always holds exactly one of
/// these as its current state; there is no "uninitialized" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen / main menu. Initial state.
    #[default]
    Menu,

    /// Gameplay is running.
    Playing,

    /// Gameplay is suspended (pause menu, cutscene, lost focus).
    Paused,

    /// The session ended. Re-enterable through restart or main menu.
    GameOver,

    /// A scene is being loaded.
    Loading,
}

impl GameState {
    /// Every state, in declaration order.
    pub const ALL: [GameState; 5] = [
        GameState::Menu,
        GameState::Playing,
        GameState::Paused,
        GameState::GameOver,
        GameState::Loading,
    ];
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Menu => "Menu",
            GameState::Playing => "Playing",
            GameState::Paused => "Paused",
            GameState::GameOver => "GameOver",
            GameState::Loading => "Loading",
        };
        f.write_str(name)
    }
}

//=== Transition ==========================================================

/// A `(from, to)` state pair observed when the current state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
}

impl Transition {
    pub fn new(from: GameState, to: GameState) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_menu() {
        assert_eq!(GameState::default(), GameState::Menu);
    }

    #[test]
    fn all_lists_each_state_once() {
        let mut seen = std::collections::HashSet::new();
        for state in GameState::ALL {
            assert!(seen.insert(state), "{} listed twice", state);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn transition_display() {
        let t = Transition::new(GameState::Playing, GameState::Paused);
        assert_eq!(t.to_string(), "Playing -> Paused");
    }

    #[test]
    fn state_deserializes_from_variant_name() {
        let state: GameState = serde_json::from_str("\"GameOver\"").unwrap();
        assert_eq!(state, GameState::GameOver);
    }
}
