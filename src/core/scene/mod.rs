//=========================================================================
// Scene System
//=========================================================================
//
// Maps loaded scenes to the GameState they imply.
//
// Architecture:
//   SceneStatePolicy
//     ├─ table: HashMap<String, GameState> + default_state
//     └─ subscription: SceneChanged
//
// Flow:
//   scene loader → SceneChanged(id) → resolve(id) → StateMachine::change_state
//
//=========================================================================

//=== Module Declarations =================================================

mod scene_config;
mod scene_policy;

//=== Public API ==========================================================

pub use scene_config::{SceneConfig, SceneStatePair};
pub use scene_policy::SceneStatePolicy;
