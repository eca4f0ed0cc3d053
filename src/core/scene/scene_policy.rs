//=========================================================================
// Scene State Policy
//=========================================================================
//
// Couples "which scene is loaded" to "which GameState applies".
//
// Architecture:
//   SceneChanged(id) ─→ SceneTable::resolve(id) ─→ StateMachine::change_state
//                          ├─ states: HashMap<String, GameState>
//                          └─ default_state (fallback)
//
// The bus handler holds only weak references to the table and the
// state machine, so it never keeps either alive on its own.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::SceneConfig;
use crate::core::event_bus::{EventBus, EventChannel, GameEvent, Subscription};
use crate::core::state::{GameState, StateMachine};

//=== SceneTable ==========================================================

#[derive(Debug)]
struct SceneTable {
    states: HashMap<String, GameState>,
    default_state: GameState,
}

impl SceneTable {
    fn from_config(config: &SceneConfig) -> Self {
        let mut table = Self {
            states: HashMap::with_capacity(config.scenes.len()),
            default_state: config.default_state,
        };

        for pair in &config.scenes {
            if pair.scene.is_empty() {
                warn!(target: "scene", "Skipping scene entry with empty name ({})", pair.state);
                continue;
            }
            table.insert(&pair.scene, pair.state);
        }

        table
    }

    fn insert(&mut self, scene: &str, state: GameState) {
        if let Some(old) = self.states.insert(scene.to_owned(), state) {
            if old != state {
                warn!(
                    target: "scene",
                    "Scene '{}' was mapped to {} and has been replaced with {}",
                    scene,
                    old,
                    state
                );
            }
        }
    }

    fn resolve(&self, scene: &str) -> GameState {
        self.states.get(scene).copied().unwrap_or(self.default_state)
    }
}

//=== SceneStatePolicy ====================================================

/// Applies the configured GameState whenever a scene finishes loading.
///
/// Scenes that were never registered fall back to the default state.
/// Registering the same scene twice keeps the last mapping.
pub struct SceneStatePolicy {
    table: Rc<RefCell<SceneTable>>,
    _subscription: Subscription,
}

impl SceneStatePolicy {
    //--- Construction -----------------------------------------------------

    /// Builds the scene table from a snapshot of `config` and starts
    /// listening for `SceneChanged` on `bus`.
    pub fn new(config: &SceneConfig, machine: &Rc<StateMachine>, bus: &EventBus) -> Self {
        let table = Rc::new(RefCell::new(SceneTable::from_config(config)));

        let subscription = bus.subscribe(
            EventChannel::SceneChanged,
            scene_changed_handler(Rc::downgrade(&table), Rc::downgrade(machine)),
        );

        debug!(
            target: "scene",
            "Scene policy ready ({} scenes, default {})",
            table.borrow().states.len(),
            config.default_state
        );

        Self {
            table,
            _subscription: subscription,
        }
    }

    //--- Table Mutation ---------------------------------------------------

    /// Maps `scene` to `state`, replacing any previous mapping.
    pub fn set_scene_state(&self, scene: impl Into<String>, state: GameState) {
        let scene = scene.into();
        self.table.borrow_mut().insert(&scene, state);
    }

    pub fn set_default_state(&self, state: GameState) {
        self.table.borrow_mut().default_state = state;
    }

    //--- Queries ----------------------------------------------------------

    /// State that loading `scene` would apply.
    pub fn resolve(&self, scene: &str) -> GameState {
        self.table.borrow().resolve(scene)
    }

    pub fn default_state(&self) -> GameState {
        self.table.borrow().default_state
    }

    /// Number of explicitly mapped scenes.
    pub fn len(&self) -> usize {
        self.table.borrow().states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().states.is_empty()
    }
}

//=== Internal Helpers ====================================================

fn scene_changed_handler(
    table: Weak<RefCell<SceneTable>>,
    machine: Weak<StateMachine>,
) -> impl FnMut(&GameEvent) {
    move |event| {
        let GameEvent::SceneChanged(scene) = event else {
            return;
        };

        let (Some(table), Some(machine)) = (table.upgrade(), machine.upgrade()) else {
            debug!(target: "scene", "Scene policy gone, ignoring scene '{}'", scene);
            return;
        };

        let target = table.borrow().resolve(scene);
        info!(target: "scene", "Scene '{}' -> {}", scene, target);
        machine.change_state(target);
    }
}

//=========================================================================
// Tests
//=========================================================================
