//=========================================================================
// Game Context
//=========================================================================
//
// Explicitly constructed container for every game-flow component.
//
// Architecture:
//   ContextConfig ─→ GameContext::new()
//                      ├─ EventBus           (shared by all below)
//                      ├─ StateMachine       (Rc, referenced by policy/gate)
//                      ├─ SceneStatePolicy   (listens to SceneChanged)
//                      ├─ ModalEventGate     (pauses/resumes the machine)
//                      ├─ SettingsStore      (snapshot + persistence)
//                      └─ Registry           (user managers)
//
// Built on the logic thread and never leaves it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::Registry;
use crate::core::event_bus::{EventBus, GameEvent};
use crate::core::modal::ModalEventGate;
use crate::core::platform_bridge::HostSignal;
use crate::core::scene::{SceneConfig, SceneStatePolicy};
use crate::core::settings::{
    MemoryStorage, SettingsLimits, SettingsSink, SettingsStorage, SettingsStore,
};
use crate::core::state::{GameState, StateMachine};

//=== ContextConfig =======================================================

/// Everything needed to build a [`GameContext`].
///
/// `Send`, so it can be handed to the logic thread.
pub struct ContextConfig {
    /// Initial scene table.
    pub scenes: SceneConfig,

    /// Where settings are persisted. Defaults to in-memory storage.
    pub settings_storage: Box<dyn SettingsStorage>,

    pub settings_limits: SettingsLimits,

    /// Applies settings to the host. Optional.
    pub settings_sink: Option<Box<dyn SettingsSink>>,

    /// Load persisted settings and apply them during construction.
    pub load_settings_on_start: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            scenes: SceneConfig::default(),
            settings_storage: Box::new(MemoryStorage::new()),
            settings_limits: SettingsLimits::default(),
            settings_sink: None,
            load_settings_on_start: true,
        }
    }
}

impl std::fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextConfig")
            .field("scenes", &self.scenes)
            .field("settings_limits", &self.settings_limits)
            .field("has_settings_sink", &self.settings_sink.is_some())
            .field("load_settings_on_start", &self.load_settings_on_start)
            .finish()
    }
}

//=== GameContext =========================================================

/// The game-flow components of one session.
///
/// # Example
///
/// ```rust
/// use game_flow::prelude::*;
///
/// let config = ContextConfig {
///     scenes: SceneConfig::new(GameState::Menu).with_scene("Level1", GameState::Playing),
///     ..ContextConfig::default()
/// };
/// let mut ctx = GameContext::new(config);
///
/// ctx.notify_scene_loaded("Level1");
/// assert!(ctx.state().is_playing());
///
/// ctx.handle_signal(HostSignal::EscapePressed);
/// assert_eq!(ctx.state().current_state(), GameState::Paused);
/// ```
pub struct GameContext {
    registry: Registry,
    modal: ModalEventGate,
    scenes: SceneStatePolicy,
    settings: SettingsStore,
    state: Rc<StateMachine>,
    bus: EventBus,
}

impl GameContext {
    //--- Construction -----------------------------------------------------

    pub fn new(config: ContextConfig) -> Self {
        let bus = EventBus::new();
        let state = Rc::new(StateMachine::new(bus.clone()));
        let scenes = SceneStatePolicy::new(&config.scenes, &state, &bus);
        let modal = ModalEventGate::new(Rc::clone(&state));

        let mut settings =
            SettingsStore::new(bus.clone(), config.settings_storage, config.settings_limits);
        settings.set_sink(config.settings_sink);

        if config.load_settings_on_start {
            let outcome = settings.load();
            debug!(target: "core", "Startup settings load: {:?}", outcome);
            settings.apply_all();
        }

        info!(target: "core", "Game context ready ({} scenes mapped)", scenes.len());

        Self {
            registry: Registry::new(),
            modal,
            scenes,
            settings,
            state,
            bus,
        }
    }

    //--- Host Signals -----------------------------------------------------

    /// Reacts to one host observation.
    pub fn handle_signal(&mut self, signal: HostSignal) {
        debug!(target: "core", "Host signal: {:?}", signal);

        match signal {
            HostSignal::EscapePressed => self.state.toggle_pause(),
            HostSignal::ApplicationPaused(true) | HostSignal::FocusChanged(false) => {
                if self.state.current_state() == GameState::Playing {
                    self.state.pause_game();
                }
            }
            HostSignal::ApplicationPaused(false) | HostSignal::FocusChanged(true) => {}
            HostSignal::SceneLoaded(scene) => self.notify_scene_loaded(scene),
        }
    }

    /// Announces that `scene` finished loading.
    pub fn notify_scene_loaded(&self, scene: impl Into<String>) {
        self.bus.publish(GameEvent::SceneChanged(scene.into()));
    }

    //--- Update -----------------------------------------------------------

    /// Per-tick housekeeping: session timer and due cutscene releases.
    pub fn update(&mut self, now: Instant, dt: Duration) {
        self.state.tick(dt);
        self.modal.update(now);
    }

    //--- Accessors --------------------------------------------------------

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn state(&self) -> &Rc<StateMachine> {
        &self.state
    }

    pub fn scenes(&self) -> &SceneStatePolicy {
        &self.scenes
    }

    pub fn modal(&self) -> &ModalEventGate {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ModalEventGate {
        &mut self.modal
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("state", &self.state)
            .field("modal", &self.modal)
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
