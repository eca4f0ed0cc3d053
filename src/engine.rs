//=========================================================================
// Game Flow Engine
//
// Main entry point: wires the logic thread to a host.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()────────────>  [winit host]
//         │                          │     ──spawn_headless()─>  [HostHandle]
//         ├─ with_tps()              └─ init(|ctx| ...)
//         ├─ with_channel_capacity()
//         ├─ with_context_config()
//         └─ with_title()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::globals::{ContextConfig, GameContext};
use crate::core::platform_bridge::{HostHandle, PlatformEvent};
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Context**: [`ContextConfig::default`]
/// - **Title**: "Game"
///
/// # Examples
///
/// ```no_run
/// use game_flow::prelude::*;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_context_config(ContextConfig {
///         scenes: SceneConfig::new(GameState::Menu)
///             .with_scene("Level1", GameState::Playing),
///         ..ContextConfig::default()
///     })
///     .with_title("My Game")
///     .build()
///     .init(|ctx| ctx.notify_scene_loaded("Level1"))
///     .run();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    context_config: ContextConfig,
    title: String,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            context_config: ContextConfig::default(),
            title: String::from("Game"),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the mailbox capacity for host → logic communication.
    ///
    /// Senders block while the mailbox is full.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the configuration the [`GameContext`] is built from.
    pub fn with_context_config(mut self, config: ContextConfig) -> Self {
        self.context_config = config;
        self
    }

    /// Sets the window title used by [`Engine::run`].
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            target: "core",
            "Building engine (TPS: {}, channel: {})",
            self.tps,
            self.channel_capacity
        );

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(self.context_config),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            title: self.title,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Game-flow runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► GameContext (state, scenes, modal gate, settings)
///   │
///   └─► Platform (winit event loop) or HostHandle (headless)
///
/// Communication: crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    title: String,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Registers setup code to run on the logic thread once the
    /// [`GameContext`] exists, before the first tick.
    ///
    /// May be called several times; closures run in call order.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GameContext) + Send + 'static,
    {
        self.orchestrator.add_init(Box::new(init_fn));
        self
    }

    //--- Execution --------------------------------------------------------

    /// Opens a window and blocks until it is closed.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the mailbox channel
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: `WindowClosed` is sent and the logic thread joined
    pub fn run(self) {
        info!(target: "core", "Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);
        info!(target: "core", "Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.title);

        if let Err(e) = platform.run() {
            error!(target: "core", "Platform error: {}", e);
        }

        info!(target: "core", "Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        match core_handle.join() {
            Ok(()) => info!(target: "core", "Core thread terminated cleanly"),
            Err(e) => error!(target: "core", "Core thread panicked: {:?}", e),
        }

        info!(target: "core", "Engine shutdown complete");
    }

    /// Spawns the logic thread without a window.
    ///
    /// The returned handle feeds host signals; the thread exits after
    /// [`HostHandle::shutdown`] or once every handle is dropped.
    pub fn spawn_headless(self) -> (HostHandle, JoinHandle<()>) {
        info!(target: "core", "Starting headless runtime (TPS: {})", self.tps);

        let (tx, rx) = bounded(self.channel_capacity);
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);

        (HostHandle::new(tx), core_handle)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::{EventChannel, GameEvent};
    use crate::core::platform_bridge::HostSignal;
    use crate::core::scene::SceneConfig;
    use crate::core::state::{GameState, Transition};
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.title, "Game");
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .with_title("Arena")
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.title, "Arena");
    }

    //=====================================================================
    // Headless Runtime Tests
    //=====================================================================

    fn scenes() -> ContextConfig {
        ContextConfig {
            scenes: SceneConfig::new(GameState::Menu).with_scene("Level1", GameState::Playing),
            ..ContextConfig::default()
        }
    }

    #[test]
    fn headless_runtime_processes_signals_then_exits() {
        let transitions = Arc::new(Mutex::new(Vec::new()));
        let final_state = Arc::new(Mutex::new(None));

        let recorded = transitions.clone();
        let engine = EngineBuilder::new()
            .with_tps(240.0)
            .with_context_config(scenes())
            .build()
            .init(move |ctx| {
                ctx.bus()
                    .subscribe(EventChannel::StateChanged, move |event| {
                        if let GameEvent::StateChanged(t) = event {
                            recorded.lock().unwrap().push(*t);
                        }
                    })
                    .detach();
            });

        let observed = final_state.clone();
        let engine = engine.init(move |ctx| {
            let state = Rc::downgrade(ctx.state());
            ctx.bus()
                .subscribe(EventChannel::StateChanged, move |_| {
                    *observed.lock().unwrap() = state.upgrade().map(|s| s.current_state());
                })
                .detach();
        });

        let (host, handle) = engine.spawn_headless();
        host.send_batch(vec![
            HostSignal::SceneLoaded("Level1".into()),
            HostSignal::EscapePressed,
        ])
        .unwrap();
        host.shutdown().unwrap();
        handle.join().unwrap();

        assert_eq!(
            *transitions.lock().unwrap(),
            vec![
                Transition::new(GameState::Menu, GameState::Playing),
                Transition::new(GameState::Playing, GameState::Paused),
            ]
        );
        assert_eq!(*final_state.lock().unwrap(), Some(GameState::Paused));
    }

    #[test]
    fn headless_runtime_exits_when_handles_dropped() {
        let (host, handle) = EngineBuilder::new().with_tps(240.0).build().spawn_headless();

        drop(host);

        assert!(handle.join().is_ok());
    }

    #[test]
    fn send_after_shutdown_reports_disconnect() {
        let (host, handle) = EngineBuilder::new().with_tps(240.0).build().spawn_headless();

        host.shutdown().unwrap();
        handle.join().unwrap();

        assert!(host.send(HostSignal::EscapePressed).is_err());
    }
}
