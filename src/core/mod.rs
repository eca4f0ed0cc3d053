//=========================================================================
// Core Systems Orchestrator
//
// Runs the game-flow components on the logic (non-platform) thread.
//
// Responsibilities:
// - Build the GameContext on the logic thread and run user init
// - Drain host signals from the crossbeam mailbox each tick
// - Advance the session timer and timed cutscene releases
// - Maintain pacing at a fixed tick rate (TPS)
//
// Notes:
// Every component inside the GameContext is single-threaded (`Rc`,
// `Cell`). Only the `Send` configuration and init closures cross into
// the logic thread; the host talks to it exclusively through the
// mailbox.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event_bus;
pub mod globals;
pub mod modal;
pub mod platform_bridge;
pub mod scene;
pub mod settings;
pub mod state;

//=== Standard Library Imports ============================================

use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Modules ====================================================

use globals::{ContextConfig, GameContext};
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== InitFn ==============================================================

pub(crate) type InitFn = Box<dyn FnOnce(&mut GameContext) + Send>;

//=== CoreSystemsOrchestrator =============================================

/// Owns everything the logic thread needs until it is spawned.
pub(crate) struct CoreSystemsOrchestrator {
    config: ContextConfig,
    init: Vec<InitFn>,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(config: ContextConfig) -> Self {
        Self {
            config,
            init: Vec::new(),
        }
    }

    /// Queues a closure to run against the context before the first tick.
    pub(crate) fn add_init(&mut self, init_fn: InitFn) {
        self.init.push(init_fn);
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each tick:
    //  1. Drains host signals (bounded)
    //  2. Dispatches them to the GameContext
    //  3. Updates timers and cutscene releases
    //  4. Sleeps to maintain fixed pacing
    //  5. Exits when the window closes or the mailbox disconnects
    //
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut context = GameContext::new(self.config);
            for init_fn in self.init {
                init_fn(&mut context);
            }
            info!(target: "core", "Logic thread running at {} TPS", tps);

            let mut collector = EventCollector::new(receiver);
            let mut last_tick = Instant::now();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather host signals ---------------------------
                let control = collector.collect_frame();

                //--- Step 2: Dispatch --------------------------------------
                for signal in collector.take_signals() {
                    context.handle_signal(signal);
                }

                if control == TickControl::Exit {
                    info!(target: "core", "Logic thread exiting");
                    break;
                }

                //--- Step 3: Update ----------------------------------------
                context.update(frame_start, frame_start - last_tick);
                last_tick = frame_start;

                //--- Step 4: Pacing ----------------------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                } else {
                    debug!(target: "core", "Tick overran by {:?}", elapsed - frame_duration);
                }
            }

            debug!(target: "core", "Final state: {}", context.state().current_state());
        })
    }
}
