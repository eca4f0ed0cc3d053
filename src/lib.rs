//=========================================================================
// Game Flow Library Root
//
// Session flow for a game: which phase it is in, what reacts to phase
// changes, and the settings that travel with it.
//
// Responsibilities:
// - Expose the game-flow components (`core`) and the runtime facade
//   (`Engine`, `EngineBuilder`)
// - Keep the winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use game_flow::prelude::*;
//
// fn main() {
//     EngineBuilder::new().build().run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the components: event bus, state machine, scene policy,
// modal gate, settings, the GameContext container and the host bridge.
// They can be used directly without the runtime.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and translates OS events into host
// signals. `engine` wires it to the logic thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
