//=========================================================================
// Game State System
//=========================================================================
//
// Session phases and the state machine enforcing their transitions.
//
// Architecture:
//   StateMachine
//     ├─ current / previous: GameState
//     ├─ requests: RequestQueue (run-to-completion)
//     └─ bus: EventBus (StateChanged, GamePaused, GameResumed, ScoreChanged)
//
//=========================================================================

//=== Module Declarations =================================================

mod game_state;
mod request_queue;
mod state_machine;

//=== Public API ==========================================================

pub use game_state::{GameState, Transition};
pub use state_machine::{SessionStats, StateMachine};
