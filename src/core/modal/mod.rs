//=========================================================================
// Modal Event System
//=========================================================================
//
// Cutscene / scripted-event gating on top of the state machine.
//
// Architecture:
//   ModalEventGate
//     ├─ machine: Rc<StateMachine> (pause_game / resume_game)
//     └─ releases: Vec<PendingRelease> ←── CutsceneToken (owner)
//
//=========================================================================

//=== Module Declarations =================================================

mod modal_gate;
mod release;

//=== Public API ==========================================================

pub use modal_gate::ModalEventGate;
pub use release::CutsceneToken;
