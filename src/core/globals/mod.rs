//=========================================================================
// Globals
//=========================================================================
//
// Explicit dependency injection for the logic thread.
//
// Architecture:
//   GameContext: bus + state machine + scene policy + modal gate
//                + settings store + registry
//   Registry:    type-keyed holder for user managers
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod registry;

//=== Public API ==========================================================

pub use global_context::{ContextConfig, GameContext};
pub use registry::Registry;
