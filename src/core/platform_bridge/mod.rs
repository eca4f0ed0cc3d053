//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host (winit window, headless driver) with the logic thread.
//
// Components:
// - `interface`: signal, mailbox event and error types (the contract)
// - `event_collector`: logic-side mailbox draining
// - `host_handle`: host-side mailbox sender
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod host_handle;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use host_handle::HostHandle;
pub use interface::{HostSignal, PlatformError};

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;
