//=========================================================================
// Host Handle
//=========================================================================
//
// Sending half of the logic thread's mailbox, for hosts that are not
// the built-in winit platform.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::debug;

//=== Internal Dependencies ===============================================

use super::{HostSignal, PlatformError, PlatformEvent};

//=== HostHandle ==========================================================

/// Cloneable, `Send` handle for feeding [`HostSignal`]s to a running
/// logic thread.
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: Sender<PlatformEvent>,
}

impl HostHandle {
    pub(crate) fn new(sender: Sender<PlatformEvent>) -> Self {
        Self { sender }
    }

    /// Queues one signal. Blocks while the mailbox is full.
    pub fn send(&self, signal: HostSignal) -> Result<(), PlatformError> {
        self.send_batch(vec![signal])
    }

    /// Queues several signals to be handled in the same tick.
    pub fn send_batch(&self, signals: Vec<HostSignal>) -> Result<(), PlatformError> {
        self.sender
            .send(PlatformEvent::Signals(signals))
            .map_err(|_| PlatformError::Disconnected)
    }

    /// Asks the logic thread to exit after its current tick.
    pub fn shutdown(&self) -> Result<(), PlatformError> {
        debug!(target: "core", "Host requested shutdown");
        self.sender
            .send(PlatformEvent::WindowClosed)
            .map_err(|_| PlatformError::Disconnected)
    }
}

//=========================================================================
// Tests
//=========================================================================
