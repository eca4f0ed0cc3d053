//=========================================================================
// Event Collector
//=========================================================================
//
// Mailbox reader with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → signals → TickControl
//
// Bounded polling prevents starvation when the host floods the mailbox.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::{HostSignal, PlatformEvent};

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects host signals for one frame.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    signals: Vec<HostSignal>,
}

impl EventCollector {
    pub(crate) const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            signals: Vec::with_capacity(8),
        }
    }

    /// Collects pending mailbox events (bounded to prevent starvation).
    ///
    /// Signals received before a shutdown request in the same frame are
    /// still returned by [`take_signals`](Self::take_signals).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.signals.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Signals(batch)) => {
                    self.signals.extend(batch);
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(target: "core", "Mailbox backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Signals collected this frame.
    #[cfg(test)]
    pub(crate) fn signals(&self) -> &[HostSignal] {
        &self.signals
    }

    /// Takes the collected signals, leaving an empty buffer.
    pub(crate) fn take_signals(&mut self) -> Vec<HostSignal> {
        std::mem::take(&mut self.signals)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
