//=========================================================================
// Signal Buffer
//
// Collects host signals observed between two frame boundaries.
//
// Responsibilities:
// - Keep discrete signals (Escape, scene loads) in arrival order
// - Drop a focus / suspend change that repeats the one before it
// - Hand the whole frame over via `drain()`
//
//=========================================================================

//=== Internal Modules ====================================================

use crate::core::platform_bridge::HostSignal;

//=== SignalBuffer ========================================================

pub(crate) struct SignalBuffer {
    pending: Vec<HostSignal>,
}

impl SignalBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 16;

        Self {
            pending: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Push -------------------------------------------------------------
    //
    // A focus or suspend change identical to the one directly before it
    // carries nothing new and is dropped. Opposite values are both kept:
    // a focus loss followed by a regain must still pause the session.
    //
    pub(crate) fn push(&mut self, signal: HostSignal) {
        let repeated = matches!(
            signal,
            HostSignal::FocusChanged(_) | HostSignal::ApplicationPaused(_)
        ) && self.pending.last() == Some(&signal);

        if !repeated {
            self.pending.push(signal);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's signals, or `None` when nothing was observed.
    //
    pub(crate) fn drain(&mut self) -> Option<Vec<HostSignal>> {
        if self.pending.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
