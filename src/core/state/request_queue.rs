//=========================================================================
// Request Queue
//=========================================================================
//
// FIFO of state-machine operations.
//
// Operations requested while the machine is dispatching (from inside an
// event handler) wait here and run after the current operation and all
// of its notifications have finished.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use super::GameState;

//=== StateRequest ========================================================

/// A state-machine operation awaiting execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StateRequest {
    Change(GameState),
    Pause,
    Resume,
    Start,
    Restart,
    GameOver,
    MainMenu,
    Hold(bool),
}

//=== RequestQueue ========================================================

#[derive(Debug, Default)]
pub(super) struct RequestQueue {
    queue: VecDeque<StateRequest>,
}

impl RequestQueue {
    pub(super) fn push(&mut self, request: StateRequest) {
        self.queue.push_back(request);
    }

    pub(super) fn pop(&mut self) -> Option<StateRequest> {
        self.queue.pop_front()
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.queue.len()
    }
}

//=========================================================================
// Tests
//=========================================================================
