//=========================================================================
// Scheduled Release
//=========================================================================
//
// Deadline plus cancellation channel backing `ModalEventGate::run_for`.
//
// Architecture:
//   CutsceneToken (owner, any thread) ──Sender<ReleaseSignal>──┐
//                                                              ↓
//   PendingRelease (gate, logic thread) ── poll(now) → Option<ReleaseReason>
//
// The token is the owner's handle on the timed cutscene. Cancelling it
// or dropping it releases the gate at the next poll, so a torn-down
// owner can never leave the game paused.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

//=== ReleaseSignal =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReleaseSignal {
    Cancel,
    Detach,
}

//=== ReleaseReason =======================================================

/// Why a scheduled release fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReleaseReason {
    Expired,
    Cancelled,
    OwnerDropped,
}

//=== CutsceneToken =======================================================

/// Owner handle for a timed cutscene started with
/// [`ModalEventGate::run_for`](super::ModalEventGate::run_for).
///
/// - [`cancel`](Self::cancel) ends the cutscene at the next gate update.
/// - Dropping the token does the same.
/// - [`detach`](Self::detach) lets the cutscene run until its deadline
///   without an owner.
///
/// The token is `Send`, so it may be held by another thread.
#[must_use = "dropping a CutsceneToken ends the cutscene at the next update"]
#[derive(Debug)]
pub struct CutsceneToken {
    signals: Sender<ReleaseSignal>,
}

impl CutsceneToken {
    /// Ends the cutscene early.
    pub fn cancel(self) {
        let _ = self.signals.send(ReleaseSignal::Cancel);
    }

    /// Gives up ownership; the cutscene ends at its deadline.
    pub fn detach(self) {
        let _ = self.signals.send(ReleaseSignal::Detach);
    }
}

//=== PendingRelease ======================================================

#[derive(Debug)]
pub(super) struct PendingRelease {
    deadline: Instant,
    signals: Receiver<ReleaseSignal>,
    detached: bool,
}

impl PendingRelease {
    pub(super) fn new(deadline: Instant) -> (Self, CutsceneToken) {
        // A token sends at most one signal before it is consumed.
        let (tx, rx) = bounded(1);
        let release = Self {
            deadline,
            signals: rx,
            detached: false,
        };
        (release, CutsceneToken { signals: tx })
    }

    /// Returns the reason to release now, if any.
    pub(super) fn poll(&mut self, now: Instant) -> Option<ReleaseReason> {
        loop {
            match self.signals.try_recv() {
                Ok(ReleaseSignal::Cancel) => return Some(ReleaseReason::Cancelled),
                Ok(ReleaseSignal::Detach) => self.detached = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.detached {
                        return Some(ReleaseReason::OwnerDropped);
                    }
                    break;
                }
            }
        }

        (now >= self.deadline).then_some(ReleaseReason::Expired)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn waits_until_deadline() {
        let start = Instant::now();
        let (mut release, _token) = PendingRelease::new(start + Duration::from_secs(2));

        assert_eq!(release.poll(start), None);
        assert_eq!(release.poll(start + Duration::from_secs(1)), None);
        assert_eq!(
            release.poll(start + Duration::from_secs(2)),
            Some(ReleaseReason::Expired)
        );
    }

    #[test]
    fn cancel_fires_before_deadline() {
        let start = Instant::now();
        let (mut release, token) = PendingRelease::new(start + Duration::from_secs(10));

        token.cancel();

        assert_eq!(release.poll(start), Some(ReleaseReason::Cancelled));
    }

    #[test]
    fn dropped_owner_fires_before_deadline() {
        let start = Instant::now();
        let (mut release, token) = PendingRelease::new(start + Duration::from_secs(10));

        drop(token);

        assert_eq!(release.poll(start), Some(ReleaseReason::OwnerDropped));
    }

    #[test]
    fn detached_token_runs_to_deadline() {
        let start = Instant::now();
        let (mut release, token) = PendingRelease::new(start + Duration::from_secs(1));

        token.detach();

        assert_eq!(release.poll(start), None);
        assert_eq!(
            release.poll(start + Duration::from_secs(1)),
            Some(ReleaseReason::Expired)
        );
    }

    #[test]
    fn token_can_be_cancelled_from_another_thread() {
        let start = Instant::now();
        let (mut release, token) = PendingRelease::new(start + Duration::from_secs(10));

        std::thread::spawn(move || token.cancel()).join().unwrap();

        assert_eq!(release.poll(start), Some(ReleaseReason::Cancelled));
    }
}
