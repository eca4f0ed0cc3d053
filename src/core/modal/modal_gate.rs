//=========================================================================
// Modal Event Gate
//=========================================================================
//
// Exclusive "event mode" overlay (cutscenes, scripted events) that
// pauses the session while it runs and resumes it afterwards.
//
// Lifecycle:
// ```text
//   start() ──> active ── end() ──> inactive
//     │ (active or not Playing:   │ (already inactive: no-op)
//     │  no-op)                   │
//     └─ pause_game() + hold()    └─ release_hold() + resume_game()
//
//   While active the machine is held in Paused; nothing else can
//   resume it.
//
//   run_for(d, now) = start() + release at now + d
//   update(now)     → fires due / cancelled / orphaned releases → end()
//   drop(gate)      → end() if still active
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::release::{CutsceneToken, PendingRelease};
use crate::core::state::{GameState, StateMachine};

//=== ModalEventGate ======================================================

/// Pauses the session for the duration of a modal event.
///
/// Starting an already active gate changes nothing, including the state
/// captured when it was first activated; only `end` releases it. The
/// gate only starts from `Playing`, so a pause the player made by hand is
/// never resumed by `end`.
pub struct ModalEventGate {
    machine: Rc<StateMachine>,
    active: bool,
    captured: Option<GameState>,
    releases: Vec<PendingRelease>,
}

impl ModalEventGate {
    //--- Construction -----------------------------------------------------

    pub fn new(machine: Rc<StateMachine>) -> Self {
        Self {
            machine,
            active: false,
            captured: None,
            releases: Vec::new(),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// State the session was in when the current activation began.
    /// `None` while inactive.
    pub fn captured_state(&self) -> Option<GameState> {
        self.captured
    }

    /// Number of timed releases still waiting.
    pub fn pending_releases(&self) -> usize {
        self.releases.len()
    }

    //--- Activation -------------------------------------------------------

    /// Enters event mode and holds the session in `Paused`.
    pub fn start(&mut self) {
        if self.active {
            debug!(target: "modal", "Event already playing, start ignored");
            return;
        }

        let current = self.machine.current_state();
        if current != GameState::Playing {
            debug!(target: "modal", "Event start ignored in {}", current);
            return;
        }

        self.active = true;
        self.captured = Some(current);
        self.machine.pause_game();
        self.machine.hold();

        info!(target: "modal", "Event started, game paused (was {})", self.machine.previous_state());
    }

    /// Leaves event mode and resumes the session.
    ///
    /// Timed releases belonging to this activation are discarded.
    pub fn end(&mut self) {
        if !self.active {
            debug!(target: "modal", "No event playing, end ignored");
            return;
        }

        self.active = false;
        self.captured = None;
        self.releases.clear();
        self.machine.release_hold();
        self.machine.resume_game();

        info!(target: "modal", "Event ended, game resumed");
    }

    //--- Timed Events -----------------------------------------------------

    /// Starts event mode and schedules its end `duration` after `now`.
    ///
    /// The returned token belongs to the caller: cancelling or dropping
    /// it ends the event at the next [`update`](Self::update). When the
    /// gate could not start, the token is returned unattached and does
    /// nothing.
    pub fn run_for(&mut self, duration: Duration, now: Instant) -> CutsceneToken {
        self.start();

        let (release, token) = PendingRelease::new(now + duration);
        if self.active {
            self.releases.push(release);
            debug!(target: "modal", "Cutscene scheduled for {:?}", duration);
        }
        token
    }

    /// Ends event mode if any scheduled release is due.
    pub fn update(&mut self, now: Instant) {
        if self.releases.is_empty() {
            return;
        }

        let mut fired = None;
        self.releases.retain_mut(|release| match release.poll(now) {
            Some(reason) => {
                fired.get_or_insert(reason);
                false
            }
            None => true,
        });

        if let Some(reason) = fired {
            debug!(target: "modal", "Cutscene release: {:?}", reason);
            self.end();
        }
    }
}

impl std::fmt::Debug for ModalEventGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalEventGate")
            .field("active", &self.active)
            .field("captured", &self.captured)
            .field("pending_releases", &self.releases.len())
            .finish()
    }
}

impl Drop for ModalEventGate {
    fn drop(&mut self) {
        if self.active {
            info!(target: "modal", "Gate dropped while active, releasing");
            self.end();
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::{EventBus, EventChannel, Subscription};
    use std::cell::RefCell;

    struct Harness {
        machine: Rc<StateMachine>,
        gate: ModalEventGate,
        pauses: Rc<RefCell<u32>>,
        resumes: Rc<RefCell<u32>>,
        _subs: [Subscription; 2],
    }

    /// Gate over a machine that is already `Playing`.
    fn playing() -> Harness {
        let bus = EventBus::new();
        let machine = Rc::new(StateMachine::new(bus.clone()));
        machine.change_state(GameState::Playing);

        let pauses = Rc::new(RefCell::new(0));
        let resumes = Rc::new(RefCell::new(0));
        let p = Rc::clone(&pauses);
        let r = Rc::clone(&resumes);
        let subs = [
            bus.subscribe(EventChannel::GamePaused, move |_| *p.borrow_mut() += 1),
            bus.subscribe(EventChannel::GameResumed, move |_| *r.borrow_mut() += 1),
        ];

        Harness {
            gate: ModalEventGate::new(Rc::clone(&machine)),
            machine,
            pauses,
            resumes,
            _subs: subs,
        }
    }

    //=====================================================================
    // Start / End
    //=====================================================================

    #[test]
    fn start_pauses_and_captures() {
        let mut h = playing();

        h.gate.start();

        assert!(h.gate.is_active());
        assert_eq!(h.gate.captured_state(), Some(GameState::Playing));
        assert_eq!(h.machine.current_state(), GameState::Paused);
        assert_eq!(*h.pauses.borrow(), 1);
    }

    #[test]
    fn nested_start_then_end_resumes_once() {
        let mut h = playing();

        h.gate.start();
        h.gate.start();
        assert_eq!(h.gate.captured_state(), Some(GameState::Playing));
        assert_eq!(*h.pauses.borrow(), 1);

        h.gate.end();
        assert!(!h.gate.is_active());
        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert_eq!(*h.resumes.borrow(), 1);

        // Stray end afterwards is a no-op.
        h.gate.end();
        assert_eq!(*h.resumes.borrow(), 1);
        assert_eq!(h.machine.current_state(), GameState::Playing);
    }

    #[test]
    fn end_without_start_is_noop() {
        let mut h = playing();

        h.gate.end();

        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert_eq!(*h.resumes.borrow(), 0);
    }

    #[test]
    fn start_outside_playing_is_noop() {
        let mut h = playing();
        h.machine.go_to_main_menu();

        h.gate.start();

        assert!(!h.gate.is_active());
        assert_eq!(h.gate.captured_state(), None);
        assert_eq!(h.machine.current_state(), GameState::Menu);
        assert!(!h.machine.is_held());
        assert_eq!(*h.pauses.borrow(), 0);
    }

    #[test]
    fn player_pause_is_not_resumed_by_event() {
        let mut h = playing();
        h.machine.pause_game();

        h.gate.start();
        h.gate.end();

        assert_eq!(h.machine.current_state(), GameState::Paused);
        assert_eq!(*h.resumes.borrow(), 0);
    }

    #[test]
    fn active_gate_refuses_outside_resume() {
        let mut h = playing();
        h.gate.start();

        h.machine.resume_game();
        h.machine.toggle_pause();

        assert_eq!(h.machine.current_state(), GameState::Paused);
        assert!(h.machine.is_held());
        assert_eq!(*h.resumes.borrow(), 0);

        h.gate.end();
        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert!(!h.machine.is_held());
    }

    #[test]
    fn run_for_outside_playing_schedules_nothing() {
        let mut h = playing();
        h.machine.go_to_main_menu();
        let t0 = Instant::now();

        let token = h.gate.run_for(Duration::from_secs(1), t0);

        assert!(!h.gate.is_active());
        assert_eq!(h.gate.pending_releases(), 0);
        token.cancel();
        h.gate.update(t0 + Duration::from_secs(2));
        assert_eq!(h.machine.current_state(), GameState::Menu);
    }

    //=====================================================================
    // Timed Release
    //=====================================================================

    #[test]
    fn run_for_ends_at_deadline() {
        let mut h = playing();
        let t0 = Instant::now();

        let token = h.gate.run_for(Duration::from_secs(3), t0);
        h.gate.update(t0 + Duration::from_secs(1));
        assert!(h.gate.is_active());

        h.gate.update(t0 + Duration::from_secs(3));
        assert!(!h.gate.is_active());
        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert_eq!(h.gate.pending_releases(), 0);

        token.cancel();
    }

    #[test]
    fn cancelled_token_releases_early() {
        let mut h = playing();
        let t0 = Instant::now();

        let token = h.gate.run_for(Duration::from_secs(30), t0);
        token.cancel();
        h.gate.update(t0);

        assert!(!h.gate.is_active());
        assert_eq!(*h.resumes.borrow(), 1);
    }

    #[test]
    fn dropped_token_still_releases() {
        let mut h = playing();
        let t0 = Instant::now();

        drop(h.gate.run_for(Duration::from_secs(30), t0));
        h.gate.update(t0);

        assert!(!h.gate.is_active());
        assert_eq!(h.machine.current_state(), GameState::Playing);
    }

    #[test]
    fn detached_token_runs_full_duration() {
        let mut h = playing();
        let t0 = Instant::now();

        h.gate.run_for(Duration::from_secs(2), t0).detach();
        h.gate.update(t0 + Duration::from_secs(1));
        assert!(h.gate.is_active());

        h.gate.update(t0 + Duration::from_secs(2));
        assert!(!h.gate.is_active());
    }

    #[test]
    fn manual_end_discards_pending_release() {
        let mut h = playing();
        let t0 = Instant::now();

        h.gate.run_for(Duration::from_secs(5), t0).detach();
        h.gate.end();
        assert_eq!(h.gate.pending_releases(), 0);

        // A new activation is not ended by the old deadline.
        h.gate.start();
        h.gate.update(t0 + Duration::from_secs(6));
        assert!(h.gate.is_active());
    }

    #[test]
    fn dropping_active_gate_resumes() {
        let h = playing();
        let Harness { machine, mut gate, resumes, _subs, .. } = h;

        gate.start();
        drop(gate);

        assert_eq!(machine.current_state(), GameState::Playing);
        assert_eq!(*resumes.borrow(), 1);
    }
}
