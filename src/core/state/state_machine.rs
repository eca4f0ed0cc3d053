//=========================================================================
// State Machine
//=========================================================================
//
// Owns the session's current/previous GameState and the guard table
// deciding which operations take effect.
//
// Guard table (anything not listed is a silent no-op):
// ```text
//   Menu     ──start_game──>   Playing
//   Playing  ──pause_game──>   Paused
//   Paused   ──resume_game──>  Playing
//   (any)    ──game_over──>    GameOver
//   (any)    ──go_to_main_menu──> Menu
//   (any)    ──restart_game──> Playing   (stats reset)
//   (any)    ──start_game──>   Playing   (stats reset, GameResumed)
// ```
//
// While a modal hold is set (see `ModalEventGate`) the machine stays in
// Paused: every operation except pausing is ignored until the hold is
// released.
//
// Every mutation of the current state goes through `transition()`,
// which enforces "same state = no-op" and publishes `StateChanged`.
//
// Operations requested from inside an event handler are queued and run
// once the operation being dispatched has finished (run to completion),
// so observers never see two transitions interleave.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::time::Duration;

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::request_queue::{RequestQueue, StateRequest};
use super::{GameState, Transition};
use crate::core::event_bus::{EventBus, GameEvent};

//=== SessionStats ========================================================

/// Ephemeral per-session statistics, zeroed by `start_game` and
/// `restart_game`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStats {
    /// Time spent actually playing (not paused).
    pub elapsed: Duration,

    /// Accumulated score.
    pub score: u64,
}

//=== StateMachine ========================================================

/// Session state machine.
///
/// Methods take `&self` so the machine can be shared (`Rc`) with event
/// handlers that request transitions of their own.
pub struct StateMachine {
    current: Cell<GameState>,
    previous: Cell<GameState>,
    paused: Cell<bool>,
    held: Cell<bool>,
    stats: Cell<SessionStats>,
    requests: RefCell<RequestQueue>,
    dispatching: Cell<bool>,
    bus: EventBus,
}

impl StateMachine {
    //--- Construction -----------------------------------------------------

    /// Creates a machine in [`GameState::Menu`] publishing on `bus`.
    pub fn new(bus: EventBus) -> Self {
        Self {
            current: Cell::new(GameState::Menu),
            previous: Cell::new(GameState::Menu),
            paused: Cell::new(false),
            held: Cell::new(false),
            stats: Cell::new(SessionStats::default()),
            requests: RefCell::new(RequestQueue::default()),
            dispatching: Cell::new(false),
            bus,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn current_state(&self) -> GameState {
        self.current.get()
    }

    pub fn previous_state(&self) -> GameState {
        self.previous.get()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// True while in `Playing` and not paused.
    pub fn is_playing(&self) -> bool {
        self.current.get() == GameState::Playing && !self.paused.get()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.get()
    }

    /// True while a modal event pins the session in `Paused`.
    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    //--- Operations -------------------------------------------------------

    /// Moves to `new_state`. No-op if already there.
    pub fn change_state(&self, new_state: GameState) {
        self.submit(StateRequest::Change(new_state));
    }

    /// Pauses gameplay. Only takes effect from `Playing`.
    pub fn pause_game(&self) {
        self.submit(StateRequest::Pause);
    }

    /// Resumes gameplay. Only takes effect from `Paused`.
    pub fn resume_game(&self) {
        self.submit(StateRequest::Resume);
    }

    /// Begins a session: zeroes stats, enters `Playing` and publishes
    /// `GameResumed`, from any state.
    pub fn start_game(&self) {
        self.submit(StateRequest::Start);
    }

    /// Zeroes stats and enters `Playing` without a `GameResumed` event.
    pub fn restart_game(&self) {
        self.submit(StateRequest::Restart);
    }

    pub fn game_over(&self) {
        self.submit(StateRequest::GameOver);
    }

    pub fn go_to_main_menu(&self) {
        self.submit(StateRequest::MainMenu);
    }

    /// Escape/Back behavior: pauses from `Playing`, resumes from
    /// `Paused`, ignored otherwise.
    pub fn toggle_pause(&self) {
        match self.current.get() {
            GameState::Playing => self.pause_game(),
            GameState::Paused => self.resume_game(),
            other => trace!(target: "state", "Pause toggle ignored in {}", other),
        }
    }

    //--- Modal Hold -------------------------------------------------------

    /// Pins the session in `Paused` until [`release_hold`](Self::release_hold).
    pub(crate) fn hold(&self) {
        self.submit(StateRequest::Hold(true));
    }

    pub(crate) fn release_hold(&self) {
        self.submit(StateRequest::Hold(false));
    }

    //--- Session Stats ----------------------------------------------------

    /// Advances play time by `dt` while [`is_playing`](Self::is_playing).
    pub fn tick(&self, dt: Duration) {
        if self.is_playing() {
            let mut stats = self.stats.get();
            stats.elapsed += dt;
            self.stats.set(stats);
        }
    }

    /// Adds to the score and publishes the new total.
    pub fn add_score(&self, points: u64) {
        let mut stats = self.stats.get();
        stats.score = stats.score.saturating_add(points);
        self.stats.set(stats);
        self.bus.publish(GameEvent::ScoreChanged(stats.score));
    }

    //--- Dispatch ---------------------------------------------------------

    fn submit(&self, request: StateRequest) {
        self.requests.borrow_mut().push(request);

        if self.dispatching.get() {
            debug!(target: "state", "Deferred {:?} until current dispatch completes", request);
            return;
        }

        let _guard = DispatchGuard::enter(&self.dispatching);
        loop {
            let next = self.requests.borrow_mut().pop();
            match next {
                Some(request) => self.execute(request),
                None => break,
            }
        }
    }

    fn execute(&self, request: StateRequest) {
        if self.held.get() && !matches!(request, StateRequest::Pause | StateRequest::Hold(_)) {
            debug!(target: "state", "{:?} ignored while a modal event holds the session", request);
            return;
        }

        match request {
            StateRequest::Hold(held) => {
                self.held.set(held);
            }

            StateRequest::Change(state) => {
                self.transition(state);
            }

            StateRequest::Pause => {
                if self.current.get() != GameState::Playing {
                    trace!(target: "state", "Pause ignored in {}", self.current.get());
                    return;
                }
                self.paused.set(true);
                self.transition(GameState::Paused);
                self.bus.publish(GameEvent::GamePaused);
            }

            StateRequest::Resume => {
                if self.current.get() != GameState::Paused {
                    trace!(target: "state", "Resume ignored in {}", self.current.get());
                    return;
                }
                self.paused.set(false);
                self.transition(GameState::Playing);
                self.bus.publish(GameEvent::GameResumed);
            }

            StateRequest::Start => {
                self.reset_stats();
                self.transition(GameState::Playing);
                self.bus.publish(GameEvent::GameResumed);
            }

            StateRequest::Restart => {
                self.reset_stats();
                self.transition(GameState::Playing);
            }

            StateRequest::GameOver => {
                self.transition(GameState::GameOver);
            }

            StateRequest::MainMenu => {
                self.transition(GameState::Menu);
            }
        }
    }

    /// Sole mutation path of the current state.
    fn transition(&self, to: GameState) -> bool {
        let from = self.current.get();
        if from == to {
            return false;
        }

        self.previous.set(from);
        self.current.set(to);

        // Leaving Paused by any route clears the pause flag.
        if to != GameState::Paused {
            self.paused.set(false);
        }

        let transition = Transition::new(from, to);
        info!(target: "state", "Game state changed: {}", transition);
        self.bus.publish(GameEvent::StateChanged(transition));
        true
    }

    fn reset_stats(&self) {
        self.stats.set(SessionStats::default());
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current.get())
            .field("previous", &self.previous.get())
            .field("paused", &self.paused.get())
            .field("held", &self.held.get())
            .field("stats", &self.stats.get())
            .finish()
    }
}

//=== DispatchGuard =======================================================

/// Holds the dispatching flag for the duration of a dispatch loop.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::{EventChannel, Subscription};
    use std::rc::Rc;

    const SESSION_CHANNELS: [EventChannel; 4] = [
        EventChannel::StateChanged,
        EventChannel::GamePaused,
        EventChannel::GameResumed,
        EventChannel::ScoreChanged,
    ];

    /// Machine plus a log of every session event it published.
    struct Harness {
        machine: Rc<StateMachine>,
        events: Rc<RefCell<Vec<GameEvent>>>,
        bus: EventBus,
        _subs: Vec<Subscription>,
    }

    impl Harness {
        fn new() -> Self {
            let bus = EventBus::new();
            let events = Rc::new(RefCell::new(Vec::new()));
            let subs = SESSION_CHANNELS
                .iter()
                .map(|&channel| {
                    let sink = Rc::clone(&events);
                    bus.subscribe(channel, move |e| sink.borrow_mut().push(e.clone()))
                })
                .collect();
            Self {
                machine: Rc::new(StateMachine::new(bus.clone())),
                events,
                bus,
                _subs: subs,
            }
        }

        /// Puts the machine in `state` and forgets the events it took.
        fn at(state: GameState) -> Self {
            let h = Self::new();
            match state {
                GameState::Paused => {
                    h.machine.start_game();
                    h.machine.pause_game();
                }
                other => h.machine.change_state(other),
            }
            assert_eq!(h.machine.current_state(), state);
            h.events.borrow_mut().clear();
            h
        }

        fn events(&self) -> Vec<GameEvent> {
            self.events.borrow().clone()
        }
    }

    fn changed(from: GameState, to: GameState) -> GameEvent {
        GameEvent::StateChanged(Transition::new(from, to))
    }

    //=====================================================================
    // Initial State
    //=====================================================================

    #[test]
    fn starts_in_menu() {
        let machine = StateMachine::new(EventBus::new());
        assert_eq!(machine.current_state(), GameState::Menu);
        assert_eq!(machine.previous_state(), GameState::Menu);
        assert!(!machine.is_paused());
        assert!(!machine.is_playing());
        assert_eq!(machine.stats(), SessionStats::default());
    }

    //=====================================================================
    // change_state
    //=====================================================================

    #[test]
    fn change_state_to_same_state_is_silent_noop() {
        for state in GameState::ALL {
            let h = Harness::at(state);
            let previous = h.machine.previous_state();

            h.machine.change_state(state);

            assert!(h.events().is_empty(), "{} -> {} published", state, state);
            assert_eq!(h.machine.previous_state(), previous);
            assert_eq!(h.machine.current_state(), state);
        }
    }

    #[test]
    fn change_state_records_previous_and_publishes() {
        let h = Harness::new();

        h.machine.change_state(GameState::Loading);

        assert_eq!(h.machine.current_state(), GameState::Loading);
        assert_eq!(h.machine.previous_state(), GameState::Menu);
        assert_eq!(h.events(), vec![changed(GameState::Menu, GameState::Loading)]);
    }

    #[test]
    fn observers_see_updated_state_during_notification() {
        let h = Harness::new();
        let seen = Rc::new(Cell::new(None));

        let machine = Rc::clone(&h.machine);
        let slot = Rc::clone(&seen);
        let _sub = h.bus.subscribe(EventChannel::StateChanged, move |_| {
            slot.set(Some((machine.previous_state(), machine.current_state())));
        });

        h.machine.change_state(GameState::Loading);

        assert_eq!(seen.get(), Some((GameState::Menu, GameState::Loading)));
    }

    //=====================================================================
    // Pause / Resume Guards
    //=====================================================================

    #[test]
    fn pause_from_playing() {
        let h = Harness::at(GameState::Playing);

        h.machine.pause_game();

        assert_eq!(h.machine.current_state(), GameState::Paused);
        assert!(h.machine.is_paused());
        assert!(!h.machine.is_playing());
        assert_eq!(
            h.events(),
            vec![changed(GameState::Playing, GameState::Paused), GameEvent::GamePaused]
        );
    }

    #[test]
    fn pause_outside_playing_is_noop() {
        for state in [GameState::Menu, GameState::Paused, GameState::GameOver, GameState::Loading] {
            let h = Harness::at(state);
            let paused_before = h.machine.is_paused();

            h.machine.pause_game();

            assert_eq!(h.machine.current_state(), state);
            assert_eq!(h.machine.is_paused(), paused_before);
            assert!(h.events().is_empty(), "pause from {} published", state);
        }
    }

    #[test]
    fn resume_from_paused() {
        let h = Harness::at(GameState::Paused);

        h.machine.resume_game();

        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert!(h.machine.is_playing());
        assert_eq!(
            h.events(),
            vec![changed(GameState::Paused, GameState::Playing), GameEvent::GameResumed]
        );
    }

    #[test]
    fn resume_outside_paused_is_noop() {
        for state in [GameState::Menu, GameState::Playing, GameState::GameOver, GameState::Loading] {
            let h = Harness::at(state);

            h.machine.resume_game();

            assert_eq!(h.machine.current_state(), state);
            assert!(h.events().is_empty(), "resume from {} published", state);
        }
    }

    #[test]
    fn toggle_pause_flips_between_playing_and_paused() {
        let h = Harness::at(GameState::Playing);

        h.machine.toggle_pause();
        assert_eq!(h.machine.current_state(), GameState::Paused);

        h.machine.toggle_pause();
        assert_eq!(h.machine.current_state(), GameState::Playing);
    }

    #[test]
    fn toggle_pause_ignored_in_menu() {
        let h = Harness::new();
        h.machine.toggle_pause();
        assert_eq!(h.machine.current_state(), GameState::Menu);
        assert!(h.events().is_empty());
    }

    //=====================================================================
    // Session Operations
    //=====================================================================

    #[test]
    fn start_game_from_game_over_resets_stats_and_orders_events() {
        let h = Harness::at(GameState::Playing);
        h.machine.add_score(40);
        h.machine.tick(Duration::from_secs(3));
        h.machine.game_over();
        h.events.borrow_mut().clear();

        h.machine.start_game();

        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert_eq!(h.machine.stats(), SessionStats::default());
        assert_eq!(
            h.events(),
            vec![changed(GameState::GameOver, GameState::Playing), GameEvent::GameResumed]
        );
    }

    #[test]
    fn start_game_while_playing_still_signals_resume() {
        let h = Harness::at(GameState::Playing);

        h.machine.start_game();

        assert_eq!(h.events(), vec![GameEvent::GameResumed]);
    }

    #[test]
    fn restart_game_does_not_publish_resume() {
        let h = Harness::at(GameState::GameOver);

        h.machine.restart_game();

        assert_eq!(h.machine.current_state(), GameState::Playing);
        assert_eq!(h.events(), vec![changed(GameState::GameOver, GameState::Playing)]);
    }

    #[test]
    fn restart_from_paused_clears_pause_flag() {
        let h = Harness::at(GameState::Paused);

        h.machine.restart_game();

        assert!(!h.machine.is_paused());
        assert!(h.machine.is_playing());
    }

    #[test]
    fn game_over_reachable_from_every_other_state() {
        for state in [GameState::Menu, GameState::Playing, GameState::Paused, GameState::Loading] {
            let h = Harness::at(state);

            h.machine.game_over();

            assert_eq!(h.machine.current_state(), GameState::GameOver);
            assert_eq!(h.machine.previous_state(), state);
            assert!(!h.machine.is_paused());
        }
    }

    #[test]
    fn main_menu_from_paused() {
        let h = Harness::at(GameState::Paused);

        h.machine.go_to_main_menu();

        assert_eq!(h.machine.current_state(), GameState::Menu);
        assert!(!h.machine.is_paused());
    }

    //=====================================================================
    // Stats
    //=====================================================================

    #[test]
    fn tick_counts_only_while_playing() {
        let h = Harness::at(GameState::Playing);

        h.machine.tick(Duration::from_millis(500));
        h.machine.pause_game();
        h.machine.tick(Duration::from_millis(500));
        h.machine.resume_game();
        h.machine.tick(Duration::from_millis(250));

        assert_eq!(h.machine.stats().elapsed, Duration::from_millis(750));
    }

    #[test]
    fn add_score_publishes_total() {
        let h = Harness::new();

        h.machine.add_score(10);
        h.machine.add_score(5);

        assert_eq!(h.machine.stats().score, 15);
        assert_eq!(
            h.events(),
            vec![GameEvent::ScoreChanged(10), GameEvent::ScoreChanged(15)]
        );
    }

    //=====================================================================
    // Run To Completion
    //=====================================================================

    #[test]
    fn request_from_handler_runs_after_current_operation() {
        let h = Harness::at(GameState::Playing);

        // Pausing immediately triggers a game over from a StateChanged
        // observer; GamePaused must still precede the second transition.
        let machine = Rc::clone(&h.machine);
        let _sub = h.bus.subscribe(EventChannel::StateChanged, move |event| {
            if let GameEvent::StateChanged(t) = event {
                if t.to == GameState::Paused {
                    machine.game_over();
                }
            }
        });

        h.machine.pause_game();

        assert_eq!(h.machine.current_state(), GameState::GameOver);
        assert_eq!(h.machine.previous_state(), GameState::Paused);
        assert_eq!(
            h.events(),
            vec![
                changed(GameState::Playing, GameState::Paused),
                GameEvent::GamePaused,
                changed(GameState::Paused, GameState::GameOver),
            ]
        );
    }

    #[test]
    fn deferred_guards_use_state_at_execution_time() {
        let h = Harness::at(GameState::Playing);

        // Both requests are queued during the Loading notification; the
        // pause sees Menu by the time it runs and is dropped.
        let machine = Rc::clone(&h.machine);
        let _sub = h.bus.subscribe(EventChannel::StateChanged, move |event| {
            if let GameEvent::StateChanged(t) = event {
                if t.to == GameState::Loading {
                    machine.go_to_main_menu();
                    machine.pause_game();
                }
            }
        });

        h.machine.change_state(GameState::Loading);

        assert_eq!(h.machine.current_state(), GameState::Menu);
        assert!(!h.machine.is_paused());
    }

    //=====================================================================
    // Modal Hold
    //=====================================================================

    #[test]
    fn held_session_stays_paused() {
        let h = Harness::at(GameState::Paused);
        h.machine.hold();

        h.machine.resume_game();
        h.machine.toggle_pause();
        h.machine.start_game();
        h.machine.restart_game();
        h.machine.game_over();
        h.machine.change_state(GameState::Menu);

        assert!(h.machine.is_held());
        assert_eq!(h.machine.current_state(), GameState::Paused);
        assert!(h.machine.is_paused());
        assert!(h.events().is_empty());
    }

    #[test]
    fn released_hold_allows_resume() {
        let h = Harness::at(GameState::Paused);
        h.machine.hold();

        h.machine.release_hold();
        h.machine.resume_game();

        assert!(!h.machine.is_held());
        assert!(h.machine.is_playing());
    }

    #[test]
    fn hold_requested_from_handler_runs_after_queued_pause() {
        let h = Harness::new();

        let machine = Rc::clone(&h.machine);
        let _sub = h.bus.subscribe(EventChannel::StateChanged, move |event| {
            if let GameEvent::StateChanged(t) = event {
                if t.to == GameState::Playing {
                    machine.pause_game();
                    machine.hold();
                }
            }
        });

        h.machine.change_state(GameState::Playing);
        h.machine.resume_game();

        assert_eq!(h.machine.current_state(), GameState::Paused);
        assert!(h.machine.is_held());
    }
}
