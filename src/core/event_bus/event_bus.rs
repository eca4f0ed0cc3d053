//=========================================================================
// Event Bus
//=========================================================================
//
// Synchronous publish/subscribe fan-out between game subsystems.
//
// Architecture:
//   subscribe(channel, handler) → HashMap<EventChannel, SubscriberList>
//                                        ↓
//   publish(event) ─ snapshot list ─→ handler(&event) × N (in order)
//                                        ↓
//   Subscription dropped ─────────→ handler removed
//
// The bus is a cheap handle (`Clone`) around shared, single-threaded
// storage. Delivery happens on the caller's turn; nothing is queued.
// A panicking handler is contained and logged so the remaining handlers
// of the same publish still run.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use log::{error, trace, warn};

//=== Internal Dependencies ===============================================

use super::subscribers::{SharedHandler, SubscriberList, SubscriptionId};
use super::{EventChannel, GameEvent};

//=== Bus Storage =========================================================

#[derive(Default)]
struct BusInner {
    channels: HashMap<EventChannel, SubscriberList>,
    next_id: u64,
}

//=== EventBus ============================================================

/// Channel-keyed publish/subscribe hub.
///
/// Cloning an `EventBus` yields another handle to the same subscriber
/// set. The bus lives on one logical thread and is not `Send`.
///
/// # Example
///
/// ```rust
/// use game_flow::prelude::*;
///
/// let bus = EventBus::new();
/// let _sub = bus.subscribe(EventChannel::SceneChanged, |event| {
///     if let GameEvent::SceneChanged(scene) = event {
///         println!("loaded {scene}");
///     }
/// });
///
/// bus.publish(GameEvent::SceneChanged("Level1".into()));
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `handler` for `channel`.
    ///
    /// The handler stays installed until the returned [`Subscription`]
    /// is dropped or cancelled. Handlers run in registration order.
    pub fn subscribe<F>(&self, channel: EventChannel, handler: F) -> Subscription
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let handler: SharedHandler = Rc::new(RefCell::new(handler));

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriptionId(inner.next_id);
            inner.next_id += 1;
            inner.channels.entry(channel).or_default().push(id, handler);
            id
        };

        trace!(target: "event_bus", "Subscribed {:?} to {:?}", id, channel);

        Subscription {
            bus: Rc::downgrade(&self.inner),
            channel,
            id,
            attached: true,
        }
    }

    /// Removes a handler. Returns `false` (and does nothing) if `id` is
    /// not registered on `channel`.
    pub fn unsubscribe(&self, channel: EventChannel, id: SubscriptionId) -> bool {
        remove_handler(&self.inner, channel, id)
    }

    //--- Publishing -------------------------------------------------------

    /// Delivers `event` to every handler registered on its channel at the
    /// moment of the call.
    ///
    /// Handlers added during delivery are not invoked by this publish.
    /// A handler that is already running further up the call stack is
    /// skipped for the nested delivery.
    pub fn publish(&self, event: GameEvent) {
        let channel = event.channel();

        let handlers = match self.inner.borrow().channels.get(&channel) {
            Some(list) => list.snapshot(),
            None => Vec::new(),
        };

        if handlers.is_empty() {
            trace!(target: "event_bus", "No subscribers for {:?}", channel);
            return;
        }

        trace!(
            target: "event_bus",
            "Publishing {:?} to {} subscriber(s)",
            channel,
            handlers.len()
        );

        for (id, handler) in handlers {
            let Ok(mut callback) = handler.try_borrow_mut() else {
                warn!(
                    target: "event_bus",
                    "Subscriber {:?} on {:?} is already running, skipping nested delivery",
                    id,
                    channel
                );
                continue;
            };

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (&mut *callback)(&event)));

            if let Err(payload) = outcome {
                error!(
                    target: "event_bus",
                    "Subscriber {:?} on {:?} panicked: {}",
                    id,
                    channel,
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    //--- Query API --------------------------------------------------------

    /// Number of handlers currently registered on `channel`.
    pub fn subscriber_count(&self, channel: EventChannel) -> usize {
        self.inner
            .borrow()
            .channels
            .get(&channel)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Returns true if at least one handler listens on `channel`.
    pub fn has_subscribers(&self, channel: EventChannel) -> bool {
        self.inner
            .borrow()
            .channels
            .get(&channel)
            .map(|list| !list.is_empty())
            .unwrap_or(false)
    }
}

//=== Subscription ========================================================

/// Registration handle returned by [`EventBus::subscribe`].
///
/// Dropping it unsubscribes the handler. The handle only weakly refers
/// to the bus, so it never keeps the bus alive.
#[must_use = "dropping a Subscription immediately unsubscribes its handler"]
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    channel: EventChannel,
    id: SubscriptionId,
    attached: bool,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn channel(&self) -> EventChannel {
        self.channel
    }

    /// Unsubscribes now. Same as dropping the handle.
    pub fn cancel(self) {}

    /// Leaves the handler installed for as long as the bus lives.
    pub fn detach(mut self) {
        self.attached = false;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.attached {
            return;
        }
        if let Some(inner) = self.bus.upgrade() {
            remove_handler(&inner, self.channel, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .field("attached", &self.attached)
            .finish()
    }
}

//=== Internal Helpers ====================================================

fn remove_handler(inner: &Rc<RefCell<BusInner>>, channel: EventChannel, id: SubscriptionId) -> bool {
    let removed = match inner.try_borrow_mut() {
        Ok(mut bus) => bus
            .channels
            .get_mut(&channel)
            .and_then(|list| list.remove(id)),
        Err(_) => {
            warn!(target: "event_bus", "Bus busy, could not unsubscribe {:?}", id);
            None
        }
    };

    // `removed` drops here, after the borrow is released, in case the
    // handler owns subscriptions of its own.
    match removed {
        Some(_) => {
            trace!(target: "event_bus", "Unsubscribed {:?} from {:?}", id, channel);
            true
        }
        None => false,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

//=========================================================================
// Tests
//=========================================================================
