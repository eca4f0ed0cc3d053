//=========================================================================
// Subscriber List
//=========================================================================
//
// Ordered per-channel handler storage.
//
// Handlers are reference counted so a publish can snapshot the list and
// release the bus borrow before invoking anything. That lets handlers
// subscribe, unsubscribe and publish while being called.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::GameEvent;

//=== Types ===============================================================

/// Identifier handed out per subscription. Never reused within a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(super) u64);

pub(super) type SharedHandler = Rc<RefCell<dyn FnMut(&GameEvent)>>;

struct Entry {
    id: SubscriptionId,
    handler: SharedHandler,
}

//=== SubscriberList ======================================================

/// Handlers of a single channel in registration order.
#[derive(Default)]
pub(super) struct SubscriberList {
    entries: Vec<Entry>,
}

impl SubscriberList {
    pub(super) fn push(&mut self, id: SubscriptionId, handler: SharedHandler) {
        self.entries.push(Entry { id, handler });
    }

    /// Removes the handler with `id` and hands it back so the caller can
    /// drop it outside of any bus borrow.
    pub(super) fn remove(&mut self, id: SubscriptionId) -> Option<SharedHandler> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        // Order of the remaining handlers must be kept.
        Some(self.entries.remove(index).handler)
    }

    /// Clones the current handlers so they can be invoked without
    /// holding a borrow of the list.
    pub(super) fn snapshot(&self) -> Vec<(SubscriptionId, SharedHandler)> {
        self.entries
            .iter()
            .map(|e| (e.id, Rc::clone(&e.handler)))
            .collect()
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> SharedHandler {
        Rc::new(RefCell::new(|_: &GameEvent| {}))
    }

    #[test]
    fn remove_keeps_order_of_remaining() {
        let mut list = SubscriberList::default();
        list.push(SubscriptionId(1), noop());
        list.push(SubscriptionId(2), noop());
        list.push(SubscriptionId(3), noop());

        assert!(list.remove(SubscriptionId(2)).is_some());

        let ids: Vec<_> = list.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![SubscriptionId(1), SubscriptionId(3)]);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut list = SubscriberList::default();
        list.push(SubscriptionId(1), noop());

        assert!(list.remove(SubscriptionId(7)).is_none());
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
    }
}
