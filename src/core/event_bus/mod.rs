//=========================================================================
// Event Bus System
//=========================================================================
//
// Channel-tagged notifications between the state machine, scene policy,
// modal gate, settings store and game code.
//
// Architecture:
//   EventBus
//     └─ channels: HashMap<EventChannel, SubscriberList>
//
// Flow:
//   publish(GameEvent) → event.channel() → handlers (registration order)
//
//=========================================================================

//=== Module Declarations =================================================

mod event;
mod event_bus;
mod subscribers;

//=== Public API ==========================================================

pub use event::{EventChannel, GameEvent, VolumeKind};
pub use event_bus::{EventBus, Subscription};
pub use subscribers::SubscriptionId;
