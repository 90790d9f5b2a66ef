// Real-time room fan-out: the event union, the per-room registry and the
// publish/subscribe bus built on top of it.

// Public API - what other modules can use
pub use bus::{EventBus, Subscriber, Subscription};
pub use events::{AuthorRef, BrainstormEvent, MessagePayload};
pub use registry::{RoomRegistry, SubscriberId};

// Internal modules
mod bus;
mod events;
mod registry;
