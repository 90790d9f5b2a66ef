use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::events::BrainstormEvent;
use super::registry::{RoomRegistry, SubscriberId};

/// One open connection's capacity to receive room events.
///
/// `deliver` must not block: it only hands the event to the connection's own
/// outbound plumbing (typically an unbounded channel drained by the stream).
/// Failures are the owning adapter's problem; the bus never retries and a
/// failing subscriber must never disturb delivery to the others.
pub trait Subscriber: Send + Sync {
    fn deliver(&self, event: &BrainstormEvent);
}

/// Publish/subscribe surface for brainstorm rooms
///
/// Cheap to clone; all clones share one registry. Constructed once at process
/// start and injected through `AppState`, not reached through a global.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<RoomRegistry>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
        }
    }

    /// Attach a subscriber to a room.
    ///
    /// Increments the room's connection count and synchronously broadcasts a
    /// `presence` event with the new count to every subscriber in the room,
    /// the newcomer included. Returns a handle that detaches on
    /// [`Subscription::unsubscribe`] or on drop, whichever comes first.
    ///
    /// Room ids are caller-controlled opaque strings; whether a persisted
    /// room exists under that id is the data store's concern, not the bus's.
    pub fn subscribe(&self, room_id: &str, subscriber: Arc<dyn Subscriber>) -> Subscription {
        let (id, connections, snapshot) = self.registry.add_subscriber(room_id, subscriber);

        let presence = BrainstormEvent::Presence {
            room_id: room_id.to_string(),
            connections,
        };
        for subscriber in &snapshot {
            subscriber.deliver(&presence);
        }

        Subscription {
            registry: Arc::clone(&self.registry),
            room_id: room_id.to_string(),
            subscriber_id: id,
            active: AtomicBool::new(true),
        }
    }

    /// Fan an event out to every current subscriber of a room, in the order
    /// they attached. Fire-and-forget: a room with no subscribers drops the
    /// event silently, since the message itself is already persisted by the
    /// data store before publish is ever called.
    pub fn publish(&self, room_id: &str, event: &BrainstormEvent) {
        let snapshot = match self.registry.subscribers(room_id) {
            Some(snapshot) => snapshot,
            None => {
                debug!(room_id = %room_id, event_type = event.event_type(), "No subscribers, event dropped");
                return;
            }
        };

        debug!(
            room_id = %room_id,
            event_type = event.event_type(),
            receivers = snapshot.len(),
            "Publishing room event"
        );
        for subscriber in &snapshot {
            subscriber.deliver(event);
        }
    }

    /// Live connection count for a room, `None` when no one is attached.
    pub fn connection_count(&self, room_id: &str) -> Option<u32> {
        self.registry.connection_count(room_id)
    }

    pub fn has_room(&self, room_id: &str) -> bool {
        self.registry.contains_room(room_id)
    }
}

/// Handle for one bus subscription, owned by the stream adapter that created
/// it. The bus never decides when a connection closes; closing is reported
/// here from the adapter side.
pub struct Subscription {
    registry: Arc<RoomRegistry>,
    room_id: String,
    subscriber_id: SubscriberId,
    active: AtomicBool,
}

impl Subscription {
    /// Detach from the room: remove the subscriber, decrement the count,
    /// broadcast the updated `presence` to the remaining subscribers (the
    /// departing one has already detached and hears nothing further), and
    /// tear the room entry down if it emptied.
    ///
    /// Idempotent: a second call, or a drop after a call, is a no-op. That
    /// makes it safe for disconnect to be reported from racing signals.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some((connections, remaining)) = self
            .registry
            .remove_subscriber(&self.room_id, self.subscriber_id)
        {
            let presence = BrainstormEvent::Presence {
                room_id: self.room_id.clone(),
                connections,
            };
            for subscriber in &remaining {
                subscriber.deliver(&presence);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
