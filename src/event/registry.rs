use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::bus::Subscriber;

/// Identifies one subscriber within the registry. Unique per process.
pub type SubscriberId = u64;

/// Per-room fan-out state: live connection count plus the subscribers in
/// the order they attached.
struct RoomEntry {
    connections: u32,
    subscribers: Vec<(SubscriberId, Arc<dyn Subscriber>)>,
}

/// Process-wide map from room id to fan-out state
///
/// Pure bookkeeping, shared by every open stream across all rooms. Entries are
/// created lazily on the first subscribe and deleted in the same critical
/// section that drops the connection count to zero, so an entry exists iff
/// its count is positive. All operations are total; none of them fail.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, RoomEntry>>,
    next_id: AtomicU64,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Ensure the room entry exists, increment its connection count and store
    /// the subscriber. Returns the assigned id, the new count, and a snapshot
    /// of every subscriber in the room including the one just added.
    ///
    /// The ensure-and-increment runs under the map lock, so concurrent
    /// subscribes for the same room converge on a single entry.
    pub fn add_subscriber(
        &self,
        room_id: &str,
        subscriber: Arc<dyn Subscriber>,
    ) -> (SubscriberId, u32, Vec<Arc<dyn Subscriber>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut rooms = self.rooms.lock().unwrap();
        let entry = rooms.entry(room_id.to_string()).or_insert_with(|| {
            debug!(room_id = %room_id, "Creating room entry");
            RoomEntry {
                connections: 0,
                subscribers: Vec::new(),
            }
        });

        entry.connections += 1;
        entry.subscribers.push((id, subscriber));
        let snapshot = entry
            .subscribers
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();

        debug!(
            room_id = %room_id,
            subscriber_id = id,
            connections = entry.connections,
            "Subscriber added"
        );

        (id, entry.connections, snapshot)
    }

    /// Remove a subscriber and decrement the room's connection count, deleting
    /// the entry when the count reaches zero. Returns the new count and a
    /// snapshot of the remaining subscribers, or `None` when the room or the
    /// subscriber is already gone.
    ///
    /// The count re-check and the delete happen inside the same critical
    /// section as the removal, so a subscribe racing this call either lands
    /// before it (nonzero count observed, delete skipped) or recreates the
    /// entry afterwards.
    pub fn remove_subscriber(
        &self,
        room_id: &str,
        id: SubscriberId,
    ) -> Option<(u32, Vec<Arc<dyn Subscriber>>)> {
        let mut rooms = self.rooms.lock().unwrap();

        let entry = match rooms.get_mut(room_id) {
            Some(entry) => entry,
            None => {
                debug!(room_id = %room_id, subscriber_id = id, "Room already gone");
                return None;
            }
        };

        let before = entry.subscribers.len();
        entry.subscribers.retain(|(sid, _)| *sid != id);
        if entry.subscribers.len() == before {
            debug!(room_id = %room_id, subscriber_id = id, "Subscriber already removed");
            return None;
        }

        entry.connections = entry.connections.saturating_sub(1);
        let connections = entry.connections;
        let snapshot: Vec<Arc<dyn Subscriber>> = entry
            .subscribers
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();

        if connections == 0 {
            debug!(room_id = %room_id, "Last subscriber left, removing room entry");
            rooms.remove(room_id);
        } else {
            debug!(
                room_id = %room_id,
                subscriber_id = id,
                connections = connections,
                "Subscriber removed"
            );
        }

        Some((connections, snapshot))
    }

    /// Non-creating lookup of the current subscriber snapshot for a room.
    pub fn subscribers(&self, room_id: &str) -> Option<Vec<Arc<dyn Subscriber>>> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(room_id)
            .map(|entry| entry.subscribers.iter().map(|(_, s)| Arc::clone(s)).collect())
    }

    /// Non-creating lookup of a room's live connection count.
    pub fn connection_count(&self, room_id: &str) -> Option<u32> {
        let rooms = self.rooms.lock().unwrap();
        rooms.get(room_id).map(|entry| entry.connections)
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.lock().unwrap().contains_key(room_id)
    }

    /// Number of rooms with at least one live subscriber.
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}
