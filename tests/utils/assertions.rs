//! Test assertion helpers - fluent API for verifying delivered events
#![allow(dead_code)] // Test utilities may not all be used in every test

use flowroom::event::BrainstormEvent;

use super::setup::RecordingSubscriber;

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Every presence count a subscriber saw, in delivery order.
pub fn presence_counts(events: &[BrainstormEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            BrainstormEvent::Presence { connections, .. } => Some(*connections),
            _ => None,
        })
        .collect()
}

pub struct EventAssertion {
    events: Vec<BrainstormEvent>,
}

impl EventAssertion {
    pub fn for_subscriber(subscriber: &RecordingSubscriber) -> Self {
        Self {
            events: subscriber.events(),
        }
    }

    /// Assert the subscriber saw exactly this sequence of presence counts.
    pub fn saw_presence_counts(self, expected: &[u32]) -> Self {
        assert_eq!(
            presence_counts(&self.events),
            expected,
            "presence sequence mismatch in {:?}",
            self.events
        );
        self
    }

    /// Assert a `message.created` with this content was delivered.
    pub fn saw_message(self, content: &str) -> Self {
        let found = self.events.iter().any(|event| match event {
            BrainstormEvent::MessageCreated { message, .. } => message.content == content,
            _ => false,
        });
        assert!(
            found,
            "no message.created with content {content:?} in {:?}",
            self.events
        );
        self
    }

    /// Assert no `message.created` was delivered at all.
    pub fn saw_no_messages(self) -> Self {
        let count = self
            .events
            .iter()
            .filter(|event| matches!(event, BrainstormEvent::MessageCreated { .. }))
            .count();
        assert_eq!(count, 0, "unexpected messages in {:?}", self.events);
        self
    }

    /// Assert every event carrying a room id belongs to `room_id`.
    pub fn only_for_room(self, room_id: &str) -> Self {
        for event in &self.events {
            if let Some(seen) = event.room_id() {
                assert_eq!(seen, room_id, "event leaked from another room");
            }
        }
        self
    }
}
