use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal author projection carried inside event payloads.
///
/// `name` is nullable because accounts created through an external identity
/// provider may not have a display name yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: Option<String>,
}

/// Persisted chat message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
}

/// Events that flow through a brainstorm room's fan-out bus
///
/// Events represent facts about things that have already happened. They carry
/// no sequence numbers; delivery order is publish-call order within a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BrainstormEvent {
    /// Handshake frame sent once to a newly-opened stream. Local only,
    /// never broadcast through the bus.
    #[serde(rename = "hello")]
    Hello { now: DateTime<Utc> },

    /// The room's live connection count changed (connect or disconnect).
    #[serde(rename = "presence", rename_all = "camelCase")]
    Presence { room_id: String, connections: u32 },

    /// A chat message was persisted and should reach every open stream.
    #[serde(rename = "message.created", rename_all = "camelCase")]
    MessageCreated {
        room_id: String,
        message: MessagePayload,
    },
}

impl BrainstormEvent {
    /// Get the room_id associated with this event, if any.
    /// `hello` is a per-connection handshake and carries no room.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            BrainstormEvent::Hello { .. } => None,
            BrainstormEvent::Presence { room_id, .. } => Some(room_id),
            BrainstormEvent::MessageCreated { room_id, .. } => Some(room_id),
        }
    }

    /// Wire-level type label, also used as the SSE event name.
    pub fn event_type(&self) -> &'static str {
        match self {
            BrainstormEvent::Hello { .. } => "hello",
            BrainstormEvent::Presence { .. } => "presence",
            BrainstormEvent::MessageCreated { .. } => "message.created",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_wire_shape() {
        let event = BrainstormEvent::Presence {
            room_id: "r1".to_string(),
            connections: 2,
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "presence");
        assert_eq!(json["roomId"], "r1");
        assert_eq!(json["connections"], 2);
    }

    #[test]
    fn test_message_created_wire_shape() {
        let event = BrainstormEvent::MessageCreated {
            room_id: "r1".to_string(),
            message: MessagePayload {
                id: "m1".to_string(),
                content: "hi".to_string(),
                created_at: Utc::now(),
                author: AuthorRef {
                    id: "u1".to_string(),
                    name: Some("alice".to_string()),
                },
            },
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message.created");
        assert_eq!(json["roomId"], "r1");
        assert_eq!(json["message"]["id"], "m1");
        assert_eq!(json["message"]["content"], "hi");
        assert!(json["message"]["createdAt"].is_string());
        assert_eq!(json["message"]["author"]["id"], "u1");
        assert_eq!(json["message"]["author"]["name"], "alice");
    }

    #[test]
    fn test_hello_has_no_room() {
        let event = BrainstormEvent::Hello { now: Utc::now() };
        assert_eq!(event.room_id(), None);
        assert_eq!(event.event_type(), "hello");

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "hello");
        assert!(json["now"].is_string());
    }

    #[test]
    fn test_nullable_author_name() {
        let payload = MessagePayload {
            id: "m1".to_string(),
            content: "anonymous thought".to_string(),
            created_at: Utc::now(),
            author: AuthorRef {
                id: "u2".to_string(),
                name: None,
            },
        };

        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert!(json["author"]["name"].is_null());

        let back: MessagePayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_event_roundtrip() {
        let event = BrainstormEvent::Presence {
            room_id: "quiet-room".to_string(),
            connections: 0,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BrainstormEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
