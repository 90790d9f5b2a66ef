use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::event::{AuthorRef, MessagePayload};

/// Database model for room chat messages
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MessageModel {
    pub id: String,
    pub room_id: String,
    pub author_id: String,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    pub fn new(
        room_id: String,
        author_id: String,
        author_name: Option<String>,
        content: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room_id,
            author_id,
            author_name,
            content,
            created_at: Utc::now(),
        }
    }

    /// Wire projection carried by `message.created` events and list responses.
    pub fn to_payload(&self) -> MessagePayload {
        MessagePayload {
            id: self.id.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            author: AuthorRef {
                id: self.author_id.clone(),
                name: self.author_name.clone(),
            },
        }
    }
}
