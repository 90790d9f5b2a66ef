use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::event::AuthorRef;

/// Database model for brainstorm ideas
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct IdeaModel {
    pub id: String,
    pub room_id: String,
    pub author_id: String,
    pub author_name: Option<String>,
    pub title: String,
    /// Plain-text body; the rich block structure lives in the site editor,
    /// the server only stores its flattened form.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdeaModel {
    pub fn new(
        room_id: String,
        author_id: String,
        author_name: Option<String>,
        title: String,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            room_id,
            author_id,
            author_name,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn author(&self) -> AuthorRef {
        AuthorRef {
            id: self.author_id.clone(),
            name: self.author_name.clone(),
        }
    }
}
