use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::event::AuthorRef;

/// Database model for brainstorm rooms
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RoomModel {
    pub id: String,
    pub name: String,
    pub created_by_id: String,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomModel {
    /// Creates a new room model with a generated id and fresh timestamps
    pub fn new(name: String, created_by_id: String, created_by_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_by_id,
            created_by_name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn created_by(&self) -> AuthorRef {
        AuthorRef {
            id: self.created_by_id.clone(),
            name: self.created_by_name.clone(),
        }
    }
}
