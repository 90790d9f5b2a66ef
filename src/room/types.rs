use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::RoomModel;
use crate::event::AuthorRef;
use crate::shared::AppError;

pub const MAX_ROOM_NAME_CHARS: usize = 80;

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Request payload for renaming a room
#[derive(Debug, Deserialize)]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
}

/// Response for room creation and room information
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: AuthorRef,
}

impl From<RoomModel> for RoomResponse {
    fn from(room: RoomModel) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            created_at: room.created_at,
            updated_at: room.updated_at,
            created_by: room.created_by(),
        }
    }
}

/// Trims and length-checks a room name. Same bounds as the site's form.
pub fn validate_room_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput(
            "Room name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_ROOM_NAME_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Room name must be at most {MAX_ROOM_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}
