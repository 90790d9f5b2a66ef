use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::IdeaModel;
use crate::event::AuthorRef;
use crate::shared::AppError;

pub const MAX_IDEA_TITLE_CHARS: usize = 200;

/// Request payload for creating an idea
#[derive(Debug, Deserialize)]
pub struct CreateIdeaRequest {
    pub title: String,
    pub content: Option<String>,
}

/// Request payload for editing an idea
#[derive(Debug, Deserialize)]
pub struct UpdateIdeaRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Response for idea endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaResponse {
    pub id: String,
    pub room_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorRef,
}

impl From<IdeaModel> for IdeaResponse {
    fn from(idea: IdeaModel) -> Self {
        Self {
            id: idea.id.clone(),
            room_id: idea.room_id.clone(),
            title: idea.title.clone(),
            content: idea.content.clone(),
            created_at: idea.created_at,
            updated_at: idea.updated_at,
            author: idea.author(),
        }
    }
}

pub fn validate_idea_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Idea title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_IDEA_TITLE_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Idea title must be at most {MAX_IDEA_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}
