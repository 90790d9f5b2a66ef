use serde::Deserialize;

use crate::shared::AppError;

pub const MAX_MESSAGE_CHARS: usize = 4000;

pub const DEFAULT_LIST_TAKE: i64 = 50;
pub const MAX_LIST_TAKE: i64 = 200;

/// Request payload for posting a chat message
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}

/// Query parameters for the message list endpoint
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub take: Option<i64>,
}

/// Trims and length-checks message content.
pub fn validate_content(raw: &str) -> Result<String, AppError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::InvalidInput(
            "Message content must not be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Message content must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(content.to_string())
}

/// Clamps the requested page size into 1..=200, defaulting to 50.
pub fn clamp_take(take: Option<i64>) -> i64 {
    take.unwrap_or(DEFAULT_LIST_TAKE).clamp(1, MAX_LIST_TAKE)
}
