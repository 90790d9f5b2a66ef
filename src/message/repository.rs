use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::MessageModel;
use crate::shared::AppError;

/// Trait for message repository operations
#[async_trait]
pub trait MessageRepository {
    async fn create_message(&self, message: &MessageModel) -> Result<(), AppError>;
    /// The most recent `take` messages of a room, oldest first.
    async fn list_messages(&self, room_id: &str, take: i64) -> Result<Vec<MessageModel>, AppError>;
    /// Removes every message of a room. Returns how many were deleted.
    async fn delete_for_room(&self, room_id: &str) -> Result<u64, AppError>;
}

/// In-memory implementation of MessageRepository for development and testing
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<MessageModel>>,
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    #[instrument(skip(self, message))]
    async fn create_message(&self, message: &MessageModel) -> Result<(), AppError> {
        debug!(
            message_id = %message.id,
            room_id = %message.room_id,
            "Storing message in memory"
        );
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_messages(&self, room_id: &str, take: i64) -> Result<Vec<MessageModel>, AppError> {
        let messages = self.messages.lock().unwrap();
        let mut room_messages: Vec<MessageModel> = messages
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        room_messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let skip = room_messages.len().saturating_sub(take as usize);
        Ok(room_messages.split_off(skip))
    }

    #[instrument(skip(self))]
    async fn delete_for_room(&self, room_id: &str) -> Result<u64, AppError> {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| m.room_id != room_id);
        let removed = (before - messages.len()) as u64;
        debug!(room_id = %room_id, removed = removed, "Messages deleted from memory");
        Ok(removed)
    }
}

/// PostgreSQL implementation of message repository
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> MessageModel {
    MessageModel {
        id: row.get("id"),
        room_id: row.get("room_id"),
        author_id: row.get("author_id"),
        author_name: row.get("author_name"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    #[instrument(skip(self, message))]
    async fn create_message(&self, message: &MessageModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO brainstorm_messages (id, room_id, author_id, author_name, content, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&message.id)
        .bind(&message.room_id)
        .bind(&message.author_id)
        .bind(&message.author_name)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store message in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(message_id = %message.id, room_id = %message.room_id, "Message stored in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_messages(&self, room_id: &str, take: i64) -> Result<Vec<MessageModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, room_id, author_id, author_name, content, created_at \
             FROM brainstorm_messages WHERE room_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(room_id)
        .bind(take)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to list messages from database");
            AppError::DatabaseError(e.to_string())
        })?;

        // Query newest-first for the LIMIT, serve oldest-first.
        let mut messages: Vec<MessageModel> = rows.iter().map(row_to_message).collect();
        messages.reverse();
        Ok(messages)
    }

    #[instrument(skip(self))]
    async fn delete_for_room(&self, room_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM brainstorm_messages WHERE room_id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to delete messages from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
