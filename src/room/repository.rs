use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::RoomModel;
use crate::shared::AppError;

/// Trait for room repository operations
#[async_trait]
pub trait RoomRepository {
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError>;
    /// All rooms, most recently updated first.
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError>;
    /// Renames a room and bumps its updated_at. Errors with NotFound when absent.
    async fn rename_room(&self, room_id: &str, name: &str) -> Result<RoomModel, AppError>;
    async fn delete_room(&self, room_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of RoomRepository for development and testing
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError> {
        debug!(room_id = %room.id, name = %room.name, "Creating room in memory");

        let mut rooms = self.rooms.lock().unwrap();
        if rooms.contains_key(&room.id) {
            warn!(room_id = %room.id, "Room already exists in memory");
            return Err(AppError::DatabaseError("Room already exists".to_string()));
        }
        rooms.insert(room.id.clone(), room.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(room_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        let mut room_list: Vec<RoomModel> = rooms.values().cloned().collect();
        room_list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(room_list)
    }

    #[instrument(skip(self))]
    async fn rename_room(&self, room_id: &str, name: &str) -> Result<RoomModel, AppError> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

        room.name = name.to_string();
        room.updated_at = Utc::now();
        debug!(room_id = %room_id, name = %name, "Room renamed in memory");
        Ok(room.clone())
    }

    #[instrument(skip(self))]
    async fn delete_room(&self, room_id: &str) -> Result<(), AppError> {
        let mut rooms = self.rooms.lock().unwrap();
        if rooms.remove(room_id).is_none() {
            warn!(room_id = %room_id, "Room not found for deletion in memory");
            return Err(AppError::NotFound("Room not found".to_string()));
        }
        debug!(room_id = %room_id, "Room deleted from memory");
        Ok(())
    }
}

/// PostgreSQL implementation of room repository
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_room(row: &sqlx::postgres::PgRow) -> RoomModel {
    RoomModel {
        id: row.get("id"),
        name: row.get("name"),
        created_by_id: row.get("created_by_id"),
        created_by_name: row.get("created_by_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO brainstorm_rooms (id, name, created_by_id, created_by_name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&room.id)
        .bind(&room.name)
        .bind(&room.created_by_id)
        .bind(&room.created_by_name)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create room in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(room_id = %room.id, "Room created in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, created_by_id, created_by_name, created_at, updated_at \
             FROM brainstorm_rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to fetch room from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(row_to_room))
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, created_by_id, created_by_name, created_at, updated_at \
             FROM brainstorm_rooms ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list rooms from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(row_to_room).collect())
    }

    #[instrument(skip(self))]
    async fn rename_room(&self, room_id: &str, name: &str) -> Result<RoomModel, AppError> {
        let row = sqlx::query(
            "UPDATE brainstorm_rooms SET name = $2, updated_at = $3 WHERE id = $1 \
             RETURNING id, name, created_by_id, created_by_name, created_at, updated_at",
        )
        .bind(room_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to rename room in database");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => Ok(row_to_room(&row)),
            None => Err(AppError::NotFound("Room not found".to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn delete_room(&self, room_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM brainstorm_rooms WHERE id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to delete room from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Room not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_room(name: &str) -> RoomModel {
        RoomModel::new(
            name.to_string(),
            "user-1".to_string(),
            Some("alice".to_string()),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_room() {
        let repo = InMemoryRoomRepository::new();
        let room = test_room("launch plan");

        repo.create_room(&room).await.unwrap();

        let retrieved = repo.get_room(&room.id).await.unwrap().unwrap();
        assert_eq!(retrieved.id, room.id);
        assert_eq!(retrieved.name, "launch plan");
        assert_eq!(retrieved.created_by_id, "user-1");
    }

    #[tokio::test]
    async fn test_get_nonexistent_room() {
        let repo = InMemoryRoomRepository::new();
        assert!(repo.get_room("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_room() {
        let repo = InMemoryRoomRepository::new();
        let room = test_room("dup");

        repo.create_room(&room).await.unwrap();
        let result = repo.create_room(&room).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_list_rooms_most_recent_first() {
        let repo = InMemoryRoomRepository::new();
        let older = test_room("older");
        repo.create_room(&older).await.unwrap();
        let newer = test_room("newer");
        repo.create_room(&newer).await.unwrap();

        // Renaming bumps updated_at, so "older" moves to the front.
        repo.rename_room(&older.id, "older-renamed").await.unwrap();

        let rooms = repo.list_rooms().await.unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "older-renamed");
    }

    #[tokio::test]
    async fn test_rename_missing_room() {
        let repo = InMemoryRoomRepository::new();
        let result = repo.rename_room("ghost", "anything").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_room() {
        let repo = InMemoryRoomRepository::new();
        let room = test_room("short-lived");
        repo.create_room(&room).await.unwrap();

        repo.delete_room(&room.id).await.unwrap();
        assert!(repo.get_room(&room.id).await.unwrap().is_none());

        let result = repo.delete_room(&room.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
