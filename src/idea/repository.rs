use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::IdeaModel;
use crate::shared::AppError;

/// Fields that can change on an idea edit.
#[derive(Debug, Default)]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Trait for idea repository operations
#[async_trait]
pub trait IdeaRepository {
    async fn create_idea(&self, idea: &IdeaModel) -> Result<(), AppError>;
    async fn get_idea(&self, idea_id: &str) -> Result<Option<IdeaModel>, AppError>;
    /// All ideas of a room, most recently updated first.
    async fn list_ideas(&self, room_id: &str) -> Result<Vec<IdeaModel>, AppError>;
    /// Applies a patch and bumps updated_at. Errors with NotFound when absent.
    async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> Result<IdeaModel, AppError>;
    async fn delete_idea(&self, idea_id: &str) -> Result<(), AppError>;
    /// Removes every idea of a room. Returns how many were deleted.
    async fn delete_for_room(&self, room_id: &str) -> Result<u64, AppError>;
}

/// In-memory implementation of IdeaRepository for development and testing
pub struct InMemoryIdeaRepository {
    ideas: Mutex<HashMap<String, IdeaModel>>,
}

impl Default for InMemoryIdeaRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdeaRepository {
    pub fn new() -> Self {
        Self {
            ideas: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl IdeaRepository for InMemoryIdeaRepository {
    #[instrument(skip(self, idea))]
    async fn create_idea(&self, idea: &IdeaModel) -> Result<(), AppError> {
        debug!(idea_id = %idea.id, room_id = %idea.room_id, "Storing idea in memory");
        self.ideas
            .lock()
            .unwrap()
            .insert(idea.id.clone(), idea.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_idea(&self, idea_id: &str) -> Result<Option<IdeaModel>, AppError> {
        Ok(self.ideas.lock().unwrap().get(idea_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_ideas(&self, room_id: &str) -> Result<Vec<IdeaModel>, AppError> {
        let ideas = self.ideas.lock().unwrap();
        let mut room_ideas: Vec<IdeaModel> = ideas
            .values()
            .filter(|i| i.room_id == room_id)
            .cloned()
            .collect();
        room_ideas.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(room_ideas)
    }

    #[instrument(skip(self, patch))]
    async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> Result<IdeaModel, AppError> {
        let mut ideas = self.ideas.lock().unwrap();
        let idea = ideas
            .get_mut(idea_id)
            .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;

        if let Some(title) = patch.title {
            idea.title = title;
        }
        if let Some(content) = patch.content {
            idea.content = content;
        }
        idea.updated_at = Utc::now();

        debug!(idea_id = %idea_id, "Idea updated in memory");
        Ok(idea.clone())
    }

    #[instrument(skip(self))]
    async fn delete_idea(&self, idea_id: &str) -> Result<(), AppError> {
        let mut ideas = self.ideas.lock().unwrap();
        if ideas.remove(idea_id).is_none() {
            warn!(idea_id = %idea_id, "Idea not found for deletion in memory");
            return Err(AppError::NotFound("Idea not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_for_room(&self, room_id: &str) -> Result<u64, AppError> {
        let mut ideas = self.ideas.lock().unwrap();
        let before = ideas.len();
        ideas.retain(|_, idea| idea.room_id != room_id);
        Ok((before - ideas.len()) as u64)
    }
}

/// PostgreSQL implementation of idea repository
pub struct PostgresIdeaRepository {
    pool: PgPool,
}

impl PostgresIdeaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_idea(row: &sqlx::postgres::PgRow) -> IdeaModel {
    IdeaModel {
        id: row.get("id"),
        room_id: row.get("room_id"),
        author_id: row.get("author_id"),
        author_name: row.get("author_name"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl IdeaRepository for PostgresIdeaRepository {
    #[instrument(skip(self, idea))]
    async fn create_idea(&self, idea: &IdeaModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO brainstorm_ideas \
             (id, room_id, author_id, author_name, title, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&idea.id)
        .bind(&idea.room_id)
        .bind(&idea.author_id)
        .bind(&idea.author_name)
        .bind(&idea.title)
        .bind(&idea.content)
        .bind(idea.created_at)
        .bind(idea.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store idea in database");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_idea(&self, idea_id: &str) -> Result<Option<IdeaModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, room_id, author_id, author_name, title, content, created_at, updated_at \
             FROM brainstorm_ideas WHERE id = $1",
        )
        .bind(idea_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, idea_id = %idea_id, "Failed to fetch idea from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(row_to_idea))
    }

    #[instrument(skip(self))]
    async fn list_ideas(&self, room_id: &str) -> Result<Vec<IdeaModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, room_id, author_id, author_name, title, content, created_at, updated_at \
             FROM brainstorm_ideas WHERE room_id = $1 ORDER BY updated_at DESC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to list ideas from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(row_to_idea).collect())
    }

    #[instrument(skip(self, patch))]
    async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> Result<IdeaModel, AppError> {
        let row = sqlx::query(
            "UPDATE brainstorm_ideas SET \
             title = COALESCE($2, title), \
             content = COALESCE($3, content), \
             updated_at = $4 \
             WHERE id = $1 \
             RETURNING id, room_id, author_id, author_name, title, content, created_at, updated_at",
        )
        .bind(idea_id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, idea_id = %idea_id, "Failed to update idea in database");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => Ok(row_to_idea(&row)),
            None => Err(AppError::NotFound("Idea not found".to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn delete_idea(&self, idea_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM brainstorm_ideas WHERE id = $1")
            .bind(idea_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, idea_id = %idea_id, "Failed to delete idea from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Idea not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_for_room(&self, room_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM brainstorm_ideas WHERE room_id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to delete ideas from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(room_id: &str, title: &str) -> IdeaModel {
        IdeaModel::new(
            room_id.to_string(),
            "user-1".to_string(),
            Some("alice".to_string()),
            title.to_string(),
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let repo = InMemoryIdeaRepository::new();
        let first = idea("r1", "first");
        repo.create_idea(&first).await.unwrap();
        let second = idea("r1", "second");
        repo.create_idea(&second).await.unwrap();
        repo.create_idea(&idea("r2", "elsewhere")).await.unwrap();

        assert_eq!(
            repo.get_idea(&first.id).await.unwrap().unwrap().title,
            "first"
        );

        // Editing bumps updated_at, moving the idea to the front.
        repo.update_idea(
            &first.id,
            IdeaPatch {
                title: Some("first, revised".to_string()),
                content: None,
            },
        )
        .await
        .unwrap();

        let ideas = repo.list_ideas("r1").await.unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "first, revised");
    }

    #[tokio::test]
    async fn test_patch_keeps_unset_fields() {
        let repo = InMemoryIdeaRepository::new();
        let mut seed = idea("r1", "original");
        seed.content = "body".to_string();
        repo.create_idea(&seed).await.unwrap();

        let updated = repo
            .update_idea(
                &seed.id,
                IdeaPatch {
                    title: None,
                    content: Some("new body".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "original");
        assert_eq!(updated.content, "new body");
    }

    #[tokio::test]
    async fn test_delete_and_delete_for_room() {
        let repo = InMemoryIdeaRepository::new();
        let keep = idea("r2", "keep");
        repo.create_idea(&idea("r1", "a")).await.unwrap();
        repo.create_idea(&idea("r1", "b")).await.unwrap();
        repo.create_idea(&keep).await.unwrap();

        assert_eq!(repo.delete_for_room("r1").await.unwrap(), 2);
        assert!(repo.list_ideas("r1").await.unwrap().is_empty());

        repo.delete_idea(&keep.id).await.unwrap();
        assert!(matches!(
            repo.delete_idea(&keep.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
