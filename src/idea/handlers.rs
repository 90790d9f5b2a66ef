use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::IdeaModel,
    repository::IdeaPatch,
    types::{validate_idea_title, CreateIdeaRequest, IdeaResponse, UpdateIdeaRequest},
};
use crate::session::rbac::{authorize_member, can_edit};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing a room's ideas
///
/// GET /rooms/:id/ideas
/// Returns `{ "ideas": [...] }`, most recently updated first.
#[instrument(name = "list_ideas", skip(state, headers))]
pub async fn list_ideas(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize_member(&headers, &state.token_config)?;

    state
        .room_repository
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    let ideas: Vec<IdeaResponse> = state
        .idea_repository
        .list_ideas(&room_id)
        .await?
        .into_iter()
        .map(IdeaResponse::from)
        .collect();
    Ok(Json(serde_json::json!({ "ideas": ideas })))
}

/// HTTP handler for adding an idea to a room
///
/// POST /rooms/:id/ideas
#[instrument(name = "create_idea", skip(state, headers, request))]
pub async fn create_idea(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<CreateIdeaRequest>,
) -> Result<(StatusCode, Json<IdeaResponse>), AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;
    let title = validate_idea_title(&request.title)?;

    state
        .room_repository
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    let idea = IdeaModel::new(
        room_id.clone(),
        claims.sub.clone(),
        claims.name.clone(),
        title,
        request.content.unwrap_or_default(),
    );
    state.idea_repository.create_idea(&idea).await?;

    info!(idea_id = %idea.id, room_id = %room_id, "Idea created");
    Ok((StatusCode::CREATED, Json(IdeaResponse::from(idea))))
}

/// HTTP handler for editing an idea. Author or admin only.
///
/// PATCH /ideas/:id
#[instrument(name = "update_idea", skip(state, headers, request))]
pub async fn update_idea(
    State(state): State<AppState>,
    Path(idea_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateIdeaRequest>,
) -> Result<Json<IdeaResponse>, AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;

    let idea = state
        .idea_repository
        .get_idea(&idea_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;

    if !can_edit(&claims, &idea.author_id) {
        return Err(AppError::Forbidden);
    }

    let patch = IdeaPatch {
        title: request.title.as_deref().map(validate_idea_title).transpose()?,
        content: request.content,
    };
    let updated = state.idea_repository.update_idea(&idea_id, patch).await?;

    info!(idea_id = %idea_id, "Idea updated");
    Ok(Json(IdeaResponse::from(updated)))
}

/// HTTP handler for deleting an idea. Author or admin only.
///
/// DELETE /ideas/:id
#[instrument(name = "delete_idea", skip(state, headers))]
pub async fn delete_idea(
    State(state): State<AppState>,
    Path(idea_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;

    let idea = state
        .idea_repository
        .get_idea(&idea_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;

    if !can_edit(&claims, &idea.author_id) {
        return Err(AppError::Forbidden);
    }

    state.idea_repository.delete_idea(&idea_id).await?;

    info!(idea_id = %idea_id, "Idea deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}
