use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::RoomModel,
    types::{validate_room_name, CreateRoomRequest, RoomResponse, UpdateRoomRequest},
};
use crate::session::rbac::{authorize_member, can_edit};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing brainstorm rooms
///
/// GET /rooms
/// Returns `{ "rooms": [...] }`, most recently updated first.
#[instrument(name = "list_rooms", skip(state, headers))]
pub async fn list_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize_member(&headers, &state.token_config)?;

    let rooms: Vec<RoomResponse> = state
        .room_repository
        .list_rooms()
        .await?
        .into_iter()
        .map(RoomResponse::from)
        .collect();
    Ok(Json(serde_json::json!({ "rooms": rooms })))
}

/// HTTP handler for creating a new room
///
/// POST /rooms
#[instrument(name = "create_room", skip(state, headers, request))]
pub async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;
    let name = validate_room_name(&request.name)?;

    let room = RoomModel::new(name, claims.sub.clone(), claims.name.clone());
    state.room_repository.create_room(&room).await?;

    info!(room_id = %room.id, name = %room.name, "Room created");
    Ok((StatusCode::CREATED, Json(RoomResponse::from(room))))
}

/// HTTP handler for fetching one room
///
/// GET /rooms/:id
#[instrument(name = "get_room", skip(state, headers))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RoomResponse>, AppError> {
    authorize_member(&headers, &state.token_config)?;

    let room = state
        .room_repository
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    Ok(Json(RoomResponse::from(room)))
}

/// HTTP handler for renaming a room. Owner or admin only.
///
/// PATCH /rooms/:id
#[instrument(name = "update_room", skip(state, headers, request))]
pub async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;

    let room = state
        .room_repository
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    if !can_edit(&claims, &room.created_by_id) {
        return Err(AppError::Forbidden);
    }

    let updated = match request.name {
        Some(raw) => {
            let name = validate_room_name(&raw)?;
            state.room_repository.rename_room(&room_id, &name).await?
        }
        None => room,
    };

    info!(room_id = %room_id, "Room updated");
    Ok(Json(RoomResponse::from(updated)))
}

/// HTTP handler for deleting a room, its messages and its ideas.
/// Owner or admin only.
///
/// DELETE /rooms/:id
#[instrument(name = "delete_room", skip(state, headers))]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;

    let room = state
        .room_repository
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    if !can_edit(&claims, &room.created_by_id) {
        return Err(AppError::Forbidden);
    }

    // Matches the database's ON DELETE CASCADE in the in-memory store too.
    state.message_repository.delete_for_room(&room_id).await?;
    state.idea_repository.delete_for_room(&room_id).await?;
    state.room_repository.delete_room(&room_id).await?;

    info!(room_id = %room_id, "Room deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}
