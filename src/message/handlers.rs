use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::MessageModel,
    types::{clamp_take, validate_content, CreateMessageRequest, MessageListQuery},
};
use crate::event::{BrainstormEvent, MessagePayload};
use crate::session::rbac::authorize_member;
use crate::shared::{AppError, AppState};

/// HTTP handler for the room chat history
///
/// GET /rooms/:id/messages?take=N
/// Returns `{ "messages": [...] }` with the most recent N messages (clamped
/// to 1..=200, default 50), oldest first.
#[instrument(name = "list_messages", skip(state, headers))]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<MessageListQuery>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize_member(&headers, &state.token_config)?;

    let take = clamp_take(query.take);
    let messages: Vec<MessagePayload> = state
        .message_repository
        .list_messages(&room_id, take)
        .await?
        .iter()
        .map(MessageModel::to_payload)
        .collect();

    Ok(Json(serde_json::json!({ "messages": messages })))
}

/// HTTP handler for posting a chat message
///
/// POST /rooms/:id/messages
/// Persists the message, then publishes `message.created` to every open
/// stream in the room. Publication is best-effort: the message is durable
/// before the bus ever sees it, and a room with no listeners drops the event.
#[instrument(name = "create_message", skip(state, headers, request))]
pub async fn create_message(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;
    let content = validate_content(&request.content)?;

    // Room existence is the data store's concern, checked before persisting.
    state
        .room_repository
        .get_room(&room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    let message = MessageModel::new(room_id.clone(), claims.sub, claims.name, content);
    state.message_repository.create_message(&message).await?;

    let payload = message.to_payload();
    state.event_bus.publish(
        &room_id,
        &BrainstormEvent::MessageCreated {
            room_id: room_id.clone(),
            message: payload.clone(),
        },
    );

    info!(room_id = %room_id, message_id = %payload.id, "Message created and published");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "ok": true, "message": payload })),
    ))
}
