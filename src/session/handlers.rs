use axum::{extract::State, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use super::types::{AppRole, CreateSessionRequest, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for issuing a session token
///
/// POST /session
/// Returns a JWT for the given display name. Defaults to MEMBER role; the
/// production deployment issues these from the identity provider instead.
#[instrument(name = "create_session", skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty".to_string()));
    }

    let role = request.role.unwrap_or(AppRole::Member);
    let user_id = Uuid::new_v4().to_string();

    let token = state
        .token_config
        .create_token(user_id.clone(), Some(name.clone()), role)?;

    info!(user_id = %user_id, role = %role, "Session created");

    Ok(Json(SessionResponse {
        token,
        user_id,
        name,
        role,
    }))
}
