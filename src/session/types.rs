use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Application-level role attached to every signed-in user.
/// Brainstorm rooms are member-gated; visitors only see the public site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AppRole {
    Visitor,
    Member,
    Admin,
}

/// JWT claims carried by every authenticated request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// User id (standard JWT subject claim)
    pub sub: String,
    /// Display name; may be absent for externally-provisioned accounts
    pub name: Option<String>,
    pub role: AppRole,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request body for the session issuing endpoint
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    pub role: Option<AppRole>,
}

/// Response structure for session creation endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub role: AppRole,
}
