// Public API - what other modules can use
pub use handlers::create_session;
pub use rbac::{authorize_member, can_edit, is_admin, require_member, require_signed_in};
pub use token::TokenConfig;
pub use types::{AppRole, SessionClaims, SessionResponse};

// Internal modules
mod handlers;
pub mod rbac;
pub mod token;
mod types;
