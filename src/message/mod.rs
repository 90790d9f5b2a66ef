// Public API - what other modules can use
pub use handlers::{create_message, list_messages};
pub use models::MessageModel;
pub use types::CreateMessageRequest;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
