// Public API - what other modules can use
pub use handlers::{create_idea, delete_idea, list_ideas, update_idea};
pub use models::IdeaModel;
pub use types::{CreateIdeaRequest, IdeaResponse, UpdateIdeaRequest};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
