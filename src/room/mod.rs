// Public API - what other modules can use
pub use handlers::{create_room, delete_room, get_room, list_rooms, update_room};
pub use models::RoomModel;
pub use types::{CreateRoomRequest, RoomResponse, UpdateRoomRequest};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
