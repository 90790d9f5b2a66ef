// Library crate for the flowroom brainstorm server
// This file exposes the public API for integration tests

pub mod event;
pub mod idea;
pub mod message;
pub mod room;
pub mod session;
pub mod shared;
pub mod stream;

// Re-export commonly used types for easier access in tests
pub use event::{BrainstormEvent, EventBus, Subscriber, Subscription};
pub use room::{models::RoomModel, repository::RoomRepository};
pub use session::{AppRole, TokenConfig};
pub use shared::{AppError, AppState};
pub use stream::ChannelSubscriber;

use axum::{
    routing::{get, patch, post},
    Router,
};

/// Full route table, shared by the binary and the integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/session", post(session::create_session))
        .route("/rooms", get(room::list_rooms).post(room::create_room))
        .route(
            "/rooms/:id",
            get(room::get_room)
                .patch(room::update_room)
                .delete(room::delete_room),
        )
        .route("/rooms/:id/events", get(stream::room_events))
        .route(
            "/rooms/:id/messages",
            get(message::list_messages).post(message::create_message),
        )
        .route(
            "/rooms/:id/ideas",
            get(idea::list_ideas).post(idea::create_idea),
        )
        .route(
            "/ideas/:id",
            patch(idea::update_idea).delete(idea::delete_idea),
        )
        .with_state(state)
}
