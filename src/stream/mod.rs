// Public API - what other modules can use
pub use handlers::room_events;
pub use subscriber::ChannelSubscriber;

// Internal modules
mod handlers;
mod subscriber;
