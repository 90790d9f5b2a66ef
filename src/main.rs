use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowroom::event::EventBus;
use flowroom::idea::repository::InMemoryIdeaRepository;
use flowroom::message::repository::InMemoryMessageRepository;
use flowroom::room::repository::InMemoryRoomRepository;
use flowroom::session::TokenConfig;
use flowroom::shared::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting flowroom brainstorm server");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let message_repository = Arc::new(InMemoryMessageRepository::new());
    let idea_repository = Arc::new(InMemoryIdeaRepository::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let room_repository = Arc::new(PostgresRoomRepository::new(pool.clone()));
    // let message_repository = Arc::new(PostgresMessageRepository::new(pool.clone()));
    // let idea_repository = Arc::new(PostgresIdeaRepository::new(pool));

    let app_state = AppState::new(
        room_repository,
        message_repository,
        idea_repository,
        EventBus::new(),
        TokenConfig::new(),
    );

    let app = flowroom::app(app_state).layer(TraceLayer::new_for_http());

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
