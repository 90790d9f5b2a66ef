use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, BodyDataStream},
    http::{Request, Response, StatusCode},
    Router,
};
use futures::StreamExt;
use tower::ServiceExt; // for `oneshot`

use flowroom::{
    event::{BrainstormEvent, EventBus, Subscriber},
    idea::repository::InMemoryIdeaRepository,
    message::repository::InMemoryMessageRepository,
    room::repository::InMemoryRoomRepository,
    session::{AppRole, TokenConfig},
    shared::AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
}

pub struct TestSetupBuilder {
    event_bus: EventBus,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            event_bus: EventBus::new(),
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn build(self) -> TestSetup {
        let state = AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
            Arc::new(InMemoryIdeaRepository::new()),
            self.event_bus,
            TokenConfig::new(),
        );
        TestSetup {
            app: flowroom::app(state.clone()),
            state,
        }
    }
}

impl TestSetup {
    pub fn token(&self, user_id: &str, role: AppRole) -> String {
        self.state
            .token_config
            .create_token(user_id.to_string(), Some(user_id.to_string()), role)
            .unwrap()
    }

    pub fn member_token(&self, user_id: &str) -> String {
        self.token(user_id, AppRole::Member)
    }

    /// Send a JSON request and parse the JSON reply.
    pub async fn request_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Open the room's SSE stream and hand back the raw body stream.
    pub async fn open_stream(&self, room_id: &str, token: &str) -> BodyDataStream {
        let response: Response<Body> = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/rooms/{room_id}/events"))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "stream open failed");
        response.into_body().into_data_stream()
    }
}

/// Read SSE chunks until one contains `needle`, returning the accumulated
/// text. Panics after two seconds of silence.
pub async fn read_frame(body: &mut BodyDataStream, needle: &str) -> String {
    let mut text = String::new();
    loop {
        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for frame containing {needle:?}"))
            .expect("stream closed before expected frame")
            .unwrap();
        text.push_str(&String::from_utf8(chunk.to_vec()).unwrap());
        if text.contains(needle) {
            return text;
        }
    }
}

// ============================================================================
// Recording subscriber
// ============================================================================

/// Collects every delivered event for later inspection.
pub struct RecordingSubscriber {
    events: Mutex<Vec<BrainstormEvent>>,
}

impl RecordingSubscriber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<BrainstormEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Subscriber for RecordingSubscriber {
    fn deliver(&self, event: &BrainstormEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
