use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::sse::{Event, Sse},
};
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::{IntervalStream, UnboundedReceiverStream};
use tracing::{error, info, instrument};

use super::subscriber::ChannelSubscriber;
use crate::event::BrainstormEvent;
use crate::session::rbac::authorize_member;
use crate::shared::{AppError, AppState};

/// How often an otherwise-idle stream gets a ping frame so proxies keep the
/// connection open.
const PING_PERIOD: Duration = Duration::from_secs(25);

enum Frame {
    Event(BrainstormEvent),
    Ping,
}

/// HTTP handler for the room's live event stream
///
/// GET /rooms/:id/events
/// Authorization happens before the room is touched: a rejected caller never
/// shows up in the presence count. The first frame is a local `hello`
/// handshake; everything after comes off the bus, interleaved with pings.
/// When the client disconnects, axum drops the response stream and the
/// subscription it owns, which removes the connection from the room.
#[instrument(name = "room_events", skip(state, headers))]
pub async fn room_events(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let claims = authorize_member(&headers, &state.token_config)?;

    let (subscriber, receiver) = ChannelSubscriber::channel();
    let subscription = state.event_bus.subscribe(&room_id, subscriber);
    info!(room_id = %room_id, user_id = %claims.sub, "Event stream opened");

    let hello = BrainstormEvent::Hello { now: Utc::now() };

    let events = UnboundedReceiverStream::new(receiver).map(Frame::Event);
    // interval fires immediately; skip that tick so pings start one period in.
    let pings = IntervalStream::new(tokio::time::interval(PING_PERIOD))
        .map(|_| Frame::Ping)
        .skip(1);

    let stream = stream::once(async move { Frame::Event(hello) })
        .chain(stream::select(events, pings))
        .map(move |frame| {
            // The subscription rides along with the stream; its Drop impl
            // unsubscribes when the connection closes.
            let _open = &subscription;
            let event = match frame {
                Frame::Event(event) => event_frame(&event),
                Frame::Ping => ping_frame(),
            };
            Ok::<_, Infallible>(event)
        });

    Ok(Sse::new(stream))
}

fn event_frame(event: &BrainstormEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|e| {
        error!(error = %e, event_type = event.event_type(), "Failed to serialize event");
        "{}".to_string()
    });
    Event::default().event(event.event_type()).data(data)
}

fn ping_frame() -> Event {
    let data = serde_json::json!({ "t": Utc::now().timestamp_millis() });
    Event::default().event("ping").data(data.to_string())
}
