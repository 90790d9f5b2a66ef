use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::event::{BrainstormEvent, Subscriber};

/// Bridges the synchronous fan-out loop to an async SSE response stream.
///
/// `deliver` never blocks: it copies the event into an unbounded channel
/// drained by the connection's stream task. A closed channel (the client
/// went away but the unsubscribe has not landed yet) is dropped quietly so
/// one dead connection cannot disturb delivery to the rest of the room.
pub struct ChannelSubscriber {
    sender: UnboundedSender<BrainstormEvent>,
}

impl ChannelSubscriber {
    pub fn channel() -> (Arc<Self>, UnboundedReceiver<BrainstormEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

impl Subscriber for ChannelSubscriber {
    fn deliver(&self, event: &BrainstormEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!(
                event_type = event.event_type(),
                "Dropping event for a closed stream"
            );
        }
    }
}
