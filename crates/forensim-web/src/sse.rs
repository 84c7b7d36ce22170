//! Server-Sent Events (SSE) for snapshot notifications.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::extract::State;
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::SharedState;

/// GET /api/events: one JSON event per published or discarded snapshot.
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    // Lagged receivers skip missed events rather than closing the stream.
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let event = result.ok()?;
        let data = serde_json::to_string(&event).ok()?;
        Some(Ok(Event::default().event("snapshot").data(data)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
