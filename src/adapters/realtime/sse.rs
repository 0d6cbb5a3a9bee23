//! Server-push transport over Server-Sent Events.
//!
//! Each bus event becomes one SSE message block (`event: <kind>`,
//! `id: <sequence>`, `data: <frame json>`). Idle streams get a
//! `:keep-alive` comment every keep-alive interval so proxies keep the
//! response open.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    Extension,
};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::domain::events::Event;
use crate::domain::foundation::AuthScope;

use super::manager::SubscriberHandle;
use super::messages::{ConnectedMessage, EventFrame, ServerMessage};
use super::RealtimeState;

/// Blocks buffered between the forwarding task and the response body.
const STREAM_BUFFER: usize = 8;

/// Open an event stream for the authorized caller.
///
/// Route: `GET /api/events/stream`
pub async fn sse_handler(
    Extension(scope): Extension<AuthScope>,
    State(state): State<RealtimeState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let keep_alive = KeepAlive::new()
        .interval(state.settings.keep_alive)
        .text("keep-alive");

    let (tx, rx) = mpsc::channel::<SseEvent>(STREAM_BUFFER);
    let handle = state.manager.register(scope);
    tokio::spawn(forward_events(handle, tx, state));

    Sse::new(ReceiverStream::new(rx).map(Ok::<_, Infallible>)).keep_alive(keep_alive)
}

fn encode(event: &Event) -> Result<SseEvent, axum::Error> {
    let frame = EventFrame::from_event(event).map_err(axum::Error::new)?;
    SseEvent::default()
        .event(event.kind().as_str())
        .id(event.sequence.to_string())
        .json_data(ServerMessage::Event(frame))
}

async fn forward_events(handle: SubscriberHandle, tx: mpsc::Sender<SseEvent>, state: RealtimeState) {
    let subscriber_id = handle.id();
    let push_timeout = state.settings.push_timeout;

    let connected = ServerMessage::Connected(ConnectedMessage::new(subscriber_id, handle.scope()));
    let mut alive = match SseEvent::default().event("connected").json_data(&connected) {
        Ok(block) => tx.send_timeout(block, push_timeout).await.is_ok(),
        Err(e) => {
            tracing::warn!(subscriber_id = %subscriber_id, "failed to encode connected frame: {}", e);
            true
        }
    };

    while alive {
        let event = tokio::select! {
            event = handle.next_event() => event,
            _ = tx.closed() => {
                tracing::debug!(subscriber_id = %subscriber_id, "client went away");
                break;
            }
        };
        let Some(event) = event else {
            tracing::debug!(subscriber_id = %subscriber_id, "queue closed");
            break;
        };

        let block = match encode(&event) {
            Ok(block) => block,
            Err(e) => {
                tracing::warn!(
                    subscriber_id = %subscriber_id,
                    sequence = event.sequence,
                    kind = %event.kind(),
                    "dropping event that failed to serialize: {}",
                    e
                );
                continue;
            }
        };

        alive = match tx.send_timeout(block, push_timeout).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(subscriber_id = %subscriber_id, "push failed, closing stream: {}", e);
                false
            }
        };
    }

    state.manager.deregister(subscriber_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{
        body::{Body, BodyDataStream},
        http::Request,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::adapters::realtime::test_support::{discontinued, realtime_state};
    use crate::adapters::realtime::TransportSettings;
    use crate::ports::EventPublisher;

    fn app(state: RealtimeState, scope: AuthScope) -> Router {
        Router::new()
            .route("/stream", get(sse_handler))
            .with_state(state)
            .layer(Extension(scope))
    }

    async fn open(app: Router) -> BodyDataStream {
        let response = app
            .oneshot(Request::builder().uri("/stream").body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.into_body().into_data_stream()
    }

    async fn next_block(body: &mut BodyDataStream) -> String {
        let chunk = body.next().await.unwrap().unwrap();
        String::from_utf8(chunk.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn stream_starts_connected_then_carries_event_blocks() {
        let (bus, state) = realtime_state(TransportSettings::default());
        let mut body = open(app(state, AuthScope::sales())).await;

        let connected = next_block(&mut body).await;
        assert!(connected.contains("event: connected\n"));
        assert!(connected.contains("\"type\":\"connected\""));

        let sequence = bus.publish(discontinued(7));
        let block = next_block(&mut body).await;
        assert!(block.contains("event: ProductDiscontinued\n"));
        assert!(block.contains(&format!("id: {}\n", sequence)));
        assert!(block.contains("data: {"));
        assert!(block.contains("\"type\":\"event\""));
        assert!(block.ends_with("\n\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_stream_emits_keep_alive_comment() {
        let settings = TransportSettings {
            keep_alive: Duration::from_secs(15),
            ..TransportSettings::default()
        };
        let (_bus, state) = realtime_state(settings);
        let mut body = open(app(state, AuthScope::sales())).await;
        next_block(&mut body).await;

        let started = tokio::time::Instant::now();
        let block = next_block(&mut body).await;
        assert!(block.starts_with(':'));
        assert!(block.contains("keep-alive"));
        assert!(started.elapsed() >= Duration::from_secs(15));
    }

    #[tokio::test]
    async fn dropping_the_response_deregisters() {
        let (bus, state) = realtime_state(TransportSettings::default());
        let manager = state.manager.clone();
        let mut body = open(app(state, AuthScope::sales())).await;
        next_block(&mut body).await;
        assert_eq!(manager.subscriber_count(), 1);

        drop(body);
        for _ in 0..100 {
            if manager.subscriber_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(manager.subscriber_count(), 0);
        assert_eq!(bus.subscription_count(), 0);
    }

    #[tokio::test]
    async fn closing_subscribers_ends_the_response() {
        let (_bus, state) = realtime_state(TransportSettings::default());
        let manager = state.manager.clone();
        let mut body = open(app(state, AuthScope::sales())).await;
        next_block(&mut body).await;

        manager.close_all();
        let end = tokio::time::timeout(Duration::from_secs(1), body.next()).await;
        assert!(matches!(end, Ok(None)));
    }
}
