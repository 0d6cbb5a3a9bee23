//! Bidirectional push transport.
//!
//! Connection lifecycle:
//! 1. Caller is already authorized; its [`AuthScope`] arrives as a request extension
//! 2. Upgrade to WebSocket and register with the subscriber manager
//! 3. Send the `connected` frame
//! 4. Forward queued events until the queue closes, a push fails or times out,
//!    or the client goes away
//! 5. Deregister

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Extension,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::application::handlers::order::AnnounceOrderCommand;
use crate::domain::foundation::AuthScope;

use super::manager::{SubscriberHandle, SubscriberId};
use super::messages::{ClientMessage, ConnectedMessage, ErrorMessage, EventFrame, PongMessage, ServerMessage};
use super::RealtimeState;

/// Control frames produced by the receive side, sent by the send side.
const CONTROL_BUFFER: usize = 16;

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /api/events/ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(scope): Extension<AuthScope>,
    State(state): State<RealtimeState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, scope, state))
}

async fn handle_socket(socket: WebSocket, scope: AuthScope, state: RealtimeState) {
    let (sender, receiver) = socket.split();
    serve_connection(sender, receiver, scope, state).await;
}

/// Runs one connection to completion over the two halves of a socket.
async fn serve_connection<S, R>(mut sender: S, mut receiver: R, scope: AuthScope, state: RealtimeState)
where
    S: Sink<Message, Error = axum::Error> + Unpin + Send + 'static,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    let handle = state.manager.register(scope);
    let subscriber_id = handle.id();

    let connected = ServerMessage::Connected(ConnectedMessage::new(subscriber_id, scope));
    if let Err(e) = push(&mut sender, &connected, &state).await {
        tracing::debug!(subscriber_id = %subscriber_id, "failed to send connected frame: {}", e);
        state.manager.deregister(subscriber_id);
        return;
    }

    let (control_tx, control_rx) = mpsc::channel::<ServerMessage>(CONTROL_BUFFER);

    let mut send_task = {
        let state = state.clone();
        tokio::spawn(forward_events(sender, handle, control_rx, state))
    };

    let mut recv_task = {
        let state = state.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        handle_client_text(&text, subscriber_id, scope, &control_tx, &state).await;
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(subscriber_id = %subscriber_id, "unsupported binary frame");
                    }
                    // Protocol-level ping/pong is answered by axum.
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(subscriber_id = %subscriber_id, "client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(subscriber_id = %subscriber_id, "receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.manager.deregister(subscriber_id);
}

async fn forward_events<S>(
    mut sender: S,
    handle: SubscriberHandle,
    mut control: mpsc::Receiver<ServerMessage>,
    state: RealtimeState,
) where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let subscriber_id = handle.id();
    loop {
        let message = tokio::select! {
            event = handle.next_event() => {
                let Some(event) = event else {
                    tracing::debug!(subscriber_id = %subscriber_id, "queue closed");
                    break;
                };
                match EventFrame::from_event(&event) {
                    Ok(frame) => ServerMessage::Event(frame),
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
                }
            }
            Some(reply) = control.recv() => reply,
        };

        if let Err(e) = push(&mut sender, &message, &state).await {
            tracing::debug!(subscriber_id = %subscriber_id, "push failed, closing connection: {}", e);
            break;
        }
    }

    // A wedged socket may never finish the close handshake.
    let _ = tokio::time::timeout(state.settings.push_timeout, sender.close()).await;
}

async fn handle_client_text(
    text: &str,
    subscriber_id: SubscriberId,
    scope: AuthScope,
    control: &mpsc::Sender<ServerMessage>,
    state: &RealtimeState,
) {
    let reply = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => {
            tracing::trace!(subscriber_id = %subscriber_id, "received ping");
            Some(ServerMessage::Pong(PongMessage::now()))
        }
        Ok(ClientMessage::RequestState { order_id }) => {
            // The announcement reaches this connection through the bus like any other event.
            match state
                .announcer
                .handle(AnnounceOrderCommand { scope, order_id })
                .await
            {
                Ok(_) => None,
                Err(e) => Some(ServerMessage::Error(ErrorMessage::new(
                    e.code().to_string(),
                    e.message(),
                ))),
            }
        }
        Err(e) => {
            tracing::debug!(subscriber_id = %subscriber_id, "malformed client frame: {}", e);
            Some(ServerMessage::Error(ErrorMessage::new(
                "INVALID_ARGUMENT",
                "Unrecognized message",
            )))
        }
    };

    if let Some(reply) = reply {
        // A full control buffer means the send side is wedged; it will time out on its own.
        let _ = control.try_send(reply);
    }
}

#[derive(Debug, thiserror::Error)]
enum PushError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("socket error: {0}")]
    Socket(#[from] axum::Error),
    #[error("push timed out")]
    Timeout,
}

/// Send one JSON frame, bounded by the configured push timeout.
async fn push<S>(sender: &mut S, msg: &ServerMessage, state: &RealtimeState) -> Result<(), PushError>
where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg)?;
    tokio::time::timeout(state.settings.push_timeout, sender.send(Message::Text(json)))
        .await
        .map_err(|_| PushError::Timeout)??;
    Ok(())
}
