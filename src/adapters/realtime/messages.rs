//! Wire frames shared by both realtime transports.
//!
//! - Server → Client: connected, event, pong, error
//! - Client → Server (WebSocket only): ping, request_state

use serde::{Deserialize, Serialize};

use crate::domain::events::{Event, EventKind};
use crate::domain::foundation::{AuthScope, OrderId, Timestamp};

use super::manager::SubscriberId;

// ============================================
// Server → Client Messages
// ============================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First frame on every connection.
    Connected(ConnectedMessage),

    /// One bus event.
    Event(EventFrame),

    /// Heartbeat response.
    Pong(PongMessage),

    Error(ErrorMessage),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub subscriber_id: String,
    pub scope: AuthScope,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl ConnectedMessage {
    pub fn new(subscriber_id: SubscriberId, scope: AuthScope) -> Self {
        Self {
            subscriber_id: subscriber_id.to_string(),
            scope,
            timestamp: Timestamp::now().as_millis(),
        }
    }
}

/// Serialized form of a published [`Event`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrame {
    pub kind: EventKind,
    pub sequence: u64,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub payload: serde_json::Value,
}

impl EventFrame {
    pub fn from_event(event: &Event) -> Result<Self, serde_json::Error> {
        Ok(Self {
            kind: event.kind(),
            sequence: event.sequence,
            timestamp: event.timestamp.as_millis(),
            payload: event.payload.payload_json()?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: i64,
}

impl PongMessage {
    pub fn now() -> Self {
        Self {
            timestamp: Timestamp::now().as_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,

    /// Ask for an `OrderUpdated` announcement of one order, e.g. after reconnecting.
    #[serde(rename_all = "camelCase")]
    RequestState { order_id: OrderId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{DomainEvent, ProductDiscontinuedPayload};
    use crate::domain::foundation::{ProductId, StationId};
    use crate::domain::routing::Audience;

    #[test]
    fn event_frame_carries_kind_sequence_and_payload() {
        let event = Event {
            sequence: 9,
            timestamp: Timestamp::from_millis(1_700_000_000_000).unwrap(),
            audience: Audience::stations([StationId::new(1)]),
            payload: DomainEvent::ProductDiscontinued(ProductDiscontinuedPayload {
                id: ProductId::new(3),
            }),
        };

        let frame = ServerMessage::Event(EventFrame::from_event(&event).unwrap());
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "event",
                "kind": "ProductDiscontinued",
                "sequence": 9,
                "timestamp": 1_700_000_000_000i64,
                "payload": {"id": 3}
            })
        );
    }

    #[test]
    fn connected_frame_includes_scope() {
        let msg = ServerMessage::Connected(ConnectedMessage::new(
            SubscriberId::new(),
            AuthScope::station(StationId::new(4)),
        ));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["scope"], serde_json::json!({"role": "station", "stationId": 4}));
    }

    #[test]
    fn client_messages_parse() {
        let ping: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(ping, ClientMessage::Ping);

        let request: ClientMessage =
            serde_json::from_str(r#"{"type":"request_state","orderId":12}"#).unwrap();
        assert_eq!(
            request,
            ClientMessage::RequestState {
                order_id: OrderId::new(12)
            }
        );
    }

    #[test]
    fn unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }
}
