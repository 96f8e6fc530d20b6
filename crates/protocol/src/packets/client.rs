//! Client -> Server message parsing.

use super::client_types;
use crate::{PlayerId, ProtocolError};
use serde::{Deserialize, Serialize};

/// Held-direction state of the four movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub up_pressed: bool,
    pub down_pressed: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
}

/// Payload of `updatePlayerPosition`.
///
/// Timestamps are client clock readings in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerPosition {
    pub player_id: PlayerId,
    pub controls: Controls,
    pub timestamp: f64,
    pub prev_timestamp: f64,
}

impl UpdatePlayerPosition {
    /// Client-reported time since the previous input sample.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.timestamp - self.prev_timestamp
    }
}

/// Parsed client message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Input sample for the sender's player.
    UpdatePlayerPosition(UpdatePlayerPosition),
}

/// The outer `{ type, data }` shape, decoded before the payload.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ClientMessage {
    /// Parse a client message from a text frame.
    ///
    /// A well-formed envelope with an unrecognised `type` yields
    /// [`ProtocolError::UnknownType`] so callers can drop it without treating
    /// it as garbage.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(raw)?;

        match envelope.kind.as_str() {
            client_types::UPDATE_PLAYER_POSITION => Ok(ClientMessage::UpdatePlayerPosition(
                serde_json::from_value(envelope.data)?,
            )),
            _ => Err(ProtocolError::UnknownType(envelope.kind)),
        }
    }

    /// Serialize to the JSON text sent over the socket.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = "6f1c2a3e-1b2d-4c5e-8f90-123456789abc";

    #[test]
    fn test_parse_update_position() {
        let raw = format!(
            r#"{{"type":"updatePlayerPosition","data":{{"playerId":"{PLAYER}","controls":{{"upPressed":true,"downPressed":false,"leftPressed":false,"rightPressed":true}},"timestamp":1016.5,"prevTimestamp":1000}}}}"#
        );

        let ClientMessage::UpdatePlayerPosition(update) = ClientMessage::parse(&raw).unwrap();
        assert_eq!(update.player_id.to_string(), PLAYER);
        assert!(update.controls.up_pressed);
        assert!(update.controls.right_pressed);
        assert!(!update.controls.down_pressed);
        assert_eq!(update.elapsed(), 16.5);
    }

    #[test]
    fn test_unknown_type_is_reported_separately() {
        let err = ClientMessage::parse(r#"{"type":"chat","data":{"text":"hi"}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownType(kind) if kind == "chat"));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            ClientMessage::parse("not json"),
            Err(ProtocolError::Json(_))
        ));
        // Known type, payload missing required fields.
        assert!(matches!(
            ClientMessage::parse(r#"{"type":"updatePlayerPosition","data":{"playerId":"x"}}"#),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn test_encode_matches_parse() {
        let message = ClientMessage::UpdatePlayerPosition(UpdatePlayerPosition {
            player_id: PLAYER.parse().unwrap(),
            controls: Controls {
                left_pressed: true,
                ..Controls::default()
            },
            timestamp: 20.0,
            prev_timestamp: 4.0,
        });
        let text = message.encode().unwrap();
        assert!(text.starts_with(r#"{"type":"updatePlayerPosition","data":{"playerId":"#));
        assert_eq!(ClientMessage::parse(&text).unwrap(), message);
    }
}
