//! Server -> Client message building.

use crate::{Color, CoinTier, PlayerId, ProtocolError};
use serde::{Deserialize, Serialize};

/// A player as seen by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub line_width: f64,
    pub color: Color,
}

/// A collectible as seen by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinView {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(rename = "type")]
    pub tier: CoinTier,
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub width: f64,
    pub height: f64,
}

/// Full world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    pub players: Vec<PlayerView>,
    pub map: MapView,
    pub coins: Vec<CoinView>,
}

/// Messages pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once, privately, right after the connection is accepted.
    UpdatePlayerId { id: PlayerId },
    /// Sent to every open connection after each state change.
    UpdateGameState {
        #[serde(rename = "gameState")]
        game_state: GameStateView,
    },
}

impl ServerMessage {
    /// Serialize to the JSON text sent over the socket.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a server message (used by Rust clients and tests).
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Build the private id assignment message.
pub fn build_player_id(id: PlayerId) -> ServerMessage {
    ServerMessage::UpdatePlayerId { id }
}

/// Build the full-state broadcast message.
pub fn build_game_state(game_state: GameStateView) -> ServerMessage {
    ServerMessage::UpdateGameState { game_state }
}
