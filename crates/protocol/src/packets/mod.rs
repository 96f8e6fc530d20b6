//! Message definitions for the arena protocol.
//!
//! This module contains both client->server and server->client message types.
//! Every message is a JSON object `{ "type": ..., "data": ... }`.

mod client;
mod server;

pub use client::*;
pub use server::*;

/// Message type tags for client -> server messages.
pub mod client_types {
    pub const UPDATE_PLAYER_POSITION: &str = "updatePlayerPosition";
}

/// Message type tags for server -> client messages.
pub mod server_types {
    pub const UPDATE_PLAYER_ID: &str = "updatePlayerId";
    pub const UPDATE_GAME_STATE: &str = "updateGameState";
}
