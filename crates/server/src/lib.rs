//! Coin arena game server library.

pub mod collision;
pub mod config;
pub mod entity;
pub mod geometry;
pub mod movement;
pub mod server;
pub mod spawner;
pub mod world;

// Re-export commonly used types
pub use config::Config;
pub use server::{GameState, SharedGame, run, serve, shutdown_signal};
