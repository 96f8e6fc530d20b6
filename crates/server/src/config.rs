//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write default config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub coin: CoinConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from `path`, writing a default file when it is missing.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&contents)?
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.board.width > 0.0 && self.board.height > 0.0) {
            return invalid("board dimensions must be positive");
        }
        if !(self.player.radius > 0.0) {
            return invalid("player.radius must be positive");
        }
        if !(self.player.line_width >= 0.0) {
            return invalid("player.line_width must not be negative");
        }
        if !(self.player.speed > 0.0) {
            return invalid("player.speed must be positive");
        }
        if self.server.max_name_length == 0 {
            return invalid("server.max_name_length must be at least 1");
        }
        if !(self.coin.radius > 0.0) {
            return invalid("coin.radius must be positive");
        }
        if !(self.coin.spawn_margin >= 0.0) {
            return invalid("coin.spawn_margin must not be negative");
        }
        if self.coin.min_delay_ms > self.coin.max_delay_ms {
            return invalid("coin.min_delay_ms must not exceed coin.max_delay_ms");
        }
        let (gold, silver) = (self.coin.gold_threshold, self.coin.silver_threshold);
        if !((0.0..=1.0).contains(&gold) && (0.0..=1.0).contains(&silver) && gold <= silver) {
            return invalid("coin thresholds must satisfy 0 <= gold <= silver <= 1");
        }
        Ok(())
    }
}

/// Server networking and general settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Names longer than this are truncated (in characters).
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_name_length: default_max_name_length(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3010
}
fn default_max_name_length() -> usize {
    30
}

/// Board dimensions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    #[serde(default = "default_board_width")]
    pub width: f64,
    #[serde(default = "default_board_height")]
    pub height: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: default_board_width(),
            height: default_board_height(),
        }
    }
}

fn default_board_width() -> f64 {
    800.0
}
fn default_board_height() -> f64 {
    600.0
}

/// Player configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Starting radius.
    #[serde(default = "default_player_radius")]
    pub radius: f64,
    /// Outline stroke width; counts toward the wall clearance.
    #[serde(default = "default_player_line_width")]
    pub line_width: f64,
    /// Distance per millisecond of held input.
    #[serde(default = "default_player_speed")]
    pub speed: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: default_player_radius(),
            line_width: default_player_line_width(),
            speed: default_player_speed(),
        }
    }
}

fn default_player_radius() -> f64 {
    20.0
}
fn default_player_line_width() -> f64 {
    5.0
}
fn default_player_speed() -> f64 {
    0.1
}

/// Collectible configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoinConfig {
    #[serde(default = "default_coin_radius")]
    pub radius: f64,
    /// Maximum number of coins alive at once.
    #[serde(default = "default_coin_max_count")]
    pub max_count: usize,
    /// Distance from each wall that spawns stay clear of.
    #[serde(default = "default_coin_spawn_margin")]
    pub spawn_margin: f64,
    #[serde(default = "default_coin_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_coin_min_delay")]
    pub min_delay_ms: u64,
    #[serde(default = "default_coin_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_coin_gold_value")]
    pub gold_value: u32,
    #[serde(default = "default_coin_silver_value")]
    pub silver_value: u32,
    #[serde(default = "default_coin_bronze_value")]
    pub bronze_value: u32,
    /// Cumulative probability of a gold spawn.
    #[serde(default = "default_coin_gold_threshold")]
    pub gold_threshold: f64,
    /// Cumulative probability of a gold or silver spawn.
    #[serde(default = "default_coin_silver_threshold")]
    pub silver_threshold: f64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            radius: default_coin_radius(),
            max_count: default_coin_max_count(),
            spawn_margin: default_coin_spawn_margin(),
            initial_delay_ms: default_coin_initial_delay(),
            min_delay_ms: default_coin_min_delay(),
            max_delay_ms: default_coin_max_delay(),
            gold_value: default_coin_gold_value(),
            silver_value: default_coin_silver_value(),
            bronze_value: default_coin_bronze_value(),
            gold_threshold: default_coin_gold_threshold(),
            silver_threshold: default_coin_silver_threshold(),
        }
    }
}

fn default_coin_radius() -> f64 {
    7.0
}
fn default_coin_max_count() -> usize {
    10
}
fn default_coin_spawn_margin() -> f64 {
    50.0
}
fn default_coin_initial_delay() -> u64 {
    5000
}
fn default_coin_min_delay() -> u64 {
    5000
}
fn default_coin_max_delay() -> u64 {
    10000
}
fn default_coin_gold_value() -> u32 {
    6
}
fn default_coin_silver_value() -> u32 {
    3
}
fn default_coin_bronze_value() -> u32 {
    1
}
fn default_coin_gold_threshold() -> f64 {
    0.1
}
fn default_coin_silver_threshold() -> f64 {
    0.35
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.server.port, 3010);
        assert_eq!(config.board.width, 800.0);
        assert_eq!(config.coin.max_count, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [board]
            width = 1024.0

            [coin]
            max_count = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.board.width, 1024.0);
        assert_eq!(config.board.height, 600.0);
        assert_eq!(config.coin.max_count, 3);
        assert_eq!(config.coin.gold_value, 6);
        assert_eq!(config.player.speed, 0.1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.coin.min_delay_ms = 20_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.coin.gold_threshold = 0.5;
        config.coin.silver_threshold = 0.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.board.height = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_writes_default_file() {
        let path = std::env::temp_dir().join(format!("arena-config-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.coin.max_delay_ms, config.coin.max_delay_ms);

        std::fs::remove_file(&path).unwrap();
    }
}
