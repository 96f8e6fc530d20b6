//! Player entity.

use crate::config::PlayerConfig;
use crate::geometry::Circle;
use glam::DVec2;
use protocol::packets::PlayerView;
use protocol::{Color, PlayerId};
use rand::Rng;

/// A display name that has been trimmed, checked non-empty and length-capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Normalize a connection-supplied name.
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str, max_len: usize) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let capped: String = trimmed.chars().take(max_len).collect();
        Some(Self(capped.trim_end().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A connected player's avatar.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: PlayerName,
    position: DVec2,
    /// Only ever grows, see [`Player::grow`].
    radius: f64,
    line_width: f64,
    color: Color,
}

impl Player {
    /// Create a player at the spawn corner `(2r, 2r)`.
    pub fn new(id: PlayerId, name: PlayerName, config: &PlayerConfig, color: Color) -> Self {
        let start = config.radius * 2.0;
        Self {
            id,
            name,
            position: DVec2::new(start, start),
            radius: config.radius,
            line_width: config.line_width,
            color,
        }
    }

    /// Create a player with a random outline color.
    pub fn with_random_color<R: Rng + ?Sized>(
        id: PlayerId,
        name: PlayerName,
        config: &PlayerConfig,
        rng: &mut R,
    ) -> Self {
        let color = Color::from_rgb24(rng.random_range(0..=0xFF_FFFF));
        Self::new(id, name, config, color)
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The collision shape (stroke excluded).
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle {
            position: self.position,
            radius: self.radius,
        }
    }

    /// Minimum distance the center keeps from every wall.
    #[inline]
    pub fn wall_clearance(&self) -> f64 {
        self.radius + self.line_width
    }

    pub(crate) fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Increase the radius. Non-positive and NaN amounts are ignored.
    pub fn grow(&mut self, amount: f64) {
        if amount > 0.0 {
            self.radius += amount;
        }
    }

    /// Wire representation.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.as_str().to_string(),
            x: self.position.x,
            y: self.position.y,
            radius: self.radius,
            line_width: self.line_width,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw, 30).unwrap()
    }

    #[test]
    fn test_name_is_trimmed_and_capped() {
        assert_eq!(name("  ada  ").as_str(), "ada");
        assert_eq!(PlayerName::parse("abcdef", 4).unwrap().as_str(), "abcd");
        // A cut landing on whitespace must not leave it behind.
        assert_eq!(PlayerName::parse("ab   cd", 3).unwrap().as_str(), "ab");
        assert_eq!(PlayerName::parse("  ab   cd  ", 4).unwrap().as_str(), "ab");
        assert!(PlayerName::parse("   ", 30).is_none());
        assert!(PlayerName::parse("", 30).is_none());
    }

    #[test]
    fn test_spawns_at_twice_radius() {
        let player = Player::new(PlayerId::nil(), name("ada"), &PlayerConfig::default(), Color::default());
        assert_eq!(player.position(), DVec2::new(40.0, 40.0));
        assert_eq!(player.radius(), 20.0);
        assert_eq!(player.wall_clearance(), 25.0);
    }

    #[test]
    fn test_grow_never_shrinks() {
        let mut player = Player::new(PlayerId::nil(), name("ada"), &PlayerConfig::default(), Color::default());
        player.grow(3.0);
        player.grow(-10.0);
        player.grow(f64::NAN);
        assert_eq!(player.radius(), 23.0);
    }
}
