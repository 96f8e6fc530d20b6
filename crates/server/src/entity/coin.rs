//! Collectible coin.

use crate::config::CoinConfig;
use crate::geometry::Circle;
use protocol::CoinTier;
use protocol::packets::CoinView;

/// Server-local coin identifier. Not sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoinId(pub u32);

/// A coin that players can absorb.
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: CoinId,
    pub circle: Circle,
    pub tier: CoinTier,
}

impl Coin {
    pub fn new(id: CoinId, circle: Circle, tier: CoinTier) -> Self {
        Self { id, circle, tier }
    }

    /// Wire representation.
    pub fn view(&self) -> CoinView {
        CoinView {
            x: self.circle.position.x,
            y: self.circle.position.y,
            radius: self.circle.radius,
            tier: self.tier,
        }
    }
}

/// Growth values and spawn weights per tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierTable {
    pub gold_value: u32,
    pub silver_value: u32,
    pub bronze_value: u32,
    /// A roll at or below this is gold.
    pub gold_threshold: f64,
    /// A roll at or below this (and above gold) is silver.
    pub silver_threshold: f64,
}

impl TierTable {
    pub fn from_config(config: &CoinConfig) -> Self {
        Self {
            gold_value: config.gold_value,
            silver_value: config.silver_value,
            bronze_value: config.bronze_value,
            gold_threshold: config.gold_threshold,
            silver_threshold: config.silver_threshold,
        }
    }

    /// Radius gained by absorbing a coin of `tier`.
    #[inline]
    pub fn value(&self, tier: CoinTier) -> u32 {
        match tier {
            CoinTier::Gold => self.gold_value,
            CoinTier::Silver => self.silver_value,
            CoinTier::Bronze => self.bronze_value,
        }
    }

    /// Map a uniform roll in `[0, 1)` onto a tier.
    pub fn pick(&self, roll: f64) -> CoinTier {
        if roll <= self.gold_threshold {
            CoinTier::Gold
        } else if roll <= self.silver_threshold {
            CoinTier::Silver
        } else {
            CoinTier::Bronze
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::from_config(&CoinConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_values() {
        let table = TierTable::default();
        assert_eq!(table.value(CoinTier::Gold), 6);
        assert_eq!(table.value(CoinTier::Silver), 3);
        assert_eq!(table.value(CoinTier::Bronze), 1);
    }

    #[test]
    fn test_tier_thresholds_are_inclusive() {
        let table = TierTable::default();
        assert_eq!(table.pick(0.0), CoinTier::Gold);
        assert_eq!(table.pick(0.1), CoinTier::Gold);
        assert_eq!(table.pick(0.100_001), CoinTier::Silver);
        assert_eq!(table.pick(0.35), CoinTier::Silver);
        assert_eq!(table.pick(0.36), CoinTier::Bronze);
        assert_eq!(table.pick(0.999), CoinTier::Bronze);
    }
}
