//! Collision detection and resolution.
//!
//! A player absorbs a coin once the coin's circle lies entirely inside the
//! player's circle. Every absorbable coin is taken in the same pass.

use crate::entity::{Coin, Player, TierTable};
use crate::geometry::Circle;
use crate::world::Coins;

/// Whether `absorber` fully encloses `target`.
#[inline]
pub fn is_absorbable(absorber: &Circle, target: &Circle) -> bool {
    absorber.encloses(target)
}

/// Absorb every coin currently enclosed by `player`.
///
/// Enclosure is tested against the radius the player had before this pass;
/// growth from one coin does not pull in a neighbour within the same call.
/// Returns the coins that were removed.
pub fn absorb_coins(player: &mut Player, coins: &mut Coins, tiers: &TierTable) -> Vec<Coin> {
    let body = player.circle();
    let absorbed = coins.take_where(|coin| is_absorbable(&body, &coin.circle));

    for coin in &absorbed {
        player.grow(f64::from(tiers.value(coin.tier)));
    }

    absorbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::entity::PlayerName;
    use crate::world::{Board, World};
    use glam::DVec2;
    use protocol::{CoinTier, Color, PlayerId};

    fn world_with_player(x: f64, y: f64) -> (World, PlayerId) {
        let mut world = World::with_board(Board::new(800.0, 600.0), 10);
        let id = PlayerId::from_u128(1);
        let mut player = Player::new(
            id,
            PlayerName::parse("eater", 30).unwrap(),
            &PlayerConfig::default(),
            Color::default(),
        );
        player.set_position(DVec2::new(x, y));
        world.add_player(player).unwrap();
        (world, id)
    }

    #[test]
    fn test_enclosed_bronze_is_absorbed() {
        let (mut world, id) = world_with_player(100.0, 100.0);
        world.add_coin(DVec2::new(105.0, 100.0), 7.0, CoinTier::Bronze).unwrap();

        let (player, coins, _) = world.player_with_coins_mut(id).unwrap();
        let absorbed = absorb_coins(player, coins, &TierTable::default());

        assert_eq!(absorbed.len(), 1);
        assert_eq!(world.player(id).unwrap().radius(), 21.0);
        assert!(world.coins().is_empty());
    }

    #[test]
    fn test_all_enclosed_coins_absorbed_in_one_pass() {
        let (mut world, id) = world_with_player(100.0, 100.0);
        world.add_coin(DVec2::new(100.0, 100.0), 7.0, CoinTier::Gold).unwrap();
        world.add_coin(DVec2::new(108.0, 100.0), 7.0, CoinTier::Silver).unwrap();
        world.add_coin(DVec2::new(100.0, 90.0), 7.0, CoinTier::Bronze).unwrap();
        // Overlapping but not enclosed.
        let far = world.add_coin(DVec2::new(118.0, 100.0), 7.0, CoinTier::Gold).unwrap();

        let (player, coins, _) = world.player_with_coins_mut(id).unwrap();
        let absorbed = absorb_coins(player, coins, &TierTable::default());

        assert_eq!(absorbed.len(), 3);
        assert_eq!(world.player(id).unwrap().radius(), 20.0 + 6.0 + 3.0 + 1.0);
        assert_eq!(world.coins().len(), 1);
        assert!(world.coins().iter().any(|coin| coin.id == far));
    }

    #[test]
    fn test_nothing_enclosed_leaves_radius_alone() {
        let (mut world, id) = world_with_player(100.0, 100.0);
        world.add_coin(DVec2::new(300.0, 300.0), 7.0, CoinTier::Gold).unwrap();

        let (player, coins, _) = world.player_with_coins_mut(id).unwrap();
        assert!(absorb_coins(player, coins, &TierTable::default()).is_empty());
        assert_eq!(world.player(id).unwrap().radius(), 20.0);
        assert_eq!(world.coins().len(), 1);
    }

    #[test]
    fn test_is_absorbable_boundary() {
        let player = Circle::new(0.0, 0.0, 20.0);
        assert!(is_absorbable(&player, &Circle::new(0.0, 13.0, 7.0)));
        assert!(!is_absorbable(&player, &Circle::new(0.0, 13.01, 7.0)));
    }
}
