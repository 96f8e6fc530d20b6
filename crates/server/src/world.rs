//! World state management.
//!
//! Owns every player and coin on the board. All mutation goes through the
//! methods here so that player ids stay unique and the coin count never
//! exceeds its cap.

use crate::config::Config;
use crate::entity::{Coin, CoinId, Player};
use crate::geometry::Circle;
use glam::DVec2;
use protocol::packets::{GameStateView, MapView};
use protocol::{CoinTier, PlayerId};
use rand::Rng;
use thiserror::Error;

/// Errors returned by world mutators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("Player {0} is already in the world")]
    DuplicatePlayer(PlayerId),

    #[error("Coin cap of {0} reached")]
    CoinCapReached(usize),
}

/// Board bounds. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub width: f64,
    pub height: f64,
}

impl Board {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Random integer point at least `margin` away from every wall.
    ///
    /// Both ends of each range are reachable. A margin wider than half the
    /// board collapses the range to its lower end.
    pub fn random_spawn_point<R: Rng + ?Sized>(&self, margin: f64, rng: &mut R) -> DVec2 {
        DVec2::new(
            random_integer(rng, margin, self.width - margin),
            random_integer(rng, margin, self.height - margin),
        )
    }

    pub fn view(&self) -> MapView {
        MapView {
            width: self.width,
            height: self.height,
        }
    }
}

fn random_integer<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let (min, max) = (min.ceil() as i64, max.floor() as i64);
    if max <= min {
        return min as f64;
    }
    rng.random_range(min..=max) as f64
}

/// Live coins, bounded by a fixed cap.
#[derive(Debug, Clone)]
pub struct Coins {
    items: Vec<Coin>,
    cap: usize,
}

impl Coins {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn cap(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.items.iter()
    }

    fn insert(&mut self, coin: Coin) -> Result<CoinId, WorldError> {
        if self.is_full() {
            return Err(WorldError::CoinCapReached(self.cap));
        }
        let id = coin.id;
        self.items.push(coin);
        Ok(id)
    }

    /// Remove and return every coin matching `predicate`.
    pub fn take_where(&mut self, mut predicate: impl FnMut(&Coin) -> bool) -> Vec<Coin> {
        let mut taken = Vec::new();
        let mut i = 0;
        while i < self.items.len() {
            if predicate(&self.items[i]) {
                taken.push(self.items.swap_remove(i));
            } else {
                i += 1;
            }
        }
        taken
    }
}

/// The game world containing every player and coin.
#[derive(Debug)]
pub struct World {
    /// Insertion order is the broadcast order.
    players: Vec<Player>,
    coins: Coins,
    board: Board,
    next_coin_id: u32,
}

impl World {
    /// Create an empty world from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_board(
            Board::new(config.board.width, config.board.height),
            config.coin.max_count,
        )
    }

    pub fn with_board(board: Board, max_coins: usize) -> Self {
        Self {
            players: Vec::new(),
            coins: Coins::new(max_coins),
            board,
            next_coin_id: 1,
        }
    }

    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn coins(&self) -> &Coins {
        &self.coins
    }

    /// Add a player. Ids must be unique.
    pub fn add_player(&mut self, player: Player) -> Result<(), WorldError> {
        if self.player(player.id()).is_some() {
            return Err(WorldError::DuplicatePlayer(player.id()));
        }
        self.players.push(player);
        Ok(())
    }

    /// Remove a player, keeping the order of the rest.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id() == id)?;
        Some(self.players.remove(index))
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Borrow a player together with the coin set and the board.
    pub fn player_with_coins_mut(
        &mut self,
        id: PlayerId,
    ) -> Option<(&mut Player, &mut Coins, Board)> {
        let board = self.board;
        let player = self.players.iter_mut().find(|p| p.id() == id)?;
        Some((player, &mut self.coins, board))
    }

    /// Add a coin at `position`. Fails once the cap is reached.
    pub fn add_coin(
        &mut self,
        position: DVec2,
        radius: f64,
        tier: CoinTier,
    ) -> Result<CoinId, WorldError> {
        if self.coins.is_full() {
            return Err(WorldError::CoinCapReached(self.coins.cap()));
        }
        let id = CoinId(self.next_coin_id);
        self.next_coin_id = self.next_coin_id.wrapping_add(1);
        let circle = Circle {
            position,
            radius,
        };
        self.coins.insert(Coin::new(id, circle, tier))
    }

    /// Snapshot of the whole world in wire form.
    pub fn snapshot(&self) -> GameStateView {
        GameStateView {
            players: self.players.iter().map(Player::view).collect(),
            map: self.board.view(),
            coins: self.coins.iter().map(Coin::view).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::entity::PlayerName;
    use protocol::Color;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn player(id: u128, name: &str) -> Player {
        Player::new(
            PlayerId::from_u128(id),
            PlayerName::parse(name, 30).unwrap(),
            &PlayerConfig::default(),
            Color::default(),
        )
    }

    fn world() -> World {
        World::with_board(Board::new(800.0, 600.0), 3)
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let mut world = world();
        world.add_player(player(1, "a")).unwrap();
        assert_eq!(
            world.add_player(player(1, "b")),
            Err(WorldError::DuplicatePlayer(PlayerId::from_u128(1)))
        );
        assert_eq!(world.player_count(), 1);
        assert_eq!(world.player(PlayerId::from_u128(1)).unwrap().name(), "a");
    }

    #[test]
    fn test_remove_keeps_insertion_order() {
        let mut world = world();
        for id in 1..=4 {
            world.add_player(player(id, "p")).unwrap();
        }
        assert!(world.remove_player(PlayerId::from_u128(2)).is_some());
        assert!(world.remove_player(PlayerId::from_u128(2)).is_none());

        let ids: Vec<u128> = world.players().iter().map(|p| p.id().as_u128()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_coin_cap_enforced() {
        let mut world = world();
        for _ in 0..3 {
            world.add_coin(DVec2::new(100.0, 100.0), 7.0, CoinTier::Bronze).unwrap();
        }
        assert_eq!(
            world.add_coin(DVec2::new(100.0, 100.0), 7.0, CoinTier::Gold),
            Err(WorldError::CoinCapReached(3))
        );
        assert_eq!(world.coins().len(), 3);
    }

    #[test]
    fn test_coin_ids_are_unique_after_removal() {
        let mut world = world();
        world.add_player(player(1, "a")).unwrap();
        let a = world.add_coin(DVec2::ZERO, 7.0, CoinTier::Bronze).unwrap();
        let (_, coins, _) = world.player_with_coins_mut(PlayerId::from_u128(1)).unwrap();
        assert_eq!(coins.take_where(|coin| coin.id == a).len(), 1);
        let b = world.add_coin(DVec2::ZERO, 7.0, CoinTier::Bronze).unwrap();
        assert_ne!(a, b);
        assert!(world.coins().iter().any(|coin| coin.id == b));
    }

    #[test]
    fn test_spawn_point_stays_inside_margin() {
        let board = Board::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = board.random_spawn_point(50.0, &mut rng);
            assert!((50.0..=750.0).contains(&p.x));
            assert!((50.0..=550.0).contains(&p.y));
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.y.fract(), 0.0);
        }
    }

    #[test]
    fn test_snapshot_lists_everything() {
        let mut world = world();
        world.add_player(player(1, "a")).unwrap();
        world.add_coin(DVec2::new(60.0, 70.0), 7.0, CoinTier::Gold).unwrap();

        let snapshot = world.snapshot();
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.coins[0].tier, CoinTier::Gold);
        assert_eq!(snapshot.map.width, 800.0);
    }
}
