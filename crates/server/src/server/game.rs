//! Session manager: the single owner of the world.
//!
//! Every event (connect, message, disconnect, spawn timer) takes the write
//! lock on [`GameState`], runs to completion, and queues its broadcast before
//! the lock is released. That makes each read-modify-broadcast sequence
//! atomic with respect to the others.

use crate::collision::absorb_coins;
use crate::config::Config;
use crate::entity::{CoinId, Player, PlayerName, TierTable};
use crate::movement::apply_controls;
use crate::spawner::{self, SpawnScheduler, SpawnSettings};
use crate::world::World;
use protocol::packets::{self, ClientMessage, ServerMessage, UpdatePlayerPosition};
use protocol::{PlayerId, ProtocolError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::client::{Client, Outbound};

/// Handle shared by the transport and the spawn timer.
pub type SharedGame = Arc<RwLock<GameState>>;

/// Main game state.
pub struct GameState {
    pub config: Config,
    world: World,
    clients: HashMap<PlayerId, Client>,
    spawner: SpawnScheduler,
    tiers: TierTable,
    rng: StdRng,
    /// Set by [`GameState::shutdown`]; no joins or spawns afterwards.
    closed: bool,
}

impl GameState {
    /// Create a new game state seeded from the OS.
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a new game state with a caller-provided RNG.
    pub fn with_rng(config: &Config, rng: StdRng) -> Self {
        Self {
            config: config.clone(),
            world: World::new(config),
            clients: HashMap::new(),
            spawner: SpawnScheduler::new(SpawnSettings::from_config(&config.coin)),
            tiers: TierTable::from_config(&config.coin),
            rng,
            closed: false,
        }
    }

    /// Wrap in the shared handle used by the async entry points.
    pub fn into_shared(self) -> SharedGame {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.spawner.is_active()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Register a new player and its connection.
    ///
    /// The new client gets its id privately first, then everyone (the new
    /// client included) gets the full state. Returns `None` once the game
    /// has been shut down.
    pub fn add_client(
        &mut self,
        name: PlayerName,
        addr: Option<SocketAddr>,
    ) -> Option<(PlayerId, mpsc::UnboundedReceiver<Outbound>)> {
        if self.closed {
            info!("Refusing {:?} from {:?}: game is shut down", name.as_str(), addr);
            return None;
        }

        let id = loop {
            let candidate = uuid::Builder::from_random_bytes(self.rng.random()).into_uuid();
            if self.clients.contains_key(&candidate) {
                continue;
            }
            let player =
                Player::with_random_color(candidate, name.clone(), &self.config.player, &mut self.rng);
            match self.world.add_player(player) {
                Ok(()) => break candidate,
                Err(e) => debug!("Retrying player id: {}", e),
            }
        };
        info!("Player {} ({:?}) joined from {:?}", id, name.as_str(), addr);

        let (client, rx) = Client::new(id, addr);
        self.clients.insert(id, client);

        self.send_to(id, &packets::build_player_id(id));
        self.broadcast_state();
        Some((id, rx))
    }

    /// Drop a player and its connection, then rebroadcast.
    ///
    /// Returns `false` when the player was already gone.
    pub fn remove_client(&mut self, id: PlayerId) -> bool {
        let client = self.clients.remove(&id);
        let player = self.world.remove_player(id);
        if client.is_none() && player.is_none() {
            return false;
        }

        if let Some(client) = client {
            info!(
                "Player {} ({:?}) disconnected after {:.1}s",
                client.id,
                client.addr,
                client.connected_at.elapsed().as_secs_f64()
            );
        }
        self.broadcast_state();
        true
    }

    /// Decode and apply a raw text frame from `sender`.
    pub fn handle_message(&mut self, sender: PlayerId, raw: &str) -> Result<bool, ProtocolError> {
        match ClientMessage::parse(raw)? {
            ClientMessage::UpdatePlayerPosition(update) => Ok(self.update_player_position(sender, &update)),
        }
    }

    /// Movement, then absorption, then broadcast.
    ///
    /// Updates naming another player, or a player that no longer exists, are
    /// ignored. Returns whether the update was applied.
    pub fn update_player_position(&mut self, sender: PlayerId, update: &UpdatePlayerPosition) -> bool {
        if update.player_id != sender {
            debug!("Player {} sent an update for {}", sender, update.player_id);
            return false;
        }

        let speed = self.config.player.speed;
        let Some((player, coins, board)) = self.world.player_with_coins_mut(update.player_id) else {
            debug!("Update for unknown player {}", update.player_id);
            return false;
        };

        apply_controls(player, &update.controls, update.elapsed(), speed, board);
        let absorbed = absorb_coins(player, coins, &self.tiers);
        if !absorbed.is_empty() {
            debug!(
                "Player {} absorbed {} coin(s), radius now {}",
                update.player_id,
                absorbed.len(),
                player.radius()
            );
        }

        self.broadcast_state();
        true
    }

    /// One spawn attempt. Broadcasts only when a coin was placed.
    pub fn spawn_tick(&mut self) -> Option<CoinId> {
        let id = spawner::spawn_coin(&mut self.world, self.spawner.settings(), &mut self.rng)?;
        self.broadcast_state();
        Some(id)
    }

    /// Delay until the next spawn attempt.
    pub fn next_spawn_delay(&mut self) -> Duration {
        self.spawner.settings().next_delay(&mut self.rng)
    }

    /// Send the full state to every open connection.
    pub fn broadcast_state(&self) {
        let message = packets::build_game_state(self.world.snapshot());
        let payload: Arc<str> = match message.encode() {
            Ok(text) => text.into(),
            Err(e) => {
                warn!("Failed to encode game state: {}", e);
                return;
            }
        };
        for client in self.clients.values() {
            client.send(Outbound::Text(Arc::clone(&payload)));
        }
    }

    fn send_to(&self, id: PlayerId, message: &ServerMessage) {
        let Some(client) = self.clients.get(&id) else {
            return;
        };
        match message.encode() {
            Ok(text) => {
                client.send(Outbound::Text(text.into()));
            }
            Err(e) => warn!("Failed to encode message for {}: {}", id, e),
        }
    }

    /// Close every connection and cancel the spawn timer for good.
    ///
    /// Later joins are refused and the timer is never restarted.
    pub fn shutdown(&mut self) {
        self.closed = true;
        if self.spawner.stop() {
            info!("Coin spawning stopped");
        }
        info!("Closing {} connection(s)", self.client_count());
        for (id, client) in self.clients.drain() {
            self.world.remove_player(id);
            client.send(Outbound::Close);
        }
    }
}

/// Start or stop the spawn timer to match the current player count.
fn sync_spawner(game: &mut GameState, state: &SharedGame) {
    if game.is_closed() {
        return;
    }
    let wanted = spawner::should_be_active(game.world.player_count());
    if wanted && !game.is_spawning() {
        let weak = Arc::downgrade(state);
        game.spawner
            .start(|generation, delay| tokio::spawn(run_spawn_timer(weak, generation, delay)));
        info!("Coin spawning started ({} players)", game.world.player_count());
    } else if !wanted && game.spawner.stop() {
        info!("Coin spawning stopped ({} players)", game.world.player_count());
    }
}

/// Spawn timer task. Exits as soon as its generation is no longer current.
async fn run_spawn_timer(state: Weak<RwLock<GameState>>, generation: u64, initial_delay: Duration) {
    let mut delay = initial_delay;
    loop {
        sleep(delay).await;

        let Some(state) = state.upgrade() else {
            return;
        };
        let mut game = state.write().await;
        if !game.spawner.is_current(generation) {
            return;
        }
        if game.spawn_tick().is_none() {
            debug!("Coin cap reached, skipping spawn");
        }
        delay = game.next_spawn_delay();
    }
}

/// Accept a new connection for `name`. `None` after shutdown.
pub async fn connect(
    state: &SharedGame,
    name: PlayerName,
    addr: Option<SocketAddr>,
) -> Option<(PlayerId, mpsc::UnboundedReceiver<Outbound>)> {
    let mut game = state.write().await;
    let joined = game.add_client(name, addr)?;
    sync_spawner(&mut game, state);
    Some(joined)
}

/// Handle one inbound text frame. Bad frames are logged and dropped.
pub async fn handle_message(state: &SharedGame, sender: PlayerId, raw: &str) {
    let mut game = state.write().await;
    if let Err(e) = game.handle_message(sender, raw) {
        debug!("Ignoring message from {}: {}", sender, e);
    }
}

/// Tear down a connection's player.
pub async fn disconnect(state: &SharedGame, id: PlayerId) {
    let mut game = state.write().await;
    game.remove_client(id);
    sync_spawner(&mut game, state);
}

/// Close all connections and cancel pending spawns.
pub async fn shutdown(state: &SharedGame) {
    state.write().await.shutdown();
}
