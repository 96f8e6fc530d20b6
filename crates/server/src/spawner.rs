//! Coin spawning.
//!
//! The scheduler is a two-state machine: idle, or active with one pending
//! timer task. Every start bumps a generation counter; a timer only acts
//! while its generation is still the current one, so a fire that was
//! already waiting for the world when the scheduler stopped does nothing.

use crate::config::CoinConfig;
use crate::entity::{CoinId, TierTable};
use crate::world::World;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Spawning only runs while more than one player is connected.
#[inline]
pub fn should_be_active(player_count: usize) -> bool {
    player_count > 1
}

/// Fixed spawning parameters.
#[derive(Debug, Clone)]
pub struct SpawnSettings {
    pub initial_delay: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub coin_radius: f64,
    pub margin: f64,
    pub tiers: TierTable,
}

impl SpawnSettings {
    pub fn from_config(config: &CoinConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            coin_radius: config.radius,
            margin: config.spawn_margin,
            tiers: TierTable::from_config(config),
        }
    }

    /// Delay before the next attempt, uniform in `[min_delay, max_delay]`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        rng.random_range(self.min_delay..=self.max_delay)
    }
}

/// Place one coin if the world is below its cap.
///
/// Position is uniform over the inset spawn region; the tier comes from a
/// weighted draw.
pub fn spawn_coin<R: Rng + ?Sized>(
    world: &mut World,
    settings: &SpawnSettings,
    rng: &mut R,
) -> Option<CoinId> {
    if world.coins().is_full() {
        return None;
    }
    let tier = settings.tiers.pick(rng.random::<f64>());
    let position = world.board().random_spawn_point(settings.margin, rng);
    let id = world.add_coin(position, settings.coin_radius, tier).ok()?;
    debug!("Spawned {:?} coin {:?} at ({}, {})", tier, id, position.x, position.y);
    Some(id)
}

/// Tracks whether a spawn timer is running and which one.
#[derive(Debug)]
pub struct SpawnScheduler {
    settings: SpawnSettings,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl SpawnScheduler {
    pub fn new(settings: SpawnSettings) -> Self {
        Self {
            settings,
            generation: 0,
            pending: None,
        }
    }

    #[inline]
    pub fn settings(&self) -> &SpawnSettings {
        &self.settings
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a timer started with `generation` may still fire.
    #[inline]
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending.is_some() && self.generation == generation
    }

    /// Idle -> Active. `launch` receives the new generation and the initial
    /// delay and must return the spawned timer task.
    ///
    /// Returns `false` (and does not call `launch`) when already active.
    pub fn start(&mut self, launch: impl FnOnce(u64, Duration) -> JoinHandle<()>) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(launch(self.generation, self.settings.initial_delay));
        true
    }

    /// Active -> Idle. Aborts the pending timer.
    ///
    /// Returns `false` when already idle.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        self.generation = self.generation.wrapping_add(1);
        handle.abort();
        true
    }
}

impl Drop for SpawnScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
