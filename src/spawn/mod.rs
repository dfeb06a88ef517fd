//! Spawn managers: one registry plus one timer per subtype, started and stopped together.

use std::sync::Arc;
use std::time::Duration;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::config::GameConfig;
use crate::entity::kind::{EntityKind, ObstacleKind, PickupKind};
use crate::error::{GameResult, RenderError};
use crate::registry::Registry;
use crate::render::Surface;

pub mod scheduler;

pub use self::scheduler::{SpawnScheduler, SpawnTiming};

/// Spawn timing for every subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnConfig {
    pub moose: SpawnTiming,
    pub static_hazard: SpawnTiming,
    pub vehicle: SpawnTiming,
    pub coin: SpawnTiming,
    pub fog_lights: SpawnTiming,
    pub slow_motion: SpawnTiming,
    pub invincibility: SpawnTiming,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self::with_warmup(crate::constants::SPAWN_WARMUP)
    }
}

impl SpawnConfig {
    /// The stock intervals with a custom warm-up delay.
    pub fn with_warmup(warmup: Duration) -> Self {
        let timing = |range| SpawnTiming::from_millis(warmup, range);
        Self {
            moose: timing(ObstacleKind::Moose.spawn_range()),
            static_hazard: timing(ObstacleKind::StaticHazard.spawn_range()),
            vehicle: timing(ObstacleKind::Vehicle.spawn_range()),
            coin: timing(PickupKind::Coin.spawn_range()),
            fog_lights: timing(PickupKind::FogLights.spawn_range()),
            slow_motion: timing(PickupKind::SlowMotion.spawn_range()),
            invincibility: timing(PickupKind::Invincibility.spawn_range()),
        }
    }

    /// The same timing for every subtype.
    pub fn uniform(timing: SpawnTiming) -> Self {
        Self {
            moose: timing,
            static_hazard: timing,
            vehicle: timing,
            coin: timing,
            fog_lights: timing,
            slow_motion: timing,
            invincibility: timing,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::with_warmup(config.spawn_warmup())
    }

    pub fn obstacle(&self, kind: ObstacleKind) -> SpawnTiming {
        match kind {
            ObstacleKind::Moose => self.moose,
            ObstacleKind::StaticHazard => self.static_hazard,
            ObstacleKind::Vehicle => self.vehicle,
        }
    }

    pub fn pickup(&self, kind: PickupKind) -> SpawnTiming {
        match kind {
            PickupKind::Coin => self.coin,
            PickupKind::FogLights => self.fog_lights,
            PickupKind::SlowMotion => self.slow_motion,
            PickupKind::Invincibility => self.invincibility,
        }
    }
}

/// A registry of one broad class together with the timers that feed it.
///
/// Lives for exactly one session. Dropping it stops every timer.
#[derive(Debug)]
pub struct SpawnManager<K> {
    registry: Arc<Registry<K>>,
    schedulers: Vec<SpawnScheduler>,
}

pub type ObstacleManager = SpawnManager<ObstacleKind>;
pub type PickupManager = SpawnManager<PickupKind>;

impl<K> SpawnManager<K>
where
    K: EntityKind + IntoEnumIterator,
    &'static str: From<K>,
{
    /// Creates a stopped manager with one scheduler per subtype of `K`.
    pub fn new(timing: impl Fn(K) -> SpawnTiming) -> Self {
        let registry = Arc::new(Registry::new());
        let schedulers = K::iter()
            .map(|kind| SpawnScheduler::for_kind(kind, timing(kind), Arc::clone(&registry)))
            .collect();
        Self { registry, schedulers }
    }
}

impl ObstacleManager {
    pub fn obstacles(config: &SpawnConfig) -> Self {
        Self::new(|kind| config.obstacle(kind))
    }
}

impl PickupManager {
    pub fn pickups(config: &SpawnConfig) -> Self {
        Self::new(|kind| config.pickup(kind))
    }
}

impl<K: EntityKind> SpawnManager<K> {
    /// Builds a manager around an existing registry and schedulers.
    pub fn from_parts(registry: Arc<Registry<K>>, schedulers: Vec<SpawnScheduler>) -> Self {
        Self { registry, schedulers }
    }

    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    pub fn schedulers(&self) -> &[SpawnScheduler] {
        &self.schedulers
    }

    /// Starts every timer. On failure the timers already started are stopped again.
    pub fn start(&mut self) -> GameResult<()> {
        for index in 0..self.schedulers.len() {
            if let Err(e) = self.schedulers[index].start() {
                self.schedulers[..index].iter_mut().for_each(SpawnScheduler::stop);
                return Err(e);
            }
        }
        debug!(schedulers = self.schedulers.len(), "Spawn manager started");
        Ok(())
    }

    /// Cancels every timer, then empties the registry.
    pub fn stop(&mut self) {
        self.schedulers.iter_mut().for_each(SpawnScheduler::stop);
        self.registry.clear();
    }

    /// Advances and prunes the registry. Returns the number of entities removed.
    pub fn update(&self) -> usize {
        self.registry.update()
    }

    pub fn paint(&self, surface: &mut dyn Surface) -> Result<(), RenderError> {
        self.registry.paint(surface)
    }
}
