//! The per-tick collision pass between the player and both registries.
//!
//! Runs strictly before the registries advance, so hits are judged against the
//! positions that were just drawn.

use smallvec::SmallVec;
use tracing::debug;

use crate::audio::{Audio, Sound};
use crate::entity::collision::Collidable;
use crate::entity::kind::{ObstacleKind, PickupEffect, PickupKind};
use crate::entity::EntityId;
use crate::inventory::PlayerInventory;
use crate::registry::{ObstacleRegistry, PickupRegistry};

/// The obstacle resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleHit {
    pub id: EntityId,
    pub kind: ObstacleKind,
}

/// Everything the collision pass resolved in one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub obstacle: Option<ObstacleHit>,
    pub pickups: SmallVec<[PickupKind; 4]>,
}

impl CollisionOutcome {
    /// Returns `true` if an obstacle was hit this tick.
    pub fn collided(&self) -> bool {
        self.obstacle.is_some()
    }
}

/// Deactivates the first active obstacle, in insertion order, that overlaps `player`.
///
/// At most one obstacle is resolved per call; any others still overlapping are
/// left for later ticks.
pub fn resolve_obstacles(registry: &ObstacleRegistry, player: &dyn Collidable) -> Option<ObstacleHit> {
    registry.with_entities(|obstacles| {
        let obstacle = obstacles
            .iter_mut()
            .find(|o| o.is_active() && o.is_colliding_with(player))?;
        obstacle.despawn();
        Some(ObstacleHit {
            id: obstacle.id,
            kind: obstacle.kind,
        })
    })
}

/// Deactivates every active pickup overlapping `player` and returns their kinds in insertion order.
pub fn resolve_pickups(registry: &PickupRegistry, player: &dyn Collidable) -> SmallVec<[PickupKind; 4]> {
    registry.with_entities(|pickups| {
        pickups
            .iter_mut()
            .filter(|p| p.is_active() && p.is_colliding_with(player))
            .map(|p| {
                p.despawn();
                p.kind
            })
            .collect()
    })
}

/// The session state a collision can touch.
pub struct CollisionEffects<'a> {
    /// Coins collected this session.
    pub coins: &'a mut u32,
    pub inventory: &'a mut PlayerInventory,
    pub audio: &'a mut Audio,
}

impl CollisionEffects<'_> {
    fn apply_obstacle(&mut self, hit: ObstacleHit) {
        debug!(id = hit.id, kind = %hit.kind, "Obstacle hit");
        self.audio.play_sound(Sound::Explosion);
    }

    fn apply_pickup(&mut self, kind: PickupKind) {
        debug!(kind = %kind, "Pickup collected");
        match kind.effect() {
            PickupEffect::Coin => {
                *self.coins += 1;
                self.audio.play_sound(Sound::Coin);
            }
            PickupEffect::Stock(powerup) => self.inventory.increment(powerup),
        }
    }
}

/// Resolves obstacles, then pickups, applying each effect as it is found.
///
/// Pickups are resolved even on a tick with an obstacle hit; the caller decides
/// whether the hit ends the session.
pub fn resolve(
    player: &dyn Collidable,
    obstacles: &ObstacleRegistry,
    pickups: &PickupRegistry,
    mut effects: CollisionEffects<'_>,
) -> CollisionOutcome {
    let obstacle = resolve_obstacles(obstacles, player);
    if let Some(hit) = obstacle {
        effects.apply_obstacle(hit);
    }

    let pickups = resolve_pickups(pickups, player);
    for &kind in &pickups {
        effects.apply_pickup(kind);
    }

    CollisionOutcome { obstacle, pickups }
}
