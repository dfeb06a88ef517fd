//! Spawnable actors: obstacles and pickups.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use rand::Rng;

use crate::constants::{ROAD_LEFT, ROAD_RIGHT};
use crate::error::RenderError;
use crate::render::{Paint, Surface};

pub mod collision;
pub mod kind;

use self::collision::{Collidable, Rect};
use self::kind::{spawn_x, EntityKind, ObstacleKind, PickupKind};

/// Unique identifier for a spawned entity, used for tracing.
pub type EntityId = u64;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(0);

/// A spawned obstacle or pickup.
///
/// Motion is expressed per tick rather than per second, so lowering the frame
/// rate (slow motion) slows the whole world down with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<K> {
    pub id: EntityId,
    pub kind: K,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    active: bool,
}

pub type Obstacle = Entity<ObstacleKind>;
pub type Pickup = Entity<PickupKind>;

impl<K: EntityKind> Entity<K> {
    /// Creates an active entity at an explicit position with the kind's default size.
    pub fn new(kind: K, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id: NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            position,
            velocity,
            size: kind.size(),
            active: true,
        }
    }

    /// Creates an entity just above the visible area, in a random road column.
    pub fn spawn<R: Rng + ?Sized>(kind: K, rng: &mut R) -> Self {
        let size = kind.size();
        let position = Vec2::new(spawn_x(rng, size.x), -size.y);
        let velocity = kind.velocity(rng);
        Self::new(kind, position, velocity)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the entity as gone. It is never matched again and is pruned on the next update.
    pub fn despawn(&mut self) {
        self.active = false;
    }

    /// Applies the movement rule once.
    pub fn advance(&mut self) {
        self.position += self.velocity;

        if self.kind.bounces() {
            if self.position.x < ROAD_LEFT {
                self.position.x = ROAD_LEFT;
                self.velocity.x = self.velocity.x.abs();
            } else if self.position.x + self.size.x > ROAD_RIGHT {
                self.position.x = ROAD_RIGHT - self.size.x;
                self.velocity.x = -self.velocity.x.abs();
            }
        }
    }

    /// Returns `true` once the top edge has scrolled past `height`.
    pub fn is_past(&self, height: f32) -> bool {
        self.position.y > height
    }
}

impl<K: EntityKind> Collidable for Entity<K> {
    fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

impl<K: EntityKind> Paint for Entity<K> {
    fn paint(&self, surface: &mut dyn Surface) -> Result<(), RenderError> {
        surface.draw_sprite(self.kind.sprite(), self.bounds())
    }
}
