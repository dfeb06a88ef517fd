//! Active-entity registries shared between the spawn timers and the game loop.
//!
//! Spawn timers append from their own threads while the loop updates, prunes
//! and collides on the main thread. Every access goes through one lock; the
//! critical sections are a push, a single pass, or a clone.

use parking_lot::Mutex;
use tracing::trace;

use crate::constants::HEIGHT;
use crate::entity::kind::{EntityKind, ObstacleKind, PickupKind};
use crate::entity::Entity;
use crate::error::RenderError;
use crate::render::{Paint, Surface};

/// An insertion-ordered collection of the active entities of one broad class.
#[derive(Debug)]
pub struct Registry<K> {
    entities: Mutex<Vec<Entity<K>>>,
    /// Entities whose top edge passes this line are pruned.
    bottom: f32,
}

pub type ObstacleRegistry = Registry<ObstacleKind>;
pub type PickupRegistry = Registry<PickupKind>;

impl<K: EntityKind> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> Registry<K> {
    pub fn new() -> Self {
        Self::with_bottom(HEIGHT)
    }

    pub fn with_bottom(bottom: f32) -> Self {
        Self {
            entities: Mutex::new(Vec::new()),
            bottom,
        }
    }

    /// Appends an entity. Called from spawn timer threads.
    pub fn add(&self, entity: Entity<K>) {
        trace!(id = entity.id, kind = ?entity.kind, x = entity.position.x, "Entity spawned");
        self.entities.lock().push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.lock().is_empty()
    }

    /// Visits every entity in insertion order.
    pub fn for_each(&self, mut f: impl FnMut(&Entity<K>)) {
        for entity in self.entities.lock().iter() {
            f(entity);
        }
    }

    /// Runs `f` with exclusive access to the entities, in insertion order.
    ///
    /// The collision pass uses this to deactivate what it hits. `f` must not
    /// call back into this registry.
    pub fn with_entities<R>(&self, f: impl FnOnce(&mut [Entity<K>]) -> R) -> R {
        f(self.entities.lock().as_mut_slice())
    }

    /// A point-in-time copy of the registry contents.
    pub fn snapshot(&self) -> Vec<Entity<K>> {
        self.entities.lock().clone()
    }

    /// Advances every active entity once, then drops anything inactive or off-screen.
    ///
    /// Returns the number of entities removed.
    pub fn update(&self) -> usize {
        let mut entities = self.entities.lock();

        for entity in entities.iter_mut().filter(|e| e.is_active()) {
            entity.advance();
        }

        let before = entities.len();
        entities.retain(|e| e.is_active() && !e.is_past(self.bottom));
        let removed = before - entities.len();

        if removed > 0 {
            trace!(removed, remaining = entities.len(), "Pruned entities");
        }
        removed
    }

    /// Removes everything.
    pub fn clear(&self) {
        self.entities.lock().clear();
    }

    /// Paints every active entity. Stops at the first surface error.
    pub fn paint(&self, surface: &mut dyn Surface) -> Result<(), RenderError> {
        for entity in self.entities.lock().iter().filter(|e| e.is_active()) {
            entity.paint(surface)?;
        }
        Ok(())
    }
}
