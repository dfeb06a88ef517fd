//! The player's vehicle and the powerups currently in effect on it.

use std::time::{Duration, Instant};

use bitflags::bitflags;
use glam::Vec2;
use tracing::debug;

use crate::constants::{PLAYER_START, ROAD_LEFT, ROAD_RIGHT, SPRITE_BLINK_INTERVAL};
use crate::entity::collision::{Collidable, Rect};
use crate::entity::kind::Powerup;
use crate::error::RenderError;
use crate::events::Steer;
use crate::inventory::Vehicle;
use crate::render::{Paint, Surface};

bitflags! {
    /// The set of powerups in effect at some instant.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PowerupFlags: u8 {
        const FOG_LIGHTS = 1 << 0;
        const SLOW_MOTION = 1 << 1;
        const INVINCIBILITY = 1 << 2;
    }
}

impl From<Powerup> for PowerupFlags {
    fn from(powerup: Powerup) -> Self {
        match powerup {
            Powerup::FogLights => PowerupFlags::FOG_LIGHTS,
            Powerup::SlowMotion => PowerupFlags::SLOW_MOTION,
            Powerup::Invincibility => PowerupFlags::INVINCIBILITY,
        }
    }
}

fn slot(powerup: Powerup) -> usize {
    match powerup {
        Powerup::FogLights => 0,
        Powerup::SlowMotion => 1,
        Powerup::Invincibility => 2,
    }
}

/// Expiry times of the powerups the player has used.
///
/// Time is always passed in, so callers (and tests) decide what "now" is.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActivePowerups {
    until: [Option<Instant>; 3],
}

impl ActivePowerups {
    /// Starts `powerup` at `now`. Using one that is already running restarts its duration.
    pub fn activate(&mut self, powerup: Powerup, now: Instant) {
        let until = now + powerup.duration();
        debug!(powerup = %powerup, duration = ?powerup.duration(), "Powerup activated");
        self.until[slot(powerup)] = Some(until);
    }

    pub fn is_active(&self, powerup: Powerup, now: Instant) -> bool {
        self.until[slot(powerup)].is_some_and(|until| now < until)
    }

    /// Time left on `powerup`, if it is running.
    pub fn remaining(&self, powerup: Powerup, now: Instant) -> Option<Duration> {
        self.until[slot(powerup)]
            .map(|until| until.saturating_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    pub fn flags(&self, now: Instant) -> PowerupFlags {
        [Powerup::FogLights, Powerup::SlowMotion, Powerup::Invincibility]
            .into_iter()
            .filter(|&p| self.is_active(p, now))
            .fold(PowerupFlags::empty(), |flags, p| flags | PowerupFlags::from(p))
    }

    /// Forgets every powerup whose time is up. Returns the ones that just ran out.
    pub fn expire(&mut self, now: Instant) -> PowerupFlags {
        let mut expired = PowerupFlags::empty();
        for powerup in [Powerup::FogLights, Powerup::SlowMotion, Powerup::Invincibility] {
            let entry = &mut self.until[slot(powerup)];
            if entry.is_some_and(|until| now >= until) {
                *entry = None;
                expired |= PowerupFlags::from(powerup);
            }
        }
        if !expired.is_empty() {
            debug!(?expired, "Powerups expired");
        }
        expired
    }

    pub fn clear(&mut self) {
        self.until = [None; 3];
    }
}

/// Whether a blinking sprite is drawn at `elapsed` into its blink.
pub fn blink_visible(elapsed: Duration) -> bool {
    (elapsed.as_millis() / SPRITE_BLINK_INTERVAL.as_millis()) % 2 == 0
}

/// The vehicle the player drives. It only moves sideways; the world scrolls past it.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: Vec2,
    vehicle: Vehicle,
    left: bool,
    right: bool,
}

impl Player {
    pub fn new(vehicle: Vehicle) -> Self {
        Self::at(vehicle, PLAYER_START)
    }

    pub fn at(vehicle: Vehicle, position: Vec2) -> Self {
        let mut player = Self {
            position,
            vehicle,
            left: false,
            right: false,
        };
        player.clamp();
        player
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn vehicle(&self) -> Vehicle {
        self.vehicle
    }

    pub fn size(&self) -> Vec2 {
        self.vehicle.size()
    }

    pub fn steer(&mut self, direction: Steer) {
        match direction {
            Steer::Left => self.left = true,
            Steer::Right => self.right = true,
        }
    }

    pub fn release(&mut self, direction: Steer) {
        match direction {
            Steer::Left => self.left = false,
            Steer::Right => self.right = false,
        }
    }

    /// Moves one tick's worth in the held direction. Holding both cancels out.
    pub fn advance(&mut self) {
        let direction = match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => return,
        };
        self.position.x += direction * self.vehicle.speed();
        self.clamp();
    }

    fn clamp(&mut self) {
        let max = (ROAD_RIGHT - self.size().x).max(ROAD_LEFT);
        self.position.x = self.position.x.clamp(ROAD_LEFT, max);
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size())
    }
}

impl Paint for Player {
    fn paint(&self, surface: &mut dyn Surface) -> Result<(), RenderError> {
        surface.draw_sprite(self.vehicle.sprite(), self.bounds())
    }
}
