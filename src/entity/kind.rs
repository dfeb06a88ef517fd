//! Entity categories and the tables that drive them: sprite, size, motion and spawn interval.

use std::fmt::Debug;
use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::constants::{
    self, size, spawn, FOG_LIGHTS_DURATION, INVINCIBILITY_DURATION, MOOSE_DRIFT, MOOSE_SPEED, SCROLL_SPEED,
    SLOW_MOTION_DURATION, VEHICLE_SPEED,
};

/// Behaviour shared by every spawnable category.
pub trait EntityKind: Copy + Debug + Send + Sync + 'static {
    /// The sprite the render collaborator should draw.
    fn sprite(self) -> &'static str;

    /// Bounding box dimensions.
    fn size(self) -> Vec2;

    /// Initial per-tick velocity. May be randomized.
    fn velocity<R: Rng + ?Sized>(self, rng: &mut R) -> Vec2;

    /// Whether lateral motion reflects off the road edges.
    fn bounces(self) -> bool {
        false
    }

    /// Default `[min, max)` spawn interval in milliseconds.
    fn spawn_range(self) -> (u64, u64);
}

/// Things that end the session on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ObstacleKind {
    Moose,
    StaticHazard,
    Vehicle,
}

impl EntityKind for ObstacleKind {
    fn sprite(self) -> &'static str {
        match self {
            ObstacleKind::Moose => "moose.png",
            ObstacleKind::StaticHazard => "pothole.png",
            ObstacleKind::Vehicle => "oncoming.png",
        }
    }

    fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Moose => size::MOOSE,
            ObstacleKind::StaticHazard => size::STATIC_HAZARD,
            ObstacleKind::Vehicle => size::VEHICLE,
        }
    }

    fn velocity<R: Rng + ?Sized>(self, rng: &mut R) -> Vec2 {
        match self {
            ObstacleKind::Moose => {
                let drift = if rng.random_bool(0.5) { MOOSE_DRIFT } else { -MOOSE_DRIFT };
                Vec2::new(drift, MOOSE_SPEED)
            }
            ObstacleKind::StaticHazard => Vec2::new(0.0, SCROLL_SPEED),
            ObstacleKind::Vehicle => Vec2::new(0.0, VEHICLE_SPEED),
        }
    }

    fn bounces(self) -> bool {
        matches!(self, ObstacleKind::Moose)
    }

    fn spawn_range(self) -> (u64, u64) {
        match self {
            ObstacleKind::Moose => spawn::MOOSE,
            ObstacleKind::StaticHazard => spawn::STATIC_HAZARD,
            ObstacleKind::Vehicle => spawn::VEHICLE,
        }
    }
}

/// Things the player collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum PickupKind {
    Coin,
    FogLights,
    SlowMotion,
    Invincibility,
}

impl PickupKind {
    /// The effect applied when the player runs over this pickup.
    pub fn effect(self) -> PickupEffect {
        match self {
            PickupKind::Coin => PickupEffect::Coin,
            PickupKind::FogLights => PickupEffect::Stock(Powerup::FogLights),
            PickupKind::SlowMotion => PickupEffect::Stock(Powerup::SlowMotion),
            PickupKind::Invincibility => PickupEffect::Stock(Powerup::Invincibility),
        }
    }
}

impl EntityKind for PickupKind {
    fn sprite(self) -> &'static str {
        match self {
            PickupKind::Coin => "coin.png",
            PickupKind::FogLights => "foglights.png",
            PickupKind::SlowMotion => "slowmotion.png",
            PickupKind::Invincibility => "invincibility.png",
        }
    }

    fn size(self) -> Vec2 {
        match self {
            PickupKind::Coin => size::COIN,
            _ => size::POWERUP,
        }
    }

    fn velocity<R: Rng + ?Sized>(self, _rng: &mut R) -> Vec2 {
        Vec2::new(0.0, SCROLL_SPEED)
    }

    fn spawn_range(self) -> (u64, u64) {
        match self {
            PickupKind::Coin => spawn::COIN,
            PickupKind::FogLights => spawn::FOG_LIGHTS,
            PickupKind::SlowMotion => spawn::SLOW_MOTION,
            PickupKind::Invincibility => spawn::INVINCIBILITY,
        }
    }
}

/// What a pickup does to the session or the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    /// One more coin for this session.
    Coin,
    /// One more charge of a powerup in the persistent inventory.
    Stock(Powerup),
}

/// A consumable, timed powerup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Powerup {
    FogLights,
    SlowMotion,
    Invincibility,
}

impl Powerup {
    /// How long the powerup stays in effect once used.
    pub fn duration(self) -> Duration {
        match self {
            Powerup::FogLights => FOG_LIGHTS_DURATION,
            Powerup::SlowMotion => SLOW_MOTION_DURATION,
            Powerup::Invincibility => INVINCIBILITY_DURATION,
        }
    }
}

/// Picks a spawn column on the road for an entity of the given width.
pub fn spawn_x<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    let max = (constants::ROAD_RIGHT - width).max(constants::ROAD_LEFT);
    if max <= constants::ROAD_LEFT {
        return constants::ROAD_LEFT;
    }
    rng.random_range(constants::ROAD_LEFT..max)
}
