//! The player's persistent inventory: high score, coins, owned vehicles,
//! settings and powerup charges.
//!
//! Owned by the [`Game`](crate::game::Game) and lent to a session; there is no
//! global copy.

use glam::Vec2;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, warn};

use crate::constants::{size, ATV_SPEED, CAR_SPEED, TRUCK_SPEED};
use crate::entity::kind::Powerup;

/// The vehicles a player can drive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum Vehicle {
    #[default]
    Car,
    Truck,
    #[strum(serialize = "ATV")]
    Atv,
}

impl Vehicle {
    pub fn sprite(self) -> &'static str {
        match self {
            Vehicle::Car => "car.png",
            Vehicle::Truck => "truck.png",
            Vehicle::Atv => "atv.png",
        }
    }

    pub fn size(self) -> Vec2 {
        match self {
            Vehicle::Car => size::CAR,
            Vehicle::Truck => size::TRUCK,
            Vehicle::Atv => size::ATV,
        }
    }

    /// Lateral speed, per tick.
    pub fn speed(self) -> f32 {
        match self {
            Vehicle::Car => CAR_SPEED,
            Vehicle::Truck => TRUCK_SPEED,
            Vehicle::Atv => ATV_SPEED,
        }
    }
}

/// Player-facing toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub music_on: bool,
    pub sounds_on: bool,
    pub show_fps_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            sounds_on: true,
            show_fps_overlay: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlayerInventory {
    pub settings: Settings,
    high_score: u32,
    currency: u32,
    equipped: Vehicle,
    truck_owned: bool,
    atv_owned: bool,
    fog_lights: u32,
    slow_motion: u32,
    invincibility: u32,
}

impl PlayerInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Records `score` if it strictly beats the stored high score. Returns whether it did.
    pub fn set_high_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            debug!(previous = self.high_score, score, "New high score");
            self.high_score = score;
            true
        } else {
            false
        }
    }

    pub fn currency(&self) -> u32 {
        self.currency
    }

    pub fn add_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Spends `cost` coins if the player has enough. Returns whether the purchase went through.
    pub fn spend_currency(&mut self, cost: u32) -> bool {
        if self.currency >= cost {
            self.currency -= cost;
            true
        } else {
            false
        }
    }

    pub fn equipped_vehicle(&self) -> Vehicle {
        self.equipped
    }

    /// Equips a vehicle. Only owned vehicles can be equipped; the car is always owned.
    pub fn equip(&mut self, vehicle: Vehicle) -> bool {
        if self.owns(vehicle) {
            self.equipped = vehicle;
            true
        } else {
            false
        }
    }

    pub fn owns(&self, vehicle: Vehicle) -> bool {
        match vehicle {
            Vehicle::Car => true,
            Vehicle::Truck => self.truck_owned,
            Vehicle::Atv => self.atv_owned,
        }
    }

    pub fn is_truck_owned(&self) -> bool {
        self.truck_owned
    }

    pub fn buy_truck(&mut self) {
        self.truck_owned = true;
    }

    pub fn is_atv_owned(&self) -> bool {
        self.atv_owned
    }

    pub fn buy_atv(&mut self) {
        self.atv_owned = true;
    }

    pub fn fog_lights_count(&self) -> u32 {
        self.fog_lights
    }

    pub fn slow_motion_count(&self) -> u32 {
        self.slow_motion
    }

    pub fn invincibility_count(&self) -> u32 {
        self.invincibility
    }

    pub fn increment_fog_lights(&mut self) {
        self.fog_lights += 1;
    }

    pub fn increment_slow_motion(&mut self) {
        self.slow_motion += 1;
    }

    pub fn increment_invincibility(&mut self) {
        self.invincibility += 1;
    }

    /// Adds one charge of `powerup`.
    pub fn increment(&mut self, powerup: Powerup) {
        match powerup {
            Powerup::FogLights => self.increment_fog_lights(),
            Powerup::SlowMotion => self.increment_slow_motion(),
            Powerup::Invincibility => self.increment_invincibility(),
        }
    }

    pub fn count(&self, powerup: Powerup) -> u32 {
        match powerup {
            Powerup::FogLights => self.fog_lights,
            Powerup::SlowMotion => self.slow_motion,
            Powerup::Invincibility => self.invincibility,
        }
    }

    pub fn use_fog_lights_powerup(&mut self) -> bool {
        consume(&mut self.fog_lights)
    }

    pub fn use_slow_motion_powerup(&mut self) -> bool {
        consume(&mut self.slow_motion)
    }

    pub fn use_invincibility_powerup(&mut self) -> bool {
        consume(&mut self.invincibility)
    }

    /// Consumes one charge of `powerup`. Returns `false` and changes nothing when none are left.
    pub fn use_powerup(&mut self, powerup: Powerup) -> bool {
        match powerup {
            Powerup::FogLights => self.use_fog_lights_powerup(),
            Powerup::SlowMotion => self.use_slow_motion_powerup(),
            Powerup::Invincibility => self.use_invincibility_powerup(),
        }
    }

    pub fn clear_powerups(&mut self) {
        self.fog_lights = 0;
        self.slow_motion = 0;
        self.invincibility = 0;
    }

    /// Resets everything the save record holds back to defaults. Powerup charges are kept.
    pub fn clear_save(&mut self) {
        *self = Self {
            fog_lights: self.fog_lights,
            slow_motion: self.slow_motion,
            invincibility: self.invincibility,
            ..Self::default()
        };
    }

    /// Rebuilds an inventory from persisted fields. Powerup charges start at zero.
    pub(crate) fn from_persisted(
        high_score: u32,
        currency: u32,
        settings: Settings,
        equipped: Vehicle,
        truck_owned: bool,
        atv_owned: bool,
    ) -> Self {
        let mut inventory = Self {
            settings,
            high_score,
            currency,
            truck_owned,
            atv_owned,
            ..Self::default()
        };
        if !inventory.equip(equipped) {
            warn!(vehicle = %equipped, "Saved vehicle is not owned, equipping the car");
        }
        inventory
    }
}

fn consume(count: &mut u32) -> bool {
    if *count > 0 {
        *count -= 1;
        true
    } else {
        false
    }
}
