use strum_macros::Display;

use crate::entity::kind::Powerup;

/// Which way the player is steering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Steer {
    Left,
    Right,
}

/// A decoded player intent. Raw key handling lives in the frontend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Intent {
    /// Begin steering in a direction.
    Steer(Steer),
    /// Stop steering in a direction.
    Release(Steer),
    UsePowerup(Powerup),
    /// Menu navigation.
    Up,
    Down,
    Select,
    Back,
    ToggleMute,
    ToggleFpsOverlay,
    Exit,
}

impl Intent {
    pub const MOVE_LEFT: Intent = Intent::Steer(Steer::Left);
    pub const MOVE_RIGHT: Intent = Intent::Steer(Steer::Right);
    pub const USE_FOG_LIGHTS: Intent = Intent::UsePowerup(Powerup::FogLights);
    pub const USE_SLOW_MOTION: Intent = Intent::UsePowerup(Powerup::SlowMotion);
    pub const USE_INVINCIBILITY: Intent = Intent::UsePowerup(Powerup::Invincibility);
}
