//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::Vec2;

/// The width of the play area, in pixels.
pub const WIDTH: f32 = 750.0;
/// The height of the play area, in pixels. Entities whose top edge scrolls past this are pruned.
pub const HEIGHT: f32 = 750.0;

/// Frame rate targeted while no slow-motion powerup is in effect.
pub const DESIRED_FPS: u32 = 60;
/// Frame rate targeted while slow motion is in effect.
pub const SLOW_MOTION_FPS: u32 = 30;

/// Size of the frame-duration window used by the FPS overlay.
pub const FPS_SAMPLE_WINDOW: usize = 60;

/// Delay before the first fire of every spawn scheduler in a session.
pub const SPAWN_WARMUP: Duration = Duration::from_millis(2000);

/// Spawn intervals, in milliseconds, as half-open `[min, max)` ranges.
pub mod spawn {
    pub const MOOSE: (u64, u64) = (5_000, 6_000);
    pub const STATIC_HAZARD: (u64, u64) = (2_000, 3_000);
    pub const VEHICLE: (u64, u64) = (1_000, 2_000);
    pub const COIN: (u64, u64) = (500, 1_000);
    pub const FOG_LIGHTS: (u64, u64) = (8_000, 18_000);
    pub const SLOW_MOTION: (u64, u64) = (10_000, 20_000);
    pub const INVINCIBILITY: (u64, u64) = (12_000, 22_000);
}

/// Horizontal extent of the drivable road.
pub const ROAD_LEFT: f32 = 150.0;
pub const ROAD_RIGHT: f32 = 600.0;

/// Distance the road scrolls per tick; static entities descend at this rate.
pub const SCROLL_SPEED: f32 = 5.0;

/// Entity dimensions, in pixels.
pub mod size {
    use glam::Vec2;

    pub const MOOSE: Vec2 = Vec2::new(60.0, 90.0);
    pub const STATIC_HAZARD: Vec2 = Vec2::new(50.0, 50.0);
    pub const VEHICLE: Vec2 = Vec2::new(60.0, 110.0);
    pub const COIN: Vec2 = Vec2::new(30.0, 30.0);
    pub const POWERUP: Vec2 = Vec2::new(40.0, 40.0);

    pub const CAR: Vec2 = Vec2::new(60.0, 110.0);
    pub const TRUCK: Vec2 = Vec2::new(70.0, 130.0);
    pub const ATV: Vec2 = Vec2::new(50.0, 80.0);
}

/// Lateral drift of a moose, per tick. The sign is chosen at spawn.
pub const MOOSE_DRIFT: f32 = 1.5;
/// Descent of an oncoming vehicle, per tick.
pub const VEHICLE_SPEED: f32 = 8.0;
/// Descent of a moose, per tick.
pub const MOOSE_SPEED: f32 = 4.0;

/// Where the player's vehicle sits on screen.
pub const PLAYER_START: Vec2 = Vec2::new((ROAD_LEFT + ROAD_RIGHT) / 2.0 - size::CAR.x / 2.0, HEIGHT - 180.0);

/// Lateral speed of each vehicle, per tick.
pub const CAR_SPEED: f32 = 6.0;
pub const TRUCK_SPEED: f32 = 5.0;
pub const ATV_SPEED: f32 = 8.0;

/// How long each powerup stays in effect once used.
pub const FOG_LIGHTS_DURATION: Duration = Duration::from_secs(10);
pub const SLOW_MOTION_DURATION: Duration = Duration::from_secs(5);
pub const INVINCIBILITY_DURATION: Duration = Duration::from_secs(5);

/// Half-period of the sprite blink animation.
pub const SPRITE_BLINK_INTERVAL: Duration = Duration::from_millis(100);

/// Store prices, in coins.
pub const TRUCK_PRICE: u32 = 100;
pub const ATV_PRICE: u32 = 250;

/// Default location of the save record.
pub const SAVE_PATH: &str = "./save.dat";

/// Returns the target interval for one tick at the given frame rate.
pub fn frame_budget(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
