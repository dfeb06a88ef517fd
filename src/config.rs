use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{DESIRED_FPS, SAVE_PATH, SLOW_MOTION_FPS, SPAWN_WARMUP};

/// Prefix for environment overrides, e.g. `MOOSE_DESIRED_FPS=120`.
pub const ENV_PREFIX: &str = "MOOSE_";

/// Runtime configuration, layered from defaults and the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Target frame rate during normal play
    pub desired_fps: u32,
    /// Target frame rate while slow motion is in effect
    pub slow_motion_fps: u32,
    /// Delay before the first spawn of a session, in milliseconds
    pub spawn_warmup_ms: u64,
    /// Location of the save record
    pub save_path: PathBuf,
    /// Start with all audio muted
    pub mute: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            desired_fps: DESIRED_FPS,
            slow_motion_fps: SLOW_MOTION_FPS,
            spawn_warmup_ms: SPAWN_WARMUP.as_millis() as u64,
            save_path: PathBuf::from(SAVE_PATH),
            mute: false,
        }
    }
}

impl GameConfig {
    /// Builds the figment used by [`GameConfig::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(GameConfig::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads the configuration. A malformed override is logged and the defaults are kept.
    pub fn load() -> Self {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Self {
        match figment.extract::<GameConfig>() {
            Ok(config) => config.normalized(),
            Err(e) => {
                warn!("Invalid configuration, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Clamps frame rates to at least 1 and slow motion to no faster than normal play.
    pub fn normalized(mut self) -> Self {
        self.desired_fps = self.desired_fps.max(1);
        self.slow_motion_fps = self.slow_motion_fps.clamp(1, self.desired_fps);
        self
    }

    pub fn spawn_warmup(&self) -> Duration {
        Duration::from_millis(self.spawn_warmup_ms)
    }
}
