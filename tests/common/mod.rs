#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use moose::audio::{Audio, AudioBackend, Sound};
use moose::config::GameConfig;
use moose::entity::kind::{EntityKind, ObstacleKind, PickupKind};
use moose::entity::{Entity, Obstacle, Pickup};
use moose::error::AudioError;
use moose::game::Game;
use moose::inventory::PlayerInventory;
use moose::save::SaveFile;
use moose::spawn::{SpawnConfig, SpawnTiming};
use parking_lot::Mutex;

/// Timing that fires quickly and often.
pub fn fast_timing() -> SpawnTiming {
    SpawnTiming::new(Duration::from_millis(5), Duration::from_millis(2), Duration::from_millis(5))
}

/// Timing that never fires within a test.
pub fn idle_timing() -> SpawnTiming {
    SpawnTiming::new(Duration::from_secs(3600), Duration::from_secs(3600), Duration::from_secs(3601))
}

pub fn idle_spawns() -> SpawnConfig {
    SpawnConfig::uniform(idle_timing())
}

/// A stationary obstacle whose top-left corner is at `position`.
pub fn obstacle_at(kind: ObstacleKind, position: Vec2) -> Obstacle {
    Entity::new(kind, position, Vec2::ZERO)
}

pub fn pickup_at(kind: PickupKind, position: Vec2) -> Pickup {
    Entity::new(kind, position, Vec2::ZERO)
}

/// An entity moving straight down at `speed` per tick.
pub fn falling<K: EntityKind>(kind: K, position: Vec2, speed: f32) -> Entity<K> {
    Entity::new(kind, position, Vec2::new(0.0, speed))
}

/// Polls `condition` until it holds or `timeout` passes.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

/// A unique save path under the system temp directory.
pub fn temp_save_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("moose-{name}-{}.dat", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

/// An audio backend that records every request.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub played: Arc<Mutex<Vec<Sound>>>,
    pub looped: Arc<Mutex<Vec<Sound>>>,
    /// The loop currently audible, cleared by `stop_all`.
    pub music: Arc<Mutex<Option<Sound>>>,
    pub fail: bool,
}

impl RecordingBackend {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<Sound> {
        self.played.lock().clone()
    }

    pub fn music(&self) -> Option<Sound> {
        *self.music.lock()
    }
}

impl AudioBackend for RecordingBackend {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        if self.fail {
            return Err(AudioError::NotFound(sound.file_name().to_string()));
        }
        self.played.lock().push(sound);
        Ok(())
    }

    fn play_loop(&mut self, sound: Sound) -> Result<(), AudioError> {
        if self.fail {
            return Err(AudioError::NotFound(sound.file_name().to_string()));
        }
        self.looped.lock().push(sound);
        *self.music.lock() = Some(sound);
        Ok(())
    }

    fn stop_all(&mut self) {
        *self.music.lock() = None;
    }
}

/// A game on the menu with no background spawning and a throwaway save file.
pub fn test_game(name: &str, inventory: PlayerInventory) -> (Game, RecordingBackend) {
    test_game_with(name, inventory, GameConfig::default())
}

/// Like [`test_game`], starting from `config` instead of the defaults.
pub fn test_game_with(name: &str, inventory: PlayerInventory, config: GameConfig) -> (Game, RecordingBackend) {
    let backend = RecordingBackend::default();
    let config = GameConfig {
        save_path: temp_save_path(name),
        ..config
    };
    let save = SaveFile::new(&config.save_path);
    let game = Game::with_inventory(config, Audio::new(Box::new(backend.clone())), save, inventory)
        .with_spawn_config(idle_spawns());
    (game, backend)
}
