//! One continuous run of the gameplay state.
//!
//! A session owns the player, both spawn managers and the powerups in effect.
//! It is built fresh every time play starts and dropped when it ends, which
//! stops every spawn timer it owns.

use std::time::{Duration, Instant};

use glam::Vec2;
use thousands::Separable;
use tracing::{debug, info};

use crate::audio::Audio;
use crate::collision::{self, CollisionEffects};
use crate::constants::WIDTH;
use crate::entity::kind::Powerup;
use crate::error::{GameResult, RenderError};
use crate::events::Intent;
use crate::inventory::{PlayerInventory, Vehicle};
use crate::player::{blink_visible, ActivePowerups, Player, PowerupFlags};
use crate::render::{Overlay, Paint, Surface, TextStyle};
use crate::spawn::{ObstacleManager, PickupManager, SpawnConfig};

/// The result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub coins: u32,
    pub ticks: u64,
    pub duration: Duration,
}

pub struct Session {
    player: Player,
    obstacles: ObstacleManager,
    pickups: PickupManager,
    powerups: ActivePowerups,
    score: u32,
    coins: u32,
    ticks: u64,
    started: Option<Instant>,
}

impl Session {
    /// A stopped session with spawn timers built from `spawn`.
    pub fn new(vehicle: Vehicle, spawn: &SpawnConfig) -> Self {
        Self::with_managers(
            Player::new(vehicle),
            ObstacleManager::obstacles(spawn),
            PickupManager::pickups(spawn),
        )
    }

    pub fn with_managers(player: Player, obstacles: ObstacleManager, pickups: PickupManager) -> Self {
        Self {
            player,
            obstacles,
            pickups,
            powerups: ActivePowerups::default(),
            score: 0,
            coins: 0,
            ticks: 0,
            started: None,
        }
    }

    /// Starts every spawn timer.
    pub fn start(&mut self) -> GameResult<()> {
        self.obstacles.start()?;
        if let Err(e) = self.pickups.start() {
            self.obstacles.stop();
            return Err(e);
        }
        self.started = Some(Instant::now());
        info!(vehicle = %self.player.vehicle(), "Session started");
        Ok(())
    }

    /// Stops every timer, empties both registries and reports the result.
    pub fn stop(&mut self) -> SessionSummary {
        self.obstacles.stop();
        self.pickups.stop();
        self.powerups.clear();

        let summary = SessionSummary {
            score: self.score,
            coins: self.coins,
            ticks: self.ticks,
            duration: self.started.take().map(|s| s.elapsed()).unwrap_or_default(),
        };
        info!(
            score = %summary.score.separate_with_commas(),
            coins = summary.coins,
            ticks = summary.ticks,
            "Session ended"
        );
        summary
    }

    pub fn handle_intent(&mut self, intent: Intent, inventory: &mut PlayerInventory, now: Instant) {
        match intent {
            Intent::Steer(direction) => self.player.steer(direction),
            Intent::Release(direction) => self.player.release(direction),
            Intent::UsePowerup(powerup) => {
                if inventory.use_powerup(powerup) {
                    self.powerups.activate(powerup, now);
                } else {
                    debug!(%powerup, "No charges left");
                }
            }
            _ => {}
        }
    }

    /// Runs the collision pass. Returns `true` if an obstacle hit ends the session.
    pub fn check_collision(&mut self, inventory: &mut PlayerInventory, audio: &mut Audio, now: Instant) -> bool {
        let effects = CollisionEffects {
            coins: &mut self.coins,
            inventory,
            audio,
        };
        let outcome = collision::resolve(
            &self.player,
            self.obstacles.registry(),
            self.pickups.registry(),
            effects,
        );

        match outcome.obstacle {
            Some(hit) if self.powerups.is_active(Powerup::Invincibility, now) => {
                debug!(id = hit.id, kind = %hit.kind, "Obstacle destroyed while invincible");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Advances the player and every entity by one tick and scores it.
    pub fn update(&mut self, now: Instant) {
        self.player.advance();
        self.obstacles.update();
        self.pickups.update();
        self.powerups.expire(now);
        self.score = self.score.saturating_add(1);
        self.ticks += 1;
    }

    pub fn is_slow_motion_active(&self, now: Instant) -> bool {
        self.powerups.is_active(Powerup::SlowMotion, now)
    }

    pub fn active_powerups(&self, now: Instant) -> PowerupFlags {
        self.powerups.flags(now)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn pickups(&self) -> &PickupManager {
        &self.pickups
    }

    pub fn paint(&self, surface: &mut dyn Surface, inventory: &PlayerInventory, now: Instant) -> Result<(), RenderError> {
        self.pickups.paint(surface)?;
        self.obstacles.paint(surface)?;

        let visible = self
            .powerups
            .remaining(Powerup::Invincibility, now)
            .is_none_or(blink_visible);
        if visible {
            self.player.paint(surface)?;
        }

        if !self.powerups.is_active(Powerup::FogLights, now) {
            surface.fill_overlay(Overlay::Fog)?;
        }

        surface.draw_text(
            &format!("Score: {}", self.score.separate_with_commas()),
            Vec2::new(20.0, 20.0),
            TextStyle::Normal,
        )?;
        surface.draw_text(&format!("Coins: {}", self.coins), Vec2::new(20.0, 60.0), TextStyle::Normal)?;
        surface.draw_text(
            &format!(
                "Fog {}  Slow {}  Shield {}",
                inventory.fog_lights_count(),
                inventory.slow_motion_count(),
                inventory.invincibility_count()
            ),
            Vec2::new(WIDTH - 300.0, 20.0),
            TextStyle::Normal,
        )
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("score", &self.score)
            .field("coins", &self.coins)
            .field("ticks", &self.ticks)
            .field("obstacles", &self.obstacles.registry().len())
            .field("pickups", &self.pickups.registry().len())
            .finish()
    }
}
