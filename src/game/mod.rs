//! This module contains the main game logic and state.
//!
//! [`Game`] owns everything that outlives a session: the inventory, audio,
//! save file and configuration. Only the gameplay screen drives the spawn and
//! collision machinery; the other screens are plain controllers.

use std::time::Instant;

use thousands::Separable;
use tracing::{info, warn};

use crate::audio::{Audio, Sound};
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::Intent;
use crate::inventory::PlayerInventory;
use crate::render::Surface;
use crate::save::SaveFile;
use crate::spawn::SpawnConfig;

pub mod session;
pub mod state;

use self::session::{Session, SessionSummary};
use self::state::{Controller, GameOverController, GameState, MenuController, StoreController, Transition};

/// The controller receiving intents, with the state it belongs to.
#[derive(Debug)]
enum Screen {
    Menu(MenuController),
    Store(StoreController),
    Playing(Box<Session>),
    GameOver(GameOverController),
}

impl Screen {
    fn state(&self) -> GameState {
        match self {
            Screen::Menu(_) => GameState::Menu,
            Screen::Store(_) => GameState::Store,
            Screen::Playing(_) => GameState::Game,
            Screen::GameOver(_) => GameState::GameOver,
        }
    }
}

/// The `Game` struct is the main entry point for the game.
///
/// It routes intents to the current screen, ticks the session while playing,
/// and handles the transitions between screens.
pub struct Game {
    screen: Screen,
    inventory: PlayerInventory,
    audio: Audio,
    save: SaveFile,
    config: GameConfig,
    spawn: SpawnConfig,
    exit: bool,
}

impl Game {
    /// Creates a game on the menu screen, loading the inventory from the configured save path.
    pub fn new(config: GameConfig, audio: Audio) -> Self {
        let save = SaveFile::new(&config.save_path);
        let inventory = save.load();
        Self::with_inventory(config, audio, save, inventory)
    }

    pub fn with_inventory(config: GameConfig, mut audio: Audio, save: SaveFile, inventory: PlayerInventory) -> Self {
        audio.apply_settings(inventory.settings.sounds_on, inventory.settings.music_on);
        if config.mute {
            audio.set_mute(true);
        }
        audio.play_loop(Sound::BackgroundLoop);

        Self {
            screen: Screen::Menu(MenuController::default()),
            inventory,
            audio,
            save,
            spawn: SpawnConfig::from_config(&config),
            config,
            exit: false,
        }
    }

    /// Replaces the spawn timing used by future sessions.
    pub fn with_spawn_config(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn state(&self) -> GameState {
        self.screen.state()
    }

    pub fn inventory(&self) -> &PlayerInventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut PlayerInventory {
        &mut self.inventory
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The running session, if the game is in the gameplay state.
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Playing(session) => Some(session),
            _ => None,
        }
    }

    /// The results of the last session, while the game over screen is shown.
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        match &self.screen {
            Screen::GameOver(controller) => Some(controller.summary()),
            _ => None,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn show_fps_overlay(&self) -> bool {
        self.inventory.settings.show_fps_overlay
    }

    /// Routes one decoded intent.
    pub fn handle_intent(&mut self, intent: Intent, now: Instant) -> GameResult<()> {
        match intent {
            Intent::Exit => {
                info!("Exit requested");
                self.exit = true;
                return Ok(());
            }
            Intent::ToggleMute => {
                let muted = self.audio.is_muted();
                self.audio.set_mute(!muted);
                info!("{}", if muted { "Unmuted" } else { "Muted" });
                return Ok(());
            }
            Intent::ToggleFpsOverlay => {
                let settings = &mut self.inventory.settings;
                settings.show_fps_overlay = !settings.show_fps_overlay;
                return Ok(());
            }
            _ => {}
        }

        let transition = match &mut self.screen {
            Screen::Menu(controller) => controller.handle_intent(intent, &mut self.inventory),
            Screen::Store(controller) => controller.handle_intent(intent, &mut self.inventory),
            Screen::GameOver(controller) => controller.handle_intent(intent, &mut self.inventory),
            Screen::Playing(session) => {
                session.handle_intent(intent, &mut self.inventory, now);
                Transition::Stay
            }
        };
        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> GameResult<()> {
        match transition {
            Transition::Stay => Ok(()),
            Transition::Play => self.start_session(),
            Transition::Menu => {
                self.enter(Screen::Menu(MenuController::default()));
                Ok(())
            }
            Transition::Store => {
                self.enter(Screen::Store(StoreController::default()));
                Ok(())
            }
            Transition::Exit => {
                info!("Exit selected");
                self.exit = true;
                Ok(())
            }
        }
    }

    fn enter(&mut self, screen: Screen) {
        info!(from = %self.screen.state(), to = %screen.state(), "State transition");
        self.screen = screen;
    }

    /// Builds a fresh session and starts its spawn timers.
    ///
    /// Registries and timers are never reused across sessions.
    pub fn start_session(&mut self) -> GameResult<()> {
        let mut session = Session::new(self.inventory.equipped_vehicle(), &self.spawn);
        session.start()?;
        self.enter(Screen::Playing(Box::new(session)));
        Ok(())
    }

    /// Runs one simulation tick. Only the gameplay state does anything.
    pub fn tick(&mut self, now: Instant) {
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };

        if session.check_collision(&mut self.inventory, &mut self.audio, now) {
            self.end_session();
        } else {
            session.update(now);
        }
    }

    /// Stops the running session, banks its coins, records the high score and saves.
    pub fn end_session(&mut self) {
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };

        let summary = session.stop();
        self.inventory.add_currency(summary.coins);
        let new_high_score = self.inventory.set_high_score(summary.score);
        if new_high_score {
            info!(score = %summary.score.separate_with_commas(), "New high score");
        }
        self.persist();
        self.enter(Screen::GameOver(GameOverController::new(summary, new_high_score)));
    }

    /// The frame rate the loop should target right now.
    pub fn current_fps(&self, now: Instant) -> u32 {
        match &self.screen {
            Screen::Playing(session) if session.is_slow_motion_active(now) => self.config.slow_motion_fps,
            _ => self.config.desired_fps,
        }
    }

    pub fn paint(&self, surface: &mut dyn Surface, now: Instant) -> GameResult<()> {
        match &self.screen {
            Screen::Menu(controller) => controller.paint(surface, &self.inventory)?,
            Screen::Store(controller) => controller.paint(surface, &self.inventory)?,
            Screen::GameOver(controller) => controller.paint(surface, &self.inventory)?,
            Screen::Playing(session) => session.paint(surface, &self.inventory, now)?,
        }
        Ok(())
    }

    /// Ends any running session, writes the save and silences audio.
    pub fn shutdown(&mut self) {
        if let Screen::Playing(session) = &mut self.screen {
            let summary = session.stop();
            self.inventory.add_currency(summary.coins);
            self.inventory.set_high_score(summary.score);
        }
        self.persist();
        self.audio.stop_all();
    }

    /// Writes the inventory to the save file.
    pub fn save(&self) -> GameResult<()> {
        self.save.save(&self.inventory)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(path = %self.save.path().display(), "Failed to write save: {e}");
        }
    }
}
