use std::time::{Duration, Instant};

use circular_buffer::CircularBuffer;
use glam::Vec2;
use tracing::{debug, error, info};

use crate::constants::{frame_budget, FPS_SAMPLE_WINDOW, WIDTH};
use crate::formatter;
use crate::frontend::Frontend;
use crate::game::Game;
use crate::platform;
use crate::render::TextStyle;

/// Durations of the most recent frames, for the FPS overlay.
#[derive(Debug, Default)]
pub struct FrameStats {
    frames: CircularBuffer<FPS_SAMPLE_WINDOW, Duration>,
}

impl FrameStats {
    pub fn record(&mut self, frame: Duration) {
        self.frames.push_back(frame);
    }

    pub fn average_frame_time(&self) -> Option<Duration> {
        if self.frames.is_empty() {
            return None;
        }
        let total: Duration = self.frames.iter().sum();
        Some(total / self.frames.len() as u32)
    }

    /// Average frames per second over the sample window.
    pub fn average_fps(&self) -> Option<f64> {
        self.average_frame_time()
            .filter(|d| !d.is_zero())
            .map(|d| 1.0 / d.as_secs_f64())
    }
}

/// The fixed-cadence loop driving a [`Game`] through a [`Frontend`].
pub struct App<F: Frontend> {
    game: Game,
    frontend: F,
    stats: FrameStats,
    frames: u64,
}

impl<F: Frontend> App<F> {
    pub fn new(game: Game, frontend: F) -> Self {
        Self {
            game,
            frontend,
            stats: FrameStats::default(),
            frames: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs until the frontend closes or the game asks to exit, then shuts the game down.
    pub fn run(&mut self) {
        info!(fps = self.game.config().desired_fps, "Starting game loop");
        while self.run_frame() {}
        self.game.shutdown();
        info!(frames = self.frames, "Game loop stopped");
    }

    /// Runs one frame: intents, tick, paint, present, then sleep out the rest of the budget.
    ///
    /// Returns `false` once the loop should stop. A failing frame is logged and
    /// the loop carries on.
    pub fn run_frame(&mut self) -> bool {
        if !self.frontend.is_visible() || self.game.should_exit() {
            return false;
        }

        let start = Instant::now();
        formatter::increment_tick();

        for intent in self.frontend.poll_intents() {
            if let Err(e) = self.game.handle_intent(intent, start) {
                error!(%intent, "Failed to handle intent: {e}");
            }
        }

        self.game.tick(start);

        if let Err(e) = self.game.paint(self.frontend.surface(), start) {
            error!("Failed to draw game: {e}");
        }
        if self.game.show_fps_overlay() {
            if let Some(fps) = self.stats.average_fps() {
                let text = format!("{fps:.0} FPS");
                if let Err(e) = self
                    .frontend
                    .surface()
                    .draw_text(&text, Vec2::new(WIDTH - 120.0, 60.0), TextStyle::Overlay)
                {
                    error!("Failed to draw FPS overlay: {e}");
                }
            }
        }
        if let Err(e) = self.frontend.present() {
            error!("Failed to present frame: {e}");
        }

        let budget = frame_budget(self.game.current_fps(start));
        let elapsed = start.elapsed();
        if elapsed < budget {
            platform::sleep(budget - elapsed, self.frontend.is_focused());
        } else {
            debug!("Game loop behind schedule by: {:?}", elapsed - budget);
        }

        self.stats.record(start.elapsed());
        self.frames += 1;
        !self.game.should_exit()
    }

    /// Hands the game back, e.g. to inspect it after a run.
    pub fn into_game(self) -> Game {
        self.game
    }
}
