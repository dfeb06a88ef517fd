use anyhow::{bail, Context, Result};
use moose::app::App;
use moose::audio::{Audio, TracingBackend};
use moose::config::GameConfig;
use moose::events::{Intent, Steer};
use moose::frontend::HeadlessFrontend;
use moose::game::Game;
use moose::logging::setup_logging;
use tracing::info;

const DEFAULT_FRAMES: u64 = 3600;

/// Reads `--frames N` from the command line.
fn parse_frames(mut args: impl Iterator<Item = String>) -> Result<u64> {
    let mut frames = DEFAULT_FRAMES;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().context("--frames needs a value")?;
                frames = value.parse().with_context(|| format!("invalid frame count: {value}"))?;
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(frames)
}

/// Starts a game from the menu and steers back and forth until the frame limit.
fn scripted_frontend(frames: u64) -> HeadlessFrontend {
    let mut frontend = HeadlessFrontend::new(frames);
    frontend.schedule(1, Intent::Select);

    let mut frame = 30;
    let mut direction = Steer::Left;
    while frame < frames {
        frontend
            .schedule(frame, Intent::Release(Steer::Left))
            .schedule(frame, Intent::Release(Steer::Right))
            .schedule(frame, Intent::Steer(direction));
        direction = match direction {
            Steer::Left => Steer::Right,
            Steer::Right => Steer::Left,
        };
        frame += 45;
    }
    frontend
}

pub fn main() -> Result<()> {
    setup_logging();

    let frames = parse_frames(std::env::args().skip(1))?;
    let config = GameConfig::load();
    info!(frames, save = %config.save_path.display(), "Starting headless run");

    let game = Game::new(config, Audio::new(Box::new(TracingBackend)));
    let mut app = App::new(game, scripted_frontend(frames));
    app.run();

    let game = app.into_game();
    info!(
        high_score = game.inventory().high_score(),
        currency = game.inventory().currency(),
        "Run finished"
    );
    Ok(())
}
