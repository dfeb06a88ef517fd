use std::time::{Duration, Instant};

use glam::Vec2;
use moose::audio::Sound;
use moose::constants::{INVINCIBILITY_DURATION, SLOW_MOTION_DURATION, TRUCK_PRICE};
use moose::entity::collision::Collidable;
use moose::config::GameConfig;
use moose::entity::kind::{ObstacleKind, PickupKind};
use moose::error::{GameError, RenderError, SaveError};
use moose::events::{Intent, Steer};
use moose::frontend::{DrawCall, RecordingSurface};
use moose::game::state::GameState;
use moose::game::Game;
use moose::inventory::{PlayerInventory, Vehicle};
use moose::render::Overlay;
use moose::save::SaveFile;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{obstacle_at, pickup_at, test_game, test_game_with};

fn start(game: &mut Game) {
    game.handle_intent(Intent::Select, Instant::now()).unwrap();
    assert_that(&game.state()).is_equal_to(GameState::Game);
}

fn player_position(game: &Game) -> Vec2 {
    game.session().unwrap().player().position()
}

fn place_obstacle(game: &Game, kind: ObstacleKind) {
    let session = game.session().unwrap();
    session.obstacles().registry().add(obstacle_at(kind, player_position(game)));
}

fn place_pickup(game: &Game, kind: PickupKind) {
    let session = game.session().unwrap();
    session.pickups().registry().add(pickup_at(kind, player_position(game)));
}

#[test]
fn test_starts_on_menu() {
    let (game, backend) = test_game("starts-on-menu", PlayerInventory::default());
    assert_that(&game.state()).is_equal_to(GameState::Menu);
    assert_that(&game.session().is_none()).is_true();
    assert_eq!(backend.looped.lock().clone(), vec![Sound::BackgroundLoop]);
}

#[test]
fn test_menu_navigation_wraps_to_exit() {
    let (mut game, _) = test_game("menu-exit", PlayerInventory::default());
    let now = Instant::now();
    game.handle_intent(Intent::Up, now).unwrap();
    game.handle_intent(Intent::Select, now).unwrap();
    assert_that(&game.should_exit()).is_true();
}

#[test]
fn test_score_counts_ticks() {
    let (mut game, _) = test_game("score-ticks", PlayerInventory::default());
    start(&mut game);

    let now = Instant::now();
    for _ in 0..25 {
        game.tick(now);
    }
    assert_that(&game.session().unwrap().score()).is_equal_to(25);
}

#[test]
fn test_obstacle_hit_ends_session() {
    let (mut game, backend) = test_game("obstacle-ends", PlayerInventory::default());
    start(&mut game);

    let now = Instant::now();
    for _ in 0..10 {
        game.tick(now);
    }
    place_pickup(&game, PickupKind::Coin);
    game.tick(now);
    place_obstacle(&game, ObstacleKind::Moose);
    game.tick(now);

    assert_that(&game.state()).is_equal_to(GameState::GameOver);
    let summary = *game.last_summary().unwrap();
    assert_that(&summary.score).is_equal_to(11);
    assert_that(&summary.coins).is_equal_to(1);

    let inventory = game.inventory();
    assert_that(&inventory.currency()).is_equal_to(1);
    assert_that(&inventory.high_score()).is_equal_to(11);
    assert_eq!(backend.played(), vec![Sound::Coin, Sound::Explosion]);
}

#[test]
fn test_session_end_saves_inventory() {
    let (mut game, _) = test_game("session-end-saves", PlayerInventory::default());
    start(&mut game);
    game.tick(Instant::now());
    place_obstacle(&game, ObstacleKind::Vehicle);
    game.tick(Instant::now());

    let saved = SaveFile::new(&game.config().save_path).read().unwrap();
    assert_that(&saved.high_score).is_equal_to(1);
    let _ = std::fs::remove_file(&game.config().save_path);
}

#[test]
fn test_lower_score_keeps_high_score() {
    let mut inventory = PlayerInventory::default();
    inventory.set_high_score(1000);
    let (mut game, _) = test_game("lower-score", inventory);
    start(&mut game);

    place_obstacle(&game, ObstacleKind::StaticHazard);
    game.tick(Instant::now());

    assert_that(&game.state()).is_equal_to(GameState::GameOver);
    assert_that(&game.inventory().high_score()).is_equal_to(1000);
    let _ = std::fs::remove_file(&game.config().save_path);
}

#[test]
fn test_invincibility_survives_hit() {
    let mut inventory = PlayerInventory::default();
    inventory.increment_invincibility();
    let (mut game, backend) = test_game("invincible", inventory);
    start(&mut game);

    let now = Instant::now();
    game.handle_intent(Intent::USE_INVINCIBILITY, now).unwrap();
    assert_that(&game.inventory().invincibility_count()).is_equal_to(0);

    place_obstacle(&game, ObstacleKind::Moose);
    game.tick(now);
    assert_that(&game.state()).is_equal_to(GameState::Game);
    assert_eq!(backend.played(), vec![Sound::Explosion]);

    // The destroyed obstacle is gone after the same tick's update.
    assert_that(&game.session().unwrap().obstacles().registry().is_empty()).is_true();

    // Once it wears off, the next hit ends the session.
    let later = now + INVINCIBILITY_DURATION;
    place_obstacle(&game, ObstacleKind::Moose);
    game.tick(later);
    assert_that(&game.state()).is_equal_to(GameState::GameOver);
    let _ = std::fs::remove_file(&game.config().save_path);
}

#[test]
fn test_slow_motion_lowers_frame_rate() {
    let mut inventory = PlayerInventory::default();
    inventory.increment_slow_motion();
    let (mut game, _) = test_game("slow-motion", inventory);

    let now = Instant::now();
    assert_that(&game.current_fps(now)).is_equal_to(60);
    start(&mut game);
    game.handle_intent(Intent::USE_SLOW_MOTION, now).unwrap();

    assert_that(&game.current_fps(now)).is_equal_to(30);
    assert_that(&game.current_fps(now + SLOW_MOTION_DURATION)).is_equal_to(60);

    // No charges left: using it again changes nothing.
    game.handle_intent(Intent::USE_SLOW_MOTION, now + SLOW_MOTION_DURATION).unwrap();
    assert_that(&game.current_fps(now + SLOW_MOTION_DURATION)).is_equal_to(60);
}

#[test]
fn test_powerup_pickup_stocks_inventory() {
    let (mut game, _) = test_game("powerup-pickup", PlayerInventory::default());
    start(&mut game);

    place_pickup(&game, PickupKind::FogLights);
    place_pickup(&game, PickupKind::SlowMotion);
    game.tick(Instant::now());

    assert_that(&game.inventory().fog_lights_count()).is_equal_to(1);
    assert_that(&game.inventory().slow_motion_count()).is_equal_to(1);
    assert_that(&game.session().unwrap().coins()).is_equal_to(0);
}

#[test]
fn test_steering_moves_player() {
    let (mut game, _) = test_game("steering", PlayerInventory::default());
    start(&mut game);

    let now = Instant::now();
    let before = player_position(&game);
    game.handle_intent(Intent::MOVE_LEFT, now).unwrap();
    game.tick(now);
    game.handle_intent(Intent::Release(Steer::Left), now).unwrap();
    game.tick(now);

    let after = player_position(&game);
    assert_that(&(before.x - after.x)).is_equal_to(Vehicle::Car.speed());
    assert_that(&after.y).is_equal_to(before.y);
}

#[test]
fn test_play_again_builds_fresh_session() {
    let (mut game, _) = test_game("play-again", PlayerInventory::default());
    start(&mut game);

    place_pickup(&game, PickupKind::Coin);
    place_obstacle(&game, ObstacleKind::Moose);
    game.session().unwrap().pickups().registry().add(pickup_at(PickupKind::Coin, Vec2::new(150.0, 0.0)));
    game.tick(Instant::now());
    assert_that(&game.state()).is_equal_to(GameState::GameOver);

    // Play Again is the first entry.
    start(&mut game);
    let session = game.session().unwrap();
    assert_that(&session.score()).is_equal_to(0);
    assert_that(&session.coins()).is_equal_to(0);
    assert_that(&session.obstacles().registry().is_empty()).is_true();
    assert_that(&session.pickups().registry().is_empty()).is_true();
    let _ = std::fs::remove_file(&game.config().save_path);
}

#[test]
fn test_store_purchase_then_play_with_truck() {
    let mut inventory = PlayerInventory::default();
    inventory.add_currency(TRUCK_PRICE + 5);
    let (mut game, _) = test_game("store-truck", inventory);

    let now = Instant::now();
    game.handle_intent(Intent::Down, now).unwrap();
    game.handle_intent(Intent::Select, now).unwrap();
    assert_that(&game.state()).is_equal_to(GameState::Store);

    game.handle_intent(Intent::Select, now).unwrap();
    assert_that(&game.inventory().currency()).is_equal_to(5);
    assert_that(&game.inventory().equipped_vehicle()).is_equal_to(Vehicle::Truck);

    game.handle_intent(Intent::Back, now).unwrap();
    assert_that(&game.state()).is_equal_to(GameState::Menu);

    start(&mut game);
    let player = game.session().unwrap().player();
    assert_that(&player.vehicle()).is_equal_to(Vehicle::Truck);
    assert_that(&player.bounds().size).is_equal_to(Vehicle::Truck.size());
}

#[test]
fn test_fog_overlay_cleared_by_fog_lights() {
    let mut inventory = PlayerInventory::default();
    inventory.increment_fog_lights();
    let (mut game, _) = test_game("fog", inventory);
    start(&mut game);

    let now = Instant::now();
    let mut surface = RecordingSurface::new();
    game.paint(&mut surface, now).unwrap();
    assert_that(&surface.calls().contains(&DrawCall::Overlay(Overlay::Fog))).is_true();

    game.handle_intent(Intent::USE_FOG_LIGHTS, now).unwrap();
    surface.clear();
    game.paint(&mut surface, now).unwrap();
    assert_that(&surface.calls().contains(&DrawCall::Overlay(Overlay::Fog))).is_false();
    assert_that(&surface.sprites().any(|s| s == "car.png")).is_true();
}

#[test]
fn test_invincible_player_blinks() {
    let mut inventory = PlayerInventory::default();
    inventory.increment_invincibility();
    let (mut game, _) = test_game("blink", inventory);
    start(&mut game);

    let now = Instant::now();
    game.handle_intent(Intent::USE_INVINCIBILITY, now).unwrap();

    let mut visible = 0;
    for step in 0..10u64 {
        let mut surface = RecordingSurface::new();
        game.paint(&mut surface, now + Duration::from_millis(step * 100 + 50)).unwrap();
        if surface.sprites().any(|s| s == "car.png") {
            visible += 1;
        }
    }
    assert_that(&visible).is_equal_to(5);
}

#[test]
fn test_shutdown_banks_running_session() {
    let (mut game, _) = test_game("shutdown", PlayerInventory::default());
    start(&mut game);
    place_pickup(&game, PickupKind::Coin);
    game.tick(Instant::now());

    game.shutdown();
    let saved = SaveFile::new(&game.config().save_path).load();
    assert_that(&saved.currency()).is_equal_to(1);
    assert_that(&saved.high_score()).is_equal_to(1);
    let _ = std::fs::remove_file(&game.config().save_path);
}

#[test]
fn test_unmute_resumes_music() {
    let (mut game, backend) = test_game("unmute-music", PlayerInventory::default());
    let now = Instant::now();
    assert_that(&backend.music()).is_equal_to(Some(Sound::BackgroundLoop));

    game.handle_intent(Intent::ToggleMute, now).unwrap();
    assert_that(&game.audio().is_muted()).is_true();
    assert_that(&backend.music()).is_none();

    game.handle_intent(Intent::ToggleMute, now).unwrap();
    assert_that(&game.audio().is_muted()).is_false();
    assert_that(&backend.music()).is_equal_to(Some(Sound::BackgroundLoop));
}

#[test]
fn test_music_starts_when_unmuted_after_muted_launch() {
    let config = GameConfig {
        mute: true,
        ..GameConfig::default()
    };
    let (mut game, backend) = test_game_with("muted-launch", PlayerInventory::default(), config);
    assert_that(&game.audio().is_muted()).is_true();
    assert_that(&backend.music()).is_none();

    game.handle_intent(Intent::ToggleMute, Instant::now()).unwrap();
    assert_that(&backend.music()).is_equal_to(Some(Sound::BackgroundLoop));
}

#[test]
fn test_music_setting_off_stays_silent_when_unmuted() {
    let mut inventory = PlayerInventory::default();
    inventory.settings.music_on = false;
    let (mut game, backend) = test_game("music-off", inventory);
    let now = Instant::now();

    game.handle_intent(Intent::ToggleMute, now).unwrap();
    game.handle_intent(Intent::ToggleMute, now).unwrap();
    assert_that(&backend.music()).is_none();
    assert_that(&backend.looped.lock().is_empty()).is_true();
}

#[test]
fn test_paint_failure_is_a_render_error() {
    let (mut game, _) = test_game("paint-error", PlayerInventory::default());
    start(&mut game);

    let mut surface = RecordingSurface::new().with_missing_sprite("car.png");
    let result = game.paint(&mut surface, Instant::now());
    assert!(matches!(result, Err(GameError::Render(RenderError::SpriteNotFound(ref sprite))) if sprite == "car.png"));
}

#[test]
fn test_save_failure_is_a_save_error() {
    let (game, _) = test_game("save-error", PlayerInventory::default());
    let path = game.config().save_path.clone();
    std::fs::create_dir_all(&path).unwrap();

    let result = game.save();
    assert!(matches!(result, Err(GameError::Save(SaveError::Io(_)))));

    let _ = std::fs::remove_dir(&path);
}
