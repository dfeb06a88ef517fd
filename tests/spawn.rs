use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec2;
use moose::config::GameConfig;
use moose::entity::kind::{EntityKind, ObstacleKind, PickupKind};
use moose::entity::Entity;
use moose::registry::{ObstacleRegistry, PickupRegistry};
use moose::spawn::{ObstacleManager, PickupManager, SpawnConfig, SpawnScheduler, SpawnTiming};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{fast_timing, idle_timing, wait_for};

const PATIENCE: Duration = Duration::from_secs(5);

fn counting_scheduler(timing: SpawnTiming) -> (SpawnScheduler, Arc<PickupRegistry>, Arc<AtomicUsize>) {
    let registry = Arc::new(PickupRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let scheduler = {
        let calls = Arc::clone(&calls);
        SpawnScheduler::new("test", timing, Arc::clone(&registry), move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Entity::new(PickupKind::Coin, Vec2::new(200.0, 0.0), Vec2::ZERO)
        })
    };
    (scheduler, registry, calls)
}

#[test]
fn test_stock_intervals() {
    let config = SpawnConfig::default();
    let ms = Duration::from_millis;

    assert_eq!(config.moose, SpawnTiming::new(ms(2000), ms(5000), ms(6000)));
    assert_eq!(config.static_hazard, SpawnTiming::new(ms(2000), ms(2000), ms(3000)));
    assert_eq!(config.vehicle, SpawnTiming::new(ms(2000), ms(1000), ms(2000)));
    assert_eq!(config.coin, SpawnTiming::new(ms(2000), ms(500), ms(1000)));
    assert_eq!(config.fog_lights, SpawnTiming::new(ms(2000), ms(8000), ms(18000)));
    assert_eq!(config.slow_motion, SpawnTiming::new(ms(2000), ms(10000), ms(20000)));
    assert_eq!(config.invincibility, SpawnTiming::new(ms(2000), ms(12000), ms(22000)));
}

#[test]
fn test_warmup_follows_config() {
    let config = GameConfig {
        spawn_warmup_ms: 250,
        ..GameConfig::default()
    };
    let spawn = SpawnConfig::from_config(&config);
    assert_that(&spawn.obstacle(ObstacleKind::Moose).warmup).is_equal_to(Duration::from_millis(250));
    assert_that(&spawn.pickup(PickupKind::Coin).warmup).is_equal_to(Duration::from_millis(250));
}

#[test]
fn test_next_delay_within_range() {
    let timing = SpawnTiming::from_millis(Duration::ZERO, PickupKind::Coin.spawn_range());
    let mut rng = rand::rng();
    for _ in 0..1000 {
        let delay = timing.next_delay(&mut rng);
        assert_that(&delay).is_greater_than_or_equal_to(Duration::from_millis(500));
        assert_that(&delay).is_less_than(Duration::from_millis(1000));
    }

    let degenerate = SpawnTiming::new(Duration::ZERO, Duration::from_millis(7), Duration::from_millis(7));
    assert_that(&degenerate.next_delay(&mut rng)).is_equal_to(Duration::from_millis(7));
}

#[test]
fn test_fires_repeatedly_after_start() {
    let (mut scheduler, registry, calls) = counting_scheduler(fast_timing());
    assert_that(&scheduler.is_running()).is_false();

    scheduler.start().unwrap();
    assert_that(&wait_for(PATIENCE, || registry.len() >= 3)).is_true();
    scheduler.stop();

    let fired = calls.load(Ordering::SeqCst);
    assert_that(&(fired as u64)).is_equal_to(scheduler.fire_count());
    assert_that(&registry.len()).is_equal_to(fired);
}

#[test]
fn test_nothing_fires_before_warmup() {
    let (mut scheduler, registry, _calls) = counting_scheduler(idle_timing());
    scheduler.start().unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_that(&registry.is_empty()).is_true();
    scheduler.stop();
}

#[test]
fn test_no_fire_after_stop() {
    let (mut scheduler, _registry, calls) = counting_scheduler(fast_timing());
    scheduler.start().unwrap();
    assert_that(&wait_for(PATIENCE, || calls.load(Ordering::SeqCst) > 0)).is_true();

    scheduler.stop();
    let after_stop = calls.load(Ordering::SeqCst);
    assert_that(&scheduler.live_workers()).is_equal_to(0);

    thread::sleep(Duration::from_millis(50));
    assert_that(&calls.load(Ordering::SeqCst)).is_equal_to(after_stop);
}

#[test]
fn test_stop_interrupts_long_wait() {
    let (mut scheduler, _registry, _calls) = counting_scheduler(idle_timing());
    scheduler.start().unwrap();

    let started = std::time::Instant::now();
    scheduler.stop();
    assert_that(&started.elapsed()).is_less_than(Duration::from_secs(1));
    assert_that(&scheduler.is_running()).is_false();
}

#[test]
fn test_restart_never_overlaps_chains() {
    let (mut scheduler, _registry, calls) = counting_scheduler(fast_timing());
    for _ in 0..20 {
        scheduler.start().unwrap();
        assert_that(&scheduler.live_workers()).is_less_than_or_equal_to(1);
    }
    let generation = scheduler.generation();

    scheduler.stop();
    assert_that(&scheduler.generation()).is_greater_than(generation);
    assert_that(&scheduler.live_workers()).is_equal_to(0);

    let after_stop = calls.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_that(&calls.load(Ordering::SeqCst)).is_equal_to(after_stop);
}

#[test]
fn test_drop_stops_worker() {
    let (mut scheduler, _registry, calls) = counting_scheduler(fast_timing());
    scheduler.start().unwrap();
    drop(scheduler);

    let after_drop = calls.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_that(&calls.load(Ordering::SeqCst)).is_equal_to(after_drop);
}

#[test]
fn test_manager_has_one_scheduler_per_subtype() {
    let spawn = SpawnConfig::uniform(idle_timing());
    let obstacles = ObstacleManager::obstacles(&spawn);
    let pickups = PickupManager::pickups(&spawn);

    let names: Vec<&str> = obstacles.schedulers().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Moose", "StaticHazard", "Vehicle"]);
    let names: Vec<&str> = pickups.schedulers().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Coin", "FogLights", "SlowMotion", "Invincibility"]);
}

#[test]
fn test_manager_spawns_every_subtype() {
    let mut pickups = PickupManager::pickups(&SpawnConfig::uniform(fast_timing()));
    pickups.start().unwrap();

    let all_kinds = wait_for(PATIENCE, || {
        let kinds: Vec<PickupKind> = pickups.registry().snapshot().iter().map(|p| p.kind).collect();
        [PickupKind::Coin, PickupKind::FogLights, PickupKind::SlowMotion, PickupKind::Invincibility]
            .iter()
            .all(|k| kinds.contains(k))
    });
    pickups.stop();

    assert_that(&all_kinds).is_true();
    assert_that(&pickups.registry().is_empty()).is_true();
}

#[test]
fn test_new_session_inherits_nothing() {
    let spawn = SpawnConfig::uniform(fast_timing());
    let mut old = ObstacleManager::obstacles(&spawn);
    old.start().unwrap();
    assert_that(&wait_for(PATIENCE, || !old.registry().is_empty())).is_true();
    old.stop();

    let old_fires: u64 = old.schedulers().iter().map(|s| s.fire_count()).sum();

    let mut fresh = ObstacleManager::obstacles(&SpawnConfig::uniform(idle_timing()));
    fresh.start().unwrap();
    thread::sleep(Duration::from_millis(50));

    assert_that(&fresh.registry().is_empty()).is_true();
    assert_that(&old.registry().is_empty()).is_true();
    let still: u64 = old.schedulers().iter().map(|s| s.fire_count()).sum();
    assert_that(&still).is_equal_to(old_fires);
    fresh.stop();
}

#[test]
fn test_manager_restart_after_stop() {
    let registry = Arc::new(ObstacleRegistry::new());
    let scheduler = SpawnScheduler::for_kind(ObstacleKind::Vehicle, fast_timing(), Arc::clone(&registry));
    let mut manager = ObstacleManager::from_parts(registry, vec![scheduler]);

    manager.start().unwrap();
    assert_that(&wait_for(PATIENCE, || !manager.registry().is_empty())).is_true();
    manager.stop();
    assert_that(&manager.registry().is_empty()).is_true();

    manager.start().unwrap();
    assert_that(&wait_for(PATIENCE, || !manager.registry().is_empty())).is_true();
    manager.stop();

    for scheduler in manager.schedulers() {
        assert_that(&scheduler.live_workers()).is_equal_to(0);
    }
}
