//! A self-rescheduling randomized timer that produces one entity per fire.
//!
//! Each scheduler runs its chain on a dedicated timer thread. A generation
//! counter guards the chain: `stop()` bumps it under the signal lock and wakes
//! the worker, which sees the mismatch and exits without firing. `stop()` then
//! joins the worker, so once it returns no producer call can still be in flight.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::entity::kind::EntityKind;
use crate::entity::Entity;
use crate::error::{GameError, GameResult};
use crate::platform;
use crate::registry::Registry;

/// When a scheduler first fires and how far apart later fires are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTiming {
    /// Delay before the first fire after `start()`.
    pub warmup: Duration,
    /// Inclusive lower bound of the interval between fires.
    pub min: Duration,
    /// Exclusive upper bound of the interval between fires.
    pub max: Duration,
}

impl SpawnTiming {
    pub const fn new(warmup: Duration, min: Duration, max: Duration) -> Self {
        Self { warmup, min, max }
    }

    /// Builds a timing from a `[min, max)` millisecond range.
    pub const fn from_millis(warmup: Duration, (min, max): (u64, u64)) -> Self {
        Self::new(warmup, Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Draws the next interval uniformly from `[min, max)`. A degenerate range yields `min`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }
}

type Task = Box<dyn FnMut() + Send>;

#[derive(Default)]
struct Shared {
    /// Bumped by every `stop()`. A worker only fires while this matches the value it was started with.
    generation: AtomicU64,
    /// Held while checking the generation and while sleeping, so a stop can never be missed.
    signal: Mutex<()>,
    wake: Condvar,
    fires: AtomicU64,
    workers: AtomicUsize,
}

/// Decrements the live worker count when a worker exits, including by panic.
struct WorkerGuard(Arc<Shared>);

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.0.workers.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A reusable timed trigger bound to one entity subtype and one registry.
pub struct SpawnScheduler {
    name: &'static str,
    timing: SpawnTiming,
    task: Arc<Mutex<Task>>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl SpawnScheduler {
    /// Creates a stopped scheduler. Each fire calls `producer` once and appends the result to `registry`.
    pub fn new<K, P>(name: &'static str, timing: SpawnTiming, registry: Arc<Registry<K>>, mut producer: P) -> Self
    where
        K: EntityKind,
        P: FnMut() -> Entity<K> + Send + 'static,
    {
        let task: Task = Box::new(move || registry.add(producer()));
        Self {
            name,
            timing,
            task: Arc::new(Mutex::new(task)),
            shared: Arc::new(Shared::default()),
            worker: None,
        }
    }

    /// Creates a stopped scheduler that spawns `kind` at random road positions.
    pub fn for_kind<K: EntityKind>(kind: K, timing: SpawnTiming, registry: Arc<Registry<K>>) -> Self
    where
        &'static str: From<K>,
    {
        let name: &'static str = kind.into();
        Self::new(name, timing, registry, move || Entity::spawn(kind, &mut platform::rng()))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn timing(&self) -> SpawnTiming {
        self.timing
    }

    /// Arms the first fire after the warm-up delay.
    ///
    /// Starting a running scheduler restarts its chain; the previous chain is
    /// cancelled and joined first, so two chains never overlap.
    pub fn start(&mut self) -> GameResult<()> {
        self.stop();

        let generation = self.shared.generation.load(Ordering::Acquire);
        let shared = Arc::clone(&self.shared);
        let task = Arc::clone(&self.task);
        let timing = self.timing;
        let name = self.name;

        self.shared.workers.fetch_add(1, Ordering::AcqRel);
        let worker = platform::spawn_timer_thread(name, move || {
            let _guard = WorkerGuard(Arc::clone(&shared));
            run_chain(name, &shared, &task, timing, generation);
        });

        match worker {
            Ok(handle) => {
                debug!(scheduler = name, generation, warmup = ?timing.warmup, "Spawn scheduler started");
                self.worker = Some(handle);
                Ok(())
            }
            Err(source) => {
                self.shared.workers.fetch_sub(1, Ordering::AcqRel);
                Err(GameError::SpawnTimer { name, source })
            }
        }
    }

    /// Cancels any pending fire and waits for the timer thread to exit.
    ///
    /// After this returns the producer is not called again until `start()`.
    pub fn stop(&mut self) {
        {
            let _signal = self.shared.signal.lock();
            self.shared.generation.fetch_add(1, Ordering::AcqRel);
            self.shared.wake.notify_all();
        }

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!(scheduler = self.name, "Spawn timer thread panicked");
            }
            debug!(scheduler = self.name, fires = self.fire_count(), "Spawn scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Total fires since creation, across restarts.
    pub fn fire_count(&self) -> u64 {
        self.shared.fires.load(Ordering::Acquire)
    }

    /// Number of timer threads currently alive for this scheduler. Never more than one.
    pub fn live_workers(&self) -> usize {
        self.shared.workers.load(Ordering::Acquire)
    }

    /// Current cancellation token.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }
}

impl Drop for SpawnScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SpawnScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnScheduler")
            .field("name", &self.name)
            .field("timing", &self.timing)
            .field("running", &self.is_running())
            .field("fires", &self.fire_count())
            .finish()
    }
}

/// The body of a timer thread: sleep, fire, redraw the delay, repeat until cancelled.
fn run_chain(name: &'static str, shared: &Shared, task: &Mutex<Task>, timing: SpawnTiming, generation: u64) {
    let mut rng = platform::rng();
    let mut delay = timing.warmup;

    loop {
        let deadline = Instant::now() + delay;
        {
            let mut signal = shared.signal.lock();
            while shared.generation.load(Ordering::Acquire) == generation {
                if shared.wake.wait_until(&mut signal, deadline).timed_out() {
                    break;
                }
            }
            if shared.generation.load(Ordering::Acquire) != generation {
                trace!(scheduler = name, generation, "Spawn chain cancelled");
                return;
            }
        }

        (task.lock())();
        let fires = shared.fires.fetch_add(1, Ordering::AcqRel) + 1;

        delay = timing.next_delay(&mut rng);
        trace!(scheduler = name, fires, next = ?delay, "Spawn timer fired");
    }
}
