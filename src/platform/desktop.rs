//! Desktop platform implementation.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::ThreadRng;

/// Sleeps for the remainder of a frame.
///
/// Spin-sleeping keeps frame pacing tight while the window has focus; an
/// unfocused window yields the CPU with a plain sleep instead.
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        thread::sleep(duration);
    }
}

/// The thread-local random source used for spawn delays and spawn columns.
pub fn rng() -> ThreadRng {
    rand::rng()
}

/// Spawns a named background thread for a spawn timer.
pub fn spawn_timer_thread<F>(name: &str, f: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new().name(format!("spawn-{name}")).spawn(f)
}
