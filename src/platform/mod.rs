//! Platform abstraction layer: frame sleeping, randomness and worker threads.

mod desktop;
pub use desktop::*;
