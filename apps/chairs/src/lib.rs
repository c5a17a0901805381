#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Musical chairs as a concurrency exercise: one thread per player, a
//! coordinator thread that drives rounds, and a shrinking pool of chairs the
//! players race for whenever the music stops.

pub mod config;
pub mod delay;
pub mod error;
pub mod game;
pub mod narration;

#[cfg(test)]
pub mod test_bootstrap;

pub use config::{EliminationRule, GameConfig};
pub use delay::{DelaySource, FixedDelay, UniformDelay};
pub use error::GameError;
pub use game::{Fate, GameReport, GameSummary, PlayerId, PlayerOutcome, RoundRecord, Table};
pub use narration::{EventLog, FanOut, GameEvent, Narrator, TracingNarrator};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
