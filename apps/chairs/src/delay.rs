//! Delay generators used by the coordinator for music and grace timing.
//!
//! The coordinator never decides how long the music plays; it asks a
//! [`DelaySource`]. Production runs use [`UniformDelay`], tests mostly use
//! [`FixedDelay`] so rounds complete as fast as the players can race.

use std::time::Duration;

use parking_lot::Mutex;
use rand::prelude::*;

use crate::config::GameConfig;
use crate::error::GameError;

/// Supplies delays in milliseconds.
pub trait DelaySource: Send + Sync {
    fn duration_ms(&self) -> u64;

    fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms())
    }
}

/// Always returns the same delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub u64);

impl DelaySource for FixedDelay {
    fn duration_ms(&self) -> u64 {
        self.0
    }
}

/// Uniformly random delay in `[min_ms, max_ms]`.
///
/// The RNG sits behind a mutex because `duration_ms` takes `&self`.
/// With a seed the sequence of delays is reproducible.
pub struct UniformDelay {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<StdRng>,
}

impl UniformDelay {
    pub fn new(min_ms: u64, max_ms: u64, seed: Option<u64>) -> Result<Self, GameError> {
        if min_ms > max_ms {
            return Err(GameError::config(format!(
                "Delay range is empty: min {min_ms}ms > max {max_ms}ms"
            )));
        }

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            min_ms,
            max_ms,
            rng: Mutex::new(rng),
        })
    }

    /// Music timing as configured for a game.
    pub fn music_for(config: &GameConfig) -> Result<Self, GameError> {
        Self::new(config.music_min_ms, config.music_max_ms, config.seed)
    }

    pub fn bounds(&self) -> (u64, u64) {
        (self.min_ms, self.max_ms)
    }
}

impl DelaySource for UniformDelay {
    fn duration_ms(&self) -> u64 {
        self.rng.lock().random_range(self.min_ms..=self.max_ms)
    }
}
