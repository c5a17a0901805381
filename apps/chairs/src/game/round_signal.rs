//! The "music stopped" broadcast and the game-wide active flag.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Snapshot of what waiting players can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalState {
    /// Round the signal currently belongs to (0 before the first round).
    pub round: u32,
    pub music_stopped: bool,
    pub active: bool,
}

/// Why a waiting player woke up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    MusicStopped { round: u32 },
    Shutdown,
}

/// One mutex-guarded state paired with one condvar.
///
/// Every change a waiter can observe is made under the mutex and followed by
/// `notify_all`, so a wake-up cannot be lost between a waiter's check and its
/// sleep. The round number acts as a generation counter: a player that already
/// raced in round `r` keeps sleeping until a later round's music stops.
#[derive(Debug)]
pub struct RoundSignal {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl Default for RoundSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundSignal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                round: 0,
                music_stopped: false,
                active: true,
            }),
            cond: Condvar::new(),
        }
    }

    /// Start playing music for `round`.
    pub fn reset(&self, round: u32) {
        let mut state = self.state.lock();
        state.round = round;
        state.music_stopped = false;
    }

    /// Stop the music and wake every waiting player. Returns the round.
    pub fn stop_music(&self) -> u32 {
        let mut state = self.state.lock();
        state.music_stopped = true;
        self.cond.notify_all();
        state.round
    }

    /// Block until the music stops for a round after `last_raced`, or the game ends.
    pub fn wait_for_music(&self, last_raced: u32) -> Wake {
        let mut state = self.state.lock();
        loop {
            if !state.active {
                return Wake::Shutdown;
            }
            if state.music_stopped && state.round > last_raced {
                return Wake::MusicStopped { round: state.round };
            }
            self.cond.wait(&mut state);
        }
    }

    /// Flip the game-wide active flag. Going inactive wakes every waiter.
    pub fn set_active(&self, active: bool) {
        let mut state = self.state.lock();
        state.active = active;
        self.cond.notify_all();
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Sleep for `duration` unless the game stops first.
    ///
    /// Returns whether the game is still active afterwards.
    pub fn sleep_while_active(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut state = self.state.lock();
        while state.active {
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        state.active
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SignalState {
        *self.state.lock()
    }
}
