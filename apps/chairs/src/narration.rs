//! Game events and the sinks that receive them.
//!
//! Narration is fire-and-forget: the core calls [`Narrator::narrate`] inline
//! from whichever thread observed the event and there is no result to wait on.
//! Implementations must therefore return promptly and must not call back into
//! the game.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::game::player::PlayerId;

/// Something that happened in the game, in the order the core observed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        chairs: usize,
        players_remaining: usize,
    },
    MusicStopped {
        round: u32,
    },
    PlayerSeated {
        round: u32,
        player: PlayerId,
    },
    PlayerEliminated {
        round: u32,
        player: PlayerId,
    },
    RoundEnded {
        round: u32,
        chairs: usize,
        seated: usize,
        players_remaining: usize,
    },
    GameOver {
        winner: Option<PlayerId>,
        rounds: u32,
    },
}

/// Receives game events.
///
/// `narrate` runs inline on the player or coordinator thread that observed
/// the event. A sink that can block stalls that thread, so slow sinks must
/// hand events off (to a channel or a buffer) and return.
pub trait Narrator: Send + Sync {
    fn narrate(&self, event: GameEvent);
}

impl<N: Narrator + ?Sized> Narrator for Arc<N> {
    fn narrate(&self, event: GameEvent) {
        (**self).narrate(event)
    }
}

/// Emits every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn narrate(&self, event: GameEvent) {
        match event {
            GameEvent::RoundStarted {
                round,
                chairs,
                players_remaining,
            } => info!(round, chairs, players_remaining, "Round started"),
            GameEvent::MusicStopped { round } => info!(round, "Music stopped"),
            GameEvent::PlayerSeated { round, player } => info!(round, player, "Player seated"),
            GameEvent::PlayerEliminated { round, player } => {
                info!(round, player, "Player eliminated")
            }
            GameEvent::RoundEnded {
                round,
                chairs,
                seated,
                players_remaining,
            } => info!(round, chairs, seated, players_remaining, "Round ended"),
            GameEvent::GameOver {
                winner: Some(winner),
                rounds,
            } => info!(winner, rounds, "Game over"),
            GameEvent::GameOver {
                winner: None,
                rounds,
            } => info!(rounds, "Game over without a single winner"),
        }
    }
}

/// Records events in arrival order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<GameEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Narrator for EventLog {
    fn narrate(&self, event: GameEvent) {
        self.events.lock().push(event);
    }
}

/// Forwards each event to several narrators.
#[derive(Default, Clone)]
pub struct FanOut {
    sinks: Vec<Arc<dyn Narrator>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink; sinks are called in the order they were added.
    pub fn with(mut self, sink: Arc<dyn Narrator>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Narrator for FanOut {
    fn narrate(&self, event: GameEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.narrate(event.clone());
            }
            last.narrate(event);
        }
    }
}
