use thiserror::Error;

use crate::game::player::{PlayerId, PlayerPhase};

/// Errors raised by the coordination core.
///
/// Apart from `Config` and `Spawn`, every variant is an invariant violation:
/// the core has no I/O, so anything else going wrong means the
/// synchronization protocol itself is broken. Those are surfaced to the
/// caller and never retried.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Chair pool overflow: requested {requested} permits, capacity is {capacity}")]
    PoolOverflow { requested: usize, capacity: usize },
    #[error("Over-claim in round {round}: {seated} players seated on {chairs} chairs")]
    OverClaim {
        round: u32,
        seated: usize,
        chairs: usize,
    },
    #[error("Illegal transition for player {player}: {from:?} -> {to:?}")]
    IllegalTransition {
        player: PlayerId,
        from: PlayerPhase,
        to: PlayerPhase,
    },
    #[error("Player {player} cannot be eliminated: no other player is left")]
    NoPlayersLeft { player: PlayerId },
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Thread {thread} panicked")]
    ThreadPanicked { thread: String },
}

impl GameError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for errors that indicate a broken protocol rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            GameError::PoolOverflow { .. }
                | GameError::OverClaim { .. }
                | GameError::IllegalTransition { .. }
                | GameError::NoPlayersLeft { .. }
        )
    }
}
