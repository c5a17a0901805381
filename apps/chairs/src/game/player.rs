//! Player agents: one per thread, racing for chairs each round.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, debug_span, info};

use crate::config::EliminationRule;
use crate::error::GameError;
use crate::game::chair_pool::ChairPool;
use crate::game::round_signal::Wake;
use crate::game::state::GameState;
use crate::narration::{GameEvent, Narrator};

/// Player ids run from 1 to the number of players.
pub type PlayerId = u32;

/// Where a player is in its per-round cycle.
///
/// `WaitingForMusicStop -> Racing -> Seated -> WaitingForMusicStop` repeats
/// every round the player finds a chair. `Racing -> Eliminated` ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPhase {
    WaitingForMusicStop,
    Racing,
    Seated,
    Eliminated,
}

impl PlayerPhase {
    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: PlayerPhase) -> bool {
        use PlayerPhase::{Eliminated, Racing, Seated, WaitingForMusicStop};
        matches!(
            (self, next),
            (WaitingForMusicStop, Racing)
                | (Racing, Seated)
                | (Racing, Eliminated)
                | (Seated, WaitingForMusicStop)
        )
    }

    /// No transition leaves a terminal phase.
    pub fn is_terminal(self) -> bool {
        self == PlayerPhase::Eliminated
    }
}

/// How a player's thread ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "fate", rename_all = "snake_case")]
pub enum Fate {
    Eliminated { round: u32 },
    /// Still in the game when it ended.
    Standing,
}

/// What a player thread returns when it exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerOutcome {
    pub id: PlayerId,
    pub fate: Fate,
    pub rounds_seated: u32,
}

/// One player, driven by its own thread through [`PlayerAgent::run`].
///
/// Shares the game state and chair pool with every other player and the
/// coordinator; owns only its phase and per-player counters.
pub struct PlayerAgent {
    id: PlayerId,
    phase: PlayerPhase,
    last_raced: u32,
    rounds_seated: u32,
    rule: EliminationRule,
    state: Arc<GameState>,
    pool: Arc<ChairPool>,
    narrator: Arc<dyn Narrator>,
}

impl PlayerAgent {
    pub fn new(
        id: PlayerId,
        rule: EliminationRule,
        state: Arc<GameState>,
        pool: Arc<ChairPool>,
        narrator: Arc<dyn Narrator>,
    ) -> Self {
        Self {
            id,
            phase: PlayerPhase::WaitingForMusicStop,
            last_raced: 0,
            rounds_seated: 0,
            rule,
            state,
            pool,
            narrator,
        }
    }

    /// This player's id.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Current phase of the per-round cycle.
    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    /// Move to `next`, rejecting anything [`PlayerPhase::can_transition_to`] forbids.
    pub(crate) fn transition(&mut self, next: PlayerPhase) -> Result<(), GameError> {
        if !self.phase.can_transition_to(next) {
            return Err(GameError::IllegalTransition {
                player: self.id,
                from: self.phase,
                to: next,
            });
        }
        debug!(player = self.id, from = ?self.phase, to = ?next, "Player transition");
        self.phase = next;
        Ok(())
    }

    /// Play until eliminated or until the game stops.
    pub fn run(mut self) -> Result<PlayerOutcome, GameError> {
        let span = debug_span!("player", id = self.id);
        let _guard = span.enter();

        loop {
            match self.state.signal().wait_for_music(self.last_raced) {
                Wake::Shutdown => {
                    debug!(player = self.id, "Game inactive, leaving");
                    return Ok(self.outcome(Fate::Standing));
                }
                Wake::MusicStopped { round } => {
                    if let Some(fate) = self.race(round)? {
                        return Ok(self.outcome(fate));
                    }
                }
            }
        }
    }

    /// One claim attempt for `round`. Returns the fate if the player is out.
    pub(crate) fn race(&mut self, round: u32) -> Result<Option<Fate>, GameError> {
        self.transition(PlayerPhase::Racing)?;
        self.last_raced = round;

        if self.pool.try_claim() {
            self.transition(PlayerPhase::Seated)?;
            self.rounds_seated += 1;
            // Narrate before reporting so the event precedes the round's close.
            self.narrator.narrate(GameEvent::PlayerSeated {
                round,
                player: self.id,
            });
            self.state.record_seated(self.id, round);
            self.transition(PlayerPhase::WaitingForMusicStop)?;
            return Ok(None);
        }

        self.transition(PlayerPhase::Eliminated)?;
        self.narrator.narrate(GameEvent::PlayerEliminated {
            round,
            player: self.id,
        });
        let remaining = self.state.eliminate(self.id, round)?;
        info!(player = self.id, round, remaining, "No chair left");
        if self.rule == EliminationRule::SuddenDeath {
            self.state.set_active(false);
        }
        Ok(Some(Fate::Eliminated { round }))
    }

    fn outcome(&self, fate: Fate) -> PlayerOutcome {
        PlayerOutcome {
            id: self.id,
            fate,
            rounds_seated: self.rounds_seated,
        }
    }
}
