//! The coordinator drives rounds and decides when the game is over.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::delay::DelaySource;
use crate::error::GameError;
use crate::game::chair_pool::ChairPool;
use crate::game::player::PlayerId;
use crate::game::state::{Elimination, GameState, RoundRecord};
use crate::narration::{GameEvent, Narrator};

/// Steps of one round as seen by the coordinator, plus the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorPhase {
    RoundStart,
    MusicPlaying,
    MusicStopped,
    RoundEnd,
    GameOver,
}

/// What the coordinator saw by the time the game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub rounds: u32,
    pub winner: Option<PlayerId>,
    pub history: Vec<RoundRecord>,
    pub eliminations: Vec<Elimination>,
}

/// Drives the game from its own thread.
///
/// The coordinator is the only writer of round structure: it opens rounds,
/// refills the chair pool, stops the music, closes rounds and ends the game.
/// Players only claim chairs and report.
pub struct Coordinator {
    state: Arc<GameState>,
    pool: Arc<ChairPool>,
    narrator: Arc<dyn Narrator>,
    music: Box<dyn DelaySource>,
    grace: Box<dyn DelaySource>,
}

impl Coordinator {
    pub fn new(
        state: Arc<GameState>,
        pool: Arc<ChairPool>,
        narrator: Arc<dyn Narrator>,
        music: Box<dyn DelaySource>,
        grace: Box<dyn DelaySource>,
    ) -> Self {
        Self {
            state,
            pool,
            narrator,
            music,
            grace,
        }
    }

    /// Play rounds until one player remains or the game is stopped.
    ///
    /// The game is always deactivated on the way out, including on error, so
    /// no player stays blocked.
    pub fn run(self) -> Result<GameReport, GameError> {
        let played = self.play_rounds();
        let winner = self.finish();
        played?;

        Ok(GameReport {
            rounds: self.state.round(),
            winner,
            history: self.state.history(),
            eliminations: self.state.eliminations(),
        })
    }

    fn play_rounds(&self) -> Result<(), GameError> {
        while self.state.remaining() > 1 && self.state.is_active() {
            self.play_round()?;
        }
        Ok(())
    }

    /// Run a single round from chair reset to sweep.
    pub fn play_round(&self) -> Result<RoundRecord, GameError> {
        let signal = self.state.signal();

        let plan = self.state.begin_round();
        enter(CoordinatorPhase::RoundStart, plan.round);
        let drained = self.pool.resize_and_refill(plan.chairs)?;
        signal.reset(plan.round);
        info!(
            round = plan.round,
            chairs = plan.chairs,
            players = plan.players,
            drained,
            "Starting round"
        );
        self.narrator.narrate(GameEvent::RoundStarted {
            round: plan.round,
            chairs: plan.chairs,
            players_remaining: plan.players,
        });

        enter(CoordinatorPhase::MusicPlaying, plan.round);
        if !signal.sleep_while_active(self.music.duration()) {
            info!(round = plan.round, "Game stopped while the music was playing");
            return Ok(self.state.close_round());
        }

        enter(CoordinatorPhase::MusicStopped, plan.round);
        signal.stop_music();
        self.narrator
            .narrate(GameEvent::MusicStopped { round: plan.round });

        if !self.state.wait_settled(self.grace.duration()) && self.state.is_active() {
            // Permits stay with this round until every woken racer has tried
            // its claim; refilling earlier would hand them next round's chairs.
            warn!(
                round = plan.round,
                reported = self.state.reported(),
                racers = plan.players,
                "Grace window ended before every player reported, waiting for claims"
            );
            self.state.wait_all_reported();
        }
        let record = self.state.close_round();
        if record.seated.len() > record.chairs {
            error!(
                round = record.round,
                seated = record.seated.len(),
                chairs = record.chairs,
                "More players seated than chairs"
            );
            return Err(GameError::OverClaim {
                round: record.round,
                seated: record.seated.len(),
                chairs: record.chairs,
            });
        }

        // Safety net: only a stopped game can leave a racer mid-claim here.
        let added = self.pool.release_all(self.pool.capacity());
        if record.unreported() > 0 {
            warn!(
                round = record.round,
                unreported = record.unreported(),
                added,
                "Released permits for players still racing"
            );
        } else {
            debug!(round = record.round, added, "Swept chair pool");
        }

        enter(CoordinatorPhase::RoundEnd, plan.round);
        let players_remaining = self.state.remaining();
        info!(
            round = record.round,
            seated = record.seated.len(),
            eliminated = record.eliminated.len(),
            players_remaining,
            "Round ended"
        );
        self.narrator.narrate(GameEvent::RoundEnded {
            round: record.round,
            chairs: record.chairs,
            seated: record.seated.len(),
            players_remaining,
        });
        Ok(record)
    }

    fn finish(&self) -> Option<PlayerId> {
        let rounds = self.state.round();
        enter(CoordinatorPhase::GameOver, rounds);
        self.state.set_active(false);

        let standing = self.state.standing_players();
        let winner = match standing.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        info!(?winner, rounds, standing = standing.len(), "Game over");
        self.narrator.narrate(GameEvent::GameOver { winner, rounds });
        winner
    }
}

fn enter(phase: CoordinatorPhase, round: u32) {
    debug!(?phase, round, "Coordinator phase");
}
