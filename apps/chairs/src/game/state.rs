//! Shared game state: players remaining, chair count, round tally and history.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::GameError;
use crate::game::player::PlayerId;
use crate::game::round_signal::RoundSignal;

/// What the coordinator needs to set up a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPlan {
    pub round: u32,
    pub chairs: usize,
    pub players: usize,
}

/// Outcome of one completed round, as accounted when the round closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    pub round: u32,
    pub chairs: usize,
    pub players_at_start: usize,
    pub seated: Vec<PlayerId>,
    pub eliminated: Vec<PlayerId>,
}

impl RoundRecord {
    /// Reports expected but missing when the round closed.
    pub fn unreported(&self) -> usize {
        self.players_at_start
            .saturating_sub(self.seated.len() + self.eliminated.len())
    }
}

/// A player leaving the game, with the round it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elimination {
    pub player: PlayerId,
    pub round: u32,
}

#[derive(Debug)]
struct Tally {
    round: u32,
    chairs: usize,
    racers: usize,
    seated: Vec<PlayerId>,
    eliminated: Vec<PlayerId>,
    closed: bool,
}

impl Tally {
    fn empty() -> Self {
        Self {
            round: 0,
            chairs: 0,
            racers: 0,
            seated: Vec::new(),
            eliminated: Vec::new(),
            closed: true,
        }
    }

    fn settled(&self) -> bool {
        self.seated.len() + self.eliminated.len() >= self.racers
    }

    /// Whether a report for `round` still counts towards this tally.
    fn accepts(&self, round: u32) -> bool {
        !self.closed && self.round == round
    }
}

#[derive(Debug)]
struct Inner {
    players: usize,
    players_remaining: usize,
    chair_count: usize,
    round: u32,
    tally: Tally,
    eliminations: Vec<Elimination>,
    history: Vec<RoundRecord>,
}

/// Shared mutable state of one game.
///
/// Every field is guarded by one mutex. The active flag lives in the owned
/// [`RoundSignal`] so that players check it under the same lock they sleep on.
#[derive(Debug)]
pub struct GameState {
    inner: Mutex<Inner>,
    settled: Condvar,
    signal: RoundSignal,
}

impl GameState {
    /// Fresh state for `players` players with `players - 1` chairs.
    ///
    /// Fails with [`GameError::Config`] for fewer than two players.
    pub fn new(players: usize) -> Result<Self, GameError> {
        if players < 2 {
            return Err(GameError::config(format!(
                "A game needs at least 2 players, got {players}"
            )));
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                players,
                players_remaining: players,
                chair_count: players - 1,
                round: 0,
                tally: Tally::empty(),
                eliminations: Vec::new(),
                history: Vec::new(),
            }),
            settled: Condvar::new(),
            signal: RoundSignal::new(),
        })
    }

    /// Open the next round.
    ///
    /// The first round uses the initial `players - 1` chairs. Later rounds
    /// shrink to one chair fewer than the players still standing, which is
    /// one chair fewer than last round after a single elimination. The count
    /// never grows and never drops below one.
    pub fn begin_round(&self) -> RoundPlan {
        let mut inner = self.inner.lock();
        inner.round += 1;
        if inner.round > 1 && inner.chair_count > 1 {
            inner.chair_count = inner
                .chair_count
                .min(inner.players_remaining.saturating_sub(1))
                .max(1);
        }

        let plan = RoundPlan {
            round: inner.round,
            chairs: inner.chair_count,
            players: inner.players_remaining,
        };
        inner.tally = Tally {
            round: plan.round,
            chairs: plan.chairs,
            racers: plan.players,
            seated: Vec::with_capacity(plan.chairs),
            eliminated: Vec::new(),
            closed: false,
        };
        debug!(round = plan.round, chairs = plan.chairs, players = plan.players, "Round opened");
        plan
    }

    /// Remove `player` from the game. Returns the players still remaining.
    ///
    /// The last player standing can never be eliminated; that would leave a
    /// game without a winner.
    pub fn eliminate(&self, player: PlayerId, round: u32) -> Result<usize, GameError> {
        let mut inner = self.inner.lock();
        if inner.players_remaining <= 1 {
            return Err(GameError::NoPlayersLeft { player });
        }
        inner.players_remaining -= 1;
        inner.eliminations.push(Elimination { player, round });

        if inner.tally.accepts(round) {
            inner.tally.eliminated.push(player);
            self.settled.notify_all();
        } else {
            warn!(player, round, current = inner.tally.round, "Late elimination report");
        }
        Ok(inner.players_remaining)
    }

    /// Record that `player` claimed a chair in `round`.
    pub fn record_seated(&self, player: PlayerId, round: u32) {
        let mut inner = self.inner.lock();
        if inner.tally.accepts(round) {
            inner.tally.seated.push(player);
            self.settled.notify_all();
        } else {
            warn!(player, round, current = inner.tally.round, "Late seat report");
        }
    }

    /// Wait until every racer of the open round has reported, the game stops,
    /// or `timeout` passes.
    ///
    /// Returns whether the round settled.
    pub fn wait_settled(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        while !inner.tally.settled() && self.signal.is_active() {
            if self.settled.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        inner.tally.settled()
    }

    /// Wait, without a deadline, until every racer of the open round has
    /// reported or the game stops. Returns whether the round settled.
    ///
    /// Claims never block, so every racer that woke reports in bounded time;
    /// a player thread that dies stops the game and releases this wait.
    pub fn wait_all_reported(&self) -> bool {
        let mut inner = self.inner.lock();
        while !inner.tally.settled() && self.signal.is_active() {
            self.settled.wait(&mut inner);
        }
        inner.tally.settled()
    }

    /// Freeze the open round's tally into the history.
    ///
    /// Reports arriving afterwards still update the player count but are not
    /// attributed to the closed round.
    pub fn close_round(&self) -> RoundRecord {
        let mut inner = self.inner.lock();
        inner.tally.closed = true;
        let record = RoundRecord {
            round: inner.tally.round,
            chairs: inner.tally.chairs,
            players_at_start: inner.tally.racers,
            seated: inner.tally.seated.clone(),
            eliminated: inner.tally.eliminated.clone(),
        };
        inner.history.push(record.clone());
        record
    }

    /// Reports received so far for the open round.
    pub fn reported(&self) -> usize {
        let inner = self.inner.lock();
        inner.tally.seated.len() + inner.tally.eliminated.len()
    }

    /// Players not yet eliminated.
    pub fn remaining(&self) -> usize {
        self.inner.lock().players_remaining
    }

    /// Chairs in the current (or most recent) round.
    pub fn chairs(&self) -> usize {
        self.inner.lock().chair_count
    }

    /// Current round number; 0 before the first round starts.
    pub fn round(&self) -> u32 {
        self.inner.lock().round
    }

    /// Players the game started with.
    pub fn players(&self) -> usize {
        self.inner.lock().players
    }

    /// Ids of players not eliminated, ascending.
    pub fn standing_players(&self) -> Vec<PlayerId> {
        let inner = self.inner.lock();
        (1..=inner.players as PlayerId)
            .filter(|id| !inner.eliminations.iter().any(|e| e.player == *id))
            .collect()
    }

    /// Every elimination so far, in the order it was recorded.
    pub fn eliminations(&self) -> Vec<Elimination> {
        self.inner.lock().eliminations.clone()
    }

    /// Closed rounds, oldest first.
    pub fn history(&self) -> Vec<RoundRecord> {
        self.inner.lock().history.clone()
    }

    /// Flip the game-wide active flag and wake everyone blocked on it.
    pub fn set_active(&self, active: bool) {
        self.signal.set_active(active);
        // Lock order is inner -> signal; the signal lock is released by now.
        let _inner = self.inner.lock();
        self.settled.notify_all();
    }

    pub fn is_active(&self) -> bool {
        self.signal.is_active()
    }

    /// The broadcast players wait on between rounds.
    pub fn signal(&self) -> &RoundSignal {
        &self.signal
    }
}
