//! Hosting a game: one thread per player plus the coordinator, all joined.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::config::GameConfig;
use crate::delay::{DelaySource, FixedDelay, UniformDelay};
use crate::error::GameError;
use crate::game::chair_pool::ChairPool;
use crate::game::coordinator::{Coordinator, GameReport};
use crate::game::player::{Fate, PlayerAgent, PlayerId, PlayerOutcome};
use crate::game::state::GameState;
use crate::narration::{Narrator, TracingNarrator};

/// Everything known about a finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub config: GameConfig,
    pub report: GameReport,
    /// One entry per player, ordered by id.
    pub players: Vec<PlayerOutcome>,
    pub duration_ms: f64,
}

impl GameSummary {
    /// The single player left standing, if there is one.
    pub fn winner(&self) -> Option<PlayerId> {
        self.report.winner
    }

    pub fn rounds(&self) -> u32 {
        self.report.rounds
    }

    /// Players whose thread ended with [`Fate::Eliminated`].
    pub fn eliminated(&self) -> usize {
        self.players
            .iter()
            .filter(|p| matches!(p.fate, Fate::Eliminated { .. }))
            .count()
    }

    /// Players still in the game when it ended.
    pub fn standing(&self) -> usize {
        self.players.len() - self.eliminated()
    }
}

/// Builder and host for one game.
pub struct Table {
    config: GameConfig,
    narrator: Arc<dyn Narrator>,
    music: Box<dyn DelaySource>,
    grace: Box<dyn DelaySource>,
}

impl Table {
    /// A table with random music timing and a fixed grace window from `config`.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let music = UniformDelay::music_for(&config)?;
        let grace = FixedDelay(config.grace_ms);

        Ok(Self {
            config,
            narrator: Arc::new(TracingNarrator),
            music: Box::new(music),
            grace: Box::new(grace),
        })
    }

    /// Send events to `narrator` instead of the log.
    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    /// Replace the configured music timing.
    pub fn with_music(mut self, music: Box<dyn DelaySource>) -> Self {
        self.music = music;
        self
    }

    /// Replace the configured grace window.
    pub fn with_grace(mut self, grace: Box<dyn DelaySource>) -> Self {
        self.grace = grace;
        self
    }

    /// Play the game to completion and join every thread.
    pub fn run(self) -> Result<GameSummary, GameError> {
        let started = Instant::now();
        let players = self.config.players;
        let state = Arc::new(GameState::new(players)?);
        let pool = Arc::new(ChairPool::new(players - 1));
        info!(players, rule = %self.config.elimination, "Seating players");

        let mut handles = Vec::with_capacity(players);
        for id in 1..=players as PlayerId {
            let agent = PlayerAgent::new(
                id,
                self.config.elimination,
                state.clone(),
                pool.clone(),
                self.narrator.clone(),
            );
            let guard = StopOnFailure(state.clone());
            let spawned = thread::Builder::new()
                .name(format!("player-{id}"))
                .spawn(move || guard.watch(agent.run()));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    abandon(&state, handles);
                    return Err(e.into());
                }
            }
        }

        let coordinator = Coordinator::new(
            state.clone(),
            pool,
            self.narrator.clone(),
            self.music,
            self.grace,
        );
        let guard = StopOnFailure(state.clone());
        let coordinator = match thread::Builder::new()
            .name("coordinator".to_string())
            .spawn(move || guard.watch(coordinator.run()))
        {
            Ok(handle) => handle,
            Err(e) => {
                abandon(&state, handles);
                return Err(e.into());
            }
        };

        let report = join(coordinator);
        let outcomes: Result<Vec<PlayerOutcome>, GameError> = handles.into_iter().map(join).collect();
        let report = report?;
        let mut outcomes = outcomes?;
        outcomes.sort_by_key(|p| p.id);

        Ok(GameSummary {
            config: self.config,
            report,
            players: outcomes,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

/// Deactivates the game when the thread it guards fails or panics.
struct StopOnFailure(Arc<GameState>);

impl StopOnFailure {
    fn watch<T>(self, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &result {
            error!(error = %e, "Stopping game after failure");
            self.0.set_active(false);
        }
        result
    }
}

impl Drop for StopOnFailure {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.set_active(false);
        }
    }
}

fn join<T>(handle: JoinHandle<Result<T, GameError>>) -> Result<T, GameError> {
    let thread = handle.thread().name().unwrap_or("unnamed").to_string();
    handle
        .join()
        .map_err(|_| GameError::ThreadPanicked { thread })?
}

/// Stop the game and wait for threads that were already started.
fn abandon(state: &GameState, handles: Vec<JoinHandle<Result<PlayerOutcome, GameError>>>) {
    state.set_active(false);
    for handle in handles {
        let _ = handle.join();
    }
}
