//! Metrics collection and output for simulated games.

use chairs::{Fate, GameSummary, PlayerId, RoundRecord};
use serde::Serialize;

use crate::simulator::GameResult;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: SimConfig,
    pub result: GameResultMetrics,
    pub rounds: Vec<RoundMetrics>,
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    pub players: usize,
    pub rule: String,
    pub music_min_ms: u64,
    pub music_max_ms: u64,
    pub grace_ms: u64,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub winner: Option<PlayerId>,
    pub rounds: u32,
    pub eliminated: usize,
    pub standing: usize,
    pub events: usize,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMetrics {
    pub round_no: u32,
    pub chairs: usize,
    pub players_at_start: usize,
    pub seated: usize,
    pub eliminated: Vec<PlayerId>,
    /// Players that had not reported when the round closed.
    pub unreported: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub player: PlayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated_in: Option<u32>,
    pub rounds_seated: u32,
    pub winner: bool,
}

/// Build metrics from a finished game.
pub fn build_game_metrics(game_id: u32, total_games: u32, result: &GameResult) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));
    let summary = &result.summary;

    GameMetrics {
        game_id,
        seed: result.seed,
        timestamp,
        config: SimConfig {
            players: summary.config.players,
            rule: summary.config.elimination.to_string(),
            music_min_ms: summary.config.music_min_ms,
            music_max_ms: summary.config.music_max_ms,
            grace_ms: summary.config.grace_ms,
            total_games,
        },
        result: GameResultMetrics {
            winner: summary.winner(),
            rounds: summary.rounds(),
            eliminated: summary.eliminated(),
            standing: summary.standing(),
            events: result.events,
            duration_ms: summary.duration_ms,
        },
        rounds: summary.report.history.iter().map(build_round_metrics).collect(),
        player_metrics: build_player_metrics(summary),
    }
}

fn build_round_metrics(round: &RoundRecord) -> RoundMetrics {
    RoundMetrics {
        round_no: round.round,
        chairs: round.chairs,
        players_at_start: round.players_at_start,
        seated: round.seated.len(),
        eliminated: round.eliminated.clone(),
        unreported: round.unreported(),
    }
}

fn build_player_metrics(summary: &GameSummary) -> Vec<PlayerMetrics> {
    summary
        .players
        .iter()
        .map(|outcome| PlayerMetrics {
            player: outcome.id,
            eliminated_in: match outcome.fate {
                Fate::Eliminated { round } => Some(round),
                Fate::Standing => None,
            },
            rounds_seated: outcome.rounds_seated,
            winner: summary.winner() == Some(outcome.id),
        })
        .collect()
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub players: usize,
    pub rule: String,
    /// Empty when the game stopped with several players standing.
    pub winner: Option<PlayerId>,
    pub rounds: u32,
    pub eliminated: usize,
    pub unreported: usize,
    pub duration_ms: f64,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            players: metrics.config.players,
            rule: metrics.config.rule.clone(),
            winner: metrics.result.winner,
            rounds: metrics.result.rounds,
            eliminated: metrics.result.eliminated,
            unreported: metrics.rounds.iter().map(|r| r.unreported).sum(),
            duration_ms: metrics.result.duration_ms,
        }
    }
}
