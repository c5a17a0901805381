//! Game configuration handling.
//!
//! Configuration can come from three places: a JSON value (lenient, falls back
//! to defaults like the other JSON-backed configs), the process environment
//! (`CHAIRS_*` variables, used by the `chairs` binary), or directly from the
//! simulator's CLI flags. All sources end in [`GameConfig::validate`].

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::GameError;

pub const DEFAULT_PLAYERS: usize = 4;
pub const DEFAULT_MUSIC_MIN_MS: u64 = 1000;
pub const DEFAULT_MUSIC_MAX_MS: u64 = 3000;
pub const DEFAULT_GRACE_MS: u64 = 1000;

/// What happens once a player fails to find a chair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationRule {
    /// The loser leaves and rounds continue until a single player remains.
    #[default]
    LastOneStanding,
    /// The first loser ends the whole game for everyone.
    SuddenDeath,
}

impl EliminationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationRule::LastOneStanding => "last_one_standing",
            EliminationRule::SuddenDeath => "sudden_death",
        }
    }
}

impl fmt::Display for EliminationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EliminationRule {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_one_standing" => Ok(EliminationRule::LastOneStanding),
            "sudden_death" => Ok(EliminationRule::SuddenDeath),
            other => Err(GameError::config(format!(
                "Unknown elimination rule '{other}' (expected last_one_standing or sudden_death)"
            ))),
        }
    }
}

/// Settings for a single game.
///
/// # Example JSON Config
///
/// ```json
/// {"players": 6, "music_min_ms": 200, "music_max_ms": 400, "grace_ms": 100}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players; the game starts with one chair fewer.
    pub players: usize,
    /// Lower bound of the random music duration.
    pub music_min_ms: u64,
    /// Upper bound (inclusive) of the random music duration.
    pub music_max_ms: u64,
    /// Upper bound on how long the coordinator waits for claims to settle.
    pub grace_ms: u64,
    pub elimination: EliminationRule,
    /// Seed for the music delay RNG. `None` draws from system entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            music_min_ms: DEFAULT_MUSIC_MIN_MS,
            music_max_ms: DEFAULT_MUSIC_MAX_MS,
            grace_ms: DEFAULT_GRACE_MS,
            elimination: EliminationRule::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Build a config from an optional JSON value.
    ///
    /// Missing fields take their defaults; a value that does not deserialize
    /// at all yields the default config.
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        config
            .and_then(|json| serde_json::from_value(json.clone()).ok())
            .unwrap_or_default()
    }

    /// Build a config from `CHAIRS_*` environment variables.
    ///
    /// Unset variables take their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self, GameError> {
        let defaults = Self::default();
        let config = Self {
            players: parse_var("CHAIRS_PLAYERS")?.unwrap_or(defaults.players),
            music_min_ms: parse_var("CHAIRS_MUSIC_MIN_MS")?.unwrap_or(defaults.music_min_ms),
            music_max_ms: parse_var("CHAIRS_MUSIC_MAX_MS")?.unwrap_or(defaults.music_max_ms),
            grace_ms: parse_var("CHAIRS_GRACE_MS")?.unwrap_or(defaults.grace_ms),
            elimination: parse_var("CHAIRS_ELIMINATION")?.unwrap_or(defaults.elimination),
            seed: parse_var("CHAIRS_SEED")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    pub fn with_music_ms(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.music_min_ms = min_ms;
        self.music_max_ms = max_ms;
        self
    }

    pub fn with_grace_ms(mut self, grace_ms: u64) -> Self {
        self.grace_ms = grace_ms;
        self
    }

    pub fn with_elimination(mut self, elimination: EliminationRule) -> Self {
        self.elimination = elimination;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.players < 2 {
            return Err(GameError::config(format!(
                "A game needs at least 2 players, got {}",
                self.players
            )));
        }
        if self.music_min_ms > self.music_max_ms {
            return Err(GameError::config(format!(
                "Music range is empty: min {}ms > max {}ms",
                self.music_min_ms, self.music_max_ms
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, GameError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GameError::config(format!("{name}='{raw}' is invalid: {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(GameError::config(format!("{name} is not readable: {e}"))),
    }
}
