//! Runs a batch of independent games on the same table settings.

use std::sync::Arc;

use chairs::{EventLog, FanOut, GameConfig, GameError, GameSummary, Narrator, Table, TracingNarrator};

/// One finished game with what was narrated along the way.
pub struct GameResult {
    pub seed: u64,
    pub summary: GameSummary,
    pub events: usize,
}

pub struct Simulator {
    base: GameConfig,
    seed: Option<u64>,
}

impl Simulator {
    pub fn new(base: GameConfig, seed: Option<u64>) -> Self {
        Self { base, seed }
    }

    /// Seed for the music timing of game `game_num`.
    ///
    /// With a base seed the sequence is reproducible; without one every game
    /// draws a fresh random seed. Thread scheduling still decides who sits
    /// where, so only the timing is reproducible.
    pub fn game_seed(&self, game_num: u32) -> u64 {
        match self.seed {
            Some(base) => derive_game_seed(base, game_num),
            None => rand::random(),
        }
    }

    pub fn simulate_game(&self, game_num: u32) -> Result<GameResult, GameError> {
        let seed = self.game_seed(game_num);
        let config = self.base.clone().with_seed(Some(seed));
        let log = Arc::new(EventLog::new());
        let narrator = FanOut::new()
            .with(Arc::new(TracingNarrator))
            .with(log.clone() as Arc<dyn Narrator>);

        let summary = Table::new(config)?.with_narrator(Arc::new(narrator)).run()?;
        Ok(GameResult {
            seed,
            summary,
            events: log.len(),
        })
    }
}

/// Spread game numbers across the seed space so neighbouring games do not
/// share low bits.
pub fn derive_game_seed(base: u64, game_num: u32) -> u64 {
    let mut z = base.wrapping_add((game_num as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
