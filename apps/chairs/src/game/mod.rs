//! Coordination core: chair pool, round signal, shared state, players and coordinator.

pub mod chair_pool;
pub mod coordinator;
pub mod player;
pub mod round_signal;
pub mod state;
pub mod table;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_chair_pool;
#[cfg(test)]
mod tests_props_chair_pool;
#[cfg(test)]
mod tests_round_signal;
#[cfg(test)]
mod tests_state;

// Re-exports for ergonomics
pub use chair_pool::ChairPool;
pub use coordinator::{Coordinator, CoordinatorPhase, GameReport};
pub use player::{Fate, PlayerAgent, PlayerId, PlayerOutcome, PlayerPhase};
pub use round_signal::{RoundSignal, SignalState, Wake};
pub use state::{Elimination, GameState, RoundPlan, RoundRecord};
pub use table::{GameSummary, Table};
