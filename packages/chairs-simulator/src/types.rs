//! Shared types for the simulator.

use chairs::EliminationRule;
use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per game plus the CSV summary
    Jsonl,
    /// CSV summary only
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Rule {
    LastOneStanding,
    SuddenDeath,
}

impl From<Rule> for EliminationRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::LastOneStanding => EliminationRule::LastOneStanding,
            Rule::SuddenDeath => EliminationRule::SuddenDeath,
        }
    }
}
