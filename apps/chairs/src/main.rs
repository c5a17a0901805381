use chairs::{GameConfig, Table};
use tracing::info;

mod telemetry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    // Settings come from CHAIRS_* variables; anything unset keeps its default.
    let config = GameConfig::from_env()?;
    let summary = Table::new(config)?.run()?;

    info!(
        winner = ?summary.winner(),
        rounds = summary.rounds(),
        duration_ms = summary.duration_ms,
        "Finished"
    );
    match summary.winner() {
        Some(winner) => println!("🏆 Player {winner} wins after {} rounds", summary.rounds()),
        None => println!(
            "🛑 Game stopped after {} rounds with {} players standing",
            summary.rounds(),
            summary.standing()
        ),
    }
    Ok(())
}
