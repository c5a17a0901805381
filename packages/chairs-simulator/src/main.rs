//! Chairs simulator CLI - plays many games back to back and records metrics.
//!
//! Each game runs on its own set of threads exactly as the `chairs` binary
//! would; the simulator only varies the seed and collects the results.

mod metrics;
mod output;
mod simulator;
mod types;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chairs::{GameConfig, PlayerId};
use clap::Parser;
use metrics::{build_game_metrics, GameMetrics};
use output::OutputWriter;
use simulator::Simulator;
use tracing::{info, warn};
use types::{OutputFormat, Rule};

#[derive(Parser)]
#[command(name = "chairs-simulator")]
#[command(about = "Play many games of musical chairs and record the results")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Players per game
    #[arg(short, long, default_value = "4")]
    players: usize,

    /// Shortest time the music plays, in milliseconds
    #[arg(long, default_value = "10")]
    music_min_ms: u64,

    /// Longest time the music plays, in milliseconds
    #[arg(long, default_value = "50")]
    music_max_ms: u64,

    /// How long players get to report once the music stops, in milliseconds
    #[arg(long, default_value = "1000")]
    grace_ms: u64,

    /// What happens after a player is eliminated
    #[arg(long, value_enum, default_value = "last-one-standing")]
    rule: Rule,

    /// Base seed; per-game music seeds are derived from it
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, value_enum, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the JSONL output with gzip
    #[arg(long)]
    compress: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only warnings and errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = GameConfig::default()
        .with_players(args.players)
        .with_music_ms(args.music_min_ms, args.music_max_ms)
        .with_grace_ms(args.grace_ms)
        .with_elimination(args.rule.into());
    config.validate()?;

    if args.show_output {
        info!(games = args.games, players = args.players, rule = %config.elimination, "Starting simulator");
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;
    let simulator = Simulator::new(config, args.seed);

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        match simulator.simulate_game(game_num) {
            Ok(result) => {
                let metrics = build_game_metrics(game_num, args.games, &result);
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(
                        game = game_num,
                        winner = ?metrics.result.winner,
                        rounds = metrics.result.rounds,
                        "Game completed"
                    );
                }
                results.push(metrics);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let (jsonl_path, csv_path) = (jsonl_path.cloned(), csv_path.clone());
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        info!("Summary CSV written to: {}", csv_path.display());

        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn print_summary(results: &[GameMetrics], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);

    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let games = results.len() as f64;
    let avg_rounds = results.iter().map(|m| m.result.rounds as f64).sum::<f64>() / games;
    let avg_duration = results.iter().map(|m| m.result.duration_ms).sum::<f64>() / games;
    let unreported: usize = results
        .iter()
        .flat_map(|m| m.rounds.iter())
        .map(|r| r.unreported)
        .sum();
    println!("Average rounds: {:.2}", avg_rounds);
    println!("Average game duration: {:.1}ms", avg_duration);
    if unreported > 0 {
        println!("Reports missed by the grace window: {}", unreported);
    }

    let mut wins: BTreeMap<PlayerId, u32> = BTreeMap::new();
    let mut no_winner = 0;
    for metrics in results {
        match metrics.result.winner {
            Some(player) => *wins.entry(player).or_default() += 1,
            None => no_winner += 1,
        }
    }

    println!("\n=== Wins by Player ===");
    for (player, count) in &wins {
        let win_rate = (*count as f64 / games) * 100.0;
        println!("Player {}: wins={} ({:.1}%)", player, count, win_rate);
    }
    if no_winner > 0 {
        println!("No winner: {}", no_winner);
    }
}
