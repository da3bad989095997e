//! Decision advisor binary.
//!
//! Usage:
//!   cargo run --release --bin advise -- <SITUATION.json> [OPTIONS]
//!
//! Options:
//!   --trials <N>         Monte Carlo trials (default: 10000)
//!   --raise-trials <N>   Trials per raise re-estimate (default: same as --trials)
//!   --seed <N>           Random seed (optional)
//!   --threads <N>        Number of threads (default: auto)
//!   --target-se <X>      Stop once the standard error reaches X
//!   --json               Print the decision as JSON
//!
//! Set RUST_LOG=debug for simulation details.

use std::env;
use std::fs;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use holdem_advisor::{Advisor, AdvisorConfig, SimulationConfig, Situation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut situation_file: Option<String> = None;
    let mut simulation = SimulationConfig::default();
    let mut raise_trials: Option<u64> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--trials" | "-n" => {
                i += 1;
                if let Some(n) = args.get(i).and_then(|a| a.parse().ok()) {
                    simulation.n_trials = n;
                }
            }
            "--raise-trials" => {
                i += 1;
                raise_trials = args.get(i).and_then(|a| a.parse().ok());
            }
            "--seed" | "-s" => {
                i += 1;
                simulation.seed = args.get(i).and_then(|a| a.parse().ok());
            }
            "--threads" | "-t" => {
                i += 1;
                simulation.num_threads = args.get(i).and_then(|a| a.parse().ok());
            }
            "--target-se" => {
                i += 1;
                simulation.target_standard_error = args.get(i).and_then(|a| a.parse().ok());
            }
            "--json" => json = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other if !other.starts_with('-') => situation_file = Some(other.to_string()),
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let Some(path) = situation_file else {
        print_help();
        std::process::exit(2);
    };

    let situation: Situation = serde_json::from_str(&fs::read_to_string(&path)?)?;
    info!("loaded situation from {}", path);

    let mut config = AdvisorConfig::default().with_simulation(simulation.clone());
    if let Some(trials) = raise_trials {
        config = config.with_raise_trials(trials);
    }
    let advisor = Advisor::new(config);

    let bar = ProgressBar::new(simulation.n_trials);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Simulating [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let decision = advisor.decide_with_progress(&situation, |tally| {
        bar.set_position(tally.trials());
        bar.set_message(format!("equity {:.3}", tally.equity()));
    })?;
    bar.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    println!("=== Hold'em Advisor ===\n");
    println!("Hero: {}  Board: {}  Street: {}", situation.hero, situation.board, situation.street);
    print!("Pot: {:.2}  To call: {:.2}", situation.spot.pot, situation.spot.bet_to_call);
    if let Some(spr) = situation.spot.spr() {
        print!("  SPR: {:.2}", spr);
    }
    println!("\n");
    println!("{}", decision);
    println!("\nDone in {:.2?}", start.elapsed());

    Ok(())
}

fn print_help() {
    eprintln!("Usage: advise <SITUATION.json> [--trials N] [--raise-trials N] [--seed N] [--threads N] [--target-se X] [--json]");
}
