//! bulwark-run: headless siege runner.
//!
//! Usage:
//!   bulwark-run --ticks 3600 --seed 7
//!   bulwark-run --config siege.json --snapshot final.json

use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bulwark_core::constants::TICK_RATE;
use bulwark_sim::{config, SimConfig, SimulationEngine};

const DEFAULT_TICKS: u64 = 3600;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args[1..]
        .iter()
        .any(|a| a == "help" || a == "--help" || a == "-h")
    {
        print_usage();
        return;
    }

    let mut config = match parse_path(&args, "--config") {
        Some(path) => match config::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_number(&args, "--seed") {
        config.seed = seed;
    }
    let ticks = parse_number(&args, "--ticks").unwrap_or(DEFAULT_TICKS);

    let mut engine = match SimulationEngine::new(config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    info!(seed = engine.config().seed, ticks, "siege started");
    for _ in 0..ticks {
        if let Err(e) = engine.tick() {
            error!(tick = engine.time().tick, "simulation failed: {e}");
            process::exit(1);
        }
        if engine.is_over() {
            break;
        }
    }

    let snapshot = engine.snapshot();
    let stats = snapshot.stats;
    eprintln!(
        "Finished after {} ticks ({:.1}s simulated)\n\
         \n\
         Core health:       {:.1} / {:.1}\n\
         Enemies spawned:   {}\n\
         Enemies killed:    {}\n\
         Enemies remaining: {}\n\
         Melee hits:        {}\n\
         Shots fired:       {}\n\
         Shots on core:     {}",
        snapshot.time.tick,
        snapshot.time.tick as f64 / TICK_RATE as f64,
        snapshot.core.health,
        snapshot.core.max_health,
        stats.enemies_spawned,
        stats.kills,
        snapshot.enemies.len(),
        stats.melee_hits,
        stats.projectiles_fired,
        stats.core_hits,
    );

    if let Some(output) = parse_path(&args, "--snapshot") {
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&output, json) {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        }
        eprintln!("Snapshot written to {}", output.display());
    }
}

fn print_usage() {
    eprintln!(
        "bulwark-run: run a headless siege and print a summary\n\
         \n\
         Options:\n\
         \n\
           --config <path>    JSON simulation config (default: built-in waves)\n\
           --ticks <N>        Maximum ticks to run (default: {DEFAULT_TICKS})\n\
           --seed <N>         Override the config's RNG seed\n\
           --snapshot <path>  Write the final snapshot as JSON\n\
         \n\
         Log verbosity follows RUST_LOG (default: info).\n"
    );
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn parse_number(args: &[String], flag: &str) -> Option<u64> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            match args[i + 1].parse::<u64>() {
                Ok(n) => return Some(n),
                Err(_) => {
                    eprintln!("Error: {flag} expects a number, got {}", args[i + 1]);
                    process::exit(1);
                }
            }
        }
    }
    None
}
