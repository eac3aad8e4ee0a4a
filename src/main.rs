//! Match-play CLI.
//!
//! Plays Risk games between baseline agents and prints the win tally.
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --games N     Number of games to play (default: 10)
//!   --threads N   Number of parallel threads (default: 4)
//!   --seed N      Random seed, 0 for entropy (default: 0)
//!   --max-steps N Per-game action cap (default: 1000000)
//!   --mass        Replace the second player with the stacking heuristic

use std::env;
use std::process;

use hegemony::driver::{play_games, AgentKind, MatchConfig};

fn print_usage() {
    eprintln!("Usage: hegemony [--games N] [--threads N] [--seed N] [--max-steps N] [--mass]");
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = MatchConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.games = args[i].parse().expect("invalid --games value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--max-steps" => {
                i += 1;
                config.max_steps = args[i].parse().expect("invalid --max-steps value");
            }
            "--mass" => {
                config.players[1].1 = AgentKind::Mass;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let result = match play_games(&config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("match failed: {}", err);
            process::exit(1);
        }
    };

    for (name, wins) in &result.wins {
        println!("{}: {}", name, wins);
    }
    if result.draws > 0 {
        println!("draws: {}", result.draws);
    }
}
