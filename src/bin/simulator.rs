//! PetQuest Headless Battle Simulator
//!
//! Plays scripted battles through the real battle engine and prints balance
//! metrics per difficulty tier.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --battles N     Battles per tier (default: 1000)
//!   --seed N        RNG seed (default: random)
//!   --tier N        Only simulate tier N (1-4, repeatable)
//!   --biome NAME    Fix the biome (forest, ice, desert, volcano, ocean)
//!   --config FILE   JSON tuning overrides
//!   --campaign      Carry levels between battles of a tier
//!   --json          Print the report as JSON
//!   --verbose       Per-battle output and debug tracing

use petquest::core::config::BattleConfig;
use petquest::encounter::{Biome, DifficultyTier};
use petquest::simulator::{run_simulation, SimConfig};
use tracing_subscriber::EnvFilter;

// ── CLI Configuration ────────────────────────────────────────────────

struct CliConfig {
    sim: SimConfig,
    config_path: Option<String>,
    json: bool,
    verbose: bool,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    print_usage();
    std::process::exit(1);
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => fail(&format!("{flag} requires a value")),
    }
}

fn parse_biome(name: &str) -> Option<Biome> {
    Biome::ALL
        .iter()
        .copied()
        .find(|b| b.name().eq_ignore_ascii_case(name))
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = CliConfig {
        sim: SimConfig::default(),
        config_path: None,
        json: false,
        verbose: false,
    };
    let mut tiers = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--battles" => {
                i += 1;
                config.sim.battles_per_tier = value(&args, i, "--battles")
                    .parse()
                    .unwrap_or_else(|_| fail("--battles requires a number"));
            }
            "--seed" => {
                i += 1;
                let seed = value(&args, i, "--seed")
                    .parse()
                    .unwrap_or_else(|_| fail("--seed requires a number"));
                config.sim.seed = Some(seed);
            }
            "--tier" => {
                i += 1;
                let tier = value(&args, i, "--tier")
                    .parse::<u8>()
                    .ok()
                    .and_then(|n| DifficultyTier::new(n).ok())
                    .unwrap_or_else(|| fail("--tier requires a number from 1 to 4"));
                tiers.push(tier);
            }
            "--biome" => {
                i += 1;
                let name = value(&args, i, "--biome");
                config.sim.biome =
                    Some(parse_biome(name).unwrap_or_else(|| fail(&format!("Unknown biome: {name}"))));
            }
            "--config" => {
                i += 1;
                config.config_path = Some(value(&args, i, "--config").to_string());
            }
            "--campaign" => config.sim.carry_progress = true,
            "--json" => config.json = true,
            "--verbose" => config.verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => fail(&format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    if !tiers.is_empty() {
        config.sim.tiers = tiers;
    }
    config.sim.verbosity = if config.verbose { 2 } else { 1 };
    config
}

fn print_usage() {
    eprintln!(
        "PetQuest Battle Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --battles N     Battles per tier (default: 1000)\n\
         \x20 --seed N        RNG seed (default: random)\n\
         \x20 --tier N        Only simulate tier N (1-4, repeatable)\n\
         \x20 --biome NAME    Fix the biome (forest, ice, desert, volcano, ocean)\n\
         \x20 --config FILE   JSON tuning overrides\n\
         \x20 --campaign      Carry levels between battles of a tier\n\
         \x20 --json          Print the report as JSON\n\
         \x20 --verbose       Per-battle output and debug tracing\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Main ─────────────────────────────────────────────────────────────

fn main() {
    let mut cli = parse_args();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &cli.config_path {
        match BattleConfig::from_path(path) {
            Ok(battle) => cli.sim.battle = battle,
            Err(err) => {
                eprintln!("Failed to load {path}: {err}");
                std::process::exit(1);
            }
        }
    }

    let tier_names: Vec<&str> = cli.sim.tiers.iter().map(|t| t.name()).collect();
    eprintln!(
        "PetQuest Simulator: {} battle(s) per tier [{}], seed={}, campaign={}",
        cli.sim.battles_per_tier,
        tier_names.join(", "),
        cli.sim
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string()),
        cli.sim.carry_progress,
    );

    let report = match run_simulation(&cli.sim) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Invalid tuning: {err}");
            std::process::exit(1);
        }
    };
    if cli.json {
        println!("{}", report.to_json());
    } else {
        print!("{}", report.to_text());
    }
}
