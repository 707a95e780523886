//! Level Tuner CLI - Generate levels from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use level_tuner::{
    compute::{LevelRng, generate_level},
    schema::{GeneratorConfig, GeneratorKind, Tile, TileKind, TuningResult},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [count]", args[0]);
        eprintln!();
        eprintln!("Generate platformer levels from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to generator configuration file");
        eprintln!("  count        Number of levels to generate (default: 1)");
        eprintln!();
        eprintln!("A tuning result saved next to the config as <config>.tuned.json");
        eprintln!("overrides the windowed generator's parameters.");
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: GeneratorConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    // Tuned parameters, when present
    let tuned_path = config_path.with_extension("tuned.json");
    if tuned_path.exists() {
        let tuned = TuningResult::load(&tuned_path).unwrap_or_else(|e| {
            eprintln!("Error reading tuning result: {}", e);
            std::process::exit(1);
        });
        if let GeneratorKind::Windowed { parameters } = &mut config.generator {
            *parameters = tuned.parameters;
        }
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    let name = match &config.generator {
        GeneratorKind::RulePipeline { .. } => "rule pipeline",
        GeneratorKind::Windowed { .. } => "windowed",
    };
    eprintln!("Level Tuner");
    eprintln!("===========");
    eprintln!(
        "Grid: {}x{} ({} generator)",
        config.level.width, config.level.height, name
    );
    if let GeneratorKind::Windowed { parameters } = &config.generator {
        eprintln!("Parameters: {:?}", parameters.indices());
    }
    eprintln!();

    let mut rng = LevelRng::from_seed_option(config.random_seed);
    let start = Instant::now();

    for i in 0..count {
        let grid = generate_level(&config, &mut rng).unwrap_or_else(|e| {
            eprintln!("Error generating level: {}", e);
            std::process::exit(1);
        });

        if count > 1 {
            println!("; level {}", i + 1);
        }
        println!("{}", grid);
        let count_of = |kind| -> usize { Tile::subset(kind).iter().map(|&t| grid.count(t)).sum() };
        eprintln!(
            "Level {}: {} enemies, {} coins, {} pipes",
            i + 1,
            count_of(TileKind::Enemy),
            grid.count(Tile::Coin),
            count_of(TileKind::Pipe),
        );
    }

    eprintln!();
    eprintln!("Time: {:.3}s", start.elapsed().as_secs_f32());
}

fn print_example_config() {
    let config = GeneratorConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
