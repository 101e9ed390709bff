//! MENAGERIE - CLI Entry Point
//!
//! Grid ecosystem simulator.

use clap::{Parser, Subcommand};
use menagerie::stats::{is_viable, FieldStats, StatsHistory};
use menagerie::{benchmark, Config, Simulator};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "menagerie")]
#[command(version)]
#[command(about = "Grid ecosystem simulator with predators, plants, weather and disease")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Maximum number of steps to simulate
        #[arg(short, long, default_value = "4000")]
        steps: u64,

        /// Output directory for stats
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of steps
        #[arg(short, long, default_value = "500")]
        steps: u64,

        /// Field depth (rows)
        #[arg(short, long, default_value = "80")]
        depth: usize,

        /// Field width (columns)
        #[arg(short, long, default_value = "120")]
        width: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            steps,
            output,
            seed,
            quiet,
        } => run_simulation(config, steps, output, seed, quiet),

        Commands::Benchmark {
            steps,
            depth,
            width,
        } => {
            init_logging("info");
            run_benchmark(steps, depth, width)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

fn run_simulation(
    config_path: PathBuf,
    steps: u64,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let (config, source) = if config_path.exists() {
        (Config::from_file(&config_path)?, format!("{:?}", config_path))
    } else {
        (Config::default(), "defaults".to_string())
    };

    // The config decides the default verbosity; RUST_LOG still wins
    init_logging(&config.logging.log_level);
    log::info!("Configuration: {}", source);

    std::fs::create_dir_all(&output)?;

    let mut sim = match seed {
        Some(s) => Simulator::new_with_seed(config, s),
        None => Simulator::new(config),
    };

    println!("Starting simulation");
    println!("  Seed: {}", sim.seed());
    println!(
        "  Field: {}x{}",
        sim.habitat.field().depth(),
        sim.habitat.field().width()
    );
    println!("  Initial population: {}", sim.population());
    println!("  Max steps: {}", steps);
    println!();

    let mut history = StatsHistory::new(sim.config.logging.stats_interval);
    history.record(FieldStats::from_snapshot(&sim.snapshot()));
    if !quiet {
        println!("{}", FieldStats::from_snapshot(&sim.snapshot()).summary());
    }

    let start = Instant::now();
    let executed = sim.run_with_callback(steps, is_viable, |snapshot| {
        if history.is_due(snapshot.step) {
            let stats = FieldStats::from_snapshot(snapshot);
            if !quiet {
                println!("{}", stats.summary());
            }
            history.record(stats);
        }
    });
    let elapsed = start.elapsed();

    let final_stats = FieldStats::from_snapshot(&sim.snapshot());
    if !final_stats.is_viable() {
        println!("\nField no longer viable at step {}", sim.step);
    }
    if history.latest().map_or(true, |s| s.step != final_stats.step) {
        history.record(final_stats.clone());
    }

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Steps: {}", executed);
    println!(
        "Speed: {:.1} steps/s",
        executed as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("Final population: {}", final_stats.population);
    for (kind, count) in &final_stats.counts {
        println!("  {:<12} {}", kind.name(), count);
    }

    // Save stats history
    let stats_path = output.join("stats_history.json");
    history.save(&stats_path.to_string_lossy())?;
    println!("Stats history: {:?}", stats_path);

    Ok(())
}

fn run_benchmark(steps: u64, depth: usize, width: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MENAGERIE Benchmark ===");
    println!("Steps: {}", steps);
    println!("Field: {}x{}", depth, width);
    println!();

    let result = benchmark(steps, depth, width);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
