//! # MENAGERIE
//!
//! Discrete-time predator/prey ecosystem on a rectangular grid.
//!
//! ## Features
//!
//! - **Grid world**: one occupant per cell, 8-neighbourhood movement
//! - **Food web**: dragons, humans, sheep, hedgehogs and white walkers
//!   feeding on each other and on wheat and poison berries
//! - **Environment**: day/night cycle, changing weather and a virus
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: Seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use menagerie::{Config, Simulator};
//! use menagerie::stats::is_viable;
//!
//! let mut sim = Simulator::new_with_seed(Config::default(), 42);
//!
//! // Run until only one kind is left, or 1000 steps
//! let steps = sim.run(1000, is_viable);
//!
//! println!("Ran {} steps, population {}", steps, sim.population());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use menagerie::Config;
//!
//! let mut config = Config::default();
//! config.field.depth = 40;
//! config.spawn.dragon = 0.02;
//! config.virus.exposure_probability = 0.0;
//! ```

pub mod config;
pub mod creature;
pub mod entity;
pub mod field;
pub mod habitat;
pub mod location;
pub mod plant;
pub mod simulator;
pub mod species;
pub mod stats;
pub mod virus;
pub mod weather;

// Re-export main types
pub use config::Config;
pub use entity::{Entity, EntityId};
pub use field::Field;
pub use habitat::Habitat;
pub use location::Location;
pub use simulator::{Simulator, Snapshot};
pub use species::Kind;
pub use weather::Weather;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on a field of the given size
pub fn benchmark(steps: u64, depth: usize, width: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.field.depth = depth;
    config.field.width = width;

    let mut sim = Simulator::new_with_seed(config, 0);
    let initial_population = sim.population();

    let start = Instant::now();
    let executed = sim.run(steps, |_| true);
    let elapsed = start.elapsed();

    BenchmarkResult {
        steps: executed,
        cells: depth * width,
        initial_population,
        final_population: sim.population(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: executed as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub cells: usize,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Cells: {}", self.cells)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        Ok(())
    }
}
