//! Configuration system for the simulation.
//!
//! Supports YAML configuration files with sensible defaults. The defaults are
//! the reference ecosystem.

use crate::field::{DEFAULT_DEPTH, DEFAULT_WIDTH};
use crate::species::{Kind, SpeciesTable};
use crate::virus::VirusConfig;
use crate::weather::WeatherConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub virus: VirusConfig,
    #[serde(default)]
    pub species: SpeciesTable,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub depth: usize,
    pub width: usize,
}

/// Time of day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Hour the simulation starts at
    pub start_hour: u32,
    /// Creatures that are not nocturnal sleep before this hour
    pub dawn_hour: u32,
}

/// Probability that a cell is seeded with each kind.
///
/// Kinds are tried in a fixed priority order (see [`SpawnConfig::priority`]);
/// the first successful draw wins the cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub poison_berry: f64,
    pub white_walker: f64,
    pub dragon: f64,
    pub sheep: f64,
    pub wheat: f64,
    pub human: f64,
    pub hedgehog: f64,
}

/// Logging and stats configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Steps between stats snapshots
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            width: DEFAULT_WIDTH,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            dawn_hour: 8,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            poison_berry: 0.08,
            white_walker: 0.02,
            dragon: 0.005,
            sheep: 0.13,
            wheat: 0.3,
            human: 0.2,
            hedgehog: 0.03,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 50,
            log_level: "info".to_string(),
        }
    }
}

impl SpawnConfig {
    /// All probabilities zero
    pub fn empty() -> Self {
        Self {
            poison_berry: 0.0,
            white_walker: 0.0,
            dragon: 0.0,
            sheep: 0.0,
            wheat: 0.0,
            human: 0.0,
            hedgehog: 0.0,
        }
    }

    /// (kind, probability) in the order cells are seeded
    pub fn priority(&self) -> [(Kind, f64); 7] {
        [
            (Kind::PoisonBerry, self.poison_berry),
            (Kind::WhiteWalker, self.white_walker),
            (Kind::Dragon, self.dragon),
            (Kind::Sheep, self.sheep),
            (Kind::Wheat, self.wheat),
            (Kind::Human, self.human),
            (Kind::Hedgehog, self.hedgehog),
        ]
    }

    pub fn get_mut(&mut self, kind: Kind) -> &mut f64 {
        match kind {
            Kind::PoisonBerry => &mut self.poison_berry,
            Kind::WhiteWalker => &mut self.white_walker,
            Kind::Dragon => &mut self.dragon,
            Kind::Sheep => &mut self.sheep,
            Kind::Wheat => &mut self.wheat,
            Kind::Human => &mut self.human,
            Kind::Hedgehog => &mut self.hedgehog,
        }
    }
}

/// Map any value onto a usable probability: NaN counts as never.
pub fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

fn clamp_probability(name: &str, value: &mut f64, fixes: &mut Vec<String>) {
    if value.is_nan() {
        fixes.push(format!("{} is NaN, set to 0", name));
        *value = 0.0;
    } else if !(0.0..=1.0).contains(&*value) {
        let clamped = value.clamp(0.0, 1.0);
        fixes.push(format!("{} {} clamped to {}", name, value, clamped));
        *value = clamped;
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Values are taken as written; out-of-range ones are clamped (and
    /// reported) when a simulator is built from the config.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Clamp malformed values in place; returns one message per correction.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        if self.field.depth == 0 || self.field.width == 0 {
            fixes.push(format!(
                "field {}x{} replaced by {}x{}",
                self.field.depth, self.field.width, DEFAULT_DEPTH, DEFAULT_WIDTH
            ));
            self.field = FieldConfig::default();
        }

        if self.clock.start_hour > 23 {
            fixes.push(format!("start_hour {} wrapped", self.clock.start_hour));
            self.clock.start_hour %= 24;
        }
        if self.clock.dawn_hour > 23 {
            fixes.push(format!("dawn_hour {} clamped to 23", self.clock.dawn_hour));
            self.clock.dawn_hour = 23;
        }

        for (kind, _) in self.spawn.priority() {
            let name = format!("spawn.{}", kind);
            clamp_probability(&name, self.spawn.get_mut(kind), &mut fixes);
        }

        if self.virus.onset_hour > 23 {
            fixes.push(format!("virus.onset_hour {} clamped to 23", self.virus.onset_hour));
            self.virus.onset_hour = 23;
        }

        clamp_probability(
            "virus.exposure_probability",
            &mut self.virus.exposure_probability,
            &mut fixes,
        );
        clamp_probability(
            "virus.persistence_probability",
            &mut self.virus.persistence_probability,
            &mut fixes,
        );

        let weights = [
            &mut self.weather.rainy_weight,
            &mut self.weather.windy_weight,
            &mut self.weather.clear_weight,
        ];
        for weight in weights {
            if !weight.is_finite() || *weight < 0.0 {
                fixes.push(format!("weather weight {} set to 0", weight));
                *weight = 0.0;
            }
        }
        if self.weather.rainy_weight + self.weather.windy_weight + self.weather.clear_weight <= 0.0 {
            fixes.push("all weather weights zero, reset to uniform".to_string());
            self.weather.rainy_weight = 1.0;
            self.weather.windy_weight = 1.0;
            self.weather.clear_weight = 1.0;
        }

        if self.logging.stats_interval == 0 {
            fixes.push("stats_interval raised to 1".to_string());
            self.logging.stats_interval = 1;
        }

        fixes.extend(self.species.sanitize());
        fixes
    }
}
