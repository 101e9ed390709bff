//! Statistics tracking for the simulation.

use crate::habitat::Habitat;
use crate::simulator::Snapshot;
use crate::species::Kind;
use crate::weather::Weather;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A field stays viable while at least this many kinds are alive
pub const VIABLE_KIND_COUNT: usize = 2;

/// Live count per kind, in kind order
pub fn census(habitat: &Habitat) -> BTreeMap<Kind, usize> {
    let mut counts = BTreeMap::new();
    for entity in habitat.living() {
        *counts.entry(entity.kind).or_insert(0) += 1;
    }
    counts
}

/// True while the field still holds at least two distinct kinds
pub fn is_viable(habitat: &Habitat) -> bool {
    census(habitat).len() >= VIABLE_KIND_COUNT
}

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldStats {
    /// Steps executed so far
    pub step: u64,
    /// Hour of day
    pub hour: u32,
    pub weather: Option<Weather>,
    /// Total live population
    pub population: usize,
    /// Live count per kind (kinds with no members are omitted)
    pub counts: BTreeMap<Kind, usize>,
    /// Creatures currently carrying the virus
    pub infected: usize,
    /// Births this step
    pub births: usize,
    /// Deaths this step
    pub deaths: usize,
}

impl FieldStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect stats from a step snapshot
    pub fn from_snapshot(snapshot: &Snapshot<'_>) -> Self {
        let counts = census(snapshot.habitat);
        Self {
            step: snapshot.step,
            hour: snapshot.hour,
            weather: Some(snapshot.weather),
            population: counts.values().sum(),
            counts,
            infected: snapshot.infected,
            births: snapshot.births,
            deaths: snapshot.deaths,
        }
    }

    /// Live count of one kind
    pub fn count(&self, kind: Kind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_viable(&self) -> bool {
        self.counts.len() >= VIABLE_KIND_COUNT
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        let weather = self.weather.map_or("-", |w| w.name());
        let kinds: Vec<String> = self
            .counts
            .iter()
            .map(|(kind, count)| format!("{}:{}", kind, count))
            .collect();
        format!(
            "Step:{:6} | {:02}:00 {:<5} | Pop:{:5} | Sick:{:4} | {}",
            self.step,
            self.hour,
            weather,
            self.population,
            self.infected,
            kinds.join(" ")
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<FieldStats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval: interval.max(1),
        }
    }

    /// Whether a step falls on the recording interval
    pub fn is_due(&self, step: u64) -> bool {
        step % self.interval.max(1) == 0
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: FieldStats) {
        self.snapshots.push(stats);
    }

    pub fn latest(&self) -> Option<&FieldStats> {
        self.snapshots.last()
    }

    /// Get total population over time
    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.step, s.population))
            .collect()
    }

    /// Get one kind's population over time
    pub fn kind_series(&self, kind: Kind) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.step, s.count(kind)))
            .collect()
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Origin;
    use crate::location::Location;
    use crate::species::SpeciesTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_viability_needs_two_kinds() {
        let species = SpeciesTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut habitat = Habitat::new(4, 4);

        assert!(!is_viable(&habitat));

        habitat.spawn(Kind::Sheep, Location::new(0, 0), Origin::Seeded, &species, &mut rng).unwrap();
        habitat.spawn(Kind::Sheep, Location::new(0, 1), Origin::Seeded, &species, &mut rng).unwrap();
        assert!(!is_viable(&habitat));

        habitat.spawn(Kind::Wheat, Location::new(3, 3), Origin::Seeded, &species, &mut rng).unwrap();
        assert!(is_viable(&habitat));

        let counts = census(&habitat);
        assert_eq!(counts.get(&Kind::Sheep), Some(&2));
        assert_eq!(counts.get(&Kind::Wheat), Some(&1));
    }

    #[test]
    fn test_dead_do_not_count() {
        let species = SpeciesTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut habitat = Habitat::new(4, 4);

        habitat.spawn(Kind::Sheep, Location::new(0, 0), Origin::Seeded, &species, &mut rng).unwrap();
        let wheat = habitat.spawn(Kind::Wheat, Location::new(1, 1), Origin::Seeded, &species, &mut rng).unwrap();
        habitat.kill(wheat, crate::entity::DeathCause::Predation);

        assert!(!is_viable(&habitat));
    }

    #[test]
    fn test_summary_lists_kinds() {
        let mut stats = FieldStats::new();
        stats.step = 12;
        stats.hour = 20;
        stats.weather = Some(Weather::Rainy);
        stats.counts.insert(Kind::Dragon, 3);
        stats.counts.insert(Kind::Wheat, 40);
        stats.population = 43;

        let line = stats.summary();
        assert!(line.contains("Dragon:3"));
        assert!(line.contains("Wheat:40"));
        assert!(line.contains("20:00"));
        assert!(stats.is_viable());
        assert_eq!(stats.count(Kind::Human), 0);
    }

    #[test]
    fn test_stats_history() {
        let mut history = StatsHistory::new(10);

        for i in 0..5 {
            let mut stats = FieldStats::new();
            stats.step = i * 10;
            stats.population = (i + 1) as usize * 100;
            stats.counts.insert(Kind::Sheep, i as usize);
            history.record(stats);
        }

        let series = history.population_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (0, 100));
        assert_eq!(series[4], (40, 500));
        assert_eq!(history.kind_series(Kind::Sheep)[3], (30, 3));
        assert!(history.is_due(20));
        assert!(!history.is_due(21));
    }

    #[test]
    fn test_history_json_roundtrip() {
        let mut history = StatsHistory::new(5);
        let mut stats = FieldStats::new();
        stats.counts.insert(Kind::PoisonBerry, 7);
        history.record(stats);

        let json = serde_json::to_string(&history).unwrap();
        let loaded: StatsHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.interval, 5);
        assert_eq!(loaded.latest().unwrap().count(Kind::PoisonBerry), 7);
    }
}
