//! Simulation engine - main step loop.

use crate::config::{probability, Config, SpawnConfig};
use crate::creature;
use crate::entity::{EntityId, Origin};
use crate::habitat::Habitat;
use crate::location::Location;
use crate::plant;
use crate::species::{Kind, SpeciesTable};
use crate::virus::Virus;
use crate::weather::{Weather, WeatherSystem};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// What collaborators (views, stats) get to see after each step
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub step: u64,
    pub hour: u32,
    pub weather: Weather,
    pub habitat: &'a Habitat,
    pub infected: usize,
    pub births: usize,
    pub deaths: usize,
}

/// The simulation: habitat, roster, weather, virus and clock
pub struct Simulator {
    // World state
    pub habitat: Habitat,
    pub species: SpeciesTable,
    pub virus: Virus,
    pub weather: WeatherSystem,

    /// Entities that act each step, in acting order
    roster: Vec<EntityId>,

    // Clock
    pub step: u64,
    pub hour: u32,

    // Configuration
    pub config: Config,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,

    // Per-step tracking
    births_this_step: usize,
    deaths_this_step: usize,
}

impl Simulator {
    /// Create a populated simulator with a random seed
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a populated simulator with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut sim = Self::empty_with_seed(config, seed);
        let spawn = sim.config.spawn.clone();
        sim.populate(&spawn);
        sim
    }

    /// Create a simulator with an empty field
    pub fn empty_with_seed(mut config: Config, seed: u64) -> Self {
        for fix in config.sanitize() {
            log::warn!("Config: {}", fix);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let habitat = Habitat::new(config.field.depth, config.field.width);
        let weather = WeatherSystem::new(&config.weather, &mut rng);
        let virus = Virus::new(&config.virus);

        Self {
            habitat,
            species: config.species.clone(),
            virus,
            weather,
            roster: Vec::new(),
            step: 0,
            hour: config.clock.start_hour,
            config,
            rng,
            seed,
            births_this_step: 0,
            deaths_this_step: 0,
        }
    }

    /// Clear the field and seed every cell from the spawn probabilities.
    ///
    /// Each cell tries the kinds in priority order with an independent draw
    /// and takes the first that succeeds, or stays empty.
    pub fn populate(&mut self, spawn: &SpawnConfig) {
        self.habitat.clear();
        self.roster.clear();
        self.virus.clear();

        let priority = spawn.priority();
        for row in 0..self.habitat.field().depth() {
            for col in 0..self.habitat.field().width() {
                let chosen = priority
                    .iter()
                    .find(|(_, p)| self.rng.gen_bool(probability(*p)))
                    .map(|(kind, _)| *kind);

                if let Some(kind) = chosen {
                    let spawned = self.habitat.spawn(
                        kind,
                        Location::new(row, col),
                        Origin::Seeded,
                        &self.species,
                        &mut self.rng,
                    );
                    self.roster.extend(spawned);
                }
            }
        }

        log::info!(
            "Populated {}x{} field with {} entities",
            self.habitat.field().depth(),
            self.habitat.field().width(),
            self.roster.len()
        );
    }

    /// Reset the clock and repopulate from the configured spawn table
    pub fn reset(&mut self) {
        self.step = 0;
        self.hour = self.config.clock.start_hour;
        let spawn = self.config.spawn.clone();
        self.populate(&spawn);
    }

    /// Place a single entity and add it to the roster.
    ///
    /// Returns `None` if the cell is outside the field or already occupied.
    pub fn spawn(&mut self, kind: Kind, loc: Location, origin: Origin) -> Option<EntityId> {
        if !self.habitat.field().is_free(loc) {
            return None;
        }
        let id = self
            .habitat
            .spawn(kind, loc, origin, &self.species, &mut self.rng)?;
        self.roster.push(id);
        Some(id)
    }

    /// Force the current weather (restarting its countdown)
    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = WeatherSystem::fixed(&self.config.weather, weather);
    }

    /// Non-nocturnal creatures only act from dawn onwards
    #[inline]
    pub fn is_daytime(&self) -> bool {
        self.hour >= self.config.clock.dawn_hour
    }

    /// Advance one simulated hour
    pub fn step(&mut self) -> Snapshot<'_> {
        self.births_this_step = 0;
        self.deaths_this_step = 0;

        // Phase 1: Clock and weather
        self.step += 1;
        self.hour = (self.hour + 1) % 24;
        self.weather.advance(&mut self.rng);

        // Phase 2: Every entity acts against a snapshot of the roster
        let mut newborns = Vec::new();
        self.act_all(&mut newborns);

        // Phase 3: Disease takes its toll
        self.virus
            .apply_daily_effect(self.hour, &mut self.habitat, &self.species, &mut self.rng);

        // Phase 4: Remove the dead, admit the newborns
        self.merge(newborns);

        log::debug!(
            "Step {} ({:02}:00, {}): {} alive, {} born, {} died, {} infected",
            self.step,
            self.hour,
            self.weather.current,
            self.roster.len(),
            self.births_this_step,
            self.deaths_this_step,
            self.virus.infected_count()
        );

        self.snapshot()
    }

    fn act_all(&mut self, newborns: &mut Vec<EntityId>) {
        let weather = self.weather.current;
        let daytime = self.is_daytime();
        let roster = self.roster.clone();

        for id in roster {
            // Killed earlier in this pass
            let Some(kind) = self.habitat.get(id).filter(|e| e.is_active()).map(|e| e.kind) else {
                continue;
            };

            match self.species.creature(kind) {
                Some(traits) => {
                    if daytime || traits.nocturnal {
                        creature::act(
                            &mut self.habitat,
                            &self.species,
                            id,
                            weather,
                            newborns,
                            &mut self.rng,
                        );
                    }

                    if self.habitat.is_alive(id) {
                        self.virus
                            .expose(&self.habitat, &self.species, id, &mut self.rng);
                        self.virus
                            .spread(&self.habitat, &self.species, id, &mut self.rng);
                    }
                }
                None => {
                    plant::act(
                        &mut self.habitat,
                        &self.species,
                        id,
                        weather,
                        newborns,
                        &mut self.rng,
                    );
                }
            }
        }
    }

    fn merge(&mut self, mut newborns: Vec<EntityId>) {
        let habitat = &self.habitat;
        let before = self.roster.len() + newborns.len();

        self.roster.retain(|&id| habitat.is_alive(id));
        newborns.retain(|&id| habitat.is_alive(id));

        self.births_this_step = newborns.len();
        self.deaths_this_step = before - self.roster.len() - newborns.len();
        self.roster.extend(newborns);

        self.habitat.purge_dead();
        self.virus.prune(&self.habitat);
    }

    /// View of the current state
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            step: self.step,
            hour: self.hour,
            weather: self.weather.current,
            habitat: &self.habitat,
            infected: self.virus.infected_count(),
            births: self.births_this_step,
            deaths: self.deaths_this_step,
        }
    }

    /// Run up to `steps` steps, stopping as soon as `is_viable` rejects the
    /// habitat. Returns the number of steps executed.
    pub fn run<V>(&mut self, steps: u64, is_viable: V) -> u64
    where
        V: FnMut(&Habitat) -> bool,
    {
        self.run_with_callback(steps, is_viable, |_| {})
    }

    /// Run simulation with a callback receiving each step's snapshot
    pub fn run_with_callback<V, F>(&mut self, steps: u64, mut is_viable: V, mut callback: F) -> u64
    where
        V: FnMut(&Habitat) -> bool,
        F: FnMut(&Snapshot<'_>),
    {
        let mut executed = 0;
        while executed < steps && is_viable(&self.habitat) {
            let snapshot = self.step();
            callback(&snapshot);
            executed += 1;
        }
        executed
    }

    /// Entities in acting order
    pub fn roster(&self) -> &[EntityId] {
        &self.roster
    }

    /// Current population count
    pub fn population(&self) -> usize {
        self.roster.len()
    }

    /// Live count of one kind
    pub fn count(&self, kind: Kind) -> usize {
        self.habitat.count(kind)
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
