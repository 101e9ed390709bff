//! Epidemic system.
//!
//! The virus lives outside individual creatures: it keeps the set of infected
//! creatures, spreads to neighbours and, once the day is under way, makes the
//! infected go hungry faster until they recover.

use crate::config::probability;
use crate::creature;
use crate::entity::EntityId;
use crate::habitat::Habitat;
use crate::species::SpeciesTable;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Virus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirusConfig {
    /// Chance per step that any creature catches the virus spontaneously
    pub exposure_probability: f64,
    /// Chance per daily effect that an infected creature stays sick
    pub persistence_probability: f64,
    /// Hour of day from which the daily effect applies
    pub onset_hour: u32,
    /// Extra hunger suffered per daily effect while sick
    pub hunger_per_tick: u32,
}

impl Default for VirusConfig {
    fn default() -> Self {
        Self {
            exposure_probability: 0.1,
            persistence_probability: 0.8,
            onset_hour: 8,
            hunger_per_tick: 3,
        }
    }
}

/// Set of currently infected creatures
#[derive(Clone, Debug)]
pub struct Virus {
    config: VirusConfig,
    /// Ordered so that iteration (and the random draws made during it) is
    /// reproducible for a given seed
    infected: BTreeSet<EntityId>,
}

impl Virus {
    pub fn new(config: &VirusConfig) -> Self {
        Self {
            config: config.clone(),
            infected: BTreeSet::new(),
        }
    }

    /// Infect a creature. Plants, immune kinds and dead entities are ignored.
    /// Returns true if the creature is newly infected.
    pub fn infect(&mut self, habitat: &Habitat, species: &SpeciesTable, id: EntityId) -> bool {
        match habitat.get(id) {
            Some(entity) if entity.is_active() && !species.is_virus_immune(entity.kind) => {
                self.infected.insert(id)
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_infected(&self, id: EntityId) -> bool {
        self.infected.contains(&id)
    }

    pub fn infected(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.infected.iter().copied()
    }

    pub fn infected_count(&self) -> usize {
        self.infected.len()
    }

    /// Roll spontaneous exposure for one creature
    pub fn expose<R: Rng + ?Sized>(
        &mut self,
        habitat: &Habitat,
        species: &SpeciesTable,
        id: EntityId,
        rng: &mut R,
    ) -> bool {
        if rng.gen_bool(probability(self.config.exposure_probability)) {
            self.infect(habitat, species, id)
        } else {
            false
        }
    }

    /// Infect the creature on one randomly chosen cell next to an infected
    /// carrier. Returns the newly infected neighbour, if any.
    pub fn spread<R: Rng + ?Sized>(
        &mut self,
        habitat: &Habitat,
        species: &SpeciesTable,
        carrier: EntityId,
        rng: &mut R,
    ) -> Option<EntityId> {
        if !self.is_infected(carrier) {
            return None;
        }
        let here = habitat.get(carrier)?.location()?;
        let target = habitat.field().random_adjacent_location(here, rng)?;
        let neighbour = habitat.occupant(target)?;
        if !neighbour.kind.is_creature() {
            return None;
        }
        let neighbour = neighbour.id;
        self.infect(habitat, species, neighbour).then_some(neighbour)
    }

    /// Apply the daily effect of the disease.
    ///
    /// Does nothing before the onset hour. Otherwise each live infected
    /// creature either recovers or stays sick and suffers extra hunger; the
    /// infected set is rebuilt from those still sick and alive.
    pub fn apply_daily_effect<R: Rng + ?Sized>(
        &mut self,
        hour: u32,
        habitat: &mut Habitat,
        species: &SpeciesTable,
        rng: &mut R,
    ) {
        if hour < self.config.onset_hour {
            return;
        }

        let persistence = probability(self.config.persistence_probability);
        let mut still_sick = BTreeSet::new();

        for &id in &self.infected {
            let Some(kind) = habitat.get(id).filter(|e| e.is_active()).map(|e| e.kind) else {
                continue;
            };
            if !rng.gen_bool(persistence) {
                continue;
            }
            if let Some(traits) = species.creature(kind) {
                for _ in 0..self.config.hunger_per_tick {
                    creature::increment_hunger(habitat, traits, id);
                }
            }
            if habitat.is_alive(id) {
                still_sick.insert(id);
            }
        }

        let recovered_or_dead = self.infected.len() - still_sick.len();
        if recovered_or_dead > 0 {
            log::debug!(
                "Virus: {} still infected, {} recovered or died",
                still_sick.len(),
                recovered_or_dead
            );
        }
        self.infected = still_sick;
    }

    /// Forget entities that are no longer alive
    pub fn prune(&mut self, habitat: &Habitat) {
        self.infected.retain(|&id| habitat.is_alive(id));
    }

    pub fn clear(&mut self) {
        self.infected.clear();
    }
}
