//! Plant behaviour: water-driven reproduction.

use crate::entity::{DeathCause, EntityId, Origin, Vitals};
use crate::habitat::Habitat;
use crate::species::SpeciesTable;
use crate::weather::Weather;
use rand::Rng;

/// Run one step of behaviour for a plant. Returns the number of seedlings.
///
/// Rain raises the water level, dry weather lowers it (never below zero).
/// Reaching the threshold wraps the level and seeds every free neighbour.
pub fn act<R: Rng + ?Sized>(
    habitat: &mut Habitat,
    species: &SpeciesTable,
    id: EntityId,
    weather: Weather,
    newborns: &mut Vec<EntityId>,
    rng: &mut R,
) -> usize {
    let Some(entity) = habitat.get_mut(id).filter(|e| e.is_active()) else {
        return 0;
    };
    let kind = entity.kind;
    let Some(traits) = species.plant(kind) else {
        return 0;
    };
    let Vitals::Plant { water_level } = &mut entity.vitals else {
        return 0;
    };

    *water_level = if weather.is_wet() {
        water_level.saturating_add(traits.rain_gain)
    } else {
        water_level.saturating_sub(traits.dry_loss)
    };

    let threshold = traits.reproduction_threshold.max(1);
    if *water_level < threshold {
        return 0;
    }
    *water_level %= threshold;

    let Some(here) = entity.location() else {
        return 0;
    };

    let free = habitat.field().free_adjacent_locations(here);
    let seeded = free.len();
    for loc in free {
        newborns.extend(habitat.spawn(kind, loc, Origin::Newborn, species, rng));
    }

    if traits.overcrowding_death && habitat.field().free_adjacent_location(here).is_none() {
        habitat.kill(id, DeathCause::Overcrowding);
    }

    seeded
}
