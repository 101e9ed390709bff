//! Creature behaviour: aging, hunger, breeding, feeding and movement.
//!
//! One act per creature per step:
//!
//! 1. age and hunger (per the kind's flags), which may kill it
//! 2. give birth into free neighbouring cells
//! 3. eat the first edible neighbour, or
//! 4. move to the first free neighbour, or die of overcrowding

use crate::config::probability;
use crate::entity::{DeathCause, EntityId, Origin, Vitals};
use crate::habitat::Habitat;
use crate::location::Location;
use crate::species::{CreatureTraits, SpeciesTable};
use crate::weather::Weather;
use rand::Rng;

/// What a creature ended up doing this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Dead before it could act, or already dead
    Died,
    /// Kept in place by the weather
    Grounded,
    /// Ate the occupant of this cell
    Fed(EntityId),
    /// Moved to this cell
    Moved(Location),
    /// Could not move and is exempt from crowding
    Stayed,
    /// Could not move and died
    Crowded,
}

/// Run one step of behaviour for a creature.
///
/// Newborns are placed on the field immediately and their ids appended to
/// `newborns`; they are not acted on during this step.
pub fn act<R: Rng + ?Sized>(
    habitat: &mut Habitat,
    species: &SpeciesTable,
    id: EntityId,
    weather: Weather,
    newborns: &mut Vec<EntityId>,
    rng: &mut R,
) -> Outcome {
    let Some(kind) = habitat.get(id).filter(|e| e.is_active()).map(|e| e.kind) else {
        return Outcome::Died;
    };
    let Some(traits) = species.creature(kind) else {
        return Outcome::Died;
    };

    if traits.ages {
        increment_age(habitat, traits, id);
    }
    if traits.starves {
        increment_hunger(habitat, traits, id);
    }
    if !habitat.is_alive(id) {
        return Outcome::Died;
    }

    if traits.grounded_by_wind && weather == Weather::Windy {
        return Outcome::Grounded;
    }

    give_birth(habitat, species, id, newborns, rng);

    if let Some(prey) = find_food(habitat, species, id) {
        eat(habitat, species, id, prey);
        return Outcome::Fed(prey);
    }

    let Some(here) = habitat.get(id).and_then(|e| e.location()) else {
        return Outcome::Died;
    };
    match habitat.field().free_adjacent_location(here) {
        Some(to) => {
            habitat.relocate(id, to);
            Outcome::Moved(to)
        }
        None if traits.overcrowding_death => {
            habitat.kill(id, DeathCause::Overcrowding);
            Outcome::Crowded
        }
        None => Outcome::Stayed,
    }
}

/// Age by one; dies once age exceeds the kind's maximum.
pub fn increment_age(habitat: &mut Habitat, traits: &CreatureTraits, id: EntityId) {
    let Some(entity) = habitat.get_mut(id) else {
        return;
    };
    if !entity.is_active() {
        return;
    }
    if let Vitals::Creature { age, .. } = &mut entity.vitals {
        *age += 1;
        if *age > traits.max_age {
            habitat.kill(id, DeathCause::OldAge);
        }
    }
}

/// Lower the food level by one; dies at zero or below.
pub fn increment_hunger(habitat: &mut Habitat, traits: &CreatureTraits, id: EntityId) {
    if !traits.starves {
        return;
    }
    let Some(entity) = habitat.get_mut(id) else {
        return;
    };
    if !entity.is_active() {
        return;
    }
    if let Vitals::Creature { food_level, .. } = &mut entity.vitals {
        *food_level -= 1;
        if *food_level <= 0 {
            *food_level = 0;
            habitat.kill(id, DeathCause::Starvation);
        }
    }
}

/// Number of offspring this step (may be zero).
pub fn breed<R: Rng + ?Sized>(habitat: &Habitat, traits: &CreatureTraits, id: EntityId, rng: &mut R) -> u32 {
    let Some(age) = habitat.get(id).and_then(|e| e.age()) else {
        return 0;
    };
    if age < traits.breeding_age || traits.max_litter_size == 0 {
        return 0;
    }
    if rng.gen_bool(probability(traits.breeding_probability)) {
        rng.gen_range(1..=traits.max_litter_size)
    } else {
        0
    }
}

/// True if the creature may give birth: kinds that need a partner require a
/// live opposite-sex neighbour of the same kind, every other kind breeds freely.
pub fn has_partner(habitat: &Habitat, traits: &CreatureTraits, id: EntityId) -> bool {
    if !traits.needs_partner {
        return true;
    }
    let Some(me) = habitat.get(id).filter(|e| e.is_active()) else {
        return false;
    };
    let Some(here) = me.location() else {
        return false;
    };

    habitat
        .field()
        .adjacent_locations(here)
        .into_iter()
        .filter_map(|loc| habitat.occupant(loc))
        .any(|other| other.is_active() && other.same_kind(me) && me.sex.is_opposite(other.sex))
}

/// Fill free neighbouring cells with newborns, one per cell in field order,
/// until the litter or the free cells run out. Returns the number born.
pub fn give_birth<R: Rng + ?Sized>(
    habitat: &mut Habitat,
    species: &SpeciesTable,
    id: EntityId,
    newborns: &mut Vec<EntityId>,
    rng: &mut R,
) -> u32 {
    let Some((kind, here)) = habitat
        .get(id)
        .filter(|e| e.is_active())
        .and_then(|e| e.location().map(|loc| (e.kind, loc)))
    else {
        return 0;
    };
    let Some(traits) = species.creature(kind) else {
        return 0;
    };

    let free = habitat.field().free_adjacent_locations(here);
    let births = breed(habitat, traits, id, rng);
    let mut born = 0;

    for loc in free.into_iter().take(births as usize) {
        if !has_partner(habitat, traits, id) {
            continue;
        }
        if let Some(child) = habitat.spawn(kind, loc, Origin::Newborn, species, rng) {
            newborns.push(child);
            born += 1;
        }
    }

    if born > 0 {
        log::trace!("{} #{} gave birth to {}", kind, id, born);
    }
    born
}

/// First live neighbour in the creature's diet, in field order.
pub fn find_food(habitat: &Habitat, species: &SpeciesTable, id: EntityId) -> Option<EntityId> {
    let me = habitat.get(id).filter(|e| e.is_active())?;
    let traits = species.creature(me.kind)?;
    let here = me.location()?;

    habitat
        .field()
        .adjacent_locations(here)
        .into_iter()
        .filter_map(|loc| habitat.occupant(loc))
        .find(|prey| prey.is_active() && traits.eats(prey.kind))
        .map(|prey| prey.id)
}

/// Kill `prey` and add its food value to the predator, capped at the
/// predator's maximum. Toxic prey (negative value) is destroyed for nothing.
pub fn eat(habitat: &mut Habitat, species: &SpeciesTable, predator: EntityId, prey: EntityId) {
    let Some(prey_kind) = habitat.get(prey).filter(|e| e.is_active()).map(|e| e.kind) else {
        return;
    };
    let Some(kind) = habitat.get(predator).map(|e| e.kind) else {
        return;
    };
    let Some(traits) = species.creature(kind) else {
        return;
    };

    let gain = species.food_value(prey_kind).max(0);
    habitat.kill(prey, DeathCause::Predation);

    if let Some(entity) = habitat.get_mut(predator) {
        if let Vitals::Creature { food_level, .. } = &mut entity.vitals {
            *food_level = food_level.saturating_add(gain).min(traits.max_food_level);
        }
    }
}
