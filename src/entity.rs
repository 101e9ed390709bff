//! Entity structure shared by every creature and plant.

use crate::location::Location;
use crate::species::{Kind, SpeciesTable};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unique entity identifier
pub type EntityId = u64;

/// Sex of an entity. Plants report a fixed neutral value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Neutral,
}

impl Sex {
    /// Random sex (50/50)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    /// True for a male/female pair
    #[inline]
    pub fn is_opposite(&self, other: Sex) -> bool {
        matches!(
            (self, other),
            (Sex::Male, Sex::Female) | (Sex::Female, Sex::Male)
        )
    }
}

/// Cause of death tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Starvation,
    Overcrowding,
    Predation,
}

/// How a new entity starts out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Born during a step: age 0 and full food level
    Newborn,
    /// Seeded by populate: random age and food level
    Seeded,
}

/// Kind-specific mutable state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Vitals {
    Creature { age: u32, food_level: i32 },
    Plant { water_level: u32 },
}

/// A creature or plant living on the field
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: Kind,
    pub sex: Sex,
    pub vitals: Vitals,
    alive: bool,
    location: Option<Location>,
    pub cause_of_death: Option<DeathCause>,
}

impl Entity {
    /// Create an entity of `kind` at `location` with vitals drawn per `origin`.
    ///
    /// The caller is responsible for registering the entity with the field.
    pub fn new<R: Rng + ?Sized>(
        id: EntityId,
        kind: Kind,
        location: Location,
        origin: Origin,
        species: &SpeciesTable,
        rng: &mut R,
    ) -> Self {
        let (sex, vitals) = if let Some(traits) = species.creature(kind) {
            let (age, food_level) = match origin {
                Origin::Newborn => (0, traits.max_food_level),
                Origin::Seeded => {
                    let age = if traits.ages && traits.max_age > 0 {
                        rng.gen_range(1..=traits.max_age)
                    } else {
                        0
                    };
                    let food_level = if traits.starves && traits.max_food_level > 0 {
                        rng.gen_range(0..traits.max_food_level)
                    } else {
                        traits.max_food_level
                    };
                    (age, food_level)
                }
            };
            (Sex::random(rng), Vitals::Creature { age, food_level })
        } else {
            let water_level = species
                .plant(kind)
                .map(|traits| traits.initial_water_level)
                .unwrap_or(0);
            (Sex::Neutral, Vitals::Plant { water_level })
        };

        Self {
            id,
            kind,
            sex,
            vitals,
            alive: true,
            location: Some(location),
            cause_of_death: None,
        }
    }

    /// Check if entity is alive
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive
    }

    /// Current cell, `None` once dead
    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    #[inline]
    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    /// Same kind as another entity
    #[inline]
    pub fn same_kind(&self, other: &Entity) -> bool {
        self.kind == other.kind
    }

    /// Food yielded if this entity is eaten
    #[inline]
    pub fn food_value(&self, species: &SpeciesTable) -> i32 {
        species.food_value(self.kind)
    }

    pub fn age(&self) -> Option<u32> {
        match self.vitals {
            Vitals::Creature { age, .. } => Some(age),
            Vitals::Plant { .. } => None,
        }
    }

    pub fn food_level(&self) -> Option<i32> {
        match self.vitals {
            Vitals::Creature { food_level, .. } => Some(food_level),
            Vitals::Plant { .. } => None,
        }
    }

    pub fn water_level(&self) -> Option<u32> {
        match self.vitals {
            Vitals::Plant { water_level } => Some(water_level),
            Vitals::Creature { .. } => None,
        }
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Flag as dead and drop the location. The habitat clears the field cell.
    pub(crate) fn mark_dead(&mut self, cause: DeathCause) {
        if self.alive {
            self.alive = false;
            self.cause_of_death = Some(cause);
        }
        self.location = None;
    }
}
