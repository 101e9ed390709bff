//! Species data: the kind tag and the per-kind parameter table.
//!
//! Every behavioural difference between kinds is data. The simulation uses a
//! single entity type and reads kind-specific values (life span, litter size,
//! diet, exemptions) from a [`SpeciesTable`] at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every entity kind in the ecosystem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Dragon,
    Human,
    Sheep,
    Hedgehog,
    WhiteWalker,
    Wheat,
    PoisonBerry,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Dragon,
        Kind::Human,
        Kind::Sheep,
        Kind::Hedgehog,
        Kind::WhiteWalker,
        Kind::Wheat,
        Kind::PoisonBerry,
    ];

    pub const CREATURES: [Kind; 5] = [
        Kind::Dragon,
        Kind::Human,
        Kind::Sheep,
        Kind::Hedgehog,
        Kind::WhiteWalker,
    ];

    pub const PLANTS: [Kind; 2] = [Kind::Wheat, Kind::PoisonBerry];

    #[inline]
    pub fn is_plant(&self) -> bool {
        matches!(self, Kind::Wheat | Kind::PoisonBerry)
    }

    #[inline]
    pub fn is_creature(&self) -> bool {
        !self.is_plant()
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Dragon => "Dragon",
            Kind::Human => "Human",
            Kind::Sheep => "Sheep",
            Kind::Hedgehog => "Hedgehog",
            Kind::WhiteWalker => "WhiteWalker",
            Kind::Wheat => "Wheat",
            Kind::PoisonBerry => "PoisonBerry",
        }
    }

    /// Single-character glyph for text rendering
    pub fn glyph(&self) -> char {
        match self {
            Kind::Dragon => 'D',
            Kind::Human => 'H',
            Kind::Sheep => 'S',
            Kind::Hedgehog => 'h',
            Kind::WhiteWalker => 'W',
            Kind::Wheat => '"',
            Kind::PoisonBerry => '*',
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters shared by every creature of one kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureTraits {
    /// Dies once age exceeds this
    pub max_age: u32,
    /// Minimum age to breed
    pub breeding_age: u32,
    /// Chance of a litter per step once of breeding age
    pub breeding_probability: f64,
    /// Upper bound of a litter (0 = never breeds)
    pub max_litter_size: u32,
    /// Food level of a newborn and the cap after feeding
    pub max_food_level: i32,
    /// Food level gained by whatever eats this creature
    pub food_value: i32,
    /// Kinds this creature eats
    pub diet: Vec<Kind>,
    /// Requires an adjacent opposite-sex partner of the same kind to give birth
    pub needs_partner: bool,
    /// Age advances every act
    pub ages: bool,
    /// Food level drops every act and reaching zero kills
    pub starves: bool,
    /// Dies when it can neither eat nor move
    pub overcrowding_death: bool,
    /// Keeps acting through the night
    pub nocturnal: bool,
    /// Cannot breed, feed or move while it is windy
    pub grounded_by_wind: bool,
    /// Can never carry the virus
    pub virus_immune: bool,
}

impl CreatureTraits {
    #[inline]
    pub fn eats(&self, prey: Kind) -> bool {
        self.diet.contains(&prey)
    }

    pub fn dragon() -> Self {
        Self {
            max_age: 400,
            breeding_age: 100,
            breeding_probability: 0.2,
            max_litter_size: 2,
            max_food_level: 150,
            food_value: 100,
            diet: vec![Kind::Human, Kind::WhiteWalker, Kind::Sheep],
            needs_partner: true,
            ages: true,
            starves: true,
            overcrowding_death: true,
            nocturnal: false,
            grounded_by_wind: true,
            virus_immune: false,
        }
    }

    pub fn human() -> Self {
        Self {
            max_age: 60,
            breeding_age: 15,
            breeding_probability: 0.5,
            max_litter_size: 4,
            max_food_level: 7,
            food_value: 30,
            diet: vec![Kind::Wheat, Kind::PoisonBerry, Kind::Sheep],
            needs_partner: true,
            ages: true,
            starves: true,
            overcrowding_death: true,
            nocturnal: false,
            grounded_by_wind: false,
            virus_immune: false,
        }
    }

    pub fn sheep() -> Self {
        Self {
            max_age: 30,
            breeding_age: 5,
            breeding_probability: 0.6,
            max_litter_size: 4,
            max_food_level: 5,
            food_value: 20,
            diet: vec![Kind::Wheat, Kind::PoisonBerry],
            needs_partner: false,
            ages: true,
            starves: true,
            overcrowding_death: true,
            nocturnal: false,
            grounded_by_wind: false,
            virus_immune: false,
        }
    }

    pub fn hedgehog() -> Self {
        Self {
            max_age: 12,
            breeding_age: 6,
            breeding_probability: 0.2,
            max_litter_size: 3,
            max_food_level: 5,
            food_value: 1,
            diet: vec![Kind::Wheat],
            needs_partner: false,
            ages: true,
            starves: true,
            overcrowding_death: true,
            nocturnal: false,
            grounded_by_wind: false,
            virus_immune: false,
        }
    }

    /// Never ages, never starves, never breeds, never dies of crowding and
    /// hunts at night.
    pub fn white_walker() -> Self {
        Self {
            max_age: 1,
            breeding_age: 1,
            breeding_probability: 0.0,
            max_litter_size: 0,
            max_food_level: 0,
            food_value: 10,
            diet: vec![Kind::Human],
            needs_partner: false,
            ages: false,
            starves: false,
            overcrowding_death: false,
            nocturnal: true,
            grounded_by_wind: false,
            virus_immune: true,
        }
    }
}

/// Parameters shared by every plant of one kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantTraits {
    /// Water level at which the plant seeds every free neighbour
    pub reproduction_threshold: u32,
    /// Food level gained by whatever eats this plant (negative = toxic)
    pub food_value: i32,
    /// Dies when no free neighbour remains after seeding
    pub overcrowding_death: bool,
    /// Water gained per rainy hour
    pub rain_gain: u32,
    /// Water lost per dry hour
    pub dry_loss: u32,
    /// Water level of a fresh plant
    pub initial_water_level: u32,
}

impl PlantTraits {
    pub fn wheat() -> Self {
        Self {
            reproduction_threshold: 2,
            food_value: 5,
            overcrowding_death: true,
            rain_gain: 1,
            dry_loss: 0,
            initial_water_level: 2,
        }
    }

    pub fn poison_berry() -> Self {
        Self {
            reproduction_threshold: 6,
            food_value: -3,
            overcrowding_death: false,
            rain_gain: 2,
            dry_loss: 1,
            initial_water_level: 2,
        }
    }

    #[inline]
    pub fn is_toxic(&self) -> bool {
        self.food_value < 0
    }
}

/// Per-kind parameter table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesTable {
    pub dragon: CreatureTraits,
    pub human: CreatureTraits,
    pub sheep: CreatureTraits,
    pub hedgehog: CreatureTraits,
    pub white_walker: CreatureTraits,
    pub wheat: PlantTraits,
    pub poison_berry: PlantTraits,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self {
            dragon: CreatureTraits::dragon(),
            human: CreatureTraits::human(),
            sheep: CreatureTraits::sheep(),
            hedgehog: CreatureTraits::hedgehog(),
            white_walker: CreatureTraits::white_walker(),
            wheat: PlantTraits::wheat(),
            poison_berry: PlantTraits::poison_berry(),
        }
    }
}

impl SpeciesTable {
    /// Creature parameters, `None` for plant kinds
    pub fn creature(&self, kind: Kind) -> Option<&CreatureTraits> {
        match kind {
            Kind::Dragon => Some(&self.dragon),
            Kind::Human => Some(&self.human),
            Kind::Sheep => Some(&self.sheep),
            Kind::Hedgehog => Some(&self.hedgehog),
            Kind::WhiteWalker => Some(&self.white_walker),
            Kind::Wheat | Kind::PoisonBerry => None,
        }
    }

    pub fn creature_mut(&mut self, kind: Kind) -> Option<&mut CreatureTraits> {
        match kind {
            Kind::Dragon => Some(&mut self.dragon),
            Kind::Human => Some(&mut self.human),
            Kind::Sheep => Some(&mut self.sheep),
            Kind::Hedgehog => Some(&mut self.hedgehog),
            Kind::WhiteWalker => Some(&mut self.white_walker),
            Kind::Wheat | Kind::PoisonBerry => None,
        }
    }

    /// Plant parameters, `None` for creature kinds
    pub fn plant(&self, kind: Kind) -> Option<&PlantTraits> {
        match kind {
            Kind::Wheat => Some(&self.wheat),
            Kind::PoisonBerry => Some(&self.poison_berry),
            _ => None,
        }
    }

    pub fn plant_mut(&mut self, kind: Kind) -> Option<&mut PlantTraits> {
        match kind {
            Kind::Wheat => Some(&mut self.wheat),
            Kind::PoisonBerry => Some(&mut self.poison_berry),
            _ => None,
        }
    }

    /// Food yielded when an entity of `kind` is eaten
    pub fn food_value(&self, kind: Kind) -> i32 {
        match (self.creature(kind), self.plant(kind)) {
            (Some(traits), _) => traits.food_value,
            (None, Some(traits)) => traits.food_value,
            (None, None) => 0,
        }
    }

    /// Whether `predator` may eat `prey`
    pub fn can_eat(&self, predator: Kind, prey: Kind) -> bool {
        self.creature(predator)
            .map(|traits| traits.eats(prey))
            .unwrap_or(false)
    }

    /// Whether a kind can carry the virus (plants never can)
    pub fn is_virus_immune(&self, kind: Kind) -> bool {
        self.creature(kind)
            .map(|traits| traits.virus_immune)
            .unwrap_or(true)
    }

    /// Clamp values that would break the rules; returns one message per fix.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        for kind in Kind::CREATURES {
            if let Some(traits) = self.creature_mut(kind) {
                let p = traits.breeding_probability;
                if !(0.0..=1.0).contains(&p) || p.is_nan() {
                    traits.breeding_probability = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
                    fixes.push(format!(
                        "{}: breeding_probability {} clamped to {}",
                        kind, p, traits.breeding_probability
                    ));
                }
                if traits.max_food_level < 0 {
                    fixes.push(format!(
                        "{}: max_food_level {} raised to 0",
                        kind, traits.max_food_level
                    ));
                    traits.max_food_level = 0;
                }
            }
        }

        for kind in Kind::PLANTS {
            if let Some(traits) = self.plant_mut(kind) {
                if traits.reproduction_threshold == 0 {
                    traits.reproduction_threshold = 1;
                    fixes.push(format!("{}: reproduction_threshold raised to 1", kind));
                }
            }
        }

        fixes
    }
}
