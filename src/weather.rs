//! Weather conditions and the countdown that re-rolls them.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three weather conditions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Rainy,
    Windy,
    Clear,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Rainy, Weather::Windy, Weather::Clear];

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Weather::Rainy => "Rainy",
            Weather::Windy => "Windy",
            Weather::Clear => "Clear",
        }
    }

    /// Wet weather waters plants
    #[inline]
    pub fn is_wet(&self) -> bool {
        matches!(self, Weather::Rainy)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weather configuration: how long each condition lasts and how likely it is
/// to be drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub rainy_hours: u32,
    pub windy_hours: u32,
    pub clear_hours: u32,
    pub rainy_weight: f64,
    pub windy_weight: f64,
    pub clear_weight: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            rainy_hours: 2,
            windy_hours: 3,
            clear_hours: 5,
            rainy_weight: 1.0,
            windy_weight: 1.0,
            clear_weight: 1.0,
        }
    }
}

impl WeatherConfig {
    /// Hours a condition lasts once drawn (never less than one)
    pub fn duration(&self, weather: Weather) -> u32 {
        let hours = match weather {
            Weather::Rainy => self.rainy_hours,
            Weather::Windy => self.windy_hours,
            Weather::Clear => self.clear_hours,
        };
        hours.max(1)
    }

    fn weights(&self) -> [f64; 3] {
        [self.rainy_weight, self.windy_weight, self.clear_weight]
    }
}

/// Current weather plus the hours left before it is re-rolled
#[derive(Clone, Debug)]
pub struct WeatherSystem {
    pub current: Weather,
    pub remaining: u32,
    config: WeatherConfig,
    distribution: Option<WeightedIndex<f64>>,
}

impl WeatherSystem {
    /// Draw the initial weather and start its countdown
    pub fn new<R: Rng + ?Sized>(config: &WeatherConfig, rng: &mut R) -> Self {
        let mut system = Self {
            current: Weather::Clear,
            remaining: 0,
            config: config.clone(),
            distribution: Self::distribution(config),
        };
        system.current = system.draw(rng);
        system.remaining = system.config.duration(system.current);
        system
    }

    /// Start from a fixed condition (used for scripted scenarios)
    pub fn fixed(config: &WeatherConfig, weather: Weather) -> Self {
        Self {
            current: weather,
            remaining: config.duration(weather),
            config: config.clone(),
            distribution: Self::distribution(config),
        }
    }

    /// Weighted draw over the three conditions, or `None` for a uniform draw
    /// when the weights are unusable (non-finite, negative or all zero).
    fn distribution(config: &WeatherConfig) -> Option<WeightedIndex<f64>> {
        let weights = config.weights();
        if !weights.iter().sum::<f64>().is_finite() {
            log::warn!("Non-finite weather weights {:?}, falling back to uniform", weights);
            return None;
        }
        match WeightedIndex::new(weights) {
            Ok(dist) => Some(dist),
            Err(e) => {
                log::warn!("Invalid weather weights ({}), falling back to uniform", e);
                None
            }
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Weather {
        let idx = match &self.distribution {
            Some(dist) => dist.sample(rng),
            None => rng.gen_range(0..Weather::ALL.len()),
        };
        Weather::ALL[idx]
    }

    /// Advance one hour. Returns true when a new condition was drawn.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return false;
        }

        let previous = self.current;
        self.current = self.draw(rng);
        self.remaining = self.config.duration(self.current);
        log::debug!(
            "Weather changed: {} -> {} for {}h",
            previous,
            self.current,
            self.remaining
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_durations() {
        let config = WeatherConfig::default();
        assert_eq!(config.duration(Weather::Rainy), 2);
        assert_eq!(config.duration(Weather::Windy), 3);
        assert_eq!(config.duration(Weather::Clear), 5);
    }

    #[test]
    fn test_initial_countdown_matches_weather() {
        let config = WeatherConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let system = WeatherSystem::new(&config, &mut rng);

        assert_eq!(system.remaining, config.duration(system.current));
    }

    #[test]
    fn test_countdown_resets_on_zero() {
        let config = WeatherConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut system = WeatherSystem::fixed(&config, Weather::Windy);

        assert!(!system.advance(&mut rng));
        assert_eq!(system.remaining, 2);
        assert!(!system.advance(&mut rng));
        assert_eq!(system.remaining, 1);

        assert!(system.advance(&mut rng));
        assert_eq!(system.remaining, config.duration(system.current));
    }

    #[test]
    fn test_infinite_weight_draws_uniformly() {
        let config = WeatherConfig {
            rainy_weight: f64::INFINITY,
            ..WeatherConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut system = WeatherSystem::new(&config, &mut rng);
        let mut fixed = WeatherSystem::fixed(&config, Weather::Clear);

        for _ in 0..50 {
            system.advance(&mut rng);
            fixed.advance(&mut rng);
        }
        assert!(system.distribution.is_none());
        assert!(fixed.distribution.is_none());
    }

    #[test]
    fn test_weighted_draw_respects_zero_weights() {
        let config = WeatherConfig {
            rainy_weight: 0.0,
            windy_weight: 0.0,
            clear_weight: 1.0,
            ..WeatherConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut system = WeatherSystem::new(&config, &mut rng);

        for _ in 0..40 {
            system.advance(&mut rng);
            assert_eq!(system.current, Weather::Clear);
        }
    }

    #[test]
    fn test_all_conditions_drawn() {
        let config = WeatherConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut system = WeatherSystem::new(&config, &mut rng);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..500 {
            system.advance(&mut rng);
            seen.insert(system.current);
        }

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_names() {
        assert_eq!(Weather::Rainy.to_string(), "Rainy");
        assert!(Weather::Rainy.is_wet());
        assert!(!Weather::Clear.is_wet());
    }
}
