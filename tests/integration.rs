//! Integration tests for MENAGERIE

use menagerie::config::SpawnConfig;
use menagerie::entity::Origin;
use menagerie::stats::{is_viable, FieldStats, StatsHistory};
use menagerie::{Config, Kind, Location, Simulator, Weather};

/// Empty field, no virus, daytime start
fn scripted_config(depth: usize, width: usize) -> Config {
    let mut config = Config::default();
    config.field.depth = depth;
    config.field.width = width;
    config.spawn = SpawnConfig::empty();
    config.virus.exposure_probability = 0.0;
    config
}

#[test]
fn test_full_simulation_cycle() {
    let mut config = Config::default();
    config.field.depth = 40;
    config.field.width = 60;

    let mut sim = Simulator::new_with_seed(config, 12345);
    let executed = sim.run(300, |_| true);

    assert_eq!(executed, 300);
    assert_eq!(sim.step, 300);
    assert!(sim.habitat.is_consistent());

    for &id in sim.roster() {
        let entity = sim.habitat.get(id).unwrap();
        assert!(entity.is_active());
        let loc = entity.location().unwrap();
        assert!(loc.row < 40 && loc.col < 60);
        assert_eq!(sim.habitat.field().occupant_at(loc), Some(id));
    }
}

#[test]
fn test_empty_field_only_advances_clock() {
    let mut sim = Simulator::new_with_seed(scripted_config(10, 10), 1);
    assert_eq!(sim.population(), 0);

    let snapshot = sim.step();
    assert_eq!(snapshot.step, 1);
    assert_eq!(snapshot.hour, 9);
    assert_eq!(snapshot.births, 0);
    assert_eq!(snapshot.deaths, 0);

    sim.run(30, |_| true);
    assert_eq!(sim.population(), 0);
    assert_eq!(sim.habitat.field().occupied_count(), 0);
    assert_eq!(sim.step, 31);
    assert_eq!(sim.hour, (8 + 31) % 24);
}

#[test]
fn test_single_birth_into_only_free_cell() {
    let mut config = scripted_config(1, 2);
    config.species.sheep.breeding_age = 0;
    config.species.sheep.breeding_probability = 1.0;
    config.species.sheep.max_litter_size = 1;
    let mut sim = Simulator::new_with_seed(config, 2);

    sim.spawn(Kind::Sheep, Location::new(0, 0), Origin::Newborn).unwrap();
    let snapshot = sim.step();
    assert_eq!(snapshot.births, 1);

    let baby = sim.habitat.occupant(Location::new(0, 1)).unwrap();
    assert_eq!(baby.kind, Kind::Sheep);
    assert_eq!(baby.age(), Some(0));
    assert_eq!(baby.food_level(), Some(5));

    // The parent had nowhere left to go
    assert!(sim.habitat.occupant(Location::new(0, 0)).is_none());
    assert_eq!(sim.roster(), &[baby.id]);
}

#[test]
fn test_predation_caps_food_and_removes_prey() {
    let mut sim = Simulator::new_with_seed(scripted_config(1, 2), 3);
    sim.set_weather(Weather::Clear);

    let dragon = sim.spawn(Kind::Dragon, Location::new(0, 0), Origin::Newborn).unwrap();
    let sheep = sim.spawn(Kind::Sheep, Location::new(0, 1), Origin::Newborn).unwrap();

    sim.step();

    assert!(!sim.habitat.is_alive(sheep));
    assert!(sim.habitat.get(sheep).is_none());
    assert_eq!(sim.roster(), &[dragon]);

    let dragon = sim.habitat.get(dragon).unwrap();
    assert_eq!(dragon.food_level(), Some(150));
    // Predators stay where they are after eating
    assert_eq!(dragon.location(), Some(Location::new(0, 0)));
    assert!(sim.habitat.occupant(Location::new(0, 1)).is_none());
}

#[test]
fn test_wind_grounds_dragons() {
    let mut sim = Simulator::new_with_seed(scripted_config(1, 2), 4);
    sim.set_weather(Weather::Windy);

    let dragon = sim.spawn(Kind::Dragon, Location::new(0, 0), Origin::Newborn).unwrap();
    let sheep = sim.spawn(Kind::Sheep, Location::new(0, 1), Origin::Newborn).unwrap();

    sim.step();

    // The sheep ate nothing and had nowhere to go
    assert!(!sim.habitat.is_alive(sheep));
    assert_eq!(sim.habitat.get(dragon).unwrap().food_level(), Some(149));
    assert_eq!(sim.habitat.get(dragon).unwrap().age(), Some(1));
}

#[test]
fn test_plant_seeds_every_free_neighbour() {
    let mut config = scripted_config(3, 3);
    config.species.poison_berry.reproduction_threshold = 3;
    let mut sim = Simulator::new_with_seed(config, 5);
    sim.set_weather(Weather::Rainy);

    let center = Location::new(1, 1);
    let berry = sim.spawn(Kind::PoisonBerry, center, Origin::Seeded).unwrap();

    let snapshot = sim.step();
    assert_eq!(snapshot.births, 8);

    for row in 0..3 {
        for col in 0..3 {
            let loc = Location::new(row, col);
            assert_eq!(sim.habitat.occupant(loc).unwrap().kind, Kind::PoisonBerry);
        }
    }

    // (2 + 2) wraps at 3
    assert_eq!(sim.habitat.get(berry).unwrap().water_level(), Some(1));
    assert_eq!(sim.population(), 9);
}

#[test]
fn test_wheat_dies_after_filling_its_neighbourhood() {
    let mut sim = Simulator::new_with_seed(scripted_config(3, 3), 6);
    let center = Location::new(1, 1);
    sim.spawn(Kind::Wheat, center, Origin::Seeded).unwrap();

    sim.step();

    assert!(sim.habitat.occupant(center).is_none());
    assert_eq!(sim.count(Kind::Wheat), 8);
}

#[test]
fn test_night_hunter() {
    let mut config = scripted_config(1, 2);
    config.clock.start_hour = 2;
    let mut sim = Simulator::new_with_seed(config, 7);

    let walker = sim.spawn(Kind::WhiteWalker, Location::new(0, 0), Origin::Seeded).unwrap();
    let human = sim.spawn(Kind::Human, Location::new(0, 1), Origin::Newborn).unwrap();

    sim.step();

    assert!(!sim.habitat.is_alive(human));
    assert!(sim.habitat.is_alive(walker));
    assert_eq!(sim.habitat.get(walker).unwrap().food_level(), Some(0));
}

#[test]
fn test_white_walker_neither_ages_nor_starves() {
    let mut sim = Simulator::new_with_seed(scripted_config(1, 1), 8);
    let walker = sim.spawn(Kind::WhiteWalker, Location::new(0, 0), Origin::Seeded).unwrap();

    sim.run(500, |_| true);

    let walker = sim.habitat.get(walker).unwrap();
    assert!(walker.is_active());
    assert_eq!(walker.age(), Some(0));
}

#[test]
fn test_run_stops_when_one_kind_left() {
    let mut sim = Simulator::new_with_seed(scripted_config(1, 2), 9);
    sim.set_weather(Weather::Clear);
    sim.spawn(Kind::Dragon, Location::new(0, 0), Origin::Newborn);
    sim.spawn(Kind::Sheep, Location::new(0, 1), Origin::Newborn);

    assert!(is_viable(&sim.habitat));
    let executed = sim.run(100, is_viable);

    assert_eq!(executed, 1);
    assert!(!is_viable(&sim.habitat));
}

#[test]
fn test_virus_off_means_no_infections() {
    let mut config = Config::default();
    config.field.depth = 20;
    config.field.width = 20;
    config.virus.exposure_probability = 0.0;
    let mut sim = Simulator::new_with_seed(config, 10);

    let mut max_infected = 0;
    sim.run_with_callback(100, |_| true, |snap| max_infected = max_infected.max(snap.infected));

    assert_eq!(max_infected, 0);
}

#[test]
fn test_virus_spreads_and_skips_immune() {
    let mut config = Config::default();
    config.field.depth = 20;
    config.field.width = 20;
    config.virus.exposure_probability = 1.0;
    let mut sim = Simulator::new_with_seed(config, 11);

    sim.step();

    assert!(sim.virus.infected_count() > 0);
    for id in sim.virus.infected() {
        let entity = sim.habitat.get(id).unwrap();
        assert!(entity.is_active());
        assert!(entity.kind.is_creature());
        assert_ne!(entity.kind, Kind::WhiteWalker);
    }
}

#[test]
fn test_reproducibility() {
    let mut config = Config::default();
    config.field.depth = 30;
    config.field.width = 30;

    let mut a = Simulator::new_with_seed(config.clone(), 777);
    let mut b = Simulator::new_with_seed(config, 777);

    for _ in 0..100 {
        a.step();
        b.step();
    }

    assert_eq!(a.roster(), b.roster());
    assert_eq!(a.hour, b.hour);
    assert_eq!(a.weather.current, b.weather.current);
    assert_eq!(a.virus.infected_count(), b.virus.infected_count());
    assert_eq!(a.habitat.render(), b.habitat.render());
}

#[test]
fn test_different_seeds_diverge() {
    let mut config = Config::default();
    config.field.depth = 30;
    config.field.width = 30;

    let a = Simulator::new_with_seed(config.clone(), 1);
    let b = Simulator::new_with_seed(config, 2);

    assert_ne!(a.habitat.render(), b.habitat.render());
}

#[test]
fn test_stats_history_export() {
    let mut config = Config::default();
    config.field.depth = 20;
    config.field.width = 20;
    let mut sim = Simulator::new_with_seed(config, 12);
    let mut history = StatsHistory::new(10);

    sim.run_with_callback(50, |_| true, |snap| {
        if history.is_due(snap.step) {
            history.record(FieldStats::from_snapshot(snap));
        }
    });

    assert_eq!(history.snapshots.len(), 5);
    assert_eq!(history.population_series()[4].0, 50);

    let path = std::env::temp_dir().join("menagerie_test_stats.json");
    let path = path.to_string_lossy().to_string();
    history.save(&path).expect("Failed to save stats");
    let loaded = StatsHistory::load(&path).expect("Failed to load stats");
    assert_eq!(loaded.snapshots.len(), 5);
    assert_eq!(loaded.snapshots[4].population, history.snapshots[4].population);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_config_file_roundtrip() {
    let path = std::env::temp_dir().join("menagerie_test_config.yaml");

    let mut config = Config::default();
    config.field.depth = 25;
    config.species.sheep.max_litter_size = 2;
    config.save(&path).expect("Failed to save config");

    let loaded = Config::from_file(&path).expect("Failed to load config");
    assert_eq!(loaded.field.depth, 25);
    assert_eq!(loaded.species.sheep.max_litter_size, 2);

    std::fs::remove_file(&path).ok();
}
