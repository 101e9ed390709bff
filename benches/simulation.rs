//! Performance benchmarks for MENAGERIE

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use menagerie::field::Field;
use menagerie::stats::census;
use menagerie::{Config, Location, Simulator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn sized_config(depth: usize, width: usize) -> Config {
    let mut config = Config::default();
    config.field.depth = depth;
    config.field.width = width;
    config
}

fn benchmark_simulator_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_step");

    for &(depth, width) in [(40, 60), (80, 120), (160, 240)].iter() {
        let mut sim = Simulator::new_with_seed(sized_config(depth, width), 42);

        // Warm up
        sim.run(10, |_| true);

        group.bench_with_input(
            BenchmarkId::new("cells", depth * width),
            &(depth, width),
            |b, _| {
                b.iter(|| {
                    sim.step();
                });
            },
        );
    }

    group.finish();
}

fn benchmark_populate(c: &mut Criterion) {
    let config = sized_config(80, 120);
    let spawn = config.spawn.clone();
    let mut sim = Simulator::new_with_seed(config, 7);

    c.bench_function("populate_80x120", |b| {
        b.iter(|| {
            sim.populate(black_box(&spawn));
        });
    });
}

fn benchmark_neighbourhood(c: &mut Criterion) {
    let field = Field::new(80, 120);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    c.bench_function("adjacent_locations", |b| {
        b.iter(|| field.adjacent_locations(black_box(Location::new(40, 60))));
    });

    c.bench_function("random_adjacent_location", |b| {
        b.iter(|| field.random_adjacent_location(black_box(Location::new(0, 0)), &mut rng));
    });
}

fn benchmark_census(c: &mut Criterion) {
    let sim = Simulator::new_with_seed(sized_config(80, 120), 42);

    c.bench_function("census_80x120", |b| {
        b.iter(|| census(black_box(&sim.habitat)));
    });
}

criterion_group!(
    benches,
    benchmark_simulator_step,
    benchmark_populate,
    benchmark_neighbourhood,
    benchmark_census,
);
criterion_main!(benches);
