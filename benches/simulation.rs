//! Performance benchmarks for SWEEPERS

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sweepers::config::NetworkConfig;
use sweepers::evolution::EvolutionEngine;
use sweepers::neural::Network;
use sweepers::{Config, World};

fn benchmark_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for sweepers in [45, 100, 200].iter() {
        let mut config = Config::default();
        config.sweepers.count = *sweepers;

        let mut world = World::new_with_seed(config, 42);

        // Warm up
        world.run(10);

        group.bench_with_input(BenchmarkId::new("sweepers", sweepers), sweepers, |b, _| {
            b.iter(|| {
                world.step();
            });
        });
    }

    group.finish();
}

fn benchmark_network_evaluate(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let net = Network::new(&NetworkConfig::default(), &mut rng);
    let inputs = [0.5f64; 6];

    c.bench_function("network_evaluate", |b| {
        b.iter(|| net.evaluate(black_box(&inputs)));
    });

    let deep_config = NetworkConfig {
        hidden_layers: 4,
        neurons_per_hidden: 16,
        ..NetworkConfig::default()
    };
    let deep_net = Network::new(&deep_config, &mut rng);

    c.bench_function("network_evaluate_deep", |b| {
        b.iter(|| deep_net.evaluate(black_box(&inputs)));
    });
}

fn benchmark_epoch(c: &mut Criterion) {
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut engine = EvolutionEngine::new(&config.evolution, 45, 77, &mut rng);

    c.bench_function("engine_epoch", |b| {
        b.iter(|| {
            let population = engine.population().to_vec();
            engine.epoch(black_box(population), &mut rng)
        });
    });
}

criterion_group!(
    benches,
    benchmark_world_step,
    benchmark_network_evaluate,
    benchmark_epoch
);
criterion_main!(benches);
