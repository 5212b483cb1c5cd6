//! # SWEEPERS
//!
//! Neuroevolution simulator: a population of sweepers roams a toroidal
//! arena collecting mines and dodging hazards, each steered by a small
//! feedforward network whose weights are bred by a genetic algorithm.
//!
//! ## Features
//!
//! - **Evolvable**: roulette selection, crossover, mutation, elitism
//! - **Deterministic**: seeded random number generation end to end
//! - **Configurable**: YAML configuration files
//! - **Resumable**: binary checkpoints of the full simulation state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sweepers::{Config, World};
//!
//! // Create world with default config
//! let config = Config::default();
//! let mut world = World::new(config);
//!
//! // Run 50 generations
//! world.run_generations(50);
//!
//! // Check results
//! println!("Best fitness: {}", world.best_fitness());
//! println!("Average fitness: {}", world.avg_fitness());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use sweepers::Config;
//!
//! let mut config = Config::default();
//! config.sweepers.count = 60;
//! config.evolution.mutation_rate = 0.8;
//! ```

pub mod arena;
pub mod checkpoint;
pub mod config;
pub mod evolution;
pub mod genome;
pub mod neural;
pub mod stats;
pub mod sweeper;
pub mod world;

// Re-export main types
pub use config::Config;
pub use genome::Genome;
pub use neural::Network;
pub use sweeper::Sweeper;
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(generations: u64, sweepers: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.sweepers.count = sweepers;

    let mut world = World::new(config);

    let start = Instant::now();
    world.run_generations(generations);
    let elapsed = start.elapsed();

    let ticks = generations * world.config.evolution.ticks_per_generation;
    BenchmarkResult {
        generations,
        sweepers,
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
        best_fitness: world.best_fitness(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub generations: u64,
    pub sweepers: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
    pub best_fitness: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Generations: {}", self.generations)?;
        writeln!(f, "Sweepers: {}", self.sweepers)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        writeln!(f, "Best fitness: {:.1}", self.best_fitness)?;
        Ok(())
    }
}
