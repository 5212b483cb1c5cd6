//! World simulation engine - the tick and generation loop.

use crate::arena::Arena;
use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::evolution::EvolutionEngine;
use crate::genome::Genome;
use crate::stats::{Stats, StatsHistory};
use crate::sweeper::Sweeper;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The simulation world.
///
/// Owns the sweepers, the arena, the genome population, and the evolution
/// engine. Each [`World::step`] advances every sweeper one tick; after
/// `ticks_per_generation` ticks an epoch fires and the evolved weights are
/// redistributed to the brains.
pub struct World {
    // Population
    pub sweepers: Vec<Sweeper>,
    population: Vec<Genome>,

    // Environment
    pub arena: Arena,

    // State
    pub tick: u64,
    pub generation: u64,
    pub status: String,

    // Configuration
    pub config: Config,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,
    mines_swept: u64,
    hazards_hit: u64,

    // Evolution
    engine: EvolutionEngine,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let arena = Arena::new(
            config.arena.width,
            config.arena.height,
            config.arena.num_mines,
            config.arena.num_hazards,
            &mut rng,
        );

        let sweepers: Vec<Sweeper> = (0..config.sweepers.count)
            .map(|_| Sweeper::new(&config, &mut rng))
            .collect();
        let chromosome_length = sweepers[0].brain.total_weight_count();

        let engine = EvolutionEngine::new(
            &config.evolution,
            config.sweepers.count,
            chromosome_length,
            &mut rng,
        );
        let population = engine.population().to_vec();

        let mut world = Self {
            sweepers,
            population,
            arena,
            tick: 0,
            generation: 0,
            status: String::new(),
            config,
            stats: Stats::new(),
            stats_history: StatsHistory::new(),
            mines_swept: 0,
            hazards_hit: 0,
            engine,
            rng,
            seed,
        };

        world.distribute_weights();
        world
    }

    /// Restore world from checkpoint
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(checkpoint.random_seed);
        let chromosome_length = checkpoint.population[0].len();

        let mut engine = EvolutionEngine::new(
            &checkpoint.config.evolution,
            checkpoint.sweepers.len(),
            chromosome_length,
            &mut rng,
        );
        engine.set_population(checkpoint.population.clone());

        Self {
            sweepers: checkpoint.sweepers,
            population: checkpoint.population,
            arena: checkpoint.arena,
            tick: checkpoint.tick,
            generation: checkpoint.generation,
            status: checkpoint.status,
            config: checkpoint.config,
            stats: checkpoint.stats,
            stats_history: checkpoint.stats_history,
            mines_swept: 0,
            hazards_hit: 0,
            engine,
            rng,
            seed: checkpoint.random_seed,
        }
    }

    /// Create checkpoint of current state
    pub fn create_checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: Checkpoint::VERSION,
            tick: self.tick,
            generation: self.generation,
            config: self.config.clone(),
            sweepers: self.sweepers.clone(),
            population: self.population.clone(),
            arena: self.arena.clone(),
            stats: self.stats.clone(),
            stats_history: self.stats_history.clone(),
            status: self.status.clone(),
            random_seed: self.seed,
        }
    }

    /// Advance the simulation one tick; fires an epoch at the generation
    /// boundary
    pub fn step(&mut self) {
        self.tick_sweepers();
        self.tick += 1;

        if self.tick >= self.config.evolution.ticks_per_generation {
            self.next_generation();
            self.tick = 0;
        }
    }

    /// Run a fixed number of ticks
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Run until `generations` more epochs have fired
    pub fn run_generations(&mut self, generations: u64) {
        let target = self.generation + generations;
        while self.generation < target {
            self.step();
        }
    }

    /// One tick: every sweeper senses, thinks, moves, and scores
    fn tick_sweepers(&mut self) {
        for i in 0..self.sweepers.len() {
            if let Err(e) = self.sweepers[i].update(&self.arena, &self.config.sweepers) {
                log::error!("sweeper {} skipped this tick: {}", i, e);
                continue;
            }

            if let Some(mine) =
                self.sweepers[i].try_collect(&self.arena.mines, self.config.arena.mine_radius)
            {
                self.sweepers[i].reward();
                self.mines_swept += 1;
                self.arena.respawn_mine(mine, &mut self.rng);
            }

            if let Some(hazard) =
                self.sweepers[i].try_collect(&self.arena.hazards, self.config.arena.mine_radius)
            {
                self.sweepers[i].penalize();
                self.hazards_hit += 1;
                self.arena.respawn_hazard(hazard, &mut self.rng);
            }

            // Mirror fitness into the genome so the epoch sees it.
            self.population[i].set_fitness(self.sweepers[i].fitness);
        }
    }

    /// Generation boundary: evolve the population, rewire the brains,
    /// reset the sweepers
    fn next_generation(&mut self) {
        self.generation += 1;

        let old_population = std::mem::take(&mut self.population);
        self.population = self.engine.epoch(old_population, &mut self.rng);
        self.distribute_weights();

        for sweeper in &mut self.sweepers {
            sweeper.reset(&self.config, &mut self.rng);
        }

        self.stats = Stats {
            generation: self.generation,
            best_fitness: self.engine.best_fitness(),
            avg_fitness: self.engine.avg_fitness(),
            worst_fitness: self.engine.worst_fitness(),
            mines_swept: self.mines_swept,
            hazards_hit: self.hazards_hit,
        };
        self.stats_history.record(self.stats.clone());
        self.status = format!(
            "Generation {} has average fitness {:.2} and best fitness {:.0}",
            self.generation,
            self.engine.avg_fitness(),
            self.engine.best_fitness(),
        );
        log::info!("{}", self.stats.summary());

        self.mines_swept = 0;
        self.hazards_hit = 0;
    }

    /// Copy each genome's weights into the matching sweeper's brain
    fn distribute_weights(&mut self) {
        for (sweeper, genome) in self.sweepers.iter_mut().zip(self.population.iter()) {
            if let Err(e) = sweeper.brain.replace_weights(genome.weights()) {
                log::error!("weight redistribution failed: {}", e);
            }
        }
    }

    /// Number of sweepers in the world
    pub fn population(&self) -> usize {
        self.sweepers.len()
    }

    /// Current genome population
    pub fn genomes(&self) -> &[Genome] {
        &self.population
    }

    /// Best fitness of the last completed generation
    pub fn best_fitness(&self) -> f64 {
        self.engine.best_fitness()
    }

    /// Average fitness of the last completed generation
    pub fn avg_fitness(&self) -> f64 {
        self.engine.avg_fitness()
    }

    /// The world's random seed
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.sweepers.count = 8;
        config.arena.num_mines = 10;
        config.arena.num_hazards = 3;
        config.evolution.ticks_per_generation = 20;
        config.evolution.num_elite = 2;
        config.evolution.num_elite_copies = 1;
        config
    }

    #[test]
    fn test_world_setup() {
        let world = World::new_with_seed(small_config(), 123);

        assert_eq!(world.population(), 8);
        assert_eq!(world.genomes().len(), 8);
        assert_eq!(world.arena.mines.len(), 10);

        let chromosome_length = world.sweepers[0].brain.total_weight_count();
        assert!(world.genomes().iter().all(|g| g.len() == chromosome_length));

        // Brains carry their genome's weights from the start.
        for (sweeper, genome) in world.sweepers.iter().zip(world.genomes()) {
            assert_eq!(sweeper.brain.weights(), genome.weights());
        }
    }

    #[test]
    fn test_epoch_fires_at_generation_boundary() {
        let mut world = World::new_with_seed(small_config(), 456);

        world.run(19);
        assert_eq!(world.generation, 0);
        assert_eq!(world.tick, 19);

        world.step();
        assert_eq!(world.generation, 1);
        assert_eq!(world.tick, 0);
        assert_eq!(world.stats_history.snapshots.len(), 1);
        assert_eq!(world.genomes().len(), 8);

        // Sweepers were reset for the new generation.
        assert!(world.sweepers.iter().all(|s| s.fitness == 0.0));
    }

    #[test]
    fn test_fitness_mirrored_into_genomes() {
        let mut world = World::new_with_seed(small_config(), 789);
        world.run(5);

        for (sweeper, genome) in world.sweepers.iter().zip(world.genomes()) {
            assert_eq!(sweeper.fitness, genome.fitness());
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut world_a = World::new_with_seed(small_config(), 4242);
        let mut world_b = World::new_with_seed(small_config(), 4242);

        world_a.run(50);
        world_b.run(50);

        assert_eq!(world_a.generation, world_b.generation);
        assert_eq!(world_a.stats.best_fitness, world_b.stats.best_fitness);
        for (a, b) in world_a.sweepers.iter().zip(&world_b.sweepers) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.fitness, b.fitness);
        }
    }

    #[test]
    fn test_run_generations() {
        let mut world = World::new_with_seed(small_config(), 1010);

        world.run_generations(3);

        assert_eq!(world.generation, 3);
        assert_eq!(world.tick, 0);
        assert_eq!(world.stats_history.snapshots.len(), 3);
        assert!(!world.status.is_empty());
    }
}
