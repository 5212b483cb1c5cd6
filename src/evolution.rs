//! Evolution engine: roulette selection, crossover, mutation, elitism.

use crate::config::EvolutionConfig;
use crate::genome::Genome;
use rand::Rng;

/// Generational genetic algorithm over flat weight vectors.
///
/// Owns the authoritative population between epochs. Fitness statistics are
/// recomputed at the start of every [`EvolutionEngine::epoch`] call.
pub struct EvolutionEngine {
    population: Vec<Genome>,
    pop_size: usize,
    chromosome_length: usize,
    crossover_rate: f64,
    mutation_rate: f64,
    max_perturbation: f64,
    num_elite: usize,
    num_elite_copies: usize,
    total_fitness: f64,
    best_fitness: f64,
    avg_fitness: f64,
    worst_fitness: f64,
    fittest_index: usize,
}

impl EvolutionEngine {
    /// Create an engine with a randomly initialized population
    pub fn new(
        config: &EvolutionConfig,
        pop_size: usize,
        chromosome_length: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let population = (0..pop_size)
            .map(|_| Genome::new_random(chromosome_length, rng))
            .collect();

        Self {
            population,
            pop_size,
            chromosome_length,
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            max_perturbation: config.max_perturbation,
            num_elite: config.num_elite,
            num_elite_copies: config.num_elite_copies,
            total_fitness: 0.0,
            best_fitness: 0.0,
            avg_fitness: 0.0,
            worst_fitness: f64::INFINITY,
            fittest_index: 0,
        }
    }

    /// Current genome population
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Replace the population wholesale, e.g. when restoring a checkpoint
    pub fn set_population(&mut self, population: Vec<Genome>) {
        self.population = population;
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn avg_fitness(&self) -> f64 {
        self.avg_fitness
    }

    pub fn worst_fitness(&self) -> f64 {
        self.worst_fitness
    }

    pub fn total_fitness(&self) -> f64 {
        self.total_fitness
    }

    /// Index of the fittest genome in the sorted population
    pub fn fittest_index(&self) -> usize {
        self.fittest_index
    }

    pub fn chromosome_length(&self) -> usize {
        self.chromosome_length
    }

    /// Produce the next generation from the previous one.
    ///
    /// Sorts ascending by fitness, recomputes statistics, carries elites
    /// over, then fills the remaining slots with roulette-selected parents
    /// run through crossover and mutation. Always returns exactly
    /// `pop_size` genomes.
    pub fn epoch(&mut self, old_population: Vec<Genome>, rng: &mut impl Rng) -> Vec<Genome> {
        self.population = old_population;
        self.reset_stats();
        self.population
            .sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
        self.compute_stats();

        let mut next = Vec::with_capacity(self.pop_size);

        // Elites only transfer cleanly when they fill an even number of
        // slots; the remainder is bred in pairs.
        if (self.num_elite_copies * self.num_elite) % 2 == 0 {
            self.grab_n_best(self.num_elite, self.num_elite_copies, &mut next);
        }

        while next.len() < self.pop_size {
            let mut parent_one = self.select_by_roulette(rng);
            let mut parent_two = self.select_by_roulette(rng);

            self.crossover(parent_one.weights_mut(), parent_two.weights_mut(), rng);
            self.mutate(parent_one.weights_mut(), rng);
            self.mutate(parent_two.weights_mut(), rng);

            next.push(parent_one);
            if next.len() < self.pop_size {
                next.push(parent_two);
            }
        }

        self.population = next;
        self.population.clone()
    }

    /// Fitness-proportionate parent selection.
    ///
    /// Scans the ascending-sorted population accumulating fitness until the
    /// sum reaches a uniform draw from [0, total_fitness]. When total
    /// fitness is non-positive the accumulator can never reach the draw, so
    /// the scan clamps to the last genome.
    fn select_by_roulette(&self, rng: &mut impl Rng) -> Genome {
        let stop = rng.gen::<f64>() * self.total_fitness;

        let mut selected = self.population.len() - 1;
        let mut accumulated = 0.0;
        for (i, genome) in self.population.iter().enumerate() {
            accumulated += genome.fitness();
            if accumulated >= stop {
                selected = i;
                break;
            }
        }

        self.population[selected].clone()
    }

    /// Single-point crossover, in place.
    ///
    /// When it fires, a cut point is drawn uniformly from [1, n-1] and the
    /// tails [cut, n) of the two parents are exchanged.
    fn crossover(&self, parent_one: &mut [f64], parent_two: &mut [f64], rng: &mut impl Rng) {
        if parent_one.len() < 2 || rng.gen::<f64>() >= self.crossover_rate {
            return;
        }

        let cut = rng.gen_range(1..parent_one.len());
        for i in cut..parent_one.len() {
            std::mem::swap(&mut parent_one[i], &mut parent_two[i]);
        }
    }

    /// Whole-vector mutation, in place.
    ///
    /// When it fires, every weight is perturbed by a uniform draw from
    /// [-max_perturbation/2, max_perturbation/2].
    fn mutate(&self, chromosome: &mut [f64], rng: &mut impl Rng) {
        if self.max_perturbation <= 0.0 || rng.gen::<f64>() >= self.mutation_rate {
            return;
        }

        for weight in chromosome.iter_mut() {
            *weight += rng.gen_range(0.0..self.max_perturbation) - self.max_perturbation / 2.0;
        }
    }

    /// Append deep copies of the top `n_best` genomes, best first, each
    /// duplicated `num_copies` times
    fn grab_n_best(&self, n_best: usize, num_copies: usize, out: &mut Vec<Genome>) {
        let n_best = n_best.min(self.pop_size);
        for rank in 0..n_best {
            let genome = &self.population[self.pop_size - 1 - rank];
            for _ in 0..num_copies {
                out.push(genome.clone());
            }
        }
    }

    /// Recompute total/best/worst/average fitness over the sorted
    /// population. The fittest index advances on strict improvement only,
    /// so ties keep the first occurrence.
    fn compute_stats(&mut self) {
        self.total_fitness = 0.0;
        let mut best = self.population[0].fitness();
        let mut worst = self.population[0].fitness();
        let mut fittest = 0;

        for (i, genome) in self.population.iter().enumerate() {
            let fitness = genome.fitness();
            if fitness > best {
                best = fitness;
                fittest = i;
            } else if fitness < worst {
                worst = fitness;
            }
            self.total_fitness += fitness;
        }

        self.best_fitness = best;
        self.worst_fitness = worst;
        self.fittest_index = fittest;
        self.avg_fitness = self.total_fitness / self.pop_size as f64;
    }

    fn reset_stats(&mut self) {
        self.total_fitness = 0.0;
        self.best_fitness = 0.0;
        self.avg_fitness = 0.0;
        self.worst_fitness = f64::INFINITY;
        self.fittest_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine_with(config: EvolutionConfig, pop_size: usize, length: usize) -> EvolutionEngine {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        EvolutionEngine::new(&config, pop_size, length, &mut rng)
    }

    fn ascending_population(pop_size: usize, length: usize) -> Vec<Genome> {
        (0..pop_size)
            .map(|i| Genome::new(vec![i as f64; length], i as f64))
            .collect()
    }

    #[test]
    fn test_initial_population_size_and_length() {
        let engine = engine_with(EvolutionConfig::default(), 45, 77);
        assert_eq!(engine.population().len(), 45);
        assert!(engine.population().iter().all(|g| g.len() == 77));
    }

    #[test]
    fn test_epoch_preserves_population_size() {
        for pop_size in [4, 10, 45] {
            let mut engine = engine_with(EvolutionConfig::default(), pop_size, 5);
            let mut rng = ChaCha8Rng::seed_from_u64(7);

            let next = engine.epoch(ascending_population(pop_size, 5), &mut rng);
            assert_eq!(next.len(), pop_size);
            assert_eq!(engine.population().len(), pop_size);
        }
    }

    #[test]
    fn test_epoch_recomputes_stats() {
        let mut engine = engine_with(EvolutionConfig::default(), 10, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        engine.epoch(ascending_population(10, 5), &mut rng);

        assert_eq!(engine.best_fitness(), 9.0);
        assert_eq!(engine.avg_fitness(), 4.5);
        assert_eq!(engine.worst_fitness(), 0.0);
        assert_eq!(engine.fittest_index(), 9);
    }

    #[test]
    fn test_fittest_index_keeps_first_occurrence_on_ties() {
        let mut engine = engine_with(EvolutionConfig::default(), 4, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(13);

        let population = vec![
            Genome::new(vec![0.0; 3], 1.0),
            Genome::new(vec![1.0; 3], 5.0),
            Genome::new(vec![2.0; 3], 5.0),
            Genome::new(vec![3.0; 3], 5.0),
        ];
        engine.epoch(population, &mut rng);

        assert_eq!(engine.best_fitness(), 5.0);
        assert_eq!(engine.fittest_index(), 1);
    }

    #[test]
    fn test_roulette_returns_sole_fitness_holder() {
        let mut engine = engine_with(EvolutionConfig::default(), 5, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        let mut population: Vec<Genome> =
            (0..4).map(|_| Genome::new(vec![0.0; 3], 0.0)).collect();
        population.push(Genome::new(vec![7.0; 3], 10.0));

        engine.population = population;
        engine.compute_stats();

        for _ in 0..50 {
            let picked = engine.select_by_roulette(&mut rng);
            assert_eq!(picked.fitness(), 10.0);
            assert_eq!(picked.weights(), &[7.0, 7.0, 7.0]);
        }
    }

    #[test]
    fn test_roulette_clamps_on_zero_total_fitness() {
        let mut engine = engine_with(EvolutionConfig::default(), 4, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(19);

        engine.population = (0..4).map(|_| Genome::new(vec![0.0; 3], 0.0)).collect();
        engine.compute_stats();

        // Must terminate and return a genome rather than scan out of range.
        let picked = engine.select_by_roulette(&mut rng);
        assert_eq!(picked.fitness(), 0.0);
    }

    #[test]
    fn test_crossover_swaps_tails_exactly() {
        let config = EvolutionConfig {
            crossover_rate: 1.0,
            ..EvolutionConfig::default()
        };
        let engine = engine_with(config, 4, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        let original_one: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let original_two: Vec<f64> = (0..8).map(|i| 100.0 + i as f64).collect();
        let mut parent_one = original_one.clone();
        let mut parent_two = original_two.clone();

        engine.crossover(&mut parent_one, &mut parent_two, &mut rng);

        // Recover the cut point: the first index where parent_one changed.
        let cut = parent_one
            .iter()
            .zip(&original_one)
            .position(|(a, b)| a != b)
            .expect("crossover at rate 1.0 must exchange something");

        assert!(cut >= 1);
        assert_eq!(parent_one[..cut], original_one[..cut]);
        assert_eq!(parent_two[..cut], original_two[..cut]);
        assert_eq!(parent_one[cut..], original_two[cut..]);
        assert_eq!(parent_two[cut..], original_one[cut..]);
    }

    #[test]
    fn test_crossover_rate_zero_never_fires() {
        let config = EvolutionConfig {
            crossover_rate: 0.0,
            ..EvolutionConfig::default()
        };
        let engine = engine_with(config, 4, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(29);

        let mut parent_one = vec![1.0; 8];
        let mut parent_two = vec![2.0; 8];
        for _ in 0..100 {
            engine.crossover(&mut parent_one, &mut parent_two, &mut rng);
        }

        assert_eq!(parent_one, vec![1.0; 8]);
        assert_eq!(parent_two, vec![2.0; 8]);
    }

    #[test]
    fn test_mutation_perturbs_every_weight_within_bounds() {
        let config = EvolutionConfig {
            mutation_rate: 1.0,
            max_perturbation: 0.3,
            ..EvolutionConfig::default()
        };
        let engine = engine_with(config, 4, 50);
        let mut rng = ChaCha8Rng::seed_from_u64(31);

        let mut chromosome = vec![0.0; 50];
        engine.mutate(&mut chromosome, &mut rng);

        assert!(chromosome.iter().all(|&w| w.abs() <= 0.15));
        // With 50 weights at least one perturbation lands away from zero.
        assert!(chromosome.iter().any(|&w| w != 0.0));
    }

    #[test]
    fn test_mutation_rate_zero_is_noop() {
        let config = EvolutionConfig {
            mutation_rate: 0.0,
            ..EvolutionConfig::default()
        };
        let engine = engine_with(config, 4, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(37);

        let mut chromosome = vec![0.5; 8];
        for _ in 0..100 {
            engine.mutate(&mut chromosome, &mut rng);
        }
        assert_eq!(chromosome, vec![0.5; 8]);
    }

    #[test]
    fn test_elites_are_deep_copies_best_first() {
        let config = EvolutionConfig {
            num_elite: 2,
            num_elite_copies: 2,
            ..EvolutionConfig::default()
        };
        let mut engine = engine_with(config, 10, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(41);

        let old = ascending_population(10, 5);
        let mut next = engine.epoch(old, &mut rng);

        // First four entries: best genome twice, then second-best twice.
        assert_eq!(next[0].fitness(), 9.0);
        assert_eq!(next[1].fitness(), 9.0);
        assert_eq!(next[2].fitness(), 8.0);
        assert_eq!(next[3].fitness(), 8.0);
        assert_eq!(next[0].weights(), &[9.0; 5]);
        assert_eq!(next[2].weights(), &[8.0; 5]);

        // Mutating a copy must not touch the engine's stored population.
        next[0].weights_mut()[0] = -999.0;
        assert_eq!(engine.population()[0].weights()[0], 9.0);
    }

    #[test]
    fn test_odd_elite_block_is_skipped() {
        // 3 elites x 1 copy is odd, so the elite transfer is skipped and
        // the whole population is bred.
        let config = EvolutionConfig {
            num_elite: 3,
            num_elite_copies: 1,
            crossover_rate: 0.0,
            mutation_rate: 0.0,
            ..EvolutionConfig::default()
        };
        let mut engine = engine_with(config, 10, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(43);

        let next = engine.epoch(ascending_population(10, 5), &mut rng);
        assert_eq!(next.len(), 10);
        // With operators disabled every child is a roulette copy; the top
        // genome is not guaranteed a slot, so just confirm no elite block
        // was prepended verbatim (best-fitness children can appear anywhere).
        assert!(next.iter().all(|g| g.len() == 5));
    }
}
