//! Genome representation: a flat weight vector plus a fitness score.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The unit of heredity: the weights of one sweeper's brain.
///
/// All genomes in a population share the same weight-vector length. Cloning
/// produces an independent deep copy, so elite duplication and parent
/// selection can never alias.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genome {
    weights: Vec<f64>,
    fitness: f64,
}

impl Genome {
    /// Create a genome from explicit weights and fitness
    pub fn new(weights: Vec<f64>, fitness: f64) -> Self {
        Self { weights, fitness }
    }

    /// Create a genome with `length` weights drawn uniformly from [-1, 1]
    pub fn new_random(length: usize, rng: &mut impl Rng) -> Self {
        let weights = (0..length).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Self { weights, fitness: 0.0 }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Mutable access for the evolution engine's in-place operators
    pub fn weights_mut(&mut self) -> &mut Vec<f64> {
        &mut self.weights
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Genomes compare by fitness only; ties are equal.
impl PartialEq for Genome {
    fn eq(&self, other: &Self) -> bool {
        self.fitness == other.fitness
    }
}

impl PartialOrd for Genome {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_weights_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let genome = Genome::new_random(100, &mut rng);

        assert_eq!(genome.len(), 100);
        assert_eq!(genome.fitness(), 0.0);
        assert!(genome.weights().iter().all(|&w| (-1.0..=1.0).contains(&w)));
    }

    #[test]
    fn test_ordering_by_fitness_only() {
        let a = Genome::new(vec![0.0; 3], 1.0);
        let b = Genome::new(vec![9.0; 3], 2.0);
        let c = Genome::new(vec![5.0; 3], 1.0);

        assert!(a < b);
        assert!(a == c); // different weights, equal fitness
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Genome::new(vec![1.0, 2.0, 3.0], 5.0);
        let mut copy = original.clone();

        copy.weights_mut()[0] = 99.0;
        copy.set_fitness(0.0);

        assert_eq!(original.weights()[0], 1.0);
        assert_eq!(original.fitness(), 5.0);
    }
}
