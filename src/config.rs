//! Configuration system for the sweeper simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub arena: ArenaConfig,
    pub sweepers: SweeperConfig,
    pub network: NetworkConfig,
    pub evolution: EvolutionConfig,
    pub logging: LoggingConfig,
}

/// Arena/environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Arena width (positions wrap torus-style)
    pub width: f64,
    /// Arena height
    pub height: f64,
    /// Number of collectible mines
    pub num_mines: usize,
    /// Number of hazards to avoid
    pub num_hazards: usize,
    /// Collision radius of a mine or hazard
    pub mine_radius: f64,
}

/// Sweeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Number of sweepers (and genomes) in the population
    pub count: usize,
    /// Maximum steering change per tick
    pub max_turn_rate: f64,
    /// Maximum speed
    pub max_speed: f64,
    /// Body diameter, used for collision tests
    pub scale: f64,
}

/// Neural network topology and activation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of input neurons
    pub inputs: usize,
    /// Number of output neurons
    pub outputs: usize,
    /// Number of hidden layers (0 for a single input-to-output layer)
    pub hidden_layers: usize,
    /// Neurons in each hidden layer
    pub neurons_per_hidden: usize,
    /// Threshold value added to every neuron's net input
    pub bias: f64,
    /// Divisor applied inside the sigmoid; larger values flatten the curve
    pub activation_response: f64,
}

/// Evolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Probability that a pair of parents exchanges weight-vector tails.
    /// A uniform draw below this value triggers crossover.
    pub crossover_rate: f64,
    /// Probability that a child's entire weight vector is perturbed.
    /// A uniform draw below this value triggers mutation of every weight.
    pub mutation_rate: f64,
    /// Maximum magnitude of a mutation perturbation
    pub max_perturbation: f64,
    /// How many of the top performers advance unchanged each generation
    pub num_elite: usize,
    /// How many copies of each elite enter the next generation
    pub num_elite_copies: usize,
    /// Ticks each generation runs before an epoch fires
    pub ticks_per_generation: u64,
}

/// Logging and checkpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Generations between checkpoints
    pub checkpoint_interval: u64,
    /// Generations between stats logging
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            sweepers: SweeperConfig::default(),
            network: NetworkConfig::default(),
            evolution: EvolutionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1035.0,
            height: 690.0,
            num_mines: 85,
            num_hazards: 15,
            mine_radius: 4.0,
        }
    }
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            count: 45,
            max_turn_rate: 0.2,
            max_speed: 1.5,
            scale: 15.0,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            inputs: 6,
            outputs: 2,
            hidden_layers: 2,
            neurons_per_hidden: 5,
            bias: -1.0,
            activation_response: 1.0,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            crossover_rate: 0.7,
            mutation_rate: 0.9,
            max_perturbation: 0.3,
            num_elite: 4,
            num_elite_copies: 1,
            ticks_per_generation: 1600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 10,
            stats_interval: 1,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return Err("arena dimensions must be positive".to_string());
        }
        if self.arena.num_mines == 0 {
            return Err("num_mines must be > 0".to_string());
        }
        if self.arena.num_hazards == 0 {
            return Err("num_hazards must be > 0".to_string());
        }
        if self.sweepers.count == 0 {
            return Err("sweeper count must be > 0".to_string());
        }
        if self.network.inputs == 0 || self.network.outputs == 0 {
            return Err("network inputs/outputs must be > 0".to_string());
        }
        if self.network.outputs < 2 {
            return Err("sweeper steering needs at least 2 network outputs".to_string());
        }
        if self.network.hidden_layers > 0 && self.network.neurons_per_hidden == 0 {
            return Err("neurons_per_hidden must be > 0 when hidden layers exist".to_string());
        }
        if !(0.0..=1.0).contains(&self.evolution.crossover_rate) {
            return Err("crossover_rate must be in [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.evolution.mutation_rate) {
            return Err("mutation_rate must be in [0, 1]".to_string());
        }
        if self.evolution.num_elite * self.evolution.num_elite_copies > self.sweepers.count {
            return Err("elite copies cannot exceed the population size".to_string());
        }
        if self.evolution.ticks_per_generation == 0 {
            return Err("ticks_per_generation must be > 0".to_string());
        }
        Ok(())
    }
}
