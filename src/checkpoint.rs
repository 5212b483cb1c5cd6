//! Checkpoint system for saving and loading simulation state.

use crate::arena::Arena;
use crate::config::Config;
use crate::genome::Genome;
use crate::stats::{Stats, StatsHistory};
use crate::sweeper::Sweeper;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Complete simulation state for checkpointing.
///
/// Restoring from these fields alone reconstructs the world; nothing
/// derived is persisted.
#[derive(Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Tick within the current generation
    pub tick: u64,
    /// Generation counter
    pub generation: u64,
    /// Configuration
    pub config: Config,
    /// All sweepers, brains and kinematic state included
    pub sweepers: Vec<Sweeper>,
    /// The genome population
    pub population: Vec<Genome>,
    /// Arena with mine and hazard positions
    pub arena: Arena,
    /// Current generation statistics
    pub stats: Stats,
    /// Full stats history
    pub stats_history: StatsHistory,
    /// Last status message
    pub status: String,
    /// Random seed (for reproducibility)
    pub random_seed: u64,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 1;

    /// Save checkpoint to binary file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        // Magic bytes for identification
        writer.write_all(b"SWPR")?;

        let encoded = bincode::serialize(self)?;
        writer.write_all(&encoded)?;

        Ok(())
    }

    /// Load checkpoint from binary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != b"SWPR" {
            return Err(CheckpointError::InvalidFormat("Invalid magic bytes".to_string()));
        }

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let checkpoint: Checkpoint = bincode::deserialize(&buffer)?;

        if checkpoint.version != Self::VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }

        Ok(checkpoint)
    }

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).unwrap_or(0) as usize
    }
}

/// Errors that can occur during checkpoint operations
#[derive(Debug)]
pub enum CheckpointError {
    Io(std::io::Error),
    Serialization(bincode::Error),
    InvalidFormat(String),
    VersionMismatch { expected: u32, found: u32 },
}

impl std::fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Self::VersionMismatch { expected, found } => {
                write!(f, "Version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for CheckpointError {}

impl From<std::io::Error> for CheckpointError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<bincode::Error> for CheckpointError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e)
    }
}

/// Checkpoint manager for automatic saving
pub struct CheckpointManager {
    /// Base directory for checkpoints
    pub base_dir: String,
    /// Generations between checkpoints
    pub interval: u64,
    /// Maximum checkpoints to keep
    pub max_checkpoints: usize,
    /// Generation of the last saved checkpoint
    last_checkpoint: u64,
}

impl CheckpointManager {
    /// Create a new checkpoint manager
    pub fn new(base_dir: String, interval: u64, max_checkpoints: usize) -> Self {
        std::fs::create_dir_all(&base_dir).ok();

        Self {
            base_dir,
            interval,
            max_checkpoints,
            last_checkpoint: 0,
        }
    }

    /// Check if a checkpoint should be saved at this generation
    pub fn should_save(&self, generation: u64) -> bool {
        generation > 0 && generation % self.interval == 0 && generation != self.last_checkpoint
    }

    /// Generate checkpoint filename
    pub fn checkpoint_path(&self, generation: u64) -> String {
        format!("{}/checkpoint_{:08}.bin", self.base_dir, generation)
    }

    /// Save checkpoint and update state
    pub fn save(&mut self, checkpoint: &Checkpoint) -> Result<String, CheckpointError> {
        let path = self.checkpoint_path(checkpoint.generation);
        checkpoint.save(&path)?;
        self.last_checkpoint = checkpoint.generation;

        self.cleanup()?;

        Ok(path)
    }

    /// Remove old checkpoints beyond max limit
    fn cleanup(&self) -> Result<(), CheckpointError> {
        let mut checkpoints: Vec<_> = std::fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("checkpoint_")
            })
            .collect();

        if checkpoints.len() > self.max_checkpoints {
            // Names sort by generation
            checkpoints.sort_by_key(|e| e.file_name());

            let to_remove = checkpoints.len() - self.max_checkpoints;
            for entry in checkpoints.into_iter().take(to_remove) {
                std::fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }

    /// Find latest checkpoint in directory
    pub fn find_latest(&self) -> Option<String> {
        std::fs::read_dir(&self.base_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("checkpoint_")
            })
            .max_by_key(|e| e.file_name())
            .map(|e| e.path().to_string_lossy().to_string())
    }
}
