//! Per-generation fitness statistics.

use serde::{Deserialize, Serialize};

/// Statistics snapshot for one generation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Generation these numbers describe
    pub generation: u64,
    /// Best fitness in the generation
    pub best_fitness: f64,
    /// Mean fitness across the population
    pub avg_fitness: f64,
    /// Worst fitness in the generation
    pub worst_fitness: f64,
    /// Mines collected across all sweepers this generation
    pub mines_swept: u64,
    /// Hazards triggered across all sweepers this generation
    pub hazards_hit: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Gen:{:4} | Best:{:6.1} | Avg:{:6.2} | Worst:{:6.1} | Swept:{:5} | Hit:{:4}",
            self.generation,
            self.best_fitness,
            self.avg_fitness,
            self.worst_fitness,
            self.mines_swept,
            self.hazards_hit,
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded snapshots, one per generation
    pub snapshots: Vec<Stats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Best fitness per generation, for plotting
    pub fn best_series(&self) -> Vec<(u64, f64)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.best_fitness))
            .collect()
    }

    /// Average fitness per generation, for plotting
    pub fn avg_series(&self) -> Vec<(u64, f64)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.avg_fitness))
            .collect()
    }

    /// Save history to a JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_contains_generation() {
        let stats = Stats {
            generation: 12,
            best_fitness: 9.0,
            avg_fitness: 4.5,
            worst_fitness: -2.0,
            mines_swept: 80,
            hazards_hit: 3,
        };
        let line = stats.summary();
        assert!(line.contains("12"));
        assert!(line.contains("4.50"));
    }

    #[test]
    fn test_history_series() {
        let mut history = StatsHistory::new();
        for generation in 0..5 {
            history.record(Stats {
                generation,
                best_fitness: generation as f64 * 2.0,
                avg_fitness: generation as f64,
                ..Stats::default()
            });
        }

        let best = history.best_series();
        assert_eq!(best.len(), 5);
        assert_eq!(best[4], (4, 8.0));

        let avg = history.avg_series();
        assert_eq!(avg[2], (2, 2.0));
    }

    #[test]
    fn test_history_json_roundtrip() {
        let mut history = StatsHistory::new();
        history.record(Stats {
            generation: 1,
            best_fitness: 3.0,
            ..Stats::default()
        });

        let path = "/tmp/sweepers_test_stats.json";
        history.save(path).unwrap();
        let loaded = StatsHistory::load(path).unwrap();

        assert_eq!(loaded.snapshots.len(), 1);
        assert_eq!(loaded.snapshots[0].best_fitness, 3.0);

        std::fs::remove_file(path).ok();
    }
}
