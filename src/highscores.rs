//! Best score / level tracking
//!
//! Stored as JSON. Storage failures are logged and never interrupt play.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::host::StatsStore;

/// Best run results across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestStats {
    pub high_score: u64,
    /// Highest level reached (1-based)
    pub max_level: u32,
}

impl Default for BestStats {
    fn default() -> Self {
        Self {
            high_score: 0,
            max_level: 1,
        }
    }
}

impl BestStats {
    /// Fold a run result in. Returns true if either record improved.
    pub fn merge(&mut self, score: u64, level: u32) -> bool {
        let before = *self;
        self.high_score = self.high_score.max(score);
        self.max_level = self.max_level.max(level);
        *self != before
    }
}

/// Best stats persisted to a JSON file
#[derive(Debug, Clone)]
pub struct JsonStatsFile {
    path: PathBuf,
}

impl JsonStatsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonStatsFile {
    fn load_best_stats(&mut self) -> BestStats {
        if let Ok(json) = std::fs::read_to_string(&self.path) {
            match serde_json::from_str::<BestStats>(&json) {
                Ok(stats) => {
                    log::info!(
                        "Loaded best stats: score {}, level {}",
                        stats.high_score,
                        stats.max_level
                    );
                    return stats;
                }
                Err(e) => log::warn!("Ignoring corrupt stats file {}: {}", self.path.display(), e),
            }
        }

        log::info!("No best stats found, starting fresh");
        BestStats::default()
    }

    fn save_best_stats(&mut self, stats: BestStats) {
        let json = match serde_json::to_string_pretty(&stats) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot encode best stats: {}", e);
                return;
            }
        };
        match std::fs::write(&self.path, json) {
            Ok(()) => log::info!("Best stats saved to {}", self.path.display()),
            Err(e) => log::warn!("Cannot write {}: {}", self.path.display(), e),
        }
    }
}

/// In-process store, for hosts without storage and for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    pub stats: BestStats,
    /// Number of saves received
    pub saves: usize,
}

impl StatsStore for MemoryStats {
    fn load_best_stats(&mut self) -> BestStats {
        self.stats
    }

    fn save_best_stats(&mut self, stats: BestStats) {
        self.stats = stats;
        self.saves += 1;
    }
}
