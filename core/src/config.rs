use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::grid::cell_count;
use crate::spawn::DEFAULT_FOUR_PROBABILITY;

/// Everything needed to start a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// How many earlier states undo can reach. `0` disables undo.
    pub max_snapshots: usize,
    /// Seed for the tile spawner.
    pub seed: u64,
    /// Chance that a spawned tile is a 4.
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rows: 4,
            cols: 4,
            max_snapshots: 1,
            seed: 42,
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }
}

impl EngineConfig {
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_snapshots(mut self, max_snapshots: usize) -> Self {
        self.max_snapshots = max_snapshots;
        self
    }

    pub fn with_four_probability(mut self, p: f64) -> Self {
        self.four_probability = p;
        self
    }

    pub fn validate(&self) -> Result<()> {
        cell_count(self.rows, self.cols)?;
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::InvalidProbability(self.four_probability));
        }
        Ok(())
    }
}
