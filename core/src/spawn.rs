use log::{error, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{EngineError, Result};
use crate::grid::{is_valid_tile, Grid, Tile};

/// Default chance that a spawned tile is a 4 instead of a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.15;

/// Places new tiles on random empty cells using a seedable PRNG, so a game
/// is fully reproducible from its seed.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SmallRng,
    four_probability: f64,
}

impl Spawner {
    pub fn new(seed: u64, four_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&four_probability) {
            return Err(EngineError::InvalidProbability(four_probability));
        }
        Ok(Spawner {
            rng: SmallRng::seed_from_u64(seed),
            four_probability,
        })
    }

    /// Put a tile on a uniformly chosen empty cell and return its index.
    ///
    /// A positive `forced` value is placed as is and must be a power of two
    /// >= 2; otherwise the tile is a 4 with the configured probability and a
    /// 2 the rest of the time.
    /// Spawning on a full grid is a caller bug and is reported as
    /// [`EngineError::SpawnOnFullGrid`].
    pub fn spawn(&mut self, grid: &mut Grid, forced: Option<Tile>) -> Result<usize> {
        if let Some(v) = forced {
            if v != 0 && !is_valid_tile(v) {
                return Err(EngineError::InvalidSpawnValue(v));
            }
        }
        let empty_cells = grid.empty_positions();
        if empty_cells.is_empty() {
            error!("spawn requested on a full {}x{} grid", grid.rows(), grid.cols());
            return Err(EngineError::SpawnOnFullGrid);
        }

        let pos = empty_cells[self.rng.gen_range(0..empty_cells.len())];
        let value = match forced {
            Some(v) if v > 0 => v,
            _ => {
                if self.rng.gen_bool(self.four_probability) {
                    4
                } else {
                    2
                }
            }
        };
        grid.set(pos, value);
        trace!("spawned {value} at {pos}");
        Ok(pos)
    }
}
