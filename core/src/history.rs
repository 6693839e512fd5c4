use std::collections::VecDeque;

use crate::grid::{Grid, Tile};

/// Immutable copy of the score and grid contents at one point in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    score: u64,
    cells: Box<[Tile]>,
}

impl Snapshot {
    pub fn capture(score: u64, grid: &Grid) -> Self {
        Snapshot {
            score,
            cells: grid.cells().into(),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }
}

/// Bounded undo stack.
///
/// Holds the current state plus up to `max_snapshots` earlier ones. The most
/// recent entry always mirrors the live game as of the last save.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    max_snapshots: usize,
}

impl History {
    pub fn new(max_snapshots: usize) -> Self {
        History {
            snapshots: VecDeque::with_capacity(max_snapshots + 1),
            max_snapshots,
        }
    }

    pub fn max_snapshots(&self) -> usize {
        self.max_snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    /// Record the live state, evicting the oldest entries past the bound.
    pub fn save(&mut self, score: u64, grid: &Grid) {
        self.snapshots.push_back(Snapshot::capture(score, grid));
        while self.snapshots.len() > self.max_snapshots + 1 {
            self.snapshots.pop_front();
        }
    }

    /// Step back to the entry before the current one.
    ///
    /// Everything after that entry is discarded and a copy of it is returned
    /// for the caller to install. `None` when there is no earlier entry.
    pub fn restore(&mut self) -> Option<Snapshot> {
        let target = self.snapshots.len().checked_sub(2)?;
        self.snapshots.truncate(target + 1);
        self.snapshots.back().cloned()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[Tile]) -> Grid {
        Grid::from_cells(1, cells.len(), cells).unwrap()
    }

    #[test]
    fn test_restore_needs_a_prior_entry() {
        let mut history = History::new(1);
        assert_eq!(history.restore(), None);
        history.save(0, &grid_with(&[2, 2]));
        assert_eq!(history.restore(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_single_level_undo() {
        let mut history = History::new(1);
        history.save(0, &grid_with(&[2, 2]));
        history.save(4, &grid_with(&[4, 2]));

        let snapshot = history.restore().unwrap();
        assert_eq!(snapshot.score(), 0);
        assert_eq!(snapshot.cells(), &[2, 2]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.restore(), None);
    }

    #[test]
    fn test_evicts_oldest_past_bound() {
        let mut history = History::new(1);
        history.save(0, &grid_with(&[2, 0]));
        history.save(4, &grid_with(&[4, 0]));
        history.save(12, &grid_with(&[8, 0]));
        assert_eq!(history.len(), 2);

        assert_eq!(history.restore().unwrap().score(), 4);
        assert_eq!(history.restore(), None);
    }

    #[test]
    fn test_larger_bound_allows_several_undos() {
        let mut history = History::new(3);
        for (score, v) in [(0, 2), (4, 4), (12, 8), (28, 16), (60, 32)] {
            history.save(score, &grid_with(&[v, 0]));
        }
        assert_eq!(history.len(), 4);
        assert_eq!(history.restore().unwrap().score(), 28);
        assert_eq!(history.restore().unwrap().score(), 12);
        assert_eq!(history.restore().unwrap().score(), 4);
        assert_eq!(history.restore(), None);
    }

    #[test]
    fn test_zero_bound_disables_undo() {
        let mut history = History::new(0);
        history.save(0, &grid_with(&[2, 0]));
        history.save(4, &grid_with(&[4, 0]));
        assert_eq!(history.len(), 1);
        assert_eq!(history.restore(), None);
    }

    #[test]
    fn test_snapshot_is_a_deep_copy() {
        let mut history = History::new(1);
        let mut grid = grid_with(&[2, 0]);
        history.save(0, &grid);
        grid.set(1, 2);
        assert_eq!(history.latest().unwrap().cells(), &[2, 0]);
    }
}
