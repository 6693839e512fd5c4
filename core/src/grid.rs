use std::fmt;

use crate::error::{EngineError, Result};

/// Tile value. `0` is an empty cell, anything else is a power of two.
pub type Tile = u32;

/// Largest tile a [`Tile`] can hold. Two of these never merge, since the
/// sum would not fit.
pub const MAX_TILE: Tile = 1 << 31;

/// Whether `value` may sit on a grid cell: empty, or a power of two >= 2.
#[inline]
pub fn is_valid_tile(value: Tile) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Whether two equal tiles of this value can merge.
#[inline]
pub fn can_merge(value: Tile) -> bool {
    value != 0 && value < MAX_TILE
}

/// `rows * cols` if the board is usable: at least two cells, no overflow.
pub(crate) fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    match rows.checked_mul(cols) {
        Some(n) if n >= 2 => Ok(n),
        _ => Err(EngineError::InvalidDimensions { rows, cols }),
    }
}

/// A `rows x cols` board stored as a flat row-major sequence.
///
/// Index `r * cols + c` holds the tile at row `r`, column `c`. The dimensions
/// never change after construction; the contents are mutated in place by
/// moves and spawns and replaced wholesale on undo.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An all-empty grid. Needs at least two cells, since a game starts
    /// with two tiles.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        Ok(Grid {
            rows,
            cols,
            cells: vec![0; len],
        })
    }

    /// Build a grid from row-major cell values, checking every tile.
    pub fn from_cells(rows: usize, cols: usize, cells: &[Tile]) -> Result<Self> {
        let mut grid = Grid::new(rows, cols)?;
        grid.replace_cells(cells)?;
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, pos: usize) -> Tile {
        self.cells[pos]
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: usize, value: Tile) {
        self.cells[pos] = value;
    }

    /// Copy already-validated contents of the same length, e.g. from a
    /// snapshot of this grid.
    pub(crate) fn overwrite(&mut self, cells: &[Tile]) {
        self.cells.copy_from_slice(cells);
    }

    /// Overwrite every cell at once, keeping the dimensions.
    pub fn replace_cells(&mut self, cells: &[Tile]) -> Result<()> {
        if cells.len() != self.cells.len() {
            return Err(EngineError::CellCount {
                expected: self.cells.len(),
                actual: cells.len(),
            });
        }
        if let Some((index, &value)) = cells
            .iter()
            .enumerate()
            .find(|(_, &v)| !is_valid_tile(v))
        {
            return Err(EngineError::InvalidTile { index, value });
        }
        self.cells.copy_from_slice(cells);
        Ok(())
    }

    /// Row of a flat index.
    #[inline]
    pub fn row_of(&self, pos: usize) -> usize {
        pos / self.cols
    }

    /// Column of a flat index.
    #[inline]
    pub fn col_of(&self, pos: usize) -> usize {
        pos % self.cols
    }

    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Indices of every empty cell, ascending.
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tiles; conserved by moves, grows by the spawned value.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{} {{", self.rows, self.cols)?;
        for row in self.cells.chunks(self.cols) {
            for &val in row {
                if val == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}", "------+".repeat(self.cols));
        writeln!(f, "{border}")?;
        for row in self.cells.chunks(self.cols) {
            write!(f, "|")?;
            for &val in row {
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{border}")?;
        }
        Ok(())
    }
}
