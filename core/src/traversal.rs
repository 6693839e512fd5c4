//! Direction-agnostic walk over the grid.
//!
//! A [`Traversal`] bundles the three things shift/merge and legality logic
//! need to know about a direction: where to start, whether a position opens
//! a new line, and how to step to the next position along a line. Lines are
//! walked from the end tiles compact toward, so the first cell of every line
//! is the one furthest in the direction of travel.
//!
//! Visitation order per direction on a `rows x cols` grid of length `len`:
//!
//! | direction | start     | first of line        | next position                               |
//! |-----------|-----------|----------------------|---------------------------------------------|
//! | Right     | `len - 1` | last column          | `pos - 1`                                   |
//! | Left      | `0`       | column 0             | `pos + 1`                                   |
//! | Down      | `len - 1` | last row             | `pos - cols`, or `len - cols + pos - 1`     |
//! | Up        | `0`       | row 0                | `pos + cols`, or `pos + cols - len + 1`     |
//!
//! The second form for Down/Up wraps from the end of one column to the
//! start of the neighbouring one: Down jumps from the top of column `c` to
//! the bottom of column `c - 1`, Up from the bottom of column `c` to the top
//! of column `c + 1`.

use std::ops::ControlFlow;

use crate::direction::Direction;
use crate::grid::Grid;

/// Traversal strategy for one direction over one grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    direction: Direction,
    len: usize,
    cols: usize,
}

impl Traversal {
    pub fn new(direction: Direction, rows: usize, cols: usize) -> Self {
        Traversal {
            direction,
            len: rows * cols,
            cols,
        }
    }

    pub fn for_grid(direction: Direction, grid: &Grid) -> Self {
        Traversal::new(direction, grid.rows(), grid.cols())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Position visited first.
    pub fn start(&self) -> usize {
        match self.direction {
            Direction::Right | Direction::Down => self.len - 1,
            Direction::Left | Direction::Up => 0,
        }
    }

    /// Whether `pos` is the anchor cell of its line.
    #[inline]
    pub fn is_first_of_line(&self, pos: usize) -> bool {
        match self.direction {
            Direction::Right => pos % self.cols == self.cols - 1,
            Direction::Left => pos % self.cols == 0,
            Direction::Down => pos >= self.len - self.cols,
            Direction::Up => pos < self.cols,
        }
    }

    /// The position after `pos` in visitation order.
    ///
    /// Within a line this is the neighbouring cell away from the anchor, which
    /// is also how the merge write cursor advances. Must not be called on the
    /// last position of the traversal.
    #[inline]
    pub fn next_pos(&self, pos: usize) -> usize {
        match self.direction {
            Direction::Right => pos - 1,
            Direction::Left => pos + 1,
            Direction::Down => {
                if pos >= self.cols {
                    pos - self.cols
                } else {
                    self.len - self.cols + pos - 1
                }
            }
            Direction::Up => {
                if pos < self.len - self.cols {
                    pos + self.cols
                } else {
                    pos + self.cols - self.len + 1
                }
            }
        }
    }

    /// Iterate `(position, first_of_line)` over every cell exactly once.
    pub fn positions(&self) -> Positions {
        Positions {
            traversal: *self,
            pos: self.start(),
            remaining: self.len,
        }
    }

    /// Visit every cell in order until the visitor breaks.
    ///
    /// Returns the break value, if any.
    pub fn visit<B, F>(&self, mut visitor: F) -> Option<B>
    where
        F: FnMut(usize, bool) -> ControlFlow<B>,
    {
        for (pos, first) in self.positions() {
            if let ControlFlow::Break(b) = visitor(pos, first) {
                return Some(b);
            }
        }
        None
    }
}

/// Iterator returned by [`Traversal::positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    traversal: Traversal,
    pos: usize,
    remaining: usize,
}

impl Iterator for Positions {
    type Item = (usize, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.pos;
        self.remaining -= 1;
        // The stepping function is only defined up to the final cell.
        if self.remaining > 0 {
            self.pos = self.traversal.next_pos(pos);
        }
        Some((pos, self.traversal.is_first_of_line(pos)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions {}
