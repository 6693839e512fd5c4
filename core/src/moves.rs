//! Shift/merge and the matching legality scan, both driven by [`Traversal`].

use std::ops::ControlFlow;

use crate::direction::Direction;
use crate::grid::{can_merge, Grid, Tile};
use crate::traversal::Traversal;

/// What a single shift/merge pass did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveResult {
    /// Whether any cell was written.
    pub changed: bool,
    /// Points earned: the sum of every post-merge tile value.
    pub gained: u64,
}

/// Shift and merge every line of `grid` toward `direction`, in place.
///
/// Each resulting tile takes part in at most one merge per move, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`. A grid that is already compacted
/// with no equal neighbours is left untouched.
pub fn apply_move(grid: &mut Grid, direction: Direction) -> MoveResult {
    let traversal = Traversal::for_grid(direction, grid);
    let mut result = MoveResult::default();
    let mut last_pos = traversal.start();
    let mut last_value: Tile = 0;

    for (pos, first_of_line) in traversal.positions() {
        let value = grid.get(pos);

        if first_of_line {
            last_pos = pos;
            last_value = value;
            continue;
        }
        if value == 0 {
            continue;
        }

        if value == last_value && can_merge(value) {
            let merged = value * 2;
            grid.set(last_pos, merged);
            grid.set(pos, 0);
            result.gained += u64::from(merged);
            result.changed = true;
            last_pos = traversal.next_pos(last_pos);
            // A freshly merged tile cannot merge again this move.
            last_value = 0;
        } else {
            if last_value != 0 {
                last_pos = traversal.next_pos(last_pos);
            }
            last_value = value;
            if last_pos != pos {
                grid.set(pos, 0);
                grid.set(last_pos, value);
                result.changed = true;
            }
        }
    }

    result
}

/// Whether moving toward `direction` would change the grid.
///
/// Pure scan: true as soon as an empty cell or a tile equal to the previous
/// tile of its line is found.
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    let traversal = Traversal::for_grid(direction, grid);
    let mut last_value: Tile = 0;

    traversal
        .visit(|pos, first_of_line| {
            if first_of_line {
                last_value = 0;
            }
            let value = grid.get(pos);
            if value == 0 || (value == last_value && can_merge(value)) {
                ControlFlow::Break(())
            } else {
                last_value = value;
                ControlFlow::Continue(())
            }
        })
        .is_some()
}

/// Legality of each direction, indexed like [`Direction::ALL`].
pub fn legal_directions(grid: &Grid) -> [bool; 4] {
    Direction::ALL.map(|d| can_move(grid, d))
}

/// Whether any direction is legal. The game is over when this is false.
pub fn has_any_legal_move(grid: &Grid) -> bool {
    Direction::ALL.iter().any(|&d| can_move(grid, d))
}
