//! Error type shared by every part of the engine.

/// Everything the engine can reject.
///
/// Undo with nothing to restore and moves submitted while a previous move is
/// still being processed are not errors; they are reported through
/// [`UndoOutcome`](crate::UndoOutcome) and [`MoveOutcome`](crate::MoveOutcome).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error("cannot spawn a tile on a full grid")]
    SpawnOnFullGrid,

    #[error("cannot spawn {0}: tiles are powers of two of at least 2")]
    InvalidSpawnValue(u32),

    #[error("invalid grid dimensions {rows}x{cols} (need at least 2 cells)")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("four-tile probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error("cell {index} holds {value}, which is neither empty nor a power of two")]
    InvalidTile { index: usize, value: u32 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
