use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The four possible move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// All four directions, in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Convert a raw code (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn from_u8(value: u8) -> Result<Direction, EngineError> {
        match value {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(format!("code {value}"))),
        }
    }

    /// Convert a `(row, col)` delta pair. Exactly one component must be
    /// non-zero and it must be `1` or `-1`.
    pub fn from_delta(d_row: i8, d_col: i8) -> Result<Direction, EngineError> {
        match (d_row, d_col) {
            (-1, 0) => Ok(Direction::Up),
            (1, 0) => Ok(Direction::Down),
            (0, -1) => Ok(Direction::Left),
            (0, 1) => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(format!(
                "delta ({d_row}, {d_col})"
            ))),
        }
    }

    /// The `(row, col)` delta tiles travel along.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Whether lines run along rows (Left/Right) rather than columns.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "top" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(EngineError::InvalidDirection(format!("name {other:?}"))),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::from_u8(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8() {
        assert_eq!(Direction::from_u8(0), Ok(Direction::Up));
        assert_eq!(Direction::from_u8(1), Ok(Direction::Down));
        assert_eq!(Direction::from_u8(2), Ok(Direction::Left));
        assert_eq!(Direction::from_u8(3), Ok(Direction::Right));
        assert!(matches!(
            Direction::from_u8(4),
            Err(EngineError::InvalidDirection(_))
        ));
        assert!(Direction::from_u8(255).is_err());
    }

    #[test]
    fn test_delta_round_trip() {
        for dir in Direction::ALL {
            let (r, c) = dir.delta();
            assert_eq!(Direction::from_delta(r, c), Ok(dir));
        }
    }

    #[test]
    fn test_from_delta_rejects_non_unit_vectors() {
        assert!(Direction::from_delta(0, 0).is_err());
        assert!(Direction::from_delta(1, 1).is_err());
        assert!(Direction::from_delta(0, 2).is_err());
        assert!(Direction::from_delta(-2, 0).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" right ".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("top".parse::<Direction>(), Ok(Direction::Up));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_all_order_matches_codes() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }
}
