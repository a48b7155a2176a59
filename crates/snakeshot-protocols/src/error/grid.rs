//! Board and move model errors.

use thiserror::Error;

use crate::direction::Direction;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Grid has no rows")]
    Empty,

    #[error("Grid row {row} has {actual} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid cell value {value} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, value: i64 },

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Unknown direction: {0}")]
    UnknownDirection(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("Move sequence is empty")]
    Empty,

    #[error("Move sequence has {len} moves, at most {max} allowed")]
    TooLong { len: usize, max: usize },

    #[error("Move {index} reverses {previous} into {next}")]
    Reversal {
        index: usize,
        previous: Direction,
        next: Direction,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_error_display() {
        let err = GridError::Ragged {
            row: 2,
            expected: 14,
            actual: 13,
        };
        let display = err.to_string();
        assert!(display.contains("row 2"));
        assert!(display.contains("expected 14"));
    }

    #[test]
    fn test_reversal_error_display() {
        let err = MoveError::Reversal {
            index: 3,
            previous: Direction::Up,
            next: Direction::Down,
        };
        assert_eq!(err.to_string(), "Move 3 reverses up into down");
    }
}
