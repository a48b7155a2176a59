//! Game board model.

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::GridError;

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Wall,
}

impl Cell {
    /// Decode the server's numeric encoding (0 = empty, 1 = wall).
    pub fn from_code(code: i64) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            _ => None,
        }
    }
}

/// A (row, column) coordinate. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring position one move away.
    pub fn step(self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        Position::new(self.row + dr, self.col + dc)
    }
}

/// Inclusive usable area of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl Bounds {
    pub fn new(min_row: i32, max_row: i32, min_col: i32, max_col: i32) -> Result<Self, GridError> {
        if min_row > max_row || min_col > max_col {
            return Err(GridError::InvalidBounds(format!(
                "rows {}..={} / cols {}..={}",
                min_row, max_row, min_col, max_col
            )));
        }
        Ok(Self {
            min_row,
            max_row,
            min_col,
            max_col,
        })
    }

    /// Bounds spanning a whole `rows` x `cols` grid.
    pub fn covering(rows: usize, cols: usize) -> Self {
        Self {
            min_row: 0,
            max_row: rows as i32 - 1,
            min_col: 0,
            max_col: cols as i32 - 1,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= self.min_row
            && pos.row <= self.max_row
            && pos.col >= self.min_col
            && pos.col <= self.max_col
    }
}

/// Rectangular board of empty and wall cells with its usable bounds.
///
/// Immutable once built; a session receives one from the server and only
/// reads it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    cells: Vec<Vec<Cell>>,
    bounds: Bounds,
}

impl GridMap {
    /// Build a map from rows of cells. Rows must be non-empty and equally long.
    pub fn from_rows(cells: Vec<Vec<Cell>>, bounds: Bounds) -> Result<Self, GridError> {
        let expected = cells.first().map(Vec::len).ok_or(GridError::Empty)?;
        if expected == 0 {
            return Err(GridError::Empty);
        }
        for (row, line) in cells.iter().enumerate() {
            if line.len() != expected {
                return Err(GridError::Ragged {
                    row,
                    expected,
                    actual: line.len(),
                });
            }
        }
        Ok(Self { cells, bounds })
    }

    /// Build a map from the server's 0/1 encoding.
    pub fn from_codes(codes: &[Vec<i64>], bounds: Bounds) -> Result<Self, GridError> {
        let mut cells = Vec::with_capacity(codes.len());
        for (row, line) in codes.iter().enumerate() {
            let mut decoded = Vec::with_capacity(line.len());
            for (col, &value) in line.iter().enumerate() {
                let cell =
                    Cell::from_code(value).ok_or(GridError::InvalidCell { row, col, value })?;
                decoded.push(cell);
            }
            cells.push(decoded);
        }
        Self::from_rows(cells, bounds)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Cell at `pos`, or `None` outside the stored grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        self.cells
            .get(pos.row as usize)
            .and_then(|line| line.get(pos.col as usize))
            .copied()
    }

    /// Whether a snake head may occupy `pos`.
    pub fn is_open(&self, pos: Position) -> bool {
        self.bounds.contains(pos) && self.cell(pos) == Some(Cell::Empty)
    }
}

/// A planning seed: the cell reached by the seed move, and that move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCandidate {
    pub position: Position,
    pub direction: Direction,
}

impl StartCandidate {
    pub fn new(row: i32, col: i32, direction: Direction) -> Self {
        Self {
            position: Position::new(row, col),
            direction,
        }
    }
}
