//! Planned move sequences.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::MoveError;

/// Longest sequence a session plays: the seed move plus 15 planned steps.
pub const MAX_MOVES: usize = 16;

/// Ordered moves, never empty, never longer than [`MAX_MOVES`], and never
/// containing a direction immediately followed by its opposite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Direction>", into = "Vec<Direction>")]
pub struct MoveSequence(Vec<Direction>);

impl MoveSequence {
    /// Validate and wrap a list of moves.
    pub fn new(moves: Vec<Direction>) -> Result<Self, MoveError> {
        if moves.is_empty() {
            return Err(MoveError::Empty);
        }
        if moves.len() > MAX_MOVES {
            return Err(MoveError::TooLong {
                len: moves.len(),
                max: MAX_MOVES,
            });
        }
        if let Some(index) = moves.windows(2).position(|w| w[1] == w[0].opposite()) {
            return Err(MoveError::Reversal {
                index: index + 1,
                previous: moves[index],
                next: moves[index + 1],
            });
        }
        Ok(Self(moves))
    }

    /// A sequence holding only the seed move.
    pub fn seed(direction: Direction) -> Self {
        Self(vec![direction])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<Direction> {
        self.0.get(step).copied()
    }

    pub fn as_slice(&self) -> &[Direction] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<Direction>> for MoveSequence {
    type Error = MoveError;

    fn try_from(moves: Vec<Direction>) -> Result<Self, Self::Error> {
        Self::new(moves)
    }
}

impl From<MoveSequence> for Vec<Direction> {
    fn from(seq: MoveSequence) -> Self {
        seq.0
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|d| d.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
