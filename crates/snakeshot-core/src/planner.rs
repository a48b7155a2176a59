//! Depth-bounded longest-walk move planner.
//!
//! From a seed cell and seed direction the planner walks the board, trying
//! every direction except the reversal of the previous move, and keeps the
//! longest walk it finds. Walks stop at walls, at the edge of the usable
//! bounds, or at the length cap.
//!
//! This is a greedy local search: it does not track visited cells and it
//! does not promise a globally longest path, only the best one in its fixed
//! exploration order. It performs no I/O and cannot fail.

use snakeshot_protocols::{Direction, GridMap, MAX_MOVES, MoveSequence, Position, StartCandidate};

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;

/// Plans a session's move sequence from two candidate seeds.
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner {
    max_len: usize,
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self { max_len: MAX_MOVES }
    }
}

impl PathPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a smaller cap. Clamped to `1..=MAX_MOVES`.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len: max_len.clamp(1, MAX_MOVES),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Explore both candidates and return the longer walk. Ties keep the first.
    pub fn plan(&self, map: &GridMap, candidates: &[StartCandidate; 2]) -> MoveSequence {
        let first = self.explore(map, candidates[0]);
        let second = self.explore(map, candidates[1]);
        if second.len() > first.len() {
            second
        } else {
            first
        }
    }

    /// Longest walk from a single seed.
    ///
    /// If the seed cell itself is not open the result is just the seed move.
    pub fn explore(&self, map: &GridMap, start: StartCandidate) -> MoveSequence {
        if !map.is_open(start.position) {
            return MoveSequence::seed(start.direction);
        }

        let mut path = vec![start.direction];
        let mut best = path.clone();
        self.walk(map, start.position, &mut path, &mut best);

        // `walk` only appends non-reversing moves and never exceeds the cap.
        MoveSequence::new(best).unwrap_or_else(|_| MoveSequence::seed(start.direction))
    }

    /// Depth-first search. `best` is replaced only by strictly longer walks,
    /// so the earliest walk of maximal length wins.
    fn walk(
        &self,
        map: &GridMap,
        from: Position,
        path: &mut Vec<Direction>,
        best: &mut Vec<Direction>,
    ) {
        if path.len() > best.len() {
            best.clone_from(path);
        }
        if path.len() >= self.max_len {
            return;
        }

        let Some(&last) = path.last() else {
            return;
        };
        for direction in Direction::EXPLORE_ORDER {
            if direction == last.opposite() {
                continue;
            }
            let next = from.step(direction);
            if !map.is_open(next) {
                continue;
            }

            path.push(direction);
            self.walk(map, next, path, best);
            path.pop();

            if best.len() >= self.max_len {
                return;
            }
        }
    }
}
