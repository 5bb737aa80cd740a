#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Replays a pre-recorded list of accelerations.

use std::collections::VecDeque;

use racetrack_core::{Direction, MoveStrategy, StrategyKind};
use thiserror::Error;

/// Reasons a move file cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveListError {
    /// The file holds no non-blank line.
    #[error("move list is empty")]
    Empty,
    /// A line does not name a direction.
    #[error("line {line}: `{text}` is not a valid move")]
    InvalidMove {
        /// One-based line number in the source text.
        line: usize,
        /// Offending text with surrounding whitespace removed.
        text: String,
    },
}

/// Planner that dequeues recorded accelerations and coasts once they run out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: VecDeque<Direction>,
}

impl MoveList {
    /// Creates a new move list from already decoded accelerations.
    #[must_use]
    pub fn new(moves: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    /// Parses one direction name per line, ignoring blank lines.
    pub fn parse(text: &str) -> Result<Self, MoveListError> {
        let mut moves = VecDeque::new();
        for (number, line) in text.lines().enumerate() {
            let name = line.trim();
            if name.is_empty() {
                continue;
            }
            let direction = name
                .parse::<Direction>()
                .map_err(|_| MoveListError::InvalidMove {
                    line: number + 1,
                    text: name.to_owned(),
                })?;
            moves.push_back(direction);
        }

        if moves.is_empty() {
            return Err(MoveListError::Empty);
        }
        Ok(Self { moves })
    }

    /// Number of recorded moves that have not been replayed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveStrategy for MoveList {
    fn next_move(&mut self) -> Direction {
        self.moves.pop_front().unwrap_or(Direction::None)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::MoveList
    }
}
