#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Minimum-turn planner that drives a car onto a correctly crossed finish cell.
//!
//! Two searches are available. [`Search::Cells`] relaxes one best arrival per
//! grid cell, requiring that every move leaves room to brake inside the track.
//! [`Search::States`] explores every reachable position and velocity pair and
//! follows the turn engine's crossing rules exactly. Both ignore other cars.

mod cells;
mod states;

use std::{fmt, str::FromStr};

use log::{info, warn};
use racetrack_core::{Direction, MoveStrategy, StrategyKind, Vector};
use racetrack_world::{query, Track, World, WorldError};
use thiserror::Error;

/// Search strategy used to compute the plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Search {
    /// Cell-indexed relaxation with a braking envelope check.
    #[default]
    Cells,
    /// Breadth-first search over position and velocity.
    States,
}

impl Search {
    /// Lower-case name used by configuration files and flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cells => "cells",
            Self::States => "states",
        }
    }
}

impl fmt::Display for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`Search`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{0}` is not a search strategy, expected `cells` or `states`")]
pub struct ParseSearchError(String);

impl FromStr for Search {
    type Err = ParseSearchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cells" => Ok(Self::Cells),
            "states" => Ok(Self::States),
            other => Err(ParseSearchError(other.to_owned())),
        }
    }
}

/// Planner replaying a precomputed minimum-turn route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathFinder {
    // Last turn first; moves are popped from the tail.
    reversed: Vec<Direction>,
}

impl PathFinder {
    /// Plans a route for a car standing still on `start`.
    ///
    /// When no finish cell is reachable the plan is empty and the planner
    /// coasts forever.
    #[must_use]
    pub fn plan(track: &Track, start: Vector, search: Search) -> Self {
        let reversed = match search {
            Search::Cells => cells::plan_reversed(track, start),
            Search::States => states::plan_reversed(track, start),
        };
        if reversed.is_empty() {
            warn!("no route to the finish from {start} using {search} search");
        } else {
            info!(
                "planned {} turns from {start} using {search} search",
                reversed.len()
            );
        }
        Self { reversed }
    }

    /// Plans a route for the car at `index` from its current position.
    pub fn for_car(world: &World, index: usize, search: Search) -> Result<Self, WorldError> {
        let start = query::car_position(world, index)?;
        Ok(Self::plan(query::track(world), start, search))
    }

    /// Number of turns the remaining plan takes.
    #[must_use]
    pub fn planned_turns(&self) -> usize {
        self.reversed.len()
    }

    /// Iterator over the remaining moves in the order they will be played.
    pub fn moves(&self) -> impl Iterator<Item = Direction> + '_ {
        self.reversed.iter().rev().copied()
    }
}

impl MoveStrategy for PathFinder {
    fn next_move(&mut self) -> Direction {
        self.reversed.pop().unwrap_or(Direction::None)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::PathFinder
    }
}
