#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy planner that steers a car through an ordered list of waypoints.
//!
//! The plan is computed once from the car's start position. On every simulated
//! turn the planner picks the acceleration whose braking extent lands closest
//! to the next waypoint, keeping the current velocity unless a direction is
//! strictly better.

mod waypoints;

use std::collections::VecDeque;

use log::{info, warn};
use racetrack_core::{Direction, MoveStrategy, StrategyKind, Vector};
use thiserror::Error;

pub use waypoints::{WaypointError, Waypoints};

/// Maximum number of turns spent approaching a single waypoint.
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// Reasons a waypoint plan cannot be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FollowerError {
    /// A waypoint was not reached within the step limit.
    #[error("waypoint {waypoint} was not reached within {steps} turns")]
    Infeasible {
        /// Waypoint that could not be reached.
        waypoint: Vector,
        /// Step limit that was exhausted.
        steps: usize,
    },
}

/// Planner replaying an acceleration sequence computed from waypoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathFollower {
    moves: VecDeque<Direction>,
}

impl PathFollower {
    /// Plans a route from `start` through every waypoint in order.
    pub fn plan(start: Vector, waypoints: &Waypoints) -> Result<Self, FollowerError> {
        Self::plan_with_limit(start, waypoints, DEFAULT_STEP_LIMIT)
    }

    /// Plans a route, allowing at most `limit` turns per waypoint.
    pub fn plan_with_limit(
        start: Vector,
        waypoints: &Waypoints,
        limit: usize,
    ) -> Result<Self, FollowerError> {
        let mut moves = VecDeque::new();
        let mut position = start;
        let mut velocity = Vector::ZERO;

        for &waypoint in waypoints.iter() {
            let mut steps = 0;
            while position != waypoint {
                if steps == limit {
                    warn!("waypoint {waypoint} unreachable from {position}");
                    return Err(FollowerError::Infeasible {
                        waypoint,
                        steps: limit,
                    });
                }
                let direction = choose_acceleration(velocity, waypoint - position);
                moves.push_back(direction);
                velocity += direction.vector();
                position += velocity;
                steps += 1;
            }
        }

        info!(
            "planned {} moves through {} waypoints",
            moves.len(),
            waypoints.len()
        );
        Ok(Self { moves })
    }

    /// Number of planned moves not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }

    /// Iterator over the planned moves that have not been handed out yet.
    pub fn moves(&self) -> impl Iterator<Item = Direction> + '_ {
        self.moves.iter().copied()
    }
}

/// Distance between where braking from `velocity` ends and the target offset.
fn slack(velocity: Vector, want: Vector) -> i32 {
    (velocity.braking_extent() - want).manhattan_length()
}

fn choose_acceleration(velocity: Vector, want: Vector) -> Direction {
    let mut best = slack(velocity, want);
    let mut choice = Direction::None;
    for direction in Direction::ALL {
        let candidate = slack(velocity + direction.vector(), want);
        if candidate < best {
            best = candidate;
            choice = direction;
        }
    }
    choice
}

impl MoveStrategy for PathFollower {
    fn next_move(&mut self) -> Direction {
        self.moves.pop_front().unwrap_or(Direction::None)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::PathFollower
    }
}
