#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round-robin race driver.
//!
//! The race asks the current car's planner for an acceleration, applies it to
//! the world and then checks for a winner or a stalemate before handing the
//! turn to the next car that has not crashed.

use log::info;
use racetrack_core::{Command, Event, MoveStrategy, StrategyKind};
use racetrack_world::{self as world, query, World, WorldError};
use serde::Serialize;
use thiserror::Error;

/// Number of turns after which a race is abandoned unless configured otherwise.
pub const DEFAULT_TURN_LIMIT: usize = 1000;

/// Final result of a race.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RaceOutcome {
    /// A car won the race.
    Winner {
        /// Index of the winning car.
        car: usize,
        /// Character identifying the winning car.
        id: char,
        /// Number of turns the winning car played.
        turns: usize,
    },
    /// Every car still racing is parked for good.
    Tie,
    /// The race was abandoned after the turn limit.
    TurnLimitReached {
        /// Total number of turns played.
        turns: usize,
    },
}

/// Reasons a race cannot be run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RaceError {
    /// The number of planners differs from the number of cars.
    #[error("track has {cars} cars but {strategies} strategies were supplied")]
    StrategyCountMismatch {
        /// Number of cars on the track.
        cars: usize,
        /// Number of planners supplied.
        strategies: usize,
    },
    /// Every car would be driven by the non-moving planner.
    #[error("at least one car must be driven by a moving strategy")]
    OnlyStationaryCars,
    /// A world query failed.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Drives the planners of every car through a race.
pub struct Race {
    strategies: Vec<Box<dyn MoveStrategy>>,
    turns: Vec<usize>,
    turn_limit: usize,
}

impl Race {
    /// Creates a new race with one planner per car, in car index order.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn MoveStrategy>>) -> Self {
        Self {
            turns: vec![0; strategies.len()],
            strategies,
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }

    /// Replaces the total number of turns after which the race is abandoned.
    #[must_use]
    pub fn with_turn_limit(mut self, turn_limit: usize) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    /// Turns played so far by the car at `index`.
    #[must_use]
    pub fn turns(&self, index: usize) -> Option<usize> {
        self.turns.get(index).copied()
    }

    /// Runs the race to completion.
    ///
    /// The observer is called after every turn with the events that turn
    /// produced.
    pub fn run<F>(&mut self, world: &mut World, mut observer: F) -> Result<RaceOutcome, RaceError>
    where
        F: FnMut(&World, &[Event]),
    {
        let cars = query::car_count(world);
        if cars != self.strategies.len() {
            return Err(RaceError::StrategyCountMismatch {
                cars,
                strategies: self.strategies.len(),
            });
        }
        if self
            .strategies
            .iter()
            .all(|strategy| strategy.kind() == StrategyKind::DoNotMove)
        {
            return Err(RaceError::OnlyStationaryCars);
        }

        let mut events = Vec::new();
        for (car, strategy) in self.strategies.iter().enumerate() {
            world::apply(
                world,
                Command::AssignStrategy {
                    car,
                    kind: strategy.kind(),
                },
                &mut events,
            );
        }
        info!("race started with {cars} cars");

        let mut played = 0;
        let outcome = loop {
            if played == self.turn_limit {
                break RaceOutcome::TurnLimitReached { turns: played };
            }

            let car = query::current_car_index(world);
            let direction = self.strategies[car].next_move();
            events.clear();
            world::apply(world, Command::Accelerate { direction }, &mut events);
            self.turns[car] += 1;
            played += 1;
            observer(world, &events);

            if let Some(winner) = query::winner(world) {
                break RaceOutcome::Winner {
                    car: winner,
                    id: query::car_id(world, winner)?,
                    turns: self.turns[winner],
                };
            }
            if query::only_non_moving_remain(world) {
                break RaceOutcome::Tie;
            }

            events.clear();
            world::apply(world, Command::SwitchToNextActiveCar, &mut events);
        };

        info!("race finished after {played} turns: {outcome:?}");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{Race, RaceError, RaceOutcome};
    use racetrack_core::{Direction, DoNotMove, MoveStrategy, StrategyKind};
    use racetrack_world::World;

    const LANE: &str = "#######\n#<  a #\n#   b #\n#######";

    struct Scripted(Vec<Direction>);

    impl MoveStrategy for Scripted {
        fn next_move(&mut self) -> Direction {
            self.0.pop().unwrap_or(Direction::None)
        }

        fn kind(&self) -> StrategyKind {
            StrategyKind::MoveList
        }
    }

    #[test]
    fn rejects_strategy_count_mismatch() {
        let mut world = World::parse(LANE).expect("valid track");
        let mut race = Race::new(vec![Box::new(Scripted(Vec::new()))]);
        assert_eq!(
            race.run(&mut world, |_, _| {}),
            Err(RaceError::StrategyCountMismatch {
                cars: 2,
                strategies: 1,
            })
        );
    }

    #[test]
    fn rejects_races_without_moving_cars() {
        let mut world = World::parse(LANE).expect("valid track");
        let mut race = Race::new(vec![Box::new(DoNotMove), Box::new(DoNotMove)]);
        assert_eq!(
            race.run(&mut world, |_, _| {}),
            Err(RaceError::OnlyStationaryCars)
        );
    }

    #[test]
    fn counts_turns_per_car() {
        let mut world = World::parse(LANE).expect("valid track");
        let mut race = Race::new(vec![
            Box::new(Scripted(vec![Direction::Left, Direction::Left])),
            Box::new(Scripted(Vec::new())),
        ]);
        let outcome = race.run(&mut world, |_, _| {}).expect("race runs");
        assert_eq!(
            outcome,
            RaceOutcome::Winner {
                car: 0,
                id: 'a',
                turns: 2,
            }
        );
        assert_eq!(race.turns(0), Some(2));
        assert_eq!(race.turns(1), Some(1));
        assert_eq!(race.turns(2), None);
    }
}
