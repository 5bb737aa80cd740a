#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative race state for the Racetrack engine.
//!
//! The world owns the parsed track, every car, the current-car pointer, the
//! cheating marks and the winner. It only changes through [`apply`], and all
//! read access goes through the [`query`] module.

mod car;
mod error;
mod track;

use std::collections::BTreeSet;

use log::debug;
use racetrack_core::{
    rasterize, Command, Direction, Event, Rejection, SpaceType, StrategyKind, Vector, WinReason,
};

use car::Car;
pub use error::{TrackError, WorldError};
pub use track::{CarStart, Track};

/// Represents the authoritative state of a single race.
#[derive(Debug)]
pub struct World {
    track: Track,
    cars: Vec<Car>,
    strategies: Vec<Option<StrategyKind>>,
    current: usize,
    winner: Option<usize>,
    cheating: BTreeSet<usize>,
}

impl World {
    /// Creates a new world with every car on its starting cell.
    #[must_use]
    pub fn new(track: Track) -> Self {
        let cars: Vec<Car> = track
            .starts()
            .iter()
            .map(|start| Car::new(start.id(), start.position()))
            .collect();
        Self {
            strategies: vec![None; cars.len()],
            cars,
            track,
            current: 0,
            winner: None,
            cheating: BTreeSet::new(),
        }
    }

    /// Parses a track description and creates a world on it.
    pub fn parse(text: &str) -> Result<Self, TrackError> {
        Track::parse(text).map(Self::new)
    }

    fn check_index(&self, index: usize) -> Result<(), Rejection> {
        if index < self.cars.len() {
            Ok(())
        } else {
            Err(Rejection::CarIndexOutOfRange {
                index,
                count: self.cars.len(),
            })
        }
    }

    fn do_turn(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            reject(out_events, Rejection::RaceFinished);
            return;
        }
        let index = self.current;
        if self.cars[index].is_crashed() {
            reject(out_events, Rejection::CarCrashed { car: index });
            return;
        }

        self.cars[index].accelerate(direction);
        let from = self.cars[index].position();
        let velocity = self.cars[index].velocity();

        match self.sweep(index, from, velocity, out_events) {
            Sweep::Clear => {
                self.cars[index].advance();
                out_events.push(Event::CarMoved {
                    car: index,
                    from,
                    to: self.cars[index].position(),
                    velocity,
                });
            }
            Sweep::Crashed(at) => {
                debug!("car {index} crashed at {at}");
                self.cars[index].crash(at);
                out_events.push(Event::CarCrashed { car: index, at });
                self.declare_last_car_standing(out_events);
            }
            Sweep::Won(at) => {
                debug!("car {index} crossed the finish at {at}");
                self.cars[index].set_winning_position(at);
                self.declare_winner(index, WinReason::CrossedFinish, out_events);
            }
        }
    }

    /// Classifies every cell the car passes while travelling with `velocity`.
    fn sweep(
        &mut self,
        index: usize,
        from: Vector,
        velocity: Vector,
        out_events: &mut Vec<Event>,
    ) -> Sweep {
        if velocity.is_zero() {
            return Sweep::Clear;
        }

        let mut previous = from;
        for cell in rasterize(from, from + velocity) {
            match self.track.space_at(cell) {
                SpaceType::Wall => return Sweep::Crashed(cell),
                SpaceType::Track => {
                    if self.occupied_by_other(index, cell) {
                        return Sweep::Crashed(cell);
                    }
                }
                finish => {
                    if !finish.admits_crossing(previous, cell) {
                        if self.cheating.insert(index) {
                            debug!("car {index} crossed the finish the wrong way at {cell}");
                        }
                        out_events.push(Event::FinishCrossedWrongWay {
                            car: index,
                            at: cell,
                        });
                    } else if self.cheating.remove(&index) {
                        debug!("car {index} cancelled its wrong-way crossing at {cell}");
                        out_events.push(Event::CheatCancelled {
                            car: index,
                            at: cell,
                        });
                    } else {
                        return Sweep::Won(cell);
                    }
                }
            }
            previous = cell;
        }
        Sweep::Clear
    }

    fn occupied_by_other(&self, index: usize, cell: Vector) -> bool {
        self.cars
            .iter()
            .enumerate()
            .any(|(other, car)| other != index && !car.is_crashed() && car.position() == cell)
    }

    fn declare_last_car_standing(&mut self, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            return;
        }
        let active: Vec<usize> = self.active_indices().collect();
        if let [survivor] = active[..] {
            self.declare_winner(survivor, WinReason::LastCarStanding, out_events);
        }
    }

    fn declare_winner(&mut self, index: usize, reason: WinReason, out_events: &mut Vec<Event>) {
        self.winner = Some(index);
        out_events.push(Event::RaceWon {
            car: index,
            at: self.cars[index].position(),
            reason,
        });
    }

    fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cars
            .iter()
            .enumerate()
            .filter(|(_, car)| !car.is_crashed())
            .map(|(index, _)| index)
    }

    fn switch_to_next_active_car(&mut self, out_events: &mut Vec<Event>) {
        let count = self.cars.len();
        let next = (1..=count)
            .map(|offset| (self.current + offset) % count)
            .find(|&index| !self.cars[index].is_crashed());
        match next {
            Some(index) => {
                self.current = index;
                out_events.push(Event::ActiveCarChanged { car: index });
            }
            None => reject(out_events, Rejection::NoActiveCars),
        }
    }

    fn crash_car(&mut self, index: usize, at: Vector, out_events: &mut Vec<Event>) {
        if self.winner.is_some() {
            reject(out_events, Rejection::RaceFinished);
            return;
        }
        if self.cars[index].is_crashed() {
            reject(out_events, Rejection::CarCrashed { car: index });
            return;
        }
        self.cars[index].crash(at);
        out_events.push(Event::CarCrashed { car: index, at });
        self.declare_last_car_standing(out_events);
    }
}

enum Sweep {
    Clear,
    Crashed(Vector),
    Won(Vector),
}

fn reject(out_events: &mut Vec<Event>, reason: Rejection) {
    out_events.push(Event::CommandRejected { reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Accelerate { direction } => world.do_turn(direction, out_events),
        Command::SwitchToNextActiveCar => world.switch_to_next_active_car(out_events),
        Command::AssignStrategy { car, kind } => match world.check_index(car) {
            Ok(()) => {
                world.strategies[car] = Some(kind);
                out_events.push(Event::StrategyAssigned { car, kind });
            }
            Err(reason) => reject(out_events, reason),
        },
        Command::CrashCar { car, at } => match world.check_index(car) {
            Ok(()) => world.crash_car(car, at, out_events),
            Err(reason) => reject(out_events, reason),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use racetrack_core::{
        CarSnapshot, CarView, SpaceType, StrategyKind, Vector, CRASH_INDICATOR,
    };

    use super::{Track, World, WorldError};

    fn checked(world: &World, index: usize) -> Result<&super::Car, WorldError> {
        world.cars.get(index).ok_or(WorldError::CarIndexOutOfRange {
            index,
            count: world.cars.len(),
        })
    }

    /// Number of cars on the track.
    #[must_use]
    pub fn car_count(world: &World) -> usize {
        world.cars.len()
    }

    /// Index of the car whose turn it is.
    #[must_use]
    pub fn current_car_index(world: &World) -> usize {
        world.current
    }

    /// Copy of the state of the car at `index`.
    pub fn car(world: &World, index: usize) -> Result<CarSnapshot, WorldError> {
        checked(world, index).map(super::Car::snapshot)
    }

    /// Character identifying the car at `index`.
    pub fn car_id(world: &World, index: usize) -> Result<char, WorldError> {
        car(world, index).map(|snapshot| snapshot.id)
    }

    /// Current position of the car at `index`.
    pub fn car_position(world: &World, index: usize) -> Result<Vector, WorldError> {
        checked(world, index).map(super::Car::position)
    }

    /// Current velocity of the car at `index`.
    pub fn car_velocity(world: &World, index: usize) -> Result<Vector, WorldError> {
        checked(world, index).map(super::Car::velocity)
    }

    /// Reports whether the car at `index` has crashed.
    pub fn is_crashed(world: &World, index: usize) -> Result<bool, WorldError> {
        checked(world, index).map(super::Car::is_crashed)
    }

    /// Reports whether the car at `index` holds an uncancelled wrong-way crossing.
    pub fn is_cheating(world: &World, index: usize) -> Result<bool, WorldError> {
        checked(world, index).map(|_| world.cheating.contains(&index))
    }

    /// Captures a read-only view of every car in index order.
    #[must_use]
    pub fn car_view(world: &World) -> CarView {
        CarView::from_snapshots(world.cars.iter().map(super::Car::snapshot).collect())
    }

    /// Index of the winning car, once one has been declared.
    #[must_use]
    pub fn winner(world: &World) -> Option<usize> {
        world.winner
    }

    /// Provides read-only access to the parsed track.
    #[must_use]
    pub fn track(world: &World) -> &Track {
        &world.track
    }

    /// Space type at the position; positions outside the grid are walls.
    #[must_use]
    pub fn space_at(world: &World, position: Vector) -> SpaceType {
        world.track.space_at(position)
    }

    /// Planner variant recorded for the car at `index`, if any.
    pub fn strategy_kind(world: &World, index: usize) -> Result<Option<StrategyKind>, WorldError> {
        checked(world, index).map(|_| world.strategies[index])
    }

    /// Reports whether every car still racing is driven by the non-moving planner.
    ///
    /// Cars without a recorded planner count as moving.
    #[must_use]
    pub fn only_non_moving_remain(world: &World) -> bool {
        world
            .cars
            .iter()
            .zip(&world.strategies)
            .filter(|(car, _)| !car.is_crashed())
            .all(|(_, kind)| *kind == Some(StrategyKind::DoNotMove))
    }

    /// Draws the track with every car on it, one line per row.
    ///
    /// Crashed cars are shown as [`CRASH_INDICATOR`]. When several cars share
    /// a cell the lowest index is drawn.
    #[must_use]
    pub fn render(world: &World) -> String {
        let track = &world.track;
        let mut rendered = String::with_capacity((track.width() + 1) * track.height());
        for (offset, position) in track.positions().enumerate() {
            let occupant = world.cars.iter().find(|car| car.position() == position);
            let symbol = match occupant {
                Some(car) if car.is_crashed() => CRASH_INDICATOR,
                Some(car) => car.snapshot().id,
                None => track.space_at(position).symbol(),
            };
            rendered.push(symbol);
            if (offset + 1) % track.width() == 0 {
                rendered.push('\n');
            }
        }
        rendered
    }
}
