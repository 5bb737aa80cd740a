#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Racetrack engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure planning systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! happened during the turn. Planners implement [`MoveStrategy`] and only ever
//! answer with the next [`Direction`] to accelerate in.

mod line;

use std::{
    fmt,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use line::rasterize;

/// Maximum number of cars a single track may declare.
pub const MAX_CARS: usize = 9;

/// Character drawn in place of a crashed car when rendering the track.
pub const CRASH_INDICATOR: char = 'X';

/// Signed integer vector on the track grid. The y-axis grows downward.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Vector {
    x: i32,
    y: i32,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Component-wise sign, each axis mapped to -1, 0 or 1.
    #[must_use]
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// Sum of the absolute values of both components.
    #[must_use]
    pub const fn manhattan_length(self) -> i32 {
        self.x.abs() + self.y.abs()
    }

    /// Distance travelled on each axis while braking this velocity to zero.
    ///
    /// Every component decelerates by one unit per turn, so a component `n`
    /// covers the triangular number `n * (|n| + 1) / 2` cells, keeping its sign.
    #[must_use]
    pub const fn braking_extent(self) -> Self {
        Self::new(triangular(self.x), triangular(self.y))
    }
}

const fn triangular(n: i32) -> i32 {
    n * (n.abs() + 1) / 2
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(X:{}, Y:{})", self.x, self.y)
    }
}

/// One of the nine unit accelerations a car may apply during its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Accelerate toward decreasing columns and increasing rows.
    DownLeft,
    /// Accelerate toward increasing rows.
    Down,
    /// Accelerate toward increasing columns and rows.
    DownRight,
    /// Accelerate toward decreasing columns.
    Left,
    /// Keep the current velocity.
    None,
    /// Accelerate toward increasing columns.
    Right,
    /// Accelerate toward decreasing columns and rows.
    UpLeft,
    /// Accelerate toward decreasing rows.
    Up,
    /// Accelerate toward increasing columns and decreasing rows.
    UpRight,
}

impl Direction {
    /// All directions in keypad order. Planners break ties in this order.
    pub const ALL: [Direction; 9] = [
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
        Direction::Left,
        Direction::None,
        Direction::Right,
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
    ];

    /// Unit acceleration vector represented by the direction.
    #[must_use]
    pub const fn vector(self) -> Vector {
        match self {
            Self::DownLeft => Vector::new(-1, 1),
            Self::Down => Vector::new(0, 1),
            Self::DownRight => Vector::new(1, 1),
            Self::Left => Vector::new(-1, 0),
            Self::None => Vector::new(0, 0),
            Self::Right => Vector::new(1, 0),
            Self::UpLeft => Vector::new(-1, -1),
            Self::Up => Vector::new(0, -1),
            Self::UpRight => Vector::new(1, -1),
        }
    }

    /// Canonical upper-case name used by move-list files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DownLeft => "DOWN_LEFT",
            Self::Down => "DOWN",
            Self::DownRight => "DOWN_RIGHT",
            Self::Left => "LEFT",
            Self::None => "NONE",
            Self::Right => "RIGHT",
            Self::UpLeft => "UP_LEFT",
            Self::Up => "UP",
            Self::UpRight => "UP_RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`Direction`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{0}` is not a valid direction")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.name() == value)
            .ok_or_else(|| ParseDirectionError(value.to_owned()))
    }
}

/// Type of a single cell of the track grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceType {
    /// Off-track space; entering it crashes the car.
    Wall,
    /// Open road.
    Track,
    /// Finish line that must be crossed moving up.
    FinishUp,
    /// Finish line that must be crossed moving down.
    FinishDown,
    /// Finish line that must be crossed moving left.
    FinishLeft,
    /// Finish line that must be crossed moving right.
    FinishRight,
}

impl SpaceType {
    /// Maps a track file character to its space type.
    ///
    /// Returns `None` for characters that denote a car start.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Track),
            '^' => Some(Self::FinishUp),
            'v' => Some(Self::FinishDown),
            '<' => Some(Self::FinishLeft),
            '>' => Some(Self::FinishRight),
            _ => None,
        }
    }

    /// Character used for the space in track files and renders.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Track => ' ',
            Self::FinishUp => '^',
            Self::FinishDown => 'v',
            Self::FinishLeft => '<',
            Self::FinishRight => '>',
        }
    }

    /// Reports whether the space is one of the four finish types.
    #[must_use]
    pub const fn is_finish(self) -> bool {
        matches!(
            self,
            Self::FinishUp | Self::FinishDown | Self::FinishLeft | Self::FinishRight
        )
    }

    /// Reports whether stepping from `previous` onto `cell` crosses this
    /// finish space in its own direction.
    ///
    /// Non-finish spaces never admit a crossing.
    #[must_use]
    pub const fn admits_crossing(self, previous: Vector, cell: Vector) -> bool {
        match self {
            Self::FinishUp => previous.y() > cell.y(),
            Self::FinishDown => previous.y() < cell.y(),
            Self::FinishLeft => previous.x() > cell.x(),
            Self::FinishRight => previous.x() < cell.x(),
            Self::Wall | Self::Track => false,
        }
    }

    /// Reports whether a car travelling with `velocity` may sweep over this
    /// space without moving against a finish line.
    ///
    /// Walls never admit a velocity and open track always does.
    #[must_use]
    pub const fn admits_velocity(self, velocity: Vector) -> bool {
        match self {
            Self::Wall => false,
            Self::Track => true,
            Self::FinishUp => velocity.y() <= 0,
            Self::FinishDown => velocity.y() >= 0,
            Self::FinishLeft => velocity.x() <= 0,
            Self::FinishRight => velocity.x() >= 0,
        }
    }
}

/// Planner variant driving a car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// A human picks every acceleration.
    User,
    /// Accelerations replayed from a pre-recorded list.
    MoveList,
    /// The car never accelerates.
    DoNotMove,
    /// Greedy pursuit of an ordered list of waypoints.
    PathFollower,
    /// Minimum-turn search toward the finish line.
    PathFinder,
}

/// Source of accelerations for a single car.
///
/// Returning [`Direction::None`] means the planner has no opinion and the car
/// coasts with its current velocity.
pub trait MoveStrategy {
    /// Produces the acceleration for the car's next turn.
    fn next_move(&mut self) -> Direction;

    /// Variant of the planner, used to detect races that can no longer end.
    fn kind(&self) -> StrategyKind;
}

/// Planner that never accelerates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DoNotMove;

impl MoveStrategy for DoNotMove {
    fn next_move(&mut self) -> Direction {
        Direction::None
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::DoNotMove
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Executes one turn for the current car using the provided acceleration.
    Accelerate {
        /// Acceleration added to the current car's velocity.
        direction: Direction,
    },
    /// Hands the turn to the next car that has not crashed.
    SwitchToNextActiveCar,
    /// Records which planner variant drives a car.
    AssignStrategy {
        /// Zero-based index of the car.
        car: usize,
        /// Variant of the planner that drives the car.
        kind: StrategyKind,
    },
    /// Disqualifies a car, leaving it crashed at the provided position.
    CrashCar {
        /// Zero-based index of the car.
        car: usize,
        /// Cell the crashed car is left on.
        at: Vector,
    },
}

/// Why a car was declared the winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinReason {
    /// The car crossed a finish cell in the correct direction.
    CrossedFinish,
    /// Every other car crashed.
    LastCarStanding,
}

/// Reasons a command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The command referenced a car index outside `0..count`.
    CarIndexOutOfRange {
        /// Index supplied with the command.
        index: usize,
        /// Number of cars on the track.
        count: usize,
    },
    /// A winner has already been declared.
    RaceFinished,
    /// The car whose turn it is has crashed.
    CarCrashed {
        /// Index of the crashed car.
        car: usize,
    },
    /// Every car has crashed, so no car can take the turn.
    NoActiveCars,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A car completed its move without incident.
    CarMoved {
        /// Index of the car that moved.
        car: usize,
        /// Cell the car occupied before the move.
        from: Vector,
        /// Cell the car occupies after the move.
        to: Vector,
        /// Velocity used for the move.
        velocity: Vector,
    },
    /// A car hit a wall or another car.
    CarCrashed {
        /// Index of the car that crashed.
        car: usize,
        /// Cell where the crash happened.
        at: Vector,
    },
    /// A car swept over a finish cell against its direction.
    FinishCrossedWrongWay {
        /// Index of the car.
        car: usize,
        /// Finish cell that was crossed.
        at: Vector,
    },
    /// A correct crossing cancelled an earlier wrong-way crossing.
    CheatCancelled {
        /// Index of the car.
        car: usize,
        /// Finish cell that was crossed.
        at: Vector,
    },
    /// The race has a winner.
    RaceWon {
        /// Index of the winning car.
        car: usize,
        /// Position of the winning car.
        at: Vector,
        /// Rule that decided the race.
        reason: WinReason,
    },
    /// The turn passed to another car.
    ActiveCarChanged {
        /// Index of the car whose turn it is now.
        car: usize,
    },
    /// A planner variant was recorded for a car.
    StrategyAssigned {
        /// Index of the car.
        car: usize,
        /// Recorded planner variant.
        kind: StrategyKind,
    },
    /// A command was ignored without mutating the world.
    CommandRejected {
        /// Specific reason the command was ignored.
        reason: Rejection,
    },
}

/// Immutable copy of a single car's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSnapshot {
    /// Character identifying the car on the track.
    pub id: char,
    /// Cell the car currently occupies.
    pub position: Vector,
    /// Current velocity of the car.
    pub velocity: Vector,
    /// Whether the car has crashed.
    pub crashed: bool,
}

/// Read-only snapshot describing every car on the track.
#[derive(Clone, Debug, Default)]
pub struct CarView {
    snapshots: Vec<CarSnapshot>,
}

impl CarView {
    /// Creates a new car view from snapshots ordered by car index.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<CarSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in car index order.
    pub fn iter(&self) -> impl Iterator<Item = &CarSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CarSnapshot> {
        self.snapshots
    }
}
