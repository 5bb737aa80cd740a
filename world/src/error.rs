use thiserror::Error;

/// Reasons a track description cannot be turned into a [`crate::Track`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The input holds no non-blank line.
    #[error("track contains no rows")]
    Empty,
    /// A row is wider or narrower than the first row.
    #[error("track row {row} has {found} cells but the first row has {expected}")]
    RaggedRows {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// No car starting cell was found.
    #[error("track contains no cars")]
    NoCars,
    /// More cars than the engine supports were found.
    #[error("track contains {count} cars but at most {} are supported", racetrack_core::MAX_CARS)]
    TooManyCars {
        /// Number of cars found on the track.
        count: usize,
    },
    /// Two starting cells use the same car character.
    #[error("car id `{id}` appears more than once")]
    DuplicateCarId {
        /// Repeated car character.
        id: char,
    },
}

/// Errors raised by world queries and helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A car index outside `0..count` was supplied.
    #[error("car index {index} is out of range for {count} cars")]
    CarIndexOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of cars on the track.
        count: usize,
    },
}
