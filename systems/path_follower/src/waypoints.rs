use racetrack_core::Vector;
use thiserror::Error;

/// Reasons a waypoint file cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WaypointError {
    /// The file holds no non-blank line.
    #[error("waypoint list is empty")]
    Empty,
    /// A line does not match `(X:<digits>, Y:<digits>)`.
    #[error("line {line}: `{text}` is not a waypoint")]
    InvalidLine {
        /// One-based line number in the source text.
        line: usize,
        /// Offending text with surrounding whitespace removed.
        text: String,
    },
}

/// Ordered cells a follower must visit exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Waypoints {
    points: Vec<Vector>,
}

impl Waypoints {
    /// Creates a new waypoint list from decoded positions.
    #[must_use]
    pub fn new(points: Vec<Vector>) -> Self {
        Self { points }
    }

    /// Parses one `(X:<digits>, Y:<digits>)` entry per line, ignoring blank lines.
    pub fn parse(text: &str) -> Result<Self, WaypointError> {
        let mut points = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            let point = parse_entry(entry).ok_or_else(|| WaypointError::InvalidLine {
                line: number + 1,
                text: entry.to_owned(),
            })?;
            points.push(point);
        }

        if points.is_empty() {
            return Err(WaypointError::Empty);
        }
        Ok(Self { points })
    }

    /// Iterator over the waypoints in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = &Vector> {
        self.points.iter()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the list holds no waypoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn parse_entry(entry: &str) -> Option<Vector> {
    let inner = entry.strip_prefix("(X:")?.strip_suffix(')')?;
    let (x, rest) = inner.split_once(',')?;
    let y = rest.trim_start().strip_prefix("Y:")?;
    Some(Vector::new(parse_digits(x)?, parse_digits(y)?))
}

fn parse_digits(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
