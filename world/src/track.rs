use std::collections::HashSet;

use racetrack_core::{SpaceType, Vector, MAX_CARS};

use crate::TrackError;

/// Starting cell declared for a car in the track description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarStart {
    id: char,
    position: Vector,
}

impl CarStart {
    /// Character identifying the car.
    #[must_use]
    pub const fn id(&self) -> char {
        self.id
    }

    /// Cell the car starts on.
    #[must_use]
    pub const fn position(&self) -> Vector {
        self.position
    }
}

/// Rectangular grid of typed cells together with the starting roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    width: usize,
    height: usize,
    spaces: Vec<SpaceType>,
    starts: Vec<CarStart>,
}

impl Track {
    /// Parses a textual track description.
    ///
    /// Blank lines before the first row are skipped and the first blank line
    /// after it ends the track. Every character that is not reserved for a
    /// space type declares a car start on open track.
    pub fn parse(text: &str) -> Result<Self, TrackError> {
        let rows: Vec<&str> = text
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .take_while(|line| !line.trim().is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(TrackError::Empty);
        };
        let width = first.chars().count();

        let mut spaces = Vec::with_capacity(width * rows.len());
        let mut starts = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(TrackError::RaggedRows {
                    row,
                    expected: width,
                    found,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                match SpaceType::from_symbol(symbol) {
                    Some(space) => spaces.push(space),
                    None => {
                        starts.push(CarStart {
                            id: symbol,
                            position: Vector::new(to_coordinate(column), to_coordinate(row)),
                        });
                        spaces.push(SpaceType::Track);
                    }
                }
            }
        }

        if starts.is_empty() {
            return Err(TrackError::NoCars);
        }
        if starts.len() > MAX_CARS {
            return Err(TrackError::TooManyCars {
                count: starts.len(),
            });
        }
        let mut seen = HashSet::with_capacity(starts.len());
        if let Some(duplicate) = starts.iter().find(|start| !seen.insert(start.id)) {
            return Err(TrackError::DuplicateCarId { id: duplicate.id });
        }

        Ok(Self {
            width,
            height: rows.len(),
            spaces,
            starts,
        })
    }

    /// Number of cells per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Car starts in the order they appear, left to right and top to bottom.
    #[must_use]
    pub fn starts(&self) -> &[CarStart] {
        &self.starts
    }

    /// Reports whether the position lies inside the bounding box.
    #[must_use]
    pub fn contains(&self, position: Vector) -> bool {
        self.index(position).is_some()
    }

    /// Space type at the position; everything outside the grid is a wall.
    #[must_use]
    pub fn space_at(&self, position: Vector) -> SpaceType {
        self.index(position)
            .map_or(SpaceType::Wall, |index| self.spaces[index])
    }

    /// Iterator over every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).map(move |column| {
                Vector::new(to_coordinate(column), to_coordinate(row))
            })
        })
    }

    fn index(&self, position: Vector) -> Option<usize> {
        let column = usize::try_from(position.x()).ok()?;
        let row = usize::try_from(position.y()).ok()?;
        (column < self.width && row < self.height).then(|| row * self.width + column)
    }
}

fn to_coordinate(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::Track;
    use crate::TrackError;
    use racetrack_core::{SpaceType, Vector};

    const SMALL: &str = "#####\n#a >#\n#^ b#\n#####";

    #[test]
    fn parses_spaces_and_cars() {
        let track = Track::parse(SMALL).expect("valid track");
        assert_eq!(track.width(), 5);
        assert_eq!(track.height(), 4);
        assert_eq!(track.space_at(Vector::new(0, 0)), SpaceType::Wall);
        assert_eq!(track.space_at(Vector::new(1, 1)), SpaceType::Track);
        assert_eq!(track.space_at(Vector::new(3, 1)), SpaceType::FinishRight);
        assert_eq!(track.space_at(Vector::new(1, 2)), SpaceType::FinishUp);

        let starts: Vec<_> = track
            .starts()
            .iter()
            .map(|start| (start.id(), start.position()))
            .collect();
        assert_eq!(
            starts,
            vec![('a', Vector::new(1, 1)), ('b', Vector::new(3, 2))]
        );
    }

    #[test]
    fn positions_outside_the_grid_are_walls() {
        let track = Track::parse("a ").expect("valid track");
        for position in [
            Vector::new(-1, 0),
            Vector::new(2, 0),
            Vector::new(0, -1),
            Vector::new(0, 1),
            Vector::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(track.space_at(position), SpaceType::Wall);
            assert!(!track.contains(position));
        }
        assert_eq!(track.space_at(Vector::new(1, 0)), SpaceType::Track);
    }

    #[test]
    fn leading_blank_lines_are_skipped_and_trailing_content_ignored() {
        let track = Track::parse("\n   \n# a#\n#  #\n\n#b#\n").expect("valid track");
        assert_eq!(track.height(), 2);
        assert_eq!(track.starts().len(), 1);
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let track = Track::parse("#a#\r\n# #\r\n").expect("valid track");
        assert_eq!(track.width(), 3);
        assert_eq!(track.height(), 2);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Track::parse(""), Err(TrackError::Empty));
        assert_eq!(Track::parse("\n  \n"), Err(TrackError::Empty));
    }

    #[test]
    fn rejects_ragged_rows() {
        assert_eq!(
            Track::parse("#a#\n#\n"),
            Err(TrackError::RaggedRows {
                row: 1,
                expected: 3,
                found: 1,
            })
        );
    }

    #[test]
    fn rejects_tracks_without_cars() {
        assert_eq!(Track::parse("###\n# #\n###"), Err(TrackError::NoCars));
    }

    #[test]
    fn rejects_too_many_cars() {
        assert_eq!(
            Track::parse("#abcdefghij#"),
            Err(TrackError::TooManyCars { count: 10 })
        );
    }

    #[test]
    fn accepts_maximum_car_count() {
        let track = Track::parse("#abcdefghi#").expect("nine cars are allowed");
        assert_eq!(track.starts().len(), 9);
    }

    #[test]
    fn rejects_duplicate_car_ids() {
        assert_eq!(
            Track::parse("#a b a#"),
            Err(TrackError::DuplicateCarId { id: 'a' })
        );
    }

    #[test]
    fn positions_are_row_major() {
        let track = Track::parse("a#\n##").expect("valid track");
        let positions: Vec<_> = track.positions().collect();
        assert_eq!(
            positions,
            vec![
                Vector::new(0, 0),
                Vector::new(1, 0),
                Vector::new(0, 1),
                Vector::new(1, 1),
            ]
        );
    }
}
