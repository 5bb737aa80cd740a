use racetrack_core::{CarSnapshot, Direction, Vector};

/// Mutable per-car state owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct Car {
    id: char,
    position: Vector,
    velocity: Vector,
    crashed: bool,
}

impl Car {
    pub(crate) const fn new(id: char, position: Vector) -> Self {
        Self {
            id,
            position,
            velocity: Vector::ZERO,
            crashed: false,
        }
    }

    pub(crate) const fn position(&self) -> Vector {
        self.position
    }

    pub(crate) const fn velocity(&self) -> Vector {
        self.velocity
    }

    pub(crate) const fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub(crate) fn accelerate(&mut self, direction: Direction) {
        self.velocity += direction.vector();
    }

    /// Advances the car by its velocity. Callers must have swept the path.
    pub(crate) fn advance(&mut self) {
        self.position += self.velocity;
    }

    pub(crate) fn crash(&mut self, at: Vector) {
        self.crashed = true;
        self.position = at;
    }

    pub(crate) fn set_winning_position(&mut self, at: Vector) {
        self.position = at;
    }

    pub(crate) const fn snapshot(&self) -> CarSnapshot {
        CarSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            crashed: self.crashed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Car;
    use racetrack_core::{Direction, Vector};

    #[test]
    fn velocity_accumulates_accelerations() {
        let mut car = Car::new('a', Vector::new(3, 3));
        for direction in [Direction::Up, Direction::UpRight, Direction::None, Direction::Left] {
            car.accelerate(direction);
        }
        assert_eq!(car.velocity(), Vector::new(0, -2));
        assert_eq!(car.position(), Vector::new(3, 3));
    }

    #[test]
    fn advance_moves_by_velocity() {
        let mut car = Car::new('a', Vector::new(3, 3));
        car.accelerate(Direction::DownRight);
        car.advance();
        car.advance();
        assert_eq!(car.position(), Vector::new(5, 5));
    }

    #[test]
    fn crash_is_permanent() {
        let mut car = Car::new('a', Vector::new(1, 1));
        car.crash(Vector::new(0, 1));
        car.set_winning_position(Vector::new(4, 4));
        car.accelerate(Direction::Right);
        assert!(car.is_crashed());
        assert!(car.snapshot().crashed);
        assert_eq!(car.snapshot().position, Vector::new(4, 4));
    }
}
