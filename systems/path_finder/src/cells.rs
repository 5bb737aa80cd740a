use racetrack_core::{rasterize, Direction, SpaceType, Vector};
use racetrack_world::Track;

#[derive(Clone, Copy, Debug)]
enum Node {
    Blocked,
    Unreached,
    Reached {
        turns: usize,
        velocity: Vector,
        predecessor: Vector,
        acceleration: Direction,
    },
}

/// Cell-indexed relaxation keeping one best arrival per grid cell.
struct Grid<'a> {
    track: &'a Track,
    nodes: Vec<Node>,
}

impl<'a> Grid<'a> {
    fn new(track: &'a Track) -> Self {
        let nodes = track
            .positions()
            .map(|position| match track.space_at(position) {
                SpaceType::Wall => Node::Blocked,
                _ => Node::Unreached,
            })
            .collect();
        Self { track, nodes }
    }

    fn index(&self, position: Vector) -> Option<usize> {
        if !self.track.contains(position) {
            return None;
        }
        let column = usize::try_from(position.x()).ok()?;
        let row = usize::try_from(position.y()).ok()?;
        Some(row * self.track.width() + column)
    }

    fn node(&self, position: Vector) -> Node {
        self.index(position)
            .map_or(Node::Blocked, |index| self.nodes[index])
    }

    fn frontier(&self, layer: usize) -> Vec<Vector> {
        self.track
            .positions()
            .zip(&self.nodes)
            .filter(|(_, node)| matches!(node, Node::Reached { turns, .. } if *turns == layer))
            .map(|(position, _)| position)
            .collect()
    }

    fn relax(&mut self, from: Vector, velocity: Vector, turns: usize) {
        for acceleration in Direction::ALL {
            let next_velocity = velocity + acceleration.vector();
            let next = from + next_velocity;
            let Some(index) = self.index(next) else {
                continue;
            };
            let envelope = next + next_velocity.braking_extent();
            if !self.track.contains(envelope) || self.track.space_at(envelope) == SpaceType::Wall {
                continue;
            }
            let stays_on_track = rasterize(from, next)
                .into_iter()
                .all(|cell| self.track.space_at(cell).admits_velocity(next_velocity));
            if !stays_on_track {
                continue;
            }

            let improves = match self.nodes[index] {
                Node::Blocked => false,
                Node::Unreached => true,
                Node::Reached { turns: known, .. } => known > turns,
            };
            if improves {
                self.nodes[index] = Node::Reached {
                    turns,
                    velocity: next_velocity,
                    predecessor: from,
                    acceleration,
                };
            }
        }
    }

    /// First finish cell in row-major order among those reached in the fewest turns.
    fn closest_finish(&self) -> Option<Vector> {
        let mut closest: Option<(Vector, usize)> = None;
        for (position, node) in self.track.positions().zip(&self.nodes) {
            if !self.track.space_at(position).is_finish() {
                continue;
            }
            if let Node::Reached { turns, .. } = *node {
                if closest.map_or(true, |(_, best)| turns < best) {
                    closest = Some((position, turns));
                }
            }
        }
        closest.map(|(position, _)| position)
    }
}

/// Returns the accelerations in reverse order, last turn first.
pub(crate) fn plan_reversed(track: &Track, start: Vector) -> Vec<Direction> {
    let mut grid = Grid::new(track);
    let Some(start_index) = grid.index(start) else {
        return Vec::new();
    };
    if matches!(grid.nodes[start_index], Node::Blocked) {
        return Vec::new();
    }
    grid.nodes[start_index] = Node::Reached {
        turns: 0,
        velocity: Vector::ZERO,
        predecessor: start,
        acceleration: Direction::None,
    };

    let mut layer = 0;
    let mut frontier = grid.frontier(layer);
    while !frontier.is_empty() {
        for &position in &frontier {
            if let Node::Reached { velocity, .. } = grid.node(position) {
                grid.relax(position, velocity, layer + 1);
            }
        }
        layer += 1;
        frontier = grid.frontier(layer);
    }

    let Some(mut current) = grid.closest_finish() else {
        return Vec::new();
    };
    let mut reversed = Vec::new();
    while let Node::Reached {
        turns,
        predecessor,
        acceleration,
        ..
    } = grid.node(current)
    {
        if turns == 0 {
            break;
        }
        reversed.push(acceleration);
        current = predecessor;
    }
    reversed
}
