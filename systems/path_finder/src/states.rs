use std::collections::{HashMap, VecDeque};

use racetrack_core::{rasterize, Direction, SpaceType, Vector};
use racetrack_world::Track;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct State {
    position: Vector,
    velocity: Vector,
}

enum Transition {
    Blocked,
    Continue(State),
    Finished,
}

/// Mirrors the turn engine for a lone car leaving `state` with `velocity`.
fn simulate(track: &Track, state: State, velocity: Vector) -> Transition {
    let next = State {
        position: state.position + velocity,
        velocity,
    };
    if velocity.is_zero() {
        return Transition::Continue(next);
    }

    let mut previous = state.position;
    for cell in rasterize(state.position, next.position) {
        match track.space_at(cell) {
            SpaceType::Wall => return Transition::Blocked,
            SpaceType::Track => {}
            finish if finish.admits_crossing(previous, cell) => return Transition::Finished,
            _ => return Transition::Blocked,
        }
        previous = cell;
    }
    Transition::Continue(next)
}

/// Breadth-first search over position and velocity pairs.
///
/// Transitions that cross a finish cell against its direction are discarded,
/// so the first correct crossing reached wins under the turn engine.
/// Returns the accelerations in reverse order, last turn first.
pub(crate) fn plan_reversed(track: &Track, start: Vector) -> Vec<Direction> {
    if track.space_at(start) == SpaceType::Wall {
        return Vec::new();
    }

    let origin = State {
        position: start,
        velocity: Vector::ZERO,
    };
    let mut parents: HashMap<State, (State, Direction)> = HashMap::new();
    let mut queue = VecDeque::from([origin]);

    while let Some(state) = queue.pop_front() {
        for acceleration in Direction::ALL {
            let velocity = state.velocity + acceleration.vector();
            match simulate(track, state, velocity) {
                Transition::Blocked => {}
                Transition::Continue(next) => {
                    if next != origin && !parents.contains_key(&next) {
                        let _ = parents.insert(next, (state, acceleration));
                        queue.push_back(next);
                    }
                }
                Transition::Finished => {
                    let mut reversed = vec![acceleration];
                    let mut current = state;
                    while let Some(&(parent, step)) = parents.get(&current) {
                        reversed.push(step);
                        current = parent;
                    }
                    return reversed;
                }
            }
        }
    }
    Vec::new()
}
