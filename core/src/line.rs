use crate::Vector;

/// Enumerates the grid cells on the straight line from `start` to `end`.
///
/// Both endpoints are included and consecutive cells differ by a unit step on
/// each axis. The axis with the larger distance advances every iteration; on
/// equal distances the row axis is the fast one. Only integer arithmetic is
/// used, so every caller observes exactly the same cells for a given move.
#[must_use]
pub fn rasterize(start: Vector, end: Vector) -> Vec<Vector> {
    let delta = end - start;
    let diagonal = delta.signum();
    let (dx, dy) = (delta.x().abs(), delta.y().abs());

    let (parallel, fast, slow) = if dx > dy {
        (Vector::new(diagonal.x(), 0), dx, dy)
    } else {
        (Vector::new(0, diagonal.y()), dy, dx)
    };

    let mut cells = Vec::with_capacity(fast.unsigned_abs() as usize + 1);
    let mut cell = start;
    cells.push(cell);

    let mut error = fast / 2;
    for _ in 0..fast {
        error -= slow;
        if error < 0 {
            error += fast;
            cell += diagonal;
        } else {
            cell += parallel;
        }
        cells.push(cell);
    }

    cells
}
