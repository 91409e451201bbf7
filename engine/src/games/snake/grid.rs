use crate::games::SessionRng;
use super::types::Point;

/// Random picks before falling back to scanning every cell.
const FREE_CELL_ATTEMPTS: usize = 1000;

pub fn in_bounds(p: Point, grid_size: usize) -> bool {
    let n = grid_size as i32;
    p.x >= 0 && p.x < n && p.y >= 0 && p.y < n
}

pub fn wrap(p: Point, grid_size: usize) -> Point {
    let n = grid_size as i32;
    Point::new(p.x.rem_euclid(n), p.y.rem_euclid(n))
}

pub fn occupied<'a>(p: Point, cells: impl IntoIterator<Item = &'a Point>) -> bool {
    cells.into_iter().any(|c| *c == p)
}

/// Chebyshev distance.
pub fn chessboard_distance(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

pub fn center(grid_size: usize) -> Point {
    let c = (grid_size / 2) as i32;
    Point::new(c, c)
}

pub fn random_cell(grid_size: usize, rng: &mut SessionRng) -> Point {
    let n = grid_size as i32;
    Point::new(rng.random_range(0..n), rng.random_range(0..n))
}

/// Uniformly random cell for which `is_blocked` is false.
///
/// Rejection sampling first; on a crowded board the remaining free cells are
/// enumerated instead. `None` means the board is full.
pub fn random_free_cell(
    grid_size: usize,
    rng: &mut SessionRng,
    is_blocked: impl Fn(Point) -> bool,
) -> Option<Point> {
    for _ in 0..FREE_CELL_ATTEMPTS {
        let candidate = random_cell(grid_size, rng);
        if !is_blocked(candidate) {
            return Some(candidate);
        }
    }

    let n = grid_size as i32;
    let free: Vec<Point> = (0..n)
        .flat_map(|y| (0..n).map(move |x| Point::new(x, y)))
        .filter(|p| !is_blocked(*p))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}
