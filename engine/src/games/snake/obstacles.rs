use std::collections::HashSet;

use crate::games::SessionRng;
use super::error::PlacementError;
use super::grid::{center, chessboard_distance, random_cell};
use super::types::{ObstacleDensity, Point};

/// Cells within this Chebyshev distance of the center stay clear for the spawn.
pub const SAFE_ZONE_RADIUS: i32 = 2;
const ATTEMPTS_PER_OBSTACLE: usize = 100;
const MIN_ATTEMPTS: usize = 10_000;

pub fn in_safe_zone(p: Point, grid_size: usize) -> bool {
    chessboard_distance(p, center(grid_size)) <= SAFE_ZONE_RADIUS
}

fn placeable_cells(grid_size: usize) -> usize {
    let n = grid_size as i32;
    (0..n)
        .flat_map(|y| (0..n).map(move |x| Point::new(x, y)))
        .filter(|p| !in_safe_zone(*p, grid_size))
        .count()
}

pub fn generate_obstacles(
    grid_size: usize,
    density: ObstacleDensity,
    rng: &mut SessionRng,
) -> Result<HashSet<Point>, PlacementError> {
    let target = density.obstacle_count(grid_size);
    let mut obstacles = HashSet::with_capacity(target);
    if target == 0 {
        return Ok(obstacles);
    }

    let available = placeable_cells(grid_size);
    if target > available {
        return Err(PlacementError::Infeasible {
            what: "obstacles",
            requested: target,
            available,
        });
    }

    let max_attempts = (target * ATTEMPTS_PER_OBSTACLE).max(MIN_ATTEMPTS);
    let mut attempts = 0;
    while obstacles.len() < target {
        if attempts == max_attempts {
            return Err(PlacementError::AttemptsExhausted {
                what: "obstacles",
                attempts,
            });
        }
        attempts += 1;

        let candidate = random_cell(grid_size, rng);
        if !in_safe_zone(candidate, grid_size) {
            obstacles.insert(candidate);
        }
    }

    Ok(obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::grid::in_bounds;

    #[test]
    fn test_medium_on_20_grid_places_40_outside_safe_zone() {
        let mut rng = SessionRng::new(2024);
        let obstacles = generate_obstacles(20, ObstacleDensity::Medium, &mut rng).unwrap();

        assert_eq!(obstacles.len(), 40);
        for p in &obstacles {
            assert!(in_bounds(*p, 20));
            assert!(chessboard_distance(*p, Point::new(10, 10)) > 2, "{:?} too close to center", p);
        }
    }

    #[test]
    fn test_none_density_is_empty() {
        let mut rng = SessionRng::new(1);
        assert!(generate_obstacles(25, ObstacleDensity::None, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_every_supported_combination_is_feasible() {
        let mut rng = SessionRng::new(99);
        for grid_size in [15, 20, 25] {
            for density in [ObstacleDensity::Few, ObstacleDensity::Medium, ObstacleDensity::Many] {
                let obstacles = generate_obstacles(grid_size, density, &mut rng).unwrap();
                assert_eq!(obstacles.len(), density.obstacle_count(grid_size));
            }
        }
    }

    #[test]
    fn test_tiny_grid_is_rejected_as_infeasible() {
        let mut rng = SessionRng::new(5);
        // 5x5 is entirely safe zone, yet Many asks for 3 cells.
        let result = generate_obstacles(5, ObstacleDensity::Many, &mut rng);
        assert!(matches!(
            result,
            Err(PlacementError::Infeasible { requested: 3, available: 0, .. })
        ));
    }
}
