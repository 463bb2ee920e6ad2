//! Line-of-sight test against the obstacle course

use swarmsim_core::{Obstacle, Position};

/// True iff the straight segment from `from` to `to` passes within some
/// obstacle's radius.
///
/// Only obstacles within `sensing_radius` of `from` are considered: an agent
/// cannot be occluded by an obstacle it cannot perceive. The closest point on
/// the segment is found by projecting the obstacle centre onto it and
/// clamping the projection parameter to `[0, 1]`.
pub fn is_occluded(
    from: &Position,
    to: &Position,
    obstacles: &[Obstacle],
    sensing_radius: f64,
) -> bool {
    let segment = to - from;
    let length_sq = segment.norm_squared();

    for obstacle in obstacles {
        let to_centre = obstacle.position - from;
        if to_centre.norm() > sensing_radius {
            continue;
        }

        let q = if length_sq > 0.0 {
            (to_centre.dot(&segment) / length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = from + segment * q;

        if (obstacle.position - closest).norm() <= obstacle.radius {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(x: f64, y: f64, radius: f64) -> Obstacle {
        Obstacle::new(0, 1.0, radius, Position::new(x, y))
    }

    #[test]
    fn test_clear_path() {
        let obstacles = vec![obstacle(50.0, 50.0, 3.0)];
        assert!(!is_occluded(
            &Position::new(0.0, 0.0),
            &Position::new(100.0, 0.0),
            &obstacles,
            200.0,
        ));
    }

    #[test]
    fn test_blocking_obstacle() {
        let obstacles = vec![obstacle(50.0, 1.0, 3.0)];
        assert!(is_occluded(
            &Position::new(0.0, 0.0),
            &Position::new(100.0, 0.0),
            &obstacles,
            200.0,
        ));
    }

    #[test]
    fn test_obstacle_beyond_sensing_radius_is_ignored() {
        let obstacles = vec![obstacle(50.0, 0.0, 3.0)];
        assert!(!is_occluded(
            &Position::new(0.0, 0.0),
            &Position::new(100.0, 0.0),
            &obstacles,
            10.0,
        ));
    }

    #[test]
    fn test_obstacle_behind_segment_endpoints() {
        // projection clamps to the endpoint, which is out of reach
        let obstacles = vec![obstacle(-20.0, 0.0, 3.0)];
        assert!(!is_occluded(
            &Position::new(0.0, 0.0),
            &Position::new(100.0, 0.0),
            &obstacles,
            200.0,
        ));
    }

    #[test]
    fn test_degenerate_segment() {
        let obstacles = vec![obstacle(1.0, 0.0, 3.0)];
        let p = Position::new(0.0, 0.0);
        assert!(is_occluded(&p, &p, &obstacles, 200.0));
    }
}
