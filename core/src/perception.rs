//! Facing-based perception geometry shared by combat and collision.
//!
//! Sight is a coarse half-plane test: a target is "ahead" when it lies more
//! than [`SIGHT_THRESHOLD`] units beyond the observer along its facing axis.

use crate::{Coordinates, Direction};

/// Minimum distance along the facing axis for a target to count as ahead.
pub const SIGHT_THRESHOLD: f64 = 0.4;

/// Half-width of the band on the perpendicular axis swept by a moving body.
pub const PATH_BAND: f64 = 0.9;

/// Reports whether `target` lies in the half-plane the observer faces.
#[must_use]
pub fn in_sight(observer: Coordinates, facing: Direction, target: Coordinates) -> bool {
    match facing {
        Direction::Up => target.y() < observer.y() - SIGHT_THRESHOLD,
        Direction::Down => target.y() > observer.y() + SIGHT_THRESHOLD,
        Direction::Left => target.x() < observer.x() - SIGHT_THRESHOLD,
        Direction::Right => target.x() > observer.x() + SIGHT_THRESHOLD,
    }
}

/// Reports whether `target` lies within `range` of `requester`, inclusive.
#[must_use]
pub fn is_within_distance(target: Coordinates, requester: Coordinates, range: f64) -> bool {
    requester.distance(target) <= range
}

/// Reports whether `target` blocks the lane the observer is about to sweep.
///
/// The target must be in sight and overlap the observer's footprint on the
/// axis perpendicular to its facing.
#[must_use]
pub fn in_path(observer: Coordinates, facing: Direction, target: Coordinates) -> bool {
    if !in_sight(observer, facing, target) {
        return false;
    }

    let lateral = if facing.is_vertical() {
        target.x() - observer.x()
    } else {
        target.y() - observer.y()
    };
    lateral.abs() < PATH_BAND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sight_threshold_is_strict() {
        let observer = Coordinates::new(0.0, 5.0);
        let sees = |facing, y| in_sight(observer, facing, Coordinates::new(0.0, y));

        assert!(sees(Direction::Up, 4.59));
        assert!(!sees(Direction::Up, 4.61));
        assert!(!sees(Direction::Down, 4.59));
    }

    #[test]
    fn sight_covers_horizontal_facings() {
        let observer = Coordinates::new(3.0, 0.0);
        let sees = |facing, x, y| in_sight(observer, facing, Coordinates::new(x, y));

        assert!(sees(Direction::Left, 2.5, 9.0));
        assert!(!sees(Direction::Left, 2.7, 0.0));
        assert!(sees(Direction::Right, 3.5, -4.0));
    }

    #[test]
    fn distance_check_is_inclusive() {
        let requester = Coordinates::new(0.0, 0.0);
        let within = |x, y| is_within_distance(Coordinates::new(x, y), requester, 5.0);

        assert!(within(3.0, 4.0));
        assert!(!within(3.0, 4.01));
    }

    #[test]
    fn path_requires_lateral_overlap() {
        let observer = Coordinates::new(0.0, 0.0);
        let blocks = |facing, x, y| in_path(observer, facing, Coordinates::new(x, y));

        assert!(blocks(Direction::Right, 1.0, 0.8));
        assert!(!blocks(Direction::Right, 1.0, 0.9));
        assert!(!blocks(Direction::Left, 1.0, 0.0));
        assert!(blocks(Direction::Down, -0.5, 2.0));
    }
}
