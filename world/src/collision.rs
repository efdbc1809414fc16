//! Movement admission against terrain and other combatants.

use overworld_core::{perception, Coordinates, Direction};

use crate::viewport::ViewportGrid;

/// Inset subtracted from the speed when probing ahead of a body.
const FEELER_INSET: f64 = 0.05;

/// Width of a combatant's footprint.
const FOOTPRINT: f64 = 0.9;

/// Obstacles closer than this block movement when they are in the path.
const CONTACT_DISTANCE: f64 = 1.1;

/// Body requesting to move, expressed in world coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Mover {
    pub(crate) position: Coordinates,
    pub(crate) facing: Direction,
    pub(crate) speed: f64,
}

/// Reports whether `mover` may advance one step toward its facing.
///
/// Feelers that leave the materialised window count as blocked.
pub(crate) fn is_path_free(
    viewport: &ViewportGrid,
    mover: Mover,
    obstacles: impl IntoIterator<Item = Coordinates>,
) -> bool {
    let origin = viewport.origin().corner();
    let local = Coordinates::new(
        mover.position.x() - origin.x(),
        mover.position.y() - origin.y(),
    );
    let (width, height) = viewport.dimensions();

    for feeler in feelers(local, mover.facing, mover.speed) {
        if !feeler_in_bounds(feeler, width, height) {
            return false;
        }
        let column = feeler.x().floor() as usize;
        let row = feeler.y().floor() as usize;
        match viewport.tile_at_local(column, row) {
            Some(tile) if !tile.is_solid() => {}
            _ => return false,
        }
    }

    !obstacles.into_iter().any(|obstacle| {
        perception::in_path(mover.position, mover.facing, obstacle)
            && mover.position.distance(obstacle) < CONTACT_DISTANCE
    })
}

fn feelers(local: Coordinates, facing: Direction, speed: f64) -> [Coordinates; 2] {
    let reach = speed - FEELER_INSET;
    let (x, y) = (local.x(), local.y());
    match facing {
        Direction::Up => [
            Coordinates::new(x + FEELER_INSET, y - reach),
            Coordinates::new(x + FOOTPRINT, y - reach),
        ],
        Direction::Down => [
            Coordinates::new(x, y + FOOTPRINT + reach),
            Coordinates::new(x + FOOTPRINT, y + FOOTPRINT + reach),
        ],
        Direction::Right => [
            Coordinates::new(x + FOOTPRINT + reach, y),
            Coordinates::new(x + FOOTPRINT + reach, y + FOOTPRINT),
        ],
        Direction::Left => [
            Coordinates::new(x - reach, y),
            Coordinates::new(x - reach, y + FOOTPRINT),
        ],
    }
}

/// Feelers must stay within `[0, width - 2] x [0, height - 3]`, inclusive.
fn feeler_in_bounds(feeler: Coordinates, width: usize, height: usize) -> bool {
    let max_x = width.saturating_sub(2) as f64;
    let max_y = height.saturating_sub(3) as f64;
    (0.0..=max_x).contains(&feeler.x()) && (0.0..=max_y).contains(&feeler.y())
}
