//! Sliding window of materialised terrain centred on the player.

use std::collections::VecDeque;

use overworld_core::{CellCoord, Coordinates, Direction, TileSnapshot, ViewportSnapshot};

use crate::terrain::{TerrainGenerator, Tile};

/// Terrain window stored as columns of rows.
///
/// The window always holds exactly `width` columns of `height` tiles. The
/// stored origin is the cell in the upper-left corner; freshly generated edges
/// derive their coordinates from it.
#[derive(Clone, Debug)]
pub(crate) struct ViewportGrid {
    columns: VecDeque<VecDeque<Tile>>,
    origin: CellCoord,
    width: usize,
    height: usize,
}

impl ViewportGrid {
    pub(crate) fn new(
        center: CellCoord,
        width: usize,
        height: usize,
        generator: &TerrainGenerator,
    ) -> Self {
        let origin = CellCoord::new(
            center.x() - half_span(width),
            center.y() - half_span(height),
        );
        let columns = (0..width)
            .map(|column| column_at(origin.x() + column as i64, origin.y(), height, generator))
            .collect();

        Self {
            columns,
            origin,
            width,
            height,
        }
    }

    pub(crate) fn origin(&self) -> CellCoord {
        self.origin
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub(crate) fn center(&self) -> CellCoord {
        CellCoord::new(
            self.origin.x() + half_span(self.width),
            self.origin.y() + half_span(self.height),
        )
    }

    pub(crate) fn tile_at_local(&self, column: usize, row: usize) -> Option<&Tile> {
        self.columns.get(column)?.get(row)
    }

    /// Re-centres the window after the player moved from `previous` to `current`.
    ///
    /// Only the axis matching `facing` is serviced. Returns the direction of
    /// every one-cell shift performed, in order.
    pub(crate) fn slide(
        &mut self,
        previous: Coordinates,
        current: Coordinates,
        facing: Direction,
        generator: &TerrainGenerator,
    ) -> Vec<Direction> {
        let before = previous.rounded_cell();
        let after = current.rounded_cell();
        let mut shifts = Vec::new();

        if facing.is_vertical() {
            if before.y() == after.y() {
                return shifts;
            }
            while self.center().y() > after.y() {
                self.shift(Direction::Up, generator);
                shifts.push(Direction::Up);
            }
            while self.center().y() < after.y() {
                self.shift(Direction::Down, generator);
                shifts.push(Direction::Down);
            }
        } else {
            if before.x() == after.x() {
                return shifts;
            }
            while self.center().x() > after.x() {
                self.shift(Direction::Left, generator);
                shifts.push(Direction::Left);
            }
            while self.center().x() < after.x() {
                self.shift(Direction::Right, generator);
                shifts.push(Direction::Right);
            }
        }

        shifts
    }

    fn shift(&mut self, direction: Direction, generator: &TerrainGenerator) {
        let (left, top) = (self.origin.x(), self.origin.y());
        match direction {
            Direction::Up => {
                self.origin = CellCoord::new(left, top - 1);
                for (offset, column) in self.columns.iter_mut().enumerate() {
                    let cell = CellCoord::new(left + offset as i64, top - 1);
                    let _ = column.pop_back();
                    column.push_front(generator.generate_tile(cell));
                }
            }
            Direction::Down => {
                self.origin = CellCoord::new(left, top + 1);
                let bottom = top + self.height as i64;
                for (offset, column) in self.columns.iter_mut().enumerate() {
                    let cell = CellCoord::new(left + offset as i64, bottom);
                    let _ = column.pop_front();
                    column.push_back(generator.generate_tile(cell));
                }
            }
            Direction::Left => {
                self.origin = CellCoord::new(left - 1, top);
                let fresh = column_at(left - 1, top, self.height, generator);
                let _ = self.columns.pop_back();
                self.columns.push_front(fresh);
            }
            Direction::Right => {
                self.origin = CellCoord::new(left + 1, top);
                let fresh = column_at(left + self.width as i64, top, self.height, generator);
                let _ = self.columns.pop_front();
                self.columns.push_back(fresh);
            }
        }
    }

    pub(crate) fn snapshot(&self) -> ViewportSnapshot {
        let tiles = self
            .columns
            .iter()
            .flat_map(|column| column.iter())
            .map(|tile| TileSnapshot {
                kind: tile.kind,
                cell: tile.cell,
                solid: tile.is_solid(),
                has_chest: tile.chest.is_some(),
            })
            .collect();
        ViewportSnapshot::new(self.origin, self.width, self.height, tiles)
    }
}

fn half_span(length: usize) -> i64 {
    (length.saturating_sub(1) / 2) as i64
}

fn column_at(x: i64, top: i64, height: usize, generator: &TerrainGenerator) -> VecDeque<Tile> {
    (0..height)
        .map(|row| generator.generate_tile(CellCoord::new(x, top + row as i64)))
        .collect()
}
