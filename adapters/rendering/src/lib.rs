#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Overworld adapters.
//!
//! A [`Scene`] is a read-only description of one frame assembled from world
//! snapshots. Positions are expressed in window-local tile units, with the
//! upper-left corner of the terrain window at the origin.

use anyhow::Result as AnyResult;
use glam::Vec2;
use overworld_core::{
    ChestSnapshot, Coordinates, EnemyView, EntityKind, PlayerSnapshot, TerrainKind,
    ViewportSnapshot,
};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Palette entry used for the provided entity kind.
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Self::from_rgb_u8(0xf2, 0xe9, 0x4e),
            EntityKind::Enemy => Self::from_rgb_u8(0xc8, 0x2a, 0x36),
            EntityKind::Chest => Self::from_rgb_u8(0x9c, 0x6b, 0x30),
            EntityKind::Terrain(TerrainKind::Grass) => Self::from_rgb_u8(0x2f, 0x95, 0x32),
            EntityKind::Terrain(TerrainKind::Lava) => Self::from_rgb_u8(0xff, 0x5a, 0x00),
            EntityKind::Terrain(TerrainKind::Mountain) => Self::from_rgb_u8(0x6e, 0x6e, 0x73),
        }
    }
}

/// Terrain tile positioned within the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Zero-based column inside the window.
    pub column: usize,
    /// Zero-based row inside the window.
    pub row: usize,
    /// Identity of the tile.
    pub kind: EntityKind,
    /// Fill color of the tile.
    pub color: Color,
    /// Whether the tile hides a chest.
    pub has_chest: bool,
}

/// Entity drawn on top of the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Identity of the entity.
    pub kind: EntityKind,
    /// Upper-left corner in window-local tile units.
    pub position: Vec2,
    /// Fill color of the sprite.
    pub color: Color,
}

impl SpritePresentation {
    fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            color: Color::for_kind(kind),
        }
    }

    /// Resource identifier of the sprite.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Window cell containing the sprite's upper-left corner.
    #[must_use]
    pub fn cell(&self) -> Option<(usize, usize)> {
        if self.position.x < 0.0 || self.position.y < 0.0 {
            return None;
        }
        Some((
            self.position.x.floor() as usize,
            self.position.y.floor() as usize,
        ))
    }
}

/// Player status shown alongside the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Remaining hit points.
    pub hit_points: i32,
    /// Accumulated experience.
    pub experience: u32,
    /// Zero-based selected inventory slot.
    pub selected_slot: usize,
}

/// Scene description combining the terrain window and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of columns in the window.
    pub columns: usize,
    /// Number of rows in the window.
    pub rows: usize,
    /// Terrain tiles in column-major order.
    pub tiles: Vec<TilePresentation>,
    /// The player.
    pub player: SpritePresentation,
    /// Active enemies inside the window.
    pub enemies: Vec<SpritePresentation>,
    /// Active chests inside the window.
    pub chests: Vec<SpritePresentation>,
    /// Player status.
    pub status: StatusLine,
}

impl Scene {
    /// Assembles a scene from world snapshots.
    ///
    /// Entities outside the window are dropped.
    pub fn from_snapshots(
        viewport: &ViewportSnapshot,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        chests: &[ChestSnapshot],
    ) -> Result<Self, RenderingError> {
        let (columns, rows) = (viewport.columns(), viewport.rows());
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyViewport { columns, rows });
        }

        let tiles = viewport
            .iter_columns()
            .enumerate()
            .flat_map(|(column, tiles)| {
                tiles.iter().enumerate().map(move |(row, tile)| {
                    let kind = EntityKind::Terrain(tile.kind);
                    TilePresentation {
                        column,
                        row,
                        kind,
                        color: Color::for_kind(kind),
                        has_chest: tile.has_chest,
                    }
                })
            })
            .collect();

        let origin = viewport.origin().corner();
        let local = |position: Coordinates| {
            Vec2::new(
                (position.x() - origin.x()) as f32,
                (position.y() - origin.y()) as f32,
            )
        };
        let bounds = Vec2::new(columns as f32, rows as f32);
        let visible = |position: Vec2| {
            position.x >= 0.0 && position.y >= 0.0 && position.x < bounds.x && position.y < bounds.y
        };

        let enemies = enemies
            .iter()
            .map(|enemy| local(enemy.position))
            .filter(|position| visible(*position))
            .map(|position| SpritePresentation::new(EntityKind::Enemy, position))
            .collect();
        let chests = chests
            .iter()
            .map(|chest| local(chest.position))
            .filter(|position| visible(*position))
            .map(|position| SpritePresentation::new(EntityKind::Chest, position))
            .collect();

        Ok(Self {
            columns,
            rows,
            tiles,
            player: SpritePresentation::new(EntityKind::Player, local(player.combatant.position)),
            enemies,
            chests,
            status: StatusLine {
                hit_points: player.combatant.hit_points,
                experience: player.experience,
                selected_slot: player.selected_slot.index(),
            },
        })
    }

    /// Tile at the provided window-local column and row.
    #[must_use]
    pub fn tile(&self, column: usize, row: usize) -> Option<&TilePresentation> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.tiles.get(column * self.rows + row)
    }
}

/// Rendering backend capable of presenting Overworld scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The terrain window has no tiles to draw.
    #[error("viewport of {columns}x{rows} has nothing to draw")]
    EmptyViewport {
        /// Reported number of columns.
        columns: usize,
        /// Reported number of rows.
        rows: usize,
    },
}
