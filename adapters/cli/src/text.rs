//! Plain-text rendering backend.

use std::io::Write;

use anyhow::{Context, Result};
use overworld_core::{EntityKind, TerrainKind};
use overworld_rendering::{RenderingBackend, Scene};

/// Writes every frame as a grid of glyphs followed by a status line.
#[derive(Debug)]
pub(crate) struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

fn glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Terrain(TerrainKind::Grass) => '.',
        EntityKind::Terrain(TerrainKind::Lava) => '~',
        EntityKind::Terrain(TerrainKind::Mountain) => '^',
        EntityKind::Chest => 'c',
        EntityKind::Enemy => 'E',
        EntityKind::Player => '@',
    }
}

/// Rows of glyphs, with sprites drawn over terrain in chest, enemy, player order.
fn compose(scene: &Scene) -> Vec<Vec<char>> {
    let mut rows = vec![vec![' '; scene.columns]; scene.rows];
    for tile in &scene.tiles {
        rows[tile.row][tile.column] = if tile.has_chest {
            glyph(EntityKind::Chest)
        } else {
            glyph(tile.kind)
        };
    }

    let sprites = scene
        .chests
        .iter()
        .chain(&scene.enemies)
        .chain(std::iter::once(&scene.player));
    for sprite in sprites {
        if let Some((column, row)) = sprite.cell() {
            if let Some(cell) = rows.get_mut(row).and_then(|glyphs| glyphs.get_mut(column)) {
                *cell = glyph(sprite.kind);
            }
        }
    }
    rows
}

impl<W: Write> RenderingBackend for TextRenderer<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        for row in compose(scene) {
            let line: String = row.into_iter().collect();
            writeln!(self.out, "{line}").context("failed to write frame row")?;
        }
        let status = scene.status;
        writeln!(
            self.out,
            "hp {} | xp {} | slot {}",
            status.hit_points,
            status.experience,
            status.selected_slot + 1
        )
        .context("failed to write status line")?;
        self.out.flush().context("failed to flush frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overworld_core::{
        Actor, CellCoord, ChestId, ChestSnapshot, CombatantSnapshot, Cooldown, Coordinates,
        Direction, EnemyId, EnemyView, InventorySlot, PlayerSnapshot, TileSnapshot,
        ViewportSnapshot,
    };

    fn combatant(actor: Actor, x: f64, y: f64) -> CombatantSnapshot {
        CombatantSnapshot {
            actor,
            position: Coordinates::new(x, y),
            facing: Direction::Left,
            hit_points: 42,
            attack: 10,
            attack_range: 1.0,
            defense: 0,
            speed: 0.2,
            cooldown: Cooldown::ready(20),
        }
    }

    fn scene() -> Scene {
        let origin = CellCoord::new(-1, -1);
        let mut tiles = Vec::new();
        for column in 0..3 {
            for row in 0..4 {
                let kind = match (column, row) {
                    (2, 0) => TerrainKind::Lava,
                    (2, 3) => TerrainKind::Mountain,
                    _ => TerrainKind::Grass,
                };
                tiles.push(TileSnapshot {
                    kind,
                    cell: CellCoord::new(origin.x() + column, origin.y() + row),
                    solid: kind.is_solid(),
                    has_chest: (column, row) == (0, 3),
                });
            }
        }
        let viewport = ViewportSnapshot::new(origin, 3, 4, tiles);
        let player = PlayerSnapshot {
            combatant: combatant(Actor::Player, 0.05, 0.05),
            previous_position: Coordinates::new(0.05, 0.05),
            experience: 20,
            selected_slot: InventorySlot::default(),
            inventory: [None; overworld_core::INVENTORY_SLOTS],
        };
        let enemies = EnemyView::from_snapshots(vec![
            combatant(Actor::Enemy(EnemyId::new(1)), 0.0, -1.0),
            combatant(Actor::Enemy(EnemyId::new(2)), 40.0, 40.0),
        ]);
        let chests = [ChestSnapshot {
            id: ChestId::new(3),
            position: Coordinates::new(1.0, 1.0),
        }];

        Scene::from_snapshots(&viewport, &player, &enemies, &chests).expect("non-empty viewport")
    }

    #[test]
    fn frame_layers_sprites_over_terrain() {
        let mut buffer = Vec::new();
        TextRenderer::new(&mut buffer)
            .present(&scene())
            .expect("writing to memory succeeds");

        let frame = String::from_utf8(buffer).expect("frame is utf-8");
        let lines: Vec<&str> = frame.lines().collect();
        let expected = vec![".E~", ".@.", "..c", "c.^", "hp 42 | xp 20 | slot 1"];
        assert_eq!(lines, expected);
    }
}
