#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic population generator for enemies and chests.
//!
//! Entities are scattered uniformly over a square centred on the origin. The
//! same configuration and seed always yield the same population, including
//! identifiers, so sessions can be replayed.

use overworld_core::{ChestId, ChestSeed, Coordinates, EnemyId, EnemySeed, StatPreset};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration parameters required to generate a population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of enemies to scatter.
    pub enemies: u32,
    /// Number of chests to scatter.
    pub chests: u32,
    /// Side length of the square the population is scattered over.
    pub area_side: f64,
    /// Statistics every enemy starts with.
    pub enemy_stats: StatPreset,
}

impl Config {
    /// Creates a configuration with the provided counts and reference stats.
    #[must_use]
    pub const fn new(enemies: u32, chests: u32, area_side: f64) -> Self {
        Self {
            enemies,
            chests,
            area_side,
            enemy_stats: StatPreset::ENEMY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(100_000, 100_000, 5_000.0)
    }
}

/// Produces enemies with sequential identifiers at random positions.
#[derive(Clone, Debug)]
pub struct EnemyFactory {
    area: Area,
    stats: StatPreset,
    next_id: u32,
}

impl EnemyFactory {
    /// Creates a factory scattering enemies over a square of `area_side`.
    #[must_use]
    pub fn new(area_side: f64, stats: StatPreset) -> Self {
        Self {
            area: Area::new(area_side),
            stats,
            next_id: 0,
        }
    }

    /// Generates the next enemy.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EnemySeed {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        EnemySeed {
            id,
            position: self.area.sample(rng),
            stats: self.stats,
        }
    }
}

/// Produces chests with sequential identifiers at random positions.
#[derive(Clone, Debug)]
pub struct ChestFactory {
    area: Area,
    next_id: u32,
}

impl ChestFactory {
    /// Creates a factory scattering chests over a square of `area_side`.
    #[must_use]
    pub fn new(area_side: f64) -> Self {
        Self {
            area: Area::new(area_side),
            next_id: 0,
        }
    }

    /// Generates the next chest.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ChestSeed {
        let id = ChestId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        ChestSeed {
            id,
            position: self.area.sample(rng),
        }
    }
}

/// Complete set of enemies and chests for a new world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    /// Generated enemies ordered by identifier.
    pub enemies: Vec<EnemySeed>,
    /// Generated chests ordered by identifier.
    pub chests: Vec<ChestSeed>,
}

impl Population {
    /// Generates the population described by `config` from `seed`.
    #[must_use]
    pub fn generate(config: &Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut enemy_factory = EnemyFactory::new(config.area_side, config.enemy_stats);
        let enemies: Vec<EnemySeed> = (0..config.enemies)
            .map(|_| enemy_factory.generate(&mut rng))
            .collect();

        let mut chest_factory = ChestFactory::new(config.area_side);
        let chests: Vec<ChestSeed> = (0..config.chests)
            .map(|_| chest_factory.generate(&mut rng))
            .collect();

        debug!(
            enemies = enemies.len(),
            chests = chests.len(),
            area_side = config.area_side,
            "population generated"
        );

        Self { enemies, chests }
    }
}

#[derive(Clone, Copy, Debug)]
struct Area {
    half_side: f64,
}

impl Area {
    fn new(side: f64) -> Self {
        let side = if side.is_finite() { side.abs() } else { 0.0 };
        Self {
            half_side: side / 2.0,
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinates {
        let half = self.half_side;
        Coordinates::new(rng.gen_range(-half..=half), rng.gen_range(-half..=half))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_area_collapses_to_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut factory = ChestFactory::new(f64::NAN);

        let chest = factory.generate(&mut rng);

        assert_eq!(chest.position, Coordinates::new(0.0, 0.0));
    }

    #[test]
    fn identifiers_are_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut factory = EnemyFactory::new(10.0, StatPreset::ENEMY);

        let ids: Vec<u32> = (0..3)
            .map(|_| factory.generate(&mut rng).id.get())
            .collect();

        assert_eq!(ids, vec![0, 1, 2]);
    }
}
