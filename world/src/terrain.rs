//! Terrain classification of individual cells.

use std::fmt;

use noise::{NoiseFn, OpenSimplex};
use overworld_core::{CellCoord, Coordinates, NoiseOracle, TerrainKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::config::TerrainConfig;

/// Noise values at the top of the range may exceed the last boundary by
/// accumulated round-off.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Errors raised while validating terrain parameters.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TerrainError {
    /// No terrain weights were provided.
    #[error("terrain weights must not be empty")]
    Empty,
    /// A weight was negative or not a number.
    #[error("terrain weight {weight} for {kind:?} must be a non-negative number")]
    InvalidWeight {
        /// Terrain kind carrying the invalid weight.
        kind: TerrainKind,
        /// Offending weight.
        weight: f64,
    },
    /// The weights cover more than the whole noise range.
    #[error("terrain weights sum to {total}, which exceeds 1")]
    Overflow {
        /// Sum of all provided weights.
        total: f64,
    },
    /// The chest die has no sides.
    #[error("chest roll must have at least one side")]
    EmptyChestRoll,
}

/// Ordered terrain weights covering the whole `[0, 1]` noise range.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainWeights {
    entries: Vec<(TerrainKind, f64)>,
}

impl TerrainWeights {
    /// Validates the weights and folds the uncovered remainder into `remainder`.
    pub fn new(
        entries: impl IntoIterator<Item = (TerrainKind, f64)>,
        remainder: TerrainKind,
    ) -> Result<Self, TerrainError> {
        let mut entries: Vec<(TerrainKind, f64)> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(TerrainError::Empty);
        }

        for &(kind, weight) in &entries {
            if weight.is_nan() || weight < 0.0 {
                return Err(TerrainError::InvalidWeight { kind, weight });
            }
        }

        let total: f64 = entries.iter().map(|(_, weight)| weight).sum();
        if total > 1.0 + BOUNDARY_TOLERANCE {
            return Err(TerrainError::Overflow { total });
        }

        let leftover = 1.0 - total;
        if leftover > 0.0 {
            entries.push((remainder, leftover));
        }

        Ok(Self { entries })
    }

    /// Weighted entries including the folded remainder.
    #[must_use]
    pub fn entries(&self) -> &[(TerrainKind, f64)] {
        &self.entries
    }

    /// Selects the kind whose slice `(previous, boundary]` contains `value`.
    ///
    /// Values are clamped into `[0, 1]`; zero selects the first kind.
    #[must_use]
    pub fn select(&self, value: f64) -> TerrainKind {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };

        let mut boundary = 0.0;
        for &(kind, weight) in &self.entries {
            boundary += weight;
            if value <= boundary {
                return kind;
            }
        }

        self.entries
            .last()
            .map_or(TerrainKind::Grass, |&(kind, _)| kind)
    }
}

/// Default noise oracle backed by OpenSimplex noise.
pub struct OpenSimplexOracle {
    noise: OpenSimplex,
    seed: u32,
    frequency: f64,
}

impl OpenSimplexOracle {
    /// Creates an oracle sampling OpenSimplex noise at the given frequency.
    #[must_use]
    pub fn new(seed: u32, frequency: f64) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            seed,
            frequency,
        }
    }
}

impl fmt::Debug for OpenSimplexOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenSimplexOracle")
            .field("seed", &self.seed)
            .field("frequency", &self.frequency)
            .finish()
    }
}

impl NoiseOracle for OpenSimplexOracle {
    fn value(&self, x: i64, y: i64) -> f64 {
        let sample = self
            .noise
            .get([x as f64 * self.frequency, y as f64 * self.frequency]);
        ((sample + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

/// Chest placed on a grass tile or spawned by the population generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Chest {
    pub(crate) position: Coordinates,
}

/// Materialised terrain cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tile {
    pub(crate) kind: TerrainKind,
    pub(crate) cell: CellCoord,
    pub(crate) chest: Option<Chest>,
}

impl Tile {
    pub(crate) fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}

/// Produces tiles from a noise oracle and a set of weights.
pub(crate) struct TerrainGenerator {
    oracle: Box<dyn NoiseOracle>,
    weights: TerrainWeights,
    chest_roll_sides: u32,
    chest_seed: u64,
}

impl TerrainGenerator {
    pub(crate) fn from_config(
        config: &TerrainConfig,
        oracle: Box<dyn NoiseOracle>,
    ) -> Result<Self, TerrainError> {
        if config.chest_roll_sides == 0 {
            return Err(TerrainError::EmptyChestRoll);
        }

        let weights = TerrainWeights::new(
            config
                .weights
                .iter()
                .map(|entry| (entry.kind, entry.weight)),
            config.remainder,
        )?;

        Ok(Self {
            oracle,
            weights,
            chest_roll_sides: config.chest_roll_sides,
            chest_seed: config.chest_seed,
        })
    }

    /// Builds the tile for `cell`; identical inputs always yield identical tiles.
    pub(crate) fn generate_tile(&self, cell: CellCoord) -> Tile {
        let kind = self.weights.select(self.oracle.value(cell.x(), cell.y()));
        let chest = if kind == TerrainKind::Grass && self.roll_chest(cell) == 0 {
            Some(Chest {
                position: cell.corner(),
            })
        } else {
            None
        };

        Tile { kind, cell, chest }
    }

    fn roll_chest(&self, cell: CellCoord) -> u32 {
        let mut rng = ChaCha8Rng::seed_from_u64(cell_seed(self.chest_seed, cell));
        rng.gen_range(0..self.chest_roll_sides)
    }
}

impl fmt::Debug for TerrainGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrainGenerator")
            .field("weights", &self.weights)
            .field("chest_roll_sides", &self.chest_roll_sides)
            .field("chest_seed", &self.chest_seed)
            .finish_non_exhaustive()
    }
}

fn cell_seed(seed: u64, cell: CellCoord) -> u64 {
    let mut hash = seed
        ^ (cell.x() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (cell.y() as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51_afd7_ed55_8ccd);
    hash ^= hash >> 33;
    hash
}
