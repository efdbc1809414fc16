//! Tunables consumed when constructing a [`World`](crate::World).
//!
//! Every section deserialises with its reference values filled in, so a
//! configuration file only needs to name the fields it overrides.

use overworld_core::{StatPreset, TerrainKind};
use serde::{Deserialize, Serialize};

/// Complete set of world tunables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Dimensions of the materialised terrain window.
    pub viewport: ViewportConfig,
    /// Proximity activation parameters.
    pub activation: ActivationConfig,
    /// Terrain generation parameters.
    pub terrain: TerrainConfig,
    /// Player statistics and combat rewards.
    pub player: PlayerConfig,
}

/// Dimensions of the terrain window kept around the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Number of columns in the window.
    pub columns: usize,
    /// Number of rows in the window.
    pub rows: usize,
}

impl ViewportConfig {
    /// Smallest window that still leaves room for a movement feeler.
    pub const MIN_COLUMNS: usize = 3;
    /// Smallest window that still leaves room for a movement feeler.
    pub const MIN_ROWS: usize = 4;
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            columns: 23,
            rows: 16,
        }
    }
}

/// Parameters of the proximity activation ledger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Entities farther than this from the player are not simulated.
    pub active_distance: f64,
    /// Side length of the spatial buckets indexing inactive entities.
    pub bucket_side: f64,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            active_distance: 22.0,
            bucket_side: 32.0,
        }
    }
}

/// Weight assigned to a single terrain kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainWeight {
    /// Terrain kind selected by this slice of the noise range.
    pub kind: TerrainKind,
    /// Width of the slice.
    pub weight: f64,
}

/// Parameters of the terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed handed to the noise oracle.
    pub noise_seed: u32,
    /// Scale applied to cell coordinates before sampling the noise.
    pub frequency: f64,
    /// Ordered weights walked when classifying a noise value.
    pub weights: Vec<TerrainWeight>,
    /// Kind that absorbs the part of the range the weights leave uncovered.
    pub remainder: TerrainKind,
    /// Number of sides of the die rolled for every grass tile.
    pub chest_roll_sides: u32,
    /// Seed mixed into every chest roll.
    pub chest_seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise_seed: 0x6f76_6572,
            frequency: 0.1,
            weights: vec![
                TerrainWeight {
                    kind: TerrainKind::Grass,
                    weight: 0.40,
                },
                TerrainWeight {
                    kind: TerrainKind::Lava,
                    weight: 0.01,
                },
                TerrainWeight {
                    kind: TerrainKind::Mountain,
                    weight: 0.08,
                },
            ],
            remainder: TerrainKind::Grass,
            chest_roll_sides: 30,
            chest_seed: 0x2f1c_9b37_a4e0_5d11,
        }
    }
}

/// Player statistics and the rewards the player collects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Statistics the player starts with.
    pub stats: StatPreset,
    /// Experience awarded for every defeated enemy.
    pub experience_per_kill: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stats: StatPreset::PLAYER,
            experience_per_kill: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = WorldConfig::default();

        assert_eq!(config.viewport.columns, 23);
        assert_eq!(config.viewport.rows, 16);
        assert_eq!(config.activation.active_distance, 22.0);
        assert_eq!(config.terrain.chest_roll_sides, 30);
        assert_eq!(config.terrain.weights.len(), 3);
        assert_eq!(config.player.stats, StatPreset::PLAYER);
        assert_eq!(config.player.experience_per_kill, 10);
    }
}
