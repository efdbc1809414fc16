//! Loading and overriding the session configuration.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use overworld_system_bootstrap::OverworldConfig;

/// Flag values that take precedence over the configuration file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) enemies: Option<u32>,
    pub(crate) chests: Option<u32>,
}

/// Reads the configuration file, or falls back to the reference values.
pub(crate) fn load(path: Option<&Path>) -> Result<OverworldConfig> {
    let Some(path) = path else {
        return Ok(OverworldConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&content).with_context(|| format!("failed to load config file {}", path.display()))
}

pub(crate) fn parse(content: &str) -> Result<OverworldConfig> {
    toml::from_str(content).context("failed to parse config TOML")
}

pub(crate) fn apply_overrides(config: &mut OverworldConfig, overrides: Overrides) {
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if let Some(enemies) = overrides.enemies {
        config.spawn.enemies = enemies;
    }
    if let Some(chests) = overrides.chests {
        config.spawn.chests = chests;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_reference_values() {
        let config = parse("").expect("empty TOML is valid");

        assert_eq!(config, OverworldConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = parse(
            r#"
            seed = 77

            [world.viewport]
            columns = 31

            [world.terrain]
            chest_roll_sides = 12
            weights = [
                { kind = "Grass", weight = 0.3 },
                { kind = "Mountain", weight = 0.2 },
            ]

            [spawn]
            enemies = 500
            "#,
        )
        .expect("valid TOML");

        assert_eq!(config.seed, 77);
        assert_eq!(config.world.viewport.columns, 31);
        assert_eq!(config.world.viewport.rows, 16);
        assert_eq!(config.world.terrain.chest_roll_sides, 12);
        assert_eq!(config.world.terrain.weights.len(), 2);
        assert_eq!(config.spawn.enemies, 500);
        assert_eq!(config.spawn.chests, 100_000);
        assert_eq!(config.movement.detection_distance, 7.0);
    }

    #[test]
    fn malformed_documents_are_reported() {
        let error = parse("seed = \"soon\"").expect_err("seed must be numeric");

        assert!(format!("{error:#}").contains("failed to parse config TOML"));
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = parse("seed = 1").expect("valid TOML");

        apply_overrides(
            &mut config,
            Overrides {
                seed: Some(9),
                enemies: Some(3),
                chests: None,
            },
        );

        assert_eq!(config.seed, 9);
        assert_eq!(config.spawn.enemies, 3);
        assert_eq!(config.spawn.chests, 100_000);
    }
}
