#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy movement system that chases a nearby player and otherwise wanders.

use overworld_core::{Actor, Command, Coordinates, Direction, EnemyView, Event};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use serde::{Deserialize, Serialize};

/// Offset along an axis below which a chasing enemy stops closing in.
const ALIGNMENT_TOLERANCE: f64 = 0.9;

/// Outcomes of a wander roll; the fifth outcome keeps the enemy in place.
const WANDER_CHOICES: [Option<Direction>; 5] = [
    Some(Direction::Down),
    Some(Direction::Up),
    Some(Direction::Left),
    Some(Direction::Right),
    None,
];

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enemies within this distance of the player chase it.
    pub detection_distance: f64,
    /// Seed of the wander generator.
    pub seed: u64,
}

impl Config {
    /// Creates a configuration with the provided detection distance and seed.
    #[must_use]
    pub const fn new(detection_distance: f64, seed: u64) -> Self {
        Self {
            detection_distance,
            seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(7.0, 0x9a1d_43c7_0e52_b6f8)
    }
}

/// Pure system that proposes one tick of enemy steps.
#[derive(Debug)]
pub struct Movement {
    detection_distance: f64,
    rng: ChaCha8Rng,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            detection_distance: config.detection_distance,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Emits step commands for active enemies once per elapsed tick.
    ///
    /// Enemies within detection distance close the horizontal gap first and
    /// the vertical gap second; the rest pick a random direction or stay.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: Coordinates,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for snapshot in enemies.iter() {
            let Actor::Enemy(enemy) = snapshot.actor else {
                continue;
            };

            if snapshot.position.distance(player) <= self.detection_distance {
                for direction in chase(snapshot.position, player).into_iter().flatten() {
                    out.push(Command::StepEnemy { enemy, direction });
                }
            } else if let Some(direction) = self.wander() {
                out.push(Command::StepEnemy { enemy, direction });
            }
        }
    }

    fn wander(&mut self) -> Option<Direction> {
        WANDER_CHOICES[self.rng.gen_range(0..WANDER_CHOICES.len())]
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Horizontal then vertical step bringing `from` closer to `target`.
fn chase(from: Coordinates, target: Coordinates) -> [Option<Direction>; 2] {
    let dx = target.x() - from.x();
    let dy = target.y() - from.y();

    let horizontal = if dx > ALIGNMENT_TOLERANCE {
        Some(Direction::Right)
    } else if dx < -ALIGNMENT_TOLERANCE {
        Some(Direction::Left)
    } else {
        None
    };
    let vertical = if dy > ALIGNMENT_TOLERANCE {
        Some(Direction::Down)
    } else if dy < -ALIGNMENT_TOLERANCE {
        Some(Direction::Up)
    } else {
        None
    };

    [horizontal, vertical]
}
