#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects who a ready combatant hits.

use overworld_core::{
    perception::{in_sight, is_within_distance},
    Actor, CombatantSnapshot, Command, EnemyView, PlayerSnapshot,
};

/// Returns the defenders hit by `attacker` this tick.
///
/// A defender is hit when it is in sight, within attack range and the
/// attacker can attack. Landing a hit spends the attacker's readiness, so later
/// defenders in the same call are spared.
#[must_use]
pub fn combatant_attacks<'a>(
    attacker: &CombatantSnapshot,
    defenders: impl IntoIterator<Item = &'a CombatantSnapshot>,
) -> Vec<Actor> {
    let mut ready = attacker.can_attack();
    let mut hits = Vec::new();

    for defender in defenders {
        if !ready || defender.actor == attacker.actor {
            continue;
        }
        if in_sight(attacker.position, attacker.facing, defender.position)
            && is_within_distance(defender.position, attacker.position, attacker.attack_range)
        {
            ready = false;
            hits.push(defender.actor);
        }
    }

    hits
}

/// Combat system that turns hit selections into strike commands.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::Strike` for the player's pending attack and for every
    /// active enemy able to hit the player.
    pub fn handle(
        &mut self,
        player_attack: bool,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        if player_attack {
            let targets = combatant_attacks(&player.combatant, enemies.iter());
            if !targets.is_empty() {
                self.scratch.push(Command::Strike {
                    attacker: Actor::Player,
                    targets,
                });
            }
        }

        if player.combatant.hit_points > 0 {
            for enemy in enemies.iter() {
                let targets = combatant_attacks(enemy, [&player.combatant]);
                if !targets.is_empty() {
                    self.scratch.push(Command::Strike {
                        attacker: enemy.actor,
                        targets,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overworld_core::{Cooldown, Coordinates, Direction, EnemyId, InventorySlot};

    fn combatant(actor: Actor, x: f64, y: f64, facing: Direction, range: f64) -> CombatantSnapshot {
        CombatantSnapshot {
            actor,
            position: Coordinates::new(x, y),
            facing,
            hit_points: 100,
            attack: 10,
            attack_range: range,
            defense: 0,
            speed: 0.1,
            cooldown: Cooldown::ready(20),
        }
    }

    fn enemy(id: u32, x: f64, y: f64, facing: Direction) -> CombatantSnapshot {
        combatant(Actor::Enemy(EnemyId::new(id)), x, y, facing, 1.0)
    }

    fn player(x: f64, y: f64, facing: Direction) -> PlayerSnapshot {
        PlayerSnapshot {
            combatant: CombatantSnapshot {
                attack: 20,
                cooldown: Cooldown::ready(8),
                ..combatant(Actor::Player, x, y, facing, 2.0)
            },
            previous_position: Coordinates::new(x, y),
            experience: 0,
            selected_slot: InventorySlot::default(),
            inventory: [None; 4],
        }
    }

    #[test]
    fn attacks_require_sight_range_and_readiness() {
        let attacker = combatant(Actor::Player, 0.0, 5.0, Direction::Up, 2.0);
        let ahead = enemy(1, 0.0, 4.59, Direction::Down);
        let beside = enemy(2, 0.0, 4.61, Direction::Down);
        let distant = enemy(3, 0.0, 2.0, Direction::Down);

        assert_eq!(
            combatant_attacks(&attacker, [&ahead]),
            vec![Actor::Enemy(EnemyId::new(1))]
        );
        assert!(combatant_attacks(&attacker, [&beside, &distant]).is_empty());

        let mut tired = attacker;
        tired.cooldown.reset();
        assert!(combatant_attacks(&tired, [&ahead]).is_empty());
    }

    #[test]
    fn a_hit_spends_the_local_cooldown() {
        let attacker = combatant(Actor::Player, 0.0, 0.0, Direction::Right, 2.0);
        let first = enemy(1, 1.0, 0.0, Direction::Left);
        let second = enemy(2, 1.5, 0.5, Direction::Left);

        assert_eq!(
            combatant_attacks(&attacker, [&first, &second]),
            vec![Actor::Enemy(EnemyId::new(1))]
        );
    }

    #[test]
    fn player_strikes_only_when_attacking() {
        let mut system = Combat::new();
        let hero = player(0.0, 0.0, Direction::Left);
        let enemies = EnemyView::from_snapshots(vec![enemy(4, -1.5, 0.0, Direction::Up)]);
        let mut out = Vec::new();

        system.handle(false, &hero, &enemies, &mut out);
        assert!(out.is_empty());

        system.handle(true, &hero, &enemies, &mut out);
        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: Actor::Player,
                targets: vec![Actor::Enemy(EnemyId::new(4))],
            }]
        );
    }

    #[test]
    fn facing_enemies_strike_the_player() {
        let mut system = Combat::new();
        let hero = player(0.0, 0.0, Direction::Left);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(1, 0.9, 0.0, Direction::Left),
            enemy(2, -0.9, 0.0, Direction::Left),
        ]);
        let mut out = Vec::new();

        system.handle(false, &hero, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::Strike {
                attacker: Actor::Enemy(EnemyId::new(1)),
                targets: vec![Actor::Player],
            }]
        );
    }

    #[test]
    fn defeated_player_is_left_alone() {
        let mut system = Combat::new();
        let mut hero = player(0.0, 0.0, Direction::Left);
        hero.combatant.hit_points = 0;
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 0.9, 0.0, Direction::Left)]);
        let mut out = Vec::new();

        system.handle(false, &hero, &enemies, &mut out);

        assert!(out.is_empty());
    }
}
