#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Overworld.
//!
//! The world owns the terrain window, the player and the enemy and chest
//! populations. It is mutated exclusively through [`apply`] and read through
//! the functions in [`query`].

mod collision;
pub mod config;
mod ledger;
mod terrain;
mod viewport;

use overworld_core::{
    Actor, ChestId, ChestSeed, CombatantSnapshot, Command, Cooldown, Coordinates, Direction,
    EnemyId, EnemySeed, Event, InventorySlot, Item, NoiseOracle, PlayerSnapshot, Role, StatPreset,
    INVENTORY_SLOTS, WELCOME_BANNER,
};
use thiserror::Error;
use tracing::{debug, info, trace};

use collision::Mover;
use config::{ActivationConfig, ViewportConfig, WorldConfig};
use ledger::{ActivationLedger, Placed};
use terrain::{Chest, TerrainGenerator};
use viewport::ViewportGrid;

pub use ledger::LedgerError;
pub use terrain::{OpenSimplexOracle, TerrainError, TerrainWeights};

/// Cell the player starts in and the window is first centred on.
const PLAYER_START: Coordinates = Coordinates::new(0.05, 0.05);

/// Errors raised while constructing a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The terrain parameters were rejected.
    #[error("invalid terrain configuration")]
    Terrain(#[from] TerrainError),
    /// The viewport is too small to hold a movement feeler.
    #[error(
        "viewport of {columns}x{rows} is smaller than the minimum {}x{}",
        ViewportConfig::MIN_COLUMNS,
        ViewportConfig::MIN_ROWS
    )]
    ViewportTooSmall {
        /// Requested number of columns.
        columns: usize,
        /// Requested number of rows.
        rows: usize,
    },
    /// The activation radius or bucket size is unusable.
    #[error(
        "activation distance {active_distance} and bucket side {bucket_side} must be finite, \
         with a non-negative distance and a positive bucket side"
    )]
    InvalidActivation {
        /// Requested activation distance.
        active_distance: f64,
        /// Requested side of the dormant-entity buckets.
        bucket_side: f64,
    },
    /// The population contained the same identifier twice.
    #[error("invalid population")]
    Population(#[from] LedgerError),
}

/// Represents the authoritative Overworld state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    terrain: TerrainGenerator,
    viewport: ViewportGrid,
    player: Player,
    enemies: ActivationLedger<EnemyId, Combatant>,
    chests: ActivationLedger<ChestId, Chest>,
    active_distance: f64,
    experience_per_kill: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world from its configuration, noise source and populations.
    ///
    /// Every enemy and chest starts inactive; the first [`Command::Tick`]
    /// activates those near the player.
    pub fn new(
        config: &WorldConfig,
        oracle: Box<dyn NoiseOracle>,
        enemies: impl IntoIterator<Item = EnemySeed>,
        chests: impl IntoIterator<Item = ChestSeed>,
    ) -> Result<Self, WorldError> {
        let ViewportConfig { columns, rows } = config.viewport;
        if columns < ViewportConfig::MIN_COLUMNS || rows < ViewportConfig::MIN_ROWS {
            return Err(WorldError::ViewportTooSmall { columns, rows });
        }

        let ActivationConfig {
            active_distance,
            bucket_side,
        } = config.activation;
        if !active_distance.is_finite()
            || active_distance < 0.0
            || !bucket_side.is_finite()
            || bucket_side <= 0.0
        {
            return Err(WorldError::InvalidActivation {
                active_distance,
                bucket_side,
            });
        }

        let terrain = TerrainGenerator::from_config(&config.terrain, oracle)?;
        let viewport = ViewportGrid::new(PLAYER_START.rounded_cell(), columns, rows, &terrain);

        let mut enemy_ledger = ActivationLedger::new(bucket_side);
        for seed in enemies {
            enemy_ledger.insert(
                seed.id,
                Combatant::from_preset(Role::Enemy, seed.position, Direction::Down, seed.stats),
            )?;
        }
        let mut chest_ledger = ActivationLedger::new(bucket_side);
        for seed in chests {
            chest_ledger.insert(
                seed.id,
                Chest {
                    position: seed.position,
                },
            )?;
        }

        debug!(
            enemies = enemy_ledger.len(),
            chests = chest_ledger.len(),
            "world populated"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            terrain,
            viewport,
            player: Player::new(config.player.stats),
            enemies: enemy_ledger,
            chests: chest_ledger,
            active_distance,
            experience_per_kill: config.player.experience_per_kill,
            tick_index: 0,
        })
    }

    fn reconcile_activation(&mut self, out_events: &mut Vec<Event>) {
        let center = self.player.combatant.position;

        let enemies = self.enemies.reconcile(center, self.active_distance);
        out_events.extend(
            enemies
                .deactivated
                .iter()
                .map(|&enemy| Event::EnemyDeactivated { enemy }),
        );
        out_events.extend(
            enemies
                .activated
                .iter()
                .map(|&enemy| Event::EnemyActivated { enemy }),
        );

        let chests = self.chests.reconcile(center, self.active_distance);
        out_events.extend(
            chests
                .deactivated
                .iter()
                .map(|&chest| Event::ChestDeactivated { chest }),
        );
        out_events.extend(
            chests
                .activated
                .iter()
                .map(|&chest| Event::ChestActivated { chest }),
        );

        if !enemies.activated.is_empty()
            || !enemies.deactivated.is_empty()
            || !chests.activated.is_empty()
            || !chests.deactivated.is_empty()
        {
            debug!(
                tick = self.tick_index,
                enemies_in = enemies.activated.len(),
                enemies_out = enemies.deactivated.len(),
                chests_in = chests.activated.len(),
                chests_out = chests.deactivated.len(),
                "activation reconciled"
            );
        }

        debug_assert!(
            self.enemies.check_invariants().is_ok(),
            "enemy ledger out of sync"
        );
        debug_assert!(
            self.chests.check_invariants().is_ok(),
            "chest ledger out of sync"
        );
    }

    fn step_enemy(&mut self, enemy: EnemyId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(current) = self.enemies.get(&enemy) else {
            return;
        };
        if !self.enemies.is_active(&enemy) {
            trace!(enemy = enemy.get(), "ignoring step for inactive enemy");
            return;
        }
        debug_assert_eq!(current.role, Role::Enemy);

        let mover = current.mover(direction);
        let obstacles: Vec<Coordinates> = self
            .enemies
            .iter_active()
            .filter(|(id, _)| *id != enemy)
            .map(|(_, other)| other.position)
            .chain(std::iter::once(self.player.combatant.position))
            .collect();
        let free = collision::is_path_free(&self.viewport, mover, obstacles);

        let Some(combatant) = self.enemies.active_mut(&enemy) else {
            return;
        };
        combatant.facing = direction;
        if free {
            let from = combatant.position;
            combatant.step();
            out_events.push(Event::EnemyMoved {
                enemy,
                from,
                to: combatant.position,
            });
        } else {
            trace!(enemy = enemy.get(), ?direction, "enemy blocked");
            out_events.push(Event::EnemyBlocked {
                enemy,
                facing: direction,
            });
        }
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let mover = self.player.combatant.mover(direction);
        let obstacles: Vec<Coordinates> = self
            .enemies
            .iter_active()
            .map(|(_, enemy)| enemy.position)
            .collect();
        let free = collision::is_path_free(&self.viewport, mover, obstacles);

        let combatant = &mut self.player.combatant;
        combatant.facing = direction;
        self.player.previous_position = combatant.position;
        if free {
            let from = combatant.position;
            combatant.step();
            out_events.push(Event::PlayerMoved {
                from,
                to: combatant.position,
            });
        } else {
            trace!(role = ?combatant.role, ?direction, "player blocked");
            out_events.push(Event::PlayerBlocked { facing: direction });
        }
    }

    fn sync_viewport(&mut self, out_events: &mut Vec<Event>) {
        let shifts = self.viewport.slide(
            self.player.previous_position,
            self.player.combatant.position,
            self.player.combatant.facing,
            &self.terrain,
        );
        if shifts.is_empty() {
            return;
        }

        let center = self.viewport.center();
        debug!(
            shifts = shifts.len(),
            center_x = center.x(),
            center_y = center.y(),
            "viewport slid"
        );
        out_events.extend(
            shifts
                .into_iter()
                .map(|direction| Event::ViewportSlid { direction, center }),
        );
    }

    fn combatant(&self, actor: Actor) -> Option<&Combatant> {
        match actor {
            Actor::Player => Some(&self.player.combatant),
            Actor::Enemy(enemy) => self
                .enemies
                .is_active(&enemy)
                .then(|| self.enemies.get(&enemy))
                .flatten(),
        }
    }

    fn combatant_mut(&mut self, actor: Actor) -> Option<&mut Combatant> {
        match actor {
            Actor::Player => Some(&mut self.player.combatant),
            Actor::Enemy(enemy) => self.enemies.active_mut(&enemy),
        }
    }

    fn strike(&mut self, attacker: Actor, targets: Vec<Actor>, out_events: &mut Vec<Event>) {
        let Some(striker) = self.combatant(attacker) else {
            return;
        };
        if !striker.cooldown.is_ready() {
            out_events.push(Event::StrikeRejected { attacker });
            return;
        }
        let attack = striker.attack;
        if let Some(striker) = self.combatant_mut(attacker) {
            striker.cooldown.reset();
        }

        for target in targets {
            if target == attacker {
                continue;
            }
            let Some(defender) = self.combatant_mut(target) else {
                continue;
            };
            let was_standing = defender.hit_points > 0;
            let damage = (attack - defender.defense).max(0);
            defender.hit_points = defender.hit_points.saturating_sub(damage);
            let remaining = defender.hit_points;
            out_events.push(Event::StrikeLanded {
                attacker,
                target,
                damage,
                remaining,
            });

            if remaining > 0 {
                continue;
            }
            match target {
                Actor::Enemy(enemy) => {
                    let removed = self.enemies.remove(&enemy);
                    debug_assert!(removed.is_some(), "defeated enemy was not tracked");
                    let reward = self.experience_per_kill;
                    self.player.experience = self.player.experience.saturating_add(reward);
                    info!(
                        enemy = enemy.get(),
                        experience = self.player.experience,
                        "enemy defeated"
                    );
                    out_events.push(Event::EnemyDefeated {
                        enemy,
                        experience: reward,
                    });
                }
                Actor::Player if was_standing => {
                    info!(tick = self.tick_index, "player defeated");
                    out_events.push(Event::PlayerDefeated);
                }
                Actor::Player => {}
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });

            world.player.previous_position = world.player.combatant.position;
            world.player.combatant.cooldown.advance();
            world
                .enemies
                .for_each_active_mut(|_, enemy| enemy.cooldown.advance());
            world.reconcile_activation(out_events);
        }
        Command::StepEnemy { enemy, direction } => world.step_enemy(enemy, direction, out_events),
        Command::StepPlayer { direction } => world.step_player(direction, out_events),
        Command::SyncViewport => world.sync_viewport(out_events),
        Command::Strike { attacker, targets } => world.strike(attacker, targets, out_events),
        Command::StoreItem { slot, item } => {
            world.player.store(slot, item);
            out_events.push(Event::ItemStored { slot });
        }
        Command::SelectSlot { slot } => match InventorySlot::try_new(slot) {
            Ok(slot) => {
                world.player.select(slot);
                out_events.push(Event::SlotSelected { slot });
            }
            Err(reason) => out_events.push(Event::SlotRejected { slot, reason }),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use overworld_core::{
        Actor, ChestSnapshot, CombatantSnapshot, Direction, EnemyId, EnemyView, PlayerSnapshot,
        ViewportSnapshot,
    };

    use super::{collision, LedgerError, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of every active enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter_active()
                .map(|(id, enemy)| enemy.snapshot(Actor::Enemy(id)))
                .collect(),
        )
    }

    /// Captures a single enemy whether it is active or not.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<CombatantSnapshot> {
        world
            .enemies
            .get(&enemy)
            .map(|combatant| combatant.snapshot(Actor::Enemy(enemy)))
    }

    /// Reports whether the enemy is currently simulated.
    #[must_use]
    pub fn is_enemy_active(world: &World, enemy: EnemyId) -> bool {
        world.enemies.is_active(&enemy)
    }

    /// Captures every active chest ordered by identifier.
    #[must_use]
    pub fn active_chests(world: &World) -> Vec<ChestSnapshot> {
        let mut chests: Vec<ChestSnapshot> = world
            .chests
            .iter_active()
            .map(|(id, chest)| ChestSnapshot {
                id,
                position: chest.position,
            })
            .collect();
        chests.sort_by_key(|chest| chest.id);
        chests
    }

    /// Captures the materialised terrain window.
    #[must_use]
    pub fn viewport(world: &World) -> ViewportSnapshot {
        world.viewport.snapshot()
    }

    /// Population sizes as `(active, total)` for enemies and chests.
    #[must_use]
    pub fn population(world: &World) -> Population {
        Population {
            active_enemies: world.enemies.active_len(),
            total_enemies: world.enemies.len(),
            active_chests: world.chests.active_len(),
            total_chests: world.chests.len(),
        }
    }

    /// Reports whether `actor` could take one step toward `facing` right now.
    #[must_use]
    pub fn is_path_free(world: &World, actor: Actor, facing: Direction) -> bool {
        let Some(combatant) = world.combatant(actor) else {
            return false;
        };
        let mover = combatant.mover(facing);
        let mut obstacles: Vec<_> = world
            .enemies
            .iter_active()
            .filter(|(id, _)| actor != Actor::Enemy(*id))
            .map(|(_, enemy)| enemy.position)
            .collect();
        if actor != Actor::Player {
            obstacles.push(world.player.combatant.position);
        }
        collision::is_path_free(&world.viewport, mover, obstacles)
    }

    /// Verifies that every entity is either active or inactive, never both.
    pub fn check_invariants(world: &World) -> Result<(), LedgerError> {
        world.enemies.check_invariants()?;
        world.chests.check_invariants()
    }

    /// Entity counts tracked by the world.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Population {
        /// Enemies currently simulated.
        pub active_enemies: usize,
        /// Enemies still alive.
        pub total_enemies: usize,
        /// Chests currently simulated.
        pub active_chests: usize,
        /// Chests in the world.
        pub total_chests: usize,
    }
}

#[derive(Clone, Debug)]
struct Combatant {
    role: Role,
    position: Coordinates,
    facing: Direction,
    hit_points: i32,
    attack: i32,
    attack_range: f64,
    defense: i32,
    speed: f64,
    cooldown: Cooldown,
}

impl Combatant {
    fn from_preset(
        role: Role,
        position: Coordinates,
        facing: Direction,
        preset: StatPreset,
    ) -> Self {
        Self {
            role,
            position,
            facing,
            hit_points: preset.hit_points,
            attack: preset.attack,
            attack_range: preset.attack_range,
            defense: preset.defense,
            speed: preset.speed,
            cooldown: Cooldown::ready(preset.cooldown_ticks),
        }
    }

    fn mover(&self, facing: Direction) -> Mover {
        Mover {
            position: self.position,
            facing,
            speed: self.speed,
        }
    }

    fn step(&mut self) {
        self.position = self.position.stepped(self.facing, self.speed);
    }

    fn snapshot(&self, actor: Actor) -> CombatantSnapshot {
        CombatantSnapshot {
            actor,
            position: self.position,
            facing: self.facing,
            hit_points: self.hit_points,
            attack: self.attack,
            attack_range: self.attack_range,
            defense: self.defense,
            speed: self.speed,
            cooldown: self.cooldown,
        }
    }
}

impl Placed for Combatant {
    fn position(&self) -> Coordinates {
        self.position
    }
}

impl Placed for Chest {
    fn position(&self) -> Coordinates {
        self.position
    }
}

#[derive(Clone, Debug)]
struct Player {
    combatant: Combatant,
    base: StatPreset,
    previous_position: Coordinates,
    experience: u32,
    inventory: [Option<Item>; INVENTORY_SLOTS],
    selected: InventorySlot,
}

impl Player {
    fn new(base: StatPreset) -> Self {
        Self {
            combatant: Combatant::from_preset(Role::Player, PLAYER_START, Direction::Left, base),
            base,
            previous_position: PLAYER_START,
            experience: 0,
            inventory: [None; INVENTORY_SLOTS],
            selected: InventorySlot::default(),
        }
    }

    fn store(&mut self, slot: InventorySlot, item: Option<Item>) {
        self.inventory[slot.index()] = item;
        if slot == self.selected {
            self.refresh_equipment();
        }
    }

    fn select(&mut self, slot: InventorySlot) {
        self.selected = slot;
        self.refresh_equipment();
    }

    fn refresh_equipment(&mut self) {
        self.combatant.attack = self.base.attack;
        self.combatant.defense = self.base.defense;
        match self.inventory[self.selected.index()] {
            Some(Item::Weapon { attack }) => self.combatant.attack += attack,
            Some(Item::Armor { defense }) => self.combatant.defense += defense,
            None => {}
        }
    }

    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            combatant: self.combatant.snapshot(Actor::Player),
            previous_position: self.previous_position,
            experience: self.experience,
            selected_slot: self.selected,
            inventory: self.inventory,
        }
    }
}
