#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Overworld simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate raw input into
//! [`Intent`] values, the session turns intents and system output into
//! [`Command`] values, the world executes those commands via its `apply` entry
//! point, and then broadcasts [`Event`] values describing what changed. Systems
//! read immutable snapshots and respond exclusively with new command batches.

pub mod perception;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Overworld.";

/// Number of inventory slots carried by the player.
pub const INVENTORY_SLOTS: usize = 4;

/// Position expressed in fractional tile widths.
///
/// Integer parts identify the tile a point lies on. Coordinates are plain
/// values: moving an entity replaces its coordinates rather than mutating a
/// shared position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    x: f64,
    y: f64,
}

impl Coordinates {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal component, growing to the right.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance between two points on the plane.
    #[must_use]
    pub fn distance(self, other: Coordinates) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Returns the coordinates displaced by `amount` units toward `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction, amount: f64) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - amount),
            Direction::Down => Self::new(self.x, self.y + amount),
            Direction::Left => Self::new(self.x - amount, self.y),
            Direction::Right => Self::new(self.x + amount, self.y),
        }
    }

    /// Cell nearest to the point, rounding halves upwards.
    #[must_use]
    pub fn rounded_cell(self) -> CellCoord {
        CellCoord::new(round_half_up(self.x), round_half_up(self.y))
    }

    /// Cell containing the point.
    #[must_use]
    pub fn tile_cell(self) -> CellCoord {
        CellCoord::new(self.x.floor() as i64, self.y.floor() as i64)
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Integer location of a single terrain cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i64 {
        self.y
    }

    /// Coordinates of the cell's upper-left corner.
    #[must_use]
    pub fn corner(&self) -> Coordinates {
        Coordinates::new(self.x as f64, self.y as f64)
    }
}

/// Cardinal facing directions available to combatants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y`.
    Up,
    /// Toward increasing `y`.
    Down,
    /// Toward decreasing `x`.
    Left,
    /// Toward increasing `x`.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Reports whether the direction runs along the `y` axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Terrain classifications produced by the terrain generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open, passable ground that may hide a chest.
    Grass,
    /// Molten ground that blocks movement.
    Lava,
    /// Impassable rock.
    Mountain,
}

impl TerrainKind {
    /// Reports whether the terrain blocks movement.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Lava | Self::Mountain)
    }

    /// Resource identifier used by presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grass => "Grass",
            Self::Lava => "Lava",
            Self::Mountain => "Mountain",
        }
    }
}

/// Identity label carried by everything placed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player-controlled combatant.
    Player,
    /// A hostile combatant.
    Enemy,
    /// A lootable object.
    Chest,
    /// A terrain cell.
    Terrain(TerrainKind),
}

impl EntityKind {
    /// Resource identifier used by presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Enemy => "Enemy",
            Self::Chest => "Chest",
            Self::Terrain(kind) => kind.label(),
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a chest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChestId(u32);

impl ChestId {
    /// Creates a new chest identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Combatant taking part in an exchange of blows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Actor {
    /// The player.
    Player,
    /// An active enemy.
    Enemy(EnemyId),
}

/// Role tag distinguishing combatant behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Controlled through intents.
    Player,
    /// Controlled by the movement system.
    Enemy,
}

/// Combat statistics assigned to a freshly created combatant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatPreset {
    /// Starting hit points.
    pub hit_points: i32,
    /// Damage dealt before the defender's defense is subtracted.
    pub attack: i32,
    /// Maximum distance at which a strike lands.
    pub attack_range: f64,
    /// Damage absorbed from every incoming strike.
    pub defense: i32,
    /// Distance travelled per movement step, in world units.
    pub speed: f64,
    /// Ticks that must elapse between two strikes.
    pub cooldown_ticks: u32,
}

impl StatPreset {
    /// Reference statistics of the player.
    pub const PLAYER: StatPreset = StatPreset {
        hit_points: 100,
        attack: 20,
        attack_range: 2.0,
        defense: 0,
        speed: 1.0 / 3.0,
        cooldown_ticks: 8,
    };

    /// Reference statistics of an enemy.
    pub const ENEMY: StatPreset = StatPreset {
        hit_points: 100,
        attack: 10,
        attack_range: 1.0,
        defense: 0,
        speed: 0.1,
        cooldown_ticks: 20,
    };
}

/// Attack cooldown counting ticks since the last landed strike.
///
/// The elapsed counter only grows, saturating at `u32::MAX`, except for an
/// explicit [`Cooldown::reset`] when the owner lands a strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    elapsed: u32,
    threshold: u32,
}

impl Cooldown {
    /// Creates a cooldown that is immediately ready.
    #[must_use]
    pub const fn ready(threshold: u32) -> Self {
        Self {
            elapsed: threshold,
            threshold,
        }
    }

    /// Ticks elapsed since the last strike.
    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Reports whether another strike is allowed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.elapsed >= self.threshold
    }

    /// Accounts for one elapsed tick.
    pub fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }

    /// Restarts the cooldown after a landed strike.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

/// Equipment that modifies the player's statistics while selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    /// Adds to the player's attack.
    Weapon {
        /// Attack bonus granted while selected.
        attack: i32,
    },
    /// Adds to the player's defense.
    Armor {
        /// Defense bonus granted while selected.
        defense: i32,
    },
}

/// Validated index into the player's inventory.
///
/// The default slot is the first one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventorySlot(u8);

impl InventorySlot {
    /// Validates the provided zero-based slot index.
    pub fn try_new(index: u8) -> Result<Self, InventoryError> {
        if usize::from(index) < INVENTORY_SLOTS {
            Ok(Self(index))
        } else {
            Err(InventoryError::SlotOutOfRange { slot: index })
        }
    }

    /// Zero-based slot index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Reasons an inventory request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The slot index lies beyond the fixed inventory size.
    #[error("inventory slot {slot} is out of range (0..{INVENTORY_SLOTS})")]
    SlotOutOfRange {
        /// Slot index that failed validation.
        slot: u8,
    },
}

/// High-level requests produced by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Move the player one step toward the direction.
    Move(Direction),
    /// Strike whatever stands in front of the player.
    Attack,
    /// Select the inventory slot with the provided zero-based index.
    SelectSlot(u8),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and reconciles entity activation.
    Tick,
    /// Turns an enemy toward `direction` and moves it when the path is free.
    StepEnemy {
        /// Enemy attempting to move.
        enemy: EnemyId,
        /// Facing adopted before moving.
        direction: Direction,
    },
    /// Turns the player toward `direction` and moves it when the path is free.
    StepPlayer {
        /// Facing adopted before moving.
        direction: Direction,
    },
    /// Slides the terrain window when the player crossed a cell boundary.
    SyncViewport,
    /// Applies damage from `attacker` to every listed target.
    Strike {
        /// Combatant delivering the blow.
        attacker: Actor,
        /// Combatants hit by the blow.
        targets: Vec<Actor>,
    },
    /// Places an item into, or clears, an inventory slot.
    StoreItem {
        /// Slot receiving the item.
        slot: InventorySlot,
        /// Item to store, `None` empties the slot.
        item: Option<Item>,
    },
    /// Changes the selected inventory slot.
    SelectSlot {
        /// Raw zero-based slot index requested by the input collaborator.
        slot: u8,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// An enemy entered the active set.
    EnemyActivated {
        /// Enemy that became active.
        enemy: EnemyId,
    },
    /// An enemy left the active set.
    EnemyDeactivated {
        /// Enemy that became inactive.
        enemy: EnemyId,
    },
    /// A chest entered the active set.
    ChestActivated {
        /// Chest that became active.
        chest: ChestId,
    },
    /// A chest left the active set.
    ChestDeactivated {
        /// Chest that became inactive.
        chest: ChestId,
    },
    /// Confirms that an enemy moved.
    EnemyMoved {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Position before the step.
        from: Coordinates,
        /// Position after the step.
        to: Coordinates,
    },
    /// Reports that an enemy turned but could not move.
    EnemyBlocked {
        /// Enemy whose path was obstructed.
        enemy: EnemyId,
        /// Facing the enemy adopted.
        facing: Direction,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the step.
        from: Coordinates,
        /// Position after the step.
        to: Coordinates,
    },
    /// Reports that the player turned but could not move.
    PlayerBlocked {
        /// Facing the player adopted.
        facing: Direction,
    },
    /// Confirms that the terrain window slid by one cell.
    ViewportSlid {
        /// Direction the window travelled.
        direction: Direction,
        /// Centre cell of the window after sliding.
        center: CellCoord,
    },
    /// Confirms that a strike damaged a combatant.
    StrikeLanded {
        /// Combatant delivering the blow.
        attacker: Actor,
        /// Combatant receiving the blow.
        target: Actor,
        /// Hit points removed from the target.
        damage: i32,
        /// Hit points left on the target.
        remaining: i32,
    },
    /// Reports that a strike was refused because the attacker was cooling down.
    StrikeRejected {
        /// Combatant whose strike was refused.
        attacker: Actor,
    },
    /// Announces that an enemy was defeated and removed for good.
    EnemyDefeated {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Experience awarded to the player.
        experience: u32,
    },
    /// Announces that the player ran out of hit points.
    PlayerDefeated,
    /// Confirms that an item was stored in a slot.
    ItemStored {
        /// Slot that changed.
        slot: InventorySlot,
    },
    /// Confirms that the selected slot changed.
    SlotSelected {
        /// Newly selected slot.
        slot: InventorySlot,
    },
    /// Reports that a slot selection was rejected.
    SlotRejected {
        /// Requested slot index.
        slot: u8,
        /// Reason the request failed.
        reason: InventoryError,
    },
}

/// Immutable representation of a combatant used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatantSnapshot {
    /// Identity of the combatant.
    pub actor: Actor,
    /// Current position.
    pub position: Coordinates,
    /// Direction the combatant faces.
    pub facing: Direction,
    /// Remaining hit points.
    pub hit_points: i32,
    /// Current attack power.
    pub attack: i32,
    /// Maximum striking distance.
    pub attack_range: f64,
    /// Current defense.
    pub defense: i32,
    /// Distance travelled per step.
    pub speed: f64,
    /// Attack cooldown state.
    pub cooldown: Cooldown,
}

impl CombatantSnapshot {
    /// Reports whether the combatant may strike this tick.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.cooldown.is_ready()
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Combat state of the player.
    pub combatant: CombatantSnapshot,
    /// Position recorded at the start of the current tick.
    pub previous_position: Coordinates,
    /// Accumulated experience.
    pub experience: u32,
    /// Selected inventory slot.
    pub selected_slot: InventorySlot,
    /// Inventory contents.
    pub inventory: [Option<Item>; INVENTORY_SLOTS],
}

/// Immutable representation of a chest used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChestSnapshot {
    /// Identifier of the chest.
    pub id: ChestId,
    /// Position of the chest.
    pub position: Coordinates,
}

/// Immutable representation of a terrain tile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSnapshot {
    /// Terrain classification.
    pub kind: TerrainKind,
    /// Cell occupied by the tile.
    pub cell: CellCoord,
    /// Whether the tile blocks movement.
    pub solid: bool,
    /// Whether a chest was generated on the tile.
    pub has_chest: bool,
}

/// Read-only snapshot of the materialised terrain window.
///
/// Tiles are stored column-major so that the column index tracks horizontal
/// displacement and the row index vertical displacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewportSnapshot {
    origin: CellCoord,
    columns: usize,
    rows: usize,
    tiles: Vec<TileSnapshot>,
}

impl ViewportSnapshot {
    /// Creates a snapshot from column-major tiles.
    #[must_use]
    pub fn new(origin: CellCoord, columns: usize, rows: usize, tiles: Vec<TileSnapshot>) -> Self {
        debug_assert_eq!(tiles.len(), columns * rows, "tile count must match dimensions");
        Self {
            origin,
            columns,
            rows,
            tiles,
        }
    }

    /// Cell shown in the upper-left corner of the window.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Number of columns in the window.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows in the window.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Tiles of a single column ordered top to bottom.
    #[must_use]
    pub fn column(&self, column: usize) -> Option<&[TileSnapshot]> {
        let start = column.checked_mul(self.rows)?;
        self.tiles.get(start..start + self.rows)
    }

    /// Tile at the provided window-local column and row.
    #[must_use]
    pub fn tile(&self, column: usize, row: usize) -> Option<&TileSnapshot> {
        if row >= self.rows {
            return None;
        }
        self.column(column)?.get(row)
    }

    /// Iterator over every column in left-to-right order.
    pub fn iter_columns(&self) -> impl Iterator<Item = &[TileSnapshot]> {
        self.tiles.chunks(self.rows.max(1))
    }
}

/// Blueprint of an enemy produced by the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySeed {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Spawn position.
    pub position: Coordinates,
    /// Statistics the enemy starts with.
    pub stats: StatPreset,
}

/// Blueprint of a chest produced by the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChestSeed {
    /// Identifier assigned to the chest.
    pub id: ChestId,
    /// Spawn position.
    pub position: Coordinates,
}

/// Read-only snapshot describing every active enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<CombatantSnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CombatantSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.actor);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CombatantSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Deterministic source of coherent noise sampled per terrain cell.
///
/// Implementations must return values in `[0, 1]` and yield the same value for
/// the same cell for as long as the oracle lives.
pub trait NoiseOracle {
    /// Samples the noise value for the cell at `(x, y)`.
    fn value(&self, x: i64, y: i64) -> f64;
}

impl<F> NoiseOracle for F
where
    F: Fn(i64, i64) -> f64,
{
    fn value(&self, x: i64, y: i64) -> f64 {
        self(x, y)
    }
}
