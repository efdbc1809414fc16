#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that assembles an Overworld session and drives its ticks.
//!
//! A [`Session`] owns the world and the pure systems and runs one fixed
//! pipeline per tick: activation reconciliation, enemy movement, player
//! movement, viewport synchronisation and finally combat. Each phase sees
//! the world exactly as the previous phase left it.

use overworld_core::{Command, Direction, Event, Intent};
use overworld_system_combat::Combat;
use overworld_system_movement::{self as movement, Movement};
use overworld_system_spawning::{self as spawning, Population};
use overworld_world::{
    self as world, config::WorldConfig, query, OpenSimplexOracle, World, WorldError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug_span, info};

/// Complete configuration of an Overworld session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverworldConfig {
    /// Master seed from which the population is derived.
    pub seed: u64,
    /// World tunables.
    pub world: WorldConfig,
    /// Population sizes and enemy statistics.
    pub spawn: spawning::Config,
    /// Enemy movement tunables.
    pub movement: movement::Config,
}

impl Default for OverworldConfig {
    fn default() -> Self {
        Self {
            seed: 0x0c0f_fee5,
            world: WorldConfig::default(),
            spawn: spawning::Config::default(),
            movement: movement::Config::default(),
        }
    }
}

/// Produces worlds and the data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds a populated world backed by OpenSimplex terrain.
    pub fn build_world(&self, config: &OverworldConfig) -> Result<World, WorldError> {
        let terrain = &config.world.terrain;
        let oracle = OpenSimplexOracle::new(terrain.noise_seed, terrain.frequency);
        let population = Population::generate(&config.spawn, config.seed);

        let world = World::new(
            &config.world,
            Box::new(oracle),
            population.enemies,
            population.chests,
        )?;
        info!(
            seed = config.seed,
            enemies = config.spawn.enemies,
            chests = config.spawn.chests,
            "world built"
        );
        Ok(world)
    }
}

/// Running simulation fed by player intents.
#[derive(Debug)]
pub struct Session {
    world: World,
    movement: Movement,
    combat: Combat,
    pending_move: Option<Direction>,
    pending_attack: bool,
    pending_slot: Option<u8>,
}

impl Session {
    /// Builds a world from `config` and wraps it in a session.
    pub fn new(config: &OverworldConfig) -> Result<Self, WorldError> {
        let world = Bootstrap.build_world(config)?;
        Ok(Self::from_world(world, Movement::new(config.movement)))
    }

    /// Wraps an existing world.
    #[must_use]
    pub fn from_world(world: World, movement: Movement) -> Self {
        Self {
            world,
            movement,
            combat: Combat::new(),
            pending_move: None,
            pending_attack: false,
            pending_slot: None,
        }
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Queues an intent for the next tick.
    ///
    /// Later movement and slot requests replace earlier ones within a tick.
    pub fn submit(&mut self, intent: Intent) {
        match intent {
            Intent::Move(direction) => self.pending_move = Some(direction),
            Intent::Attack => self.pending_attack = true,
            Intent::SelectSlot(slot) => self.pending_slot = Some(slot),
        }
    }

    /// Runs one tick of the pipeline and returns every event it produced.
    pub fn tick(&mut self) -> Vec<Event> {
        let span = debug_span!("tick", index = query::tick_index(&self.world) + 1);
        let _entered = span.enter();

        let mut events = Vec::new();
        if let Some(slot) = self.pending_slot.take() {
            world::apply(&mut self.world, Command::SelectSlot { slot }, &mut events);
        }

        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut tick_events);

        let mut commands = Vec::new();
        self.movement.handle(
            &tick_events,
            query::player(&self.world).combatant.position,
            &query::enemy_view(&self.world),
            &mut commands,
        );
        events.append(&mut tick_events);
        self.apply_all(&mut commands, &mut events);

        if let Some(direction) = self.pending_move.take() {
            world::apply(
                &mut self.world,
                Command::StepPlayer { direction },
                &mut events,
            );
            world::apply(&mut self.world, Command::SyncViewport, &mut events);
        }

        let player_attack = std::mem::take(&mut self.pending_attack);
        self.combat.handle(
            player_attack,
            &query::player(&self.world),
            &query::enemy_view(&self.world),
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        events
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_intents_replace_earlier_ones() {
        let config = OverworldConfig {
            spawn: spawning::Config::new(0, 0, 10.0),
            ..OverworldConfig::default()
        };
        let mut session = Session::new(&config).expect("default configuration is valid");

        session.submit(Intent::Move(Direction::Up));
        session.submit(Intent::Move(Direction::Down));
        session.submit(Intent::SelectSlot(7));
        session.submit(Intent::SelectSlot(2));

        assert_eq!(session.pending_move, Some(Direction::Down));
        assert_eq!(session.pending_slot, Some(2));
    }
}
