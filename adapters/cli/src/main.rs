#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots an Overworld session and replays a script.

mod config;
mod script;
mod text;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use overworld_core::Event;
use overworld_rendering::{RenderingBackend, Scene};
use overworld_system_bootstrap::{Bootstrap, Session};
use overworld_world::query;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{config::Overrides, script::Script, text::TextRenderer};

/// Command-line arguments accepted by the Overworld binary.
#[derive(Debug, Parser)]
#[command(
    name = "overworld",
    about = "Explore an endless procedurally generated overworld"
)]
struct Args {
    /// TOML file overriding the reference configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Master seed of the population.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of enemies to scatter.
    #[arg(long)]
    enemies: Option<u32>,
    /// Number of chests to scatter.
    #[arg(long)]
    chests: Option<u32>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 60)]
    ticks: u64,
    /// Letters replayed one per tick: wasd move, f attacks, 1-4 select a slot, '.' idles.
    #[arg(long, default_value = "")]
    script: String,
    /// Render a frame every N ticks; 0 renders only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u64,
}

fn init_logging() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn render(session: &Session, backend: &mut impl RenderingBackend) -> Result<()> {
    let world = session.world();
    let scene = Scene::from_snapshots(
        &query::viewport(world),
        &query::player(world),
        &query::enemy_view(world),
        &query::active_chests(world),
    )?;
    backend.present(&scene)
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    config::apply_overrides(
        &mut config,
        Overrides {
            seed: args.seed,
            enemies: args.enemies,
            chests: args.chests,
        },
    );
    let script = Script::parse(&args.script)?;

    let mut session = Session::new(&config).context("failed to build the world")?;
    println!("{}", Bootstrap.welcome_banner(session.world()));

    let mut renderer = TextRenderer::new(io::stdout().lock());
    let mut defeated = 0_u32;
    for tick in 0..args.ticks {
        if let Some(intent) = script.intent_at(tick) {
            session.submit(intent);
        }

        let mut player_defeated = false;
        for event in session.tick() {
            match event {
                Event::EnemyDefeated { enemy, experience } => {
                    defeated += 1;
                    debug!(?enemy, experience, "enemy defeated");
                }
                Event::PlayerDefeated => player_defeated = true,
                _ => {}
            }
        }

        if args.render_every > 0 && (tick + 1) % args.render_every == 0 {
            render(&session, &mut renderer)?;
        }
        if player_defeated {
            info!(tick = tick + 1, "player defeated");
            break;
        }
    }

    if args.render_every == 0 {
        render(&session, &mut renderer)?;
    }

    let population = query::population(session.world());
    let player = query::player(session.world());
    info!(
        ticks = query::tick_index(session.world()),
        defeated,
        experience = player.experience,
        hit_points = player.combatant.hit_points,
        active_enemies = population.active_enemies,
        total_enemies = population.total_enemies,
        "session finished"
    );
    Ok(())
}
