use overworld_core::{Command, StatPreset};
use overworld_system_spawning::{Config, EnemyFactory, Population};
use overworld_world::{self as world, config::WorldConfig, query, World};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

#[test]
fn population_is_deterministic_per_seed() {
    let config = Config::new(50, 40, 200.0);

    let first = Population::generate(&config, 0x5eed);
    let second = Population::generate(&config, 0x5eed);
    let other = Population::generate(&config, 0x5eee);

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(first.enemies.len(), 50);
    assert_eq!(first.chests.len(), 40);
}

#[test]
fn positions_stay_inside_the_area() {
    let config = Config::new(500, 500, 100.0);
    let population = Population::generate(&config, 17);

    let positions = population
        .enemies
        .iter()
        .map(|enemy| enemy.position)
        .chain(population.chests.iter().map(|chest| chest.position));
    for position in positions {
        assert!((-50.0..=50.0).contains(&position.x()), "{position:?}");
        assert!((-50.0..=50.0).contains(&position.y()), "{position:?}");
    }
}

#[test]
fn enemies_carry_configured_stats() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let stats = StatPreset {
        hit_points: 40,
        ..StatPreset::ENEMY
    };
    let mut factory = EnemyFactory::new(10.0, stats);

    assert_eq!(factory.generate(&mut rng).stats.hit_points, 40);
}

#[test]
fn generated_population_seeds_a_dormant_world() {
    let population = Population::generate(&Config::new(300, 300, 120.0), 42);
    let mut world = World::new(
        &WorldConfig::default(),
        Box::new(|_: i64, _: i64| 0.1),
        population.enemies,
        population.chests,
    )
    .expect("population identifiers are unique");

    let before = query::population(&world);
    assert_eq!(before.total_enemies, 300);
    assert_eq!(before.active_enemies, 0);

    let mut events = Vec::new();
    world::apply(&mut world, Command::Tick, &mut events);

    let after = query::population(&world);
    assert!(
        after.active_enemies > 0,
        "expected nearby enemies to wake up"
    );
    assert!(after.active_enemies < after.total_enemies);
    let player = query::player(&world).combatant.position;
    for enemy in query::enemy_view(&world).iter() {
        assert!(enemy.position.distance(player) <= 22.0);
    }
    assert!(query::check_invariants(&world).is_ok());
}
