use overworld_core::{Actor, Command, Coordinates, Direction, EnemyId, EnemySeed, Event, StatPreset};
use overworld_system_movement::{Config, Movement};
use overworld_world::{self as world, config::WorldConfig, query, World};

fn enemy_at(id: u32, x: f64, y: f64) -> EnemySeed {
    EnemySeed {
        id: EnemyId::new(id),
        position: Coordinates::new(x, y),
        stats: StatPreset::ENEMY,
    }
}

fn meadow_world(enemies: Vec<EnemySeed>) -> World {
    World::new(
        &WorldConfig::default(),
        Box::new(|_: i64, _: i64| 0.1),
        enemies,
        Vec::new(),
    )
    .expect("default configuration is valid")
}

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    events
}

#[test]
fn nearby_enemies_chase_the_player() {
    let mut world = meadow_world(vec![enemy_at(1, 4.0, -3.0), enemy_at(2, -5.0, 0.4)]);
    let events = tick(&mut world);
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &events,
        query::player(&world).combatant.position,
        &query::enemy_view(&world),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::StepEnemy {
                enemy: EnemyId::new(1),
                direction: Direction::Left,
            },
            Command::StepEnemy {
                enemy: EnemyId::new(1),
                direction: Direction::Down,
            },
            Command::StepEnemy {
                enemy: EnemyId::new(2),
                direction: Direction::Right,
            },
        ]
    );
}

#[test]
fn chasing_enemies_close_the_gap() {
    let mut world = meadow_world(vec![enemy_at(1, 5.0, 0.05)]);
    let mut movement = Movement::default();
    let start = 5.0_f64 - 0.05;

    for _ in 0..10 {
        let events = tick(&mut world);
        let mut commands = Vec::new();
        movement.handle(
            &events,
            query::player(&world).combatant.position,
            &query::enemy_view(&world),
            &mut commands,
        );
        for command in commands {
            let mut step_events = Vec::new();
            world::apply(&mut world, command, &mut step_events);
        }
    }

    let enemy = query::enemy(&world, EnemyId::new(1)).expect("enemy still exists");
    let gap = enemy.position.x() - 0.05;
    assert!((start - gap - 1.0).abs() < 1e-9, "gap {gap}");
    assert_eq!(enemy.facing, Direction::Left);
}

#[test]
fn distant_active_enemies_wander() {
    let mut world = meadow_world(vec![enemy_at(1, 15.0, 0.0)]);
    let mut movement = Movement::new(Config::new(7.0, 99));
    let mut issued = 0;

    for _ in 0..50 {
        let events = tick(&mut world);
        let mut commands = Vec::new();
        movement.handle(
            &events,
            query::player(&world).combatant.position,
            &query::enemy_view(&world),
            &mut commands,
        );
        assert!(commands.len() <= 1);
        issued += commands.len();
    }

    assert!(issued > 0, "wandering enemy never moved");
    assert!(issued < 50, "wandering enemy never stayed put");
}

#[test]
fn handle_ignores_batches_without_time() {
    let mut world = meadow_world(vec![enemy_at(1, 2.0, 0.0)]);
    let _ = tick(&mut world);
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[Event::PlayerBlocked {
            facing: Direction::Left,
        }],
        query::player(&world).combatant.position,
        &query::enemy_view(&world),
        &mut commands,
    );

    assert!(commands.is_empty());
    let enemy = Actor::Enemy(EnemyId::new(1));
    assert!(query::is_path_free(&world, enemy, Direction::Up));
}
