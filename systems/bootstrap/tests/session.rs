use overworld_core::{
    Actor, CellCoord, Coordinates, Direction, EnemyId, EnemySeed, Event, Intent, StatPreset,
};
use overworld_system_bootstrap::Session;
use overworld_system_movement::Movement;
use overworld_world::{config::WorldConfig, query, World};

fn enemy_at(id: u32, x: f64, y: f64, stats: StatPreset) -> EnemySeed {
    EnemySeed {
        id: EnemyId::new(id),
        position: Coordinates::new(x, y),
        stats,
    }
}

fn meadow_session(enemies: Vec<EnemySeed>) -> Session {
    let world = World::new(
        &WorldConfig::default(),
        Box::new(|_: i64, _: i64| 0.1),
        enemies,
        Vec::new(),
    )
    .expect("default configuration is valid");
    Session::from_world(world, Movement::default())
}

#[test]
fn movement_intents_walk_the_player_and_slide_the_window() {
    let mut session = meadow_session(Vec::new());

    session.submit(Intent::Move(Direction::Left));
    let first = session.tick();
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
    assert!(!first
        .iter()
        .any(|event| matches!(event, Event::ViewportSlid { .. })));

    session.submit(Intent::Move(Direction::Left));
    let second = session.tick();
    assert!(second.contains(&Event::ViewportSlid {
        direction: Direction::Left,
        center: CellCoord::new(-1, 0),
    }));

    let idle = session.tick();
    assert!(!idle
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
    assert_eq!(query::tick_index(session.world()), 3);
}

#[test]
fn repeated_attacks_defeat_an_adjacent_enemy() {
    let mut session = meadow_session(vec![enemy_at(1, -1.5, 0.05, StatPreset::ENEMY)]);
    let mut log = Vec::new();

    for _ in 0..60 {
        session.submit(Intent::Attack);
        log.extend(session.tick());
    }

    let landed = log
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::StrikeLanded {
                    attacker: Actor::Player,
                    ..
                }
            )
        })
        .count();
    assert_eq!(landed, 5);
    assert!(log.contains(&Event::EnemyDefeated {
        enemy: EnemyId::new(1),
        experience: 10,
    }));
    assert_eq!(query::player(session.world()).experience, 10);
    assert!(query::enemy_view(session.world()).is_empty());
}

#[test]
fn enemies_in_reach_strike_the_player_on_their_cooldown() {
    let long_reach = StatPreset {
        attack_range: 2.0,
        ..StatPreset::ENEMY
    };
    let mut session = meadow_session(vec![enemy_at(1, -1.5, 0.05, long_reach)]);

    let events = session.tick();
    assert!(events.contains(&Event::StrikeLanded {
        attacker: Actor::Enemy(EnemyId::new(1)),
        target: Actor::Player,
        damage: 10,
        remaining: 90,
    }));

    for _ in 0..10 {
        let _ = session.tick();
    }
    assert_eq!(query::player(session.world()).combatant.hit_points, 90);

    for _ in 0..10 {
        let _ = session.tick();
    }
    assert_eq!(query::player(session.world()).combatant.hit_points, 80);
}

#[test]
fn invalid_slot_selection_is_reported() {
    let mut session = meadow_session(Vec::new());

    session.submit(Intent::SelectSlot(6));
    let events = session.tick();

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::SlotRejected { slot: 6, .. })));
}
