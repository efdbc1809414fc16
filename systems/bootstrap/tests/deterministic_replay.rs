use overworld_core::{Direction, Event, Intent, PlayerSnapshot};
use overworld_system_bootstrap::{OverworldConfig, Session};
use overworld_system_spawning as spawning;
use overworld_world::query;

#[test]
fn seeded_sessions_replay_identically() {
    let first = replay();
    let second = replay();

    assert_eq!(first.player, second.player, "player diverged between runs");
    assert_eq!(
        first.events, second.events,
        "event log diverged between runs"
    );
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::EnemyActivated { .. })));
}

struct ReplayOutcome {
    player: PlayerSnapshot,
    events: Vec<Event>,
}

fn replay() -> ReplayOutcome {
    let config = OverworldConfig {
        seed: 0xfeed_beef,
        spawn: spawning::Config::new(3_000, 1_000, 160.0),
        ..OverworldConfig::default()
    };
    let mut session = Session::new(&config).expect("configuration is valid");
    let script = [
        Intent::Move(Direction::Left),
        Intent::Move(Direction::Left),
        Intent::Attack,
        Intent::Move(Direction::Up),
        Intent::SelectSlot(1),
        Intent::Move(Direction::Right),
        Intent::Move(Direction::Down),
        Intent::Attack,
    ];
    let mut events = Vec::new();

    for intent in script.iter().cycle().take(240) {
        session.submit(*intent);
        events.extend(session.tick());
    }

    ReplayOutcome {
        player: query::player(session.world()),
        events,
    }
}
