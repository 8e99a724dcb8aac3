use alien_defence_core::{AlienId, AlienTemplate, Bounds, Command, Event, Outcome, Path, Position};
use alien_defence_system_motion::Motion;
use alien_defence_world::{self as world, query, World};

fn corridor() -> World {
    let path = Path::new((0..4).map(|x| Position::new(x, 0)).collect());
    World::new(
        Bounds::new(4, 2),
        path,
        AlienTemplate {
            health: 1.0,
            speed: 1.0,
        },
        &[0, 2],
    )
}

fn tick(world: &mut World, motion: &Motion) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);

    let mut commands = Vec::new();
    motion.handle(
        &events,
        query::path(world),
        &query::alien_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn position_of(world: &World, alien: u32) -> Position {
    query::alien_view(world)
        .get(AlienId::new(alien))
        .expect("alien exists")
        .position
}

#[test]
fn delayed_alien_stays_off_board_until_its_spawn_tick() {
    let mut world = corridor();
    let motion = Motion::new();

    let _ = tick(&mut world, &motion);
    assert_eq!(position_of(&world, 0), Position::new(0, 0));
    assert_eq!(position_of(&world, 1), Position::OFF_BOARD);

    let _ = tick(&mut world, &motion);
    assert_eq!(position_of(&world, 1), Position::OFF_BOARD);

    let _ = tick(&mut world, &motion);
    assert_eq!(position_of(&world, 0), Position::new(2, 0));
    assert_eq!(position_of(&world, 1), Position::new(0, 0));
}

#[test]
fn first_alien_to_reach_the_sentinel_ends_the_run() {
    let mut world = corridor();
    let motion = Motion::new();

    let mut last = Vec::new();
    for _ in 0..5 {
        last = tick(&mut world, &motion);
    }

    assert_eq!(query::outcome(&world), Outcome::Loss);
    assert_eq!(query::tick(&world), Some(4));
    assert!(last.contains(&Event::AlienBreached {
        alien: AlienId::new(0)
    }));
    assert_eq!(
        position_of(&world, 1),
        Position::new(1, 0),
        "aliens after the breaching one are not moved on the final tick"
    );
}
