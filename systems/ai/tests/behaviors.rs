use std::time::Duration;

use tank_battle_core::{CellCoord, Command, Event, ObstacleKind, Side, TankId};
use tank_battle_system_ai::{Ai, Behavior};
use tank_battle_world::{apply, query, World};

const TICK: Duration = Duration::from_millis(16);

fn configure(world: &mut World, events: &mut Vec<Event>) {
    apply(
        world,
        Command::ConfigureArena {
            columns: 10,
            rows: 10,
            cell_length: 30.0,
            exclusive_cells: false,
        },
        events,
    );
}

fn spawn_tank(world: &mut World, events: &mut Vec<Event>, side: Side, cell: CellCoord) -> TankId {
    events.clear();
    apply(
        world,
        Command::SpawnTank {
            side,
            cell,
            speed: 120.0,
        },
        events,
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::TankSpawned { tank, .. } => Some(*tank),
            _ => None,
        })
        .expect("spawn should announce the tank")
}

fn pump(world: &mut World, ai: &mut Ai, ticks: u32) -> Vec<Event> {
    let mut all_events = Vec::new();
    for _ in 0..ticks {
        let mut events = Vec::new();
        apply(world, Command::Tick { dt: TICK }, &mut events);

        let tanks = query::tank_view(world);
        let mut commands = Vec::new();
        ai.handle(&events, &tanks, query::grid_view(world), &mut commands);
        for command in commands {
            apply(world, command, &mut events);
        }
        all_events.extend(events);
    }
    all_events
}

#[test]
fn guard_walks_back_to_its_home_cell() {
    let mut world = World::new();
    let mut events = Vec::new();
    configure(&mut world, &mut events);
    let tank = spawn_tank(&mut world, &mut events, Side::Enemy, CellCoord::new(1, 1));

    let mut ai = Ai::new();
    ai.assign(
        tank,
        Behavior::Guard {
            home: CellCoord::new(6, 1),
        },
    );

    let observed = pump(&mut world, &mut ai, 200);
    assert!(
        observed
            .iter()
            .any(|event| matches!(event, Event::TankArrived { cell, .. } if *cell == CellCoord::new(6, 1))),
        "guard never reached home"
    );
    assert_eq!(
        query::tank_view(&world)
            .get(tank)
            .expect("guard survives the walk")
            .cell,
        CellCoord::new(6, 1)
    );
}

#[test]
fn guard_stays_put_once_home() {
    let mut world = World::new();
    let mut events = Vec::new();
    configure(&mut world, &mut events);
    let tank = spawn_tank(&mut world, &mut events, Side::Enemy, CellCoord::new(4, 4));

    let mut ai = Ai::new();
    ai.assign(
        tank,
        Behavior::Guard {
            home: CellCoord::new(4, 4),
        },
    );

    let observed = pump(&mut world, &mut ai, 20);
    assert!(
        !observed
            .iter()
            .any(|event| matches!(event, Event::TankStepped { .. })),
        "a settled guard should not move"
    );
}

#[test]
fn shooter_fires_down_a_clear_row_and_honors_the_cooldown() {
    let mut world = World::new();
    let mut events = Vec::new();
    configure(&mut world, &mut events);
    let shooter = spawn_tank(&mut world, &mut events, Side::Enemy, CellCoord::new(1, 5));
    let _target = spawn_tank(&mut world, &mut events, Side::Player, CellCoord::new(8, 5));

    let mut ai = Ai::new();
    ai.assign(
        shooter,
        Behavior::ShootOnSight {
            cooldown: Duration::from_millis(500),
        },
    );

    // 20 ticks cover 320ms of simulated time: the opening shot plus silence.
    let observed = pump(&mut world, &mut ai, 20);
    let shots = observed
        .iter()
        .filter(|event| matches!(event, Event::ProjectileSpawned { owner, .. } if *owner == shooter))
        .count();
    assert_eq!(shots, 1, "only the opening shot fits inside the cooldown");

    // Another 20 ticks push past 500ms since the opening shot.
    let observed = pump(&mut world, &mut ai, 20);
    let shots = observed
        .iter()
        .filter(|event| matches!(event, Event::ProjectileSpawned { owner, .. } if *owner == shooter))
        .count();
    assert_eq!(shots, 1, "exactly one follow-up shot after the cooldown");
}

#[test]
fn shooter_holds_fire_when_a_wall_blocks_the_line() {
    let mut world = World::new();
    let mut events = Vec::new();
    configure(&mut world, &mut events);
    apply(
        &mut world,
        Command::PlaceObstacle {
            kind: ObstacleKind::Wall,
            cell: CellCoord::new(4, 5),
        },
        &mut events,
    );
    apply(&mut world, Command::RebuildNavigation, &mut events);

    let shooter = spawn_tank(&mut world, &mut events, Side::Enemy, CellCoord::new(1, 5));
    let _target = spawn_tank(&mut world, &mut events, Side::Player, CellCoord::new(8, 5));

    let mut ai = Ai::new();
    ai.assign(
        shooter,
        Behavior::ShootOnSight {
            cooldown: Duration::from_millis(500),
        },
    );

    let observed = pump(&mut world, &mut ai, 120);
    assert!(
        !observed
            .iter()
            .any(|event| matches!(event, Event::ProjectileSpawned { .. })),
        "wall between the tanks should suppress every shot"
    );
}
