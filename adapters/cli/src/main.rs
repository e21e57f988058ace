#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless capture-the-flag skirmish.
//!
//! Builds a walled arena with bricks, flags, and tanks on both sides, then
//! pumps the tick loop until a flag falls or the time limit expires. All
//! commentary goes through `tracing`; tune it with `RUST_LOG`.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tank_battle_core::{
    CellCoord, Command, Direction, Event, ObstacleKind, Side, TankId,
};
use tank_battle_system_ai::{Ai, Behavior};
use tank_battle_system_combat::Combat;
use tank_battle_system_pathfinding::find_path;
use tank_battle_world::{apply, query, World};
use tracing::{debug, info};

/// Headless tank battle skirmish runner.
#[derive(Debug, Parser)]
#[command(name = "tank-battle", about = "Runs a headless capture-the-flag skirmish")]
struct Args {
    /// Number of arena columns.
    #[arg(long, default_value_t = 42)]
    columns: u32,
    /// Number of arena rows.
    #[arg(long, default_value_t = 24)]
    rows: u32,
    /// Side length of a square cell in world units.
    #[arg(long, default_value_t = 30.0)]
    cell_length: f32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Simulated seconds before the skirmish is called a draw.
    #[arg(long, default_value_t = 120)]
    max_seconds: u64,
    /// Grants each cell to at most one tank per tick at step commit.
    #[arg(long, default_value_t = false)]
    exclusive_cells: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    if args.columns < 16 || args.rows < 12 {
        bail!(
            "arena must be at least 16x12, got {}x{}",
            args.columns,
            args.rows
        );
    }

    let mut world = World::new();
    let mut events = Vec::new();
    let roster = build_level(&mut world, &args, &mut events)?;
    report(&events);

    let mut ai = Ai::new();
    ai.assign(
        roster.raider,
        Behavior::ShootOnSight {
            cooldown: Duration::from_millis(500),
        },
    );
    ai.assign(
        roster.sentry,
        Behavior::Guard {
            home: roster.sentry_home,
        },
    );
    ai.assign(
        roster.hunter,
        Behavior::ShootOnSight {
            cooldown: Duration::from_millis(500),
        },
    );

    // March the raider toward the enemy flag; behaviors handle the rest.
    let advance = find_path(
        &query::grid_view(&world),
        roster.raider_start,
        roster.raider_goal,
    );
    if advance.is_empty() {
        bail!("no route from {:?} to {:?}", roster.raider_start, roster.raider_goal);
    }
    apply(
        &mut world,
        Command::SetTankPath {
            tank: roster.raider,
            path: advance,
        },
        &mut events,
    );

    let tick = Duration::from_millis(args.tick_ms);
    let max_ticks = (args.max_seconds * 1000) / args.tick_ms.max(1);
    let mut combat = Combat::new();

    for tick_index in 0..max_ticks {
        events.clear();
        apply(&mut world, Command::Tick { dt: tick }, &mut events);

        let mut commands = Vec::new();
        combat.handle(&events, &mut commands);
        let tanks = query::tank_view(&world);
        ai.handle(&events, &tanks, query::grid_view(&world), &mut commands);
        // The adapter stands in for the player: on reaching the firing
        // position it turns toward the flag and pulls the trigger.
        if events.iter().any(|event| {
            matches!(
                event,
                Event::TankArrived { tank, cell }
                    if *tank == roster.raider && *cell == roster.raider_goal
            )
        }) {
            commands.push(Command::Aim {
                tank: roster.raider,
                direction: Direction::East,
            });
            commands.push(Command::Shoot {
                tank: roster.raider,
            });
        }
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        report(&events);
        if let Some((flag_side, winner)) = round_winner(&events) {
            let elapsed = tick.saturating_mul(u32::try_from(tick_index + 1).unwrap_or(u32::MAX));
            info!(?winner, ?flag_side, ?elapsed, "flag captured, round over");
            return Ok(());
        }
    }

    info!(seconds = args.max_seconds, "time limit reached, calling it a draw");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Tanks the skirmish pits against each other.
#[derive(Debug)]
struct Roster {
    /// Player tank advancing on the enemy flag.
    raider: TankId,
    raider_start: CellCoord,
    raider_goal: CellCoord,
    /// Enemy tank holding the cell in front of its flag.
    sentry: TankId,
    sentry_home: CellCoord,
    /// Enemy tank covering the midfield lane.
    hunter: TankId,
}

fn build_level(world: &mut World, args: &Args, events: &mut Vec<Event>) -> Result<Roster> {
    apply(
        world,
        Command::ConfigureArena {
            columns: args.columns,
            rows: args.rows,
            cell_length: args.cell_length,
            exclusive_cells: args.exclusive_cells,
        },
        events,
    );

    // Perimeter wall.
    for column in 0..args.columns {
        place(world, events, ObstacleKind::Wall, CellCoord::new(column, 0));
        place(
            world,
            events,
            ObstacleKind::Wall,
            CellCoord::new(column, args.rows - 1),
        );
    }
    for row in 1..args.rows - 1 {
        place(world, events, ObstacleKind::Wall, CellCoord::new(0, row));
        place(
            world,
            events,
            ObstacleKind::Wall,
            CellCoord::new(args.columns - 1, row),
        );
    }

    // Two brick ridges squeeze the midfield into lanes.
    let mid_row = args.rows / 2;
    let left_ridge = args.columns / 3;
    let right_ridge = 2 * args.columns / 3;
    for row in 2..args.rows - 2 {
        if row == mid_row {
            continue;
        }
        place(world, events, ObstacleKind::Brick, CellCoord::new(left_ridge, row));
        place(world, events, ObstacleKind::Brick, CellCoord::new(right_ridge, row));
    }

    let player_flag = CellCoord::new(2, mid_row);
    let enemy_flag = CellCoord::new(args.columns - 3, mid_row);
    apply(
        world,
        Command::SpawnFlag {
            side: Side::Player,
            cell: player_flag,
        },
        events,
    );
    apply(
        world,
        Command::SpawnFlag {
            side: Side::Enemy,
            cell: enemy_flag,
        },
        events,
    );

    apply(world, Command::RebuildNavigation, events);

    let raider_start = CellCoord::new(4, mid_row);
    let raider_goal = CellCoord::new(enemy_flag.column() - 2, mid_row);
    let sentry_home = CellCoord::new(enemy_flag.column() - 1, mid_row);
    // The sentry starts off-post so the opening seconds show it pathing home.
    let sentry_start = CellCoord::new(enemy_flag.column() - 1, mid_row - 4);
    let hunter_start = CellCoord::new(right_ridge + 2, mid_row - 2);

    let raider = spawn(world, events, Side::Player, raider_start)?;
    let sentry = spawn(world, events, Side::Enemy, sentry_start)?;
    let hunter = spawn(world, events, Side::Enemy, hunter_start)?;

    Ok(Roster {
        raider,
        raider_start,
        raider_goal,
        sentry,
        sentry_home,
        hunter,
    })
}

fn place(world: &mut World, events: &mut Vec<Event>, kind: ObstacleKind, cell: CellCoord) {
    apply(world, Command::PlaceObstacle { kind, cell }, events);
}

fn spawn(
    world: &mut World,
    events: &mut Vec<Event>,
    side: Side,
    cell: CellCoord,
) -> Result<TankId> {
    let before = events.len();
    apply(
        world,
        Command::SpawnTank {
            side,
            cell,
            speed: 120.0,
        },
        events,
    );
    let spawned = events[before..].iter().find_map(|event| match event {
        Event::TankSpawned { tank, .. } => Some(*tank),
        _ => None,
    });
    match spawned {
        Some(tank) => Ok(tank),
        None => bail!("could not spawn a {side:?} tank at {cell:?}"),
    }
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::NavigationRebuilt { blocked_cells } => {
                info!(blocked_cells, "navigation grid rebuilt")
            }
            Event::TankSpawned { tank, side, cell } => {
                info!(?tank, ?side, ?cell, "tank deployed")
            }
            Event::FlagSpawned { flag, side, cell } => {
                info!(?flag, ?side, ?cell, "flag planted")
            }
            Event::ProjectileSpawned {
                projectile,
                owner,
                side,
                direction,
            } => debug!(?projectile, ?owner, ?side, ?direction, "shot fired"),
            Event::TankArrived { tank, cell } => debug!(?tank, ?cell, "tank arrived"),
            Event::TankPathAborted { tank, blocked } => {
                info!(?tank, ?blocked, "path aborted at blocked cell")
            }
            Event::TankDestroyed { tank, side } => info!(?tank, ?side, "tank destroyed"),
            Event::FlagCaptured { flag, side } => info!(?flag, ?side, "flag captured"),
            _ => {}
        }
    }
}

fn round_winner(events: &[Event]) -> Option<(Side, Side)> {
    events.iter().find_map(|event| match event {
        Event::FlagCaptured { side, .. } => Some((*side, side.opponent())),
        _ => None,
    })
}
