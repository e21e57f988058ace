#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Attachable tank behaviors that turn world snapshots into commands.
//!
//! Each tank holds zero or one behavior. The system consumes event streams
//! and immutable views, then emits command batches; it never touches world
//! state directly.

use std::{collections::BTreeMap, time::Duration};

use tank_battle_core::{
    CellCoord, Command, Direction, Event, GridView, MoveState, Side, TankId, TankSnapshot,
    TankView,
};
use tank_battle_system_pathfinding::find_path;

/// Behavior variants a tank may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Walks back to a designated home cell whenever the tank is idle
    /// elsewhere, then rests. Carries no combat logic.
    Guard {
        /// Cell the tank returns to.
        home: CellCoord,
    },
    /// Fires at the opposing side's tank whenever an unobstructed row or
    /// column aligns them, at a fixed cooldown cadence.
    ShootOnSight {
        /// Minimum time between successive shots.
        cooldown: Duration,
    },
}

#[derive(Debug)]
struct Assignment {
    behavior: Behavior,
    since_last_shot: Duration,
}

/// Pure behavior system ticking every assigned tank in id order.
#[derive(Debug, Default)]
pub struct Ai {
    assignments: BTreeMap<TankId, Assignment>,
}

impl Ai {
    /// Creates a behavior system with no assignments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a behavior to a tank, replacing any previous assignment.
    ///
    /// A shooter starts with its cooldown already elapsed so the first
    /// sighting fires immediately.
    pub fn assign(&mut self, tank: TankId, behavior: Behavior) {
        let since_last_shot = match behavior {
            Behavior::ShootOnSight { cooldown } => cooldown,
            Behavior::Guard { .. } => Duration::ZERO,
        };
        let _ = self.assignments.insert(
            tank,
            Assignment {
                behavior,
                since_last_shot,
            },
        );
    }

    /// Consumes world events and immutable views to emit behavior commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        tanks: &TankView,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::TankDestroyed { tank, .. } => {
                    let _ = self.assignments.remove(tank);
                }
                _ => {}
            }
        }

        for (tank, assignment) in &mut self.assignments {
            let Some(snapshot) = tanks.get(*tank) else {
                continue;
            };

            match assignment.behavior {
                Behavior::Guard { home } => guard_tick(snapshot, home, &grid, out),
                Behavior::ShootOnSight { cooldown } => {
                    assignment.since_last_shot =
                        assignment.since_last_shot.saturating_add(elapsed);

                    // A destroyed opponent leaves a permanent no-op, never a
                    // fault; the assignment idles until one respawns.
                    let Some(target) = opposing_tank(tanks, snapshot.side) else {
                        continue;
                    };
                    let Some(direction) = line_of_sight(&grid, snapshot.cell, target.cell)
                    else {
                        continue;
                    };
                    if assignment.since_last_shot < cooldown {
                        continue;
                    }

                    assignment.since_last_shot = Duration::ZERO;
                    out.push(Command::Aim {
                        tank: *tank,
                        direction,
                    });
                    out.push(Command::Shoot { tank: *tank });
                }
            }
        }
    }
}

fn guard_tick(
    snapshot: &TankSnapshot,
    home: CellCoord,
    grid: &GridView<'_>,
    out: &mut Vec<Command>,
) {
    if snapshot.move_state != MoveState::Idle || snapshot.cell == home {
        return;
    }

    let path = find_path(grid, snapshot.cell, home);
    if path.is_empty() {
        return;
    }

    out.push(Command::SetTankPath {
        tank: snapshot.id,
        path,
    });
}

fn opposing_tank(tanks: &TankView, side: Side) -> Option<&TankSnapshot> {
    // Views iterate in id order, so the first match is the lowest id.
    tanks
        .iter()
        .find(|candidate| candidate.side == side.opponent())
}

/// Firing heading from `from` to `to` when they share a row or column and
/// every cell strictly between them is walkable.
fn line_of_sight(grid: &GridView<'_>, from: CellCoord, to: CellCoord) -> Option<Direction> {
    if from == to {
        return None;
    }

    if from.column() == to.column() {
        let (low, high) = (from.row().min(to.row()), from.row().max(to.row()));
        for row in low + 1..high {
            if !grid.is_walkable(CellCoord::new(from.column(), row)) {
                return None;
            }
        }
        if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    } else if from.row() == to.row() {
        let (low, high) = (from.column().min(to.column()), from.column().max(to.column()));
        for column in low + 1..high {
            if !grid.is_walkable(CellCoord::new(column, from.row())) {
                return None;
            }
        }
        if to.column() > from.column() {
            Some(Direction::East)
        } else {
            Some(Direction::West)
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tank_battle_core::{WalkState, WorldPoint};

    fn snapshot(id: u32, side: Side, cell: CellCoord) -> TankSnapshot {
        TankSnapshot {
            id: TankId::new(id),
            side,
            cell,
            position: WorldPoint::new(0.0, 0.0),
            facing: Direction::North,
            speed: 60.0,
            move_state: MoveState::Idle,
            next_hop: None,
        }
    }

    fn open_grid(states: &mut Vec<WalkState>, columns: u32, rows: u32) -> GridView<'_> {
        states.clear();
        states.resize((columns * rows) as usize, WalkState::Walkable);
        GridView::new(states, columns, rows)
    }

    #[test]
    fn line_of_sight_requires_alignment() {
        let mut states = Vec::new();
        let grid = open_grid(&mut states, 5, 5);

        assert_eq!(
            line_of_sight(&grid, CellCoord::new(1, 1), CellCoord::new(4, 1)),
            Some(Direction::East)
        );
        assert_eq!(
            line_of_sight(&grid, CellCoord::new(2, 4), CellCoord::new(2, 0)),
            Some(Direction::North)
        );
        assert_eq!(
            line_of_sight(&grid, CellCoord::new(1, 1), CellCoord::new(2, 2)),
            None
        );
    }

    #[test]
    fn line_of_sight_blocked_by_geometry() {
        let mut states = vec![WalkState::Walkable; 25];
        states[(2 * 5 + 2) as usize] = WalkState::NotWalkable;
        let grid = GridView::new(&states, 5, 5);

        assert_eq!(
            line_of_sight(&grid, CellCoord::new(0, 2), CellCoord::new(4, 2)),
            None
        );
        // The blocked cell sits outside the strict interval here.
        assert_eq!(
            line_of_sight(&grid, CellCoord::new(2, 1), CellCoord::new(2, 2)),
            Some(Direction::South)
        );
    }

    #[test]
    fn guard_requests_path_home_when_idle_elsewhere() {
        let mut states = Vec::new();
        let grid = open_grid(&mut states, 5, 5);
        let mut ai = Ai::new();
        let tank = TankId::new(3);
        ai.assign(
            tank,
            Behavior::Guard {
                home: CellCoord::new(4, 4),
            },
        );

        let tanks = TankView::from_snapshots(vec![snapshot(3, Side::Enemy, CellCoord::new(1, 1))]);
        let mut out = Vec::new();
        ai.handle(&[], &tanks, grid, &mut out);

        match out.as_slice() {
            [Command::SetTankPath { tank: requested, path }] => {
                assert_eq!(*requested, tank);
                assert_eq!(path.cells().first(), Some(&CellCoord::new(1, 1)));
                assert_eq!(path.cells().last(), Some(&CellCoord::new(4, 4)));
            }
            other => panic!("expected a single path request, got {other:?}"),
        }
    }

    #[test]
    fn guard_rests_once_home() {
        let mut states = Vec::new();
        let grid = open_grid(&mut states, 5, 5);
        let mut ai = Ai::new();
        ai.assign(
            TankId::new(3),
            Behavior::Guard {
                home: CellCoord::new(1, 1),
            },
        );

        let tanks = TankView::from_snapshots(vec![snapshot(3, Side::Enemy, CellCoord::new(1, 1))]);
        let mut out = Vec::new();
        ai.handle(&[], &tanks, grid, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn shooter_fires_immediately_then_waits_out_cooldown() {
        let mut states = Vec::new();
        let grid = open_grid(&mut states, 6, 6);
        let mut ai = Ai::new();
        let shooter = TankId::new(1);
        ai.assign(
            shooter,
            Behavior::ShootOnSight {
                cooldown: Duration::from_millis(500),
            },
        );

        let tanks = TankView::from_snapshots(vec![
            snapshot(1, Side::Enemy, CellCoord::new(1, 2)),
            snapshot(2, Side::Player, CellCoord::new(5, 2)),
        ]);

        // First sighting fires at t = 0.
        let mut out = Vec::new();
        ai.handle(&[], &tanks, grid, &mut out);
        assert_eq!(
            out,
            vec![
                Command::Aim {
                    tank: shooter,
                    direction: Direction::East,
                },
                Command::Shoot { tank: shooter },
            ]
        );

        // Continuous line of sight stays silent until 500ms accumulate.
        for _ in 0..4 {
            out.clear();
            ai.handle(
                &[Event::TimeAdvanced {
                    dt: Duration::from_millis(100),
                }],
                &tanks,
                grid,
                &mut out,
            );
            assert!(out.is_empty(), "fired before the cooldown elapsed");
        }

        out.clear();
        ai.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(100),
            }],
            &tanks,
            grid,
            &mut out,
        );
        assert_eq!(out.len(), 2, "expected the shot once the cooldown elapsed");
    }

    #[test]
    fn shooter_idles_without_an_opponent() {
        let mut states = Vec::new();
        let grid = open_grid(&mut states, 6, 6);
        let mut ai = Ai::new();
        ai.assign(
            TankId::new(1),
            Behavior::ShootOnSight {
                cooldown: Duration::from_millis(500),
            },
        );

        let tanks = TankView::from_snapshots(vec![snapshot(1, Side::Enemy, CellCoord::new(1, 2))]);
        let mut out = Vec::new();
        ai.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(1),
            }],
            &tanks,
            grid,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn destroyed_tanks_lose_their_assignment() {
        let mut states = Vec::new();
        let grid = open_grid(&mut states, 6, 6);
        let mut ai = Ai::new();
        let tank = TankId::new(1);
        ai.assign(
            tank,
            Behavior::Guard {
                home: CellCoord::new(0, 0),
            },
        );

        let mut out = Vec::new();
        ai.handle(
            &[Event::TankDestroyed {
                tank,
                side: Side::Enemy,
            }],
            &TankView::default(),
            grid,
            &mut out,
        );
        assert!(ai.assignments.is_empty());
        assert!(out.is_empty());
    }
}
