#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tank Battle.
//!
//! The world owns every entity and the navigation grid. Adapters and systems
//! mutate it exclusively through [`apply`], which executes a [`Command`] and
//! broadcasts the resulting [`Event`] values. Read access goes through the
//! [`query`] module, which hands out immutable snapshots and borrowed views.

use std::{collections::VecDeque, time::Duration};

use tank_battle_core::{
    CellCoord, Command, ContactKind, ContactTarget, Direction, Event, FlagId, IgnoreSet,
    ObstacleKind, ProjectileId, Side, TankId, WalkState, WorldPoint,
};

mod grid;

use grid::NavigationGrid;

const DEFAULT_COLUMNS: u32 = 42;
const DEFAULT_ROWS: u32 = 24;
const DEFAULT_CELL_LENGTH: f32 = 30.0;

/// Distance within which a tank is considered to have reached a cell center.
const ARRIVAL_EPSILON: f32 = 0.5;

/// Half extent of the square probe sampled at each cell center when the
/// navigation grid is rebuilt from world geometry.
const PROBE_HALF_EXTENT: f32 = 2.0;

/// Projectile travel speed in world units per second.
const PROJECTILE_SPEED: f32 = 400.0;

/// Discrete arena description shared with adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    columns: u32,
    rows: u32,
    cell_length: f32,
    exclusive_cells: bool,
}

impl Arena {
    /// Number of navigation columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of navigation rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total arena width in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total arena height in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Center of the provided cell in world units.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPoint {
        WorldPoint::new(
            (cell.column() as f32 + 0.5) * self.cell_length,
            (cell.row() as f32 + 0.5) * self.cell_length,
        )
    }

    fn cell_containing(&self, position: WorldPoint) -> CellCoord {
        let clamp = |value: f32, upper: u32| -> u32 {
            if upper == 0 || value <= 0.0 {
                return 0;
            }
            let index = (value / self.cell_length) as u32;
            index.min(upper - 1)
        };
        CellCoord::new(
            clamp(position.x(), self.columns),
            clamp(position.y(), self.rows),
        )
    }

    fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// World-object classifications probed during navigation rebuilds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Occupant {
    Wall,
    Brick,
    Flag,
}

/// Walkability classification applied to probed occupants. Walls, bricks,
/// and flags all block navigation; tanks and projectiles are never probed.
fn occupant_walk_state(occupant: Occupant) -> WalkState {
    match occupant {
        Occupant::Wall | Occupant::Brick | Occupant::Flag => WalkState::NotWalkable,
    }
}

#[derive(Clone, Copy, Debug)]
struct Obstacle {
    kind: ObstacleKind,
    cell: CellCoord,
}

impl Obstacle {
    fn occupant(&self) -> Occupant {
        match self.kind {
            ObstacleKind::Wall => Occupant::Wall,
            ObstacleKind::Brick => Occupant::Brick,
        }
    }
}

#[derive(Clone, Debug)]
struct Tank {
    id: TankId,
    side: Side,
    cell: CellCoord,
    position: WorldPoint,
    facing: Direction,
    speed: f32,
    path: VecDeque<CellCoord>,
}

impl Tank {
    fn move_state(&self) -> tank_battle_core::MoveState {
        if self.path.is_empty() {
            tank_battle_core::MoveState::Idle
        } else {
            tank_battle_core::MoveState::MovingToCell
        }
    }
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    side: Side,
    position: WorldPoint,
    direction: Direction,
    ignore: IgnoreSet,
}

#[derive(Clone, Copy, Debug)]
struct Flag {
    id: FlagId,
    side: Side,
    cell: CellCoord,
}

/// Per-tick single-claim ledger used when cell exclusivity is enabled.
///
/// The first tank (in id order) to claim a cell during a tick wins it;
/// later claimants stall in place and retry next tick.
#[derive(Debug)]
struct ClaimFrame {
    tick_index: u64,
    claims: Vec<(CellCoord, TankId)>,
}

impl ClaimFrame {
    fn new() -> Self {
        Self {
            tick_index: 0,
            claims: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.tick_index = 0;
        self.claims.clear();
    }

    fn claim(&mut self, tick_index: u64, cell: CellCoord, tank: TankId) -> bool {
        if self.tick_index != tick_index {
            self.tick_index = tick_index;
            self.claims.clear();
        }
        match self.claims.iter().find(|(claimed, _)| *claimed == cell) {
            Some((_, owner)) => *owner == tank,
            None => {
                self.claims.push((cell, tank));
                true
            }
        }
    }
}

/// Represents the authoritative Tank Battle world state.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    grid: NavigationGrid,
    obstacles: Vec<Obstacle>,
    tanks: Vec<Tank>,
    projectiles: Vec<Projectile>,
    flags: Vec<Flag>,
    claims: ClaimFrame,
    next_tank: u32,
    next_projectile: u32,
    next_flag: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world with the default empty arena.
    #[must_use]
    pub fn new() -> Self {
        let arena = Arena {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cell_length: DEFAULT_CELL_LENGTH,
            exclusive_cells: false,
        };
        Self {
            grid: NavigationGrid::all_walkable(arena.columns, arena.rows),
            arena,
            obstacles: Vec::new(),
            tanks: Vec::new(),
            projectiles: Vec::new(),
            flags: Vec::new(),
            claims: ClaimFrame::new(),
            next_tank: 0,
            next_projectile: 0,
            next_flag: 0,
            tick_index: 0,
        }
    }

    fn reset(&mut self, arena: Arena) {
        self.grid = NavigationGrid::all_walkable(arena.columns, arena.rows);
        self.arena = arena;
        self.obstacles.clear();
        self.tanks.clear();
        self.projectiles.clear();
        self.flags.clear();
        self.claims.clear();
        self.next_tank = 0;
        self.next_projectile = 0;
        self.next_flag = 0;
        self.tick_index = 0;
    }

    fn tank_mut(&mut self, tank: TankId) -> Option<&mut Tank> {
        self.tanks.iter_mut().find(|candidate| candidate.id == tank)
    }

    fn rebuild_navigation(&mut self, out_events: &mut Vec<Event>) {
        let arena = self.arena;
        let blockers: Vec<(CellCoord, Occupant)> = self
            .obstacles
            .iter()
            .map(|obstacle| (obstacle.cell, obstacle.occupant()))
            .chain(self.flags.iter().map(|flag| (flag.cell, Occupant::Flag)))
            .collect();

        self.grid = NavigationGrid::build_with(arena.columns, arena.rows, |cell| {
            let probe_center = arena.cell_center(cell);
            let blocked = blockers.iter().any(|(blocker, occupant)| {
                occupant_walk_state(*occupant) == WalkState::NotWalkable
                    && probe_intersects_cell(&arena, probe_center, *blocker)
            });
            if blocked {
                WalkState::NotWalkable
            } else {
                WalkState::Walkable
            }
        });

        out_events.push(Event::NavigationRebuilt {
            blocked_cells: self.grid.blocked_cells(),
        });
    }

    fn assign_path(&mut self, tank: TankId, cells: Vec<CellCoord>) {
        let Some(current) = self.tank_mut(tank).map(|entity| entity.cell) else {
            return;
        };

        let mut deque: VecDeque<CellCoord> = cells.into();
        if deque.front() == Some(&current) {
            let _ = deque.pop_front();
        }
        if deque.is_empty() {
            return;
        }

        let Some(head) = deque.front().copied() else {
            return;
        };
        if Direction::between(current, head).is_none() {
            return;
        }

        if let Some(entity) = self.tank_mut(tank) {
            entity.path = deque;
        }
    }

    fn translate(&mut self, tank: TankId, dx: f32, dy: f32) {
        let arena = self.arena;
        let half = arena.cell_length * 0.5;
        let Some(entity) = self.tank_mut(tank) else {
            return;
        };

        let moved = entity.position.offset(dx, dy);
        entity.position = WorldPoint::new(
            moved.x().clamp(half, arena.width() - half),
            moved.y().clamp(half, arena.height() - half),
        );
        entity.cell = arena.cell_containing(entity.position);

        if dx != 0.0 || dy != 0.0 {
            entity.facing = if dx.abs() >= dy.abs() {
                if dx >= 0.0 {
                    Direction::East
                } else {
                    Direction::West
                }
            } else if dy >= 0.0 {
                Direction::South
            } else {
                Direction::North
            };
        }
    }

    fn shoot(&mut self, tank: TankId, out_events: &mut Vec<Event>) {
        let half = self.arena.cell_length * 0.5;
        let Some(entity) = self.tanks.iter().find(|candidate| candidate.id == tank) else {
            return;
        };

        let direction = entity.facing;
        let muzzle = entity.facing.unit_vector();
        let position = entity
            .position
            .offset(muzzle.x() * half, muzzle.y() * half);
        let side = entity.side;

        let projectile = ProjectileId::new(self.next_projectile);
        self.next_projectile += 1;
        self.projectiles.push(Projectile {
            id: projectile,
            side,
            position,
            direction,
            ignore: IgnoreSet::for_side(side),
        });

        out_events.push(Event::ProjectileSpawned {
            projectile,
            owner: tank,
            side,
            direction,
        });
    }

    fn advance_tanks(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let elapsed = dt.as_secs_f32();
        if elapsed <= 0.0 {
            return;
        }

        for index in 0..self.tanks.len() {
            let mut remaining = self.tanks[index].speed * elapsed;
            while remaining > 0.0 {
                let Some(next) = self.tanks[index].path.front().copied() else {
                    break;
                };

                // Re-validate at the moment of advance; the path may have been
                // planned against a grid that has since been rebuilt.
                if !self.grid.is_walkable(next) {
                    let entity = &mut self.tanks[index];
                    entity.path.clear();
                    out_events.push(Event::TankPathAborted {
                        tank: entity.id,
                        blocked: next,
                    });
                    break;
                }

                if self.arena.exclusive_cells {
                    let id = self.tanks[index].id;
                    let occupied = self
                        .tanks
                        .iter()
                        .any(|other| other.id != id && other.cell == next);
                    if occupied || !self.claims.claim(self.tick_index, next, id) {
                        // Stall but keep the path; the claim frees next tick.
                        break;
                    }
                }

                let target = self.arena.cell_center(next);
                let entity = &mut self.tanks[index];
                if let Some(direction) = Direction::between(entity.cell, next) {
                    entity.facing = direction;
                }

                let distance = entity.position.distance_to(target);
                if distance <= remaining + ARRIVAL_EPSILON {
                    entity.position = target;
                    remaining -= distance.min(remaining);
                    let from = entity.cell;
                    entity.cell = next;
                    let _ = entity.path.pop_front();
                    let id = entity.id;
                    out_events.push(Event::TankStepped {
                        tank: id,
                        from,
                        to: next,
                    });
                    if self.tanks[index].path.is_empty() {
                        out_events.push(Event::TankArrived {
                            tank: id,
                            cell: next,
                        });
                    }
                } else {
                    let dx = (target.x() - entity.position.x()) / distance * remaining;
                    let dy = (target.y() - entity.position.y()) / distance * remaining;
                    entity.position = entity.position.offset(dx, dy);
                    remaining = 0.0;
                }
            }
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let elapsed = dt.as_secs_f32();
        let width = self.arena.width();
        let height = self.arena.height();

        let mut index = 0;
        while index < self.projectiles.len() {
            let entity = &mut self.projectiles[index];
            let velocity = entity.direction.unit_vector();
            entity.position = entity.position.offset(
                velocity.x() * PROJECTILE_SPEED * elapsed,
                velocity.y() * PROJECTILE_SPEED * elapsed,
            );

            let position = entity.position;
            let offscreen = position.x() < 0.0
                || position.y() < 0.0
                || position.x() > width
                || position.y() > height;
            if offscreen {
                let id = entity.id;
                let _ = self.projectiles.remove(index);
                out_events.push(Event::ProjectileDespawned { projectile: id });
            } else {
                index += 1;
            }
        }
    }

    /// Contact detection runs after all movement so outcomes act on
    /// post-movement positions. Friendly entities never register because the
    /// projectile's ignore set was fixed at spawn.
    fn detect_contacts(&self, out_events: &mut Vec<Event>) {
        let half = self.arena.cell_length * 0.5;

        for projectile in &self.projectiles {
            let mut contact = None;

            for tank in &self.tanks {
                if projectile.ignore.contains(ContactKind::Tank(tank.side)) {
                    continue;
                }
                if overlaps(projectile.position, tank.position, half) {
                    contact = Some(ContactTarget::Tank(tank.id));
                    break;
                }
            }

            if contact.is_none() {
                for flag in &self.flags {
                    if projectile.ignore.contains(ContactKind::Flag(flag.side)) {
                        continue;
                    }
                    let center = self.arena.cell_center(flag.cell);
                    if overlaps(projectile.position, center, half) {
                        contact = Some(ContactTarget::Flag(flag.id));
                        break;
                    }
                }
            }

            if let Some(target) = contact {
                out_events.push(Event::ProjectileContact {
                    projectile: projectile.id,
                    side: projectile.side,
                    target,
                });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn overlaps(point: WorldPoint, center: WorldPoint, half: f32) -> bool {
    (point.x() - center.x()).abs() <= half && (point.y() - center.y()).abs() <= half
}

fn probe_intersects_cell(arena: &Arena, probe_center: WorldPoint, cell: CellCoord) -> bool {
    let length = arena.cell_length();
    let min_x = cell.column() as f32 * length;
    let min_y = cell.row() as f32 * length;
    let max_x = min_x + length;
    let max_y = min_y + length;

    probe_center.x() + PROBE_HALF_EXTENT > min_x
        && probe_center.x() - PROBE_HALF_EXTENT < max_x
        && probe_center.y() + PROBE_HALF_EXTENT > min_y
        && probe_center.y() - PROBE_HALF_EXTENT < max_y
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena {
            columns,
            rows,
            cell_length,
            exclusive_cells,
        } => {
            world.reset(Arena {
                columns,
                rows,
                cell_length,
                exclusive_cells,
            });
            out_events.push(Event::ArenaConfigured { columns, rows });
        }
        Command::PlaceObstacle { kind, cell } => {
            if world.arena.contains(cell) {
                world.obstacles.push(Obstacle { kind, cell });
            }
        }
        Command::SpawnTank { side, cell, speed } => {
            if !world.arena.contains(cell) {
                return;
            }
            let tank = TankId::new(world.next_tank);
            world.next_tank += 1;
            world.tanks.push(Tank {
                id: tank,
                side,
                cell,
                position: world.arena.cell_center(cell),
                facing: match side {
                    Side::Player => Direction::North,
                    Side::Enemy => Direction::South,
                },
                speed,
                path: VecDeque::new(),
            });
            out_events.push(Event::TankSpawned { tank, side, cell });
        }
        Command::SpawnFlag { side, cell } => {
            if !world.arena.contains(cell) {
                return;
            }
            let flag = FlagId::new(world.next_flag);
            world.next_flag += 1;
            world.flags.push(Flag { id: flag, side, cell });
            out_events.push(Event::FlagSpawned { flag, side, cell });
        }
        Command::RebuildNavigation => {
            world.rebuild_navigation(out_events);
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_tanks(dt, out_events);
            world.advance_projectiles(dt, out_events);
            world.detect_contacts(out_events);
        }
        Command::SetTankPath { tank, path } => {
            world.assign_path(tank, path.into_cells());
        }
        Command::Translate { tank, dx, dy } => {
            world.translate(tank, dx, dy);
        }
        Command::Aim { tank, direction } => {
            if let Some(entity) = world.tank_mut(tank) {
                entity.facing = direction;
            }
        }
        Command::Shoot { tank } => {
            world.shoot(tank, out_events);
        }
        Command::DestroyTank { tank } => {
            if let Some(index) = world.tanks.iter().position(|entity| entity.id == tank) {
                let side = world.tanks[index].side;
                let _ = world.tanks.remove(index);
                out_events.push(Event::TankDestroyed { tank, side });
            }
        }
        Command::CaptureFlag { flag } => {
            if let Some(index) = world.flags.iter().position(|entity| entity.id == flag) {
                let side = world.flags[index].side;
                let _ = world.flags.remove(index);
                out_events.push(Event::FlagCaptured { flag, side });
            }
        }
        Command::DespawnProjectile { projectile } => {
            if let Some(index) = world
                .projectiles
                .iter()
                .position(|entity| entity.id == projectile)
            {
                let _ = world.projectiles.remove(index);
                out_events.push(Event::ProjectileDespawned { projectile });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tank_battle_core::{
        FlagSnapshot, FlagView, GridView, ProjectileSnapshot, ProjectileView, TankSnapshot,
        TankView,
    };

    /// Discrete arena description shared with adapters.
    #[must_use]
    pub fn arena(world: &World) -> super::Arena {
        world.arena
    }

    /// Borrowed view of the dense navigation grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        let (columns, rows) = world.grid.dimensions();
        GridView::new(world.grid.states(), columns, rows)
    }

    /// Captures a read-only view of the tanks in the arena.
    #[must_use]
    pub fn tank_view(world: &World) -> TankView {
        TankView::from_snapshots(
            world
                .tanks
                .iter()
                .map(|tank| TankSnapshot {
                    id: tank.id,
                    side: tank.side,
                    cell: tank.cell,
                    position: tank.position,
                    facing: tank.facing,
                    speed: tank.speed,
                    move_state: tank.move_state(),
                    next_hop: tank.path.front().copied(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the live projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    side: projectile.side,
                    position: projectile.position,
                    direction: projectile.direction,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the standing flags.
    #[must_use]
    pub fn flag_view(world: &World) -> FlagView {
        FlagView::from_snapshots(
            world
                .flags
                .iter()
                .map(|flag| FlagSnapshot {
                    id: flag.id,
                    side: flag.side,
                    cell: flag.cell,
                })
                .collect(),
        )
    }
}
