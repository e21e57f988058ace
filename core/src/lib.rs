#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tank Battle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allegiance of a tank, projectile, or flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The human-controlled side.
    Player,
    /// The AI-controlled side.
    Enemy,
}

impl Side {
    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Cardinal headings available to tanks and projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit vector for this heading in world units.
    ///
    /// Rows grow downward, so north points along negative `y`.
    #[must_use]
    pub const fn unit_vector(self) -> WorldPoint {
        match self {
            Self::North => WorldPoint::new(0.0, -1.0),
            Self::East => WorldPoint::new(1.0, 0.0),
            Self::South => WorldPoint::new(0.0, 1.0),
            Self::West => WorldPoint::new(-1.0, 0.0),
        }
    }

    /// Heading between two cardinally adjacent cells, if they are adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Traversability of a single navigation cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkState {
    /// Tanks may enter the cell.
    Walkable,
    /// The cell is permanently blocked by level geometry.
    NotWalkable,
}

/// Movement state of a tank as observed through snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveState {
    /// No path is in flight; the tank rests at its committed cell.
    Idle,
    /// The tank is translating cell by cell along an assigned path.
    MovingToCell,
}

/// Static level geometry that blocks navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Indestructible perimeter or interior wall.
    Wall,
    /// Brick block, visually distinct but equally impassable here.
    Brick,
}

/// Unique identifier assigned to a tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankId(u32);

impl TankId {
    /// Creates a new tank identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlagId(u32);

impl FlagId {
    /// Creates a new flag identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Continuous position or displacement expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units. Rows grow downward.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Component-wise sum of two points.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Ordered sequence of cells from a start cell to a goal cell, inclusive.
///
/// An empty path means no route exists; callers treat it as "stay put"
/// rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Creates a path from an ordered cell sequence.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// The canonical "no route" result.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Reports whether the path contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells in the path, start and goal inclusive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Ordered cells from start to goal.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Collidable classifications a projectile may be told to pass through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    /// Any tank fighting for the given side.
    Tank(Side),
    /// The flag belonging to the given side.
    Flag(Side),
}

/// Entity classifications a projectile never registers contacts against.
///
/// Fixed once at spawn time so the authority for "friendly fire off" lives
/// in one place rather than in contact-time branching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreSet {
    entries: Vec<ContactKind>,
}

impl IgnoreSet {
    /// Builds the standard ignore set for a projectile fired by `side`:
    /// that side's tanks and that side's flag.
    #[must_use]
    pub fn for_side(side: Side) -> Self {
        Self {
            entries: vec![ContactKind::Tank(side), ContactKind::Flag(side)],
        }
    }

    /// Reports whether the given classification is filtered out.
    #[must_use]
    pub fn contains(&self, kind: ContactKind) -> bool {
        self.entries.contains(&kind)
    }
}

/// Failure raised when a grid lookup addresses a coordinate outside the
/// configured dimensions. This is a caller bug, distinguished loudly from
/// the ordinary "no path" outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
pub struct OutOfBounds {
    /// Column index of the rejected lookup.
    pub column: u32,
    /// Row index of the rejected lookup.
    pub row: u32,
    /// Configured number of grid columns.
    pub columns: u32,
    /// Configured number of grid rows.
    pub rows: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the world to an empty arena with the provided dimensions.
    ConfigureArena {
        /// Number of navigation columns.
        columns: u32,
        /// Number of navigation rows.
        rows: u32,
        /// Side length of a square cell in world units.
        cell_length: f32,
        /// Enables single-claim-per-tick cell exclusivity at step commit.
        exclusive_cells: bool,
    },
    /// Records a blocking obstacle at the provided cell.
    PlaceObstacle {
        /// Geometry classification of the obstacle.
        kind: ObstacleKind,
        /// Cell the obstacle occupies.
        cell: CellCoord,
    },
    /// Spawns a tank for the provided side.
    SpawnTank {
        /// Side the tank fights for.
        side: Side,
        /// Cell the tank initially occupies.
        cell: CellCoord,
        /// Travel speed in world units per second.
        speed: f32,
    },
    /// Spawns the capture flag for the provided side.
    SpawnFlag {
        /// Side the flag belongs to.
        side: Side,
        /// Cell the flag occupies.
        cell: CellCoord,
    },
    /// Builds the navigation grid once from the geometry present right now.
    RebuildNavigation,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time elapsed since the previous tick.
        dt: Duration,
    },
    /// Assigns a fresh path to a tank, replacing any in-flight path.
    SetTankPath {
        /// Identifier of the tank receiving the path.
        tank: TankId,
        /// Ordered cells to walk, start inclusive.
        path: Path,
    },
    /// Translates a tank directly in world units without grid validation.
    Translate {
        /// Identifier of the tank being moved.
        tank: TankId,
        /// Horizontal displacement in world units.
        dx: f32,
        /// Vertical displacement in world units.
        dy: f32,
    },
    /// Turns a tank to face the provided heading.
    Aim {
        /// Identifier of the tank being turned.
        tank: TankId,
        /// Heading to adopt.
        direction: Direction,
    },
    /// Fires a projectile along the tank's current heading.
    Shoot {
        /// Identifier of the firing tank.
        tank: TankId,
    },
    /// Removes a tank from the world. A no-op if it is already gone.
    DestroyTank {
        /// Identifier of the tank being destroyed.
        tank: TankId,
    },
    /// Captures a flag, ending the round. A no-op if it is already gone.
    CaptureFlag {
        /// Identifier of the flag being captured.
        flag: FlagId,
    },
    /// Removes a projectile from the world. A no-op if it is already gone.
    DespawnProjectile {
        /// Identifier of the projectile being removed.
        projectile: ProjectileId,
    },
}

/// What a projectile struck this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactTarget {
    /// An opposing tank.
    Tank(TankId),
    /// An opposing flag.
    Flag(FlagId),
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the arena was reset to new dimensions.
    ArenaConfigured {
        /// Number of navigation columns.
        columns: u32,
        /// Number of navigation rows.
        rows: u32,
    },
    /// Confirms that the navigation grid was rebuilt from world geometry.
    NavigationRebuilt {
        /// Number of cells classified as blocked.
        blocked_cells: u32,
    },
    /// Confirms that a tank entered the world.
    TankSpawned {
        /// Identifier assigned to the tank.
        tank: TankId,
        /// Side the tank fights for.
        side: Side,
        /// Cell the tank occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that a flag entered the world.
    FlagSpawned {
        /// Identifier assigned to the flag.
        flag: FlagId,
        /// Side the flag belongs to.
        side: Side,
        /// Cell the flag occupies.
        cell: CellCoord,
    },
    /// Confirms that a projectile was fired.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tank that fired it.
        owner: TankId,
        /// Side the projectile fights for.
        side: Side,
        /// Heading the projectile travels along.
        direction: Direction,
    },
    /// Confirms that a tank committed a single cell step.
    TankStepped {
        /// Identifier of the tank that stepped.
        tank: TankId,
        /// Cell the tank occupied before the step.
        from: CellCoord,
        /// Cell the tank occupies after the step.
        to: CellCoord,
    },
    /// Announces that a tank finished its path and returned to idle.
    TankArrived {
        /// Identifier of the arriving tank.
        tank: TankId,
        /// Cell the tank came to rest on.
        cell: CellCoord,
    },
    /// Announces that an in-flight path was discarded because its next cell
    /// became blocked after planning.
    TankPathAborted {
        /// Identifier of the halted tank.
        tank: TankId,
        /// Cell that failed re-validation at the moment of advance.
        blocked: CellCoord,
    },
    /// Reports that a projectile overlapped a hostile entity this tick.
    ProjectileContact {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Side the projectile fights for.
        side: Side,
        /// Entity that was struck.
        target: ContactTarget,
    },
    /// Confirms that a tank was removed from the world.
    TankDestroyed {
        /// Identifier of the destroyed tank.
        tank: TankId,
        /// Side the tank fought for.
        side: Side,
    },
    /// Confirms that a flag was captured, ending the round.
    FlagCaptured {
        /// Identifier of the captured flag.
        flag: FlagId,
        /// Side the flag belonged to.
        side: Side,
    },
    /// Confirms that a projectile left the world.
    ProjectileDespawned {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
}

/// Immutable representation of a single tank's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TankSnapshot {
    /// Unique identifier assigned to the tank.
    pub id: TankId,
    /// Side the tank fights for.
    pub side: Side,
    /// Grid cell most recently committed by the tank.
    pub cell: CellCoord,
    /// Continuous position in world units.
    pub position: WorldPoint,
    /// Heading the hull currently faces.
    pub facing: Direction,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Current movement state.
    pub move_state: MoveState,
    /// Head of the in-flight path, if any.
    pub next_hop: Option<CellCoord>,
}

/// Read-only snapshot describing all tanks in the arena.
#[derive(Clone, Debug, Default)]
pub struct TankView {
    snapshots: Vec<TankSnapshot>,
}

impl TankView {
    /// Creates a new tank view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TankSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic id order.
    pub fn iter(&self) -> impl Iterator<Item = &TankSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for a specific tank.
    #[must_use]
    pub fn get(&self, tank: TankId) -> Option<&TankSnapshot> {
        self.snapshots
            .binary_search_by_key(&tank, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TankSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Side the projectile fights for.
    pub side: Side,
    /// Continuous position in world units.
    pub position: WorldPoint,
    /// Heading the projectile travels along.
    pub direction: Direction,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic id order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single flag's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagSnapshot {
    /// Unique identifier assigned to the flag.
    pub id: FlagId,
    /// Side the flag belongs to.
    pub side: Side,
    /// Cell the flag occupies.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all standing flags.
#[derive(Clone, Debug, Default)]
pub struct FlagView {
    snapshots: Vec<FlagSnapshot>,
}

impl FlagView {
    /// Creates a new flag view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<FlagSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic id order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<FlagSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense navigation grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    states: &'a [WalkState],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided cell slice.
    ///
    /// The slice is stored in row-major order and must contain exactly
    /// `columns * rows` entries.
    #[must_use]
    pub fn new(states: &'a [WalkState], columns: u32, rows: u32) -> Self {
        debug_assert_eq!(
            states.len(),
            usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX),
            "grid view slice does not match its dimensions"
        );
        Self {
            states,
            columns,
            rows,
        }
    }

    /// Walk state of the provided cell, failing loudly outside the grid.
    pub fn state_at(&self, cell: CellCoord) -> Result<WalkState, OutOfBounds> {
        self.index(cell)
            .and_then(|index| self.states.get(index).copied())
            .ok_or(OutOfBounds {
                column: cell.column(),
                row: cell.row(),
                columns: self.columns,
                rows: self.rows,
            })
    }

    /// Reports whether the cell exists and is traversable.
    ///
    /// Out-of-bounds coordinates read as not walkable, which is the polite
    /// answer for search frontiers; use [`GridView::state_at`] when an
    /// out-of-bounds lookup should be a detectable caller bug.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.states.get(index))
            .map_or(false, |state| *state == WalkState::Walkable)
    }

    /// Provides the dimensions of the underlying grid in cells.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, ContactKind, Direction, GridView, IgnoreSet, ObstacleKind, OutOfBounds, Path,
        Side, TankId, TankSnapshot, TankView, WalkState, WorldPoint,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, CellCoord::new(5, 3)), None);
    }

    #[test]
    fn ignore_set_filters_owner_side_only() {
        let ignore = IgnoreSet::for_side(Side::Player);
        assert!(ignore.contains(ContactKind::Tank(Side::Player)));
        assert!(ignore.contains(ContactKind::Flag(Side::Player)));
        assert!(!ignore.contains(ContactKind::Tank(Side::Enemy)));
        assert!(!ignore.contains(ContactKind::Flag(Side::Enemy)));
    }

    #[test]
    fn grid_view_rejects_out_of_bounds_lookups() {
        let states = vec![WalkState::Walkable; 6];
        let view = GridView::new(&states, 3, 2);

        assert_eq!(
            view.state_at(CellCoord::new(2, 1)),
            Ok(WalkState::Walkable)
        );
        assert_eq!(
            view.state_at(CellCoord::new(3, 0)),
            Err(OutOfBounds {
                column: 3,
                row: 0,
                columns: 3,
                rows: 2,
            })
        );
        assert!(!view.is_walkable(CellCoord::new(0, 2)));
    }

    #[test]
    fn tank_view_sorts_and_finds_by_id() {
        let view = TankView::from_snapshots(vec![snapshot(7), snapshot(2), snapshot(5)]);
        let ids: Vec<u32> = view.iter().map(|tank| tank.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 7]);
        assert!(view.get(TankId::new(5)).is_some());
        assert!(view.get(TankId::new(3)).is_none());
    }

    fn snapshot(id: u32) -> TankSnapshot {
        TankSnapshot {
            id: TankId::new(id),
            side: Side::Enemy,
            cell: CellCoord::new(0, 0),
            position: WorldPoint::new(0.0, 0.0),
            facing: Direction::North,
            speed: 60.0,
            move_state: super::MoveState::Idle,
            next_hop: None,
        }
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tank_id_round_trips_through_bincode() {
        assert_round_trip(&TankId::new(42));
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn path_round_trips_through_bincode() {
        let path = Path::from_cells(vec![CellCoord::new(0, 0), CellCoord::new(0, 1)]);
        assert_round_trip(&path);
    }

    #[test]
    fn obstacle_kind_round_trips_through_bincode() {
        assert_round_trip(&ObstacleKind::Brick);
    }

    #[test]
    fn out_of_bounds_round_trips_through_bincode() {
        assert_round_trip(&OutOfBounds {
            column: 9,
            row: 9,
            columns: 4,
            rows: 4,
        });
    }
}
