//! Static navigation grid builder used by the world crate.

use tank_battle_core::{CellCoord, WalkState};

/// Dense walkability grid sampled once from world geometry.
///
/// The grid mirrors the arena's cell dimensions and never mutates after
/// construction; destructible terrain is out of scope, so a rebuild replaces
/// the whole grid.
#[derive(Clone, Debug)]
pub(crate) struct NavigationGrid {
    columns: u32,
    rows: u32,
    states: Vec<WalkState>,
}

impl NavigationGrid {
    /// Creates a grid with every cell traversable.
    pub(crate) fn all_walkable(columns: u32, rows: u32) -> Self {
        Self::build_with(columns, rows, |_| WalkState::Walkable)
    }

    /// Builds the grid by sampling the classifier once per cell.
    pub(crate) fn build_with<F>(columns: u32, rows: u32, mut classify: F) -> Self
    where
        F: FnMut(CellCoord) -> WalkState,
    {
        let cell_count_u64 = u64::from(columns) * u64::from(rows);
        let cell_count = usize::try_from(cell_count_u64).unwrap_or(0);

        let mut states = Vec::with_capacity(cell_count);
        for row in 0..rows {
            for column in 0..columns {
                states.push(classify(CellCoord::new(column, row)));
            }
        }

        Self {
            columns,
            rows,
            states,
        }
    }

    /// Reports whether the cell exists and is traversable.
    pub(crate) fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.states.get(index))
            .map_or(false, |state| *state == WalkState::Walkable)
    }

    /// Number of cells classified as blocked.
    pub(crate) fn blocked_cells(&self) -> u32 {
        let count = self
            .states
            .iter()
            .filter(|state| **state == WalkState::NotWalkable)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Dense walk states stored in row-major order.
    pub(crate) fn states(&self) -> &[WalkState] {
        &self.states
    }

    /// Grid dimensions in cells.
    pub(crate) fn dimensions(&self) -> (u32, u32) {
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
