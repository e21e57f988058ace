#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* search over the navigation grid.
//!
//! Every request runs a fresh search; nothing is cached between calls, so
//! identical grid, start, and goal inputs always produce identical paths.

use std::{cmp::Ordering, collections::BinaryHeap};

use tank_battle_core::{CellCoord, GridView, Path};

/// Finds the cheapest 4-neighbor path from `start` to `goal`, inclusive.
///
/// Step cost is uniform and the heuristic is Manhattan distance, so the
/// returned path is optimal. Frontier ties break by insertion order and
/// neighbors expand in the fixed order up, down, left, right, which keeps
/// the result reproducible. An unreachable or blocked goal yields an empty
/// path; the caller decides whether that means "stay put" or something
/// louder. A blocked start cell is tolerated so an entity overlapping fresh
/// geometry can still route out through its neighbors.
#[must_use]
pub fn find_path(grid: &GridView<'_>, start: CellCoord, goal: CellCoord) -> Path {
    if start == goal {
        return Path::from_cells(vec![start]);
    }

    let (columns, rows) = grid.dimensions();
    if !grid.is_walkable(goal) {
        return Path::empty();
    }
    let Some(start_index) = dense_index(columns, rows, start) else {
        return Path::empty();
    };
    let Some(goal_index) = dense_index(columns, rows, goal) else {
        return Path::empty();
    };

    let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    let mut best_cost = vec![u32::MAX; cell_count];
    let mut came_from: Vec<Option<CellCoord>> = vec![None; cell_count];

    let mut frontier = BinaryHeap::new();
    let mut sequence: u64 = 0;

    best_cost[start_index] = 0;
    frontier.push(Node {
        priority: start.manhattan_distance(goal),
        sequence,
        cell: start,
    });

    while let Some(node) = frontier.pop() {
        let Some(node_index) = dense_index(columns, rows, node.cell) else {
            continue;
        };

        if node_index == goal_index {
            return reconstruct(&came_from, columns, rows, start, goal);
        }

        let cost = best_cost[node_index];
        // Stale frontier entry: a cheaper route reached this cell already.
        if node.priority > cost.saturating_add(node.cell.manhattan_distance(goal)) {
            continue;
        }

        let next_cost = cost.saturating_add(1);
        for neighbor in expansion_order(node.cell, columns, rows) {
            if !grid.is_walkable(neighbor) {
                continue;
            }
            let Some(neighbor_index) = dense_index(columns, rows, neighbor) else {
                continue;
            };
            if best_cost[neighbor_index] <= next_cost {
                continue;
            }

            best_cost[neighbor_index] = next_cost;
            came_from[neighbor_index] = Some(node.cell);
            sequence += 1;
            frontier.push(Node {
                priority: next_cost.saturating_add(neighbor.manhattan_distance(goal)),
                sequence,
                cell: neighbor,
            });
        }
    }

    Path::empty()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node {
    priority: u32,
    sequence: u64,
    cell: CellCoord,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the binary heap pops the lowest priority first; equal
        // priorities pop in insertion order.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Yields the in-bounds cardinal neighbors in the fixed order up, down,
/// left, right.
fn expansion_order(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }
    if cell.row() + 1 < rows {
        candidates[count] = Some(CellCoord::new(cell.column(), cell.row() + 1));
        count += 1;
    }
    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }
    if cell.column() + 1 < columns {
        candidates[count] = Some(CellCoord::new(cell.column() + 1, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn dense_index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() >= columns || cell.row() >= rows {
        return None;
    }
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(columns).ok()?;
    Some(row * width + column)
}

fn reconstruct(
    came_from: &[Option<CellCoord>],
    columns: u32,
    rows: u32,
    start: CellCoord,
    goal: CellCoord,
) -> Path {
    let mut cells = vec![goal];
    let mut cursor = goal;

    while cursor != start {
        let Some(index) = dense_index(columns, rows, cursor) else {
            return Path::empty();
        };
        match came_from.get(index).copied().flatten() {
            Some(previous) => {
                cells.push(previous);
                cursor = previous;
            }
            None => return Path::empty(),
        }
    }

    cells.reverse();
    Path::from_cells(cells)
}
