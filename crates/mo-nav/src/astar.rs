//! A* search over [`GridTerrain`] and corner string-pulling.
//!
//! # Cost units
//!
//! Orthogonal steps cost 10, diagonal steps 14 (integer octile metric), so
//! the heap holds plain `u32`s and tie-breaking is exact and deterministic.
//! Diagonal moves are only allowed when both adjacent orthogonal cells are
//! walkable, so paths never clip obstacle corners.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mo_core::Vec3;

use crate::grid::GridTerrain;
use crate::{NavError, NavFilter, NavPath, NavResult, PathStatus};

const ORTHOGONAL: u32 = 10;
const DIAGONAL: u32 = 14;
const NO_PREV: u32 = u32::MAX;

const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

pub(crate) fn find_path(
    grid:   &GridTerrain,
    from:   Vec3,
    to:     Vec3,
    filter: NavFilter,
) -> NavResult<NavPath> {
    let start = grid.cell_of(from).ok_or(NavError::OutOfBounds(from))?;
    let goal  = grid.cell_of(to).ok_or(NavError::OutOfBounds(to))?;

    if filter.airborne {
        return Ok(NavPath::complete(vec![to]));
    }
    if start == goal {
        return Ok(NavPath::complete(vec![on_surface(grid, to)]));
    }

    let start_i = grid.index(start.0, start.1);
    let goal_i  = grid.index(goal.0, goal.1);

    let n = grid.cell_count();
    let mut g_cost = vec![u32::MAX; n];
    let mut prev   = vec![NO_PREV; n];

    g_cost[start_i] = 0;

    // Min-heap on (f, cell).  Secondary key gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, u32)>> = BinaryHeap::new();
    heap.push(Reverse((octile(start, goal), start_i as u32)));

    // Closest cell reached so far, for partial paths.
    let mut best = (octile(start, goal), start_i);

    while let Some(Reverse((f, cell))) = heap.pop() {
        let cell = cell as usize;
        if cell == goal_i {
            let cells = reconstruct(&prev, goal_i);
            return Ok(NavPath {
                corners: pull_corners(grid, from, &cells, on_surface(grid, to), filter),
                status:  PathStatus::Complete,
            });
        }

        let g = g_cost[cell];
        // Skip stale heap entries.
        if f > g.saturating_add(octile(grid.coords(cell), goal)) {
            continue;
        }

        let (cx, cz) = grid.coords(cell);
        for (dx, dz) in NEIGHBOURS {
            let nx = cx as i32 + dx;
            let nz = cz as i32 + dz;
            if nx < 0 || nz < 0 || nx >= grid.width as i32 || nz >= grid.depth as i32 {
                continue;
            }
            let (nx, nz) = (nx as u32, nz as u32);
            let ni = grid.index(nx, nz);
            if !grid.walkable_index(ni, filter) {
                continue;
            }
            let step = if dx != 0 && dz != 0 {
                let side_a = grid.index(nx, cz);
                let side_b = grid.index(cx, nz);
                if !grid.walkable_index(side_a, filter) || !grid.walkable_index(side_b, filter) {
                    continue;
                }
                DIAGONAL
            } else {
                ORTHOGONAL
            };

            let new_g = g.saturating_add(step);
            if new_g < g_cost[ni] {
                g_cost[ni] = new_g;
                prev[ni] = cell as u32;
                let h = octile((nx, nz), goal);
                if h < best.0 {
                    best = (h, ni);
                }
                heap.push(Reverse((new_g.saturating_add(h), ni as u32)));
            }
        }
    }

    // Goal unreachable: end at the closest reachable cell.
    let (_, best_i) = best;
    if best_i == start_i {
        return Ok(NavPath { corners: Vec::new(), status: PathStatus::Partial });
    }
    let cells = reconstruct(&prev, best_i);
    let (bx, bz) = grid.coords(best_i);
    Ok(NavPath {
        corners: pull_corners(grid, from, &cells, grid.cell_center(bx, bz), filter),
        status:  PathStatus::Partial,
    })
}

/// Octile distance between two cells in cost units.
#[inline]
fn octile(a: (u32, u32), b: (u32, u32)) -> u32 {
    let dx = a.0.abs_diff(b.0);
    let dz = a.1.abs_diff(b.1);
    let (lo, hi) = if dx < dz { (dx, dz) } else { (dz, dx) };
    DIAGONAL * lo + ORTHOGONAL * (hi - lo)
}

/// Cell indices from the start's successor to `end`, in travel order.
fn reconstruct(prev: &[u32], end: usize) -> Vec<usize> {
    let mut cells = Vec::new();
    let mut cur = end;
    while prev[cur] != NO_PREV {
        cells.push(cur);
        cur = prev[cur] as usize;
    }
    cells.reverse();
    cells
}

fn on_surface(grid: &GridTerrain, p: Vec3) -> Vec3 {
    match grid.cell_of(p) {
        Some((x, z)) => p.with_y(grid.cell_center(x, z).y),
        None => p,
    }
}

/// Collapse a cell chain into the corners where line of sight breaks.
fn pull_corners(
    grid:   &GridTerrain,
    from:   Vec3,
    cells:  &[usize],
    end:    Vec3,
    filter: NavFilter,
) -> Vec<Vec3> {
    let centers: Vec<Vec3> = cells
        .iter()
        .map(|&i| {
            let (x, z) = grid.coords(i);
            grid.cell_center(x, z)
        })
        .collect();

    let mut corners = Vec::new();
    let mut anchor = from;
    for k in 0..centers.len() {
        let next = if k + 1 < centers.len() { centers[k + 1] } else { end };
        if !line_of_sight(grid, anchor, next, filter) {
            corners.push(centers[k]);
            anchor = centers[k];
        }
    }
    corners.push(end);
    corners
}

/// Sample the segment at quarter-cell spacing; every sample must be walkable.
fn line_of_sight(grid: &GridTerrain, a: Vec3, b: Vec3, filter: NavFilter) -> bool {
    let step = grid.cell_size * 0.25;
    let samples = (a.planar_distance(b) / step).ceil().max(1.0) as usize;
    (0..=samples).all(|s| grid.is_walkable(a.lerp(b, s as f32 / samples as f32), filter))
}
