//! Uniform walkability grid with a per-cell height map.
//!
//! # Data layout
//!
//! Cells are stored row-major: the cell at column `x`, row `z` lives at
//! index `z * width + x`.  Each cell carries an area id (`BLOCKED` for
//! static obstacles) and a surface height.  World position `(wx, wz)` maps
//! to column `floor((wx - origin_x) / cell_size)`.

use mo_core::{SimRng, Vec3};

use crate::astar;
use crate::{NavError, NavFilter, NavPath, NavResult, TerrainNav};

/// Area id of an impassable cell.
pub const BLOCKED: u8 = u8::MAX;

/// Area id assigned to every cell by default.
pub const DEFAULT_AREA: u8 = 0;

/// Grid terrain.  Construct with [`GridTerrainBuilder`].
#[derive(Clone, Debug)]
pub struct GridTerrain {
    pub origin_x:  f32,
    pub origin_z:  f32,
    pub cell_size: f32,
    pub width:     u32,
    pub depth:     u32,
    area:          Vec<u8>,
    height:        Vec<f32>,
}

impl GridTerrain {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        self.area.len()
    }

    /// World-space extent as `(min corner, max corner)` on the ground plane.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let min = Vec3::ground(self.origin_x, self.origin_z);
        let max = Vec3::ground(
            self.origin_x + self.width as f32 * self.cell_size,
            self.origin_z + self.depth as f32 * self.cell_size,
        );
        (min, max)
    }

    // ── Cell addressing ───────────────────────────────────────────────────

    /// `(column, row)` of the cell containing `p`, or `None` off-grid.
    #[inline]
    pub fn cell_of(&self, p: Vec3) -> Option<(u32, u32)> {
        let fx = ((p.x - self.origin_x) / self.cell_size).floor();
        let fz = ((p.z - self.origin_z) / self.cell_size).floor();
        if fx < 0.0 || fz < 0.0 || fx >= self.width as f32 || fz >= self.depth as f32 {
            return None;
        }
        Some((fx as u32, fz as u32))
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, z: u32) -> usize {
        (z * self.width + x) as usize
    }

    #[inline]
    pub(crate) fn coords(&self, index: usize) -> (u32, u32) {
        (index as u32 % self.width, index as u32 / self.width)
    }

    /// Centre of cell `(x, z)` at its surface height.
    pub fn cell_center(&self, x: u32, z: u32) -> Vec3 {
        Vec3::new(
            self.origin_x + (x as f32 + 0.5) * self.cell_size,
            self.height[self.index(x, z)],
            self.origin_z + (z as f32 + 0.5) * self.cell_size,
        )
    }

    /// Area id at `p`, or `None` off-grid.
    pub fn area_at(&self, p: Vec3) -> Option<u8> {
        self.cell_of(p).map(|(x, z)| self.area[self.index(x, z)])
    }

    #[inline]
    pub(crate) fn walkable_index(&self, index: usize, filter: NavFilter) -> bool {
        let area = self.area[index];
        area != BLOCKED && filter.mask.allows(area)
    }

    /// `true` if the cell containing `p` may be walked on under `filter`.
    pub fn is_walkable(&self, p: Vec3, filter: NavFilter) -> bool {
        match self.cell_of(p) {
            Some((x, z)) => filter.airborne || self.walkable_index(self.index(x, z), filter),
            None => false,
        }
    }
}

impl TerrainNav for GridTerrain {
    fn compute_path(&self, from: Vec3, to: Vec3, filter: NavFilter) -> NavResult<NavPath> {
        astar::find_path(self, from, to, filter)
    }

    fn sample_height(&self, at: Vec3) -> Option<f32> {
        self.cell_of(at).map(|(x, z)| self.height[self.index(x, z)])
    }

    fn is_disc_clear(&self, center: Vec3, radius: f32, filter: NavFilter) -> bool {
        let r = radius.max(0.0);
        let min_x = ((center.x - r - self.origin_x) / self.cell_size).floor();
        let max_x = ((center.x + r - self.origin_x) / self.cell_size).floor();
        let min_z = ((center.z - r - self.origin_z) / self.cell_size).floor();
        let max_z = ((center.z + r - self.origin_z) / self.cell_size).floor();
        if min_x < 0.0 || min_z < 0.0 || max_x >= self.width as f32 || max_z >= self.depth as f32 {
            return false;
        }
        if filter.airborne {
            return true;
        }

        for z in min_z as u32..=max_z as u32 {
            for x in min_x as u32..=max_x as u32 {
                // Closest point of the cell rectangle to the disc centre.
                let cx0 = self.origin_x + x as f32 * self.cell_size;
                let cz0 = self.origin_z + z as f32 * self.cell_size;
                let px = center.x.clamp(cx0, cx0 + self.cell_size);
                let pz = center.z.clamp(cz0, cz0 + self.cell_size);
                let d2 = (px - center.x).powi(2) + (pz - center.z).powi(2);
                if d2 < r * r && !self.walkable_index(self.index(x, z), filter) {
                    return false;
                }
            }
        }
        true
    }
}

// ── GridTerrainBuilder ────────────────────────────────────────────────────────

/// Construct a [`GridTerrain`] incrementally, then call [`build`](Self::build).
///
/// Shapes are rasterised by cell centre: a cell is affected when its centre
/// lies inside the shape.
///
/// # Example
///
/// ```
/// use mo_core::Vec3;
/// use mo_nav::{GridTerrainBuilder, NavFilter, TerrainNav};
///
/// let terrain = GridTerrainBuilder::new(40, 40, 1.0)
///     .origin(-20.0, -20.0)
///     .block_rect(Vec3::ground(-1.0, -10.0), Vec3::ground(1.0, 10.0))
///     .build()
///     .unwrap();
/// assert!(!terrain.is_disc_clear(Vec3::ground(0.0, 0.0), 0.5, NavFilter::ground()));
/// ```
pub struct GridTerrainBuilder {
    origin_x:  f32,
    origin_z:  f32,
    cell_size: f32,
    width:     u32,
    depth:     u32,
    area:      Vec<u8>,
    height:    Vec<f32>,
}

impl GridTerrainBuilder {
    /// A flat, fully walkable grid of `width × depth` cells anchored at the origin.
    pub fn new(width: u32, depth: u32, cell_size: f32) -> Self {
        let cells = width as usize * depth as usize;
        Self {
            origin_x: 0.0,
            origin_z: 0.0,
            cell_size,
            width,
            depth,
            area: vec![DEFAULT_AREA; cells],
            height: vec![0.0; cells],
        }
    }

    /// World position of the grid's minimum corner.
    pub fn origin(mut self, x: f32, z: f32) -> Self {
        self.origin_x = x;
        self.origin_z = z;
        self
    }

    /// Set the area id of every cell whose centre lies in `[min, max]`.
    pub fn paint_rect(mut self, min: Vec3, max: Vec3, area: u8) -> Self {
        self.for_each_center(|c| {
            c.x >= min.x && c.x <= max.x && c.z >= min.z && c.z <= max.z
        }, |cell| cell.0 = area);
        self
    }

    /// Mark an axis-aligned rectangle impassable.
    pub fn block_rect(self, min: Vec3, max: Vec3) -> Self {
        self.paint_rect(min, max, BLOCKED)
    }

    /// Mark a disc impassable.
    pub fn block_disc(mut self, center: Vec3, radius: f32) -> Self {
        self.for_each_center(|c| c.planar_distance(center) <= radius, |cell| cell.0 = BLOCKED);
        self
    }

    /// Assign heights from a function of world `(x, z)`.
    pub fn height_fn<F: Fn(f32, f32) -> f32>(mut self, f: F) -> Self {
        self.for_each_center(|_| true, |cell| cell.1 = f(cell.2.x, cell.2.z));
        self
    }

    /// Block roughly `density` of all cells at random, leaving the discs in
    /// `keep_clear` untouched.
    pub fn scatter_obstacles(mut self, rng: &mut SimRng, density: f64, keep_clear: &[(Vec3, f32)]) -> Self {
        self.for_each_center(
            |c| !keep_clear.iter().any(|&(p, r)| c.planar_distance(p) <= r),
            |cell| {
                if rng.gen_bool(density) {
                    cell.0 = BLOCKED;
                }
            },
        );
        self
    }

    /// Validate dimensions and produce the terrain.
    pub fn build(self) -> NavResult<GridTerrain> {
        if self.width == 0 || self.depth == 0 {
            return Err(NavError::InvalidGrid(format!(
                "grid must have at least one cell, got {}x{}", self.width, self.depth
            )));
        }
        if !(self.cell_size > 0.0) {
            return Err(NavError::InvalidGrid(format!("cell_size must be > 0, got {}", self.cell_size)));
        }
        Ok(GridTerrain {
            origin_x:  self.origin_x,
            origin_z:  self.origin_z,
            cell_size: self.cell_size,
            width:     self.width,
            depth:     self.depth,
            area:      self.area,
            height:    self.height,
        })
    }

    /// Visit `(area, height, centre)` of every cell whose centre passes `select`.
    fn for_each_center<S, F>(&mut self, select: S, mut apply: F)
    where
        S: Fn(Vec3) -> bool,
        F: FnMut(&mut (u8, f32, Vec3)),
    {
        for z in 0..self.depth {
            for x in 0..self.width {
                let center = Vec3::ground(
                    self.origin_x + (x as f32 + 0.5) * self.cell_size,
                    self.origin_z + (z as f32 + 0.5) * self.cell_size,
                );
                if !select(center) {
                    continue;
                }
                let i = (z * self.width + x) as usize;
                let mut cell = (self.area[i], self.height[i], center);
                apply(&mut cell);
                self.area[i] = cell.0;
                self.height[i] = cell.1;
            }
        }
    }
}
