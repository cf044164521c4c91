//! The `TerrainNav` trait and the types that cross it.
//!
//! # Pluggability
//!
//! The scheduler, formation generator, and locomotion engine call terrain
//! through this trait only, so applications can back it with a navmesh, a
//! flow field, or the bundled [`GridTerrain`][crate::GridTerrain] without
//! touching the orchestration core.

use mo_core::Vec3;

use crate::NavResult;

/// Bitmask of terrain area types an agent may walk on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaMask(pub u32);

impl AreaMask {
    pub const ALL: AreaMask = AreaMask(u32::MAX);
    pub const NONE: AreaMask = AreaMask(0);

    /// Mask containing the single area `area` (0..32).
    #[inline]
    pub fn single(area: u8) -> AreaMask {
        AreaMask(1u32 << (area as u32 % 32))
    }

    #[inline]
    pub fn allows(self, area: u8) -> bool {
        self.0 & (1u32 << (area as u32 % 32)) != 0
    }
}

impl Default for AreaMask {
    fn default() -> Self {
        AreaMask::ALL
    }
}

/// Per-query navigation constraints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavFilter {
    /// Walkable area types.
    pub mask: AreaMask,
    /// Airborne agents ignore static ground obstacles.
    pub airborne: bool,
}

impl NavFilter {
    pub fn ground() -> Self {
        Self { mask: AreaMask::ALL, airborne: false }
    }

    pub fn air() -> Self {
        Self { mask: AreaMask::ALL, airborne: true }
    }
}

/// Whether a computed path actually ends at the requested goal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathStatus {
    /// The last corner is the requested goal.
    Complete,
    /// The goal is unreachable; the path ends at the closest reachable point.
    Partial,
}

/// A polyline over walkable surface, excluding the start position.
#[derive(Clone, Debug, PartialEq)]
pub struct NavPath {
    /// Corners to traverse in order.  The last one is the path's end.
    pub corners: Vec<Vec3>,
    pub status: PathStatus,
}

impl NavPath {
    pub fn complete(corners: Vec<Vec3>) -> Self {
        Self { corners, status: PathStatus::Complete }
    }

    /// A complete, usable path: reaches the goal and has at least one corner.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == PathStatus::Complete && !self.corners.is_empty()
    }

    pub fn end(&self) -> Option<Vec3> {
        self.corners.last().copied()
    }
}

/// The terrain navigation service.
pub trait TerrainNav {
    /// Compute a path from `from` to `to`.
    ///
    /// Returns `Err` when either endpoint lies off the navigable area, and a
    /// [`PathStatus::Partial`] path when the goal exists but cannot be reached.
    fn compute_path(&self, from: Vec3, to: Vec3, filter: NavFilter) -> NavResult<NavPath>;

    /// Walkable surface height at the ground-plane location of `at`, or
    /// `None` outside the terrain.
    fn sample_height(&self, at: Vec3) -> Option<f32>;

    /// `true` if a disc of `radius` centred at `center` is free of static
    /// obstacles for the given filter.
    fn is_disc_clear(&self, center: Vec3, radius: f32, filter: NavFilter) -> bool;
}
