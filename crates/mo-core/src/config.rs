//! Top-level tunables for the movement orchestration subsystem.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the orchestrator builder.

use crate::{MoError, MoResult, SimClock, Tick};

/// Geometric layout used by the formation generator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FormationKind {
    /// Concentric rings around the destination.
    #[default]
    Circular,
    /// Rows perpendicular to the approach direction.
    Rectangular,
}

impl FormationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormationKind::Circular    => "circular",
            FormationKind::Rectangular => "rectangular",
        }
    }
}

impl std::fmt::Display for FormationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Movement configuration.
///
/// All distances are in world units, all cadences in ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Seconds per fixed timestep.
    pub tick_secs: f32,

    /// Ticks executed by `Orchestrator::run`.
    pub total_ticks: u64,

    /// Observer snapshot cadence.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Path retries after the first failed attempt.  An unroutable task gets
    /// exactly `max_path_retries + 1` attempts.
    pub max_path_retries: u32,

    /// Default arrival tolerance around the final destination.
    pub stopping_distance: f32,

    /// Tolerance for reaching intermediate path corners.
    pub waypoint_reach_distance: f32,

    /// Heading tolerance (radians) before a no-strafe agent may advance.
    pub facing_tolerance_rad: f32,

    /// Stuck probe cadence.
    pub stuck_check_interval_ticks: u32,

    /// Minimum ground-plane displacement per probe interval while advancing.
    pub stuck_min_displacement: f32,

    /// Terrain height refresh cadence for moving agents.
    pub height_resample_interval_ticks: u32,

    /// Extra candidate evaluations allowed beyond the requested slot count.
    pub formation_iteration_budget: usize,

    /// Maximum agents per rectangular formation row.
    pub formation_row_width: usize,

    /// Layout used for group moves that do not specify one.
    pub default_formation: FormationKind,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            tick_secs:                      0.05,
            total_ticks:                    2_000,
            snapshot_interval_ticks:        10,
            max_path_retries:               3,
            stopping_distance:              0.1,
            waypoint_reach_distance:        0.25,
            facing_tolerance_rad:           0.1,
            stuck_check_interval_ticks:     40,
            stuck_min_displacement:         0.05,
            height_resample_interval_ticks: 10,
            formation_iteration_budget:     512,
            formation_row_width:            8,
            default_formation:              FormationKind::Circular,
        }
    }
}

impl MovementConfig {
    /// Reject values that would stall or break the tick loop.
    pub fn validate(&self) -> MoResult<()> {
        if !(self.tick_secs > 0.0) {
            return Err(MoError::Config(format!("tick_secs must be > 0, got {}", self.tick_secs)));
        }
        if !(self.stopping_distance > 0.0) || !(self.waypoint_reach_distance > 0.0) {
            return Err(MoError::Config("stopping and waypoint distances must be > 0".into()));
        }
        if self.facing_tolerance_rad < 0.0 {
            return Err(MoError::Config("facing_tolerance_rad must be >= 0".into()));
        }
        if self.stuck_check_interval_ticks == 0 || self.height_resample_interval_ticks == 0 {
            return Err(MoError::Config("probe and resample intervals must be >= 1 tick".into()));
        }
        if self.formation_row_width == 0 {
            return Err(MoError::Config("formation_row_width must be >= 1".into()));
        }
        Ok(())
    }

    /// The tick at which `Orchestrator::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_secs)
    }
}
