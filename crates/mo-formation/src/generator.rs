//! Formation slot generation.
//!
//! # Circular
//!
//! Candidates are laid out on concentric rings around the origin.  A ring
//! of radius `R` holds
//!
//!   n = min( floor(2πR / 2r), floor(π / asin(r / R)) )
//!
//! evenly spaced candidates; the second bound keeps neighbouring slots on
//! the same ring at least `2r` apart.  When a ring is used up the radius
//! grows by `r` and the search continues outward.
//!
//! # Rectangular
//!
//! Rows of up to `row_width` candidates, perpendicular to the approach
//! direction, stacked back from the origin toward where the group is coming
//! from.  Row `k` lies `offset + 2r·k` behind the origin.
//!
//! # Termination
//!
//! Every evaluated candidate costs one unit of a budget of
//! `count + iteration_budget`.  A search that runs dry returns what it has
//! and marks the formation `exhausted`.

use std::f32::consts::{PI, TAU};

use mo_core::{FormationKind, Vec3};

use crate::{FormationError, FormationResult};

/// Slack for rounding ring capacities and for detecting the zero ring.
const SPACING_EPS: f32 = 1e-3;

/// Relative f32 tolerance on the `2r` slot gap.  Slots closer than
/// `2r · (1 - GAP_TOLERANCE)` are never accepted.
pub const GAP_TOLERANCE: f32 = 1e-5;

/// World queries the generator needs.
pub trait SlotProbe {
    /// `true` if a disc of `radius` at `position` touches neither a static
    /// obstacle nor another agent's reservation.
    fn is_free(&self, position: Vec3, radius: f32) -> bool;

    /// Walkable surface height under `position`, or `None` off-terrain.
    fn ground_height(&self, position: Vec3) -> Option<f32>;
}

/// Parameters of one generation pass.
#[derive(Copy, Clone, Debug)]
pub struct FormationRequest {
    pub kind:             FormationKind,
    pub origin:           Vec3,
    pub count:            usize,
    pub radius:           f32,
    /// Direction of travel toward `origin`.  Orients rectangular rows and
    /// the first slot of each ring.
    pub approach:         Vec3,
    pub row_width:        usize,
    pub iteration_budget: usize,
}

impl FormationRequest {
    /// Reject parameters no search could honour.
    pub fn validate(&self) -> FormationResult<()> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(FormationError::InvalidRadius(self.radius));
        }
        if self.kind == FormationKind::Rectangular && self.row_width == 0 {
            return Err(FormationError::ZeroRowWidth);
        }
        Ok(())
    }
}

/// Output of [`generate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Formation {
    /// Free, height-sampled slots, closest ring or row first.
    pub slots:     Vec<Vec3>,
    /// `true` when the budget ran out before `count` slots were found.
    pub exhausted: bool,
}

impl Formation {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Generate up to `req.count` free slots.
///
/// `offset_radius` is read as the first ring radius (or first row offset)
/// and updated to where the next group around the same origin should
/// start.
pub fn generate<P: SlotProbe + ?Sized>(
    req:           &FormationRequest,
    offset_radius: &mut f32,
    probe:         &P,
) -> FormationResult<Formation> {
    req.validate()?;
    if req.count == 0 {
        return Ok(Formation::default());
    }

    let mut search = Search {
        probe,
        radius: req.radius,
        budget: req.count.saturating_add(req.iteration_budget),
        slots:  Vec::with_capacity(req.count),
    };

    match req.kind {
        FormationKind::Circular => circular(req, offset_radius, &mut search),
        FormationKind::Rectangular => rectangular(req, offset_radius, &mut search),
    }

    let exhausted = search.slots.len() < req.count;
    Ok(Formation { slots: search.slots, exhausted })
}

// ── Search state ──────────────────────────────────────────────────────────────

struct Search<'a, P: ?Sized> {
    probe:  &'a P,
    radius: f32,
    budget: usize,
    slots:  Vec<Vec3>,
}

impl<P: SlotProbe + ?Sized> Search<'_, P> {
    #[inline]
    fn has_budget(&self) -> bool {
        self.budget > 0
    }

    /// Evaluate one candidate; keep it if it is free, on terrain, and clear
    /// of every slot already accepted in this pass.
    fn try_candidate(&mut self, candidate: Vec3) {
        self.budget -= 1;
        let min_gap = 2.0 * self.radius * (1.0 - GAP_TOLERANCE);
        if self.slots.iter().any(|s| s.planar_distance(candidate) < min_gap) {
            return;
        }
        if !self.probe.is_free(candidate, self.radius) {
            return;
        }
        if let Some(h) = self.probe.ground_height(candidate) {
            self.slots.push(candidate.with_y(h));
        }
    }
}

// ── Circular ──────────────────────────────────────────────────────────────────

fn circular<P: SlotProbe + ?Sized>(req: &FormationRequest, offset_radius: &mut f32, s: &mut Search<'_, P>) {
    let r = req.radius;
    let mut ring = if req.count == 1 { offset_radius.max(0.0) } else { offset_radius.max(r) };
    // First slot of every ring faces back along the approach.
    let base_yaw = (-req.approach).yaw().unwrap_or(0.0);

    while s.slots.len() < req.count && s.has_budget() {
        if ring <= SPACING_EPS {
            s.try_candidate(req.origin);
        } else {
            let n = ring_capacity(ring, r);
            let step = TAU / n as f32;
            for k in 0..n {
                if s.slots.len() >= req.count || !s.has_budget() {
                    break;
                }
                let dir = Vec3::from_yaw(base_yaw + step * k as f32);
                s.try_candidate(req.origin + dir * ring);
            }
        }
        ring = ring.max(0.0) + r;
    }
    *offset_radius = ring;
}

/// How many slots of radius `r` fit evenly on a ring of radius `ring`.
pub fn ring_capacity(ring: f32, r: f32) -> usize {
    let by_circumference = (TAU * ring / (2.0 * r) + SPACING_EPS).floor();
    let ratio = r / ring;
    let by_chord = if ratio > 1.0 { 1.0 } else { (PI / ratio.asin() + SPACING_EPS).floor() };
    by_circumference.min(by_chord).max(1.0) as usize
}

// ── Rectangular ───────────────────────────────────────────────────────────────

fn rectangular<P: SlotProbe + ?Sized>(req: &FormationRequest, offset_radius: &mut f32, s: &mut Search<'_, P>) {
    let r = req.radius;
    let forward = req.approach.planar().try_normalize().unwrap_or(Vec3::ground(0.0, 1.0));
    let right = forward.planar_right();
    let width = req.row_width.min(req.count);
    let half = (width as f32 - 1.0) * 0.5;

    let mut depth = offset_radius.max(0.0);
    while s.slots.len() < req.count && s.has_budget() {
        let row_center = req.origin - forward * depth;
        for j in 0..width {
            if s.slots.len() >= req.count || !s.has_budget() {
                break;
            }
            let lateral = (j as f32 - half) * 2.0 * r;
            s.try_candidate(row_center + right * lateral);
        }
        depth += 2.0 * r;
    }
    *offset_radius = depth;
}
