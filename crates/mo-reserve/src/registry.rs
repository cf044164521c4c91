//! R-tree backed registry of reserved positions.
//!
//! # Lookup
//!
//! Overlap queries expand the query disc's bounding box by the largest
//! marker radius ever pinned, pull candidates out of the R-tree with an
//! envelope-intersection query, then test exact disc overlap.  The
//! `max_radius` bound only grows, so it stays valid after removals.

use rstar::{RTree, RTreeObject, AABB};

use mo_core::{AgentId, Vec3};

#[cfg(feature = "fx-hash")]
type AgentMap<V> = rustc_hash::FxHashMap<AgentId, V>;
#[cfg(not(feature = "fx-hash"))]
type AgentMap<V> = std::collections::HashMap<AgentId, V>;

// ── Marker ────────────────────────────────────────────────────────────────────

/// A reserved disc owned by one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Marker {
    /// `[x, z]` centre on the ground plane.
    pub point:  [f32; 2],
    pub radius: f32,
    pub agent:  AgentId,
}

impl Marker {
    pub fn new(agent: AgentId, position: Vec3, radius: f32) -> Self {
        Self { point: [position.x, position.z], radius, agent }
    }

    /// Centre as a ground-plane `Vec3`.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::ground(self.point[0], self.point[1])
    }

    /// `true` if this marker and the disc `(center, radius)` strictly overlap.
    /// Discs that merely touch do not overlap.
    #[inline]
    pub fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        let dx = self.point[0] - center.x;
        let dz = self.point[1] - center.z;
        let reach = self.radius + radius;
        dx * dx + dz * dz < reach * reach
    }
}

impl RTreeObject for Marker {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

// ── ReservationRegistry ───────────────────────────────────────────────────────

/// At most one marker per agent.
#[derive(Default)]
pub struct ReservationRegistry {
    tree:       RTree<Marker>,
    by_agent:   AgentMap<Marker>,
    max_radius: f32,
}

impl ReservationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_agent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_agent.is_empty()
    }

    /// Pin `agent`'s marker at `position`, replacing any previous one.
    pub fn pin(&mut self, agent: AgentId, position: Vec3, radius: f32) {
        self.release(agent);
        let marker = Marker::new(agent, position, radius.max(0.0));
        self.max_radius = self.max_radius.max(marker.radius);
        self.tree.insert(marker);
        self.by_agent.insert(agent, marker);
    }

    /// Remove `agent`'s marker.  Returns `false` if it had none.
    pub fn release(&mut self, agent: AgentId) -> bool {
        match self.by_agent.remove(&agent) {
            Some(old) => {
                self.tree.remove(&old);
                true
            }
            None => false,
        }
    }

    pub fn marker(&self, agent: AgentId) -> Option<&Marker> {
        self.by_agent.get(&agent)
    }

    /// Where `agent` currently holds a reservation.
    pub fn position(&self, agent: AgentId) -> Option<Vec3> {
        self.by_agent.get(&agent).map(Marker::position)
    }

    /// Markers strictly overlapping the disc `(center, radius)`, skipping
    /// any owned by agents in `exclude`.
    pub fn overlapping<'a>(
        &'a self,
        center:  Vec3,
        radius:  f32,
        exclude: &'a [AgentId],
    ) -> impl Iterator<Item = &'a Marker> + 'a {
        let reach = radius.max(0.0) + self.max_radius;
        let envelope = AABB::from_corners(
            [center.x - reach, center.z - reach],
            [center.x + reach, center.z + reach],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(move |m| !exclude.contains(&m.agent) && m.overlaps(center, radius))
    }

    /// `true` if no marker outside `exclude` overlaps the disc.
    pub fn is_free(&self, center: Vec3, radius: f32, exclude: &[AgentId]) -> bool {
        self.overlapping(center, radius, exclude).next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.by_agent.values()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.by_agent.clear();
        self.max_radius = 0.0;
    }
}
