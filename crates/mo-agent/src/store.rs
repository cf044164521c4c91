//! Core entity storage: `AgentStore`.
//!
//! Every `Vec` field has exactly `count` elements; the `AgentId` value is the
//! index into all of them:
//!
//! ```ignore
//! let pos = store.position[agent.index()];  // O(1), cache-friendly
//! ```
//!
//! The movement subsystem is single-threaded, so the store is mutated in
//! place by the orchestrator.  External systems (combat, construction) read
//! it between ticks.

use mo_core::{AgentId, FactionId, Vec3};

use crate::{AgentSpec, CombatProfile, EntityKind, LocomotionProfile};

/// Structure-of-Arrays storage for all entity state.
pub struct AgentStore {
    /// Number of entities.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Spatial state ─────────────────────────────────────────────────────
    /// Current world position.  `y` is height.
    pub position: Vec<Vec3>,

    /// Ground-plane heading in radians (see [`Vec3::yaw`]).
    pub heading: Vec<f32>,

    /// Footprint radius on the ground plane.
    pub radius: Vec<f32>,

    // ── Identity ──────────────────────────────────────────────────────────
    pub kind: Vec<EntityKind>,
    pub faction: Vec<FactionId>,

    /// `false` once destroyed.  Dead ids are never reused.
    pub alive: Vec<bool>,

    // ── Static profiles ───────────────────────────────────────────────────
    pub locomotion: Vec<LocomotionProfile>,
    pub combat: Vec<CombatProfile>,

    // ── Combat binding ────────────────────────────────────────────────────
    /// Entity this agent is currently engaging or approaching.
    pub combat_target: Vec<Option<AgentId>>,

    /// `true` when `combat_target` was explicitly assigned by a command
    /// (as opposed to acquired opportunistically).
    pub target_assigned: Vec<bool>,

    // ── Transport ─────────────────────────────────────────────────────────
    /// Carrier this agent is riding in, if any.
    pub embarked_in: Vec<Option<AgentId>>,

    /// Number of agents currently riding in this carrier.
    pub cargo: Vec<u32>,
}

impl AgentStore {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            count:           0,
            position:        Vec::with_capacity(capacity),
            heading:         Vec::with_capacity(capacity),
            radius:          Vec::with_capacity(capacity),
            kind:            Vec::with_capacity(capacity),
            faction:         Vec::with_capacity(capacity),
            alive:           Vec::with_capacity(capacity),
            locomotion:      Vec::with_capacity(capacity),
            combat:          Vec::with_capacity(capacity),
            combat_target:   Vec::with_capacity(capacity),
            target_assigned: Vec::with_capacity(capacity),
            embarked_in:     Vec::with_capacity(capacity),
            cargo:           Vec::with_capacity(capacity),
        }
    }

    /// Append one entity and return its id (sequential from 0).
    pub fn push(&mut self, spec: AgentSpec) -> AgentId {
        let id = AgentId(self.count as u32);
        self.position.push(spec.position);
        self.heading.push(spec.heading);
        self.radius.push(spec.radius);
        self.kind.push(spec.kind);
        self.faction.push(spec.faction);
        self.alive.push(true);
        self.locomotion.push(spec.locomotion);
        self.combat.push(spec.combat);
        self.combat_target.push(None);
        self.target_assigned.push(false);
        self.embarked_in.push(None);
        self.cargo.push(0);
        self.count += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// `true` if `agent` indexes an existing entry (alive or not).
    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Alive and in the world (not riding inside a carrier).
    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.contains(agent)
            && self.alive[agent.index()]
            && self.embarked_in[agent.index()].is_none()
    }

    /// Active and physically able to move.
    #[inline]
    pub fn can_move(&self, agent: AgentId) -> bool {
        self.is_active(agent) && self.locomotion[agent.index()].can_move()
    }

    // ── Combat helpers ────────────────────────────────────────────────────

    /// Centre-to-centre distance at which `agent` can engage `target`:
    /// the range for the target's class plus both footprint radii.
    pub fn engagement_reach(&self, agent: AgentId, target: AgentId) -> f32 {
        let range = self.combat[agent.index()].range_against(self.kind[target.index()]);
        range + self.radius[target.index()] + self.radius[agent.index()]
    }

    /// `true` if `agent` already stands within its engagement reach of `target`.
    pub fn in_engagement_range(&self, agent: AgentId, target: AgentId) -> bool {
        let d = self.position[agent.index()].planar_distance(self.position[target.index()]);
        d <= self.engagement_reach(agent, target)
    }

    /// Bind `target` as `agent`'s combat target.
    pub fn bind_target(&mut self, agent: AgentId, target: AgentId, assigned: bool) {
        self.combat_target[agent.index()] = Some(target);
        self.target_assigned[agent.index()] = assigned;
    }

    pub fn clear_target(&mut self, agent: AgentId) {
        self.combat_target[agent.index()] = None;
        self.target_assigned[agent.index()] = false;
    }

    /// Remaining boarding capacity, or `None` for non-carriers.
    pub fn free_capacity(&self, carrier: AgentId) -> Option<u32> {
        match self.kind[carrier.index()] {
            EntityKind::Carrier { capacity } => {
                Some(capacity.saturating_sub(self.cargo[carrier.index()]))
            }
            _ => None,
        }
    }
}
