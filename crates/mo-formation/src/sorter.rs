//! Group sorter.
//!
//! Splits a request's agents into groups that share one ring or row block.
//! Two typed values travel with every group:
//!
//! - [`GroupKey`] decides *which* agents share a ring: the footprint radius
//!   for plain moves, the engagement reach for attack approaches.
//! - [`SpacingKey`] is the disc radius the formation generator spaces the
//!   group's slots by.
//!
//! Groups come out in ascending key order, and agents keep their request
//! order inside a group.

use mo_agent::AgentStore;
use mo_core::{AgentId, AttackMode};

/// Keys closer than this fall into the same group.
const KEY_EPS: f32 = 1e-3;

/// Semantic grouping key.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct GroupKey(pub f32);

/// Footprint radius used for slot spacing.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct SpacingKey(pub f32);

#[derive(Clone, Debug, PartialEq)]
pub struct AgentGroup {
    pub key:     GroupKey,
    pub spacing: SpacingKey,
    pub agents:  Vec<AgentId>,
}

/// Why an agent was left out of a request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ineligible {
    /// Unknown id, dead, or riding inside a carrier.
    Inactive,
    /// Has no locomotion.
    Immobile,
    /// Footprint radius is not a positive finite number, so no slot fits it.
    NoFootprint,
    /// Has no weapon.
    CannotAttack,
    /// Target is itself or a member of its own faction.
    Friendly,
    /// `KeepAssigned`: already bound to another target.
    KeepsCurrentTarget,
    /// `AllowChange`: bound to another target that was explicitly assigned.
    TargetLocked,
    /// `AssignedOnly`: not explicitly assigned to this target.
    NotAssigned,
}

impl Ineligible {
    pub fn as_str(self) -> &'static str {
        match self {
            Ineligible::Inactive           => "inactive",
            Ineligible::Immobile           => "immobile",
            Ineligible::NoFootprint        => "no_footprint",
            Ineligible::CannotAttack       => "cannot_attack",
            Ineligible::Friendly           => "friendly",
            Ineligible::KeepsCurrentTarget => "keeps_current_target",
            Ineligible::TargetLocked       => "target_locked",
            Ineligible::NotAssigned        => "not_assigned",
        }
    }
}

impl std::fmt::Display for Ineligible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Footprint grouping ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FootprintSort {
    pub groups:   Vec<AgentGroup>,
    pub rejected: Vec<(AgentId, Ineligible)>,
}

/// Group mobile agents by footprint radius.
pub fn sort_by_footprint(store: &AgentStore, agents: &[AgentId]) -> FootprintSort {
    let mut out = FootprintSort::default();
    let mut keyed = Vec::with_capacity(agents.len());
    for agent in dedup(agents) {
        if !store.is_active(agent) {
            out.rejected.push((agent, Ineligible::Inactive));
        } else if !store.can_move(agent) {
            out.rejected.push((agent, Ineligible::Immobile));
        } else if !has_footprint(store, agent) {
            out.rejected.push((agent, Ineligible::NoFootprint));
        } else {
            keyed.push((store.radius[agent.index()], agent));
        }
    }
    out.groups = group_sorted(store, keyed);
    out
}

// ── Engagement grouping ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngagementSort {
    /// Out-of-range eligible agents, grouped by engagement reach.
    pub groups:   Vec<AgentGroup>,
    /// Eligible agents already within reach of the target.
    pub in_range: Vec<AgentId>,
    pub rejected: Vec<(AgentId, Ineligible)>,
}

/// Check `agent` against `mode` for an attack on `target`.
///
/// `target` must index a live entity; the caller validates it.
pub fn check_eligibility(
    store:  &AgentStore,
    agent:  AgentId,
    target: AgentId,
    mode:   AttackMode,
) -> Result<(), Ineligible> {
    if !store.is_active(agent) {
        return Err(Ineligible::Inactive);
    }
    let i = agent.index();
    if !store.combat[i].can_attack {
        return Err(Ineligible::CannotAttack);
    }
    if agent == target || !store.faction[i].is_hostile_to(store.faction[target.index()]) {
        return Err(Ineligible::Friendly);
    }

    let current = store.combat_target[i].filter(|&t| t != target);
    let assigned = store.target_assigned[i];
    match mode {
        AttackMode::KeepAssigned if current.is_some() => Err(Ineligible::KeepsCurrentTarget),
        AttackMode::AllowChange if current.is_some() && assigned => Err(Ineligible::TargetLocked),
        AttackMode::AssignedOnly
            if !(store.combat_target[i] == Some(target) && assigned) =>
        {
            Err(Ineligible::NotAssigned)
        }
        _ => Ok(()),
    }
}

/// Filter `agents` by eligibility, split off those already in range, and
/// group the rest by engagement reach against `target`.
pub fn sort_for_engagement(
    store:  &AgentStore,
    agents: &[AgentId],
    target: AgentId,
    mode:   AttackMode,
) -> EngagementSort {
    let mut out = EngagementSort::default();
    let mut keyed = Vec::with_capacity(agents.len());
    for agent in dedup(agents) {
        if let Err(why) = check_eligibility(store, agent, target, mode) {
            out.rejected.push((agent, why));
        } else if !has_footprint(store, agent) {
            out.rejected.push((agent, Ineligible::NoFootprint));
        } else if store.in_engagement_range(agent, target) {
            out.in_range.push(agent);
        } else if !store.can_move(agent) {
            out.rejected.push((agent, Ineligible::Immobile));
        } else {
            keyed.push((store.engagement_reach(agent, target), agent));
        }
    }
    out.groups = group_sorted(store, keyed);
    out
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn has_footprint(store: &AgentStore, agent: AgentId) -> bool {
    let r = store.radius[agent.index()];
    r > 0.0 && r.is_finite()
}

/// Request order with repeated ids removed.
fn dedup(agents: &[AgentId]) -> impl Iterator<Item = AgentId> + '_ {
    agents
        .iter()
        .enumerate()
        .filter(|&(i, a)| !agents[..i].contains(a))
        .map(|(_, &a)| a)
}

/// Stable-sort by key and cut into runs of near-equal keys.  A group's
/// spacing is the largest footprint among its members.
fn group_sorted(store: &AgentStore, mut keyed: Vec<(f32, AgentId)>) -> Vec<AgentGroup> {
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<AgentGroup> = Vec::new();
    for (key, agent) in keyed {
        let radius = store.radius[agent.index()];
        match groups.last_mut() {
            Some(g) if key - g.key.0 <= KEY_EPS => {
                g.agents.push(agent);
                g.spacing = SpacingKey(g.spacing.0.max(radius));
            }
            _ => groups.push(AgentGroup {
                key:     GroupKey(key),
                spacing: SpacingKey(radius),
                agents:  vec![agent],
            }),
        }
    }
    groups
}
