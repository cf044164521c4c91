//! Matching generated slots to agents.
//!
//! Circular formations hand out slots greedily: agents closest to the
//! origin choose first and each takes the nearest remaining slot.
//!
//! Rectangular formations invert that.  Slots are consumed front row first
//! (closest to the origin) while agents are taken farthest-first, so the
//! stragglers end up at the front and the agents already near the origin
//! fill the back rows.

use mo_core::{AgentId, FormationKind, Vec3};

/// Result of [`assign_slots`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    pub placed:   Vec<(AgentId, Vec3)>,
    /// Agents left without a slot because the formation ran short.
    pub unplaced: Vec<AgentId>,
}

/// Assign `slots` to `agents` (each given with its current position).
pub fn assign_slots(
    kind:   FormationKind,
    origin: Vec3,
    agents: &[(AgentId, Vec3)],
    slots:  &[Vec3],
) -> Assignment {
    let mut order: Vec<(AgentId, Vec3)> = agents.to_vec();
    // Ties broken by id so equal distances assign deterministically.
    order.sort_by(|a, b| {
        a.1.planar_distance(origin)
            .total_cmp(&b.1.planar_distance(origin))
            .then(a.0.cmp(&b.0))
    });

    match kind {
        FormationKind::Circular => nearest_first(&order, slots),
        FormationKind::Rectangular => {
            order.reverse();
            let mut out = Assignment::default();
            for (i, &(agent, _)) in order.iter().enumerate() {
                match slots.get(i) {
                    Some(&slot) => out.placed.push((agent, slot)),
                    None => out.unplaced.push(agent),
                }
            }
            out
        }
    }
}

fn nearest_first(order: &[(AgentId, Vec3)], slots: &[Vec3]) -> Assignment {
    let mut free: Vec<Vec3> = slots.to_vec();
    let mut out = Assignment::default();
    for &(agent, pos) in order {
        let best = free
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.planar_distance(pos).total_cmp(&b.1.planar_distance(pos)))
            .map(|(i, _)| i);
        match best {
            Some(i) => out.placed.push((agent, free.swap_remove(i))),
            None => out.unplaced.push(agent),
        }
    }
    out
}
