//! Unit tests for mo-agent.

use mo_core::{AgentId, FactionId, Vec3};

use crate::{AgentSpec, AgentStore, AgentStoreBuilder, CombatProfile, EntityKind, LocomotionProfile};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn skirmish() -> AgentStore {
    AgentStoreBuilder::new()
        .with(AgentSpec::unit(Vec3::ground(0.0, 0.0), 0.5).combat(CombatProfile::ranged(4.0)))
        .with(AgentSpec::unit(Vec3::ground(6.0, 0.0), 1.0).faction(FactionId(1)))
        .with(AgentSpec::structure(Vec3::ground(0.0, 10.0), 2.0).faction(FactionId(1)))
        .with(AgentSpec::carrier(Vec3::ground(-5.0, 0.0), 1.5, 2))
        .build()
}

#[cfg(test)]
mod store {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let store = skirmish();
        assert_eq!(store.count, 4);
        let ids: Vec<AgentId> = store.agent_ids().collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(2), AgentId(3)]);
        assert!(store.contains(AgentId(3)));
        assert!(!store.contains(AgentId(4)));
    }

    #[test]
    fn structures_cannot_move() {
        let store = skirmish();
        assert!(store.can_move(AgentId(0)));
        assert!(!store.can_move(AgentId(2)));
    }

    #[test]
    fn dead_and_embarked_are_inactive() {
        let mut store = skirmish();
        store.alive[0] = false;
        store.embarked_in[1] = Some(AgentId(3));
        assert!(!store.is_active(AgentId(0)));
        assert!(!store.is_active(AgentId(1)));
        assert!(!store.can_move(AgentId(1)));
    }

    #[test]
    fn push_appends() {
        let mut store = skirmish();
        let id = store.push(AgentSpec::unit(Vec3::ground(1.0, 1.0), 0.3));
        assert_eq!(id, AgentId(4));
        assert_eq!(store.len(), 5);
        assert!(store.alive[4]);
        assert_eq!(store.combat_target[4], None);
    }
}

#[cfg(test)]
mod combat {
    use super::*;

    #[test]
    fn reach_includes_both_radii() {
        let store = skirmish();
        // unit range 4.0 + target radius 1.0 + own radius 0.5
        assert!((store.engagement_reach(AgentId(0), AgentId(1)) - 5.5).abs() < 1e-6);
        assert!(!store.in_engagement_range(AgentId(0), AgentId(1)));
    }

    #[test]
    fn structure_range_used_for_structures() {
        let mut store = skirmish();
        store.combat[0] = CombatProfile { can_attack: true, unit_range: 1.0, structure_range: 8.0 };
        // 8.0 + 2.0 + 0.5 = 10.5 ≥ 10.0
        assert!(store.in_engagement_range(AgentId(0), AgentId(2)));
    }

    #[test]
    fn bind_and_clear() {
        let mut store = skirmish();
        store.bind_target(AgentId(0), AgentId(1), true);
        assert_eq!(store.combat_target[0], Some(AgentId(1)));
        assert!(store.target_assigned[0]);
        store.clear_target(AgentId(0));
        assert_eq!(store.combat_target[0], None);
        assert!(!store.target_assigned[0]);
    }
}

#[cfg(test)]
mod profile {
    use super::*;

    #[test]
    fn structure_class() {
        assert!(EntityKind::Structure.is_structure_class());
        assert!(EntityKind::Portal { exit: Vec3::ZERO }.is_structure_class());
        assert!(!EntityKind::Carrier { capacity: 1 }.is_structure_class());
    }

    #[test]
    fn carrier_capacity() {
        let mut store = skirmish();
        assert_eq!(store.free_capacity(AgentId(3)), Some(2));
        store.cargo[3] = 2;
        assert_eq!(store.free_capacity(AgentId(3)), Some(0));
        assert_eq!(store.free_capacity(AgentId(0)), None);
    }

    #[test]
    fn stationary_profile() {
        assert!(!LocomotionProfile::stationary().can_move());
        assert!(LocomotionProfile::vehicle().requires_facing);
    }
}
