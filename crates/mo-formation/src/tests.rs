//! Unit tests for mo-formation.

use mo_agent::{AgentSpec, AgentStore, AgentStoreBuilder, CombatProfile};
use mo_core::{AgentId, FactionId, FormationKind, Vec3};

use crate::{FormationRequest, SlotProbe};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Square arena of half-extent `half` with circular obstacles, flat at `height`.
struct Arena {
    half:      f32,
    height:    f32,
    obstacles: Vec<(Vec3, f32)>,
}

impl Arena {
    fn open() -> Self {
        Arena { half: 100.0, height: 0.0, obstacles: Vec::new() }
    }
}

impl SlotProbe for Arena {
    fn is_free(&self, p: Vec3, r: f32) -> bool {
        p.x.abs() + r <= self.half
            && p.z.abs() + r <= self.half
            && self.obstacles.iter().all(|&(c, cr)| c.planar_distance(p) >= cr + r)
    }

    fn ground_height(&self, p: Vec3) -> Option<f32> {
        (p.x.abs() <= self.half && p.z.abs() <= self.half).then_some(self.height)
    }
}

/// Nothing is ever free.
struct Walled;

impl SlotProbe for Walled {
    fn is_free(&self, _: Vec3, _: f32) -> bool {
        false
    }
    fn ground_height(&self, _: Vec3) -> Option<f32> {
        Some(0.0)
    }
}

fn circular(count: usize, radius: f32) -> FormationRequest {
    FormationRequest {
        kind: FormationKind::Circular,
        origin: Vec3::ZERO,
        count,
        radius,
        approach: Vec3::ground(0.0, 1.0),
        row_width: 8,
        iteration_budget: 512,
    }
}

fn min_pairwise(slots: &[Vec3]) -> f32 {
    let mut best = f32::INFINITY;
    for i in 0..slots.len() {
        for j in i + 1..slots.len() {
            best = best.min(slots[i].planar_distance(slots[j]));
        }
    }
    best
}

#[cfg(test)]
mod circular {
    use super::*;
    use crate::generator::{GAP_TOLERANCE, ring_capacity};
    use crate::{FormationError, generate};

    #[test]
    fn five_agents_of_radius_one_around_origin() {
        let mut offset = 0.0;
        let f = generate(&circular(5, 1.0), &mut offset, &Arena::open()).unwrap();
        assert_eq!(f.len(), 5);
        assert!(!f.exhausted);
        assert!(min_pairwise(&f.slots) >= 2.0 - 1e-3);
        for s in &f.slots {
            assert!(s.planar_distance(Vec3::ZERO) >= 1.0 - 1e-3, "slot {s} inside radius 1");
        }
        assert!(offset > 1.0);
    }

    #[test]
    fn single_agent_gets_origin() {
        let mut offset = 0.0;
        let f = generate(&circular(1, 0.5), &mut offset, &Arena::open()).unwrap();
        assert_eq!(f.slots, vec![Vec3::ZERO]);
    }

    #[test]
    fn single_agent_with_blocked_origin_moves_out() {
        let arena = Arena { obstacles: vec![(Vec3::ZERO, 0.6)], ..Arena::open() };
        let mut offset = 0.0;
        let f = generate(&circular(1, 0.5), &mut offset, &arena).unwrap();
        assert_eq!(f.len(), 1);
        assert!(f.slots[0].planar_distance(Vec3::ZERO) >= 1.1 - 1e-3);
    }

    #[test]
    fn slots_carry_sampled_height() {
        let arena = Arena { height: 2.5, ..Arena::open() };
        let mut offset = 3.0;
        let f = generate(&circular(4, 0.5), &mut offset, &arena).unwrap();
        assert!(f.slots.iter().all(|s| s.y == 2.5));
    }

    #[test]
    fn ring_capacity_respects_chord() {
        assert_eq!(ring_capacity(1.0, 1.0), 2);
        assert_eq!(ring_capacity(2.0, 1.0), 6);
        assert_eq!(ring_capacity(0.5, 1.0), 1);
    }

    #[test]
    fn rounded_up_ring_never_packs_slots_inside_two_radii() {
        // Capacity rounds up to 6 here, but the chord is 1.9998 < 2r.
        let ring = 1.9998;
        assert_eq!(ring_capacity(ring, 1.0), 6);
        let mut offset = ring;
        let f = generate(&circular(6, 1.0), &mut offset, &Arena::open()).unwrap();
        assert_eq!(f.len(), 6);
        assert!(min_pairwise(&f.slots) >= 2.0 * (1.0 - GAP_TOLERANCE));
        let on_first_ring = f.slots.iter().filter(|s| (s.planar_distance(Vec3::ZERO) - ring).abs() < 1e-3).count();
        assert_eq!(on_first_ring, 3);
    }

    #[test]
    fn enclosed_origin_terminates() {
        let mut offset = 0.0;
        let f = generate(&circular(10, 1.0), &mut offset, &Walled).unwrap();
        assert!(f.is_empty());
        assert!(f.exhausted);
    }

    #[test]
    fn small_budget_returns_short_list() {
        let req = FormationRequest { iteration_budget: 0, ..circular(20, 1.0) };
        let mut offset = 0.0;
        let f = generate(&req, &mut offset, &Arena::open()).unwrap();
        assert!(f.len() < 20);
        assert!(f.exhausted);
    }

    #[test]
    fn invalid_radius_is_rejected() {
        let mut offset = 0.0;
        let err = generate(&circular(3, 0.0), &mut offset, &Arena::open());
        assert_eq!(err, Err(FormationError::InvalidRadius(0.0)));
        assert!(circular(3, f32::NAN).validate().is_err());
        assert_eq!(circular(3, 0.5).validate(), Ok(()));
    }

    #[test]
    fn second_group_stacks_outside_first() {
        let mut offset = 0.0;
        let first = generate(&circular(6, 1.0), &mut offset, &Arena::open()).unwrap();
        // The caller pins markers for the first group before the second pass.
        let arena = Arena {
            obstacles: first.slots.iter().map(|&s| (s, 1.0)).collect(),
            ..Arena::open()
        };
        let second = generate(&circular(6, 0.5), &mut offset, &arena).unwrap();
        assert_eq!(second.len(), 6);
        for a in &second.slots {
            for b in &first.slots {
                assert!(a.planar_distance(*b) >= 1.5 - 1e-3);
            }
        }
    }

    #[test]
    fn random_obstacles_never_overlap() {
        let mut rng = mo_core::SimRng::new(0xF0F0);
        for _ in 0..50 {
            let radius: f32 = rng.gen_range(0.3..1.5);
            let count: usize = rng.gen_range(1..20);
            let obstacles = (0..rng.gen_range(0..12))
                .map(|_| {
                    let c = Vec3::ground(rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..15.0));
                    (c, rng.gen_range(0.5..3.0))
                })
                .collect();
            let arena = Arena { half: 30.0, height: 0.0, obstacles };
            let mut offset = rng.gen_range(0.0..4.0);
            let f = generate(&circular(count, radius), &mut offset, &arena).unwrap();
            assert!(f.len() <= count);
            assert!(min_pairwise(&f.slots) >= 2.0 * radius * (1.0 - GAP_TOLERANCE));
            for s in &f.slots {
                assert!(arena.is_free(*s, radius));
            }
        }
    }
}

#[cfg(test)]
mod rectangular {
    use super::*;
    use crate::{FormationError, generate};

    fn rows(count: usize, width: usize) -> FormationRequest {
        FormationRequest {
            kind: FormationKind::Rectangular,
            row_width: width,
            ..circular(count, 0.5)
        }
    }

    #[test]
    fn rows_are_perpendicular_and_stack_backwards() {
        let mut offset = 0.0;
        let f = generate(&rows(6, 4), &mut offset, &Arena::open()).unwrap();
        assert_eq!(f.len(), 6);
        // Approach is +z, so rows run along x and stack toward -z.
        let front: Vec<&Vec3> = f.slots.iter().filter(|s| s.z.abs() < 1e-4).collect();
        let back: Vec<&Vec3> = f.slots.iter().filter(|s| (s.z + 1.0).abs() < 1e-4).collect();
        assert_eq!(front.len(), 4);
        assert_eq!(back.len(), 2);
        assert!(min_pairwise(&f.slots) >= 1.0 - 1e-3);
        assert!((offset - 2.0).abs() < 1e-4);
    }

    #[test]
    fn zero_row_width_is_rejected() {
        let mut offset = 0.0;
        assert_eq!(
            generate(&rows(3, 0), &mut offset, &Arena::open()),
            Err(FormationError::ZeroRowWidth)
        );
        assert_eq!(rows(3, 0).validate(), Err(FormationError::ZeroRowWidth));
    }

    #[test]
    fn blocked_rows_terminate() {
        let mut offset = 0.0;
        let f = generate(&rows(5, 2), &mut offset, &Walled).unwrap();
        assert!(f.exhausted);
        assert!(f.is_empty());
    }
}

#[cfg(test)]
mod assign {
    use super::*;
    use crate::assign_slots;

    #[test]
    fn circular_gives_nearest_slot_to_nearest_agent() {
        let agents = [
            (AgentId(0), Vec3::ground(10.0, 0.0)),
            (AgentId(1), Vec3::ground(-3.0, 0.0)),
        ];
        let slots = [Vec3::ground(1.0, 0.0), Vec3::ground(-1.0, 0.0)];
        let a = assign_slots(FormationKind::Circular, Vec3::ZERO, &agents, &slots);
        assert!(a.unplaced.is_empty());
        assert!(a.placed.contains(&(AgentId(1), Vec3::ground(-1.0, 0.0))));
        assert!(a.placed.contains(&(AgentId(0), Vec3::ground(1.0, 0.0))));
    }

    #[test]
    fn rectangular_puts_farthest_agent_in_front() {
        let agents = [
            (AgentId(0), Vec3::ground(0.0, -1.0)),
            (AgentId(1), Vec3::ground(0.0, -10.0)),
            (AgentId(2), Vec3::ground(0.0, -5.0)),
        ];
        let slots = [Vec3::ground(0.0, 0.0), Vec3::ground(0.0, -1.0), Vec3::ground(0.0, -2.0)];
        let a = assign_slots(FormationKind::Rectangular, Vec3::ZERO, &agents, &slots);
        assert_eq!(
            a.placed,
            vec![
                (AgentId(1), slots[0]),
                (AgentId(2), slots[1]),
                (AgentId(0), slots[2]),
            ]
        );
    }

    #[test]
    fn short_supply_reports_unplaced() {
        let agents = [
            (AgentId(0), Vec3::ground(1.0, 0.0)),
            (AgentId(1), Vec3::ground(2.0, 0.0)),
            (AgentId(2), Vec3::ground(3.0, 0.0)),
        ];
        let a = assign_slots(FormationKind::Circular, Vec3::ZERO, &agents, &[Vec3::ZERO]);
        assert_eq!(a.placed, vec![(AgentId(0), Vec3::ZERO)]);
        assert_eq!(a.unplaced, vec![AgentId(1), AgentId(2)]);
    }
}

#[cfg(test)]
mod sorter {
    use super::*;
    use mo_core::AttackMode;

    use crate::{Ineligible, check_eligibility, sort_by_footprint, sort_for_engagement};

    /// 0..=3: faction 0 attackers; 4: faction 1 target unit; 5: faction 0 tower.
    fn battlefield() -> AgentStore {
        AgentStoreBuilder::new()
            .with(AgentSpec::unit(Vec3::ground(-20.0, 0.0), 0.5).combat(CombatProfile::ranged(5.0)))
            .with(AgentSpec::unit(Vec3::ground(-20.0, 3.0), 0.5).combat(CombatProfile::melee()))
            .with(AgentSpec::unit(Vec3::ground(-20.0, 6.0), 1.0).combat(CombatProfile::ranged(5.0)))
            .with(AgentSpec::unit(Vec3::ground(1.4, 0.0), 0.5).combat(CombatProfile::melee()))
            .with(AgentSpec::unit(Vec3::ground(0.0, 0.0), 1.0).faction(FactionId(1)))
            .with(AgentSpec::structure(Vec3::ground(-30.0, 0.0), 2.0).combat(CombatProfile::ranged(8.0)))
            .build()
    }

    #[test]
    fn footprint_groups_ascend_and_keep_order() {
        let store = battlefield();
        let s = sort_by_footprint(&store, &[AgentId(2), AgentId(1), AgentId(0), AgentId(1)]);
        assert_eq!(s.groups.len(), 2);
        assert_eq!(s.groups[0].key.0, 0.5);
        assert_eq!(s.groups[0].agents, vec![AgentId(1), AgentId(0)]);
        assert_eq!(s.groups[1].agents, vec![AgentId(2)]);
        assert!(s.rejected.is_empty());
    }

    #[test]
    fn footprint_rejects_immobile_and_dead() {
        let mut store = battlefield();
        store.alive[1] = false;
        let s = sort_by_footprint(&store, &[AgentId(0), AgentId(1), AgentId(5)]);
        assert_eq!(s.rejected, vec![(AgentId(1), Ineligible::Inactive), (AgentId(5), Ineligible::Immobile)]);
        assert_eq!(s.groups.len(), 1);
    }

    #[test]
    fn engagement_splits_in_range_and_groups_by_reach() {
        let store = battlefield();
        let target = AgentId(4);
        let s = sort_for_engagement(&store, &[AgentId(0), AgentId(1), AgentId(2), AgentId(3)], target, AttackMode::Unrestricted);
        assert_eq!(s.in_range, vec![AgentId(3)]);
        // Melee 0.5 + 1.0 + 0.5 = 2.0 < ranged 6.5 < ranged big-footprint 7.0.
        let keys: Vec<f32> = s.groups.iter().map(|g| g.key.0).collect();
        assert_eq!(keys, vec![2.0, 6.5, 7.0]);
        assert_eq!(s.groups[0].agents, vec![AgentId(1)]);
        assert!(s.rejected.is_empty());
    }

    #[test]
    fn friendly_and_unarmed_are_rejected() {
        let store = battlefield();
        assert_eq!(check_eligibility(&store, AgentId(0), AgentId(5), AttackMode::Unrestricted), Err(Ineligible::Friendly));
        assert_eq!(check_eligibility(&store, AgentId(4), AgentId(0), AttackMode::Unrestricted), Err(Ineligible::CannotAttack));
        assert_eq!(check_eligibility(&store, AgentId(0), AgentId(0), AttackMode::Unrestricted), Err(Ineligible::Friendly));
    }

    #[test]
    fn zero_footprint_is_rejected_before_formation() {
        let mut store = battlefield();
        store.radius[0] = 0.0;
        store.radius[1] = f32::NAN;
        let s = sort_by_footprint(&store, &[AgentId(0), AgentId(1), AgentId(2)]);
        assert_eq!(s.rejected, vec![(AgentId(0), Ineligible::NoFootprint), (AgentId(1), Ineligible::NoFootprint)]);
        assert_eq!(s.groups.len(), 1);
        assert_eq!(s.groups[0].agents, vec![AgentId(2)]);

        let s = sort_for_engagement(&store, &[AgentId(0), AgentId(2)], AgentId(4), AttackMode::Unrestricted);
        assert_eq!(s.rejected, vec![(AgentId(0), Ineligible::NoFootprint)]);
        assert!(s.groups.iter().all(|g| g.spacing.0 > 0.0));
    }

    #[test]
    fn immobile_out_of_range_is_rejected() {
        let mut store = battlefield();
        store.faction[5] = FactionId(2);
        let s = sort_for_engagement(&store, &[AgentId(5)], AgentId(4), AttackMode::Unrestricted);
        assert_eq!(s.rejected, vec![(AgentId(5), Ineligible::Immobile)]);
    }

    #[test]
    fn attack_mode_policies() {
        let mut store = battlefield();
        let target = AgentId(4);
        let other = AgentId(5);

        // Bound (not assigned) to another target.
        store.bind_target(AgentId(0), other, false);
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::KeepAssigned), Err(Ineligible::KeepsCurrentTarget));
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::AllowChange), Ok(()));
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::Unrestricted), Ok(()));
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::AssignedOnly), Err(Ineligible::NotAssigned));

        // Explicitly assigned to another target.
        store.bind_target(AgentId(0), other, true);
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::AllowChange), Err(Ineligible::TargetLocked));
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::Unrestricted), Ok(()));

        // Explicitly assigned to this target.
        store.bind_target(AgentId(0), target, true);
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::KeepAssigned), Ok(()));
        assert_eq!(check_eligibility(&store, AgentId(0), target, AttackMode::AssignedOnly), Ok(()));
    }
}
