//! Unit tests for mo-reserve.

use mo_core::{AgentId, Vec3};

use crate::ReservationRegistry;

fn a(n: u32) -> AgentId {
    AgentId(n)
}

#[cfg(test)]
mod pinning {
    use super::*;

    #[test]
    fn pin_and_lookup() {
        let mut reg = ReservationRegistry::new();
        assert!(reg.is_empty());
        reg.pin(a(0), Vec3::new(3.0, 7.0, -2.0), 1.0);
        assert_eq!(reg.len(), 1);
        // Height is dropped; markers live on the ground plane.
        assert_eq!(reg.position(a(0)), Some(Vec3::ground(3.0, -2.0)));
    }

    #[test]
    fn repin_moves_marker() {
        let mut reg = ReservationRegistry::new();
        reg.pin(a(0), Vec3::ground(0.0, 0.0), 1.0);
        reg.pin(a(0), Vec3::ground(10.0, 0.0), 1.0);
        assert_eq!(reg.len(), 1);
        assert!(reg.is_free(Vec3::ground(0.0, 0.0), 1.0, &[]));
        assert!(!reg.is_free(Vec3::ground(10.0, 0.0), 1.0, &[]));
    }

    #[test]
    fn release_is_idempotent() {
        let mut reg = ReservationRegistry::new();
        reg.pin(a(4), Vec3::ground(1.0, 1.0), 0.5);
        assert!(reg.release(a(4)));
        assert!(!reg.release(a(4)));
        assert!(reg.position(a(4)).is_none());
        assert!(reg.is_free(Vec3::ground(1.0, 1.0), 0.5, &[]));
    }

    #[test]
    fn clear_empties_everything() {
        let mut reg = ReservationRegistry::new();
        for i in 0..5 {
            reg.pin(a(i), Vec3::ground(i as f32 * 3.0, 0.0), 1.0);
        }
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.iter().count(), 0);
    }
}

#[cfg(test)]
mod overlap {
    use super::*;

    #[test]
    fn touching_discs_do_not_overlap() {
        let mut reg = ReservationRegistry::new();
        reg.pin(a(0), Vec3::ground(0.0, 0.0), 1.0);
        assert!(reg.is_free(Vec3::ground(2.0, 0.0), 1.0, &[]));
        assert!(!reg.is_free(Vec3::ground(1.9, 0.0), 1.0, &[]));
    }

    #[test]
    fn large_marker_found_from_far_query() {
        // A wide marker whose centre lies well outside the query box.
        let mut reg = ReservationRegistry::new();
        reg.pin(a(0), Vec3::ground(0.0, 0.0), 5.0);
        reg.pin(a(1), Vec3::ground(50.0, 0.0), 0.5);
        assert!(!reg.is_free(Vec3::ground(5.5, 0.0), 1.0, &[]));
        let hits: Vec<_> = reg.overlapping(Vec3::ground(5.5, 0.0), 1.0, &[]).map(|m| m.agent).collect();
        assert_eq!(hits, vec![a(0)]);
    }

    #[test]
    fn exclusions_skip_own_markers() {
        let mut reg = ReservationRegistry::new();
        reg.pin(a(0), Vec3::ground(0.0, 0.0), 1.0);
        reg.pin(a(1), Vec3::ground(0.5, 0.0), 1.0);
        assert!(!reg.is_free(Vec3::ground(0.0, 0.0), 1.0, &[a(0)]));
        assert!(reg.is_free(Vec3::ground(0.0, 0.0), 1.0, &[a(0), a(1)]));
    }
}
