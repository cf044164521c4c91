//! Unit tests for mo-locomotion.

use mo_agent::{AgentSpec, AgentStore, AgentStoreBuilder, LocomotionProfile};
use mo_core::{AgentId, MovementConfig, TargetMode, TaskId, Vec3};
use mo_nav::{GridTerrain, GridTerrainBuilder};

use crate::{LocomotionEngine, LocomotionEvent, Phase, Travel};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn flat(height: f32) -> GridTerrain {
    GridTerrainBuilder::new(60, 60, 1.0)
        .origin(-30.0, -30.0)
        .height_fn(move |_, _| height)
        .build()
        .unwrap()
}

fn one_agent(profile: LocomotionProfile) -> AgentStore {
    AgentStoreBuilder::new()
        .with(AgentSpec::unit(Vec3::ZERO, 0.5).locomotion(profile))
        .build()
}

fn engine_for(agents: &AgentStore) -> LocomotionEngine {
    LocomotionEngine::new(agents.len(), &MovementConfig::default())
}

/// Step until `limit` ticks pass, collecting every event.
fn run(
    engine:  &mut LocomotionEngine,
    agents:  &mut AgentStore,
    terrain: &GridTerrain,
    limit:   usize,
) -> Vec<(usize, LocomotionEvent)> {
    let mut out = Vec::new();
    for t in 0..limit {
        for ev in engine.step(agents, terrain) {
            out.push((t, ev));
        }
    }
    out
}

const A0: AgentId = AgentId(0);

#[cfg(test)]
mod timer {
    use crate::RepeatTimer;

    #[test]
    fn fires_on_interval_until_cancelled() {
        let mut t = RepeatTimer::new(3);
        assert!(!t.tick());
        t.start();
        let fired: Vec<bool> = (0..6).map(|_| t.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true]);
        t.cancel();
        assert!(!t.is_running());
        assert!(!(0..10).any(|_| t.tick()));
    }
}

#[cfg(test)]
mod store {
    use super::*;
    use crate::LocomotionError;

    #[test]
    fn halt_is_idempotent() {
        let agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        assert!(!engine.store.halt(A0));
        assert!(!engine.store.halt(A0));
        assert_eq!(engine.store.phase(A0), Phase::Idle);
    }

    #[test]
    fn pending_then_halt() {
        let agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        assert_eq!(engine.store.mark_pending(A0, TaskId(4)), Ok(false));
        assert_eq!(engine.store.phase(A0), Phase::PendingPath);
        assert_eq!(engine.store.get(A0).unwrap().pending_task, Some(TaskId(4)));
        // A second task supersedes the first.
        assert_eq!(engine.store.mark_pending(A0, TaskId(5)), Ok(true));
        assert!(engine.store.halt(A0));
        assert!(engine.store.get(A0).unwrap().pending_task.is_none());
    }

    #[test]
    fn begin_rejects_empty_path_and_unknown_agent() {
        let agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let travel = Travel::to(Vec3::ground(1.0, 0.0), 0.1);
        assert_eq!(engine.store.begin(A0, vec![], travel, Vec3::ZERO), Err(LocomotionError::EmptyPath(A0)));
        assert_eq!(
            engine.store.begin(AgentId(9), vec![Vec3::ZERO], travel, Vec3::ZERO),
            Err(LocomotionError::AgentNotFound(AgentId(9)))
        );
    }

    #[test]
    fn counts_by_phase() {
        let agents = AgentStoreBuilder::new()
            .with_all((0..4).map(|i| AgentSpec::unit(Vec3::ground(i as f32, 0.0), 0.5)))
            .build();
        let mut engine = engine_for(&agents);
        engine.store.mark_pending(AgentId(1), TaskId(0)).unwrap();
        engine.store.begin(AgentId(2), vec![Vec3::ground(9.0, 9.0)], Travel::to(Vec3::ground(9.0, 9.0), 0.1), Vec3::ZERO).unwrap();
        let c = engine.store.counts();
        assert_eq!((c.idle, c.pending, c.moving, c.arrived), (2, 1, 1, 0));
    }
}

#[cfg(test)]
mod stepping {
    use super::*;

    #[test]
    fn straight_line_arrives_exactly_once() {
        let terrain = flat(0.0);
        let mut agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(0.0, 5.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();

        let events = run(&mut engine, &mut agents, &terrain, 200);
        let arrivals: Vec<_> = events.iter().filter(|(_, e)| *e == LocomotionEvent::Arrived(A0)).collect();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(events.len(), 1);
        assert!(agents.position[0].planar_distance(dest) <= 0.1);
        assert_eq!(engine.store.phase(A0), Phase::Idle);
    }

    #[test]
    fn arrived_is_held_for_one_tick() {
        let terrain = flat(0.0);
        let mut agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(0.5, 0.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();
        let mut ticks = 0;
        while engine.step(&mut agents, &terrain).is_empty() {
            ticks += 1;
            assert!(ticks < 100, "never arrived");
        }
        assert_eq!(engine.store.phase(A0), Phase::Arrived);
        assert!(engine.step(&mut agents, &terrain).is_empty());
        assert_eq!(engine.store.phase(A0), Phase::Idle);
    }

    #[test]
    fn speed_ramps_and_caps() {
        let terrain = flat(0.0);
        let mut agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(20.0, 0.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();
        engine.step(&mut agents, &terrain);
        let first = engine.store.get(A0).unwrap().speed;
        assert!((first - 12.0 * 0.05).abs() < 1e-5);
        for _ in 0..20 {
            engine.step(&mut agents, &terrain);
        }
        assert!((engine.store.get(A0).unwrap().speed - 3.0).abs() < 1e-5);
    }

    #[test]
    fn follows_corners_in_order() {
        let terrain = flat(0.0);
        let mut agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let corners = vec![Vec3::ground(0.0, 3.0), Vec3::ground(3.0, 3.0)];
        engine.store.begin(A0, corners, Travel::to(Vec3::ground(3.0, 3.0), 0.1), Vec3::ZERO).unwrap();

        let mut max_x_before_corner: f32 = 0.0;
        for _ in 0..200 {
            if engine.step(&mut agents, &terrain).contains(&LocomotionEvent::Arrived(A0)) {
                break;
            }
            if agents.position[0].z < 2.7 {
                max_x_before_corner = max_x_before_corner.max(agents.position[0].x);
            }
        }
        // Never cut the corner diagonally.
        assert!(max_x_before_corner < 0.3);
        assert!(agents.position[0].planar_distance(Vec3::ground(3.0, 3.0)) <= 0.1);
    }

    #[test]
    fn no_strafe_agent_turns_before_moving() {
        let terrain = flat(0.0);
        let mut agents = one_agent(LocomotionProfile::vehicle());
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(-5.0, 0.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();

        engine.step(&mut agents, &terrain);
        assert_eq!(agents.position[0], Vec3::ZERO);
        assert!(agents.heading[0] < 0.0);

        let events = run(&mut engine, &mut agents, &terrain, 400);
        assert_eq!(events.len(), 1);
        assert!(agents.position[0].planar_distance(dest) <= 0.1);
    }

    #[test]
    fn look_at_snaps_heading_on_arrival() {
        let terrain = flat(0.0);
        let mut agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(2.0, 0.0);
        let travel = Travel { look_at: mo_schedule::LookAt::Point(Vec3::ground(2.0, -10.0)), ..Travel::to(dest, 0.1) };
        engine.store.begin(A0, vec![dest], travel, Vec3::ZERO).unwrap();
        run(&mut engine, &mut agents, &terrain, 100);
        // Facing -z.
        assert!((agents.heading[0].abs() - std::f32::consts::PI).abs() < 0.02);
    }
}

#[cfg(test)]
mod faults {
    use super::*;

    #[test]
    fn slow_agent_is_reported_stuck() {
        let terrain = flat(0.0);
        let crawler = LocomotionProfile { max_speed: 0.01, acceleration: 1.0, ..LocomotionProfile::infantry() };
        let mut agents = one_agent(crawler);
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(10.0, 0.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();

        let events = run(&mut engine, &mut agents, &terrain, 100);
        assert_eq!(events, vec![(39, LocomotionEvent::Stuck(A0))]);
        assert_eq!(engine.store.phase(A0), Phase::Idle);
    }

    #[test]
    fn turning_in_place_is_not_stuck() {
        let terrain = flat(0.0);
        let frozen = LocomotionProfile { angular_speed: 0.0, ..LocomotionProfile::vehicle() };
        let mut agents = one_agent(frozen);
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(0.0, -10.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();

        let events = run(&mut engine, &mut agents, &terrain, 200);
        assert!(events.is_empty());
        assert_eq!(engine.store.phase(A0), Phase::Moving);
    }

    #[test]
    fn dead_target_stops_in_place() {
        let terrain = flat(0.0);
        let mut agents = AgentStoreBuilder::new()
            .with(AgentSpec::unit(Vec3::ZERO, 0.5))
            .with(AgentSpec::unit(Vec3::ground(10.0, 0.0), 0.5))
            .build();
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(9.0, 0.0);
        let travel = Travel {
            target: Some(AgentId(1)),
            mode: TargetMode::AttackApproach,
            ..Travel::to(dest, 0.1)
        };
        engine.store.begin(A0, vec![dest], travel, Vec3::ZERO).unwrap();
        run(&mut engine, &mut agents, &terrain, 5);
        let stopped_at = agents.position[0];

        agents.alive[1] = false;
        let events = run(&mut engine, &mut agents, &terrain, 5);
        assert_eq!(events, vec![(0, LocomotionEvent::TargetLost(A0))]);
        assert_eq!(agents.position[0], stopped_at);
        assert_eq!(engine.store.phase(A0), Phase::Idle);
    }
}

#[cfg(test)]
mod height {
    use super::*;

    #[test]
    fn resampled_on_cadence_while_moving() {
        let terrain = flat(2.0);
        let mut agents = one_agent(LocomotionProfile::infantry());
        let mut engine = engine_for(&agents);
        let dest = Vec3::ground(20.0, 0.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), Vec3::ZERO).unwrap();
        assert!(engine.store.get(A0).unwrap().resample_running());

        run(&mut engine, &mut agents, &terrain, 9);
        assert_eq!(agents.position[0].y, 0.0);
        run(&mut engine, &mut agents, &terrain, 1);
        assert_eq!(agents.position[0].y, 2.0);

        engine.store.halt(A0);
        assert!(!engine.store.get(A0).unwrap().resample_running());
    }

    #[test]
    fn airborne_keeps_altitude() {
        let terrain = flat(2.0);
        let flyer = LocomotionProfile { airborne: true, ..LocomotionProfile::infantry() };
        let mut agents = AgentStoreBuilder::new()
            .with(AgentSpec::unit(Vec3::new(0.0, 15.0, 0.0), 0.5).locomotion(flyer))
            .build();
        let mut engine = engine_for(&agents);
        let dest = Vec3::new(20.0, 15.0, 0.0);
        engine.store.begin(A0, vec![dest], Travel::to(dest, 0.1), agents.position[0]).unwrap();
        run(&mut engine, &mut agents, &terrain, 30);
        assert_eq!(agents.position[0].y, 15.0);
    }
}
