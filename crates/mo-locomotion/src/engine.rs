//! Per-tick locomotion stepping.
//!
//! # Step order (per moving agent)
//!
//! 1. Drop agents that are no longer in the world; stop agents whose
//!    target entity died.
//! 2. Turn toward the current waypoint by at most `angular_speed · dt`.
//! 3. Ramp speed toward `max_speed` (or down toward zero when the agent
//!    must finish turning first) and advance, never past the waypoint.
//! 4. Consume reached waypoints; on the last one, within stopping
//!    distance, arrive.
//! 5. Height re-sample and stuck probe on their own cadences.

use log::{debug, warn};

use mo_agent::AgentStore;
use mo_core::{AgentId, MovementConfig, Vec3, geom::angle_delta};
use mo_nav::TerrainNav;
use mo_schedule::LookAt;

use crate::{Locomotor, LocomotorStore, Phase, Travel};

/// Something the orchestrator must react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocomotionEvent {
    Arrived(AgentId),
    /// Failed to cover the minimum displacement over a probe interval.
    Stuck(AgentId),
    /// The movement's target entity disappeared mid-flight.
    TargetLost(AgentId),
}

/// Tunables read every step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepParams {
    pub dt:                     f32,
    pub waypoint_reach:         f32,
    pub facing_tolerance:       f32,
    pub stuck_min_displacement: f32,
}

impl StepParams {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            dt:                     config.tick_secs,
            waypoint_reach:         config.waypoint_reach_distance,
            facing_tolerance:       config.facing_tolerance_rad,
            stuck_min_displacement: config.stuck_min_displacement,
        }
    }
}

/// Owns every agent's [`Locomotor`] and advances them one tick at a time.
pub struct LocomotionEngine {
    pub store:  LocomotorStore,
    pub params: StepParams,
}

impl LocomotionEngine {
    pub fn new(agent_count: usize, config: &MovementConfig) -> Self {
        Self {
            store:  LocomotorStore::new(agent_count, config),
            params: StepParams::from_config(config),
        }
    }

    /// Advance every agent by one tick.  Positions and headings in `agents`
    /// are updated in place.
    pub fn step<T: TerrainNav + ?Sized>(
        &mut self,
        agents:  &mut AgentStore,
        terrain: &T,
    ) -> Vec<LocomotionEvent> {
        let mut events = Vec::new();
        for (i, loco) in self.store.locomotors.iter_mut().enumerate() {
            match loco.phase {
                Phase::Arrived => loco.phase = Phase::Idle,
                Phase::Moving => {
                    let agent = AgentId(i as u32);
                    if let Some(ev) = step_agent(agent, loco, agents, terrain, &self.params) {
                        events.push(ev);
                    }
                }
                Phase::Idle | Phase::PendingPath => {}
            }
        }
        events
    }
}

fn step_agent<T: TerrainNav + ?Sized>(
    agent:   AgentId,
    loco:    &mut Locomotor,
    agents:  &mut AgentStore,
    terrain: &T,
    p:       &StepParams,
) -> Option<LocomotionEvent> {
    let i = agent.index();
    if !agents.is_active(agent) {
        loco.halt();
        return None;
    }
    if let Some(target) = loco.travel.target {
        if loco.travel.mode.needs_target() && !agents.is_active(target) {
            debug!("agent {agent}: target {target} lost, stopping in place");
            loco.halt();
            return Some(LocomotionEvent::TargetLost(agent));
        }
    }

    let profile = agents.locomotion[i];
    let mut pos = agents.position[i];

    if consume_reached(loco, pos, p.waypoint_reach) {
        return Some(arrive(agent, loco, agents));
    }
    let Some(waypoint) = loco.current_waypoint else {
        return Some(arrive(agent, loco, agents));
    };

    // ── Turn ──────────────────────────────────────────────────────────────
    let mut heading = agents.heading[i];
    let mut facing_error = 0.0;
    if let Some(desired) = (waypoint - pos).planar().yaw() {
        let max_turn = profile.angular_speed * p.dt;
        heading += angle_delta(heading, desired).clamp(-max_turn, max_turn);
        facing_error = angle_delta(heading, desired).abs();
        agents.heading[i] = heading;
    }
    let can_advance = !profile.requires_facing || facing_error <= p.facing_tolerance;

    // ── Speed ramp and advance ───────────────────────────────────────────
    let dv = profile.acceleration * p.dt;
    loco.speed = if can_advance {
        (loco.speed + dv).min(profile.max_speed)
    } else {
        (loco.speed - dv).max(0.0)
    };
    if can_advance {
        loco.stuck.advanced = true;
        let to_wp = (waypoint - pos).planar();
        let dist = to_wp.length();
        if let Some(dir) = to_wp.try_normalize() {
            let step = (loco.speed * p.dt).min(dist);
            pos = pos + dir * step;
        }
        agents.position[i] = pos;
    }

    if consume_reached(loco, pos, p.waypoint_reach) {
        return Some(arrive(agent, loco, agents));
    }

    // ── Cadenced work ────────────────────────────────────────────────────
    if loco.resample.tick() && !profile.airborne {
        if let Some(h) = terrain.sample_height(pos) {
            agents.position[i].y = h;
            pos.y = h;
        }
    }

    loco.stuck.countdown = loco.stuck.countdown.saturating_sub(1);
    if loco.stuck.countdown == 0 {
        let moved = pos.planar_distance(loco.stuck.last_position);
        if loco.stuck.advanced && moved < p.stuck_min_displacement {
            warn!("agent {agent} stuck at {pos}: moved {moved:.3} since last probe");
            loco.halt();
            return Some(LocomotionEvent::Stuck(agent));
        }
        loco.stuck.last_position = pos;
        loco.stuck.countdown = loco.stuck_interval;
        loco.stuck.advanced = false;
    }
    None
}

/// Pop every waypoint already within reach.  Returns `true` when the final
/// one is within the stopping distance.
fn consume_reached(loco: &mut Locomotor, pos: Vec3, waypoint_reach: f32) -> bool {
    while let Some(wp) = loco.current_waypoint {
        let last = loco.waypoints.is_empty();
        let reach = if last { loco.travel.stopping_distance } else { waypoint_reach };
        if pos.planar_distance(wp) > reach {
            return false;
        }
        if last {
            return true;
        }
        loco.current_waypoint = loco.waypoints.pop_front();
    }
    false
}

fn arrive(agent: AgentId, loco: &mut Locomotor, agents: &mut AgentStore) -> LocomotionEvent {
    let i = agent.index();
    let pos = agents.position[i];
    if let Some(yaw) = look_at_point(&loco.travel, agents).and_then(|p| (p - pos).planar().yaw()) {
        agents.heading[i] = yaw;
    }
    loco.arrive();
    LocomotionEvent::Arrived(agent)
}

fn look_at_point(travel: &Travel, agents: &AgentStore) -> Option<Vec3> {
    match travel.look_at {
        LookAt::Travel => None,
        LookAt::Point(p) => Some(p),
        LookAt::Entity(e) if agents.contains(e) => Some(agents.position[e.index()]),
        LookAt::Entity(_) => None,
    }
}
