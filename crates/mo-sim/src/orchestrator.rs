//! The `Orchestrator` struct: request surface, scheduler, and tick loop.

use log::{debug, info};

use mo_agent::{AgentStore, EntityKind};
use mo_core::{AgentId, AttackMode, FormationKind, MovementConfig, SimClock, TargetMode, Tick, Vec3};
use mo_formation::{
    AgentGroup, FormationRequest, assign_slots, generate, sort_by_footprint, sort_for_engagement,
    Ineligible,
};
use mo_locomotion::{LocomotionEngine, LocomotionEvent, Phase, Travel};
use mo_nav::{AreaMask, NavFilter, TerrainNav};
use mo_reserve::ReservationRegistry;
use mo_schedule::{LookAt, MovementTask, TaskQueue};

use crate::probe::WorldProbe;
use crate::{CancelCause, MovementObserver, RequestError, RequestResult, SimResult, TickSummary};

/// Gap left between a ring and the entity it surrounds, so slots clear the
/// entity's own marker despite rounding.
const SLOT_CLEARANCE: f32 = 1e-2;

/// What a request did, agent by agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOutcome {
    /// Agents given a formation slot, with that slot.
    pub assigned: Vec<(AgentId, Vec3)>,
    /// Eligible agents the formation had no room for.
    pub unplaced: Vec<AgentId>,
    pub rejected: Vec<(AgentId, Ineligible)>,
    /// Agents already in reach that engaged without moving.
    pub engaged:  Vec<AgentId>,
}

impl RequestOutcome {
    /// Everyone asked for was either assigned or engaged.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty() && self.rejected.is_empty()
    }

    fn merge(&mut self, other: RequestOutcome) {
        self.assigned.extend(other.assigned);
        self.unplaced.extend(other.unplaced);
        self.rejected.extend(other.rejected);
        self.engaged.extend(other.engaged);
    }
}

/// The movement orchestrator.
///
/// `Orchestrator<T, O>` owns all movement state and drives the per-tick
/// loop described in the crate docs.  Create via
/// [`OrchestratorBuilder`][crate::OrchestratorBuilder].
///
/// The observer is owned (rather than passed to `run`) because requests
/// fire callbacks too: an in-range attack engages in the caller's tick and
/// re-tasking cancels the agent's previous job immediately.
pub struct Orchestrator<T: TerrainNav, O: MovementObserver> {
    pub config:     MovementConfig,
    pub clock:      SimClock,
    /// Entity state.  External systems may read it between ticks.
    pub agents:     AgentStore,
    /// One marker per active agent, at its destination or live position.
    pub registry:   ReservationRegistry,
    pub locomotion: LocomotionEngine,
    pub queue:      TaskQueue,
    pub terrain:    T,
    pub observer:   O,
}

impl<T: TerrainNav, O: MovementObserver> Orchestrator<T, O> {
    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`, then call
    /// `on_run_end`.
    pub fn run(&mut self) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.tick()?;
        }
        self.observer.on_run_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Execute one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        let now = self.clock.current_tick;
        self.observer.on_tick_start(now);

        let processed = self.process_next_task(now)?;

        let events = self.locomotion.step(&mut self.agents, &self.terrain);
        for event in events {
            self.handle_locomotion_event(now, event)?;
        }

        let summary = TickSummary {
            tasks_processed: usize::from(processed),
            queue_len:       self.queue.len(),
            phases:          self.locomotion.store.counts(),
        };
        self.observer.on_tick_end(now, &summary);
        if now.is_on_cadence(self.config.snapshot_interval_ticks) {
            self.observer.on_snapshot(now, &self.agents, &self.locomotion.store);
        }

        self.clock.advance();
        Ok(())
    }

    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Locomotion phase of `agent`; unknown ids read as `Idle`.
    pub fn phase(&self, agent: AgentId) -> Phase {
        self.locomotion.store.phase(agent)
    }

    /// Consume the orchestrator and hand back its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Move a single agent.  Runs the same ring search as a group of one.
    pub fn request_move(
        &mut self,
        agent:         AgentId,
        destination:   Vec3,
        offset_radius: f32,
        reference:     Option<AgentId>,
        mode:          TargetMode,
    ) -> RequestResult<RequestOutcome> {
        self.request_group_move(
            &[agent],
            destination,
            offset_radius,
            reference,
            mode,
            Some(FormationKind::Circular),
        )
    }

    /// Move a group into formation.
    ///
    /// With a target mode, `reference` is the entity approached and the
    /// formation is centred on it instead of on `destination`.
    /// `AttackApproach` is forwarded to
    /// [`request_attack_approach`](Self::request_attack_approach) with the
    /// default attack mode.  `kind` defaults to `config.default_formation`.
    pub fn request_group_move(
        &mut self,
        agents:        &[AgentId],
        destination:   Vec3,
        offset_radius: f32,
        reference:     Option<AgentId>,
        mode:          TargetMode,
        kind:          Option<FormationKind>,
    ) -> RequestResult<RequestOutcome> {
        self.check_known(agents)?;
        if mode == TargetMode::AttackApproach {
            let target = reference.ok_or(RequestError::MissingTarget(mode))?;
            return self.request_attack_approach(agents, target, AttackMode::default());
        }
        if mode.needs_target() && reference.is_none() {
            return Err(RequestError::MissingTarget(mode));
        }
        if let Some(r) = reference {
            if !self.agents.is_active(r) {
                return Err(RequestError::InvalidTarget(r));
            }
            match (mode, self.agents.kind[r.index()]) {
                (TargetMode::EnterCarrier, EntityKind::Carrier { .. }) => {}
                (TargetMode::EnterCarrier, _) => return Err(RequestError::NotACarrier(r)),
                (TargetMode::EnterPortal, EntityKind::Portal { .. }) => {}
                (TargetMode::EnterPortal, _) => return Err(RequestError::NotAPortal(r)),
                _ => {}
            }
        }

        let sort = sort_by_footprint(&self.agents, agents);
        let mut outcome = RequestOutcome { rejected: sort.rejected, ..Default::default() };

        let anchor = reference.filter(|_| mode.needs_target());
        let origin = anchor.map_or(destination, |r| self.agents.position[r.index()]);
        let anchor_radius = anchor.map(|r| self.agents.radius[r.index()]);
        let kind = kind.unwrap_or(self.config.default_formation);

        let make_task = |agent: AgentId, slot: Vec3, stopping_distance: f32| {
            let task = MovementTask::new(agent, slot, stopping_distance);
            match (mode, reference) {
                (TargetMode::Move, Some(r)) => task.look_at(LookAt::Entity(r)),
                (TargetMode::Move, None) => task,
                (m, Some(r)) => task.toward(r, m),
                (_, None) => task,
            }
        };
        let placed = self.place_groups(
            &sort.groups,
            kind,
            origin,
            offset_radius,
            |_, spacing| anchor_radius.map_or(0.0, |ar| ar + spacing + SLOT_CLEARANCE),
            make_task,
        )?;
        outcome.merge(placed);
        Ok(outcome)
    }

    /// Send `agents` to attack `target`.
    ///
    /// Agents already within reach engage immediately, in this tick, with no
    /// path computation.  The rest are grouped by engagement reach and each
    /// group gets its own ring around the target.
    pub fn request_attack_approach(
        &mut self,
        agents: &[AgentId],
        target: AgentId,
        mode:   AttackMode,
    ) -> RequestResult<RequestOutcome> {
        self.check_known(agents)?;
        if !self.agents.is_active(target) {
            return Err(RequestError::InvalidTarget(target));
        }

        let sort = sort_for_engagement(&self.agents, agents, target, mode);
        let mut outcome = RequestOutcome { rejected: sort.rejected, ..Default::default() };

        let origin = self.agents.position[target.index()];
        let target_radius = self.agents.radius[target.index()];
        let stopping_distance = self.config.stopping_distance;
        let placed = self.place_groups(
            &sort.groups,
            FormationKind::Circular,
            origin,
            0.0,
            |reach, spacing| (reach - spacing).max(target_radius + spacing + SLOT_CLEARANCE),
            |agent, slot, _| {
                MovementTask::new(agent, slot, stopping_distance)
                    .toward(target, TargetMode::AttackApproach)
                    .assigned(true)
            },
        )?;
        outcome.merge(placed);

        let now = self.clock.current_tick;
        for &agent in &sort.in_range {
            self.engage_in_place(now, agent, target);
            outcome.engaged.push(agent);
        }
        Ok(outcome)
    }

    /// Stop `agent` where it stands.
    ///
    /// Stopping cancels queued work, motion, and any combat binding, so an
    /// agent engaging in place disengages.  Idempotent: an idle, unbound
    /// agent is left untouched and no callback fires.  Returns `true` if
    /// something was actually stopped.
    pub fn stop(&mut self, agent: AgentId) -> RequestResult<bool> {
        self.check_known(&[agent])?;
        let removed = self.queue.remove_for_agent(agent);
        let halted = self.locomotion.store.halt(agent);
        let engaged = self.agents.combat_target[agent.index()].is_some();
        if removed == 0 && !halted && !engaged {
            return Ok(false);
        }
        self.agents.clear_target(agent);
        self.pin_live(agent);
        self.observer.on_stopped(self.clock.current_tick, agent);
        Ok(true)
    }

    /// Remove `agent` from the world: queued work dropped, marker released,
    /// passengers lost with it.  No callbacks fire.
    pub fn kill(&mut self, agent: AgentId) -> RequestResult<()> {
        self.check_known(&[agent])?;
        let i = agent.index();
        if !self.agents.alive[i] {
            return Ok(());
        }
        self.agents.alive[i] = false;
        self.queue.remove_for_agent(agent);
        self.locomotion.store.halt(agent);
        self.registry.release(agent);
        self.agents.clear_target(agent);
        if let Some(carrier) = self.agents.embarked_in[i].take() {
            let c = carrier.index();
            self.agents.cargo[c] = self.agents.cargo[c].saturating_sub(1);
        }

        // Anyone bound to the dead entity loses the binding.
        let bound: Vec<AgentId> = self
            .agents
            .agent_ids()
            .filter(|a| self.agents.combat_target[a.index()] == Some(agent))
            .collect();
        for a in bound {
            self.agents.clear_target(a);
        }

        let passengers = self.passengers(agent);
        for p in passengers {
            self.kill(p)?;
        }
        Ok(())
    }

    /// Disembark every passenger of `carrier` into a ring around it.
    ///
    /// Passengers that find no free slot, or have no usable footprint, stay
    /// aboard.  On error every passenger not yet placed is back aboard.
    pub fn unload(&mut self, carrier: AgentId) -> RequestResult<RequestOutcome> {
        self.check_known(&[carrier])?;
        if self.agents.free_capacity(carrier).is_none() {
            return Err(RequestError::NotACarrier(carrier));
        }
        if !self.agents.is_active(carrier) {
            return Err(RequestError::InvalidTarget(carrier));
        }
        let passengers = self.passengers(carrier);
        if passengers.is_empty() {
            return Ok(RequestOutcome::default());
        }

        let origin = self.agents.position[carrier.index()];
        let carrier_radius = self.agents.radius[carrier.index()];
        for &p in &passengers {
            self.agents.embarked_in[p.index()] = None;
            self.agents.position[p.index()] = origin;
        }

        let sort = sort_by_footprint(&self.agents, &passengers);
        let requests: Vec<FormationRequest> = sort
            .groups
            .iter()
            .map(|g| self.formation_request(FormationKind::Circular, origin, g, Vec3::ZERO))
            .collect();
        if let Err(e) = requests.iter().try_for_each(FormationRequest::validate) {
            self.reembark(carrier, &passengers);
            return Err(e.into());
        }

        let mut outcome = RequestOutcome { rejected: sort.rejected, ..Default::default() };
        let mut offset = 0.0;
        for (group, req) in sort.groups.iter().zip(&requests) {
            let radius = group.spacing.0;
            offset = f32::max(offset, carrier_radius + radius + SLOT_CLEARANCE);
            let generated = {
                let probe = self.probe_for(&group.agents);
                generate(req, &mut offset, &probe)
            };
            let formation = match generated {
                Ok(f) => f,
                Err(e) => {
                    let aboard: Vec<AgentId> = passengers
                        .iter()
                        .copied()
                        .filter(|p| !outcome.assigned.iter().any(|(a, _)| a == p))
                        .collect();
                    self.reembark(carrier, &aboard);
                    let c = carrier.index();
                    self.agents.cargo[c] = self.agents.cargo[c].saturating_sub(outcome.assigned.len() as u32);
                    return Err(e.into());
                }
            };
            let order: Vec<(AgentId, Vec3)> = group.agents.iter().map(|&a| (a, origin)).collect();
            let assignment = assign_slots(FormationKind::Circular, origin, &order, &formation.slots);
            for &(agent, slot) in &assignment.placed {
                let i = agent.index();
                self.agents.position[i] = slot;
                if let Some(yaw) = (slot - origin).planar().yaw() {
                    self.agents.heading[i] = yaw;
                }
                self.pin_live(agent);
            }
            outcome.assigned.extend(assignment.placed);
            outcome.unplaced.extend(assignment.unplaced);
        }

        let staying: Vec<AgentId> = outcome
            .unplaced
            .iter()
            .copied()
            .chain(outcome.rejected.iter().map(|&(a, _)| a))
            .collect();
        self.reembark(carrier, &staying);
        let c = carrier.index();
        self.agents.cargo[c] = self.agents.cargo[c].saturating_sub(outcome.assigned.len() as u32);
        info!(
            "carrier {carrier} unloaded {} of {} passengers",
            outcome.assigned.len(),
            passengers.len()
        );
        Ok(outcome)
    }

    // ── Scheduler ─────────────────────────────────────────────────────────

    /// Pop and process at most one task.  Returns `true` if one was popped.
    fn process_next_task(&mut self, now: Tick) -> SimResult<bool> {
        let Some(task) = self.queue.pop_front() else {
            return Ok(false);
        };
        let agent = task.agent;
        if !self.agents.can_move(agent) {
            debug!("task {}: agent {agent} can no longer move, discarded", task.id);
            return Ok(true);
        }
        if self.locomotion.store.get(agent)?.pending_task != Some(task.id) {
            debug!("task {}: superseded for agent {agent}, discarded", task.id);
            return Ok(true);
        }

        let i = agent.index();
        let attempt = task.retries + 1;
        self.observer.on_path_attempt(now, agent, attempt);

        let from = self.agents.position[i];
        let filter = NavFilter { mask: AreaMask::ALL, airborne: self.agents.locomotion[i].airborne };
        match self.terrain.compute_path(from, task.destination, filter) {
            Ok(path) if path.is_complete() && !path.corners.is_empty() => {
                self.accept_path(task, path.corners, from)?;
            }
            Ok(_) => self.reject_path(now, task, attempt),
            Err(e) => {
                debug!("agent {agent}: path query failed: {e}");
                self.reject_path(now, task, attempt);
            }
        }
        Ok(true)
    }

    fn accept_path(&mut self, task: MovementTask, corners: Vec<Vec3>, from: Vec3) -> SimResult<()> {
        let agent = task.agent;
        let mut travel = Travel {
            destination:       task.destination,
            look_at:           task.look_at,
            stopping_distance: task.stopping_distance,
            target:            task.target,
            mode:              task.mode,
        };
        if let Some(target) = task.target {
            if !self.agents.is_active(target) {
                debug!("agent {agent}: target {target} gone, continuing as a plain move");
                travel.target = None;
                travel.mode = TargetMode::Move;
                if travel.look_at == LookAt::Entity(target) {
                    travel.look_at = LookAt::Travel;
                }
            } else if task.attack {
                self.agents.bind_target(agent, target, task.assigned);
            }
        }
        let n = corners.len();
        self.locomotion.store.begin(agent, corners, travel, from)?;
        debug!("agent {agent}: path accepted, {n} corners to {}", task.destination);
        Ok(())
    }

    fn reject_path(&mut self, now: Tick, task: MovementTask, attempt: u32) {
        let agent = task.agent;
        if task.retries < self.config.max_path_retries {
            debug!("agent {agent}: no path to {} on attempt {attempt}, requeued", task.destination);
            self.observer.on_path_invalid(now, agent, false);
            self.queue.requeue(task);
            return;
        }
        info!("agent {agent}: {} unroutable after {attempt} attempts", task.destination);
        self.locomotion.store.halt(agent);
        self.agents.clear_target(agent);
        self.pin_live(agent);
        self.observer.on_path_invalid(now, agent, true);
        self.observer.on_jobs_cancelled(now, agent, CancelCause::PathFailed);
    }

    /// Queue `task`, replacing whatever the agent was doing, and pin its
    /// marker at the destination.
    fn enqueue_task(&mut self, task: MovementTask) -> RequestResult<()> {
        let agent = task.agent;
        let destination = task.destination;
        self.locomotion.store.get(agent)?;

        let bound = self.agents.combat_target[agent.index()];
        let drops_binding = bound.is_some() && bound != task.target;
        self.queue.remove_for_agent(agent);
        let id = self.queue.enqueue(task);
        let was_busy = self.locomotion.store.mark_pending(agent, id)?;
        if was_busy || drops_binding {
            self.agents.clear_target(agent);
            self.observer.on_jobs_cancelled(self.clock.current_tick, agent, CancelCause::Retasked);
        }
        self.registry.pin(agent, destination, self.agents.radius[agent.index()]);
        debug!("task {id}: agent {agent} queued for {destination}");
        Ok(())
    }

    // ── Locomotion events ─────────────────────────────────────────────────

    fn handle_locomotion_event(&mut self, now: Tick, event: LocomotionEvent) -> SimResult<()> {
        match event {
            LocomotionEvent::Arrived(agent) => {
                self.observer.on_arrived(now, agent);
                let travel = self.locomotion.store.get(agent)?.travel;
                let handed_off = match (travel.mode, travel.target) {
                    (TargetMode::EnterCarrier, Some(c)) => self.try_embark(now, agent, c),
                    (TargetMode::EnterPortal, Some(p)) => self.try_teleport(now, agent, p),
                    (TargetMode::AttackApproach, Some(t))
                        if self.agents.is_active(t)
                            && self.agents.combat_target[agent.index()] == Some(t)
                            && self.agents.in_engagement_range(agent, t) =>
                    {
                        self.pin_live(agent);
                        self.observer.on_engage(now, agent, t);
                        true
                    }
                    (TargetMode::AttackApproach, Some(t)) => {
                        debug!("agent {agent}: arrived out of reach of {t}, binding dropped");
                        false
                    }
                    _ => false,
                };
                if !handed_off {
                    self.agents.clear_target(agent);
                    self.pin_live(agent);
                }
            }
            LocomotionEvent::Stuck(agent) => {
                self.agents.clear_target(agent);
                self.pin_live(agent);
                self.observer.on_stuck(now, agent);
                self.observer.on_jobs_cancelled(now, agent, CancelCause::Stuck);
            }
            LocomotionEvent::TargetLost(agent) => {
                self.agents.clear_target(agent);
                self.pin_live(agent);
                self.observer.on_stopped(now, agent);
            }
        }
        Ok(())
    }

    fn try_embark(&mut self, now: Tick, agent: AgentId, carrier: AgentId) -> bool {
        if !self.agents.is_active(carrier) {
            return false;
        }
        if !matches!(self.agents.free_capacity(carrier), Some(n) if n > 0) {
            debug!("agent {agent}: carrier {carrier} is full");
            return false;
        }
        self.registry.release(agent);
        self.agents.clear_target(agent);
        self.agents.embarked_in[agent.index()] = Some(carrier);
        self.agents.cargo[carrier.index()] += 1;
        info!("agent {agent} boarded carrier {carrier}");
        self.observer.on_entered(now, agent, carrier);
        true
    }

    fn try_teleport(&mut self, now: Tick, agent: AgentId, portal: AgentId) -> bool {
        if !self.agents.is_active(portal) {
            return false;
        }
        let EntityKind::Portal { exit } = self.agents.kind[portal.index()] else {
            return false;
        };
        let mut landing = exit;
        if let Some(h) = self.terrain.sample_height(exit) {
            landing.y = h;
        }
        self.agents.position[agent.index()] = landing;
        self.agents.clear_target(agent);
        self.pin_live(agent);
        info!("agent {agent} passed through portal {portal} to {landing}");
        self.observer.on_entered(now, agent, portal);
        true
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Generate a formation per group and queue one task per placed agent.
    ///
    /// `ring_floor(key, spacing)` is the smallest offset a group may start
    /// at; the running offset only grows, so later groups stack outward.
    fn place_groups(
        &mut self,
        groups:        &[AgentGroup],
        kind:          FormationKind,
        origin:        Vec3,
        offset_radius: f32,
        ring_floor:    impl Fn(f32, f32) -> f32,
        make_task:     impl Fn(AgentId, Vec3, f32) -> MovementTask,
    ) -> RequestResult<RequestOutcome> {
        let mut outcome = RequestOutcome::default();
        if groups.is_empty() {
            return Ok(outcome);
        }

        let members: Vec<AgentId> = groups.iter().flat_map(|g| g.agents.iter().copied()).collect();
        let positions: Vec<Vec3> = members.iter().map(|a| self.agents.position[a.index()]).collect();
        let centroid = positions.iter().fold(Vec3::ZERO, |acc, &p| acc + p) * (1.0 / positions.len() as f32);
        let approach = (origin - centroid).planar();

        let requests: Vec<FormationRequest> = groups
            .iter()
            .map(|g| self.formation_request(kind, origin, g, approach))
            .collect();
        requests.iter().try_for_each(FormationRequest::validate)?;

        // Members must not block their own formation.
        let previous: Vec<(AgentId, Option<Vec3>)> =
            members.iter().map(|&a| (a, self.registry.position(a))).collect();
        for &a in &members {
            self.registry.release(a);
        }

        let mut offset = offset_radius.max(0.0);
        for (group, req) in groups.iter().zip(&requests) {
            let spacing = group.spacing.0;
            offset = offset.max(ring_floor(group.key.0, spacing));
            let generated = {
                let probe = self.probe_for(&group.agents);
                generate(req, &mut offset, &probe)
            };
            let formation = match generated {
                Ok(f) => f,
                Err(e) => {
                    let waiting: Vec<AgentId> = members
                        .iter()
                        .copied()
                        .filter(|m| !outcome.assigned.iter().any(|(a, _)| a == m))
                        .collect();
                    self.restore_markers(&previous, &waiting);
                    return Err(e.into());
                }
            };
            if formation.exhausted {
                debug!(
                    "formation at {origin}: {} of {} slots found",
                    formation.len(),
                    group.agents.len()
                );
            }
            let order: Vec<(AgentId, Vec3)> = group
                .agents
                .iter()
                .map(|&a| (a, self.agents.position[a.index()]))
                .collect();
            let assignment = assign_slots(kind, origin, &order, &formation.slots);
            for &(agent, slot) in &assignment.placed {
                self.enqueue_task(make_task(agent, slot, self.config.stopping_distance))?;
            }
            outcome.assigned.extend(assignment.placed);
            outcome.unplaced.extend(assignment.unplaced);
        }

        self.restore_markers(&previous, &outcome.unplaced);
        Ok(outcome)
    }

    /// Re-pin `agents` where their markers stood before a formation search,
    /// or at their live position if they had none.
    fn restore_markers(&mut self, previous: &[(AgentId, Option<Vec3>)], agents: &[AgentId]) {
        for &agent in agents {
            let i = agent.index();
            let at = previous
                .iter()
                .find(|(a, _)| *a == agent)
                .and_then(|&(_, p)| p)
                .unwrap_or(self.agents.position[i]);
            self.registry.pin(agent, at, self.agents.radius[i]);
        }
    }

    /// Put `agents` back aboard `carrier`, at its origin and without markers.
    fn reembark(&mut self, carrier: AgentId, agents: &[AgentId]) {
        let origin = self.agents.position[carrier.index()];
        for &p in agents {
            self.agents.embarked_in[p.index()] = Some(carrier);
            self.agents.position[p.index()] = origin;
            self.registry.release(p);
        }
    }

    fn formation_request(
        &self,
        kind:     FormationKind,
        origin:   Vec3,
        group:    &AgentGroup,
        approach: Vec3,
    ) -> FormationRequest {
        FormationRequest {
            kind,
            origin,
            count:            group.agents.len(),
            radius:           group.spacing.0,
            approach,
            row_width:        self.config.formation_row_width,
            iteration_budget: self.config.formation_iteration_budget,
        }
    }

    /// Slot probe for a group: airborne only if every member flies.
    fn probe_for(&self, agents: &[AgentId]) -> WorldProbe<'_, T> {
        let airborne = agents.iter().all(|a| self.agents.locomotion[a.index()].airborne);
        WorldProbe {
            terrain:  &self.terrain,
            registry: &self.registry,
            filter:   NavFilter { mask: AreaMask::ALL, airborne },
        }
    }

    fn engage_in_place(&mut self, now: Tick, agent: AgentId, target: AgentId) {
        let removed = self.queue.remove_for_agent(agent);
        let halted = self.locomotion.store.halt(agent);
        let rebinding = self.agents.combat_target[agent.index()].is_some_and(|t| t != target);
        if removed > 0 || halted || rebinding {
            self.observer.on_jobs_cancelled(now, agent, CancelCause::Retasked);
        }
        self.agents.bind_target(agent, target, true);

        let i = agent.index();
        let to_target = self.agents.position[target.index()] - self.agents.position[i];
        if let Some(yaw) = to_target.planar().yaw() {
            self.agents.heading[i] = yaw;
        }
        self.pin_live(agent);
        debug!("agent {agent}: engaging {target} in place");
        self.observer.on_engage(now, agent, target);
    }

    /// Re-pin the marker at the agent's live position, or drop it if the
    /// agent has left the world.
    fn pin_live(&mut self, agent: AgentId) {
        if self.agents.is_active(agent) {
            let i = agent.index();
            self.registry.pin(agent, self.agents.position[i], self.agents.radius[i]);
        } else {
            self.registry.release(agent);
        }
    }

    fn passengers(&self, carrier: AgentId) -> Vec<AgentId> {
        self.agents
            .agent_ids()
            .filter(|a| self.agents.alive[a.index()] && self.agents.embarked_in[a.index()] == Some(carrier))
            .collect()
    }

    fn check_known(&self, agents: &[AgentId]) -> RequestResult<()> {
        match agents.iter().find(|&&a| !self.agents.contains(a)) {
            Some(&a) => Err(RequestError::UnknownAgent(a)),
            None => Ok(()),
        }
    }
}
