//! The `LocomotorStore` — one `Locomotor` per agent.

use std::collections::VecDeque;

use mo_core::{AgentId, MovementConfig, TaskId, Vec3};

use crate::{LocomotionError, LocomotionResult, Locomotor, Phase, Travel};

/// Number of agents in each phase.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    pub idle:    usize,
    pub pending: usize,
    pub moving:  usize,
    pub arrived: usize,
}

/// Indexed by `AgentId`; always as long as the agent store.
pub struct LocomotorStore {
    pub locomotors: Vec<Locomotor>,
}

impl LocomotorStore {
    /// `agent_count` idle locomotors using the cadences in `config`.
    pub fn new(agent_count: usize, config: &MovementConfig) -> Self {
        let proto = Locomotor::new(
            config.stuck_check_interval_ticks,
            config.height_resample_interval_ticks,
        );
        Self { locomotors: vec![proto; agent_count] }
    }

    pub fn len(&self) -> usize {
        self.locomotors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locomotors.is_empty()
    }

    pub fn get(&self, agent: AgentId) -> LocomotionResult<&Locomotor> {
        self.locomotors.get(agent.index()).ok_or(LocomotionError::AgentNotFound(agent))
    }

    pub fn get_mut(&mut self, agent: AgentId) -> LocomotionResult<&mut Locomotor> {
        self.locomotors.get_mut(agent.index()).ok_or(LocomotionError::AgentNotFound(agent))
    }

    /// Phase of `agent`; unknown ids read as `Idle`.
    #[inline]
    pub fn phase(&self, agent: AgentId) -> Phase {
        self.locomotors.get(agent.index()).map_or(Phase::Idle, |l| l.phase)
    }

    /// Record that `task` is queued for `agent`.  Returns `true` if the
    /// agent was busy with something else, which the new task cancels.
    pub fn mark_pending(&mut self, agent: AgentId, task: TaskId) -> LocomotionResult<bool> {
        let loco = self.get_mut(agent)?;
        let was_busy = loco.is_busy();
        loco.mark_pending(task);
        Ok(was_busy)
    }

    /// Hand `agent` an accepted path.
    pub fn begin(
        &mut self,
        agent:    AgentId,
        corners:  Vec<Vec3>,
        travel:   Travel,
        position: Vec3,
    ) -> LocomotionResult<()> {
        if corners.is_empty() {
            return Err(LocomotionError::EmptyPath(agent));
        }
        self.get_mut(agent)?.begin(VecDeque::from(corners), travel, position);
        Ok(())
    }

    /// Stop `agent`.  Returns `true` if it was busy; unknown ids are a no-op.
    pub fn halt(&mut self, agent: AgentId) -> bool {
        self.locomotors.get_mut(agent.index()).is_some_and(Locomotor::halt)
    }

    pub fn counts(&self) -> PhaseCounts {
        let mut c = PhaseCounts::default();
        for l in &self.locomotors {
            match l.phase {
                Phase::Idle        => c.idle += 1,
                Phase::PendingPath => c.pending += 1,
                Phase::Moving      => c.moving += 1,
                Phase::Arrived     => c.arrived += 1,
            }
        }
        c
    }
}
