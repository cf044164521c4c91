//! One planned relocation of one agent.

use mo_core::{AgentId, TargetMode, TaskId, Vec3};

/// What the agent should face once it arrives.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LookAt {
    /// Keep the heading the agent arrived with.
    #[default]
    Travel,
    /// Face a fixed point.
    Point(Vec3),
    /// Face an entity, resolved at arrival time.
    Entity(AgentId),
}

/// A queued movement.
///
/// `target` is a weak reference: the entity may die while the task waits
/// in the queue, so it is re-validated when the task is processed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementTask {
    /// Assigned by [`TaskQueue::enqueue`](crate::TaskQueue::enqueue).
    pub id:                TaskId,
    pub agent:             AgentId,
    pub destination:       Vec3,
    pub look_at:           LookAt,
    pub target:            Option<AgentId>,
    pub mode:              TargetMode,
    /// Bind `target` as the agent's combat target once a path is found.
    pub attack:            bool,
    /// The combat binding counts as an explicit assignment.
    pub assigned:          bool,
    /// Failed path attempts so far.
    pub retries:           u32,
    pub stopping_distance: f32,
}

impl MovementTask {
    /// A plain move of `agent` to `destination`.
    pub fn new(agent: AgentId, destination: Vec3, stopping_distance: f32) -> Self {
        Self {
            id: TaskId::UNSTAMPED,
            agent,
            destination,
            look_at: LookAt::Travel,
            target: None,
            mode: TargetMode::Move,
            attack: false,
            assigned: false,
            retries: 0,
            stopping_distance,
        }
    }

    /// Approach `target` in `mode`, facing it on arrival.
    pub fn toward(mut self, target: AgentId, mode: TargetMode) -> Self {
        self.target = Some(target);
        self.mode = mode;
        self.look_at = LookAt::Entity(target);
        self.attack = mode == TargetMode::AttackApproach;
        self
    }

    pub fn look_at(mut self, look_at: LookAt) -> Self {
        self.look_at = look_at;
        self
    }

    pub fn assigned(mut self, assigned: bool) -> Self {
        self.assigned = assigned;
        self
    }
}
