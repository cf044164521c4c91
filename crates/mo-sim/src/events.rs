//! `EventLog` — an observer that records every movement callback.

use mo_core::{AgentId, Tick};

use crate::{CancelCause, MovementObserver};

/// One recorded callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementEvent {
    PathAttempt   { tick: Tick, agent: AgentId, attempt: u32 },
    PathInvalid   { tick: Tick, agent: AgentId, fatal: bool },
    Arrived       { tick: Tick, agent: AgentId },
    Stuck         { tick: Tick, agent: AgentId },
    Engage        { tick: Tick, agent: AgentId, target: AgentId },
    Entered       { tick: Tick, agent: AgentId, entity: AgentId },
    Stopped       { tick: Tick, agent: AgentId },
    JobsCancelled { tick: Tick, agent: AgentId, cause: CancelCause },
}

impl MovementEvent {
    pub fn tick(&self) -> Tick {
        match *self {
            MovementEvent::PathAttempt { tick, .. }
            | MovementEvent::PathInvalid { tick, .. }
            | MovementEvent::Arrived { tick, .. }
            | MovementEvent::Stuck { tick, .. }
            | MovementEvent::Engage { tick, .. }
            | MovementEvent::Entered { tick, .. }
            | MovementEvent::Stopped { tick, .. }
            | MovementEvent::JobsCancelled { tick, .. } => tick,
        }
    }

    pub fn agent(&self) -> AgentId {
        match *self {
            MovementEvent::PathAttempt { agent, .. }
            | MovementEvent::PathInvalid { agent, .. }
            | MovementEvent::Arrived { agent, .. }
            | MovementEvent::Stuck { agent, .. }
            | MovementEvent::Engage { agent, .. }
            | MovementEvent::Entered { agent, .. }
            | MovementEvent::Stopped { agent, .. }
            | MovementEvent::JobsCancelled { agent, .. } => agent,
        }
    }

    /// Short snake_case name, used as the `event` column in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            MovementEvent::PathAttempt { .. }   => "path_attempt",
            MovementEvent::PathInvalid { .. }   => "path_invalid",
            MovementEvent::Arrived { .. }       => "arrived",
            MovementEvent::Stuck { .. }         => "stuck",
            MovementEvent::Engage { .. }        => "engage",
            MovementEvent::Entered { .. }       => "entered",
            MovementEvent::Stopped { .. }       => "stopped",
            MovementEvent::JobsCancelled { .. } => "jobs_cancelled",
        }
    }

    /// Event-specific detail: attempt number, fatal flag, other entity, or cause.
    pub fn detail(&self) -> String {
        match *self {
            MovementEvent::PathAttempt { attempt, .. } => attempt.to_string(),
            MovementEvent::PathInvalid { fatal, .. } => fatal.to_string(),
            MovementEvent::Engage { target, .. } => target.0.to_string(),
            MovementEvent::Entered { entity, .. } => entity.0.to_string(),
            MovementEvent::JobsCancelled { cause, .. } => cause.as_str().to_string(),
            MovementEvent::Arrived { .. }
            | MovementEvent::Stuck { .. }
            | MovementEvent::Stopped { .. } => String::new(),
        }
    }
}

/// Records every callback in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<MovementEvent>,
}

impl EventLog {
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &MovementEvent> {
        self.events.iter().filter(move |e| e.agent() == agent)
    }

    pub fn count(&self, pred: impl Fn(&MovementEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl MovementObserver for EventLog {
    fn on_path_attempt(&mut self, tick: Tick, agent: AgentId, attempt: u32) {
        self.events.push(MovementEvent::PathAttempt { tick, agent, attempt });
    }

    fn on_path_invalid(&mut self, tick: Tick, agent: AgentId, fatal: bool) {
        self.events.push(MovementEvent::PathInvalid { tick, agent, fatal });
    }

    fn on_arrived(&mut self, tick: Tick, agent: AgentId) {
        self.events.push(MovementEvent::Arrived { tick, agent });
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId) {
        self.events.push(MovementEvent::Stuck { tick, agent });
    }

    fn on_engage(&mut self, tick: Tick, agent: AgentId, target: AgentId) {
        self.events.push(MovementEvent::Engage { tick, agent, target });
    }

    fn on_entered(&mut self, tick: Tick, agent: AgentId, entity: AgentId) {
        self.events.push(MovementEvent::Entered { tick, agent, entity });
    }

    fn on_stopped(&mut self, tick: Tick, agent: AgentId) {
        self.events.push(MovementEvent::Stopped { tick, agent });
    }

    fn on_jobs_cancelled(&mut self, tick: Tick, agent: AgentId, cause: CancelCause) {
        self.events.push(MovementEvent::JobsCancelled { tick, agent, cause });
    }
}
