//! Movement observer trait: completion callbacks and data collection.

use mo_agent::AgentStore;
use mo_core::{AgentId, Tick};
use mo_locomotion::{LocomotorStore, PhaseCounts};

/// Why the orchestrator cancelled an agent's job.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CancelCause {
    /// A new movement replaced the one in progress.
    Retasked,
    /// The stuck probe fired.
    Stuck,
    /// No path after every retry.
    PathFailed,
}

impl CancelCause {
    pub fn as_str(self) -> &'static str {
        match self {
            CancelCause::Retasked   => "retasked",
            CancelCause::Stuck      => "stuck",
            CancelCause::PathFailed => "path_failed",
        }
    }
}

/// End-of-tick counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Tasks popped from the queue this tick (0 or 1).
    pub tasks_processed: usize,
    /// Tasks still waiting after this tick.
    pub queue_len:       usize,
    pub phases:          PhaseCounts,
}

/// Callbacks invoked synchronously by the [`Orchestrator`][crate::Orchestrator]
/// in the tick the transition happens.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl MovementObserver for Arrivals {
///     fn on_arrived(&mut self, _tick: Tick, _agent: AgentId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait MovementObserver {
    fn on_tick_start(&mut self, _tick: Tick) {}

    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// A path computation is about to run.  `attempt` starts at 1.
    fn on_path_attempt(&mut self, _tick: Tick, _agent: AgentId, _attempt: u32) {}

    /// A path computation failed.  `fatal` is `true` once retries are spent.
    fn on_path_invalid(&mut self, _tick: Tick, _agent: AgentId, _fatal: bool) {}

    fn on_arrived(&mut self, _tick: Tick, _agent: AgentId) {}

    fn on_stuck(&mut self, _tick: Tick, _agent: AgentId) {}

    /// `agent` is in reach of `target` and may start fighting.
    fn on_engage(&mut self, _tick: Tick, _agent: AgentId, _target: AgentId) {}

    /// `agent` boarded a carrier or passed through a portal.
    fn on_entered(&mut self, _tick: Tick, _agent: AgentId, _entity: AgentId) {}

    /// Movement was stopped before arrival.
    fn on_stopped(&mut self, _tick: Tick, _agent: AgentId) {}

    fn on_jobs_cancelled(&mut self, _tick: Tick, _agent: AgentId, _cause: CancelCause) {}

    /// Called every `config.snapshot_interval_ticks` ticks.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore, _locomotion: &LocomotorStore) {}

    /// Called once after `Orchestrator::run` finishes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`MovementObserver`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl MovementObserver for NoopObserver {}

/// Fan every callback out to both observers, `A` first.
impl<A: MovementObserver, B: MovementObserver> MovementObserver for (A, B) {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.0.on_tick_end(tick, summary);
        self.1.on_tick_end(tick, summary);
    }

    fn on_path_attempt(&mut self, tick: Tick, agent: AgentId, attempt: u32) {
        self.0.on_path_attempt(tick, agent, attempt);
        self.1.on_path_attempt(tick, agent, attempt);
    }

    fn on_path_invalid(&mut self, tick: Tick, agent: AgentId, fatal: bool) {
        self.0.on_path_invalid(tick, agent, fatal);
        self.1.on_path_invalid(tick, agent, fatal);
    }

    fn on_arrived(&mut self, tick: Tick, agent: AgentId) {
        self.0.on_arrived(tick, agent);
        self.1.on_arrived(tick, agent);
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId) {
        self.0.on_stuck(tick, agent);
        self.1.on_stuck(tick, agent);
    }

    fn on_engage(&mut self, tick: Tick, agent: AgentId, target: AgentId) {
        self.0.on_engage(tick, agent, target);
        self.1.on_engage(tick, agent, target);
    }

    fn on_entered(&mut self, tick: Tick, agent: AgentId, entity: AgentId) {
        self.0.on_entered(tick, agent, entity);
        self.1.on_entered(tick, agent, entity);
    }

    fn on_stopped(&mut self, tick: Tick, agent: AgentId) {
        self.0.on_stopped(tick, agent);
        self.1.on_stopped(tick, agent);
    }

    fn on_jobs_cancelled(&mut self, tick: Tick, agent: AgentId, cause: CancelCause) {
        self.0.on_jobs_cancelled(tick, agent, cause);
        self.1.on_jobs_cancelled(tick, agent, cause);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore, locomotion: &LocomotorStore) {
        self.0.on_snapshot(tick, agents, locomotion);
        self.1.on_snapshot(tick, agents, locomotion);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.0.on_run_end(final_tick);
        self.1.on_run_end(final_tick);
    }
}
