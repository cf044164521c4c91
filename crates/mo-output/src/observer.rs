//! `TraceObserver<W>` — bridges `MovementObserver` to an `OutputWriter`.

use mo_agent::AgentStore;
use mo_core::{AgentId, MovementConfig, Tick};
use mo_locomotion::LocomotorStore;
use mo_sim::{CancelCause, MovementEvent, MovementObserver, TickSummary};

use crate::row::{AgentSnapshotRow, MovementEventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`MovementObserver`] that writes snapshots, callbacks, and tick
/// summaries to any [`OutputWriter`].
///
/// Callback rows are buffered and written once per tick.  Write errors are
/// stored because observer methods have no return value; check
/// [`take_error`][Self::take_error] after the run.
pub struct TraceObserver<W: OutputWriter> {
    writer:     W,
    tick_secs:  f32,
    pending:    Vec<MovementEventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TraceObserver<W> {
    pub fn new(writer: W, config: &MovementConfig) -> Self {
        Self {
            writer,
            tick_secs:  config.tick_secs,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the first stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn record(&mut self, event: MovementEvent) {
        self.pending.push(MovementEventRow {
            tick:     event.tick().0,
            agent_id: event.agent().0,
            event:    event.kind(),
            detail:   event.detail(),
        });
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_events(&rows);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> MovementObserver for TraceObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.flush_events();
        let row = TickSummaryRow {
            tick:            tick.0,
            elapsed_secs:    tick.0 as f64 * self.tick_secs as f64,
            tasks_processed: summary.tasks_processed as u64,
            queue_len:       summary.queue_len as u64,
            idle:            summary.phases.idle as u64,
            pending:         summary.phases.pending as u64,
            moving:          summary.phases.moving as u64,
            arrived:         summary.phases.arrived as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_path_attempt(&mut self, tick: Tick, agent: AgentId, attempt: u32) {
        self.record(MovementEvent::PathAttempt { tick, agent, attempt });
    }

    fn on_path_invalid(&mut self, tick: Tick, agent: AgentId, fatal: bool) {
        self.record(MovementEvent::PathInvalid { tick, agent, fatal });
    }

    fn on_arrived(&mut self, tick: Tick, agent: AgentId) {
        self.record(MovementEvent::Arrived { tick, agent });
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId) {
        self.record(MovementEvent::Stuck { tick, agent });
    }

    fn on_engage(&mut self, tick: Tick, agent: AgentId, target: AgentId) {
        self.record(MovementEvent::Engage { tick, agent, target });
    }

    fn on_entered(&mut self, tick: Tick, agent: AgentId, entity: AgentId) {
        self.record(MovementEvent::Entered { tick, agent, entity });
    }

    fn on_stopped(&mut self, tick: Tick, agent: AgentId) {
        self.record(MovementEvent::Stopped { tick, agent });
    }

    fn on_jobs_cancelled(&mut self, tick: Tick, agent: AgentId, cause: CancelCause) {
        self.record(MovementEvent::JobsCancelled { tick, agent, cause });
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore, locomotion: &LocomotorStore) {
        let rows: Vec<AgentSnapshotRow> = agents
            .agent_ids()
            .map(|agent| {
                let i = agent.index();
                let p = agents.position[i];
                AgentSnapshotRow {
                    agent_id: agent.0,
                    tick:     tick.0,
                    x:        p.x,
                    y:        p.y,
                    z:        p.z,
                    heading:  agents.heading[i],
                    phase:    locomotion.phase(agent).as_str(),
                    alive:    agents.alive[i],
                    carrier:  agents.embarked_in[i].map_or(u32::MAX, |c| c.0),
                    target:   agents.combat_target[i].map_or(u32::MAX, |t| t.0),
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        self.flush_events();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
