//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `movement_events.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, MovementEventRow, OutputResult, TickSummaryRow};

pub struct CsvWriter {
    snapshots: Writer<File>,
    events:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record([
            "agent_id", "tick", "x", "y", "z", "heading", "phase", "alive", "carrier", "target",
        ])?;

        let mut events = Writer::from_path(dir.join("movement_events.csv"))?;
        events.write_record(["tick", "agent_id", "event", "detail"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick", "elapsed_secs", "tasks_processed", "queue_len", "idle", "pending", "moving",
            "arrived",
        ])?;

        Ok(Self { snapshots, events, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.3}", row.z),
                format!("{:.4}", row.heading),
                row.phase.to_string(),
                (row.alive as u8).to_string(),
                row.carrier.to_string(),
                row.target.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_events(&mut self, rows: &[MovementEventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.event.to_string(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.elapsed_secs),
            row.tasks_processed.to_string(),
            row.queue_len.to_string(),
            row.idle.to_string(),
            row.pending.to_string(),
            row.moving.to_string(),
            row.arrived.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
