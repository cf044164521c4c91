//! The `OutputWriter` trait implemented by trace backends.

use crate::{AgentSnapshotRow, MovementEventRow, OutputResult, TickSummaryRow};

/// Sink for trace rows.
///
/// Errors are stored by [`TraceObserver`](crate::TraceObserver) and
/// retrieved with `take_error`, since observer callbacks cannot fail.
pub trait OutputWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    fn write_events(&mut self, rows: &[MovementEventRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
