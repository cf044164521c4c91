//! `mo-output` — trace writers for the movement orchestrator.
//!
//! | Backend | Files created                                                        |
//! |---------|----------------------------------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `movement_events.csv`, `tick_summaries.csv`   |
//!
//! Writers implement [`OutputWriter`] and are driven by [`TraceObserver`],
//! which implements `mo_sim::MovementObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mo_output::{CsvWriter, TraceObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut orch = OrchestratorBuilder::new(terrain, agents)
//!     .observer(TraceObserver::new(writer, &config))
//!     .build()?;
//! orch.run()?;
//! if let Some(e) = orch.observer.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{AgentSnapshotRow, MovementEventRow, TickSummaryRow};
pub use writer::OutputWriter;
