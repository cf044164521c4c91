//! `mo-sim` — the movement orchestrator.
//!
//! # Tick loop
//!
//! ```text
//! each tick:
//!   ① Schedule   — pop at most one MovementTask from the FIFO queue:
//!                    dead agent / superseded task → discard
//!                    path incomplete, retries left → requeue at tail
//!                    path incomplete, retries spent → terminal failure
//!                    path complete → bind attack target, start locomotion
//!   ② Locomotion — step every moving agent (turn, accelerate, advance)
//!   ③ Events     — arrivals (stop / embark / teleport / engage),
//!                  stuck agents, lost targets
//!   ④ Observe    — tick summary, periodic snapshots
//! ```
//!
//! Requests (`request_move`, `request_group_move`,
//! `request_attack_approach`, `unload`) run synchronously in the caller's
//! tick: grouping, formation generation, and enqueueing all complete before
//! they return.  Only path computation is spread over later ticks.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mo_nav::GridTerrainBuilder;
//! use mo_sim::{EventLog, OrchestratorBuilder};
//!
//! let terrain = GridTerrainBuilder::new(64, 64, 1.0).origin(-32.0, -32.0).build()?;
//! let mut orch = OrchestratorBuilder::new(terrain, agents)
//!     .observer(EventLog::default())
//!     .build()?;
//! orch.request_group_move(&ids, Vec3::ZERO, 0.0, None, TargetMode::Move, None)?;
//! orch.run()?;
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod events;
pub mod observer;
pub mod orchestrator;

mod probe;


pub use builder::OrchestratorBuilder;
pub use command::Command;
pub use error::{RequestError, RequestResult, SimError, SimResult};
pub use events::{EventLog, MovementEvent};
pub use observer::{CancelCause, MovementObserver, NoopObserver, TickSummary};
pub use orchestrator::{Orchestrator, RequestOutcome};
