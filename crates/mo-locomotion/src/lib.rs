//! `mo-locomotion` — the agent locomotion state machine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `Phase`, `Locomotor` (per-agent state), `Travel`, `RepeatTimer` |
//! | [`store`]   | `LocomotorStore` — one `Locomotor` per `AgentId`, phase counts  |
//! | [`engine`]  | `LocomotionEngine` — per-tick stepping, `LocomotionEvent`       |
//! | [`error`]   | `LocomotionError`, `LocomotionResult<T>`                        |
//!
//! # Phases
//!
//! ```text
//!   Idle ──mark_pending──▶ PendingPath ──begin──▶ Moving ──arrive──▶ Arrived
//!    ▲                                              │                   │
//!    └────────────── halt / stuck / target lost ────┘◀── next tick ─────┘
//! ```
//!
//! `Arrived` is held for exactly one tick so observers see it, then decays
//! to `Idle`.  Any phase may be forced back to `Idle` with `halt`.
//!
//! The engine owns no world state: positions and headings live in
//! `mo_agent::AgentStore` and are updated in place each step.

pub mod engine;
pub mod error;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::{LocomotionEngine, LocomotionEvent, StepParams};
pub use error::{LocomotionError, LocomotionResult};
pub use state::{Locomotor, Phase, RepeatTimer, Travel};
pub use store::{LocomotorStore, PhaseCounts};
