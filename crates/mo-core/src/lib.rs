//! `mo-core` — foundational types for the movement orchestration workspace.
//!
//! This crate is a dependency of every other `mo-*` crate.  It has no `mo-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `TaskId`, `FactionId`                      |
//! | [`geom`]        | `Vec3`, planar distance, yaw helpers                  |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `MovementConfig`, `FormationKind`                     |
//! | [`mode`]        | `TargetMode`, `AttackMode`                            |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`error`]       | `MoError`, `MoResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{FormationKind, MovementConfig};
pub use error::{MoError, MoResult};
pub use geom::Vec3;
pub use ids::{AgentId, FactionId, TaskId};
pub use mode::{AttackMode, TargetMode};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
