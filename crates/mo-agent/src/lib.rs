//! `mo-agent` — Structure-of-Arrays entity storage.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`profile`]   | `EntityKind`, `LocomotionProfile`, `CombatProfile`          |
//! | [`store`]     | `AgentStore` (SoA arrays)                                   |
//! | [`builder`]   | `AgentSpec`, `AgentStoreBuilder` (fluent construction)      |
//!
//! Every entity the movement subsystem knows about lives in the same store,
//! whatever its [`EntityKind`], and is addressed by `AgentId`.  Attack and
//! enter targets are therefore plain ids, and a
//! destroyed target is simply an id whose `alive` flag is `false`.

pub mod builder;
pub mod profile;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::{AgentSpec, AgentStoreBuilder};
pub use profile::{CombatProfile, EntityKind, LocomotionProfile};
pub use store::AgentStore;
