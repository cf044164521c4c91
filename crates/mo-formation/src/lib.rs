//! `mo-formation` — destination slots for groups of agents.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`generator`] | `SlotProbe` trait, `FormationRequest`, `generate`          |
//! | [`assign`]    | Slot → agent assignment (circular and rectangular orders)  |
//! | [`sorter`]    | Group sorter: footprint and engagement grouping, attack eligibility |
//! | [`error`]     | `FormationError`, `FormationResult<T>`                     |
//!
//! Everything here is a pure function of its inputs.  World state reaches
//! the generator only through [`SlotProbe`], so it can be driven by the
//! orchestrator's terrain + reservation registry or by a test stub.

pub mod assign;
pub mod error;
pub mod generator;
pub mod sorter;

#[cfg(test)]
mod tests;

pub use assign::{Assignment, assign_slots};
pub use error::{FormationError, FormationResult};
pub use generator::{Formation, FormationRequest, SlotProbe, generate};
pub use sorter::{
    AgentGroup, EngagementSort, FootprintSort, GroupKey, Ineligible, SpacingKey,
    check_eligibility, sort_by_footprint, sort_for_engagement,
};
