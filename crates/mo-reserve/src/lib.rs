//! `mo-reserve` — position reservation registry.
//!
//! Every agent that has been given a destination pins a circular marker
//! there.  The formation generator asks the registry whether a candidate
//! slot would overlap anyone else's marker, so two groups ordered to nearby
//! points do not pile onto the same spots.
//!
//! Markers are discs on the ground plane (`x`/`z`); height is ignored.
//!
//! # Crate layout
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`registry`] | `ReservationRegistry`, `Marker`                   |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                |
//! |-----------|-------------------------------------------------------|
//! | `fx-hash` | Use `rustc_hash::FxHashMap` for the agent index.      |

pub mod registry;

#[cfg(test)]
mod tests;

pub use registry::{Marker, ReservationRegistry};
