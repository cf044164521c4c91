//! `mo-nav` — the terrain navigation service boundary.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`service`] | `TerrainNav` trait, `NavPath`, `PathStatus`, `NavFilter`     |
//! | [`grid`]    | `GridTerrain` (walkability grid + height map), builder       |
//! | [`astar`]   | A* search and corner string-pulling used by `GridTerrain`    |
//! | [`error`]   | `NavError`, `NavResult<T>`                                   |
//!
//! The orchestration subsystem never touches a terrain representation
//! directly; it only calls [`TerrainNav`].  `GridTerrain` is a small,
//! deterministic implementation for tests, demos, and headless servers.

pub mod astar;
pub mod error;
pub mod grid;
pub mod service;


pub use error::{NavError, NavResult};
pub use grid::{GridTerrain, GridTerrainBuilder};
pub use service::{AreaMask, NavFilter, NavPath, PathStatus, TerrainNav};
