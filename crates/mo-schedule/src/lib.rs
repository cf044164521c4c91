//! `mo-schedule` — movement tasks and the queue that serialises them.
//!
//! # Crate layout
//!
//! | Module    | Contents                                   |
//! |-----------|--------------------------------------------|
//! | [`task`]  | `MovementTask`, `LookAt`                   |
//! | [`queue`] | `TaskQueue` (FIFO with O(n) excision)      |
//!
//! The queue is pure bookkeeping.  Dequeue policy (one task per tick,
//! retry bound, failure notification) lives in `mo-sim`'s orchestrator.

pub mod queue;
pub mod task;

#[cfg(test)]
mod tests;

pub use queue::TaskQueue;
pub use task::{LookAt, MovementTask};
