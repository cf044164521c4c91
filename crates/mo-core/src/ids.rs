//! Typed identifiers.
//!
//! `AgentId` doubles as the row index into every SoA column of the agent
//! store; use `.index()` rather than `.0 as usize`.  `TaskId`s are handed
//! out by the task queue and are never reused within one orchestrator.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Row of an entity (unit, structure, carrier, portal) in the agent store.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identifier of a queued movement task.
    pub struct TaskId(u64);
}

typed_id! {
    /// Owning side of an entity.  Agents never attack their own faction.
    pub struct FactionId(u16);
}

impl AgentId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for AgentId {
    type Error = std::num::TryFromIntError;
    fn try_from(row: usize) -> Result<AgentId, Self::Error> {
        u32::try_from(row).map(AgentId)
    }
}

impl TaskId {
    /// Carried by a task until the queue stamps it.
    pub const UNSTAMPED: TaskId = TaskId(u64::MAX);

    /// The id the queue hands out after this one.
    #[inline]
    pub fn next(self) -> TaskId {
        TaskId(self.0 + 1)
    }

    pub fn is_stamped(self) -> bool {
        self != Self::UNSTAMPED
    }
}

impl FactionId {
    pub fn is_hostile_to(self, other: FactionId) -> bool {
        self != other
    }
}
