//! Plain data row types written by output backends.

/// One entity's state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub x:        f32,
    pub y:        f32,
    pub z:        f32,
    pub heading:  f32,
    /// Locomotion phase name (`idle`, `pending_path`, `moving`, `arrived`).
    pub phase:    &'static str,
    pub alive:    bool,
    /// Carrier id while embarked; `u32::MAX` otherwise.
    pub carrier:  u32,
    /// Bound combat target; `u32::MAX` if none.
    pub target:   u32,
}

/// One observer callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementEventRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub event:    &'static str,
    /// Attempt number, fatal flag, other entity id, or cancel cause.
    pub detail:   String,
}

/// Counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:            u64,
    pub elapsed_secs:    f64,
    pub tasks_processed: u64,
    pub queue_len:       u64,
    pub idle:            u64,
    pub pending:         u64,
    pub moving:          u64,
    pub arrived:         u64,
}
