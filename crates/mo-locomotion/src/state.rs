//! Per-agent locomotion state.

use std::collections::VecDeque;

use mo_core::{AgentId, TargetMode, TaskId, Vec3};
use mo_schedule::LookAt;

/// Where an agent is in its movement lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    /// A task is queued; no path yet.
    PendingPath,
    /// Following a path.
    Moving,
    /// Reached its destination this tick.
    Arrived,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle        => "idle",
            Phase::PendingPath => "pending_path",
            Phase::Moving      => "moving",
            Phase::Arrived     => "arrived",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RepeatTimer ───────────────────────────────────────────────────────────────

/// Cooperative repeating timer counted in ticks.
///
/// Runs only between `start` and `cancel`, so idle agents carry no
/// per-tick work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RepeatTimer {
    interval:  u32,
    remaining: Option<u32>,
}

impl RepeatTimer {
    pub fn new(interval: u32) -> Self {
        Self { interval: interval.max(1), remaining: None }
    }

    pub fn start(&mut self) {
        self.remaining = Some(self.interval);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Count down one tick.  Returns `true` on the ticks the timer fires.
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            Some(1) => {
                self.remaining = Some(self.interval);
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }
}

// ── Travel ────────────────────────────────────────────────────────────────────

/// Movement parameters handed over when a path is accepted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Travel {
    pub destination:       Vec3,
    pub look_at:           LookAt,
    pub stopping_distance: f32,
    pub target:            Option<AgentId>,
    pub mode:              TargetMode,
}

impl Travel {
    pub fn to(destination: Vec3, stopping_distance: f32) -> Self {
        Self {
            destination,
            look_at: LookAt::Travel,
            stopping_distance,
            target: None,
            mode: TargetMode::Move,
        }
    }
}

// ── Locomotor ─────────────────────────────────────────────────────────────────

/// Stuck detection snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct StuckProbe {
    pub last_position: Vec3,
    pub countdown:     u32,
    /// The agent was allowed to advance at some point this interval.
    pub advanced:      bool,
}

/// Locomotion state of one agent.
#[derive(Clone, Debug)]
pub struct Locomotor {
    pub phase:            Phase,
    /// Queued task this agent is waiting on, while `PendingPath`.
    pub pending_task:     Option<TaskId>,
    /// Remaining corners after `current_waypoint`.
    pub waypoints:        VecDeque<Vec3>,
    pub current_waypoint: Option<Vec3>,
    pub speed:            f32,
    pub travel:           Travel,
    pub(crate) stuck:     StuckProbe,
    pub(crate) stuck_interval: u32,
    pub(crate) resample:  RepeatTimer,
}

impl Locomotor {
    pub fn new(stuck_interval: u32, resample_interval: u32) -> Self {
        Self {
            phase:            Phase::Idle,
            pending_task:     None,
            waypoints:        VecDeque::new(),
            current_waypoint: None,
            speed:            0.0,
            travel:           Travel::to(Vec3::ZERO, 0.0),
            stuck:            StuckProbe::default(),
            stuck_interval:   stuck_interval.max(1),
            resample:         RepeatTimer::new(resample_interval),
        }
    }

    /// Waiting for a path or following one.
    #[inline]
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::PendingPath | Phase::Moving)
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.phase == Phase::Moving
    }

    pub fn resample_running(&self) -> bool {
        self.resample.is_running()
    }

    /// Enter `PendingPath` for `task`, dropping any current path.
    pub fn mark_pending(&mut self, task: TaskId) {
        self.clear_path();
        self.phase = Phase::PendingPath;
        self.pending_task = Some(task);
    }

    /// Start following `corners` from `position`.  `corners` must be non-empty.
    pub(crate) fn begin(&mut self, mut corners: VecDeque<Vec3>, travel: Travel, position: Vec3) {
        self.current_waypoint = corners.pop_front();
        self.waypoints = corners;
        self.travel = travel;
        self.phase = Phase::Moving;
        self.pending_task = None;
        self.stuck = StuckProbe {
            last_position: position,
            countdown:     self.stuck_interval,
            advanced:      false,
        };
        self.resample.start();
    }

    /// Force back to `Idle`.  Returns `true` if the agent was busy.
    pub fn halt(&mut self) -> bool {
        let was_busy = self.is_busy();
        self.clear_path();
        self.phase = Phase::Idle;
        self.pending_task = None;
        was_busy
    }

    pub(crate) fn arrive(&mut self) {
        self.clear_path();
        self.phase = Phase::Arrived;
    }

    fn clear_path(&mut self) {
        self.waypoints.clear();
        self.current_waypoint = None;
        self.speed = 0.0;
        self.resample.cancel();
    }
}
