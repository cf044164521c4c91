//! `TaskQueue` — the single FIFO of pending path computations.
//!
//! # Ordering
//!
//! Tasks leave strictly in arrival order.  A task that failed to path goes
//! back to the tail via [`TaskQueue::requeue`], so every other waiting
//! agent gets its attempt before the same agent is retried.
//!
//! # Cost
//!
//! `VecDeque` gives O(1) append and pop; excising a cancelled task from the
//! middle is O(n) in queue length.

use std::collections::VecDeque;

use mo_core::{AgentId, TaskId};

use crate::MovementTask;

pub struct TaskQueue {
    inner:   VecDeque<MovementTask>,
    next_id: TaskId,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self { inner: VecDeque::new(), next_id: TaskId(0) }
    }

    /// Stamp `task` with a fresh id and append it to the tail.
    pub fn enqueue(&mut self, mut task: MovementTask) -> TaskId {
        let id = self.next_id;
        self.next_id = id.next();
        task.id = id;
        self.inner.push_back(task);
        id
    }

    /// Append an already-stamped task after a failed attempt, bumping its
    /// retry counter.
    pub fn requeue(&mut self, mut task: MovementTask) {
        task.retries += 1;
        self.inner.push_back(task);
    }

    pub fn pop_front(&mut self) -> Option<MovementTask> {
        self.inner.pop_front()
    }

    pub fn peek(&self) -> Option<&MovementTask> {
        self.inner.front()
    }

    /// Remove the task with `id` wherever it sits.
    pub fn remove(&mut self, id: TaskId) -> Option<MovementTask> {
        let pos = self.inner.iter().position(|t| t.id == id)?;
        self.inner.remove(pos)
    }

    /// Remove every task owned by `agent`.  Returns how many were removed.
    pub fn remove_for_agent(&mut self, agent: AgentId) -> usize {
        let before = self.inner.len();
        self.inner.retain(|t| t.agent != agent);
        before - self.inner.len()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.inner.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovementTask> {
        self.inner.iter()
    }
}
