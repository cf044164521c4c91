//! Unit tests for mo-schedule.

use mo_core::{AgentId, TargetMode, TaskId, Vec3};

use crate::{LookAt, MovementTask, TaskQueue};

fn mv(agent: u32) -> MovementTask {
    MovementTask::new(AgentId(agent), Vec3::ground(agent as f32, 0.0), 0.1)
}

#[cfg(test)]
mod task {
    use super::*;

    #[test]
    fn plain_move_defaults() {
        let t = mv(3);
        assert_eq!(t.id, TaskId::UNSTAMPED);
        assert_eq!(t.mode, TargetMode::Move);
        assert_eq!(t.look_at, LookAt::Travel);
        assert!(!t.attack);
        assert_eq!(t.retries, 0);
    }

    #[test]
    fn toward_attack_sets_flag_and_facing() {
        let t = mv(0).toward(AgentId(9), TargetMode::AttackApproach).assigned(true);
        assert!(t.attack);
        assert!(t.assigned);
        assert_eq!(t.target, Some(AgentId(9)));
        assert_eq!(t.look_at, LookAt::Entity(AgentId(9)));

        let t = mv(0).toward(AgentId(9), TargetMode::EnterPortal);
        assert!(!t.attack);
    }
}

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn fifo_order_and_fresh_ids() {
        let mut q = TaskQueue::new();
        let a = q.enqueue(mv(0));
        let b = q.enqueue(mv(1));
        let c = q.enqueue(mv(2));
        assert!(a < b && b < c);
        assert_eq!(q.len(), 3);
        let order: Vec<AgentId> = std::iter::from_fn(|| q.pop_front()).map(|t| t.agent).collect();
        assert_eq!(order, vec![AgentId(0), AgentId(1), AgentId(2)]);
        assert!(q.is_empty());
    }

    #[test]
    fn requeue_goes_to_tail_with_bumped_counter() {
        let mut q = TaskQueue::new();
        let first = q.enqueue(mv(0));
        q.enqueue(mv(1));
        let t = q.pop_front().unwrap();
        q.requeue(t);
        assert_eq!(q.peek().map(|t| t.agent), Some(AgentId(1)));
        let _ = q.pop_front();
        let again = q.pop_front().unwrap();
        assert_eq!(again.id, first);
        assert_eq!(again.retries, 1);
    }

    #[test]
    fn remove_from_middle() {
        let mut q = TaskQueue::new();
        q.enqueue(mv(0));
        let mid = q.enqueue(mv(1));
        q.enqueue(mv(2));
        assert_eq!(q.remove(mid).map(|t| t.agent), Some(AgentId(1)));
        assert!(q.remove(mid).is_none());
        assert!(!q.contains(mid));
        let rest: Vec<AgentId> = q.iter().map(|t| t.agent).collect();
        assert_eq!(rest, vec![AgentId(0), AgentId(2)]);
    }

    #[test]
    fn remove_for_agent_is_idempotent() {
        let mut q = TaskQueue::new();
        q.enqueue(mv(5));
        q.enqueue(mv(6));
        assert_eq!(q.remove_for_agent(AgentId(5)), 1);
        assert_eq!(q.remove_for_agent(AgentId(5)), 0);
        assert_eq!(q.len(), 1);
    }
}
