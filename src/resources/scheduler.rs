//! Cooperative timed-task scheduler.
//!
//! Replaces wall-clock timeouts: flashes reverting, the staged pattern
//! replay and the delayed room transition are queued here as
//! `(fire_at, task)` entries and released by
//! [`run_scheduled_tasks`](crate::systems::scheduler::run_scheduled_tasks)
//! at the start of a frame, never in the middle of one.
//!
//! There is no cancellation. Tasks name the session or room they belong to
//! and the handlers drop the ones that no longer apply.
use crate::components::emissive::Emissive;
use bevy_ecs::prelude::*;
use smallvec::SmallVec;

/// Work released by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum TimedTask {
    /// Writes an emissive value; a no-op if the entity is gone.
    SetEmissive { entity: Entity, emissive: Emissive },
    /// Starts a pattern replay for `session`.
    PatternReplayStart { session: u64 },
    /// Lights the `step`-th tile of the target of `session`.
    PatternStep { session: u64, step: usize },
    /// Ends the replay and opens input.
    PatternReplayFinished { session: u64 },
    /// Leaves `from_room` for the next room, or wins the run from the last one.
    EnterNextRoom { from_room: u32 },
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    fire_at: f32,
    seq: u64,
    task: TimedTask,
}

pub type DueTasks = SmallVec<[TimedTask; 8]>;

#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    now: f32,
    next_seq: u64,
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    /// Queues `task` to fire `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, task: TimedTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(ScheduledTask {
            fire_at: self.now + delay.max(0.0),
            seq,
            task,
        });
    }

    /// Advances the clock and returns every due task, earliest first.
    ///
    /// Tasks with the same fire time come out in scheduling order.
    pub fn advance(&mut self, delta: f32) -> DueTasks {
        self.now += delta;
        let now = self.now;
        let mut due: Vec<ScheduledTask> = Vec::new();
        self.pending.retain(|entry| {
            if entry.fire_at <= now {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.task).collect()
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending tasks matching `pred`.
    pub fn count_pending(&self, pred: impl Fn(&TimedTask) -> bool) -> usize {
        self.pending.iter().filter(|entry| pred(&entry.task)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_once_when_due() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(1.0, TimedTask::EnterNextRoom { from_room: 1 });
        assert!(scheduler.advance(0.5).is_empty());
        let due = scheduler.advance(0.5);
        assert_eq!(due.len(), 1);
        assert!(scheduler.advance(5.0).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn due_tasks_are_ordered_by_time_then_sequence() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(0.8, TimedTask::PatternStep { session: 1, step: 1 });
        scheduler.schedule(0.0, TimedTask::PatternStep { session: 1, step: 0 });
        scheduler.schedule(0.8, TimedTask::PatternStep { session: 1, step: 2 });
        let due = scheduler.advance(1.0);
        let steps: Vec<usize> = due
            .iter()
            .map(|task| match task {
                TimedTask::PatternStep { step, .. } => *step,
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(steps, vec![0, 1, 2]);
    }

    #[test]
    fn schedule_is_relative_to_current_clock() {
        let mut scheduler = Scheduler::default();
        scheduler.advance(10.0);
        scheduler.schedule(1.0, TimedTask::PatternReplayStart { session: 3 });
        assert!(scheduler.advance(0.9).is_empty());
        assert_eq!(scheduler.advance(0.2).len(), 1);
    }

    #[test]
    fn counts_pending_by_kind() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(1.0, TimedTask::EnterNextRoom { from_room: 2 });
        scheduler.schedule(1.0, TimedTask::PatternReplayStart { session: 1 });
        assert_eq!(
            scheduler.count_pending(|t| matches!(t, TimedTask::EnterNextRoom { .. })),
            1
        );
        assert_eq!(scheduler.len(), 2);
    }
}
