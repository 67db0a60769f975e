//! Cancellable delayed tasks on a caller-driven clock.
//!
//! Nothing here sleeps. The owner advances the clock (from a frame loop, a
//! tokio interval, or a test) and receives the tasks that became due.

use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Duration,
    task: T,
}

/// Delayed task queue.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to come due after `delay`.
    #[instrument(skip(self, task))]
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            due: self.now + delay,
            task,
        });
        debug!(handle = handle.0, "Task scheduled");
        handle
    }

    /// Cancels a task. Returns false if it already ran or was cancelled.
    #[instrument(skip(self))]
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        before != self.pending.len()
    }

    /// Cancels everything. Returns how many tasks were dropped.
    #[instrument(skip(self))]
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            debug!(dropped, "Pending tasks cancelled");
        }
        dropped
    }

    /// Moves the clock forward and returns the tasks now due, earliest first.
    /// Tasks due at the same instant come out in scheduling order.
    #[instrument(level = "trace", skip(self))]
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = waiting;
        due.sort_by_key(|s| (s.due, s.handle));

        if !due.is_empty() {
            trace!(count = due.len(), "Tasks due");
        }
        due.into_iter().map(|s| s.task).collect()
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks not yet due.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Time until the earliest pending task, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|s| s.due.saturating_sub(self.now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_runs_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(MS * 30, "late");
        scheduler.schedule(MS * 10, "early");
        scheduler.schedule(MS * 10, "early-second");

        assert!(scheduler.advance(MS * 5).is_empty());
        assert_eq!(scheduler.next_due_in(), Some(MS * 5));
        assert_eq!(scheduler.advance(MS * 30), vec!["early", "early-second", "late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_zero_delay_due_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::ZERO, 1);
        assert_eq!(scheduler.advance(Duration::ZERO), vec![1]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(MS, 'a');
        scheduler.schedule(MS, 'b');
        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert_eq!(scheduler.advance(MS), vec!['b']);
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(MS, ());
        scheduler.schedule(MS * 2, ());
        assert_eq!(scheduler.cancel_all(), 2);
        assert!(scheduler.advance(MS * 10).is_empty());
        assert_eq!(scheduler.now(), MS * 10);
    }
}
