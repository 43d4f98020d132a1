use crate::models::Decision;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Single-shot handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskHandle(u64);

/// Delayed work the deck engine asks its driver to run
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Remove the given front profile once its exit animation is over
    Commit { profile_id: String, decision: Decision },
    /// Return the top card to idle once the reset animation is over
    Settle,
    HideToast,
}

/// A freshly scheduled task the driver has not started a timer for yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask {
    pub handle: TaskHandle,
    pub delay: Duration,
}

/// Pending delayed tasks, with no notion of wall-clock time
///
/// Drivers drain `take_scheduled` to start timers and `take_cancelled` to stop
/// them. Taking a handle that was cancelled or already taken yields nothing.
#[derive(Debug, Default)]
pub struct Timeline {
    next_id: u64,
    pending: BTreeMap<TaskHandle, Task>,
    scheduled: Vec<ScheduledTask>,
    cancelled: Vec<TaskHandle>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Task, delay: Duration) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.pending.insert(handle, task);
        self.scheduled.push(ScheduledTask { handle, delay });
        handle
    }

    /// Cancel a pending task, returns false if it already ran or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if self.pending.remove(&handle).is_none() {
            return false;
        }

        // No timer exists yet for tasks the driver hasn't drained
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.handle != handle);
        if self.scheduled.len() == before {
            self.cancelled.push(handle);
        }
        true
    }

    /// Claim a due task for execution
    pub fn take(&mut self, handle: TaskHandle) -> Option<Task> {
        self.pending.remove(&handle)
    }

    /// Pending handles in scheduling order
    pub fn pending_handles(&self) -> Vec<TaskHandle> {
        self.pending.keys().copied().collect()
    }

    pub fn take_scheduled(&mut self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.scheduled)
    }

    pub fn take_cancelled(&mut self) -> Vec<TaskHandle> {
        std::mem::take(&mut self.cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_runs_once() {
        let mut timeline = Timeline::new();
        let handle = timeline.schedule(Task::Settle, Duration::from_millis(200));

        assert_eq!(timeline.take(handle), Some(Task::Settle));
        assert_eq!(timeline.take(handle), None);
    }

    #[test]
    fn test_cancel_before_drain_drops_the_timer_request() {
        let mut timeline = Timeline::new();
        let handle = timeline.schedule(Task::HideToast, Duration::from_millis(1500));

        assert!(timeline.cancel(handle));
        assert!(timeline.take_scheduled().is_empty());
        assert!(timeline.take_cancelled().is_empty());
        assert_eq!(timeline.take(handle), None);
    }

    #[test]
    fn test_cancel_after_drain_reports_handle() {
        let mut timeline = Timeline::new();
        let handle = timeline.schedule(Task::HideToast, Duration::from_millis(1500));
        let scheduled = timeline.take_scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].handle, handle);

        assert!(timeline.cancel(handle));
        assert!(!timeline.cancel(handle));
        assert_eq!(timeline.take_cancelled(), vec![handle]);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut timeline = Timeline::new();
        let a = timeline.schedule(Task::Settle, Duration::ZERO);
        let b = timeline.schedule(Task::Settle, Duration::ZERO);
        assert_ne!(a, b);
        assert_eq!(timeline.pending_handles(), vec![a, b]);
    }
}
