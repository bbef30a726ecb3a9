//! Timer scheduler
//!
//! A host-driven virtual clock that fires delayed and repeating tasks.
//! The host advances time explicitly (`advance`/`advance_to`), so the same
//! schedule replays identically in tests, previews, and real frame loops.
//!
//! Tasks are owned through [`TaskHandle`]s: dropping the handle cancels the
//! task, so an element that goes away takes its pending timers with it.
//!
//! ```rust
//! use folio_animation::scheduler::TimerScheduler;
//! use std::sync::{Arc, Mutex};
//!
//! let mut scheduler = TimerScheduler::new();
//! let fired = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = fired.clone();
//! let task = scheduler
//!     .handle()
//!     .schedule_repeating(100, 50, Some(3), move |tick| sink.lock().unwrap().push(tick.at_ms));
//!
//! scheduler.advance_to(120);
//! drop(task); // cancels the rest
//! scheduler.advance_to(1_000);
//!
//! assert_eq!(*fired.lock().unwrap(), vec![100]);
//! ```

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

new_key_type! {
    /// Handle to a scheduled task
    pub struct TaskId;
}

/// One firing of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub task: TaskId,
    /// Zero-based firing count for this task
    pub index: u32,
    /// Scheduled clock time of this firing
    pub at_ms: u64,
}

/// Task callback invoked on every firing
pub type TaskCallback = Box<dyn FnMut(&Tick) + Send>;

struct ScheduledTask {
    next_fire_ms: u64,
    interval_ms: u64,
    /// Firings left (`None` repeats until cancelled)
    remaining: Option<u32>,
    fired: u32,
    /// Insertion order, breaks ties between equal deadlines
    seq: u64,
    /// Taken out while the callback runs so the lock is not held
    callback: Option<TaskCallback>,
}

impl ScheduledTask {
    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Internal state of the scheduler
struct SchedulerInner {
    now_ms: u64,
    tasks: SlotMap<TaskId, ScheduledTask>,
    next_seq: u64,
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The timer scheduler, owned by whoever drives the clock
///
/// Components receive a [`SchedulerHandle`] and never keep the scheduler alive.
pub struct TimerScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a scheduler whose clock starts at `now_ms`
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                now_ms,
                tasks: SlotMap::with_key(),
                next_seq: 0,
            })),
        }
    }

    /// Get a weak handle for registering tasks
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn now_ms(&self) -> u64 {
        lock(&self.inner).now_ms
    }

    /// Number of tasks still scheduled
    pub fn task_count(&self) -> usize {
        lock(&self.inner).tasks.len()
    }

    pub fn has_pending(&self) -> bool {
        self.task_count() > 0
    }

    /// Clock time of the earliest pending firing
    pub fn next_deadline(&self) -> Option<u64> {
        lock(&self.inner)
            .tasks
            .values()
            .map(|task| task.next_fire_ms)
            .min()
    }

    /// Advance the clock by `dt_ms`, firing every task that comes due
    pub fn advance(&mut self, dt_ms: u64) -> usize {
        let target = self.now_ms().saturating_add(dt_ms);
        self.advance_to(target)
    }

    /// Advance the clock to `target_ms`, firing due tasks in deadline order
    ///
    /// Returns the number of firings. The clock never moves backwards.
    pub fn advance_to(&mut self, target_ms: u64) -> usize {
        let mut fired = 0;

        loop {
            let (id, tick, callback) = {
                let mut inner = lock(&self.inner);

                let due = inner
                    .tasks
                    .iter()
                    .filter(|(_, task)| task.callback.is_some() && task.next_fire_ms <= target_ms)
                    .min_by_key(|(_, task)| (task.next_fire_ms, task.seq))
                    .map(|(id, _)| id);

                let Some(id) = due else {
                    inner.now_ms = inner.now_ms.max(target_ms);
                    break;
                };

                let task = &mut inner.tasks[id];
                let at_ms = task.next_fire_ms;
                let tick = Tick {
                    task: id,
                    index: task.fired,
                    at_ms,
                };
                task.fired += 1;
                if let Some(remaining) = task.remaining.as_mut() {
                    *remaining = remaining.saturating_sub(1);
                }
                task.next_fire_ms = at_ms.saturating_add(task.interval_ms);
                let callback = task.callback.take();

                inner.now_ms = inner.now_ms.max(at_ms);
                (id, tick, callback)
            };

            let Some(mut callback) = callback else {
                continue;
            };
            tracing::trace!(?id, index = tick.index, at_ms = tick.at_ms, "scheduler: fire");
            callback(&tick);
            fired += 1;

            let mut inner = lock(&self.inner);
            let exhausted = match inner.tasks.get_mut(id) {
                // Cancelled while the callback ran
                None => continue,
                Some(task) if task.is_exhausted() => true,
                Some(task) => {
                    task.callback = Some(callback);
                    false
                }
            };
            if exhausted {
                inner.tasks.remove(id);
            }
        }

        fired
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the scheduler
///
/// Won't keep the scheduler alive; operations on a dropped scheduler are no-ops.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Fire `callback` once, `delay_ms` from now
    pub fn schedule_once<F>(&self, delay_ms: u64, callback: F) -> Option<TaskHandle>
    where
        F: FnMut(&Tick) + Send + 'static,
    {
        self.schedule_repeating(delay_ms, 0, Some(1), callback)
    }

    /// Fire `callback` at `delay_ms`, then every `interval_ms`
    ///
    /// `count` limits the number of firings; `None` repeats until the handle
    /// is dropped. A zero interval on an unbounded task is bumped to 1ms.
    /// Returns `None` (and schedules nothing) when the scheduler is gone or
    /// `count` is zero.
    pub fn schedule_repeating<F>(
        &self,
        delay_ms: u64,
        interval_ms: u64,
        count: Option<u32>,
        callback: F,
    ) -> Option<TaskHandle>
    where
        F: FnMut(&Tick) + Send + 'static,
    {
        if count == Some(0) {
            return None;
        }
        let inner = self.inner.upgrade()?;
        let mut guard = lock(&inner);

        let interval_ms = if count.is_none() {
            interval_ms.max(1)
        } else {
            interval_ms
        };
        let seq = guard.next_seq;
        guard.next_seq += 1;
        let next_fire_ms = guard.now_ms.saturating_add(delay_ms);

        let id = guard.tasks.insert(ScheduledTask {
            next_fire_ms,
            interval_ms,
            remaining: count,
            fired: 0,
            seq,
            callback: Some(Box::new(callback)),
        });
        tracing::trace!(?id, next_fire_ms, interval_ms, ?count, "scheduler: task scheduled");

        Some(TaskHandle {
            handle: self.clone(),
            id: Some(id),
        })
    }

    /// Current clock time, if the scheduler is still alive
    pub fn now_ms(&self) -> Option<u64> {
        self.inner.upgrade().map(|inner| lock(&inner).now_ms)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn cancel(&self, id: TaskId) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        // The task (and whatever its callback owns) drops after the lock is released
        let removed = lock(&inner).tasks.remove(id);
        removed.is_some()
    }

    fn is_pending(&self, id: TaskId) -> bool {
        self.inner
            .upgrade()
            .map_or(false, |inner| lock(&inner).tasks.contains_key(id))
    }
}

/// Owning handle to a scheduled task; dropping it cancels the task
#[must_use = "dropping a TaskHandle cancels the task"]
pub struct TaskHandle {
    handle: SchedulerHandle,
    id: Option<TaskId>,
}

impl TaskHandle {
    pub fn id(&self) -> Option<TaskId> {
        self.id
    }

    /// Cancel the task; returns `true` if it was still scheduled
    pub fn cancel(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                let cancelled = self.handle.cancel(id);
                if cancelled {
                    tracing::debug!(?id, "scheduler: task cancelled");
                }
                cancelled
            }
            None => false,
        }
    }

    /// Whether the task still has firings left
    pub fn is_pending(&self) -> bool {
        self.id.map_or(false, |id| self.handle.is_pending(id))
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<(u32, u64)>>>, impl FnMut(&Tick) + Send + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, move |tick: &Tick| sink.lock().unwrap().push((tick.index, tick.at_ms)))
    }

    #[test]
    fn test_repeating_task_fires_on_schedule() {
        let mut scheduler = TimerScheduler::new();
        let (log, callback) = recorder();
        let task = scheduler
            .handle()
            .schedule_repeating(100, 50, Some(3), callback)
            .unwrap();

        assert_eq!(scheduler.next_deadline(), Some(100));
        assert_eq!(scheduler.advance_to(1_000), 3);
        assert_eq!(*log.lock().unwrap(), vec![(0, 100), (1, 150), (2, 200)]);

        // Exhausted tasks leave the scheduler on their own
        assert!(!task.is_pending());
        assert_eq!(scheduler.task_count(), 0);
        assert_eq!(scheduler.now_ms(), 1_000);
    }

    #[test]
    fn test_stepwise_advance_matches_single_jump() {
        let mut scheduler = TimerScheduler::new();
        let (log, callback) = recorder();
        let _task = scheduler.handle().schedule_repeating(10, 30, Some(4), callback);

        for _ in 0..20 {
            scheduler.advance(7);
        }
        assert_eq!(
            *log.lock().unwrap(),
            vec![(0, 10), (1, 40), (2, 70), (3, 100)]
        );
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let mut scheduler = TimerScheduler::new();
        let (log, callback) = recorder();
        let task = scheduler.handle().schedule_repeating(100, 50, Some(3), callback);

        scheduler.advance_to(120);
        drop(task);
        assert_eq!(scheduler.task_count(), 0);

        scheduler.advance_to(500);
        assert_eq!(*log.lock().unwrap(), vec![(0, 100)]);
    }

    #[test]
    fn test_explicit_cancel_is_idempotent() {
        let mut scheduler = TimerScheduler::new();
        let mut task = scheduler.handle().schedule_once(10, |_| {}).unwrap();

        assert!(task.is_pending());
        assert!(task.cancel());
        assert!(!task.cancel());
        assert!(!task.is_pending());
        assert_eq!(scheduler.advance(100), 0);
    }

    #[test]
    fn test_equal_deadlines_fire_in_registration_order() {
        let mut scheduler = TimerScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let handle = scheduler.handle();
        let tasks: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let order = order.clone();
                handle.schedule_once(5, move |_| order.lock().unwrap().push(name))
            })
            .collect();

        scheduler.advance(5);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
        drop(tasks);
    }

    #[test]
    fn test_unbounded_task_runs_until_dropped() {
        let mut scheduler = TimerScheduler::new();
        let (log, callback) = recorder();
        let task = scheduler.handle().schedule_repeating(0, 0, None, callback);

        // Zero interval is bumped to 1ms for unbounded tasks
        assert_eq!(scheduler.advance_to(4), 5);
        drop(task);
        assert_eq!(scheduler.advance_to(100), 0);
        assert_eq!(log.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_handle_outliving_scheduler_is_inert() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        let task = handle.schedule_once(10, |_| {});
        assert!(handle.is_alive());

        drop(scheduler);
        assert!(!handle.is_alive());
        assert!(handle.schedule_once(10, |_| {}).is_none());
        assert_eq!(handle.now_ms(), None);
        // Dropping a task after its scheduler is gone is fine
        drop(task);
    }

    #[test]
    fn test_callback_may_schedule_more_work() {
        let mut scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        let follow_ups = Arc::new(Mutex::new(Vec::new()));

        let inner_handle = handle.clone();
        let sink = follow_ups.clone();
        let kept = Arc::new(Mutex::new(Vec::new()));
        let keep = kept.clone();
        let _first = handle.schedule_once(10, move |_| {
            let sink = sink.clone();
            let task =
                inner_handle.schedule_once(5, move |tick| sink.lock().unwrap().push(tick.at_ms));
            // The follow-up must outlive this callback
            keep.lock().unwrap().extend(task);
        });

        scheduler.advance_to(100);
        assert_eq!(*follow_ups.lock().unwrap(), vec![15]);
    }
}
