//! Typewriter sequencing
//!
//! Reveals a string one character at a time. After activation the cursor
//! steps through `0, 1, ..., len` at `delay + k * speed` milliseconds, driven
//! by a task on the [`TimerScheduler`](crate::scheduler::TimerScheduler).
//!
//! The typewriter owns its task handle, so cancelling, re-activating, or
//! dropping it removes every pending firing from the scheduler.

use crate::scheduler::{SchedulerHandle, TaskHandle, Tick};
use folio_core::fsm::StateMachine;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Typewriter lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypewriterState {
    Idle,
    Running,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TypewriterSignal {
    Activate,
    Finish,
    Cancel,
}

fn lifecycle() -> StateMachine<TypewriterState, TypewriterSignal> {
    use TypewriterSignal::*;
    use TypewriterState::*;

    StateMachine::builder(Idle)
        .on(Idle, Activate, Running)
        .on(Running, Activate, Running)
        .on(Done, Activate, Running)
        .on(Running, Finish, Done)
        .on(Running, Cancel, Idle)
        .build()
}

/// A cursor position emitted by the sequencer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorEmission {
    pub cursor: usize,
    pub length: usize,
    /// Scheduler clock time of the emission
    pub at_ms: u64,
}

impl CursorEmission {
    pub fn is_final(&self) -> bool {
        self.cursor == self.length
    }
}

/// Listener notified on every cursor emission
pub type CursorListener = Box<dyn FnMut(&CursorEmission) + Send>;

struct Shared {
    cursor: usize,
    machine: StateMachine<TypewriterState, TypewriterSignal>,
    listener: Option<CursorListener>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-character text reveal
///
/// # Example
///
/// ```rust
/// use folio_animation::scheduler::TimerScheduler;
/// use folio_animation::typewriter::Typewriter;
///
/// let mut scheduler = TimerScheduler::new();
/// let mut line = Typewriter::new(scheduler.handle(), "Developer", 2000, 100);
///
/// line.activate();
/// scheduler.advance_to(2250);
/// assert_eq!(line.visible_text(), "De");
///
/// scheduler.advance_to(3000);
/// assert_eq!(line.visible_text(), "Developer");
/// assert!(line.is_done());
/// ```
pub struct Typewriter {
    text: String,
    length: usize,
    delay_ms: u32,
    speed_ms: u32,
    scheduler: SchedulerHandle,
    shared: Arc<Mutex<Shared>>,
    task: Option<TaskHandle>,
    activated_at_ms: Option<u64>,
}

impl Typewriter {
    pub fn new(
        scheduler: SchedulerHandle,
        text: impl Into<String>,
        delay_ms: u32,
        speed_ms: u32,
    ) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            text,
            length,
            delay_ms,
            speed_ms,
            scheduler,
            shared: Arc::new(Mutex::new(Shared {
                cursor: 0,
                machine: lifecycle(),
                listener: None,
            })),
            task: None,
            activated_at_ms: None,
        }
    }

    /// Builder: observe every emission
    pub fn on_cursor<F>(self, listener: F) -> Self
    where
        F: FnMut(&CursorEmission) + Send + 'static,
    {
        lock(&self.shared).listener = Some(Box::new(listener));
        self
    }

    /// Start (or restart) the sequence from cursor 0
    ///
    /// Any pending schedule from an earlier activation is cancelled first.
    pub fn activate(&mut self) {
        self.release_task();

        let shared = self.shared.clone();
        let length = self.length;
        let task = self.scheduler.schedule_repeating(
            self.delay_ms as u64,
            self.speed_ms as u64,
            Some(length as u32 + 1),
            move |tick: &Tick| emit(&shared, tick, length),
        );

        let Some(task) = task else {
            tracing::warn!("typewriter: scheduler is gone, activation ignored");
            return;
        };

        {
            let mut shared = lock(&self.shared);
            shared.cursor = 0;
            shared.machine.send(TypewriterSignal::Activate);
        }
        self.activated_at_ms = self.scheduler.now_ms();
        self.task = Some(task);
        tracing::debug!(
            length,
            delay_ms = self.delay_ms,
            speed_ms = self.speed_ms,
            "typewriter: activated"
        );
    }

    /// Stop emitting; the cursor stays where it was
    pub fn cancel(&mut self) {
        if self.release_task() {
            lock(&self.shared).machine.send(TypewriterSignal::Cancel);
            tracing::debug!("typewriter: cancelled");
        }
    }

    /// Drop the current task, returning `true` if it still had firings left
    fn release_task(&mut self) -> bool {
        self.task.take().map_or(false, |mut task| task.cancel())
    }

    pub fn state(&self) -> TypewriterState {
        lock(&self.shared).machine.current_state()
    }

    pub fn is_done(&self) -> bool {
        self.state() == TypewriterState::Done
    }

    pub fn cursor(&self) -> usize {
        lock(&self.shared).cursor
    }

    /// The first `cursor` characters of the text
    pub fn visible_text(&self) -> &str {
        let cursor = self.cursor();
        match self.text.char_indices().nth(cursor) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters (not bytes)
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    pub fn activated_at_ms(&self) -> Option<u64> {
        self.activated_at_ms
    }

    /// Offsets from activation at which cursors `0..=len` are emitted
    pub fn emission_offsets(&self) -> impl Iterator<Item = u64> + '_ {
        (0..=self.length as u64).map(move |k| self.delay_ms as u64 + k * self.speed_ms as u64)
    }

    /// Whether the typewriter still has scheduled emissions
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().map_or(false, TaskHandle::is_pending)
    }
}

fn emit(shared: &Mutex<Shared>, tick: &Tick, length: usize) {
    let mut shared = lock(shared);
    let cursor = (tick.index as usize).min(length);
    shared.cursor = cursor;

    let emission = CursorEmission {
        cursor,
        length,
        at_ms: tick.at_ms,
    };
    if let Some(listener) = shared.listener.as_mut() {
        listener(&emission);
    }
    if emission.is_final() {
        shared.machine.send(TypewriterSignal::Finish);
        tracing::trace!(length, at_ms = tick.at_ms, "typewriter: done");
    }
}

impl std::fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter")
            .field("text", &self.text)
            .field("delay_ms", &self.delay_ms)
            .field("speed_ms", &self.speed_ms)
            .field("cursor", &self.cursor())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimerScheduler;

    fn recording(
        scheduler: &TimerScheduler,
        text: &str,
        delay_ms: u32,
        speed_ms: u32,
    ) -> (Typewriter, Arc<Mutex<Vec<(usize, u64)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let typewriter = Typewriter::new(scheduler.handle(), text, delay_ms, speed_ms)
            .on_cursor(move |e| sink.lock().unwrap().push((e.cursor, e.at_ms)));
        (typewriter, log)
    }

    #[test]
    fn test_emits_each_cursor_on_schedule() {
        let mut scheduler = TimerScheduler::new();
        let (mut typewriter, log) = recording(&scheduler, "Hi", 100, 50);

        assert_eq!(typewriter.state(), TypewriterState::Idle);
        typewriter.activate();
        assert_eq!(typewriter.state(), TypewriterState::Running);

        scheduler.advance_to(1_000);
        assert_eq!(*log.lock().unwrap(), vec![(0, 100), (1, 150), (2, 200)]);
        assert_eq!(typewriter.state(), TypewriterState::Done);
        assert_eq!(typewriter.visible_text(), "Hi");
        assert!(!typewriter.is_pending());
    }

    #[test]
    fn test_cancel_suppresses_remaining_emissions() {
        let mut scheduler = TimerScheduler::new();
        let (mut typewriter, log) = recording(&scheduler, "Hi", 100, 50);

        typewriter.activate();
        scheduler.advance_to(120);
        typewriter.cancel();

        assert_eq!(typewriter.state(), TypewriterState::Idle);
        assert_eq!(scheduler.task_count(), 0);

        scheduler.advance_to(1_000);
        assert_eq!(*log.lock().unwrap(), vec![(0, 100)]);
    }

    #[test]
    fn test_drop_releases_timers() {
        let mut scheduler = TimerScheduler::new();
        let (mut typewriter, log) = recording(&scheduler, "Hello", 0, 10);

        typewriter.activate();
        scheduler.advance_to(15);
        drop(typewriter);

        assert_eq!(scheduler.task_count(), 0);
        scheduler.advance_to(1_000);
        assert_eq!(*log.lock().unwrap(), vec![(0, 0), (1, 10)]);
    }

    #[test]
    fn test_reactivation_replays_from_new_start() {
        let mut scheduler = TimerScheduler::new();
        let (mut typewriter, log) = recording(&scheduler, "Hi", 100, 50);

        typewriter.activate();
        scheduler.advance_to(160);
        assert_eq!(typewriter.cursor(), 1);

        typewriter.activate();
        assert_eq!(typewriter.cursor(), 0);
        assert_eq!(typewriter.activated_at_ms(), Some(160));
        assert_eq!(scheduler.task_count(), 1);

        scheduler.advance_to(1_000);
        assert_eq!(
            *log.lock().unwrap(),
            vec![(0, 100), (1, 150), (0, 260), (1, 310), (2, 360)]
        );
        assert!(typewriter.is_done());
    }

    #[test]
    fn test_restart_after_done() {
        let mut scheduler = TimerScheduler::new();
        let mut typewriter = Typewriter::new(scheduler.handle(), "ab", 0, 10);

        typewriter.activate();
        scheduler.advance(100);
        assert!(typewriter.is_done());

        typewriter.activate();
        assert_eq!(typewriter.state(), TypewriterState::Running);
        assert_eq!(typewriter.visible_text(), "");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let mut scheduler = TimerScheduler::new();
        let mut typewriter = Typewriter::new(scheduler.handle(), "héllo →", 0, 10);
        assert_eq!(typewriter.length(), 7);

        typewriter.activate();
        scheduler.advance_to(20);
        assert_eq!(typewriter.visible_text(), "hé");
        scheduler.advance_to(70);
        assert_eq!(typewriter.visible_text(), "héllo →");
    }

    #[test]
    fn test_empty_text_finishes_immediately_after_delay() {
        let mut scheduler = TimerScheduler::new();
        let (mut typewriter, log) = recording(&scheduler, "", 40, 10);

        typewriter.activate();
        scheduler.advance_to(40);
        assert_eq!(*log.lock().unwrap(), vec![(0, 40)]);
        assert!(typewriter.is_done());
    }

    #[test]
    fn test_emission_offsets() {
        let scheduler = TimerScheduler::new();
        let typewriter = Typewriter::new(scheduler.handle(), "Hi", 100, 50);
        assert_eq!(
            typewriter.emission_offsets().collect::<Vec<_>>(),
            vec![100, 150, 200]
        );
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let scheduler = TimerScheduler::new();
        let mut typewriter = Typewriter::new(scheduler.handle(), "Hi", 0, 10);
        typewriter.cancel();
        assert_eq!(typewriter.state(), TypewriterState::Idle);
    }

    #[test]
    fn test_independent_typewriters_do_not_interact() {
        let mut scheduler = TimerScheduler::new();
        let (mut a, log_a) = recording(&scheduler, "ab", 0, 10);
        let (mut b, log_b) = recording(&scheduler, "xyz", 5, 10);

        a.activate();
        b.activate();
        scheduler.advance_to(12);
        b.cancel();
        scheduler.advance_to(100);

        assert_eq!(*log_a.lock().unwrap(), vec![(0, 0), (1, 10), (2, 20)]);
        assert_eq!(*log_b.lock().unwrap(), vec![(0, 5)]);
        assert!(a.is_done());
        assert_eq!(b.state(), TypewriterState::Idle);
    }
}
