//! Deferred actions on the UI thread.
//!
//! Everything runs on one logical thread, so tasks are plain `FnOnce()` closures with
//! no `Send` bound. [`TimerQueue`] is driven by the frame loop; [`TokioScheduler`] hands
//! tasks to a tokio `LocalSet` on native targets.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Host timer facility: runs a task once after a delay, on the calling thread.
///
/// There is no cancellation handle. Tasks must tolerate firing after their
/// owner has gone away.
pub trait Scheduler {
    /// Runs `task` once, `delay` from now.
    fn schedule(&self, delay: Duration, task: Task);
}

struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct TimerQueueInner {
    now: Duration,
    next_seq: u64,
    timers: Vec<Timer>,
}

/// Frame-driven timer queue with a virtual clock.
///
/// The owner advances the clock once per frame by the frame's delta time; due
/// tasks fire in deadline order, ties in scheduling order. Clones share the queue.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<TimerQueueInner>>,
}

impl TimerQueue {
    /// Creates an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Time until the earliest pending task is due, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        let inner = self.inner.borrow();
        inner
            .timers
            .iter()
            .map(|t| t.due.saturating_sub(inner.now))
            .min()
    }

    /// Moves the clock forward by `dt` and runs every task now due. Returns how many ran.
    ///
    /// Tasks scheduled while running are queued relative to the new time and do not
    /// run in this call unless their delay is zero.
    pub fn advance(&self, dt: Duration) -> usize {
        self.inner.borrow_mut().now += dt;
        let mut ran = 0;
        loop {
            // Release the borrow before running so tasks may schedule more work.
            let next = {
                let mut inner = self.inner.borrow_mut();
                let now = inner.now;
                let index = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= now)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                index.map(|i| inner.timers.swap_remove(i))
            };
            match next {
                Some(timer) => {
                    (timer.task)();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + delay;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.timers.push(Timer { due, seq, task });
    }
}

/// Schedules tasks on the current tokio `LocalSet`.
///
/// Must be used from inside `LocalSet::run_until` or a task spawned on a `LocalSet`;
/// `tokio::task::spawn_local` panics otherwise.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[cfg(not(target_arch = "wasm32"))]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
