//! Cancellable timers for coalescing rapid input.
use std::future::Future;

use log::trace;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

/// Handle to a scheduled action. Cancelling it before the delay elapses
/// guarantees the action never runs.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the action has run (or was cancelled).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Runs `action` after `delay` on the current tokio runtime.
pub fn schedule<F>(delay: Duration, action: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        time::sleep(delay).await;
        action.await;
    });
    TimerHandle { task }
}

/// Keeps at most one pending action: scheduling again cancels the previous
/// one, so only the last trigger within a quiet period fires.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.pending.take() {
            trace!("Cancelling pending debounced action");
            previous.cancel();
        }
        self.pending = Some(schedule(self.delay, action));
    }

    /// Cancels the pending action, returning whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.cancel();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}
