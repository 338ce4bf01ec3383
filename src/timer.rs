//! Cancellable scheduled tasks
//!
//! A [`TaskSlot`] holds at most one pending tokio task for one timer purpose.
//! Scheduling always cancels whatever the slot held before, and cancelling an
//! empty or already-finished slot does nothing.

use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;

/// One timer purpose (e.g. "hide the left stick")
#[derive(Debug, Default)]
pub struct TaskSlot {
    handle: Option<AbortHandle>,
    epoch: u64,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Epoch of the most recent schedule. Fired callbacks compare against it.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a scheduled task has neither fired nor been cancelled
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// True if `epoch` belongs to the task currently held by the slot
    pub fn is_current(&self, epoch: u64) -> bool {
        self.handle.is_some() && self.epoch == epoch
    }

    /// Abort the pending task (if any) and forget it
    pub fn cancel_and_clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Mark the slot's task as consumed once its callback has run
    pub fn clear(&mut self) {
        self.handle = None;
    }

    /// Run `fire(epoch)` once after `delay`, replacing any pending task
    pub fn schedule_once<F, Fut>(&mut self, delay: Duration, fire: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel_and_clear();
        self.epoch += 1;
        let epoch = self.epoch;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(epoch).await;
        });
        self.handle = Some(task.abort_handle());
        epoch
    }

    /// Run `fire(epoch)` every `period` until cancelled or `fire` returns false
    pub fn schedule_repeating<F, Fut>(&mut self, period: Duration, mut fire: F) -> u64
    where
        F: FnMut(u64) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.cancel_and_clear();
        self.epoch += 1;
        let epoch = self.epoch;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if !fire(epoch).await {
                    break;
                }
            }
        });
        self.handle = Some(task.abort_handle());
        epoch
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_schedule_once_fires() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut slot = TaskSlot::new();

        let c = count.clone();
        slot.schedule_once(Duration::from_millis(100), move |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(slot.is_pending());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!slot.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_cancels_previous() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut slot = TaskSlot::new();

        let c = count.clone();
        let first = slot.schedule_once(Duration::from_millis(100), move |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let c = count.clone();
        let second = slot.schedule_once(Duration::from_millis(100), move |_| async move {
            c.fetch_add(10, Ordering::SeqCst);
        });
        assert_ne!(first, second);
        assert!(!slot.is_current(first));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let mut slot = TaskSlot::new();
        slot.cancel_and_clear();
        slot.cancel_and_clear();

        slot.schedule_once(Duration::from_millis(10), |_| async {});
        tokio::time::sleep(Duration::from_millis(20)).await;
        // Already fired
        slot.cancel_and_clear();
        slot.cancel_and_clear();
        assert!(!slot.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_stops_when_callback_declines() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut slot = TaskSlot::new();

        let c = count.clone();
        slot.schedule_repeating(Duration::from_millis(10), move |_| {
            let c = c.clone();
            async move { c.fetch_add(1, Ordering::SeqCst) + 1 < 3 }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
