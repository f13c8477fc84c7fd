// src/api/work_queue.rs
//! Shared work queue with pending-count completion tracking.
//!
//! Workers pull from one global `Injector`. An item counts as pending from
//! the moment it is enqueued until the [`Claim`] handed out for it is
//! dropped, so a worker that is still expanding an item keeps every idle
//! worker alive even while the queue is momentarily empty.

use crossbeam::deque::{Injector, Steal};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Tracks work queue completion state
#[derive(Debug, Default)]
struct WorkTracker {
    /// Number of work items queued
    pending_work: AtomicUsize,
    /// Number of work items completed
    completed_work: AtomicUsize,
}

impl WorkTracker {
    fn add_pending(&self, count: usize) {
        self.pending_work.fetch_add(count, Ordering::SeqCst);
    }

    fn mark_completed(&self) {
        self.completed_work.fetch_add(1, Ordering::SeqCst);
    }

    fn has_pending_work(&self) -> bool {
        let pending = self.pending_work.load(Ordering::SeqCst);
        let completed = self.completed_work.load(Ordering::SeqCst);
        pending > completed
    }

    fn completed(&self) -> usize {
        self.completed_work.load(Ordering::SeqCst)
    }
}

/// Thread-safe unordered work queue shared by a pool of async workers.
pub struct WorkQueue<T> {
    injector: Injector<T>,
    work_tracker: WorkTracker,
    wakeup: Notify,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            injector: Injector::new(),
            work_tracker: WorkTracker::default(),
            wakeup: Notify::new(),
        }
    }

    /// Enqueues a work item to the global queue.
    pub fn enqueue(&self, item: T) {
        self.work_tracker.add_pending(1);
        self.injector.push(item);
        self.wakeup.notify_one();
    }

    /// Enqueues multiple work items.
    pub fn enqueue_multiple(&self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.enqueue(item);
        }
    }

    /// Checks if there is any pending work, queued or in flight.
    pub fn has_pending_work(&self) -> bool {
        self.work_tracker.has_pending_work()
    }

    /// Items whose claims have been released so far.
    pub fn completed_count(&self) -> usize {
        self.work_tracker.completed()
    }

    /// Waits for the next item.
    ///
    /// Returns `None` only once nothing is queued and nothing is in flight.
    /// `idle_wait` is how long to sleep between re-checks when the queue is
    /// empty but other workers still hold claims; wake-ups from `enqueue`
    /// and from the final completion cut that wait short.
    pub async fn dequeue(&self, idle_wait: Duration) -> Option<Claim<'_, T>> {
        loop {
            // Register interest before looking, so a push or the final
            // completion between the check and the wait is not missed.
            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.steal() {
                return Some(Claim { queue: self, item });
            }
            if !self.has_pending_work() {
                return None;
            }

            let _ = tokio::time::timeout(idle_wait, notified).await;
        }
    }

    fn steal(&self) -> Option<T> {
        loop {
            match self.injector.steal() {
                Steal::Success(item) => return Some(item),
                Steal::Empty => return None,
                Steal::Retry => continue,
            }
        }
    }

    fn mark_completed(&self) {
        self.work_tracker.mark_completed();
        if !self.work_tracker.has_pending_work() {
            log::trace!("Work queue drained, waking idle workers");
            self.wakeup.notify_waiters();
        }
    }
}

/// A dequeued item that is still in flight.
///
/// Dropping the claim marks the item completed, including when the handler
/// unwinds. Enqueue follow-up work before letting the claim go.
pub struct Claim<'a, T> {
    queue: &'a WorkQueue<T>,
    item: T,
}

impl<T> Claim<'_, T> {
    pub fn item(&self) -> &T {
        &self.item
    }
}

impl<T> Drop for Claim<'_, T> {
    fn drop(&mut self) {
        self.queue.mark_completed();
    }
}
