//! Task admission and completion tracking
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore-backed permit pool
//! - Spawning crawl tasks that may themselves spawn more tasks
//! - Waiting until every task, including transitively spawned ones, has ended

use crate::TaskError;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

/// Fixed-capacity gate on concurrently executing crawl tasks
///
/// A task holds one permit from before its fetch until it returns. The permit
/// is released when it is dropped, so an early return or a panic gives it back
/// as well.
#[derive(Debug, Clone)]
pub struct PermitPool {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    capacity: usize,
}

impl PermitPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free permit
    ///
    /// # Returns
    ///
    /// * `Ok(OwnedSemaphorePermit)` - Held until dropped
    /// * `Err(TaskError::PoolClosed)` - The semaphore was closed; the pool never
    ///   closes it, so this only surfaces tokio's `AcquireError`
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, TaskError> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| TaskError::PoolClosed)
    }

    /// Number of permits not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Default)]
struct Counters {
    pending: AtomicUsize,
    spawned: AtomicUsize,
    idle: Notify,
}

/// Decrements the pending count when the task it belongs to is dropped
struct CompletionGuard {
    counters: Arc<Counters>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.counters.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.counters.idle.notify_waiters();
        }
    }
}

/// A group of tasks that can be awaited as a whole
///
/// Spawning increments a pending count before the task starts, and the task
/// decrements it when it ends. A task that spawns children does so while it is
/// still pending, so the count only reaches zero once the whole tree is done.
#[derive(Debug, Clone, Default)]
pub struct TaskGroup {
    counters: Arc<Counters>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a task on the tokio runtime as a member of this group
    ///
    /// Must be called from within a runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.counters.pending.fetch_add(1, Ordering::AcqRel);
        self.counters.spawned.fetch_add(1, Ordering::Relaxed);

        let guard = CompletionGuard {
            counters: Arc::clone(&self.counters),
        };
        tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });
    }

    /// Resolves once no task of the group is pending
    ///
    /// Returns immediately if nothing was ever spawned.
    pub async fn wait(&self) {
        loop {
            let notified = self.counters.idle.notified();
            tokio::pin!(notified);
            // register before checking, or a wakeup between the two is lost
            notified.as_mut().enable();

            if self.counters.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Tasks spawned but not yet finished
    pub fn pending(&self) -> usize {
        self.counters.pending.load(Ordering::Acquire)
    }

    /// Tasks spawned over the group's lifetime
    pub fn spawned(&self) -> usize {
        self.counters.spawned.load(Ordering::Relaxed)
    }
}
