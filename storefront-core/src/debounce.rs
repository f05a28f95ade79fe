//! Cancellable quiet-period timer for search input
//!
//! Each `schedule` supersedes the previous one: only the most recently
//! scheduled task runs, and only after the quiet period elapses without a
//! newer schedule or a `cancel`. A task that has already started is never
//! interrupted; superseded tasks simply skip their work when they wake.
//! Long-running work can compare [`Debouncer::generation`] before and after
//! an await to find out whether it was superseded meanwhile.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period used by the storefront search box
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Run `task` after the quiet period unless superseded first
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.schedule_with(move |_| task);
    }

    /// Like [`Debouncer::schedule`], handing the task its own generation
    pub fn schedule_with<F, Fut>(&self, task: F)
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let quiet = self.quiet;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if generation.load(Ordering::SeqCst) != ticket {
                trace!(ticket, "Debounced task superseded");
                return;
            }
            task(ticket).await;
        });

        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        *pending = Some(handle);
    }

    /// Drop whatever is waiting; returns true when something was pending
    pub fn cancel(&self) -> bool {
        let was_pending = self.is_pending();
        self.generation.fetch_add(1, Ordering::SeqCst);
        was_pending
    }

    /// Counter bumped by every `schedule` and `cancel`
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether nothing was scheduled or cancelled since `generation` was read
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Whether a scheduled task has not finished yet
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the most recently scheduled task to run or be skipped
    pub async fn settle(&self) {
        let handle = {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            pending.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
