//! Per-key trailing-edge debounce on top of tokio timers.
//!
//! Each key owns at most one pending task. Scheduling a key again aborts
//! its pending task and starts a fresh timer, so a burst of calls inside
//! the window collapses into one run after the last call. Keys never
//! delay one another.
//!
//! Closing the debouncer aborts every pending task. Runs take the same gate
//! that [`Debouncer::close`] takes, so once `close` returns no task body
//! starts, and one already running has finished.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Identifies a tracked store. One debounce timer exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Player,
    Settings,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) struct Debouncer {
    runtime: Handle,
    delay: Duration,
    pending: Mutex<HashMap<StoreKey, JoinHandle<()>>>,
    /// `true` once closed. Held for the duration of every run.
    closed: Arc<Mutex<bool>>,
}

impl Debouncer {
    pub(crate) fn new(runtime: Handle, delay: Duration) -> Self {
        Self {
            runtime,
            delay,
            pending: Mutex::new(HashMap::new()),
            closed: Arc::new(Mutex::new(false)),
        }
    }

    /// Run `task` once `delay` has passed without another call for `key`.
    pub(crate) fn schedule<F>(&self, key: StoreKey, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return;
        }

        let closed = Arc::clone(&self.closed);
        let delay = self.delay;
        let handle = self.runtime.spawn(async move {
            sleep(delay).await;

            let closed = closed.lock().unwrap_or_else(PoisonError::into_inner);
            if *closed {
                return;
            }
            task();
        });

        if let Some(previous) = pending.insert(key, handle) {
            previous.abort();
        }
    }

    /// Abort every pending task and refuse new ones. Idempotent.
    pub(crate) fn close(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner) = true;

        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of keys with a task that has not yet completed.
    pub(crate) fn pending(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let count = Arc::new(AtomicUsize::new(0));
        let shared = Arc::clone(&count);
        let make = move || {
            let count = Arc::clone(&shared);
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (count, make)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_one_run() {
        let debouncer = Debouncer::new(Handle::current(), Duration::from_millis(500));
        let (count, task) = counter();

        for _ in 0..5 {
            debouncer.schedule(StoreKey::Player, task());
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let debouncer = Debouncer::new(Handle::current(), Duration::from_millis(500));
        let (count, task) = counter();

        debouncer.schedule(StoreKey::Player, task());
        sleep(Duration::from_millis(300)).await;
        debouncer.schedule(StoreKey::Settings, task());
        sleep(Duration::from_millis(300)).await;

        // Player fired; settings still waiting.
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.pending(), 1);

        sleep(Duration::from_millis(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_pending_and_rejects_new() {
        let debouncer = Debouncer::new(Handle::current(), Duration::from_millis(500));
        let (count, task) = counter();

        debouncer.schedule(StoreKey::Player, task());
        debouncer.close();
        debouncer.close();
        debouncer.schedule(StoreKey::Settings, task());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_closed());
    }

    #[test]
    fn store_key_names() {
        assert_eq!(StoreKey::Player.to_string(), "player");
        assert_eq!(StoreKey::Settings.as_str(), "settings");
    }
}
