use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Manages server-wide state: shutdown flag and in-flight query accounting
#[derive(Debug, Clone)]
pub struct ServerState {
    shutdown: Arc<AtomicBool>,
    active_queries: Arc<AtomicUsize>,
    max_concurrent_queries: usize,
}

impl ServerState {
    /// `max_concurrent_queries == 0` disables the concurrency check.
    pub fn new(max_concurrent_queries: usize) -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            active_queries: Arc::new(AtomicUsize::new(0)),
            max_concurrent_queries,
        }
    }

    /// Returns true if the server is shutting down
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Signals that the server should start shutting down
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Registers a running query; the returned guard unregisters it on drop.
    pub fn begin_query(&self) -> ActiveQuery {
        self.active_queries.fetch_add(1, Ordering::Relaxed);
        ActiveQuery {
            active_queries: Arc::clone(&self.active_queries),
        }
    }

    pub fn active_queries(&self) -> usize {
        self.active_queries.load(Ordering::Relaxed)
    }

    /// Returns true when new queries should be rejected until running ones finish.
    pub fn is_under_pressure(&self) -> bool {
        if self.max_concurrent_queries == 0 {
            return false;
        }
        let active = self.active_queries();
        if active > 0 {
            tracing::debug!(
                target: "log_select::backpressure",
                active = active,
                limit = self.max_concurrent_queries,
                "Backpressure check"
            );
        }
        active >= self.max_concurrent_queries
    }
}

/// Keeps a query counted in [`ServerState::active_queries`] while alive.
#[derive(Debug)]
pub struct ActiveQuery {
    active_queries: Arc<AtomicUsize>,
}

impl Drop for ActiveQuery {
    fn drop(&mut self) {
        self.active_queries.fetch_sub(1, Ordering::Relaxed);
    }
}
