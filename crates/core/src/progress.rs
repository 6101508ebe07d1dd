//! In-flight request tracking
//!
//! A single process-wide counter answers "is at least one request pending?"
//! for a progress indicator. Every dispatch holds a [`ProgressGuard`], so the
//! counter returns to zero on every exit path, including early returns and
//! dropped futures.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::warn;

/// Receives request start/end signals
pub trait ProgressSink: Send + Sync {
    /// A request went out
    fn start(&self);
    /// A request settled, successfully or not
    fn finish(&self);
}

/// Sink that ignores all signals
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn start(&self) {}
    fn finish(&self) {}
}

/// Counter of pending requests
#[derive(Debug, Default)]
pub struct ProgressCounter {
    pending: AtomicUsize,
    started: AtomicU64,
}

impl ProgressCounter {
    /// Counter with nothing in flight
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests currently in flight
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// True while at least one request is in flight
    pub fn is_active(&self) -> bool {
        self.pending() > 0
    }

    /// Total number of start signals since creation
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }
}

impl ProgressSink for ProgressCounter {
    fn start(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    fn finish(&self) {
        let result =
            self.pending.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if result.is_err() {
            warn!("progress finish without matching start");
        }
    }
}

/// Holds one start signal until dropped
#[must_use = "dropping the guard ends the progress signal immediately"]
pub struct ProgressGuard {
    sink: Arc<dyn ProgressSink>,
}

impl ProgressGuard {
    /// Signal start on `sink`; finish follows on drop
    pub fn start(sink: Arc<dyn ProgressSink>) -> Self {
        sink.start();
        Self { sink }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.sink.finish();
    }
}
