//! Cooperative cancellation handle (§5 "Cancellation").
//!
//! The pipeline checks this at least between CA iterations, between
//! pipeline stages, and between room generations. It carries no async
//! machinery — generation is logically sequential within one call, so a
//! plain atomic flag (optionally backed by a deadline) is sufficient.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A token that cancels itself once `timeout` has elapsed from now.
    /// `params.timeout` is advisory per §5; this is the mechanism an
    /// external caller would wire up to make it authoritative.
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::SeqCst) {
            return true;
        }
        matches!(self.deadline, Some(d) if Instant::now() >= d)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
