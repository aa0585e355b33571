//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Checked by long-running searches (the project fallback walk) between
/// visits.
pub trait Cancellable: Send + Sync {
    fn is_cancelled(&self) -> bool;

    fn cancel(&self);
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// A token that can never be cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl Cancellable for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }

    fn cancel(&self) {}
}
