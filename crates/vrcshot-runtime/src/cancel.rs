use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag for long-running scans.
///
/// Cheap to clone and share with a signal handler or UI thread. Workers check
/// it between batches only; cancellation never tears a batch mid-file, and
/// everything already upserted stays in place (upserts are idempotent, so a
/// resumed scan is cheap).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
