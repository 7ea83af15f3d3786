use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{ProblemError, SolveResult};

/// Cooperative cancellation for a single search.
///
/// Strategies call [`SearchControl::checkpoint`] once per candidate, so a
/// timeout or an external cancel stops the search between two primality tests
/// rather than only at entry.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl SearchControl {
    /// A control that never stops the search on its own.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        SearchControl {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Shares the cancel flag with this control, so cancelling one cancels both.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// Fails with `Cancelled` once the search should stop.
    pub fn checkpoint(&self, tested: u64) -> SolveResult<()> {
        if self.is_stopped() {
            tracing::warn!(tested, "search stopped before completion");
            return Err(ProblemError::Cancelled { tested });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_stops() {
        let control = SearchControl::unbounded();
        assert!(control.checkpoint(10).is_ok());
    }

    #[test]
    fn test_cancel_through_handle() {
        let control = SearchControl::unbounded();
        control.cancel_handle().store(true, Ordering::Relaxed);
        match control.checkpoint(3) {
            Err(ProblemError::Cancelled { tested }) => assert_eq!(tested, 3),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn test_elapsed_deadline_stops() {
        let control = SearchControl::with_timeout(Duration::ZERO);
        assert!(control.is_stopped());
    }
}
