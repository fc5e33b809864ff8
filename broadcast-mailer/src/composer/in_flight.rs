//! In-flight flag for broadcast submissions
//!
//! At most one submission may be outstanding per composer. The flag is taken
//! with a compare-and-swap and released when the returned guard drops, so it
//! is cleared on every exit path, including an abandoned submission future.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, observable in-flight flag
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    /// Create a cleared flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is currently outstanding
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag, returning a guard that clears it on drop
    ///
    /// Returns `None` if the flag is already set.
    #[must_use]
    pub fn begin(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: Arc::clone(&self.0),
            })
    }
}

/// Clears the in-flight flag when dropped
#[derive(Debug)]
#[must_use = "the in-flight flag is cleared as soon as the guard is dropped"]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        assert!(!InFlight::new().is_set());
    }

    #[test]
    fn test_guard_sets_and_clears() {
        let flag = InFlight::new();
        let observer = flag.clone();

        let guard = flag.begin().unwrap();
        assert!(observer.is_set());

        drop(guard);
        assert!(!observer.is_set());
    }

    #[test]
    fn test_second_begin_rejected_while_held() {
        let flag = InFlight::new();
        let _guard = flag.begin().unwrap();
        assert!(flag.begin().is_none());
    }

    #[test]
    fn test_can_begin_again_after_release() {
        let flag = InFlight::new();
        drop(flag.begin().unwrap());
        assert!(flag.begin().is_some());
    }
}
