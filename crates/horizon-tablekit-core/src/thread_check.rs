//! Thread affinity verification utilities for Horizon TableKit.
//!
//! The binding layer requires that all structural updates and queries happen
//! on a single logical thread (typically the UI thread), with no reentrancy.
//! There is no locking protocol backing that requirement; correctness rests
//! on caller discipline. This module provides the debug assertions that make
//! violations loud instead of silently corrupting presented indices.
//!
//! # Usage
//!
//! Capture a [`ThreadAffinity`] when the owning object is constructed, then
//! assert against it in mutating operations:
//!
//! ```
//! use horizon_tablekit_core::ThreadAffinity;
//!
//! struct Binding {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Binding {
//!     fn new() -> Self {
//!         Self { affinity: ThreadAffinity::current() }
//!     }
//!
//!     fn reload(&self) {
//!         // Panic in debug builds if called from the wrong thread
//!         self.affinity.debug_assert_same_thread("reload");
//!         // ... mutate state ...
//!     }
//! }
//! ```
//!
//! # Check Levels
//!
//! - [`ThreadAffinity::debug_assert_same_thread`]: active only when thread
//!   checks are enabled (the default in debug builds). Zero-cost in release.
//! - [`ThreadAffinity::assert_same_thread`]: always active. Use for
//!   operations where a cross-thread call must never go unnoticed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable thread affinity checks globally.
///
/// Checks default to enabled in debug builds and disabled in release builds.
/// Disabling can be useful in tests that intentionally exercise an object
/// from a helper thread.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Returns `true` if thread affinity checks are currently enabled.
pub fn thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::SeqCst)
}

/// Records the thread an object belongs to.
///
/// Capture with [`ThreadAffinity::current`] at construction time, then use
/// the assertion methods to verify that later operations run on the same
/// thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread: ThreadId,
}

impl ThreadAffinity {
    /// Captures the affinity of the calling thread.
    pub fn current() -> Self {
        Self {
            thread: std::thread::current().id(),
        }
    }

    /// Returns `true` if the calling thread matches the captured affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread
    }

    /// Asserts that the calling thread matches the captured affinity.
    ///
    /// Always active, regardless of build profile or the global enable flag.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread than the one that captured
    /// this affinity.
    #[track_caller]
    pub fn assert_same_thread(&self, operation: &str) {
        if !self.is_same_thread() {
            panic!(
                "`{operation}` called from thread {:?}, but this object belongs to thread {:?}",
                std::thread::current().id(),
                self.thread,
            );
        }
    }

    /// Asserts thread affinity when checks are enabled.
    ///
    /// This is the assertion used throughout the binding layer. It is active
    /// by default in debug builds and compiles down to a flag load in
    /// release builds.
    #[track_caller]
    pub fn debug_assert_same_thread(&self, operation: &str) {
        if thread_checks_enabled() && !self.is_same_thread() {
            tracing::error!(
                target: "horizon_tablekit_core::thread_check",
                operation,
                "thread affinity violation"
            );
            panic!(
                "`{operation}` called from thread {:?}, but this object belongs to thread {:?}",
                std::thread::current().id(),
                self.thread,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_thread_passes() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread("test_op");
        affinity.debug_assert_same_thread("test_op");
    }

    #[test]
    fn test_other_thread_detected() {
        let affinity = ThreadAffinity::current();
        let handle = std::thread::spawn(move || affinity.is_same_thread());
        assert!(!handle.join().unwrap());
    }

    #[test]
    fn test_assert_panics_cross_thread() {
        let affinity = ThreadAffinity::current();
        let handle = std::thread::spawn(move || {
            let result = std::panic::catch_unwind(|| {
                affinity.assert_same_thread("cross_thread_op");
            });
            result.is_err()
        });
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_disabled_checks_skip_debug_assert() {
        let affinity = ThreadAffinity::current();
        set_thread_checks_enabled(false);
        let handle = std::thread::spawn(move || {
            // Must not panic while checks are disabled.
            affinity.debug_assert_same_thread("cross_thread_op");
        });
        handle.join().unwrap();
        set_thread_checks_enabled(true);
    }
}
