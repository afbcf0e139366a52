//! Progress observation and cancellation for placebo batches.
//!
//! Purpose
//! -------
//! Give interactive callers a window into a running placebo batch without
//! putting any I/O inside the engine: the engine calls out through a
//! [`PlaceboObserver`] at iteration boundaries, and the observer may
//! request cancellation there. The core never logs or prints on its own;
//! attach an observer to see anything.
//!
//! # Notes
//! - Observers must be `Sync`: in parallel mode callbacks arrive from
//!   worker threads. Callbacks carry monotonically increasing completion
//!   counts, but their arrival order across threads is unspecified.
//! - Cancellation is checked before each iteration starts, never
//!   mid-solve; iterations already running when the flag flips still
//!   finish.

/// One progress callback's payload.
///
/// - `label`: what this iteration evaluated (a unit name in-space, a
///   rendered fake time in-time).
/// - `completed` / `total`: finished-so-far over planned iterations.
/// - `failed`: whether this iteration's pipeline returned an error (it
///   was recorded and excluded, not fatal).
#[derive(Debug, Clone, PartialEq)]
pub struct IterationUpdate {
    pub label: String,
    pub completed: usize,
    pub total: usize,
    pub failed: bool,
}

/// Iteration-boundary hooks for a placebo batch.
///
/// All methods default to no-ops, so implementors override only what
/// they need. `should_cancel` is polled before every iteration; once it
/// returns `true` the batch stops scheduling work and reports
/// [`PlaceboError::Cancelled`](crate::inference::errors::PlaceboError::Cancelled).
pub trait PlaceboObserver: Sync {
    /// Called once before the first iteration with the planned count.
    fn on_start(&self, _total: usize) {}

    /// Called after each iteration finishes (success or recorded failure).
    fn on_iteration(&self, _update: &IterationUpdate) {}

    /// Polled at iteration boundaries; `true` aborts the batch.
    fn should_cancel(&self) -> bool {
        false
    }
}

/// The do-nothing observer; the right default for batch callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PlaceboObserver for SilentObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Default-method behavior of the observer trait.
    //
    // They intentionally DO NOT cover:
    // - Engine-side callback sequencing, covered by the engine tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the silent observer never cancels and accepts callbacks.
    //
    // Given
    // -----
    // - A `SilentObserver` driven through the whole trait surface.
    //
    // Expect
    // ------
    // - `should_cancel` is false; the no-op callbacks compile and run.
    fn silent_observer_is_inert() {
        // Arrange
        let observer = SilentObserver;

        // Act / Assert
        observer.on_start(5);
        observer.on_iteration(&IterationUpdate {
            label: "B".to_string(),
            completed: 1,
            total: 5,
            failed: false,
        });
        assert!(!observer.should_cancel());
    }
}
