//! Shared configuration for the placebo engines.
//!
//! Purpose
//! -------
//! Hold the batch-level knobs both placebo procedures read: execution
//! mode, the in-time minimum-period rules, and the in-space donor-pool
//! fallback. Per-study knobs (solver tuning, missing-donor policy, donor
//! restriction) stay in
//! [`SynthOptions`](crate::synth::core::options::SynthOptions) and are
//! applied unchanged to every sub-run.
//!
//! # Notes
//! - Defaults follow the reference procedure: parallel execution, ≥ 3
//!   pre-fake and ≥ 2 post-fake periods for an eligible fake time, and
//!   re-inclusion of the real treated unit when excluding a placebo unit
//!   leaves its pool too thin.

/// Default minimum distinct pre-fake periods for an eligible fake time.
pub const DEFAULT_MIN_PRE_FAKE: usize = 3;

/// Default minimum distinct post-fake periods (before the real
/// treatment) for an eligible fake time.
pub const DEFAULT_MIN_POST_FAKE: usize = 2;

/// Batch-level options for placebo runs.
///
/// - `parallel`: dispatch iterations across a worker pool; results are
///   identical to sequential mode, only wall-clock differs.
/// - `min_pre_fake` / `min_post_fake`: in-time eligibility minimums; a
///   candidate fake time failing either is skipped with a recorded
///   reason, never attempted.
/// - `reinclude_treated`: in-space fallback — when excluding placebo
///   unit `u` leaves fewer than two donors, put the real treated unit
///   into `u`'s pool and flag the record rather than failing the
///   iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceboOptions {
    pub parallel: bool,
    pub min_pre_fake: usize,
    pub min_post_fake: usize,
    pub reinclude_treated: bool,
}

impl Default for PlaceboOptions {
    fn default() -> Self {
        PlaceboOptions {
            parallel: true,
            min_pre_fake: DEFAULT_MIN_PRE_FAKE,
            min_post_fake: DEFAULT_MIN_POST_FAKE,
            reinclude_treated: true,
        }
    }
}

impl PlaceboOptions {
    /// Bundle explicit parts; [`PlaceboOptions::default`] covers the
    /// reference behavior.
    pub fn new(
        parallel: bool, min_pre_fake: usize, min_post_fake: usize, reinclude_treated: bool,
    ) -> Self {
        PlaceboOptions { parallel, min_pre_fake, min_post_fake, reinclude_treated }
    }

    /// Sequential single-threaded variant of the defaults, for callers
    /// that need reproducible callback ordering.
    pub fn sequential() -> Self {
        PlaceboOptions { parallel: false, ..PlaceboOptions::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Default and convenience constructors.
    //
    // They intentionally DO NOT cover:
    // - How the engines consume these options, covered by engine tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the reference defaults and the sequential variant.
    //
    // Given
    // -----
    // - `default()` and `sequential()`.
    //
    // Expect
    // ------
    // - Parallel on by default with (3, 2) minimums and re-inclusion;
    //   `sequential()` differs only in the execution flag.
    fn placebo_options_defaults() {
        // Arrange / Act
        let defaults = PlaceboOptions::default();
        let sequential = PlaceboOptions::sequential();

        // Assert
        assert!(defaults.parallel);
        assert_eq!(defaults.min_pre_fake, DEFAULT_MIN_PRE_FAKE);
        assert_eq!(defaults.min_post_fake, DEFAULT_MIN_POST_FAKE);
        assert!(defaults.reinclude_treated);
        assert!(!sequential.parallel);
        assert_eq!(
            PlaceboOptions { parallel: true, ..sequential },
            defaults
        );
    }
}
