//! inference — placebo-based robustness checks for synthetic control fits.
//!
//! Purpose
//! -------
//! Provide the permutation-style evidence layer on top of a single
//! synthetic control analysis. This module re-runs the full pipeline under
//! perturbed treatment assignments — rotating the treated unit across the
//! donor pool (in-space) or backdating the treatment time on the real
//! treated unit (in-time) — and aggregates the resulting post/pre RMSPE
//! ratios so callers can judge how extreme the real estimate is.
//!
//! Key behaviors
//! -------------
//! - Define a unified error and result type, [`PlaceboError`] and
//!   [`PlaceboResult`], for batch-level failures (broken configuration,
//!   failed reference run, fully-failed batch, cancellation).
//! - Run the in-space batch via [`run_in_space_placebo`]: one pipeline run
//!   per unit with the treated unit's reference ratio ranked into a
//!   permutation p-value.
//! - Run the in-time batch via [`run_in_time_placebo`]: candidate fake
//!   times screened against minimum-period rules, each surviving
//!   candidate evaluated with the window truncated at the real treatment
//!   time.
//! - Report progress and accept cancellation through the
//!   [`PlaceboObserver`] trait; [`SilentObserver`] is the no-op default.
//! - Tune batch behavior via [`PlaceboOptions`] (parallel vs sequential
//!   execution, minimum fake-time period counts, the treated re-inclusion
//!   fallback for thin pools).
//!
//! Invariants & assumptions
//! ------------------------
//! - A single failed iteration never aborts a batch; it is recorded and
//!   excluded from aggregation. Batch-level errors are reserved for
//!   configurations where no aggregate can exist at all.
//! - Iteration results are pure functions of the shared panel and their
//!   own plan; parallel and sequential execution produce identical
//!   output, records always in plan order.
//! - Ratio conventions follow the outcome-path layer: a perfect pre-fit
//!   with post divergence yields `+∞`, which still ranks itself in the
//!   p-value count.
//!
//! Conventions
//! -----------
//! - Observers must be `Sync`; callbacks may arrive from worker threads
//!   when `parallel` is set, with `completed` counts monotone but
//!   interleaved.
//! - All routines are deterministic and hold no global state; failures
//!   are reported via [`PlaceboResult`] only.
//!
//! Downstream usage
//! ----------------
//! - After a satisfying [`run_analysis`](crate::synth::models::analysis::run_analysis),
//!   callers typically run [`run_in_space_placebo`] with the same
//!   arguments and quote `p_value` next to the estimated gap, then
//!   [`run_in_time_placebo`] with a handful of backdated candidates as a
//!   specification check.
//! - Downstream code typically imports
//!   `use synth_control::inference::prelude::*;` to surface the placebo
//!   engines and their result types as a compact, curated API.
//!
//! Testing notes
//! -------------
//! - Unit tests live with each engine: ranking and p-value math,
//!   re-inclusion and screening rules, failure recording, cancellation,
//!   callback sequencing, and parallel/sequential agreement.
//! - Integration tests exercise placebo self-consistency against the
//!   single-study entry point end-to-end.

pub mod errors;
pub mod in_space;
pub mod in_time;
pub mod progress;
pub mod types;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{PlaceboError, PlaceboResult};
pub use self::in_space::{InSpacePlacebo, PlaceboFailure, PlaceboRecord, run_in_space_placebo};
pub use self::in_time::{
    FakeTimeFailure, FakeTimeRecord, InTimePlacebo, SkipReason, SkippedFakeTime,
    run_in_time_placebo,
};
pub use self::progress::{IterationUpdate, PlaceboObserver, SilentObserver};
pub use self::types::PlaceboOptions;

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use synth_control::inference::prelude::*;` to
// import the primary placebo surface in a single line.

pub mod prelude {
    pub use super::errors::{PlaceboError, PlaceboResult};
    pub use super::in_space::{
        InSpacePlacebo, PlaceboFailure, PlaceboRecord, run_in_space_placebo,
    };
    pub use super::in_time::{
        FakeTimeFailure, FakeTimeRecord, InTimePlacebo, SkipReason, SkippedFakeTime,
        run_in_time_placebo,
    };
    pub use super::progress::{IterationUpdate, PlaceboObserver, SilentObserver};
    pub use super::types::PlaceboOptions;
}
