//! Unified error handling for placebo inference.
//!
//! This module defines [`PlaceboError`], the error type shared by the
//! in-space and in-time placebo engines. It separates batch-setup
//! failures (the study configuration itself is broken) from batch-outcome
//! failures (every sub-run failed, the reference run failed, or the
//! caller cancelled). Individual sub-run failures are NOT errors at this
//! level; they are recorded per-iteration and excluded from aggregation.
//! An alias [`PlaceboResult<T>`] standardizes the return type across
//! inference code.
use crate::synth::errors::SynthError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for placebo-engine entry points.
pub type PlaceboResult<T> = Result<T, PlaceboError>;

/// Batch-level failures of a placebo run.
///
/// Setup:
/// - `Study(SynthError)` — the batch configuration failed before any
///   iteration ran (unknown treated unit, thin pre-period, thin pool);
///   arrives via `From` so setup code can use `?` directly.
/// - `NoEligibleFakeTimes { candidates }` — every candidate fake time was
///   screened out by the minimum-period rules.
///
/// Outcome:
/// - `TreatedRunFailed { error }` — the real treated unit's own pipeline
///   failed, so no reference ratio exists and ranking is impossible.
/// - `NoSuccessfulRuns { attempted }` — every attempted iteration failed;
///   an aggregate over zero runs would be meaningless.
/// - `Cancelled { completed, attempted }` — the observer requested
///   cancellation between iterations; partial results are discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceboError {
    // ---- Batch setup ----
    Study(SynthError),
    NoEligibleFakeTimes {
        candidates: usize,
    },

    // ---- Batch outcome ----
    TreatedRunFailed {
        error: SynthError,
    },
    NoSuccessfulRuns {
        attempted: usize,
    },
    Cancelled {
        completed: usize,
        attempted: usize,
    },
}

impl std::error::Error for PlaceboError {}

impl std::fmt::Display for PlaceboError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Batch setup ----
            PlaceboError::Study(err) => write!(f, "Placebo setup failed: {err}"),
            PlaceboError::NoEligibleFakeTimes { candidates } => {
                write!(
                    f,
                    "No eligible fake treatment time among {candidates} candidate(s): each \
                     was non-finite, not strictly before the real treatment time, or left \
                     too few pre/post periods."
                )
            }

            // ---- Batch outcome ----
            PlaceboError::TreatedRunFailed { error } => {
                write!(
                    f,
                    "The treated unit's own placebo run failed, so no reference ratio \
                     exists: {error}"
                )
            }
            PlaceboError::NoSuccessfulRuns { attempted } => {
                write!(
                    f,
                    "All {attempted} attempted placebo run(s) failed; no aggregate \
                     statistic can be formed."
                )
            }
            PlaceboError::Cancelled { completed, attempted } => {
                write!(
                    f,
                    "Placebo batch cancelled after {completed} of {attempted} iteration(s)."
                )
            }
        }
    }
}

impl From<SynthError> for PlaceboError {
    fn from(err: SynthError) -> Self {
        PlaceboError::Study(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<PlaceboError> for PyErr {
    fn from(err: PlaceboError) -> PyErr {
        PyValueError::new_err(format!("PlaceboError: {err}"))
    }
}
