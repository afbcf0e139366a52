//! synth::errors — error types for panels, study configuration, and fitting.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the synthetic-control
//! stack: panel construction, treatment/predictor specifications, design
//! matrix assembly, outcome synthesis, and the analysis entry point. A
//! feature-gated conversion layer maps these to Python exceptions for the
//! PyO3 bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`SynthResult`] and [`SynthError`] as the canonical result and
//!   error types of the `synth` stack.
//! - Report first offenders: validation stops at the first bad row/value
//!   and carries its location in the variant payload.
//! - Wrap malformed-solver-problem errors via `From<SolverError>` so the
//!   pipeline exposes one error surface (numerical solver events are not
//!   errors at all; they surface as `converged = false`).
//! - Implement `From<SynthError> for PyErr` (feature-gated) mapping to
//!   `ValueError` at the Python boundary.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every variant is a configuration-class failure in the spec's taxonomy:
//!   surfaced fast, before or instead of optimization — never a recovered
//!   numerical event.
//! - Payloads identify the offender (row, unit, variable, value) without
//!   carrying large data structures.
//!
//! Conventions
//! -----------
//! - Panel/row indices refer to positions in the caller-supplied columns.
//! - Messages are phrased in terms of the study contract ("pre-treatment
//!   periods", "donor pool") rather than internal structures.
//! - Placebo batch errors live in `inference::errors`; solver-input errors
//!   in `optimization::errors`.
//!
//! Downstream usage
//! ----------------
//! - `Panel::new`, spec constructors, `build_design`, `synthesize_path`,
//!   and `run_analysis` all return [`SynthResult<T>`].
//! - The placebo engine wraps these via `From<SynthError> for PlaceboError`
//!   for its own fail-fast checks, and otherwise catches them per
//!   iteration.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` messages embed their payloads and
//!   that the `From<SolverError>` wrapper preserves the inner message.
//! - The PyErr conversion is exercised by Python-level tests, not here.

use crate::optimization::errors::SolverError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SynthResult<T> = Result<T, SynthError>;

/// SynthError — configuration-class failures of the synthetic-control stack.
///
/// Variants
/// --------
/// Panel construction:
/// - `EmptyPanel` — zero rows.
/// - `ColumnLengthMismatch { column, expected, found }` — a variable column
///   whose length differs from the unit/time columns.
/// - `NonFiniteTime { row, value }` — a NaN/±∞ time value.
/// - `EmptyUnitId { row }` — an empty unit identifier.
/// - `NoVariables` — a panel with no variable columns at all.
/// - `DuplicateVariable { name }` — two variable columns share a name.
/// - `InfiniteValue { column, row, value }` — a ±∞ data value; NaN encodes
///   a missing cell, infinities are rejected as garbage.
///
/// Specifications:
/// - `EmptyUnitName` / `EmptyVariableName` — blank identifiers in a spec.
/// - `NonFiniteTreatmentTime { value }` — treatment threshold not finite.
/// - `InvalidPredictorWindow { variable, start, end }` — a special
///   predictor window with non-finite bounds or `start > end`.
///
/// Study structure (fail-fast minimums):
/// - `UnknownUnit { unit }` / `UnknownVariable { name }` — a name that does
///   not appear in the panel.
/// - `InsufficientPrePeriods { found, required }` — fewer than 2 distinct
///   pre-treatment time values.
/// - `InsufficientDonors { found, required }` — fewer than 2 donors, before
///   or after missing-aggregate exclusions.
///
/// Design & synthesis:
/// - `MissingTreatedPredictor { column }` — the treated unit has no usable
///   value for a predictor column; donors in this situation are dropped,
///   the treated unit cannot be.
/// - `NoTreatedOutcome { unit }` — the treated unit has no non-missing
///   outcome observation in the evaluation window.
/// - `NoPreTreatmentOutcome { unit }` — the treated unit has outcome
///   observations, but none strictly before the treatment time, so the
///   pre-period RMSPE is undefined.
/// - `WeightLengthMismatch { weights, donors }` — a weight vector does not
///   align 1:1 with the donor list it is applied to.
///
/// Wrapped:
/// - `Solver(SolverError)` — a malformed QP problem (via `From`); reaching
///   this from the public API indicates inputs escaped upstream
///   validation.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    // ---- Panel construction ----
    EmptyPanel,
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    NonFiniteTime {
        row: usize,
        value: f64,
    },
    EmptyUnitId {
        row: usize,
    },
    NoVariables,
    DuplicateVariable {
        name: String,
    },
    InfiniteValue {
        column: String,
        row: usize,
        value: f64,
    },

    // ---- Specifications ----
    EmptyUnitName,
    EmptyVariableName,
    NonFiniteTreatmentTime {
        value: f64,
    },
    InvalidPredictorWindow {
        variable: String,
        start: f64,
        end: f64,
    },

    // ---- Study structure ----
    UnknownUnit {
        unit: String,
    },
    UnknownVariable {
        name: String,
    },
    InsufficientPrePeriods {
        found: usize,
        required: usize,
    },
    InsufficientDonors {
        found: usize,
        required: usize,
    },

    // ---- Design & synthesis ----
    MissingTreatedPredictor {
        column: String,
    },
    NoTreatedOutcome {
        unit: String,
    },
    NoPreTreatmentOutcome {
        unit: String,
    },
    WeightLengthMismatch {
        weights: usize,
        donors: usize,
    },

    // ---- Wrapped solver input errors ----
    Solver(SolverError),
}

impl std::error::Error for SynthError {}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::EmptyPanel => {
                write!(f, "Panel has no rows; at least one observation is required.")
            }
            SynthError::ColumnLengthMismatch { column, expected, found } => {
                write!(
                    f,
                    "Variable column '{column}' has {found} entries but the panel has {expected} \
                     rows."
                )
            }
            SynthError::NonFiniteTime { row, value } => {
                write!(f, "Time value at row {row} is {value}; times must be finite.")
            }
            SynthError::EmptyUnitId { row } => {
                write!(f, "Unit identifier at row {row} is empty.")
            }
            SynthError::NoVariables => {
                write!(f, "Panel has no variable columns; at least the outcome is required.")
            }
            SynthError::DuplicateVariable { name } => {
                write!(f, "Variable column '{name}' appears more than once.")
            }
            SynthError::InfiniteValue { column, row, value } => {
                write!(
                    f,
                    "Variable '{column}' at row {row} is {value}; values must be finite, with \
                     NaN reserved for missing cells."
                )
            }
            SynthError::EmptyUnitName => write!(f, "Unit name must not be empty."),
            SynthError::EmptyVariableName => write!(f, "Variable name must not be empty."),
            SynthError::NonFiniteTreatmentTime { value } => {
                write!(f, "Treatment time is {value}; it must be finite.")
            }
            SynthError::InvalidPredictorWindow { variable, start, end } => {
                write!(
                    f,
                    "Special predictor on '{variable}' has an invalid window [{start}, {end}]; \
                     bounds must be finite with start <= end."
                )
            }
            SynthError::UnknownUnit { unit } => {
                write!(f, "Unit '{unit}' does not appear in the panel.")
            }
            SynthError::UnknownVariable { name } => {
                write!(f, "Variable '{name}' does not appear in the panel.")
            }
            SynthError::InsufficientPrePeriods { found, required } => {
                write!(
                    f,
                    "Insufficient pre-treatment data: found {found} distinct pre-treatment time \
                     value(s), need at least {required}."
                )
            }
            SynthError::InsufficientDonors { found, required } => {
                write!(
                    f,
                    "Insufficient donor pool: {found} eligible donor(s), need at least {required}."
                )
            }
            SynthError::MissingTreatedPredictor { column } => {
                write!(
                    f,
                    "Treated unit has no usable value for predictor column '{column}'; the \
                     treated row must be fully populated."
                )
            }
            SynthError::NoTreatedOutcome { unit } => {
                write!(
                    f,
                    "Treated unit '{unit}' has no non-missing outcome observation in the \
                     evaluation window."
                )
            }
            SynthError::NoPreTreatmentOutcome { unit } => {
                write!(
                    f,
                    "Treated unit '{unit}' has no non-missing outcome observation before the \
                     treatment time; the pre-period RMSPE is undefined."
                )
            }
            SynthError::WeightLengthMismatch { weights, donors } => {
                write!(
                    f,
                    "Weight vector length {weights} does not match the donor list length \
                     {donors}."
                )
            }
            SynthError::Solver(err) => write!(f, "Weight solver rejected its input: {err}"),
        }
    }
}

impl From<SolverError> for SynthError {
    fn from(err: SolverError) -> Self {
        SynthError::Solver(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<SynthError> for PyErr {
    fn from(err: SynthError) -> PyErr {
        PyValueError::new_err(format!("SynthError: {err}"))
    }
}
