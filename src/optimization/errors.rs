//! optimization::errors — error types for the simplex-constrained QP solver.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the donor-weight solver and
//! its options, together with a conversion layer to Python exceptions for
//! PyO3-based bindings. Hard errors here mean "the problem was malformed";
//! numerical trouble during the solve is *not* an error — it is recovered
//! in-band as a uniform-weight fallback (see `optimization::qp`).
//!
//! Key behaviors
//! -------------
//! - Define [`SolverResult`] and [`SolverError`] as the canonical result and
//!   error types for `solve_simplex_qp` and `SimplexQpOptions`.
//! - Attach human-readable `Display` messages to each variant so diagnostics
//!   are meaningful without additional context.
//! - Implement `From<SolverError> for PyErr` (feature-gated) to surface
//!   malformed-problem errors as `ValueError` to Python callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Variants carry just enough payload (offending index and value, or the
//!   mismatched dimensions) for callers to locate the bad input; they never
//!   carry whole matrices.
//! - Non-convergence, singular systems, and non-finite iterates never map to
//!   these errors; they map to `QpStatus::FallbackUniform`.
//!
//! Conventions
//! -----------
//! - This module covers solver-facing failures only; panel / study
//!   configuration errors live in `synth::errors`, placebo batch errors in
//!   `inference::errors`.
//! - Messages are phrased in terms of the QP's contract (donor rows,
//!   predictor columns, option bounds) rather than implementation detail.
//!
//! Downstream usage
//! ----------------
//! - `solve_simplex_qp` and `SimplexQpOptions::new` return
//!   [`SolverResult<T>`].
//! - `synth::errors::SynthError` wraps these via `From<SolverError>` so the
//!   analysis pipeline exposes a single error surface.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` messages embed their payloads
//!   (offending value, index, or dimension pair).
//! - The `From<SolverError> for PyErr` conversion is exercised from
//!   Python-level tests, not here.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SolverResult<T> = Result<T, SolverError>;

/// SolverError — malformed-problem conditions for the donor-weight QP.
///
/// Variants
/// --------
/// - `EmptyDonorSet`
///   The donor matrix `X₀` has zero rows; there is nothing to weight.
/// - `EmptyPredictorVector`
///   The treated vector `x₁` has zero entries; the objective is undefined.
/// - `DimensionMismatch { donor_cols, treated_len }`
///   `X₀` has a column count different from `x₁`'s length, so
///   `‖x₁ − X₀ᵀw‖²` cannot be formed.
/// - `NonFiniteTreated { index, value }`
///   An entry of `x₁` is NaN or ±∞.
/// - `NonFiniteDonor { row, col, value }`
///   An entry of `X₀` is NaN or ±∞. Missing donor aggregates must be
///   resolved (donor dropped) *before* the solve.
/// - `InvalidRidge { value }` / `InvalidTolerance { value }` /
///   `InvalidMaxIter` / `InvalidClampEpsilon { value }`
///   An option violates its bound (see `SimplexQpOptions::new`).
///
/// Invariants
/// ----------
/// - Index payloads refer to positions in the inputs as supplied by the
///   caller (row = donor position, col = predictor position).
///
/// Notes
/// -----
/// - Implements [`std::error::Error`] and [`std::fmt::Display`] for
///   idiomatic `?`-based propagation.
/// - A feature-gated `From<SolverError> for PyErr` maps all cases to
///   `ValueError` at the Python boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    // ---- Problem validation ----
    EmptyDonorSet,
    EmptyPredictorVector,
    DimensionMismatch {
        donor_cols: usize,
        treated_len: usize,
    },
    NonFiniteTreated {
        index: usize,
        value: f64,
    },
    NonFiniteDonor {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Option validation ----
    /// Ridge must be finite and >= 0.
    InvalidRidge {
        value: f64,
    },
    /// Step tolerance must be finite and > 0.
    InvalidTolerance {
        value: f64,
    },
    /// Iteration cap must be at least 1.
    InvalidMaxIter,
    /// Clamp epsilon must be finite and >= 0.
    InvalidClampEpsilon {
        value: f64,
    },
}

impl std::error::Error for SolverError {}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyDonorSet => {
                write!(f, "Donor matrix has zero rows; at least one donor is required.")
            }
            SolverError::EmptyPredictorVector => {
                write!(f, "Treated predictor vector is empty; at least one predictor is required.")
            }
            SolverError::DimensionMismatch { donor_cols, treated_len } => {
                write!(
                    f,
                    "Donor matrix has {donor_cols} predictor columns but the treated vector has \
                     {treated_len} entries; they must match."
                )
            }
            SolverError::NonFiniteTreated { index, value } => {
                write!(
                    f,
                    "Treated predictor vector entry {index} is {value}; all entries must be finite."
                )
            }
            SolverError::NonFiniteDonor { row, col, value } => {
                write!(
                    f,
                    "Donor matrix entry ({row}, {col}) is {value}; all entries must be finite. \
                     Drop donors with missing aggregates before solving."
                )
            }
            SolverError::InvalidRidge { value } => {
                write!(f, "Invalid ridge: {value}. Must be finite and non-negative.")
            }
            SolverError::InvalidTolerance { value } => {
                write!(f, "Invalid step tolerance: {value}. Must be finite and positive.")
            }
            SolverError::InvalidMaxIter => {
                write!(f, "Invalid iteration cap: 0. Must be at least 1.")
            }
            SolverError::InvalidClampEpsilon { value } => {
                write!(f, "Invalid clamp epsilon: {value}. Must be finite and non-negative.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SolverError> for PyErr {
    fn from(err: SolverError) -> PyErr {
        PyValueError::new_err(format!("SolverError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting for SolverError variants.
    // - Embedding of payloads (values, indices, dimensions) into messages.
    //
    // They intentionally DO NOT cover:
    // - The `From<SolverError> for PyErr` conversion, which requires linking
    //   against the Python C API and is covered by Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `DimensionMismatch` reports both dimensions.
    //
    // Given
    // -----
    // - A `DimensionMismatch` with donor_cols = 4 and treated_len = 3.
    //
    // Expect
    // ------
    // - The message contains both "4" and "3".
    fn solver_error_dimension_mismatch_includes_both_dimensions() {
        // Arrange
        let err = SolverError::DimensionMismatch { donor_cols: 4, treated_len: 3 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains('4') && msg.contains('3'),
            "Display message should include both dimensions.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `NonFiniteDonor` reports the offending cell and value.
    //
    // Given
    // -----
    // - A `NonFiniteDonor` at (2, 5) with value NaN.
    //
    // Expect
    // ------
    // - The message contains "2", "5", and "NaN".
    fn solver_error_non_finite_donor_includes_cell_and_value() {
        // Arrange
        let err = SolverError::NonFiniteDonor { row: 2, col: 5, value: f64::NAN };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains('2') && msg.contains('5') && msg.contains("NaN"),
            "Display message should include cell coordinates and value.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that option-validation variants embed the offending value.
    //
    // Given
    // -----
    // - An `InvalidRidge` with value = -0.5.
    //
    // Expect
    // ------
    // - The message contains "-0.5".
    fn solver_error_invalid_ridge_includes_payload() {
        // Arrange
        let err = SolverError::InvalidRidge { value: -0.5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("-0.5"),
            "Display message should include the offending ridge value.\nGot: {msg}"
        );
    }
}
