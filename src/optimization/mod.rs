//! optimization — simplex-constrained weight solver and its error surface.
//!
//! Purpose
//! -------
//! Provide the numeric core of synthetic-control estimation: the
//! constrained quadratic program that turns a treated predictor vector and
//! a donor predictor matrix into non-negative, sum-to-one donor weights.
//! Callers hand in validated matrices and options and get back weights plus
//! termination diagnostics without touching iteration details.
//!
//! Key behaviors
//! -------------
//! - Solve `min_w ‖x₁ − X₀ᵀw‖²` over the probability simplex via projected
//!   gradient descent (`qp`), with the closed-form Euclidean simplex
//!   projection supplied by `simplex`.
//! - Recover from numerical trouble in-band: non-convergence and non-finite
//!   iterates yield uniform weights with `converged = false`, never a hard
//!   error.
//! - Normalize malformed-problem conditions (empty inputs, dimension
//!   mismatches, non-finite entries, bad options) into a single enum
//!   (`errors::SolverError`) with a common alias (`SolverResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite once validation has passed; every returned weight
//!   vector lies on the probability simplex whether solved or fallen back.
//! - The solver is deterministic: identical inputs and options produce
//!   bit-identical outcomes.
//! - Donor eligibility rules (≥ 2 donors, missing-aggregate exclusion) are
//!   study-level concerns enforced upstream in the design builder; this
//!   layer only rejects structurally malformed problems.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` containers over `f64`; `X₀` rows
//!   are donors and columns are predictors.
//! - Public entrypoints that can fail return `SolverResult<T>`; numerical
//!   events are reported through `QpStatus`, not errors.
//! - This module performs no I/O and no logging; higher layers report
//!   progress and diagnostics.
//!
//! Downstream usage
//! ----------------
//! - The analysis pipeline (`synth::models`) calls
//!   [`qp::solve_simplex_qp`] once per run; the placebo engine
//!   (`inference`) calls it once per iteration.
//! - Front-ends import the curated surface via `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - `simplex` tests pin the projection's feasibility and fixed points;
//!   `qp` tests cover hull recovery, degenerate shapes (J = 2, K = 1),
//!   fallback, clamping, determinism, and validation. Integration tests
//!   exercise the solver through the full pipeline.

pub mod errors;
pub mod qp;
pub mod simplex;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use synth_control::optimization::prelude::*;
//
// to import the main solver surface in a single line.

pub mod prelude {
    pub use super::errors::{SolverError, SolverResult};
    pub use super::qp::{
        FallbackReason, QpOutcome, QpStatus, SimplexQpOptions, solve_simplex_qp,
    };
    pub use super::simplex::project_onto_simplex;
}
