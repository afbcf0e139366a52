//! synth — synthetic-control studies over unit×time panels.
//!
//! Purpose
//! -------
//! House the full single-study stack of the crate: validated panel data
//! and study structure (`core`), the study pipeline and packaged analysis
//! API (`models`), and the shared error taxonomy (`errors`). Given a
//! treated unit and a treatment time, this module builds a weighted
//! combination of untreated donors whose pre-treatment trajectory matches
//! the treated unit, and reports the post-treatment divergence as the
//! effect estimate.
//!
//! Key behaviors
//! -------------
//! - Validate panels once at construction: finite times, NaN-as-missing
//!   cells, a deduplicated ascending time grid.
//! - Resolve treatment specifications with fail-fast minimums (≥ 2
//!   pre-treatment times, ≥ 2 donors) before any numerics run.
//! - Aggregate regular/special predictors into a donor design, falling
//!   back to the outcome's own pre-treatment trajectory when no
//!   predictors are configured.
//! - Solve for simplex-constrained donor weights via
//!   `crate::optimization`, then synthesize the counterfactual path and
//!   its RMSPE summaries.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every entry point is a pure function of its inputs; panels are
//!   immutable during an analysis.
//! - A returned report is complete: weights sum to one over the named
//!   donors, the path covers the treated unit's observed window, and
//!   solver fallback is flagged rather than hidden.
//!
//! Conventions
//! -----------
//! - Pre-period = times strictly below the treatment threshold; gap =
//!   actual − synthetic; RMSPE ratio = post/pre.
//! - This module performs no I/O and no logging; callers own
//!   presentation, persistence, and progress reporting.
//!
//! Downstream usage
//! ----------------
//! - `crate::inference` re-runs the pipeline under rotated treatment
//!   assignments for placebo-based significance.
//! - The Python bindings expose `run_analysis` and the placebo entry
//!   points over these types.
//!
//! Testing notes
//! -------------
//! - Each submodule carries focused unit tests; `tests/` drives complete
//!   panels through analysis and placebo runs.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    DonorDesign, MissingDonorPolicy, OutcomePath, Panel, PathPoint, PredictorSpec, StudyFrame,
    SynthOptions, TreatmentSpec, build_design, synthesize_path,
};
pub use self::errors::{SynthError, SynthResult};
pub use self::models::{
    BalanceRow, FittedStudy, PredictorBalance, SynthReport, fit_study, run_analysis,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use synth_control::synth::prelude::*;
//
// to import the whole study-building surface in a single line.

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{SynthError, SynthResult};
    pub use super::models::prelude::*;
}
