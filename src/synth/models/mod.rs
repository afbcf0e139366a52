//! models — the study pipeline and the packaged analysis API.
//!
//! Purpose
//! -------
//! Collect the user-facing synthetic-control entry points: the shared
//! resolve → design → solve → synthesize pipeline ([`fit_study`]) and the
//! packaged single-study analysis ([`run_analysis`] / [`SynthReport`]).
//! This layer sits on top of `synth::core`, wiring the validated
//! primitives to the simplex QP in `optimization`.
//!
//! Key behaviors
//! -------------
//! - Run one study as a pure function of `(panel, spec, predictors,
//!   options)` and return either a complete result or a single
//!   descriptive error — never a partial result.
//! - Keep solver fallback out of the error channel: numerical trouble
//!   resolves to uniform weights with `converged = false` and a
//!   machine-readable status.
//! - Package reporting data (weights with donor names, outcome path,
//!   predictor balance, RMSPE summaries, exclusions) as plain owned
//!   values for UI and export layers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Panels are validated at construction; this layer never re-checks
//!   cell-level invariants.
//! - Weight vectors in reports align 1:1 with `donor_units` and satisfy
//!   the simplex constraints up to the solver's clamp/renormalize step.
//! - Repeated calls with identical inputs produce identical results; no
//!   hidden state survives a call.
//!
//! Conventions
//! -----------
//! - Summary statistics always come from the path's own accessors, so
//!   `run_analysis` and the placebo engine can never disagree on a
//!   ratio's definition.
//! - Errors are reported as `SynthResult`; panics indicate programming
//!   errors, not bad user data.
//!
//! Downstream usage
//! ----------------
//! - `inference` drives [`fit_study`] once per placebo iteration with a
//!   rotated treatment specification.
//! - Front-ends (Python bindings, export layers) depend on
//!   [`run_analysis`] and the re-exports below.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`pipeline`] cover wiring, fail-fast ordering, and
//!   determinism; tests in [`analysis`] cover report packaging and the
//!   explicit fallback surface.
//! - The integration suite drives full panels through `run_analysis` and
//!   the placebo entry points.

pub mod analysis;
pub mod pipeline;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::analysis::{BalanceRow, PredictorBalance, SynthReport, run_analysis};
pub use self::pipeline::{FittedStudy, fit_study};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use synth_control::synth::models::prelude::*;
//
// to import the main analysis surface in a single line.

pub mod prelude {
    pub use super::analysis::{PredictorBalance, SynthReport, run_analysis};
    pub use super::pipeline::{FittedStudy, fit_study};
}
