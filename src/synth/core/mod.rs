//! core — panel data, study structure, and synthesis primitives.
//!
//! Purpose
//! -------
//! Collect the building blocks a synthetic-control study is assembled
//! from: the validated panel container, treatment specification and its
//! resolved frame, predictor specifications and the donor design built
//! from them, outcome-path synthesis with RMSPE summaries, and the
//! study-level option bundle. The model layer and the placebo engine
//! compose these primitives; nothing here runs an optimization.
//!
//! Key behaviors
//! -------------
//! - Represent a unit×time×variable table with missing-cell tolerance and
//!   a deduplicated ascending time grid ([`Panel`]).
//! - Validate who-is-treated-when ([`TreatmentSpec`]) and resolve it into
//!   dense indices with fail-fast minimums ([`StudyFrame`],
//!   [`MIN_PRE_PERIODS`], [`MIN_DONORS`]).
//! - Aggregate regular/special predictors into solver inputs
//!   ([`PredictorSpec`], [`DonorDesign`], [`build_design`]) with the
//!   outcome-trajectory fallback when nothing is configured.
//! - Apply solved weights to donor outcome series ([`synthesize_path`],
//!   [`OutcomePath`], [`PathPoint`]) under an explicit
//!   [`MissingDonorPolicy`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Panels are immutable once constructed; every value is finite or NaN
//!   (NaN encodes a missing cell), every time is finite, and the time
//!   grid is strictly ascending.
//! - A resolved frame guarantees ≥ 2 distinct pre-treatment times and
//!   ≥ 2 donors before any aggregation runs; the design builder
//!   re-checks the donor minimum after missing-aggregate exclusions.
//! - Weight vectors align 1:1 with a design's `donor_units`; paths are
//!   evaluated only at times where the treated unit has an observed
//!   outcome.
//!
//! Conventions
//! -----------
//! - Pre-period = times strictly before the treatment threshold;
//!   post-period = times at or after it, truncated by the frame's
//!   evaluation cutoff when one is set.
//! - Gap = actual − synthetic; RMSPE ratio = post/pre with documented
//!   conventions at a zero pre-RMSPE.
//! - This module avoids I/O and logging; it operates purely on owned
//!   containers and `ndarray` values, reporting problems via
//!   `SynthResult`.
//!
//! Downstream usage
//! ----------------
//! - `synth::models` wires these primitives into `fit_study` and
//!   `run_analysis`.
//! - `inference` re-runs the same pipeline per placebo iteration, varying
//!   the treated unit or the treatment time through [`TreatmentSpec`]
//!   rotation helpers.
//!
//! Testing notes
//! -------------
//! - Submodule unit tests cover panel validation and lookups, frame
//!   resolution, aggregation and fallback designs, policy-dependent
//!   synthesis, and RMSPE conventions.
//! - The end-to-end pipeline over these pieces is exercised by the
//!   integration suite in `tests/`.

pub mod design;
pub mod options;
pub mod panel;
pub mod path;
pub mod predictors;
pub mod treatment;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::design::{DonorDesign, build_design};
pub use self::options::SynthOptions;
pub use self::panel::Panel;
pub use self::path::{MissingDonorPolicy, OutcomePath, PathPoint, synthesize_path};
pub use self::predictors::PredictorSpec;
pub use self::treatment::{MIN_DONORS, MIN_PRE_PERIODS, StudyFrame, TreatmentSpec};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use synth_control::synth::core::prelude::*;
//
// to import the main study-construction surface in a single line.

pub mod prelude {
    pub use super::design::{DonorDesign, build_design};
    pub use super::options::SynthOptions;
    pub use super::panel::Panel;
    pub use super::path::{MissingDonorPolicy, OutcomePath, PathPoint, synthesize_path};
    pub use super::predictors::PredictorSpec;
    pub use super::treatment::{StudyFrame, TreatmentSpec};
}
