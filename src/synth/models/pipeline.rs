//! Single-study pipeline: resolve, design, solve, synthesize.
//!
//! This module chains the core primitives into the one fit every entry
//! point runs: a [`TreatmentSpec`] is resolved into a [`StudyFrame`], the
//! frame is aggregated into a [`DonorDesign`], the design is handed to the
//! simplex QP, and the solved weights are applied to the donors' outcome
//! series. The placebo engine calls [`fit_study`] once per iteration with
//! a rotated spec; `run_analysis` calls it once and adds reporting on top.
//!
//! Key ideas:
//! - Configuration errors (unknown units, thin pre-periods, thin pools)
//!   surface as `Err` before any optimization runs.
//! - Numerical trouble inside the QP never surfaces as `Err`: the solver
//!   falls back to uniform weights and says so in
//!   [`QpOutcome::status`](crate::optimization::qp::QpOutcome).
//! - A fit is a pure function of `(panel, spec, predictors, options)`;
//!   repeated calls produce identical results.
use crate::optimization::qp::{QpOutcome, solve_simplex_qp};
use crate::synth::core::design::{DonorDesign, build_design};
use crate::synth::core::options::SynthOptions;
use crate::synth::core::panel::Panel;
use crate::synth::core::path::{OutcomePath, synthesize_path};
use crate::synth::core::predictors::PredictorSpec;
use crate::synth::core::treatment::{StudyFrame, TreatmentSpec};
use crate::synth::errors::SynthResult;

/// One solved study: frame, design, solver outcome, and outcome path.
///
/// The weight vector in `qp` aligns 1:1 with `design.donor_units`; the
/// path was synthesized from exactly those weights. Summary accessors
/// delegate to the path so every caller reads the same RMSPE formulas.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedStudy {
    /// Resolved study structure (indices, partitions, cutoff).
    pub frame: StudyFrame,
    /// Solver-ready design with donor names and column labels.
    pub design: DonorDesign,
    /// Weight-solver outcome, including the fallback status.
    pub qp: QpOutcome,
    /// Actual-vs-synthetic trajectory of the treated unit.
    pub path: OutcomePath,
}

impl FittedStudy {
    /// RMSPE over the pre-treatment window.
    pub fn pre_rmspe(&self) -> f64 {
        self.path.pre_rmspe()
    }

    /// RMSPE over the post-treatment window.
    pub fn post_rmspe(&self) -> f64 {
        self.path.post_rmspe()
    }

    /// Post/pre RMSPE ratio.
    pub fn rmspe_ratio(&self) -> f64 {
        self.path.rmspe_ratio()
    }
}

/// Run the full pipeline for one study.
///
/// # Steps
/// 1. Resolve `spec` against `panel`, applying the option bundle's donor
///    restriction and the optional evaluation `cutoff`.
/// 2. Build the donor design from `predictors` (or the
///    outcome-trajectory fallback).
/// 3. Solve the simplex QP for the donor weights.
/// 4. Synthesize the outcome path under the missing-donor policy.
///
/// # Arguments
/// - `panel`: validated dataset.
/// - `outcome`: outcome variable name.
/// - `spec`: treated unit + treatment time.
/// - `predictors`: ordered predictor entries; may be empty.
/// - `options`: solver tuning, missing-donor policy, donor restriction.
/// - `cutoff`: evaluation cutoff for backdated (in-time) runs.
///
/// # Returns
/// - The solved study. Check `qp.converged` before trusting the weights
///   beyond the uniform fallback.
///
/// # Errors
/// - Any `SynthError` from resolution, design construction, or path
///   synthesis; solver input errors arrive wrapped as
///   [`SynthError::Solver`](crate::synth::errors::SynthError::Solver).
pub fn fit_study(
    panel: &Panel, outcome: &str, spec: &TreatmentSpec, predictors: &[PredictorSpec],
    options: &SynthOptions, cutoff: Option<f64>,
) -> SynthResult<FittedStudy> {
    let frame =
        StudyFrame::resolve_truncated(panel, spec, options.donor_pool.as_deref(), cutoff)?;
    let design = build_design(panel, &frame, outcome, predictors)?;
    let qp = solve_simplex_qp(&design.treated, &design.donors, &options.solver)?;
    let path = synthesize_path(
        panel,
        &frame,
        outcome,
        &design.donor_units,
        &qp.weights,
        options.missing_donor,
    )?;
    Ok(FittedStudy { frame, design, qp, path })
}
