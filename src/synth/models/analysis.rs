//! Analysis entry point: one study, fully reported.
//!
//! This module wraps [`fit_study`] for callers that want the packaged
//! result rather than the raw pipeline pieces: donor weights with their
//! names, the outcome path, the predictor balance table, RMSPE summaries,
//! and the solver's convergence verdict, all in one [`SynthReport`].
//!
//! Key ideas:
//! - The report is plain owned data (strings, vectors, `ndarray`
//!   containers) so UI and export layers can render or serialize it
//!   without touching the panel again.
//! - Balance rows compare three views of every design column: the treated
//!   unit's value, the synthetic unit's value (`X₀ᵗw`), and the unweighted
//!   donor mean as the naive baseline.
//! - `converged = false` is an inspectable signal, never a hidden
//!   fallback; the exact reason rides along in `solver_status`.
use ndarray::Array1;

use crate::optimization::qp::QpStatus;
use crate::synth::core::options::SynthOptions;
use crate::synth::core::panel::Panel;
use crate::synth::core::path::OutcomePath;
use crate::synth::core::predictors::PredictorSpec;
use crate::synth::core::treatment::TreatmentSpec;
use crate::synth::errors::SynthResult;
use crate::synth::models::pipeline::{FittedStudy, fit_study};

/// One predictor compared across the treated unit, the synthetic unit,
/// and the unweighted donor average.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub predictor: String,
    pub treated: f64,
    pub synthetic: f64,
    pub donor_mean: f64,
}

/// Predictor balance table, one row per design column in design order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorBalance {
    pub rows: Vec<BalanceRow>,
}

impl PredictorBalance {
    // Assemble rows from a fitted study; the fitted predictor vector is
    // X₀ᵗw, already computed by the solver.
    fn from_fit(fit: &FittedStudy) -> Self {
        let donors = &fit.design.donors;
        let n_donors = donors.nrows() as f64;
        let rows = fit
            .design
            .columns
            .iter()
            .enumerate()
            .map(|(k, label)| BalanceRow {
                predictor: label.clone(),
                treated: fit.design.treated[k],
                synthetic: fit.qp.fitted[k],
                donor_mean: donors.column(k).sum() / n_donors,
            })
            .collect();
        PredictorBalance { rows }
    }
}

/// Packaged result of a single synthetic-control analysis.
///
/// Fields
/// ------
/// - `treated_unit` / `treatment_time`: echo of the specification.
/// - `donor_units`: surviving donors, aligned 1:1 with `weights`.
/// - `weights`: solved donor weights (≥ 0, summing to 1).
/// - `outcome_path`: actual-vs-synthetic trajectory with gaps.
/// - `balance`: per-predictor comparison table.
/// - `pre_rmspe` / `post_rmspe` / `rmspe_ratio`: fit summaries.
/// - `converged` / `solver_status` / `iterations`: solver verdict;
///   `converged = false` means the uniform-weight fallback is in effect.
/// - `excluded_donors`: donors dropped for missing predictor aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthReport {
    pub treated_unit: String,
    pub treatment_time: f64,
    pub donor_units: Vec<String>,
    pub weights: Array1<f64>,
    pub outcome_path: OutcomePath,
    pub balance: PredictorBalance,
    pub pre_rmspe: f64,
    pub post_rmspe: f64,
    pub rmspe_ratio: f64,
    pub converged: bool,
    pub solver_status: QpStatus,
    pub iterations: usize,
    pub excluded_donors: Vec<String>,
}

/// Run one synthetic-control analysis and package the result.
///
/// # Arguments
/// - `panel`: validated dataset.
/// - `outcome`: outcome variable name.
/// - `treatment`: treated unit + treatment time.
/// - `predictors`: ordered predictor entries; empty falls back to the
///   outcome's own pre-treatment trajectory.
/// - `options`: solver tuning, missing-donor policy, donor restriction.
///
/// # Returns
/// - A complete [`SynthReport`]; never a partial result.
///
/// # Errors
/// - Configuration and data errors from the underlying pipeline
///   ([`fit_study`]); numerical solver trouble is not an error here, it
///   shows up as `converged = false`.
pub fn run_analysis(
    panel: &Panel, outcome: &str, treatment: &TreatmentSpec, predictors: &[PredictorSpec],
    options: &SynthOptions,
) -> SynthResult<SynthReport> {
    let fit = fit_study(panel, outcome, treatment, predictors, options, None)?;
    Ok(report_from(treatment, fit))
}

// Shared packaging used by `run_analysis` and the placebo engine's
// treated-unit reference run.
pub(crate) fn report_from(treatment: &TreatmentSpec, fit: FittedStudy) -> SynthReport {
    let balance = PredictorBalance::from_fit(&fit);
    let pre_rmspe = fit.pre_rmspe();
    let post_rmspe = fit.post_rmspe();
    let rmspe_ratio = fit.rmspe_ratio();
    let FittedStudy { design, qp, path, .. } = fit;
    SynthReport {
        treated_unit: treatment.treated_unit.clone(),
        treatment_time: treatment.treatment_time,
        donor_units: design.donor_units,
        weights: qp.weights,
        outcome_path: path,
        balance,
        pre_rmspe,
        post_rmspe,
        rmspe_ratio,
        converged: qp.converged,
        solver_status: qp.status,
        iterations: qp.iterations,
        excluded_donors: design.excluded_donors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::qp::SimplexQpOptions;
    use crate::synth::core::path::MissingDonorPolicy;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Report packaging: weights, balance, summaries, exclusions.
    // - The converged=false surface on forced fallback.
    //
    // They intentionally DO NOT cover:
    // - Solver numerics and path math, covered by their own unit tests.
    // -------------------------------------------------------------------------

    fn blend_panel() -> Panel {
        let mut units = Vec::new();
        let mut times = Vec::new();
        let mut outcome = Vec::new();
        let series = [
            ("A", [10.0, 11.0, 12.0, 20.0, 21.0]),
            ("B", [8.0, 10.0, 12.0, 14.0, 16.0]),
            ("C", [12.0, 12.0, 12.0, 12.0, 12.0]),
        ];
        for (unit, values) in series {
            for (i, year) in (2000..=2004).enumerate() {
                units.push(unit.to_string());
                times.push(year as f64);
                outcome.push(values[i]);
            }
        }
        Panel::new(units, times, vec![("outcome".to_string(), outcome)]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the packaged report for the canonical blend study.
    //
    // Given
    // -----
    // - Treated A = 50/50 B+C blend pre-treatment, treatment at 2003, no
    //   predictors.
    //
    // Expect
    // ------
    // - Three balance rows (one per pre-year) where treated ≈ synthetic;
    //   weights sum to 1; summaries match the path's own accessors.
    fn analysis_packages_blend_report() {
        // Arrange
        let panel = blend_panel();
        let treatment = TreatmentSpec::new("A", 2003.0).unwrap();
        let options = SynthOptions::default();

        // Act
        let report = run_analysis(&panel, "outcome", &treatment, &[], &options).unwrap();

        // Assert
        assert_eq!(report.treated_unit, "A");
        assert_eq!(report.donor_units, vec!["B", "C"]);
        assert!((report.weights.sum() - 1.0).abs() < 1e-9);
        assert_eq!(report.balance.rows.len(), 3);
        for row in &report.balance.rows {
            assert!((row.treated - row.synthetic).abs() < 1e-6);
        }
        // Donor means: 2000 → (8+12)/2 = 10, 2001 → 11, 2002 → 12.
        assert!((report.balance.rows[0].donor_mean - 10.0).abs() < 1e-12);
        assert_eq!(report.outcome_path.len(), 5);
        assert!((report.pre_rmspe - report.outcome_path.pre_rmspe()).abs() < 1e-15);
        assert!(report.converged);
        assert!(report.excluded_donors.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify that forced solver fallback surfaces as converged=false with
    // uniform weights, not as an error.
    //
    // Given
    // -----
    // - A one-iteration solver budget with an unreachable tolerance, on a
    //   study whose optimum is far from the uniform start (treated B).
    //
    // Expect
    // ------
    // - Ok(report) with uniform weights over two donors and
    //   converged=false.
    fn analysis_reports_fallback_explicitly() {
        // Arrange
        let panel = blend_panel();
        let treatment = TreatmentSpec::new("B", 2003.0).unwrap();
        let options = SynthOptions {
            solver: SimplexQpOptions::new(1e-8, 1e-16, 1, 1e-8).unwrap(),
            missing_donor: MissingDonorPolicy::ZeroContribution,
            donor_pool: None,
        };

        // Act
        let report = run_analysis(&panel, "outcome", &treatment, &[], &options).unwrap();

        // Assert
        assert!(!report.converged);
        assert!(matches!(report.solver_status, QpStatus::FallbackUniform(_)));
        assert!((report.weights[0] - 0.5).abs() < 1e-12);
        assert!((report.weights[1] - 0.5).abs() < 1e-12);
    }
}
