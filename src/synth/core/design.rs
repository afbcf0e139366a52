//! Donor design construction: predictor aggregation into solver inputs.
//!
//! Purpose
//! -------
//! Turn a panel, a resolved [`StudyFrame`], and an ordered list of
//! [`PredictorSpec`]s into the numeric problem the weight solver consumes:
//! the treated unit's predictor vector `x₁` (length K) and the donor
//! matrix `X₀` (J×K, one row per donor), with aligned donor names and
//! column labels.
//!
//! Key behaviors
//! -------------
//! - Regular predictors average over every pre-treatment time; special
//!   predictors average over their window intersected with the
//!   pre-period. An empty intersection silently discards the entry.
//! - When no columns survive (or none were specified), the design falls
//!   back to one column per distinct pre-treatment time holding the
//!   outcome value at that time, so matching runs on the outcome's own
//!   pre-treatment trajectory.
//! - Aggregation means exclude missing cells. A treated-unit aggregate
//!   with no observations is a hard error; a donor in the same position
//!   is excluded from the pool and reported in `excluded_donors`.
//! - After exclusions the pool must still hold at least two donors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `donors.nrows() == donor_units.len()`, `donors.ncols() ==
//!   treated.len() == columns.len()`, and K ≥ 1 on every success path.
//! - Donor rows keep the frame's donor order minus exclusions; weight
//!   vectors align 1:1 with `donor_units`.
//! - All matrix entries are finite (panels reject ±∞, missing aggregates
//!   never reach the matrix).
//!
//! Conventions
//! -----------
//! - Column labels: bare variable name for regular entries,
//!   `var[start..end]` for special entries, `outcome@time` for fallback
//!   columns.
//!
//! Downstream usage
//! ----------------
//! - `fit_study` hands `treated`/`donors` to the simplex QP solver and
//!   carries `donor_units` into the weight report.
//! - `PredictorBalance` rows are labelled by `columns`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover aggregation math, window intersection and discard,
//!   the fallback design, treated/donor missing-aggregate handling, and
//!   the post-exclusion donor minimum.
use ndarray::{Array1, Array2};

use crate::synth::core::panel::Panel;
use crate::synth::core::predictors::PredictorSpec;
use crate::synth::core::treatment::{MIN_DONORS, StudyFrame};
use crate::synth::errors::{SynthError, SynthResult};

/// Solver-ready predictor design for one study.
///
/// - `treated`: the treated unit's aggregated predictor vector (K).
/// - `donors`: donor aggregates, one row per surviving donor (J×K).
/// - `donor_units`: donor names aligned with the rows of `donors`.
/// - `columns`: design-column labels aligned with the columns.
/// - `excluded_donors`: donors dropped for a fully-missing aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorDesign {
    pub treated: Array1<f64>,
    pub donors: Array2<f64>,
    pub donor_units: Vec<String>,
    pub columns: Vec<String>,
    pub excluded_donors: Vec<String>,
}

impl DonorDesign {
    /// Number of surviving donors (rows of the donor matrix).
    pub fn n_donors(&self) -> usize {
        self.donor_units.len()
    }

    /// Number of design columns.
    pub fn n_predictors(&self) -> usize {
        self.columns.len()
    }
}

// One planned design column: label, aggregation times, source variable.
struct ColumnPlan {
    label: String,
    times: Vec<usize>,
    variable: usize,
}

/// Build the donor design for a resolved study.
///
/// Parameters
/// ----------
/// - `panel`: the validated dataset.
/// - `frame`: resolved treated/donor indices and pre-period.
/// - `outcome`: outcome variable name (drives the fallback design).
/// - `predictors`: ordered predictor entries; may be empty.
///
/// Returns
/// -------
/// - `Ok(DonorDesign)` with K ≥ 1 columns and ≥ 2 donor rows.
///
/// Errors
/// ------
/// - [`SynthError::UnknownVariable`] if the outcome or a predictor names
///   a variable absent from the panel.
/// - [`SynthError::MissingTreatedPredictor`] if the treated unit has no
///   observation in some column's window.
/// - [`SynthError::InsufficientDonors`] if missing-aggregate exclusions
///   leave fewer than two donors.
pub fn build_design(
    panel: &Panel, frame: &StudyFrame, outcome: &str, predictors: &[PredictorSpec],
) -> SynthResult<DonorDesign> {
    let outcome_idx = panel.require_variable(outcome)?;
    let plans = plan_columns(panel, frame, outcome, outcome_idx, predictors)?;

    // Treated vector first: a hole here fails the study outright.
    let mut treated = Vec::with_capacity(plans.len());
    for plan in &plans {
        match panel.mean_over(frame.treated(), plan.variable, &plan.times) {
            Some(value) => treated.push(value),
            None => {
                return Err(SynthError::MissingTreatedPredictor { column: plan.label.clone() })
            }
        }
    }

    // Donor rows: a hole excludes the donor, never the study.
    let mut donor_units = Vec::new();
    let mut excluded_donors = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for &donor in frame.donors() {
        let mut row = Vec::with_capacity(plans.len());
        let complete = plans.iter().all(|plan| {
            match panel.mean_over(donor, plan.variable, &plan.times) {
                Some(value) => {
                    row.push(value);
                    true
                }
                None => false,
            }
        });
        if complete {
            donor_units.push(panel.unit_name(donor).to_string());
            rows.push(row);
        } else {
            excluded_donors.push(panel.unit_name(donor).to_string());
        }
    }
    if donor_units.len() < MIN_DONORS {
        return Err(SynthError::InsufficientDonors {
            found: donor_units.len(),
            required: MIN_DONORS,
        });
    }

    let mut donors = Array2::zeros((rows.len(), plans.len()));
    for (r, row) in rows.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            donors[[r, c]] = value;
        }
    }
    Ok(DonorDesign {
        treated: Array1::from(treated),
        donors,
        donor_units,
        columns: plans.into_iter().map(|plan| plan.label).collect(),
        excluded_donors,
    })
}

// Resolve predictor entries into column plans, applying window
// intersection and the outcome-trajectory fallback.
fn plan_columns(
    panel: &Panel, frame: &StudyFrame, outcome: &str, outcome_idx: usize,
    predictors: &[PredictorSpec],
) -> SynthResult<Vec<ColumnPlan>> {
    let mut plans = Vec::new();
    for spec in predictors {
        let variable = panel.require_variable(spec.variable())?;
        let times = match spec {
            PredictorSpec::Regular { .. } => frame.pre_times().to_vec(),
            PredictorSpec::Special { start, end, .. } => {
                let windowed = panel.time_indices_within(*start, *end);
                let times: Vec<usize> = windowed
                    .into_iter()
                    .filter(|idx| frame.pre_times().binary_search(idx).is_ok())
                    .collect();
                if times.is_empty() {
                    // Window misses the pre-period entirely: contributes
                    // nothing rather than erroring.
                    continue;
                }
                times
            }
        };
        plans.push(ColumnPlan { label: spec.label(), times, variable });
    }
    if plans.is_empty() {
        for &time_idx in frame.pre_times() {
            plans.push(ColumnPlan {
                label: format!("{outcome}@{}", panel.time_value(time_idx)),
                times: vec![time_idx],
                variable: outcome_idx,
            });
        }
    }
    Ok(plans)
}
