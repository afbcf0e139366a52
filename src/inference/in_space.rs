//! In-space placebo: rotate the treatment across every donor.
//!
//! Purpose
//! -------
//! Estimate how extreme the treated unit's post/pre RMSPE ratio is by
//! pretending, one at a time, that each donor was the treated unit and
//! re-running the full pipeline (design → weights → path) for it. The
//! real treated unit's rank among all these ratios is the permutation
//! p-value: if placebo units routinely produce ratios as large as the
//! treated unit's, the observed divergence is unremarkable.
//!
//! Key behaviors
//! -------------
//! - Iterations: the real treated unit first (the reference run), then
//!   every donor in pool order. Each runs with the donor pool minus
//!   itself; the real treated unit never enters a placebo pool unless the
//!   re-inclusion fallback fires.
//! - Re-inclusion fallback: excluding unit `u` from a two-donor pool
//!   would leave one donor; when
//!   [`PlaceboOptions::reinclude_treated`] is set, the real treated unit
//!   joins `u`'s pool and the record is flagged, never silent.
//! - One failed iteration is recorded and excluded; the batch continues.
//!   Exceptions: a failed reference run aborts (no reference ratio), and
//!   cancellation between iterations discards the batch.
//! - `p_value` = fraction of successful units (treated included) with
//!   ratio ≥ the treated unit's ratio; `∞ ≥ ∞` holds, so a perfect
//!   pre-fit with post divergence still ranks itself.
//!
//! Invariants & assumptions
//! ------------------------
//! - Records keep plan order (treated first, then donors); parallel and
//!   sequential execution produce identical results.
//! - `successful_count + failures.len() == attempted_count` on every
//!   success path; `attempted_count` counts planned iterations, all of
//!   which ran (cancellation returns `Err` instead).
//! - `p_value ∈ [1/n, 1]` for n successful units, or NaN when a NaN gap
//!   poisoned the treated ratio under a propagating missing-donor
//!   policy.
//!
//! Conventions
//! -----------
//! - Each iteration is a pure function of the shared panel and its own
//!   plan; worker threads share nothing mutable but the progress
//!   counter.
//!
//! Downstream usage
//! ----------------
//! - Callers render `records` as the classic spaghetti plot (one gap
//!   series per unit) and quote `p_value` next to the main analysis.
//!
//! Testing notes
//! -------------
//! - Unit tests cover ranking against a hand-built hull fixture,
//!   self-consistency with `run_analysis`, the re-inclusion fallback,
//!   failure recording, cancellation, callback sequencing, and
//!   parallel/sequential agreement.
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::inference::errors::{PlaceboError, PlaceboResult};
use crate::inference::progress::{IterationUpdate, PlaceboObserver};
use crate::inference::types::PlaceboOptions;
use crate::synth::core::options::SynthOptions;
use crate::synth::core::panel::Panel;
use crate::synth::core::path::OutcomePath;
use crate::synth::core::predictors::PredictorSpec;
use crate::synth::core::treatment::{MIN_DONORS, StudyFrame, TreatmentSpec};
use crate::synth::errors::SynthError;
use crate::synth::models::pipeline::fit_study;

/// One unit's placebo result.
///
/// - `unit`: who played the treated unit in this iteration.
/// - `path`: its actual-vs-synthetic trajectory.
/// - `pre_rmspe` / `post_rmspe` / `ratio`: the ranked fit summaries.
/// - `is_treated`: whether this is the real treated unit's reference run.
/// - `reincluded_treated`: whether the re-inclusion fallback put the real
///   treated unit into this unit's donor pool.
/// - `converged`: the weight solver's verdict for this iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceboRecord {
    pub unit: String,
    pub path: OutcomePath,
    pub pre_rmspe: f64,
    pub post_rmspe: f64,
    pub ratio: f64,
    pub is_treated: bool,
    pub reincluded_treated: bool,
    pub converged: bool,
}

/// One unit whose placebo pipeline failed; excluded from aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceboFailure {
    pub unit: String,
    pub error: SynthError,
}

/// Aggregate result of an in-space placebo batch.
///
/// `records` keeps plan order: the treated unit's reference run first,
/// then donors in pool order, minus any failures.
#[derive(Debug, Clone, PartialEq)]
pub struct InSpacePlacebo {
    pub records: Vec<PlaceboRecord>,
    pub failures: Vec<PlaceboFailure>,
    pub treated_ratio: f64,
    pub p_value: f64,
    pub successful_count: usize,
    pub attempted_count: usize,
}

impl InSpacePlacebo {
    /// The real treated unit's reference record.
    pub fn treated_record(&self) -> Option<&PlaceboRecord> {
        self.records.iter().find(|r| r.is_treated)
    }
}

// One planned iteration: who is "treated" and with which pool.
struct UnitPlan {
    unit: String,
    pool: Vec<String>,
    is_treated: bool,
    reincluded: bool,
}

enum UnitOutcome {
    Done(PlaceboRecord),
    Failed(PlaceboFailure),
    Cancelled,
}

// Shared read-only state for one batch; everything here is Sync so
// iterations can run on worker threads.
struct BatchContext<'a> {
    panel: &'a Panel,
    outcome: &'a str,
    treatment: &'a TreatmentSpec,
    predictors: &'a [PredictorSpec],
    options: &'a SynthOptions,
    observer: &'a dyn PlaceboObserver,
    completed: &'a AtomicUsize,
    total: usize,
}

/// Run the in-space placebo batch.
///
/// Parameters
/// ----------
/// - `panel` / `outcome` / `treatment` / `predictors` / `options`: the
///   same arguments as
///   [`run_analysis`](crate::synth::models::analysis::run_analysis); every
///   iteration reuses them with a rotated treated unit.
/// - `placebo`: batch options (execution mode, re-inclusion fallback).
/// - `observer`: progress/cancellation hooks; use
///   [`SilentObserver`](crate::inference::progress::SilentObserver) for
///   batch callers.
///
/// Returns
/// -------
/// - The aggregate with per-unit records, recorded failures, the treated
///   unit's reference ratio, and the rank p-value.
///
/// Errors
/// ------
/// - [`PlaceboError::Study`] when the batch configuration itself is
///   invalid (via the reference frame resolution).
/// - [`PlaceboError::TreatedRunFailed`] when the reference run fails.
/// - [`PlaceboError::Cancelled`] when the observer aborts the batch.
pub fn run_in_space_placebo(
    panel: &Panel, outcome: &str, treatment: &TreatmentSpec, predictors: &[PredictorSpec],
    options: &SynthOptions, placebo: &PlaceboOptions, observer: &dyn PlaceboObserver,
) -> PlaceboResult<InSpacePlacebo> {
    let frame = StudyFrame::resolve(panel, treatment, options.donor_pool.as_deref())?;
    let donor_names: Vec<String> =
        frame.donors().iter().map(|&idx| panel.unit_name(idx).to_string()).collect();
    let plans = plan_units(&treatment.treated_unit, &donor_names, placebo.reinclude_treated);
    let total = plans.len();
    observer.on_start(total);

    let completed = AtomicUsize::new(0);
    let ctx = BatchContext {
        panel,
        outcome,
        treatment,
        predictors,
        options,
        observer,
        completed: &completed,
        total,
    };
    let outcomes: Vec<UnitOutcome> = if placebo.parallel {
        plans.par_iter().map(|plan| run_unit(&ctx, plan)).collect()
    } else {
        plans.iter().map(|plan| run_unit(&ctx, plan)).collect()
    };

    let mut records = Vec::new();
    let mut failures = Vec::new();
    let mut cancelled = false;
    for outcome in outcomes {
        match outcome {
            UnitOutcome::Done(record) => records.push(record),
            UnitOutcome::Failed(failure) => failures.push(failure),
            UnitOutcome::Cancelled => cancelled = true,
        }
    }
    if cancelled {
        return Err(PlaceboError::Cancelled {
            completed: records.len() + failures.len(),
            attempted: total,
        });
    }
    let treated_ratio = match records.iter().find(|r| r.is_treated) {
        Some(record) => record.ratio,
        None => {
            let error = failures
                .iter()
                .find(|f| f.unit == treatment.treated_unit)
                .map(|f| f.error.clone())
                .unwrap_or(SynthError::UnknownUnit { unit: treatment.treated_unit.clone() });
            return Err(PlaceboError::TreatedRunFailed { error });
        }
    };
    let p_value = if treated_ratio.is_nan() {
        f64::NAN
    } else {
        let extreme = records.iter().filter(|r| r.ratio >= treated_ratio).count();
        extreme as f64 / records.len() as f64
    };
    Ok(InSpacePlacebo {
        successful_count: records.len(),
        attempted_count: records.len() + failures.len(),
        records,
        failures,
        treated_ratio,
        p_value,
    })
}

// Treated reference first, then one plan per donor with itself excluded.
fn plan_units(treated: &str, donors: &[String], reinclude: bool) -> Vec<UnitPlan> {
    let mut plans = Vec::with_capacity(donors.len() + 1);
    plans.push(UnitPlan {
        unit: treated.to_string(),
        pool: donors.to_vec(),
        is_treated: true,
        reincluded: false,
    });
    for unit in donors {
        let mut pool: Vec<String> = donors.iter().filter(|d| *d != unit).cloned().collect();
        let mut reincluded = false;
        if pool.len() < MIN_DONORS && reinclude {
            pool.push(treated.to_string());
            reincluded = true;
        }
        plans.push(UnitPlan { unit: unit.clone(), pool, is_treated: false, reincluded });
    }
    plans
}

// One iteration: cancellation gate, rotated fit, progress callback.
fn run_unit(ctx: &BatchContext<'_>, plan: &UnitPlan) -> UnitOutcome {
    if ctx.observer.should_cancel() {
        return UnitOutcome::Cancelled;
    }
    let result = placebo_spec(ctx.treatment, plan).and_then(|spec| {
        let mut run_options = ctx.options.clone();
        run_options.donor_pool = Some(plan.pool.clone());
        fit_study(ctx.panel, ctx.outcome, &spec, ctx.predictors, &run_options, None)
    });
    let done = ctx.completed.fetch_add(1, Ordering::SeqCst) + 1;
    match result {
        Ok(fit) => {
            ctx.observer.on_iteration(&IterationUpdate {
                label: plan.unit.clone(),
                completed: done,
                total: ctx.total,
                failed: false,
            });
            UnitOutcome::Done(PlaceboRecord {
                unit: plan.unit.clone(),
                pre_rmspe: fit.pre_rmspe(),
                post_rmspe: fit.post_rmspe(),
                ratio: fit.rmspe_ratio(),
                path: fit.path,
                is_treated: plan.is_treated,
                reincluded_treated: plan.reincluded,
                converged: fit.qp.converged,
            })
        }
        Err(error) => {
            ctx.observer.on_iteration(&IterationUpdate {
                label: plan.unit.clone(),
                completed: done,
                total: ctx.total,
                failed: true,
            });
            UnitOutcome::Failed(PlaceboFailure { unit: plan.unit.clone(), error })
        }
    }
}

#[inline]
fn placebo_spec(
    treatment: &TreatmentSpec, plan: &UnitPlan,
) -> Result<TreatmentSpec, SynthError> {
    if plan.is_treated {
        Ok(treatment.clone())
    } else {
        treatment.for_unit(&plan.unit)
    }
}
