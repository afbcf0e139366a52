//! In-time placebo: backdate the treatment on the real treated unit.
//!
//! Purpose
//! -------
//! Probe whether the estimated effect is an artifact of the pipeline by
//! pretending the treatment happened earlier than it did. Each candidate
//! fake time is screened against minimum-period rules, then run through
//! the full pipeline with the treatment backdated and the evaluation
//! window truncated at the real treatment time. A fake treatment that
//! "finds" an effect where none could exist undermines the real one.
//!
//! Key behaviors
//! -------------
//! - Screening first: a candidate is skipped (with a recorded
//!   [`SkipReason`], never a crash) when it is non-finite, not strictly
//!   before the real treatment time, or leaves fewer than
//!   [`PlaceboOptions::min_pre_fake`] grid times before it or fewer than
//!   [`PlaceboOptions::min_post_fake`] grid times in `[fake, real)`.
//! - Every surviving candidate runs with treatment time = fake time and a
//!   hard evaluation cutoff at the real treatment time, so no iteration
//!   ever peeks past the actual intervention.
//! - One failed iteration is recorded and excluded; the batch continues.
//!   Zero eligible candidates or zero successful runs are batch errors.
//! - No combined p-value: callers inspect the per-date ratio table (and
//!   may rank it themselves when many fake dates are tested).
//!
//! Invariants & assumptions
//! ------------------------
//! - `records` keeps eligible-candidate order; `skipped` keeps original
//!   candidate order. Parallel and sequential runs produce identical
//!   results.
//! - `successful_count + failures.len() == attempted_count`, and
//!   `attempted_count` counts eligible candidates only (skips excluded).
//! - Screening counts grid times, matching how the frame resolution
//!   partitions them; a candidate passing the screen can still fail in
//!   resolution when `min_pre_fake` is configured below the study
//!   minimum.
//!
//! Conventions
//! -----------
//! - The pre/post split inside each record is relative to the FAKE time:
//!   `post = true` covers `[fake, real)`.
//!
//! Downstream usage
//! ----------------
//! - Callers render per-date gap paths next to the real analysis and
//!   compare each fake date's post/pre ratio with the real one.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the screening rules (including the minimum-period
//!   rejections), truncation at the real treatment time, failure
//!   recording, the zero-eligible and zero-successful batch errors,
//!   cancellation, and parallel/sequential agreement.
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::inference::errors::{PlaceboError, PlaceboResult};
use crate::inference::progress::{IterationUpdate, PlaceboObserver};
use crate::inference::types::PlaceboOptions;
use crate::synth::core::options::SynthOptions;
use crate::synth::core::panel::Panel;
use crate::synth::core::path::OutcomePath;
use crate::synth::core::predictors::PredictorSpec;
use crate::synth::core::treatment::{StudyFrame, TreatmentSpec};
use crate::synth::errors::SynthError;
use crate::synth::models::pipeline::fit_study;

/// Why a candidate fake time never ran.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// The candidate is NaN or infinite.
    NonFiniteTime,
    /// The candidate is at or after the real treatment time.
    NotBeforeTreatment,
    /// Fewer grid times before the candidate than `min_pre_fake`.
    TooFewPreFake { found: usize, required: usize },
    /// Fewer grid times in `[fake, real)` than `min_post_fake`.
    TooFewPostFake { found: usize, required: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NonFiniteTime => write!(f, "fake time is not a finite number"),
            SkipReason::NotBeforeTreatment => {
                write!(f, "fake time is not strictly before the real treatment time")
            }
            SkipReason::TooFewPreFake { found, required } => {
                write!(f, "only {found} pre-fake period(s), need {required}")
            }
            SkipReason::TooFewPostFake { found, required } => {
                write!(
                    f,
                    "only {found} period(s) between the fake and real treatment times, \
                     need {required}"
                )
            }
        }
    }
}

/// A candidate that failed screening, with the first rule it broke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedFakeTime {
    pub fake_time: f64,
    pub reason: SkipReason,
}

/// One fake date's placebo result.
///
/// The path ends strictly before the real treatment time; its pre/post
/// split (and the RMSPE summaries) are relative to `fake_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeTimeRecord {
    pub fake_time: f64,
    pub path: OutcomePath,
    pub pre_rmspe: f64,
    pub post_rmspe: f64,
    pub ratio: f64,
    pub converged: bool,
}

/// One fake date whose pipeline failed; excluded from aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeTimeFailure {
    pub fake_time: f64,
    pub error: SynthError,
}

/// Aggregate result of an in-time placebo batch.
///
/// `records` keeps eligible-candidate order minus any failures; `skipped`
/// keeps the caller's candidate order.
#[derive(Debug, Clone, PartialEq)]
pub struct InTimePlacebo {
    pub records: Vec<FakeTimeRecord>,
    pub skipped: Vec<SkippedFakeTime>,
    pub failures: Vec<FakeTimeFailure>,
    pub successful_count: usize,
    pub attempted_count: usize,
}

enum FakeOutcome {
    Done(FakeTimeRecord),
    Failed(FakeTimeFailure),
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
    real_time: f64,
    observer: &'a dyn PlaceboObserver,
    completed: &'a AtomicUsize,
    total: usize,
}

/// Run the in-time placebo batch.
///
/// Parameters
/// ----------
/// - `panel` / `outcome` / `treatment` / `predictors` / `options`: the
///   same arguments as
///   [`run_analysis`](crate::synth::models::analysis::run_analysis);
///   `treatment.treatment_time` is the REAL treatment time.
/// - `candidate_fake_times`: proposed fake treatment times, screened
///   before running; order is preserved in `skipped` and `records`.
/// - `placebo`: batch options (execution mode, minimum period counts).
/// - `observer`: progress/cancellation hooks.
///
/// Returns
/// -------
/// - The aggregate with per-date records, screened-out candidates, and
///   recorded failures.
///
/// Errors
/// ------
/// - [`PlaceboError::Study`] when the real study configuration is invalid.
/// - [`PlaceboError::NoEligibleFakeTimes`] when screening rejects every
///   candidate (or none were supplied).
/// - [`PlaceboError::NoSuccessfulRuns`] when every eligible candidate's
///   pipeline failed.
/// - [`PlaceboError::Cancelled`] when the observer aborts the batch.
pub fn run_in_time_placebo(
    panel: &Panel, outcome: &str, treatment: &TreatmentSpec, candidate_fake_times: &[f64],
    predictors: &[PredictorSpec], options: &SynthOptions, placebo: &PlaceboOptions,
    observer: &dyn PlaceboObserver,
) -> PlaceboResult<InTimePlacebo> {
    // The real study must be well-formed before any backdating starts.
    StudyFrame::resolve(panel, treatment, options.donor_pool.as_deref())?;

    let (eligible, skipped) =
        screen_candidates(panel, treatment.treatment_time, candidate_fake_times, placebo);
    if eligible.is_empty() {
        return Err(PlaceboError::NoEligibleFakeTimes {
            candidates: candidate_fake_times.len(),
        });
    }
    let total = eligible.len();
    observer.on_start(total);

    let completed = AtomicUsize::new(0);
    let ctx = BatchContext {
        panel,
        outcome,
        treatment,
        predictors,
        options,
        real_time: treatment.treatment_time,
        observer,
        completed: &completed,
        total,
    };
    let outcomes: Vec<FakeOutcome> = if placebo.parallel {
        eligible.par_iter().map(|&fake| run_fake(&ctx, fake)).collect()
    } else {
        eligible.iter().map(|&fake| run_fake(&ctx, fake)).collect()
    };

    let mut records = Vec::new();
    let mut failures = Vec::new();
    let mut cancelled = false;
    for outcome in outcomes {
        match outcome {
            FakeOutcome::Done(record) => records.push(record),
            FakeOutcome::Failed(failure) => failures.push(failure),
            FakeOutcome::Cancelled => cancelled = true,
        }
    }
    if cancelled {
        return Err(PlaceboError::Cancelled {
            completed: records.len() + failures.len(),
            attempted: total,
        });
    }
    if records.is_empty() {
        return Err(PlaceboError::NoSuccessfulRuns { attempted: total });
    }
    Ok(InTimePlacebo {
        successful_count: records.len(),
        attempted_count: total,
        records,
        skipped,
        failures,
    })
}

// First broken rule wins; candidates passing every rule run in order.
fn screen_candidates(
    panel: &Panel, real_time: f64, candidates: &[f64], placebo: &PlaceboOptions,
) -> (Vec<f64>, Vec<SkippedFakeTime>) {
    let mut eligible = Vec::new();
    let mut skipped = Vec::new();
    for &fake in candidates {
        match screen_one(panel, real_time, fake, placebo) {
            Some(reason) => skipped.push(SkippedFakeTime { fake_time: fake, reason }),
            None => eligible.push(fake),
        }
    }
    (eligible, skipped)
}

fn screen_one(
    panel: &Panel, real_time: f64, fake: f64, placebo: &PlaceboOptions,
) -> Option<SkipReason> {
    if !fake.is_finite() {
        return Some(SkipReason::NonFiniteTime);
    }
    if fake >= real_time {
        return Some(SkipReason::NotBeforeTreatment);
    }
    let pre = panel.time_indices_before(fake).len();
    if pre < placebo.min_pre_fake {
        return Some(SkipReason::TooFewPreFake { found: pre, required: placebo.min_pre_fake });
    }
    let post = panel.times().iter().filter(|&&t| t >= fake && t < real_time).count();
    if post < placebo.min_post_fake {
        return Some(SkipReason::TooFewPostFake {
            found: post,
            required: placebo.min_post_fake,
        });
    }
    None
}

// One iteration: cancellation gate, backdated fit truncated at the real
// treatment time, progress callback.
fn run_fake(ctx: &BatchContext<'_>, fake: f64) -> FakeOutcome {
    if ctx.observer.should_cancel() {
        return FakeOutcome::Cancelled;
    }
    let result = ctx.treatment.at_time(fake).and_then(|spec| {
        fit_study(ctx.panel, ctx.outcome, &spec, ctx.predictors, ctx.options, Some(ctx.real_time))
    });
    let done = ctx.completed.fetch_add(1, Ordering::SeqCst) + 1;
    match result {
        Ok(fit) => {
            ctx.observer.on_iteration(&IterationUpdate {
                label: fake.to_string(),
                completed: done,
                total: ctx.total,
                failed: false,
            });
            FakeOutcome::Done(FakeTimeRecord {
                fake_time: fake,
                pre_rmspe: fit.pre_rmspe(),
                post_rmspe: fit.post_rmspe(),
                ratio: fit.rmspe_ratio(),
                path: fit.path,
                converged: fit.qp.converged,
            })
        }
        Err(error) => {
            ctx.observer.on_iteration(&IterationUpdate {
                label: fake.to_string(),
                completed: done,
                total: ctx.total,
                failed: true,
            });
            FakeOutcome::Failed(FakeTimeFailure { fake_time: fake, error })
        }
    }
}
