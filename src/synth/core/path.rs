//! Synthetic outcome paths, gaps, and RMSPE summaries.
//!
//! Purpose
//! -------
//! Apply a solved weight vector to the donors' full outcome series to
//! produce the synthetic counterfactual path for the treated unit: one
//! [`PathPoint`] per observed treated time with the actual outcome, the
//! synthetic outcome, their gap, and the post-treatment flag. The
//! [`OutcomePath`] wrapper derives the pre/post RMSPE and their ratio,
//! the statistic the placebo tests rank.
//!
//! Key behaviors
//! -------------
//! - The path covers exactly the times where the treated unit has a
//!   non-missing outcome, restricted to the frame's evaluation window.
//! - A donor missing one period is handled per [`MissingDonorPolicy`]:
//!   contribute zero for that period (default), renormalize the observed
//!   weights, or propagate the hole as a NaN synthetic value.
//! - RMSPE over an empty window reports 0.0. The ratio follows fixed
//!   conventions: `post/pre` when the pre-RMSPE is positive, `+∞` for a
//!   perfect pre-fit with post divergence, `0.0` when both vanish, NaN
//!   only when a NaN gap poisoned a window.
//!
//! Invariants & assumptions
//! ------------------------
//! - Points are in ascending time order (inherited from the panel grid).
//! - Every success path has at least one pre-treatment point, so the
//!   pre-RMSPE denominator is never empty.
//! - Weights align 1:1 with the donor list; both come from the same
//!   [`DonorDesign`](crate::synth::core::design::DonorDesign).
//!
//! Conventions
//! -----------
//! - Gap = actual − synthetic; a positive post-treatment gap means the
//!   treated unit outgrew its synthetic control.
//!
//! Downstream usage
//! ----------------
//! - `fit_study` returns the path inside every report; the placebo engine
//!   extracts `rmspe_ratio()` per iteration and ranks them.
//!
//! Testing notes
//! -------------
//! - Unit tests cover synthesis math, all three missing-donor policies,
//!   window truncation, the RMSPE/ratio conventions, and the no-outcome
//!   error paths.
use ndarray::Array1;

use crate::synth::core::panel::Panel;
use crate::synth::core::treatment::StudyFrame;
use crate::synth::errors::{SynthError, SynthResult};

/// How the synthesizer treats a donor observation missing at one time.
///
/// - `ZeroContribution`: the missing term contributes 0 for that period
///   (reference behavior); the synthetic value leans on the observed
///   donors without rescaling.
/// - `Renormalize`: rescale the observed donors' weights to sum to one
///   for that period; falls through to NaN when every carrying donor is
///   missing.
/// - `Propagate`: any missing donor makes that period's synthetic value
///   NaN, keeping the hole visible in the path and its RMSPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDonorPolicy {
    #[default]
    ZeroContribution,
    Renormalize,
    Propagate,
}

/// One evaluated time on the outcome path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub time: f64,
    pub actual: f64,
    pub synthetic: f64,
    pub gap: f64,
    pub post: bool,
}

/// The treated unit's actual-vs-synthetic trajectory.
///
/// Derived once per solved study; immutable afterward. Summary accessors
/// recompute from the points so the path stays a plain value type.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomePath {
    points: Vec<PathPoint>,
}

impl OutcomePath {
    /// All points in ascending time order.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Number of evaluated times.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the path holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The gap series, aligned with [`points`](OutcomePath::points).
    pub fn gaps(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.gap).collect()
    }

    /// RMSPE over the pre-treatment points.
    pub fn pre_rmspe(&self) -> f64 {
        rmspe(self.points.iter().filter(|p| !p.post).map(|p| p.gap))
    }

    /// RMSPE over the post-treatment points (0.0 when there are none).
    pub fn post_rmspe(&self) -> f64 {
        rmspe(self.points.iter().filter(|p| p.post).map(|p| p.gap))
    }

    /// Post/pre RMSPE ratio under the documented conventions.
    pub fn rmspe_ratio(&self) -> f64 {
        ratio_of(self.pre_rmspe(), self.post_rmspe())
    }
}

/// Root mean squared error of a gap window; 0.0 for an empty window.
#[inline]
fn rmspe(gaps: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for gap in gaps {
        sum += gap * gap;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        (sum / count as f64).sqrt()
    }
}

/// Ratio conventions shared by paths and placebo records.
#[inline]
pub(crate) fn ratio_of(pre: f64, post: f64) -> f64 {
    if pre.is_nan() || post.is_nan() {
        f64::NAN
    } else if pre > 0.0 {
        post / pre
    } else if post > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Apply weights to the donors' outcome series.
///
/// Parameters
/// ----------
/// - `panel` / `frame`: the study being evaluated.
/// - `outcome`: outcome variable name.
/// - `donor_units`: donor names, in design order.
/// - `weights`: solved weights aligned with `donor_units`.
/// - `policy`: missing-donor handling (see [`MissingDonorPolicy`]).
///
/// Returns
/// -------
/// - The path over the treated unit's observed outcome times inside the
///   evaluation window.
///
/// Errors
/// ------
/// - [`SynthError::WeightLengthMismatch`] if weights and donors differ in
///   length.
/// - [`SynthError::UnknownUnit`] / [`SynthError::UnknownVariable`] if a
///   name does not resolve (donor lists from a design always do).
/// - [`SynthError::NoTreatedOutcome`] if the treated unit has no observed
///   outcome in the window, [`SynthError::NoPreTreatmentOutcome`] if it
///   has none before the treatment time.
pub fn synthesize_path(
    panel: &Panel, frame: &StudyFrame, outcome: &str, donor_units: &[String],
    weights: &Array1<f64>, policy: MissingDonorPolicy,
) -> SynthResult<OutcomePath> {
    if weights.len() != donor_units.len() {
        return Err(SynthError::WeightLengthMismatch {
            weights: weights.len(),
            donors: donor_units.len(),
        });
    }
    let outcome_idx = panel.require_variable(outcome)?;
    let mut donors = Vec::with_capacity(donor_units.len());
    for unit in donor_units {
        donors.push(panel.require_unit(unit)?);
    }

    let mut points = Vec::new();
    for time_idx in panel.observed_time_indices(frame.treated(), outcome_idx) {
        let time = panel.time_value(time_idx);
        if !frame.in_window(time) {
            continue;
        }
        let Some(actual) = panel.value_at(frame.treated(), outcome_idx, time_idx) else {
            continue;
        };
        let synthetic = synthetic_at(panel, outcome_idx, &donors, weights, time_idx, policy);
        points.push(PathPoint {
            time,
            actual,
            synthetic,
            gap: actual - synthetic,
            post: frame.is_post(time),
        });
    }
    if points.is_empty() {
        return Err(SynthError::NoTreatedOutcome {
            unit: panel.unit_name(frame.treated()).to_string(),
        });
    }
    if points.iter().all(|p| p.post) {
        return Err(SynthError::NoPreTreatmentOutcome {
            unit: panel.unit_name(frame.treated()).to_string(),
        });
    }
    Ok(OutcomePath { points })
}

// Weighted donor sum at one grid time, under the missing-donor policy.
#[inline]
fn synthetic_at(
    panel: &Panel, outcome_idx: usize, donors: &[usize], weights: &Array1<f64>, time_idx: usize,
    policy: MissingDonorPolicy,
) -> f64 {
    let mut weighted = 0.0;
    let mut observed_mass = 0.0;
    let mut any_missing = false;
    for (&donor, &weight) in donors.iter().zip(weights.iter()) {
        match panel.value_at(donor, outcome_idx, time_idx) {
            Some(value) => {
                weighted += weight * value;
                observed_mass += weight;
            }
            None => any_missing = true,
        }
    }
    match policy {
        MissingDonorPolicy::ZeroContribution => weighted,
        MissingDonorPolicy::Renormalize => {
            if !any_missing {
                weighted
            } else if observed_mass > 0.0 {
                weighted / observed_mass
            } else {
                f64::NAN
            }
        }
        MissingDonorPolicy::Propagate => {
            if any_missing {
                f64::NAN
            } else {
                weighted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::core::treatment::TreatmentSpec;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Synthesis math and gap/post bookkeeping.
    // - The three missing-donor policies.
    // - RMSPE and ratio conventions, window truncation, error paths.
    //
    // They intentionally DO NOT cover:
    // - Weight estimation; weights are fixed by hand here.
    // -------------------------------------------------------------------------

    // A = treated [10..14], B = [8,10,12,14,16], C = flat 12, years
    // 2000..=2004. A 50/50 B+C blend reproduces A exactly.
    fn blend_panel(c_2004: f64, a_series: [f64; 5]) -> Panel {
        let mut units = Vec::new();
        let mut times = Vec::new();
        let mut outcome = Vec::new();
        let series = [
            ("A", a_series),
            ("B", [8.0, 10.0, 12.0, 14.0, 16.0]),
            ("C", [12.0, 12.0, 12.0, 12.0, c_2004]),
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

    fn frame_for(panel: &Panel, treated: &str, time: f64) -> StudyFrame {
        let spec = TreatmentSpec::new(treated, time).unwrap();
        StudyFrame::resolve(panel, &spec, None).unwrap()
    }

    fn donor_names() -> Vec<String> {
        vec!["B".to_string(), "C".to_string()]
    }

    #[test]
    // Purpose
    // -------
    // Verify synthesis, gaps, flags, and RMSPE math for fixed weights.
    //
    // Given
    // -----
    // - Weights (1, 0): the synthetic path is donor B verbatim.
    //
    // Expect
    // ------
    // - Gaps [2, 1, 0, -1, -2]; pre-RMSPE = sqrt(5/3); post-RMSPE =
    //   sqrt(5/2); ratio = sqrt(3/2); post flags flip at 2003.
    fn path_applies_weights_and_summarizes() {
        // Arrange
        let panel = blend_panel(12.0, [10.0, 11.0, 12.0, 13.0, 14.0]);
        let frame = frame_for(&panel, "A", 2003.0);
        let weights = Array1::from(vec![1.0, 0.0]);

        // Act
        let path = synthesize_path(
            &panel,
            &frame,
            "outcome",
            &donor_names(),
            &weights,
            MissingDonorPolicy::ZeroContribution,
        )
        .unwrap();

        // Assert
        assert_eq!(path.len(), 5);
        assert_eq!(path.gaps(), vec![2.0, 1.0, 0.0, -1.0, -2.0]);
        let flags: Vec<bool> = path.points().iter().map(|p| p.post).collect();
        assert_eq!(flags, vec![false, false, false, true, true]);
        assert!((path.pre_rmspe() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((path.post_rmspe() - (5.0f64 / 2.0).sqrt()).abs() < 1e-12);
        assert!((path.rmspe_ratio() - 1.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the ratio conventions at degenerate pre-fits.
    //
    // Given
    // -----
    // - A 50/50 blend that reproduces A exactly pre-treatment, first with
    //   matching post values, then with A diverging post-treatment.
    //
    // Expect
    // ------
    // - Both windows zero → ratio 0.0; perfect pre with post divergence →
    //   ratio +∞.
    fn path_ratio_conventions_at_zero_pre() {
        // Arrange
        let weights = Array1::from(vec![0.5, 0.5]);

        // Act: exact fit everywhere.
        let exact = blend_panel(12.0, [10.0, 11.0, 12.0, 13.0, 14.0]);
        let frame = frame_for(&exact, "A", 2003.0);
        let path = synthesize_path(
            &exact,
            &frame,
            "outcome",
            &donor_names(),
            &weights,
            MissingDonorPolicy::ZeroContribution,
        )
        .unwrap();

        // Assert
        assert_eq!(path.pre_rmspe(), 0.0);
        assert_eq!(path.rmspe_ratio(), 0.0);

        // Act: perfect pre-fit, post divergence.
        let diverging = blend_panel(12.0, [10.0, 11.0, 12.0, 20.0, 20.0]);
        let frame = frame_for(&diverging, "A", 2003.0);
        let path = synthesize_path(
            &diverging,
            &frame,
            "outcome",
            &donor_names(),
            &weights,
            MissingDonorPolicy::ZeroContribution,
        )
        .unwrap();

        // Assert
        assert_eq!(path.pre_rmspe(), 0.0);
        assert!(path.post_rmspe() > 0.0);
        assert_eq!(path.rmspe_ratio(), f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Verify all three missing-donor policies on the same hole.
    //
    // Given
    // -----
    // - C's outcome missing at 2004; weights (0.5, 0.5); A = 14 at 2004.
    //
    // Expect
    // ------
    // - ZeroContribution: synthetic 8 (half of B's 16), gap 6.
    // - Renormalize: synthetic 16 (B rescaled to weight 1), gap -2.
    // - Propagate: synthetic NaN, gap NaN, post-RMSPE NaN, ratio NaN; the
    //   pre-window stays finite.
    fn path_missing_donor_policies() {
        // Arrange
        let panel = blend_panel(f64::NAN, [10.0, 11.0, 12.0, 13.0, 14.0]);
        let frame = frame_for(&panel, "A", 2003.0);
        let weights = Array1::from(vec![0.5, 0.5]);
        let run = |policy| {
            synthesize_path(&panel, &frame, "outcome", &donor_names(), &weights, policy).unwrap()
        };

        // Act
        let zero = run(MissingDonorPolicy::ZeroContribution);
        let renorm = run(MissingDonorPolicy::Renormalize);
        let propagate = run(MissingDonorPolicy::Propagate);

        // Assert
        let last = |path: &OutcomePath| path.points()[4];
        assert_eq!(last(&zero).synthetic, 8.0);
        assert_eq!(last(&zero).gap, 6.0);
        assert_eq!(last(&renorm).synthetic, 16.0);
        assert_eq!(last(&renorm).gap, -2.0);
        assert!(last(&propagate).synthetic.is_nan());
        assert!(last(&propagate).gap.is_nan());
        assert!(propagate.post_rmspe().is_nan());
        assert!(propagate.rmspe_ratio().is_nan());
        assert!((propagate.pre_rmspe() - 0.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the path skips treated holes and respects the
    // evaluation cutoff.
    //
    // Given
    // -----
    // - A's outcome missing at 2001; a frame backdated to 2002 with
    //   cutoff 2004.
    //
    // Expect
    // ------
    // - Points at {2000, 2002, 2003} only: 2001 skipped, 2004 outside the
    //   window.
    fn path_skips_holes_and_truncates() {
        // Arrange
        let panel = blend_panel(12.0, [10.0, f64::NAN, 12.0, 13.0, 14.0]);
        let spec = TreatmentSpec::new("A", 2002.0).unwrap();
        let frame = StudyFrame::resolve_truncated(&panel, &spec, None, Some(2004.0)).unwrap();
        let weights = Array1::from(vec![0.5, 0.5]);

        // Act
        let path = synthesize_path(
            &panel,
            &frame,
            "outcome",
            &donor_names(),
            &weights,
            MissingDonorPolicy::ZeroContribution,
        )
        .unwrap();

        // Assert
        let times: Vec<f64> = path.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![2000.0, 2002.0, 2003.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the error paths for unusable treated outcomes and misaligned
    // weights.
    //
    // Given
    // -----
    // - A with no observed outcome at all; A observed only
    //   post-treatment; a weight vector of the wrong length.
    //
    // Expect
    // ------
    // - NoTreatedOutcome, NoPreTreatmentOutcome, WeightLengthMismatch.
    fn path_error_paths() {
        // Arrange
        let weights = Array1::from(vec![0.5, 0.5]);

        // Act / Assert: nothing observed.
        let empty = blend_panel(12.0, [f64::NAN; 5]);
        let frame = frame_for(&empty, "A", 2003.0);
        assert_eq!(
            synthesize_path(
                &empty,
                &frame,
                "outcome",
                &donor_names(),
                &weights,
                MissingDonorPolicy::ZeroContribution,
            )
            .unwrap_err(),
            SynthError::NoTreatedOutcome { unit: "A".to_string() }
        );

        // Act / Assert: only post-treatment observations.
        let post_only = blend_panel(12.0, [f64::NAN, f64::NAN, f64::NAN, 13.0, 14.0]);
        let frame = frame_for(&post_only, "A", 2003.0);
        assert_eq!(
            synthesize_path(
                &post_only,
                &frame,
                "outcome",
                &donor_names(),
                &weights,
                MissingDonorPolicy::ZeroContribution,
            )
            .unwrap_err(),
            SynthError::NoPreTreatmentOutcome { unit: "A".to_string() }
        );

        // Act / Assert: weight misalignment.
        let panel = blend_panel(12.0, [10.0, 11.0, 12.0, 13.0, 14.0]);
        let frame = frame_for(&panel, "A", 2003.0);
        let short = Array1::from(vec![1.0]);
        assert_eq!(
            synthesize_path(
                &panel,
                &frame,
                "outcome",
                &donor_names(),
                &short,
                MissingDonorPolicy::ZeroContribution,
            )
            .unwrap_err(),
            SynthError::WeightLengthMismatch { weights: 1, donors: 2 }
        );
    }
}
