//! Treatment specification and its resolution against a panel.
//!
//! Purpose
//! -------
//! Define *who* is treated and *when*, validate that early, and resolve the
//! specification against a concrete [`Panel`] into a [`StudyFrame`]: dense
//! treated/donor indices plus the pre/post partition of the time grid. The
//! frame is what the design builder, synthesizer, and placebo engine
//! actually consume.
//!
//! Key behaviors
//! -------------
//! - [`TreatmentSpec::new`] validates the raw specification (non-empty
//!   unit, finite time) independent of any panel.
//! - [`StudyFrame::resolve`] applies the spec to a panel: resolves the
//!   treated unit, assembles the donor pool (every other unit, or an
//!   explicit restriction), and splits the time grid at the threshold.
//! - Fail-fast minimums: at least [`MIN_PRE_PERIODS`] distinct
//!   pre-treatment times and at least [`MIN_DONORS`] donors, checked here
//!   before any aggregation or optimization is attempted.
//! - An optional evaluation cutoff truncates the post window (used by the
//!   in-time placebo so a backdated study never peeks past the real
//!   intervention).
//!
//! Invariants & assumptions
//! ------------------------
//! - Pre-period = grid times strictly `<` the threshold; post-period =
//!   grid times `>=` the threshold (and `<` the cutoff when set).
//! - A donor restriction may not name unknown units; the treated unit in a
//!   restriction is ignored (donors are by definition everyone else).
//! - Frames hold dense indices only, no borrows, so placebo iterations can
//!   carry them across worker threads freely.
//!
//! Conventions
//! -----------
//! - Donor order: first-appearance panel order (or restriction order when
//!   one is given, deduplicated). Weights align 1:1 with this order.
//!
//! Downstream usage
//! ----------------
//! - `build_design(panel, frame, …)` aggregates predictors over
//!   `frame.pre_times()`.
//! - `synthesize_path(panel, frame, …)` walks the treated unit's observed
//!   outcome times and labels them with `frame.is_post(...)`.
//! - The placebo engine constructs one spec + frame per iteration.
//!
//! Testing notes
//! -------------
//! - Unit tests cover spec validation, partitioning, fail-fast minimums,
//!   donor restrictions (including unknown names and treated-in-pool), and
//!   cutoff truncation.
use crate::synth::core::panel::Panel;
use crate::synth::errors::{SynthError, SynthResult};

/// Minimum distinct pre-treatment time values for any study.
pub const MIN_PRE_PERIODS: usize = 2;

/// Minimum donor-pool size for any study.
pub const MIN_DONORS: usize = 2;

/// Treatment specification: which unit, from when.
///
/// - `treated_unit`: panel unit id of the treated unit.
/// - `treatment_time`: threshold; times strictly before it are
///   pre-treatment, times at or after it are post-treatment.
///
/// Invariant: non-empty unit id, finite threshold (enforced by [`new`]).
///
/// [`new`]: TreatmentSpec::new
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentSpec {
    pub treated_unit: String,
    pub treatment_time: f64,
}

impl TreatmentSpec {
    /// Construct a validated treatment specification.
    ///
    /// # Errors
    /// - [`SynthError::EmptyUnitName`] if `treated_unit` is empty.
    /// - [`SynthError::NonFiniteTreatmentTime`] if the threshold is NaN or
    ///   ±∞.
    pub fn new(treated_unit: impl Into<String>, treatment_time: f64) -> SynthResult<Self> {
        let treated_unit = treated_unit.into();
        if treated_unit.is_empty() {
            return Err(SynthError::EmptyUnitName);
        }
        if !treatment_time.is_finite() {
            return Err(SynthError::NonFiniteTreatmentTime { value: treatment_time });
        }
        Ok(TreatmentSpec { treated_unit, treatment_time })
    }

    /// The same treatment applied to a different unit (placebo rotation).
    pub fn for_unit(&self, unit: impl Into<String>) -> SynthResult<Self> {
        TreatmentSpec::new(unit, self.treatment_time)
    }

    /// The same unit treated at a different time (in-time backdating).
    pub fn at_time(&self, treatment_time: f64) -> SynthResult<Self> {
        TreatmentSpec::new(self.treated_unit.clone(), treatment_time)
    }
}

/// StudyFrame — a treatment spec resolved against one panel.
///
/// Purpose
/// -------
/// Freeze the study's structure before any numerics run: dense treated and
/// donor indices, the pre/post split of the time grid, and the optional
/// evaluation cutoff. Every downstream stage reads structure from here, so
/// the fail-fast configuration checks live in exactly one place.
///
/// Key behaviors
/// -------------
/// - Resolution errors are the spec's configuration taxonomy: unknown
///   units, insufficient pre-periods, insufficient donors.
/// - Post-times respect the cutoff; pre-times never need truncation
///   because a meaningful cutoff lies at or after the threshold.
///
/// Invariants
/// ----------
/// - `donors` is non-empty (≥ [`MIN_DONORS`]) and never contains
///   `treated`.
/// - `pre_times` has ≥ [`MIN_PRE_PERIODS`] entries; both partitions are
///   ascending grid indices.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyFrame {
    treated: usize,
    donors: Vec<usize>,
    pre_times: Vec<usize>,
    post_times: Vec<usize>,
    treatment_time: f64,
    cutoff: Option<f64>,
}

impl StudyFrame {
    /// Resolve a spec against a panel with the full evaluation window.
    ///
    /// Parameters
    /// ----------
    /// - `panel`: the validated dataset.
    /// - `spec`: treated unit + threshold.
    /// - `donor_pool`: optional restriction; `None` means every unit other
    ///   than the treated one. Entries must exist in the panel; a listed
    ///   treated unit is ignored; duplicates collapse, keeping first
    ///   position.
    ///
    /// Errors
    /// ------
    /// - [`SynthError::UnknownUnit`] for the treated unit or any
    ///   restriction entry absent from the panel.
    /// - [`SynthError::InsufficientPrePeriods`] /
    ///   [`SynthError::InsufficientDonors`] for the fail-fast minimums.
    pub fn resolve(
        panel: &Panel, spec: &TreatmentSpec, donor_pool: Option<&[String]>,
    ) -> SynthResult<Self> {
        Self::resolve_truncated(panel, spec, donor_pool, None)
    }

    /// Resolve with an evaluation cutoff: only grid times strictly before
    /// `cutoff` enter the post window. Used by the in-time placebo with
    /// `cutoff` = the real treatment time.
    pub fn resolve_truncated(
        panel: &Panel, spec: &TreatmentSpec, donor_pool: Option<&[String]>, cutoff: Option<f64>,
    ) -> SynthResult<Self> {
        let treated = panel.require_unit(&spec.treated_unit)?;

        let donors = match donor_pool {
            None => (0..panel.units().len()).filter(|&u| u != treated).collect::<Vec<_>>(),
            Some(names) => {
                let mut seen = Vec::new();
                for name in names {
                    let idx = panel.require_unit(name)?;
                    if idx != treated && !seen.contains(&idx) {
                        seen.push(idx);
                    }
                }
                seen
            }
        };
        if donors.len() < MIN_DONORS {
            return Err(SynthError::InsufficientDonors {
                found: donors.len(),
                required: MIN_DONORS,
            });
        }

        let pre_times = panel.time_indices_before(spec.treatment_time);
        if pre_times.len() < MIN_PRE_PERIODS {
            return Err(SynthError::InsufficientPrePeriods {
                found: pre_times.len(),
                required: MIN_PRE_PERIODS,
            });
        }
        let post_times = (0..panel.times().len())
            .filter(|&i| {
                let t = panel.time_value(i);
                t >= spec.treatment_time && cutoff.map_or(true, |c| t < c)
            })
            .collect();

        Ok(StudyFrame {
            treated,
            donors,
            pre_times,
            post_times,
            treatment_time: spec.treatment_time,
            cutoff,
        })
    }

    /// Dense index of the treated unit.
    pub fn treated(&self) -> usize {
        self.treated
    }

    /// Dense donor indices; weight vectors align with this order.
    pub fn donors(&self) -> &[usize] {
        &self.donors
    }

    /// Ascending grid indices of the pre-treatment times.
    pub fn pre_times(&self) -> &[usize] {
        &self.pre_times
    }

    /// Ascending grid indices of the post-treatment times (cutoff applied).
    pub fn post_times(&self) -> &[usize] {
        &self.post_times
    }

    /// The treatment threshold.
    pub fn treatment_time(&self) -> f64 {
        self.treatment_time
    }

    /// The evaluation cutoff, when one was set.
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Whether a time value falls in the post-treatment window.
    pub fn is_post(&self, time: f64) -> bool {
        time >= self.treatment_time
    }

    /// Whether a time value is inside the evaluation window.
    pub fn in_window(&self, time: f64) -> bool {
        self.cutoff.map_or(true, |c| time < c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - TreatmentSpec validation and placebo-rotation helpers.
    // - Frame resolution: partitioning, minimums, restrictions, cutoffs.
    //
    // They intentionally DO NOT cover:
    // - Predictor aggregation over the frame, covered by the design tests.
    // -------------------------------------------------------------------------

    fn three_unit_panel() -> Panel {
        let mut units = Vec::new();
        let mut times = Vec::new();
        let mut outcome = Vec::new();
        for unit in ["A", "B", "C"] {
            for (i, year) in (2000..=2005).enumerate() {
                units.push(unit.to_string());
                times.push(year as f64);
                outcome.push(i as f64);
            }
        }
        Panel::new(units, times, vec![("outcome".to_string(), outcome)]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify spec validation and the rotation helpers.
    //
    // Given
    // -----
    // - A valid spec for ("A", 2003) and invalid raw inputs.
    //
    // Expect
    // ------
    // - Construction succeeds; empty unit and NaN time are rejected;
    //   `for_unit` / `at_time` carry the other field over.
    fn treatment_spec_validates_and_rotates() {
        // Arrange / Act
        let spec = TreatmentSpec::new("A", 2003.0).unwrap();
        let rotated = spec.for_unit("B").unwrap();
        let backdated = spec.at_time(2002.0).unwrap();

        // Assert
        assert_eq!(TreatmentSpec::new("", 2003.0).unwrap_err(), SynthError::EmptyUnitName);
        assert!(matches!(
            TreatmentSpec::new("A", f64::NAN).unwrap_err(),
            SynthError::NonFiniteTreatmentTime { .. }
        ));
        assert_eq!(rotated.treated_unit, "B");
        assert_eq!(rotated.treatment_time, 2003.0);
        assert_eq!(backdated.treated_unit, "A");
        assert_eq!(backdated.treatment_time, 2002.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the pre/post partition and donor assembly for a full
    // evaluation window.
    //
    // Given
    // -----
    // - Three units over 2000–2005, treated A at 2003.
    //
    // Expect
    // ------
    // - Donors = {B, C}; pre = {2000, 2001, 2002}; post = {2003, 2004,
    //   2005}; `is_post` flips at the threshold.
    fn frame_partitions_time_grid() {
        // Arrange
        let panel = three_unit_panel();
        let spec = TreatmentSpec::new("A", 2003.0).unwrap();

        // Act
        let frame = StudyFrame::resolve(&panel, &spec, None).unwrap();

        // Assert
        assert_eq!(frame.treated(), 0);
        assert_eq!(frame.donors(), &[1, 2]);
        assert_eq!(frame.pre_times(), &[0, 1, 2]);
        assert_eq!(frame.post_times(), &[3, 4, 5]);
        assert!(!frame.is_post(2002.9));
        assert!(frame.is_post(2003.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify the fail-fast minimums.
    //
    // Given
    // -----
    // - Treatment at 2001 (one pre-period); a restriction to one donor.
    //
    // Expect
    // ------
    // - InsufficientPrePeriods { found: 1 } and InsufficientDonors
    //   { found: 1 } respectively; an absent treated unit reports
    //   UnknownUnit.
    fn frame_enforces_minimums() {
        // Arrange
        let panel = three_unit_panel();

        // Act / Assert
        let early = TreatmentSpec::new("A", 2001.0).unwrap();
        assert_eq!(
            StudyFrame::resolve(&panel, &early, None).unwrap_err(),
            SynthError::InsufficientPrePeriods { found: 1, required: MIN_PRE_PERIODS }
        );
        let spec = TreatmentSpec::new("A", 2003.0).unwrap();
        let restriction = vec!["B".to_string()];
        assert_eq!(
            StudyFrame::resolve(&panel, &spec, Some(&restriction)).unwrap_err(),
            SynthError::InsufficientDonors { found: 1, required: MIN_DONORS }
        );
        let ghost = TreatmentSpec::new("Z", 2003.0).unwrap();
        assert_eq!(
            StudyFrame::resolve(&panel, &ghost, None).unwrap_err(),
            SynthError::UnknownUnit { unit: "Z".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify donor restrictions: order kept, treated ignored, duplicates
    // collapsed, unknown names rejected.
    //
    // Given
    // -----
    // - Restriction ["C", "A", "C", "B"] with treated A.
    //
    // Expect
    // ------
    // - Donors resolve to [C, B]; a restriction naming "Z" errors.
    fn frame_applies_donor_restriction() {
        // Arrange
        let panel = three_unit_panel();
        let spec = TreatmentSpec::new("A", 2003.0).unwrap();
        let restriction: Vec<String> =
            ["C", "A", "C", "B"].iter().map(|s| s.to_string()).collect();

        // Act
        let frame = StudyFrame::resolve(&panel, &spec, Some(&restriction)).unwrap();

        // Assert
        assert_eq!(frame.donors(), &[2, 1]);
        let bad: Vec<String> = vec!["B".to_string(), "Z".to_string()];
        assert_eq!(
            StudyFrame::resolve(&panel, &spec, Some(&bad)).unwrap_err(),
            SynthError::UnknownUnit { unit: "Z".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify cutoff truncation of the post window.
    //
    // Given
    // -----
    // - Treated A backdated to 2002 with cutoff 2004 (the "real"
    //   treatment year in an in-time placebo).
    //
    // Expect
    // ------
    // - Pre = {2000, 2001}; post = {2002, 2003} only; `in_window(2004)` is
    //   false.
    fn frame_truncates_post_window_at_cutoff() {
        // Arrange
        let panel = three_unit_panel();
        let spec = TreatmentSpec::new("A", 2002.0).unwrap();

        // Act
        let frame = StudyFrame::resolve_truncated(&panel, &spec, None, Some(2004.0)).unwrap();

        // Assert
        assert_eq!(frame.pre_times(), &[0, 1]);
        assert_eq!(frame.post_times(), &[2, 3]);
        assert!(frame.in_window(2003.9));
        assert!(!frame.in_window(2004.0));
        assert_eq!(frame.cutoff(), Some(2004.0));
    }
}
