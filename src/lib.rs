//! synth_control — synthetic control analysis with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the synthetic-control engine to Python via the `_synth_control` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing result classes, entry-point functions, and submodules used
//! by the `synth_control` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`synth`, `inference`, `optimization`)
//!   as the public crate surface.
//! - Define `#[pyclass]` result wrappers, `#[pyfunction]` entry points, and
//!   the `#[pymodule]` initializer for the `_synth_control` Python extension.
//! - Create and register Python submodules (`analysis`, `inference`) under
//!   `synth_control` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules; this
//!   file performs only FFI glue, input validation, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror the
//!   invariants of their Rust counterparts (e.g. `SynthReport`,
//!   `InSpacePlacebo`); weights arriving in Python already satisfy the
//!   simplex constraints.
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules are assumed to hold.
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `synth_control.<submodule>` and are
//!   typically wrapped by thin pure-Python facades in the top-level
//!   `synth_control` package.
//! - Tabular input arrives as a dict of columns plus role column names
//!   (`unit_col`, `time_col`, `outcome_col`); conversion lives in `utils`.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports the `_synth_control` module defined
//!   here and wraps its classes in user-facing Python APIs.
//! - External users are expected to interact with either the safe Rust APIs or
//!   the pure-Python wrappers; the PyO3 plumbing is considered internal.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration suite under `tests/`.
//! - Smoke tests for the PyO3 bindings verify that the entry points can be
//!   called and their results inspected from Python.

pub mod inference;
pub mod optimization;
pub mod synth;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::{InSpacePlacebo, InTimePlacebo, SilentObserver},
    synth::{SynthReport, TreatmentSpec},
    utils::{
        extract_f64_column, extract_panel, extract_placebo_options, extract_predictors,
        extract_synth_options,
    },
};

/// StudyReport — Python-facing wrapper for a single synthetic-control fit.
///
/// Purpose
/// -------
/// Present the packaged result of one analysis ([`SynthReport`]) to Python
/// callers: donor weights, the actual-vs-synthetic outcome path, the
/// predictor balance table, RMSPE summaries, and the solver verdict.
///
/// Key behaviors
/// -------------
/// - Expose every report field as a read-only Python property.
/// - Convert `ndarray` vectors and structured rows into plain Python lists
///   and tuples on access.
///
/// Parameters
/// ----------
/// Instances are constructed internally by [`analysis.run_analysis`] and are
/// not created directly by user code.
///
/// Fields
/// ------
/// - `inner`: [`SynthReport`]
///   Full Rust-side report backing the accessors.
///
/// Invariants
/// ----------
/// - `weights` entries are non-negative and sum to 1 (within solver
///   tolerance); `donor_units` is aligned 1:1 with `weights`.
/// - `converged = False` means the uniform-weight fallback is in effect;
///   the exact reason is rendered in `solver_status`.
///
/// Performance
/// -----------
/// - Accessors are O(n) in the length of the converted collection; scalar
///   properties are plain copies.
///
/// Notes
/// -----
/// - Native Rust callers should use
///   [`synth::run_analysis`](crate::synth::run_analysis) directly; this type
///   exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "synth_control.analysis")]
pub struct StudyReport {
    /// Underlying Rust SynthReport.
    pub inner: SynthReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StudyReport {
    /// The treated unit identifier.
    #[getter]
    pub fn treated_unit(&self) -> String {
        self.inner.treated_unit.clone()
    }

    /// The treatment time threshold.
    #[getter]
    pub fn treatment_time(&self) -> f64 {
        self.inner.treatment_time
    }

    /// Surviving donor units, aligned 1:1 with `weights`.
    #[getter]
    pub fn donor_units(&self) -> Vec<String> {
        self.inner.donor_units.clone()
    }

    /// Solved donor weights (non-negative, summing to 1).
    #[getter]
    pub fn weights(&self) -> Vec<f64> {
        self.inner.weights.to_vec()
    }

    /// Path points as `(time, actual, synthetic, gap, post)`.
    #[getter]
    pub fn path(&self) -> Vec<(f64, f64, f64, f64, bool)> {
        self.inner
            .outcome_path
            .points()
            .iter()
            .map(|p| (p.time, p.actual, p.synthetic, p.gap, p.post))
            .collect()
    }

    /// The gap series (actual − synthetic), aligned with `path`.
    #[getter]
    pub fn gaps(&self) -> Vec<f64> {
        self.inner.outcome_path.gaps()
    }

    /// Balance rows as `(predictor, treated, synthetic, donor_mean)`.
    #[getter]
    pub fn balance(&self) -> Vec<(String, f64, f64, f64)> {
        self.inner
            .balance
            .rows
            .iter()
            .map(|r| (r.predictor.clone(), r.treated, r.synthetic, r.donor_mean))
            .collect()
    }

    #[getter]
    pub fn pre_rmspe(&self) -> f64 {
        self.inner.pre_rmspe
    }

    #[getter]
    pub fn post_rmspe(&self) -> f64 {
        self.inner.post_rmspe
    }

    #[getter]
    pub fn rmspe_ratio(&self) -> f64 {
        self.inner.rmspe_ratio
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    /// Human-readable solver verdict.
    #[getter]
    pub fn solver_status(&self) -> String {
        self.inner.solver_status.to_string()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    /// Donors dropped for missing predictor aggregates.
    #[getter]
    pub fn excluded_donors(&self) -> Vec<String> {
        self.inner.excluded_donors.clone()
    }
}

/// InSpaceResult — Python-facing wrapper for an in-space placebo batch.
///
/// Purpose
/// -------
/// Present the aggregate of an in-space placebo study ([`InSpacePlacebo`])
/// to Python callers: the per-unit summary table, per-unit gap series, the
/// treated unit's reference ratio, and the rank p-value.
///
/// Key behaviors
/// -------------
/// - Render per-unit records and recorded failures as lists of tuples.
/// - Expose batch-level scalars (`p_value`, `treated_ratio`, counts) as
///   plain properties.
///
/// Parameters
/// ----------
/// Instances are constructed internally by
/// [`inference.run_in_space_placebo`] and are not created directly by user
/// code.
///
/// Fields
/// ------
/// - `inner`: [`InSpacePlacebo`]
///   Full Rust-side aggregate backing the accessors.
///
/// Invariants
/// ----------
/// - Exactly one summary row has `is_treated = True`; `p_value` is the
///   fraction of successful units whose ratio is at least the treated
///   unit's.
/// - Recorded failures are excluded from every aggregate.
///
/// Performance
/// -----------
/// - `gap_series` clones each unit's path into Python-owned tuples; other
///   accessors are O(records).
///
/// Notes
/// -----
/// - This type is part of the Python FFI surface; Rust code should prefer
///   [`InSpacePlacebo`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "synth_control.inference")]
pub struct InSpaceResult {
    /// Underlying Rust placebo aggregate.
    pub inner: InSpacePlacebo,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl InSpaceResult {
    /// Summary rows as `(unit, pre_rmspe, post_rmspe, ratio, is_treated,
    /// converged)`.
    #[getter]
    pub fn summary(&self) -> Vec<(String, f64, f64, f64, bool, bool)> {
        self.inner
            .records
            .iter()
            .map(|r| {
                (r.unit.clone(), r.pre_rmspe, r.post_rmspe, r.ratio, r.is_treated, r.converged)
            })
            .collect()
    }

    /// Per-unit gap series as `(unit, [(time, gap), ...])`.
    #[getter]
    pub fn gap_series(&self) -> Vec<(String, Vec<(f64, f64)>)> {
        self.inner
            .records
            .iter()
            .map(|r| {
                let gaps = r.path.points().iter().map(|p| (p.time, p.gap)).collect();
                (r.unit.clone(), gaps)
            })
            .collect()
    }

    /// Recorded per-unit failures as `(unit, message)`.
    #[getter]
    pub fn failures(&self) -> Vec<(String, String)> {
        self.inner.failures.iter().map(|f| (f.unit.clone(), f.error.to_string())).collect()
    }

    /// Units whose donor pool re-included the real treated unit.
    #[getter]
    pub fn reincluded_units(&self) -> Vec<String> {
        self.inner
            .records
            .iter()
            .filter(|r| r.reincluded_treated)
            .map(|r| r.unit.clone())
            .collect()
    }

    #[getter]
    pub fn treated_ratio(&self) -> f64 {
        self.inner.treated_ratio
    }

    #[getter]
    pub fn p_value(&self) -> f64 {
        self.inner.p_value
    }

    #[getter]
    pub fn successful_count(&self) -> usize {
        self.inner.successful_count
    }

    #[getter]
    pub fn attempted_count(&self) -> usize {
        self.inner.attempted_count
    }
}

/// InTimeResult — Python-facing wrapper for an in-time placebo batch.
///
/// Purpose
/// -------
/// Present the aggregate of an in-time (backdating) placebo study
/// ([`InTimePlacebo`]) to Python callers: the per-fake-date summary table,
/// path and gap series per fake date, and the screening/failure records.
///
/// Key behaviors
/// -------------
/// - Render per-date records, screened-out candidates, and recorded
///   failures as lists of tuples.
/// - Expose batch-level counts as plain properties.
///
/// Parameters
/// ----------
/// Instances are constructed internally by
/// [`inference.run_in_time_placebo`] and are not created directly by user
/// code.
///
/// Fields
/// ------
/// - `inner`: [`InTimePlacebo`]
///   Full Rust-side aggregate backing the accessors.
///
/// Invariants
/// ----------
/// - Every path is truncated at the real treatment time; `post` flags mark
///   the fake post-period `[fake, real)`.
/// - Skipped candidates were never attempted and do not count toward
///   `attempted_count`.
///
/// Performance
/// -----------
/// - `paths` clones each fake date's full path into Python-owned tuples;
///   other accessors are O(records).
///
/// Notes
/// -----
/// - This type is part of the Python FFI surface; Rust code should prefer
///   [`InTimePlacebo`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "synth_control.inference")]
pub struct InTimeResult {
    /// Underlying Rust placebo aggregate.
    pub inner: InTimePlacebo,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl InTimeResult {
    /// Summary rows as `(fake_time, pre_rmspe, post_rmspe, ratio,
    /// converged)`.
    #[getter]
    pub fn summary(&self) -> Vec<(f64, f64, f64, f64, bool)> {
        self.inner
            .records
            .iter()
            .map(|r| (r.fake_time, r.pre_rmspe, r.post_rmspe, r.ratio, r.converged))
            .collect()
    }

    /// Per-date paths as `(fake_time, [(time, actual, synthetic, gap,
    /// post), ...])`.
    #[getter]
    pub fn paths(&self) -> Vec<(f64, Vec<(f64, f64, f64, f64, bool)>)> {
        self.inner
            .records
            .iter()
            .map(|r| {
                let points = r
                    .path
                    .points()
                    .iter()
                    .map(|p| (p.time, p.actual, p.synthetic, p.gap, p.post))
                    .collect();
                (r.fake_time, points)
            })
            .collect()
    }

    /// Per-date gap series as `(fake_time, [(time, gap), ...])`.
    #[getter]
    pub fn gap_series(&self) -> Vec<(f64, Vec<(f64, f64)>)> {
        self.inner
            .records
            .iter()
            .map(|r| {
                let gaps = r.path.points().iter().map(|p| (p.time, p.gap)).collect();
                (r.fake_time, gaps)
            })
            .collect()
    }

    /// Screened-out candidates as `(fake_time, reason)`.
    #[getter]
    pub fn skipped(&self) -> Vec<(f64, String)> {
        self.inner.skipped.iter().map(|s| (s.fake_time, s.reason.to_string())).collect()
    }

    /// Recorded per-date failures as `(fake_time, message)`.
    #[getter]
    pub fn failures(&self) -> Vec<(f64, String)> {
        self.inner.failures.iter().map(|f| (f.fake_time, f.error.to_string())).collect()
    }

    #[getter]
    pub fn successful_count(&self) -> usize {
        self.inner.successful_count
    }

    #[getter]
    pub fn attempted_count(&self) -> usize {
        self.inner.attempted_count
    }
}

/// Run one synthetic-control analysis from Python.
///
/// Takes a dict of columns plus role column names, fits donor weights on
/// the pre-treatment predictors, and returns a [`StudyReport`].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        data,
        unit_col,
        time_col,
        outcome_col,
        treated_unit,
        treatment_time,
        regular_predictors = None,
        special_predictors = None,
        ridge = None,
        tol = None,
        max_iter = None,
        clamp_eps = None,
        missing_donor = None,
        donor_pool = None,
    ),
    text_signature = "(data, unit_col, time_col, outcome_col, treated_unit, treatment_time, /, \
                      regular_predictors=None, special_predictors=None, ridge=None, tol=None, \
                      max_iter=None, clamp_eps=None, missing_donor='zero', donor_pool=None)"
)]
pub fn run_analysis<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, unit_col: &str, time_col: &str, outcome_col: &str,
    treated_unit: &str, treatment_time: f64, regular_predictors: Option<Vec<String>>,
    special_predictors: Option<Vec<(String, f64, f64)>>, ridge: Option<f64>, tol: Option<f64>,
    max_iter: Option<usize>, clamp_eps: Option<f64>, missing_donor: Option<&str>,
    donor_pool: Option<Vec<String>>,
) -> PyResult<StudyReport> {
    let panel = extract_panel(py, data, unit_col, time_col)?;
    let treatment = TreatmentSpec::new(treated_unit, treatment_time)?;
    let predictors = extract_predictors(regular_predictors, special_predictors)?;
    let options =
        extract_synth_options(ridge, tol, max_iter, clamp_eps, missing_donor, donor_pool)?;

    let report = synth::run_analysis(&panel, outcome_col, &treatment, &predictors, &options)?;
    Ok(StudyReport { inner: report })
}

/// Run the in-space placebo study from Python.
///
/// Rotates the treated role across every donor and ranks the real treated
/// unit's post/pre RMSPE ratio among the placebo ratios.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        data,
        unit_col,
        time_col,
        outcome_col,
        treated_unit,
        treatment_time,
        regular_predictors = None,
        special_predictors = None,
        ridge = None,
        tol = None,
        max_iter = None,
        clamp_eps = None,
        missing_donor = None,
        donor_pool = None,
        parallel = None,
        reinclude_treated = None,
    ),
    text_signature = "(data, unit_col, time_col, outcome_col, treated_unit, treatment_time, /, \
                      regular_predictors=None, special_predictors=None, ridge=None, tol=None, \
                      max_iter=None, clamp_eps=None, missing_donor='zero', donor_pool=None, \
                      parallel=True, reinclude_treated=True)"
)]
pub fn run_in_space_placebo<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, unit_col: &str, time_col: &str, outcome_col: &str,
    treated_unit: &str, treatment_time: f64, regular_predictors: Option<Vec<String>>,
    special_predictors: Option<Vec<(String, f64, f64)>>, ridge: Option<f64>, tol: Option<f64>,
    max_iter: Option<usize>, clamp_eps: Option<f64>, missing_donor: Option<&str>,
    donor_pool: Option<Vec<String>>, parallel: Option<bool>, reinclude_treated: Option<bool>,
) -> PyResult<InSpaceResult> {
    let panel = extract_panel(py, data, unit_col, time_col)?;
    let treatment = TreatmentSpec::new(treated_unit, treatment_time)?;
    let predictors = extract_predictors(regular_predictors, special_predictors)?;
    let options =
        extract_synth_options(ridge, tol, max_iter, clamp_eps, missing_donor, donor_pool)?;
    let placebo = extract_placebo_options(parallel, None, None, reinclude_treated);

    let result = inference::run_in_space_placebo(
        &panel,
        outcome_col,
        &treatment,
        &predictors,
        &options,
        &placebo,
        &SilentObserver,
    )?;
    Ok(InSpaceResult { inner: result })
}

/// Run the in-time (backdating) placebo study from Python.
///
/// Screens the candidate fake treatment times against the minimum-period
/// rules, refits the study at each eligible fake time, and evaluates every
/// path strictly before the real treatment time.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        data,
        unit_col,
        time_col,
        outcome_col,
        treated_unit,
        treatment_time,
        candidate_fake_times,
        regular_predictors = None,
        special_predictors = None,
        ridge = None,
        tol = None,
        max_iter = None,
        clamp_eps = None,
        missing_donor = None,
        donor_pool = None,
        parallel = None,
        min_pre_fake = None,
        min_post_fake = None,
    ),
    text_signature = "(data, unit_col, time_col, outcome_col, treated_unit, treatment_time, \
                      candidate_fake_times, /, regular_predictors=None, special_predictors=None, \
                      ridge=None, tol=None, max_iter=None, clamp_eps=None, missing_donor='zero', \
                      donor_pool=None, parallel=True, min_pre_fake=3, min_post_fake=2)"
)]
pub fn run_in_time_placebo<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, unit_col: &str, time_col: &str, outcome_col: &str,
    treated_unit: &str, treatment_time: f64, candidate_fake_times: &Bound<'py, PyAny>,
    regular_predictors: Option<Vec<String>>, special_predictors: Option<Vec<(String, f64, f64)>>,
    ridge: Option<f64>, tol: Option<f64>, max_iter: Option<usize>, clamp_eps: Option<f64>,
    missing_donor: Option<&str>, donor_pool: Option<Vec<String>>, parallel: Option<bool>,
    min_pre_fake: Option<usize>, min_post_fake: Option<usize>,
) -> PyResult<InTimeResult> {
    let panel = extract_panel(py, data, unit_col, time_col)?;
    let treatment = TreatmentSpec::new(treated_unit, treatment_time)?;
    let fake_arr = extract_f64_column(py, candidate_fake_times)?;
    let fake_times = fake_arr.as_slice().map_err(|_| {
        PyValueError::new_err(
            "candidate_fake_times must be a 1-D contiguous float64 array or sequence",
        )
    })?;
    let predictors = extract_predictors(regular_predictors, special_predictors)?;
    let options =
        extract_synth_options(ridge, tol, max_iter, clamp_eps, missing_donor, donor_pool)?;
    let placebo = extract_placebo_options(parallel, min_pre_fake, min_post_fake, None);

    let result = inference::run_in_time_placebo(
        &panel,
        outcome_col,
        &treatment,
        fake_times,
        &predictors,
        &options,
        &placebo,
        &SilentObserver,
    )?;
    Ok(InTimeResult { inner: result })
}

/// _synth_control — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_synth_control` Python module and register its submodules used
/// by the public `synth_control` package.
///
/// Key behaviors
/// -------------
/// - Create `analysis` and `inference` submodules.
/// - Attach those submodules to the parent `_synth_control` module.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Parameters
/// ----------
/// - `_py`: [`Python`]
///   GIL token provided by PyO3 during module initialization.
/// - `m`: `&Bound<PyModule>`
///   Module object representing `_synth_control`.
///
/// Returns
/// -------
/// `PyResult<()>`
///   `Ok(())` on success, or a Python exception if registration fails.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
///
/// Panics
/// ------
/// - Never panics under normal operation; all failures are mapped into
///   `PyErr`.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _synth_control<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let analysis_mod = PyModule::new(_py, "analysis")?;
    let inference_mod = PyModule::new(_py, "inference")?;
    analysis(_py, m, &analysis_mod)?;
    inference(_py, m, &inference_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("synth_control.analysis", analysis_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("synth_control.inference", inference_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn analysis<'py>(
    _py: Python, synth_control: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<StudyReport>()?;
    m.add_function(wrap_pyfunction!(run_analysis, m)?)?;
    synth_control.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn inference<'py>(
    _py: Python, synth_control: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<InSpaceResult>()?;
    m.add_class::<InTimeResult>()?;
    m.add_function(wrap_pyfunction!(run_in_space_placebo, m)?)?;
    m.add_function(wrap_pyfunction!(run_in_time_placebo, m)?)?;
    synth_control.add_submodule(m)?;
    Ok(())
}
