//! Donor-weight QP — simplex-constrained least squares with recovery.
//!
//! Purpose
//! -------
//! Solve the synthetic-control weight program
//! `min_w ‖x₁ − X₀ᵀw‖²  s.t.  wᵢ ≥ 0, Σwᵢ = 1`
//! for a treated predictor vector `x₁` (length K) and a donor predictor
//! matrix `X₀` (J×K, one row per donor). Numerical trouble is recovered
//! in-band: the solve never surfaces a hard error for non-convergence,
//! only for malformed inputs.
//!
//! Key behaviors
//! -------------
//! - Assemble the quadratic form `D = X₀X₀ᵀ + ridge·I` and linear term
//!   `d = X₀x₁`, so the objective is `½wᵀDw − dᵀw` up to a constant.
//! - Iterate projected gradient descent on the probability simplex from a
//!   uniform start with fixed step `1/L`, `L` = max absolute row sum of `D`
//!   (an upper bound on the spectral norm, so each step descends).
//! - Terminate on an ∞-norm step change below `tol`; cap at `max_iter`.
//! - On non-convergence or a non-finite iterate, fall back to uniform
//!   weights `1/J` with `converged = false` and the reason preserved in
//!   [`QpStatus`] — never a raw error.
//! - Post-process: clamp weights below `clamp_eps` to zero and renormalize
//!   to an exact unit sum; a degenerate clamped mass reverts to uniform.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated first: non-empty, dimension-consistent, finite.
//!   Missing donor aggregates must be resolved (donor dropped) upstream.
//! - Returned weights always lie on the probability simplex (entries ≥ 0,
//!   sum = 1 up to rounding), whether solved or fallen back.
//! - `J = 1` is accepted here (the projection pins w = (1)); the ≥2-donor
//!   study rule is a configuration check enforced by the design builder,
//!   not by this numeric kernel.
//! - The solve is deterministic: same inputs, same options ⇒ bit-identical
//!   weights (uniform start, fixed step rule, `total_cmp` ordering in the
//!   projection).
//!
//! Conventions
//! -----------
//! - `X₀` rows are donors, columns are predictors; `x₁` is in predictor
//!   space. The reported `objective` is the caller-facing
//!   `‖x₁ − X₀ᵀw‖²`, not the internal shifted quadratic.
//! - Ridge default `1e-8` keeps `D` positive definite even for K = 1
//!   (rank-1 `X₀X₀ᵀ`) or duplicate donors.
//!
//! Downstream usage
//! ----------------
//! - The analysis pipeline calls [`solve_simplex_qp`] once per run (or once
//!   per placebo iteration) and reads `weights`, `fitted`, `converged`, and
//!   `status` off the [`QpOutcome`].
//! - Callers that must distinguish the three outcomes match on the result:
//!   `Ok` + `Converged` (genuine solution), `Ok` + `FallbackUniform`
//!   (recovered approximation), `Err` (malformed problem).
//!
//! Testing notes
//! -------------
//! - Unit tests cover convex-hull recovery (50/50 boundary case), the
//!   minimum viable J = 2 and degenerate K = 1 problems, simplex
//!   invariants, clamping, forced fallback, determinism, and input
//!   validation. The solver is also exercised end-to-end by the pipeline
//!   and placebo tests.
use crate::optimization::{
    errors::{SolverError, SolverResult},
    simplex::project_onto_simplex,
};
use ndarray::{Array1, Array2};

/// Default diagonal ridge added to `X₀X₀ᵀ` for conditioning.
pub const DEFAULT_RIDGE: f64 = 1e-8;

/// Default ∞-norm step-change tolerance for termination.
pub const DEFAULT_TOL: f64 = 1e-9;

/// Default iteration cap for the projected-gradient loop.
pub const DEFAULT_MAX_ITER: usize = 20_000;

/// Default threshold below which solved weights are clamped to zero.
pub const DEFAULT_CLAMP_EPS: f64 = 1e-8;

/// SimplexQpOptions — tuning knobs for the donor-weight solve.
///
/// Purpose
/// -------
/// Bundle the solver's numeric controls behind a validated constructor, so
/// the gradient loop can assume well-formed settings.
///
/// Fields
/// ------
/// - `ridge`: `f64`
///   Diagonal added to `X₀X₀ᵀ`. Finite, ≥ 0. Default `1e-8`.
/// - `tol`: `f64`
///   ∞-norm step-change threshold for convergence. Finite, > 0.
///   Default `1e-9`.
/// - `max_iter`: `usize`
///   Gradient-step cap; reaching it without meeting `tol` triggers the
///   uniform fallback. ≥ 1. Default `20_000`.
/// - `clamp_eps`: `f64`
///   Weights below this are clamped to zero before renormalization.
///   Finite, ≥ 0. Default `1e-8`.
///
/// Invariants
/// ----------
/// - Enforced by [`SimplexQpOptions::new`]; `Default` uses the module
///   constants and always satisfies them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexQpOptions {
    pub ridge: f64,
    pub tol: f64,
    pub max_iter: usize,
    pub clamp_eps: f64,
}

impl SimplexQpOptions {
    /// Construct validated solver options.
    ///
    /// # Errors
    /// - [`SolverError::InvalidRidge`] if `ridge` is negative or non-finite.
    /// - [`SolverError::InvalidTolerance`] if `tol` is non-positive or
    ///   non-finite.
    /// - [`SolverError::InvalidMaxIter`] if `max_iter == 0`.
    /// - [`SolverError::InvalidClampEpsilon`] if `clamp_eps` is negative or
    ///   non-finite.
    pub fn new(ridge: f64, tol: f64, max_iter: usize, clamp_eps: f64) -> SolverResult<Self> {
        if !ridge.is_finite() || ridge < 0.0 {
            return Err(SolverError::InvalidRidge { value: ridge });
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(SolverError::InvalidTolerance { value: tol });
        }
        if max_iter == 0 {
            return Err(SolverError::InvalidMaxIter);
        }
        if !clamp_eps.is_finite() || clamp_eps < 0.0 {
            return Err(SolverError::InvalidClampEpsilon { value: clamp_eps });
        }
        Ok(SimplexQpOptions { ridge, tol, max_iter, clamp_eps })
    }
}

impl Default for SimplexQpOptions {
    fn default() -> Self {
        SimplexQpOptions {
            ridge: DEFAULT_RIDGE,
            tol: DEFAULT_TOL,
            max_iter: DEFAULT_MAX_ITER,
            clamp_eps: DEFAULT_CLAMP_EPS,
        }
    }
}

/// Why a solve fell back to uniform weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The step change never dropped below `tol` within `max_iter` steps.
    ToleranceNotReached,
    /// An iterate contained a NaN or ±∞ entry.
    NonFiniteIterate,
    /// Clamping removed essentially all weight mass.
    DegenerateClamp,
}

/// QpStatus — how the solve terminated.
///
/// `Converged` is a genuine solution of the program; `FallbackUniform`
/// means the returned weights are the uniform approximation `1/J` and
/// carries the reason. Mirrored into the boolean `converged` flag on
/// [`QpOutcome`] for callers that only need the coarse signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QpStatus {
    Converged,
    FallbackUniform(FallbackReason),
}

impl std::fmt::Display for QpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QpStatus::Converged => write!(f, "converged"),
            QpStatus::FallbackUniform(FallbackReason::ToleranceNotReached) => {
                write!(f, "fell back to uniform weights: step tolerance not reached")
            }
            QpStatus::FallbackUniform(FallbackReason::NonFiniteIterate) => {
                write!(f, "fell back to uniform weights: non-finite iterate")
            }
            QpStatus::FallbackUniform(FallbackReason::DegenerateClamp) => {
                write!(f, "fell back to uniform weights: degenerate weight mass after clamping")
            }
        }
    }
}

/// QpOutcome — solved (or recovered) donor weights plus diagnostics.
///
/// Fields
/// ------
/// - `weights`: `Array1<f64>`
///   Length J, on the probability simplex. Uniform `1/J` when
///   `converged == false`.
/// - `fitted`: `Array1<f64>`
///   `X₀ᵀw`, length K; the synthetic predictor vector implied by the
///   weights. Feeds the balance table.
/// - `objective`: `f64`
///   `‖x₁ − X₀ᵀw‖²` at the returned weights.
/// - `converged`: `bool`
///   `true` iff `status == QpStatus::Converged`.
/// - `status`: [`QpStatus`]
///   Termination detail, including the fallback reason when applicable.
/// - `iterations`: `usize`
///   Gradient steps performed (0 for a degenerate constant objective).
#[derive(Debug, Clone, PartialEq)]
pub struct QpOutcome {
    pub weights: Array1<f64>,
    pub fitted: Array1<f64>,
    pub objective: f64,
    pub converged: bool,
    pub status: QpStatus,
    pub iterations: usize,
}

/// Solve the simplex-constrained donor-weight program.
///
/// Runs projected gradient descent on
/// `½wᵀDw − dᵀw`, `D = X₀X₀ᵀ + ridge·I`, `d = X₀x₁`, over the probability
/// simplex, then clamps and renormalizes the result. See the module docs
/// for the full contract.
///
/// # Parameters
/// - `x1`: treated predictor vector, length K ≥ 1, finite.
/// - `x0`: donor predictor matrix, J×K with J ≥ 1, finite.
/// - `opts`: validated solver options.
///
/// # Returns
/// - A [`QpOutcome`]; `converged == false` marks the uniform-weight
///   recovery path, never an error.
///
/// # Errors
/// - [`SolverError::EmptyDonorSet`] / [`SolverError::EmptyPredictorVector`]
///   for empty inputs.
/// - [`SolverError::DimensionMismatch`] when `x0.ncols() != x1.len()`.
/// - [`SolverError::NonFiniteTreated`] / [`SolverError::NonFiniteDonor`]
///   for NaN or infinite entries (first offender reported).
pub fn solve_simplex_qp(
    x1: &Array1<f64>, x0: &Array2<f64>, opts: &SimplexQpOptions,
) -> SolverResult<QpOutcome> {
    validate_problem(x1, x0)?;
    let n_donors = x0.nrows();

    // Quadratic form in donor space.
    let mut quad = x0.dot(&x0.t());
    for i in 0..n_donors {
        quad[[i, i]] += opts.ridge;
    }
    let linear = x0.dot(x1);

    let lipschitz = max_abs_row_sum(&quad);
    let uniform = Array1::from_elem(n_donors, 1.0 / n_donors as f64);

    if lipschitz <= 0.0 {
        // X₀ and d are identically zero: the objective is constant and the
        // uniform point is an exact minimizer.
        return Ok(finish(uniform, x0, x1, QpStatus::Converged, 0, opts));
    }

    let step = 1.0 / lipschitz;
    let mut weights = uniform.clone();
    for iteration in 1..=opts.max_iter {
        let gradient = quad.dot(&weights) - &linear;
        let next = project_onto_simplex(&(&weights - &(gradient * step)));
        if next.iter().any(|x| !x.is_finite()) {
            return Ok(finish(
                uniform,
                x0,
                x1,
                QpStatus::FallbackUniform(FallbackReason::NonFiniteIterate),
                iteration,
                opts,
            ));
        }
        let step_change = max_abs_diff(&next, &weights);
        weights = next;
        if step_change < opts.tol {
            return Ok(finish(weights, x0, x1, QpStatus::Converged, iteration, opts));
        }
    }
    Ok(finish(
        uniform,
        x0,
        x1,
        QpStatus::FallbackUniform(FallbackReason::ToleranceNotReached),
        opts.max_iter,
        opts,
    ))
}

// ---- Helper methods -------------------------------------------------------

fn validate_problem(x1: &Array1<f64>, x0: &Array2<f64>) -> SolverResult<()> {
    if x0.nrows() == 0 {
        return Err(SolverError::EmptyDonorSet);
    }
    if x1.is_empty() {
        return Err(SolverError::EmptyPredictorVector);
    }
    if x0.ncols() != x1.len() {
        return Err(SolverError::DimensionMismatch {
            donor_cols: x0.ncols(),
            treated_len: x1.len(),
        });
    }
    for (index, &value) in x1.iter().enumerate() {
        if !value.is_finite() {
            return Err(SolverError::NonFiniteTreated { index, value });
        }
    }
    for ((row, col), &value) in x0.indexed_iter() {
        if !value.is_finite() {
            return Err(SolverError::NonFiniteDonor { row, col, value });
        }
    }
    Ok(())
}

/// ∞-norm of a square matrix: an upper bound on its spectral norm, used as
/// the Lipschitz constant of the gradient.
#[inline]
fn max_abs_row_sum(m: &Array2<f64>) -> f64 {
    m.rows().into_iter().map(|row| row.iter().map(|x| x.abs()).sum::<f64>()).fold(0.0, f64::max)
}

#[inline]
fn max_abs_diff(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

/// Clamp, renormalize, and package the final weights.
///
/// Weights below `clamp_eps` drop to zero and the rest renormalize to an
/// exact unit sum. If clamping leaves essentially no mass, the outcome
/// reverts to uniform with `FallbackReason::DegenerateClamp`.
fn finish(
    weights: Array1<f64>, x0: &Array2<f64>, x1: &Array1<f64>, status: QpStatus, iterations: usize,
    opts: &SimplexQpOptions,
) -> QpOutcome {
    let n_donors = weights.len();
    let mut clamped = weights;
    clamped.mapv_inplace(|w| if w < opts.clamp_eps { 0.0 } else { w });
    let mass: f64 = clamped.sum();

    let (final_weights, final_status) = if mass <= opts.clamp_eps {
        (
            Array1::from_elem(n_donors, 1.0 / n_donors as f64),
            QpStatus::FallbackUniform(FallbackReason::DegenerateClamp),
        )
    } else {
        (clamped / mass, status)
    };

    let fitted = x0.t().dot(&final_weights);
    let residual = x1 - &fitted;
    let objective = residual.dot(&residual);
    QpOutcome {
        weights: final_weights,
        fitted,
        objective,
        converged: final_status == QpStatus::Converged,
        status: final_status,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convex-hull recovery (the 50/50 perfect-fit boundary case).
    // - Simplex invariants (non-negativity, unit sum) across regimes.
    // - The minimum viable J = 2 and the degenerate K = 1 problems.
    // - Forced uniform fallback, clamping, option validation, determinism.
    //
    // They intentionally DO NOT cover:
    // - Design-matrix construction or RMSPE computation, covered by the
    //   synth core tests.
    // -------------------------------------------------------------------------

    fn assert_simplex(w: &Array1<f64>) {
        let sum: f64 = w.sum();
        assert!((sum - 1.0).abs() < 1e-6, "weights should sum to 1, got {sum}");
        assert!(w.iter().all(|&x| x >= -1e-9), "weights should be non-negative: {w:?}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that a treated vector lying exactly halfway between two donor
    // vectors recovers weights ≈ (0.5, 0.5) with a near-zero objective.
    //
    // Given
    // -----
    // - Donors (1, 3, 5) and (3, 5, 9); treated = their average (2, 4, 7).
    //
    // Expect
    // ------
    // - Converged outcome, weights within 1e-4 of (0.5, 0.5),
    //   objective < 1e-8.
    fn solver_recovers_average_of_two_donors() {
        // Arrange
        let x0 = array![[1.0, 3.0, 5.0], [3.0, 5.0, 9.0]];
        let x1 = array![2.0, 4.0, 7.0];
        let opts = SimplexQpOptions::default();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(out.converged, "expected convergence, got {:?}", out.status);
        assert_simplex(&out.weights);
        assert!((out.weights[0] - 0.5).abs() < 1e-4, "weights: {:?}", out.weights);
        assert!((out.weights[1] - 0.5).abs() < 1e-4, "weights: {:?}", out.weights);
        assert!(out.objective < 1e-8, "objective should vanish, got {}", out.objective);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a treated vector coinciding with one donor puts all
    // weight on that donor.
    //
    // Given
    // -----
    // - Three affinely independent donors; treated equals the second
    //   donor's row exactly (a vertex of the hull, so the optimum is
    //   unique).
    //
    // Expect
    // ------
    // - Weight ≈ 1 on donor 1, ≈ 0 elsewhere, near-zero objective.
    fn solver_selects_matching_donor() {
        // Arrange
        let x0 = array![[0.0, 10.0], [4.0, 6.0], [10.0, 9.0]];
        let x1 = array![4.0, 6.0];
        let opts = SimplexQpOptions::default();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(out.converged);
        assert_simplex(&out.weights);
        assert!((out.weights[1] - 1.0).abs() < 1e-3, "weights: {:?}", out.weights);
        assert!(out.objective < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify the degenerate K = 1 problem does not crash and stays on the
    // simplex (rank-1 quadratic regularized by the ridge).
    //
    // Given
    // -----
    // - Two donors with single-entry rows (2) and (6); treated = (3).
    //
    // Expect
    // ------
    // - Converged; weights on the simplex; the closer donor carries more
    //   weight; fitted value near 3.
    fn solver_handles_single_predictor_column() {
        // Arrange
        let x0 = array![[2.0], [6.0]];
        let x1 = array![3.0];
        let opts = SimplexQpOptions::default();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(out.converged, "status: {:?}", out.status);
        assert_simplex(&out.weights);
        assert!(out.weights[0] > out.weights[1], "closer donor dominates: {:?}", out.weights);
        assert!((out.fitted[0] - 3.0).abs() < 1e-6, "fitted: {:?}", out.fitted);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an unreachable treated vector still yields a feasible,
    // converged solution at the simplex boundary.
    //
    // Given
    // -----
    // - Donors clustered near (1, 1); treated far outside their hull.
    //
    // Expect
    // ------
    // - Converged; weights on the simplex; strictly positive objective.
    fn solver_stays_feasible_outside_convex_hull() {
        // Arrange
        let x0 = array![[1.0, 1.2], [0.8, 1.0], [1.1, 0.9]];
        let x1 = array![100.0, -50.0];
        let opts = SimplexQpOptions::default();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(out.converged);
        assert_simplex(&out.weights);
        assert!(out.objective > 1.0, "treated is unreachable; objective must stay positive");
    }

    #[test]
    // Purpose
    // -------
    // Verify the uniform fallback path: an iteration budget too small to
    // converge must yield uniform weights, converged = false, and the
    // tolerance reason.
    //
    // Given
    // -----
    // - A well-posed 3-donor problem, max_iter = 1, very tight tol.
    //
    // Expect
    // ------
    // - weights = (1/3, 1/3, 1/3); status records ToleranceNotReached.
    fn solver_falls_back_to_uniform_when_budget_exhausted() {
        // Arrange
        let x0 = array![[1.0, 0.0], [0.0, 1.0], [5.0, 5.0]];
        let x1 = array![0.9, 0.1];
        let opts = SimplexQpOptions::new(1e-8, 1e-16, 1, 1e-8).unwrap();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(!out.converged);
        assert_eq!(out.status, QpStatus::FallbackUniform(FallbackReason::ToleranceNotReached));
        for &w in out.weights.iter() {
            assert!((w - 1.0 / 3.0).abs() < 1e-12, "expected uniform, got {:?}", out.weights);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that tiny weights are clamped to exact zero and the rest
    // renormalize to an exact unit sum.
    //
    // Given
    // -----
    // - Treated equal to donor 0; an aggressive clamp_eps of 1e-3.
    //
    // Expect
    // ------
    // - Off weights are exactly 0.0; the sum is exactly renormalized.
    fn solver_clamps_and_renormalizes() {
        // Arrange
        let x0 = array![[1.0, 2.0], [10.0, 20.0]];
        let x1 = array![1.0, 2.0];
        let opts = SimplexQpOptions::new(1e-8, 1e-12, 50_000, 1e-3).unwrap();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(out.converged);
        assert_eq!(out.weights[1], 0.0, "clamped weight must be exactly zero");
        assert!((out.weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify determinism: two identical solves produce bit-identical
    // weights.
    //
    // Given
    // -----
    // - The same 3×2 problem solved twice with default options.
    //
    // Expect
    // ------
    // - Equal outcomes.
    fn solver_is_deterministic() {
        // Arrange
        let x0 = array![[1.0, 4.0], [2.0, 2.5], [3.0, 1.0]];
        let x1 = array![2.2, 2.4];
        let opts = SimplexQpOptions::default();

        // Act
        let a = solve_simplex_qp(&x1, &x0, &opts).unwrap();
        let b = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.status, b.status);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an all-zero donor matrix short-circuits to an exact
    // uniform minimizer of the constant objective.
    //
    // Given
    // -----
    // - 2×2 zero donors, zero treated vector, zero ridge.
    //
    // Expect
    // ------
    // - Converged with 0 iterations; uniform weights.
    fn solver_short_circuits_constant_objective() {
        // Arrange
        let x0 = Array2::zeros((2, 2));
        let x1 = Array1::zeros(2);
        let opts = SimplexQpOptions::new(0.0, 1e-9, 100, 1e-8).unwrap();

        // Act
        let out = solve_simplex_qp(&x1, &x0, &opts).unwrap();

        // Assert
        assert!(out.converged);
        assert_eq!(out.iterations, 0);
        assert!((out.weights[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify input validation: dimension mismatch and non-finite entries
    // are hard errors, reported with first-offender payloads.
    //
    // Given
    // -----
    // - A 2×3 donor matrix with a length-2 treated vector; then a donor
    //   matrix containing NaN.
    //
    // Expect
    // ------
    // - `DimensionMismatch { donor_cols: 3, treated_len: 2 }` and
    //   `NonFiniteDonor { row: 1, col: 0, .. }` respectively.
    fn solver_rejects_malformed_problems() {
        // Arrange
        let opts = SimplexQpOptions::default();
        let mismatched = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let short = array![1.0, 2.0];
        let with_nan = array![[1.0, 2.0], [f64::NAN, 5.0]];
        let ok = array![1.0, 2.0];

        // Act
        let err_dims = solve_simplex_qp(&short, &mismatched, &opts).unwrap_err();
        let err_nan = solve_simplex_qp(&ok, &with_nan, &opts).unwrap_err();

        // Assert
        assert_eq!(err_dims, SolverError::DimensionMismatch { donor_cols: 3, treated_len: 2 });
        match err_nan {
            SolverError::NonFiniteDonor { row: 1, col: 0, value } => assert!(value.is_nan()),
            other => panic!("expected NonFiniteDonor, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify option validation bounds.
    //
    // Given
    // -----
    // - Negative ridge, zero tolerance, zero max_iter, negative clamp.
    //
    // Expect
    // ------
    // - Each constructor call returns its dedicated error variant; the
    //   defaults construct cleanly.
    fn solver_options_validate_bounds() {
        // Arrange / Act / Assert
        assert_eq!(
            SimplexQpOptions::new(-1.0, 1e-9, 10, 1e-8).unwrap_err(),
            SolverError::InvalidRidge { value: -1.0 }
        );
        assert_eq!(
            SimplexQpOptions::new(1e-8, 0.0, 10, 1e-8).unwrap_err(),
            SolverError::InvalidTolerance { value: 0.0 }
        );
        assert_eq!(
            SimplexQpOptions::new(1e-8, 1e-9, 0, 1e-8).unwrap_err(),
            SolverError::InvalidMaxIter
        );
        assert_eq!(
            SimplexQpOptions::new(1e-8, 1e-9, 10, -1e-3).unwrap_err(),
            SolverError::InvalidClampEpsilon { value: -1e-3 }
        );
        let defaults = SimplexQpOptions::default();
        assert_eq!(defaults.ridge, DEFAULT_RIDGE);
        assert_eq!(defaults.max_iter, DEFAULT_MAX_ITER);
    }
}
