//! Euclidean projection onto the probability simplex.
//!
//! Provides the sort-based projection of Duchi, Shalev-Shwartz, Singer &
//! Chandra (2008): given `v ∈ ℝⁿ`, find the closest point (in ‖·‖₂) of
//! `Δ = { w : wᵢ ≥ 0, Σwᵢ = 1 }`. This is the feasibility step of the
//! projected-gradient donor-weight solver in [`crate::optimization::qp`].
//!
//! # Provided items
//! - [`project_onto_simplex`]: the projection itself, `O(n log n)` from the
//!   descending sort, exact up to floating-point rounding.
//!
//! # Rationale
//! The donor-weight program constrains weights to the simplex. Rather than a
//! general constrained solver, each gradient step is re-feasibilized with
//! this closed-form projection; the pair (gradient step, projection) is the
//! standard first-order treatment of simplex-constrained least squares.
use ndarray::Array1;

/// Project a vector onto the probability simplex `{ w : wᵢ ≥ 0, Σwᵢ = 1 }`.
///
/// Uses the descending-sort threshold rule: with `u` = `v` sorted
/// descending and partial sums `sⱼ = u₁ + … + uⱼ`, let `ρ` be the largest
/// `j` with `uⱼ > (sⱼ − 1)/j`; the threshold is `θ = (s_ρ − 1)/ρ` and the
/// projection is `wᵢ = max(vᵢ − θ, 0)`.
///
/// `ρ` always exists (`j = 1` satisfies the rule), so the result is defined
/// for every non-empty finite input. Sorting uses `total_cmp`, so the
/// output is deterministic for any input ordering.
///
/// # Parameters
/// - `v`: point to project; entries must be finite, length ≥ 1.
///
/// # Returns
/// - The closest point of the simplex to `v`. Entries are non-negative and
///   sum to 1 up to floating-point rounding.
pub fn project_onto_simplex(v: &Array1<f64>) -> Array1<f64> {
    let n = v.len();
    let mut sorted: Vec<f64> = v.to_vec();
    sorted.sort_unstable_by(|a, b| b.total_cmp(a));

    let mut cumsum = 0.0;
    let mut theta = 0.0;
    for (j, &u) in sorted.iter().enumerate() {
        cumsum += u;
        let candidate = (cumsum - 1.0) / (j as f64 + 1.0);
        if u > candidate {
            theta = candidate;
        }
    }
    Array1::from_iter(v.iter().map(|&x| (x - theta).max(0.0)))
}
