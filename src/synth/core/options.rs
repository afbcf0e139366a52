//! Study-level options shared by every analysis entry point.
//!
//! Purpose
//! -------
//! Bundle the knobs a single study run needs: solver tuning, the
//! missing-donor policy for path synthesis, and an optional donor-pool
//! restriction. Placebo batches carry one of these per sub-run, so the
//! bundle stays `Clone` and free of borrowed data.
//!
//! # Notes
//! - Solver tuning is validated where it is constructed
//!   ([`SimplexQpOptions::new`]); the restriction list is validated when a
//!   frame resolves it against a panel. Nothing here can fail on its own.
use crate::optimization::qp::SimplexQpOptions;
use crate::synth::core::path::MissingDonorPolicy;

/// Options for one synthetic-control study.
///
/// - `solver`: simplex-QP tuning (ridge, tolerance, iteration cap, clamp).
/// - `missing_donor`: how path synthesis treats a donor hole.
/// - `donor_pool`: optional donor restriction; `None` admits every unit
///   other than the treated one.
#[derive(Debug, Clone, Default)]
pub struct SynthOptions {
    pub solver: SimplexQpOptions,
    pub missing_donor: MissingDonorPolicy,
    pub donor_pool: Option<Vec<String>>,
}

impl SynthOptions {
    /// Bundle explicit parts; [`SynthOptions::default`] covers the common
    /// case.
    pub fn new(
        solver: SimplexQpOptions, missing_donor: MissingDonorPolicy,
        donor_pool: Option<Vec<String>>,
    ) -> Self {
        SynthOptions { solver, missing_donor, donor_pool }
    }
}
