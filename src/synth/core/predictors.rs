//! Predictor specifications for the donor design.
//!
//! Purpose
//! -------
//! Describe *what gets matched on*: which panel variables enter the design
//! matrix and over which pre-treatment window each is averaged. Two forms
//! exist — a regular predictor averages over the whole pre-period, a
//! special predictor averages over an explicit closed time window.
//!
//! Key behaviors
//! -------------
//! - Validated constructors ([`PredictorSpec::regular`],
//!   [`PredictorSpec::special`]) reject empty variable names and malformed
//!   windows before any panel is consulted.
//! - [`PredictorSpec::label`] renders the design-column label used in
//!   balance tables: the bare variable name, or `var[start..end]` for a
//!   windowed predictor.
//!
//! Invariants & assumptions
//! ------------------------
//! - Special windows are closed on both ends and require finite
//!   `start <= end`.
//! - Window bounds are interpreted against the panel's time grid at design
//!   time; a window may legitimately reach outside the pre-period, in
//!   which case the design builder intersects it (and discards it when the
//!   intersection is empty).
//!
//! Downstream usage
//! ----------------
//! - `build_design` turns a slice of specs into design-matrix rows and
//!   carries the labels into `PredictorBalance`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor validation and label rendering; window
//!   intersection behavior belongs to the design tests.
use crate::synth::errors::{SynthError, SynthResult};

/// One predictor of the donor design.
///
/// - `Regular`: average the variable over every pre-treatment time.
/// - `Special`: average over the closed window `[start, end]`, intersected
///   with the pre-period when the design is built.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictorSpec {
    Regular { variable: String },
    Special { variable: String, start: f64, end: f64 },
}

impl PredictorSpec {
    /// A predictor averaged over the full pre-treatment period.
    ///
    /// # Errors
    /// - [`SynthError::EmptyVariableName`] if the name is empty.
    pub fn regular(variable: impl Into<String>) -> SynthResult<Self> {
        let variable = variable.into();
        if variable.is_empty() {
            return Err(SynthError::EmptyVariableName);
        }
        Ok(PredictorSpec::Regular { variable })
    }

    /// A predictor averaged over the closed window `[start, end]`.
    ///
    /// # Errors
    /// - [`SynthError::EmptyVariableName`] if the name is empty.
    /// - [`SynthError::InvalidPredictorWindow`] if either bound is
    ///   non-finite or `start > end`.
    pub fn special(variable: impl Into<String>, start: f64, end: f64) -> SynthResult<Self> {
        let variable = variable.into();
        if variable.is_empty() {
            return Err(SynthError::EmptyVariableName);
        }
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(SynthError::InvalidPredictorWindow { variable, start, end });
        }
        Ok(PredictorSpec::Special { variable, start, end })
    }

    /// The underlying panel variable.
    pub fn variable(&self) -> &str {
        match self {
            PredictorSpec::Regular { variable } => variable,
            PredictorSpec::Special { variable, .. } => variable,
        }
    }

    /// The design-column label: `var` or `var[start..end]`.
    pub fn label(&self) -> String {
        match self {
            PredictorSpec::Regular { variable } => variable.clone(),
            PredictorSpec::Special { variable, start, end } => {
                format!("{variable}[{start}..{end}]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constructor validation for both predictor forms.
    // - Label rendering.
    //
    // They intentionally DO NOT cover:
    // - Aggregation over a panel, covered by the design tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that both constructors accept well-formed inputs and expose
    // the variable name.
    //
    // Given
    // -----
    // - A regular predictor on "gdp" and a special one on "growth" over
    //   [1985, 1989].
    //
    // Expect
    // ------
    // - Construction succeeds; `variable()` and `label()` report the
    //   expected strings.
    fn predictor_constructors_accept_valid_input() {
        // Arrange / Act
        let regular = PredictorSpec::regular("gdp").unwrap();
        let special = PredictorSpec::special("growth", 1985.0, 1989.0).unwrap();

        // Assert
        assert_eq!(regular.variable(), "gdp");
        assert_eq!(regular.label(), "gdp");
        assert_eq!(special.variable(), "growth");
        assert_eq!(special.label(), "growth[1985..1989]");
    }

    #[test]
    // Purpose
    // -------
    // Verify constructor rejection of malformed specifications.
    //
    // Given
    // -----
    // - Empty names, a reversed window, and a NaN bound.
    //
    // Expect
    // ------
    // - EmptyVariableName for both forms; InvalidPredictorWindow carrying
    //   the offending bounds otherwise.
    fn predictor_constructors_reject_malformed_input() {
        // Arrange / Act / Assert
        assert_eq!(PredictorSpec::regular("").unwrap_err(), SynthError::EmptyVariableName);
        assert_eq!(
            PredictorSpec::special("", 0.0, 1.0).unwrap_err(),
            SynthError::EmptyVariableName
        );
        assert_eq!(
            PredictorSpec::special("gdp", 1990.0, 1985.0).unwrap_err(),
            SynthError::InvalidPredictorWindow {
                variable: "gdp".to_string(),
                start: 1990.0,
                end: 1985.0,
            }
        );
        assert!(matches!(
            PredictorSpec::special("gdp", f64::NAN, 1985.0).unwrap_err(),
            SynthError::InvalidPredictorWindow { .. }
        ));
    }
}
