//! Panel — validated long-format unit × time × variables container.
//!
//! Purpose
//! -------
//! Hold one analysis session's tabular data in memory: every row is a
//! (unit, time) observation carrying one value per named variable column,
//! with `NaN` encoding a missing cell. The panel is immutable once
//! constructed and is the single data source every downstream stage
//! (design builder, synthesizer, placebo engine) reads from.
//!
//! Key behaviors
//! -------------
//! - Validate on construction: consistent column lengths, finite times,
//!   non-empty unit ids, named variable columns, no ±∞ data values.
//!   Validation reports the first offender with its row index.
//! - Derive the distinct unit list (first-appearance order), the distinct
//!   time grid (ascending), and a (unit, time) → rows index.
//! - Tolerate duplicate (unit, time) rows: cell lookups collapse
//!   duplicates by the mean of their non-missing values.
//! - Expose missing-value-excluding aggregation (`mean_over`) and exact
//!   cell lookup (`value_at`), both returning `None` when no usable value
//!   exists.
//!
//! Invariants & assumptions
//! ------------------------
//! - Time values are finite; ordering and deduplication use `total_cmp`
//!   with `-0.0` normalized to `0.0`.
//! - Completeness is NOT required: any (unit, time) cell may be absent or
//!   missing. Aggregations exclude missing values rather than failing.
//! - The panel carries no column roles; which variable is the outcome and
//!   which unit is treated are study-level configuration applied later.
//!
//! Conventions
//! -----------
//! - Units and times are referred to by dense indices (`usize`) internally;
//!   names/values are recovered via `unit_name` / `time_value`. Public
//!   entry points translate names via `require_unit` / `require_variable`.
//! - Variable columns are `ndarray::Array1<f64>` over rows.
//!
//! Downstream usage
//! ----------------
//! - `StudyFrame::resolve` validates a treatment specification against a
//!   panel and partitions its time grid.
//! - `build_design` aggregates panel cells into predictor columns;
//!   `synthesize_path` reads outcome cells per period.
//! - Python bindings construct panels from a dict of columns plus role
//!   names in `utils`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor validation (first-offender payloads),
//!   duplicate-cell mean collapsing, missing-value exclusion in
//!   aggregation, time-grid ordering, and window helpers. Larger panels
//!   are exercised by the pipeline and placebo tests.
use crate::synth::errors::{SynthError, SynthResult};
use ndarray::Array1;
use std::collections::HashMap;

/// Map `-0.0` to `0.0` so the time grid has one representative per value.
#[inline]
fn canonical_time(t: f64) -> f64 {
    if t == 0.0 { 0.0 } else { t }
}

/// Panel — immutable long-format dataset for one analysis session.
///
/// Purpose
/// -------
/// Carry unit × time observations with named numeric variable columns and
/// answer the lookups the synthetic-control pipeline needs: distinct
/// units/times, exact cell values, and missing-value-excluding means over
/// time windows.
///
/// Key behaviors
/// -------------
/// - Construction validates shape and numeric sanity, then indexes rows by
///   (unit, time) so lookups are O(duplicates) rather than O(rows).
/// - `value_at` collapses duplicate rows in a cell to their mean;
///   `mean_over` pools every non-missing row across a set of times.
///
/// Fields (observable via accessors)
/// ---------------------------------
/// - `units()`: distinct unit ids in first-appearance order.
/// - `times()`: distinct time values, ascending.
/// - `variables()`: variable column names in caller order.
///
/// Invariants
/// ----------
/// - All stored times are finite; all data values are finite or NaN.
/// - Index vectors (`row → unit`, `row → time`) are total over rows.
/// - Never mutated after `new` returns.
///
/// Performance
/// -----------
/// - Construction is O(rows × variables) plus a time-grid sort; lookups
///   touch only the rows of one cell.
///
/// Notes
/// -----
/// - Duplicate (unit, time) rows are legal; they represent repeated
///   measurements and collapse by mean wherever a single cell value is
///   needed.
#[derive(Debug, Clone)]
pub struct Panel {
    unit_names: Vec<String>,
    time_values: Vec<f64>,
    variable_names: Vec<String>,
    columns: Vec<Array1<f64>>,
    row_units: Vec<usize>,
    row_times: Vec<usize>,
    cells: HashMap<(usize, usize), Vec<usize>>,
    unit_lookup: HashMap<String, usize>,
    variable_lookup: HashMap<String, usize>,
}

impl Panel {
    /// Construct a validated panel from long-format columns.
    ///
    /// Parameters
    /// ----------
    /// - `units`: unit identifier per row; must be non-empty strings.
    /// - `times`: time value per row; must be finite. Any totally ordered
    ///   numeric encoding works (years, quarters as `yyyy.q`, epoch days).
    /// - `variables`: `(name, values)` per variable column; every column
    ///   must match the row count, and `NaN` marks a missing cell.
    ///
    /// Returns
    /// -------
    /// - A `Panel` with derived unit/time grids and cell index.
    ///
    /// Errors
    /// ------
    /// - [`SynthError::EmptyPanel`] for zero rows.
    /// - [`SynthError::ColumnLengthMismatch`] if `times` or any variable
    ///   column disagrees with the row count (the time column is reported
    ///   as `"time"`).
    /// - [`SynthError::NoVariables`] / [`SynthError::EmptyVariableName`] /
    ///   [`SynthError::DuplicateVariable`] for malformed variable columns.
    /// - [`SynthError::EmptyUnitId`] / [`SynthError::NonFiniteTime`] /
    ///   [`SynthError::InfiniteValue`] for the first offending row.
    pub fn new(
        units: Vec<String>, times: Vec<f64>, variables: Vec<(String, Vec<f64>)>,
    ) -> SynthResult<Self> {
        let n_rows = units.len();
        if n_rows == 0 {
            return Err(SynthError::EmptyPanel);
        }
        if times.len() != n_rows {
            return Err(SynthError::ColumnLengthMismatch {
                column: "time".to_string(),
                expected: n_rows,
                found: times.len(),
            });
        }
        if variables.is_empty() {
            return Err(SynthError::NoVariables);
        }

        let mut variable_names = Vec::with_capacity(variables.len());
        let mut variable_lookup = HashMap::with_capacity(variables.len());
        let mut columns = Vec::with_capacity(variables.len());
        for (name, values) in variables {
            if name.is_empty() {
                return Err(SynthError::EmptyVariableName);
            }
            if values.len() != n_rows {
                return Err(SynthError::ColumnLengthMismatch {
                    column: name,
                    expected: n_rows,
                    found: values.len(),
                });
            }
            if let Some(row) = values.iter().position(|v| v.is_infinite()) {
                return Err(SynthError::InfiniteValue { column: name, row, value: values[row] });
            }
            if variable_lookup.insert(name.clone(), variable_names.len()).is_some() {
                return Err(SynthError::DuplicateVariable { name });
            }
            variable_names.push(name);
            columns.push(Array1::from_vec(values));
        }

        for (row, unit) in units.iter().enumerate() {
            if unit.is_empty() {
                return Err(SynthError::EmptyUnitId { row });
            }
        }
        for (row, &t) in times.iter().enumerate() {
            if !t.is_finite() {
                return Err(SynthError::NonFiniteTime { row, value: t });
            }
        }

        // Distinct units in first-appearance order.
        let mut unit_names: Vec<String> = Vec::new();
        let mut unit_lookup: HashMap<String, usize> = HashMap::new();
        let mut row_units = Vec::with_capacity(n_rows);
        for unit in &units {
            let idx = *unit_lookup.entry(unit.clone()).or_insert_with(|| {
                unit_names.push(unit.clone());
                unit_names.len() - 1
            });
            row_units.push(idx);
        }

        // Ascending distinct time grid.
        let mut time_values: Vec<f64> = times.iter().map(|&t| canonical_time(t)).collect();
        time_values.sort_unstable_by(f64::total_cmp);
        time_values.dedup();
        let row_times: Vec<usize> = times
            .iter()
            .map(|&t| {
                let t = canonical_time(t);
                // Present by construction: the grid was built from these rows.
                time_values.partition_point(|&g| g < t)
            })
            .collect();

        let mut cells: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for row in 0..n_rows {
            cells.entry((row_units[row], row_times[row])).or_default().push(row);
        }

        Ok(Panel {
            unit_names,
            time_values,
            variable_names,
            columns,
            row_units,
            row_times,
            cells,
            unit_lookup,
            variable_lookup,
        })
    }

    // ---- Enumeration ------------------------------------------------------

    /// Number of observation rows.
    pub fn n_rows(&self) -> usize {
        self.row_units.len()
    }

    /// Distinct unit identifiers, first-appearance order.
    pub fn units(&self) -> &[String] {
        &self.unit_names
    }

    /// Distinct time values, ascending.
    pub fn times(&self) -> &[f64] {
        &self.time_values
    }

    /// Variable column names, caller order.
    pub fn variables(&self) -> &[String] {
        &self.variable_names
    }

    /// Unit id for a dense unit index.
    pub fn unit_name(&self, unit: usize) -> &str {
        &self.unit_names[unit]
    }

    /// Time value for a dense time index.
    pub fn time_value(&self, time: usize) -> f64 {
        self.time_values[time]
    }

    // ---- Name resolution --------------------------------------------------

    /// Dense index of a unit id, if present.
    pub fn unit_index(&self, unit: &str) -> Option<usize> {
        self.unit_lookup.get(unit).copied()
    }

    /// Dense index of a variable name, if present.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variable_lookup.get(name).copied()
    }

    /// Resolve a unit id or fail with [`SynthError::UnknownUnit`].
    pub fn require_unit(&self, unit: &str) -> SynthResult<usize> {
        self.unit_index(unit).ok_or_else(|| SynthError::UnknownUnit { unit: unit.to_string() })
    }

    /// Resolve a variable name or fail with [`SynthError::UnknownVariable`].
    pub fn require_variable(&self, name: &str) -> SynthResult<usize> {
        self.variable_index(name)
            .ok_or_else(|| SynthError::UnknownVariable { name: name.to_string() })
    }

    // ---- Time-grid helpers ------------------------------------------------

    /// Indices of grid times strictly before `threshold`, ascending.
    pub fn time_indices_before(&self, threshold: f64) -> Vec<usize> {
        (0..self.time_values.len()).filter(|&i| self.time_values[i] < threshold).collect()
    }

    /// Indices of grid times inside the closed window `[start, end]`,
    /// ascending.
    pub fn time_indices_within(&self, start: f64, end: f64) -> Vec<usize> {
        (0..self.time_values.len())
            .filter(|&i| self.time_values[i] >= start && self.time_values[i] <= end)
            .collect()
    }

    // ---- Cell access ------------------------------------------------------

    fn cell_rows(&self, unit: usize, time: usize) -> &[usize] {
        self.cells.get(&(unit, time)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Value of a variable for one unit at one grid time.
    ///
    /// Duplicate rows in the cell collapse to the mean of their
    /// non-missing values.
    ///
    /// Returns
    /// -------
    /// - `Some(mean)` when at least one non-missing value exists in the
    ///   cell; `None` when the cell is absent or entirely missing.
    pub fn value_at(&self, unit: usize, variable: usize, time: usize) -> Option<f64> {
        let column = &self.columns[variable];
        let mut sum = 0.0;
        let mut count = 0usize;
        for &row in self.cell_rows(unit, time) {
            let v = column[row];
            if v.is_finite() {
                sum += v;
                count += 1;
            }
        }
        if count == 0 { None } else { Some(sum / count as f64) }
    }

    /// Mean of a variable for one unit pooled over every row at the given
    /// grid times, excluding missing values.
    ///
    /// Pooling is over rows, not over per-time cell means: a duplicated
    /// period contributes once per row, matching a plain mean over the
    /// unit's matching observations.
    ///
    /// Returns
    /// -------
    /// - `Some(mean)` when at least one non-missing value exists across
    ///   the window; `None` otherwise (including an empty `times` slice).
    pub fn mean_over(&self, unit: usize, variable: usize, times: &[usize]) -> Option<f64> {
        let column = &self.columns[variable];
        let mut sum = 0.0;
        let mut count = 0usize;
        for &time in times {
            for &row in self.cell_rows(unit, time) {
                let v = column[row];
                if v.is_finite() {
                    sum += v;
                    count += 1;
                }
            }
        }
        if count == 0 { None } else { Some(sum / count as f64) }
    }

    /// Grid-time indices (ascending) at which a unit has a non-missing
    /// value for a variable.
    pub fn observed_time_indices(&self, unit: usize, variable: usize) -> Vec<usize> {
        (0..self.time_values.len())
            .filter(|&time| self.value_at(unit, variable, time).is_some())
            .collect()
    }
}
