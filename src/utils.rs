#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyValueError,
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::types::PlaceboOptions,
    optimization::qp::SimplexQpOptions,
    synth::core::{
        options::SynthOptions, panel::Panel, path::MissingDonorPolicy, predictors::PredictorSpec,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_column<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
pub fn extract_string_column(raw_data: &Bound<'_, PyAny>) -> PyResult<Vec<String>> {
    if let Ok(values) = raw_data.extract::<Vec<String>>() {
        return Ok(values);
    }

    // Object-dtype numpy arrays and pandas Series land here.
    if let Ok(obj) = raw_data.call_method0("tolist") {
        if let Ok(values) = obj.extract::<Vec<String>>() {
            return Ok(values);
        }
    }

    Err(pyo3::exceptions::PyTypeError::new_err(
        "expected a 1-D numpy.ndarray, pandas.Series, or sequence of str",
    ))
}

#[cfg(feature = "python-bindings")]
pub fn extract_panel<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, unit_col: &str, time_col: &str,
) -> PyResult<Panel> {
    let table = data.downcast::<PyDict>().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a dict mapping column names to columns (e.g. DataFrame.to_dict('series'))",
        )
    })?;

    let unit_values = table
        .get_item(unit_col)?
        .ok_or_else(|| PyValueError::new_err(format!("unit column {unit_col:?} not found")))?;
    let units = extract_string_column(&unit_values)?;

    let time_values = table
        .get_item(time_col)?
        .ok_or_else(|| PyValueError::new_err(format!("time column {time_col:?} not found")))?;
    let time_arr = extract_f64_column(py, &time_values)?;
    let times = time_arr
        .as_slice()
        .map_err(|_| {
            PyValueError::new_err(format!(
                "time column {time_col:?} must be a 1-D contiguous float64 array or sequence"
            ))
        })?
        .to_vec();

    // Every remaining column is a panel variable, the outcome included.
    let mut variables: Vec<(String, Vec<f64>)> = Vec::new();
    for (key, value) in table.iter() {
        let name: String = key.extract().map_err(|_| {
            pyo3::exceptions::PyTypeError::new_err("column names must be strings")
        })?;
        if name == unit_col || name == time_col {
            continue;
        }
        let arr = extract_f64_column(py, &value)?;
        let column = arr
            .as_slice()
            .map_err(|_| {
                PyValueError::new_err(format!(
                    "column {name:?} must be a 1-D contiguous float64 array or sequence"
                ))
            })?
            .to_vec();
        variables.push((name, column));
    }

    Ok(Panel::new(units, times, variables)?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_predictors(
    regular: Option<Vec<String>>, special: Option<Vec<(String, f64, f64)>>,
) -> PyResult<Vec<PredictorSpec>> {
    let mut specs = Vec::new();
    for variable in regular.unwrap_or_default() {
        specs.push(PredictorSpec::regular(variable)?);
    }
    for (variable, start, end) in special.unwrap_or_default() {
        specs.push(PredictorSpec::special(variable, start, end)?);
    }
    Ok(specs)
}

#[cfg(feature = "python-bindings")]
pub fn extract_synth_options(
    ridge: Option<f64>, tol: Option<f64>, max_iter: Option<usize>, clamp_eps: Option<f64>,
    missing_donor: Option<&str>, donor_pool: Option<Vec<String>>,
) -> PyResult<SynthOptions> {
    let defaults = SimplexQpOptions::default();
    let solver = SimplexQpOptions::new(
        ridge.unwrap_or(defaults.ridge),
        tol.unwrap_or(defaults.tol),
        max_iter.unwrap_or(defaults.max_iter),
        clamp_eps.unwrap_or(defaults.clamp_eps),
    )?;

    let policy_str = missing_donor.unwrap_or("zero").to_lowercase();
    let policy = match policy_str.as_str() {
        "zero" | "zero_contribution" => MissingDonorPolicy::ZeroContribution,
        "renormalize" => MissingDonorPolicy::Renormalize,
        "propagate" => MissingDonorPolicy::Propagate,
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid missing_donor policy {other:?} \
                 (expected 'zero', 'renormalize', or 'propagate')"
            )));
        }
    };

    Ok(SynthOptions::new(solver, policy, donor_pool))
}

#[cfg(feature = "python-bindings")]
pub fn extract_placebo_options(
    parallel: Option<bool>, min_pre_fake: Option<usize>, min_post_fake: Option<usize>,
    reinclude_treated: Option<bool>,
) -> PlaceboOptions {
    let defaults = PlaceboOptions::default();
    PlaceboOptions::new(
        parallel.unwrap_or(defaults.parallel),
        min_pre_fake.unwrap_or(defaults.min_pre_fake),
        min_post_fake.unwrap_or(defaults.min_post_fake),
        reinclude_treated.unwrap_or(defaults.reinclude_treated),
    )
}
