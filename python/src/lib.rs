//! Python bindings for barrelfit via PyO3.
//!
//! Exposes the distortion conversion to Python as the `barrelfit_rs` module.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use barrelfit::{BarrelDistortion, CompareConfig, RadialDistortion, SensorGeometry};

mod distortion;

use distortion::{PyBarrelDistortion, PyRadialDistortion};

fn check_geometry(width: u32, height: u32, focal_pixels: f64) -> PyResult<()> {
    if width == 0 || height == 0 {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "image size must be positive, got {}x{}",
            width, height
        )));
    }
    if !(focal_pixels.is_finite() && focal_pixels > 0.0) {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "focal_pixels must be positive, got {}",
            focal_pixels
        )));
    }
    Ok(())
}

/// Fit barrel (a, b, c, d) coefficients to a radial (k1, k2) lens model.
///
/// Args:
///     width: Image width in pixels (does not affect the fit).
///     height: Image height in pixels.
///     focal_pixels: Focal length in pixels.
///     k1: First radial coefficient.
///     k2: Second radial coefficient.
///
/// Returns:
///     Tuple ``(a, b, c, d)`` for ``-distort barrel``.
#[pyfunction]
fn convert_k_to_abcd(
    width: u32,
    height: u32,
    focal_pixels: f64,
    k1: f64,
    k2: f64,
) -> PyResult<(f64, f64, f64, f64)> {
    check_geometry(width, height, focal_pixels)?;
    let model = barrelfit::convert_k_to_abcd(width, height, focal_pixels, k1, k2)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
    Ok((model.a, model.b, model.c, model.d))
}

/// Compare where the radial and barrel remaps sample the source image over a
/// test grid (lines every ``width / grid_divisions`` pixels).
///
/// Returns:
///     dict with keys:
///         'n_samples': int
///         'grid_step_px': int
///         'max_error_px': float
///         'rms_error_px': float
///         'worst_point_px': (float, float)
#[pyfunction]
#[pyo3(signature = (width, height, focal_pixels, k1, k2, a, b, c, d, grid_divisions = 32))]
#[allow(clippy::too_many_arguments)]
fn compare_models<'py>(
    py: Python<'py>,
    width: u32,
    height: u32,
    focal_pixels: f64,
    k1: f64,
    k2: f64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    grid_divisions: u32,
) -> PyResult<Bound<'py, PyDict>> {
    check_geometry(width, height, focal_pixels)?;

    let sensor = SensorGeometry::new(width, height);
    let radial = RadialDistortion::new(focal_pixels, k1, k2);
    let barrel = BarrelDistortion::new(a, b, c, d);
    let config = CompareConfig { grid_divisions };

    let report = barrelfit::compare_models(&sensor, &radial, &barrel, &config);

    let dict = PyDict::new(py);
    dict.set_item("n_samples", report.n_samples)?;
    dict.set_item("grid_step_px", report.grid_step_px)?;
    dict.set_item("max_error_px", report.max_error_px)?;
    dict.set_item("rms_error_px", report.rms_error_px)?;
    dict.set_item(
        "worst_point_px",
        (report.worst_point_px[0], report.worst_point_px[1]),
    )?;

    Ok(dict)
}

/// barrelfit_rs: radial → barrel lens distortion conversion
#[pymodule]
fn barrelfit_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRadialDistortion>()?;
    m.add_class::<PyBarrelDistortion>()?;
    m.add_function(wrap_pyfunction!(convert_k_to_abcd, m)?)?;
    m.add_function(wrap_pyfunction!(compare_models, m)?)?;
    Ok(())
}
