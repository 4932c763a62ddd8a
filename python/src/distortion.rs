use pyo3::prelude::*;

use barrelfit::{BarrelDistortion, RadialDistortion};

/// Radial lens distortion model: r_d = r × (1 + k1·r² + k2·r⁴).
///
/// The radius is normalized by the focal length (in pixels). Pixel coordinates
/// are relative to the optical center (image center).
///
/// Example:
///     d = barrelfit_rs.RadialDistortion(1242.36, k1=0.0346, k2=-0.0376)
///     x_undistorted, y_undistorted = d.undistort(100.0, 200.0)
#[pyclass(name = "RadialDistortion", frozen, from_py_object)]
#[derive(Clone)]
pub(crate) struct PyRadialDistortion {
    pub(crate) inner: RadialDistortion,
}

#[pymethods]
impl PyRadialDistortion {
    /// Create a radial distortion model.
    ///
    /// Args:
    ///     focal_length_px: Focal length in pixels.
    ///     k1: First radial coefficient (barrel < 0, pincushion > 0). Default 0.
    ///     k2: Second radial coefficient. Default 0.
    #[new]
    #[pyo3(signature = (focal_length_px, k1 = 0.0, k2 = 0.0))]
    fn new(focal_length_px: f64, k1: f64, k2: f64) -> PyResult<Self> {
        if !(focal_length_px.is_finite() && focal_length_px > 0.0) {
            return Err(pyo3::exceptions::PyValueError::new_err(format!(
                "focal_length_px must be positive, got {}",
                focal_length_px
            )));
        }
        Ok(Self {
            inner: RadialDistortion::new(focal_length_px, k1, k2),
        })
    }

    #[getter]
    fn focal_length_px(&self) -> f64 {
        self.inner.focal_length_px
    }

    #[getter]
    fn k1(&self) -> f64 {
        self.inner.k1
    }

    #[getter]
    fn k2(&self) -> f64 {
        self.inner.k2
    }

    /// Distorted radius for a focal-length-normalized radius.
    fn distort_radius(&self, r: f64) -> f64 {
        self.inner.distort_radius(r)
    }

    /// Forward distortion: ideal → distorted (pixels, relative to image center).
    fn distort(&self, x: f64, y: f64) -> (f64, f64) {
        self.inner.distort(x, y)
    }

    /// Inverse distortion: distorted → ideal (pixels, relative to image center).
    fn undistort(&self, x: f64, y: f64) -> (f64, f64) {
        self.inner.undistort(x, y)
    }

    fn __repr__(&self) -> String {
        format!(
            "RadialDistortion(focal_length_px={:.3}, k1={:.6e}, k2={:.6e})",
            self.inner.focal_length_px, self.inner.k1, self.inner.k2
        )
    }
}

/// Barrel distortion model: r_src = r × (a·r³ + b·r² + c·r + d).
///
/// The four-coefficient form accepted by ImageMagick's ``-distort barrel``.
/// The radius is normalized by half of the smaller image dimension.
///
/// Example:
///     b = barrelfit_rs.BarrelDistortion(-0.0335, 0.05, -0.0105, 1.0013)
///     cmd = f"convert in.png -distort barrel '{b.warper_argument()}' out.png"
#[pyclass(name = "BarrelDistortion", frozen, from_py_object)]
#[derive(Clone)]
pub(crate) struct PyBarrelDistortion {
    pub(crate) inner: BarrelDistortion,
}

#[pymethods]
impl PyBarrelDistortion {
    /// Create a barrel distortion model. Defaults to the identity (0, 0, 0, 1).
    #[new]
    #[pyo3(signature = (a = 0.0, b = 0.0, c = 0.0, d = 1.0))]
    fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            inner: BarrelDistortion::new(a, b, c, d),
        }
    }

    /// Parse a ``"a b c d"`` warper argument string.
    #[staticmethod]
    fn from_warper_argument(s: &str) -> PyResult<Self> {
        let inner = BarrelDistortion::from_warper_argument(s)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    #[getter]
    fn a(&self) -> f64 {
        self.inner.a
    }

    #[getter]
    fn b(&self) -> f64 {
        self.inner.b
    }

    #[getter]
    fn c(&self) -> f64 {
        self.inner.c
    }

    #[getter]
    fn d(&self) -> f64 {
        self.inner.d
    }

    /// Mapped radius for a normalized radius.
    fn distort_radius(&self, r: f64) -> f64 {
        self.inner.distort_radius(r)
    }

    /// Coefficients formatted for the warper: six decimals, space separated.
    fn warper_argument(&self) -> String {
        self.inner.warper_argument()
    }

    fn __repr__(&self) -> String {
        format!(
            "BarrelDistortion(a={:.6}, b={:.6}, c={:.6}, d={:.6})",
            self.inner.a, self.inner.b, self.inner.c, self.inner.d
        )
    }

    fn __str__(&self) -> String {
        self.inner.warper_argument()
    }
}
