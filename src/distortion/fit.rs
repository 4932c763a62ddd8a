//! Fitting barrel coefficients to a radial distortion model.
//!
//! The radial model `r' = r·(1 + kn1·r² + kn2·r⁴)` is a quintic through the
//! origin; the barrel model `r'' = r·(a·r³ + b·r² + c·r + d)` is a quartic
//! through the origin. Both are expressed on a radius normalized by half the
//! sensor height, so `r = 1` is the top/bottom edge of the frame.
//!
//! The coefficients minimize
//!
//! ```text
//! Σᵢ (r''(rᵢ) − r'(rᵢ))²        rᵢ ∈ {0.25, 0.5, 0.75, 1.0}
//! ```
//!
//! Setting the gradient with respect to (a, b, c, d) to zero gives a 4×4
//! linear system in the power sums `s_p = Σᵢ rᵢᵖ`:
//!
//! ```text
//! | s5 s4 s3 s2 |   | a |   | kn2·s6 + kn1·s4 + s2 |
//! | s6 s5 s4 s3 | · | b | = | kn2·s7 + kn1·s5 + s3 |
//! | s7 s6 s5 s4 |   | c |   | kn2·s8 + kn1·s6 + s4 |
//! | s8 s7 s6 s5 |   | d |   | kn2·s9 + kn1·s7 + s5 |
//! ```
//!
//! With four samples and four unknowns the residual at the samples is
//! driven to (numerically) zero. The sample radii and the layout of the
//! system are fixed so that results stay reproducible against existing
//! reference outputs.

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::sensor::SensorGeometry;

use super::barrel::BarrelDistortion;
use super::radial::RadialDistortion;

/// Normalized radii at which the two models are matched (r = 0 is implicit).
pub const SAMPLE_RADII: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Number of power sums `s_0 ..= s_9` needed by the normal equations.
pub const NUM_POWER_SUMS: usize = 10;

/// Errors from the coefficient fit.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FitError {
    /// The normal-equation matrix could not be factorized.
    #[error("unsolvable fit: normal equations are singular")]
    Unsolvable,
}

/// Result of fitting barrel coefficients to a radial model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrelFitResult {
    /// The fitted barrel model.
    pub model: BarrelDistortion,
    /// First radial coefficient rescaled to half-sensor-height units.
    pub kn1: f64,
    /// Second radial coefficient rescaled to half-sensor-height units.
    pub kn2: f64,
    /// Sum of squared radius residuals at the sample radii.
    pub residual_sq: f64,
    /// Largest absolute radius residual at the sample radii.
    pub max_abs_residual: f64,
}

/// Power sums `s_p = Σᵢ rᵢᵖ` over [`SAMPLE_RADII`] for `p = 0..10`.
pub fn sample_power_sums() -> [f64; NUM_POWER_SUMS] {
    let mut sums = [0.0; NUM_POWER_SUMS];
    for (p, s) in sums.iter_mut().enumerate() {
        *s = SAMPLE_RADII.iter().map(|r| r.powi(p as i32)).sum();
    }
    sums
}

/// Build the normal equations `A·x = B` for sensor-normalized coefficients.
pub fn normal_equations(kn1: f64, kn2: f64) -> (Matrix4<f64>, Vector4<f64>) {
    let s = sample_power_sums();
    let a = Matrix4::from_fn(|i, j| s[5 + i - j]);
    let b = Vector4::from_fn(|i, _| kn2 * s[6 + i] + kn1 * s[4 + i] + s[2 + i]);
    (a, b)
}

/// Radius residuals `r''(rᵢ) − r'(rᵢ)` at each sample radius.
pub fn sample_residuals(kn1: f64, kn2: f64, model: &BarrelDistortion) -> [f64; 4] {
    SAMPLE_RADII.map(|r| {
        let r2 = r * r;
        let radial = r * (1.0 + kn1 * r2 + kn2 * r2 * r2);
        model.distort_radius(r) - radial
    })
}

/// Sum of squared residuals at the sample radii.
pub fn residual_sum_sq(kn1: f64, kn2: f64, model: &BarrelDistortion) -> f64 {
    sample_residuals(kn1, kn2, model)
        .iter()
        .map(|e| e * e)
        .sum()
}

/// Fit barrel coefficients to a radial model on the given sensor.
///
/// Only the sensor height enters the fit. The focal length and height are
/// assumed non-zero; non-finite inputs give non-finite coefficients.
pub fn fit_barrel_distortion(
    sensor: &SensorGeometry,
    radial: &RadialDistortion,
) -> Result<BarrelFitResult, FitError> {
    let (kn1, kn2) = radial.sensor_normalized(sensor);
    let (a_mat, b_vec) = normal_equations(kn1, kn2);

    let x = a_mat.lu().solve(&b_vec).ok_or(FitError::Unsolvable)?;
    let model = BarrelDistortion::new(x[0], x[1], x[2], x[3]);

    let residuals = sample_residuals(kn1, kn2, &model);
    let residual_sq = residuals.iter().map(|e| e * e).sum();
    let max_abs_residual = residuals.iter().fold(0.0_f64, |m, e| m.max(e.abs()));

    debug!(
        "Barrel fit: kn1={:.6e}, kn2={:.6e} -> a={:.6}, b={:.6}, c={:.6}, d={:.6}, residual²={:.3e}",
        kn1, kn2, model.a, model.b, model.c, model.d, residual_sq
    );

    Ok(BarrelFitResult {
        model,
        kn1,
        kn2,
        residual_sq,
        max_abs_residual,
    })
}

/// Convert `(k1, k2)` radial coefficients to barrel `(a, b, c, d)`.
///
/// `width` is accepted for symmetry with the image dimensions but does not
/// affect the result.
pub fn convert_k_to_abcd(
    width: u32,
    height: u32,
    focal_length_px: f64,
    k1: f64,
    k2: f64,
) -> Result<BarrelDistortion, FitError> {
    let sensor = SensorGeometry::new(width, height);
    let radial = RadialDistortion::new(focal_length_px, k1, k2);
    fit_barrel_distortion(&sensor, &radial).map(|fit| fit.model)
}
