//! Radial distortion model: r_distorted = r × (1 + k1·r² + k2·r⁴).
//!
//! Classic two-term Brown-Conrady radial distortion (k3 = k4 = 0). The
//! polynomial is evaluated on radius normalized by the focal length, i.e. the
//! same convention as an OpenCV-style camera matrix with `fx = fy = f`.

use serde::{Deserialize, Serialize};

use crate::sensor::SensorGeometry;

/// Maximum Newton-Raphson iterations for the inverse mapping.
pub(crate) const NEWTON_MAX_ITERATIONS: usize = 20;
/// Newton-Raphson step size below which the inverse is considered converged.
pub(crate) const NEWTON_TOLERANCE: f64 = 1e-12;

/// Two-term radial distortion with its focal length.
///
/// The forward model maps ideal normalized radius `r` to distorted radius:
///
/// ```text
/// r_d = r × (1 + k1·r² + k2·r⁴)        r = r_px / focal_length_px
/// ```
///
/// Undistortion (inverse) is computed via Newton-Raphson iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialDistortion {
    /// Focal length in pixels. Defines the radius unit of `k1` and `k2`.
    pub focal_length_px: f64,
    /// First radial coefficient (barrel < 0, pincushion > 0).
    pub k1: f64,
    /// Second radial coefficient.
    pub k2: f64,
}

impl RadialDistortion {
    /// Create a new radial distortion model.
    ///
    /// `focal_length_px` must be non-zero; this is not checked.
    pub fn new(focal_length_px: f64, k1: f64, k2: f64) -> Self {
        Self {
            focal_length_px,
            k1,
            k2,
        }
    }

    /// Distorted radius for a focal-length-normalized radius `r`.
    pub fn distort_radius(&self, r: f64) -> f64 {
        let r2 = r * r;
        let r4 = r2 * r2;
        r * (1.0 + self.k1 * r2 + self.k2 * r4)
    }

    /// Coefficients rescaled to a radius normalized by half the sensor height.
    ///
    /// Returns `(kn1, kn2)` such that, with `ρ = r_px / (height / 2)`,
    /// `1 + kn1·ρ² + kn2·ρ⁴` equals `1 + k1·r² + k2·r⁴` for `r = r_px / f`.
    pub fn sensor_normalized(&self, sensor: &SensorGeometry) -> (f64, f64) {
        let scale = sensor.normalization_scale(self.focal_length_px);
        let kn2 = self.k2 * scale.powi(4);
        let kn1 = self.k1 * scale.powi(2);
        (kn1, kn2)
    }

    /// Forward distortion: ideal → distorted.
    ///
    /// Given ideal (pinhole) pixel coordinates `(x, y)` relative to the optical
    /// center, returns where the point appears in the distorted image. This is
    /// the lookup an undistortion remap performs for every output pixel.
    pub fn distort(&self, x: f64, y: f64) -> (f64, f64) {
        let xn = x / self.focal_length_px;
        let yn = y / self.focal_length_px;
        let r2 = xn * xn + yn * yn;
        let scale = 1.0 + self.k1 * r2 + self.k2 * r2 * r2;
        (x * scale, y * scale)
    }

    /// Inverse distortion: distorted → ideal (undistort).
    ///
    /// Given observed (distorted) pixel coordinates, returns the ideal
    /// (pinhole) coordinates. Uses Newton-Raphson iteration.
    pub fn undistort(&self, x_d: f64, y_d: f64) -> (f64, f64) {
        let r_d = (x_d * x_d + y_d * y_d).sqrt() / self.focal_length_px;
        if r_d < 1e-12 {
            return (x_d, y_d);
        }

        // Newton-Raphson to find r such that r × (1 + k1·r² + k2·r⁴) = r_d
        let mut r = r_d;
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let r2 = r * r;
            let r4 = r2 * r2;

            let f = self.distort_radius(r) - r_d;
            // f'(r) = 1 + 3·k1·r² + 5·k2·r⁴
            let df = 1.0 + 3.0 * self.k1 * r2 + 5.0 * self.k2 * r4;

            let delta = f / df;
            r -= delta;

            if delta.abs() < NEWTON_TOLERANCE {
                break;
            }
        }

        let scale = r / r_d;
        (x_d * scale, y_d * scale)
    }

    /// Returns `true` if both coefficients are zero (no distortion).
    pub fn is_zero(&self) -> bool {
        self.k1 == 0.0 && self.k2 == 0.0
    }
}
