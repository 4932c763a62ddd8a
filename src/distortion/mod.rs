//! Lens distortion models and the conversion between them.
//!
//! # Supported models
//!
//! - [`Distortion::Radial`] — two-term Brown-Conrady radial distortion (k1, k2),
//!   radius normalized by the focal length
//! - [`Distortion::Barrel`] — four-coefficient barrel distortion (a, b, c, d),
//!   radius normalized by half the smaller image dimension
//!
//! # Usage
//!
//! 1. **Convert** a calibrated radial model into barrel coefficients with
//!    [`fit_barrel_distortion`] (or the flat [`convert_k_to_abcd`]).
//!
//! 2. **Hand off** the result to the barrel warper via
//!    [`BarrelDistortion::warper_argument`].
//!
//! 3. **Check** how closely the two remaps agree across the frame with
//!    [`compare_models`].

pub mod barrel;
pub mod compare;
pub mod fit;
pub mod radial;

pub use barrel::{BarrelDistortion, ParseBarrelError};
pub use compare::{compare_models, CompareConfig, CompareReport};
pub use fit::{convert_k_to_abcd, fit_barrel_distortion, BarrelFitResult, FitError};
pub use radial::RadialDistortion;

use crate::sensor::SensorGeometry;

/// Lens distortion model.
///
/// All pixel coordinates are relative to the image center; the sensor
/// supplies the reference radius for models that need one.
#[derive(Debug, Clone, Default)]
pub enum Distortion {
    /// No distortion correction.
    #[default]
    None,
    /// Radial distortion: r_d = r × (1 + k1·r² + k2·r⁴).
    Radial(RadialDistortion),
    /// Barrel distortion: r_src = r × (a·r³ + b·r² + c·r + d).
    Barrel(BarrelDistortion),
}

impl Distortion {
    /// Forward mapping: the position an undistortion remap samples for the
    /// output pixel `(x, y)`.
    pub fn distort(&self, x: f64, y: f64, sensor: &SensorGeometry) -> (f64, f64) {
        match self {
            Distortion::None => (x, y),
            Distortion::Radial(r) => r.distort(x, y),
            Distortion::Barrel(b) => b.distort(x, y, sensor.warper_radius_px()),
        }
    }

    /// Inverse mapping: the output pixel that samples position `(x, y)`.
    pub fn undistort(&self, x: f64, y: f64, sensor: &SensorGeometry) -> (f64, f64) {
        match self {
            Distortion::None => (x, y),
            Distortion::Radial(r) => r.undistort(x, y),
            Distortion::Barrel(b) => b.undistort(x, y, sensor.warper_radius_px()),
        }
    }

    /// Returns `true` if this is `Distortion::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Distortion::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let sensor = SensorGeometry::new(2560, 1920);
        let d = Distortion::default();
        assert!(d.is_none());
        assert_eq!(d.distort(12.0, -34.0, &sensor), (12.0, -34.0));
        assert_eq!(d.undistort(12.0, -34.0, &sensor), (12.0, -34.0));
    }

    #[test]
    fn test_fitted_barrel_agrees_with_radial_on_vertical_axis() {
        // Along the vertical axis the warper radius equals the fit radius, so
        // at the sample radii the two remaps coincide.
        let sensor = SensorGeometry::new(2560, 1920);
        let radial = RadialDistortion::new(1242.36, 0.03462446, -0.03762977);
        let fit = fit_barrel_distortion(&sensor, &radial).unwrap();

        let dr = Distortion::Radial(radial);
        let db = Distortion::Barrel(fit.model);
        for &rho in &fit::SAMPLE_RADII {
            let y = rho * sensor.half_height_px();
            let (_, yr) = dr.distort(0.0, y, &sensor);
            let (_, yb) = db.distort(0.0, y, &sensor);
            assert!(
                (yr - yb).abs() < 1e-8,
                "rho={}: radial {:.9}, barrel {:.9}",
                rho,
                yr,
                yb
            );
        }
    }

    #[test]
    fn test_undistort_inverts_distort() {
        let sensor = SensorGeometry::new(2560, 1920);
        let models = [
            Distortion::Radial(RadialDistortion::new(1242.36, 0.03462446, -0.03762977)),
            Distortion::Barrel(BarrelDistortion::new(-0.0335, 0.05, -0.0105, 1.0013)),
        ];
        for d in &models {
            let (xd, yd) = d.distort(800.0, -600.0, &sensor);
            let (xu, yu) = d.undistort(xd, yd, &sensor);
            assert!((xu - 800.0).abs() < 1e-6 && (yu + 600.0).abs() < 1e-6);
        }
    }
}
