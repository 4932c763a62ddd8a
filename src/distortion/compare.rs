//! Geometric comparison of a radial model against its fitted barrel model.
//!
//! Undistorting an image with either model is a remap: every destination
//! pixel samples a source position. Two remaps agree when they sample the
//! same source positions, so instead of rendering a test pattern and diffing
//! images this module walks the nodes of the same test grid (lines every
//! `width / grid_divisions` pixels, plus the last row and column) and measures
//! how far apart the two sampled positions are.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sensor::SensorGeometry;

use super::barrel::BarrelDistortion;
use super::radial::RadialDistortion;

/// Configuration for model comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Number of grid cells across the image width. The grid step is
    /// `width / grid_divisions` pixels (at least 1). Default 32.
    pub grid_divisions: u32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self { grid_divisions: 32 }
    }
}

/// Result of comparing two remaps over the test grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareReport {
    /// Number of grid nodes compared.
    pub n_samples: usize,
    /// Grid step in pixels.
    pub grid_step_px: u32,
    /// Largest source-position disagreement in pixels.
    pub max_error_px: f64,
    /// RMS source-position disagreement in pixels.
    pub rms_error_px: f64,
    /// Destination pixel (top-left origin) with the largest disagreement.
    pub worst_point_px: [f64; 2],
}

/// Grid line positions along one axis: every `step` pixels plus the last pixel.
fn grid_lines(extent: u32, step: u32) -> Vec<u32> {
    if extent == 0 {
        return Vec::new();
    }
    let mut lines: Vec<u32> = (0..extent).step_by(step as usize).collect();
    if lines.last() != Some(&(extent - 1)) {
        lines.push(extent - 1);
    }
    lines
}

/// Compare where the radial and barrel remaps sample the source image.
///
/// Radial positions follow the undistortion convention of an OpenCV-style
/// camera matrix centered on the image; barrel positions follow the warper,
/// which normalizes by half of the smaller image dimension.
pub fn compare_models(
    sensor: &SensorGeometry,
    radial: &RadialDistortion,
    barrel: &BarrelDistortion,
    config: &CompareConfig,
) -> CompareReport {
    if !sensor.is_landscape() {
        warn!(
            "Sensor {}x{} is portrait: the warper normalizes by the width while the fit normalizes by the height",
            sensor.width, sensor.height
        );
    }

    let step = (sensor.width / config.grid_divisions.max(1)).max(1);
    let (cx, cy) = sensor.center_px();
    let norm_radius = sensor.warper_radius_px();

    let mut n_samples = 0usize;
    let mut sum_sq = 0.0;
    let mut max_error = 0.0_f64;
    let mut worst = [cx, cy];

    let rows = grid_lines(sensor.height, step);
    for &u in &grid_lines(sensor.width, step) {
        for &v in &rows {
            let x = u as f64 - cx;
            let y = v as f64 - cy;
            let (xr, yr) = radial.distort(x, y);
            let (xb, yb) = barrel.distort(x, y, norm_radius);
            let err = ((xr - xb).powi(2) + (yr - yb).powi(2)).sqrt();

            sum_sq += err * err;
            n_samples += 1;
            if err > max_error {
                max_error = err;
                worst = [u as f64, v as f64];
            }
        }
    }

    let rms = if n_samples > 0 {
        (sum_sq / n_samples as f64).sqrt()
    } else {
        0.0
    };

    debug!(
        "Model comparison: {} grid nodes, step {} px, max {:.3} px, RMS {:.3} px",
        n_samples, step, max_error, rms
    );

    CompareReport {
        n_samples,
        grid_step_px: step,
        max_error_px: max_error,
        rms_error_px: rms,
        worst_point_px: worst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distortion::fit::fit_barrel_distortion;

    #[test]
    fn test_grid_lines() {
        assert_eq!(grid_lines(10, 4), vec![0, 4, 8, 9]);
        assert_eq!(grid_lines(9, 4), vec![0, 4, 8]);
        assert!(grid_lines(0, 4).is_empty());
    }

    #[test]
    fn test_identical_remaps() {
        let sensor = SensorGeometry::new(640, 480);
        let radial = RadialDistortion::new(500.0, 0.0, 0.0);
        let report = compare_models(
            &sensor,
            &radial,
            &BarrelDistortion::identity(),
            &CompareConfig::default(),
        );
        // 640 / 32 = 20 px step: 32 columns + last, 24 rows + last
        assert_eq!(report.grid_step_px, 20);
        assert_eq!(report.n_samples, 33 * 25);
        assert!(report.max_error_px < 1e-12);
        assert!(report.rms_error_px < 1e-12);
    }

    #[test]
    fn test_fitted_model_tracks_radial_on_axis() {
        let sensor = SensorGeometry::new(2560, 1920);
        let radial = RadialDistortion::new(1242.36, 0.03462446, -0.03762977);
        let fit = fit_barrel_distortion(&sensor, &radial).unwrap();

        let report = compare_models(&sensor, &radial, &fit.model, &CompareConfig::default());
        let unfitted = compare_models(
            &sensor,
            &radial,
            &BarrelDistortion::identity(),
            &CompareConfig::default(),
        );
        assert!(
            report.rms_error_px < unfitted.rms_error_px,
            "fitted RMS {:.3} px should beat identity RMS {:.3} px",
            report.rms_error_px,
            unfitted.rms_error_px
        );
        assert!(report.max_error_px <= unfitted.max_error_px);
    }
}
