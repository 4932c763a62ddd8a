//! Sensor geometry: image dimensions and the reference radii derived from them.
//!
//! Both distortion models work on a *normalized* radius, but they normalize by
//! different reference lengths:
//!
//! - The coefficient fit normalizes by half the sensor height, so that radius
//!   `1.0` reaches the top/bottom edge of the frame.
//! - The barrel warper normalizes by half of the smaller image dimension.
//!
//! For landscape sensors (width ≥ height) the two coincide.
//!
//! # Coordinate conventions
//!
//! - **Pixel coordinates**: origin at the image center, +X right, +Y down.
//! - The optical center is assumed to coincide with the image center.

use serde::{Deserialize, Serialize};

/// Image sensor dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorGeometry {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl SensorGeometry {
    /// Create a sensor geometry from image dimensions in pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Half the sensor height in pixels: the reference length of the fit's
    /// normalized radius.
    pub fn half_height_px(&self) -> f64 {
        self.height as f64 / 2.0
    }

    /// Reference radius used by the barrel warper: half of the smaller dimension.
    pub fn warper_radius_px(&self) -> f64 {
        self.width.min(self.height) as f64 / 2.0
    }

    /// Geometric image center `(cx, cy)` in top-left-origin pixel coordinates.
    pub fn center_px(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Ratio between the fit's radius unit and a focal-length-normalized radius:
    /// `(height / 2) / focal_length_px`.
    ///
    /// A radius of `1.0` in fit units equals this many focal lengths.
    pub fn normalization_scale(&self, focal_length_px: f64) -> f64 {
        self.half_height_px() / focal_length_px
    }

    /// Returns `true` if the fit and the warper normalize by the same length.
    pub fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}
