//! Barrel distortion model: r_src = r × (a·r³ + b·r² + c·r + d).
//!
//! This is the four-coefficient form accepted by ImageMagick's
//! `-distort barrel 'a b c d'` operator. The radius `r` is normalized by half
//! of the smaller image dimension, and the mapping goes from a destination
//! pixel to the source pixel it samples. With `a = b = c = 0, d = 1` the
//! mapping is the identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::radial::{NEWTON_MAX_ITERATIONS, NEWTON_TOLERANCE};

/// Number of decimals written into the warper argument string.
pub const WARPER_DECIMALS: usize = 6;

/// Errors when parsing a warper argument string.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseBarrelError {
    /// Wrong number of whitespace-separated values.
    #[error("expected 4 barrel coefficients, got {0}")]
    WrongCount(usize),
    /// A token could not be parsed as a decimal number.
    #[error("invalid barrel coefficient {0:?}")]
    InvalidNumber(String),
}

/// Four-coefficient barrel distortion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrelDistortion {
    /// Cubic coefficient.
    pub a: f64,
    /// Quadratic coefficient.
    pub b: f64,
    /// Linear coefficient.
    pub c: f64,
    /// Constant coefficient (overall scale; 1.0 for no scaling).
    pub d: f64,
}

impl BarrelDistortion {
    /// Create a barrel model from its four coefficients (see [`identity`](Self::identity)).
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// The identity mapping `(0, 0, 0, 1)`.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Coefficients as an array `[a, b, c, d]`.
    pub fn coeffs(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Radial multiplier `a·r³ + b·r² + c·r + d` (Horner form).
    pub fn scale_at(&self, r: f64) -> f64 {
        ((self.a * r + self.b) * r + self.c) * r + self.d
    }

    /// Mapped radius `r × (a·r³ + b·r² + c·r + d)` for a normalized radius `r`.
    pub fn distort_radius(&self, r: f64) -> f64 {
        r * self.scale_at(r)
    }

    /// Coefficients formatted for the warper command line: `"a b c d"` with
    /// six decimals each.
    pub fn warper_argument(&self) -> String {
        format!(
            "{:.prec$} {:.prec$} {:.prec$} {:.prec$}",
            self.a,
            self.b,
            self.c,
            self.d,
            prec = WARPER_DECIMALS
        )
    }

    /// Parse a whitespace-separated `"a b c d"` string.
    pub fn from_warper_argument(s: &str) -> Result<Self, ParseBarrelError> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 4 {
            return Err(ParseBarrelError::WrongCount(tokens.len()));
        }
        let mut coeffs = [0.0; 4];
        for (slot, tok) in coeffs.iter_mut().zip(&tokens) {
            *slot = tok
                .parse::<f64>()
                .map_err(|_| ParseBarrelError::InvalidNumber(tok.to_string()))?;
        }
        Ok(Self::new(coeffs[0], coeffs[1], coeffs[2], coeffs[3]))
    }

    /// Forward mapping in pixels: destination → source.
    ///
    /// `(x, y)` are relative to the image center; `norm_radius_px` is the
    /// warper's reference radius (see
    /// [`SensorGeometry::warper_radius_px`](crate::SensorGeometry::warper_radius_px)).
    pub fn distort(&self, x: f64, y: f64, norm_radius_px: f64) -> (f64, f64) {
        let rho = (x * x + y * y).sqrt() / norm_radius_px;
        let scale = self.scale_at(rho);
        (x * scale, y * scale)
    }

    /// Inverse mapping in pixels: source → destination. Uses Newton-Raphson
    /// iteration on the normalized radius.
    pub fn undistort(&self, x_s: f64, y_s: f64, norm_radius_px: f64) -> (f64, f64) {
        let r_s = (x_s * x_s + y_s * y_s).sqrt() / norm_radius_px;
        if r_s < 1e-12 {
            return (x_s, y_s);
        }

        let mut r = if self.d != 0.0 { r_s / self.d } else { r_s };
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let f = self.distort_radius(r) - r_s;
            // d/dr [a·r⁴ + b·r³ + c·r² + d·r]
            let df = ((4.0 * self.a * r + 3.0 * self.b) * r + 2.0 * self.c) * r + self.d;

            let delta = f / df;
            r -= delta;

            if delta.abs() < NEWTON_TOLERANCE {
                break;
            }
        }

        let scale = r / r_s;
        (x_s * scale, y_s * scale)
    }

    /// Returns `true` if this is exactly the identity mapping.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for BarrelDistortion {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for BarrelDistortion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.warper_argument())
    }
}

impl FromStr for BarrelDistortion {
    type Err = ParseBarrelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_warper_argument(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let b = BarrelDistortion::identity();
        assert!(b.is_identity());
        for &r in &[0.0, 0.25, 0.5, 1.0, 1.3] {
            assert_eq!(b.distort_radius(r), r);
        }
        assert_eq!(b.distort(100.0, -50.0, 960.0), (100.0, -50.0));
    }

    #[test]
    fn test_no_constant_term() {
        let b = BarrelDistortion::new(-0.2, 0.4, 0.1, 0.9);
        assert_eq!(b.distort_radius(0.0), 0.0);
    }

    #[test]
    fn test_horner_matches_expanded() {
        let b = BarrelDistortion::new(-0.0335, 0.05, -0.0105, 1.0013);
        let r: f64 = 0.8;
        let expanded = b.a * r.powi(3) + b.b * r.powi(2) + b.c * r + b.d;
        assert!((b.scale_at(r) - expanded).abs() < 1e-15);
    }

    #[test]
    fn test_warper_argument_format() {
        let b = BarrelDistortion::new(
            -0.03354027850117328,
            0.05002203135663782,
            -0.010481337032089163,
            1.001257760443895,
        );
        assert_eq!(b.warper_argument(), "-0.033540 0.050022 -0.010481 1.001258");
        assert_eq!(b.to_string(), b.warper_argument());
        assert_eq!(
            BarrelDistortion::identity().warper_argument(),
            "0.000000 0.000000 0.000000 1.000000"
        );
    }

    #[test]
    fn test_parse_warper_argument() {
        let b: BarrelDistortion = "-0.033540  0.050022\t-0.010481 1.001258".parse().unwrap();
        assert_eq!(b, BarrelDistortion::new(-0.033540, 0.050022, -0.010481, 1.001258));

        assert_eq!(
            BarrelDistortion::from_warper_argument("1 2 3"),
            Err(ParseBarrelError::WrongCount(3))
        );
        assert_eq!(
            BarrelDistortion::from_warper_argument("1 2 x 4"),
            Err(ParseBarrelError::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn test_roundtrip_pixels() {
        let b = BarrelDistortion::new(-0.0335, 0.05, -0.0105, 1.0013);
        for &(x, y) in &[(10.0, 20.0), (400.0, -300.0), (-900.0, 700.0), (0.0, 960.0)] {
            let (xs, ys) = b.distort(x, y, 960.0);
            let (xu, yu) = b.undistort(xs, ys, 960.0);
            assert!(
                (xu - x).abs() < 1e-6 && (yu - y).abs() < 1e-6,
                "Roundtrip failed for ({}, {}): got ({}, {})",
                x,
                y,
                xu,
                yu
            );
        }
    }
}
