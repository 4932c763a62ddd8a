//! # barrelfit
//!
//! Convert a two-term **Brown-Conrady radial** lens distortion model `(k1, k2)`
//! into the four-coefficient **barrel** model `(a, b, c, d)` understood by
//! ImageMagick's `-distort barrel` operator.
//!
//! The two models are different polynomial families, so the conversion is a
//! best fit rather than an identity:
//!
//! ```text
//! radial:  r'  = r × (1 + k1·r² + k2·r⁴)      r = radius / focal length
//! barrel:  r'' = r × (a·r³ + b·r² + c·r + d)   r = radius / (height / 2)
//! ```
//!
//! ## Example
//!
//! ```
//! use barrelfit::{fit_barrel_distortion, RadialDistortion, SensorGeometry};
//!
//! let sensor = SensorGeometry::new(2560, 1920);
//! let radial = RadialDistortion::new(1242.36, 0.03462446, -0.03762977);
//!
//! let fit = fit_barrel_distortion(&sensor, &radial).unwrap();
//! assert_eq!(fit.model.warper_argument(), "-0.033540 0.050022 -0.010481 1.001258");
//!
//! // convert source.png -distort barrel '-0.033540 0.050022 -0.010481 1.001258' out.png
//! println!("-distort barrel '{}'", fit.model);
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Rescale** — express k1, k2 in half-sensor-height units:
//!    `kn1 = k1·s²`, `kn2 = k2·s⁴` with `s = (height / 2) / f`
//! 2. **Sample** — match both curves at r ∈ {0.25, 0.5, 0.75, 1.0}
//!    (r = 0 is matched by construction)
//! 3. **Solve** — set the gradient of the summed squared residual to zero and
//!    solve the resulting 4×4 system by LU decomposition
//!
//! The fit is deterministic, allocation-free and safe to call from any thread.

pub mod distortion;
mod sensor;

pub use distortion::{
    compare_models, convert_k_to_abcd, fit_barrel_distortion, BarrelDistortion, BarrelFitResult,
    CompareConfig, CompareReport, Distortion, FitError, ParseBarrelError, RadialDistortion,
};
pub use sensor::SensorGeometry;
