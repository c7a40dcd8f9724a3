//! Numerical tolerances shared by the regression and inference layers.
//!
//! - [`STATIONARITY_MARGIN`]: slack keeping AR(1) plug-in fits strictly
//!   inside the unit circle (`|φ| < 1 − margin`).
//! - [`GENERAL_TOL`]: absolute floor for denominators that must be
//!   meaningfully positive.
//! - [`RANK_RCOND`]: relative cutoff for singular values in least squares,
//!   scaled like LAPACK's default `rcond` by `max(n, p) · σ_max`.

/// Safety margin for strict stationarity of AR(1) plug-in fits.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Absolute tolerance for denominators treated as numerically zero.
pub const GENERAL_TOL: f64 = 1e-12;

/// Relative singular-value cutoff used to detect rank deficiency.
pub const RANK_RCOND: f64 = f64::EPSILON;

/// Singular-value threshold for an `n × p` design with largest singular
/// value `sigma_max`.
pub fn rank_threshold(n: usize, p: usize, sigma_max: f64) -> f64 {
    RANK_RCOND * (n.max(p) as f64) * sigma_max
}
