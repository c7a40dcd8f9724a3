//! inference::sandwich — robust covariance of OLS coefficients.
//!
//! Purpose
//! -------
//! Turn an OLS fit into a heteroskedasticity- and autocorrelation-robust
//! coefficient covariance:
//!
//! ```text
//! V̂ = n · (XᵀX)⁻¹ · S · (XᵀX)⁻¹,     S = HAC cov of g_i = x_i · e_i
//! ```
//!
//! With `KernelType::IID` (or `L = 0`) this is White's HC0 estimator.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` is the NaN-filtered `n×p` design actually used in the fit, and
//!   `residuals` are `y − x·β̂` on the same rows.
//! - `xtx_inv` is the `p×p` inverse already computed by the regression; it
//!   is not recomputed here.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    hac::{HACOptions, calculate_avg_scores_cov},
};
use ndarray::{Array1, Array2, Axis};

/// Per-observation OLS scores `g_i = x_i · e_i` as an `n×p` matrix.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` if `residuals.len() != x.nrows()`.
pub fn ols_scores(x: &Array2<f64>, residuals: &Array1<f64>) -> InferenceResult<Array2<f64>> {
    if residuals.len() != x.nrows() {
        return Err(InferenceError::DimensionMismatch {
            expected: (x.nrows(), 1),
            found: (residuals.len(), 1),
        });
    }
    Ok(x * &residuals.view().insert_axis(Axis(1)))
}

/// HAC sandwich covariance of `β̂`.
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`, `n×p` design used in the fit.
/// - `residuals`: `&Array1<f64>`, length-`n` OLS residuals.
/// - `xtx_inv`: `&Array2<f64>`, `p×p` inverse of `XᵀX`.
/// - `hac_opts`: `&HACOptions`, kernel and bandwidth policy.
///
/// Returns
/// -------
/// `InferenceResult<Array2<f64>>`
///   Symmetric `p×p` robust covariance.
///
/// Errors
/// ------
/// - `DimensionMismatch` on inconsistent shapes.
/// - Anything [`calculate_avg_scores_cov`] returns.
pub fn hac_coefficient_covariance(
    x: &Array2<f64>, residuals: &Array1<f64>, xtx_inv: &Array2<f64>, hac_opts: &HACOptions,
) -> InferenceResult<Array2<f64>> {
    let p = x.ncols();
    if xtx_inv.dim() != (p, p) {
        return Err(InferenceError::DimensionMismatch { expected: (p, p), found: xtx_inv.dim() });
    }
    let scores = ols_scores(x, residuals)?;
    let meat = calculate_avg_scores_cov(hac_opts, &scores)?;
    let n = x.nrows() as f64;
    let mut cov = xtx_inv.dot(&meat).dot(xtx_inv) * n;
    // Symmetrize away round-off from the two products.
    let transposed = cov.t().to_owned();
    cov = (&cov + &transposed) * 0.5;
    Ok(cov)
}
