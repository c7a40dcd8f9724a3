//! regression::ols — ordinary least squares with inferential statistics.
//!
//! Purpose
//! -------
//! Fit `y = X·β + ε` by least squares and report, on request, the full set of
//! fit statistics needed to judge an event effect: response mean, TSS, RSS,
//! R², residual variance, coefficient covariance, z-scores and p-values,
//! optionally complemented by a HAC sandwich covariance.
//!
//! Key behaviors
//! -------------
//! - Drop observations whose response is NaN; `nobs` counts the rest.
//! - Solve with an SVD least-squares routine rather than the normal
//!   equations; invert `XᵀX` by Cholesky only for the covariance.
//! - Never add an intercept. Callers who want one include a column of ones.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` is `n×p` with `p ≥ 1`, `y` has length `n`.
//! - After filtering, `nobs > p`, the design is finite and has full column
//!   rank; anything else is an error.
//! - `r² = 1 − rss/tss` is reported as computed; with a constant response
//!   (`tss == 0`) it is non-finite.
//!
//! Testing notes
//! -------------
//! - Unit tests cover exact recovery of β, NaN filtering, the degrees of
//!   freedom failure, closed-form statistics for a simple-mean model, the
//!   diagnostics-slot contract, and the HAC branch.
use crate::{
    diagnostics::{DiagnosticsSlot, ensure_slot_empty},
    inference::hac_coefficient_covariance,
    regression::{
        diagnostics::{FittedValues, RegressionDiagnostics, RobustCovariance},
        errors::{RegressionError, RegressionResult},
        linalg::{gram_inverse, solve_least_squares},
        options::{CovarianceType, RegressionOptions},
    },
};
use ndarray::{Array1, Array2, Axis};
use statrs::distribution::{ContinuousCDF, Normal};

/// Linear regression of `y` on the columns of `x`, classical covariance.
///
/// Parameters
/// ----------
/// - `x`: `&Array2<f64>`
///   `n×p` design matrix. No intercept is added.
/// - `y`: `&Array1<f64>`
///   Length-`n` response; NaN entries are dropped together with their rows.
/// - `diagnostics`: `Option<&mut DiagnosticsSlot<RegressionDiagnostics>>`
///   Empty slot to receive the fit record, or `None`.
///
/// Returns
/// -------
/// `RegressionResult<FittedValues>`
///   Fitted values on the retained rows.
///
/// Errors
/// ------
/// - `ShapeMismatch`, `NoPredictors`, `NonFiniteDesign`, `NonFiniteResponse`.
/// - `InsufficientDegreesOfFreedom` when `nobs ≤ p`.
/// - `RankDeficient` / `SingularGram` for degenerate designs.
/// - `Diagnostics` if the slot is already filled.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_event_study::diagnostics::DiagnosticsSlot;
/// # use rust_event_study::regression::regression;
/// let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
/// let y = array![1.0, 3.0, 5.0, 7.0];
/// let mut slot = DiagnosticsSlot::new();
/// let fitted = regression(&x, &y, Some(&mut slot)).unwrap();
/// assert_eq!(fitted.len(), 4);
/// let info = slot.get().unwrap();
/// assert!((info.beta_hat[1] - 2.0).abs() < 1e-10);
/// ```
pub fn regression(
    x: &Array2<f64>, y: &Array1<f64>, diagnostics: Option<&mut DiagnosticsSlot<RegressionDiagnostics>>,
) -> RegressionResult<FittedValues> {
    regression_with_options(x, y, &RegressionOptions::default(), diagnostics)
}

/// [`regression`] with an explicit covariance policy.
pub fn regression_with_options(
    x: &Array2<f64>, y: &Array1<f64>, opts: &RegressionOptions,
    diagnostics: Option<&mut DiagnosticsSlot<RegressionDiagnostics>>,
) -> RegressionResult<FittedValues> {
    ensure_slot_empty(&diagnostics)?;
    validate_shapes(x, y)?;

    let rows: Vec<usize> = (0..y.len()).filter(|&i| !y[i].is_nan()).collect();
    let nobs = rows.len();
    let num_predictors = x.ncols();
    if nobs <= num_predictors {
        return Err(RegressionError::InsufficientDegreesOfFreedom { nobs, num_predictors });
    }
    let x = x.select(Axis(0), &rows);
    let y = y.select(Axis(0), &rows);
    validate_finite(&x, &y, &rows)?;

    let y_mean = y.sum() / nobs as f64;
    let centered = &y - y_mean;
    let tss = centered.dot(&centered);

    let beta_hat = solve_least_squares(&x, &y)?;
    let fitted = x.dot(&beta_hat);
    let residuals = &y - &fitted;
    let rss = residuals.dot(&residuals);
    let r_squared = 1.0 - rss / tss;

    let xtx_inv = gram_inverse(&x)?;
    let sigma_hat_sq = rss / (nobs - num_predictors) as f64;
    let beta_hat_covar = &xtx_inv * sigma_hat_sq;
    let beta_hat_z_score = z_scores(&beta_hat, &beta_hat_covar);
    let beta_hat_p_value = two_sided_p_values(&beta_hat_z_score);

    tracing::debug!(nobs, num_predictors, rss, tss, r_squared, "fitted linear model");

    if let Some(slot) = diagnostics {
        let robust = match &opts.covariance {
            CovarianceType::Classical => None,
            CovarianceType::Hac(hac_opts) => {
                let covariance = hac_coefficient_covariance(&x, &residuals, &xtx_inv, hac_opts)?;
                let z = z_scores(&beta_hat, &covariance);
                let p_values = two_sided_p_values(&z);
                Some(RobustCovariance {
                    hac_opts: hac_opts.clone(),
                    covariance,
                    z_scores: z,
                    p_values,
                })
            }
        };
        slot.fill(RegressionDiagnostics {
            nobs,
            num_predictors,
            y_mean,
            tss,
            beta_hat,
            rss,
            r_squared,
            sigma_hat_sq,
            beta_hat_covar,
            beta_hat_z_score,
            beta_hat_p_value,
            robust,
        })?;
    }

    Ok(FittedValues { rows, values: fitted })
}

// ---- Helper methods ----

fn validate_shapes(x: &Array2<f64>, y: &Array1<f64>) -> RegressionResult<()> {
    if x.nrows() != y.len() {
        return Err(RegressionError::ShapeMismatch { x_rows: x.nrows(), y_len: y.len() });
    }
    if x.ncols() == 0 {
        return Err(RegressionError::NoPredictors);
    }
    Ok(())
}

/// Check retained rows; reported positions are the caller's original rows.
fn validate_finite(x: &Array2<f64>, y: &Array1<f64>, rows: &[usize]) -> RegressionResult<()> {
    for (k, &row) in rows.iter().enumerate() {
        if y[k].is_infinite() {
            return Err(RegressionError::NonFiniteResponse { row, value: y[k] });
        }
        if let Some((col, &value)) = x.row(k).iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RegressionError::NonFiniteDesign { row, col, value });
        }
    }
    Ok(())
}

fn z_scores(beta_hat: &Array1<f64>, covariance: &Array2<f64>) -> Array1<f64> {
    beta_hat / &covariance.diag().mapv(f64::sqrt)
}

fn two_sided_p_values(z: &Array1<f64>) -> Array1<f64> {
    let normal = Normal::standard();
    z.mapv(|v| 2.0 * normal.sf(v.abs()))
}
