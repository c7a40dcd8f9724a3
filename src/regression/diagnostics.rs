//! regression::diagnostics — fitted values and the optional fit record.
//!
//! Purpose
//! -------
//! Define the outputs of the OLS fitter: [`FittedValues`], always returned,
//! and [`RegressionDiagnostics`], filled into a caller-supplied
//! [`DiagnosticsSlot`](crate::diagnostics::DiagnosticsSlot) on request.
//!
//! Conventions
//! -----------
//! - Row positions refer to the caller's original `x`/`y` rows, before NaN
//!   responses were dropped.
//! - Vectors indexed by coefficient follow the column order of `x`.
use crate::inference::HACOptions;
use ndarray::{Array1, Array2};

/// Fitted values `x·β̂` on the rows whose response was not NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedValues {
    /// Original row positions of the retained observations, ascending.
    pub rows: Vec<usize>,
    /// Fitted value per retained row.
    pub values: Array1<f64>,
}

impl FittedValues {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(original_row, fitted_value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows.iter().copied().zip(self.values.iter().copied())
    }
}

/// HAC sandwich covariance block and the statistics derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustCovariance {
    pub hac_opts: HACOptions,
    pub covariance: Array2<f64>,
    pub z_scores: Array1<f64>,
    pub p_values: Array1<f64>,
}

/// RegressionDiagnostics — full record of one OLS fit.
///
/// Fields
/// ------
/// - `nobs`: retained observations (non-NaN responses).
/// - `num_predictors`: columns of the design, `p`.
/// - `y_mean`, `tss`: response mean and total sum of squares.
/// - `beta_hat`, `rss`, `r_squared`: coefficients, residual sum of squares
///   and `1 − rss/tss`. `r_squared` is not special-cased when `tss == 0`.
/// - `sigma_hat_sq`: `rss / (nobs − p)`.
/// - `beta_hat_covar`: `σ̂²·(XᵀX)⁻¹`.
/// - `beta_hat_z_score`: `β̂ / sqrt(diag(beta_hat_covar))`.
/// - `beta_hat_p_value`: two-sided standard-normal p-values of the z-scores.
/// - `robust`: HAC block when requested through `RegressionOptions`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionDiagnostics {
    pub nobs: usize,
    pub num_predictors: usize,
    pub y_mean: f64,
    pub tss: f64,
    pub beta_hat: Array1<f64>,
    pub rss: f64,
    pub r_squared: f64,
    pub sigma_hat_sq: f64,
    pub beta_hat_covar: Array2<f64>,
    pub beta_hat_z_score: Array1<f64>,
    pub beta_hat_p_value: Array1<f64>,
    pub robust: Option<RobustCovariance>,
}

impl RegressionDiagnostics {
    /// Residual degrees of freedom, `nobs − p`.
    pub fn df_resid(&self) -> usize {
        self.nobs - self.num_predictors
    }

    /// Classical standard errors.
    pub fn standard_errors(&self) -> Array1<f64> {
        self.beta_hat_covar.diag().mapv(f64::sqrt)
    }
}
