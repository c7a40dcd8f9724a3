//! inference — robust (HAC) covariance for OLS coefficients.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification for the linear model
//! fitted on event-study windows. Stacked event windows are rarely IID:
//! neighbouring offsets of the same event share shocks, and volatility
//! clusters around events. This module supplies the HAC machinery used by
//! `regression` when `CovarianceType::Hac` is requested.
//!
//! Key behaviors
//! -------------
//! - [`InferenceError`] / [`InferenceResult`] for inference failures.
//! - [`KernelType`] tapers and Andrews plug-in bandwidths.
//! - [`HACOptions`] and [`calculate_avg_scores_cov`] for the HAC covariance
//!   of the average score.
//! - [`hac_coefficient_covariance`] for the sandwich covariance of `β̂`.
//!
//! Conventions
//! -----------
//! - Score matrices are `n×p`, rows = observations in stacking order.
//! - All functions are pure; failures surface as [`InferenceResult`].
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the integration test exercises
//!   the HAC path end to end through the regression entry point.

pub mod errors;
pub mod hac;
pub mod kernel;
pub mod sandwich;

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{HACOptions, calculate_avg_scores_cov};
pub use self::kernel::KernelType;
pub use self::sandwich::{hac_coefficient_covariance, ols_scores};
