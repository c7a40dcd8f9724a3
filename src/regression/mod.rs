//! regression — linear model fitter with inferential diagnostics.
//!
//! Purpose
//! -------
//! Fit `y = X·β + ε` by ordinary least squares for event-study designs and
//! report the statistics needed to judge an event effect.
//!
//! Key behaviors
//! -------------
//! - [`regression`] / [`regression_with_options`] drop NaN responses, solve by
//!   SVD least squares and return [`FittedValues`].
//! - On request, a [`RegressionDiagnostics`] record is written into a
//!   caller-supplied [`DiagnosticsSlot`](crate::diagnostics::DiagnosticsSlot).
//! - [`RegressionOptions`] adds a HAC sandwich covariance on top of the
//!   classical one.
//!
//! Invariants & assumptions
//! ------------------------
//! - No intercept is added; callers include a column of ones.
//! - `nobs > p` after filtering and the retained design has full column rank.
//!
//! Downstream usage
//! ----------------
//! - `event_study::LocalTimeSeries::fit_linear_model` builds a design from an
//!   event window and calls into this module.
//!
//! Testing notes
//! -------------
//! - Unit tests in `ols`, `linalg` and `errors`; the integration test fits
//!   a model on a window built end to end.

pub mod diagnostics;
pub mod errors;
pub mod linalg;
pub mod ols;
pub mod options;

pub use self::diagnostics::{FittedValues, RegressionDiagnostics, RobustCovariance};
pub use self::errors::{RegressionError, RegressionResult};
pub use self::ols::{regression, regression_with_options};
pub use self::options::{CovarianceType, RegressionOptions};
