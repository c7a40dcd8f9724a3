//! regression::errors — failures of the least-squares fitter.
//!
//! [`RegressionError`] groups input-shape violations, degenerate designs
//! (too few observations, rank deficiency, singular `XᵀX`), non-finite
//! inputs, and errors forwarded from the robust-inference layer and from
//! diagnostics-slot misuse. [`RegressionResult<T>`] is the matching alias.
use crate::{diagnostics::DiagnosticsError, inference::InferenceError};

pub type RegressionResult<T> = Result<T, RegressionError>;

/// Unified error type for OLS fitting.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionError {
    // ---- Input validation ----
    /// `x` and `y` disagree on the number of observations.
    ShapeMismatch { x_rows: usize, y_len: usize },

    /// The design matrix has no columns.
    NoPredictors,

    /// A retained design entry is NaN or ±∞.
    NonFiniteDesign { row: usize, col: usize, value: f64 },

    /// A response entry is ±∞ (NaN entries are filtered, not rejected).
    NonFiniteResponse { row: usize, value: f64 },

    // ---- Degenerate designs ----
    /// Residual degrees of freedom `nobs − p` must be positive.
    InsufficientDegreesOfFreedom { nobs: usize, num_predictors: usize },

    /// The retained design does not have full column rank.
    RankDeficient { rank: usize, num_predictors: usize },

    /// `XᵀX` is not numerically positive definite.
    SingularGram,

    /// Backend least-squares solve failed.
    LeastSquaresFailed { reason: String },

    // ---- Forwarded ----
    Inference(InferenceError),
    Diagnostics(DiagnosticsError),
}

impl From<InferenceError> for RegressionError {
    fn from(err: InferenceError) -> Self {
        RegressionError::Inference(err)
    }
}

impl From<DiagnosticsError> for RegressionError {
    fn from(err: DiagnosticsError) -> Self {
        RegressionError::Diagnostics(err)
    }
}

impl std::error::Error for RegressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegressionError::Inference(err) => Some(err),
            RegressionError::Diagnostics(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            RegressionError::ShapeMismatch { x_rows, y_len } => write!(
                f,
                "Regression Error: design has {x_rows} rows but response has {y_len} entries"
            ),
            RegressionError::NoPredictors => {
                write!(f, "Regression Error: design matrix must have at least one column")
            }
            RegressionError::NonFiniteDesign { row, col, value } => write!(
                f,
                "Regression Error: non-finite design entry {value} at row {row}, column {col}"
            ),
            RegressionError::NonFiniteResponse { row, value } => {
                write!(f, "Regression Error: infinite response {value} at row {row}")
            }

            // ---- Degenerate designs ----
            RegressionError::InsufficientDegreesOfFreedom { nobs, num_predictors } => write!(
                f,
                "Regression Error: nobs = {nobs} must exceed the number of predictors \
                 ({num_predictors})"
            ),
            RegressionError::RankDeficient { rank, num_predictors } => write!(
                f,
                "Regression Error: design has rank {rank} < {num_predictors} predictors"
            ),
            RegressionError::SingularGram => {
                write!(f, "Regression Error: XᵀX is singular and cannot be inverted")
            }
            RegressionError::LeastSquaresFailed { reason } => {
                write!(f, "Regression Error: least-squares solve failed: {reason}")
            }

            // ---- Forwarded ----
            RegressionError::Inference(err) => write!(f, "Regression Error: {err}"),
            RegressionError::Diagnostics(err) => write!(f, "Regression Error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_embeds_degrees_of_freedom() {
        let err = RegressionError::InsufficientDegreesOfFreedom { nobs: 2, num_predictors: 2 };
        let msg = err.to_string();
        assert!(msg.contains("nobs = 2"));
    }

    #[test]
    fn forwarded_errors_expose_source() {
        let err: RegressionError = InferenceError::EmptyScores.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
