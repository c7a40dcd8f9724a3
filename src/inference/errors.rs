//! Unified error handling for robust inference routines.
//!
//! This module defines `InferenceError`, the error type used by HAC
//! bandwidth selection and the sandwich covariance of OLS coefficients.
//! It groups domain failures (nonstationary plug-in fits, tiny
//! denominators, empty score matrices) with a passthrough variant for
//! errors raised by the AR(1) backend. An alias `InferenceResult<T>`
//! standardizes the return type across inference code.

/// Unified error type for inference routines.
///
/// Covers plug-in bandwidth failures, degenerate score matrices and
/// passthrough errors from `arima`. Integrates with `anyhow::Error` via
/// `From`, and provides readable diagnostics through `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Bandwidth selection ----
    /// Stationarity is violated in an AR(1) fit of a score column.
    StationarityViolated { phi: f64 },

    /// Denominator is too close to zero in bandwidth calculation.
    DenominatorTooSmall { denominator: f64 },

    /// Order not supported for bandwidth calculation.
    OrderNotSupported { ord: usize },

    // ---- Scores ----
    /// Score matrix has no rows.
    EmptyScores,

    /// Score, design and covariance dimensions disagree.
    DimensionMismatch { expected: (usize, usize), found: (usize, usize) },

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bandwidth selection ----
            InferenceError::StationarityViolated { phi } => {
                write!(f, "Inference Error: Stationarity violated (phi = {})", phi)
            }
            InferenceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Inference Error: Denominator too small ({}) in bandwidth calculation",
                denominator
            ),
            InferenceError::OrderNotSupported { ord } => {
                write!(f, "Inference Error: Order {} not supported for bandwidth calculation", ord)
            }

            // ---- Scores ----
            InferenceError::EmptyScores => {
                write!(f, "Inference Error: score matrix must have at least one row")
            }
            InferenceError::DimensionMismatch { expected, found } => write!(
                f,
                "Inference Error: dimension mismatch (expected {:?}, found {:?})",
                expected, found
            ),

            // ---- Anyhow catchall ----
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {}", msg),
        }
    }
}
