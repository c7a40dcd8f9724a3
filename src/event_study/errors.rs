//! Unified error handling for the event-study pipeline.
//!
//! `EventStudyError` covers precondition violations of the aligner, the
//! smoother and the window extractor, plus passthrough variants for the
//! frame, regression and diagnostics layers. `EventStudyResult<T>` is the
//! matching alias.
use crate::{diagnostics::DiagnosticsError, frame::FrameError, regression::RegressionError};

pub type EventStudyResult<T> = Result<T, EventStudyError>;

/// Unified error type for event-study operations.
#[derive(Debug, Clone, PartialEq)]
pub enum EventStudyError {
    // ---- Inputs ----
    /// No relative grid indices were supplied.
    EmptyOffsets,

    /// The events table has no rows.
    EmptyEvents,

    /// A required table has zero columns.
    NoColumns { which: &'static str },

    // ---- Window extraction ----
    /// No event timestamp matched the shifted grid for this offset.
    EmptyIntersection { offset: i64, periods: i64 },

    /// Concatenated `(offset, event_time)` keys are not strictly increasing.
    NonMonotonicResult { position: usize },

    /// Requested offset is not part of the local time series.
    UnknownOffset { offset: i64 },

    // ---- Options ----
    /// Coverage threshold outside `[0, 1]`.
    InvalidCoverageThreshold { value: f64 },

    /// Inconsistent reindex options.
    InvalidReindexOptions { reason: &'static str },

    /// Inconsistent smoothing options.
    InvalidSmoothing { reason: &'static str },

    /// A design request selects no predictor at all.
    EmptyDesign,

    // ---- Forwarded ----
    Frame(FrameError),
    Regression(RegressionError),
    Diagnostics(DiagnosticsError),
}

impl From<FrameError> for EventStudyError {
    fn from(err: FrameError) -> Self {
        EventStudyError::Frame(err)
    }
}

impl From<RegressionError> for EventStudyError {
    fn from(err: RegressionError) -> Self {
        EventStudyError::Regression(err)
    }
}

impl From<DiagnosticsError> for EventStudyError {
    fn from(err: DiagnosticsError) -> Self {
        EventStudyError::Diagnostics(err)
    }
}

impl std::error::Error for EventStudyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EventStudyError::Frame(err) => Some(err),
            EventStudyError::Regression(err) => Some(err),
            EventStudyError::Diagnostics(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventStudyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            EventStudyError::EmptyOffsets => {
                write!(f, "Event Study Error: at least one relative grid index is required")
            }
            EventStudyError::EmptyEvents => {
                write!(f, "Event Study Error: events table must have at least one row")
            }
            EventStudyError::NoColumns { which } => {
                write!(f, "Event Study Error: {which} must have at least one column")
            }

            // ---- Window extraction ----
            EventStudyError::EmptyIntersection { offset, periods } => write!(
                f,
                "Event Study Error: no event matched the grid at offset {offset} (periods = {periods})"
            ),
            EventStudyError::NonMonotonicResult { position } => write!(
                f,
                "Event Study Error: local time series keys not strictly increasing at row {position}"
            ),
            EventStudyError::UnknownOffset { offset } => {
                write!(f, "Event Study Error: offset {offset} not present")
            }

            // ---- Options ----
            EventStudyError::InvalidCoverageThreshold { value } => write!(
                f,
                "Event Study Error: coverage threshold must lie in [0, 1], got {value}"
            ),
            EventStudyError::InvalidReindexOptions { reason } => {
                write!(f, "Event Study Error: invalid reindex options: {reason}")
            }
            EventStudyError::InvalidSmoothing { reason } => {
                write!(f, "Event Study Error: invalid smoothing options: {reason}")
            }
            EventStudyError::EmptyDesign => {
                write!(f, "Event Study Error: design selects no predictor")
            }

            // ---- Forwarded ----
            EventStudyError::Frame(err) => write!(f, "{err}"),
            EventStudyError::Regression(err) => write!(f, "{err}"),
            EventStudyError::Diagnostics(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_errors_keep_their_message_and_source() {
        use std::error::Error;

        let err: EventStudyError = FrameError::UnknownColumn { name: "ret".into() }.into();

        assert!(err.to_string().starts_with("Frame Error"));
        assert!(err.source().is_some());
        assert!(EventStudyError::EmptyOffsets.source().is_none());
    }

    #[test]
    fn empty_intersection_names_the_offset() {
        let msg = EventStudyError::EmptyIntersection { offset: -3, periods: 3 }.to_string();
        assert!(msg.contains("-3"));
    }
}
