//! event_study::options — configuration for alignment, smoothing, window
//! extraction and design construction.
//!
//! Purpose
//! -------
//! Collect the knobs of every event-study stage in plain option structs with
//! validating constructors and sensible `Default`s, so that the operations
//! themselves take a single `&Options` argument.
//!
//! Key behaviors
//! -------------
//! - [`ReindexOptions`]: fill policy for [`crate::event_study::reindex_event_features`].
//! - [`SmoothingOptions`]: kernel settings for
//!   [`crate::event_study::smooth_moving_average`].
//! - [`LocalTimeseriesOptions`]: shift frequency and coverage threshold for
//!   [`crate::event_study::build_local_timeseries_with_options`].
//! - [`DesignSpec`]: how a local time series is flattened into `x`/`y`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Constructors validate; fields stay public for struct-literal use, in
//!   which case the consuming operation re-validates.
use crate::{
    event_study::errors::{EventStudyError, EventStudyResult},
    frame::Freq,
};
use chrono::Duration;

/// Coverage below which window extraction warns for an offset.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.9;

/// How grid rows without an exact event match are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMethod {
    /// Propagate the last event row at or before the grid timestamp.
    Pad,
    /// Use the first event row at or after the grid timestamp.
    Backfill,
    /// Use the closest event row; ties go to the later row.
    Nearest,
}

/// ReindexOptions — fill policy for reindexing events onto a grid.
///
/// Fields
/// ------
/// - `method`: `Option<FillMethod>`
///   `None` keeps exact matches only.
/// - `limit`: `Option<usize>`
///   Maximum number of consecutive grid rows filled from one event row by
///   `Pad`/`Backfill`; for `Nearest`, the maximum number of grid rows
///   filled on each side of an event row. Requires a method.
/// - `tolerance`: `Option<Duration>`
///   Maximum `|grid_ts − event_ts|` for an inexact match. Requires a method.
/// - `fill_value`: `f64`
///   Value written into unmatched rows. Defaults to `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReindexOptions {
    pub method: Option<FillMethod>,
    pub limit: Option<usize>,
    pub tolerance: Option<Duration>,
    pub fill_value: f64,
}

impl ReindexOptions {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `InvalidReindexOptions` when `limit` or `tolerance` is given without
    ///   a method, or when `tolerance` is negative.
    pub fn new(
        method: Option<FillMethod>, limit: Option<usize>, tolerance: Option<Duration>, fill_value: f64,
    ) -> EventStudyResult<ReindexOptions> {
        let opts = ReindexOptions { method, limit, tolerance, fill_value };
        opts.validate()?;
        Ok(opts)
    }

    /// Fill method only, no limit or tolerance.
    pub fn with_method(method: FillMethod) -> ReindexOptions {
        ReindexOptions { method: Some(method), ..ReindexOptions::default() }
    }

    pub(crate) fn validate(&self) -> EventStudyResult<()> {
        if self.method.is_none() && self.limit.is_some() {
            return Err(EventStudyError::InvalidReindexOptions {
                reason: "limit requires a fill method",
            });
        }
        if self.method.is_none() && self.tolerance.is_some() {
            return Err(EventStudyError::InvalidReindexOptions {
                reason: "tolerance requires a fill method",
            });
        }
        if self.tolerance.is_some_and(|tol| tol < Duration::zero()) {
            return Err(EventStudyError::InvalidReindexOptions {
                reason: "tolerance must be non-negative",
            });
        }
        Ok(())
    }
}

impl Default for ReindexOptions {
    fn default() -> Self {
        ReindexOptions { method: None, limit: None, tolerance: None, fill_value: f64::NAN }
    }
}

/// SmoothingOptions — iterated EMA kernel settings.
///
/// Fields
/// ------
/// - `tau`: `f64`
///   Memory of the kernel in rows, `> 0`.
/// - `min_periods`: `usize`
///   Number of observed (non-NaN) rows required before output is emitted.
/// - `min_depth`, `max_depth`: `usize`
///   Iteration depths averaged together, `1 ≤ min_depth ≤ max_depth`.
///   `(1, 1)` is a plain EMA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingOptions {
    pub tau: f64,
    pub min_periods: usize,
    pub min_depth: usize,
    pub max_depth: usize,
}

impl SmoothingOptions {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `InvalidSmoothing` if `tau` is not finite and positive or the depth
    ///   range is empty or starts at zero.
    pub fn new(
        tau: f64, min_periods: usize, min_depth: usize, max_depth: usize,
    ) -> EventStudyResult<SmoothingOptions> {
        let opts = SmoothingOptions { tau, min_periods, min_depth, max_depth };
        opts.validate()?;
        Ok(opts)
    }

    /// Plain EMA with memory `tau` and no warm-up gate.
    pub fn ema(tau: f64) -> EventStudyResult<SmoothingOptions> {
        SmoothingOptions::new(tau, 0, 1, 1)
    }

    pub(crate) fn validate(&self) -> EventStudyResult<()> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(EventStudyError::InvalidSmoothing { reason: "tau must be finite and > 0" });
        }
        if self.min_depth == 0 || self.min_depth > self.max_depth {
            return Err(EventStudyError::InvalidSmoothing {
                reason: "depths must satisfy 1 <= min_depth <= max_depth",
            });
        }
        Ok(())
    }
}

/// LocalTimeseriesOptions — shift mode and coverage warning threshold.
///
/// Fields
/// ------
/// - `freq`: `Option<Freq>`
///   `None` shifts grid rows by position; `Some` re-timestamps the grid.
/// - `coverage_threshold`: `f64`
///   Offsets whose coverage falls below this fraction emit a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTimeseriesOptions {
    pub freq: Option<Freq>,
    pub coverage_threshold: f64,
}

impl LocalTimeseriesOptions {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `InvalidCoverageThreshold` unless `0 ≤ coverage_threshold ≤ 1`.
    pub fn new(freq: Option<Freq>, coverage_threshold: f64) -> EventStudyResult<Self> {
        let opts = LocalTimeseriesOptions { freq, coverage_threshold };
        opts.validate()?;
        Ok(opts)
    }

    pub(crate) fn validate(&self) -> EventStudyResult<()> {
        if !(0.0..=1.0).contains(&self.coverage_threshold) {
            return Err(EventStudyError::InvalidCoverageThreshold {
                value: self.coverage_threshold,
            });
        }
        Ok(())
    }
}

impl Default for LocalTimeseriesOptions {
    fn default() -> Self {
        LocalTimeseriesOptions { freq: None, coverage_threshold: DEFAULT_COVERAGE_THRESHOLD }
    }
}

/// DesignSpec — flattening of a local time series into a regression.
///
/// Fields
/// ------
/// - `response`: column used as `y`.
/// - `predictors`: columns used as regressors, in order.
/// - `intercept`: prepend a column of ones.
/// - `offset_dummies`: append one indicator per offset. With an intercept
///   the lowest offset is the omitted baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignSpec {
    pub response: String,
    pub predictors: Vec<String>,
    pub intercept: bool,
    pub offset_dummies: bool,
}

impl DesignSpec {
    /// Intercept plus `predictors`, no offset dummies.
    pub fn new<S: Into<String>>(response: S, predictors: Vec<S>) -> DesignSpec {
        DesignSpec {
            response: response.into(),
            predictors: predictors.into_iter().map(Into::into).collect(),
            intercept: true,
            offset_dummies: false,
        }
    }

    pub fn with_intercept(mut self, intercept: bool) -> DesignSpec {
        self.intercept = intercept;
        self
    }

    pub fn with_offset_dummies(mut self, offset_dummies: bool) -> DesignSpec {
        self.offset_dummies = offset_dummies;
        self
    }
}
