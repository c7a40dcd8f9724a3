//! event_study — align events with grid data and extract event windows.
//!
//! Purpose
//! -------
//! Measure how a system behaves around discrete events. The flow is:
//!
//! ```text
//! events ──► reindex_event_features ──► smooth_moving_average ──► merge_event_features
//!    │                                                                    │
//!    └──────────────────────► build_local_timeseries ◄── grid_data ◄──────┘
//!                                       │
//!                         design_matrix / fit_linear_model
//! ```
//!
//! Key behaviors
//! -------------
//! - [`reindex_event_features`] / [`merge_event_features`]: put event
//!   features on the grid and join them with the grid columns.
//! - [`smooth_moving_average`]: spread event impulses with an iterated EMA.
//! - [`build_local_timeseries`]: `(offset, event_time)`-keyed rows of grid
//!   data around each event, with coverage warnings and optional
//!   diagnostics.
//! - [`LocalTimeSeries::design_matrix`] / [`LocalTimeSeries::fit_linear_model`]:
//!   flatten into `x`/`y` and fit by OLS.
//!
//! Invariants & assumptions
//! ------------------------
//! - All tables are [`TimeFrame`](crate::frame::TimeFrame)s with strictly
//!   increasing UTC indexes.
//! - Grid data is expected to sit on uniform bars; nothing here resamples.
//!
//! Conventions
//! -----------
//! - Offsets are signed bar counts: negative before the event, positive
//!   after, `0` the event bar.
//! - Errors are reported via [`EventStudyError`] / [`EventStudyResult`];
//!   coverage shortfalls are `tracing` warnings, not errors.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; `tests/` runs the whole flow.

pub mod align;
pub mod design;
pub mod errors;
pub mod local_timeseries;
pub mod options;
pub mod smoothing;

pub use self::align::{merge_event_features, reindex_event_features};
pub use self::design::Design;
pub use self::errors::{EventStudyError, EventStudyResult};
pub use self::local_timeseries::{
    LocalKey, LocalTimeSeries, LocalTimeseriesInfo, OffsetDiagnostics, build_local_timeseries,
    build_local_timeseries_with_options,
};
pub use self::options::{
    DEFAULT_COVERAGE_THRESHOLD, DesignSpec, FillMethod, LocalTimeseriesOptions, ReindexOptions,
    SmoothingOptions,
};
pub use self::smoothing::smooth_moving_average;
