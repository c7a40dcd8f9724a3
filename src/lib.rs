//! rust_event_study — event-study engine on timestamp-indexed tables.
//!
//! Purpose
//! -------
//! Measure how a system behaves around discrete events: align sparse event
//! features with uniformly sampled grid data, extract the grid rows that sit
//! a fixed number of bars before and after each event, and fit a linear
//! model with inferential statistics to detect an event effect.
//!
//! Key behaviors
//! -------------
//! - [`frame`]: the [`TimeFrame`](frame::TimeFrame) table, shift
//!   frequencies and index set algebra.
//! - [`event_study`]: grid alignment, EMA smoothing, local time series
//!   extraction and design construction.
//! - [`regression`]: OLS with response filtering, classical covariance,
//!   z-scores and p-values.
//! - [`inference`]: HAC kernels, plug-in bandwidths and the sandwich
//!   covariance used by robust regression.
//! - [`diagnostics`]: single-use slots for optional side records.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every table carries a strictly increasing UTC index; this is enforced at
//!   construction and relied on everywhere downstream.
//! - `NaN` is the missing-value marker.
//! - All operations are synchronous pure transforms; no global state.
//!
//! Conventions
//! -----------
//! - Each subtree has its own error enum and `…Result<T>` alias, with `From`
//!   conversions into the layer above.
//! - Non-fatal conditions are reported through `tracing`; the library never
//!   installs a subscriber.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code they cover.
//! - `tests/integration_event_study_pipeline.rs` runs the full flow from raw
//!   events to a fitted model.

pub mod diagnostics;
pub mod event_study;
pub mod frame;
pub mod inference;
pub mod numerical;
pub mod regression;
