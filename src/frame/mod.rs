//! frame — timestamp-indexed tables and the shift primitive.
//!
//! Purpose
//! -------
//! Supply the in-memory tabular layer the event-study stages operate on:
//! [`TimeFrame`] (strictly increasing UTC index, unique named `f64`
//! columns, `NaN` as the missing marker), [`Freq`] (shift units), and
//! sorted-index set algebra in [`index`].
//!
//! Conventions
//! -----------
//! - Timestamps are `chrono::DateTime<Utc>`, aliased as [`Timestamp`].
//! - Value matrices are row-major `ndarray::Array2<f64>` with rows = time.
//! - Errors are reported via [`FrameError`] / [`FrameResult`]; nothing in
//!   this subtree panics on malformed input.

pub mod errors;
pub mod freq;
pub mod index;
pub mod time_frame;

/// Row label of every table in the crate.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

pub use self::errors::{FrameError, FrameResult};
pub use self::freq::Freq;
pub use self::time_frame::TimeFrame;
