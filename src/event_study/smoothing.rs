//! event_study::smoothing — iterated exponential moving average kernel.
//!
//! Purpose
//! -------
//! Spread a sparse, grid-aligned event feature over the bars that follow it,
//! so that a single event timestamp becomes a decaying signal the regression
//! can pick up. The kernel is the smooth moving average built from iterated
//! EMAs:
//!
//! ```text
//! τ'   = 2τ / (min_depth + max_depth)
//! α    = 1 − exp(−1/τ')
//! SMA  = mean_{d = min_depth..=max_depth} EMA^d(x; α)
//! ```
//!
//! where `EMA^d` is the EMA applied `d` times.
//!
//! Key behaviors
//! -------------
//! - Each EMA uses adjusted weights: `y_t = Σ w_i x_{t−i} / Σ w_i` over the
//!   observed history, `w_i = (1 − α)^i`.
//! - `NaN` inputs do not contribute but time still passes: weights keep
//!   decaying across them and the last estimate is carried forward.
//! - Output is `NaN` until `max(min_periods, 1)` non-`NaN` observations have
//!   been seen in the column.
//!
//! Invariants & assumptions
//! ------------------------
//! - Columns are smoothed independently; index and column names are kept.
//! - Typical usage fills missing event features with `0` first
//!   ([`TimeFrame::fill_nan`]) so that "no event" decays the signal.
//!
//! Testing notes
//! -------------
//! - Unit tests check the impulse response against the closed form, NaN
//!   carry-forward, the `min_periods` gate and depth averaging.
use crate::{
    event_study::{errors::EventStudyResult, options::SmoothingOptions},
    frame::TimeFrame,
};
use ndarray::{Array1, ArrayView1};

/// Smooth every column of `frame` with the iterated EMA kernel.
///
/// Parameters
/// ----------
/// - `frame`: `&TimeFrame`
///   Grid-aligned signal, rows = time.
/// - `opts`: `&SmoothingOptions`
///   Memory `tau`, warm-up `min_periods` and depth range.
///
/// Returns
/// -------
/// `EventStudyResult<TimeFrame>`
///   Same index and columns as `frame`.
///
/// Errors
/// ------
/// - `InvalidSmoothing` if `opts` fails validation.
///
/// Examples
/// --------
/// ```rust
/// # use chrono::{TimeZone, Utc};
/// # use rust_event_study::event_study::{SmoothingOptions, smooth_moving_average};
/// # use rust_event_study::frame::TimeFrame;
/// let index = (1..=3).map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()).collect();
/// let frame = TimeFrame::from_columns(index, vec![("x", vec![2.0, 2.0, 2.0])]).unwrap();
/// let smoothed = smooth_moving_average(&frame, &SmoothingOptions::ema(4.0).unwrap()).unwrap();
/// assert!((smoothed.values()[[2, 0]] - 2.0).abs() < 1e-12);
/// ```
pub fn smooth_moving_average(
    frame: &TimeFrame, opts: &SmoothingOptions,
) -> EventStudyResult<TimeFrame> {
    opts.validate()?;
    let tau_prime = 2.0 * opts.tau / (opts.min_depth + opts.max_depth) as f64;
    let alpha = 1.0 - (-1.0 / tau_prime).exp();
    let num_depths = (opts.max_depth - opts.min_depth + 1) as f64;

    let mut out = frame.values().to_owned();
    for (j, column) in frame.values().columns().into_iter().enumerate() {
        let mut iterate = column.to_owned();
        let mut total = Array1::<f64>::zeros(column.len());
        for depth in 1..=opts.max_depth {
            iterate = adjusted_ema(iterate.view(), alpha, opts.min_periods);
            if depth >= opts.min_depth {
                total += &iterate;
            }
        }
        out.column_mut(j).assign(&(total / num_depths));
    }
    tracing::debug!(tau = opts.tau, alpha, rows = frame.nrows(), "smoothed event features");

    Ok(frame.with_values(out)?)
}

// ---- Helper methods ----

/// One adjusted EMA pass over `x`.
fn adjusted_ema(x: ArrayView1<'_, f64>, alpha: f64, min_periods: usize) -> Array1<f64> {
    let min_periods = min_periods.max(1);
    let decay = 1.0 - alpha;
    let mut out = Array1::from_elem(x.len(), f64::NAN);
    let mut estimate = f64::NAN;
    let mut old_weight = 0.0;
    let mut nobs = 0usize;
    for (t, &value) in x.iter().enumerate() {
        let observed = !value.is_nan();
        nobs += usize::from(observed);
        if estimate.is_nan() {
            if observed {
                estimate = value;
                old_weight = 1.0;
            }
        } else {
            old_weight *= decay;
            if observed {
                if estimate != value {
                    estimate = (old_weight * estimate + value) / (old_weight + 1.0);
                }
                old_weight += 1.0;
            }
        }
        if nobs >= min_periods {
            out[t] = estimate;
        }
    }
    out
}
