//! event_study::align — put sparse event features on the data grid.
//!
//! Purpose
//! -------
//! Events arrive at irregular timestamps; grid data lives on uniform bars.
//! Before event features can be smoothed or joined with grid columns they
//! must be reindexed onto the grid's timestamps. This module provides that
//! reindex and the right join that follows it.
//!
//! Key behaviors
//! -------------
//! - [`reindex_event_features`] maps every grid timestamp to an event row
//!   according to [`ReindexOptions`]: exact matches always; `Pad`,
//!   `Backfill` or `Nearest` fills optionally bounded by `limit` and
//!   `tolerance`; `fill_value` elsewhere.
//! - [`merge_event_features`] appends the grid columns to features already
//!   (or newly) indexed by the grid.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both inputs are [`TimeFrame`]s, so their indexes are strictly
//!   increasing by construction.
//! - The output index is exactly the grid index; the output columns are
//!   exactly the event columns, in order.
//!
//! Conventions
//! -----------
//! - `limit` counts consecutive inexact fills from the same event row. An
//!   exact match resets the count.
//! - `Nearest` resolves ties in favour of the later event row; `limit` and
//!   `tolerance` apply to it the same way as to `Pad`/`Backfill`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the default exact-match reindex, each fill method,
//!   limit and tolerance gating, custom fill values, and merge overlap
//!   detection.
use crate::{
    event_study::{
        errors::EventStudyResult,
        options::{FillMethod, ReindexOptions},
    },
    frame::{TimeFrame, Timestamp},
};
use chrono::Duration;
use ndarray::Array2;

/// Reindex `events` onto the timestamps of `grid_data`.
///
/// Parameters
/// ----------
/// - `events`: `&TimeFrame`
///   Event features at event timestamps.
/// - `grid_data`: `&TimeFrame`
///   Target grid; only its index is used.
/// - `opts`: `&ReindexOptions`
///   Fill policy. `ReindexOptions::default()` keeps exact matches and writes
///   `NaN` everywhere else.
///
/// Returns
/// -------
/// `EventStudyResult<TimeFrame>`
///   Frame indexed by `grid_data.index()` with the columns of `events`.
///
/// Errors
/// ------
/// - `InvalidReindexOptions` if `opts` fails validation.
///
/// Examples
/// --------
/// ```rust
/// # use chrono::{TimeZone, Utc};
/// # use rust_event_study::event_study::{ReindexOptions, reindex_event_features};
/// # use rust_event_study::frame::TimeFrame;
/// let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
/// let grid = TimeFrame::from_columns((1..=4).map(day).collect(), vec![("ret", vec![0.0; 4])]).unwrap();
/// let events = TimeFrame::from_columns(vec![day(2)], vec![("surprise", vec![1.5])]).unwrap();
/// let aligned = reindex_event_features(&events, &grid, &ReindexOptions::default()).unwrap();
/// assert_eq!(aligned.nrows(), 4);
/// assert_eq!(aligned.values()[[1, 0]], 1.5);
/// assert!(aligned.values()[[2, 0]].is_nan());
/// ```
pub fn reindex_event_features(
    events: &TimeFrame, grid_data: &TimeFrame, opts: &ReindexOptions,
) -> EventStudyResult<TimeFrame> {
    opts.validate()?;
    let source = events.index();
    let target = grid_data.index();

    let mut indexer = match opts.method {
        None => exact_indexer(events, target),
        Some(FillMethod::Pad) => pad_indexer(source, target, opts.limit),
        Some(FillMethod::Backfill) => backfill_indexer(source, target, opts.limit),
        Some(FillMethod::Nearest) => nearest_indexer(source, target, opts.limit),
    };
    if let Some(tolerance) = opts.tolerance {
        apply_tolerance(&mut indexer, source, target, tolerance);
    }

    let mut values = Array2::from_elem((target.len(), events.ncols()), opts.fill_value);
    for (i, matched) in indexer.iter().enumerate() {
        if let Some(j) = *matched {
            values.row_mut(i).assign(&events.values().row(j));
        }
    }
    let matched = indexer.iter().filter(|m| m.is_some()).count();
    tracing::debug!(grid_rows = target.len(), matched, "reindexed event features onto grid");

    Ok(TimeFrame::new(target.to_vec(), events.columns().to_vec(), values)?)
}

/// Right join of event features onto the grid.
///
/// `features` is reindexed onto `grid_data` with default options unless it
/// already shares the grid index; the grid columns are appended to its right.
///
/// Errors
/// ------
/// - `Frame(OverlappingColumns)` if a column name appears in both tables.
pub fn merge_event_features(
    features: &TimeFrame, grid_data: &TimeFrame,
) -> EventStudyResult<TimeFrame> {
    let merged = if features.index() == grid_data.index() {
        features.hstack(grid_data)?
    } else {
        reindex_event_features(features, grid_data, &ReindexOptions::default())?
            .hstack(grid_data)?
    };
    Ok(merged)
}

// ---- Helper methods ----

fn exact_indexer(events: &TimeFrame, target: &[Timestamp]) -> Vec<Option<usize>> {
    target.iter().map(|ts| events.position_of(ts)).collect()
}

/// Last source row at or before each target, with run-length `limit`.
fn pad_indexer(source: &[Timestamp], target: &[Timestamp], limit: Option<usize>) -> Vec<Option<usize>> {
    let mut out = vec![None; target.len()];
    let mut seen = 0usize;
    let mut run: Option<(usize, usize)> = None;
    for (i, ts) in target.iter().enumerate() {
        while seen < source.len() && source[seen] <= *ts {
            seen += 1;
        }
        if seen == 0 {
            continue;
        }
        out[i] = gated_candidate(seen - 1, source[seen - 1] == *ts, &mut run, limit);
    }
    out
}

/// First source row at or after each target, with run-length `limit`.
fn backfill_indexer(
    source: &[Timestamp], target: &[Timestamp], limit: Option<usize>,
) -> Vec<Option<usize>> {
    let mut out = vec![None; target.len()];
    let mut first = source.len();
    let mut run: Option<(usize, usize)> = None;
    for (i, ts) in target.iter().enumerate().rev() {
        while first > 0 && source[first - 1] >= *ts {
            first -= 1;
        }
        if first == source.len() {
            continue;
        }
        out[i] = gated_candidate(first, source[first] == *ts, &mut run, limit);
    }
    out
}

/// Accept `candidate` unless it has already filled `limit` consecutive
/// inexact rows. `run` tracks `(candidate, fills so far)`.
fn gated_candidate(
    candidate: usize, exact: bool, run: &mut Option<(usize, usize)>, limit: Option<usize>,
) -> Option<usize> {
    if exact {
        *run = Some((candidate, 0));
        return Some(candidate);
    }
    let fills = match *run {
        Some((row, fills)) if row == candidate => fills + 1,
        _ => 1,
    };
    *run = Some((candidate, fills));
    limit.is_none_or(|limit| fills <= limit).then_some(candidate)
}

fn nearest_indexer(
    source: &[Timestamp], target: &[Timestamp], limit: Option<usize>,
) -> Vec<Option<usize>> {
    let left = pad_indexer(source, target, limit);
    let right = backfill_indexer(source, target, limit);
    target
        .iter()
        .zip(left.into_iter().zip(right))
        .map(|(ts, pair)| match pair {
            (Some(l), Some(r)) => {
                let left_distance = *ts - source[l];
                let right_distance = source[r] - *ts;
                if left_distance < right_distance { Some(l) } else { Some(r) }
            }
            (l, r) => l.or(r),
        })
        .collect()
}

fn apply_tolerance(
    indexer: &mut [Option<usize>], source: &[Timestamp], target: &[Timestamp], tolerance: Duration,
) {
    for (matched, ts) in indexer.iter_mut().zip(target) {
        if let Some(j) = *matched {
            if (*ts - source[j]).abs() > tolerance {
                *matched = None;
            }
        }
    }
}
