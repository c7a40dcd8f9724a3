//! event_study::local_timeseries — slices of grid data around each event.
//!
//! Purpose
//! -------
//! Build the two-level "local time series" at the heart of an event study:
//! for every relative grid index `k` (offset) and every event time `t_0`,
//! the grid row that sits `k` bars away from `t_0`. Rows are keyed by
//! [`LocalKey`] `(offset, event_time)` and carry the grid's columns.
//!
//! Key behaviors
//! -------------
//! - Offsets are sorted ascending and de-duplicated before extraction.
//! - For offset `k` the grid is shifted by `−k` periods: by row position when
//!   no frequency is given, by `−k` units of the frequency otherwise. The
//!   shifted grid is then selected at the event timestamps it shares with
//!   the events index.
//! - Coverage `|found| / |events|` below the configured threshold emits a
//!   `tracing::warn!` event and extraction continues; an offset with no
//!   match at all aborts the whole call.
//! - Per-offset diagnostics ([`LocalTimeseriesInfo`]) are written into an
//!   optional [`DiagnosticsSlot`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Keys are strictly increasing in `(offset, event_time)` order; this is
//!   verified after concatenation.
//! - In row-shift mode a selected row may be all-`NaN` when the shift runs
//!   past either end of the grid; such rows are kept and their data time is
//!   `None`.
//! - Each key's data time is the grid timestamp its values were read from.
//!
//! Downstream usage
//! ----------------
//! - [`LocalTimeSeries::xs`] and [`LocalTimeSeries::mean_by_offset`] for
//!   inspection and average response curves.
//! - [`LocalTimeSeries::design_matrix`] / [`LocalTimeSeries::fit_linear_model`]
//!   flatten the keys away and hand `x`/`y` to [`crate::regression`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover key monotonicity, offset sorting invariance, coverage
//!   diagnostics on a grid with gaps, the empty-intersection failure, data
//!   times in both shift modes, and the accessors.
use crate::{
    diagnostics::{DiagnosticsSlot, ensure_slot_empty},
    event_study::{
        design::{Design, build_design},
        errors::{EventStudyError, EventStudyResult},
        options::{DesignSpec, LocalTimeseriesOptions},
    },
    frame::{
        FrameError, Freq, TimeFrame, Timestamp,
        index::{difference, intersect_positions},
    },
    regression::{RegressionDiagnostics, RegressionOptions, regression_with_options},
};
use ndarray::{Array2, ArrayView1, s};
use std::collections::BTreeMap;

/// Row key of a local time series: offset first, then event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalKey {
    pub offset: i64,
    pub event_time: Timestamp,
}

/// What happened for one offset during extraction.
///
/// Fields
/// ------
/// - `offset`: relative grid index `k`.
/// - `periods`: shift applied to the grid, `−k`.
/// - `freq`: frequency of the shift, if any.
/// - `num_events`, `num_found`, `coverage`: event count, matched count and
///   their ratio.
/// - `indices_with_no_data`: event timestamps without a shifted grid row.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetDiagnostics {
    pub offset: i64,
    pub periods: i64,
    pub freq: Option<Freq>,
    pub num_events: usize,
    pub num_found: usize,
    pub coverage: f64,
    pub indices_with_no_data: Vec<Timestamp>,
}

/// Per-offset extraction record, keyed by offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalTimeseriesInfo {
    pub per_offset: BTreeMap<i64, OffsetDiagnostics>,
}

/// LocalTimeSeries — grid rows keyed by `(offset, event_time)`.
///
/// Fields
/// ------
/// - `keys`: strictly increasing row keys.
/// - `data_times`: grid timestamp each row was read from, `None` for rows
///   shifted in from beyond the grid.
/// - `columns`: grid column names.
/// - `values`: `len × columns.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTimeSeries {
    keys: Vec<LocalKey>,
    data_times: Vec<Option<Timestamp>>,
    columns: Vec<String>,
    values: Array2<f64>,
}

/// Construct relative time series of `grid_data` around each event.
///
/// Parameters
/// ----------
/// - `events`: `&TimeFrame`
///   Event table; its index holds the event times, at least one row and
///   one column.
/// - `grid_data`: `&TimeFrame`
///   Uniform-bar data with at least one column.
/// - `relative_grid_indices`: `&[i64]`
///   Offsets relative to the event bar, e.g. `[-2, -1, 0, 1]`. Order and
///   duplicates do not matter; must be non-empty.
/// - `freq`: `Option<&Freq>`
///   `None` shifts by row position; `Some` shifts timestamps.
/// - `diagnostics`: `Option<&mut DiagnosticsSlot<LocalTimeseriesInfo>>`
///   Empty slot to receive per-offset diagnostics.
///
/// Returns
/// -------
/// `EventStudyResult<LocalTimeSeries>`
///   Rows for every offset in ascending order, events ascending within
///   each offset.
///
/// Errors
/// ------
/// - `EmptyEvents`, `NoColumns`, `EmptyOffsets` on bad inputs.
/// - `EmptyIntersection` if any offset matches no event.
/// - `Frame(..)` if a frequency shift overflows or breaks monotonicity.
/// - `Diagnostics(SlotNotEmpty)` if the slot already holds a record.
///
/// Notes
/// -----
/// - Coverage below 0.9 warns; use
///   [`build_local_timeseries_with_options`] to change the threshold.
///
/// Examples
/// --------
/// ```rust
/// # use chrono::{TimeZone, Utc};
/// # use rust_event_study::event_study::build_local_timeseries;
/// # use rust_event_study::frame::TimeFrame;
/// let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
/// let grid = TimeFrame::from_columns(
///     (1..=5).map(day).collect(),
///     vec![("ret", vec![1.0, 2.0, 3.0, 4.0, 5.0])],
/// )
/// .unwrap();
/// let events = TimeFrame::from_columns(vec![day(3)], vec![("flag", vec![1.0])]).unwrap();
/// let local = build_local_timeseries(&events, &grid, &[1, -1, 0], None, None).unwrap();
/// assert_eq!(local.offsets(), vec![-1, 0, 1]);
/// assert_eq!(local.column("ret").unwrap().to_vec(), vec![2.0, 3.0, 4.0]);
/// ```
pub fn build_local_timeseries(
    events: &TimeFrame, grid_data: &TimeFrame, relative_grid_indices: &[i64], freq: Option<&Freq>,
    diagnostics: Option<&mut DiagnosticsSlot<LocalTimeseriesInfo>>,
) -> EventStudyResult<LocalTimeSeries> {
    let opts = LocalTimeseriesOptions { freq: freq.copied(), ..LocalTimeseriesOptions::default() };
    build_local_timeseries_with_options(events, grid_data, relative_grid_indices, &opts, diagnostics)
}

/// [`build_local_timeseries`] with an explicit coverage threshold.
///
/// Errors
/// ------
/// - As [`build_local_timeseries`], plus `InvalidCoverageThreshold`.
pub fn build_local_timeseries_with_options(
    events: &TimeFrame, grid_data: &TimeFrame, relative_grid_indices: &[i64],
    opts: &LocalTimeseriesOptions, diagnostics: Option<&mut DiagnosticsSlot<LocalTimeseriesInfo>>,
) -> EventStudyResult<LocalTimeSeries> {
    ensure_slot_empty(&diagnostics)?;
    opts.validate()?;
    validate_inputs(events, grid_data, relative_grid_indices)?;

    let mut offsets = relative_grid_indices.to_vec();
    offsets.sort_unstable();
    offsets.dedup();

    let mut selections = Vec::with_capacity(offsets.len());
    for &offset in &offsets {
        selections.push(shift_and_select(events.index(), grid_data, offset, opts)?);
    }

    let total: usize = selections.iter().map(|sel| sel.frame.nrows()).sum();
    let mut keys = Vec::with_capacity(total);
    let mut data_times = Vec::with_capacity(total);
    let mut values = Array2::<f64>::zeros((total, grid_data.ncols()));
    let mut info = LocalTimeseriesInfo::default();
    let mut row = 0;
    for sel in selections {
        let n = sel.frame.nrows();
        values.slice_mut(s![row..row + n, ..]).assign(sel.frame.values());
        keys.extend(
            sel.frame.index().iter().map(|&event_time| LocalKey { offset: sel.offset, event_time }),
        );
        data_times.extend(sel.data_times);
        info.per_offset.insert(sel.offset, sel.diagnostics);
        row += n;
    }
    if let Some(position) = keys.windows(2).position(|w| w[1] <= w[0]) {
        return Err(EventStudyError::NonMonotonicResult { position: position + 1 });
    }

    if let Some(slot) = diagnostics {
        slot.fill(info)?;
    }
    Ok(LocalTimeSeries { keys, data_times, columns: grid_data.columns().to_vec(), values })
}

impl LocalTimeSeries {
    pub fn keys(&self) -> &[LocalKey] {
        &self.keys
    }

    pub fn data_times(&self) -> &[Option<Timestamp>] {
        &self.data_times
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn column(&self, name: &str) -> EventStudyResult<ArrayView1<'_, f64>> {
        Ok(self.values.column(self.column_position(name)?))
    }

    /// Distinct offsets, ascending.
    pub fn offsets(&self) -> Vec<i64> {
        let mut offsets: Vec<i64> = self.keys.iter().map(|k| k.offset).collect();
        offsets.dedup();
        offsets
    }

    /// Cross-section at one offset, indexed by event time.
    ///
    /// Errors
    /// ------
    /// - `UnknownOffset` if no row carries `offset`.
    pub fn xs(&self, offset: i64) -> EventStudyResult<TimeFrame> {
        let rows = self.offset_rows(offset);
        if rows.is_empty() {
            return Err(EventStudyError::UnknownOffset { offset });
        }
        let index = self.keys[rows.clone()].iter().map(|k| k.event_time).collect();
        let values = self.values.slice(s![rows, ..]).to_owned();
        Ok(TimeFrame::new(index, self.columns.clone(), values)?)
    }

    /// Average of `column` at each offset, skipping `NaN`.
    ///
    /// An offset whose values are all `NaN` maps to `NaN`.
    pub fn mean_by_offset(&self, column: &str) -> EventStudyResult<BTreeMap<i64, f64>> {
        let data = self.column(column)?;
        let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
        for (key, &value) in self.keys.iter().zip(data.iter()) {
            let entry = sums.entry(key.offset).or_insert((0.0, 0));
            if !value.is_nan() {
                entry.0 += value;
                entry.1 += 1;
            }
        }
        Ok(sums
            .into_iter()
            .map(|(offset, (sum, count))| {
                let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
                (offset, mean)
            })
            .collect())
    }

    /// Flatten the keys away into a regression design.
    ///
    /// Errors
    /// ------
    /// - `Frame(UnknownColumn)` for a missing response or predictor.
    /// - `EmptyDesign` if `spec` selects no regressor.
    pub fn design_matrix(&self, spec: &DesignSpec) -> EventStudyResult<Design> {
        build_design(self, spec)
    }

    /// Build the design from `spec` and fit it by OLS.
    ///
    /// Returns
    /// -------
    /// `EventStudyResult<Vec<(LocalKey, f64)>>`
    ///   Fitted values keyed by the rows whose response was not `NaN`.
    pub fn fit_linear_model(
        &self, spec: &DesignSpec, opts: &RegressionOptions,
        diagnostics: Option<&mut DiagnosticsSlot<RegressionDiagnostics>>,
    ) -> EventStudyResult<Vec<(LocalKey, f64)>> {
        let design = self.design_matrix(spec)?;
        let fitted = regression_with_options(&design.x, &design.y, opts, diagnostics)?;
        Ok(fitted.iter().map(|(row, value)| (self.keys[row], value)).collect())
    }

    pub(crate) fn column_position(&self, name: &str) -> EventStudyResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FrameError::UnknownColumn { name: name.to_string() }.into())
    }

    /// Contiguous rows carrying `offset`.
    fn offset_rows(&self, offset: i64) -> std::ops::Range<usize> {
        let start = self.keys.partition_point(|k| k.offset < offset);
        let end = self.keys.partition_point(|k| k.offset <= offset);
        start..end
    }
}

// ---- Helper methods ----

struct Selection {
    offset: i64,
    frame: TimeFrame,
    data_times: Vec<Option<Timestamp>>,
    diagnostics: OffsetDiagnostics,
}

fn validate_inputs(
    events: &TimeFrame, grid_data: &TimeFrame, offsets: &[i64],
) -> EventStudyResult<()> {
    if events.is_empty() {
        return Err(EventStudyError::EmptyEvents);
    }
    if events.ncols() == 0 {
        return Err(EventStudyError::NoColumns { which: "events" });
    }
    if grid_data.ncols() == 0 {
        return Err(EventStudyError::NoColumns { which: "grid_data" });
    }
    if offsets.is_empty() {
        return Err(EventStudyError::EmptyOffsets);
    }
    Ok(())
}

/// Shift the grid by `−offset` and select it at the event times.
fn shift_and_select(
    event_index: &[Timestamp], grid_data: &TimeFrame, offset: i64, opts: &LocalTimeseriesOptions,
) -> EventStudyResult<Selection> {
    let periods =
        offset.checked_neg().ok_or(FrameError::TimestampOverflow { periods: offset })?;
    let shifted = grid_data.shift(periods, opts.freq.as_ref())?;
    let matches = intersect_positions(event_index, shifted.index());
    if matches.is_empty() {
        return Err(EventStudyError::EmptyIntersection { offset, periods });
    }

    let num_events = event_index.len();
    let num_found = matches.len();
    let coverage = num_found as f64 / num_events as f64;
    if coverage < opts.coverage_threshold {
        tracing::warn!(
            offset,
            periods,
            coverage,
            threshold = opts.coverage_threshold,
            "low event coverage on shifted grid"
        );
    }

    let positions: Vec<usize> = matches.iter().map(|&(_, j)| j).collect();
    let frame = shifted.select_rows(&positions)?;
    let grid_index = grid_data.index();
    let data_times = positions
        .iter()
        .map(|&j| match opts.freq {
            Some(_) => Some(grid_index[j]),
            None => (j as i64)
                .checked_add(offset)
                .and_then(|source| usize::try_from(source).ok())
                .and_then(|p| grid_index.get(p).copied()),
        })
        .collect();
    tracing::debug!(offset, periods, rows = num_found, "selected shifted grid rows");

    let indices_with_no_data = difference(event_index, frame.index());
    Ok(Selection {
        offset,
        frame,
        data_times,
        diagnostics: OffsetDiagnostics {
            offset,
            periods,
            freq: opts.freq,
            num_events,
            num_found,
            coverage,
            indices_with_no_data,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsError;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
    };
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------
    // Grid: `ret` = day number on the listed days of January 2024.

    fn day(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn grid_on(days: &[u32]) -> TimeFrame {
        TimeFrame::from_columns(
            days.iter().map(|&d| day(d)).collect(),
            vec![("ret", days.iter().map(|&d| d as f64).collect())],
        )
        .unwrap()
    }

    fn events_on(days: &[u32]) -> TimeFrame {
        TimeFrame::from_columns(
            days.iter().map(|&d| day(d)).collect(),
            vec![("flag", vec![1.0; days.len()])],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Keys come out strictly increasing in `(offset, event_time)` and values
    // are read `k` rows away from each event.
    //
    // Given
    // -----
    // - Grid days 1..=10, events on days 3, 5, 8, offsets [-1, 0, 1].
    //
    // Expect
    // ------
    // - 9 rows; offset −1 reads days 2, 4, 7; offset 1 reads days 4, 6, 9.
    fn keys_are_monotonic_and_values_follow_offsets() {
        // Arrange
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[3, 5, 8]);

        // Act
        let local = build_local_timeseries(&events, &grid, &[-1, 0, 1], None, None).unwrap();

        // Assert
        assert_eq!(local.len(), 9);
        assert!(local.keys().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            local.column("ret").unwrap().to_vec(),
            vec![2.0, 4.0, 7.0, 3.0, 5.0, 8.0, 4.0, 6.0, 9.0]
        );
        assert_eq!(local.data_times()[0], Some(day(2)));
        assert_eq!(local.keys()[0], LocalKey { offset: -1, event_time: day(3) });
    }

    #[test]
    fn offset_order_and_duplicates_do_not_matter() {
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[3, 6]);

        let shuffled = build_local_timeseries(&events, &grid, &[1, -2, 0, 1], None, None).unwrap();
        let sorted = build_local_timeseries(&events, &grid, &[-2, 0, 1], None, None).unwrap();

        assert_eq!(shuffled, sorted);
        assert_eq!(sorted.offsets(), vec![-2, 0, 1]);
    }

    #[test]
    // Purpose
    // -------
    // Diagnostics report events missing from the grid for every offset.
    //
    // Given
    // -----
    // - Grid days 1..=10 without day 4; events on days 2, 4, 7.
    //
    // Expect
    // ------
    // - Row-shift mode: day 4 has no data at every offset, coverage 2/3.
    fn coverage_diagnostics_list_events_without_data() {
        // Arrange
        let grid = grid_on(&[1, 2, 3, 5, 6, 7, 8, 9, 10]);
        let events = events_on(&[2, 4, 7]);
        let mut slot = DiagnosticsSlot::new();

        // Act
        let local = build_local_timeseries(&events, &grid, &[0, 2], None, Some(&mut slot)).unwrap();

        // Assert
        assert_eq!(local.len(), 4);
        let info = slot.into_inner().unwrap();
        assert_eq!(info.per_offset.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        for diag in info.per_offset.values() {
            assert_eq!(diag.indices_with_no_data, vec![day(4)]);
            assert_eq!(diag.num_found, 2);
            assert_relative_eq!(diag.coverage, 2.0 / 3.0, epsilon = 1e-12);
            assert!(diag.freq.is_none());
        }
        assert_eq!(info.per_offset[&2].periods, -2);
    }

    #[test]
    fn frequency_shift_records_freq_and_data_times() {
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[1, 5, 8]);
        let freq = Freq::fixed(Duration::days(1)).unwrap();
        let mut slot = DiagnosticsSlot::new();

        let local =
            build_local_timeseries(&events, &grid, &[-1, 0, 1], Some(&freq), Some(&mut slot))
                .unwrap();

        // Offset −1 needs day 0, which is not on the grid.
        assert_eq!(local.len(), 8);
        assert_eq!(local.xs(-1).unwrap().index().to_vec(), vec![day(5), day(8)]);
        assert_eq!(local.xs(-1).unwrap().values().column(0).to_vec(), vec![4.0, 7.0]);
        assert!(local.data_times().iter().all(Option::is_some));
        let info = slot.get().unwrap();
        assert_eq!(info.per_offset[&-1].indices_with_no_data, vec![day(1)]);
        assert_eq!(info.per_offset[&-1].freq, Some(freq));
    }

    #[test]
    fn row_shift_past_grid_end_keeps_nan_row() {
        let grid = grid_on(&[1, 2, 3]);
        let events = events_on(&[3]);

        let local = build_local_timeseries(&events, &grid, &[1], None, None).unwrap();

        assert_eq!(local.len(), 1);
        assert!(local.values()[[0, 0]].is_nan());
        assert_eq!(local.data_times()[0], None);
    }

    #[test]
    fn empty_intersection_aborts() {
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[2, 3]);
        let freq = Freq::fixed(Duration::days(1)).unwrap();

        let result = build_local_timeseries(&events, &grid, &[0, -20], Some(&freq), None);

        assert_eq!(result, Err(EventStudyError::EmptyIntersection { offset: -20, periods: 20 }));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let grid = grid_on(&[1, 2, 3]);
        let events = events_on(&[2]);
        let no_events = TimeFrame::from_columns(Vec::new(), vec![("flag", Vec::new())]).unwrap();
        let no_columns = TimeFrame::from_columns::<String>(vec![day(2)], Vec::new()).unwrap();

        assert_eq!(
            build_local_timeseries(&events, &grid, &[], None, None),
            Err(EventStudyError::EmptyOffsets)
        );
        assert_eq!(
            build_local_timeseries(&no_events, &grid, &[0], None, None),
            Err(EventStudyError::EmptyEvents)
        );
        assert_eq!(
            build_local_timeseries(&no_columns, &grid, &[0], None, None),
            Err(EventStudyError::NoColumns { which: "events" })
        );
        let opts = LocalTimeseriesOptions { freq: None, coverage_threshold: -0.1 };
        assert!(matches!(
            build_local_timeseries_with_options(&events, &grid, &[0], &opts, None),
            Err(EventStudyError::InvalidCoverageThreshold { .. })
        ));
    }

    #[test]
    fn filled_slot_is_rejected() {
        let grid = grid_on(&[1, 2, 3]);
        let events = events_on(&[2]);
        let mut slot = DiagnosticsSlot::new();
        build_local_timeseries(&events, &grid, &[0], None, Some(&mut slot)).unwrap();

        let second = build_local_timeseries(&events, &grid, &[0], None, Some(&mut slot));

        assert_eq!(second, Err(EventStudyError::Diagnostics(DiagnosticsError::SlotNotEmpty)));
    }

    #[test]
    fn accessors_and_average_response_curve() {
        let grid = TimeFrame::from_columns(
            (1..=6).map(day).collect(),
            vec![("ret", vec![1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0])],
        )
        .unwrap();
        let events = events_on(&[2, 4]);

        let local = build_local_timeseries(&events, &grid, &[0, 1], None, None).unwrap();
        let curve = local.mean_by_offset("ret").unwrap();

        // Offset 0 reads NaN (day 2) and 4 (day 4); offset 1 reads 3 and 5.
        assert_eq!(curve[&0], 4.0);
        assert_eq!(curve[&1], 4.0);
        assert!(matches!(
            local.column("missing"),
            Err(EventStudyError::Frame(FrameError::UnknownColumn { .. }))
        ));
        assert_eq!(local.xs(7), Err(EventStudyError::UnknownOffset { offset: 7 }));
    }

    #[test]
    // Purpose
    // -------
    // Offsets at the `i64` extremes read past both ends of the grid without
    // overflowing: every event keeps a NaN row with no data time.
    //
    // Given
    // -----
    // - Grid days 1..=3, events on days 2 and 3, offsets [i64::MIN + 1, i64::MAX].
    //
    // Expect
    // ------
    // - 4 rows, all NaN, all `data_time == None`, full coverage per offset.
    fn extreme_row_offsets_yield_nan_rows() {
        // Arrange
        let grid = grid_on(&[1, 2, 3]);
        let events = events_on(&[2, 3]);
        let mut slot = DiagnosticsSlot::new();

        // Act
        let local = build_local_timeseries(
            &events,
            &grid,
            &[i64::MAX, i64::MIN + 1],
            None,
            Some(&mut slot),
        )
        .unwrap();

        // Assert
        assert_eq!(local.len(), 4);
        assert_eq!(local.offsets(), vec![i64::MIN + 1, i64::MAX]);
        assert!(local.values().iter().all(|v| v.is_nan()));
        assert!(local.data_times().iter().all(Option::is_none));
        let info = slot.into_inner().unwrap();
        assert_eq!(info.per_offset[&i64::MAX].periods, -i64::MAX);
        assert_relative_eq!(info.per_offset[&(i64::MIN + 1)].coverage, 1.0);
    }

    // -------------------------------------------------------------------------
    // Coverage warnings
    // -------------------------------------------------------------------------
    // A layer that records `(offset, coverage)` for every WARN event emitted
    // while it is the thread's default subscriber.

    #[derive(Clone, Default)]
    struct WarnCapture {
        events: Arc<Mutex<Vec<(Option<i64>, Option<f64>)>>>,
    }

    #[derive(Default)]
    struct CoverageFields {
        offset: Option<i64>,
        coverage: Option<f64>,
    }

    impl Visit for CoverageFields {
        fn record_i64(&mut self, field: &Field, value: i64) {
            if field.name() == "offset" {
                self.offset = Some(value);
            }
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            if field.name() == "coverage" {
                self.coverage = Some(value);
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
    }

    impl<S: Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                let mut fields = CoverageFields::default();
                event.record(&mut fields);
                self.events.lock().unwrap().push((fields.offset, fields.coverage));
            }
        }
    }

    fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, Vec<(Option<i64>, Option<f64>)>) {
        let capture = WarnCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let out = tracing::subscriber::with_default(subscriber, f);
        let events = capture.events.lock().unwrap().clone();
        (out, events)
    }

    #[test]
    // Purpose
    // -------
    // Coverage below the threshold emits exactly one warning naming the
    // offset, and extraction still succeeds.
    //
    // Given
    // -----
    // - Grid days 1..=10, events on days 2, 5, 10, freq = 1 day.
    // - Offset 1 needs day 11, which is missing.
    //
    // Expect
    // ------
    // - One WARN with offset = 1 and coverage = 2/3; none for offsets −1, 0.
    fn low_coverage_emits_one_warning_per_offset() {
        // Arrange
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[2, 5, 10]);
        let freq = Freq::fixed(Duration::days(1)).unwrap();

        // Act
        let (local, warnings) = warnings_during(|| {
            build_local_timeseries(&events, &grid, &[-1, 0, 1], Some(&freq), None)
        });

        // Assert
        assert_eq!(local.unwrap().len(), 8);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, Some(1));
        assert_relative_eq!(warnings[0].1.unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn full_coverage_does_not_warn() {
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[2, 5, 10]);
        let freq = Freq::fixed(Duration::days(1)).unwrap();

        let (local, warnings) = warnings_during(|| {
            build_local_timeseries(&events, &grid, &[-1, 0], Some(&freq), None)
        });

        assert_eq!(local.unwrap().len(), 6);
        assert!(warnings.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Coverage exactly equal to the threshold is accepted silently; the
    // warning fires only strictly below it.
    fn coverage_equal_to_threshold_does_not_warn() {
        let grid = grid_on(&(1..=10).collect::<Vec<_>>());
        let events = events_on(&[2, 5, 10]);
        let freq = Freq::fixed(Duration::days(1)).unwrap();
        let at_threshold = LocalTimeseriesOptions::new(Some(freq), 2.0 / 3.0).unwrap();
        let above = LocalTimeseriesOptions::new(Some(freq), 0.7).unwrap();

        let (_, silent) = warnings_during(|| {
            build_local_timeseries_with_options(&events, &grid, &[1], &at_threshold, None)
        });
        let (_, warned) = warnings_during(|| {
            build_local_timeseries_with_options(&events, &grid, &[1], &above, None)
        });

        assert!(silent.is_empty());
        assert_eq!(warned.len(), 1);
    }
}
