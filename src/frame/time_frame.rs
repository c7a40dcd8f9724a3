//! frame::time_frame — timestamp-indexed table of named `f64` columns.
//!
//! Purpose
//! -------
//! Provide the tabular container every event-study stage consumes and
//! produces: a strictly increasing UTC timestamp index, a list of unique
//! column names, and a dense row-major value matrix. `NaN` is the missing
//! marker throughout.
//!
//! Key behaviors
//! -------------
//! - Validate shape, column uniqueness and index monotonicity once at
//!   construction so downstream code can rely on them.
//! - Provide the generic shift primitive [`TimeFrame::shift`]: by row
//!   position when no frequency is given, by re-timestamping otherwise.
//! - Row selection by position and column-wise concatenation on an identical
//!   index.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values.dim() == (index.len(), columns.len())`.
//! - `index` is strictly increasing; `columns` are unique.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor validation, both shift modes, row
//!   selection and `hstack` overlap detection.
use crate::frame::{
    Timestamp,
    errors::{FrameError, FrameResult},
    freq::Freq,
    index::validate_strictly_increasing,
};
use ndarray::{Array2, ArrayView1, Axis, concatenate};
use std::collections::HashSet;

/// TimeFrame — validated timestamp-indexed table.
///
/// Fields
/// ------
/// - `index`: `Vec<Timestamp>`
///   Strictly increasing row labels.
/// - `columns`: `Vec<String>`
///   Unique column names.
/// - `values`: `Array2<f64>`
///   `nrows × ncols` data; `NaN` marks missing entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFrame {
    index: Vec<Timestamp>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl TimeFrame {
    /// Construct a validated [`TimeFrame`].
    ///
    /// Errors
    /// ------
    /// - `FrameError::ShapeMismatch` if `values` is not
    ///   `index.len() × columns.len()`.
    /// - `FrameError::DuplicateColumn` for repeated names.
    /// - `FrameError::NonMonotonicIndex` if `index` is not strictly
    ///   increasing.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_event_study::frame::TimeFrame;
    /// # use chrono::{TimeZone, Utc};
    /// # use ndarray::array;
    /// let index = vec![
    ///     Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
    /// ];
    /// let frame = TimeFrame::new(index, vec!["ret".into()], array![[0.1], [-0.2]]).unwrap();
    /// assert_eq!(frame.nrows(), 2);
    /// ```
    pub fn new(
        index: Vec<Timestamp>, columns: Vec<String>, values: Array2<f64>,
    ) -> FrameResult<TimeFrame> {
        let expected = (index.len(), columns.len());
        if values.dim() != expected {
            return Err(FrameError::ShapeMismatch { expected, found: values.dim() });
        }
        validate_unique_columns(&columns)?;
        validate_strictly_increasing(&index)?;
        Ok(TimeFrame { index, columns, values })
    }

    /// Construct from `(name, values)` column pairs.
    pub fn from_columns<S: Into<String>>(
        index: Vec<Timestamp>, columns: Vec<(S, Vec<f64>)>,
    ) -> FrameResult<TimeFrame> {
        let nrows = index.len();
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Array2::<f64>::zeros((nrows, columns.len()));
        for (j, (name, data)) in columns.into_iter().enumerate() {
            let name = name.into();
            if data.len() != nrows {
                return Err(FrameError::ColumnLengthMismatch {
                    name,
                    expected: nrows,
                    found: data.len(),
                });
            }
            for (i, value) in data.into_iter().enumerate() {
                values[[i, j]] = value;
            }
            names.push(name);
        }
        TimeFrame::new(index, names, values)
    }

    /// A frame over `index` and `columns` with every entry set to `fill_value`.
    pub fn filled(
        index: Vec<Timestamp>, columns: Vec<String>, fill_value: f64,
    ) -> FrameResult<TimeFrame> {
        let values = Array2::from_elem((index.len(), columns.len()), fill_value);
        TimeFrame::new(index, columns, values)
    }

    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> FrameResult<ArrayView1<'_, f64>> {
        let j = self
            .column_position(name)
            .ok_or_else(|| FrameError::UnknownColumn { name: name.to_string() })?;
        Ok(self.values.column(j))
    }

    /// Row position of `ts`, if present.
    pub fn position_of(&self, ts: &Timestamp) -> Option<usize> {
        self.index.binary_search(ts).ok()
    }

    /// Shift the frame by `periods`.
    ///
    /// Parameters
    /// ----------
    /// - `periods`: `i64`
    ///   Number of steps. Positive values move data later in time.
    /// - `freq`: `Option<&Freq>`
    ///   - `None`: values move by `periods` rows, the index is unchanged and
    ///     vacated rows become `NaN`.
    ///   - `Some(freq)`: every timestamp moves by `periods` units of `freq`
    ///     and the values are unchanged.
    ///
    /// Errors
    /// ------
    /// - `FrameError::TimestampOverflow` on unrepresentable timestamps.
    /// - `FrameError::NonMonotonicIndex` if a frequency shift collapses
    ///   distinct timestamps (business-day shifts of weekend rows).
    pub fn shift(&self, periods: i64, freq: Option<&Freq>) -> FrameResult<TimeFrame> {
        match freq {
            None => Ok(TimeFrame {
                index: self.index.clone(),
                columns: self.columns.clone(),
                values: shift_rows(&self.values, periods),
            }),
            Some(freq) => {
                let index = self
                    .index
                    .iter()
                    .map(|ts| freq.shift(*ts, periods))
                    .collect::<FrameResult<Vec<_>>>()?;
                validate_strictly_increasing(&index)?;
                Ok(TimeFrame { index, columns: self.columns.clone(), values: self.values.clone() })
            }
        }
    }

    /// Rows at `positions`, in the given order (which must keep the index
    /// strictly increasing).
    pub fn select_rows(&self, positions: &[usize]) -> FrameResult<TimeFrame> {
        let len = self.nrows();
        if let Some(&position) = positions.iter().find(|&&p| p >= len) {
            return Err(FrameError::RowOutOfBounds { position, len });
        }
        let index = positions.iter().map(|&p| self.index[p]).collect::<Vec<_>>();
        validate_strictly_increasing(&index)?;
        Ok(TimeFrame {
            index,
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), positions),
        })
    }

    /// Concatenate the columns of `other` to the right of `self`.
    ///
    /// Errors
    /// ------
    /// - `FrameError::IndexMismatch` if the indexes differ.
    /// - `FrameError::OverlappingColumns` if a column name appears in both.
    pub fn hstack(&self, other: &TimeFrame) -> FrameResult<TimeFrame> {
        if self.index != other.index {
            return Err(FrameError::IndexMismatch);
        }
        if let Some(name) = other.columns.iter().find(|c| self.columns.contains(c)) {
            return Err(FrameError::OverlappingColumns { name: name.clone() });
        }
        let values = concatenate(Axis(1), &[self.values.view(), other.values.view()])
            .map_err(|_| FrameError::IndexMismatch)?;
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Ok(TimeFrame { index: self.index.clone(), columns, values })
    }

    /// Replace every `NaN` with `value`.
    pub fn fill_nan(&self, value: f64) -> TimeFrame {
        let values = self.values.mapv(|v| if v.is_nan() { value } else { v });
        TimeFrame { index: self.index.clone(), columns: self.columns.clone(), values }
    }

    /// Same index and columns, new values. Shape is checked.
    pub(crate) fn with_values(&self, values: Array2<f64>) -> FrameResult<TimeFrame> {
        let expected = (self.nrows(), self.ncols());
        if values.dim() != expected {
            return Err(FrameError::ShapeMismatch { expected, found: values.dim() });
        }
        Ok(TimeFrame { index: self.index.clone(), columns: self.columns.clone(), values })
    }
}

// ---- Helper methods ----

fn validate_unique_columns(columns: &[String]) -> FrameResult<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(FrameError::DuplicateColumn { name: name.clone() });
        }
    }
    Ok(())
}

/// Row `i` of the output holds row `i − periods` of the input, or `NaN`.
fn shift_rows(values: &Array2<f64>, periods: i64) -> Array2<f64> {
    let nrows = values.nrows() as i64;
    let mut out = Array2::from_elem(values.dim(), f64::NAN);
    for i in 0..nrows {
        if let Some(source) = i.checked_sub(periods).filter(|s| (0..nrows).contains(s)) {
            out.row_mut(i as usize).assign(&values.row(source as usize));
        }
    }
    out
}
