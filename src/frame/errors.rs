//! frame::errors — validation and shape errors for timestamp-indexed tables.
//!
//! [`FrameError`] covers everything that can go wrong when building or
//! transforming a [`TimeFrame`](crate::frame::TimeFrame): malformed shapes,
//! duplicate or unknown column names, non-monotonic indexes, invalid
//! frequency aliases and timestamp arithmetic overflow. The alias
//! [`FrameResult<T>`] standardizes return types across the `frame` subtree.

pub type FrameResult<T> = Result<T, FrameError>;

/// Unified error type for tabular operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    // ---- Construction ----
    /// Value matrix does not match `(index.len(), columns.len())`.
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// Column vector length does not match the index length.
    ColumnLengthMismatch { name: String, expected: usize, found: usize },

    /// Column names must be unique.
    DuplicateColumn { name: String },

    /// Index must be strictly increasing; `position` is the first offending row.
    NonMonotonicIndex { position: usize },

    // ---- Access ----
    /// No column with this name.
    UnknownColumn { name: String },

    /// Row position outside `0..len`.
    RowOutOfBounds { position: usize, len: usize },

    // ---- Combination ----
    /// Both tables carry a column with this name.
    OverlappingColumns { name: String },

    /// Column-wise concatenation requires identical indexes.
    IndexMismatch,

    // ---- Frequencies ----
    /// Unparseable or degenerate frequency alias.
    InvalidFreq { alias: String, reason: &'static str },

    /// Shifting a timestamp left the representable range.
    TimestampOverflow { periods: i64 },
}

impl std::error::Error for FrameError {}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            FrameError::ShapeMismatch { expected, found } => write!(
                f,
                "Frame Error: value matrix has shape {:?}, expected {:?} (rows × columns)",
                found, expected
            ),
            FrameError::ColumnLengthMismatch { name, expected, found } => write!(
                f,
                "Frame Error: column '{name}' has {found} values, index has {expected} rows"
            ),
            FrameError::DuplicateColumn { name } => {
                write!(f, "Frame Error: duplicate column name '{name}'")
            }
            FrameError::NonMonotonicIndex { position } => write!(
                f,
                "Frame Error: index is not strictly increasing at position {position}"
            ),

            // ---- Access ----
            FrameError::UnknownColumn { name } => write!(f, "Frame Error: unknown column '{name}'"),
            FrameError::RowOutOfBounds { position, len } => {
                write!(f, "Frame Error: row {position} out of bounds for length {len}")
            }

            // ---- Combination ----
            FrameError::OverlappingColumns { name } => {
                write!(f, "Frame Error: column '{name}' present in both tables")
            }
            FrameError::IndexMismatch => {
                write!(f, "Frame Error: tables must share an identical index")
            }

            // ---- Frequencies ----
            FrameError::InvalidFreq { alias, reason } => {
                write!(f, "Frame Error: invalid frequency '{alias}': {reason}")
            }
            FrameError::TimestampOverflow { periods } => {
                write!(f, "Frame Error: timestamp overflow when shifting by {periods} periods")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_embeds_payloads() {
        let err = FrameError::NonMonotonicIndex { position: 7 };
        assert!(err.to_string().contains('7'));

        let err = FrameError::InvalidFreq { alias: "3Q".to_string(), reason: "unknown unit" };
        let msg = err.to_string();
        assert!(msg.contains("3Q"));
        assert!(msg.contains("unknown unit"));
    }
}
