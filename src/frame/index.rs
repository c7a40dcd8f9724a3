//! frame::index — set algebra on strictly increasing timestamp indexes.
//!
//! All helpers assume their inputs are strictly increasing (validated by
//! [`validate_strictly_increasing`]) and run in a single merge pass, so they
//! are O(n + m) and return positions in ascending order.
use crate::frame::{
    Timestamp,
    errors::{FrameError, FrameResult},
};

/// Fail with `NonMonotonicIndex` at the first position where the index does
/// not strictly increase.
pub fn validate_strictly_increasing(index: &[Timestamp]) -> FrameResult<()> {
    match index.windows(2).position(|w| w[1] <= w[0]) {
        Some(pos) => Err(FrameError::NonMonotonicIndex { position: pos + 1 }),
        None => Ok(()),
    }
}

/// Positions `(i, j)` such that `left[i] == right[j]`, ascending.
pub fn intersect_positions(left: &[Timestamp], right: &[Timestamp]) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((i, j));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Entries of `left` absent from `right`, ascending.
pub fn difference(left: &[Timestamp], right: &[Timestamp]) -> Vec<Timestamp> {
    let mut out = Vec::new();
    let mut j = 0;
    for ts in left {
        while j < right.len() && right[j] < *ts {
            j += 1;
        }
        if j >= right.len() || right[j] != *ts {
            out.push(*ts);
        }
    }
    out
}
