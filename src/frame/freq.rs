//! frame::freq — shift units for timestamp re-indexing.
//!
//! Purpose
//! -------
//! Describe the unit by which a timestamp index is moved when a table is
//! shifted "by frequency" rather than by row position. Two families are
//! supported: fixed durations (days, hours, minutes, ...) and business days.
//!
//! Conventions
//! -----------
//! - Aliases follow the familiar offset-alias vocabulary with an optional
//!   positive integer multiplier: `D`, `h`/`H`, `min`/`T`, `s`/`S`,
//!   `ms`/`L`, `us`/`U`, `W` (seven fixed days) and `B` (business day),
//!   e.g. `"5min"`, `"2B"`.
//! - Business-day shifts skip Saturdays and Sundays. A weekend timestamp
//!   shifted forward first rolls to Monday, consuming one step; shifted
//!   backward it rolls to Friday. Time of day is preserved.
use crate::frame::errors::{FrameError, FrameResult};
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use std::str::FromStr;

/// Shift unit for frequency-anchored shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freq {
    /// A fixed, strictly positive duration.
    Fixed(Duration),
    /// `n` business days per unit (`n ≥ 1`).
    BusinessDays(i64),
}

impl Freq {
    /// Build a fixed-duration frequency, rejecting zero or negative steps.
    pub fn fixed(step: Duration) -> FrameResult<Freq> {
        if step <= Duration::zero() {
            return Err(FrameError::InvalidFreq {
                alias: format!("{step}"),
                reason: "step must be strictly positive",
            });
        }
        Ok(Freq::Fixed(step))
    }

    pub fn business_day() -> Freq {
        Freq::BusinessDays(1)
    }

    /// Move `ts` by `periods` units of this frequency.
    ///
    /// Errors
    /// ------
    /// - `FrameError::TimestampOverflow` when the result is not
    ///   representable.
    pub fn shift(&self, ts: DateTime<Utc>, periods: i64) -> FrameResult<DateTime<Utc>> {
        let overflow = FrameError::TimestampOverflow { periods };
        match self {
            Freq::Fixed(step) => {
                let nanos = step
                    .num_nanoseconds()
                    .and_then(|n| n.checked_mul(periods))
                    .ok_or_else(|| overflow.clone())?;
                ts.checked_add_signed(Duration::nanoseconds(nanos)).ok_or(overflow)
            }
            Freq::BusinessDays(n) => {
                let steps = n.checked_mul(periods).ok_or_else(|| overflow.clone())?;
                shift_business_days(ts, steps).ok_or(overflow)
            }
        }
    }
}

impl std::fmt::Display for Freq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Freq::BusinessDays(n) => write!(f, "{n}B"),
            Freq::Fixed(step) => {
                let Some(nanos) = step.num_nanoseconds() else {
                    return write!(f, "{}D", step.num_days());
                };
                for (unit_nanos, alias) in UNITS_DESCENDING {
                    if nanos % unit_nanos == 0 {
                        return write!(f, "{}{}", nanos / unit_nanos, alias);
                    }
                }
                write!(f, "{nanos}ns")
            }
        }
    }
}

const NANOS_PER_SECOND: i64 = 1_000_000_000;

const UNITS_DESCENDING: [(i64, &str); 6] = [
    (86_400 * NANOS_PER_SECOND, "D"),
    (3_600 * NANOS_PER_SECOND, "h"),
    (60 * NANOS_PER_SECOND, "min"),
    (NANOS_PER_SECOND, "s"),
    (1_000_000, "ms"),
    (1_000, "us"),
];

impl FromStr for Freq {
    type Err = FrameError;

    /// Parse an alias such as `"D"`, `"15min"` or `"3B"`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_event_study::frame::Freq;
    /// # use chrono::Duration;
    /// let freq: Freq = "15min".parse().unwrap();
    /// assert_eq!(freq, Freq::Fixed(Duration::minutes(15)));
    /// assert_eq!("B".parse::<Freq>().unwrap(), Freq::BusinessDays(1));
    /// ```
    fn from_str(alias: &str) -> FrameResult<Freq> {
        let invalid = |reason| FrameError::InvalidFreq { alias: alias.to_string(), reason };
        let trimmed = alias.trim();
        let split = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);
        let multiplier: i64 = if digits.is_empty() {
            1
        } else {
            digits.parse().map_err(|_| invalid("multiplier is not a valid integer"))?
        };
        if multiplier == 0 {
            return Err(invalid("multiplier must be positive"));
        }
        let base = match unit {
            "B" => return Ok(Freq::BusinessDays(multiplier)),
            "W" => Duration::days(7),
            "D" => Duration::days(1),
            "h" | "H" => Duration::hours(1),
            "min" | "T" => Duration::minutes(1),
            "s" | "S" => Duration::seconds(1),
            "ms" | "L" => Duration::milliseconds(1),
            "us" | "U" => Duration::microseconds(1),
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };
        let nanos = base
            .num_nanoseconds()
            .and_then(|n| n.checked_mul(multiplier))
            .ok_or_else(|| invalid("step overflows"))?;
        Ok(Freq::Fixed(Duration::nanoseconds(nanos)))
    }
}

// ---- Helper methods ----

fn is_weekend(ts: &DateTime<Utc>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

fn shift_business_days(ts: DateTime<Utc>, steps: i64) -> Option<DateTime<Utc>> {
    let one_day = Duration::days(1);
    let mut current = ts;
    let mut remaining = steps;
    if remaining > 0 {
        if is_weekend(&current) {
            while is_weekend(&current) {
                current = current.checked_add_signed(one_day)?;
            }
            remaining -= 1;
        }
        while remaining > 0 {
            current = current.checked_add_signed(one_day)?;
            if !is_weekend(&current) {
                remaining -= 1;
            }
        }
    } else if remaining < 0 {
        if is_weekend(&current) {
            while is_weekend(&current) {
                current = current.checked_sub_signed(one_day)?;
            }
            remaining += 1;
        }
        while remaining < 0 {
            current = current.checked_sub_signed(one_day)?;
            if !is_weekend(&current) {
                remaining += 1;
            }
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Aliases with and without multipliers parse to the expected steps.
    fn from_str_parses_aliases_and_multipliers() {
        assert_eq!("D".parse::<Freq>().unwrap(), Freq::Fixed(Duration::days(1)));
        assert_eq!("2h".parse::<Freq>().unwrap(), Freq::Fixed(Duration::hours(2)));
        assert_eq!("30T".parse::<Freq>().unwrap(), Freq::Fixed(Duration::minutes(30)));
        assert_eq!("W".parse::<Freq>().unwrap(), Freq::Fixed(Duration::days(7)));
        assert_eq!("3B".parse::<Freq>().unwrap(), Freq::BusinessDays(3));
    }

    #[test]
    fn from_str_rejects_degenerate_aliases() {
        assert!(matches!("0D".parse::<Freq>(), Err(FrameError::InvalidFreq { .. })));
        assert!(matches!("5".parse::<Freq>(), Err(FrameError::InvalidFreq { .. })));
        assert!(matches!("Q".parse::<Freq>(), Err(FrameError::InvalidFreq { .. })));
        assert!(Freq::fixed(Duration::zero()).is_err());
    }

    #[test]
    fn display_uses_largest_exact_unit() {
        assert_eq!(Freq::Fixed(Duration::minutes(90)).to_string(), "90min");
        assert_eq!(Freq::Fixed(Duration::days(2)).to_string(), "2D");
        assert_eq!(Freq::BusinessDays(1).to_string(), "1B");
    }

    #[test]
    fn fixed_shift_moves_by_multiple_of_step() {
        let freq = Freq::Fixed(Duration::hours(1));
        let ts = day(2024, 1, 3);
        assert_eq!(freq.shift(ts, -3).unwrap(), ts - Duration::hours(3));
        assert_eq!(freq.shift(ts, 0).unwrap(), ts);
    }

    #[test]
    // Purpose
    // -------
    // Business-day shifts skip weekends and roll weekend timestamps.
    //
    // Given
    // -----
    // - Friday 2024-01-05, Saturday 2024-01-06, Monday 2024-01-08.
    //
    // Expect
    // ------
    // - Fri + 1B = Mon, Mon − 1B = Fri, Sat + 1B = Mon, Sat − 1B = Fri.
    fn business_day_shift_skips_weekends() {
        let freq = Freq::business_day();
        let friday = day(2024, 1, 5);
        let saturday = day(2024, 1, 6);
        let monday = day(2024, 1, 8);

        assert_eq!(freq.shift(friday, 1).unwrap(), monday);
        assert_eq!(freq.shift(monday, -1).unwrap(), friday);
        assert_eq!(freq.shift(saturday, 1).unwrap(), monday);
        assert_eq!(freq.shift(saturday, -1).unwrap(), friday);
        assert_eq!(freq.shift(friday, 5).unwrap(), day(2024, 1, 12));
    }
}
