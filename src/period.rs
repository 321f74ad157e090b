//! Cycle window calculation.
//!
//! A cycle starts at local midnight of `start_date` in the given offset and
//! runs for one week or one calendar month. Both bounds are inclusive when
//! pull requests are matched against the window.

use crate::error::{MetricsError, Result};
use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_HOUR: i32 = 3600;
const SECONDS_PER_MINUTE: i32 = 60;

/// Length of a reporting cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleUnit {
    Week,
    Month,
}

impl fmt::Display for CycleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleUnit::Week => f.write_str("week"),
            CycleUnit::Month => f.write_str("month"),
        }
    }
}

impl FromStr for CycleUnit {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "week" => Ok(CycleUnit::Week),
            "month" => Ok(CycleUnit::Month),
            other => Err(MetricsError::InvalidInvocationInput(format!(
                "Invalid cycle unit: {other}"
            ))),
        }
    }
}

/// The resolved cycle a metrics run was computed for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// First day of the cycle, e.g. "2023-07-01".
    pub start_date: String,
    pub unit: CycleUnit,
    /// Offset string, e.g. "GMT+0900".
    pub gmt: String,
}

/// Concrete instants bounding one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub start_at: DateTime<FixedOffset>,
    pub end_at: DateTime<FixedOffset>,
}

impl Period {
    /// Whether `instant` falls inside the window, both bounds included.
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start_at <= *instant && *instant <= self.end_at
    }
}

/// Computes the window for a cycle starting at midnight of `start_date`.
///
/// Month cycles use chrono's month arithmetic, which clamps to the last day
/// of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn compute_period(start_date: &str, unit: CycleUnit, gmt: &str) -> Result<Period> {
    let invalid = || MetricsError::InvalidPeriodInput(format!("{start_date} 00:00:00 {gmt}"));

    let offset = parse_offset(gmt).ok_or_else(invalid)?;
    let date = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d").map_err(|_| invalid())?;

    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    let start_at = offset
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(invalid)?;

    let end_at = match unit {
        CycleUnit::Week => start_at.checked_add_signed(Duration::days(7)),
        CycleUnit::Month => start_at.checked_add_months(Months::new(1)),
    }
    .ok_or_else(invalid)?;

    Ok(Period { start_at, end_at })
}

/// Parses offsets such as `GMT+0900`, `UTC-05:30`, `+09`, `GMT` or `Z`.
///
/// An empty string is treated as UTC.
pub fn parse_offset(gmt: &str) -> Option<FixedOffset> {
    let trimmed = gmt.trim();
    let rest = trimmed
        .strip_prefix("GMT")
        .or_else(|| trimmed.strip_prefix("UTC"))
        .unwrap_or(trimmed);

    if rest.is_empty() || rest == "Z" {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    let digits = digits.replacen(':', "", 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE))
}
