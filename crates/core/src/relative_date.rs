//! Relative-date resolution for service templates.
//!
//! Templates store milestone and task dates as integer day offsets from the
//! owning service's start date. When a service is created from a template
//! those offsets are resolved into absolute calendar dates here.
//!
//! Human-readable offsets are also accepted: `"same day"`, `"next day"`,
//! `"N day(s)"`, `"N week(s)"` and `"N month(s)"`. A week is 7 days and, under
//! the default [`MonthPolicy::FixedThirtyDays`], a month is 30 days.
//! Unparseable text resolves to `None` rather than an error.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Duration, Months};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CalendarDate, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Days per week.
pub const DAYS_PER_WEEK: i32 = 7;

/// Days per month under [`MonthPolicy::FixedThirtyDays`].
pub const DAYS_PER_FIXED_MONTH: i32 = 30;

// ---------------------------------------------------------------------------
// Month policy
// ---------------------------------------------------------------------------

/// How month offsets are turned into dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthPolicy {
    /// A month is always 30 days. Matches dates already seeded by the
    /// application.
    #[default]
    FixedThirtyDays,
    /// A month advances the calendar month, clamping to the last valid day
    /// (Jan 31 + 1 month = Feb 28/29).
    Calendar,
}

impl MonthPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedThirtyDays => "fixed",
            Self::Calendar => "calendar",
        }
    }
}

impl FromStr for MonthPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed_thirty_days" | "30" => Ok(Self::FixedThirtyDays),
            "calendar" => Ok(Self::Calendar),
            other => Err(CoreError::Validation(format!(
                "Unknown month policy '{other}'. Expected 'fixed' or 'calendar'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Relative offsets
// ---------------------------------------------------------------------------

/// Unit of a human-readable offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    Day,
    Week,
    Month,
}

/// A parsed human-readable offset such as `"2 weeks"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeOffset {
    pub amount: u32,
    pub unit: OffsetUnit,
}

impl RelativeOffset {
    pub fn days(amount: u32) -> Self {
        Self {
            amount,
            unit: OffsetUnit::Day,
        }
    }

    /// Offset in days with a fixed 30-day month.
    ///
    /// Returns `None` if the result does not fit in an `i32`.
    pub fn to_days(self) -> Option<i32> {
        let amount = i32::try_from(self.amount).ok()?;
        match self.unit {
            OffsetUnit::Day => Some(amount),
            OffsetUnit::Week => amount.checked_mul(DAYS_PER_WEEK),
            OffsetUnit::Month => amount.checked_mul(DAYS_PER_FIXED_MONTH),
        }
    }

    /// Resolve this offset against `start`.
    pub fn apply(self, start: CalendarDate, policy: MonthPolicy) -> Option<CalendarDate> {
        match (self.unit, policy) {
            (OffsetUnit::Month, MonthPolicy::Calendar) => {
                start.checked_add_months(Months::new(self.amount))
            }
            _ => resolve_date(start, self.to_days()?),
        }
    }
}

fn offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\s*(day|week|month)s?$").expect("offset pattern is a valid regex")
    })
}

/// Parse a human-readable offset. Returns `None` for anything unrecognised.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_relative(text: &str) -> Option<RelativeOffset> {
    let normalized = text.trim().to_ascii_lowercase();
    let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.as_str() {
        "same day" => return Some(RelativeOffset::days(0)),
        "next day" => return Some(RelativeOffset::days(1)),
        _ => {}
    }

    let caps = offset_pattern().captures(&collapsed)?;
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit = match caps.get(2)?.as_str() {
        "day" => OffsetUnit::Day,
        "week" => OffsetUnit::Week,
        "month" => OffsetUnit::Month,
        _ => return None,
    };
    Some(RelativeOffset { amount, unit })
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve an integer day offset against a start date.
///
/// Returns `None` only when the result falls outside chrono's date range.
pub fn resolve_date(start: CalendarDate, days: i32) -> Option<CalendarDate> {
    start.checked_add_signed(Duration::days(i64::from(days)))
}

/// Resolve an integer day offset against a UTC instant, keeping the time of day.
pub fn resolve_timestamp(start: Timestamp, days: i32) -> Option<Timestamp> {
    start.checked_add_signed(Duration::days(i64::from(days)))
}

/// Parse `text` and resolve it against `start` with the fixed 30-day month.
pub fn resolve_relative(start: CalendarDate, text: &str) -> Option<CalendarDate> {
    resolve_relative_with(start, text, MonthPolicy::FixedThirtyDays)
}

/// Parse `text` and resolve it against `start` under the given month policy.
pub fn resolve_relative_with(
    start: CalendarDate,
    text: &str,
    policy: MonthPolicy,
) -> Option<CalendarDate> {
    parse_relative(text)?.apply(start, policy)
}

/// Render a day offset the way template editors display it.
///
/// `0` is "same day", `1` is "next day", whole multiples of 30 render as
/// months, whole multiples of 7 as weeks, anything else as days. Negative
/// offsets render as "N days before" for display only; [`parse_relative`]
/// accepts non-negative offsets, so only those parse back to the same value.
pub fn describe_offset(days: i32) -> String {
    fn plural(n: u32, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }

    match days {
        0 => "same day".to_string(),
        1 => "next day".to_string(),
        d if d < 0 => format!("{} before", plural(d.unsigned_abs(), "day")),
        d if d % DAYS_PER_FIXED_MONTH == 0 => {
            plural((d / DAYS_PER_FIXED_MONTH).unsigned_abs(), "month")
        }
        d if d % DAYS_PER_WEEK == 0 => plural((d / DAYS_PER_WEEK).unsigned_abs(), "week"),
        d => plural(d.unsigned_abs(), "day"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
