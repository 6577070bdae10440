use crate::consts::{DATE_SEPARATOR, ISO_DATE_PARTS, WEEK_LENGTH};
use crate::prelude::*;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single calendar day (year/month/day, no time component).
///
/// Ordering and equality follow calendar order, which is identical to the
/// lexicographic order of the ISO-8601 string produced by `Display`. The ISO
/// string is the external identity of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display(fmt = "{}", _0)]
pub struct CalendarDay(NaiveDate);

/// Error type for calendar day construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayParseError {
    /// Input string is not a full ISO date.
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    /// Components do not name an existing calendar date.
    #[error("Invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Empty date string.
    #[error("Empty date string")]
    EmptyInput,
}

impl CalendarDay {
    /// Creates a day from year/month/day components.
    ///
    /// # Errors
    /// Returns `DayParseError::InvalidDate` if the components do not form an
    /// existing calendar date (e.g. February 30th).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DayParseError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DayParseError::InvalidDate { year, month, day })
    }

    /// Returns the year component
    #[inline]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12)
    #[inline]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Returns the day-of-month component (1-31)
    #[inline]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// The day `n` days after this one.
    /// Returns `None` on calendar overflow.
    pub fn plus_days(self, n: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(n)).map(Self)
    }

    /// The day `n` days before this one.
    /// Returns `None` on calendar underflow.
    pub fn minus_days(self, n: i64) -> Option<Self> {
        self.plus_days(-n)
    }

    /// The immediately following day.
    pub fn next_day(self) -> Option<Self> {
        self.plus_days(1)
    }

    /// Signed number of whole days from `other` to `self`.
    pub fn days_since(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }

    /// True when `self` is the same day as `other` or later.
    #[inline]
    pub fn is_inclusively_after(self, other: Self) -> bool {
        self >= other
    }

    /// True when `self` is the same day as `other` or earlier.
    #[inline]
    pub fn is_inclusively_before(self, other: Self) -> bool {
        self <= other
    }

    /// True when `self` is exactly one day after `other`.
    pub fn is_next_day_of(self, other: Self) -> bool {
        self.days_since(other) == 1
    }

    /// First day of this day's month.
    pub fn first_of_month(self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Last day of this day's month.
    pub fn last_of_month(self) -> Self {
        let first = self.first_of_month();
        first
            .months_later(1)
            .and_then(|next| next.minus_days(1))
            .unwrap_or(first)
    }

    /// First day of the month `n` months after this day's month.
    /// Returns `None` on calendar overflow.
    pub fn months_later(self, n: u32) -> Option<Self> {
        let total = self.0.year() as i64 * 12 + i64::from(self.0.month0()) + i64::from(n);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// First day of the month `n` months before this day's month.
    /// Returns `None` on calendar underflow.
    pub fn months_earlier(self, n: u32) -> Option<Self> {
        let total = self.0.year() as i64 * 12 + i64::from(self.0.month0()) - i64::from(n);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Zero-based position of this day within a Sunday-first week.
    fn weekday_from_sunday(self) -> i64 {
        i64::from(self.0.weekday().num_days_from_sunday())
    }
}

/// Iterates every day in the half-open range `[start, end)`.
///
/// Yields nothing when `start >= end`.
pub fn days_between(start: CalendarDay, end: CalendarDay) -> impl Iterator<Item = CalendarDay> {
    let span = end.days_since(start).max(0);
    (0..span).filter_map(move |offset| start.plus_days(offset))
}

/// Ordered sequence of days rendered for a visible window of month grids.
///
/// `anchor` names the first visible month (its day-of-month is ignored).
/// With `enable_outside_days` each month is padded to full Sunday-first
/// weeks, so days from adjacent months appear; consecutive month grids may
/// then repeat a day, which collapses when the result is keyed by day.
pub fn visible_days(
    anchor: CalendarDay,
    number_of_months: u32,
    enable_outside_days: bool,
) -> Vec<CalendarDay> {
    let mut days = Vec::new();
    for offset in 0..number_of_months {
        let Some(first) = anchor.months_later(offset) else {
            break;
        };
        let last = first.last_of_month();

        let (grid_start, grid_end) = if enable_outside_days {
            let lead = first.weekday_from_sunday();
            let trail = WEEK_LENGTH - 1 - last.weekday_from_sunday();
            (
                first.minus_days(lead).unwrap_or(first),
                last.plus_days(trail).unwrap_or(last),
            )
        } else {
            (first, last)
        };

        days.extend(days_between(grid_start, grid_end));
        days.push(grid_end);
    }
    days
}

impl FromStr for CalendarDay {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DayParseError::EmptyInput);
        }

        // Strictly a full ISO date: YYYY-MM-DD
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != ISO_DATE_PARTS {
            return Err(DayParseError::InvalidFormat(trimmed.to_owned()));
        }

        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| DayParseError::InvalidFormat(trimmed.to_owned()))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| DayParseError::InvalidFormat(trimmed.to_owned()))?;
        let day = parts[2]
            .parse::<u32>()
            .map_err(|_| DayParseError::InvalidFormat(trimmed.to_owned()))?;

        Self::from_ymd(year, month, day)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
