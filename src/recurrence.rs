//! Recurrence keywords and the calendar arithmetic used to advance due dates.
//!
//! Calendar periods are irregular: months have different lengths and leap
//! years move Feb 29, so advancement clamps to the last valid day instead of
//! overflowing into the next month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::errors::{ExpenseError, Result};

/// How often an expense repeats. `None` marks a one-off expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Recurrence {
    /// Canonical lowercase keyword, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Biweekly => "biweekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Quarterly => "quarterly",
            Recurrence::Yearly => "yearly",
        }
    }

    /// Normalizes a user-supplied recurrence string through the alias table.
    ///
    /// Matching is case-insensitive and trimmed; empty input defaults to
    /// `none`. Anything outside the supported set fails with
    /// [`ExpenseError::UnsupportedRecurrence`].
    pub fn parse(value: &str) -> Result<Recurrence> {
        let normalized = value.trim().to_lowercase();
        let keyword = match normalized.as_str() {
            "" | "once" | "one-time" | "one time" | "oneoff" | "one-off" => "none",
            "week" => "weekly",
            "bi-weekly" | "2w" => "biweekly",
            "mo" | "month" => "monthly",
            "q" | "quarter" | "3mo" => "quarterly",
            "yr" | "year" | "annual" => "yearly",
            other => other,
        };
        match keyword {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "biweekly" => Ok(Recurrence::Biweekly),
            "monthly" => Ok(Recurrence::Monthly),
            "quarterly" => Ok(Recurrence::Quarterly),
            "yearly" => Ok(Recurrence::Yearly),
            _ => Err(ExpenseError::UnsupportedRecurrence(value.to_string())),
        }
    }

    /// Returns the single next occurrence after `from` for this keyword.
    /// `none` never advances.
    pub fn next_after(self, from: NaiveDate) -> NaiveDate {
        match self {
            Recurrence::None => from,
            Recurrence::Daily => from + Duration::days(1),
            Recurrence::Weekly => from + Duration::weeks(1),
            Recurrence::Biweekly => from + Duration::weeks(2),
            Recurrence::Monthly => add_months(from, 1),
            Recurrence::Quarterly => add_months(from, 3),
            Recurrence::Yearly => add_years(from, 1),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self> {
        Recurrence::parse(s)
    }
}

/// Adds `months` calendar months, clamping the day-of-month to the length of
/// the target month (Jan 31 + 1 month is Feb 28/29, not Mar 3).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Adds `years` years; Feb 29 clamps to Feb 28 when the target year is not a
/// leap year.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}

/// Computes the earliest occurrence strictly after `from_date` for a schedule
/// anchored at `current_due`, falling back to `start_date`.
///
/// With no recurrence the anchor is returned untouched. Otherwise occurrences
/// are advanced one period at a time: periods are calendar-variable, so there
/// is no closed-form offset. Every supported keyword strictly increases the
/// date, which bounds the loop by elapsed time over period length. An anchor
/// already past `from_date` is returned as-is with zero iterations.
pub fn compute_next_due_date(
    current_due: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    recurrence: Recurrence,
    from_date: NaiveDate,
) -> Option<NaiveDate> {
    if recurrence == Recurrence::None {
        return current_due.or(start_date);
    }
    let base = current_due.or(start_date)?;
    let mut next_due = base;
    while next_due <= from_date {
        next_due = recurrence.next_after(next_due);
    }
    Some(next_due)
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ExpenseError::InvalidDate(text.to_string()))
}

/// A calendar month, used for payment filters and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parses a `YYYY-MM` month reference.
pub fn parse_year_month(text: &str) -> Result<YearMonth> {
    let invalid = || ExpenseError::InvalidMonth(text.to_string());
    let (year_str, month_str) = text.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month: u32 = month_str.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok(YearMonth { year, month })
}
