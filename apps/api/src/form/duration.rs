//! Experience duration derived from a work entry's start and end dates.
//!
//! Calendar-month arithmetic on year and month only. Day-of-month is ignored,
//! so 2020-01-28 → 2020-02-02 is a whole month.

use chrono::{Datelike, NaiveDate};

/// Parses a form date value (`YYYY-MM-DD`). Blank or malformed input yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Returns the elapsed duration as `"N years M months"`, or an empty string when
/// the range is incomplete, unparseable, inverted, or shorter than a month.
pub fn compute_duration(start_date: Option<&str>, end_date: Option<&str>) -> String {
    let (Some(start), Some(end)) = (start_date.and_then(parse_date), end_date.and_then(parse_date))
    else {
        return String::new();
    };
    if end < start {
        return String::new();
    }

    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(pluralize(years, "year"));
    }
    if months > 0 {
        parts.push(pluralize(months, "month"));
    }
    parts.join(" ")
}

fn pluralize(n: i32, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
