// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Local calendar-day helpers
//!
//! Every day bucket in the engine is a [`NaiveDate`] rendered as `YYYY-MM-DD`
//! in the user's local calendar. Nothing here converts through UTC, so two
//! records made on the same local day always land in the same bucket.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

/// Canonical day format used for storage and comparisons
pub const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Format a day as `YYYY-MM-DD`
pub fn format_local_date(date: NaiveDate) -> String {
    date.format(LOCAL_DATE_FORMAT).to_string()
}

/// Parse a stored date or timestamp into its calendar day.
///
/// Accepts plain dates, RFC 3339 timestamps and offset-less datetimes.
/// Timestamps keep the calendar day at their own recorded offset.
/// Returns `None` for anything unparseable.
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, LOCAL_DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
}

/// Signed number of whole days from `from` to `to`
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Weekday index with Sunday = 0 through Saturday = 6
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always 0..=6
    date.weekday().num_days_from_sunday() as u8
}

/// Validate a stored weekday index. Anything outside Sunday..=Saturday is `None`.
pub fn checked_weekday_index(raw: i64) -> Option<u8> {
    u8::try_from(raw).ok().filter(|day| *day <= 6)
}

/// Today's calendar day in the local timezone
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
