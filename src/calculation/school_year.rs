//! School year classification.
//!
//! Absence dates are bucketed into school years that start on July 1. The
//! boundary is a district business rule and every yearly view depends on it.

use chrono::{Datelike, NaiveDate};

use crate::models::SchoolYear;

/// The calendar month in which a school year starts (July).
pub const SCHOOL_YEAR_START_MONTH: u32 = 7;

/// Maps a date to its school year.
///
/// Dates in July or later belong to the school year starting that calendar
/// year; dates before July belong to the one that started the previous year.
/// A missing date yields `None`, meaning the record is left out of
/// year-scoped views.
///
/// # Examples
///
/// ```
/// use absence_cover::calculation::classify;
/// use absence_cover::models::SchoolYear;
/// use chrono::NaiveDate;
///
/// let autumn = NaiveDate::from_ymd_opt(2022, 11, 15);
/// assert_eq!(classify(autumn), Some(SchoolYear::new(2022)));
///
/// let spring = NaiveDate::from_ymd_opt(2023, 3, 1);
/// assert_eq!(classify(spring).unwrap().to_string(), "2022-2023");
///
/// assert_eq!(classify(None), None);
/// ```
pub fn classify(date: Option<NaiveDate>) -> Option<SchoolYear> {
    let date = date?;
    let start_year = if date.month() >= SCHOOL_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    Some(SchoolYear::new(start_year))
}
