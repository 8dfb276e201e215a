//! School year label type.
//!
//! A school year runs from July 1 of year Y through June 30 of year Y+1 and
//! is written `"Y-Y+1"`. The label is derived from absence dates by
//! [`classify`](crate::calculation::classify); this module only owns the
//! representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A school year identified by the calendar year it starts in.
///
/// Ordering is chronological. The value serializes as its `"Y-Y+1"` label.
///
/// # Example
///
/// ```
/// use absence_cover::models::SchoolYear;
///
/// let year: SchoolYear = "2022-2023".parse().unwrap();
/// assert_eq!(year.start_year(), 2022);
/// assert_eq!(year.to_string(), "2022-2023");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolYear {
    start_year: i32,
}

impl SchoolYear {
    /// Creates the school year starting in July of `start_year`.
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The calendar year containing the July 1 start.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// The calendar year containing the June 30 end.
    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year())
    }
}

/// Error returned when a string is not a `"Y-Y+1"` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSchoolYearError(String);

impl fmt::Display for ParseSchoolYearError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a school year label of the form Y-Y+1", self.0)
    }
}

impl std::error::Error for ParseSchoolYearError {}

impl FromStr for SchoolYear {
    type Err = ParseSchoolYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSchoolYearError(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(err)?;
        let start: i32 = start.parse().map_err(|_| err())?;
        let end: i32 = end.parse().map_err(|_| err())?;
        if end != start + 1 {
            return Err(err());
        }
        Ok(Self::new(start))
    }
}

impl TryFrom<String> for SchoolYear {
    type Error = ParseSchoolYearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchoolYear> for String {
    fn from(year: SchoolYear) -> Self {
        year.to_string()
    }
}
