//! Aggregate summary models.
//!
//! These are derived snapshots: every aggregation pass builds them fresh from
//! the record set and nothing mutates them afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, SchoolYear};

/// Absence totals for one teacher, optionally scoped to one school year.
///
/// # Example
///
/// ```
/// use absence_cover::models::TeacherSummary;
/// use rust_decimal::Decimal;
///
/// let summary = TeacherSummary {
///     employee_id: 1043,
///     school_year: None,
///     record_count: 4,
///     total_days: Decimal::new(12, 0),
///     total_cost: Decimal::new(2100, 0),
/// };
/// assert_eq!(summary.total_cost, summary.total_days * Decimal::new(175, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSummary {
    /// The teacher's employee number.
    pub employee_id: EmployeeId,
    /// The school year the totals cover; `None` for all years combined.
    pub school_year: Option<SchoolYear>,
    /// Number of absence records summed.
    pub record_count: usize,
    /// Sum of days used.
    pub total_days: Decimal,
    /// `total_days` multiplied by the replacement cost rate.
    pub total_cost: Decimal,
}

/// Totals for one absence type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSummary {
    /// The absence type label.
    pub absence_type: String,
    /// Number of absence records of this type.
    pub count: usize,
    /// Sum of days used.
    pub total_days: Decimal,
    /// `total_days` multiplied by the replacement cost rate.
    pub total_cost: Decimal,
}

/// A [`TypeSummary`] together with its share of the whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    /// The underlying totals.
    #[serde(flatten)]
    pub summary: TypeSummary,
    /// Fraction of all records that are of this type, in `[0, 1]`.
    pub share_of_count: Decimal,
    /// Fraction of total cost attributable to this type, in `[0, 1]`.
    pub share_of_cost: Decimal,
}

/// Totals for one school year across all teachers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyTotal {
    /// The school year.
    pub school_year: SchoolYear,
    /// Distinct teachers with at least one absence in the year.
    pub teacher_count: usize,
    /// Sum of days used.
    pub total_days: Decimal,
    /// Replacement cost of those days.
    pub total_cost: Decimal,
}

/// Totals for one calendar month, summed over every year in the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCost {
    /// Calendar month number, 1 (January) through 12 (December).
    pub month: u32,
    /// Sum of days used in that month.
    pub total_days: Decimal,
    /// Replacement cost of those days.
    pub total_cost: Decimal,
}

impl MonthlyCost {
    /// English month name, e.g. "November".
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

/// A teacher who appears in the top list of more than one school year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatAppearance {
    /// The teacher's employee number.
    pub employee_id: EmployeeId,
    /// The school years whose top list includes the teacher, oldest first.
    pub school_years: Vec<SchoolYear>,
    /// 1-based rank in the all-years top list, if the teacher is in it.
    pub all_time_rank: Option<usize>,
}

impl RepeatAppearance {
    /// Number of school years the teacher appears in.
    pub fn appearances(&self) -> usize {
        self.school_years.len()
    }
}
