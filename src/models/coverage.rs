//! Coverage split models.
//!
//! This module contains the [`CoverageSplit`] produced for a single day count
//! and threshold, and the tables and summaries assembled from many splits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, SchoolYear};

/// The division of replacement cost between district and coverage.
///
/// Invariant: `district_pays + coverage_pays == total_cost`, and
/// `district_saves == coverage_pays`.
///
/// # Example
///
/// ```
/// use absence_cover::calculation::split;
/// use rust_decimal::Decimal;
///
/// let result = split(Decimal::new(20, 0), Decimal::new(15, 0), Decimal::new(175, 0)).unwrap();
/// assert_eq!(result.district_pays, Decimal::new(2625, 0));
/// assert_eq!(result.coverage_pays, Decimal::new(875, 0));
/// assert_eq!(result.district_pays + result.coverage_pays, result.total_cost);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSplit {
    /// The deductible threshold in days.
    pub threshold: Decimal,
    /// The absence days the split was computed for.
    pub total_days: Decimal,
    /// Replacement cost of all days.
    pub total_cost: Decimal,
    /// Portion borne by the district (days up to the threshold).
    pub district_pays: Decimal,
    /// Portion paid by coverage (days beyond the threshold).
    pub coverage_pays: Decimal,
    /// What the district saves by holding coverage; equal to `coverage_pays`.
    pub district_saves: Decimal,
}

/// One row of a [`CoverageTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// The teacher's employee number.
    pub employee_id: EmployeeId,
    /// The split for the teacher's total days.
    pub split: CoverageSplit,
}

/// Splits for an ordered list of teachers at one threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTable {
    /// The deductible threshold in days.
    pub threshold: Decimal,
    /// One row per teacher, in the order the teachers were given.
    pub rows: Vec<CoverageRow>,
    /// Column sums over `rows`.
    pub totals: CoverageTotals,
}

/// Summed money columns of several splits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTotals {
    /// Sum of absence days.
    pub total_days: Decimal,
    /// Sum of replacement cost.
    pub total_cost: Decimal,
    /// Sum of district-paid portions.
    pub district_pays: Decimal,
    /// Sum of coverage-paid portions.
    pub coverage_pays: Decimal,
    /// Sum of district savings.
    pub district_saves: Decimal,
}

impl CoverageTotals {
    /// Adds one split to the running totals.
    pub fn add(&mut self, split: &CoverageSplit) {
        self.total_days += split.total_days;
        self.total_cost += split.total_cost;
        self.district_pays += split.district_pays;
        self.coverage_pays += split.coverage_pays;
        self.district_saves += split.district_saves;
    }

    /// Adds another set of totals.
    pub fn merge(&mut self, other: &CoverageTotals) {
        self.total_days += other.total_days;
        self.total_cost += other.total_cost;
        self.district_pays += other.district_pays;
        self.coverage_pays += other.coverage_pays;
        self.district_saves += other.district_saves;
    }
}

/// Coverage over the teachers whose absences exceed a threshold.
///
/// Only teachers strictly above the threshold generate a claim; the totals
/// sum their splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    /// The deductible threshold in days.
    pub threshold: Decimal,
    /// The school year covered; `None` when summed over several years.
    pub school_year: Option<SchoolYear>,
    /// Number of teachers (or teacher-years) strictly above the threshold.
    pub teachers_over_threshold: usize,
    /// Summed splits of those teachers.
    pub totals: CoverageTotals,
}
