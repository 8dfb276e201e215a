//! Report view types.
//!
//! Each struct corresponds to one dashboard section. All values are typed
//! numbers; formatting is left to the presentation layer.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::calculation::{CostConcentration, RiskProfile};
use crate::models::{
    CoverageTable, EmployeeId, MonthlyCost, RepeatAppearance, SchoolYear, TeacherSummary,
    ThresholdSummary, TypeBreakdown, YearlyTotal,
};

/// Every dashboard view computed from one record set.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// District name from configuration.
    pub district: String,
    /// Period covered by the data export.
    pub data_period: String,
    /// Replacement cost per day used throughout.
    pub replacement_cost_rate: Decimal,
    /// School years the per-year views cover, oldest first.
    pub school_years: Vec<SchoolYear>,
    /// Record and teacher counts.
    pub population: PopulationSummary,
    /// Headline figures.
    pub executive_summary: ExecutiveSummary,
    /// Yearly and monthly totals.
    pub trends: TrendsView,
    /// Top teachers and their coverage tables.
    pub top_teachers: TopTeachersView,
    /// Days per teacher per school year.
    pub heatmap: HeatmapView,
    /// Totals per absence type, most expensive first.
    pub absence_types: Vec<TypeBreakdown>,
    /// Teachers above each threshold per school year.
    pub cost_breakdown: Vec<ThresholdCounts>,
    /// Coverage split per school year and threshold.
    pub coverage: CoverageView,
}

/// How many records and teachers the report is based on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationSummary {
    /// Records in the source table.
    pub total_records: usize,
    /// Records kept by the teacher filter.
    pub teacher_records: usize,
    /// Distinct teachers.
    pub teacher_count: usize,
}

/// Headline figures for the executive summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    /// Sum of teacher absence days over all years.
    pub total_days: Decimal,
    /// Replacement cost of those days.
    pub total_cost: Decimal,
    /// Teachers per risk band, by all-years totals.
    pub risk_profile: RiskProfile,
    /// Teachers in the high or critical band.
    pub teachers_at_risk: usize,
    /// Teachers whose all-years total exceeds each threshold.
    pub teachers_over_thresholds: Vec<ThresholdCount>,
    /// Share of cost carried by the most expensive teachers.
    pub cost_concentration: CostConcentration,
    /// Cost change from the first to the last reported school year.
    pub growth: Option<Growth>,
    /// The costliest calendar months.
    pub peak_months: Vec<MonthlyCost>,
    /// Coefficient of variation of monthly cost; `None` with under two
    /// active months.
    pub monthly_volatility: Option<Decimal>,
    /// What coverage would save the district at each threshold.
    pub savings: Vec<Savings>,
}

/// Teachers above a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdCount {
    /// The threshold in days.
    pub threshold: Decimal,
    /// Teachers strictly above it.
    pub teachers: usize,
    /// `teachers` as a fraction of all teachers counted.
    pub share: Decimal,
}

/// Cost change between two school years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Growth {
    /// Base year.
    pub from: SchoolYear,
    /// Comparison year.
    pub to: SchoolYear,
    /// Fractional change, e.g. `0.9` for +90%.
    pub change: Decimal,
}

/// District savings at one threshold over the reported years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Savings {
    /// The threshold in days.
    pub threshold: Decimal,
    /// Amount coverage pays, and so the district saves.
    pub district_saves: Decimal,
    /// `district_saves` as a fraction of total cost in the reported years.
    pub share_of_cost: Decimal,
}

/// Yearly and monthly totals.
#[derive(Debug, Clone, Serialize)]
pub struct TrendsView {
    /// One total per reported school year.
    pub yearly: Vec<YearlyTotal>,
    /// Twelve calendar months, July first.
    pub monthly: Vec<MonthlyCost>,
}

/// Top teachers, all years combined and per year.
#[derive(Debug, Clone, Serialize)]
pub struct TopTeachersView {
    /// Top teachers by all-years absence days.
    pub all_time: Vec<TeacherSummary>,
    /// Coverage for `all_time`, one table per threshold.
    pub coverage_tables: Vec<CoverageTable>,
    /// Top teachers of each reported school year.
    pub by_year: BTreeMap<SchoolYear, Vec<TeacherSummary>>,
    /// Teachers appearing in more than one year's top list.
    pub repeat_appearances: Vec<RepeatAppearance>,
}

/// Absence days for every teacher in every reported school year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapView {
    /// Column labels.
    pub school_years: Vec<SchoolYear>,
    /// One row per teacher, ascending employee number.
    pub rows: Vec<HeatmapRow>,
}

/// One heatmap row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    /// The teacher's employee number.
    pub employee_id: EmployeeId,
    /// Days per school year, aligned with [`HeatmapView::school_years`].
    pub days: Vec<Decimal>,
}

/// Teachers above one threshold in each school year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdCounts {
    /// The threshold in days.
    pub threshold: Decimal,
    /// Counts per reported school year, oldest first.
    pub by_year: Vec<YearCount>,
}

/// A teacher count for one school year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    /// The school year.
    pub school_year: SchoolYear,
    /// Teachers strictly above the threshold that year.
    pub teachers: usize,
}

/// Coverage split per school year and summed over the reported years.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageView {
    /// Summaries per school year, one per threshold.
    pub by_year: BTreeMap<SchoolYear, Vec<ThresholdSummary>>,
    /// All reported years combined, one per threshold.
    pub all_years: Vec<ThresholdSummary>,
}
