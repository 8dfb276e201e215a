//! Report assembly.
//!
//! [`build_report`] runs every calculation once over an explicit record set
//! and configuration. The teacher filter is applied a single time and every
//! view reads the same filtered population.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use crate::calculation::{
    aggregate_by_employee, aggregate_by_employee_and_year, aggregate_by_type, combine,
    cost_concentration, coverage_by_year, coverage_tables, growth, monthly_costs,
    monthly_volatility, peak_months, repeat_appearances, risk_profile, teachers_over, top_n,
    top_n_by_year, type_breakdown, yearly_totals,
};
use crate::config::AnalysisConfig;
use crate::error::EngineResult;
use crate::models::{AbsenceRecord, EmployeeId, SchoolYear, TeacherSummary, ThresholdSummary};
use crate::source::AbsenceSource;

use super::views::{
    CoverageView, DashboardReport, ExecutiveSummary, Growth, HeatmapRow, HeatmapView,
    PopulationSummary, Savings, ThresholdCount, ThresholdCounts, TopTeachersView, TrendsView,
    YearCount,
};

type ByYear = BTreeMap<(SchoolYear, EmployeeId), TeacherSummary>;

fn fraction(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole
    }
}

/// Years for per-year views: configured years, or every year in the data.
fn report_years(config: &AnalysisConfig, by_year: &ByYear) -> Vec<SchoolYear> {
    let tracked = &config.reporting().tracked_school_years;
    let mut years: Vec<SchoolYear> = if tracked.is_empty() {
        by_year.keys().map(|(year, _)| *year).collect()
    } else {
        tracked.clone()
    };
    years.sort();
    years.dedup();
    years
}

fn summaries_in_year(by_year: &ByYear, year: SchoolYear) -> impl Iterator<Item = &TeacherSummary> {
    by_year
        .range((year, EmployeeId::MIN)..=(year, EmployeeId::MAX))
        .map(|(_, summary)| summary)
}

fn heatmap(by_year: &ByYear, years: &[SchoolYear]) -> HeatmapView {
    let mut rows: BTreeMap<EmployeeId, Vec<Decimal>> = BTreeMap::new();
    for ((year, employee_id), summary) in by_year {
        let Some(column) = years.iter().position(|y| y == year) else {
            continue;
        };
        let days = rows
            .entry(*employee_id)
            .or_insert_with(|| vec![Decimal::ZERO; years.len()]);
        days[column] = summary.total_days;
    }

    HeatmapView {
        school_years: years.to_vec(),
        rows: rows
            .into_iter()
            .map(|(employee_id, days)| HeatmapRow { employee_id, days })
            .collect(),
    }
}

fn cost_breakdown(
    by_year: &ByYear,
    years: &[SchoolYear],
    thresholds: &[Decimal],
) -> Vec<ThresholdCounts> {
    thresholds
        .iter()
        .map(|&threshold| ThresholdCounts {
            threshold,
            by_year: years
                .iter()
                .map(|&school_year| YearCount {
                    school_year,
                    teachers: teachers_over(summaries_in_year(by_year, school_year), threshold),
                })
                .collect(),
        })
        .collect()
}

fn savings(all_years: &[ThresholdSummary], reported_cost: Decimal) -> Vec<Savings> {
    all_years
        .iter()
        .map(|summary| Savings {
            threshold: summary.threshold,
            district_saves: summary.totals.district_saves,
            share_of_cost: fraction(summary.totals.district_saves, reported_cost),
        })
        .collect()
}

/// Computes every dashboard view from the given records.
///
/// # Errors
///
/// Fails with [`EngineError::DataQuality`](crate::error::EngineError::DataQuality)
/// if any teacher record has an invalid `Used` value or an unparseable date.
/// Non-teacher records are never inspected. An empty record set yields a
/// report of empty views.
pub fn build_report(
    records: &[AbsenceRecord],
    config: &AnalysisConfig,
) -> EngineResult<DashboardReport> {
    let started = Instant::now();
    let rate = config.replacement_cost_rate();
    let thresholds = config.thresholds();
    let reporting = config.reporting();

    let teachers = config.teacher_filter().select(records);

    let by_employee = aggregate_by_employee(&teachers, rate)?;
    let all_years = aggregate_by_employee_and_year(&teachers, rate)?;
    let years = report_years(config, &all_years);
    let by_year: ByYear = all_years
        .into_iter()
        .filter(|((year, _), _)| years.contains(year))
        .collect();

    let employee_summaries: Vec<TeacherSummary> = by_employee.values().cloned().collect();
    let teacher_count = employee_summaries.len();
    let total_days: Decimal = employee_summaries.iter().map(|s| s.total_days).sum();
    let total_cost: Decimal = employee_summaries.iter().map(|s| s.total_cost).sum();

    // Trends
    let yearly = yearly_totals(&by_year);
    let monthly = monthly_costs(&teachers, rate)?;

    // Top teachers
    let all_time = top_n(&employee_summaries, reporting.top_n);
    let top_by_year = top_n_by_year(&by_year, &years, reporting.top_n);
    let repeats = repeat_appearances(&top_by_year, &all_time);
    let tables = coverage_tables(&all_time, thresholds, rate)?;

    // Coverage
    let coverage_per_year = coverage_by_year(&by_year, thresholds, rate)?;
    let coverage_all_years = combine(&coverage_per_year, thresholds);
    let reported_cost: Decimal = yearly.iter().map(|y| y.total_cost).sum();

    let risk = risk_profile(&employee_summaries, config.risk_bands());

    let executive_summary = ExecutiveSummary {
        total_days,
        total_cost,
        teachers_at_risk: risk.at_risk(),
        risk_profile: risk,
        teachers_over_thresholds: thresholds
            .iter()
            .map(|&threshold| {
                let teachers = teachers_over(&employee_summaries, threshold);
                ThresholdCount {
                    threshold,
                    teachers,
                    share: fraction(Decimal::from(teachers), Decimal::from(teacher_count)),
                }
            })
            .collect(),
        cost_concentration: cost_concentration(
            &employee_summaries,
            reporting.concentration_fraction,
        )?,
        growth: match (years.first(), years.last()) {
            (Some(&from), Some(&to)) if from != to => {
                growth(&yearly, from, to).map(|change| Growth { from, to, change })
            }
            _ => None,
        },
        peak_months: peak_months(&monthly, reporting.peak_month_count),
        monthly_volatility: monthly_volatility(&monthly),
        savings: savings(&coverage_all_years, reported_cost),
    };

    let report = DashboardReport {
        district: config.district().name.clone(),
        data_period: config.district().data_period.clone(),
        replacement_cost_rate: rate,
        population: PopulationSummary {
            total_records: records.len(),
            teacher_records: teachers.len(),
            teacher_count,
        },
        executive_summary,
        trends: TrendsView { yearly, monthly },
        top_teachers: TopTeachersView {
            all_time,
            coverage_tables: tables,
            by_year: top_by_year,
            repeat_appearances: repeats,
        },
        heatmap: heatmap(&by_year, &years),
        absence_types: type_breakdown(&aggregate_by_type(&teachers, rate)?),
        cost_breakdown: cost_breakdown(&by_year, &years, thresholds),
        coverage: CoverageView {
            by_year: coverage_per_year,
            all_years: coverage_all_years,
        },
        school_years: years,
    };

    info!(
        district = %report.district,
        records = records.len(),
        teachers = teacher_count,
        school_years = report.school_years.len(),
        duration_us = started.elapsed().as_micros() as u64,
        "Built dashboard report"
    );

    Ok(report)
}

/// Loads records from `source` and builds the report.
pub fn build_report_from_source<S: AbsenceSource>(
    source: S,
    config: &AnalysisConfig,
) -> EngineResult<DashboardReport> {
    let records = source.load()?;
    build_report(&records, config)
}
