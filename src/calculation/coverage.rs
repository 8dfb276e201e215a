//! Threshold coverage calculation.
//!
//! Coverage pays replacement cost for absence days beyond a deductible
//! threshold; the district pays for the days up to it. The same split is used
//! for every table and summary so that all views agree.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CoverageRow, CoverageSplit, CoverageTable, CoverageTotals, EmployeeId, SchoolYear,
    TeacherSummary, ThresholdSummary,
};

fn ensure_non_negative(argument: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidArgument {
            argument: argument.to_string(),
            message: format!("must not be negative, got {}", value.normalize()),
        });
    }
    Ok(())
}

/// Splits the replacement cost of `total_days` around `threshold`.
///
/// Days up to and including the threshold are paid by the district; days
/// beyond it are paid by coverage. `district_pays + coverage_pays` always
/// equals `total_cost` exactly.
///
/// # Arguments
///
/// * `total_days` - Absence days to split
/// * `threshold` - Deductible threshold in days
/// * `rate` - Replacement cost per absence day
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] if any argument is negative.
///
/// # Examples
///
/// ## At the threshold
///
/// ```
/// use absence_cover::calculation::split;
/// use rust_decimal::Decimal;
///
/// let result = split(Decimal::new(15, 0), Decimal::new(15, 0), Decimal::new(175, 0)).unwrap();
/// assert_eq!(result.district_pays, Decimal::new(2625, 0));
/// assert_eq!(result.coverage_pays, Decimal::ZERO);
/// ```
///
/// ## Above the threshold
///
/// ```
/// use absence_cover::calculation::split;
/// use rust_decimal::Decimal;
///
/// let result = split(Decimal::new(20, 0), Decimal::new(15, 0), Decimal::new(175, 0)).unwrap();
/// assert_eq!(result.total_cost, Decimal::new(3500, 0));
/// assert_eq!(result.district_pays, Decimal::new(2625, 0));
/// assert_eq!(result.coverage_pays, Decimal::new(875, 0));
/// assert_eq!(result.district_saves, result.coverage_pays);
/// ```
pub fn split(
    total_days: Decimal,
    threshold: Decimal,
    rate: Decimal,
) -> EngineResult<CoverageSplit> {
    ensure_non_negative("total_days", total_days)?;
    ensure_non_negative("threshold", threshold)?;
    ensure_non_negative("rate", rate)?;

    let total_cost = total_days * rate;
    let (district_pays, coverage_pays) = if total_days <= threshold {
        (total_cost, Decimal::ZERO)
    } else {
        (threshold * rate, (total_days - threshold) * rate)
    };

    Ok(CoverageSplit {
        threshold,
        total_days,
        total_cost,
        district_pays,
        coverage_pays,
        district_saves: coverage_pays,
    })
}

/// Builds the coverage table for an ordered list of teachers at one threshold.
///
/// Rows keep the order of `summaries`, so passing a top-N list yields a
/// ranked table.
pub fn coverage_table<'a, I>(
    summaries: I,
    threshold: Decimal,
    rate: Decimal,
) -> EngineResult<CoverageTable>
where
    I: IntoIterator<Item = &'a TeacherSummary>,
{
    let mut rows = Vec::new();
    let mut totals = CoverageTotals::default();

    for summary in summaries {
        let split = split(summary.total_days, threshold, rate)?;
        totals.add(&split);
        rows.push(CoverageRow {
            employee_id: summary.employee_id,
            split,
        });
    }

    Ok(CoverageTable {
        threshold,
        rows,
        totals,
    })
}

/// Builds one [`CoverageTable`] per threshold, in threshold order given.
pub fn coverage_tables(
    summaries: &[TeacherSummary],
    thresholds: &[Decimal],
    rate: Decimal,
) -> EngineResult<Vec<CoverageTable>> {
    thresholds
        .iter()
        .map(|&threshold| coverage_table(summaries, threshold, rate))
        .collect()
}

/// Sums the splits of the teachers strictly above `threshold`.
///
/// Teachers at or below the threshold generate no coverage claim and are
/// not counted.
pub fn threshold_summary<'a, I>(
    summaries: I,
    threshold: Decimal,
    rate: Decimal,
    school_year: Option<SchoolYear>,
) -> EngineResult<ThresholdSummary>
where
    I: IntoIterator<Item = &'a TeacherSummary>,
{
    ensure_non_negative("threshold", threshold)?;

    let mut teachers_over_threshold = 0;
    let mut totals = CoverageTotals::default();

    for summary in summaries.into_iter().filter(|s| s.total_days > threshold) {
        let split = split(summary.total_days, threshold, rate)?;
        totals.add(&split);
        teachers_over_threshold += 1;
    }

    Ok(ThresholdSummary {
        threshold,
        school_year,
        teachers_over_threshold,
        totals,
    })
}

/// Evaluates [`threshold_summary`] for every school year and threshold.
///
/// Each teacher's deductible applies per school year, so a teacher-year is
/// the unit of claim. Years with no summaries are omitted.
pub fn coverage_by_year(
    by_year: &BTreeMap<(SchoolYear, EmployeeId), TeacherSummary>,
    thresholds: &[Decimal],
    rate: Decimal,
) -> EngineResult<BTreeMap<SchoolYear, Vec<ThresholdSummary>>> {
    let mut grouped: BTreeMap<SchoolYear, Vec<&TeacherSummary>> = BTreeMap::new();
    for ((year, _), summary) in by_year {
        grouped.entry(*year).or_default().push(summary);
    }

    let mut result = BTreeMap::new();
    for (year, summaries) in grouped {
        let per_threshold = thresholds
            .iter()
            .map(|&threshold| {
                threshold_summary(summaries.iter().copied(), threshold, rate, Some(year))
            })
            .collect::<EngineResult<Vec<_>>>()?;
        result.insert(year, per_threshold);
    }

    debug!(
        school_years = result.len(),
        thresholds = thresholds.len(),
        "Computed coverage by school year"
    );

    Ok(result)
}

/// Sums per-year summaries into one all-years summary per threshold.
///
/// The output follows `thresholds`; a threshold with no matching per-year
/// summaries yields zero totals.
pub fn combine(
    by_year: &BTreeMap<SchoolYear, Vec<ThresholdSummary>>,
    thresholds: &[Decimal],
) -> Vec<ThresholdSummary> {
    thresholds
        .iter()
        .map(|&threshold| {
            let mut combined = ThresholdSummary {
                threshold,
                school_year: None,
                teachers_over_threshold: 0,
                totals: CoverageTotals::default(),
            };
            for summary in by_year
                .values()
                .flatten()
                .filter(|s| s.threshold == threshold)
            {
                combined.teachers_over_threshold += summary.teachers_over_threshold;
                combined.totals.merge(&summary.totals);
            }
            combined
        })
        .collect()
}
