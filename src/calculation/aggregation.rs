//! Absence aggregation.
//!
//! This module sums absence days and replacement cost per teacher, per
//! teacher and school year, and per absence type, and selects the teachers
//! with the most absence days.
//!
//! Every function takes the replacement cost rate as an argument and
//! validates each record's `days_used` as it is consumed. A bad value fails
//! the whole aggregation with the offending record named.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{
    AbsenceRecord, EmployeeId, RepeatAppearance, SchoolYear, TeacherSummary, TypeBreakdown,
    TypeSummary,
};

fn accumulate(summary: &mut TeacherSummary, days: Decimal, rate: Decimal) {
    summary.record_count += 1;
    summary.total_days += days;
    summary.total_cost = summary.total_days * rate;
}

fn empty_summary(employee_id: EmployeeId, school_year: Option<SchoolYear>) -> TeacherSummary {
    TeacherSummary {
        employee_id,
        school_year,
        record_count: 0,
        total_days: Decimal::ZERO,
        total_cost: Decimal::ZERO,
    }
}

/// Sums days and cost per employee over all years.
///
/// Records with a blank or malformed date still count here; only
/// `days_used` is validated.
///
/// # Example
///
/// ```
/// use absence_cover::calculation::aggregate_by_employee;
/// use absence_cover::models::{AbsenceRecord, CellValue};
/// use rust_decimal::Decimal;
///
/// let records = vec![
///     AbsenceRecord {
///         row: 1,
///         employee_id: 7,
///         job_description: Some("Instructor".to_string()),
///         absence_type: "SICK".to_string(),
///         from_date: CellValue::Empty,
///         days_used: CellValue::Value(Decimal::new(2, 0)),
///     },
/// ];
///
/// let by_employee = aggregate_by_employee(&records, Decimal::new(175, 0)).unwrap();
/// assert_eq!(by_employee[&7].total_cost, Decimal::new(350, 0));
/// ```
pub fn aggregate_by_employee(
    records: &[AbsenceRecord],
    rate: Decimal,
) -> EngineResult<BTreeMap<EmployeeId, TeacherSummary>> {
    let mut summaries: BTreeMap<EmployeeId, TeacherSummary> = BTreeMap::new();

    for record in records {
        let days = record.days()?;
        let summary = summaries
            .entry(record.employee_id)
            .or_insert_with(|| empty_summary(record.employee_id, None));
        accumulate(summary, days, rate);
    }

    debug!(
        records = records.len(),
        employees = summaries.len(),
        "Aggregated absences by employee"
    );

    Ok(summaries)
}

/// Sums days and cost per (school year, employee).
///
/// Records with a blank date are dropped; a malformed date is a data quality
/// error.
pub fn aggregate_by_employee_and_year(
    records: &[AbsenceRecord],
    rate: Decimal,
) -> EngineResult<BTreeMap<(SchoolYear, EmployeeId), TeacherSummary>> {
    let mut summaries: BTreeMap<(SchoolYear, EmployeeId), TeacherSummary> = BTreeMap::new();
    let mut undated = 0usize;

    for record in records {
        let days = record.days()?;
        let Some(year) = record.school_year()? else {
            undated += 1;
            continue;
        };
        let summary = summaries
            .entry((year, record.employee_id))
            .or_insert_with(|| empty_summary(record.employee_id, Some(year)));
        accumulate(summary, days, rate);
    }

    debug!(
        records = records.len(),
        undated,
        teacher_years = summaries.len(),
        "Aggregated absences by school year and employee"
    );

    Ok(summaries)
}

/// Selects the `n` summaries with the most absence days, most first.
///
/// Ties keep their input order. Aggregates are keyed by ascending employee
/// id, so for those inputs ties go to the lower employee id.
///
/// # Example
///
/// ```
/// use absence_cover::calculation::top_n;
/// use absence_cover::models::TeacherSummary;
/// use rust_decimal::Decimal;
///
/// let summary = |id, days| TeacherSummary {
///     employee_id: id,
///     school_year: None,
///     record_count: 1,
///     total_days: Decimal::new(days, 0),
///     total_cost: Decimal::new(days * 175, 0),
/// };
/// let summaries = vec![summary(1, 5), summary(2, 9), summary(3, 9)];
///
/// let top = top_n(&summaries, 2);
/// assert_eq!(top.iter().map(|s| s.employee_id).collect::<Vec<_>>(), vec![2, 3]);
/// ```
pub fn top_n<'a, I>(summaries: I, n: usize) -> Vec<TeacherSummary>
where
    I: IntoIterator<Item = &'a TeacherSummary>,
{
    let mut ranked: Vec<TeacherSummary> = summaries.into_iter().cloned().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.total_days.cmp(&a.total_days));
    ranked.truncate(n);
    ranked
}

/// Selects the top `n` teachers of each listed school year.
///
/// Years with no absences map to an empty list.
pub fn top_n_by_year(
    by_year: &BTreeMap<(SchoolYear, EmployeeId), TeacherSummary>,
    years: &[SchoolYear],
    n: usize,
) -> BTreeMap<SchoolYear, Vec<TeacherSummary>> {
    years
        .iter()
        .map(|&year| {
            let in_year = by_year
                .range((year, EmployeeId::MIN)..=(year, EmployeeId::MAX))
                .map(|(_, summary)| summary);
            (year, top_n(in_year, n))
        })
        .collect()
}

/// Finds teachers who appear in more than one year's top list.
///
/// `all_time` supplies the rank shown alongside each repeat. Results are
/// ordered by number of appearances (most first), then by the first year
/// the teacher appears in, then by employee id.
pub fn repeat_appearances(
    top_by_year: &BTreeMap<SchoolYear, Vec<TeacherSummary>>,
    all_time: &[TeacherSummary],
) -> Vec<RepeatAppearance> {
    let mut years_by_employee: BTreeMap<EmployeeId, Vec<SchoolYear>> = BTreeMap::new();
    for (year, top) in top_by_year {
        for summary in top {
            years_by_employee
                .entry(summary.employee_id)
                .or_default()
                .push(*year);
        }
    }

    let mut repeats: Vec<RepeatAppearance> = years_by_employee
        .into_iter()
        .filter(|(_, years)| years.len() > 1)
        .map(|(employee_id, school_years)| RepeatAppearance {
            employee_id,
            all_time_rank: all_time
                .iter()
                .position(|s| s.employee_id == employee_id)
                .map(|index| index + 1),
            school_years,
        })
        .collect();

    repeats.sort_by(|a, b| {
        b.appearances()
            .cmp(&a.appearances())
            .then_with(|| a.school_years[0].cmp(&b.school_years[0]))
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });

    repeats
}

/// Counts records and sums days and cost per absence type.
pub fn aggregate_by_type(
    records: &[AbsenceRecord],
    rate: Decimal,
) -> EngineResult<BTreeMap<String, TypeSummary>> {
    let mut summaries: BTreeMap<String, TypeSummary> = BTreeMap::new();

    for record in records {
        let days = record.days()?;
        let summary = summaries
            .entry(record.absence_type.clone())
            .or_insert_with(|| TypeSummary {
                absence_type: record.absence_type.clone(),
                count: 0,
                total_days: Decimal::ZERO,
                total_cost: Decimal::ZERO,
            });
        summary.count += 1;
        summary.total_days += days;
        summary.total_cost = summary.total_days * rate;
    }

    debug!(
        records = records.len(),
        absence_types = summaries.len(),
        "Aggregated absences by type"
    );

    Ok(summaries)
}

/// Adds each type's share of the record count and of the total cost.
///
/// Output is ordered by cost, most expensive first; shares are zero when the
/// corresponding total is zero.
pub fn type_breakdown(by_type: &BTreeMap<String, TypeSummary>) -> Vec<TypeBreakdown> {
    let total_count: usize = by_type.values().map(|s| s.count).sum();
    let total_cost: Decimal = by_type.values().map(|s| s.total_cost).sum();

    let share = |part: Decimal, whole: Decimal| {
        if whole.is_zero() {
            Decimal::ZERO
        } else {
            part / whole
        }
    };

    let mut breakdown: Vec<TypeBreakdown> = by_type
        .values()
        .map(|summary| TypeBreakdown {
            share_of_count: share(Decimal::from(summary.count), Decimal::from(total_count)),
            share_of_cost: share(summary.total_cost, total_cost),
            summary: summary.clone(),
        })
        .collect();

    breakdown.sort_by(|a, b| b.summary.total_cost.cmp(&a.summary.total_cost));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::CellValue;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rate() -> Decimal {
        dec("175")
    }

    fn record(
        row: usize,
        employee_id: EmployeeId,
        kind: &str,
        date: Option<(i32, u32, u32)>,
        days: &str,
    ) -> AbsenceRecord {
        AbsenceRecord {
            row,
            employee_id,
            job_description: Some("Instructor".to_string()),
            absence_type: kind.to_string(),
            from_date: date
                .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .into(),
            days_used: CellValue::Value(dec(days)),
        }
    }

    fn sample_records() -> Vec<AbsenceRecord> {
        vec![
            record(1, 100, "SICK", Some((2021, 9, 10)), "2"),
            record(2, 200, "PERSONAL", Some((2022, 2, 1)), "1"),
            record(3, 100, "SICK", Some((2022, 10, 5)), "3.5"),
            record(4, 300, "SICK", None, "4"),
            record(5, 200, "SICK", Some((2022, 8, 20)), "0.5"),
        ]
    }

    // ==========================================================================
    // aggregate_by_employee
    // ==========================================================================

    #[test]
    fn test_by_employee_sums_days_and_cost() {
        let result = aggregate_by_employee(&sample_records(), rate()).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[&100].total_days, dec("5.5"));
        assert_eq!(result[&100].total_cost, dec("962.5"));
        assert_eq!(result[&100].record_count, 2);
        assert_eq!(result[&100].school_year, None);
        assert_eq!(result[&200].total_days, dec("1.5"));
    }

    #[test]
    fn test_by_employee_includes_undated_records() {
        let result = aggregate_by_employee(&sample_records(), rate()).unwrap();
        assert_eq!(result[&300].total_days, dec("4"));
    }

    #[test]
    fn test_by_employee_ignores_malformed_dates() {
        let mut records = sample_records();
        records[0].from_date = CellValue::Malformed("someday".to_string());

        let result = aggregate_by_employee(&records, rate()).unwrap();
        assert_eq!(result[&100].total_days, dec("5.5"));
    }

    #[test]
    fn test_by_employee_rate_is_a_parameter() {
        let result = aggregate_by_employee(&sample_records(), dec("200")).unwrap();
        assert_eq!(result[&100].total_cost, dec("1100"));
    }

    #[test]
    fn test_by_employee_empty_input() {
        let result = aggregate_by_employee(&[], rate()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_by_employee_malformed_days_fails_with_record() {
        let mut records = sample_records();
        records[2].days_used = CellValue::Malformed("three".to_string());

        match aggregate_by_employee(&records, rate()) {
            Err(EngineError::DataQuality { record, .. }) => {
                assert_eq!(record.row, 3);
                assert_eq!(record.employee_id, 100);
            }
            other => panic!("Expected DataQuality error, got {:?}", other),
        }
    }

    // ==========================================================================
    // aggregate_by_employee_and_year
    // ==========================================================================

    #[test]
    fn test_by_year_groups_by_school_year() {
        let result = aggregate_by_employee_and_year(&sample_records(), rate()).unwrap();

        // 100 and 200 each have absences in 2021-2022 and 2022-2023
        assert_eq!(result.len(), 4);
        let key = (SchoolYear::new(2021), 100);
        assert_eq!(result[&key].total_days, dec("2"));
        assert_eq!(result[&key].school_year, Some(SchoolYear::new(2021)));

        let key = (SchoolYear::new(2021), 200);
        assert_eq!(result[&key].total_days, dec("1"));

        let key = (SchoolYear::new(2022), 200);
        assert_eq!(result[&key].total_days, dec("0.5"));
        assert_eq!(result[&key].total_cost, dec("87.5"));
    }

    #[test]
    fn test_by_year_drops_undated_records() {
        let result = aggregate_by_employee_and_year(&sample_records(), rate()).unwrap();
        assert!(result.keys().all(|(_, id)| *id != 300));
    }

    #[test]
    fn test_by_year_malformed_date_fails() {
        let mut records = sample_records();
        records[1].from_date = CellValue::Malformed("Feb 30".to_string());

        match aggregate_by_employee_and_year(&records, rate()) {
            Err(EngineError::DataQuality { record, message }) => {
                assert_eq!(record.row, 2);
                assert!(message.contains("Feb 30"));
            }
            other => panic!("Expected DataQuality error, got {:?}", other),
        }
    }

    // ==========================================================================
    // top_n
    // ==========================================================================

    fn summaries(days: &[(EmployeeId, &str)]) -> Vec<TeacherSummary> {
        days.iter()
            .map(|(id, d)| TeacherSummary {
                employee_id: *id,
                school_year: None,
                record_count: 1,
                total_days: dec(d),
                total_cost: dec(d) * rate(),
            })
            .collect()
    }

    #[test]
    fn test_top_n_orders_descending() {
        let input = summaries(&[(1, "3"), (2, "10"), (3, "7")]);
        let top = top_n(&input, 10);

        let ids: Vec<EmployeeId> = top.iter().map(|s| s.employee_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_top_n_truncates() {
        let input = summaries(&[(1, "3"), (2, "10"), (3, "7")]);
        assert_eq!(top_n(&input, 2).len(), 2);
        assert!(top_n(&input, 0).is_empty());
    }

    #[test]
    fn test_top_n_ties_keep_input_order() {
        let input = summaries(&[(9, "5"), (4, "5"), (6, "8"), (1, "5")]);
        let top = top_n(&input, 3);

        let ids: Vec<EmployeeId> = top.iter().map(|s| s.employee_id).collect();
        assert_eq!(ids, vec![6, 9, 4]);
    }

    #[test]
    fn test_top_n_is_idempotent() {
        let input = summaries(&[(1, "3"), (2, "10"), (3, "7"), (4, "7")]);
        let once = top_n(&input, 3);
        let twice = top_n(&once, 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_top_n_over_btreemap_values() {
        let by_employee = aggregate_by_employee(&sample_records(), rate()).unwrap();
        let top = top_n(by_employee.values(), 1);
        assert_eq!(top[0].employee_id, 100);
    }

    // ==========================================================================
    // top_n_by_year / repeat_appearances
    // ==========================================================================

    #[test]
    fn test_top_n_by_year_includes_empty_years() {
        let by_year = aggregate_by_employee_and_year(&sample_records(), rate()).unwrap();
        let years = [SchoolYear::new(2021), SchoolYear::new(2022), SchoolYear::new(2023)];

        let top = top_n_by_year(&by_year, &years, 1);

        assert_eq!(top.len(), 3);
        assert_eq!(top[&SchoolYear::new(2021)][0].employee_id, 100);
        assert_eq!(top[&SchoolYear::new(2022)][0].employee_id, 100);
        assert!(top[&SchoolYear::new(2023)].is_empty());
    }

    #[test]
    fn test_repeat_appearances_only_repeats() {
        let by_year = aggregate_by_employee_and_year(&sample_records(), rate()).unwrap();
        let years = [SchoolYear::new(2021), SchoolYear::new(2022)];
        let top = top_n_by_year(&by_year, &years, 2);
        let by_employee = aggregate_by_employee(&sample_records(), rate()).unwrap();
        let all_time = top_n(by_employee.values(), 2);

        let repeats = repeat_appearances(&top, &all_time);

        let ids: Vec<EmployeeId> = repeats.iter().map(|r| r.employee_id).collect();
        assert_eq!(ids, vec![100, 200]);
        assert_eq!(repeats[0].appearances(), 2);
        assert_eq!(repeats[0].all_time_rank, Some(1));
        // 200 has 1.5 days all-time and ranks below 300 (4 days)
        assert_eq!(repeats[1].all_time_rank, None);
    }

    // ==========================================================================
    // aggregate_by_type / type_breakdown
    // ==========================================================================

    #[test]
    fn test_by_type_counts_and_sums() {
        let result = aggregate_by_type(&sample_records(), rate()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["SICK"].count, 4);
        assert_eq!(result["SICK"].total_days, dec("10"));
        assert_eq!(result["SICK"].total_cost, dec("1750"));
        assert_eq!(result["PERSONAL"].count, 1);
        assert_eq!(result["PERSONAL"].total_cost, dec("175"));
    }

    #[test]
    fn test_by_type_total_matches_by_employee_total() {
        let by_type = aggregate_by_type(&sample_records(), rate()).unwrap();
        let by_employee = aggregate_by_employee(&sample_records(), rate()).unwrap();

        let type_days: Decimal = by_type.values().map(|s| s.total_days).sum();
        let employee_days: Decimal = by_employee.values().map(|s| s.total_days).sum();
        assert_eq!(type_days, employee_days);
    }

    #[test]
    fn test_type_breakdown_shares() {
        let by_type = aggregate_by_type(&sample_records(), rate()).unwrap();
        let breakdown = type_breakdown(&by_type);

        assert_eq!(breakdown[0].summary.absence_type, "SICK");
        assert_eq!(breakdown[0].share_of_count, dec("0.8"));
        assert_eq!(breakdown[0].share_of_cost, dec("1750") / dec("1925"));
        assert_eq!(breakdown[1].share_of_count, dec("0.2"));
        assert_eq!(
            breakdown[0].share_of_cost + breakdown[1].share_of_cost,
            dec("1750") / dec("1925") + dec("175") / dec("1925")
        );
    }

    #[test]
    fn test_type_breakdown_zero_totals() {
        let mut by_type = BTreeMap::new();
        by_type.insert(
            "SICK".to_string(),
            TypeSummary {
                absence_type: "SICK".to_string(),
                count: 1,
                total_days: Decimal::ZERO,
                total_cost: Decimal::ZERO,
            },
        );

        let breakdown = type_breakdown(&by_type);
        assert_eq!(breakdown[0].share_of_cost, Decimal::ZERO);
        assert_eq!(breakdown[0].share_of_count, Decimal::ONE);
    }
}
