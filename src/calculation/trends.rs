//! Yearly and monthly absence trends.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use std::collections::BTreeMap;

use crate::error::EngineResult;
use crate::models::{
    AbsenceRecord, CellValue, EmployeeId, MonthlyCost, SchoolYear, TeacherSummary, YearlyTotal,
};

use super::SCHOOL_YEAR_START_MONTH;

/// Rolls per-teacher yearly summaries up into one total per school year.
///
/// Output is ordered oldest year first.
pub fn yearly_totals(
    by_year: &BTreeMap<(SchoolYear, EmployeeId), TeacherSummary>,
) -> Vec<YearlyTotal> {
    let mut totals: BTreeMap<SchoolYear, YearlyTotal> = BTreeMap::new();

    for ((year, _), summary) in by_year {
        let total = totals.entry(*year).or_insert_with(|| YearlyTotal {
            school_year: *year,
            teacher_count: 0,
            total_days: Decimal::ZERO,
            total_cost: Decimal::ZERO,
        });
        total.teacher_count += 1;
        total.total_days += summary.total_days;
        total.total_cost += summary.total_cost;
    }

    totals.into_values().collect()
}

/// Sums days and cost per calendar month across every year in the data.
///
/// All twelve months are returned in school-year order (July first), with
/// zero totals for months without absences. Undated records are skipped; a
/// malformed date is a data quality error.
pub fn monthly_costs(records: &[AbsenceRecord], rate: Decimal) -> EngineResult<Vec<MonthlyCost>> {
    let mut days_by_month = [Decimal::ZERO; 12];

    for record in records {
        let days = record.days()?;
        // Surfaces malformed dates with the record named.
        record.school_year()?;
        if let CellValue::Value(date) = &record.from_date {
            days_by_month[date.month0() as usize] += days;
        }
    }

    Ok((0..12)
        .map(|offset| {
            let month0 = (SCHOOL_YEAR_START_MONTH - 1 + offset) % 12;
            let total_days = days_by_month[month0 as usize];
            MonthlyCost {
                month: month0 + 1,
                total_days,
                total_cost: total_days * rate,
            }
        })
        .collect())
}

/// Returns the `n` most expensive months, most expensive first.
///
/// Ties keep school-year order. Months with zero cost are never reported.
pub fn peak_months(costs: &[MonthlyCost], n: usize) -> Vec<MonthlyCost> {
    let mut ranked: Vec<MonthlyCost> = costs
        .iter()
        .filter(|c| c.total_cost > Decimal::ZERO)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.total_cost.cmp(&a.total_cost));
    ranked.truncate(n);
    ranked
}

/// Coefficient of variation of the months that had any cost.
///
/// The sample standard deviation of the nonzero monthly costs divided by
/// their mean. `0.379` reads as costs swinging about 38% around the typical
/// month. Returns `None` with fewer than two nonzero months.
///
/// # Example
///
/// ```
/// use absence_cover::calculation::monthly_volatility;
/// use absence_cover::models::MonthlyCost;
/// use rust_decimal::Decimal;
///
/// let month = |month, cost| MonthlyCost {
///     month,
///     total_days: Decimal::ZERO,
///     total_cost: Decimal::new(cost, 0),
/// };
/// let costs = vec![month(9, 100), month(10, 300), month(11, 0)];
///
/// let cv = monthly_volatility(&costs).unwrap();
/// assert!((cv - Decimal::new(7071, 4)).abs() < Decimal::new(1, 4));
/// ```
pub fn monthly_volatility(costs: &[MonthlyCost]) -> Option<Decimal> {
    let active: Vec<Decimal> = costs
        .iter()
        .map(|c| c.total_cost)
        .filter(|cost| *cost > Decimal::ZERO)
        .collect();
    if active.len() < 2 {
        return None;
    }

    let n = Decimal::from(active.len());
    let mean = active.iter().sum::<Decimal>() / n;
    let variance = active
        .iter()
        .map(|cost| (*cost - mean) * (*cost - mean))
        .sum::<Decimal>()
        / (n - Decimal::ONE);

    Some(variance.sqrt()? / mean)
}

/// Fractional change in total cost from one school year to another.
///
/// Returns `None` when either year is absent or the base year cost is zero.
/// A result of `0.5` means costs grew by half.
///
/// # Example
///
/// ```
/// use absence_cover::calculation::growth;
/// use absence_cover::models::{SchoolYear, YearlyTotal};
/// use rust_decimal::Decimal;
///
/// let total = |year, cost| YearlyTotal {
///     school_year: SchoolYear::new(year),
///     teacher_count: 1,
///     total_days: Decimal::ZERO,
///     total_cost: Decimal::new(cost, 0),
/// };
/// let yearly = vec![total(2021, 1000), total(2024, 1500)];
///
/// let change = growth(&yearly, SchoolYear::new(2021), SchoolYear::new(2024));
/// assert_eq!(change, Some(Decimal::new(5, 1)));
/// ```
pub fn growth(yearly: &[YearlyTotal], from: SchoolYear, to: SchoolYear) -> Option<Decimal> {
    let cost_of = |year: SchoolYear| {
        yearly
            .iter()
            .find(|t| t.school_year == year)
            .map(|t| t.total_cost)
    };

    let base = cost_of(from)?;
    let current = cost_of(to)?;
    if base.is_zero() {
        return None;
    }
    Some((current - base) / base)
}
