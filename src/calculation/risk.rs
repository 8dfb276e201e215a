//! Absence risk banding and cost concentration.
//!
//! Teachers are banded by absence days so the coverage planning views can
//! show how many fall in each tier.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::TeacherSummary;

/// Day limits separating the risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBands {
    /// Teachers strictly above this many days are at least high risk.
    pub high_above_days: Decimal,
    /// Teachers at or above this many days are critical.
    pub critical_from_days: Decimal,
}

/// The risk tier of a teacher's absence total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// At or below the high-risk limit.
    Standard,
    /// Above the high-risk limit but below the critical limit.
    High,
    /// At or above the critical limit.
    Critical,
}

impl RiskBand {
    /// Classifies a day count against the band limits.
    ///
    /// # Example
    ///
    /// ```
    /// use absence_cover::calculation::{RiskBand, RiskBands};
    /// use rust_decimal::Decimal;
    ///
    /// let bands = RiskBands {
    ///     high_above_days: Decimal::new(15, 0),
    ///     critical_from_days: Decimal::new(50, 0),
    /// };
    ///
    /// assert_eq!(RiskBand::classify(Decimal::new(15, 0), &bands), RiskBand::Standard);
    /// assert_eq!(RiskBand::classify(Decimal::new(16, 0), &bands), RiskBand::High);
    /// assert_eq!(RiskBand::classify(Decimal::new(50, 0), &bands), RiskBand::Critical);
    /// ```
    pub fn classify(days: Decimal, bands: &RiskBands) -> Self {
        if days >= bands.critical_from_days {
            RiskBand::Critical
        } else if days > bands.high_above_days {
            RiskBand::High
        } else {
            RiskBand::Standard
        }
    }
}

/// Number of teachers in each risk band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Teachers at or above the critical limit.
    pub critical: usize,
    /// Teachers in the high band.
    pub high: usize,
    /// Everyone else.
    pub standard: usize,
}

impl RiskProfile {
    /// Teachers in the high or critical band.
    pub fn at_risk(&self) -> usize {
        self.critical + self.high
    }
}

/// Counts teachers per risk band.
pub fn risk_profile<'a, I>(summaries: I, bands: &RiskBands) -> RiskProfile
where
    I: IntoIterator<Item = &'a TeacherSummary>,
{
    let mut profile = RiskProfile::default();
    for summary in summaries {
        match RiskBand::classify(summary.total_days, bands) {
            RiskBand::Critical => profile.critical += 1,
            RiskBand::High => profile.high += 1,
            RiskBand::Standard => profile.standard += 1,
        }
    }
    profile
}

/// Counts teachers strictly above `threshold` days.
pub fn teachers_over<'a, I>(summaries: I, threshold: Decimal) -> usize
where
    I: IntoIterator<Item = &'a TeacherSummary>,
{
    summaries
        .into_iter()
        .filter(|s| s.total_days > threshold)
        .count()
}

/// How much of the total cost the most expensive teachers account for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConcentration {
    /// Fraction of teachers considered, e.g. `0.1` for the top 10%.
    pub fraction: Decimal,
    /// Number of teachers in the top group.
    pub teacher_count: usize,
    /// Cost carried by the top group.
    pub top_cost: Decimal,
    /// Cost carried by everyone.
    pub total_cost: Decimal,
    /// `top_cost / total_cost`, zero when there is no cost.
    pub share: Decimal,
}

/// Computes the share of cost carried by the top `fraction` of teachers.
///
/// The group size is `ceil(fraction * teachers)`, so any non-empty
/// population has a group of at least one.
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] unless `0 < fraction <= 1`.
pub fn cost_concentration(
    summaries: &[TeacherSummary],
    fraction: Decimal,
) -> EngineResult<CostConcentration> {
    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        return Err(EngineError::InvalidArgument {
            argument: "fraction".to_string(),
            message: format!("must be in (0, 1], got {}", fraction.normalize()),
        });
    }

    let mut costs: Vec<Decimal> = summaries.iter().map(|s| s.total_cost).collect();
    costs.sort_by(|a, b| b.cmp(a));

    let group = (fraction * Decimal::from(costs.len())).ceil();
    let teacher_count = group.to_usize().unwrap_or(costs.len()).min(costs.len());

    let top_cost: Decimal = costs.iter().take(teacher_count).sum();
    let total_cost: Decimal = costs.iter().sum();
    let share = if total_cost.is_zero() {
        Decimal::ZERO
    } else {
        top_cost / total_cost
    };

    Ok(CostConcentration {
        fraction,
        teacher_count,
        top_cost,
        total_cost,
        share,
    })
}
