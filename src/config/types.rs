//! Configuration types for absence coverage analysis.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{RiskBands, TeacherFilter};
use crate::error::{EngineError, EngineResult};
use crate::models::SchoolYear;

/// Metadata about the district whose data is analysed.
#[derive(Debug, Clone, Deserialize)]
pub struct DistrictMetadata {
    /// The district name shown in report headings.
    pub name: String,
    /// The period the data export covers, e.g. "2021-2025".
    pub data_period: String,
}

/// Cost and threshold settings from coverage.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageConfig {
    /// Replacement (substitute) cost per absence day.
    pub replacement_cost_rate: Decimal,
    /// Deductible thresholds to evaluate, in days.
    pub thresholds: Vec<Decimal>,
}

/// Population rules from population.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationConfig {
    /// Rules deciding which job descriptions are teachers.
    pub teacher_filter: TeacherFilter,
    /// Day limits for the risk bands.
    pub risk_bands: RiskBands,
}

fn default_peak_month_count() -> usize {
    3
}

/// Report shaping settings from reporting.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Size of the top-teacher lists.
    pub top_n: usize,
    /// School years shown in per-year views. Empty means every year present
    /// in the data.
    #[serde(default)]
    pub tracked_school_years: Vec<SchoolYear>,
    /// Fraction of teachers used for the cost concentration figure.
    pub concentration_fraction: Decimal,
    /// Number of peak months listed in the executive summary.
    #[serde(default = "default_peak_month_count")]
    pub peak_month_count: usize,
}

/// The complete analysis configuration.
///
/// Built either by [`ConfigLoader`](super::ConfigLoader) from a YAML
/// directory or directly in code. Construction validates every value.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    district: DistrictMetadata,
    coverage: CoverageConfig,
    population: PopulationConfig,
    reporting: ReportingConfig,
}

fn invalid(field: &str, message: String) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message,
    }
}

impl AnalysisConfig {
    /// Creates a validated configuration from its component parts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the rate or any threshold is
    /// negative, no threshold is given, the teacher filter has no include
    /// rule, the risk band limits are out of order, `top_n` is zero, or the
    /// concentration fraction is outside `(0, 1]`.
    pub fn new(
        district: DistrictMetadata,
        coverage: CoverageConfig,
        population: PopulationConfig,
        reporting: ReportingConfig,
    ) -> EngineResult<Self> {
        if coverage.replacement_cost_rate < Decimal::ZERO {
            return Err(invalid(
                "replacement_cost_rate",
                format!("must not be negative, got {}", coverage.replacement_cost_rate),
            ));
        }
        if coverage.thresholds.is_empty() {
            return Err(invalid(
                "thresholds",
                "at least one threshold is required".to_string(),
            ));
        }
        if let Some(negative) = coverage.thresholds.iter().find(|t| **t < Decimal::ZERO) {
            return Err(invalid(
                "thresholds",
                format!("must not be negative, got {}", negative),
            ));
        }
        if population.teacher_filter.include.is_empty() {
            return Err(invalid(
                "teacher_filter.include",
                "at least one include rule is required".to_string(),
            ));
        }
        let bands = &population.risk_bands;
        if bands.high_above_days >= bands.critical_from_days {
            return Err(invalid(
                "risk_bands",
                format!(
                    "high_above_days ({}) must be below critical_from_days ({})",
                    bands.high_above_days, bands.critical_from_days
                ),
            ));
        }
        if reporting.top_n == 0 {
            return Err(invalid("top_n", "must be at least 1".to_string()));
        }
        let fraction = reporting.concentration_fraction;
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(invalid(
                "concentration_fraction",
                format!("must be in (0, 1], got {}", fraction),
            ));
        }

        Ok(Self {
            district,
            coverage,
            population,
            reporting,
        })
    }

    /// Returns the district metadata.
    pub fn district(&self) -> &DistrictMetadata {
        &self.district
    }

    /// Returns the replacement cost per absence day.
    pub fn replacement_cost_rate(&self) -> Decimal {
        self.coverage.replacement_cost_rate
    }

    /// Returns the deductible thresholds in configured order.
    pub fn thresholds(&self) -> &[Decimal] {
        &self.coverage.thresholds
    }

    /// Returns the teacher population rules.
    pub fn teacher_filter(&self) -> &TeacherFilter {
        &self.population.teacher_filter
    }

    /// Returns the risk band limits.
    pub fn risk_bands(&self) -> &RiskBands {
        &self.population.risk_bands
    }

    /// Returns the report shaping settings.
    pub fn reporting(&self) -> &ReportingConfig {
        &self.reporting
    }
}
