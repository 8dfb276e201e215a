//! Calculation logic for the absence coverage engine.
//!
//! This module contains the pure functions behind every dashboard view:
//! teacher population filtering, school year classification, aggregation of
//! absence days and replacement cost, the threshold coverage split, yearly
//! and monthly trends, and risk banding.

mod aggregation;
mod coverage;
mod population;
mod risk;
mod school_year;
mod trends;

pub use aggregation::{
    aggregate_by_employee, aggregate_by_employee_and_year, aggregate_by_type, repeat_appearances,
    top_n, top_n_by_year, type_breakdown,
};
pub use coverage::{
    combine, coverage_by_year, coverage_table, coverage_tables, split, threshold_summary,
};
pub use population::TeacherFilter;
pub use risk::{
    CostConcentration, RiskBand, RiskBands, RiskProfile, cost_concentration, risk_profile,
    teachers_over,
};
pub use school_year::{SCHOOL_YEAR_START_MONTH, classify};
pub use trends::{growth, monthly_costs, monthly_volatility, peak_months, yearly_totals};
