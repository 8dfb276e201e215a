//! Core data models for the absence coverage engine.
//!
//! This module contains the absence record input type and every derived
//! summary the calculations produce.

mod absence_record;
mod coverage;
mod school_year;
mod summary;

pub use absence_record::{AbsenceRecord, CellValue, EmployeeId, RecordId};
pub use coverage::{CoverageRow, CoverageSplit, CoverageTable, CoverageTotals, ThresholdSummary};
pub use school_year::{ParseSchoolYearError, SchoolYear};
pub use summary::{
    MonthlyCost, RepeatAppearance, TeacherSummary, TypeBreakdown, TypeSummary, YearlyTotal,
};
