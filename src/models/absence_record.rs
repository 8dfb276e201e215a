//! Absence record model and related types.
//!
//! One [`AbsenceRecord`] corresponds to one leave event row in the district's
//! accrual history export. Cells that feed calculations keep their raw state
//! ([`CellValue`]) so that validation happens where the value is consumed and
//! the error can name the offending record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculation::classify;
use crate::error::{EngineError, EngineResult};

use super::SchoolYear;

/// Employee number as it appears in the `Emp #` column.
pub type EmployeeId = i64;

/// Identifies a record in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    /// 1-based data row in the source table (the header is not counted).
    pub row: usize,
    /// The employee the record belongs to.
    pub employee_id: EmployeeId,
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} (employee {})", self.row, self.employee_id)
    }
}

/// The state of a source cell after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue<T> {
    /// The cell parsed successfully.
    Value(T),
    /// The cell was blank.
    Empty,
    /// The cell held text that could not be parsed; the raw text is kept.
    Malformed(String),
}

impl<T> CellValue<T> {
    /// Returns the parsed value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            CellValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for CellValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => CellValue::Value(v),
            None => CellValue::Empty,
        }
    }
}

/// A single absence (leave) event.
///
/// # Example
///
/// ```
/// use absence_cover::models::{AbsenceRecord, CellValue, SchoolYear};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = AbsenceRecord {
///     row: 1,
///     employee_id: 1043,
///     job_description: Some("Instructor - Elementary".to_string()),
///     absence_type: "SICK".to_string(),
///     from_date: CellValue::Value(NaiveDate::from_ymd_opt(2022, 11, 15).unwrap()),
///     days_used: CellValue::Value(Decimal::new(15, 1)),
/// };
///
/// assert_eq!(record.days().unwrap(), Decimal::new(15, 1));
/// assert_eq!(record.school_year().unwrap(), Some(SchoolYear::new(2022)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    /// 1-based data row in the source table.
    pub row: usize,
    /// Employee number, stable across years.
    pub employee_id: EmployeeId,
    /// Free-text role; `None` when the cell was blank.
    pub job_description: Option<String>,
    /// Absence category label (e.g. "SICK", "PERSONAL").
    pub absence_type: String,
    /// The date the absence started.
    pub from_date: CellValue<NaiveDate>,
    /// Absence days consumed.
    pub days_used: CellValue<Decimal>,
}

impl AbsenceRecord {
    /// Identifies this record for error reporting.
    pub fn id(&self) -> RecordId {
        RecordId {
            row: self.row,
            employee_id: self.employee_id,
        }
    }

    /// Returns the validated number of days used.
    ///
    /// Fails with [`EngineError::DataQuality`] when the value is blank,
    /// unparseable, or negative. A bad value is never treated as zero.
    pub fn days(&self) -> EngineResult<Decimal> {
        match &self.days_used {
            CellValue::Value(days) if *days >= Decimal::ZERO => Ok(*days),
            CellValue::Value(days) => Err(self.quality_error(format!(
                "'Used' must not be negative, got {}",
                days.normalize()
            ))),
            CellValue::Empty => Err(self.quality_error("'Used' is blank".to_string())),
            CellValue::Malformed(raw) => Err(self.quality_error(format!(
                "'Used' value '{}' is not a number",
                raw
            ))),
        }
    }

    /// Returns the school year of the absence start date.
    ///
    /// A blank date yields `Ok(None)` and the record is left out of
    /// year-scoped views. An unparseable date is a data quality error.
    pub fn school_year(&self) -> EngineResult<Option<SchoolYear>> {
        match &self.from_date {
            CellValue::Value(date) => Ok(classify(Some(*date))),
            CellValue::Empty => Ok(None),
            CellValue::Malformed(raw) => Err(self.quality_error(format!(
                "'From Date' value '{}' is not a date",
                raw
            ))),
        }
    }

    fn quality_error(&self, message: String) -> EngineError {
        EngineError::DataQuality {
            record: self.id(),
            message,
        }
    }
}
