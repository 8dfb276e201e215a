//! Absence table sources.
//!
//! The engine treats the district export as an injected collaborator: any
//! type implementing [`AbsenceSource`] can supply records. A CSV reader and an
//! in-memory source are provided.
//!
//! # Example
//!
//! ```
//! use absence_cover::source::{AbsenceSource, CsvAbsenceSource};
//!
//! let csv = "Emp #,Job Description,Type Description,From Date,Used\n\
//!            1043,Instructor,SICK,2022-11-15,1\n";
//! let records = CsvAbsenceSource::from_reader(csv.as_bytes(), "inline").load().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].employee_id, 1043);
//! ```

mod csv_source;

pub use csv_source::{
    CsvAbsenceSource, DAYS_USED_COLUMN, EMPLOYEE_ID_COLUMN, FROM_DATE_COLUMN,
    JOB_DESCRIPTION_COLUMN, TYPE_DESCRIPTION_COLUMN, UNSPECIFIED_ABSENCE_TYPE,
};

use crate::error::EngineResult;
use crate::models::AbsenceRecord;

/// Supplies the absence table for one run.
pub trait AbsenceSource {
    /// Reads every record. Called once per run.
    fn load(self) -> EngineResult<Vec<AbsenceRecord>>;
}

/// A source over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<AbsenceRecord>,
}

impl InMemorySource {
    /// Wraps a record list.
    pub fn new(records: Vec<AbsenceRecord>) -> Self {
        Self { records }
    }
}

impl AbsenceSource for InMemorySource {
    fn load(self) -> EngineResult<Vec<AbsenceRecord>> {
        Ok(self.records)
    }
}
