//! CSV export reader.
//!
//! Reads the district's accrual history export. Only the five columns the
//! engine needs are required; any others are ignored. Cells are trimmed.

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{AbsenceRecord, CellValue, EmployeeId};

use super::AbsenceSource;

/// Header of the employee number column.
pub const EMPLOYEE_ID_COLUMN: &str = "Emp #";
/// Header of the job description column.
pub const JOB_DESCRIPTION_COLUMN: &str = "Job Description";
/// Header of the absence type column.
pub const TYPE_DESCRIPTION_COLUMN: &str = "Type Description";
/// Header of the absence start date column.
pub const FROM_DATE_COLUMN: &str = "From Date";
/// Header of the days used column.
pub const DAYS_USED_COLUMN: &str = "Used";

/// Label given to records whose absence type cell is blank.
pub const UNSPECIFIED_ABSENCE_TYPE: &str = "UNSPECIFIED";

const REQUIRED_COLUMNS: [&str; 5] = [
    EMPLOYEE_ID_COLUMN,
    JOB_DESCRIPTION_COLUMN,
    TYPE_DESCRIPTION_COLUMN,
    FROM_DATE_COLUMN,
    DAYS_USED_COLUMN,
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Emp #")]
    employee_id: Option<String>,
    #[serde(rename = "Job Description")]
    job_description: Option<String>,
    #[serde(rename = "Type Description")]
    absence_type: Option<String>,
    #[serde(rename = "From Date")]
    from_date: Option<String>,
    #[serde(rename = "Used")]
    days_used: Option<String>,
}

/// Reads absence records from CSV.
pub struct CsvAbsenceSource<R> {
    reader: R,
    source_name: String,
}

impl CsvAbsenceSource<File> {
    /// Opens a CSV file.
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|e| EngineError::SourceRead {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            reader: file,
            source_name,
        })
    }
}

impl<R: Read> CsvAbsenceSource<R> {
    /// Reads CSV from any reader; `source_name` appears in errors and logs.
    pub fn from_reader(reader: R, source_name: impl Into<String>) -> Self {
        Self {
            reader,
            source_name: source_name.into(),
        }
    }
}

impl<R: Read> AbsenceSource for CsvAbsenceSource<R> {
    fn load(self) -> EngineResult<Vec<AbsenceRecord>> {
        let Self {
            reader,
            source_name,
        } = self;
        let read_error = |message: String| EngineError::SourceRead {
            source_name: source_name.clone(),
            message,
        };

        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| read_error(e.to_string()))?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(EngineError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        let mut records = Vec::new();
        let mut unlabelled = 0usize;

        for (index, result) in rdr.deserialize::<RawRow>().enumerate() {
            let row = index + 1;
            let raw = result.map_err(|e| read_error(format!("row {}: {}", row, e)))?;

            let employee_id = parse_employee_id(raw.employee_id.as_deref()).ok_or_else(|| {
                read_error(format!(
                    "row {}: '{}' value '{}' is not an employee number",
                    row,
                    EMPLOYEE_ID_COLUMN,
                    raw.employee_id.as_deref().unwrap_or("")
                ))
            })?;

            let absence_type = match non_blank(raw.absence_type) {
                Some(kind) => kind,
                None => {
                    unlabelled += 1;
                    UNSPECIFIED_ABSENCE_TYPE.to_string()
                }
            };

            records.push(AbsenceRecord {
                row,
                employee_id,
                job_description: non_blank(raw.job_description),
                absence_type,
                from_date: parse_cell(raw.from_date, parse_date),
                days_used: parse_cell(raw.days_used, |s| Decimal::from_str(s).ok()),
            });
        }

        if unlabelled > 0 {
            warn!(
                source = %source_name,
                rows = unlabelled,
                label = UNSPECIFIED_ABSENCE_TYPE,
                "Rows with blank absence type labelled"
            );
        }

        info!(
            source = %source_name,
            records = records.len(),
            "Loaded absence records"
        );

        Ok(records)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn parse_cell<T>(value: Option<String>, parse: impl Fn(&str) -> Option<T>) -> CellValue<T> {
    match non_blank(value) {
        None => CellValue::Empty,
        Some(raw) => match parse(&raw) {
            Some(v) => CellValue::Value(v),
            None => CellValue::Malformed(raw),
        },
    }
}

fn parse_employee_id(value: Option<&str>) -> Option<EmployeeId> {
    let value = value?.trim();
    if let Ok(id) = value.parse::<EmployeeId>() {
        return Some(id);
    }
    // Spreadsheet exports often write integers as "1043.0".
    let decimal = Decimal::from_str(value).ok()?;
    if decimal.fract().is_zero() {
        decimal.to_i64()
    } else {
        None
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const HEADER: &str = "Emp #,Job Description,Type Description,From Date,Used";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load(body: &str) -> EngineResult<Vec<AbsenceRecord>> {
        let csv = format!("{}\n{}", HEADER, body);
        CsvAbsenceSource::from_reader(csv.as_bytes(), "test.csv").load()
    }

    #[test]
    fn test_reads_well_formed_rows() {
        let records = load(
            "1043,Instructor,SICK,2022-11-15,1.5\n\
             2001,Instructional Assistant,PERSONAL,03/01/2023,0.5\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[0].employee_id, 1043);
        assert_eq!(records[0].job_description.as_deref(), Some("Instructor"));
        assert_eq!(records[0].absence_type, "SICK");
        assert_eq!(
            records[0].from_date,
            CellValue::Value(NaiveDate::from_ymd_opt(2022, 11, 15).unwrap())
        );
        assert_eq!(records[0].days_used, CellValue::Value(dec("1.5")));
        assert_eq!(
            records[1].from_date,
            CellValue::Value(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_datetime_cells_keep_the_date() {
        let records = load("1043,Instructor,SICK,2022-11-15 00:00:00,1\n").unwrap();
        assert_eq!(
            records[0].from_date,
            CellValue::Value(NaiveDate::from_ymd_opt(2022, 11, 15).unwrap())
        );
    }

    #[test]
    fn test_blank_cells_are_empty() {
        let records = load("1043,,SICK,,\n").unwrap();

        assert_eq!(records[0].job_description, None);
        assert_eq!(records[0].from_date, CellValue::Empty);
        assert_eq!(records[0].days_used, CellValue::Empty);
    }

    #[test]
    fn test_unparseable_cells_are_kept_raw() {
        let records = load("1043,Instructor,SICK,someday,half\n").unwrap();

        assert_eq!(records[0].from_date, CellValue::Malformed("someday".to_string()));
        assert_eq!(records[0].days_used, CellValue::Malformed("half".to_string()));
    }

    #[test]
    fn test_blank_type_is_labelled() {
        let records = load("1043,Instructor,,2022-11-15,1\n").unwrap();
        assert_eq!(records[0].absence_type, UNSPECIFIED_ABSENCE_TYPE);
    }

    #[test]
    fn test_spreadsheet_style_employee_number() {
        let records = load("1043.0,Instructor,SICK,2022-11-15,1\n").unwrap();
        assert_eq!(records[0].employee_id, 1043);
    }

    #[test]
    fn test_bad_employee_number_fails() {
        match load("12.5,Instructor,SICK,2022-11-15,1\n") {
            Err(EngineError::SourceRead { source_name, message }) => {
                assert_eq!(source_name, "test.csv");
                assert!(message.contains("row 1"));
                assert!(message.contains("12.5"));
            }
            other => panic!("Expected SourceRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "Emp #,Job Description,From Date,Used\n1,Instructor,2022-11-15,1\n";
        match CsvAbsenceSource::from_reader(csv.as_bytes(), "test.csv").load() {
            Err(EngineError::MissingColumn { column }) => {
                assert_eq!(column, TYPE_DESCRIPTION_COLUMN);
            }
            other => panic!("Expected MissingColumn error, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_ignored_and_cells_trimmed() {
        let csv = "Location,Emp #,Job Description,Type Description,From Date,Used,Notes\n\
                   North, 77 , Instructor , SICK , 2023-01-09 , 2 ,flu\n";
        let records = CsvAbsenceSource::from_reader(csv.as_bytes(), "test.csv")
            .load()
            .unwrap();

        assert_eq!(records[0].employee_id, 77);
        assert_eq!(records[0].absence_type, "SICK");
        assert_eq!(records[0].days_used, CellValue::Value(dec("2")));
    }

    #[test]
    fn test_header_only_yields_no_records() {
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_file_fails() {
        match CsvAbsenceSource::open("/nonexistent/absences.csv") {
            Err(EngineError::SourceRead { source_name, .. }) => {
                assert!(source_name.contains("absences.csv"));
            }
            Err(other) => panic!("Expected SourceRead error, got {:?}", other),
            Ok(_) => panic!("Expected an error"),
        }
    }
}
