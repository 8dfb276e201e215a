//! Teacher population filtering.
//!
//! The district export mixes every job category. Only teachers are analysed,
//! and the decision is made once per run so that every view sees exactly the
//! same population.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AbsenceRecord;

/// Substring rules that decide whether a job description is a teacher role.
///
/// A description matches when it contains at least one `include` substring
/// and none of the `exclude` substrings. Matching is case-insensitive.
///
/// # Example
///
/// ```
/// use absence_cover::calculation::TeacherFilter;
///
/// let filter = TeacherFilter::new(["Instruct"], ["Instructional Assistant"]);
///
/// assert!(filter.is_teacher(Some("Instructor - Grade 3")));
/// assert!(!filter.is_teacher(Some("Instructional Assistant")));
/// assert!(!filter.is_teacher(Some("Custodian")));
/// assert!(!filter.is_teacher(None));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherFilter {
    /// A teacher's description contains at least one of these.
    pub include: Vec<String>,
    /// A teacher's description contains none of these.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TeacherFilter {
    /// Creates a filter from include and exclude substrings.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the job description denotes a teacher.
    ///
    /// A missing description never matches.
    pub fn is_teacher(&self, job_description: Option<&str>) -> bool {
        let Some(description) = job_description else {
            return false;
        };
        let description = description.to_lowercase();

        let included = self
            .include
            .iter()
            .any(|needle| description.contains(&needle.to_lowercase()));
        let excluded = self
            .exclude
            .iter()
            .any(|needle| description.contains(&needle.to_lowercase()));

        included && !excluded
    }

    /// Returns the teacher records, preserving input order.
    pub fn select(&self, records: &[AbsenceRecord]) -> Vec<AbsenceRecord> {
        let teachers: Vec<AbsenceRecord> = records
            .iter()
            .filter(|r| self.is_teacher(r.job_description.as_deref()))
            .cloned()
            .collect();

        debug!(
            total_records = records.len(),
            teacher_records = teachers.len(),
            "Filtered teacher population"
        );

        teachers
    }
}
