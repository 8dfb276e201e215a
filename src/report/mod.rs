//! Dashboard report assembly.
//!
//! [`build_report`] turns a record set and an [`AnalysisConfig`](crate::config::AnalysisConfig)
//! into a [`DashboardReport`]: one serializable value holding every
//! dashboard view, with all figures derived from the records.
//!
//! # Example
//!
//! ```no_run
//! use absence_cover::config::ConfigLoader;
//! use absence_cover::report::build_report_from_source;
//! use absence_cover::source::CsvAbsenceSource;
//!
//! let config = ConfigLoader::load("./config/ballard")?.into_config();
//! let source = CsvAbsenceSource::open("absences.csv")?;
//! let report = build_report_from_source(source, &config)?;
//!
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! # Ok::<(), absence_cover::error::EngineError>(())
//! ```

mod builder;
mod views;

pub use builder::{build_report, build_report_from_source};
pub use views::{
    CoverageView, DashboardReport, ExecutiveSummary, Growth, HeatmapRow, HeatmapView,
    PopulationSummary, Savings, ThresholdCount, ThresholdCounts, TopTeachersView, TrendsView,
    YearCount,
};
