//! Configuration loading and management for the absence coverage engine.
//!
//! This module loads the analysis settings from YAML files: the replacement
//! cost rate, the deductible thresholds, the teacher population rules and
//! the report shaping options. None of these values are built into the
//! calculations.
//!
//! # Example
//!
//! ```no_run
//! use absence_cover::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ballard").unwrap();
//! println!("Loaded district: {}", config.config().district().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnalysisConfig, CoverageConfig, DistrictMetadata, PopulationConfig, ReportingConfig,
};
