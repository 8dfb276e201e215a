//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading analysis
//! configurations from YAML files.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AnalysisConfig, CoverageConfig, DistrictMetadata, PopulationConfig, ReportingConfig,
};

/// Loads and provides access to analysis configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/ballard/
/// ├── district.yaml    # District metadata
/// ├── coverage.yaml    # Replacement cost rate and thresholds
/// ├── population.yaml  # Teacher filter rules and risk bands
/// └── reporting.yaml   # Top-N size, tracked school years, concentration
/// ```
///
/// # Example
///
/// ```no_run
/// use absence_cover::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ballard")?;
/// println!("Rate per day: ${}", loader.config().replacement_cost_rate());
/// # Ok::<(), absence_cover::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AnalysisConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let district = Self::load_yaml::<DistrictMetadata>(&path.join("district.yaml"))?;
        let coverage = Self::load_yaml::<CoverageConfig>(&path.join("coverage.yaml"))?;
        let population = Self::load_yaml::<PopulationConfig>(&path.join("population.yaml"))?;
        let reporting = Self::load_yaml::<ReportingConfig>(&path.join("reporting.yaml"))?;

        let config = AnalysisConfig::new(district, coverage, population, reporting)?;

        info!(
            path = %path.display(),
            district = %config.district().name,
            rate = %config.replacement_cost_rate(),
            thresholds = config.thresholds().len(),
            "Loaded analysis configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying analysis configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> AnalysisConfig {
        self.config
    }
}
