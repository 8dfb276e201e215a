//! Error types for the absence coverage engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine surfaces to its caller. Data quality problems
//! are never swallowed: a dropped absence record would silently change the
//! cost totals.

use thiserror::Error;

use crate::models::RecordId;

/// The main error type for the absence coverage engine.
///
/// # Example
///
/// ```
/// use absence_cover::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/coverage.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/coverage.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The absence table could not be read.
    #[error("Failed to read absence data from '{source_name}': {message}")]
    SourceRead {
        /// A description of the source (usually a file path).
        source_name: String,
        /// A description of the read failure.
        message: String,
    },

    /// A required column is absent from the absence table.
    #[error("Absence data is missing required column '{column}'")]
    MissingColumn {
        /// The header that was expected.
        column: String,
    },

    /// An absence record holds a missing or invalid value.
    #[error("Data quality error in {record}: {message}")]
    DataQuality {
        /// The record that failed validation.
        record: RecordId,
        /// A description of the problem.
        message: String,
    },

    /// A calculation was called with an argument outside its domain.
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// The name of the argument.
        argument: String,
        /// Why the argument was rejected.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_data_quality_names_the_record() {
        let error = EngineError::DataQuality {
            record: RecordId {
                row: 12,
                employee_id: 1043,
            },
            message: "'Used' value 'n/a' is not a number".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Data quality error in row 12 (employee 1043): 'Used' value 'n/a' is not a number"
        );
    }

    #[test]
    fn test_invalid_argument_displays_argument_and_message() {
        let error = EngineError::InvalidArgument {
            argument: "threshold".to_string(),
            message: "must not be negative, got -1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid argument 'threshold': must not be negative, got -1"
        );
    }

    #[test]
    fn test_missing_column_displays_column() {
        let error = EngineError::MissingColumn {
            column: "Emp #".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Absence data is missing required column 'Emp #'"
        );
    }

    #[test]
    fn test_invalid_config_displays_field() {
        let error = EngineError::InvalidConfig {
            field: "thresholds".to_string(),
            message: "at least one threshold is required".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value 'thresholds': at least one threshold is required"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_source_error() -> EngineResult<()> {
            Err(EngineError::SourceRead {
                source_name: "absences.csv".to_string(),
                message: "permission denied".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_source_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
