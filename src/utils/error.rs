use std::fmt;
use thiserror::Error;

/// 輸入文件中出錯的位置 (job 索引，以及可選的 stop 索引)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobLocation {
    pub job: usize,
    pub stop: Option<usize>,
}

impl JobLocation {
    pub fn job(job: usize) -> Self {
        Self { job, stop: None }
    }

    pub fn stop(job: usize, stop: usize) -> Self {
        Self {
            job,
            stop: Some(stop),
        }
    }
}

impl fmt::Display for JobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stop {
            Some(stop) => write!(f, "job #{} stop #{}", self.job, stop),
            None => write!(f, "job #{}", self.job),
        }
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("{location} is missing required field '{field}'")]
    MissingField { location: JobLocation, field: String },

    #[error("{location} has invalid '{field}' date: {value}")]
    InvalidDate {
        location: JobLocation,
        field: String,
        value: String,
    },

    #[error("{location} has invalid '{field}': {reason}")]
    InvalidField {
        location: JobLocation,
        field: String,
        reason: String,
    },

    #[error("Invalid input document: {message}")]
    InvalidInput { message: String },

    #[error("Failed to fetch route {route}: {message}")]
    Retrieval { route: String, message: String },

    #[error("Failed to normalize response for {route}: {message}")]
    Normalization { route: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Retrieval,
    Normalization,
    Output,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingField { .. }
            | EtlError::InvalidDate { .. }
            | EtlError::InvalidField { .. }
            | EtlError::InvalidInput { .. } => ErrorCategory::Input,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::Retrieval { .. } => ErrorCategory::Retrieval,
            EtlError::Normalization { .. } => ErrorCategory::Normalization,
            EtlError::IoError(_) | EtlError::SerializationError(_) | EtlError::CsvError(_) => {
                ErrorCategory::Output
            }
        }
    }

    /// 單一路線或單一回應的錯誤只會被記錄並略過，不會中止整個流程
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Retrieval | ErrorCategory::Normalization
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input rejected: {}", self),
            ErrorCategory::Configuration => format!("Settings rejected: {}", self),
            ErrorCategory::Retrieval | ErrorCategory::Normalization => self.to_string(),
            ErrorCategory::Output => format!("Could not read or write data: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MissingField { .. } => {
                "Every job and stop needs 'origin', 'target' and 'depart'"
            }
            EtlError::InvalidDate { .. } => "Dates must be calendar dates in YYYY-MM-DD form",
            EtlError::InvalidField { .. } | EtlError::InvalidInput { .. } => {
                "The input must be a JSON list of route job objects"
            }
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Check the settings file path and its JSON/TOML syntax"
            }
            EtlError::Retrieval { .. } | EtlError::Normalization { .. } => {
                "The route was skipped; re-run to retry it"
            }
            EtlError::IoError(_) => "Check that the path exists and is readable/writable",
            EtlError::SerializationError(_) | EtlError::CsvError(_) => {
                "Check the document format"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
