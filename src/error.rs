use std::path::PathBuf;
use thiserror::Error;

/// How an error is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A required file or table row is absent. Blocks the current render.
    MissingData,
    /// A selection produced no candidates. Shown as a warning.
    NoEligibleOptions,
    /// Malformed data, bad user input or bad configuration.
    Invalid,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(
        "Required data file not found: {}. Please run the data processing step first to generate the required files.",
        .0.display()
    )]
    MissingFile(PathBuf),

    #[error("{table} has no entry for '{key}'")]
    NotFound { table: &'static str, key: String },

    #[error("No {role} teams available for league '{league}'")]
    NoEligibleTeams { role: &'static str, league: String },

    #[error("'{team}' is not an eligible {role} team in league '{league}'")]
    TeamNotInLeague {
        role: &'static str,
        team: String,
        league: String,
    },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid data in {file}: {reason}")]
    InvalidData { file: String, reason: String },

    #[error("CSV error: {0}")]
    CsvError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::MissingFile(_) | AppError::NotFound { .. } => ErrorClass::MissingData,
            AppError::NoEligibleTeams { .. } => ErrorClass::NoEligibleOptions,
            _ => ErrorClass::Invalid,
        }
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(e: dialoguer::Error) -> Self {
        AppError::PromptError(e.to_string())
    }
}
