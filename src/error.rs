//! Error types for the gridcalc command line

use thiserror::Error;

/// Problems with the command line itself
#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for {flag}: {message}")]
    InvalidValue { flag: String, message: String },

    #[error("Expected CELL=CONTENT, got: {0}")]
    InvalidAssignment(String),
}
