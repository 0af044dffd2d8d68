//! Error types for bso-scan

use std::time::Duration;
use thiserror::Error;

/// Result type alias for bso-scan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("Scan run cancelled")]
    Cancelled,
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl Error {
    /// Whether this error means the scan service is unusable from this process.
    ///
    /// Such errors abort the process when they happen during the initial run;
    /// everything else only aborts the run it happened in.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Api(ApiError::Connection(_)) | Error::Api(ApiError::AuthenticationFailed)
        )
    }
}

/// Scan management (GMP) errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to connect to the scan manager: {0}")]
    Connection(String),

    #[error("Authentication failed. Check the scan manager username and password.")]
    AuthenticationFailed,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Requested report is empty: {0}")]
    EmptyReport(String),

    #[error("Scan manager returned status {code}: {text}")]
    Status { code: u16, text: String },

    #[error("Invalid scan manager response: {0}")]
    InvalidResponse(String),

    #[error("Scan manager did not answer within {0:?}")]
    Timeout(Duration),
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Connection(err.to_string())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Wrong scan config identifier {0}. Choose between [0,4].")]
    InvalidScanConfig(i64),

    #[error("At least one host is required for the scan target")]
    MissingHosts,

    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Report delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid e-mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build e-mail: {0}")]
    Build(String),

    #[error("Failed to send e-mail: {0}")]
    Transport(String),
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Build(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}
