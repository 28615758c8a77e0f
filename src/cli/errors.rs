//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit status.

use std::fmt;
use std::io;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Missing or invalid setting
    ConfigError,
    /// Schema file could not be loaded
    SchemaError,
    /// Connection, migration or query failure
    DatabaseError,
    /// stdin/stdout failure or malformed JSON input
    IoError,
    /// HTTP server could not start or stopped with an error
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FORGE_CLI_CONFIG_ERROR",
            Self::SchemaError => "FORGE_CLI_SCHEMA_ERROR",
            Self::DatabaseError => "FORGE_CLI_DATABASE_ERROR",
            Self::IoError => "FORGE_CLI_IO_ERROR",
            Self::ServeFailed => "FORGE_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DatabaseError, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::database_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("DB_NAME is required");
        assert_eq!(err.to_string(), "FORGE_CLI_CONFIG_ERROR: DB_NAME is required");
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_conversions() {
        let err = CliError::from(SchemaError::malformed("expected value"));
        assert_eq!(err.code(), CliErrorCode::SchemaError);
        assert!(err.message().contains("expected value"));

        let err = CliError::from(StoreError::NotFound);
        assert_eq!(err.code(), CliErrorCode::DatabaseError);

        let err = CliError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(err.code_str(), "FORGE_CLI_IO_ERROR");
    }
}
