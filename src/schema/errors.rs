//! Schema error types
//!
//! Error codes:
//! - FORGE_SCHEMA_UNREADABLE (FATAL)
//! - FORGE_SCHEMA_MALFORMED (FATAL)
//! - FORGE_UNKNOWN_FIELD_TYPE (FATAL)
//! - FORGE_UNKNOWN_VALIDATION (FATAL)
//! - FORGE_INVALID_REGEX (FATAL)
//! - FORGE_DUPLICATE_FIELD (FATAL)
//! - FORGE_MULTIPLE_PRIMARY_KEYS (FATAL)
//! - FORGE_MISSING_PRIMARY_KEY (REJECT)
//! - FORGE_INVALID_KEY (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The current operation is rejected, the process keeps serving
    Reject,
    /// The schema cannot be used, startup must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema file could not be read
    SchemaUnreadable,
    /// Schema document is not valid JSON or has the wrong shape
    SchemaMalformed,
    /// Field declares a type outside the supported set
    UnknownFieldType,
    /// Field declares a validation kind outside the supported set
    UnknownValidationKind,
    /// A regex rule does not compile
    InvalidRegex,
    /// Two fields share a name
    DuplicateField,
    /// More than one field is flagged as primary key
    MultiplePrimaryKeys,
    /// Operation needs a primary key but the schema has none
    MissingPrimaryKey,
    /// A key value cannot be converted to the primary key type
    InvalidKey,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaUnreadable => "FORGE_SCHEMA_UNREADABLE",
            SchemaErrorCode::SchemaMalformed => "FORGE_SCHEMA_MALFORMED",
            SchemaErrorCode::UnknownFieldType => "FORGE_UNKNOWN_FIELD_TYPE",
            SchemaErrorCode::UnknownValidationKind => "FORGE_UNKNOWN_VALIDATION",
            SchemaErrorCode::InvalidRegex => "FORGE_INVALID_REGEX",
            SchemaErrorCode::DuplicateField => "FORGE_DUPLICATE_FIELD",
            SchemaErrorCode::MultiplePrimaryKeys => "FORGE_MULTIPLE_PRIMARY_KEYS",
            SchemaErrorCode::MissingPrimaryKey => "FORGE_MISSING_PRIMARY_KEY",
            SchemaErrorCode::InvalidKey => "FORGE_INVALID_KEY",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::MissingPrimaryKey | SchemaErrorCode::InvalidKey => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Offending field if applicable
    field: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: impl Into<String>, field: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field,
        }
    }

    /// Create an error for a schema file that cannot be read
    pub fn unreadable(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::SchemaUnreadable,
            format!("Failed to read schema file '{}': {}", path.into(), reason),
            None,
        )
    }

    /// Create an error for a malformed schema document
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorCode::SchemaMalformed, reason, None)
    }

    /// Create an unknown field type error
    pub fn unknown_field_type(field: impl Into<String>, type_name: &str) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::UnknownFieldType,
            format!("Field '{}' has unsupported type '{}'", field, type_name),
            Some(field),
        )
    }

    /// Create an unknown validation kind error
    pub fn unknown_validation_kind(field: impl Into<String>, kind: &str) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::UnknownValidationKind,
            format!("Field '{}' has unsupported validation type '{}'", field, kind),
            Some(field),
        )
    }

    /// Create an invalid regex error
    pub fn invalid_regex(field: impl Into<String>, pattern: &str, reason: impl fmt::Display) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::InvalidRegex,
            format!("Field '{}' has invalid pattern '{}': {}", field, pattern, reason),
            Some(field),
        )
    }

    /// Create a duplicate field error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::DuplicateField,
            format!("Field '{}' is declared more than once", field),
            Some(field),
        )
    }

    /// Create a multiple primary keys error
    pub fn multiple_primary_keys(first: &str, second: &str) -> Self {
        Self::new(
            SchemaErrorCode::MultiplePrimaryKeys,
            format!(
                "Fields '{}' and '{}' are both marked as primary key",
                first, second
            ),
            Some(second.to_string()),
        )
    }

    /// Create a missing primary key error
    pub fn missing_primary_key(table: &str) -> Self {
        Self::new(
            SchemaErrorCode::MissingPrimaryKey,
            format!("No primary key defined for table '{}'", table),
            None,
        )
    }

    /// Create an invalid key error
    pub fn invalid_key(field: impl Into<String>, raw: &str) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::InvalidKey,
            format!("Value '{}' is not a valid key for '{}'", raw, field),
            Some(field),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this error must abort startup
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
