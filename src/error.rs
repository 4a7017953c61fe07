//! Error types for the matterdex library
//!
//! Parsing never produces errors (bad lines are skipped), so the variants here
//! cover configuration loading, field conversion, and misuse of the query
//! primitives.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum MatterDexError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File exceeds the configured size limit
    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Schema is internally inconsistent
    #[error("Invalid schema: {reason}")]
    InvalidSchema { reason: String },

    /// Query errors (unknown operator, unknown direction, malformed clause)
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// A present value could not be coerced to the declared kind
    #[error("Type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: String, to: String },

    /// Fan-out grouping requested on a field that is not declared as a list
    #[error("Field '{field}' is declared as {kind}, not a list")]
    NotAListField { field: String, kind: String },

    /// The schema does not assign the requested core role
    #[error("Schema has no {role} field")]
    MissingRole { role: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatterDexError>;

impl MatterDexError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new invalid schema error
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            reason: reason.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    /// Create a new type conversion error
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new not-a-list error
    pub fn not_a_list_field(field: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::NotAListField {
            field: field.into(),
            kind: kind.into(),
        }
    }

    /// Create a new missing role error
    pub fn missing_role(role: impl Into<String>) -> Self {
        Self::MissingRole { role: role.into() }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors concern a single document or value; a batch read
    /// can log them and carry on with the next document.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::FileNotFound { .. } => false,
            Self::FileTooLarge { .. } | Self::TypeConversion { .. } => true,
            Self::Yaml(_)
            | Self::Json(_)
            | Self::InvalidSchema { .. }
            | Self::InvalidQuery { .. }
            | Self::NotAListField { .. }
            | Self::MissingRole { .. } => false,
        }
    }
}
