use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single rejected field in a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// JSON name of the offending field (e.g. "moduleSize")
    pub field: String,

    /// Why the value was rejected
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Client-side request errors (should map to HTTP 422)
///
/// Carries every violation found, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// A single violation against the request body as a whole.
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new("body", message)])
    }

    /// Whether the given field has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while turning a validated request into a PNG
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    /// Content does not fit in the largest symbol at the fixed EC level
    #[error("Content too long: {length} bytes exceed the maximum symbol capacity")]
    DataTooLong { length: usize },

    /// Any other failure reported by the symbol builder
    #[error("Symbol construction failed: {0}")]
    Symbol(String),

    /// A color specification the rasterizer does not understand
    #[error("Invalid {field} color {value:?}: {reason}")]
    InvalidColor {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// PNG encoding failed
    #[error("Image encoding failed: {0}")]
    Image(String),

    /// The blocking encode task panicked or was cancelled
    #[error("Encoder task failed: {0}")]
    Task(String),
}

/// Errors from the persistent counter store
///
/// These never reach an HTTP client; they are logged and absorbed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not build the pool or check out a connection
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// SQLite rejected a statement (I/O failure, locked database, missing table)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking store task panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(String),
}
