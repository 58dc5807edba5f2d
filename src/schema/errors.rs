//! Schema error types.
//!
//! Error codes:
//! - SLAB_SCHEMA_INVALID: the schema document itself is unusable
//! - SLAB_VALIDATION_FAILED: a row does not conform to its table's schema

use std::fmt;

/// Schema-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema document malformed, or uses disallowed constructs.
    SlabSchemaInvalid,
    /// Row violates the schema.
    SlabValidationFailed,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SlabSchemaInvalid => "SLAB_SCHEMA_INVALID",
            SchemaErrorCode::SlabValidationFailed => "SLAB_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure context: which field, what was expected, what arrived.
#[derive(Debug, Clone)]
pub struct ValidationDetails {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn undeclared_field(field: impl Into<String>) -> Self {
        Self::new(field, "a declared column", "undeclared field")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "a non-null value", "null")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error with code and context.
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// The schema document is malformed or uses a disallowed construct.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SlabSchemaInvalid,
            message: message.into(),
            details: None,
        }
    }

    /// A row failed validation against its schema.
    pub fn validation_failed(details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::SlabValidationFailed,
            message: format!("row validation failed: {}", details),
            details: Some(details),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
