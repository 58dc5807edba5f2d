//! Row validation against a parsed schema.
//!
//! Rules:
//! - The row must be a JSON object.
//! - Every present field must be a declared column.
//! - Null values are rejected.
//! - Types must match exactly; no coercion ("1" never satisfies integer).
//! - Absent fields are permitted: a missing `id` is auto-assigned by the
//!   table, and other absent columns are simply left unindexed.

use serde_json::Value;

use super::errors::{SchemaResult, SchemaError, ValidationDetails};
use super::types::{ColumnType, Schema};

impl Schema {
    /// Validate a candidate row against this schema.
    pub fn validate_document(&self, row: &Value) -> SchemaResult<()> {
        let obj = row.as_object().ok_or_else(|| {
            SchemaError::validation_failed(ValidationDetails::type_mismatch(
                "$root",
                "object",
                json_type_name(row),
            ))
        })?;

        for (field, value) in obj {
            let column_type = self.column_type(field).ok_or_else(|| {
                SchemaError::validation_failed(ValidationDetails::undeclared_field(field))
            })?;

            if value.is_null() {
                return Err(SchemaError::validation_failed(ValidationDetails::null_value(
                    field,
                )));
            }

            let matches = match column_type {
                ColumnType::Boolean => value.is_boolean(),
                ColumnType::Integer => value.is_i64() || value.is_u64(),
                ColumnType::Number => value.is_number(),
                ColumnType::String => value.is_string(),
            };

            if !matches {
                return Err(SchemaError::validation_failed(ValidationDetails::type_mismatch(
                    field,
                    column_type.type_name(),
                    json_type_name(value),
                )));
            }
        }

        Ok(())
    }
}

/// JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::parse(&json!({
            "properties": {
                "id": {"type": "string"},
                "name": {"type": "string"},
                "age": {"type": "integer"},
                "score": {"type": "number"},
                "active": {"type": "boolean"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_row_passes() {
        let row = json!({
            "id": "u1",
            "name": "Alice",
            "age": 30,
            "score": 9.5,
            "active": true
        });
        assert!(schema().validate_document(&row).is_ok());
    }

    #[test]
    fn test_partial_row_passes() {
        // Absent columns are allowed; id may be auto-assigned later.
        let row = json!({"name": "Bob"});
        assert!(schema().validate_document(&row).is_ok());
    }

    #[test]
    fn test_non_object_rejected() {
        let result = schema().validate_document(&json!([1, 2, 3]));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().details().unwrap().field, "$root");
    }

    #[test]
    fn test_undeclared_field_rejected() {
        let result = schema().validate_document(&json!({"name": "Alice", "ghost": 1}));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().details().unwrap().field, "ghost");
    }

    #[test]
    fn test_null_rejected() {
        let result = schema().validate_document(&json!({"name": null}));
        assert!(result.is_err());
        assert!(result.unwrap_err().details().unwrap().actual.contains("null"));
    }

    #[test]
    fn test_no_type_coercion() {
        // String "30" is not an integer.
        let result = schema().validate_document(&json!({"age": "30"}));
        assert!(result.is_err());
        let err = result.unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.expected, "integer");
        assert_eq!(details.actual, "string");
    }

    #[test]
    fn test_float_rejected_for_integer_column() {
        let result = schema().validate_document(&json!({"age": 30.5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_integer_accepted_for_number_column() {
        // A JSON integer is still a number.
        assert!(schema().validate_document(&json!({"score": 10})).is_ok());
    }

    #[test]
    fn test_validation_deterministic() {
        let row = json!({"age": "bad"});
        let s = schema();
        for _ in 0..50 {
            assert!(s.validate_document(&row).is_err());
        }
    }
}
