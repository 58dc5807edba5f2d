//! Schema type definitions.
//!
//! A table schema is a flat property map, name to type. Supported types:
//! boolean, integer, number (64-bit float), string. Arrays, objects, and
//! `$ref` references are rejected at parse time. Exactly one property must
//! be named `id`, typed string or integer.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    Integer,
    Number,
    String,
}

impl ColumnType {
    /// Name used in schema documents and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Number => "number",
            ColumnType::String => "string",
        }
    }

    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(ColumnType::Boolean),
            "integer" => Some(ColumnType::Integer),
            "number" => Some(ColumnType::Number),
            "string" => Some(ColumnType::String),
            _ => None,
        }
    }
}

/// Raw property entry as it appears in a schema document.
#[derive(Debug, Deserialize)]
struct PropertyDoc {
    #[serde(rename = "type")]
    type_name: Option<String>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
}

/// Raw schema document shape: `{"properties": {"<col>": {"type": "<t>"}}}`.
#[derive(Debug, Deserialize)]
struct SchemaDoc {
    properties: BTreeMap<String, PropertyDoc>,
}

/// A parsed, validated table schema. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: BTreeMap<String, ColumnType>,
    document: Value,
}

impl Schema {
    /// Parse and check a schema document.
    pub fn parse(document: &Value) -> SchemaResult<Self> {
        let doc: SchemaDoc = serde_json::from_value(document.clone())
            .map_err(|e| SchemaError::invalid_schema(format!("malformed schema document: {}", e)))?;

        if doc.properties.is_empty() {
            return Err(SchemaError::invalid_schema("schema declares no properties"));
        }

        let mut columns = BTreeMap::new();
        for (name, prop) in &doc.properties {
            if prop.reference.is_some() {
                return Err(SchemaError::invalid_schema(format!(
                    "column '{}' uses a $ref; references are not supported",
                    name
                )));
            }
            let type_name = prop.type_name.as_deref().ok_or_else(|| {
                SchemaError::invalid_schema(format!("column '{}' has no type", name))
            })?;
            if type_name == "array" || type_name == "object" {
                return Err(SchemaError::invalid_schema(format!(
                    "column '{}' is typed '{}'; nested types are not supported",
                    name, type_name
                )));
            }
            let column_type = ColumnType::from_type_name(type_name).ok_or_else(|| {
                SchemaError::invalid_schema(format!(
                    "column '{}' has unknown type '{}'",
                    name, type_name
                ))
            })?;
            columns.insert(name.clone(), column_type);
        }

        match columns.get("id") {
            None => {
                return Err(SchemaError::invalid_schema(
                    "schema must declare an 'id' column",
                ))
            }
            Some(ColumnType::String) | Some(ColumnType::Integer) => {}
            Some(other) => {
                return Err(SchemaError::invalid_schema(format!(
                    "'id' column must be string or integer, not {}",
                    other.type_name()
                )))
            }
        }

        Ok(Self {
            columns,
            document: document.clone(),
        })
    }

    /// Parse a schema from its JSON text.
    pub fn parse_str(text: &str) -> SchemaResult<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| SchemaError::invalid_schema(format!("schema is not valid JSON: {}", e)))?;
        Self::parse(&document)
    }

    /// The original schema document, as written to `schema.json`.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Declared type of the `id` column.
    pub fn id_type(&self) -> ColumnType {
        // Presence and typing checked in parse().
        self.columns["id"]
    }

    /// Declared type of a column, if it exists.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    /// All declared column names, in sorted order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Iterate over all columns and their types, in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = (&String, &ColumnType)> {
        self.columns.iter()
    }
}

/// Canonical index rendering of an id value: strings as-is, integers in
/// decimal. Other value kinds cannot be ids.
pub fn id_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_u64().map(|u| u.to_string())
            }
        }
        _ => None,
    }
}
