//! Record access
//!
//! The validator never inspects a record's concrete type. Records expose a
//! declared type name and read-only access to named fields; callers adapt
//! their own types by implementing `Record`.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::rules::parse_decimal;

/// A runtime field value as seen by the validator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, validated as-is (not trimmed) by string checks
    Text(String),
    /// Exact decimal
    Number(BigDecimal),
    /// Calendar date
    Date(NaiveDate),
    /// Boolean
    Bool(bool),
    /// Any other JSON shape (array, object, or a number with an extreme exponent)
    Other(Value),
}

impl FieldValue {
    /// Converts a JSON value; `null` is an absent value.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => Some(
                parse_decimal(&n.to_string())
                    .map(FieldValue::Number)
                    .unwrap_or_else(|| FieldValue::Other(value.clone())),
            ),
            other => Some(FieldValue::Other(other.clone())),
        }
    }

    /// Whether the value counts as empty for presence checks
    /// (whitespace-only text).
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    /// Short rendering used for `{value}` placeholders
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<BigDecimal> for FieldValue {
    fn from(value: BigDecimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// Failure to read a field the rule document expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    /// The record type has no such field
    #[error("record has no field '{0}'")]
    UnknownField(String),

    /// The field exists but its value could not be read
    #[error("field '{field}' could not be read: {reason}")]
    Unreadable { field: String, reason: String },
}

impl FieldAccessError {
    /// Message reported as the field's violation
    pub fn violation_message(&self) -> &'static str {
        match self {
            FieldAccessError::UnknownField(_) => "Field definition mismatch.",
            FieldAccessError::Unreadable { .. } => "Error accessing field value.",
        }
    }
}

/// A record that can be validated.
pub trait Record {
    /// Declared type name, used as the default rule-document key.
    fn type_name(&self) -> &str;

    /// Reads one field by (case-sensitive) name. `Ok(None)` is an absent value.
    fn field(&self, name: &str) -> Result<Option<FieldValue>, FieldAccessError>;
}

/// A record backed by a JSON object.
///
/// Keys missing from the object are absent values, not access failures, since
/// JSON payloads routinely omit optional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    type_name: String,
    fields: Map<String, Value>,
}

impl JsonRecord {
    /// Wraps a JSON object
    pub fn new(type_name: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Wraps any JSON value; non-objects are rejected.
    pub fn from_value(type_name: impl Into<String>, value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(type_name, fields)),
            _ => None,
        }
    }
}

impl Record for JsonRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field(&self, name: &str) -> Result<Option<FieldValue>, FieldAccessError> {
        Ok(self.fields.get(name).and_then(FieldValue::from_json))
    }
}
