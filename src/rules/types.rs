//! Rule type definitions
//!
//! A rule document maps field names to rule nodes. A rule node is a loose bag
//! of JSON properties (`required`, `type`, `minLength`, `errorMessage*`, ...)
//! that may point into the shared definitions through `$ref`.
//!
//! Supported field types:
//! - string: length, pattern and allowed-value checks
//! - number: exact decimal bounds
//! - date: `YYYY-MM-DD` with calendar rules

use bigdecimal::BigDecimal;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

use super::errors::{RuleError, RuleResult};

/// Property holding a pointer into the definitions collection.
pub const REF_KEY: &str = "$ref";

/// Prefix of every definitions pointer.
pub const DEFINITIONS_POINTER: &str = "#/definitions/";

/// Declared field type of a rule node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleType {
    /// UTF-8 text
    String,
    /// Exact decimal number
    Number,
    /// Calendar date
    Date,
    /// Anything else; no type-specific checks apply
    Unsupported(String),
}

impl RuleType {
    /// Parses a `type` property value, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "string" => RuleType::String,
            "number" => RuleType::Number,
            "date" => RuleType::Date,
            _ => RuleType::Unsupported(raw.to_string()),
        }
    }

    /// Returns the type name for log lines
    pub fn type_name(&self) -> &str {
        match self {
            RuleType::String => "string",
            RuleType::Number => "number",
            RuleType::Date => "date",
            RuleType::Unsupported(raw) => raw,
        }
    }
}

/// One field's set of constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleNode {
    properties: Map<String, Value>,
}

impl RuleNode {
    /// Create an empty rule node
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed JSON object
    pub fn from_map(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    /// Build a rule node from a JSON value, rejecting anything but an object.
    pub fn from_value(field: &str, value: Value) -> RuleResult<Self> {
        match value {
            Value::Object(properties) => Ok(Self::from_map(properties)),
            other => Err(RuleError::invalid_rule(
                field,
                "<node>",
                format!("expected an object, got {}", json_type_name(&other)),
            )),
        }
    }

    /// Returns the raw property value
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    /// Whether the property is declared
    pub fn has(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Sets a property, replacing any existing value
    pub fn insert(&mut self, property: impl Into<String>, value: Value) {
        self.properties.insert(property.into(), value);
    }

    /// Iterates properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }

    /// The `$ref` pointer, if this node has one.
    ///
    /// Non-string pointers are rendered as their JSON text so they surface as
    /// an unknown definition rather than being silently ignored.
    pub fn reference(&self) -> Option<String> {
        self.properties.get(REF_KEY).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Whether the field must be present and non-blank
    pub fn is_required(&self) -> bool {
        match self.properties.get("required") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Declared type, defaulting to string
    pub fn rule_type(&self) -> RuleType {
        match self.properties.get("type") {
            Some(Value::String(raw)) => RuleType::parse(raw),
            Some(other) => RuleType::Unsupported(other.to_string()),
            None => RuleType::String,
        }
    }

    /// A string-valued property
    pub fn text(&self, property: &str) -> Option<&str> {
        self.properties.get(property).and_then(Value::as_str)
    }

    /// A non-negative integer constraint such as `minLength`.
    ///
    /// Accepts a JSON integer or an integer in text form.
    pub fn length(&self, field: &str, property: &str) -> RuleResult<Option<usize>> {
        let value = match self.properties.get(property) {
            Some(value) => value,
            None => return Ok(None),
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                RuleError::invalid_rule(field, property, format!("not a length: {}", value))
            })
    }

    /// A decimal constraint such as `minValue`, as a JSON number or numeric text.
    pub fn decimal(&self, field: &str, property: &str) -> RuleResult<Option<BigDecimal>> {
        let value = match self.properties.get(property) {
            Some(value) => value,
            None => return Ok(None),
        };
        let parsed = match value {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            RuleError::invalid_rule(field, property, format!("not a decimal: {}", value))
        })
    }

    /// The `pattern` constraint compiled for whole-string matching.
    pub fn pattern(&self, field: &str) -> RuleResult<Option<Regex>> {
        let pattern = match self.properties.get("pattern") {
            Some(Value::String(pattern)) => pattern,
            Some(other) => {
                return Err(RuleError::invalid_rule(
                    field,
                    "pattern",
                    format!("expected a string, got {}", json_type_name(other)),
                ))
            }
            None => return Ok(None),
        };
        Regex::new(&format!("^(?:{})$", pattern))
            .map(Some)
            .map_err(|e| RuleError::InvalidPattern {
                field: field.to_string(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            })
    }

    /// The `allowedValues` constraint, in declaration order.
    ///
    /// Non-string entries are compared by their JSON text.
    pub fn allowed_values(&self, field: &str) -> RuleResult<Option<Vec<String>>> {
        match self.properties.get("allowedValues") {
            Some(Value::Array(items)) => Ok(Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            Some(other) => Err(RuleError::invalid_rule(
                field,
                "allowedValues",
                format!("expected an array, got {}", json_type_name(other)),
            )),
            None => Ok(None),
        }
    }

    /// Checks that every declared constraint value is usable.
    pub fn check_constraints(&self, field: &str) -> RuleResult<()> {
        self.length(field, "minLength")?;
        self.length(field, "maxLength")?;
        self.pattern(field)?;
        self.allowed_values(field)?;
        self.decimal(field, "minValue")?;
        self.decimal(field, "maxValue")?;
        Ok(())
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the node declares no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Per-record-type rules: field name to rule node, in document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct RuleDocument {
    fields: Vec<(String, RuleNode)>,
}

impl RuleDocument {
    /// Create a document from ordered `(field, node)` pairs
    pub fn new(fields: Vec<(String, RuleNode)>) -> Self {
        Self { fields }
    }

    /// Build a document from a JSON object of objects
    pub fn from_value(value: Value) -> RuleResult<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(RuleError::invalid_rule(
                    "<document>",
                    "<root>",
                    format!("expected an object, got {}", json_type_name(&other)),
                ))
            }
        };

        let mut fields = Vec::with_capacity(object.len());
        for (name, node) in object {
            let node = RuleNode::from_value(&name, node)?;
            fields.push((name, node));
        }
        Ok(Self { fields })
    }

    /// Iterates `(field, node)` pairs in document order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &RuleNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Looks up one field's raw node
    pub fn get(&self, field: &str) -> Option<&RuleNode> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, node)| node)
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Value> for RuleDocument {
    type Error = RuleError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Shared library of reusable base rule nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    entries: HashMap<String, RuleNode>,
}

impl Definitions {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the full definitions file content (`{"definitions": {...}}`).
    ///
    /// A file without a `definitions` object yields an empty collection.
    pub fn from_root(root: Value) -> RuleResult<Self> {
        match root {
            Value::Object(mut object) => match object.remove("definitions") {
                Some(inner) => Self::from_value(inner),
                None => Ok(Self::new()),
            },
            other => Err(RuleError::invalid_rule(
                "<definitions>",
                "<root>",
                format!("expected an object, got {}", json_type_name(&other)),
            )),
        }
    }

    /// Build from the inner `definitions` object
    pub fn from_value(value: Value) -> RuleResult<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(RuleError::invalid_rule(
                    "<definitions>",
                    "definitions",
                    format!("expected an object, got {}", json_type_name(&other)),
                ))
            }
        };

        let mut entries = HashMap::with_capacity(object.len());
        for (key, node) in object {
            let node = RuleNode::from_value(&key, node)?;
            entries.insert(key, node);
        }
        Ok(Self { entries })
    }

    /// Adds or replaces a definition
    pub fn insert(&mut self, key: impl Into<String>, node: RuleNode) {
        self.entries.insert(key.into(), node);
    }

    /// Looks up a base definition
    pub fn get(&self, key: &str) -> Option<&RuleNode> {
        self.entries.get(key)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Largest number of decimal places (or, for negative scales, trailing zeros)
/// accepted in numeric text.
const MAX_DECIMAL_SCALE: i64 = 4096;

/// Parses an exact decimal from text, accepting plain and scientific forms.
///
/// Precision is unbounded; nothing is rounded. Text whose scale exceeds
/// `MAX_DECIMAL_SCALE` in either direction is rejected.
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);

    let numeric = text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if !numeric {
        return None;
    }

    let value = BigDecimal::from_str(text).ok()?;
    let (_, scale) = value.as_bigint_and_exponent();
    (scale.abs() <= MAX_DECIMAL_SCALE).then_some(value)
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_type_defaults_to_string() {
        let node = RuleNode::new();
        assert_eq!(node.rule_type(), RuleType::String);
    }

    #[test]
    fn test_rule_type_case_insensitive() {
        let node = RuleNode::from_value("f", json!({"type": "NUMBER"})).unwrap();
        assert_eq!(node.rule_type(), RuleType::Number);

        let node = RuleNode::from_value("f", json!({"type": "Date"})).unwrap();
        assert_eq!(node.rule_type(), RuleType::Date);
    }

    #[test]
    fn test_unsupported_type_keeps_raw_name() {
        let node = RuleNode::from_value("f", json!({"type": "uuid"})).unwrap();
        assert_eq!(node.rule_type(), RuleType::Unsupported("uuid".into()));
        assert_eq!(node.rule_type().type_name(), "uuid");
    }

    #[test]
    fn test_required_flag() {
        let node = RuleNode::from_value("f", json!({"required": true})).unwrap();
        assert!(node.is_required());

        let node = RuleNode::from_value("f", json!({"required": "true"})).unwrap();
        assert!(node.is_required());

        let node = RuleNode::from_value("f", json!({})).unwrap();
        assert!(!node.is_required());
    }

    #[test]
    fn test_node_must_be_object() {
        let result = RuleNode::from_value("amount", json!(["not", "a", "node"]));
        assert!(matches!(result, Err(RuleError::InvalidRule { .. })));
    }

    #[test]
    fn test_document_preserves_order() {
        let doc = RuleDocument::from_value(json!({
            "zeta": {"required": true},
            "alpha": {"required": false},
            "mid": {"type": "number"}
        }))
        .unwrap();

        let names: Vec<&str> = doc.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(doc.len(), 3);
        assert!(doc.get("mid").is_some());
    }

    #[test]
    fn test_document_deserializes_through_try_from() {
        let doc: RuleDocument =
            serde_json::from_str(r#"{"memo": {"maxLength": 140}}"#).unwrap();
        assert_eq!(doc.len(), 1);

        let bad: Result<RuleDocument, _> = serde_json::from_str(r#"{"memo": 5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_definitions_from_root() {
        let defs = Definitions::from_root(json!({
            "definitions": {
                "currencyCode": {"pattern": "^[A-Z]{3}$"}
            }
        }))
        .unwrap();
        assert_eq!(defs.len(), 1);
        assert!(defs.get("currencyCode").is_some());
    }

    #[test]
    fn test_definitions_root_without_definitions_is_empty() {
        let defs = Definitions::from_root(json!({"other": {}})).unwrap();
        assert!(defs.is_empty());
    }

    #[test]
    fn test_length_accessor() {
        let node = RuleNode::from_value("f", json!({"minLength": 3, "maxLength": "9"})).unwrap();
        assert_eq!(node.length("f", "minLength").unwrap(), Some(3));
        assert_eq!(node.length("f", "maxLength").unwrap(), Some(9));
        assert_eq!(node.length("f", "other").unwrap(), None);

        let node = RuleNode::from_value("f", json!({"minLength": -1})).unwrap();
        assert!(node.length("f", "minLength").is_err());
    }

    #[test]
    fn test_decimal_accessor_is_exact() {
        let node =
            RuleNode::from_value("f", json!({"minValue": 0, "maxValue": "1000000.01"})).unwrap();
        assert_eq!(node.decimal("f", "minValue").unwrap(), Some(BigDecimal::from(0)));
        assert_eq!(
            node.decimal("f", "maxValue").unwrap(),
            Some(BigDecimal::from_str("1000000.01").unwrap())
        );

        let node = RuleNode::from_value("f", json!({"minValue": "lots"})).unwrap();
        assert!(node.decimal("f", "minValue").is_err());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let node = RuleNode::from_value("f", json!({"pattern": "[0-9]{3}"})).unwrap();
        let regex = node.pattern("f").unwrap().unwrap();
        assert!(regex.is_match("123"));
        assert!(!regex.is_match("a123b"));
        assert!(!regex.is_match("1234"));
    }

    #[test]
    fn test_alternation_pattern_matches_whole_string() {
        let node = RuleNode::from_value("f", json!({"pattern": "USD|EUR"})).unwrap();
        let regex = node.pattern("f").unwrap().unwrap();
        assert!(regex.is_match("EUR"));
        assert!(!regex.is_match("USDX"));
    }

    #[test]
    fn test_allowed_values_accessor() {
        let node =
            RuleNode::from_value("f", json!({"allowedValues": ["USD", "EUR"]})).unwrap();
        assert_eq!(
            node.allowed_values("f").unwrap(),
            Some(vec!["USD".to_string(), "EUR".to_string()])
        );

        let node = RuleNode::from_value("f", json!({"allowedValues": "USD"})).unwrap();
        assert!(node.allowed_values("f").is_err());
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_decimal(" 1500.75 "), BigDecimal::from_str("1500.75").ok());
        assert_eq!(parse_decimal("+5"), Some(BigDecimal::from(5)));
        assert_eq!(parse_decimal("1e3"), Some(BigDecimal::from(1000)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("1_000"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn test_parse_decimal_keeps_every_digit() {
        let long = parse_decimal("0.30000000000000000000000000000001").unwrap();
        assert!(long > BigDecimal::from_str("0.3").unwrap());

        let wide = parse_decimal("123456789012345678901234567890").unwrap();
        assert!(wide > BigDecimal::from(100));
    }

    #[test]
    fn test_parse_decimal_scale_cap() {
        assert!(parse_decimal("1e4096").is_some());
        assert_eq!(parse_decimal("1e4097"), None);
        assert_eq!(parse_decimal("1e-5000"), None);
    }

    #[test]
    fn test_reference_text() {
        let node =
            RuleNode::from_value("f", json!({"$ref": "#/definitions/name"})).unwrap();
        assert_eq!(node.reference().as_deref(), Some("#/definitions/name"));

        let node = RuleNode::from_value("f", json!({"$ref": 7})).unwrap();
        assert_eq!(node.reference().as_deref(), Some("7"));
    }
}
