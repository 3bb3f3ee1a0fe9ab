//! Rule configuration errors
//!
//! Every variant is a configuration defect: the rule set itself is broken or
//! incomplete. None of them describe bad input data, and callers map them to
//! an internal-error response rather than a field-level rejection.
//!
//! Error codes:
//! - RULES_CONFIG_NOT_FOUND
//! - RULES_DEFINITION_NOT_FOUND
//! - RULES_REFERENCE_CYCLE
//! - RULES_INVALID_PATTERN
//! - RULES_INVALID_RULE
//! - RULES_MALFORMED

use thiserror::Error;

/// Result type for rule operations
pub type RuleResult<T> = Result<T, RuleError>;

/// Rule configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Validation configuration not found for key: {0}")]
    ConfigNotFound(String),

    #[error("Validation definition not found for $ref: {0}")]
    DefinitionNotFound(String),

    #[error("Circular $ref chain: {}", .0.join(" -> "))]
    ReferenceCycle(Vec<String>),

    #[error("Invalid pattern '{pattern}' on field '{field}': {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid rule '{property}' on field '{field}': {reason}")]
    InvalidRule {
        field: String,
        property: String,
        reason: String,
    },

    #[error("Malformed rule file '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl RuleError {
    /// Create a malformed rule file error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        RuleError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid rule property error
    pub fn invalid_rule(
        field: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RuleError::InvalidRule {
            field: field.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::ConfigNotFound(_) => "RULES_CONFIG_NOT_FOUND",
            RuleError::DefinitionNotFound(_) => "RULES_DEFINITION_NOT_FOUND",
            RuleError::ReferenceCycle(_) => "RULES_REFERENCE_CYCLE",
            RuleError::InvalidPattern { .. } => "RULES_INVALID_PATTERN",
            RuleError::InvalidRule { .. } => "RULES_INVALID_RULE",
            RuleError::Malformed { .. } => "RULES_MALFORMED",
        }
    }

    /// HTTP status class for this error. Always a server-side defect.
    pub fn status_code(&self) -> u16 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            RuleError::ConfigNotFound("x".into()).code(),
            "RULES_CONFIG_NOT_FOUND"
        );
        assert_eq!(
            RuleError::DefinitionNotFound("#/definitions/x".into()).code(),
            "RULES_DEFINITION_NOT_FOUND"
        );
        assert_eq!(
            RuleError::malformed("a.json", "bad").code(),
            "RULES_MALFORMED"
        );
    }

    #[test]
    fn test_cycle_display() {
        let err = RuleError::ReferenceCycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "Circular $ref chain: a -> b -> a");
    }

    #[test]
    fn test_all_errors_are_server_side() {
        assert_eq!(RuleError::ConfigNotFound("x".into()).status_code(), 500);
        assert_eq!(
            RuleError::invalid_rule("amount", "minValue", "not a number").status_code(),
            500
        );
    }
}
