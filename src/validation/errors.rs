//! Validation outcomes
//!
//! Two caller-visible failure kinds, kept apart at the type level:
//! - `ValidationError::Config`: the rule set is broken (HTTP 500 class)
//! - `ValidationError::Failed`: the record violates its rules (HTTP 400 class)

use serde::Serialize;
use thiserror::Error;

use crate::rules::RuleError;

/// One reported constraint failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    field: String,
    message: String,
}

impl Violation {
    /// Create a violation
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field the violation applies to
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The complete, ordered list of violations found in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} violation(s)", .violations.len())]
pub struct ValidationFailed {
    violations: Vec<Violation>,
}

impl ValidationFailed {
    /// Wrap a violation list
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Violations in document field order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether there are no violations
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Result type for record validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Record validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Configuration error: {0}")]
    Config(#[from] RuleError),

    #[error("Validation failed with {0}")]
    Failed(#[from] ValidationFailed),
}

impl ValidationError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ValidationError::Config(e) => e.status_code(),
            ValidationError::Failed(_) => 400,
        }
    }

    /// Whether the rule set itself is broken
    pub fn is_config_defect(&self) -> bool {
        matches!(self, ValidationError::Config(_))
    }

    /// Whether this error names a missing rule document
    pub fn is_config_not_found(&self) -> bool {
        matches!(self, ValidationError::Config(RuleError::ConfigNotFound(_)))
    }

    /// The violations, if this is a validation failure
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            ValidationError::Failed(failed) => Some(failed.violations()),
            ValidationError::Config(_) => None,
        }
    }

    /// The configuration defect, if this is one
    pub fn config(&self) -> Option<&RuleError> {
        match self {
            ValidationError::Config(e) => Some(e),
            ValidationError::Failed(_) => None,
        }
    }
}
