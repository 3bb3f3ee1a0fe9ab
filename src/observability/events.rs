//! Observable events
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events during rule loading and record validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Rule loading
    /// Shared definitions loaded
    DefinitionsLoaded,
    /// Shared definitions file absent; continuing with none
    DefinitionsMissing,
    /// One record-type rule document loaded
    RuleDocumentLoaded,
    /// No record-type rule documents found
    NoRuleDocuments,
    /// Every reference and pattern checked
    RulesChecked,

    // Validation
    /// Rule document names a field the record does not have
    FieldNotOnRecord,
    /// Record field exists but could not be read
    FieldAccessFailed,
    /// Rule node declares a type with no checks
    UnsupportedRuleType,
    /// Record satisfied every rule
    ValidationPassed,
    /// Record violated one or more rules
    ValidationFailed,
    /// Rule set is broken (missing document, definition, bad pattern)
    ConfigDefect,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::DefinitionsLoaded => "DEFINITIONS_LOADED",
            Event::DefinitionsMissing => "DEFINITIONS_MISSING",
            Event::RuleDocumentLoaded => "RULE_DOCUMENT_LOADED",
            Event::NoRuleDocuments => "NO_RULE_DOCUMENTS",
            Event::RulesChecked => "RULES_CHECKED",

            Event::FieldNotOnRecord => "FIELD_NOT_ON_RECORD",
            Event::FieldAccessFailed => "FIELD_ACCESS_FAILED",
            Event::UnsupportedRuleType => "UNSUPPORTED_RULE_TYPE",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::ConfigDefect => "CONFIG_DEFECT",
        }
    }

    /// Default severity of this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::ValidationPassed | Event::ValidationFailed => Severity::Trace,
            Event::DefinitionsMissing
            | Event::NoRuleDocuments
            | Event::FieldNotOnRecord
            | Event::UnsupportedRuleType => Severity::Warn,
            Event::FieldAccessFailed | Event::ConfigDefect => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
