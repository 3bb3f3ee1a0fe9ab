//! Observability for rule loading and validation
//!
//! Structured, synchronous JSON log lines. Observability is read-only: it
//! never changes a validation outcome and never fails the caller.
//!
//! # Usage
//!
//! ```ignore
//! use rulecheck::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RuleDocumentLoaded, &[("key", "wireTransferRequest")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
