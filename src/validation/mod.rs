//! Record validation
//!
//! Checks a record against the rule document for its type and reports every
//! violation found in one pass.
//!
//! # Design Principles
//!
//! - Never stop at the first violation; stop per field after the first
//!   failing check family
//! - Configuration defects are errors, never violations
//! - Deterministic: identical inputs give identically ordered violations
//! - Records are read, never mutated

mod calendar;
mod checks;
mod errors;
mod messages;
mod record;
mod validator;

pub use calendar::{is_weekend, Clock, FixedClock, FixedHolidays, HolidayCalendar, SystemClock};
pub use checks::{check_field, parse_iso_date, DateContext, MIN_DATE_TODAY, NO_WEEKEND_OR_HOLIDAY};
pub use errors::{ValidationError, ValidationFailed, ValidationResult, Violation};
pub use messages::render;
pub use record::{FieldAccessError, FieldValue, JsonRecord, Record};
pub use validator::RecordValidator;
