//! Per-field rule checks
//!
//! Order of evaluation for one field:
//! 1. Presence. A blank required field yields one violation and nothing else
//!    runs; a blank optional field yields nothing.
//! 2. Type family selected by the node's `type`:
//!    - string: minLength, maxLength, pattern, allowedValues (cumulative)
//!    - number: decimal parse (short-circuits), then minValue, maxValue
//!    - date: `YYYY-MM-DD` parse (short-circuits), then minDate, customRule
//!    - anything else: no checks
//!
//! Constraint values that cannot be used (bad regex, non-numeric bound) are
//! configuration defects and abort the call.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::observability::{log_event_with_fields, Event};
use crate::rules::{parse_decimal, RuleNode, RuleResult, RuleType};

use super::calendar::{is_weekend, HolidayCalendar};
use super::errors::Violation;
use super::messages::resolve_message;
use super::record::FieldValue;

/// Custom rule rejecting weekend and holiday dates.
pub const NO_WEEKEND_OR_HOLIDAY: &str = "noWeekendOrHoliday";

/// Token for `minDate` meaning the evaluation date.
pub const MIN_DATE_TODAY: &str = "today";

/// Date-rule inputs fixed for the duration of one validation call.
#[derive(Clone, Copy)]
pub struct DateContext<'a> {
    /// Evaluation date for `minDate: "today"`
    pub today: NaiveDate,
    /// Holiday policy for `noWeekendOrHoliday`
    pub calendar: &'a dyn HolidayCalendar,
}

impl<'a> DateContext<'a> {
    pub fn new(today: NaiveDate, calendar: &'a dyn HolidayCalendar) -> Self {
        Self { today, calendar }
    }
}

/// Checks one field's value against its resolved rule node.
///
/// `value` is `None` when the field is absent or null.
pub fn check_field(
    field: &str,
    value: Option<&FieldValue>,
    rules: &RuleNode,
    dates: &DateContext<'_>,
) -> RuleResult<Vec<Violation>> {
    let value = match value.filter(|v| !v.is_blank()) {
        Some(value) => value,
        None if rules.is_required() => {
            let message = resolve_message(
                rules,
                "errorMessageRequired",
                || format!("{} is required.", field),
                &[("field", field)],
            );
            return Ok(vec![Violation::new(field, message)]);
        }
        None => return Ok(Vec::new()),
    };

    let mut violations = Vec::new();
    let check = FieldCheck {
        field,
        value,
        rules,
        rendered: value.display(),
    };

    match rules.rule_type() {
        RuleType::String => check.string(&mut violations)?,
        RuleType::Number => check.number(&mut violations)?,
        RuleType::Date => check.date(dates, &mut violations),
        RuleType::Unsupported(type_name) => {
            log_event_with_fields(
                Event::UnsupportedRuleType,
                &[("field", field), ("type", type_name.as_str())],
            );
        }
    }

    Ok(violations)
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

struct FieldCheck<'a> {
    field: &'a str,
    value: &'a FieldValue,
    rules: &'a RuleNode,
    rendered: String,
}

impl FieldCheck<'_> {
    fn violation(
        &self,
        property: &str,
        default: impl FnOnce() -> String,
        extra: &[(&str, &str)],
    ) -> Violation {
        let mut substitutions = vec![("field", self.field), ("value", self.rendered.as_str())];
        substitutions.extend_from_slice(extra);
        let message = resolve_message(self.rules, property, default, &substitutions);
        Violation::new(self.field, message)
    }

    fn string(&self, out: &mut Vec<Violation>) -> RuleResult<()> {
        let text = match self.value {
            FieldValue::Text(text) => text.as_str(),
            _ => {
                out.push(self.violation(
                    "errorMessageType",
                    || "Must be a string.".to_string(),
                    &[],
                ));
                return Ok(());
            }
        };
        let length = text.chars().count();

        if let Some(min) = self.rules.length(self.field, "minLength")? {
            if length < min {
                let limit = min.to_string();
                out.push(self.violation(
                    "errorMessageMinLength",
                    || format!("Min length is {}", min),
                    &[("minLength", limit.as_str())],
                ));
            }
        }

        if let Some(max) = self.rules.length(self.field, "maxLength")? {
            if length > max {
                let limit = max.to_string();
                out.push(self.violation(
                    "errorMessageMaxLength",
                    || format!("Max length is {}", max),
                    &[("maxLength", limit.as_str())],
                ));
            }
        }

        if let Some(regex) = self.rules.pattern(self.field)? {
            if !regex.is_match(text) {
                let pattern = self.rules.text("pattern").unwrap_or_default();
                out.push(self.violation(
                    "errorMessagePattern",
                    || "Invalid format.".to_string(),
                    &[("pattern", pattern)],
                ));
            }
        }

        if let Some(allowed) = self.rules.allowed_values(self.field)? {
            if !allowed.iter().any(|candidate| candidate == text) {
                let joined = allowed.join(", ");
                out.push(self.violation(
                    "errorMessageAllowedValues",
                    || format!("Invalid value. Allowed: {}", joined),
                    &[("allowedValues", joined.as_str())],
                ));
            }
        }

        Ok(())
    }

    fn number(&self, out: &mut Vec<Violation>) -> RuleResult<()> {
        let number = match self.value {
            FieldValue::Number(number) => Some(number.clone()),
            FieldValue::Text(text) => parse_decimal(text),
            _ => None,
        };
        let number: BigDecimal = match number {
            Some(number) => number,
            None => {
                out.push(self.violation(
                    "errorMessageType",
                    || "Must be a valid number.".to_string(),
                    &[],
                ));
                return Ok(());
            }
        };

        if let Some(min) = self.rules.decimal(self.field, "minValue")? {
            if number < min {
                let limit = min.to_string();
                out.push(self.violation(
                    "errorMessageMinValue",
                    || format!("Min value is {}", min),
                    &[("minValue", limit.as_str())],
                ));
            }
        }

        if let Some(max) = self.rules.decimal(self.field, "maxValue")? {
            if number > max {
                let limit = max.to_string();
                out.push(self.violation(
                    "errorMessageMaxValue",
                    || format!("Max value is {}", max),
                    &[("maxValue", limit.as_str())],
                ));
            }
        }

        Ok(())
    }

    fn date(&self, dates: &DateContext<'_>, out: &mut Vec<Violation>) {
        let date = match self.value {
            FieldValue::Date(date) => *date,
            FieldValue::Text(text) => match parse_iso_date(text.trim()) {
                Some(date) => date,
                None => {
                    out.push(self.violation(
                        "errorMessageType",
                        || "Invalid date format. Expected yyyy-MM-dd.".to_string(),
                        &[],
                    ));
                    return;
                }
            },
            _ => {
                out.push(self.violation(
                    "errorMessageType",
                    || "Invalid date type.".to_string(),
                    &[],
                ));
                return;
            }
        };

        let min_is_today = self
            .rules
            .text("minDate")
            .map_or(false, |token| token.eq_ignore_ascii_case(MIN_DATE_TODAY));
        if min_is_today && date < dates.today {
            let today = dates.today.format("%Y-%m-%d").to_string();
            out.push(self.violation(
                "errorMessageMinDate",
                || "Date cannot be in the past.".to_string(),
                &[("minDate", today.as_str())],
            ));
        }

        if self.rules.text("customRule") == Some(NO_WEEKEND_OR_HOLIDAY) {
            if is_weekend(date) {
                out.push(self.violation(
                    "errorMessageCustomRule",
                    || "Date cannot be a weekend.".to_string(),
                    &[],
                ));
            } else if dates.calendar.is_holiday(date) {
                out.push(self.violation(
                    "errorMessageCustomRule",
                    || "Date cannot be a public holiday.".to_string(),
                    &[],
                ));
            }
        }
    }
}
