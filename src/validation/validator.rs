//! Record validator
//!
//! Validation semantics:
//! - The rule document is looked up by record-type key
//! - Every field node is resolved before any field is checked, so a broken
//!   `$ref` surfaces before any field-level violation
//! - Fields are checked in document order; all violations are collected
//! - A field the record cannot supply becomes a violation on that field and
//!   never hides violations on the others
//!
//! The validator does not mutate records and holds no mutable state; one
//! instance may serve any number of threads.

use crate::observability::{log_event_with_fields, Event};
use crate::rules::{resolve, RuleNode, RuleResult, RuleStore};

use super::calendar::{Clock, FixedHolidays, HolidayCalendar, SystemClock};
use super::checks::{check_field, DateContext};
use super::errors::{ValidationError, ValidationFailed, ValidationResult, Violation};
use super::record::{FieldAccessError, Record};

/// Validates records against the rule documents of a `RuleStore`.
pub struct RecordValidator<'a> {
    store: &'a RuleStore,
    calendar: Box<dyn HolidayCalendar>,
    clock: Box<dyn Clock>,
}

impl<'a> RecordValidator<'a> {
    /// Creates a validator backed by the given store, using the 2025 US
    /// federal holiday calendar and the system clock.
    pub fn new(store: &'a RuleStore) -> Self {
        Self {
            store,
            calendar: Box::new(FixedHolidays::us_federal_2025()),
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the holiday calendar.
    pub fn with_calendar(mut self, calendar: impl HolidayCalendar + 'static) -> Self {
        self.calendar = Box::new(calendar);
        self
    }

    /// Replaces the clock used for `minDate: "today"`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns the backing store.
    pub fn store(&self) -> &RuleStore {
        self.store
    }

    /// Validates a record against the rule document for its declared type.
    pub fn validate_record(&self, record: &dyn Record) -> ValidationResult<()> {
        self.validate(record, record.type_name())
    }

    /// Validates a record against the rule document registered under
    /// `record_type`.
    ///
    /// # Errors
    ///
    /// - `ValidationError::Config` if the document, a referenced definition,
    ///   or a constraint value is missing or unusable
    /// - `ValidationError::Failed` carrying every violation, in document order
    pub fn validate(&self, record: &dyn Record, record_type: &str) -> ValidationResult<()> {
        let violations = match self.collect_violations(record, record_type) {
            Ok(violations) => violations,
            Err(e) => {
                log_event_with_fields(
                    Event::ConfigDefect,
                    &[
                        ("code", e.code()),
                        ("message", e.to_string().as_str()),
                        ("record_type", record_type),
                    ],
                );
                return Err(ValidationError::Config(e));
            }
        };

        if violations.is_empty() {
            log_event_with_fields(Event::ValidationPassed, &[("record_type", record_type)]);
            return Ok(());
        }

        let count = violations.len().to_string();
        log_event_with_fields(
            Event::ValidationFailed,
            &[("record_type", record_type), ("violations", count.as_str())],
        );
        Err(ValidationError::Failed(ValidationFailed::new(violations)))
    }

    /// Runs every check and returns the violations without wrapping them in
    /// an error. Configuration defects are still errors.
    pub fn collect_violations(
        &self,
        record: &dyn Record,
        record_type: &str,
    ) -> RuleResult<Vec<Violation>> {
        let document = self.store.document(record_type)?;
        let definitions = self.store.definitions();

        let resolved = document
            .fields()
            .map(|(field, node)| resolve(node, definitions).map(|rules| (field, rules)))
            .collect::<RuleResult<Vec<(&str, RuleNode)>>>()?;

        let dates = DateContext::new(self.clock.today(), self.calendar.as_ref());
        let mut violations = Vec::new();

        for (field, rules) in &resolved {
            match record.field(field) {
                Ok(value) => {
                    violations.extend(check_field(field, value.as_ref(), rules, &dates)?);
                }
                Err(e) => {
                    log_access_failure(record_type, &e);
                    violations.push(Violation::new(*field, e.violation_message()));
                }
            }
        }

        Ok(violations)
    }
}

fn log_access_failure(record_type: &str, error: &FieldAccessError) {
    match error {
        FieldAccessError::UnknownField(field) => log_event_with_fields(
            Event::FieldNotOnRecord,
            &[("field", field.as_str()), ("record_type", record_type)],
        ),
        FieldAccessError::Unreadable { field, reason } => log_event_with_fields(
            Event::FieldAccessFailed,
            &[
                ("field", field.as_str()),
                ("reason", reason.as_str()),
                ("record_type", record_type),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Definitions, RuleDocument, RuleError};
    use crate::validation::calendar::FixedClock;
    use crate::validation::record::{FieldValue, JsonRecord};
    use chrono::NaiveDate;
    use serde_json::json;

    fn setup_store() -> RuleStore {
        let definitions = Definitions::from_value(json!({
            "accountNumber": {"type": "string", "pattern": "[0-9]{6,17}"},
            "currency": {"type": "string", "allowedValues": ["USD", "EUR"]}
        }))
        .unwrap();

        let document = RuleDocument::from_value(json!({
            "account": {"$ref": "#/definitions/accountNumber", "required": true},
            "currency": {"$ref": "#/definitions/currency", "required": true},
            "amount": {"type": "number", "required": true, "minValue": 0},
            "memo": {"maxLength": 5}
        }))
        .unwrap();

        RuleStore::new(definitions)
            .with_document("payment", document)
            .unwrap()
    }

    fn validator(store: &RuleStore) -> RecordValidator<'_> {
        RecordValidator::new(store)
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()))
    }

    #[test]
    fn test_valid_record_passes() {
        let store = setup_store();
        let record = JsonRecord::from_value(
            "payment",
            json!({"account": "123456789", "currency": "USD", "amount": 10}),
        )
        .unwrap();

        assert!(validator(&store).validate_record(&record).is_ok());
    }

    #[test]
    fn test_violations_follow_document_order() {
        let store = setup_store();
        let record = JsonRecord::from_value(
            "payment",
            json!({"account": "12", "currency": "GBP", "amount": -1, "memo": "too long"}),
        )
        .unwrap();

        let err = validator(&store).validate_record(&record).unwrap_err();
        let fields: Vec<&str> = err
            .violations()
            .unwrap()
            .iter()
            .map(Violation::field)
            .collect();
        assert_eq!(fields, vec!["account", "currency", "amount", "memo"]);
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_unknown_record_type() {
        let store = setup_store();
        let record = JsonRecord::from_value("payment", json!({})).unwrap();

        let err = validator(&store).validate(&record, "refund").unwrap_err();
        assert!(err.is_config_not_found());
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_explicit_key_overrides_type_name() {
        let store = setup_store();
        let record = JsonRecord::from_value(
            "PaymentDto",
            json!({"account": "123456", "currency": "EUR", "amount": "0"}),
        )
        .unwrap();

        assert!(validator(&store).validate(&record, "payment").is_ok());
        let err = validator(&store).validate_record(&record).unwrap_err();
        assert!(err.is_config_defect());
    }

    struct PartialRecord;

    impl Record for PartialRecord {
        fn type_name(&self) -> &str {
            "payment"
        }

        fn field(&self, name: &str) -> Result<Option<FieldValue>, FieldAccessError> {
            match name {
                "account" => Ok(Some("1".into())),
                "currency" => Err(FieldAccessError::Unreadable {
                    field: name.into(),
                    reason: "encrypted".into(),
                }),
                "amount" => Ok(Some("5".into())),
                other => Err(FieldAccessError::UnknownField(other.into())),
            }
        }
    }

    #[test]
    fn test_field_access_failures_do_not_abort() {
        let store = setup_store();
        let err = validator(&store)
            .validate_record(&PartialRecord)
            .unwrap_err();

        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].field(), "account");
        assert_eq!(violations[1].message(), "Error accessing field value.");
        assert_eq!(violations[2].field(), "memo");
        assert_eq!(violations[2].message(), "Field definition mismatch.");
    }

    #[test]
    fn test_missing_definition_fails_before_field_checks() {
        let document = RuleDocument::from_value(json!({
            "amount": {"type": "number", "required": true},
            "currency": {"$ref": "#/definitions/isoCurrency"}
        }))
        .unwrap();
        let store = RuleStore::default().with_document("payment", document).unwrap();
        let record = JsonRecord::from_value("payment", json!({})).unwrap();

        let err = validator(&store).validate_record(&record).unwrap_err();
        assert_eq!(
            err.config(),
            Some(&RuleError::DefinitionNotFound("#/definitions/isoCurrency".into()))
        );
    }
}
