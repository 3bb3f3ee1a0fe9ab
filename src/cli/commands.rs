//! CLI command implementations
//!
//! Both commands follow the same boot sequence: load config, set the log
//! level, load the rule store. Nothing is cached between invocations.

use std::path::Path;

use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::records::WireTransferRequest;
use crate::rules::RuleStore;
use crate::validation::{FixedHolidays, JsonRecord, Record, RecordValidator, ValidationError};

use super::args::{Command, RecordShape};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_record, write_error, write_invalid, write_response};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate {
            config,
            record_type,
            shape,
        } => validate(&config, &record_type, shape),
        Command::Check { config } => check(&config),
    }
}

/// Validate one record from stdin
///
/// Writes exactly one response line to stdout:
/// - `{"status":"ok",...}` when the record passes
/// - `{"status":"invalid","errors":[...]}` with every violation
/// - `{"status":"error","code":...,"message":...}` on a rule-set defect
pub fn validate(config_path: &Path, record_type: &str, shape: RecordShape) -> CliResult<()> {
    let (config, store) = boot(config_path)?;
    let input = read_record()?;

    let outcome = validate_value(&store, config.calendar(), record_type, shape, input)?;
    match outcome {
        Ok(()) => write_response(json!({ "record_type": record_type })),
        Err(ValidationError::Failed(failed)) => {
            write_invalid(&failed)?;
            Err(CliError::validation_failed(failed.len()))
        }
        Err(ValidationError::Config(e)) => {
            write_error(e.code(), &e.to_string())?;
            Err(e.into())
        }
    }
}

/// Load every rule file and check all references
pub fn check(config_path: &Path) -> CliResult<()> {
    let (_config, store) = boot(config_path)?;

    let fields = store.check_references()?;
    let record_types = store.keys();

    let fields_str = fields.to_string();
    let documents_str = record_types.len().to_string();
    log_event_with_fields(
        Event::RulesChecked,
        &[
            ("documents", documents_str.as_str()),
            ("fields", fields_str.as_str()),
        ],
    );

    write_response(json!({
        "record_types": record_types,
        "definitions": store.definitions().len(),
        "fields_checked": fields,
    }))
}

fn boot(config_path: &Path) -> CliResult<(Config, RuleStore)> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let config_path_str = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", config_path_str.as_str()),
            ("rules_dir", config.rules_dir.as_str()),
        ],
    );

    let store = config.loader().load()?;
    Ok((config, store))
}

/// Validate an already-parsed record.
///
/// The outer error covers input that cannot be shaped into a record; the
/// inner result is the validation outcome itself.
fn validate_value(
    store: &RuleStore,
    calendar: FixedHolidays,
    record_type: &str,
    shape: RecordShape,
    input: Value,
) -> CliResult<Result<(), ValidationError>> {
    let validator = RecordValidator::new(store).with_calendar(calendar);

    let record: Box<dyn Record> = match shape {
        RecordShape::Json => Box::new(
            JsonRecord::from_value(record_type, input)
                .ok_or_else(|| CliError::io_error("Record must be a JSON object"))?,
        ),
        RecordShape::WireTransfer => {
            let request: WireTransferRequest = serde_json::from_value(input)?;
            Box::new(request)
        }
    };

    Ok(validator.validate(record.as_ref(), record_type))
}
