//! JSON I/O handling for CLI
//!
//! - Input: one JSON record via stdin
//! - Output: one JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use crate::validation::ValidationFailed;

use super::errors::{CliError, CliResult};

/// Read a JSON record from stdin (may span several lines)
pub fn read_record() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_record(&input)
}

/// Parse record text into a JSON object
pub fn parse_record(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(input)?;
    if !value.is_object() {
        return Err(CliError::io_error("Record must be a JSON object"));
    }
    Ok(value)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write a validation-failure response to stdout
pub fn write_invalid(failed: &ValidationFailed) -> CliResult<()> {
    write_json(&json!({
        "status": "invalid",
        "errors": failed
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_json(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
