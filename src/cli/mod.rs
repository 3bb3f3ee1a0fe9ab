//! CLI module for rulecheck
//!
//! Provides command-line interface for:
//! - validate: Check one record from stdin against its rule document
//! - check: Load all rule files and verify every reference resolves

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, RecordShape};
pub use commands::{check, run, run_command, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_record, read_record, write_error, write_invalid, write_response};
