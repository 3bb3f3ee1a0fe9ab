//! CLI argument definitions using clap
//!
//! Commands:
//! - rulecheck validate --config <path> --record-type <key> [--shape <shape>]
//! - rulecheck check --config <path>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rulecheck - data-driven record validation against JSON rule files
#[derive(Parser, Debug)]
#[command(name = "rulecheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON record read from stdin
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./rulecheck.json")]
        config: PathBuf,

        /// Rule document key to validate against
        #[arg(long)]
        record_type: String,

        /// How the record on stdin is interpreted
        #[arg(long, value_enum, default_value_t = RecordShape::Json)]
        shape: RecordShape,
    },

    /// Load every rule file and check all references and constraint values
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./rulecheck.json")]
        config: PathBuf,
    },
}

/// Record shapes accepted on stdin
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// Free-form JSON object; absent keys are absent values
    Json,
    /// Typed wire transfer request; unknown rule fields are violations
    WireTransfer,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
