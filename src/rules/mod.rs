//! Rule subsystem
//!
//! Rule documents describe per-record-type field constraints and may borrow
//! shared fragments from the definitions collection through `$ref`.
//!
//! # Design Principles
//!
//! - Loaded once, read-only afterwards
//! - Document field order is preserved and drives violation order
//! - Missing documents and definitions are configuration defects, never
//!   validation failures

mod errors;
mod loader;
mod resolver;
mod store;
mod types;

pub use errors::{RuleError, RuleResult};
pub use loader::{RuleLoader, DEFAULT_DEFINITIONS_FILE, DEFAULT_SPECIFICS_DIR};
pub use resolver::{definition_key, resolve};
pub use store::RuleStore;
pub use types::{parse_decimal, Definitions, RuleDocument, RuleNode, RuleType, REF_KEY};
