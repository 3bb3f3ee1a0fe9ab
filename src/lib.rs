//! rulecheck - A data-driven record validation engine
//!
//! Field rules live in JSON files: a shared definitions file plus one rule
//! document per record type. Rule nodes may `$ref` a shared definition and
//! override any of its properties locally.

pub mod cli;
pub mod observability;
pub mod records;
pub mod rules;
pub mod validation;
