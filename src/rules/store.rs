//! In-memory rule registry
//!
//! Populated once (by `RuleLoader` or programmatically) and read-only after
//! that. Lookups never allocate and are safe from any number of threads.

use std::collections::HashMap;

use super::errors::{RuleError, RuleResult};
use super::resolver::resolve;
use super::types::{Definitions, RuleDocument};

/// Holds the shared definitions and one rule document per record type.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    definitions: Definitions,
    documents: HashMap<String, RuleDocument>,
}

impl RuleStore {
    /// Creates a store with the given definitions and no documents.
    pub fn new(definitions: Definitions) -> Self {
        Self {
            definitions,
            documents: HashMap::new(),
        }
    }

    /// Registers the rule document for a record type.
    ///
    /// Documents are immutable once registered; registering the same key twice
    /// is rejected.
    pub fn register(&mut self, key: impl Into<String>, document: RuleDocument) -> RuleResult<()> {
        let key = key.into();
        if self.documents.contains_key(&key) {
            return Err(RuleError::malformed(
                "<in-memory>",
                format!("rule document '{}' is already registered", key),
            ));
        }
        self.documents.insert(key, document);
        Ok(())
    }

    /// Builder-style variant of `register`.
    pub fn with_document(
        mut self,
        key: impl Into<String>,
        document: RuleDocument,
    ) -> RuleResult<Self> {
        self.register(key, document)?;
        Ok(self)
    }

    /// Returns the shared definitions collection.
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Looks up the rule document for a record type.
    ///
    /// # Errors
    ///
    /// `ConfigNotFound` when no document is registered under `key`.
    pub fn document(&self, key: &str) -> RuleResult<&RuleDocument> {
        self.documents
            .get(key)
            .ok_or_else(|| RuleError::ConfigNotFound(key.to_string()))
    }

    /// Checks if a document exists for the record type.
    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    /// Returns all record-type keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Returns the number of registered documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Resolves every field of every document and checks that each resolved
    /// node's constraint values are usable (numbers parse, patterns compile).
    ///
    /// Documents are checked in key order, so the reported defect is stable.
    /// Returns the number of fields checked.
    pub fn check_references(&self) -> RuleResult<usize> {
        let mut checked = 0;
        for key in self.keys() {
            let document = self.document(key)?;
            for (field, node) in document.fields() {
                let resolved = resolve(node, &self.definitions)?;
                resolved.check_constraints(field)?;
                checked += 1;
            }
        }
        Ok(checked)
    }
}
