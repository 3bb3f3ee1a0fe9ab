//! Rule loader for reading rule files from disk at startup
//!
//! Layout under the rules directory:
//! - `common/validationDefinitions.json`: `{"definitions": {...}}`
//! - `specifics/<recordType>.json`: one rule document per record type,
//!   keyed by file stem
//!
//! A missing definitions file is tolerated (empty collection). Malformed JSON
//! in any file is a configuration defect.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{RuleError, RuleResult};
use super::store::RuleStore;
use super::types::{Definitions, RuleDocument};

/// Default definitions file, relative to the rules directory.
pub const DEFAULT_DEFINITIONS_FILE: &str = "common/validationDefinitions.json";

/// Default directory of per-record-type documents, relative to the rules directory.
pub const DEFAULT_SPECIFICS_DIR: &str = "specifics";

/// Reads rule files from disk and builds an immutable `RuleStore`.
#[derive(Debug, Clone)]
pub struct RuleLoader {
    /// Path of the shared definitions file
    definitions_path: PathBuf,
    /// Directory containing per-record-type documents
    specifics_dir: PathBuf,
}

impl RuleLoader {
    /// Creates a loader using the default layout under `rules_dir`.
    pub fn new(rules_dir: &Path) -> Self {
        Self {
            definitions_path: rules_dir.join(DEFAULT_DEFINITIONS_FILE),
            specifics_dir: rules_dir.join(DEFAULT_SPECIFICS_DIR),
        }
    }

    /// Creates a loader with explicit paths.
    pub fn with_paths(
        definitions_path: impl Into<PathBuf>,
        specifics_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            definitions_path: definitions_path.into(),
            specifics_dir: specifics_dir.into(),
        }
    }

    /// Returns the definitions file path.
    pub fn definitions_path(&self) -> &Path {
        &self.definitions_path
    }

    /// Returns the specifics directory path.
    pub fn specifics_dir(&self) -> &Path {
        &self.specifics_dir
    }

    /// Loads the definitions and every rule document.
    pub fn load(&self) -> RuleResult<RuleStore> {
        let definitions = self.load_definitions()?;
        let mut store = RuleStore::new(definitions);

        for (key, document) in self.load_documents()? {
            store.register(key, document)?;
        }

        if store.document_count() == 0 {
            let dir = self.specifics_dir.display().to_string();
            log_event_with_fields(Event::NoRuleDocuments, &[("dir", dir.as_str())]);
        }

        Ok(store)
    }

    /// Loads the shared definitions collection.
    pub fn load_definitions(&self) -> RuleResult<Definitions> {
        let path = self.definitions_path.display().to_string();

        if !self.definitions_path.exists() {
            log_event_with_fields(Event::DefinitionsMissing, &[("path", path.as_str())]);
            return Ok(Definitions::new());
        }

        let root = read_json(&self.definitions_path)?;
        let definitions =
            Definitions::from_root(root).map_err(|e| RuleError::malformed(&path, e.to_string()))?;

        let count = definitions.len().to_string();
        log_event_with_fields(
            Event::DefinitionsLoaded,
            &[("count", count.as_str()), ("path", path.as_str())],
        );
        Ok(definitions)
    }

    /// Loads every `*.json` document in the specifics directory, sorted by
    /// file name.
    pub fn load_documents(&self) -> RuleResult<Vec<(String, RuleDocument)>> {
        if !self.specifics_dir.exists() {
            return Ok(Vec::new());
        }

        let dir = self.specifics_dir.display().to_string();
        let entries = fs::read_dir(&self.specifics_dir).map_err(|e| {
            RuleError::malformed(&dir, format!("Failed to read rules directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RuleError::malformed(&dir, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(self.load_document_file(&path)?);
        }
        Ok(documents)
    }

    /// Loads a single document file, keyed by its file stem.
    fn load_document_file(&self, path: &Path) -> RuleResult<(String, RuleDocument)> {
        let display = path.display().to_string();

        let key = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| RuleError::malformed(&display, "File name is not valid UTF-8"))?
            .to_string();

        let document = RuleDocument::from_value(read_json(path)?)
            .map_err(|e| RuleError::malformed(&display, e.to_string()))?;

        let fields = document.len().to_string();
        log_event_with_fields(
            Event::RuleDocumentLoaded,
            &[("fields", fields.as_str()), ("key", key.as_str())],
        );
        Ok((key, document))
    }
}

fn read_json(path: &Path) -> RuleResult<Value> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .map_err(|e| RuleError::malformed(&display, format!("Failed to read file: {}", e)))?;
    serde_json::from_str(&content)
        .map_err(|e| RuleError::malformed(&display, format!("Invalid JSON: {}", e)))
}
