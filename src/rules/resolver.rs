//! `$ref` resolution
//!
//! A node with `$ref` is replaced by a copy of the referenced base definition
//! with every local property except `$ref` laid on top. Local values win.
//!
//! Base definitions may themselves carry `$ref`; those chains are followed
//! until no pointer remains. A chain that revisits a key is rejected.

use super::errors::{RuleError, RuleResult};
use super::types::{Definitions, RuleNode, DEFINITIONS_POINTER, REF_KEY};

/// Resolves a raw rule node against the definitions collection.
///
/// Nodes without `$ref` are returned unchanged.
///
/// # Errors
///
/// - `DefinitionNotFound` if a pointer names an absent key
/// - `ReferenceCycle` if a chain of pointers loops back on itself
pub fn resolve(node: &RuleNode, definitions: &Definitions) -> RuleResult<RuleNode> {
    let mut chain = Vec::new();
    resolve_chain(node, definitions, &mut chain)
}

/// Extracts the definition key from a pointer such as `#/definitions/amount`.
pub fn definition_key(reference: &str) -> &str {
    reference
        .strip_prefix(DEFINITIONS_POINTER)
        .unwrap_or(reference)
}

fn resolve_chain(
    node: &RuleNode,
    definitions: &Definitions,
    chain: &mut Vec<String>,
) -> RuleResult<RuleNode> {
    let reference = match node.reference() {
        Some(reference) => reference,
        None => return Ok(node.clone()),
    };

    let key = definition_key(&reference);
    if chain.iter().any(|seen| seen == key) {
        let mut cycle = chain.clone();
        cycle.push(key.to_string());
        return Err(RuleError::ReferenceCycle(cycle));
    }

    let base = definitions
        .get(key)
        .ok_or_else(|| RuleError::DefinitionNotFound(reference.clone()))?;

    chain.push(key.to_string());
    let mut merged = resolve_chain(base, definitions, chain)?;
    chain.pop();

    for (property, value) in node.properties() {
        if property != REF_KEY {
            merged.insert(property.clone(), value.clone());
        }
    }

    Ok(merged)
}
