//! Error-message templates
//!
//! A rule node may override any generated message with an `errorMessage<Check>`
//! template. `{placeholder}` tokens are replaced with the concrete values
//! involved; unknown placeholders are left as written.

use crate::rules::RuleNode;

/// Substitutes every `{name}` token present in `substitutions`.
///
/// The template is scanned once; substituted text is never re-scanned.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            substitutions
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                output.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Picks the node's template for `property`, falling back to `default`, and
/// renders it.
pub fn resolve_message(
    rules: &RuleNode,
    property: &str,
    default: impl FnOnce() -> String,
    substitutions: &[(&str, &str)],
) -> String {
    match rules.text(property) {
        Some(template) => render(template, substitutions),
        None => default(),
    }
}
