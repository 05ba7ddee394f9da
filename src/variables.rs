//! Placeholder discovery and substitution.
//!
//! A placeholder is written `{{name}}`. The name is the shortest run of
//! characters between a `{{` and the next `}}` on the same line, so
//! `{{a{{b}}c}}` names the variable `a{{b`. There is no escaping and no
//! nesting.

use crate::error::{Result, VidplateError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// A completed mapping from placeholder name to replacement text.
pub type Assignment = BTreeMap<String, String>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern must compile"));

/// Render the token for a variable name, e.g. `title` -> `{{title}}`
pub fn placeholder(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Collect the distinct variable names used in `text`, sorted
pub fn extract(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Union of the variable names found in each field.
///
/// Fields are scanned one at a time so a `{{` at the end of one field never
/// pairs with a `}}` at the start of the next.
pub fn extract_all<I, S>(fields: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .flat_map(|field| extract(field.as_ref()))
        .collect()
}

/// Replace every `{{name}}` in `text` whose name appears in `assignment`.
///
/// The text is scanned once from left to right and replacement values are
/// copied verbatim, never re-scanned. Placeholders without a value are left
/// as they are.
pub fn apply(text: &str, assignment: &Assignment) -> String {
    if assignment.is_empty() {
        return text.to_string();
    }

    let tokens: Vec<(String, &str)> = assignment
        .iter()
        .map(|(name, value)| (placeholder(name), value.as_str()))
        .collect();

    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        // Two tokens can only start at the same offset when one name itself
        // contains `}}`; the shorter one wins, same as extraction.
        let hit = tokens
            .iter()
            .filter(|(token, _)| candidate.starts_with(token.as_str()))
            .min_by_key(|(token, _)| token.len());

        match hit {
            Some((token, value)) => {
                output.push_str(value);
                rest = &candidate[token.len()..];
            }
            None => {
                output.push('{');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Apply the same assignment to several fields, keeping their order
pub fn apply_all<I, S>(fields: I, assignment: &Assignment) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| apply(field.as_ref(), assignment))
        .collect()
}

/// Names from `names` that have no entry in `assignment`
pub fn missing_names<'a>(names: &'a [String], assignment: &Assignment) -> Vec<&'a String> {
    names
        .iter()
        .filter(|name| !assignment.contains_key(name.as_str()))
        .collect()
}

/// Parse a `name=value` pair as given on the command line.
///
/// The split happens at the first `=`, so values may contain `=` but names
/// cannot.
pub fn parse_assignment(pair: &str) -> Result<(String, String)> {
    pair.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| {
            VidplateError::InvalidAssignment(format!("expected name=value, got '{}'", pair))
        })
}
