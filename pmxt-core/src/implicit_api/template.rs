//! Path template substitution.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::transport::param_to_string;
use crate::types::ApiParams;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{([^{}]+)\}").expect("Invalid path placeholder regex pattern");
}

/// Placeholder names in `path`, in order of appearance.
///
/// ```rust
/// use pmxt_core::implicit_api::placeholders;
///
/// assert_eq!(placeholders("/markets/{id}/book/{side}"), vec!["id", "side"]);
/// assert!(placeholders("/markets").is_empty());
/// ```
pub fn placeholders(path: &str) -> Vec<&str> {
    PLACEHOLDER
        .find_iter(path)
        .map(|m| strip_braces(m.as_str()))
        .collect()
}

fn strip_braces(token: &str) -> &str {
    token
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(token)
}

/// Substitutes every `{name}` in `path` with the URL-escaped value of
/// `params[name]` and removes the consumed entries from `params`.
///
/// A placeholder that appears more than once takes the same value each time.
/// A missing or `null` value fails with `MissingPathParameter`, in which case
/// `params` is left untouched.
pub fn resolve_path(path: &str, params: &mut ApiParams) -> Result<String> {
    let mut values: BTreeMap<&str, String> = BTreeMap::new();
    for name in placeholders(path) {
        if values.contains_key(name) {
            continue;
        }
        match params.get(name) {
            Some(value) if !value.is_null() => {
                values.insert(name, urlencoding::encode(&param_to_string(value)).into_owned());
            }
            _ => return Err(Error::missing_path_parameter(name, path)),
        }
    }

    let mut resolved = String::with_capacity(path.len());
    let mut last = 0;
    for m in PLACEHOLDER.find_iter(path) {
        resolved.push_str(&path[last..m.start()]);
        if let Some(value) = values.get(strip_braces(m.as_str())) {
            resolved.push_str(value);
        }
        last = m.end();
    }
    resolved.push_str(&path[last..]);

    for name in values.keys() {
        params.remove(*name);
    }
    Ok(resolved)
}
