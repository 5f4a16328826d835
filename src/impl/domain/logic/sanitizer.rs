use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Taxpayer-type labels that leaked into free-text fields of historical rows.
static TAXPAYER_TYPE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PERSONNE\s+(PHYSIQUE|MORALE|PHYSOU|MORAL)")
        .expect("hardcoded regex should be valid")
});
static LEADING_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(N/A|[,/\s-])+").expect("hardcoded regex should be valid")
});
static TRAILING_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,/\s-]+$").expect("hardcoded regex should be valid"));

/// Key of the typed taxpayer-type field, which is schema and not free text.
const TYPED_FIELD: &str = "type";

const EMPTY_PLACEHOLDER: &str = "N/A";

/// Removes leaked taxpayer-type labels from one free-text value. Returns the
/// input untouched when it carries none.
pub(crate) fn scrub_str(s: &str) -> String {
    if !TAXPAYER_TYPE_LABEL.is_match(s) {
        return s.to_string();
    }
    let removed = TAXPAYER_TYPE_LABEL.replace_all(s, "");
    let removed = LEADING_SEPARATORS.replace(removed.trim(), "");
    let removed = TRAILING_SEPARATORS.replace(&removed, "");
    let cleaned = removed.trim();
    if cleaned.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Recursive scrub of every string in a JSON graph, except values stored
/// under the typed `type` key.
pub(crate) fn scrub_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let cleaned = scrub_str(s);
            if cleaned != *s {
                *s = cleaned;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(scrub_value),
        Value::Object(map) => map
            .iter_mut()
            .filter(|(k, _)| k.as_str() != TYPED_FIELD)
            .for_each(|(_, v)| scrub_value(v)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

pub(crate) fn contains_taxpayer_type_label(value: &Value) -> bool {
    match value {
        Value::String(s) => TAXPAYER_TYPE_LABEL.is_match(s),
        Value::Array(items) => items.iter().any(contains_taxpayer_type_label),
        Value::Object(map) => map
            .iter()
            .filter(|(k, _)| k.as_str() != TYPED_FIELD)
            .any(|(_, v)| contains_taxpayer_type_label(v)),
        _ => false,
    }
}
