//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints that
//! use the error's JSON context.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
///
/// Falls back to the static suggestion of `code` when the context does not
/// carry anything more specific.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::ParameterInvalid => suggest_parameter_invalid(context),
        ErrorCode::ParameterConflict => suggest_parameter_conflict(context),
        ErrorCode::HierarchyCycle => suggest_hierarchy_cycle(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_parameter_invalid(context: Option<&Value>) -> String {
    let parameter = context
        .and_then(|c| c.get("parameter"))
        .and_then(Value::as_str);
    let reason = context
        .and_then(|c| c.get("reason"))
        .and_then(Value::as_str);

    match (parameter, reason) {
        (Some(parameter), Some(reason)) => {
            format!("Fix the value of '{parameter}' ({reason}) and resend the request")
        }
        (Some(parameter), None) => format!("Fix the value of '{parameter}' and resend the request"),
        _ => ErrorCode::ParameterInvalid.suggestion().to_string(),
    }
}

fn suggest_parameter_conflict(context: Option<&Value>) -> String {
    let names: Vec<&str> = context
        .and_then(|c| c.get("parameters"))
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    match names.as_slice() {
        [first, second] => format!("Pass either '{first}' or '{second}', not both"),
        _ => ErrorCode::ParameterConflict.suggestion().to_string(),
    }
}

fn suggest_hierarchy_cycle(context: Option<&Value>) -> String {
    let cycle = context
        .and_then(|c| c.get("cycle"))
        .and_then(Value::as_array);

    match cycle {
        Some(chain) if !chain.is_empty() => {
            let chain: Vec<_> = chain.iter().filter_map(Value::as_str).collect();
            format!(
                "Cycle detected: {}\nBreak it by clearing one of the parent references",
                chain.join(" -> ")
            )
        }
        _ => ErrorCode::HierarchyCycle.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    let key = context
        .and_then(|c| c.get("config_key"))
        .and_then(Value::as_str);

    match key {
        Some(key) => format!(
            "Set `{key}` in config.toml, or export FACETQ_{}",
            key.replace('.', "_").to_uppercase()
        ),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}

/// Suggest known parameter names for a misspelled one.
///
/// Used to hint at typos such as `includeLocationID` when a request carries a
/// key that no filter binds to.
pub fn suggest_similar_parameters(
    query: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<_> = available
        .iter()
        .map(|s| (s, similarity_score(&query_lower, &s.to_lowercase())))
        .filter(|(_, score)| *score > 0.3)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(s, _)| (*s).to_string())
        .collect()
}

/// Jaccard similarity on character trigrams.
fn similarity_score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_trigrams: std::collections::HashSet<_> = trigrams(a).collect();
    let b_trigrams: std::collections::HashSet<_> = trigrams(b).collect();

    if a_trigrams.is_empty() || b_trigrams.is_empty() {
        if a.starts_with(b) || b.starts_with(a) {
            return 0.8;
        }
        if a.contains(b) || b.contains(a) {
            return 0.5;
        }
        return 0.0;
    }

    let intersection = a_trigrams.intersection(&b_trigrams).count();
    let union = a_trigrams.union(&b_trigrams).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn trigrams(s: &str) -> impl Iterator<Item = &str> {
    (0..s.len().saturating_sub(2)).filter_map(move |i| s.get(i..i + 3))
}
