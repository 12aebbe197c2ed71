use serde_json::Value;
use std::collections::HashSet;

/// Flatten an arbitrary JSON-like field into normalized lowercase tokens.
///
/// Strings are split on whitespace, commas, semicolons and slashes; arrays
/// and objects are walked recursively (object keys are ignored, values are
/// visited in the map's stable order); null, numbers and booleans yield
/// nothing. Total over any JSON shape: never fails, at worst returns an
/// empty list.
pub fn collect_keywords(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => tokenize(text),
        Value::Array(items) => items.iter().flat_map(collect_keywords).collect(),
        Value::Object(map) => map.values().flat_map(collect_keywords).collect(),
        _ => Vec::new(),
    }
}

/// Split free text into trimmed lowercase tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '/'))
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Deduplicate keywords while preserving first-seen order.
pub fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_splitting_and_normalization() {
        let value = json!("Tech, Fitness;travel/Hiking\nYoga");
        assert_eq!(
            collect_keywords(&value),
            vec!["tech", "fitness", "travel", "hiking", "yoga"]
        );
    }

    #[test]
    fn test_nested_structures_are_flattened() {
        let value = json!({
            "industry": "Software",
            "tags": ["b2b saas", {"focus": "growth"}],
        });
        let keywords = collect_keywords(&value);
        assert!(keywords.contains(&"software".to_string()));
        assert!(keywords.contains(&"b2b".to_string()));
        assert!(keywords.contains(&"saas".to_string()));
        assert!(keywords.contains(&"growth".to_string()));
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        assert!(collect_keywords(&json!("")).is_empty());
        assert!(collect_keywords(&json!([])).is_empty());
        assert!(collect_keywords(&json!({})).is_empty());
        assert!(collect_keywords(&Value::Null).is_empty());
    }

    #[test]
    fn test_scalars_yield_nothing() {
        assert!(collect_keywords(&json!(42)).is_empty());
        assert!(collect_keywords(&json!(true)).is_empty());
        assert!(collect_keywords(&json!(3.5)).is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let keywords = vec![
            "fitness".to_string(),
            "travel".to_string(),
            "fitness".to_string(),
            "tech".to_string(),
        ];
        assert_eq!(dedup_keywords(keywords), vec!["fitness", "travel", "tech"]);
    }
}
