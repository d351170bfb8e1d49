use std::collections::HashMap;

pub const SIGHTING_VALUE: &str = "sighting_value";
pub const SIGHTING_DESC: &str = "sighting_desc";
pub const CONFIDENCE_LEVEL: &str = "confidence_level";
pub const SIGHTING_TITLE: &str = "sighting_title";
pub const SIGHTING_TAGS: &str = "sighting_tags";
pub const SIGHTING_TYPE: &str = "sighting_type";
pub const API_KEY: &str = "api_key";
pub const PROXY_PASS: &str = "proxy_pass";

/// Fold the ordered `[key, value]` pairs of the submitted form into a map.
/// Later occurrences of a key overwrite earlier ones.
pub fn parse_form(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut parsed = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        parsed.insert(key, value);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn last_value_wins_on_duplicate_keys() {
        let form = parse_form(vec![
            pair(SIGHTING_VALUE, "1.2.3.4"),
            pair(SIGHTING_TITLE, "first"),
            pair(SIGHTING_VALUE, "6.7.8.9"),
        ]);
        assert_eq!(form.get(SIGHTING_VALUE).map(String::as_str), Some("6.7.8.9"));
        assert_eq!(form.get(SIGHTING_TITLE).map(String::as_str), Some("first"));
    }

    #[test]
    fn empty_form_parses_to_empty_map() {
        assert!(parse_form(Vec::new()).is_empty());
    }
}
