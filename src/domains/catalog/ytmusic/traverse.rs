//! Deep lookups in InnerTube payloads.
//!
//! InnerTube responses nest renderers many levels deep and the nesting shifts
//! between page layouts. Rather than spelling out full paths, values are
//! located by a sequence of keys: each key is searched for anywhere below the
//! values matched by the previous key. Matched arrays are flattened into
//! their elements.

use serde_json::Value;

/// Every value reached by following `keys`, in document order.
pub fn traverse_list<'a>(data: &'a Value, keys: &[&str]) -> Vec<&'a Value> {
    let mut current = vec![data];

    for (index, key) in keys.iter().enumerate() {
        let dead_end = index + 1 == keys.len();
        let mut found = Vec::new();
        for value in current {
            collect(value, key, dead_end, &mut found);
        }
        current = flatten(found);
    }

    current
}

/// First string reached by following `keys`.
pub fn traverse_string(data: &Value, keys: &[&str]) -> Option<String> {
    traverse_list(data, keys)
        .first()
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// First value reached by following `keys`.
pub fn traverse_first<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    traverse_list(data, keys).into_iter().next()
}

/// Owned copy of [`traverse_list`] as a JSON array.
pub fn traverse_array(data: &Value, keys: &[&str]) -> Value {
    Value::Array(traverse_list(data, keys).into_iter().cloned().collect())
}

fn collect<'a>(data: &'a Value, key: &str, dead_end: bool, out: &mut Vec<&'a Value>) {
    match data {
        Value::Object(map) => {
            if let Some(found) = map.get(key) {
                out.push(found);
                // Stop at the first hit on the final key so that a matched
                // renderer's own children are not reported twice.
                if dead_end {
                    return;
                }
            }
            for child in map.values() {
                collect(child, key, false, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, key, false, out);
            }
        }
        _ => {}
    }
}

fn flatten(values: Vec<&Value>) -> Vec<&Value> {
    let mut flat = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Array(items) => flat.extend(items.iter()),
            other => flat.push(other),
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finds_nested_key() {
        let data = json!({
            "a": { "b": { "videoDetails": { "videoId": "abc" } } }
        });
        assert_eq!(
            traverse_string(&data, &["videoDetails", "videoId"]),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_flattens_arrays() {
        let data = json!({
            "runs": [ { "text": "one" }, { "text": "two" } ]
        });
        let texts: Vec<_> = traverse_list(&data, &["runs", "text"])
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_collects_across_siblings() {
        let data = json!({
            "contents": [
                { "item": { "browseId": "first" } },
                { "item": { "browseId": "second" } }
            ]
        });
        let ids: Vec<_> = traverse_list(&data, &["contents", "browseId"])
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let data = json!({ "a": 1 });
        assert!(traverse_list(&data, &["b"]).is_empty());
        assert_eq!(traverse_string(&data, &["b"]), None);
    }

    #[test]
    fn test_non_string_first_match() {
        let data = json!({ "lengthSeconds": 12 });
        assert_eq!(traverse_string(&data, &["lengthSeconds"]), None);
        assert_eq!(traverse_first(&data, &["lengthSeconds"]), Some(&json!(12)));
    }

    #[test]
    fn test_traverse_array_clones_matches() {
        let data = json!({ "thumbnails": [ { "url": "a" }, { "url": "b" } ] });
        assert_eq!(
            traverse_array(&data, &["thumbnails"]),
            json!([ { "url": "a" }, { "url": "b" } ])
        );
    }
}
