//! Canonical JSON minimal: claves ordenadas y sin espacios.
//! Dos `Value` semánticamente iguales producen exactamente el mismo string,
//! independientemente del orden de inserción de sus claves.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree
                .into_iter()
                .map(|(k, v)| format!("{}:{}", quote(k), v))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

// `Display` de `Value::String` ya aplica el escape JSON.
fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::to_canonical_json;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert_eq!(to_canonical_json(&json!(null)), "null");
        assert_eq!(to_canonical_json(&json!(true)), "true");
        assert_eq!(to_canonical_json(&json!(7.4)), "7.4");
        assert_eq!(to_canonical_json(&json!("c1ccccc1")), "\"c1ccccc1\"");
    }

    #[test]
    fn test_object_sorted_keys() {
        let val = json!({ "ph": 7.4, "method": "KLOP" });
        assert_eq!(to_canonical_json(&val), "{\"method\":\"KLOP\",\"ph\":7.4}");
    }

    #[test]
    fn test_nested_and_escaped() {
        let val = json!({ "z": [ { "y": "C(=O)\"x\"" }, null ], "a": { "x": 10 } });
        assert_eq!(to_canonical_json(&val), "{\"a\":{\"x\":10},\"z\":[{\"y\":\"C(=O)\\\"x\\\"\"},null]}");
    }
}
