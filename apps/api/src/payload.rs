use serde_json::{Map, Value};

/// Returns a copy of `value` with every null, empty string, empty object and empty
/// array removed, recursively. Objects and arrays that become empty once their
/// children are pruned are removed too. Key order is preserved.
///
/// A top-level value that prunes away entirely comes back as an empty object.
pub fn remove_null_fields(value: &Value) -> Value {
    prune(value).unwrap_or_else(|| Value::Object(Map::new()))
}

fn prune(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| prune(v).map(|v| (k.clone(), v)))
                .collect();
            (!pruned.is_empty()).then_some(Value::Object(pruned))
        }
        Value::Array(items) => {
            let pruned: Vec<Value> = items.iter().filter_map(prune).collect();
            (!pruned.is_empty()).then_some(Value::Array(pruned))
        }
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_null_and_emptied_parent() {
        let input = json!({"a": 1, "b": null, "c": {"d": null}});
        assert_eq!(remove_null_fields(&input), json!({"a": 1}));
    }

    #[test]
    fn test_drops_empty_strings_and_containers() {
        let input = json!({"s": "", "o": {}, "l": [], "keep": "x"});
        assert_eq!(remove_null_fields(&input), json!({"keep": "x"}));
    }

    #[test]
    fn test_keeps_zero_and_false() {
        let input = json!({"score": 0, "flag": false, "hours": 0.0});
        assert_eq!(remove_null_fields(&input), input);
    }

    #[test]
    fn test_deep_nesting_collapses() {
        let input = json!({"course": {"attendance": {"status": {"code": null}}}, "uen": "T01AB2345C"});
        assert_eq!(remove_null_fields(&input), json!({"uen": "T01AB2345C"}));
    }

    #[test]
    fn test_prunes_inside_arrays() {
        let input = json!({"items": [null, {"a": null}, {"a": 1}, ""]});
        assert_eq!(remove_null_fields(&input), json!({"items": [{"a": 1}]}));
    }

    #[test]
    fn test_does_not_mutate_input() {
        let input = json!({"a": null, "b": 2});
        let before = input.clone();
        let _ = remove_null_fields(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_preserves_key_order() {
        let input = json!({"z": 1, "gone": null, "a": 2, "m": 3});
        let out = remove_null_fields(&input);
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_idempotent() {
        let input = json!({"a": {"b": [null, {"c": ""}], "d": 4}, "e": null, "f": "g"});
        let once = remove_null_fields(&input);
        assert_eq!(remove_null_fields(&once), once);
    }

    #[test]
    fn test_everything_pruned_yields_empty_object() {
        assert_eq!(remove_null_fields(&json!({"a": null})), json!({}));
        assert_eq!(remove_null_fields(&Value::Null), json!({}));
    }
}
