use serde_yaml::{Mapping, Value};

/// Look up a string key in a YAML mapping.
pub fn get_key<'a>(map: &'a Mapping, name: &str) -> Option<&'a Value> {
    map.get(&Value::String(name.to_string()))
}

/// Recursively merge `overlay` into `base` and return the result.
///
/// Mappings merge key by key, sequences concatenate (`base` entries first),
/// and anything else, mismatched kinds included, is replaced by the overlay
/// value. Key order of `base` is preserved; keys only present in `overlay`
/// are appended in their own order.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                if let Some(existing) = base.get_mut(&key) {
                    let current = std::mem::take(existing);
                    *existing = deep_merge(current, value);
                } else {
                    base.insert(key, value);
                }
            }
            Value::Mapping(base)
        }
        (Value::Sequence(mut base), Value::Sequence(overlay)) => {
            base.extend(overlay);
            Value::Sequence(base)
        }
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Value {
        serde_yaml::from_str(content).unwrap()
    }

    #[test]
    fn test_deep_merge_nested_mappings() {
        let base = parse("dns:\n  enable: true\n  ipv6: false\nmode: rule");
        let overlay = parse("dns:\n  ipv6: true\nlog-level: debug");

        let merged = deep_merge(base, overlay);
        let map = merged.as_mapping().unwrap();

        let dns = get_key(map, "dns").unwrap().as_mapping().unwrap();
        assert_eq!(get_key(dns, "enable").unwrap(), &Value::Bool(true));
        assert_eq!(get_key(dns, "ipv6").unwrap(), &Value::Bool(true));
        assert_eq!(
            get_key(map, "log-level").unwrap().as_str().unwrap(),
            "debug"
        );
        assert_eq!(get_key(map, "mode").unwrap().as_str().unwrap(), "rule");
    }

    #[test]
    fn test_deep_merge_preserves_base_key_order() {
        let base = parse("a: 1\nb: 2\nc: 3");
        let overlay = parse("b: 20\nd: 4");

        let merged = deep_merge(base, overlay);
        let keys: Vec<String> = merged
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();

        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_deep_merge_concatenates_sequences() {
        let base = parse("ns:\n  - 1.1.1.1");
        let overlay = parse("ns:\n  - 8.8.8.8");

        let merged = deep_merge(base, overlay);
        let ns = merged.get("ns").unwrap().as_sequence().unwrap();
        assert_eq!(ns.len(), 2);
        assert_eq!(ns[0].as_str().unwrap(), "1.1.1.1");
        assert_eq!(ns[1].as_str().unwrap(), "8.8.8.8");
    }

    #[test]
    fn test_deep_merge_mismatched_kinds_replace() {
        let base = parse("port: 7890");
        let overlay = parse("port:\n  - 7890\n  - 7891");

        let merged = deep_merge(base, overlay);
        assert!(merged.get("port").unwrap().is_sequence());
    }
}
