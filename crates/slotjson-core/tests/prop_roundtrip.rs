/// Property-based tests for the value model and the mutation engine.
///
/// Uses `proptest` to generate random `Value` trees and checks that:
/// - `parse(to_compact(v)) == v` and `parse(to_pretty(v)) == v`
/// - resolving a path twice yields the same node
/// - deleting index `i` shifts later elements down by one
/// - adding an existing key keeps exactly one entry for it
///
/// Numbers are generated as integers or as `mantissa / 10^n`, both of which
/// survive the decimal rendering without precision loss.
use proptest::prelude::*;
use slotjson_core::mutate::{delete, insert};
use slotjson_core::{parse, resolve, to_compact, to_pretty, Map, Path, Segment, Value};

// ============================================================================
// Strategies
// ============================================================================

/// Object keys that are never 1-3 digits, so every key is path-reachable.
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,10}").unwrap()
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        Just(String::new()),
        Just("say \"hi\"".to_string()),
        Just("back\\slash".to_string()),
        Just("line1\nline2\ttab".to_string()),
        Just("ctrl\u{01}char".to_string()),
        Just("caf\u{e9} \u{4f60}\u{597d}".to_string()),
        Just("a/b".to_string()),
    ]
}

fn arb_number() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64),
        (-100_000_000i64..100_000_000i64, 1u32..5u32)
            .prop_map(|(m, d)| m as f64 / 10f64.powi(d as i32)),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number().prop_map(Value::Number),
        arb_string().prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map>())),
        ]
    })
}

/// Collect every path that exists in `value`, root included.
fn all_paths(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<String>) {
    out.push(prefix.join("/"));
    match value {
        Value::Array(arr) => {
            for (i, child) in arr.iter().enumerate() {
                prefix.push(i.to_string());
                all_paths(child, prefix, out);
                prefix.pop();
            }
        }
        Value::Object(map) => {
            for (key, child) in map.iter() {
                prefix.push(key.clone());
                all_paths(child, prefix, out);
                prefix.pop();
            }
        }
        _ => {}
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn compact_roundtrip(v in arb_value()) {
        let text = to_compact(&v);
        prop_assert_eq!(parse(&text).unwrap(), v);
    }

    #[test]
    fn pretty_roundtrip(v in arb_value()) {
        let text = to_pretty(&v);
        prop_assert_eq!(parse(&text).unwrap(), v);
    }

    #[test]
    fn compact_rendering_is_stable(v in arb_value()) {
        let text = to_compact(&v);
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(to_compact(&reparsed), text);
    }

    #[test]
    fn resolution_is_deterministic(v in arb_value()) {
        let mut paths = Vec::new();
        all_paths(&v, &mut Vec::new(), &mut paths);
        for raw in paths {
            let path = Path::parse(&raw);
            let first = resolve(&v, &path).unwrap().node;
            let second = resolve(&v, &path).unwrap().node;
            prop_assert!(std::ptr::eq(first, second), "path {}", raw);
        }
    }

    #[test]
    fn delete_shifts_array(
        items in prop::collection::vec(arb_leaf(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let i = pick.index(items.len());
        let mut root = Value::Array(items.clone());
        let path = Path::parse(&i.to_string());
        let removed = delete(&mut root, &path).unwrap();
        prop_assert_eq!(removed.as_ref(), Some(&items[i]));

        let arr = root.as_array().unwrap();
        prop_assert_eq!(arr.len(), items.len() - 1);
        if i + 1 < items.len() {
            prop_assert_eq!(&arr[i], &items[i + 1]);
        }
    }

    #[test]
    fn insert_existing_key_stays_unique(
        entries in prop::collection::vec((arb_key(), arb_leaf()), 1..10),
        pick in any::<prop::sample::Index>(),
        replacement in arb_leaf(),
    ) {
        let mut root = Value::Object(entries.into_iter().collect::<Map>());
        let keys: Vec<String> = root.as_object().unwrap().keys().cloned().collect();
        let key = keys[pick.index(keys.len())].clone();
        let before = keys.len();

        insert(&mut root, &Path::root(), &key, replacement.clone()).unwrap();

        let map = root.as_object().unwrap();
        prop_assert_eq!(map.len(), before);
        prop_assert_eq!(map.keys().filter(|k| **k == key).count(), 1);
        prop_assert_eq!(root.child(&Segment::Key(key.clone())), Some(&replacement));
    }
}
