//! Mutation engine: fetch, insert, type-preserving replace and delete.
//!
//! All functions here work on an already-parsed document root and a parsed
//! [`Path`]. They either complete the mutation or return an error having
//! changed nothing; a replacement value that cannot be placed is dropped.

use crate::error::{Result, SlotError};
use crate::format::{format_number, to_compact};
use crate::path::{resolve_mut, Location, Path};
use crate::value::{parse, Map, TypeTag, Value};

/// Rendering of a fetched node: its type tag and its value as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub tag: TypeTag,
    pub text: String,
}

/// Render a node for the caller:
///
/// | type | text |
/// |---|---|
/// | bool | `1` / `0` |
/// | null | empty |
/// | number | decimal text |
/// | string | the raw string, unquoted |
/// | array, node | compact JSON |
pub fn fetch(node: &Value) -> Fetched {
    let text = match node {
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Null => String::new(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => to_compact(node),
    };
    Fetched {
        tag: node.type_tag(),
        text,
    }
}

/// Values that read as `false`, compared case-insensitively. Anything else
/// is `true`.
const FALSY: [&str; 6] = ["", "0", "n", "no", "f", "false"];

pub fn coerce_bool(text: &str) -> bool {
    !FALSY.iter().any(|f| f.eq_ignore_ascii_case(text))
}

/// Parse the longest decimal-number prefix of `text`, like C `atof`.
///
/// Leading whitespace is skipped. Text without a numeric prefix, and values
/// that overflow to infinity, yield `0`. `inf` and `nan` are not accepted.
pub fn coerce_number(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    while is_digit(end) {
        end += 1;
        digits += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        let mut frac = end + 1;
        while is_digit(frac) {
            frac += 1;
            digits += 1;
        }
        if digits > 0 {
            end = frac;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = exp;
        while is_digit(exp) {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }
    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Parse a type token (`bool`, `null`, `number`, `string`, `array`, `node`).
/// Any other token is a malformed argument.
pub fn parse_type(token: &str) -> Result<TypeTag> {
    token.parse::<TypeTag>().map_err(SlotError::MalformedArgument)
}

/// Build a fresh value of type `tag` from raw text. `null`, `array` and
/// `node` ignore the text.
pub fn build_value(tag: TypeTag, text: &str) -> Value {
    match tag {
        TypeTag::Bool => Value::Bool(coerce_bool(text)),
        TypeTag::Null => Value::Null,
        TypeTag::Number => Value::Number(coerce_number(text)),
        TypeTag::String => Value::String(text.to_string()),
        TypeTag::Array => Value::Array(Vec::new()),
        TypeTag::Node => Value::Object(Map::new()),
    }
}

/// Add `value` to the container at `path`: appended if the target is an
/// array (`name` is ignored), stored under `name` if it is an object
/// (replacing any existing value for that key). Adding into an object
/// without a name fails.
pub fn insert(root: &mut Value, path: &Path, name: &str, value: Value) -> Result<()> {
    let mut location = resolve_mut(root, path)?;
    let target = location
        .node_mut()
        .ok_or_else(|| SlotError::AddFailed(format!("'{}' vanished", path)))?;
    match target {
        Value::Array(arr) => {
            arr.push(value);
            Ok(())
        }
        Value::Object(_) if name.is_empty() => Err(SlotError::AddFailed(
            "a name is needed to add into a node".to_string(),
        )),
        Value::Object(map) => {
            map.insert(name, value);
            Ok(())
        }
        other => Err(SlotError::AddFailed(format!(
            "cannot add into a {} element",
            other.type_tag()
        ))),
    }
}

/// Build the replacement for `current` from `text`, keeping its type.
///
/// Objects take `text` as a JSON object literal. Null and array nodes have
/// no coercion and are rejected.
pub fn coerce_like(current: &Value, text: &str) -> Result<Value> {
    match current {
        Value::Bool(_) => Ok(Value::Bool(coerce_bool(text))),
        Value::Number(_) => Ok(Value::Number(coerce_number(text))),
        Value::String(_) => Ok(Value::String(text.to_string())),
        Value::Object(_) => match parse(text) {
            Ok(fragment @ Value::Object(_)) => Ok(fragment),
            Ok(other) => Err(SlotError::InvalidType(format!(
                "a node can only be replaced by a node, got {}",
                other.type_tag()
            ))),
            Err(e) => Err(SlotError::InvalidType(format!(
                "replacement node is not valid JSON: {}",
                e
            ))),
        },
        Value::Null | Value::Array(_) => Err(SlotError::InvalidType(format!(
            "cannot set the value of a {} element",
            current.type_tag()
        ))),
    }
}

/// Type-preserving replace of the node at `path`. The root cannot be
/// replaced: an empty path is reported as not found.
pub fn replace(root: &mut Value, path: &Path, text: &str) -> Result<()> {
    if path.is_root() {
        return Err(SlotError::NotFound {
            segment: String::new(),
            depth: 0,
        });
    }
    match resolve_mut(root, path)? {
        Location::Child { parent, segment } => {
            let current = parent
                .child(segment)
                .ok_or_else(|| SlotError::SetFailed(format!("'{}' vanished", path)))?;
            let replacement = coerce_like(current, text)?;
            parent
                .replace_child(segment, replacement)
                .map(|_| ())
                .ok_or_else(|| SlotError::SetFailed(format!("cannot write back '{}'", path)))
        }
        Location::Root(_) => Err(SlotError::SetFailed("root has no parent".to_string())),
    }
}

/// Remove the node at `path` from its parent and return it.
///
/// An empty path is a no-op: it never clears the whole document
/// and returns `Ok(None)`.
pub fn delete(root: &mut Value, path: &Path) -> Result<Option<Value>> {
    match resolve_mut(root, path)? {
        Location::Root(_) => Ok(None),
        Location::Child { parent, segment } => parent
            .remove_child(segment)
            .map(Some)
            .ok_or_else(|| SlotError::DeleteFailed(format!("cannot remove '{}'", path))),
    }
}

/// Marker stored for array members when flattening a document into
/// variables; arrays have no single-variable rendering.
pub const ARRAY_MARKER: &str = "!array!";

/// Flatten the members of a top-level object into `(name, text)` pairs using
/// the [`fetch`] renderings, except arrays which become [`ARRAY_MARKER`].
/// A non-object document yields nothing.
pub fn flatten_variables(doc: &Value) -> Vec<(String, String)> {
    let Some(map) = doc.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Array(_) => ARRAY_MARKER.to_string(),
                other => fetch(other).text,
            };
            (key.clone(), text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        parse(text).unwrap()
    }

    #[test]
    fn falsy_set_is_case_insensitive() {
        for text in ["", "0", "n", "N", "no", "NO", "f", "F", "false", "False"] {
            assert!(!coerce_bool(text), "{text:?} should be false");
        }
        for text in ["1", "yes", "true", " ", "off", "nope"] {
            assert!(coerce_bool(text), "{text:?} should be true");
        }
    }

    #[test]
    fn number_coercion_follows_atof() {
        assert_eq!(coerce_number("42"), 42.0);
        assert_eq!(coerce_number("  -3.5"), -3.5);
        assert_eq!(coerce_number("+7"), 7.0);
        assert_eq!(coerce_number("12abc"), 12.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number("2e"), 2.0);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("5."), 5.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("-"), 0.0);
        assert_eq!(coerce_number("."), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("nan"), 0.0);
        assert_eq!(coerce_number("1e400"), 0.0);
    }

    #[test]
    fn fetch_renders_each_type() {
        let cases = [
            ("true", TypeTag::Bool, "1"),
            ("false", TypeTag::Bool, "0"),
            ("null", TypeTag::Null, ""),
            ("12", TypeTag::Number, "12"),
            ("1.25", TypeTag::Number, "1.25"),
            (r#""hi there""#, TypeTag::String, "hi there"),
            ("[1, 2]", TypeTag::Array, "[1,2]"),
            (r#"{"a": 1}"#, TypeTag::Node, r#"{"a":1}"#),
        ];
        for (src, tag, text) in cases {
            let fetched = fetch(&doc(src));
            assert_eq!(fetched.tag, tag, "{src}");
            assert_eq!(fetched.text, text, "{src}");
        }
    }

    #[test]
    fn build_value_ignores_text_for_containers() {
        assert_eq!(build_value(TypeTag::Array, "junk"), Value::Array(vec![]));
        assert_eq!(build_value(TypeTag::Node, "junk"), Value::Object(Map::new()));
        assert_eq!(build_value(TypeTag::Null, "junk"), Value::Null);
        assert_eq!(build_value(TypeTag::Number, "2.5"), Value::Number(2.5));
    }

    #[test]
    fn unknown_type_token_is_malformed() {
        assert!(matches!(parse_type("object"), Err(SlotError::MalformedArgument(_))));
        assert_eq!(parse_type("NODE").unwrap(), TypeTag::Node);
    }

    #[test]
    fn insert_appends_to_array_ignoring_name() {
        let mut root = doc(r#"{"v":[1]}"#);
        insert(&mut root, &Path::parse("v"), "ignored", Value::from("x")).unwrap();
        assert_eq!(to_compact(&root), r#"{"v":[1,"x"]}"#);
    }

    #[test]
    fn insert_into_object_overwrites_key() {
        let mut root = doc(r#"{"k":1,"z":2}"#);
        insert(&mut root, &Path::root(), "k", Value::Bool(true)).unwrap();
        assert_eq!(to_compact(&root), r#"{"k":true,"z":2}"#);
    }

    #[test]
    fn insert_into_object_needs_name() {
        let mut root = doc("{}");
        let err = insert(&mut root, &Path::root(), "", Value::Null).unwrap_err();
        assert!(matches!(err, SlotError::AddFailed(_)));
    }

    #[test]
    fn insert_into_scalar_fails() {
        let mut root = doc(r#"{"s":"text"}"#);
        let err = insert(&mut root, &Path::parse("s"), "x", Value::Null).unwrap_err();
        assert!(matches!(err, SlotError::AddFailed(_)));
        assert_eq!(to_compact(&root), r#"{"s":"text"}"#);
    }

    #[test]
    fn replace_keeps_node_type() {
        let mut root = doc(r#"{"n":5,"b":true,"s":"a"}"#);
        replace(&mut root, &Path::parse("n"), "abc").unwrap();
        replace(&mut root, &Path::parse("b"), "0").unwrap();
        replace(&mut root, &Path::parse("s"), "42").unwrap();
        assert_eq!(to_compact(&root), r#"{"n":0,"b":false,"s":"42"}"#);
    }

    #[test]
    fn replace_node_with_json_object() {
        let mut root = doc(r#"{"o":{"x":1}}"#);
        replace(&mut root, &Path::parse("o"), r#"{"y":[2]}"#).unwrap();
        assert_eq!(to_compact(&root), r#"{"o":{"y":[2]}}"#);
    }

    #[test]
    fn replace_node_rejects_non_object_fragment() {
        let mut root = doc(r#"{"o":{}}"#);
        let err = replace(&mut root, &Path::parse("o"), "[1]").unwrap_err();
        assert!(matches!(err, SlotError::InvalidType(_)));
        let err = replace(&mut root, &Path::parse("o"), "{oops").unwrap_err();
        assert!(matches!(err, SlotError::InvalidType(_)));
    }

    #[test]
    fn replace_null_and_array_fail() {
        let mut root = doc(r#"{"z":null,"a":[]}"#);
        for p in ["z", "a"] {
            let err = replace(&mut root, &Path::parse(p), "1").unwrap_err();
            assert_eq!(err.status(), crate::Status::InvalidType);
        }
    }

    #[test]
    fn replace_inside_array_by_index() {
        let mut root = doc(r#"[10,20,30]"#);
        replace(&mut root, &Path::parse("1"), "21").unwrap();
        assert_eq!(to_compact(&root), "[10,21,30]");
    }

    #[test]
    fn replace_empty_path_is_not_found() {
        let mut root = doc(r#"{"a":1}"#);
        let err = replace(&mut root, &Path::root(), "1").unwrap_err();
        assert!(matches!(err, SlotError::NotFound { .. }));
    }

    #[test]
    fn delete_shifts_array_elements() {
        let mut root = doc(r#"["a","b","c"]"#);
        let removed = delete(&mut root, &Path::parse("0")).unwrap();
        assert_eq!(removed, Some(Value::from("a")));
        assert_eq!(to_compact(&root), r#"["b","c"]"#);
    }

    #[test]
    fn delete_root_is_noop() {
        let mut root = doc(r#"{"a":1}"#);
        assert_eq!(delete(&mut root, &Path::root()).unwrap(), None);
        assert_eq!(to_compact(&root), r#"{"a":1}"#);
    }

    #[test]
    fn flatten_renders_members() {
        let root = doc(r#"{"b":true,"n":null,"x":1.5,"s":"t","a":[1],"o":{"k":2}}"#);
        let vars = flatten_variables(&root);
        let expected: Vec<(String, String)> = [
            ("b", "1"),
            ("n", ""),
            ("x", "1.5"),
            ("s", "t"),
            ("a", ARRAY_MARKER),
            ("o", r#"{"k":2}"#),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(vars, expected);
    }

    #[test]
    fn flatten_non_object_is_empty() {
        assert!(flatten_variables(&doc("[1,2]")).is_empty());
    }
}
