//! In-memory JSON value tree.
//!
//! Documents are parsed with `serde_json` and immediately converted into
//! [`Value`], a closed sum type whose numbers are always `f64`. Objects keep
//! their keys in insertion order using a `Vec<(String, Value)>` body, so the
//! document re-serializes with its original key order.

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::path::Segment;

/// One JSON node. Every array and object exclusively owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Integral and fractional JSON numbers share one representation.
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

/// Runtime type tag of a [`Value`], using the names reported in `TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Null,
    Number,
    String,
    Array,
    /// A JSON object.
    Node,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Null => "null",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Node => "node",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    /// Type tokens are matched case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = match s.to_ascii_lowercase().as_str() {
            "bool" => TypeTag::Bool,
            "null" => TypeTag::Null,
            "number" => TypeTag::Number,
            "string" => TypeTag::String,
            "array" => TypeTag::Array,
            "node" => TypeTag::Node,
            _ => return Err(format!("unsupported element type '{}'", s)),
        };
        Ok(tag)
    }
}

/// Insertion-ordered object body with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set `key` to `value`. An existing key keeps its position and the
    /// previous value is returned; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove `key`, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Parse JSON text into a [`Value`] tree.
///
/// Any JSON value is accepted at the top level. Empty or whitespace-only
/// text is a parse error, as is anything `serde_json` rejects.
pub fn parse(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from(json))
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Node,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The child named by `segment`. An index only addresses arrays and a
    /// key only addresses objects.
    pub fn child(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Value::Array(arr), Segment::Index(i)) => arr.get(*i),
            (Value::Object(map), Segment::Key(k)) => map.get(k),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, segment: &Segment) -> Option<&mut Value> {
        match (self, segment) {
            (Value::Array(arr), Segment::Index(i)) => arr.get_mut(*i),
            (Value::Object(map), Segment::Key(k)) => map.get_mut(k),
            _ => None,
        }
    }

    /// Overwrite an existing child slot, returning the previous value.
    /// Returns `None` (and drops `value`) when the slot does not exist.
    pub fn replace_child(&mut self, segment: &Segment, value: Value) -> Option<Value> {
        self.child_mut(segment)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Remove a child. Array removal shifts later elements down by one.
    pub fn remove_child(&mut self, segment: &Segment) -> Option<Value> {
        match (self, segment) {
            (Value::Array(arr), Segment::Index(i)) if *i < arr.len() => Some(arr.remove(*i)),
            (Value::Object(map), Segment::Key(k)) => map.remove(k),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(f) => {
                if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
                    serde_json::Value::from(*f as i64)
                } else {
                    serde_json::Number::from_f64(*f)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl fmt::Display for Value {
    /// Compact JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::to_compact(self))
    }
}
