//! Serialization formatter. Renders a [`Value`] tree back to JSON text.
//!
//! Two layouts are supported:
//!
//! - **Compact**: the minimal token sequence, no insignificant whitespace
//!   (`{"a":[1,2]}`). Used whenever a document is written back to its
//!   variable and for array/object renderings in fetch results.
//! - **Pretty**: two spaces of indentation per level, one member per line,
//!   `"key": value` separators, empty containers kept on one line.
//!
//! Both go through `serde_json` (its `Display` impl, `{:#}` for pretty), so
//! escaping and number text are exactly what the parser reads back.

use crate::value::Value;

/// Render `value` with no insignificant whitespace.
pub fn to_compact(value: &Value) -> String {
    serde_json::Value::from(value).to_string()
}

/// Render `value` with two-space indentation.
pub fn to_pretty(value: &Value) -> String {
    format!("{:#}", serde_json::Value::from(value))
}

/// Format a number as JSON text, the same way it appears inside a rendered
/// document. Integral values carry no fractional part (`5`, not `5.0`),
/// negative zero is `0`, and NaN or infinities become `null`.
pub fn format_number(n: f64) -> String {
    to_compact(&Value::Number(n))
}
