//! WASM bindings for slotjson-core.
//!
//! Each function takes the document text directly instead of a variable
//! name. Mutations return the updated document text; failures throw a JS
//! error whose message is the status name (`NOTFOUND`, `SET_FAILED`, ...).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slotjson-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slotjson-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slotjson_wasm.wasm
//! ```

use slotjson_core::{JsonOps, MemoryStore, Status, VariableStore, TYPE_VAR};
use wasm_bindgen::prelude::*;

const DOC: &str = "doc";

fn ops_for(doc: &str) -> JsonOps<MemoryStore> {
    JsonOps::new(MemoryStore::new().with(DOC, doc))
}

fn checked<T>(ops: &JsonOps<MemoryStore>, value: T) -> Result<T, Status> {
    match ops.last_status() {
        Status::Ok => Ok(value),
        status => Err(status),
    }
}

/// Run a mutation and hand back the rewritten document.
fn mutated(
    doc: &str,
    apply: impl FnOnce(&mut JsonOps<MemoryStore>) -> Status,
) -> Result<String, Status> {
    let mut ops = ops_for(doc);
    match apply(&mut ops) {
        Status::Ok => Ok(ops.store().get(DOC).unwrap_or_default()),
        status => Err(status),
    }
}

fn pretty_text(doc: &str) -> Result<String, Status> {
    let mut ops = ops_for(doc);
    let text = ops.pretty(DOC);
    checked(&ops, text)
}

fn compress_text(doc: &str) -> Result<String, Status> {
    let mut ops = ops_for(doc);
    let text = ops.compress(DOC);
    checked(&ops, text)
}

fn element_with_type(doc: &str, path: &str) -> Result<(String, String), Status> {
    let mut ops = ops_for(doc);
    let text = ops.element(DOC, path);
    let tag = ops.store().get(TYPE_VAR).unwrap_or_default();
    checked(&ops, (text, tag))
}

fn to_js(status: Status) -> JsValue {
    JsValue::from_str(status.as_str())
}

/// Reformat a JSON document with two-space indentation.
#[wasm_bindgen]
pub fn pretty(doc: &str) -> std::result::Result<String, JsValue> {
    pretty_text(doc).map_err(to_js)
}

/// Reformat a JSON document with no insignificant whitespace.
#[wasm_bindgen]
pub fn compress(doc: &str) -> std::result::Result<String, JsValue> {
    compress_text(doc).map_err(to_js)
}

/// Text of the element at `path`.
#[wasm_bindgen]
pub fn get(doc: &str, path: &str) -> std::result::Result<String, JsValue> {
    element_with_type(doc, path)
        .map(|(text, _)| text)
        .map_err(to_js)
}

/// Type tag (`bool`, `null`, `number`, `string`, `array`, `node`) of the
/// element at `path`.
#[wasm_bindgen(js_name = typeOf)]
pub fn type_of(doc: &str, path: &str) -> std::result::Result<String, JsValue> {
    element_with_type(doc, path)
        .map(|(_, tag)| tag)
        .map_err(to_js)
}

/// Add an element under `path`; an empty `doc` starts a new document.
#[wasm_bindgen]
pub fn add(
    doc: &str,
    path: &str,
    type_token: &str,
    name: &str,
    value: &str,
) -> std::result::Result<String, JsValue> {
    mutated(doc, |ops| ops.add(DOC, path, type_token, name, value)).map_err(to_js)
}

/// Replace the element at `path`, coercing `value` to its current type.
#[wasm_bindgen]
pub fn set(doc: &str, path: &str, value: &str) -> std::result::Result<String, JsValue> {
    mutated(doc, |ops| ops.set(DOC, path, value)).map_err(to_js)
}

/// Delete the element at `path`.
#[wasm_bindgen]
pub fn remove(doc: &str, path: &str) -> std::result::Result<String, JsValue> {
    mutated(doc, |ops| ops.delete(DOC, path)).map_err(to_js)
}
