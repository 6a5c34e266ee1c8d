//! Operation facade: the seven entry points a host calls.
//!
//! Each call reads the document text from a named variable, does one step of
//! work, and (for the mutating operations) writes the compact document back
//! to the same variable. Every call writes `UNDECIDED` to [`RESULT_VAR`]
//! first and exactly one final [`Status`] afterwards; on any failure the
//! document variable is left untouched.
//!
//! | entry point | host name | arguments |
//! |---|---|---|
//! | [`JsonOps::pretty`] | `JSONPRETTY` | var |
//! | [`JsonOps::compress`] | `JSONCOMPRESS` | var |
//! | [`JsonOps::element`] | `JSONELEMENT` | var, path |
//! | [`JsonOps::variables`] | `jsonvariables` | var |
//! | [`JsonOps::add`] | `jsonadd` | var, path, type, name, value |
//! | [`JsonOps::set`] | `jsonset` | var, path, value |
//! | [`JsonOps::delete`] | `jsondelete` | var, path |
//!
//! Empty text and absent arguments are treated the same.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Result, SlotError};
use crate::format::{to_compact, to_pretty};
use crate::mutate::{self, Fetched};
use crate::path::{resolve, Path};
use crate::status::Status;
use crate::store::{VariableStore, RESULT_VAR, TYPE_VAR};
use crate::value::{self, Map, TypeTag, Value};

/// The operations, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Pretty,
    Compress,
    Element,
    Variables,
    Add,
    Set,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Pretty,
        Operation::Compress,
        Operation::Element,
        Operation::Variables,
        Operation::Add,
        Operation::Set,
        Operation::Delete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Pretty => "pretty",
            Operation::Compress => "compress",
            Operation::Element => "get",
            Operation::Variables => "variables",
            Operation::Add => "add",
            Operation::Set => "set",
            Operation::Delete => "delete",
        }
    }

    /// Name under which the host registers the operation.
    pub fn host_name(self) -> &'static str {
        match self {
            Operation::Pretty => "JSONPRETTY",
            Operation::Compress => "JSONCOMPRESS",
            Operation::Element => "JSONELEMENT",
            Operation::Variables => "jsonvariables",
            Operation::Add => "jsonadd",
            Operation::Set => "jsonset",
            Operation::Delete => "jsondelete",
        }
    }

    /// Functions return text to the caller; applications only set variables.
    pub fn returns_text(self) -> bool {
        matches!(
            self,
            Operation::Pretty | Operation::Compress | Operation::Element
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| {
                op.name().eq_ignore_ascii_case(s) || op.host_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("unknown operation: '{}'", s))
    }
}

/// Result of [`JsonOps::invoke`]: the final status and, for functions, the
/// returned text (empty on failure).
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: Status,
    pub output: Option<String>,
}

/// Stateless operation runner over an injected [`VariableStore`].
#[derive(Debug, Default)]
pub struct JsonOps<S> {
    store: S,
}

impl<S: VariableStore> JsonOps<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Status written by the most recent call.
    pub fn last_status(&self) -> Status {
        self.store
            .get(RESULT_VAR)
            .and_then(|s| s.parse().ok())
            .unwrap_or(Status::Undecided)
    }

    /// Dispatch by operation with positional arguments; missing trailing
    /// arguments are empty.
    pub fn invoke(&mut self, op: Operation, args: &[&str]) -> Outcome {
        let arg = |i: usize| args.get(i).copied().unwrap_or("");
        let output = match op {
            Operation::Pretty => Some(self.pretty(arg(0))),
            Operation::Compress => Some(self.compress(arg(0))),
            Operation::Element => Some(self.element(arg(0), arg(1))),
            Operation::Variables => {
                self.variables(arg(0));
                None
            }
            Operation::Add => {
                self.add(arg(0), arg(1), arg(2), arg(3), arg(4));
                None
            }
            Operation::Set => {
                self.set(arg(0), arg(1), arg(2));
                None
            }
            Operation::Delete => {
                self.delete(arg(0), arg(1));
                None
            }
        };
        Outcome {
            status: self.last_status(),
            output,
        }
    }

    /// Pretty-print the document held in `var`. The variable is not changed.
    pub fn pretty(&mut self, var: &str) -> String {
        self.begin();
        let outcome = self.load(var).map(|doc| to_pretty(&doc));
        self.settle(Operation::Pretty, outcome).unwrap_or_default()
    }

    /// Minimal rendering of the document held in `var`. The variable is not
    /// changed.
    pub fn compress(&mut self, var: &str) -> String {
        self.begin();
        let outcome = self.load(var).map(|doc| to_compact(&doc));
        self.settle(Operation::Compress, outcome).unwrap_or_default()
    }

    /// Fetch the element at `path`, setting [`TYPE_VAR`] to its type tag.
    ///
    /// An empty path returns the stored document text as-is, without
    /// parsing it and without setting a type.
    pub fn element(&mut self, var: &str, path: &str) -> String {
        self.begin();
        let outcome = self.fetch_element(var, path);
        match self.settle(Operation::Element, outcome) {
            Ok(Some(fetched)) => {
                self.store.set(TYPE_VAR, fetched.tag.as_str());
                fetched.text
            }
            Ok(None) => self.store.get(var).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    /// Copy each member of a top-level object into a variable of the same
    /// name (arrays are stored as `!array!`).
    pub fn variables(&mut self, var: &str) -> Status {
        self.begin();
        let outcome = self.flatten(var);
        if let Ok(pairs) = &outcome {
            for (name, text) in pairs {
                self.store.set(name, text);
            }
        }
        self.settle(Operation::Variables, outcome)
            .err()
            .unwrap_or(Status::Ok)
    }

    /// Create a value of `type_token` from `value` and add it at `path`.
    ///
    /// An unset or empty document is created on the fly; see
    /// [`fresh_document`] for its shape. `path` is ignored in that case.
    pub fn add(
        &mut self,
        var: &str,
        path: &str,
        type_token: &str,
        name: &str,
        value: &str,
    ) -> Status {
        self.begin();
        let outcome = self.add_element(var, path, type_token, name, value);
        self.commit(Operation::Add, var, outcome)
    }

    /// Type-preserving replace of the element at `path`.
    pub fn set(&mut self, var: &str, path: &str, value: &str) -> Status {
        self.begin();
        let outcome = self.set_element(var, path, value);
        self.commit(Operation::Set, var, outcome)
    }

    /// Remove the element at `path`. An empty path succeeds without touching
    /// the document.
    pub fn delete(&mut self, var: &str, path: &str) -> Status {
        self.begin();
        let outcome = self.delete_element(var, path);
        self.commit(Operation::Delete, var, outcome)
    }

    fn begin(&mut self) {
        self.store.set(RESULT_VAR, Status::Undecided.as_str());
    }

    /// Record the final status; failures are logged and collapsed to their
    /// status code.
    fn settle<T>(&mut self, op: Operation, outcome: Result<T>) -> std::result::Result<T, Status> {
        let status = match &outcome {
            Ok(_) => Status::Ok,
            Err(e) => {
                warn!(op = op.host_name(), error = %e, "json operation failed");
                e.status()
            }
        };
        self.store.set(RESULT_VAR, status.as_str());
        outcome.map_err(|_| status)
    }

    /// Write a mutated document back (if any) and record the status.
    fn commit(&mut self, op: Operation, var: &str, outcome: Result<Option<String>>) -> Status {
        match self.settle(op, outcome) {
            Ok(Some(text)) => {
                debug!(op = op.host_name(), var, result = %text, "document updated");
                self.store.set(var, &text);
                Status::Ok
            }
            Ok(None) => Status::Ok,
            Err(status) => status,
        }
    }

    /// Document text, with unset and empty collapsed to `None`.
    fn source(&self, var: &str) -> Option<String> {
        self.store.get(var).filter(|text| !text.is_empty())
    }

    fn load(&self, var: &str) -> Result<Value> {
        let var = require(var, "variable name")?;
        let text = self.store.get(var).unwrap_or_default();
        value::parse(&text)
    }

    fn fetch_element(&self, var: &str, path: &str) -> Result<Option<Fetched>> {
        require(var, "variable name")?;
        if path.is_empty() {
            warn!(var, "path is empty, returning full json");
            return Ok(None);
        }
        let doc = self.load(var)?;
        let path = Path::parse(path);
        let resolution = resolve(&doc, &path)?;
        Ok(Some(mutate::fetch(resolution.node)))
    }

    fn flatten(&self, var: &str) -> Result<Vec<(String, String)>> {
        let doc = self.load(var)?;
        Ok(mutate::flatten_variables(&doc))
    }

    fn add_element(
        &self,
        var: &str,
        path: &str,
        type_token: &str,
        name: &str,
        value: &str,
    ) -> Result<Option<String>> {
        let var = require(var, "variable name")?;
        let tag = mutate::parse_type(require(type_token, "element type")?)?;
        let element = mutate::build_value(tag, value);

        let doc = match self.source(var) {
            None => {
                if !path.is_empty() {
                    warn!(var, path, "document is empty, adding element to a new root");
                }
                fresh_document(name, element)?
            }
            Some(text) => {
                let mut doc = value::parse(&text)?;
                let path = Path::parse(path);
                debug!(var, %path, element = tag.as_str(), "adding element");
                mutate::insert(&mut doc, &path, name, element)?;
                doc
            }
        };
        Ok(Some(to_compact(&doc)))
    }

    fn set_element(&self, var: &str, path: &str, value: &str) -> Result<Option<String>> {
        let var = require(var, "variable name")?;
        let text = self
            .source(var)
            .ok_or_else(|| SlotError::InvalidType("source json is empty".to_string()))?;
        let mut doc = value::parse(&text)?;
        let path = Path::parse(path);
        debug!(var, %path, "setting element");
        mutate::replace(&mut doc, &path, value)?;
        Ok(Some(to_compact(&doc)))
    }

    fn delete_element(&self, var: &str, path: &str) -> Result<Option<String>> {
        let var = require(var, "variable name")?;
        let path = Path::parse(path);
        if path.is_root() {
            warn!(var, "path is empty, will not delete the whole document");
            return Ok(None);
        }
        let text = self.source(var).ok_or_else(|| SlotError::NotFound {
            segment: path.to_string(),
            depth: 0,
        })?;
        let mut doc = value::parse(&text)?;
        debug!(var, %path, "deleting element");
        mutate::delete(&mut doc, &path)?;
        Ok(Some(to_compact(&doc)))
    }
}

/// Root for an add into an unset or empty document.
///
/// Without a `name`, an array or node element becomes the document itself
/// and any other element is wrapped in a new array. With a `name`, the
/// element is stored under it in a new node.
pub fn fresh_document(name: &str, element: Value) -> Result<Value> {
    if name.is_empty() {
        return Ok(match element.type_tag() {
            TypeTag::Array | TypeTag::Node => element,
            _ => Value::Array(vec![element]),
        });
    }
    let mut root = Value::Object(Map::new());
    mutate::insert(&mut root, &Path::root(), name, element)?;
    Ok(root)
}

fn require<'a>(arg: &'a str, what: &'static str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(SlotError::MissingArgument(what))
    } else {
        Ok(arg)
    }
}
