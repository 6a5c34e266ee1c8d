//! # slotjson-core
//!
//! Path-addressed JSON reads and writes for scripting hosts that keep
//! documents as plain text in named variables.
//!
//! Nothing is held between calls: every operation parses the document out of
//! its variable, performs one step (fetch, add, type-preserving set, delete,
//! reformat), writes the compact result back and reports a [`Status`] in the
//! `RESULT` variable.
//!
//! ## Quick start
//!
//! ```rust
//! use slotjson_core::{JsonOps, MemoryStore, Status, VariableStore};
//!
//! let mut ops = JsonOps::new(MemoryStore::new().with("doc", r#"{"v":[]}"#));
//!
//! assert_eq!(ops.add("doc", "v", "string", "", "x"), Status::Ok);
//! assert_eq!(ops.store().get("doc").unwrap(), r#"{"v":["x"]}"#);
//!
//! assert_eq!(ops.element("doc", "/v/0"), "x");
//! assert_eq!(ops.store().get("TYPE").unwrap(), "string");
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value` tree, parsing
//! - [`format`]: compact and pretty rendering
//! - [`path`]: path parsing and resolution
//! - [`mutate`]: fetch/insert/replace/delete on a parsed tree
//! - [`ops`]: the host-facing operations and status reporting
//! - [`store`]: the variable store abstraction
//! - [`status`]: result codes
//! - [`error`]: error types

pub mod error;
pub mod format;
pub mod mutate;
pub mod ops;
pub mod path;
pub mod status;
pub mod store;
pub mod value;

pub use error::SlotError;
pub use format::{to_compact, to_pretty};
pub use mutate::{fetch, Fetched};
pub use ops::{JsonOps, Operation, Outcome};
pub use path::{resolve, resolve_mut, Location, Path, Resolution, Segment};
pub use status::Status;
pub use store::{MemoryStore, VariableStore, RESULT_VAR, TYPE_VAR};
pub use value::{parse, Map, TypeTag, Value};
