//! `slotjson` CLI: run path-addressed JSON operations against a store file.
//!
//! The store file is a flat JSON object mapping variable names to strings.
//! It plays the role of the host's variable table: documents are kept there
//! as text, and every operation writes its status to `RESULT` (and fetches
//! write `TYPE`). The process exit code is the numeric status code.
//!
//! ## Usage
//!
//! ```sh
//! # Load a document into variable "doc"
//! echo '{"caller":{"name":"Alice"},"tags":[]}' | slotjson put doc
//!
//! # Read an element (prints "Alice", TYPE=string)
//! slotjson get doc /caller/name
//!
//! # Append to an array, set a value, delete an element
//! slotjson add doc tags string "" vip
//! slotjson set doc caller/name Bob
//! slotjson delete doc tags/0
//!
//! # Reformat
//! slotjson pretty doc
//!
//! # Dispatch by host operation name
//! slotjson exec JSONELEMENT doc caller/name
//!
//! # Use another store file, with debug logging
//! slotjson --store vars.json --log-level debug compress doc
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use slotjson_core::{JsonOps, MemoryStore, Operation, Status, VariableStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slotjson",
    version,
    about = "Path-addressed JSON get/add/set/delete on documents kept in a variable store"
)]
struct Cli {
    /// JSON file holding the named variables (created on first write)
    #[arg(short, long, default_value = "slotjson-vars.json")]
    store: PathBuf,

    /// Log filter, e.g. "debug" (defaults to RUST_LOG, then "warn")
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document nicely formatted
    Pretty {
        /// Variable holding the document
        var: String,
    },
    /// Print the document with no insignificant whitespace
    Compress {
        /// Variable holding the document
        var: String,
    },
    /// Print the element at a path; its type is stored in TYPE
    Get {
        /// Variable holding the document
        var: String,
        /// Path like /path/to/element or /list/3 (whole document if omitted)
        path: Option<String>,
    },
    /// Copy each member of a top-level object into a variable of that name
    Vars {
        /// Variable holding the document
        var: String,
    },
    /// Add an element (appended to arrays, stored under NAME in nodes)
    Add {
        /// Variable holding the document
        var: String,
        /// Path to the container ("" for the root)
        path: String,
        /// Element type: bool, null, number, string, array or node
        #[arg(value_name = "TYPE")]
        type_token: String,
        /// Key for the new element when the container is a node
        name: Option<String>,
        /// Element value (ignored for null, array and node)
        value: Option<String>,
    },
    /// Change the value of an element, keeping its type
    Set {
        /// Variable holding the document
        var: String,
        /// Path to the element
        path: String,
        /// New value (a JSON object literal when the element is a node)
        value: Option<String>,
    },
    /// Remove an element (an empty path does nothing)
    Delete {
        /// Variable holding the document
        var: String,
        /// Path to the element
        path: Option<String>,
    },
    /// Store raw text (from a file or stdin) in a variable
    Put {
        /// Variable to fill
        var: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the raw text of a variable
    Show {
        /// Variable to print
        var: String,
    },
    /// Run an operation by name (e.g. jsonadd, JSONELEMENT) with positional arguments
    Exec {
        /// Operation name
        operation: String,
        /// Positional arguments, in host order
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let store = load_store(&cli.store)?;
    let mut ops = JsonOps::new(store);

    let (status, output) = run(&mut ops, cli.command)?;

    save_store(&cli.store, ops.store())?;
    if let Some(text) = output {
        println!("{}", text);
    }
    process::exit(i32::from(status.code()));
}

/// Execute one command. Returns the status and the text to print, if any.
fn run(ops: &mut JsonOps<MemoryStore>, command: Commands) -> Result<(Status, Option<String>)> {
    let text_if_ok = |ops: &JsonOps<MemoryStore>, text: String| {
        let status = ops.last_status();
        (status, status.is_ok().then_some(text))
    };

    let outcome = match command {
        Commands::Pretty { var } => {
            let text = ops.pretty(&var);
            text_if_ok(ops, text)
        }
        Commands::Compress { var } => {
            let text = ops.compress(&var);
            text_if_ok(ops, text)
        }
        Commands::Get { var, path } => {
            let text = ops.element(&var, path.as_deref().unwrap_or(""));
            text_if_ok(ops, text)
        }
        Commands::Vars { var } => (ops.variables(&var), None),
        Commands::Add {
            var,
            path,
            type_token,
            name,
            value,
        } => {
            let status = ops.add(
                &var,
                &path,
                &type_token,
                name.as_deref().unwrap_or(""),
                value.as_deref().unwrap_or(""),
            );
            (status, None)
        }
        Commands::Set { var, path, value } => {
            (ops.set(&var, &path, value.as_deref().unwrap_or("")), None)
        }
        Commands::Delete { var, path } => {
            (ops.delete(&var, path.as_deref().unwrap_or("")), None)
        }
        Commands::Put { var, input } => {
            let text = read_input(input.as_deref())?;
            ops.store_mut().set(&var, text.trim_end_matches('\n'));
            (Status::Ok, None)
        }
        Commands::Show { var } => (Status::Ok, ops.store().get(&var)),
        Commands::Exec { operation, args } => {
            let op: Operation = operation.parse().map_err(|e: String| anyhow!(e))?;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let outcome = ops.invoke(op, &args);
            let printable = op.returns_text() && outcome.status.is_ok();
            (outcome.status, outcome.output.filter(|_| printable))
        }
    };
    Ok(outcome)
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
    Ok(())
}

fn load_store(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        debug!(store = %path.display(), "store file not found, starting empty");
        return Ok(MemoryStore::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file: {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(MemoryStore::new());
    }
    let store = MemoryStore::from_json(&text)
        .with_context(|| format!("Store file is not a JSON object of strings: {}", path.display()))?;
    debug!(store = %path.display(), vars = store.len(), "store loaded");
    Ok(store)
}

fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let text = store.to_json().context("Failed to serialize store")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write store file: {}", path.display()))?;
    debug!(store = %path.display(), vars = store.len(), "store saved");
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
