#![deny(clippy::all)]

//! Static symbol inference for JavaScript sources.
//!
//! This crate provides:
//! - An abstract interpreter that partially evaluates a program into a graph
//!   of symbols, objects and functions without running it.
//! - A documentation-comment handler whose tags refine that graph while it
//!   is being built.
//! - A symbol table builder that flattens the graph into qualified ids
//!   (`Foo`, `Foo#bar`, `ns.util`) with derived structural tags.
//! - Position queries (scope, member and completion lookup) for editors.
//!
//! ```no_run
//! use fob_infer::{Inference, TableOptions};
//!
//! let mut inference = Inference::default();
//! inference.compile("app.js", "var a = 10;")?;
//! let table = inference.symbols(TableOptions::default());
//! assert!(table.contains("a"));
//! # Ok::<(), fob_infer::InferError>(())
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod heap;
pub mod jsdoc;
pub mod parser;
pub mod report;
pub mod scope;
pub mod symbol;
pub mod syntax;
pub mod table;
pub mod tags;
pub mod types;
pub mod value;

mod engine;
mod handler;
mod walker;

pub use config::{Environment, InferOptions};
pub use engine::{Inference, Lookup};
pub use error::{InferError, Result};
pub use report::{Diagnostic, DiagnosticKind, LogReporter, Reporter};
pub use symbol::{Location, Symbol};
pub use table::{SymbolRecord, SymbolTable, TableOptions};
pub use tags::{TagValue, Tags};
pub use types::{Category, TypeSet};
pub use value::{ObjectId, SymbolId, Value};
