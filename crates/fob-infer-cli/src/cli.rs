//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fob_infer::Environment;

/// fob-infer - static symbol inference for JavaScript
#[derive(Parser, Debug)]
#[command(
    name = "fob-infer",
    version,
    about = "Static symbol and type inference for JavaScript",
    long_about = "fob-infer partially evaluates JavaScript sources without running them.\n\
                  It builds a table of every symbol it can reach, with inferred types,\n\
                  values and documentation tags, and answers position lookups for editors."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub global: InferArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Engine options shared by every command.
///
/// Flags left unset fall back to the config file, then `FOB_INFER_*`
/// environment variables, then the engine defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct InferArgs {
    /// Path to a JSON config file (defaults to ./fob-infer.json when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail on undeclared names instead of creating placeholders
    #[arg(long, global = true)]
    pub strict: bool,

    /// Keep diagnostics for unsupported constructs and print them
    #[arg(long, global = true)]
    pub debug: bool,

    /// Maximum iterations of any single loop
    #[arg(long, global = true, value_name = "N")]
    pub max_loops: Option<usize>,

    /// Maximum nesting of function calls
    #[arg(long, global = true, value_name = "N")]
    pub max_call_depth: Option<usize>,

    /// Host environment whose globals are predeclared
    #[arg(short, long, global = true, value_enum)]
    pub environment: Option<EnvironmentArg>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the symbol table of one or more units
    Symbols(SymbolsArgs),

    /// Resolve the symbol at a position and list completions
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SymbolsArgs {
    /// Units to compile, in order
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Include undeclared placeholders
    #[arg(long)]
    pub missing: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    /// Units to compile, in order
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Unit the position refers to (defaults to the first file)
    #[arg(long, value_name = "FILE")]
    pub unit: Option<PathBuf>,

    /// 1-based line
    #[arg(long)]
    pub line: u32,

    /// 1-based column, counted in characters
    #[arg(long)]
    pub column: u32,

    /// Identifier or dotted name typed at the position
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per symbol
    Text,
    /// Pretty-printed JSON records
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentArg {
    Browser,
    Node,
}

impl From<EnvironmentArg> for Environment {
    fn from(value: EnvironmentArg) -> Self {
        match value {
            EnvironmentArg::Browser => Environment::Browser,
            EnvironmentArg::Node => Environment::Node,
        }
    }
}
