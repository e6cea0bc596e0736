//! Error handling for the fob-infer CLI.

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Compilation or strict resolution failed
    #[error(transparent)]
    Infer(#[from] fob_infer::InferError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while layering the configuration sources.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Create a fob-infer.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Convert a CLI error into a miette report, keeping engine diagnostics intact.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Infer(e) => Report::new(e),
        other => miette::miette!("{}", other),
    }
}
