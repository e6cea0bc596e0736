//! Error types for symbol inference

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while compiling units or resolving names
#[derive(Error, Debug, Diagnostic)]
pub enum InferError {
    /// The surface parser gave up on a unit
    #[error("Failed to parse '{unit}': {message}")]
    #[diagnostic(code(fob::infer::parse))]
    Parse { unit: String, message: String },

    /// Strict resolution found no binding for a name
    #[error("Could not find symbol '{name}'")]
    #[diagnostic(
        code(fob::infer::unresolved),
        help("strict mode does not create placeholders for undeclared names")
    )]
    Unresolved { name: String },

    /// Reading a unit from disk failed
    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(fob::infer::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InferError {
    /// Create a Parse error
    pub fn parse(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Create an Unresolved error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::Unresolved { name: name.into() }
    }
}

/// Result type for inference operations
pub type Result<T> = std::result::Result<T, InferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        assert_eq!(
            InferError::unresolved("foo.bar").to_string(),
            "Could not find symbol 'foo.bar'"
        );
        assert_eq!(
            InferError::parse("a.js", "Unexpected token").to_string(),
            "Failed to parse 'a.js': Unexpected token"
        );
    }

    #[test]
    fn diagnostics_carry_codes() {
        let error = InferError::unresolved("x");
        let code = error.code().map(|code| code.to_string());
        assert_eq!(code.as_deref(), Some("fob::infer::unresolved"));
    }
}
