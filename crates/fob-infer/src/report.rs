//! Reporting capability used by the walker for non-fatal conditions.

use serde::Serialize;
use tracing::{debug, warn};

use crate::symbol::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Unsupported,
    Warning,
}

/// A recorded non-fatal condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Sink for conditions the walker degrades past.
pub trait Reporter {
    /// A construct with no semantics; it evaluated to `undefined`/`unknown`.
    fn unsupported(&mut self, kind: &str, location: Option<Location>);

    fn warning(&mut self, message: &str, location: Option<Location>);

    fn diagnostics(&self) -> &[Diagnostic];
}

/// Logs through `tracing` and, when `debug` is set, keeps every diagnostic.
#[derive(Debug, Default)]
pub struct LogReporter {
    debug: bool,
    diagnostics: Vec<Diagnostic>,
}

impl LogReporter {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            diagnostics: Vec::new(),
        }
    }

    fn record(&mut self, kind: DiagnosticKind, message: String, location: Option<Location>) {
        if self.debug {
            self.diagnostics.push(Diagnostic {
                kind,
                message,
                location,
            });
        }
    }
}

impl Reporter for LogReporter {
    fn unsupported(&mut self, kind: &str, location: Option<Location>) {
        let at = location.as_ref().map(ToString::to_string).unwrap_or_default();
        debug!(kind, at = %at, "unsupported construct");
        self.record(
            DiagnosticKind::Unsupported,
            format!("Unsupported {kind}"),
            location,
        );
    }

    fn warning(&mut self, message: &str, location: Option<Location>) {
        let at = location.as_ref().map(ToString::to_string).unwrap_or_default();
        warn!(at = %at, "{message}");
        self.record(DiagnosticKind::Warning, message.to_string(), location);
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
