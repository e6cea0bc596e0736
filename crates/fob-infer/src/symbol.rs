//! Named references to values.

use std::fmt;

use serde::Serialize;

use crate::syntax::SourceRange;
use crate::tags::Tags;
use crate::types::TypeSet;
use crate::value::{ObjectId, Value};

/// Where a symbol was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub range: SourceRange,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file, self.range.start.line)
    }
}

/// A property of some container object.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub parent: Option<ObjectId>,
    pub tags: Tags,
    pub types: TypeSet,
    pub value: Value,
    pub location: Option<Location>,
    /// Qualified id assigned by the last symbol table build.
    pub id: Option<String>,
    /// Set once the symbol has been assigned, even `undefined`.
    pub written: bool,
    /// Object that sibling properties are redirected into (`@lends`).
    pub lends: Option<ObjectId>,
}

impl Symbol {
    /// New symbols are `missing` until they receive a concrete value.
    pub fn new(parent: Option<ObjectId>, name: impl Into<String>) -> Self {
        let mut tags = Tags::new();
        tags.set("missing", true);
        Self {
            name: name.into(),
            parent,
            tags,
            types: TypeSet::new(),
            value: Value::Undefined,
            location: None,
            id: None,
            written: false,
            lends: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.tags.has("missing")
    }

    pub fn is_system(&self) -> bool {
        self.tags.has("system")
    }

    /// Auto-vivified and never declared, assigned or documented since.
    pub fn is_placeholder(&self) -> bool {
        self.is_missing() && !self.written && self.location.is_none()
    }

    /// `file#line` of the declaration, if known.
    pub fn source(&self) -> Option<String> {
        self.location.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Position;

    #[test]
    fn new_symbols_start_missing() {
        let symbol = Symbol::new(None, "a");
        assert!(symbol.is_missing());
        assert!(!symbol.is_system());
        assert_eq!(symbol.value, Value::Undefined);
        assert!(symbol.is_placeholder());
    }

    #[test]
    fn source_renders_file_and_line() {
        let mut symbol = Symbol::new(None, "Person");
        symbol.location = Some(Location {
            file: "fixture.js".into(),
            range: SourceRange {
                start: Position { line: 8, column: 5 },
                end: Position { line: 8, column: 11 },
            },
        });
        assert_eq!(symbol.source().as_deref(), Some("fixture.js#8"));
    }
}
