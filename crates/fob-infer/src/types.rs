//! Inferred and declared value categories of a symbol.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::unsync::OnceCell;
use serde::{Serialize, Serializer};

/// Closed set of recognized categories, in canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Array,
    Boolean,
    Function,
    Null,
    Number,
    Object,
    String,
    Undefined,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Function => "function",
            Self::Null => "null",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
            Self::Undefined => "undefined",
        }
    }

    /// Map a documentation type name to a closed category.
    pub fn from_alias(name: &str) -> Option<Self> {
        let category = match name {
            "Array" | "array" => Self::Array,
            "Boolean" | "boolean" => Self::Boolean,
            "Function" | "function" => Self::Function,
            "null" => Self::Null,
            "Number" | "number" => Self::Number,
            "Object" | "object" => Self::Object,
            "String" | "string" => Self::String,
            "undefined" => Self::Undefined,
            _ => return None,
        };
        Some(category)
    }
}

/// Union of closed categories plus open, first-seen ordered type names.
///
/// The rendered form is memoized and dropped on every mutation.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    closed: BTreeSet<Category>,
    other: Vec<String>,
    rendered: OnceCell<String>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the category of an assigned value.
    ///
    /// Any concrete category clears a previously recorded `undefined`.
    pub fn record(&mut self, category: Category) {
        if category != Category::Undefined {
            self.closed.remove(&Category::Undefined);
        }
        self.closed.insert(category);
        self.invalidate();
    }

    /// Merge a `A|B|C` documentation type string.
    pub fn parse(&mut self, type_expr: &str) {
        for segment in type_expr.split('|') {
            let segment = segment
                .trim()
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim();
            if segment.is_empty() {
                continue;
            }
            match Category::from_alias(segment) {
                Some(category) => {
                    self.closed.insert(category);
                }
                None => {
                    if !self.other.iter().any(|existing| existing == segment) {
                        self.other.push(segment.to_string());
                    }
                }
            }
        }
        self.invalidate();
    }

    /// Merge every category and open name of `other`.
    pub fn merge(&mut self, other: &TypeSet) {
        for category in &other.closed {
            self.closed.insert(*category);
        }
        for name in &other.other {
            if !self.other.contains(name) {
                self.other.push(name.clone());
            }
        }
        self.invalidate();
    }

    pub fn contains(&self, category: Category) -> bool {
        self.closed.contains(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.closed.iter().copied()
    }

    /// Unrecognized type names in first-seen order.
    pub fn other(&self) -> &[String] {
        &self.other
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.other.is_empty()
    }

    /// Cached rendering, `?` when nothing is known.
    pub fn render(&self) -> &str {
        self.rendered.get_or_init(|| {
            let parts: Vec<&str> = self
                .closed
                .iter()
                .filter(|category| **category != Category::Undefined)
                .map(|category| category.as_str())
                .chain(self.other.iter().map(String::as_str))
                .collect();

            if parts.is_empty() {
                "?".to_string()
            } else {
                parts.join("|")
            }
        })
    }

    fn invalidate(&mut self) {
        self.rendered.take();
    }
}

impl PartialEq for TypeSet {
    fn eq(&self, other: &Self) -> bool {
        self.closed == other.closed && self.other == other.other
    }
}

impl Eq for TypeSet {}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}

impl Serialize for TypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.render())
    }
}
