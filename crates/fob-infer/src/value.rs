//! Values, heap handles, and the object/function shapes they point to.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::syntax::FunctionNode;
use crate::types::TypeSet;

/// Handle to an [`Object`] stored in the [`Heap`](crate::heap::Heap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

/// Handle to a [`Symbol`](crate::symbol::Symbol) stored in the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol#{}", self.0)
    }
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectId),
    /// Statically unknowable. Propagates through operators.
    Unknown,
}

impl Value {
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// `undefined`, `null` or unknown: nothing to read properties from.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null | Self::Unknown)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Native functions installed as system globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Object,
    ObjectCreate,
    ObjectKeys,
    Array,
    String,
    Number,
    Boolean,
    Date,
}

/// What runs when a function is invoked.
#[derive(Debug, Clone)]
pub enum FunctionBody {
    Script(Rc<FunctionNode>),
    Builtin(Builtin),
    /// Declared by documentation only. Calls yield [`Value::Unknown`].
    Opaque,
}

#[derive(Debug, Clone)]
pub struct FunctionData {
    pub name: String,
    pub params: Vec<SymbolId>,
    /// Local scope object, parented to the declaration scope.
    pub scope: ObjectId,
    pub returns: Option<TypeSet>,
    pub body: FunctionBody,
    pub arrow: bool,
    /// Position of the next positional `@param` lookup.
    pub cursor: usize,
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Plain,
    /// Elements are materialized as index properties on first access.
    Array(Vec<Value>),
    Function(Box<FunctionData>),
}

#[derive(Debug, Clone)]
pub struct Object {
    pub kind: ObjectKind,
    pub properties: IndexMap<String, SymbolId>,
    pub proto: Option<ObjectId>,
    /// Set on scope objects: the enclosing lexical scope.
    pub parent_scope: Option<ObjectId>,
    /// Whether any property has been written with a concrete value.
    pub touched: bool,
    /// Symbol this object was synthesized for, cleared of `missing` on first write.
    pub placeholder_for: Option<SymbolId>,
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            properties: IndexMap::new(),
            proto: None,
            parent_scope: None,
            touched: false,
            placeholder_for: None,
        }
    }

    pub fn function(&self) -> Option<&FunctionData> {
        match &self.kind {
            ObjectKind::Function(data) => Some(data),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionData> {
        match &mut self.kind {
            ObjectKind::Function(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array(_))
    }

    pub fn own(&self, name: &str) -> Option<SymbolId> {
        self.properties.get(name).copied()
    }
}

/// Render a number the way the analyzed language prints it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_without_trailing_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn nullish_covers_unknown() {
        assert!(Value::Unknown.is_nullish());
        assert!(Value::Null.is_nullish());
        assert!(!Value::Bool(false).is_nullish());
    }
}
