//! Symbol table: the flat, id-keyed view of everything reachable from the
//! root object.
//!
//! The builder walks the property graph depth-first. Each object is claimed
//! by the first symbol that reaches it; later symbols bound to the same object
//! are listed as aliases and not descended into, which keeps cyclic and shared
//! graphs finite.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::trace;

use crate::Inference;
use crate::config::InferOptions;
use crate::heap::Heap;
use crate::tags::Tags;
use crate::types::Category;
use crate::value::{Builtin, FunctionBody, ObjectId, SymbolId, Value};

const ROOT_ID: &str = "<root>";

/// Options of [`Inference::symbols`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Include symbols still tagged `missing`: placeholders and names that
    /// were declared but never given a known value.
    pub missing: bool,
}

impl From<&InferOptions> for TableOptions {
    fn from(options: &InferOptions) -> Self {
        Self {
            missing: options.include_missing,
        }
    }
}

/// Qualified id to symbol, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn get(&self, id: &str) -> Option<SymbolId> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.entries.iter().map(|(id, symbol)| (id.as_str(), *symbol))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Serializable snapshot of every entry.
    pub fn records(&self, inference: &Inference) -> Vec<SymbolRecord> {
        self.iter()
            .map(|(id, symbol)| SymbolRecord::new(inference.heap(), id, symbol))
            .collect()
    }
}

/// One table entry as printed by tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub types: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub tags: Tags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SymbolRecord {
    fn new(heap: &Heap, id: &str, symbol: SymbolId) -> Self {
        let entry = heap.symbol(symbol);
        let value = match &entry.value {
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Null => {
                Some(heap.display(&entry.value))
            }
            _ => None,
        };
        Self {
            id: id.to_string(),
            name: entry.name.clone(),
            types: entry.types.to_string(),
            value,
            signature: heap.function_of(symbol).and_then(|func| heap.signature(func)),
            tags: entry.tags.clone(),
            source: entry.source(),
        }
    }
}

/// Id and kind of the symbol whose value is being descended into.
#[derive(Debug, Clone)]
struct Parent {
    id: String,
    proto: bool,
}

struct Builder<'h> {
    heap: &'h mut Heap,
    root: ObjectId,
    options: TableOptions,
    claimed: FxHashMap<ObjectId, String>,
    entries: IndexMap<String, SymbolId>,
}

/// Flatten the graph under `root`, storing each listed symbol's id on it.
pub(crate) fn build(heap: &mut Heap, root: ObjectId, options: TableOptions) -> SymbolTable {
    let mut builder = Builder {
        heap,
        root,
        options,
        claimed: FxHashMap::default(),
        entries: IndexMap::new(),
    };
    builder.claimed.insert(root, ROOT_ID.to_string());
    builder.visit(root, None);
    builder.derive_extends();

    trace!(entries = builder.entries.len(), "symbol table built");
    SymbolTable {
        entries: builder.entries,
    }
}

impl Builder<'_> {
    fn visit(&mut self, container: ObjectId, parent: Option<&Parent>) {
        let properties: Vec<SymbolId> = self
            .heap
            .object(container)
            .properties
            .values()
            .copied()
            .collect();

        for symbol in properties {
            self.visit_symbol(container, parent, symbol);
        }
    }

    fn visit_symbol(&mut self, container: ObjectId, parent: Option<&Parent>, symbol: SymbolId) {
        let entry = self.heap.symbol(symbol);
        let proto = entry.tags.has("proto");
        let system = entry.is_system();
        let hidden = system || (!self.options.missing && entry.is_missing());
        let id = qualified_id(parent, &entry.name, proto);
        let object = entry.value.as_object();

        if hidden {
            // Builtin namespaces stay hidden but their documented members do not.
            if let Some(object) = object.filter(|object| system && self.is_builtin(*object)) {
                if !self.claimed.contains_key(&object) {
                    self.claimed.insert(object, id.clone());
                    self.visit(object, Some(&Parent { id, proto }));
                }
            }
            return;
        }

        if self.entries.contains_key(&id) {
            return;
        }
        self.entries.insert(id.clone(), symbol);

        let parent_proto = parent.is_some_and(|parent| parent.proto);
        let owner = object.and_then(|object| self.claimed.get(&object).cloned());
        let callable = object.is_some_and(|object| self.heap.object(object).is_function());
        let class = object.is_some_and(|object| self.has_prototype(object));

        let entry = self.heap.symbol_mut(symbol);
        if let Some(owner) = &owner {
            entry.tags.insert("alias", owner.as_str());
        }
        if parent_proto {
            entry.tags.insert(if callable { "method" } else { "property" }, true);
        }
        if class
            && !entry.tags.has("method")
            && (entry.types.contains(Category::Function) || entry.types.contains(Category::Object))
        {
            entry.tags.insert("class", true);
        }
        if container != self.root
            && !parent_proto
            && !proto
            && !["namespace", "class", "mixin", "method"]
                .iter()
                .any(|tag| entry.tags.has(tag))
        {
            entry.tags.insert("static", true);
        }
        entry.id = Some(id.clone());

        if let (Some(object), None) = (object, owner) {
            self.claimed.insert(object, id.clone());
            self.visit(object, Some(&Parent { id, proto }));
        }
    }

    /// A listed function whose prototype leads to a different constructor
    /// extends that constructor's owner.
    fn derive_extends(&mut self) {
        let functions: Vec<(SymbolId, ObjectId)> = self
            .entries
            .values()
            .filter_map(|symbol| Some((*symbol, self.heap.function_of(*symbol)?)))
            .collect();

        for (symbol, func) in functions {
            let Some(prototype) = self.heap.prototype_of(func) else {
                continue;
            };
            let Some(constructor) = self
                .heap
                .lookup(prototype, "constructor")
                .and_then(|constructor| self.heap.function_of(constructor))
            else {
                continue;
            };
            if constructor == func {
                continue;
            }
            if let Some(owner) = self.claimed.get(&constructor) {
                self.heap.symbol_mut(symbol).tags.insert("extends", owner.as_str());
            }
        }
    }

    /// The object has a written, own `prototype` property.
    fn has_prototype(&self, object: ObjectId) -> bool {
        self.heap
            .own(object, "prototype")
            .is_some_and(|prototype| !self.heap.symbol(prototype).is_missing())
    }

    fn is_builtin(&self, object: ObjectId) -> bool {
        matches!(
            self.heap.function(object).map(|data| &data.body),
            Some(FunctionBody::Builtin(
                Builtin::Object
                    | Builtin::Array
                    | Builtin::String
                    | Builtin::Number
                    | Builtin::Boolean
                    | Builtin::Date
            ))
        )
    }
}

/// `name` at the root, `Parent#` for a prototype, `Parent#name` for its
/// members and `parent.name` otherwise.
fn qualified_id(parent: Option<&Parent>, name: &str, proto: bool) -> String {
    let Some(parent) = parent else {
        return if proto {
            format!("{name}#")
        } else {
            name.to_string()
        };
    };
    if proto {
        format!("{}#", parent.id)
    } else if parent.proto {
        format!("{}{name}", parent.id)
    } else {
        format!("{}.{name}", parent.id)
    }
}
