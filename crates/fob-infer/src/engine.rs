//! Query surface over one analysis instance.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, debug_span};

use crate::config::{Environment, InferOptions};
use crate::error::{InferError, Result};
use crate::file::File;
use crate::heap::Heap;
use crate::parser::parse_unit;
use crate::report::{Diagnostic, LogReporter};
use crate::symbol::Symbol;
use crate::table::{self, SymbolTable, TableOptions};
use crate::value::{Builtin, FunctionBody, FunctionData, Object, ObjectId, SymbolId, Value};
use crate::walker::Walker;

/// Result of [`Inference::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    /// Symbol under the cursor, if any.
    pub symbol: Option<SymbolId>,
    /// Property names completing the partially typed name.
    pub suggestions: Vec<String>,
}

/// An analysis instance.
///
/// Units are compiled one at a time into a shared root object, so later
/// units see the declarations of earlier ones.
pub struct Inference {
    walker: Walker,
    files: IndexMap<String, File>,
}

impl Default for Inference {
    fn default() -> Self {
        Self::new(InferOptions::default())
    }
}

impl Inference {
    pub fn new(options: InferOptions) -> Self {
        let reporter = Box::new(LogReporter::new(options.debug));
        let mut inference = Self {
            walker: Walker::new(options, reporter),
            files: IndexMap::new(),
        };
        inference.install_globals();
        inference
    }

    pub fn options(&self) -> &InferOptions {
        &self.walker.options
    }

    /// Parse and walk one unit, registering it under `unit`.
    ///
    /// Returns the value of the unit's last expression statement.
    pub fn compile(&mut self, unit: &str, text: &str) -> Result<Value> {
        let span = debug_span!("compile", unit);
        let _guard = span.enter();

        let output = parse_unit(unit, text)?;
        for diagnostic in &output.diagnostics {
            self.walker.reporter_mut().warning(diagnostic, None);
        }

        let symbol = self.walker.heap.new_symbol(None, unit);
        self.walker.file = Some(File::new(unit, text, symbol));
        let result = self.walker.run(&output.program);
        if let Some(file) = self.walker.file.take() {
            self.files.insert(unit.to_string(), file);
        }
        debug!(ok = result.is_ok(), "compiled");
        result
    }

    /// Compile a unit whose declarations are hidden from the symbol table.
    pub fn compile_system(&mut self, unit: &str, text: &str) -> Result<Value> {
        self.walker.system = true;
        let result = self.compile(unit, text);
        self.walker.system = false;
        result
    }

    /// Read and compile a file; the unit is named by its path.
    pub fn compile_path(&mut self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.compile(&path.display().to_string(), &text)
    }

    /// Flatten everything reachable from the root into a table.
    pub fn symbols(&mut self, options: TableOptions) -> SymbolTable {
        let root = self.walker.scopes.root();
        table::build(&mut self.walker.heap, root, options)
    }

    /// Resolve a qualified name (`a.b`, `A#m`, `A#`) strictly.
    ///
    /// `scope` defaults to the current scope, which is the root between
    /// compilations.
    pub fn find_symbol(&mut self, name: &str, scope: Option<ObjectId>) -> Option<SymbolId> {
        self.walker.find_symbol(name, scope, true).ok().flatten()
    }

    /// Like [`find_symbol`](Self::find_symbol), reporting why nothing was found.
    pub fn try_find_symbol(&mut self, name: &str, scope: Option<ObjectId>) -> Result<SymbolId> {
        self.walker
            .find_symbol(name, scope, true)?
            .ok_or_else(|| InferError::unresolved(name))
    }

    /// Lenient resolution: unresolved names become placeholders on the root.
    pub fn resolve_symbol(&mut self, name: &str) -> SymbolId {
        self.walker.resolve_symbol(name)
    }

    /// Innermost function scope at a position, else the root scope.
    pub fn find_scope(&self, unit: &str, line: u32, column: u32) -> ObjectId {
        self.files
            .get(unit)
            .and_then(|file| file.scope_at(line, column))
            .unwrap_or_else(|| self.root())
    }

    /// Innermost member access at a position.
    pub fn find_member(&self, unit: &str, line: u32, column: u32) -> Option<SymbolId> {
        let file = self.files.get(unit)?;
        file.member_at(line, column).map(|(symbol, _)| symbol)
    }

    /// Symbol at a position plus completions for it.
    ///
    /// On a member access the prefix is the part of the member name before
    /// the cursor and candidates are its container's properties. Elsewhere
    /// `token` is resolved in the scope at the position and candidates come
    /// from the whole scope chain.
    pub fn find_all(&mut self, unit: &str, line: u32, column: u32, token: Option<&str>) -> Lookup {
        let member = self
            .files
            .get(unit)
            .and_then(|file| file.member_at(line, column));

        if let Some((symbol, range)) = member {
            let entry = self.walker.heap.symbol(symbol);
            let typed = if line == range.start.line {
                column.saturating_sub(range.start.column) as usize
            } else {
                0
            };
            let prefix: String = entry.name.chars().take(typed).collect();
            let suggestions = entry
                .parent
                .map(|container| self.suggestions(&[container], &prefix))
                .unwrap_or_default();
            return Lookup {
                symbol: Some(symbol),
                suggestions,
            };
        }

        let scope = self.find_scope(unit, line, column);
        let symbol = token.and_then(|token| self.find_symbol(token, Some(scope)));
        let prefix = token.unwrap_or_default();

        let mut chain = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            chain.push(id);
            current = self.walker.heap.object(id).parent_scope;
        }
        if !chain.contains(&self.root()) {
            chain.push(self.root());
        }

        Lookup {
            symbol,
            suggestions: self.suggestions(&chain, prefix),
        }
    }

    fn suggestions(&self, containers: &[ObjectId], prefix: &str) -> Vec<String> {
        let heap = &self.walker.heap;
        let mut names: Vec<String> = Vec::new();
        for container in containers {
            for (name, symbol) in &heap.object(*container).properties {
                let symbol = heap.symbol(*symbol);
                if symbol.is_system() || symbol.is_placeholder() || !name.starts_with(prefix) {
                    continue;
                }
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    pub fn root(&self) -> ObjectId {
        self.walker.scopes.root()
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.walker.heap.symbol(id)
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        self.walker.heap.object(id)
    }

    pub fn function(&self, id: ObjectId) -> Option<&FunctionData> {
        self.walker.heap.function(id)
    }

    pub fn file(&self, unit: &str) -> Option<&File> {
        self.files.get(unit)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// Diagnostics recorded in debug mode.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.walker.reporter().diagnostics()
    }

    pub fn display_value(&self, value: &Value) -> String {
        self.walker.heap.display(value)
    }

    pub fn signature(&self, func: ObjectId) -> Option<String> {
        self.walker.heap.signature(func)
    }

    pub(crate) fn heap(&self) -> &Heap {
        &self.walker.heap
    }

    /// Builtin constructors and the environment's global aliases, all system.
    fn install_globals(&mut self) {
        let root = self.walker.scopes.root();
        let heap = &mut self.walker.heap;

        let object = define_builtin(heap, root, "Object", Builtin::Object);
        for (name, builtin) in [("create", Builtin::ObjectCreate), ("keys", Builtin::ObjectKeys)] {
            let func = heap.new_function(name, FunctionBody::Builtin(builtin), root, false);
            heap.define(object, name, Value::Object(func));
        }
        for (name, builtin) in [
            ("Array", Builtin::Array),
            ("String", Builtin::String),
            ("Number", Builtin::Number),
            ("Boolean", Builtin::Boolean),
            ("Date", Builtin::Date),
        ] {
            define_builtin(heap, root, name, builtin);
        }

        define_system(heap, root, "undefined", Value::Undefined);
        define_system(heap, root, "NaN", Value::Number(f64::NAN));
        define_system(heap, root, "Infinity", Value::Number(f64::INFINITY));

        match self.walker.options.environment {
            Environment::Browser => {
                define_system(heap, root, "window", Value::Object(root));
                define_system(heap, root, "self", Value::Object(root));
            }
            Environment::Node => {
                // Module objects are listed so that their exports show up.
                let exports = heap.new_object();
                heap.define(root, "exports", Value::Object(exports));
                let module = heap.new_object();
                heap.define(module, "exports", Value::Object(exports));
                heap.define(root, "module", Value::Object(module));
                define_system(heap, root, "global", Value::Object(root));
            }
        }
    }
}

fn define_system(heap: &mut Heap, root: ObjectId, name: &str, value: Value) -> SymbolId {
    let symbol = heap.define(root, name, value);
    heap.symbol_mut(symbol).tags.set("system", true);
    symbol
}

fn define_builtin(heap: &mut Heap, root: ObjectId, name: &str, builtin: Builtin) -> ObjectId {
    let func = heap.new_function(name, FunctionBody::Builtin(builtin), root, false);
    define_system(heap, root, name, Value::Object(func));
    func
}
