//! Arena holding every object and symbol of an analysis.
//!
//! Objects and symbols refer to each other through [`ObjectId`] and
//! [`SymbolId`] handles, so cyclic graphs such as `prototype.constructor`
//! links need no shared ownership.

use rustc_hash::FxHashSet;

use crate::symbol::Symbol;
use crate::types::Category;
use crate::value::{
    FunctionBody, FunctionData, Object, ObjectId, ObjectKind, SymbolId, Value, format_number,
};

#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Object>,
    symbols: Vec<Symbol>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn new_object(&mut self) -> ObjectId {
        self.alloc(Object::new(ObjectKind::Plain))
    }

    pub fn new_array(&mut self, elements: Vec<Value>) -> ObjectId {
        self.alloc(Object::new(ObjectKind::Array(elements)))
    }

    /// Scope object whose lexical parent is `parent`.
    pub fn new_scope(&mut self, parent: Option<ObjectId>) -> ObjectId {
        let mut scope = Object::new(ObjectKind::Plain);
        scope.parent_scope = parent;
        self.alloc(scope)
    }

    /// Create a function object declared in `declared_in`.
    ///
    /// Non-arrow functions get a `prototype` property holding an untouched
    /// placeholder object with a system `constructor` link back.
    pub fn new_function(
        &mut self,
        name: &str,
        body: FunctionBody,
        declared_in: ObjectId,
        arrow: bool,
    ) -> ObjectId {
        let scope = self.new_scope(Some(declared_in));
        let func = self.alloc(Object::new(ObjectKind::Function(Box::new(FunctionData {
            name: name.to_string(),
            params: Vec::new(),
            scope,
            returns: None,
            body,
            arrow,
            cursor: 0,
        }))));

        if !arrow {
            let prototype = self.get(func, "prototype");
            self.symbol_mut(prototype).tags.set("proto", true);
            let placeholder = self.new_object();
            self.object_mut(placeholder).placeholder_for = Some(prototype);
            self.set_value(prototype, Value::Object(placeholder));

            let constructor = self.define(placeholder, "constructor", Value::Object(func));
            self.symbol_mut(constructor).tags.set("system", true);
        }

        func
    }

    /// Symbol that belongs to no container.
    pub fn new_symbol(&mut self, parent: Option<ObjectId>, name: &str) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(parent, name));
        id
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn function(&self, id: ObjectId) -> Option<&FunctionData> {
        self.object(id).function()
    }

    pub fn function_mut(&mut self, id: ObjectId) -> Option<&mut FunctionData> {
        self.object_mut(id).function_mut()
    }

    /// Function object bound to `symbol`, if any.
    pub fn function_of(&self, symbol: SymbolId) -> Option<ObjectId> {
        self.symbol(symbol)
            .value
            .as_object()
            .filter(|object| self.object(*object).is_function())
    }

    pub fn own(&self, object: ObjectId, name: &str) -> Option<SymbolId> {
        self.object(object).own(name)
    }

    /// Own property `name`, created as a `missing` symbol when absent.
    pub fn get(&mut self, object: ObjectId, name: &str) -> SymbolId {
        if let Some(id) = self.own(object, name) {
            return id;
        }

        let materialized = match &self.object(object).kind {
            ObjectKind::Array(elements) if name == "length" => {
                Some(Value::Number(elements.len() as f64))
            }
            ObjectKind::Array(elements) => name
                .parse::<usize>()
                .ok()
                .and_then(|index| elements.get(index).cloned()),
            _ => None,
        };

        let id = self.new_symbol(Some(object), name);
        self.object_mut(object)
            .properties
            .insert(name.to_string(), id);

        if let Some(value) = materialized {
            self.set_value(id, value);
            let symbol = self.symbol_mut(id);
            symbol.tags.remove("missing");
            symbol.written = true;
        }
        id
    }

    /// Own or inherited property `name`, without creating anything.
    pub fn lookup(&self, object: ObjectId, name: &str) -> Option<SymbolId> {
        std::iter::once(object)
            .chain(self.proto_chain(object))
            .find_map(|candidate| self.own(candidate, name))
    }

    /// Property read: inherited properties resolve to the prototype's symbol,
    /// anything else is auto-vivified on `object` itself.
    pub fn resolve_member(&mut self, object: ObjectId, name: &str) -> SymbolId {
        match self.lookup(object, name) {
            Some(id) => id,
            None => self.get(object, name),
        }
    }

    /// Objects reachable through `proto` links, nearest first.
    pub fn proto_chain(&self, object: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(object);
        let mut current = self.object(object).proto;
        while let Some(next) = current {
            if !seen.insert(next) {
                break;
            }
            chain.push(next);
            current = self.object(next).proto;
        }
        chain
    }

    /// Value of a function's own `prototype` property.
    pub fn prototype_of(&self, func: ObjectId) -> Option<ObjectId> {
        self.own(func, "prototype")
            .and_then(|symbol| self.symbol(symbol).value.as_object())
    }

    pub fn category(&self, value: &Value) -> Option<Category> {
        let category = match value {
            Value::Undefined => Category::Undefined,
            Value::Null => Category::Null,
            Value::Bool(_) => Category::Boolean,
            Value::Number(_) => Category::Number,
            Value::String(_) => Category::String,
            Value::Object(id) => match self.object(*id).kind {
                ObjectKind::Plain => Category::Object,
                ObjectKind::Array(_) => Category::Array,
                ObjectKind::Function(_) => Category::Function,
            },
            Value::Unknown => return None,
        };
        Some(category)
    }

    /// Bind `value` without clearing `missing` or touching the container.
    pub fn set_value(&mut self, symbol: SymbolId, value: Value) {
        if let Some(category) = self.category(&value) {
            self.symbol_mut(symbol).types.record(category);
        }
        self.symbol_mut(symbol).value = value;
    }

    /// Property `name` on `object` bound to `value`, without touching `object`.
    pub fn define(&mut self, object: ObjectId, name: &str, value: Value) -> SymbolId {
        let symbol = self.get(object, name);
        self.set_value(symbol, value);
        let entry = self.symbol_mut(symbol);
        entry.tags.remove("missing");
        entry.written = true;
        symbol
    }

    /// Assignment semantics.
    ///
    /// Unknown only replaces `undefined` and leaves `missing` alone. Any other
    /// value, an evaluated `undefined` included, is recorded in the type set,
    /// clears `missing` and touches the container.
    pub fn assign(&mut self, symbol: SymbolId, value: Value) {
        if value.is_unknown() {
            let entry = self.symbol_mut(symbol);
            if entry.value.is_undefined() {
                entry.value = Value::Unknown;
            }
            return;
        }

        self.set_value(symbol, value);
        let entry = self.symbol_mut(symbol);
        entry.written = true;
        entry.tags.remove("missing");
        if let Some(parent) = entry.parent {
            self.touch(parent);
        }
    }

    /// Mark `object` as written to.
    ///
    /// The first write to a placeholder also makes the symbol it stands in
    /// for real, which in turn touches that symbol's container.
    pub fn touch(&mut self, object: ObjectId) {
        let mut current = Some(object);
        while let Some(id) = current.take() {
            let entry = self.object_mut(id);
            if entry.touched {
                break;
            }
            entry.touched = true;

            let placeholder_for = entry.placeholder_for;
            if let Some(symbol) = placeholder_for {
                let owner = self.symbol_mut(symbol);
                owner.tags.remove("missing");
                current = owner.parent;
            }
        }
    }

    /// Replace a nullish value of `symbol` with a fresh placeholder object.
    ///
    /// The symbol stays `missing` until something is written into the object.
    pub fn bind_placeholder(&mut self, symbol: SymbolId) -> ObjectId {
        let object = self.new_object();
        self.object_mut(object).placeholder_for = Some(symbol);
        self.set_value(symbol, Value::Object(object));
        object
    }

    /// Merge tags, types and value of `source` into `target`.
    pub fn copy_symbol(&mut self, target: SymbolId, source: SymbolId) {
        if target == source {
            return;
        }
        let source = self.symbol(source).clone();

        let entry = self.symbol_mut(target);
        entry.tags.extend_from(&source.tags);
        entry.tags.remove("system");
        entry.types.merge(&source.types);
        if entry.location.is_none() {
            entry.location = source.location.clone();
        }
        if entry.lends.is_none() {
            entry.lends = source.lends;
        }

        self.assign(target, source.value);
    }

    /// Move the properties of `from` into `into`.
    ///
    /// Properties `into` already has keep their identity and absorb the
    /// moved symbol only while they are still `missing`.
    pub fn graft(&mut self, from: ObjectId, into: ObjectId) {
        if from == into {
            return;
        }
        let properties: Vec<(String, SymbolId)> = self
            .object(from)
            .properties
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();

        for (name, moved) in properties {
            match self.own(into, &name) {
                Some(existing) if self.symbol(existing).is_missing() => {
                    self.copy_symbol(existing, moved);
                }
                Some(_) => {}
                None => {
                    self.symbol_mut(moved).parent = Some(into);
                    self.object_mut(into).properties.insert(name, moved);
                }
            }
        }
    }

    /// Function bound to `symbol`, converting the value to an opaque function
    /// if it is not one already. Properties of an existing object carry over.
    pub fn coerce_function(&mut self, symbol: SymbolId, declared_in: ObjectId) -> ObjectId {
        if let Some(func) = self.function_of(symbol) {
            return func;
        }

        let name = self.symbol(symbol).name.clone();
        let func = self.new_function(&name, FunctionBody::Opaque, declared_in, false);
        if let Some(previous) = self.symbol(symbol).value.as_object() {
            self.graft(previous, func);
        }
        self.assign(symbol, Value::Object(func));
        func
    }

    /// Parameter `name` of `func`, or the next positional one when `name` is
    /// `None`. Parameters that do not exist yet are appended.
    pub fn find_parameter(&mut self, func: ObjectId, name: Option<&str>) -> Option<SymbolId> {
        let data = self.function_mut(func)?;
        let scope = data.scope;

        match name {
            Some(name) => {
                let params = data.params.clone();
                if let Some(found) = params
                    .into_iter()
                    .find(|param| self.symbol(*param).name == name)
                {
                    return Some(found);
                }
            }
            None => {
                if let Some(found) = data.params.get(data.cursor).copied() {
                    data.cursor += 1;
                    return Some(found);
                }
            }
        }

        let param = self.new_symbol(Some(scope), name.unwrap_or_default());
        let data = self.function_mut(func)?;
        data.params.push(param);
        if name.is_none() {
            data.cursor = data.params.len();
        }
        Some(param)
    }

    /// Canonical signature: `function name(a:type, [b:type]):returns`.
    pub fn signature(&self, func: ObjectId) -> Option<String> {
        let data = self.function(func)?;
        let params: Vec<String> = data
            .params
            .iter()
            .map(|param| {
                let param = self.symbol(*param);
                let rendered = format!("{}:{}", param.name, param.types);
                if param.types.contains(Category::Undefined) {
                    format!("[{rendered}]")
                } else {
                    rendered
                }
            })
            .collect();

        let mut result = format!("function {}({})", data.name, params.join(", "));
        if let Some(returns) = &data.returns {
            result.push(':');
            result.push_str(returns.render());
        }
        Some(result)
    }

    /// Names a `for-in` loop visits: own then inherited, skipping system and
    /// never-assigned placeholders.
    pub fn enumerate(&self, object: ObjectId) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        if let ObjectKind::Array(elements) = &self.object(object).kind {
            names.extend((0..elements.len()).map(|index| index.to_string()));
        }

        for candidate in std::iter::once(object).chain(self.proto_chain(object)) {
            for (name, id) in &self.object(candidate).properties {
                let symbol = self.symbol(*id);
                if symbol.is_system() || (symbol.is_missing() && !symbol.written) {
                    continue;
                }
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Whether `ctor.prototype` is on the prototype chain of `object`.
    pub fn is_instance(&self, object: ObjectId, ctor: ObjectId) -> bool {
        match self.prototype_of(ctor) {
            Some(prototype) => self.proto_chain(object).contains(&prototype),
            None => false,
        }
    }

    /// Printable form of a value.
    pub fn display(&self, value: &Value) -> String {
        match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => format_number(*number),
            Value::String(text) => text.clone(),
            Value::Unknown => "?".to_string(),
            Value::Object(id) => match &self.object(*id).kind {
                ObjectKind::Plain => "[object Object]".to_string(),
                ObjectKind::Array(elements) => elements
                    .iter()
                    .map(|element| match element {
                        Value::Undefined | Value::Null => String::new(),
                        other => self.display(other),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                ObjectKind::Function(_) => self.signature(*id).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_access_auto_vivifies_once() {
        let mut heap = Heap::new();
        let object = heap.new_object();
        let first = heap.get(object, "missing");
        let second = heap.get(object, "missing");
        assert_eq!(first, second);
        assert!(heap.symbol(first).is_missing());
    }

    #[test]
    fn unknown_does_not_overwrite_known_values() {
        let mut heap = Heap::new();
        let object = heap.new_object();
        let symbol = heap.get(object, "a");

        heap.assign(symbol, Value::Unknown);
        assert_eq!(heap.symbol(symbol).value, Value::Unknown);
        assert!(heap.symbol(symbol).is_missing());

        heap.assign(symbol, Value::Number(1.0));
        heap.assign(symbol, Value::Unknown);
        assert_eq!(heap.symbol(symbol).value, Value::Number(1.0));
        assert!(!heap.symbol(symbol).is_missing());
    }

    #[test]
    fn evaluated_undefined_clears_missing() {
        let mut heap = Heap::new();
        let object = heap.new_object();
        let symbol = heap.get(object, "und");

        heap.assign(symbol, Value::Undefined);
        assert!(heap.symbol(symbol).written);
        assert!(!heap.symbol(symbol).is_missing());
        assert!(heap.object(object).touched);
    }

    #[test]
    fn first_write_to_placeholder_clears_missing_owner() {
        let mut heap = Heap::new();
        let root = heap.new_object();
        let foo = heap.get(root, "foo");
        let placeholder = heap.bind_placeholder(foo);
        let bar = heap.get(placeholder, "bar");
        assert!(heap.symbol(foo).is_missing());

        heap.assign(bar, Value::Number(1.0));
        assert!(!heap.symbol(foo).is_missing());
        assert!(heap.object(root).touched);
    }

    #[test]
    fn functions_get_untouched_prototype() {
        let mut heap = Heap::new();
        let root = heap.new_object();
        let func = heap.new_function("F", FunctionBody::Opaque, root, false);

        let prototype = heap.own(func, "prototype").expect("prototype");
        assert!(heap.symbol(prototype).tags.has("proto"));
        assert!(heap.symbol(prototype).is_missing());

        let placeholder = heap.prototype_of(func).expect("prototype object");
        let constructor = heap.own(placeholder, "constructor").expect("constructor");
        assert_eq!(heap.symbol(constructor).value, Value::Object(func));
        assert!(!heap.object(placeholder).touched);
    }

    #[test]
    fn copy_drops_system_and_public() {
        let mut heap = Heap::new();
        let object = heap.new_object();
        let source = heap.get(object, "source");
        let target = heap.get(object, "target");
        heap.symbol_mut(source).tags.set("system", true);
        heap.symbol_mut(source).tags.set("private", true);
        heap.symbol_mut(target).tags.set("public", true);
        heap.assign(source, Value::Number(2.0));

        heap.copy_symbol(target, source);
        let target = heap.symbol(target);
        assert!(!target.is_system());
        assert!(!target.tags.has("public"));
        assert!(target.tags.has("private"));
        assert_eq!(target.value, Value::Number(2.0));
    }

    #[test]
    fn positional_parameters_follow_cursor() {
        let mut heap = Heap::new();
        let root = heap.new_object();
        let func = heap.new_function("f", FunctionBody::Opaque, root, false);
        let a = heap.find_parameter(func, Some("a")).expect("param");
        let b = heap.find_parameter(func, Some("b")).expect("param");

        heap.function_mut(func).expect("function").cursor = 0;
        assert_eq!(heap.find_parameter(func, None), Some(a));
        assert_eq!(heap.find_parameter(func, None), Some(b));
        let extra = heap.find_parameter(func, None).expect("param");
        assert_ne!(extra, b);
        assert_eq!(heap.function(func).expect("function").params.len(), 3);
    }

    #[test]
    fn signature_brackets_optional_parameters() {
        let mut heap = Heap::new();
        let root = heap.new_object();
        let func = heap.new_function("f", FunctionBody::Opaque, root, false);
        let a = heap.find_parameter(func, Some("a")).expect("param");
        let b = heap.find_parameter(func, Some("b")).expect("param");
        heap.symbol_mut(a).types.parse("string");
        heap.symbol_mut(b).types.parse("number|undefined");

        assert_eq!(
            heap.signature(func).as_deref(),
            Some("function f(a:string, [b:number])")
        );
    }

    #[test]
    fn enumerate_includes_inherited_names() {
        let mut heap = Heap::new();
        let base = heap.new_object();
        let derived = heap.new_object();
        heap.object_mut(derived).proto = Some(base);
        let inherited = heap.get(base, "inherited");
        heap.assign(inherited, Value::Bool(true));
        let own = heap.get(derived, "own");
        heap.assign(own, Value::Bool(true));
        heap.get(derived, "never");

        assert_eq!(heap.enumerate(derived), vec!["own", "inherited"]);
    }

    #[test]
    fn coerce_function_keeps_existing_properties() {
        let mut heap = Heap::new();
        let root = heap.new_object();
        let symbol = heap.get(root, "Widget");
        let object = heap.new_object();
        heap.assign(symbol, Value::Object(object));
        let render = heap.get(object, "render");
        heap.assign(render, Value::Bool(true));

        let func = heap.coerce_function(symbol, root);
        assert!(heap.object(func).is_function());
        assert_eq!(heap.own(func, "render"), Some(render));
        assert_eq!(heap.symbol(render).parent, Some(func));
    }
}
