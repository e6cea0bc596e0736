//! Lexical scope chain over heap objects.

use crate::heap::Heap;
use crate::value::{ObjectId, SymbolId, Value};

/// Saved scope stack, restored by [`ScopeManager::restore`].
#[derive(Debug)]
pub struct ScopeFrame {
    stack: Vec<ObjectId>,
    current: ObjectId,
}

/// Stack of active scopes on top of a single root object.
///
/// The root's property bag is the global namespace; it carries a system
/// `this` symbol bound to the root itself.
#[derive(Debug)]
pub struct ScopeManager {
    root: ObjectId,
    stack: Vec<ObjectId>,
    current: ObjectId,
}

impl ScopeManager {
    pub fn new(heap: &mut Heap) -> Self {
        let root = heap.new_scope(None);
        let this = heap.define(root, "this", Value::Object(root));
        heap.symbol_mut(this).tags.set("system", true);

        Self {
            root,
            stack: Vec::new(),
            current: root,
        }
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn current(&self) -> ObjectId {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, scope: ObjectId) {
        self.stack.push(self.current);
        self.current = scope;
    }

    pub fn pop(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    /// Replace the whole stack with a single frame rooted at `scope`.
    pub fn enter(&mut self, scope: ObjectId) -> ScopeFrame {
        let frame = ScopeFrame {
            stack: std::mem::take(&mut self.stack),
            current: self.current,
        };
        self.current = scope;
        frame
    }

    pub fn restore(&mut self, frame: ScopeFrame) {
        self.stack = frame.stack;
        self.current = frame.current;
    }

    /// Innermost lexical binding of `name`, without creating anything.
    pub fn lookup(&self, heap: &Heap, name: &str) -> Option<SymbolId> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            if let Some(symbol) = heap.own(id, name) {
                return Some(symbol);
            }
            scope = heap.object(id).parent_scope;
        }
        heap.own(self.root, name)
    }

    /// Binding of `name`, falling back to an auto-vivified root property.
    pub fn get(&self, heap: &mut Heap, name: &str) -> SymbolId {
        match self.lookup(heap, name) {
            Some(symbol) => symbol,
            None => heap.get(self.root, name),
        }
    }

    /// `this` of the nearest scope that binds one, else the root's.
    pub fn get_this(&self, heap: &mut Heap) -> SymbolId {
        match self.lookup(heap, "this") {
            Some(symbol) => symbol,
            None => heap.get(self.root, "this"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FunctionBody;

    #[test]
    fn lookup_walks_lexical_parents() {
        let mut heap = Heap::new();
        let mut scopes = ScopeManager::new(&mut heap);
        let root = scopes.root();
        let outer = heap.define(root, "outer", Value::Number(1.0));

        let func = heap.new_function("f", FunctionBody::Opaque, root, false);
        let local_scope = heap.function(func).expect("function").scope;
        let local = heap.define(local_scope, "local", Value::Number(2.0));

        scopes.push(local_scope);
        assert_eq!(scopes.get(&mut heap, "local"), local);
        assert_eq!(scopes.get(&mut heap, "outer"), outer);

        scopes.pop();
        assert_eq!(scopes.current(), root);
        assert_ne!(scopes.get(&mut heap, "local"), local);
    }

    #[test]
    fn unresolved_names_land_on_root() {
        let mut heap = Heap::new();
        let scopes = ScopeManager::new(&mut heap);
        let symbol = scopes.get(&mut heap, "nowhere");
        assert_eq!(heap.symbol(symbol).parent, Some(scopes.root()));
        assert!(heap.symbol(symbol).is_missing());
    }

    #[test]
    fn this_defaults_to_root() {
        let mut heap = Heap::new();
        let scopes = ScopeManager::new(&mut heap);
        let this = scopes.get_this(&mut heap);
        assert_eq!(heap.symbol(this).value, Value::Object(scopes.root()));
        assert!(heap.symbol(this).is_system());
    }

    #[test]
    fn enter_and_restore_swap_the_stack() {
        let mut heap = Heap::new();
        let mut scopes = ScopeManager::new(&mut heap);
        let other = heap.new_scope(None);
        let inner = heap.new_scope(Some(scopes.root()));
        scopes.push(inner);

        let frame = scopes.enter(other);
        assert_eq!(scopes.current(), other);
        assert_eq!(scopes.depth(), 0);

        scopes.restore(frame);
        assert_eq!(scopes.current(), inner);
        assert_eq!(scopes.depth(), 1);
    }
}
