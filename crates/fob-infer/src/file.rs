//! Per-unit records and positional indexes.

use rustc_hash::FxHashMap;

use crate::syntax::SourceRange;
use crate::value::{ObjectId, SymbolId};

/// A compiled unit.
///
/// Function scopes and member accesses are appended in traversal order, so a
/// reverse scan finds the innermost entry first. Re-evaluating a node (loops,
/// repeated calls) appends only when it resolves to something new.
#[derive(Debug)]
pub struct File {
    pub name: String,
    pub source: String,
    /// Detached symbol carrying the unit's own documentation tags.
    pub symbol: SymbolId,
    pub functions: Vec<(ObjectId, SourceRange)>,
    pub members: Vec<(SymbolId, SourceRange)>,
    latest_functions: FxHashMap<SourceRange, ObjectId>,
    latest_members: FxHashMap<SourceRange, SymbolId>,
}

impl File {
    pub fn new(name: impl Into<String>, source: impl Into<String>, symbol: SymbolId) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            symbol,
            functions: Vec::new(),
            members: Vec::new(),
            latest_functions: FxHashMap::default(),
            latest_members: FxHashMap::default(),
        }
    }

    pub fn register_function(&mut self, scope: ObjectId, range: SourceRange) {
        if self.latest_functions.insert(range, scope) != Some(scope) {
            self.functions.push((scope, range));
        }
    }

    pub fn register_member(&mut self, symbol: SymbolId, range: SourceRange) {
        if self.latest_members.insert(range, symbol) != Some(symbol) {
            self.members.push((symbol, range));
        }
    }

    /// Innermost function scope containing the position.
    pub fn scope_at(&self, line: u32, column: u32) -> Option<ObjectId> {
        find_in_map(&self.functions, line, column).map(|(scope, _)| scope)
    }

    /// Innermost member access containing the position, with its range.
    pub fn member_at(&self, line: u32, column: u32) -> Option<(SymbolId, SourceRange)> {
        find_in_map(&self.members, line, column)
    }
}

fn find_in_map<T: Copy>(map: &[(T, SourceRange)], line: u32, column: u32) -> Option<(T, SourceRange)> {
    map.iter()
        .rev()
        .find(|(_, range)| range.contains(line, column))
        .copied()
}
