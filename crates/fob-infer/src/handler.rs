//! Tag-comment handler.
//!
//! Each tag of a parsed comment is applied to the *current* symbol, which
//! starts as the symbol the comment documents. `@name`, `@memberof`,
//! `@callback`, `@event` and `@external` switch the current symbol, so the
//! tags that follow them describe the named symbol instead.

use tracing::trace;

use crate::jsdoc::{self, ParsedComment, TagRecord};
use crate::syntax::CommentList;
use crate::tags::TagValue;
use crate::types::{Category, TypeSet};
use crate::value::{ObjectId, SymbolId, Value};
use crate::walker::Walker;

impl Walker {
    /// Tokenize and apply every comment not applied before.
    pub(crate) fn parse_comments(&mut self, symbol: SymbolId, comments: CommentList) {
        for comment in comments {
            if !comment.consume() {
                continue;
            }
            if let Some(parsed) = jsdoc::parse(&comment.text) {
                self.apply_tags(symbol, &parsed);
            }
        }
    }

    /// A documented symbol is never a placeholder.
    fn apply_tags(&mut self, symbol: SymbolId, parsed: &ParsedComment) {
        if parsed.is_empty() {
            return;
        }
        self.heap.symbol_mut(symbol).tags.remove("missing");
        if let Some(data) = self
            .heap
            .function_of(symbol)
            .and_then(|func| self.heap.function_mut(func))
        {
            data.cursor = 0;
        }

        let mut meta = symbol;
        for record in parsed.iter() {
            trace!(tag = %record.tag, "apply tag");
            meta = self.apply_tag(meta, record);
        }
    }

    fn apply_tag(&mut self, meta: SymbolId, record: &TagRecord) -> SymbolId {
        let name = record
            .type_expr
            .as_deref()
            .or(record.ident.as_deref())
            .filter(|name| !name.is_empty());

        match record.tag.as_str() {
            "name" => match name {
                Some(name) => {
                    let symbol = self.resolve_symbol(name);
                    self.heap.symbol_mut(symbol).tags.remove("missing");
                    symbol
                }
                None => meta,
            },
            "class" | "constructor" => {
                self.coerce(meta);
                self.heap.symbol_mut(meta).tags.set(&record.tag, true);
                meta
            }
            "function" => {
                self.coerce(meta);
                meta
            }
            "callback" => {
                let target = match name {
                    Some(name) => self.apply_symbol("callback", name),
                    None => {
                        self.heap.symbol_mut(meta).tags.set("callback", true);
                        meta
                    }
                };
                self.coerce(target);
                target
            }
            "constructs" => {
                self.constructs(meta, name);
                meta
            }
            "lends" => {
                let target = match name {
                    Some(name) => {
                        let symbol = self.resolve_symbol(name);
                        self.object_for(symbol)
                    }
                    None => self.scopes.root(),
                };
                self.heap.symbol_mut(meta).lends = Some(target);
                meta
            }
            "memberof" => match name {
                Some(name) => self.member_of(meta, name),
                None => meta,
            },
            "fires" => {
                if let Some(name) = name {
                    self.apply_symbol("event", name);
                }
                let value = name.map_or(TagValue::Flag(true), TagValue::from);
                self.heap.symbol_mut(meta).tags.set("fires", value);
                meta
            }
            "event" | "external" => match name {
                Some(name) => self.apply_symbol(&record.tag, name),
                None => {
                    self.heap.symbol_mut(meta).tags.set(&record.tag, true);
                    meta
                }
            },
            "param" => {
                self.param(meta, record);
                meta
            }
            "property" => {
                self.property(meta, record);
                meta
            }
            "this" => {
                let func = self.coerce(meta);
                if let Some(scope) = self.heap.function(func).map(|data| data.scope) {
                    let this = self.heap.get(scope, "this");
                    let entry = self.heap.symbol_mut(this);
                    entry.tags.set("system", true);
                    describe(entry, record);
                }
                meta
            }
            "returns" => {
                let func = self.coerce(meta);
                if let (Some(type_expr), Some(data)) =
                    (record.type_expr.as_deref(), self.heap.function_mut(func))
                {
                    data.returns.get_or_insert_with(TypeSet::new).parse(type_expr);
                }
                let value = record
                    .text
                    .as_deref()
                    .map_or(TagValue::Flag(true), TagValue::from);
                self.heap.symbol_mut(meta).tags.set("returns", value);
                meta
            }
            "type" => {
                self.declare_type(meta, record);
                meta
            }
            tag => {
                let value = record
                    .text
                    .as_deref()
                    .or(record.ident.as_deref())
                    .or(record.type_expr.as_deref())
                    .map_or(TagValue::Flag(true), TagValue::from);
                self.heap.symbol_mut(meta).tags.set(tag, value);
                meta
            }
        }
    }

    /// Function bound to `symbol`, converting its value if needed.
    fn coerce(&mut self, symbol: SymbolId) -> ObjectId {
        let declared_in = self.scopes.current();
        self.heap.coerce_function(symbol, declared_in)
    }

    /// Object bound to `symbol`, binding a fresh one if it holds none.
    fn object_for(&mut self, symbol: SymbolId) -> ObjectId {
        if let Some(object) = self.heap.symbol(symbol).value.as_object() {
            return object;
        }
        let object = self.heap.new_object();
        self.heap.assign(symbol, Value::Object(object));
        object
    }

    /// Resolve `name` and mark it as a real, documented `tag` symbol.
    fn apply_symbol(&mut self, tag: &str, name: &str) -> SymbolId {
        let symbol = self.resolve_symbol(name);
        let entry = self.heap.symbol_mut(symbol);
        entry.tags.remove("missing");
        entry.tags.remove("system");
        entry.tags.set(tag, true);
        symbol
    }

    /// `@constructs Name`: the documented function becomes `Name`.
    fn constructs(&mut self, meta: SymbolId, name: Option<&str>) {
        let value = name.map_or(TagValue::Flag(true), TagValue::from);
        self.heap.symbol_mut(meta).tags.set("constructs", value);
        let Some(name) = name else {
            return;
        };

        let target = self.resolve_symbol(name);
        let entry = self.heap.symbol_mut(target);
        entry.tags.remove("missing");
        entry.tags.remove("system");
        entry.tags.set("class", true);
        if self.heap.function_of(target).is_some() {
            return;
        }

        let func = self.coerce(meta);
        if let Some(object) = self.heap.symbol(target).value.as_object() {
            self.heap.graft(object, func);
        }
        self.heap.assign(target, Value::Object(func));
    }

    fn member_of(&mut self, meta: SymbolId, name: &str) -> SymbolId {
        let container = self.resolve_symbol(name);
        let container = self.object_for(container);
        let member_name = self.heap.symbol(meta).name.clone();
        let member = self.heap.get(container, &member_name);
        self.heap.copy_symbol(member, meta);
        self.heap.symbol_mut(member).tags.remove("missing");
        member
    }

    fn param(&mut self, meta: SymbolId, record: &TagRecord) {
        let func = self.coerce(meta);
        let Some(param) = self.heap.find_parameter(func, record.ident.as_deref()) else {
            return;
        };
        let entry = self.heap.symbol_mut(param);
        entry.tags.remove("missing");
        describe(entry, record);
        if record.optional {
            entry.types.record(Category::Undefined);
        }
    }

    fn property(&mut self, meta: SymbolId, record: &TagRecord) {
        let Some(ident) = record.ident.as_deref() else {
            let value = record
                .text
                .as_deref()
                .or(record.type_expr.as_deref())
                .map_or(TagValue::Flag(true), TagValue::from);
            self.heap.symbol_mut(meta).tags.set("property", value);
            return;
        };

        let object = self.object_for(meta);
        let member = self.heap.get(object, ident);
        let entry = self.heap.symbol_mut(member);
        entry.tags.remove("missing");
        describe(entry, record);
    }

    /// `@type`: record the declared types, and give an unassigned symbol a
    /// value of the declared shape.
    fn declare_type(&mut self, meta: SymbolId, record: &TagRecord) {
        let Some(type_expr) = record.type_expr.as_deref() else {
            return;
        };
        let entry = self.heap.symbol_mut(meta);
        entry.types.parse(type_expr);
        if !entry.value.is_undefined() {
            return;
        }

        if entry.types.contains(Category::Function) {
            self.coerce(meta);
        } else if entry.types.contains(Category::Object) {
            let object = self.heap.new_object();
            self.heap.set_value(meta, Value::Object(object));
        }
    }
}

fn describe(symbol: &mut crate::symbol::Symbol, record: &TagRecord) {
    if let Some(type_expr) = record.type_expr.as_deref() {
        symbol.types.parse(type_expr);
    }
    if let Some(text) = record.text.as_deref() {
        symbol.tags.set("desc", text);
    }
}
