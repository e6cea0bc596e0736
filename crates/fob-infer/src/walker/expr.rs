//! Expression evaluation, references, calls and object construction.

use std::rc::Rc;

use tracing::{debug, trace};

use super::{Access, Flow, Walker, ops};
use crate::error::{InferError, Result};
use crate::syntax::{FunctionNode, Literal, Node, NodeKind, PropertyKind};
use crate::value::{Builtin, FunctionBody, ObjectId, SymbolId, Value, format_number};

impl Walker {
    pub(crate) fn expr(&mut self, node: &Node) -> Result<Value> {
        let value = match &node.kind {
            NodeKind::Literal(literal) => literal_value(literal),
            NodeKind::Identifier(_) | NodeKind::This | NodeKind::Member { .. } => {
                match self.reference(node, Access::Read)? {
                    Some(symbol) => {
                        self.parse_comments(symbol, node.take_comments());
                        self.heap.symbol(symbol).value.clone()
                    }
                    None => Value::Unknown,
                }
            }
            NodeKind::Template {
                quasis,
                expressions,
            } => self.template(quasis, expressions)?,
            NodeKind::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(match element {
                        Some(element) => self.expr(element)?,
                        None => Value::Undefined,
                    });
                }
                Value::Object(self.heap.new_array(values))
            }
            NodeKind::Object(properties) => Value::Object(self.object_literal(node, properties)?),
            NodeKind::Function(function) => Value::Object(self.make_function(function)),
            NodeKind::Call { callee, arguments } => self.call(callee, arguments)?,
            NodeKind::New { callee, arguments } => self.construct(callee, arguments)?,
            NodeKind::Unary { operator, argument } => {
                if *operator == "delete" {
                    return Ok(Value::Bool(true));
                }
                let value = self.expr(argument)?;
                match ops::unary(&self.heap, operator, &value) {
                    Some(value) => value,
                    None => self.unsupported_operator(node, operator),
                }
            }
            NodeKind::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                match ops::binary(&self.heap, operator, &left, &right) {
                    Some(value) => value,
                    None => self.unsupported_operator(node, operator),
                }
            }
            NodeKind::Logical {
                operator,
                left,
                right,
            } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                match logical(operator, left, right) {
                    Some(value) => value,
                    None => self.unsupported_operator(node, operator),
                }
            }
            NodeKind::Update {
                operator,
                prefix,
                argument,
            } => self.update(operator, *prefix, argument)?,
            NodeKind::Assignment {
                operator,
                left,
                right,
            } => self.assignment(node, operator, left, right)?,
            NodeKind::Sequence(expressions) => {
                let mut last = Value::Undefined;
                for expression in expressions {
                    last = self.expr(expression)?;
                }
                last
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let test = self.expr(test)?;
                if ops::truthy(&test) {
                    self.expr(consequent)?
                } else {
                    self.expr(alternate)?
                }
            }
            _ => self.unsupported(node),
        };
        Ok(value)
    }

    /// Symbol a reference expression denotes. Comments are left in place.
    pub(crate) fn reference(&mut self, node: &Node, access: Access) -> Result<Option<SymbolId>> {
        match &node.kind {
            NodeKind::Identifier(name) => self.identifier(name, access).map(Some),
            NodeKind::This => Ok(Some(self.scopes.get_this(&mut self.heap))),
            NodeKind::Member { .. } => Ok(self.member(node, access)?.map(|(_, symbol)| symbol)),
            _ => Ok(None),
        }
    }

    /// Value a binding receives from `node`.
    ///
    /// A name that was never given a value binds as unknown, so the receiving
    /// symbol stays `missing` as well.
    pub(crate) fn bound_value(&mut self, node: &Node) -> Result<Value> {
        if !matches!(node.kind, NodeKind::Identifier(_) | NodeKind::Member { .. }) {
            return self.expr(node);
        }
        let Some(symbol) = self.reference(node, Access::Read)? else {
            return Ok(Value::Unknown);
        };
        self.parse_comments(symbol, node.take_comments());
        let entry = self.heap.symbol(symbol);
        Ok(if entry.is_missing() && entry.value.is_undefined() {
            Value::Unknown
        } else {
            entry.value.clone()
        })
    }

    fn identifier(&mut self, name: &str, access: Access) -> Result<SymbolId> {
        let strict_read = self.strict && access == Access::Read;
        match self.scopes.lookup(&self.heap, name) {
            Some(symbol) if strict_read && self.unresolved(symbol) => {
                Err(InferError::unresolved(name))
            }
            Some(symbol) => Ok(symbol),
            None if strict_read => Err(InferError::unresolved(name)),
            None => {
                debug!(name, "implicit global");
                let root = self.scopes.root();
                let symbol = self.heap.get(root, name);
                self.heap.symbol_mut(symbol).tags.set("global", true);
                Ok(symbol)
            }
        }
    }

    fn unresolved(&self, symbol: SymbolId) -> bool {
        let symbol = self.heap.symbol(symbol);
        symbol.is_placeholder() && !symbol.tags.has("proto")
    }

    /// Receiver object and property symbol of a member expression.
    fn member(&mut self, node: &Node, access: Access) -> Result<Option<(ObjectId, SymbolId)>> {
        let NodeKind::Member {
            object,
            property,
            computed,
        } = &node.kind
        else {
            return Ok(None);
        };

        let target = self.object_of(object)?;
        let name = if *computed {
            let key = self.expr(property)?;
            if key.is_unknown() {
                trace!("member access with unknown key");
                return Ok(Some((target, self.heap.new_symbol(None, ""))));
            }
            ops::to_string(&self.heap, &key)
        } else {
            match property.identifier() {
                Some(name) => name.to_string(),
                None => return Ok(None),
            }
        };

        let symbol = match access {
            Access::Write => self.heap.get(target, &name),
            Access::Read if self.strict => {
                let element = self.heap.object(target).is_array()
                    && (name == "length" || name.parse::<usize>().is_ok());
                match self.heap.lookup(target, &name) {
                    Some(symbol) if !self.unresolved(symbol) => symbol,
                    _ if element => self.heap.get(target, &name),
                    _ => return Err(InferError::unresolved(name)),
                }
            }
            Access::Read => self.heap.resolve_member(target, &name),
        };
        self.register_member(symbol, property.loc);
        Ok(Some((target, symbol)))
    }

    /// Object to read properties from.
    ///
    /// A reference holding nothing gets a placeholder object bound in place;
    /// primitives are wrapped.
    fn object_of(&mut self, node: &Node) -> Result<ObjectId> {
        if let Some(symbol) = self.reference(node, Access::Read)? {
            self.parse_comments(symbol, node.take_comments());
            let value = self.heap.symbol(symbol).value.clone();
            return match value {
                Value::Object(object) => Ok(object),
                value if value.is_nullish() => {
                    if self.strict {
                        let name = self.heap.symbol(symbol).name.clone();
                        return Err(InferError::unresolved(name));
                    }
                    Ok(self.heap.bind_placeholder(symbol))
                }
                primitive => Ok(self.wrap(&primitive)),
            };
        }

        Ok(match self.expr(node)? {
            Value::Object(object) => object,
            value if value.is_nullish() => self.heap.new_object(),
            primitive => self.wrap(&primitive),
        })
    }

    fn wrap(&mut self, primitive: &Value) -> ObjectId {
        let object = self.heap.new_object();
        let constructor = match primitive {
            Value::String(_) => Some("String"),
            Value::Number(_) => Some("Number"),
            Value::Bool(_) => Some("Boolean"),
            _ => None,
        };
        let root = self.scopes.root();
        let prototype = constructor
            .and_then(|name| self.heap.own(root, name))
            .and_then(|symbol| self.heap.function_of(symbol))
            .and_then(|func| self.heap.prototype_of(func));
        self.heap.object_mut(object).proto = prototype;

        if let Value::String(text) = primitive {
            let length = text.encode_utf16().count() as f64;
            self.heap.define(object, "length", Value::Number(length));
        }
        object
    }

    fn template(&mut self, quasis: &[String], expressions: &[Node]) -> Result<Value> {
        let mut text = String::new();
        let mut unknown = false;
        for (index, quasi) in quasis.iter().enumerate() {
            text.push_str(quasi);
            if let Some(expression) = expressions.get(index) {
                let value = self.expr(expression)?;
                unknown |= value.is_unknown();
                text.push_str(&ops::to_string(&self.heap, &value));
            }
        }
        Ok(if unknown {
            Value::Unknown
        } else {
            Value::String(text)
        })
    }

    fn update(&mut self, operator: &str, prefix: bool, argument: &Node) -> Result<Value> {
        let Some(symbol) = self.reference(argument, Access::Write)? else {
            return Ok(self.unsupported(argument));
        };
        let old = self.heap.symbol(symbol).value.clone();
        if old.is_unknown() {
            return Ok(Value::Unknown);
        }

        let number = ops::to_number(&self.heap, &old);
        let delta = if operator == "--" { -1.0 } else { 1.0 };
        let new = Value::Number(number + delta);
        self.heap.assign(symbol, new.clone());
        Ok(if prefix { new } else { Value::Number(number) })
    }

    fn assignment(&mut self, node: &Node, operator: &str, left: &Node, right: &Node) -> Result<Value> {
        let mut comments = node.take_comments();
        comments.extend(left.take_comments());

        let target = self.reference(left, Access::Write)?;
        let mut value = self.bound_value(right)?;
        if operator != "=" {
            value = self.unsupported_operator(node, operator);
        }

        let Some(symbol) = target else {
            self.unsupported(left);
            return Ok(value);
        };
        self.heap.assign(symbol, value.clone());
        if self.heap.symbol(symbol).location.is_none() {
            let location = self.location(left.loc);
            self.heap.symbol_mut(symbol).location = location;
        }
        self.parse_comments(symbol, comments);
        Ok(value)
    }

    fn arguments(&mut self, arguments: &[Node]) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.expr(argument)?);
        }
        Ok(values)
    }

    fn call(&mut self, callee: &Node, arguments: &[Node]) -> Result<Value> {
        let (callee, this) = match &callee.kind {
            NodeKind::Member { .. } => match self.member(callee, Access::Read)? {
                Some((receiver, symbol)) => {
                    self.parse_comments(symbol, callee.take_comments());
                    let value = self.heap.symbol(symbol).value.clone();
                    (value, Value::Object(receiver))
                }
                None => (Value::Unknown, Value::Undefined),
            },
            _ => (self.expr(callee)?, Value::Undefined),
        };
        let arguments = self.arguments(arguments)?;

        match self.function_value(&callee) {
            Some(func) => self.invoke(func, this, arguments, false),
            None => {
                trace!("call of a value that is not a known function");
                Ok(Value::Unknown)
            }
        }
    }

    fn construct(&mut self, callee: &Node, arguments: &[Node]) -> Result<Value> {
        let callee = self.expr(callee)?;
        let arguments = self.arguments(arguments)?;
        let Some(func) = self.function_value(&callee) else {
            return Ok(Value::Unknown);
        };
        if let Some(FunctionBody::Builtin(builtin)) = self.heap.function(func).map(|data| &data.body)
        {
            let builtin = *builtin;
            return self.builtin(builtin, arguments, true);
        }

        let instance = self.heap.new_object();
        let prototype = self.heap.prototype_of(func);
        self.heap.object_mut(instance).proto = prototype;
        let constructor = self.heap.define(instance, "constructor", Value::Object(func));
        self.heap.symbol_mut(constructor).tags.set("system", true);

        let result = self.invoke(func, Value::Object(instance), arguments, true)?;
        Ok(match result {
            Value::Object(other) if other != instance => Value::Object(other),
            _ => Value::Object(instance),
        })
    }

    fn function_value(&self, value: &Value) -> Option<ObjectId> {
        value
            .as_object()
            .filter(|object| self.heap.object(*object).is_function())
    }

    /// Run `func` with `this` bound to `this` (the root object when undefined).
    pub(crate) fn invoke(
        &mut self,
        func: ObjectId,
        this: Value,
        arguments: Vec<Value>,
        construct: bool,
    ) -> Result<Value> {
        let Some(body) = self.heap.function(func).map(|data| data.body.clone()) else {
            return Ok(Value::Unknown);
        };
        match body {
            FunctionBody::Opaque => Ok(Value::Unknown),
            FunctionBody::Builtin(builtin) => self.builtin(builtin, arguments, construct),
            FunctionBody::Script(node) => self.invoke_script(func, &node, this, arguments),
        }
    }

    fn invoke_script(
        &mut self,
        func: ObjectId,
        node: &FunctionNode,
        this: Value,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        if self.depth >= self.options.max_call_depth {
            debug!(function = node.name(), depth = self.depth, "call depth bound reached");
            return Ok(Value::Unknown);
        }
        let Some((scope, params)) = self
            .heap
            .function(func)
            .map(|data| (data.scope, data.params.clone()))
        else {
            return Ok(Value::Unknown);
        };

        for (index, param) in params.iter().enumerate() {
            match arguments.get(index) {
                Some(value) => self.heap.assign(*param, value.clone()),
                None => self.heap.symbol_mut(*param).value = Value::Undefined,
            }
        }

        if !node.arrow {
            let this = match this {
                Value::Undefined | Value::Null => Value::Object(self.scopes.root()),
                other => other,
            };
            let binding = self.heap.get(scope, "this");
            self.heap.set_value(binding, this);

            let list = self.heap.new_array(arguments);
            let binding = self.heap.define(scope, "arguments", Value::Object(list));
            self.heap.symbol_mut(binding).tags.set("system", true);
        }

        trace!(function = node.name(), depth = self.depth, "invoke");
        self.scopes.push(scope);
        self.depth += 1;
        let flow = self.body(&node.body);
        self.depth -= 1;
        self.scopes.pop();

        Ok(match flow? {
            Flow::Return(value) => value,
            _ => Value::Undefined,
        })
    }

    fn builtin(&mut self, builtin: Builtin, arguments: Vec<Value>, construct: bool) -> Result<Value> {
        let first = arguments.first().cloned().unwrap_or_default();
        let value = match builtin {
            Builtin::Object => match first {
                Value::Object(object) => Value::Object(object),
                _ => Value::Object(self.heap.new_object()),
            },
            Builtin::ObjectCreate => {
                let object = self.heap.new_object();
                self.heap.object_mut(object).proto = first.as_object();
                Value::Object(object)
            }
            Builtin::ObjectKeys => match first.as_object() {
                Some(object) => {
                    let keys: Vec<Value> = self
                        .heap
                        .enumerate(object)
                        .into_iter()
                        .filter(|name| {
                            self.heap.own(object, name).is_some()
                                || (self.heap.object(object).is_array()
                                    && name.parse::<usize>().is_ok())
                        })
                        .map(Value::String)
                        .collect();
                    Value::Object(self.heap.new_array(keys))
                }
                None => Value::Unknown,
            },
            Builtin::Array if matches!(arguments.as_slice(), [Value::Number(_)]) => {
                Value::Object(self.heap.new_array(Vec::new()))
            }
            Builtin::Array => Value::Object(self.heap.new_array(arguments)),
            Builtin::String if arguments.is_empty() => Value::String(String::new()),
            Builtin::Number if arguments.is_empty() => Value::Number(0.0),
            _ if first.is_unknown() => Value::Unknown,
            Builtin::String => Value::String(ops::to_string(&self.heap, &first)),
            Builtin::Number => Value::Number(ops::to_number(&self.heap, &first)),
            Builtin::Boolean => Value::Bool(ops::truthy(&first)),
            Builtin::Date if construct => Value::Object(self.heap.new_object()),
            Builtin::Date => Value::Unknown,
        };
        Ok(value)
    }

    /// Function object for a function declaration, expression or arrow.
    pub(crate) fn make_function(&mut self, function: &Rc<FunctionNode>) -> ObjectId {
        let declared_in = self.scopes.current();
        let func = self.heap.new_function(
            function.name(),
            FunctionBody::Script(Rc::clone(function)),
            declared_in,
            function.arrow,
        );
        let Some(scope) = self.heap.function(func).map(|data| data.scope) else {
            return func;
        };

        for param in &function.params {
            let Some(name) = param.identifier() else {
                self.unsupported(param);
                continue;
            };
            let symbol = self.heap.get(scope, name);
            let location = self.location(param.loc);
            self.heap.symbol_mut(symbol).location = location;
            if let Some(data) = self.heap.function_mut(func) {
                data.params.push(symbol);
            }
            self.parse_comments(symbol, param.take_comments());
        }

        if !function.arrow {
            let this = self.heap.get(scope, "this");
            self.heap.symbol_mut(this).tags.set("system", true);
        }
        self.register_function(scope, function.body_loc);
        func
    }

    /// Object literal. A `@lends` on the literal or on one of its properties
    /// redirects the properties that follow into the lent object.
    fn object_literal(&mut self, node: &Node, properties: &[Node]) -> Result<ObjectId> {
        let object = self.heap.new_object();
        let scratch = self.heap.new_symbol(None, "");
        self.parse_comments(scratch, node.take_comments());
        let mut target = self.heap.symbol(scratch).lends;

        for property in properties {
            let NodeKind::Property {
                key,
                value,
                kind,
                computed,
            } = &property.kind
            else {
                self.unsupported(property);
                continue;
            };

            let name = if *computed {
                match self.expr(key)? {
                    Value::Unknown => {
                        self.unsupported(property);
                        continue;
                    }
                    key => ops::to_string(&self.heap, &key),
                }
            } else {
                match &key.kind {
                    NodeKind::Identifier(name) => name.clone(),
                    NodeKind::Literal(literal) => literal_key(literal),
                    _ => {
                        self.unsupported(key);
                        continue;
                    }
                }
            };

            let value = self.bound_value(value)?;
            let mut comments = property.take_comments();
            comments.extend(key.take_comments());
            let symbol = self.init_symbol(&name, property.loc, object, Some(value), comments);
            match kind {
                PropertyKind::Get => self.heap.symbol_mut(symbol).tags.set("getter", true),
                PropertyKind::Set => self.heap.symbol_mut(symbol).tags.set("setter", true),
                PropertyKind::Init => {}
            }

            if let Some(lends) = self.heap.symbol(symbol).lends {
                target = Some(lends);
            }
            if let Some(target) = target {
                let moved = self.heap.get(target, &name);
                self.heap.copy_symbol(moved, symbol);
            }
        }
        Ok(object)
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(flag) => Value::Bool(*flag),
        Literal::Number(number) => Value::Number(*number),
        Literal::String(text) => Value::String(text.clone()),
    }
}

fn literal_key(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(flag) => flag.to_string(),
        Literal::Number(number) => format_number(*number),
        Literal::String(text) => text.clone(),
    }
}

/// Both operands are always evaluated; an unknown deciding operand is unknown.
fn logical(operator: &str, left: Value, right: Value) -> Option<Value> {
    let value = match operator {
        "&&" | "||" if left.is_unknown() => Value::Unknown,
        "&&" if ops::truthy(&left) => right,
        "&&" => left,
        "||" if ops::truthy(&left) => left,
        "||" => right,
        "??" => match left {
            Value::Unknown => Value::Unknown,
            Value::Undefined | Value::Null => right,
            other => other,
        },
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InferOptions;
    use crate::file::File;
    use crate::parser::parse_unit;
    use crate::report::LogReporter;

    fn walker(source: &str, options: InferOptions) -> Walker {
        let mut walker = Walker::new(options, Box::new(LogReporter::new(true)));
        let symbol = walker.heap.new_symbol(None, "test.js");
        walker.file = Some(File::new("test.js", source, symbol));
        let program = parse_unit("test.js", source).expect("parse").program;
        walker.run(&program).expect("run");
        walker
    }

    fn value(walker: &Walker, name: &str) -> Value {
        let root = walker.scopes.root();
        let symbol = walker.heap.own(root, name).expect("global symbol");
        walker.heap.symbol(symbol).value.clone()
    }

    fn member(walker: &Walker, object: &str, name: &str) -> SymbolId {
        let object = value(walker, object).as_object().expect("object");
        walker.heap.own(object, name).expect("member")
    }

    #[test]
    fn calls_bind_parameters_and_return() {
        let walker = walker(
            "function add(a, b) { return a + b; } var sum = add(1, 2);",
            InferOptions::default(),
        );
        assert_eq!(value(&walker, "sum"), Value::Number(3.0));
    }

    #[test]
    fn closures_see_their_declaration_scope() {
        let source = "var make = function() { var secret = 'x'; return function() { return secret; }; }; var r = make()();";
        let walker = walker(source, InferOptions::default());
        assert_eq!(value(&walker, "r"), Value::String("x".into()));
    }

    #[test]
    fn method_calls_bind_the_receiver() {
        let source = "var o = { n: 2, get2: function() { return this.n; } }; var r = o.get2();";
        let walker = walker(source, InferOptions::default());
        assert_eq!(value(&walker, "r"), Value::Number(2.0));
    }

    #[test]
    fn plain_calls_bind_this_to_root() {
        let walker = walker("function f() { this.leaked = 1; } f();", InferOptions::default());
        assert_eq!(value(&walker, "leaked"), Value::Number(1.0));
    }

    #[test]
    fn new_links_the_prototype() {
        let source = "function P(n) { this.n = n; } P.prototype.hi = 1; var p = new P(3); var h = p.hi; var isP = p instanceof P;";
        let walker = walker(source, InferOptions::default());
        assert_eq!(value(&walker, "h"), Value::Number(1.0));
        assert_eq!(value(&walker, "isP"), Value::Bool(true));
        let n = member(&walker, "p", "n");
        assert_eq!(walker.heap.symbol(n).value, Value::Number(3.0));
        let constructor = member(&walker, "p", "constructor");
        assert!(walker.heap.symbol(constructor).is_system());
    }

    #[test]
    fn constructors_returning_objects_replace_the_instance() {
        let source = "var other = {}; function F() { return other; } var same = new F() === other;";
        let walker = walker(source, InferOptions::default());
        assert_eq!(value(&walker, "same"), Value::Bool(true));
    }

    #[test]
    fn recursion_is_bounded() {
        let options = InferOptions {
            max_call_depth: 8,
            ..InferOptions::default()
        };
        let walker = walker("function f(n) { return f(n + 1); } var r = f(0);", options);
        assert_eq!(value(&walker, "r"), Value::Unknown);
    }

    #[test]
    fn undeclared_reads_create_missing_globals() {
        let walker = walker("var v = foo.bar;", InferOptions::default());
        let root = walker.scopes.root();
        let foo = walker.heap.own(root, "foo").expect("foo");
        assert!(walker.heap.symbol(foo).is_missing());
        assert!(walker.heap.symbol(foo).tags.has("global"));
        let bar = member(&walker, "foo", "bar");
        assert!(walker.heap.symbol(bar).is_missing());
    }

    #[test]
    fn bindings_from_unset_names_stay_missing() {
        let walker = walker(
            "var a; var b = a; var c = void 0; var d = c; var e = {}; e.f = foo.bar;",
            InferOptions::default(),
        );
        let root = walker.scopes.root();
        let missing = |name: &str| {
            let symbol = walker.heap.own(root, name).expect("declared");
            walker.heap.symbol(symbol).is_missing()
        };
        assert!(missing("a"));
        assert!(missing("b"));
        assert!(!missing("c"));
        assert!(!missing("d"));
        assert!(walker.heap.symbol(member(&walker, "e", "f")).is_missing());
        assert_eq!(value(&walker, "b"), Value::Unknown);
        assert_eq!(value(&walker, "d"), Value::Undefined);
    }

    #[test]
    fn writes_through_placeholders_make_owners_real() {
        let walker = walker("ns.util = 1;", InferOptions::default());
        let root = walker.scopes.root();
        let ns = walker.heap.own(root, "ns").expect("ns");
        assert!(!walker.heap.symbol(ns).is_missing());
    }

    #[test]
    fn compound_assignment_is_unknown() {
        let walker = walker("var a; a += 1;", InferOptions::default());
        assert_eq!(value(&walker, "a"), Value::Unknown);
    }

    #[test]
    fn operators_and_templates() {
        let source = "var t = typeof 'x'; var d = delete t.y; var n = -(2 * 5); var s = `a${1 + 1}b`; var u = `${unknownCall()}`; var o = null ?? 'dflt';";
        let walker = walker(source, InferOptions::default());
        assert_eq!(value(&walker, "t"), Value::String("string".into()));
        assert_eq!(value(&walker, "d"), Value::Bool(true));
        assert_eq!(value(&walker, "n"), Value::Number(-10.0));
        assert_eq!(value(&walker, "s"), Value::String("a2b".into()));
        assert_eq!(value(&walker, "u"), Value::Unknown);
        assert_eq!(value(&walker, "o"), Value::String("dflt".into()));
    }

    #[test]
    fn computed_members_use_string_keys() {
        let walker = walker("var o = {}; o['a' + 1] = true; var l = 'abc'.length;", InferOptions::default());
        let a1 = member(&walker, "o", "a1");
        assert_eq!(walker.heap.symbol(a1).value, Value::Bool(true));
        assert_eq!(value(&walker, "l"), Value::Number(3.0));
    }

    #[test]
    fn getters_and_setters_are_tagged() {
        let walker = walker(
            "var o = { get v() { return 1; }, set v(x) {} };",
            InferOptions::default(),
        );
        let v = member(&walker, "o", "v");
        assert!(walker.heap.symbol(v).tags.has("getter"));
        assert!(walker.heap.symbol(v).tags.has("setter"));
    }

    #[test]
    fn strict_mode_rejects_undeclared_reads() {
        let options = InferOptions {
            strict: true,
            ..InferOptions::default()
        };
        let mut walker = Walker::new(options, Box::new(LogReporter::new(false)));
        let program = parse_unit("s.js", "var x = nowhere;").expect("parse").program;
        let error = walker.run(&program).expect_err("unresolved");
        assert!(matches!(error, InferError::Unresolved { ref name } if name == "nowhere"));
    }
}
