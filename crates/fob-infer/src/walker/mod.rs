//! Abstract interpreter over the lowered syntax tree.
//!
//! Statements thread a [`Flow`] outcome so that `return`, `break` and
//! `continue` unwind to the nearest call or loop without any other control
//! mechanism. Expressions live in [`expr`], operator semantics in [`ops`].

mod expr;
pub mod ops;

use tracing::{debug, trace};

use crate::config::InferOptions;
use crate::error::Result;
use crate::file::File;
use crate::heap::Heap;
use crate::parser::parse_unit;
use crate::report::Reporter;
use crate::scope::ScopeManager;
use crate::symbol::Location;
use crate::syntax::{CommentList, Node, NodeKind, Program, SourceRange};
use crate::value::{ObjectId, SymbolId, Value};

/// Outcome of evaluating a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal(Value),
    Return(Value),
    Break,
    Continue,
}

/// Whether a reference is read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Write,
}

pub struct Walker {
    pub(crate) heap: Heap,
    pub(crate) scopes: ScopeManager,
    pub(crate) options: InferOptions,
    reporter: Box<dyn Reporter>,
    /// Unit being compiled.
    pub(crate) file: Option<File>,
    /// Declarations are hidden from the symbol table.
    pub(crate) system: bool,
    pub(crate) strict: bool,
    /// Set while resolving a name for a tag or a query.
    resolving: bool,
    depth: usize,
}

impl Walker {
    pub fn new(options: InferOptions, reporter: Box<dyn Reporter>) -> Self {
        let mut heap = Heap::new();
        let scopes = ScopeManager::new(&mut heap);
        let strict = options.strict;
        Self {
            heap,
            scopes,
            options,
            reporter,
            file: None,
            system: false,
            strict,
            resolving: false,
            depth: 0,
        }
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub(crate) fn reporter_mut(&mut self) -> &mut dyn Reporter {
        self.reporter.as_mut()
    }

    /// Walk a whole unit. Comments that no node applied are handled last.
    pub(crate) fn run(&mut self, program: &Program) -> Result<Value> {
        if let Some(file) = self.file.as_ref().map(|file| file.symbol) {
            self.parse_comments(file, program.file_comments.clone());
        }

        let flow = self.body(&program.body)?;

        for comment in &program.comments {
            if comment.is_consumed() {
                continue;
            }
            let location = self.location(Some(comment.range));
            self.reporter
                .warning("documentation comment is not attached to a symbol", location);
            let scratch = self.heap.new_symbol(None, "");
            self.parse_comments(scratch, vec![comment.clone()]);
        }

        Ok(match flow {
            Flow::Normal(value) | Flow::Return(value) => value,
            Flow::Break | Flow::Continue => Value::Undefined,
        })
    }

    pub(crate) fn location(&self, range: Option<SourceRange>) -> Option<Location> {
        let file = self.file.as_ref()?;
        range.map(|range| Location {
            file: file.name.clone(),
            range,
        })
    }

    pub(crate) fn unsupported(&mut self, node: &Node) -> Value {
        let location = self.location(node.loc);
        self.reporter.unsupported(node.kind.name(), location);
        Value::Unknown
    }

    pub(crate) fn unsupported_operator(&mut self, node: &Node, operator: &str) -> Value {
        let location = self.location(node.loc);
        let kind = format!("{} ({operator})", node.kind.name());
        self.reporter.unsupported(&kind, location);
        Value::Unknown
    }

    /// Function or program body: function declarations are hoisted.
    pub(crate) fn body(&mut self, body: &[Node]) -> Result<Flow> {
        for node in body {
            if let NodeKind::FunctionDeclaration(_) = node.kind {
                self.statement(node)?;
            }
        }

        let mut last = Value::Undefined;
        for node in body {
            if let NodeKind::FunctionDeclaration(_) = node.kind {
                continue;
            }
            match self.statement(node)? {
                Flow::Normal(value) => last = value,
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal(last))
    }

    pub(crate) fn statements(&mut self, body: &[Node]) -> Result<Flow> {
        let mut last = Value::Undefined;
        for node in body {
            match self.statement(node)? {
                Flow::Normal(value) => last = value,
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal(last))
    }

    pub(crate) fn statement(&mut self, node: &Node) -> Result<Flow> {
        let flow = match &node.kind {
            NodeKind::Block(body) => return self.statements(body),
            NodeKind::Empty => Flow::Normal(Value::Undefined),
            NodeKind::Expression(expression) => {
                node.transfer_comments(expression);
                Flow::Normal(self.expr(expression)?)
            }
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.expr(test)?;
                if ops::truthy(&test) {
                    return self.statement(consequent);
                }
                match alternate {
                    Some(alternate) => return self.statement(alternate),
                    None => Flow::Normal(Value::Undefined),
                }
            }
            NodeKind::While { test, body } => {
                self.repeat(Some(test.as_ref()), None, body, true)?
            }
            NodeKind::DoWhile { body, test } => {
                self.repeat(Some(test.as_ref()), None, body, false)?
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.statement(init)?;
                }
                self.repeat(test.as_deref(), update.as_deref(), body, true)?
            }
            NodeKind::ForIn { left, right, body } => self.for_in(left, right, body)?,
            NodeKind::Try { block, finalizer } => {
                let flow = self.statement(block)?;
                if let Some(finalizer) = finalizer {
                    let after = self.statement(finalizer)?;
                    if !matches!(after, Flow::Normal(_)) {
                        return Ok(after);
                    }
                }
                flow
            }
            NodeKind::Return(argument) => {
                let value = match argument {
                    Some(argument) => self.expr(argument)?,
                    None => Value::Undefined,
                };
                Flow::Return(value)
            }
            NodeKind::Break => Flow::Break,
            NodeKind::Continue => Flow::Continue,
            NodeKind::Declaration(declarators) => {
                if let Some(first) = declarators.first() {
                    node.transfer_comments(first);
                }
                for declarator in declarators {
                    self.declarator(declarator)?;
                }
                Flow::Normal(Value::Undefined)
            }
            NodeKind::FunctionDeclaration(function) => {
                let func = self.make_function(function);
                match &function.id {
                    Some(id) => {
                        let mut comments = node.take_comments();
                        comments.extend(id.take_comments());
                        let container = self.scopes.current();
                        self.init_symbol(
                            function.name(),
                            node.loc,
                            container,
                            Some(Value::Object(func)),
                            comments,
                        );
                    }
                    None => {
                        self.unsupported(node);
                    }
                }
                Flow::Normal(Value::Undefined)
            }
            _ => Flow::Normal(self.expr(node)?),
        };
        Ok(flow)
    }

    /// Bounded loop. `check_first` is false for `do … while`.
    fn repeat(
        &mut self,
        test: Option<&Node>,
        update: Option<&Node>,
        body: &Node,
        check_first: bool,
    ) -> Result<Flow> {
        let mut iterations = 0;
        loop {
            if check_first || iterations > 0 {
                if let Some(test) = test {
                    let value = self.expr(test)?;
                    if !ops::truthy(&value) {
                        break;
                    }
                }
            }
            if iterations >= self.options.max_loops {
                debug!(max_loops = self.options.max_loops, "loop bound reached");
                break;
            }
            iterations += 1;

            match self.statement(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
            if let Some(update) = update {
                self.expr(update)?;
            }
        }
        trace!(iterations, "loop finished");
        Ok(Flow::Normal(Value::Undefined))
    }

    /// One iteration per property name known when the loop starts.
    fn for_in(&mut self, left: &Node, right: &Node, body: &Node) -> Result<Flow> {
        let right = self.expr(right)?;
        let Some(object) = right.as_object() else {
            return Ok(Flow::Normal(Value::Undefined));
        };

        let names = self.heap.enumerate(object);
        for name in names.into_iter().take(self.options.max_loops) {
            self.bind_loop_variable(left, name)?;
            match self.statement(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
        }
        Ok(Flow::Normal(Value::Undefined))
    }

    fn bind_loop_variable(&mut self, left: &Node, name: String) -> Result<()> {
        if let NodeKind::Declaration(declarators) = &left.kind {
            let Some(NodeKind::Declarator { id, .. }) = declarators.first().map(|node| &node.kind)
            else {
                self.unsupported(left);
                return Ok(());
            };
            let Some(ident) = id.identifier() else {
                self.unsupported(id);
                return Ok(());
            };
            let mut comments = left.take_comments();
            comments.extend(id.take_comments());
            let container = self.scopes.current();
            self.init_symbol(ident, id.loc, container, Some(Value::String(name)), comments);
            return Ok(());
        }

        match self.reference(left, Access::Write)? {
            Some(symbol) => self.heap.assign(symbol, Value::String(name)),
            None => {
                self.unsupported(left);
            }
        }
        Ok(())
    }

    fn declarator(&mut self, node: &Node) -> Result<()> {
        let NodeKind::Declarator { id, init } = &node.kind else {
            self.unsupported(node);
            return Ok(());
        };
        let Some(name) = id.identifier() else {
            self.unsupported(id);
            return Ok(());
        };

        let value = match init {
            Some(init) => Some(self.bound_value(init)?),
            None => None,
        };
        let mut comments = node.take_comments();
        comments.extend(id.take_comments());
        let container = self.scopes.current();
        self.init_symbol(name, node.loc, container, value, comments);
        Ok(())
    }

    /// Declare `name` on `container`, record where, bind `value` and apply
    /// the documentation comments.
    pub(crate) fn init_symbol(
        &mut self,
        name: &str,
        range: Option<SourceRange>,
        container: ObjectId,
        value: Option<Value>,
        comments: CommentList,
    ) -> SymbolId {
        let symbol = self.heap.get(container, name);
        let location = self.location(range);
        let global = container == self.scopes.root();

        let entry = self.heap.symbol_mut(symbol);
        if location.is_some() {
            entry.location = location;
        }
        if self.system {
            entry.tags.set("system", true);
        }
        if global {
            entry.tags.set("global", true);
        }

        if let Some(value) = value {
            self.heap.assign(symbol, value);
        }
        self.parse_comments(symbol, comments);
        symbol
    }

    /// Resolve a qualified name (`a.b`, `A#m`, `A#`) as a member expression
    /// evaluated in `scope`, or the current scope.
    ///
    /// With `strict` set, names that were never declared fail with
    /// [`InferError::Unresolved`]; otherwise they are auto-vivified. Names
    /// that do not parse as a single expression resolve to nothing.
    pub(crate) fn find_symbol(
        &mut self,
        name: &str,
        scope: Option<ObjectId>,
        strict: bool,
    ) -> Result<Option<SymbolId>> {
        let source = qualified_expression(name);
        let program = match parse_unit("<lookup>", &source) {
            Ok(output) if output.diagnostics.is_empty() => output.program,
            _ => return Ok(None),
        };
        let [statement] = program.body.as_slice() else {
            return Ok(None);
        };
        let NodeKind::Expression(expression) = &statement.kind else {
            return Ok(None);
        };

        let scope = scope.unwrap_or_else(|| self.scopes.current());
        let frame = self.scopes.enter(scope);
        let saved = (self.strict, self.resolving);
        self.strict = strict;
        self.resolving = true;

        let result = self.reference(expression, Access::Read);

        (self.strict, self.resolving) = saved;
        self.scopes.restore(frame);
        result
    }

    /// Lenient resolution used by tags: a name that does not resolve is a
    /// property of the root object.
    pub(crate) fn resolve_symbol(&mut self, name: &str) -> SymbolId {
        match self.find_symbol(name, None, false) {
            Ok(Some(symbol)) => symbol,
            _ => {
                let root = self.scopes.root();
                self.heap.get(root, name)
            }
        }
    }

    pub(crate) fn register_member(&mut self, symbol: SymbolId, range: Option<SourceRange>) {
        if self.resolving {
            return;
        }
        if let (Some(file), Some(range)) = (self.file.as_mut(), range) {
            file.register_member(symbol, range);
        }
    }

    pub(crate) fn register_function(&mut self, scope: ObjectId, range: Option<SourceRange>) {
        if self.resolving {
            return;
        }
        if let (Some(file), Some(range)) = (self.file.as_mut(), range) {
            file.register_function(scope, range);
        }
    }
}

/// `A#m` names the instance member `A.prototype.m`, `A#` the prototype.
fn qualified_expression(name: &str) -> String {
    let name = match name.strip_suffix('#') {
        Some(base) => format!("{base}.prototype"),
        None => name.to_string(),
    };
    name.replace('#', ".prototype.")
}
