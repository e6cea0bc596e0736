//! Surface parser adapter.
//!
//! Parses a unit with oxc and lowers the arena AST into the owned
//! [`syntax`](crate::syntax) tree, attaching documentation comments to the
//! outermost node that starts right after them.

use std::rc::Rc;

use once_cell::sync::Lazy;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    self, ArrayExpressionElement, Argument, ArrowFunctionExpression, AssignmentTarget,
    BindingPattern, BindingPatternKind, Comment, ComputedMemberExpression, Declaration,
    Expression, ForStatementInit, ForStatementLeft, FormalParameters, Function,
    ObjectPropertyKind, PropertyKey, SimpleAssignmentTarget, Statement, StaticMemberExpression,
    VariableDeclaration,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{InferError, Result};
use crate::syntax::{
    CommentList, DocComment, FunctionNode, Literal, Node, NodeKind, Position, Program,
    PropertyKind, SourceRange,
};

static FILE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(?:file|fileoverview|overview|license|module)\b").expect("valid regex")
});

/// A lowered unit plus the parser's recoverable diagnostics.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<String>,
}

/// `.mjs` parses as a module, `.jsx` with JSX, anything else as a sloppy script.
pub fn source_type_for(unit: &str) -> SourceType {
    if unit.ends_with(".mjs") {
        SourceType::mjs()
    } else if unit.ends_with(".jsx") {
        SourceType::jsx()
    } else {
        SourceType::cjs()
    }
}

/// Parse `source` and lower it.
///
/// Only a parser panic is an error; recoverable syntax errors are returned
/// as diagnostics next to the partial tree.
pub fn parse_unit(unit: &str, source: &str) -> Result<ParseOutput> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type_for(unit)).parse();

    let diagnostics: Vec<String> = parsed.errors.iter().map(ToString::to_string).collect();
    if parsed.panicked {
        return Err(InferError::parse(unit, diagnostics.join("; ")));
    }
    let mut lowerer = Lowerer::new(source, &parsed.program.comments);
    let body = lowerer.statements(&parsed.program.body);

    Ok(ParseOutput {
        program: Program {
            body,
            comments: lowerer.all,
            file_comments: lowerer.file_comments,
        },
        diagnostics,
    })
}

/// Maps byte offsets to line and character columns.
struct LineIndex {
    line_starts: Vec<u32>,
    /// Offsets of multi-byte characters with the bytes they add past one.
    wide_chars: Vec<(u32, u32)>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = Vec::with_capacity(128);
        let mut wide_chars = Vec::new();
        line_starts.push(0);
        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push((idx + 1) as u32);
            } else if ch.len_utf8() > 1 {
                wide_chars.push((idx as u32, (ch.len_utf8() - 1) as u32));
            }
        }
        Self {
            line_starts,
            wide_chars,
        }
    }

    fn position(&self, offset: u32) -> Position {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts[idx];
        let first = self.wide_chars.partition_point(|(at, _)| *at < line_start);
        let last = self.wide_chars.partition_point(|(at, _)| *at < offset);
        let extra: u32 = self.wide_chars[first..last].iter().map(|(_, extra)| extra).sum();
        Position {
            line: idx as u32 + 1,
            column: offset - line_start - extra + 1,
        }
    }

    fn range(&self, span: Span) -> SourceRange {
        SourceRange {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

struct Lowerer {
    lines: LineIndex,
    /// Unclaimed comments keyed by the offset of the token they precede.
    pending: FxHashMap<u32, CommentList>,
    all: CommentList,
    file_comments: CommentList,
}

impl Lowerer {
    fn new(source: &str, comments: &[Comment]) -> Self {
        let lines = LineIndex::new(source);
        let mut pending: FxHashMap<u32, CommentList> = FxHashMap::default();
        let mut all = CommentList::new();
        let mut file_comments = CommentList::new();

        for (index, comment) in comments.iter().enumerate() {
            let content = comment.content_span();
            let text = &source[content.start as usize..content.end as usize];
            let is_doc = if comment.is_line() {
                text.starts_with('/')
            } else {
                text.starts_with('*')
            };
            if !is_doc {
                continue;
            }

            let doc = Rc::new(DocComment::new(text, lines.range(comment.span)));
            let offset = attachment_offset(source, comments, index);
            all.push(Rc::clone(&doc));

            let at_start = all.len() == 1
                && source[..comment.span.start as usize].trim().is_empty();
            let documents_unit = at_start
                && (FILE_TAG.is_match(text)
                    || offset as usize >= source.len()
                    || shares_attachment(source, comments, index, offset));
            if documents_unit {
                file_comments.push(doc);
            } else {
                pending.entry(offset).or_default().push(doc);
            }
        }

        Self {
            lines,
            pending,
            all,
            file_comments,
        }
    }

    fn claim(&mut self, offset: u32) -> CommentList {
        self.pending.remove(&offset).unwrap_or_default()
    }

    fn finish(&self, kind: NodeKind, span: Span, comments: CommentList) -> Node {
        let node = Node::new(kind, Some(self.lines.range(span)));
        *node.comments.borrow_mut() = comments;
        node
    }

    fn node(&mut self, kind: NodeKind, span: Span) -> Node {
        let comments = self.claim(span.start);
        self.finish(kind, span, comments)
    }

    fn unsupported(&mut self, span: Span, kind: &'static str) -> Node {
        self.node(NodeKind::Unsupported(kind), span)
    }

    fn statements(&mut self, statements: &[Statement<'_>]) -> Vec<Node> {
        statements
            .iter()
            .map(|statement| self.statement(statement))
            .collect()
    }

    fn statement(&mut self, statement: &Statement<'_>) -> Node {
        let span = statement.span();
        let comments = self.claim(span.start);

        let kind = match statement {
            Statement::BlockStatement(block) => NodeKind::Block(self.statements(&block.body)),
            Statement::EmptyStatement(_) => NodeKind::Empty,
            Statement::ExpressionStatement(stmt) => {
                NodeKind::Expression(self.boxed(&stmt.expression))
            }
            Statement::IfStatement(stmt) => NodeKind::If {
                test: self.boxed(&stmt.test),
                consequent: Box::new(self.statement(&stmt.consequent)),
                alternate: stmt
                    .alternate
                    .as_ref()
                    .map(|alternate| Box::new(self.statement(alternate))),
            },
            Statement::WhileStatement(stmt) => NodeKind::While {
                test: self.boxed(&stmt.test),
                body: Box::new(self.statement(&stmt.body)),
            },
            Statement::DoWhileStatement(stmt) => NodeKind::DoWhile {
                body: Box::new(self.statement(&stmt.body)),
                test: self.boxed(&stmt.test),
            },
            Statement::ForStatement(stmt) => NodeKind::For {
                init: stmt.init.as_ref().map(|init| Box::new(self.for_init(init))),
                test: stmt.test.as_ref().map(|test| self.boxed(test)),
                update: stmt.update.as_ref().map(|update| self.boxed(update)),
                body: Box::new(self.statement(&stmt.body)),
            },
            Statement::ForInStatement(stmt) => NodeKind::ForIn {
                left: Box::new(self.for_left(&stmt.left)),
                right: self.boxed(&stmt.right),
                body: Box::new(self.statement(&stmt.body)),
            },
            Statement::TryStatement(stmt) => NodeKind::Try {
                block: Box::new(self.node_with(stmt.block.span, |lowerer| {
                    NodeKind::Block(lowerer.statements(&stmt.block.body))
                })),
                finalizer: stmt.finalizer.as_ref().map(|finalizer| {
                    Box::new(self.node_with(finalizer.span, |lowerer| {
                        NodeKind::Block(lowerer.statements(&finalizer.body))
                    }))
                }),
            },
            Statement::ReturnStatement(stmt) => {
                NodeKind::Return(stmt.argument.as_ref().map(|argument| self.boxed(argument)))
            }
            Statement::BreakStatement(_) => NodeKind::Break,
            Statement::ContinueStatement(_) => NodeKind::Continue,
            Statement::LabeledStatement(stmt) => {
                let body = self.statement(&stmt.body);
                prepend(&body, comments);
                return body;
            }
            Statement::VariableDeclaration(declaration) => self.declaration(declaration),
            Statement::FunctionDeclaration(function) => {
                NodeKind::FunctionDeclaration(self.function(function))
            }
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::VariableDeclaration(declaration)) => {
                    self.declaration(declaration)
                }
                Some(Declaration::FunctionDeclaration(function)) => {
                    NodeKind::FunctionDeclaration(self.function(function))
                }
                _ => NodeKind::Unsupported("ExportNamedDeclaration"),
            },
            other => NodeKind::Unsupported(statement_kind(other)),
        };

        self.finish(kind, span, comments)
    }

    /// Claim comments at `span` first so the node is their outermost owner.
    fn node_with(&mut self, span: Span, build: impl FnOnce(&mut Self) -> NodeKind) -> Node {
        let comments = self.claim(span.start);
        let kind = build(self);
        self.finish(kind, span, comments)
    }

    fn declaration(&mut self, declaration: &VariableDeclaration<'_>) -> NodeKind {
        NodeKind::Declaration(
            declaration
                .declarations
                .iter()
                .map(|declarator| {
                    let comments = self.claim(declarator.span.start);
                    let kind = NodeKind::Declarator {
                        id: Box::new(self.binding(&declarator.id)),
                        init: declarator.init.as_ref().map(|init| self.boxed(init)),
                    };
                    self.finish(kind, declarator.span, comments)
                })
                .collect(),
        )
    }

    fn binding(&mut self, pattern: &BindingPattern<'_>) -> Node {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(ident) => {
                self.node(NodeKind::Identifier(ident.name.to_string()), ident.span)
            }
            _ => self.unsupported(pattern.span(), "BindingPattern"),
        }
    }

    fn for_init(&mut self, init: &ForStatementInit<'_>) -> Node {
        match init {
            ForStatementInit::VariableDeclaration(declaration) => {
                let comments = self.claim(declaration.span.start);
                let kind = self.declaration(declaration);
                self.finish(kind, declaration.span, comments)
            }
            other => match other.as_expression() {
                Some(expression) => self.expression(expression),
                None => self.unsupported(other.span(), "ForStatementInit"),
            },
        }
    }

    fn for_left(&mut self, left: &ForStatementLeft<'_>) -> Node {
        match left {
            ForStatementLeft::VariableDeclaration(declaration) => {
                let comments = self.claim(declaration.span.start);
                let kind = self.declaration(declaration);
                self.finish(kind, declaration.span, comments)
            }
            other => match other.as_assignment_target() {
                Some(target) => self.assignment_target(target),
                None => self.unsupported(other.span(), "ForStatementLeft"),
            },
        }
    }

    fn boxed(&mut self, expression: &Expression<'_>) -> Box<Node> {
        Box::new(self.expression(expression))
    }

    fn expression(&mut self, expression: &Expression<'_>) -> Node {
        match expression {
            Expression::ParenthesizedExpression(paren) => {
                let comments = self.claim(paren.span.start);
                let inner = self.expression(&paren.expression);
                prepend(&inner, comments);
                return inner;
            }
            Expression::StaticMemberExpression(member) => return self.static_member(member),
            Expression::ComputedMemberExpression(member) => {
                return self.computed_member(member);
            }
            _ => {}
        }

        let span = expression.span();
        let comments = self.claim(span.start);
        let kind = match expression {
            Expression::BooleanLiteral(literal) => NodeKind::Literal(Literal::Bool(literal.value)),
            Expression::NullLiteral(_) => NodeKind::Literal(Literal::Null),
            Expression::NumericLiteral(literal) => {
                NodeKind::Literal(Literal::Number(literal.value))
            }
            Expression::StringLiteral(literal) => {
                NodeKind::Literal(Literal::String(literal.value.to_string()))
            }
            Expression::TemplateLiteral(template) => NodeKind::Template {
                quasis: template
                    .quasis
                    .iter()
                    .map(|quasi| match &quasi.value.cooked {
                        Some(cooked) => cooked.to_string(),
                        None => quasi.value.raw.to_string(),
                    })
                    .collect(),
                expressions: template
                    .expressions
                    .iter()
                    .map(|expression| self.expression(expression))
                    .collect(),
            },
            Expression::Identifier(ident) => NodeKind::Identifier(ident.name.to_string()),
            Expression::ThisExpression(_) => NodeKind::This,
            Expression::ArrayExpression(array) => NodeKind::Array(
                array
                    .elements
                    .iter()
                    .map(|element| match element {
                        ArrayExpressionElement::Elision(_) => None,
                        other => Some(match other.as_expression() {
                            Some(expression) => self.expression(expression),
                            None => self.unsupported(other.span(), "SpreadElement"),
                        }),
                    })
                    .collect(),
            ),
            Expression::ObjectExpression(object) => NodeKind::Object(
                object
                    .properties
                    .iter()
                    .map(|property| self.property(property))
                    .collect(),
            ),
            Expression::FunctionExpression(function) => NodeKind::Function(self.function(function)),
            Expression::ArrowFunctionExpression(arrow) => NodeKind::Function(self.arrow(arrow)),
            Expression::CallExpression(call) => NodeKind::Call {
                callee: self.boxed(&call.callee),
                arguments: self.arguments(&call.arguments),
            },
            Expression::NewExpression(new) => NodeKind::New {
                callee: self.boxed(&new.callee),
                arguments: self.arguments(&new.arguments),
            },
            Expression::UnaryExpression(unary) => NodeKind::Unary {
                operator: unary.operator.as_str(),
                argument: self.boxed(&unary.argument),
            },
            Expression::BinaryExpression(binary) => NodeKind::Binary {
                operator: binary.operator.as_str(),
                left: self.boxed(&binary.left),
                right: self.boxed(&binary.right),
            },
            Expression::LogicalExpression(logical) => NodeKind::Logical {
                operator: logical.operator.as_str(),
                left: self.boxed(&logical.left),
                right: self.boxed(&logical.right),
            },
            Expression::UpdateExpression(update) => NodeKind::Update {
                operator: update.operator.as_str(),
                prefix: update.prefix,
                argument: Box::new(self.simple_target(&update.argument)),
            },
            Expression::AssignmentExpression(assignment) => NodeKind::Assignment {
                operator: assignment.operator.as_str(),
                left: Box::new(self.assignment_target(&assignment.left)),
                right: self.boxed(&assignment.right),
            },
            Expression::SequenceExpression(sequence) => NodeKind::Sequence(
                sequence
                    .expressions
                    .iter()
                    .map(|expression| self.expression(expression))
                    .collect(),
            ),
            Expression::ConditionalExpression(conditional) => NodeKind::Conditional {
                test: self.boxed(&conditional.test),
                consequent: self.boxed(&conditional.consequent),
                alternate: self.boxed(&conditional.alternate),
            },
            other => NodeKind::Unsupported(expression_kind(other)),
        };

        self.finish(kind, span, comments)
    }

    fn static_member(&mut self, member: &StaticMemberExpression<'_>) -> Node {
        let comments = self.claim(member.span.start);
        let object = self.boxed(&member.object);
        let property = self.node(
            NodeKind::Identifier(member.property.name.to_string()),
            member.property.span,
        );
        let kind = NodeKind::Member {
            object,
            property: Box::new(property),
            computed: false,
        };
        self.finish(kind, member.span, comments)
    }

    fn computed_member(&mut self, member: &ComputedMemberExpression<'_>) -> Node {
        let comments = self.claim(member.span.start);
        let kind = NodeKind::Member {
            object: self.boxed(&member.object),
            property: self.boxed(&member.expression),
            computed: true,
        };
        self.finish(kind, member.span, comments)
    }

    fn assignment_target(&mut self, target: &AssignmentTarget<'_>) -> Node {
        match target {
            AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                self.node(NodeKind::Identifier(ident.name.to_string()), ident.span)
            }
            AssignmentTarget::StaticMemberExpression(member) => self.static_member(member),
            AssignmentTarget::ComputedMemberExpression(member) => self.computed_member(member),
            other => self.unsupported(other.span(), "AssignmentTargetPattern"),
        }
    }

    fn simple_target(&mut self, target: &SimpleAssignmentTarget<'_>) -> Node {
        match target {
            SimpleAssignmentTarget::AssignmentTargetIdentifier(ident) => {
                self.node(NodeKind::Identifier(ident.name.to_string()), ident.span)
            }
            SimpleAssignmentTarget::StaticMemberExpression(member) => self.static_member(member),
            SimpleAssignmentTarget::ComputedMemberExpression(member) => {
                self.computed_member(member)
            }
            other => self.unsupported(other.span(), "SimpleAssignmentTarget"),
        }
    }

    fn arguments(&mut self, arguments: &[Argument<'_>]) -> Vec<Node> {
        arguments
            .iter()
            .map(|argument| match argument.as_expression() {
                Some(expression) => self.expression(expression),
                None => self.unsupported(argument.span(), "SpreadElement"),
            })
            .collect()
    }

    fn property(&mut self, property: &ObjectPropertyKind<'_>) -> Node {
        match property {
            ObjectPropertyKind::ObjectProperty(property) => {
                let comments = self.claim(property.span.start);
                let key = self.property_key(&property.key);
                let value = self.boxed(&property.value);
                let kind = match property.kind {
                    ast::PropertyKind::Init => PropertyKind::Init,
                    ast::PropertyKind::Get => PropertyKind::Get,
                    ast::PropertyKind::Set => PropertyKind::Set,
                };
                let kind = NodeKind::Property {
                    key: Box::new(key),
                    value,
                    kind,
                    computed: property.computed,
                };
                self.finish(kind, property.span, comments)
            }
            ObjectPropertyKind::SpreadProperty(spread) => {
                self.unsupported(spread.span, "SpreadElement")
            }
        }
    }

    fn property_key(&mut self, key: &PropertyKey<'_>) -> Node {
        match key {
            PropertyKey::StaticIdentifier(ident) => {
                self.node(NodeKind::Identifier(ident.name.to_string()), ident.span)
            }
            PropertyKey::PrivateIdentifier(ident) => {
                self.node(NodeKind::Identifier(format!("#{}", ident.name)), ident.span)
            }
            other => match other.as_expression() {
                Some(expression) => self.expression(expression),
                None => self.unsupported(other.span(), "PropertyKey"),
            },
        }
    }

    fn params(&mut self, params: &FormalParameters<'_>) -> Vec<Node> {
        let mut lowered: Vec<Node> = params
            .items
            .iter()
            .map(|param| self.binding(&param.pattern))
            .collect();
        if let Some(rest) = &params.rest {
            lowered.push(self.binding(&rest.argument));
        }
        lowered
    }

    fn function(&mut self, function: &Function<'_>) -> Rc<FunctionNode> {
        let id = function
            .id
            .as_ref()
            .map(|id| self.node(NodeKind::Identifier(id.name.to_string()), id.span));
        let params = self.params(&function.params);
        let (body, body_loc) = match &function.body {
            Some(body) => (
                self.statements(&body.statements),
                Some(self.lines.range(body.span)),
            ),
            None => (Vec::new(), None),
        };

        Rc::new(FunctionNode {
            id,
            params,
            body,
            body_loc,
            arrow: false,
        })
    }

    fn arrow(&mut self, arrow: &ArrowFunctionExpression<'_>) -> Rc<FunctionNode> {
        let params = self.params(&arrow.params);
        let body = if arrow.expression {
            arrow
                .body
                .statements
                .iter()
                .map(|statement| match statement {
                    Statement::ExpressionStatement(stmt) => {
                        let value = self.expression(&stmt.expression);
                        Node::new(
                            NodeKind::Return(Some(Box::new(value))),
                            Some(self.lines.range(stmt.span)),
                        )
                    }
                    other => self.statement(other),
                })
                .collect()
        } else {
            self.statements(&arrow.body.statements)
        };

        Rc::new(FunctionNode {
            id: None,
            params,
            body,
            body_loc: Some(self.lines.range(arrow.body.span)),
            arrow: true,
        })
    }
}

fn prepend(node: &Node, mut comments: CommentList) {
    if comments.is_empty() {
        return;
    }
    let mut existing = node.comments.borrow_mut();
    comments.append(&mut existing);
    *existing = comments;
}

/// Offset of the first token after comment `index`, skipping whitespace and
/// any comments in between.
fn attachment_offset(source: &str, comments: &[Comment], index: usize) -> u32 {
    let bytes = source.as_bytes();
    let mut offset = comments[index].span.end as usize;
    let mut next = index + 1;
    loop {
        while offset < bytes.len() && bytes[offset].is_ascii_whitespace() {
            offset += 1;
        }
        match comments.get(next) {
            Some(comment) if comment.span.start as usize == offset => {
                offset = comment.span.end as usize;
                next += 1;
            }
            _ => break,
        }
    }
    offset as u32
}

/// Whether a later documentation comment precedes the same token.
fn shares_attachment(source: &str, comments: &[Comment], index: usize, offset: u32) -> bool {
    comments
        .iter()
        .enumerate()
        .skip(index + 1)
        .take_while(|(_, comment)| comment.span.start < offset)
        .any(|(later, comment)| {
            let content = comment.content_span();
            let text = &source[content.start as usize..content.end as usize];
            let is_doc = if comment.is_line() {
                text.starts_with('/')
            } else {
                text.starts_with('*')
            };
            is_doc && attachment_offset(source, comments, later) == offset
        })
}

fn statement_kind(statement: &Statement<'_>) -> &'static str {
    match statement {
        Statement::SwitchStatement(_) => "SwitchStatement",
        Statement::ThrowStatement(_) => "ThrowStatement",
        Statement::ForOfStatement(_) => "ForOfStatement",
        Statement::WithStatement(_) => "WithStatement",
        Statement::DebuggerStatement(_) => "DebuggerStatement",
        Statement::ClassDeclaration(_) => "ClassDeclaration",
        Statement::ImportDeclaration(_) => "ImportDeclaration",
        Statement::ExportDefaultDeclaration(_) => "ExportDefaultDeclaration",
        Statement::ExportAllDeclaration(_) => "ExportAllDeclaration",
        _ => "Statement",
    }
}

fn expression_kind(expression: &Expression<'_>) -> &'static str {
    match expression {
        Expression::BigIntLiteral(_) => "BigIntLiteral",
        Expression::RegExpLiteral(_) => "RegExpLiteral",
        Expression::ClassExpression(_) => "ClassExpression",
        Expression::AwaitExpression(_) => "AwaitExpression",
        Expression::YieldExpression(_) => "YieldExpression",
        Expression::ChainExpression(_) => "ChainExpression",
        Expression::TaggedTemplateExpression(_) => "TaggedTemplateExpression",
        Expression::ImportExpression(_) => "ImportExpression",
        Expression::Super(_) => "Super",
        Expression::MetaProperty(_) => "MetaProperty",
        Expression::PrivateFieldExpression(_) => "PrivateFieldExpression",
        Expression::PrivateInExpression(_) => "PrivateInExpression",
        _ => "Expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        parse_unit("test.js", source).expect("parse").program
    }

    fn comment_texts(node: &Node) -> Vec<String> {
        node.comments
            .borrow()
            .iter()
            .map(|comment| comment.text.trim().to_string())
            .collect()
    }

    #[test]
    fn comments_attach_to_outermost_node() {
        let program = parse("var x;\n/** doc */\na.b = 1;");
        assert_eq!(program.body.len(), 2);
        assert_eq!(comment_texts(&program.body[1]), ["* doc"]);

        let NodeKind::Expression(expression) = &program.body[1].kind else {
            panic!("expected expression statement");
        };
        assert!(expression.comments.borrow().is_empty());
    }

    #[test]
    fn plain_comments_are_ignored() {
        let program = parse("/* plain */\n// line\nvar x = 1;");
        assert!(program.comments.is_empty());
        assert!(program.body[0].comments.borrow().is_empty());
    }

    #[test]
    fn triple_slash_comments_are_documentation() {
        let program = parse("var y;\n/// @private\nfunction f() {}");
        assert_eq!(comment_texts(&program.body[1]), ["/ @private"]);
    }

    #[test]
    fn leading_file_comment_is_separated() {
        let program = parse("/** @license MIT */\n/** @class */\nfunction A() {}");
        assert_eq!(program.file_comments.len(), 1);
        assert_eq!(comment_texts(&program.body[0]), ["* @class"]);
    }

    #[test]
    fn single_leading_comment_documents_the_node() {
        let program = parse("/** Adds. */\nfunction add() {}");
        assert!(program.file_comments.is_empty());
        assert_eq!(comment_texts(&program.body[0]), ["* Adds."]);
    }

    #[test]
    fn parentheses_are_transparent() {
        let program = parse("x = (1 + 2);");
        let NodeKind::Expression(expression) = &program.body[0].kind else {
            panic!("expected expression statement");
        };
        let NodeKind::Assignment { right, .. } = &expression.kind else {
            panic!("expected assignment");
        };
        assert!(matches!(right.kind, NodeKind::Binary { operator: "+", .. }));
    }

    #[test]
    fn positions_are_one_based() {
        let program = parse("\n  var a = 1;");
        let loc = program.body[0].loc.expect("location");
        assert_eq!(loc.start, Position { line: 2, column: 3 });
    }

    #[test]
    fn columns_count_characters() {
        let program = parse("var s = \"é😀\"; var t = 1;\nvar u = 'ü'; u;");
        let loc = program.body[1].loc.expect("location");
        assert_eq!(loc.start, Position { line: 1, column: 15 });

        let loc = program.body[3].loc.expect("location");
        assert_eq!(loc.start, Position { line: 2, column: 14 });
    }

    #[test]
    fn unsupported_constructs_keep_their_kind() {
        let program = parse("class A {}");
        assert!(matches!(
            program.body[0].kind,
            NodeKind::Unsupported("ClassDeclaration")
        ));
    }

    #[test]
    fn source_type_follows_extension() {
        assert!(source_type_for("a.mjs").is_module());
        assert!(source_type_for("a.jsx").is_jsx());
        assert!(!source_type_for("a.js").is_module());
    }
}
