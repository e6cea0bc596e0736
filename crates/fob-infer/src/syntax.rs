//! Owned syntax tree produced by [`crate::parser`].
//!
//! Function bodies outlive the parser arena (they are evaluated on each
//! call), so the oxc AST is lowered into these nodes once per unit.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

/// 1-based line and column; columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    /// Inclusive on both ends.
    pub fn contains(&self, line: u32, column: u32) -> bool {
        let after_start = line > self.start.line
            || (line == self.start.line && column >= self.start.column);
        let before_end =
            line < self.end.line || (line == self.end.line && column <= self.end.column);
        after_start && before_end
    }
}

/// A documentation comment and whether it has been applied yet.
#[derive(Debug)]
pub struct DocComment {
    /// Comment body without the `/*`, `*/` or `//` delimiters.
    pub text: String,
    pub range: SourceRange,
    consumed: Cell<bool>,
}

impl DocComment {
    pub fn new(text: impl Into<String>, range: SourceRange) -> Self {
        Self {
            text: text.into(),
            range,
            consumed: Cell::new(false),
        }
    }

    /// Mark as applied. Returns `false` if it already was.
    pub fn consume(&self) -> bool {
        !self.consumed.replace(true)
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}

pub type CommentList = Vec<Rc<DocComment>>;

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub loc: Option<SourceRange>,
    pub comments: RefCell<CommentList>,
}

impl Node {
    pub fn new(kind: NodeKind, loc: Option<SourceRange>) -> Self {
        Self {
            kind,
            loc,
            comments: RefCell::new(Vec::new()),
        }
    }

    pub fn take_comments(&self) -> CommentList {
        std::mem::take(&mut *self.comments.borrow_mut())
    }

    /// Move this node's comments in front of `target`'s own.
    pub fn transfer_comments(&self, target: &Node) {
        if std::ptr::eq(self, target) {
            return;
        }
        let mut moved = self.take_comments();
        if moved.is_empty() {
            return;
        }
        let mut existing = target.comments.borrow_mut();
        moved.append(&mut existing);
        *existing = moved;
    }

    /// Name of an identifier node.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug)]
pub struct FunctionNode {
    pub id: Option<Node>,
    pub params: Vec<Node>,
    pub body: Vec<Node>,
    /// Range of the body, registered as the function's scope range.
    pub body_loc: Option<SourceRange>,
    pub arrow: bool,
}

impl FunctionNode {
    pub fn name(&self) -> &str {
        self.id.as_ref().and_then(Node::identifier).unwrap_or_default()
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Block(Vec<Node>),
    Empty,
    Expression(Box<Node>),
    If {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    While {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
        test: Box<Node>,
    },
    For {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForIn {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    Try {
        block: Box<Node>,
        finalizer: Option<Box<Node>>,
    },
    Return(Option<Box<Node>>),
    Break,
    Continue,
    /// `var`, `let` and `const`; children are [`NodeKind::Declarator`]s.
    Declaration(Vec<Node>),
    Declarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    FunctionDeclaration(Rc<FunctionNode>),

    Function(Rc<FunctionNode>),
    Identifier(String),
    This,
    Literal(Literal),
    Template {
        quasis: Vec<String>,
        expressions: Vec<Node>,
    },
    Array(Vec<Option<Node>>),
    Object(Vec<Node>),
    Property {
        key: Box<Node>,
        value: Box<Node>,
        kind: PropertyKind,
        computed: bool,
    },
    Member {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    New {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Unary {
        operator: &'static str,
        argument: Box<Node>,
    },
    Binary {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    Logical {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    Update {
        operator: &'static str,
        prefix: bool,
        argument: Box<Node>,
    },
    Assignment {
        operator: &'static str,
        left: Box<Node>,
        right: Box<Node>,
    },
    Sequence(Vec<Node>),
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    /// Anything the walker has no semantics for, by syntactic kind name.
    Unsupported(&'static str),
}

impl NodeKind {
    /// Syntactic kind name, as reported for unsupported constructs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Block(_) => "BlockStatement",
            Self::Empty => "EmptyStatement",
            Self::Expression(_) => "ExpressionStatement",
            Self::If { .. } => "IfStatement",
            Self::While { .. } => "WhileStatement",
            Self::DoWhile { .. } => "DoWhileStatement",
            Self::For { .. } => "ForStatement",
            Self::ForIn { .. } => "ForInStatement",
            Self::Try { .. } => "TryStatement",
            Self::Return(_) => "ReturnStatement",
            Self::Break => "BreakStatement",
            Self::Continue => "ContinueStatement",
            Self::Declaration(_) => "VariableDeclaration",
            Self::Declarator { .. } => "VariableDeclarator",
            Self::FunctionDeclaration(_) => "FunctionDeclaration",
            Self::Function(_) => "FunctionExpression",
            Self::Identifier(_) => "Identifier",
            Self::This => "ThisExpression",
            Self::Literal(_) => "Literal",
            Self::Template { .. } => "TemplateLiteral",
            Self::Array(_) => "ArrayExpression",
            Self::Object(_) => "ObjectExpression",
            Self::Property { .. } => "Property",
            Self::Member { .. } => "MemberExpression",
            Self::Call { .. } => "CallExpression",
            Self::New { .. } => "NewExpression",
            Self::Unary { .. } => "UnaryExpression",
            Self::Binary { .. } => "BinaryExpression",
            Self::Logical { .. } => "LogicalExpression",
            Self::Update { .. } => "UpdateExpression",
            Self::Assignment { .. } => "AssignmentExpression",
            Self::Sequence(_) => "SequenceExpression",
            Self::Conditional { .. } => "ConditionalExpression",
            Self::Unsupported(kind) => *kind,
        }
    }
}

/// A lowered compilation unit.
#[derive(Debug, Default)]
pub struct Program {
    pub body: Vec<Node>,
    /// Every documentation comment of the unit, in source order.
    pub comments: CommentList,
    /// Comments documenting the unit itself rather than a node.
    pub file_comments: CommentList,
}
