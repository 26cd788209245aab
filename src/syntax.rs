//! Syntax module for the JavaScript subset understood by inline-expand.
//!
//! This module provides the typed syntax tree the parser produces and the
//! printer consumes. Node kinds form a closed set of sum types so that every
//! tree walk (substitution, export resolution, site search, printing) is an
//! exhaustive `match`.

use serde::{Deserialize, Serialize};

pub mod parser;
pub mod printer;
pub mod visit;

/// Represents a byte range in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

/// Statements carry their span so that the driver can splice over them.
pub type StmtNode = Spanned<Stmt>;

/// A parsed module or script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<StmtNode>,
    pub span: Span,
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    Var(VarDecl),
    Function(Function),
    Class(Class),
    Return(Option<Expr>),
    If {
        test: Expr,
        consequent: Box<StmtNode>,
        alternate: Option<Box<StmtNode>>,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<StmtNode>,
    },
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<StmtNode>,
        /// `true` for `for (.. of ..)`, `false` for `for (.. in ..)`.
        of: bool,
        /// `for await (.. of ..)`.
        is_await: bool,
    },
    While {
        test: Expr,
        body: Box<StmtNode>,
    },
    DoWhile {
        body: Box<StmtNode>,
        test: Expr,
    },
    Block(Vec<StmtNode>),
    /// `break` with an optional label.
    Break(Option<String>),
    Continue(Option<String>),
    Labeled {
        label: String,
        body: Box<StmtNode>,
    },
    With {
        object: Expr,
        body: Box<StmtNode>,
    },
    Throw(Expr),
    Try {
        block: Vec<StmtNode>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<StmtNode>>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Import(ImportDecl),
    Export(ExportDecl),
    Debugger,
    Empty,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub target: Pattern,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForHead {
    Var(VarKind, Pattern),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` for the `default:` case.
    pub test: Option<Expr>,
    pub body: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportSpecifier>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportDecl {
    Function(Function),
    Class(Class),
    Var(VarDecl),
    DefaultClass(Class),
    DefaultFunction(Function),
    DefaultExpr(Expr),
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },
    /// `export * from '..'` or `export * as name from '..'`.
    All {
        exported: Option<String>,
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: Option<String>,
}

// ============================================================================
// FUNCTIONS AND CLASSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Vec<StmtNode>),
    /// Concise arrow body.
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: Option<String>,
    pub superclass: Option<Box<Expr>>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassMember {
    Method {
        is_static: bool,
        method: Method,
    },
    /// Field declaration (`static? key = value;`).
    Field {
        is_static: bool,
        key: PropKey,
        value: Option<Expr>,
    },
    /// `static { ... }` initialization block.
    StaticBlock(Vec<StmtNode>),
}

/// A method in a class body or an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub kind: MethodKind,
    pub key: PropKey,
    pub function: Function,
}

// ============================================================================
// PATTERNS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Ident(String),
    Object(Vec<ObjectPatternProp>),
    /// `None` entries are holes (`[, b]`).
    Array(Vec<Option<Pattern>>),
    Rest(Box<Pattern>),
    Default(Box<Pattern>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectPatternProp {
    Keyed { key: PropKey, value: Pattern },
    Shorthand { name: String, default: Option<Expr> },
    Rest(Pattern),
}

impl Pattern {
    /// Appends every name this pattern binds to `out`.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Ident(name) => out.push(name),
            Pattern::Object(props) => {
                for prop in props {
                    match prop {
                        ObjectPatternProp::Keyed { value, .. } => value.bound_names(out),
                        ObjectPatternProp::Shorthand { name, .. } => out.push(name),
                        ObjectPatternProp::Rest(inner) => inner.bound_names(out),
                    }
                }
            }
            Pattern::Array(items) => {
                for item in items.iter().flatten() {
                    item.bound_names(out);
                }
            }
            Pattern::Rest(inner) | Pattern::Default(inner, _) => inner.bound_names(out),
        }
    }

    /// The identifier name if this is a plain identifier binding.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Pattern::Ident(name) => Some(name),
            _ => None,
        }
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(String),
    This,
    Super,
    Null,
    Bool(bool),
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal, kept as written including its quotes.
    Str(String),
    Template {
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    /// Regular expression literal, kept as written.
    Regex(String),
    /// `None` entries are holes (`[1, , 3]`).
    Array(Vec<Option<Expr>>),
    Object(Vec<Prop>),
    Function(Box<Function>),
    Arrow(Box<Function>),
    Class(Box<Class>),
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Yield {
        arg: Option<Box<Expr>>,
        /// `yield*`
        delegate: bool,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
    },
    New {
        callee: Box<Expr>,
        args: Option<Vec<Expr>>,
    },
    Member {
        object: Box<Expr>,
        property: MemberProp,
        optional: bool,
    },
    /// Tagged template: ``tag`a ${b} c` ``.
    TaggedTemplate {
        tag: Box<Expr>,
        quasis: Vec<String>,
        exprs: Vec<Expr>,
    },
    /// Dynamic `import(..)`.
    Import(Vec<Expr>),
    /// `new.target` or `import.meta`.
    MetaProperty(String),
    /// Private name on the left of `in` (`#x in obj`), without the `#`.
    PrivateName(String),
    Sequence(Vec<Expr>),
    Spread(Box<Expr>),
    Inline(MacroSite),
}

/// A `%inline('<module>').<function>(<args>)` occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSite {
    pub module: String,
    pub function: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberProp {
    Ident(String),
    /// `obj.#name`, stored without the `#`.
    Private(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropKey {
    Ident(String),
    /// String literal key, kept as written.
    Str(String),
    Number(String),
    Private(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prop {
    KeyValue { key: PropKey, value: Expr },
    /// `{ name }`
    Shorthand(String),
    Method(Method),
    Spread(Expr),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    BitNot,
    Plus,
    Minus,
    Typeof,
    Void,
    Delete,
    Await,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Nullish,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    StrictEq,
    StrictNe,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    InstanceOf,
    In,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Nullish,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
            UnaryOp::Await => "await",
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete | UnaryOp::Await
        )
    }
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Nullish => "??",
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::In => "in",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
        }
    }
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Exp => "**=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::And => "&&=",
            AssignOp::Or => "||=",
            AssignOp::Nullish => "??=",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Div,
            "%=" => AssignOp::Mod,
            "**=" => AssignOp::Exp,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            ">>>=" => AssignOp::UShr,
            "&=" => AssignOp::BitAnd,
            "|=" => AssignOp::BitOr,
            "^=" => AssignOp::BitXor,
            "&&=" => AssignOp::And,
            "||=" => AssignOp::Or,
            "??=" => AssignOp::Nullish,
            _ => return None,
        };
        Some(op)
    }
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }
}

impl Function {
    /// The function body as a statement list; a concise arrow body becomes a
    /// single `return` statement.
    pub fn body_statements(&self) -> Vec<StmtNode> {
        match &self.body {
            FunctionBody::Block(stmts) => stmts.clone(),
            FunctionBody::Expr(expr) => vec![Spanned {
                value: Stmt::Return(Some((**expr).clone())),
                span: Span::default(),
            }],
        }
    }
}
