//! Pretty printer for the syntax tree.
//!
//! Output is normalized: two-space indentation, one statement per line,
//! single-line object literals, and parentheses inserted from operator
//! precedence rather than copied from the source.

use crate::syntax::{
    BinaryOp, Class, ClassMember, Declarator, ExportDecl, Expr, ForHead, ForInit, Function, FunctionBody,
    ImportDecl, MacroSite, MemberProp, Method, MethodKind, ObjectPatternProp, Pattern, Program,
    Prop, PropKey, Stmt, StmtNode, UnaryOp, UpdateOp, VarDecl,
};

const INDENT: &str = "  ";

/// Binding strength of an expression, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prec {
    Seq,
    Assign,
    Cond,
    Nullish,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Rel,
    Shift,
    Add,
    Mul,
    Exp,
    Unary,
    Update,
    /// `new Foo` without an argument list.
    New,
    Call,
    Primary,
}

impl Prec {
    fn tighter(self) -> Prec {
        match self {
            Prec::Seq => Prec::Assign,
            Prec::Assign => Prec::Cond,
            Prec::Cond => Prec::Nullish,
            Prec::Nullish => Prec::Or,
            Prec::Or => Prec::And,
            Prec::And => Prec::BitOr,
            Prec::BitOr => Prec::BitXor,
            Prec::BitXor => Prec::BitAnd,
            Prec::BitAnd => Prec::Eq,
            Prec::Eq => Prec::Rel,
            Prec::Rel => Prec::Shift,
            Prec::Shift => Prec::Add,
            Prec::Add => Prec::Mul,
            Prec::Mul => Prec::Exp,
            Prec::Exp => Prec::Unary,
            Prec::Unary => Prec::Update,
            Prec::Update => Prec::New,
            Prec::New => Prec::Call,
            Prec::Call | Prec::Primary => Prec::Primary,
        }
    }
}

fn binary_prec(op: BinaryOp) -> Prec {
    match op {
        BinaryOp::Nullish => Prec::Nullish,
        BinaryOp::Or => Prec::Or,
        BinaryOp::And => Prec::And,
        BinaryOp::BitOr => Prec::BitOr,
        BinaryOp::BitXor => Prec::BitXor,
        BinaryOp::BitAnd => Prec::BitAnd,
        BinaryOp::StrictEq | BinaryOp::StrictNe | BinaryOp::Eq | BinaryOp::Ne => Prec::Eq,
        BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge
        | BinaryOp::InstanceOf
        | BinaryOp::In => Prec::Rel,
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => Prec::Shift,
        BinaryOp::Add | BinaryOp::Sub => Prec::Add,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => Prec::Mul,
        BinaryOp::Exp => Prec::Exp,
    }
}

/// Precedence of the outermost operator of `expr`.
pub fn expr_precedence(expr: &Expr) -> Prec {
    match expr {
        Expr::Sequence(_) => Prec::Seq,
        Expr::Assign { .. } | Expr::Arrow(_) | Expr::Spread(_) | Expr::Yield { .. } => {
            Prec::Assign
        }
        Expr::Conditional { .. } => Prec::Cond,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Unary { .. } => Prec::Unary,
        Expr::Update { prefix: true, .. } => Prec::Unary,
        Expr::Update { prefix: false, .. } => Prec::Update,
        Expr::New { args: None, .. } => Prec::New,
        Expr::New { args: Some(_), .. }
        | Expr::Call { .. }
        | Expr::Member { .. }
        | Expr::TaggedTemplate { .. }
        | Expr::Import(_)
        | Expr::Inline(_) => Prec::Call,
        _ => Prec::Primary,
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

pub fn print_program(program: &Program) -> String {
    let mut text = print_statements(&program.body);
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Statements at indentation level zero, one per line, no trailing newline.
pub fn print_statements(stmts: &[StmtNode]) -> String {
    let mut printer = Printer::default();
    printer.statement_lines(stmts);
    printer.out
}

pub fn print_stmt(stmt: &StmtNode) -> String {
    let mut printer = Printer::default();
    printer.stmt(stmt);
    printer.out
}

pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::default();
    printer.expr(expr, Prec::Seq);
    printer.out
}

pub fn print_pattern(pattern: &Pattern) -> String {
    let mut printer = Printer::default();
    printer.pattern(pattern);
    printer.out
}

/// Whether an expression statement made of `expr` would be misread as a
/// block, function declaration or class declaration.
pub fn starts_ambiguously(expr: &Expr) -> bool {
    match leftmost(expr) {
        Expr::Object(_) | Expr::Function(_) | Expr::Class(_) => true,
        _ => false,
    }
}

fn leftmost(expr: &Expr) -> &Expr {
    match expr {
        Expr::Binary { left, .. } => leftmost(left),
        Expr::Assign { target, .. } => leftmost(target),
        Expr::Conditional { test, .. } => leftmost(test),
        Expr::Call { callee, .. } => leftmost(callee),
        Expr::Member { object, .. } => leftmost(object),
        Expr::TaggedTemplate { tag, .. } => leftmost(tag),
        Expr::Update {
            prefix: false, arg, ..
        } => leftmost(arg),
        Expr::Sequence(items) => items.first().map_or(expr, leftmost),
        _ => expr,
    }
}

// ============================================================================
// PRINTER
// ============================================================================

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
    /// Inside a `for (..;` initializer, where a bare `in` would be read as a
    /// `for-in` head.
    no_in: bool,
}

impl Printer {
    fn nested(&self) -> Printer {
        Printer {
            out: String::new(),
            indent: self.indent,
            no_in: self.no_in,
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn statement_lines(&mut self, stmts: &[StmtNode]) {
        for (i, stmt) in stmts.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.stmt(stmt);
        }
    }

    fn block(&mut self, stmts: &[StmtNode]) {
        if stmts.is_empty() {
            self.push("{}");
            return;
        }
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.push("{");
        self.indent += 1;
        for stmt in stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
        self.no_in = no_in;
    }

    /// Body of a control statement, after its header.
    fn body(&mut self, stmt: &StmtNode) {
        self.push(" ");
        self.stmt(stmt);
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn stmt(&mut self, node: &StmtNode) {
        match &node.value {
            Stmt::Expr(expr) => {
                self.expr_statement(expr);
                self.push(";");
            }
            Stmt::Var(decl) => {
                self.var_decl(decl);
                self.push(";");
            }
            Stmt::Function(function) => self.function(function),
            Stmt::Class(class) => self.class(class),
            Stmt::Return(None) => self.push("return;"),
            Stmt::Return(Some(expr)) => {
                self.push("return ");
                self.expr(expr, Prec::Seq);
                self.push(";");
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.push("if (");
                self.expr(test, Prec::Seq);
                self.push(")");
                match alternate {
                    Some(alternate) => {
                        if is_open_if(&consequent.value) {
                            self.push(" ");
                            self.block(std::slice::from_ref(consequent));
                        } else {
                            self.body(consequent);
                        }
                        self.push(" else");
                        self.body(alternate);
                    }
                    None => self.body(consequent),
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                self.push("for (");
                self.no_in = true;
                match init {
                    Some(ForInit::Var(decl)) => self.var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.expr(expr, Prec::Seq),
                    None => {}
                }
                self.no_in = false;
                self.push(";");
                if let Some(test) = test {
                    self.push(" ");
                    self.expr(test, Prec::Seq);
                }
                self.push(";");
                if let Some(update) = update {
                    self.push(" ");
                    self.expr(update, Prec::Seq);
                }
                self.push(")");
                self.body(body);
            }
            Stmt::ForIn {
                left,
                right,
                body,
                of,
                is_await,
            } => {
                self.push(if *is_await { "for await (" } else { "for (" });
                match left {
                    ForHead::Var(kind, pattern) => {
                        self.push(kind.as_str());
                        self.push(" ");
                        self.pattern(pattern);
                    }
                    ForHead::Expr(expr) => self.expr(expr, Prec::Call),
                }
                self.push(if *of { " of " } else { " in " });
                self.expr(right, if *of { Prec::Assign } else { Prec::Seq });
                self.push(")");
                self.body(body);
            }
            Stmt::While { test, body } => {
                self.push("while (");
                self.expr(test, Prec::Seq);
                self.push(")");
                self.body(body);
            }
            Stmt::DoWhile { body, test } => {
                self.push("do");
                self.body(body);
                self.push(" while (");
                self.expr(test, Prec::Seq);
                self.push(");");
            }
            Stmt::Block(stmts) => self.block(stmts),
            Stmt::Break(label) => self.jump("break", label.as_deref()),
            Stmt::Continue(label) => self.jump("continue", label.as_deref()),
            Stmt::Labeled { label, body } => {
                self.push(label);
                self.push(":");
                self.body(body);
            }
            Stmt::With { object, body } => {
                self.push("with (");
                self.expr(object, Prec::Seq);
                self.push(")");
                self.body(body);
            }
            Stmt::Throw(expr) => {
                self.push("throw ");
                self.expr(expr, Prec::Seq);
                self.push(";");
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.push("try ");
                self.block(block);
                if let Some(handler) = handler {
                    self.push(" catch ");
                    if let Some(param) = &handler.param {
                        self.push("(");
                        self.pattern(param);
                        self.push(") ");
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.push(" finally ");
                    self.block(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                self.push("switch (");
                self.expr(discriminant, Prec::Seq);
                self.push(") {");
                self.indent += 1;
                for case in cases {
                    self.newline();
                    match &case.test {
                        Some(test) => {
                            self.push("case ");
                            self.expr(test, Prec::Seq);
                            self.push(":");
                        }
                        None => self.push("default:"),
                    }
                    self.indent += 1;
                    for stmt in &case.body {
                        self.newline();
                        self.stmt(stmt);
                    }
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.newline();
                self.push("}");
            }
            Stmt::Import(decl) => self.import(decl),
            Stmt::Export(decl) => self.export(decl),
            Stmt::Debugger => self.push("debugger;"),
            Stmt::Empty => self.push(";"),
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<&str>) {
        self.push(keyword);
        if let Some(label) = label {
            self.push(" ");
            self.push(label);
        }
        self.push(";");
    }

    fn expr_statement(&mut self, expr: &Expr) {
        if starts_ambiguously(expr) {
            self.push("(");
            self.expr(expr, Prec::Seq);
            self.push(")");
        } else {
            self.expr(expr, Prec::Seq);
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.push(decl.kind.as_str());
        self.push(" ");
        for (i, Declarator { target, init }) in decl.declarators.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.pattern(target);
            if let Some(init) = init {
                self.push(" = ");
                self.expr(init, Prec::Assign);
            }
        }
    }

    fn import(&mut self, decl: &ImportDecl) {
        self.push("import ");
        let mut clauses = Vec::new();
        if let Some(default) = &decl.default {
            clauses.push(default.clone());
        }
        if let Some(namespace) = &decl.namespace {
            clauses.push(format!("* as {}", namespace));
        }
        if !decl.named.is_empty() {
            let named: Vec<String> = decl
                .named
                .iter()
                .map(|spec| match &spec.local {
                    Some(local) => format!("{} as {}", spec.imported, local),
                    None => spec.imported.clone(),
                })
                .collect();
            clauses.push(format!("{{ {} }}", named.join(", ")));
        }
        if !clauses.is_empty() {
            self.push(&clauses.join(", "));
            self.push(" from ");
        }
        self.push(&decl.source);
        self.push(";");
    }

    fn export(&mut self, decl: &ExportDecl) {
        self.push("export ");
        match decl {
            ExportDecl::Function(function) => self.function(function),
            ExportDecl::Class(class) => self.class(class),
            ExportDecl::Var(var) => {
                self.var_decl(var);
                self.push(";");
            }
            ExportDecl::DefaultClass(class) => {
                self.push("default ");
                self.class(class);
            }
            ExportDecl::DefaultFunction(function) => {
                self.push("default ");
                self.function(function);
            }
            ExportDecl::DefaultExpr(expr) => {
                self.push("default ");
                if starts_ambiguously(expr) {
                    self.push("(");
                    self.expr(expr, Prec::Assign);
                    self.push(")");
                } else {
                    self.expr(expr, Prec::Assign);
                }
                self.push(";");
            }
            ExportDecl::Named { specifiers, source } => {
                let specs: Vec<String> = specifiers
                    .iter()
                    .map(|spec| match &spec.exported {
                        Some(exported) => format!("{} as {}", spec.local, exported),
                        None => spec.local.clone(),
                    })
                    .collect();
                if specs.is_empty() {
                    self.push("{}");
                } else {
                    self.push(&format!("{{ {} }}", specs.join(", ")));
                }
                if let Some(source) = source {
                    self.push(" from ");
                    self.push(source);
                }
                self.push(";");
            }
            ExportDecl::All { exported, source } => {
                self.push("*");
                if let Some(exported) = exported {
                    self.push(" as ");
                    self.push(exported);
                }
                self.push(" from ");
                self.push(source);
                self.push(";");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Functions, classes and patterns
    // ------------------------------------------------------------------------

    fn function(&mut self, function: &Function) {
        if function.is_async {
            self.push("async ");
        }
        self.push("function");
        if function.is_generator {
            self.push("*");
        }
        if let Some(name) = &function.name {
            self.push(" ");
            self.push(name);
        } else {
            self.push(" ");
        }
        self.params(&function.params);
        self.push(" ");
        self.function_body(&function.body);
    }

    fn arrow(&mut self, function: &Function) {
        if function.is_async {
            self.push("async ");
        }
        self.params(&function.params);
        self.push(" => ");
        match &function.body {
            FunctionBody::Block(stmts) => self.block(stmts),
            FunctionBody::Expr(expr) => {
                if matches!(leftmost(expr), Expr::Object(_)) {
                    self.push("(");
                    self.expr(expr, Prec::Seq);
                    self.push(")");
                } else {
                    self.expr(expr, Prec::Assign);
                }
            }
        }
    }

    fn function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(stmts) => self.block(stmts),
            FunctionBody::Expr(expr) => {
                self.push("{");
                self.indent += 1;
                self.newline();
                self.push("return ");
                self.expr(expr, Prec::Seq);
                self.push(";");
                self.indent -= 1;
                self.newline();
                self.push("}");
            }
        }
    }

    fn params(&mut self, params: &[Pattern]) {
        self.push("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.pattern(param);
        }
        self.push(")");
    }

    fn class(&mut self, class: &Class) {
        self.push("class");
        if let Some(name) = &class.name {
            self.push(" ");
            self.push(name);
        }
        if let Some(superclass) = &class.superclass {
            self.push(" extends ");
            self.expr(superclass, Prec::Call);
        }
        if class.members.is_empty() {
            self.push(" {}");
            return;
        }
        self.push(" {");
        self.indent += 1;
        for member in &class.members {
            self.newline();
            self.class_member(member);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Method { is_static, method } => {
                if *is_static {
                    self.push("static ");
                }
                self.method(method);
            }
            ClassMember::Field {
                is_static,
                key,
                value,
            } => {
                if *is_static {
                    self.push("static ");
                }
                self.prop_key(key);
                if let Some(value) = value {
                    self.push(" = ");
                    self.expr(value, Prec::Assign);
                }
                self.push(";");
            }
            ClassMember::StaticBlock(stmts) => {
                self.push("static ");
                self.block(stmts);
            }
        }
    }

    fn method(&mut self, method: &Method) {
        match method.kind {
            MethodKind::Get => self.push("get "),
            MethodKind::Set => self.push("set "),
            MethodKind::Method => {}
        }
        if method.function.is_async {
            self.push("async ");
        }
        if method.function.is_generator {
            self.push("*");
        }
        self.prop_key(&method.key);
        self.params(&method.function.params);
        self.push(" ");
        self.function_body(&method.function.body);
    }

    fn prop_key(&mut self, key: &PropKey) {
        match key {
            PropKey::Ident(name) | PropKey::Str(name) | PropKey::Number(name) => self.push(name),
            PropKey::Private(name) => {
                self.push("#");
                self.push(name);
            }
            PropKey::Computed(expr) => {
                self.push("[");
                self.expr(expr, Prec::Assign);
                self.push("]");
            }
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(name) => self.push(name),
            Pattern::Object(props) => {
                if props.is_empty() {
                    self.push("{}");
                    return;
                }
                self.push("{ ");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    match prop {
                        ObjectPatternProp::Keyed { key, value } => {
                            self.prop_key(key);
                            self.push(": ");
                            self.pattern(value);
                        }
                        ObjectPatternProp::Shorthand { name, default } => {
                            self.push(name);
                            if let Some(default) = default {
                                self.push(" = ");
                                self.expr(default, Prec::Assign);
                            }
                        }
                        ObjectPatternProp::Rest(inner) => {
                            self.push("...");
                            self.pattern(inner);
                        }
                    }
                }
                self.push(" }");
            }
            Pattern::Array(items) => {
                self.push("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    if let Some(item) = item {
                        self.pattern(item);
                    }
                }
                if matches!(items.last(), Some(None)) {
                    self.push(",");
                }
                self.push("]");
            }
            Pattern::Rest(inner) => {
                self.push("...");
                self.pattern(inner);
            }
            Pattern::Default(target, default) => {
                self.pattern(target);
                self.push(" = ");
                self.expr(default, Prec::Assign);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn expr(&mut self, expr: &Expr, min: Prec) {
        let bare_in = self.no_in
            && matches!(
                expr,
                Expr::Binary {
                    op: BinaryOp::In,
                    ..
                }
            );
        if expr_precedence(expr) < min || bare_in {
            let no_in = std::mem::replace(&mut self.no_in, false);
            self.push("(");
            self.expr_inner(expr);
            self.push(")");
            self.no_in = no_in;
        } else {
            self.expr_inner(expr);
        }
    }

    fn parenthesized(&mut self, expr: &Expr) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.push("(");
        self.expr(expr, Prec::Seq);
        self.push(")");
        self.no_in = no_in;
    }

    fn template(&mut self, quasis: &[String], exprs: &[Expr]) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.push("`");
        for (i, quasi) in quasis.iter().enumerate() {
            self.push(quasi);
            if let Some(expr) = exprs.get(i) {
                self.push("${");
                self.expr(expr, Prec::Seq);
                self.push("}");
            }
        }
        self.push("`");
        self.no_in = no_in;
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.push(name),
            Expr::This => self.push("this"),
            Expr::Super => self.push("super"),
            Expr::Null => self.push("null"),
            Expr::Bool(true) => self.push("true"),
            Expr::Bool(false) => self.push("false"),
            Expr::Number(raw) | Expr::Str(raw) | Expr::Regex(raw) => self.push(raw),
            Expr::Template { quasis, exprs } => self.template(quasis, exprs),
            Expr::TaggedTemplate { tag, quasis, exprs } => {
                self.expr(tag, Prec::Call);
                self.template(quasis, exprs);
            }
            Expr::MetaProperty(text) => self.push(text),
            Expr::PrivateName(name) => {
                self.push("#");
                self.push(name);
            }
            Expr::Import(args) => {
                self.push("import");
                self.arguments(args);
            }
            Expr::Yield { arg, delegate } => {
                self.push(if *delegate { "yield*" } else { "yield" });
                if let Some(arg) = arg {
                    self.push(" ");
                    self.expr(arg, Prec::Assign);
                }
            }
            Expr::Array(items) => {
                self.push("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    if let Some(item) = item {
                        self.expr(item, Prec::Assign);
                    }
                }
                if matches!(items.last(), Some(None)) {
                    self.push(",");
                }
                self.push("]");
            }
            Expr::Object(props) => self.object(props),
            Expr::Function(function) => self.function(function),
            Expr::Arrow(function) => self.arrow(function),
            Expr::Class(class) => self.class(class),
            Expr::Unary { op, arg } => {
                self.push(op.as_str());
                let mut nested = self.nested();
                nested.expr(arg, Prec::Unary);
                let needs_space = op.is_keyword()
                    || (*op == UnaryOp::Minus && nested.out.starts_with('-'))
                    || (*op == UnaryOp::Plus && nested.out.starts_with('+'));
                if needs_space {
                    self.push(" ");
                }
                self.push(&nested.out);
            }
            Expr::Update { op, prefix, arg } => {
                if *prefix {
                    self.push(op.as_str());
                    let mut nested = self.nested();
                    nested.expr(arg, Prec::Unary);
                    let sign = if *op == UpdateOp::Increment { '+' } else { '-' };
                    if nested.out.starts_with(sign) {
                        self.push(" ");
                    }
                    self.push(&nested.out);
                } else {
                    self.expr(arg, Prec::Call);
                    self.push(op.as_str());
                }
            }
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Assign { op, target, value } => {
                self.expr(target, Prec::Call);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.expr(value, Prec::Assign);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test, Prec::Nullish);
                self.push(" ? ");
                self.expr(consequent, Prec::Assign);
                self.push(" : ");
                self.expr(alternate, Prec::Assign);
            }
            Expr::Call {
                callee,
                args,
                optional,
            } => {
                self.expr(callee, Prec::Call);
                if *optional {
                    self.push("?.");
                }
                self.arguments(args);
            }
            Expr::New { callee, args } => {
                self.push("new ");
                if has_call_head(callee) {
                    self.parenthesized(callee);
                } else {
                    self.expr(callee, Prec::New);
                }
                if let Some(args) = args {
                    self.arguments(args);
                }
            }
            Expr::Member {
                object,
                property,
                optional,
            } => {
                if is_bare_integer(object) {
                    self.parenthesized(object);
                } else {
                    self.expr(object, Prec::Call);
                }
                match property {
                    MemberProp::Ident(name) => {
                        self.push(if *optional { "?." } else { "." });
                        self.push(name);
                    }
                    MemberProp::Private(name) => {
                        self.push(if *optional { "?.#" } else { ".#" });
                        self.push(name);
                    }
                    MemberProp::Computed(index) => {
                        if *optional {
                            self.push("?.");
                        }
                        self.push("[");
                        self.expr(index, Prec::Seq);
                        self.push("]");
                    }
                }
            }
            Expr::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(item, Prec::Assign);
                }
            }
            Expr::Spread(inner) => {
                self.push("...");
                self.expr(inner, Prec::Assign);
            }
            Expr::Inline(site) => self.macro_site(site),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) {
        let prec = binary_prec(op);
        let (left_min, right_min) = if op == BinaryOp::Exp {
            (Prec::Update, prec)
        } else {
            (prec, prec.tighter())
        };
        self.binary_operand(op, left, left_min);
        self.push(" ");
        self.push(op.as_str());
        self.push(" ");
        self.binary_operand(op, right, right_min);
    }

    /// `??` cannot be mixed with `||` or `&&` without parentheses.
    fn binary_operand(&mut self, op: BinaryOp, operand: &Expr, min: Prec) {
        let mixes_nullish = op == BinaryOp::Nullish
            && matches!(
                operand,
                Expr::Binary {
                    op: BinaryOp::Or | BinaryOp::And,
                    ..
                }
            );
        if mixes_nullish {
            self.parenthesized(operand);
        } else {
            self.expr(operand, min);
        }
    }

    fn arguments(&mut self, args: &[Expr]) {
        self.push("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(arg, Prec::Assign);
        }
        self.push(")");
    }

    fn object(&mut self, props: &[Prop]) {
        if props.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match prop {
                Prop::KeyValue { key, value } => {
                    self.prop_key(key);
                    self.push(": ");
                    self.expr(value, Prec::Assign);
                }
                Prop::Shorthand(name) => self.push(name),
                Prop::Method(method) => self.method(method),
                Prop::Spread(value) => {
                    self.push("...");
                    self.expr(value, Prec::Assign);
                }
            }
        }
        self.push(" }");
    }

    fn macro_site(&mut self, site: &MacroSite) {
        self.push("%inline('");
        self.push(&site.module.replace('\\', "\\\\").replace('\'', "\\'"));
        self.push("').");
        self.push(&site.function);
        self.arguments(&site.args);
    }
}

fn is_open_if(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If {
            alternate: None, ..
        } => true,
        Stmt::If {
            alternate: Some(alternate),
            ..
        } => is_open_if(&alternate.value),
        Stmt::For { body, .. }
        | Stmt::ForIn { body, .. }
        | Stmt::While { body, .. }
        | Stmt::Labeled { body, .. }
        | Stmt::With { body, .. } => is_open_if(&body.value),
        _ => false,
    }
}

fn has_call_head(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } | Expr::Import(_) | Expr::Inline(_) => true,
        Expr::Member { object, .. } => has_call_head(object),
        _ => false,
    }
}

fn is_bare_integer(expr: &Expr) -> bool {
    matches!(expr, Expr::Number(raw) if raw.bytes().all(|b| b.is_ascii_digit() || b == b'_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::{parse_expression, parse_program};

    fn roundtrip(source: &str) -> String {
        let program = parse_program(source).unwrap();
        print_program(&program).trim_end_matches('\n').to_string()
    }

    fn expr_text(source: &str) -> String {
        print_expr(&parse_expression(source).unwrap())
    }

    #[test]
    fn drops_redundant_parentheses() {
        assert_eq!(expr_text("((a)) + (b * c)"), "a + b * c");
        assert_eq!(expr_text("(a + b) * c"), "(a + b) * c");
        assert_eq!(expr_text("a - (b - c)"), "a - (b - c)");
        assert_eq!(expr_text("(a - b) - c"), "a - b - c");
    }

    #[test]
    fn exponent_is_right_associative() {
        assert_eq!(expr_text("a ** (b ** c)"), "a ** b ** c");
        assert_eq!(expr_text("(a ** b) ** c"), "(a ** b) ** c");
        assert_eq!(expr_text("(-a) ** b"), "(-a) ** b");
    }

    #[test]
    fn keeps_nullish_grouping() {
        assert_eq!(expr_text("a ?? (b || c)"), "a ?? (b || c)");
    }

    #[test]
    fn unary_operators_do_not_merge() {
        assert_eq!(expr_text("-(-a)"), "- -a");
        assert_eq!(expr_text("typeof x === 'string'"), "typeof x === 'string'");
        assert_eq!(expr_text("void 0"), "void 0");
    }

    #[test]
    fn member_access_on_integers_and_calls() {
        assert_eq!(expr_text("(1).toString()"), "(1).toString()");
        assert_eq!(expr_text("(1_000).toFixed()"), "(1_000).toFixed()");
        assert_eq!(expr_text("(a + b).length"), "(a + b).length");
        assert_eq!(expr_text("new (f())()"), "new (f())()");
        assert_eq!(expr_text("new Foo"), "new Foo");
        assert_eq!(expr_text("a?.b?.[c]?.(d)"), "a?.b?.[c]?.(d)");
    }

    #[test]
    fn object_statements_are_wrapped() {
        assert_eq!(roundtrip("({ a: 1 });"), "({ a: 1 });");
        assert_eq!(roundtrip("(function () {})();"), "(function () {}());");
        assert_eq!(expr_text("() => ({ a })"), "() => ({ a })");
    }

    #[test]
    fn prints_blocks_with_two_space_indent() {
        let text = roundtrip("function f(a,b){if(a){return b}else{return a+b}}");
        assert_eq!(
            text,
            "function f(a, b) {\n  if (a) {\n    return b;\n  } else {\n    return a + b;\n  }\n}"
        );
    }

    #[test]
    fn dangling_else_keeps_its_owner() {
        let program = parse_program("if (a) { if (b) x(); } else y();").unwrap();
        let Stmt::If { consequent, alternate, test } = &program.body[0].value else {
            panic!("expected if statement");
        };
        let Stmt::Block(inner) = &consequent.value else {
            panic!("expected block");
        };
        let flattened = Stmt::If {
            test: test.clone(),
            consequent: Box::new(inner[0].clone()),
            alternate: alternate.clone(),
        };
        let text = print_stmt(&StmtNode {
            value: flattened,
            span: program.body[0].span,
        });
        assert_eq!(text, "if (a) {\n  if (b) x();\n} else y();");
    }

    #[test]
    fn prints_templates_and_patterns() {
        assert_eq!(expr_text("`a${b + 1}c`"), "`a${b + 1}c`");
        assert_eq!(
            roundtrip("const {a, b: [c, , d], ...e} = f;"),
            "const { a, b: [c, , d], ...e } = f;"
        );
    }

    #[test]
    fn for_initializer_keeps_in_parenthesized() {
        assert_eq!(
            roundtrip("for (var i = ('a' in o) ? 1 : 0; i < 2; i++) {}"),
            "for (var i = ('a' in o) ? 1 : 0; i < 2; i++) {}"
        );
        assert_eq!(
            roundtrip("for (x = ('k' in o); x; x = null) {}"),
            "for (x = ('k' in o); x; x = null) {}"
        );
        assert_eq!(roundtrip("x = 'a' in o ? 1 : 0;"), "x = 'a' in o ? 1 : 0;");
        assert_eq!(
            roundtrip("for (var f = function () { return 'a' in o; }; f(); ) {}"),
            "for (var f = function () {\n  return 'a' in o;\n}; f();) {}"
        );
    }

    #[test]
    fn prints_generators_fields_and_labels() {
        assert_eq!(
            roundtrip("function* g() { yield* a; yield (b, c); }"),
            "function* g() {\n  yield* a;\n  yield (b, c);\n}"
        );
        assert_eq!(
            roundtrip("class A { static #n = 1; x; static { A.ready = true; } *keys() {} get #v() { return this.#n; } }"),
            "class A {\n  static #n = 1;\n  x;\n  static {\n    A.ready = true;\n  }\n  *keys() {}\n  get #v() {\n    return this.#n;\n  }\n}"
        );
        assert_eq!(
            roundtrip("loop: for (const x of xs) if (x) continue loop; else break;"),
            "loop: for (const x of xs) if (x) continue loop; else break;"
        );
        assert_eq!(expr_text("html`<i>${a + b}</i>`"), "html`<i>${a + b}</i>`");
        assert_eq!(expr_text("(await f)`x`"), "(await f)`x`");
        assert_eq!(expr_text("import(name).then(go)"), "import(name).then(go)");
        assert_eq!(roundtrip("export * as ns from './ns';"), "export * as ns from './ns';");
    }

    #[test]
    fn prints_switch_and_try() {
        let text = roundtrip("switch (x) { case 1: a(); break; default: b(); }");
        assert_eq!(
            text,
            "switch (x) {\n  case 1:\n    a();\n    break;\n  default:\n    b();\n}"
        );
        let text = roundtrip("try { a(); } catch (e) { b(e); } finally { c(); }");
        assert_eq!(
            text,
            "try {\n  a();\n} catch (e) {\n  b(e);\n} finally {\n  c();\n}"
        );
    }
}
