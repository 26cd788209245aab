//! Read-only traversal of the syntax tree.
//!
//! Implementors override the hooks they care about and call the matching
//! `walk_*` function to continue into children. Children are visited in
//! source order.

use crate::syntax::{
    Class, ClassMember, Declarator, ExportDecl, Expr, ForHead, ForInit, Function, FunctionBody, MemberProp,
    Method, ObjectPatternProp, Pattern, Prop, PropKey, Stmt, StmtNode, VarDecl,
};

pub trait Visit<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast StmtNode) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &'ast Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_function(&mut self, function: &'ast Function) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &'ast Class) {
        walk_class(self, class);
    }
}

pub fn walk_stmts<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, stmts: &'ast [StmtNode]) {
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast StmtNode) {
    match &stmt.value {
        Stmt::Expr(expr) | Stmt::Throw(expr) | Stmt::Return(Some(expr)) => visitor.visit_expr(expr),
        Stmt::Var(decl) => walk_var_decl(visitor, decl),
        Stmt::Function(function) => visitor.visit_function(function),
        Stmt::Class(class) => visitor.visit_class(class),
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_stmt(alternate);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(decl)) => walk_var_decl(visitor, decl),
                Some(ForInit::Expr(expr)) => visitor.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expr(test);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        Stmt::ForIn {
            left, right, body, ..
        } => {
            match left {
                ForHead::Var(_, pattern) => visitor.visit_pattern(pattern),
                ForHead::Expr(expr) => visitor.visit_expr(expr),
            }
            visitor.visit_expr(right);
            visitor.visit_stmt(body);
        }
        Stmt::While { test, body } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(body);
        }
        Stmt::With { object, body } => {
            visitor.visit_expr(object);
            visitor.visit_stmt(body);
        }
        Stmt::Labeled { body, .. } => visitor.visit_stmt(body),
        Stmt::DoWhile { body, test } => {
            visitor.visit_stmt(body);
            visitor.visit_expr(test);
        }
        Stmt::Block(stmts) => walk_stmts(visitor, stmts),
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_stmts(visitor, block);
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    visitor.visit_pattern(param);
                }
                walk_stmts(visitor, &handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts(visitor, finalizer);
            }
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            visitor.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    visitor.visit_expr(test);
                }
                walk_stmts(visitor, &case.body);
            }
        }
        Stmt::Export(decl) => match decl {
            ExportDecl::Function(function) | ExportDecl::DefaultFunction(function) => {
                visitor.visit_function(function)
            }
            ExportDecl::Class(class) | ExportDecl::DefaultClass(class) => {
                visitor.visit_class(class)
            }
            ExportDecl::Var(decl) => walk_var_decl(visitor, decl),
            ExportDecl::DefaultExpr(expr) => visitor.visit_expr(expr),
            ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
        },
        Stmt::Return(None)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Import(_)
        | Stmt::Debugger
        | Stmt::Empty => {}
    }
}

pub fn walk_var_decl<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, decl: &'ast VarDecl) {
    for Declarator { target, init } in &decl.declarators {
        visitor.visit_pattern(target);
        if let Some(init) = init {
            visitor.visit_expr(init);
        }
    }
}

pub fn walk_function<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, function: &'ast Function) {
    for param in &function.params {
        visitor.visit_pattern(param);
    }
    match &function.body {
        FunctionBody::Block(stmts) => walk_stmts(visitor, stmts),
        FunctionBody::Expr(expr) => visitor.visit_expr(expr),
    }
}

pub fn walk_class<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, class: &'ast Class) {
    if let Some(superclass) = &class.superclass {
        visitor.visit_expr(superclass);
    }
    for member in &class.members {
        match member {
            ClassMember::Method { method, .. } => walk_method(visitor, method),
            ClassMember::Field { key, value, .. } => {
                walk_prop_key(visitor, key);
                if let Some(value) = value {
                    visitor.visit_expr(value);
                }
            }
            ClassMember::StaticBlock(stmts) => walk_stmts(visitor, stmts),
        }
    }
}

fn walk_method<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, method: &'ast Method) {
    walk_prop_key(visitor, &method.key);
    visitor.visit_function(&method.function);
}

fn walk_prop_key<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, key: &'ast PropKey) {
    if let PropKey::Computed(expr) = key {
        visitor.visit_expr(expr);
    }
}

pub fn walk_pattern<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, pattern: &'ast Pattern) {
    match pattern {
        Pattern::Ident(_) => {}
        Pattern::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatternProp::Keyed { key, value } => {
                        walk_prop_key(visitor, key);
                        visitor.visit_pattern(value);
                    }
                    ObjectPatternProp::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            visitor.visit_expr(default);
                        }
                    }
                    ObjectPatternProp::Rest(inner) => visitor.visit_pattern(inner),
                }
            }
        }
        Pattern::Array(items) => {
            for item in items.iter().flatten() {
                visitor.visit_pattern(item);
            }
        }
        Pattern::Rest(inner) => visitor.visit_pattern(inner),
        Pattern::Default(target, default) => {
            visitor.visit_pattern(target);
            visitor.visit_expr(default);
        }
    }
}

pub fn walk_expr<'ast, V: Visit<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Ident(_)
        | Expr::This
        | Expr::Super
        | Expr::Null
        | Expr::Bool(_)
        | Expr::Number(_)
        | Expr::Str(_)
        | Expr::Regex(_)
        | Expr::MetaProperty(_)
        | Expr::PrivateName(_) => {}
        Expr::Template { exprs, .. } | Expr::Sequence(exprs) | Expr::Import(exprs) => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        Expr::Array(items) => {
            for item in items.iter().flatten() {
                visitor.visit_expr(item);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                match prop {
                    Prop::KeyValue { key, value } => {
                        walk_prop_key(visitor, key);
                        visitor.visit_expr(value);
                    }
                    Prop::Shorthand(_) => {}
                    Prop::Method(method) => walk_method(visitor, method),
                    Prop::Spread(value) => visitor.visit_expr(value),
                }
            }
        }
        Expr::Function(function) | Expr::Arrow(function) => visitor.visit_function(function),
        Expr::Class(class) => visitor.visit_class(class),
        Expr::Unary { arg, .. } | Expr::Update { arg, .. } | Expr::Spread(arg) => {
            visitor.visit_expr(arg)
        }
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(consequent);
            visitor.visit_expr(alternate);
        }
        Expr::Yield { arg, .. } => {
            if let Some(arg) = arg {
                visitor.visit_expr(arg);
            }
        }
        Expr::TaggedTemplate { tag, exprs, .. } => {
            visitor.visit_expr(tag);
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        Expr::Call { callee, args, .. } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::New { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args.iter().flatten() {
                visitor.visit_expr(arg);
            }
        }
        Expr::Member {
            object, property, ..
        } => {
            visitor.visit_expr(object);
            if let MemberProp::Computed(index) = property {
                visitor.visit_expr(index);
            }
        }
        Expr::Inline(site) => {
            for arg in &site.args {
                visitor.visit_expr(arg);
            }
        }
    }
}

// ============================================================================
// QUERIES
// ============================================================================

#[derive(Default)]
struct SiteDetector {
    found: bool,
}

impl<'ast> Visit<'ast> for SiteDetector {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found {
            return;
        }
        if matches!(expr, Expr::Inline(_)) {
            self.found = true;
            return;
        }
        walk_expr(self, expr);
    }
}

/// Whether any statement in `stmts` contains a `%inline` site.
pub fn contains_inline_site(stmts: &[StmtNode]) -> bool {
    let mut detector = SiteDetector::default();
    walk_stmts(&mut detector, stmts);
    detector.found
}

/// Whether `function` (parameters included) contains a `%inline` site.
pub fn function_contains_inline_site(function: &Function) -> bool {
    let mut detector = SiteDetector::default();
    detector.visit_function(function);
    detector.found
}
