//! Identifier substitution.
//!
//! Replaces free occurrences of parameter names in a function body with the
//! argument expressions of a macro site. A name stops being replaced inside
//! any statement list that declares it (`var`/`let`/`const`, a declaring `for`
//! initialiser or `for-in`/`for-of` head, a function or class declaration) and
//! inside nested functions or `catch` clauses that bind it. Property names and
//! object keys are not references and are never touched.
//!
//! Substitution is pure: the input tree is borrowed and a new tree returned.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::config::SubstitutionMode;
use crate::errors::InlineError;
use crate::syntax::{
    CatchClause, Class, ClassMember, Declarator, ExportDecl, Expr, ForHead, ForInit, Function,
    FunctionBody, MacroSite, MemberProp, Method, ObjectPatternProp, Pattern, Prop, PropKey,
    Spanned, Stmt, StmtNode, SwitchCase, VarDecl,
};

/// Parameter name to argument expression.
pub type Bindings = Vec<(String, Expr)>;

type Active<'b> = HashMap<&'b str, &'b Expr>;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Checks that a site supplies exactly as many arguments as `function`
/// declares parameters.
pub fn check_arity(args_len: usize, function: &Function, name: &str) -> Result<(), InlineError> {
    let expected = function.params.len();
    if args_len != expected {
        return Err(InlineError::ArityMismatch {
            function: name.to_string(),
            expected,
            actual: args_len,
        });
    }
    Ok(())
}

/// Pairs each formal parameter of `function` with its argument.
pub fn bind_params(function: &Function, args: &[Expr], name: &str) -> Result<Bindings, InlineError> {
    if args.iter().any(|arg| matches!(arg, Expr::Spread(_))) {
        return Err(InlineError::SpreadArgument {
            function: name.to_string(),
        });
    }
    check_arity(args.len(), function, name)?;
    function
        .params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| match param.as_ident() {
            Some(param) => Ok((param.to_string(), arg.clone())),
            None => Err(InlineError::UnsupportedParameter {
                function: name.to_string(),
                index,
            }),
        })
        .collect()
}

/// The body of `function` with `args` substituted for its parameters.
pub fn inline_body(
    function: &Function,
    args: &[Expr],
    name: &str,
    mode: SubstitutionMode,
) -> Result<Vec<StmtNode>, InlineError> {
    let bindings = bind_params(function, args, name)?;
    let body = function.body_statements();
    Ok(match mode {
        SubstitutionMode::Simultaneous => substitute_all(&bindings, &body),
        SubstitutionMode::Sequential => bindings
            .iter()
            .fold(body, |stmts, (param, arg)| substitute(param, arg, &stmts)),
    })
}

/// Replaces every free occurrence of `name` in `stmts` with `replacement`.
pub fn substitute(name: &str, replacement: &Expr, stmts: &[StmtNode]) -> Vec<StmtNode> {
    let active: Active = HashMap::from([(name, replacement)]);
    subst_stmts(stmts, &active)
}

/// Replaces every free occurrence of each bound name in one walk.
pub fn substitute_all(bindings: &Bindings, stmts: &[StmtNode]) -> Vec<StmtNode> {
    let active: Active = bindings
        .iter()
        .map(|(name, expr)| (name.as_str(), expr))
        .collect();
    subst_stmts(stmts, &active)
}

// ============================================================================
// SCOPING
// ============================================================================

/// `active` without `names`; borrowed when nothing is removed.
fn shadowed<'a, 'b>(active: &'a Active<'b>, names: &[&str]) -> Cow<'a, Active<'b>> {
    if !names.iter().any(|name| active.contains_key(*name)) {
        return Cow::Borrowed(active);
    }
    let mut narrowed = active.clone();
    for name in names {
        narrowed.remove(*name);
    }
    Cow::Owned(narrowed)
}

/// Names declared directly in a statement list.
fn declared_names(stmts: &[StmtNode]) -> Vec<&str> {
    let mut names = Vec::new();
    for stmt in stmts {
        match &stmt.value {
            Stmt::Var(decl)
            | Stmt::Export(ExportDecl::Var(decl))
            | Stmt::For {
                init: Some(ForInit::Var(decl)),
                ..
            } => var_names(decl, &mut names),
            Stmt::ForIn {
                left: ForHead::Var(_, pattern),
                ..
            } => pattern.bound_names(&mut names),
            Stmt::Function(function) | Stmt::Export(ExportDecl::Function(function)) => {
                names.extend(function.name.as_deref())
            }
            Stmt::Class(class) | Stmt::Export(ExportDecl::Class(class)) => {
                names.extend(class.name.as_deref())
            }
            _ => {}
        }
    }
    names
}

fn var_names<'a>(decl: &'a VarDecl, names: &mut Vec<&'a str>) {
    for declarator in &decl.declarators {
        declarator.target.bound_names(names);
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

fn subst_stmts(stmts: &[StmtNode], active: &Active) -> Vec<StmtNode> {
    if active.is_empty() {
        return stmts.to_vec();
    }
    let scope = shadowed(active, &declared_names(stmts));
    if scope.is_empty() {
        return stmts.to_vec();
    }
    stmts.iter().map(|stmt| subst_stmt(stmt, &scope)).collect()
}

fn subst_boxed_stmt(stmt: &StmtNode, active: &Active) -> Box<StmtNode> {
    Box::new(subst_stmt(stmt, active))
}

fn subst_stmt(node: &StmtNode, active: &Active) -> StmtNode {
    if active.is_empty() {
        return node.clone();
    }
    let value = match &node.value {
        Stmt::Expr(expr) => Stmt::Expr(subst_expr(expr, active)),
        Stmt::Var(decl) => Stmt::Var(subst_var_decl(decl, active)),
        Stmt::Function(function) => Stmt::Function(subst_function(function, active)),
        Stmt::Class(class) => Stmt::Class(subst_class(class, active)),
        Stmt::Return(expr) => Stmt::Return(expr.as_ref().map(|e| subst_expr(e, active))),
        Stmt::If {
            test,
            consequent,
            alternate,
        } => Stmt::If {
            test: subst_expr(test, active),
            consequent: subst_boxed_stmt(consequent, active),
            alternate: alternate.as_ref().map(|alt| subst_boxed_stmt(alt, active)),
        },
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            let mut own = Vec::new();
            if let Some(ForInit::Var(decl)) = init {
                var_names(decl, &mut own);
            }
            let scope = shadowed(active, &own);
            Stmt::For {
                init: init.as_ref().map(|init| match init {
                    ForInit::Var(decl) => ForInit::Var(subst_var_decl(decl, &scope)),
                    ForInit::Expr(expr) => ForInit::Expr(subst_expr(expr, &scope)),
                }),
                test: test.as_ref().map(|e| subst_expr(e, &scope)),
                update: update.as_ref().map(|e| subst_expr(e, &scope)),
                body: subst_boxed_stmt(body, &scope),
            }
        }
        Stmt::ForIn {
            left,
            right,
            body,
            of,
            is_await,
        } => {
            let right = subst_expr(right, active);
            let (left, scope) = match left {
                ForHead::Var(kind, pattern) => {
                    let mut own = Vec::new();
                    pattern.bound_names(&mut own);
                    let scope = shadowed(active, &own);
                    (ForHead::Var(*kind, subst_pattern(pattern, &scope)), scope)
                }
                ForHead::Expr(expr) => (ForHead::Expr(subst_expr(expr, active)), Cow::Borrowed(active)),
            };
            Stmt::ForIn {
                left,
                right,
                body: subst_boxed_stmt(body, &scope),
                of: *of,
                is_await: *is_await,
            }
        }
        Stmt::While { test, body } => Stmt::While {
            test: subst_expr(test, active),
            body: subst_boxed_stmt(body, active),
        },
        Stmt::DoWhile { body, test } => Stmt::DoWhile {
            body: subst_boxed_stmt(body, active),
            test: subst_expr(test, active),
        },
        Stmt::With { object, body } => Stmt::With {
            object: subst_expr(object, active),
            body: subst_boxed_stmt(body, active),
        },
        Stmt::Labeled { label, body } => Stmt::Labeled {
            label: label.clone(),
            body: subst_boxed_stmt(body, active),
        },
        Stmt::Block(stmts) => Stmt::Block(subst_stmts(stmts, active)),
        Stmt::Throw(expr) => Stmt::Throw(subst_expr(expr, active)),
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => Stmt::Try {
            block: subst_stmts(block, active),
            handler: handler.as_ref().map(|handler| subst_catch(handler, active)),
            finalizer: finalizer.as_ref().map(|stmts| subst_stmts(stmts, active)),
        },
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            let discriminant = subst_expr(discriminant, active);
            let names: Vec<&str> = cases
                .iter()
                .flat_map(|case| declared_names(&case.body))
                .collect();
            let scope = shadowed(active, &names);
            Stmt::Switch {
                discriminant,
                cases: cases
                    .iter()
                    .map(|case| SwitchCase {
                        test: case.test.as_ref().map(|test| subst_expr(test, &scope)),
                        body: case.body.iter().map(|stmt| subst_stmt(stmt, &scope)).collect(),
                    })
                    .collect(),
            }
        }
        Stmt::Export(decl) => Stmt::Export(match decl {
            ExportDecl::Function(function) => ExportDecl::Function(subst_function(function, active)),
            ExportDecl::Class(class) => ExportDecl::Class(subst_class(class, active)),
            ExportDecl::Var(var) => ExportDecl::Var(subst_var_decl(var, active)),
            ExportDecl::DefaultClass(class) => ExportDecl::DefaultClass(subst_class(class, active)),
            ExportDecl::DefaultFunction(function) => {
                ExportDecl::DefaultFunction(subst_function(function, active))
            }
            ExportDecl::DefaultExpr(expr) => ExportDecl::DefaultExpr(subst_expr(expr, active)),
            reexport @ (ExportDecl::Named { .. } | ExportDecl::All { .. }) => reexport.clone(),
        }),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Import(_) | Stmt::Debugger | Stmt::Empty => {
            node.value.clone()
        }
    };
    Spanned {
        value,
        span: node.span,
    }
}

fn subst_var_decl(decl: &VarDecl, active: &Active) -> VarDecl {
    VarDecl {
        kind: decl.kind,
        declarators: decl
            .declarators
            .iter()
            .map(|Declarator { target, init }| Declarator {
                target: subst_pattern(target, active),
                init: init.as_ref().map(|init| subst_expr(init, active)),
            })
            .collect(),
    }
}

fn subst_catch(handler: &CatchClause, active: &Active) -> CatchClause {
    let mut own = Vec::new();
    if let Some(param) = &handler.param {
        param.bound_names(&mut own);
    }
    let scope = shadowed(active, &own);
    CatchClause {
        param: handler.param.as_ref().map(|p| subst_pattern(p, &scope)),
        body: subst_stmts(&handler.body, &scope),
    }
}

// ============================================================================
// FUNCTIONS, CLASSES AND PATTERNS
// ============================================================================

/// Parameters and the function's own name shadow inside the function.
fn subst_function(function: &Function, active: &Active) -> Function {
    let mut own = Vec::new();
    for param in &function.params {
        param.bound_names(&mut own);
    }
    own.extend(function.name.as_deref());
    let scope = shadowed(active, &own);
    if scope.is_empty() {
        return function.clone();
    }
    Function {
        name: function.name.clone(),
        params: function
            .params
            .iter()
            .map(|param| subst_pattern(param, &scope))
            .collect(),
        body: match &function.body {
            FunctionBody::Block(stmts) => FunctionBody::Block(subst_stmts(stmts, &scope)),
            FunctionBody::Expr(expr) => FunctionBody::Expr(Box::new(subst_expr(expr, &scope))),
        },
        is_async: function.is_async,
        is_generator: function.is_generator,
    }
}

fn subst_class(class: &Class, active: &Active) -> Class {
    let own: Vec<&str> = class.name.as_deref().into_iter().collect();
    let scope = shadowed(active, &own);
    Class {
        name: class.name.clone(),
        superclass: class
            .superclass
            .as_ref()
            .map(|superclass| Box::new(subst_expr(superclass, active))),
        members: class
            .members
            .iter()
            .map(|member| subst_class_member(member, &scope))
            .collect(),
    }
}

fn subst_class_member(member: &ClassMember, active: &Active) -> ClassMember {
    match member {
        ClassMember::Method { is_static, method } => ClassMember::Method {
            is_static: *is_static,
            method: subst_method(method, active),
        },
        ClassMember::Field {
            is_static,
            key,
            value,
        } => ClassMember::Field {
            is_static: *is_static,
            key: subst_prop_key(key, active),
            value: value.as_ref().map(|value| subst_expr(value, active)),
        },
        ClassMember::StaticBlock(stmts) => ClassMember::StaticBlock(subst_stmts(stmts, active)),
    }
}

fn subst_method(method: &Method, active: &Active) -> Method {
    Method {
        kind: method.kind,
        key: subst_prop_key(&method.key, active),
        function: subst_function(&method.function, active),
    }
}

fn subst_prop_key(key: &PropKey, active: &Active) -> PropKey {
    match key {
        PropKey::Computed(expr) => PropKey::Computed(Box::new(subst_expr(expr, active))),
        other => other.clone(),
    }
}

/// Binding names are left alone; defaults and computed keys are expressions.
fn subst_pattern(pattern: &Pattern, active: &Active) -> Pattern {
    match pattern {
        Pattern::Ident(_) => pattern.clone(),
        Pattern::Object(props) => Pattern::Object(
            props
                .iter()
                .map(|prop| match prop {
                    ObjectPatternProp::Keyed { key, value } => ObjectPatternProp::Keyed {
                        key: subst_prop_key(key, active),
                        value: subst_pattern(value, active),
                    },
                    ObjectPatternProp::Shorthand { name, default } => {
                        ObjectPatternProp::Shorthand {
                            name: name.clone(),
                            default: default.as_ref().map(|d| subst_expr(d, active)),
                        }
                    }
                    ObjectPatternProp::Rest(inner) => {
                        ObjectPatternProp::Rest(subst_pattern(inner, active))
                    }
                })
                .collect(),
        ),
        Pattern::Array(items) => Pattern::Array(
            items
                .iter()
                .map(|item| item.as_ref().map(|p| subst_pattern(p, active)))
                .collect(),
        ),
        Pattern::Rest(inner) => Pattern::Rest(Box::new(subst_pattern(inner, active))),
        Pattern::Default(target, default) => Pattern::Default(
            Box::new(subst_pattern(target, active)),
            Box::new(subst_expr(default, active)),
        ),
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

fn subst_box(expr: &Expr, active: &Active) -> Box<Expr> {
    Box::new(subst_expr(expr, active))
}

fn subst_list(exprs: &[Expr], active: &Active) -> Vec<Expr> {
    exprs.iter().map(|expr| subst_expr(expr, active)).collect()
}

fn subst_expr(expr: &Expr, active: &Active) -> Expr {
    if active.is_empty() {
        return expr.clone();
    }
    match expr {
        Expr::Ident(name) => match active.get(name.as_str()) {
            Some(replacement) => (*replacement).clone(),
            None => expr.clone(),
        },
        Expr::This
        | Expr::Super
        | Expr::Null
        | Expr::Bool(_)
        | Expr::Number(_)
        | Expr::Str(_)
        | Expr::Regex(_)
        | Expr::MetaProperty(_)
        | Expr::PrivateName(_) => expr.clone(),
        Expr::Template { quasis, exprs } => Expr::Template {
            quasis: quasis.clone(),
            exprs: subst_list(exprs, active),
        },
        Expr::TaggedTemplate { tag, quasis, exprs } => Expr::TaggedTemplate {
            tag: subst_box(tag, active),
            quasis: quasis.clone(),
            exprs: subst_list(exprs, active),
        },
        Expr::Import(args) => Expr::Import(subst_list(args, active)),
        Expr::Yield { arg, delegate } => Expr::Yield {
            arg: arg.as_ref().map(|arg| subst_box(arg, active)),
            delegate: *delegate,
        },
        Expr::Array(items) => Expr::Array(
            items
                .iter()
                .map(|item| item.as_ref().map(|e| subst_expr(e, active)))
                .collect(),
        ),
        Expr::Object(props) => Expr::Object(
            props
                .iter()
                .map(|prop| match prop {
                    Prop::KeyValue { key, value } => Prop::KeyValue {
                        key: subst_prop_key(key, active),
                        value: subst_expr(value, active),
                    },
                    Prop::Shorthand(name) => match active.get(name.as_str()) {
                        Some(replacement) => Prop::KeyValue {
                            key: PropKey::Ident(name.clone()),
                            value: (*replacement).clone(),
                        },
                        None => prop.clone(),
                    },
                    Prop::Method(method) => Prop::Method(subst_method(method, active)),
                    Prop::Spread(value) => Prop::Spread(subst_expr(value, active)),
                })
                .collect(),
        ),
        Expr::Function(function) => Expr::Function(Box::new(subst_function(function, active))),
        Expr::Arrow(function) => Expr::Arrow(Box::new(subst_function(function, active))),
        Expr::Class(class) => Expr::Class(Box::new(subst_class(class, active))),
        Expr::Unary { op, arg } => Expr::Unary {
            op: *op,
            arg: subst_box(arg, active),
        },
        Expr::Update { op, prefix, arg } => Expr::Update {
            op: *op,
            prefix: *prefix,
            arg: subst_box(arg, active),
        },
        Expr::Binary { op, left, right } => Expr::Binary {
            op: *op,
            left: subst_box(left, active),
            right: subst_box(right, active),
        },
        Expr::Assign { op, target, value } => Expr::Assign {
            op: *op,
            target: subst_box(target, active),
            value: subst_box(value, active),
        },
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => Expr::Conditional {
            test: subst_box(test, active),
            consequent: subst_box(consequent, active),
            alternate: subst_box(alternate, active),
        },
        Expr::Call {
            callee,
            args,
            optional,
        } => Expr::Call {
            callee: subst_box(callee, active),
            args: subst_list(args, active),
            optional: *optional,
        },
        Expr::New { callee, args } => Expr::New {
            callee: subst_box(callee, active),
            args: args.as_ref().map(|args| subst_list(args, active)),
        },
        Expr::Member {
            object,
            property,
            optional,
        } => Expr::Member {
            object: subst_box(object, active),
            property: match property {
                MemberProp::Ident(_) | MemberProp::Private(_) => property.clone(),
                MemberProp::Computed(index) => MemberProp::Computed(subst_box(index, active)),
            },
            optional: *optional,
        },
        Expr::Sequence(items) => Expr::Sequence(subst_list(items, active)),
        Expr::Spread(inner) => Expr::Spread(subst_box(inner, active)),
        Expr::Inline(site) => Expr::Inline(MacroSite {
            module: site.module.clone(),
            function: site.function.clone(),
            args: subst_list(&site.args, active),
            span: site.span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::render::render_statements;
    use crate::syntax::parser::{parse_expression, parse_program};

    fn function(source: &str) -> Function {
        let program = parse_program(source).unwrap();
        match &program.body[0].value {
            Stmt::Function(function) => function.clone(),
            other => panic!("expected a function, got {:?}", other),
        }
    }

    fn inline(source: &str, args: &[&str], mode: SubstitutionMode) -> String {
        let function = function(source);
        let args: Vec<Expr> = args.iter().map(|a| parse_expression(a).unwrap()).collect();
        let body = inline_body(&function, &args, "f", mode).unwrap();
        render_statements(&body).text
    }

    fn simultaneous(source: &str, args: &[&str]) -> String {
        inline(source, args, SubstitutionMode::Simultaneous)
    }

    #[test]
    fn parenthesizes_by_precedence() {
        assert_eq!(
            simultaneous("function f(x) { return x * 2; }", &["a + 1"]),
            "(a + 1) * 2"
        );
    }

    #[test]
    fn block_declaration_shadows() {
        let text = simultaneous("function f(x) { { var x = 5; return x * 2; } }", &["a + 1"]);
        assert_eq!(text, "{\n  var x = 5;\n  return x * 2;\n}");
    }

    #[test]
    fn for_initializer_shadows() {
        let text = simultaneous(
            "function f(x) { for (var x = 0; x < 10; x++) { return x; } }",
            &["y"],
        );
        assert_eq!(text, "for (var x = 0; x < 10; x++) {\n  return x;\n}");
    }

    #[test]
    fn for_loop_outside_a_list_shadows_itself() {
        let text = simultaneous(
            "function f(x) { if (x) for (let x = 0; x < 1; x++) g(x); }",
            &["y"],
        );
        assert_eq!(text, "if (y) for (let x = 0; x < 1; x++) g(x);");
    }

    #[test]
    fn shadowing_is_per_name() {
        let text = simultaneous(
            "function f(x, y) { var x = 1; return x + y; }",
            &["a", "b"],
        );
        assert_eq!(text, "var x = 1;\nreturn x + b;");
    }

    #[test]
    fn nested_function_parameters_shadow() {
        let text = simultaneous(
            "function f(x) { return [x, (x) => x, function (y) { return x + y; }]; }",
            &["v"],
        );
        assert_eq!(text, "[v, (x) => x, function (y) {\n  return v + y;\n}]");
    }

    #[test]
    fn property_names_are_not_references() {
        let text = simultaneous("function f(x) { return { x: x.x, x }; }", &["o"]);
        assert_eq!(text, "({ x: o.x, x: o })");
    }

    #[test]
    fn catch_parameter_shadows() {
        let text = simultaneous(
            "function f(e) { try { g(e); } catch (e) { h(e); } }",
            &["err"],
        );
        assert_eq!(text, "try {\n  g(err);\n} catch (e) {\n  h(e);\n}");
    }

    #[test]
    fn simultaneous_avoids_ordering_hazard() {
        let source = "function f(a, b) { return a - b; }";
        assert_eq!(simultaneous(source, &["b", "1"]), "b - 1");
        assert_eq!(inline(source, &["b", "1"], SubstitutionMode::Sequential), "1 - 1");
    }

    #[test]
    fn arity_must_match() {
        let function = function("function f(a, b, c) { return a; }");
        let args = vec![Expr::ident("x"), Expr::ident("y")];
        let error = inline_body(&function, &args, "f", SubstitutionMode::Simultaneous).unwrap_err();
        assert!(matches!(
            error,
            InlineError::ArityMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_destructured_parameters_and_spread_arguments() {
        let destructured = function("function f({ a }) { return a; }");
        let error = bind_params(&destructured, &[Expr::ident("o")], "f").unwrap_err();
        assert!(matches!(error, InlineError::UnsupportedParameter { index: 0, .. }));

        let plain = function("function f(a) { return a; }");
        let spread = Expr::Spread(Box::new(Expr::ident("xs")));
        let error = bind_params(&plain, &[spread], "f").unwrap_err();
        assert!(matches!(error, InlineError::SpreadArgument { .. }));
    }

    #[test]
    fn inner_binder_captures_an_argument_of_the_same_name() {
        // Arguments are spliced in without renaming; a nested binder that
        // shares a free name of the argument captures it.
        let text = simultaneous(
            "function f(x) { return function (y) { return x + y; }; }",
            &["y"],
        );
        assert_eq!(text, "(function (y) {\n  return y + y;\n})");
    }

    #[test]
    fn reaches_tagged_templates_fields_and_generators() {
        let text = simultaneous("function f(x) { return tag`<${x}>`; }", &["a.b"]);
        assert_eq!(text, "tag`<${a.b}>`");

        let text = simultaneous(
            "function f(x) { return class { #v = x; static { init(x); } get v() { return this.#v; } }; }",
            &["n"],
        );
        assert_eq!(
            text,
            "(class {\n  #v = n;\n  static {\n    init(n);\n  }\n  get v() {\n    return this.#v;\n  }\n})"
        );

        let text = simultaneous("function f(x) { return function* () { yield x; }; }", &["1"]);
        assert_eq!(text, "(function* () {\n  yield 1;\n})");
    }

    #[test]
    fn single_name_substitution() {
        let program = parse_program("log(x); { let x = 1; log(x); }").unwrap();
        let out = substitute("x", &Expr::ident("z"), &program.body);
        assert_eq!(
            crate::syntax::printer::print_statements(&out),
            "log(z);\n{\n  let x = 1;\n  log(x);\n}"
        );
    }
}
