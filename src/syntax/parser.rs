//! JavaScript parser - pest grammar plus a builder into the typed syntax tree.
//!
//! The parser is purely syntactic. Source parentheses are not recorded; the
//! printer re-derives them from operator precedence.

use std::fmt;

use once_cell::sync::Lazy;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{to_source_span, InlineError, SourceContext};
use crate::syntax::{
    AssignOp, BinaryOp, CatchClause, Class, ClassMember, Declarator, ExportDecl, ExportSpecifier,
    Expr, ForHead, ForInit, Function, FunctionBody, ImportDecl, ImportSpecifier, MacroSite,
    MemberProp, Method, MethodKind, ObjectPatternProp, Pattern, Program, Prop, PropKey, Span,
    Spanned, Stmt, StmtNode, SwitchCase, UnaryOp, UpdateOp, VarDecl, VarKind,
};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct JsParser;

static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::op_nullish, Assoc::Left))
        .op(Op::infix(Rule::op_or, Assoc::Left))
        .op(Op::infix(Rule::op_and, Assoc::Left))
        .op(Op::infix(Rule::op_bitor, Assoc::Left))
        .op(Op::infix(Rule::op_bitxor, Assoc::Left))
        .op(Op::infix(Rule::op_bitand, Assoc::Left))
        .op(Op::infix(Rule::op_strict_eq, Assoc::Left)
            | Op::infix(Rule::op_strict_ne, Assoc::Left)
            | Op::infix(Rule::op_eq, Assoc::Left)
            | Op::infix(Rule::op_ne, Assoc::Left))
        .op(Op::infix(Rule::op_lt, Assoc::Left)
            | Op::infix(Rule::op_le, Assoc::Left)
            | Op::infix(Rule::op_gt, Assoc::Left)
            | Op::infix(Rule::op_ge, Assoc::Left)
            | Op::infix(Rule::op_instanceof, Assoc::Left)
            | Op::infix(Rule::op_in, Assoc::Left))
        .op(Op::infix(Rule::op_shl, Assoc::Left)
            | Op::infix(Rule::op_shr, Assoc::Left)
            | Op::infix(Rule::op_ushr, Assoc::Left))
        .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_sub, Assoc::Left))
        .op(Op::infix(Rule::op_mul, Assoc::Left)
            | Op::infix(Rule::op_div, Assoc::Left)
            | Op::infix(Rule::op_mod, Assoc::Left))
        .op(Op::infix(Rule::op_exp, Assoc::Right))
});

// ============================================================================
// PUBLIC API
// ============================================================================

/// A syntax error with the byte range it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl SyntaxError {
    /// Message prefixed with the 1-based `line:column` of the error in `source`.
    pub fn located(&self, source: &str) -> String {
        let (line, column) = line_col(source, self.span.start);
        format!("{} at {}:{}", self.message, line, column)
    }

    /// Converts into the error reported for a target module or argument text.
    pub fn into_parse_error(self, what: impl Into<String>, source: &SourceContext) -> InlineError {
        InlineError::Parse {
            what: what.into(),
            message: self.located(&source.content),
            src: source.to_named_source(),
            span: to_source_span(self.span),
        }
    }

    /// Converts into the error reported when the file being transformed fails to parse.
    pub fn into_host_error(self, source: &SourceContext) -> InlineError {
        InlineError::HostSyntax {
            file: source.name.clone(),
            message: self.located(&source.content),
            src: source.to_named_source(),
            span: to_source_span(self.span),
        }
    }
}

type BuildResult<T> = Result<T, SyntaxError>;

/// Parse a module or script into a [`Program`].
pub fn parse_program(source_text: &str) -> BuildResult<Program> {
    let mut pairs = JsParser::parse(Rule::program, source_text).map_err(convert_parse_error)?;
    let program = pairs.next().ok_or_else(|| SyntaxError {
        message: "empty parse result".to_string(),
        span: Span::default(),
    })?;
    let span = span_of(&program);
    let body = build_statements(Children::of(program))?;
    Ok(Program { body, span })
}

/// Parse raw macro argument text (`a, b + 1, c`) into argument expressions.
pub fn parse_arguments(source_text: &str) -> BuildResult<Vec<Expr>> {
    let mut pairs =
        JsParser::parse(Rule::argument_list, source_text).map_err(convert_parse_error)?;
    let list = pairs.next().ok_or_else(|| SyntaxError {
        message: "empty parse result".to_string(),
        span: Span::default(),
    })?;
    Children::of(list).map(build_argument).collect()
}

/// Parse a single expression (used by tests and the CLI).
pub fn parse_expression(source_text: &str) -> BuildResult<Expr> {
    let mut args = parse_arguments(source_text)?;
    match (args.pop(), args.is_empty()) {
        (Some(expr), true) => Ok(expr),
        _ => Err(SyntaxError {
            message: "expected exactly one expression".to_string(),
            span: Span::new(0, source_text.len()),
        }),
    }
}

/// 1-based line and column for a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..floor_char_boundary(source, offset)];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ============================================================================
// PAIR CURSOR
// ============================================================================

/// Inner pairs of a rule with keyword tokens removed.
struct Children<'i> {
    items: std::iter::Peekable<std::vec::IntoIter<Pair<'i, Rule>>>,
    owner: Rule,
    span: Span,
}

impl<'i> Children<'i> {
    fn of(pair: Pair<'i, Rule>) -> Self {
        let owner = pair.as_rule();
        let span = span_of(&pair);
        let items: Vec<_> = pair
            .into_inner()
            .filter(|p| !is_skipped(p.as_rule()))
            .collect();
        Self {
            items: items.into_iter().peekable(),
            owner,
            span,
        }
    }

    fn expect(&mut self, what: &str) -> BuildResult<Pair<'i, Rule>> {
        self.items.next().ok_or_else(|| SyntaxError {
            message: format!("malformed {:?}: missing {}", self.owner, what),
            span: self.span,
        })
    }

    fn next_if(&mut self, rule: Rule) -> Option<Pair<'i, Rule>> {
        self.items.next_if(|p| p.as_rule() == rule)
    }

    fn peek_rule(&mut self) -> Option<Rule> {
        self.items.peek().map(|p| p.as_rule())
    }
}

impl<'i> Iterator for Children<'i> {
    type Item = Pair<'i, Rule>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

fn is_skipped(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::EOI
            | Rule::hashbang
            | Rule::kw_break
            | Rule::kw_case
            | Rule::kw_catch
            | Rule::kw_class
            | Rule::kw_continue
            | Rule::kw_default
            | Rule::kw_do
            | Rule::kw_else
            | Rule::kw_export
            | Rule::kw_extends
            | Rule::kw_finally
            | Rule::kw_for
            | Rule::kw_from
            | Rule::kw_function
            | Rule::kw_if
            | Rule::kw_import
            | Rule::kw_as
            | Rule::kw_new
            | Rule::kw_return
            | Rule::kw_switch
            | Rule::kw_throw
            | Rule::kw_try
            | Rule::kw_while
            | Rule::kw_with
            | Rule::kw_debugger
            | Rule::kw_yield
            | Rule::kw_return_value
            | Rule::kw_break_label
            | Rule::kw_continue_label
            | Rule::kw_yield_value
    )
}

/// Pair span without trailing whitespace; rules ending in an optional token
/// otherwise absorb the whitespace that follows them.
fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    let trimmed = span.as_str().trim_end().len();
    Span::new(span.start(), span.start() + trimmed)
}

fn unexpected(pair: &Pair<Rule>, context: &str) -> SyntaxError {
    SyntaxError {
        message: format!("unexpected {:?} in {}", pair.as_rule(), context),
        span: span_of(pair),
    }
}

// ============================================================================
// STATEMENT BUILDERS
// ============================================================================

fn build_statements(children: Children) -> BuildResult<Vec<StmtNode>> {
    children.map(build_stmt).collect()
}

fn build_stmt(pair: Pair<Rule>) -> BuildResult<StmtNode> {
    let span = span_of(&pair);
    let value = match pair.as_rule() {
        Rule::block => Stmt::Block(build_statements(Children::of(pair))?),
        Rule::empty_stmt => Stmt::Empty,
        Rule::debugger_stmt => Stmt::Debugger,
        Rule::break_stmt => Stmt::Break(build_label(pair)),
        Rule::continue_stmt => Stmt::Continue(build_label(pair)),
        Rule::labeled_stmt => {
            let mut children = Children::of(pair);
            let label = children.expect("label")?.as_str().to_string();
            let body = Box::new(build_stmt(children.expect("labeled statement")?)?);
            Stmt::Labeled { label, body }
        }
        Rule::with_stmt => {
            let mut children = Children::of(pair);
            let object = build_expression(children.expect("scope object")?)?;
            let body = Box::new(build_stmt(children.expect("with body")?)?);
            Stmt::With { object, body }
        }
        Rule::import_decl => Stmt::Import(build_import(pair)?),
        Rule::export_default => Stmt::Export(build_export_default(pair)?),
        Rule::export_stmt => Stmt::Export(build_export(pair)?),
        Rule::var_decl_stmt => {
            let mut children = Children::of(pair);
            Stmt::Var(build_var_decl(children.expect("declaration")?)?)
        }
        Rule::function_decl => Stmt::Function(build_function(pair)?),
        Rule::class_decl => Stmt::Class(build_class(pair)?),
        Rule::if_stmt => {
            let mut children = Children::of(pair);
            let test = build_expression(children.expect("condition")?)?;
            let consequent = Box::new(build_stmt(children.expect("consequent")?)?);
            let alternate = match children.next_if(Rule::else_clause) {
                Some(clause) => {
                    let mut inner = Children::of(clause);
                    Some(Box::new(build_stmt(inner.expect("alternate")?)?))
                }
                None => None,
            };
            Stmt::If {
                test,
                consequent,
                alternate,
            }
        }
        Rule::for_stmt => {
            let mut children = Children::of(pair);
            let init = children
                .next_if(Rule::for_init)
                .map(build_for_init)
                .transpose()?;
            let test = children
                .next_if(Rule::for_test)
                .map(build_wrapped_expression)
                .transpose()?;
            let update = children
                .next_if(Rule::for_update)
                .map(build_wrapped_expression)
                .transpose()?;
            let body = Box::new(build_stmt(children.expect("loop body")?)?);
            Stmt::For {
                init,
                test,
                update,
                body,
            }
        }
        Rule::for_in_stmt => {
            let mut children = Children::of(pair);
            let is_await = children.next_if(Rule::await_marker).is_some();
            let left = build_for_head(children.expect("loop head")?)?;
            let of = children.expect("`of` or `in`")?.as_str() == "of";
            let right = build_expression(children.expect("iterated expression")?)?;
            let body = Box::new(build_stmt(children.expect("loop body")?)?);
            Stmt::ForIn {
                left,
                right,
                body,
                of,
                is_await,
            }
        }
        Rule::while_stmt => {
            let mut children = Children::of(pair);
            let test = build_expression(children.expect("condition")?)?;
            let body = Box::new(build_stmt(children.expect("loop body")?)?);
            Stmt::While { test, body }
        }
        Rule::do_while_stmt => {
            let mut children = Children::of(pair);
            let body = Box::new(build_stmt(children.expect("loop body")?)?);
            let test = build_expression(children.expect("condition")?)?;
            Stmt::DoWhile { body, test }
        }
        Rule::return_stmt => {
            let mut children = Children::of(pair);
            Stmt::Return(children.next().map(build_expression).transpose()?)
        }
        Rule::throw_stmt => {
            let mut children = Children::of(pair);
            Stmt::Throw(build_expression(children.expect("thrown expression")?)?)
        }
        Rule::try_stmt => build_try(pair)?,
        Rule::switch_stmt => {
            let mut children = Children::of(pair);
            let discriminant = build_expression(children.expect("discriminant")?)?;
            let cases = children.map(build_switch_case).collect::<BuildResult<_>>()?;
            Stmt::Switch {
                discriminant,
                cases,
            }
        }
        Rule::expr_stmt => {
            let mut children = Children::of(pair);
            Stmt::Expr(build_expression(children.expect("expression")?)?)
        }
        _ => return Err(unexpected(&pair, "statement position")),
    };
    Ok(Spanned { value, span })
}

fn build_label(pair: Pair<Rule>) -> Option<String> {
    Children::of(pair).next().map(|label| label.as_str().to_string())
}

fn build_var_decl(pair: Pair<Rule>) -> BuildResult<VarDecl> {
    let mut children = Children::of(pair);
    let kind = build_var_kind(&children.expect("declaration kind")?);
    let declarators = children
        .map(|declarator| {
            let mut inner = Children::of(declarator);
            let target = build_pattern(inner.expect("binding")?)?;
            let init = inner.next().map(build_assign).transpose()?;
            Ok(Declarator { target, init })
        })
        .collect::<BuildResult<_>>()?;
    Ok(VarDecl { kind, declarators })
}

fn build_var_kind(pair: &Pair<Rule>) -> VarKind {
    match pair.as_str() {
        "let" => VarKind::Let,
        "const" => VarKind::Const,
        _ => VarKind::Var,
    }
}

fn build_for_init(pair: Pair<Rule>) -> BuildResult<ForInit> {
    let mut children = Children::of(pair);
    let inner = children.expect("initializer")?;
    match inner.as_rule() {
        Rule::var_decl => Ok(ForInit::Var(build_var_decl(inner)?)),
        _ => Ok(ForInit::Expr(build_expression(inner)?)),
    }
}

fn build_for_head(pair: Pair<Rule>) -> BuildResult<ForHead> {
    let mut children = Children::of(pair);
    let first = children.expect("loop binding")?;
    if first.as_rule() == Rule::var_kind {
        let kind = build_var_kind(&first);
        let pattern = build_pattern(children.expect("loop binding")?)?;
        return Ok(ForHead::Var(kind, pattern));
    }
    Ok(ForHead::Expr(build_lhs(first)?))
}

fn build_try(pair: Pair<Rule>) -> BuildResult<Stmt> {
    let mut children = Children::of(pair);
    let block = build_statements(Children::of(children.expect("try block")?))?;
    let handler = match children.next_if(Rule::catch_clause) {
        Some(clause) => {
            let mut inner = Children::of(clause);
            let param = match inner.peek_rule() {
                Some(Rule::block) | None => None,
                Some(_) => Some(build_pattern(inner.expect("catch binding")?)?),
            };
            let body = build_statements(Children::of(inner.expect("catch block")?))?;
            Some(CatchClause { param, body })
        }
        None => None,
    };
    let finalizer = match children.next_if(Rule::finally_clause) {
        Some(clause) => {
            let mut inner = Children::of(clause);
            Some(build_statements(Children::of(inner.expect("finally block")?))?)
        }
        None => None,
    };
    Ok(Stmt::Try {
        block,
        handler,
        finalizer,
    })
}

fn build_switch_case(pair: Pair<Rule>) -> BuildResult<SwitchCase> {
    let mut children = Children::of(pair);
    let test = children
        .next_if(Rule::expression)
        .map(build_expression)
        .transpose()?;
    let body = build_statements(children)?;
    Ok(SwitchCase { test, body })
}

fn build_import(pair: Pair<Rule>) -> BuildResult<ImportDecl> {
    let mut children = Children::of(pair);
    let mut decl = ImportDecl {
        default: None,
        namespace: None,
        named: Vec::new(),
        source: String::new(),
    };
    if let Some(clause) = children.next_if(Rule::import_clause) {
        for part in Children::of(clause) {
            match part.as_rule() {
                Rule::ident => decl.default = Some(part.as_str().to_string()),
                Rule::namespace_import => {
                    let mut inner = Children::of(part);
                    decl.namespace = Some(inner.expect("namespace binding")?.as_str().to_string());
                }
                Rule::named_imports => {
                    for spec in Children::of(part) {
                        let mut inner = Children::of(spec);
                        let imported = inner.expect("imported name")?.as_str().to_string();
                        let local = inner.next().map(|p| p.as_str().to_string());
                        decl.named.push(ImportSpecifier { imported, local });
                    }
                }
                _ => return Err(unexpected(&part, "import clause")),
            }
        }
    }
    decl.source = children.expect("module specifier")?.as_str().to_string();
    Ok(decl)
}

fn build_export_default(pair: Pair<Rule>) -> BuildResult<ExportDecl> {
    let mut children = Children::of(pair);
    let inner = children.expect("default export")?;
    match inner.as_rule() {
        Rule::class_expr => Ok(ExportDecl::DefaultClass(build_class(inner)?)),
        Rule::function_expr => Ok(ExportDecl::DefaultFunction(build_function(inner)?)),
        _ => Ok(ExportDecl::DefaultExpr(build_expression(inner)?)),
    }
}

fn build_export(pair: Pair<Rule>) -> BuildResult<ExportDecl> {
    let mut children = Children::of(pair);
    let inner = children.expect("exported declaration")?;
    match inner.as_rule() {
        Rule::function_decl => Ok(ExportDecl::Function(build_function(inner)?)),
        Rule::class_decl => Ok(ExportDecl::Class(build_class(inner)?)),
        Rule::var_decl_stmt => {
            let mut decl = Children::of(inner);
            Ok(ExportDecl::Var(build_var_decl(decl.expect("declaration")?)?))
        }
        Rule::export_list => {
            let mut specifiers = Vec::new();
            let mut source = None;
            for part in Children::of(inner) {
                match part.as_rule() {
                    Rule::export_spec => {
                        let mut spec = Children::of(part);
                        let local = spec.expect("exported name")?.as_str().to_string();
                        let exported = spec.next().map(|p| p.as_str().to_string());
                        specifiers.push(ExportSpecifier { local, exported });
                    }
                    Rule::string => source = Some(part.as_str().to_string()),
                    _ => return Err(unexpected(&part, "export list")),
                }
            }
            Ok(ExportDecl::Named { specifiers, source })
        }
        Rule::export_all => {
            let mut parts = Children::of(inner);
            let exported = parts.next_if(Rule::prop_name).map(|p| p.as_str().to_string());
            let source = parts.expect("module specifier")?.as_str().to_string();
            Ok(ExportDecl::All { exported, source })
        }
        _ => Err(unexpected(&inner, "export")),
    }
}

// ============================================================================
// FUNCTIONS, CLASSES AND PATTERNS
// ============================================================================

/// Builds `function_decl`, `function_expr` and `arrow_function` pairs.
fn build_function(pair: Pair<Rule>) -> BuildResult<Function> {
    let is_arrow = pair.as_rule() == Rule::arrow_function;
    let mut children = Children::of(pair);
    let is_async = children.next_if(Rule::async_marker).is_some();

    if is_arrow {
        let params_pair = children.expect("arrow parameters")?;
        let mut params_children = Children::of(params_pair);
        let params = match params_children.next() {
            Some(p) if p.as_rule() == Rule::ident => vec![Pattern::Ident(p.as_str().to_string())],
            Some(p) => build_params(p)?,
            None => Vec::new(),
        };
        let body_pair = children.expect("arrow body")?;
        let body = match body_pair.as_rule() {
            Rule::function_body => FunctionBody::Block(build_statements(Children::of(body_pair))?),
            _ => FunctionBody::Expr(Box::new(build_assign(body_pair)?)),
        };
        return Ok(Function {
            name: None,
            params,
            body,
            is_async,
            is_generator: false,
        });
    }

    let is_generator = children.next_if(Rule::generator_marker).is_some();
    let name = children.next_if(Rule::ident).map(|p| p.as_str().to_string());
    let params = match children.next_if(Rule::params) {
        Some(p) => build_params(p)?,
        None => Vec::new(),
    };
    let body = build_statements(Children::of(children.expect("function body")?))?;
    Ok(Function {
        name,
        params,
        body: FunctionBody::Block(body),
        is_async,
        is_generator,
    })
}

fn build_params(pair: Pair<Rule>) -> BuildResult<Vec<Pattern>> {
    Children::of(pair).map(build_pattern).collect()
}

fn build_pattern(pair: Pair<Rule>) -> BuildResult<Pattern> {
    match pair.as_rule() {
        Rule::ident => Ok(Pattern::Ident(pair.as_str().to_string())),
        Rule::binding_element => {
            let mut children = Children::of(pair);
            let target = build_pattern(children.expect("binding")?)?;
            match children.next() {
                Some(default) => Ok(Pattern::Default(
                    Box::new(target),
                    Box::new(build_assign(default)?),
                )),
                None => Ok(target),
            }
        }
        Rule::rest_element => {
            let mut children = Children::of(pair);
            Ok(Pattern::Rest(Box::new(build_pattern(
                children.expect("rest binding")?,
            )?)))
        }
        Rule::object_pattern => {
            let props = Children::of(pair)
                .map(|prop| match prop.as_rule() {
                    Rule::rest_element => {
                        let mut inner = Children::of(prop);
                        Ok(ObjectPatternProp::Rest(build_pattern(
                            inner.expect("rest binding")?,
                        )?))
                    }
                    Rule::keyed_pattern => {
                        let mut inner = Children::of(prop);
                        let key = build_prop_key(inner.expect("property key")?)?;
                        let value = build_pattern(inner.expect("property binding")?)?;
                        Ok(ObjectPatternProp::Keyed { key, value })
                    }
                    Rule::shorthand_pattern => {
                        let mut inner = Children::of(prop);
                        let name = inner.expect("binding name")?.as_str().to_string();
                        let default = inner.next().map(build_assign).transpose()?;
                        Ok(ObjectPatternProp::Shorthand { name, default })
                    }
                    _ => Err(unexpected(&prop, "object pattern")),
                })
                .collect::<BuildResult<_>>()?;
            Ok(Pattern::Object(props))
        }
        Rule::array_pattern => {
            let mut items = Children::of(pair)
                .map(|item| {
                    let mut inner = Children::of(item);
                    inner.next().map(build_pattern).transpose()
                })
                .collect::<BuildResult<Vec<_>>>()?;
            if matches!(items.last(), Some(None)) {
                items.pop();
            }
            Ok(Pattern::Array(items))
        }
        _ => Err(unexpected(&pair, "binding pattern")),
    }
}

fn build_class(pair: Pair<Rule>) -> BuildResult<Class> {
    let mut children = Children::of(pair);
    let name = children.next_if(Rule::ident).map(|p| p.as_str().to_string());
    let superclass = match children.next_if(Rule::class_heritage) {
        Some(heritage) => {
            let mut inner = Children::of(heritage);
            Some(Box::new(build_lhs(inner.expect("superclass")?)?))
        }
        None => None,
    };
    let body = children.expect("class body")?;
    let members = Children::of(body)
        .map(build_class_member)
        .collect::<BuildResult<_>>()?;
    Ok(Class {
        name,
        superclass,
        members,
    })
}

fn build_class_member(pair: Pair<Rule>) -> BuildResult<ClassMember> {
    let rule = pair.as_rule();
    let mut inner = Children::of(pair);
    if rule == Rule::static_block {
        inner.next_if(Rule::static_marker);
        return Ok(ClassMember::StaticBlock(build_statements(inner)?));
    }
    let is_static = inner.next_if(Rule::static_marker).is_some();
    match rule {
        Rule::method_member => Ok(ClassMember::Method {
            is_static,
            method: build_method(inner.expect("method")?)?,
        }),
        Rule::field_member => {
            let key = build_prop_key(inner.expect("field name")?)?;
            let value = inner.next().map(build_assign).transpose()?;
            Ok(ClassMember::Field {
                is_static,
                key,
                value,
            })
        }
        _ => Err(SyntaxError {
            message: format!("unexpected {:?} in class body", rule),
            span: inner.span,
        }),
    }
}

fn build_method(pair: Pair<Rule>) -> BuildResult<Method> {
    let mut children = Children::of(pair);
    let kind = match children.next_if(Rule::accessor) {
        Some(accessor) if accessor.as_str() == "get" => MethodKind::Get,
        Some(_) => MethodKind::Set,
        None => MethodKind::Method,
    };
    let is_async = children.next_if(Rule::async_marker).is_some();
    let is_generator = children.next_if(Rule::generator_marker).is_some();
    let key = build_prop_key(children.expect("method name")?)?;
    let params = match children.next_if(Rule::params) {
        Some(p) => build_params(p)?,
        None => Vec::new(),
    };
    let body = build_statements(Children::of(children.expect("method body")?))?;
    let name = match &key {
        PropKey::Ident(name) => Some(name.clone()),
        _ => None,
    };
    Ok(Method {
        kind,
        key,
        function: Function {
            name,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
        },
    })
}

fn build_prop_key(pair: Pair<Rule>) -> BuildResult<PropKey> {
    let mut children = Children::of(pair);
    let inner = children.expect("property key")?;
    match inner.as_rule() {
        Rule::prop_name => Ok(PropKey::Ident(inner.as_str().to_string())),
        Rule::string => Ok(PropKey::Str(inner.as_str().to_string())),
        Rule::number => Ok(PropKey::Number(inner.as_str().to_string())),
        Rule::private_name => Ok(PropKey::Private(private_name(&inner))),
        Rule::computed_key => {
            let mut computed = Children::of(inner);
            Ok(PropKey::Computed(Box::new(build_assign(
                computed.expect("computed key")?,
            )?)))
        }
        _ => Err(unexpected(&inner, "property key")),
    }
}

// ============================================================================
// EXPRESSION BUILDERS
// ============================================================================

fn build_wrapped_expression(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    build_expression(children.expect("expression")?)
}

fn build_expression(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut exprs = Children::of(pair)
        .map(build_assign)
        .collect::<BuildResult<Vec<_>>>()?;
    if exprs.len() == 1 {
        if let Some(expr) = exprs.pop() {
            return Ok(expr);
        }
    }
    Ok(Expr::Sequence(exprs))
}

fn build_argument(pair: Pair<Rule>) -> BuildResult<Expr> {
    match pair.as_rule() {
        Rule::spread => {
            let mut children = Children::of(pair);
            Ok(Expr::Spread(Box::new(build_assign(
                children.expect("spread argument")?,
            )?)))
        }
        _ => build_assign(pair),
    }
}

fn build_assign(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let first = children.expect("expression")?;
    match first.as_rule() {
        Rule::arrow_function => return Ok(Expr::Arrow(Box::new(build_function(first)?))),
        Rule::yield_expr => return build_yield(first),
        _ => {}
    }
    let target = build_conditional(first)?;
    let Some(op_pair) = children.next_if(Rule::assign_op) else {
        return Ok(target);
    };
    let op = AssignOp::from_token(op_pair.as_str()).ok_or_else(|| unexpected(&op_pair, "assignment"))?;
    let value = build_assign(children.expect("assigned value")?)?;
    Ok(Expr::Assign {
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

fn build_yield(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let delegate = children.next_if(Rule::generator_marker).is_some();
    let arg = children.next().map(build_assign).transpose()?;
    Ok(Expr::Yield {
        arg: arg.map(Box::new),
        delegate,
    })
}

fn build_conditional(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let test = build_binary(children.expect("operand")?)?;
    let Some(consequent) = children.next() else {
        return Ok(test);
    };
    let alternate = children.expect("alternate")?;
    Ok(Expr::Conditional {
        test: Box::new(test),
        consequent: Box::new(build_assign(consequent)?),
        alternate: Box::new(build_assign(alternate)?),
    })
}

fn build_binary(pair: Pair<Rule>) -> BuildResult<Expr> {
    PRATT
        .map_primary(build_unary)
        .map_infix(|left, op, right| {
            Ok(Expr::Binary {
                op: binary_op(&op)?,
                left: Box::new(left?),
                right: Box::new(right?),
            })
        })
        .parse(pair.into_inner())
}

fn binary_op(pair: &Pair<Rule>) -> BuildResult<BinaryOp> {
    let op = match pair.as_rule() {
        Rule::op_nullish => BinaryOp::Nullish,
        Rule::op_or => BinaryOp::Or,
        Rule::op_and => BinaryOp::And,
        Rule::op_bitor => BinaryOp::BitOr,
        Rule::op_bitxor => BinaryOp::BitXor,
        Rule::op_bitand => BinaryOp::BitAnd,
        Rule::op_strict_eq => BinaryOp::StrictEq,
        Rule::op_strict_ne => BinaryOp::StrictNe,
        Rule::op_eq => BinaryOp::Eq,
        Rule::op_ne => BinaryOp::Ne,
        Rule::op_lt => BinaryOp::Lt,
        Rule::op_le => BinaryOp::Le,
        Rule::op_gt => BinaryOp::Gt,
        Rule::op_ge => BinaryOp::Ge,
        Rule::op_instanceof => BinaryOp::InstanceOf,
        Rule::op_in => BinaryOp::In,
        Rule::op_shl => BinaryOp::Shl,
        Rule::op_shr => BinaryOp::Shr,
        Rule::op_ushr => BinaryOp::UShr,
        Rule::op_add => BinaryOp::Add,
        Rule::op_sub => BinaryOp::Sub,
        Rule::op_mul => BinaryOp::Mul,
        Rule::op_div => BinaryOp::Div,
        Rule::op_mod => BinaryOp::Mod,
        Rule::op_exp => BinaryOp::Exp,
        _ => return Err(unexpected(pair, "binary operator")),
    };
    Ok(op)
}

fn build_unary(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut ops = Vec::new();
    let mut operand = None;
    for child in Children::of(pair) {
        match child.as_rule() {
            Rule::unary_op => ops.push(child.as_str().to_string()),
            _ => operand = Some(build_postfix(child)?),
        }
    }
    let mut expr = operand.ok_or_else(|| SyntaxError {
        message: "unary operator without operand".to_string(),
        span: Span::default(),
    })?;
    for op in ops.iter().rev() {
        expr = match op.as_str() {
            "++" | "--" => Expr::Update {
                op: update_op(op),
                prefix: true,
                arg: Box::new(expr),
            },
            other => Expr::Unary {
                op: unary_op(other),
                arg: Box::new(expr),
            },
        };
    }
    Ok(expr)
}

fn unary_op(token: &str) -> UnaryOp {
    match token {
        "!" => UnaryOp::Not,
        "~" => UnaryOp::BitNot,
        "+" => UnaryOp::Plus,
        "-" => UnaryOp::Minus,
        "typeof" => UnaryOp::Typeof,
        "void" => UnaryOp::Void,
        "delete" => UnaryOp::Delete,
        _ => UnaryOp::Await,
    }
}

fn update_op(token: &str) -> UpdateOp {
    if token == "--" {
        UpdateOp::Decrement
    } else {
        UpdateOp::Increment
    }
}

fn build_postfix(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let expr = build_lhs(children.expect("operand")?)?;
    match children.next_if(Rule::postfix_op) {
        Some(op) => Ok(Expr::Update {
            op: update_op(op.as_str()),
            prefix: false,
            arg: Box::new(expr),
        }),
        None => Ok(expr),
    }
}

/// Builds `lhs_expr` and `new_callee`: an operand followed by suffixes.
fn build_lhs(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let mut expr = build_operand(children.expect("operand")?)?;
    for suffix in children {
        expr = apply_suffix(expr, suffix)?;
    }
    Ok(expr)
}

fn build_operand(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let head = children.expect("operand")?;
    match head.as_rule() {
        Rule::new_expr => build_new(head),
        _ => build_primary(head),
    }
}

fn member_prop(pair: Pair<Rule>) -> MemberProp {
    match pair.as_rule() {
        Rule::private_name => MemberProp::Private(private_name(&pair)),
        _ => MemberProp::Ident(pair.as_str().to_string()),
    }
}

fn private_name(pair: &Pair<Rule>) -> String {
    pair.as_str().trim_start_matches('#').to_string()
}

fn apply_suffix(object: Expr, suffix: Pair<Rule>) -> BuildResult<Expr> {
    match suffix.as_rule() {
        Rule::member_dot => {
            let mut inner = Children::of(suffix);
            Ok(Expr::Member {
                object: Box::new(object),
                property: member_prop(inner.expect("property name")?),
                optional: false,
            })
        }
        Rule::member_index => {
            let mut inner = Children::of(suffix);
            Ok(Expr::Member {
                object: Box::new(object),
                property: MemberProp::Computed(Box::new(build_expression(
                    inner.expect("index")?,
                )?)),
                optional: false,
            })
        }
        Rule::call_args => Ok(Expr::Call {
            callee: Box::new(object),
            args: build_call_args(suffix)?,
            optional: false,
        }),
        Rule::template => match build_template(suffix)? {
            Expr::Template { quasis, exprs } => Ok(Expr::TaggedTemplate {
                tag: Box::new(object),
                quasis,
                exprs,
            }),
            other => Ok(other),
        },
        Rule::opt_chain => {
            let mut inner = Children::of(suffix);
            let part = inner.expect("optional chain")?;
            match part.as_rule() {
                Rule::prop_name | Rule::private_name => Ok(Expr::Member {
                    object: Box::new(object),
                    property: member_prop(part),
                    optional: true,
                }),
                Rule::call_args => Ok(Expr::Call {
                    callee: Box::new(object),
                    args: build_call_args(part)?,
                    optional: true,
                }),
                _ => Ok(Expr::Member {
                    object: Box::new(object),
                    property: MemberProp::Computed(Box::new(build_expression(part)?)),
                    optional: true,
                }),
            }
        }
        _ => Err(unexpected(&suffix, "member access")),
    }
}

fn build_call_args(pair: Pair<Rule>) -> BuildResult<Vec<Expr>> {
    Children::of(pair).map(build_argument).collect()
}

fn build_new(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut children = Children::of(pair);
    let callee = build_lhs(children.expect("constructor")?)?;
    let args = children.next().map(build_call_args).transpose()?;
    Ok(Expr::New {
        callee: Box::new(callee),
        args,
    })
}

fn build_primary(pair: Pair<Rule>) -> BuildResult<Expr> {
    let span = span_of(&pair);
    match pair.as_rule() {
        Rule::ident => Ok(Expr::Ident(pair.as_str().to_string())),
        Rule::number => Ok(Expr::Number(pair.as_str().to_string())),
        Rule::string => Ok(Expr::Str(pair.as_str().to_string())),
        Rule::regex => Ok(Expr::Regex(pair.as_str().to_string())),
        Rule::this_expr => Ok(Expr::This),
        Rule::super_expr => Ok(Expr::Super),
        Rule::meta_property => Ok(Expr::MetaProperty(
            if pair.as_str().starts_with("new") {
                "new.target"
            } else {
                "import.meta"
            }
            .to_string(),
        )),
        Rule::private_name => Ok(Expr::PrivateName(private_name(&pair))),
        Rule::import_call => {
            let mut children = Children::of(pair);
            Ok(Expr::Import(build_call_args(children.expect("arguments")?)?))
        }
        Rule::literal_kw => Ok(match pair.as_str() {
            "true" => Expr::Bool(true),
            "false" => Expr::Bool(false),
            _ => Expr::Null,
        }),
        Rule::paren_expr => build_wrapped_expression(pair),
        Rule::function_expr => Ok(Expr::Function(Box::new(build_function(pair)?))),
        Rule::class_expr => Ok(Expr::Class(Box::new(build_class(pair)?))),
        Rule::template => build_template(pair),
        Rule::array_lit => {
            let mut items = Children::of(pair)
                .map(|item| {
                    let mut inner = Children::of(item);
                    inner.next().map(build_argument).transpose()
                })
                .collect::<BuildResult<Vec<_>>>()?;
            if matches!(items.last(), Some(None)) {
                items.pop();
            }
            Ok(Expr::Array(items))
        }
        Rule::object_lit => {
            let props = Children::of(pair)
                .map(build_prop)
                .collect::<BuildResult<_>>()?;
            Ok(Expr::Object(props))
        }
        Rule::inline_site => {
            let mut children = Children::of(pair);
            let module = unquote(children.expect("module reference")?.as_str());
            let function = children.expect("function name")?.as_str().to_string();
            let args = build_call_args(children.expect("arguments")?)?;
            Ok(Expr::Inline(MacroSite {
                module,
                function,
                args,
                span,
            }))
        }
        _ => Err(unexpected(&pair, "expression")),
    }
}

fn build_prop(pair: Pair<Rule>) -> BuildResult<Prop> {
    match pair.as_rule() {
        Rule::spread => {
            let mut inner = Children::of(pair);
            Ok(Prop::Spread(build_assign(inner.expect("spread value")?)?))
        }
        Rule::method_def => Ok(Prop::Method(build_method(pair)?)),
        Rule::key_value_prop => {
            let mut inner = Children::of(pair);
            let key = build_prop_key(inner.expect("property key")?)?;
            let value = build_assign(inner.expect("property value")?)?;
            Ok(Prop::KeyValue { key, value })
        }
        Rule::shorthand_prop => Ok(Prop::Shorthand(pair.as_str().trim().to_string())),
        _ => Err(unexpected(&pair, "object literal")),
    }
}

fn build_template(pair: Pair<Rule>) -> BuildResult<Expr> {
    let mut quasis = Vec::new();
    let mut exprs = Vec::new();
    let mut current = String::new();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::template_chars => current.push_str(part.as_str()),
            Rule::template_sub => {
                quasis.push(std::mem::take(&mut current));
                let mut inner = Children::of(part);
                exprs.push(build_expression(inner.expect("template expression")?)?);
            }
            _ => return Err(unexpected(&part, "template literal")),
        }
    }
    quasis.push(current);
    Ok(Expr::Template { quasis, exprs })
}

/// Strips the quotes of a string literal and resolves simple escapes.
pub fn unquote(literal: &str) -> String {
    let inner = literal
        .get(1..literal.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn convert_parse_error(error: pest::error::Error<Rule>) -> SyntaxError {
    let span = match error.location {
        InputLocation::Pos(pos) => Span::new(pos, pos),
        InputLocation::Span((start, end)) => Span::new(start, end),
    };
    let error = error.renamed_rules(|rule| rule_description(*rule));
    SyntaxError {
        message: error.variant.message().into_owned(),
        span,
    }
}

fn rule_description(rule: Rule) -> String {
    match rule {
        Rule::EOI => "end of input".to_string(),
        Rule::ident => "identifier".to_string(),
        Rule::expression | Rule::assign_expr | Rule::operand => "expression".to_string(),
        Rule::block | Rule::function_body => "block".to_string(),
        Rule::string => "string literal".to_string(),
        Rule::call_args => "argument list".to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Program {
        match parse_program(source) {
            Ok(program) => program,
            Err(e) => panic!("failed to parse {:?}: {}", source, e.located(source)),
        }
    }

    fn only_stmt(source: &str) -> Stmt {
        let mut program = parse_ok(source);
        assert_eq!(program.body.len(), 1, "expected one statement in {:?}", source);
        program.body.remove(0).value
    }

    #[test]
    fn parses_function_declaration() {
        let stmt = only_stmt("function double(x) { return x * 2; }");
        let Stmt::Function(function) = stmt else {
            panic!("expected function declaration");
        };
        assert_eq!(function.name.as_deref(), Some("double"));
        assert_eq!(function.params, vec![Pattern::Ident("x".into())]);
        let FunctionBody::Block(body) = function.body else {
            panic!("expected block body");
        };
        assert!(matches!(
            &body[0].value,
            Stmt::Return(Some(Expr::Binary { op: BinaryOp::Mul, .. }))
        ));
    }

    #[test]
    fn binary_precedence_follows_javascript() {
        let expr = parse_expression("a + b * c ** d ** e").unwrap();
        let Expr::Binary { op: BinaryOp::Add, right, .. } = expr else {
            panic!("expected addition at the root");
        };
        let Expr::Binary { op: BinaryOp::Mul, right, .. } = *right else {
            panic!("expected multiplication");
        };
        let Expr::Binary { op: BinaryOp::Exp, right, .. } = *right else {
            panic!("expected exponent");
        };
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Exp, .. }));
    }

    #[test]
    fn parses_inline_site_as_expression() {
        let stmt = only_stmt("var y = %inline('./math').double(a + 1, b);");
        let Stmt::Var(decl) = stmt else {
            panic!("expected var declaration");
        };
        let Some(Expr::Inline(site)) = &decl.declarators[0].init else {
            panic!("expected inline site initializer");
        };
        assert_eq!(site.module, "./math");
        assert_eq!(site.function, "double");
        assert_eq!(site.args.len(), 2);
        assert_eq!(
            &"var y = %inline('./math').double(a + 1, b);"[site.span.start..site.span.end],
            "%inline('./math').double(a + 1, b)"
        );
    }

    #[test]
    fn statement_spans_cover_the_semicolon() {
        let source = "  foo(1);\n  bar(2)\n";
        let program = parse_ok(source);
        let first = program.body[0].span;
        assert_eq!(&source[first.start..first.end], "foo(1);");
        let second = program.body[1].span;
        assert_eq!(&source[second.start..second.end], "bar(2)");
    }

    #[test]
    fn parses_module_export_forms() {
        let program = parse_ok(
            r#"
            import fs from 'fs';
            import { a, b as c } from "./x";
            export function f(x) { return x; }
            export const g = (y) => y + 1;
            export default class Util { static h(z) { return z; } }
            module.exports = { f, k: function (q) { return q; }, m(r) { return r; } };
            export { f as ff };
            "#,
        );
        assert_eq!(program.body.len(), 7);
        assert!(matches!(program.body[0].value, Stmt::Import(_)));
        assert!(matches!(
            program.body[4].value,
            Stmt::Export(ExportDecl::DefaultClass(_))
        ));
    }

    #[test]
    fn parses_control_flow_and_patterns() {
        parse_ok(
            r#"
            for (var i = 0, n = xs.length; i < n; i++) { total += xs[i]; }
            for (const [k, v] of Object.entries(obj)) continue;
            for (key in obj) if (!obj.hasOwnProperty(key)) break;
            while (x) { x--; }
            do { y++ } while (y < 10)
            switch (kind) { case 'a': go(); break; default: stop(); }
            try { risky(); } catch ({ message }) { log(message); } finally { done(); }
            const { a, b: { c = 1 }, ...rest } = source;
            let fn = async ({ x }, ...ys) => { await x; return ys; };
            label = cond ? `t ${a + b} u` : /ab+c/gi.test(s);
            "#,
        );
    }

    #[test]
    fn object_literal_shorthand_and_methods() {
        let expr = parse_expression("{ a, b: 1, get c() { return 2; }, [d]: 3, ...e }").unwrap();
        let Expr::Object(props) = expr else {
            panic!("expected object literal");
        };
        assert!(matches!(&props[0], Prop::Shorthand(name) if name == "a"));
        assert!(matches!(&props[2], Prop::Method(m) if m.kind == MethodKind::Get));
        assert!(matches!(&props[3], Prop::KeyValue { key: PropKey::Computed(_), .. }));
        assert!(matches!(&props[4], Prop::Spread(_)));
    }

    #[test]
    fn parse_arguments_splits_top_level_commas() {
        let args = parse_arguments("a, f(b, c), [d, e]").unwrap();
        assert_eq!(args.len(), 3);
        assert!(parse_arguments("").unwrap().is_empty());
    }

    #[test]
    fn syntax_error_reports_location() {
        let source = "function (\n";
        let error = parse_program(source).unwrap_err();
        let located = error.located(source);
        assert!(located.contains(" at "), "unexpected message {located}");
        assert!(error.span.start <= source.len());
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert!(parse_program("var return = 1;").is_err());
        parse_ok("var returned = 1; var newer = returned;");
    }

    #[test]
    fn tagged_template_is_one_expression() {
        let stmt = only_stmt("html`<b>${name}</b>`;");
        let Stmt::Expr(Expr::TaggedTemplate { tag, quasis, exprs }) = stmt else {
            panic!("expected tagged template");
        };
        assert_eq!(*tag, Expr::ident("html"));
        assert_eq!(quasis, vec!["<b>".to_string(), "</b>".to_string()]);
        assert_eq!(exprs, vec![Expr::ident("name")]);

        let Stmt::Expr(Expr::TaggedTemplate { tag, .. }) = only_stmt("String.raw`a\\n`") else {
            panic!("expected tagged template on a member");
        };
        assert!(matches!(*tag, Expr::Member { .. }));
    }

    #[test]
    fn return_does_not_continue_across_a_newline() {
        let program = parse_ok("function f(a) {\n  return\n  a + 1;\n}");
        let Stmt::Function(function) = &program.body[0].value else {
            panic!("expected function declaration");
        };
        let FunctionBody::Block(body) = &function.body else {
            panic!("expected block body");
        };
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].value, Stmt::Return(None));
        assert!(matches!(body[1].value, Stmt::Expr(Expr::Binary { op: BinaryOp::Add, .. })));

        let stmt = only_stmt("function g(a) { return /* same line */ a; }");
        let Stmt::Function(Function { body: FunctionBody::Block(body), .. }) = stmt else {
            panic!("expected function declaration");
        };
        assert!(matches!(body[0].value, Stmt::Return(Some(_))));
    }

    #[test]
    fn postfix_update_does_not_continue_across_a_newline() {
        let program = parse_ok("x = 1\n++y");
        assert_eq!(program.body.len(), 2);
        assert!(matches!(
            &program.body[0].value,
            Stmt::Expr(Expr::Assign { value, .. }) if **value == Expr::Number("1".into())
        ));
        assert!(matches!(
            &program.body[1].value,
            Stmt::Expr(Expr::Update { prefix: true, arg, .. }) if **arg == Expr::ident("y")
        ));

        let Stmt::Expr(Expr::Update { prefix: false, .. }) = only_stmt("i ++;") else {
            panic!("expected postfix update on one line");
        };
    }

    #[test]
    fn throw_and_labels_respect_line_breaks() {
        assert!(parse_program("throw\nnew Error('x');").is_err());
        let program = parse_ok("outer: for (;;) { while (a) { break outer; } continue\nouter; }");
        let Stmt::Labeled { label, body } = &program.body[0].value else {
            panic!("expected labeled statement");
        };
        assert_eq!(label, "outer");
        let Stmt::For { body, .. } = &body.value else {
            panic!("expected for loop");
        };
        let Stmt::Block(stmts) = &body.value else {
            panic!("expected block body");
        };
        let Stmt::While { body, .. } = &stmts[0].value else {
            panic!("expected while loop");
        };
        let Stmt::Block(inner) = &body.value else {
            panic!("expected block body");
        };
        assert_eq!(inner[0].value, Stmt::Break(Some("outer".into())));
        assert_eq!(stmts[1].value, Stmt::Continue(None));
        assert_eq!(stmts[2].value, Stmt::Expr(Expr::ident("outer")));
    }

    #[test]
    fn parses_generators_and_yield() {
        let stmt = only_stmt("function* range(n) { for (let i = 0; i < n; i++) yield i; yield* other(); yield; }");
        let Stmt::Function(function) = stmt else {
            panic!("expected generator declaration");
        };
        assert!(function.is_generator);
        let FunctionBody::Block(body) = &function.body else {
            panic!("expected block body");
        };
        assert!(matches!(
            &body[1].value,
            Stmt::Expr(Expr::Yield { arg: Some(_), delegate: true })
        ));
        assert_eq!(
            body[2].value,
            Stmt::Expr(Expr::Yield {
                arg: None,
                delegate: false
            })
        );

        let Expr::Object(props) = parse_expression("{ *keys() { yield 1; }, async *values() {} }").unwrap() else {
            panic!("expected object literal");
        };
        assert!(matches!(&props[0], Prop::Method(m) if m.function.is_generator && !m.function.is_async));
        assert!(matches!(&props[1], Prop::Method(m) if m.function.is_generator && m.function.is_async));
    }

    #[test]
    fn parses_class_fields_private_names_and_static_blocks() {
        let stmt = only_stmt(
            "class Counter { #count = 0; static zero = 0; label; static { Counter.ready = true; } \
             inc() { return ++this.#count; } has(o) { return #count in o; } }",
        );
        let Stmt::Class(class) = stmt else {
            panic!("expected class declaration");
        };
        assert_eq!(class.members.len(), 6);
        assert!(matches!(
            &class.members[0],
            ClassMember::Field { is_static: false, key: PropKey::Private(name), value: Some(_) } if name == "count"
        ));
        assert!(matches!(&class.members[1], ClassMember::Field { is_static: true, .. }));
        assert!(matches!(&class.members[2], ClassMember::Field { value: None, .. }));
        assert!(matches!(&class.members[3], ClassMember::StaticBlock(stmts) if stmts.len() == 1));
        assert!(matches!(&class.members[4], ClassMember::Method { is_static: false, .. }));
    }

    #[test]
    fn identifiers_may_be_non_ascii() {
        let stmt = only_stmt("const café = naïve + ñ;");
        let Stmt::Var(decl) = stmt else {
            panic!("expected declaration");
        };
        assert_eq!(decl.declarators[0].target, Pattern::Ident("café".into()));
        assert!(parse_expression("π * r").is_ok());
    }

    #[test]
    fn parses_module_meta_forms() {
        let program = parse_ok(
            "export * from './a';\nexport * as b from './b';\nconst m = import('./c');\nconst u = import.meta.url;\nfor await (const x of xs) {}\nwith (o) { p; }",
        );
        assert_eq!(
            program.body[0].value,
            Stmt::Export(ExportDecl::All {
                exported: None,
                source: "'./a'".into()
            })
        );
        assert!(matches!(
            &program.body[1].value,
            Stmt::Export(ExportDecl::All { exported: Some(name), .. }) if name == "b"
        ));
        assert!(matches!(
            &program.body[2].value,
            Stmt::Var(decl) if matches!(decl.declarators[0].init, Some(Expr::Import(_)))
        ));
        assert!(matches!(&program.body[4].value, Stmt::ForIn { is_await: true, of: true, .. }));
        assert!(matches!(&program.body[5].value, Stmt::With { .. }));
    }

    #[test]
    fn line_col_is_one_based() {
        assert_eq!(line_col("ab\ncd", 0), (1, 1));
        assert_eq!(line_col("ab\ncd", 4), (2, 2));
    }
}
